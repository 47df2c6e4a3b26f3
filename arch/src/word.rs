use crate::field::Field;

pub type Word = u32;

// Words are 18 bits, written as three octal digit pairs `OO SS DD`.
pub const WORD_MASK: Word = 0o777777;

/// Jump and call targets occupy the low 12 bits (`SS DD`).
pub const ADDR_MASK: Word = 0o7777;

pub const SRC_SHIFT: u32 = 6;

pub const LEVEL_MAX: i64 = 15;
pub const TIMER_MAX: i64 = 0o7777;

// ----------------------------------------------------------------------------
// Fixed opcodes and opcode variants

pub struct OpCode;

impl OpCode {
    pub const CALL: Word = 0o01_00_00;
    pub const STORE: Word = 0o03_00_00;
    pub const CMP: Word = 0o04_00_00;
    pub const CPI: Word = 0o04_77_00;
    pub const LEVEL: Word = 0o00_05_00;
    pub const TIMER: Word = 0o05_00_00;

    /// `MOV d, s`
    pub const MOV: Word = 0o42_00_00;
    /// `MOV d, #n` with `n` packed into the source field
    pub const MOV_SHORT: Word = 0o61_00_00;
    /// `MOV d, #n` followed by a trailing value word
    pub const MOV_LONG: Word = 0o00_07_00;

    /// Selects the immediate variant of a two-operand ALU op.
    pub const ALU_IMM: Word = 0o20_00_00;
}

/// CPI is CMP with every source bit set, so CMP cannot name that source.
pub const CPI_SOURCE: i64 = Field::MAX;

// ----------------------------------------------------------------------------
// Packing

pub fn pack(base: Word, dst: Field, src: Field) -> Word {
    base | src.get() << SRC_SHIFT | dst.get()
}

pub fn pack_dst(base: Word, dst: Field) -> Word {
    base | dst.get()
}

/// Truncate a signed value to one memory word (two's complement wrap).
pub fn truncate(value: i64) -> Word {
    (value & WORD_MASK as i64) as Word
}

pub fn fits_addr(value: i64) -> bool {
    (0..=ADDR_MASK as i64).contains(&value)
}
