use strum::{Display, EnumIter, EnumString};

use crate::word::{OpCode, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
pub enum Op {
    // Control
    NOP,
    HALT,
    PAUSE,
    RTS,
    RTI,
    RESET,
    RESTART,
    LEVEL,
    TIMER,

    // Control transfer
    CALL,
    JMP,
    JEQ,
    JBS,
    JNE,
    JBC,
    JLT,
    JGT,
    JLE,
    JGE,

    // Skip on condition
    SEQ,
    SNE,
    SLT,
    SGT,
    SLE,
    SGE,

    // Compare, move, I/O
    CMP,
    CPI,
    MOV,
    IN,
    OUT,

    // Bit ops
    BCMP,
    BMOV,
    BTST,
    BCLR,
    BSET,
    BNOT,
    BAND,
    BOR,
    BXOR,

    // ALU
    TST,
    NEG,
    INV,
    CLR,
    SHR,
    SHL,
    ADD,
    SUB,
    MUL,
    AND,
    OR,
    XOR,

    // Memory
    LDR,
    LDC,
    STR,

    // Pseudo ops
    DC,
    DS,
    EQU,
    ORG,
    INCLUDE,
}

/// Operand grammar and packing rule shared by a group of mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// no operand
    Simple,
    /// `n` (0..15)
    Level,
    /// `n` (0..4095)
    Timer,
    /// `label`
    Jump,
    /// `label`
    Call,
    /// `b`
    Skip,
    /// `d, s`
    Pair,
    /// `b`, packed into both fields
    Bit,
    /// `r`, packed into both fields
    Alu1,
    /// `d, s` or `d, #n`
    Alu2,
    /// `d, s` or `d, #n`
    Mov,
    /// `d, s`
    Cmp,
    /// `d, n`
    Cpi,
    /// `d, (s)`
    Load,
    /// `(d), s`
    Store,
    Dc,
    Ds,
    Equ,
    Org,
    Include,
}

impl Op {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Invalid opcode: {s}")),
        }
    }
}

impl Op {
    pub fn encoding(&self) -> (Form, Word) {
        use Op::*;
        match self {
            NOP => (Form::Simple, 0o00_00_00),
            HALT => (Form::Simple, 0o00_01_00),
            PAUSE => (Form::Simple, 0o00_02_00),
            RTS => (Form::Simple, 0o00_03_00),
            RTI => (Form::Simple, 0o00_04_00),
            RESET => (Form::Simple, 0o00_06_00),
            RESTART => (Form::Simple, 0o20_00_00),
            LEVEL => (Form::Level, OpCode::LEVEL),
            TIMER => (Form::Timer, OpCode::TIMER),

            CALL => (Form::Call, OpCode::CALL),
            JMP => (Form::Jump, 0o20_00_00),
            JEQ => (Form::Jump, 0o22_00_00),
            JBS => (Form::Jump, 0o22_00_00),
            JNE => (Form::Jump, 0o23_00_00),
            JBC => (Form::Jump, 0o23_00_00),
            JLT => (Form::Jump, 0o24_00_00),
            JGT => (Form::Jump, 0o25_00_00),
            JLE => (Form::Jump, 0o26_00_00),
            JGE => (Form::Jump, 0o27_00_00),

            SEQ => (Form::Skip, 0o12_00_00),
            SNE => (Form::Skip, 0o13_00_00),
            SLT => (Form::Skip, 0o14_00_00),
            SGT => (Form::Skip, 0o15_00_00),
            SLE => (Form::Skip, 0o16_00_00),
            SGE => (Form::Skip, 0o17_00_00),

            CMP => (Form::Cmp, OpCode::CMP),
            CPI => (Form::Cpi, OpCode::CPI),
            MOV => (Form::Mov, OpCode::MOV),
            IN => (Form::Pair, 0o06_00_00),
            OUT => (Form::Pair, 0o07_00_00),

            BCMP => (Form::Pair, 0o30_00_00),
            BMOV => (Form::Pair, 0o31_00_00),
            BTST => (Form::Bit, 0o31_00_00),
            BCLR => (Form::Bit, 0o32_00_00),
            BSET => (Form::Bit, 0o33_00_00),
            BNOT => (Form::Pair, 0o32_00_00),
            BAND => (Form::Pair, 0o35_00_00),
            BOR => (Form::Pair, 0o36_00_00),
            BXOR => (Form::Pair, 0o37_00_00),

            TST => (Form::Alu1, 0o41_00_00),
            NEG => (Form::Alu1, 0o42_00_00),
            INV => (Form::Alu1, 0o43_00_00),
            CLR => (Form::Alu1, 0o45_00_00),
            SHR => (Form::Alu2, 0o44_00_00),
            SHL => (Form::Alu2, 0o45_00_00),
            ADD => (Form::Alu2, 0o50_00_00),
            SUB => (Form::Alu2, 0o51_00_00),
            MUL => (Form::Alu2, 0o52_00_00),
            AND => (Form::Alu2, 0o53_00_00),
            OR => (Form::Alu2, 0o54_00_00),
            XOR => (Form::Alu2, 0o55_00_00),

            LDR => (Form::Load, 0o02_00_00),
            LDC => (Form::Load, 0o04_00_00),
            STR => (Form::Store, OpCode::STORE),

            DC => (Form::Dc, 0),
            DS => (Form::Ds, 0),
            EQU => (Form::Equ, 0),
            ORG => (Form::Org, 0),
            INCLUDE => (Form::Include, 0),
        }
    }

    pub fn form(&self) -> Form {
        self.encoding().0
    }

    pub fn base(&self) -> Word {
        self.encoding().1
    }

    /// Pseudo ops bind their label somewhere other than the code address.
    pub fn binds_own_label(&self) -> bool {
        matches!(self.form(), Form::Dc | Form::Ds | Form::Equ)
    }
}
