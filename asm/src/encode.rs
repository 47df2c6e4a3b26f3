use p18arch::word::{self, OpCode, CPI_SOURCE, LEVEL_MAX, TIMER_MAX};
use p18arch::{Field, Form, Op, Word};

use crate::error::Error;
use crate::expr;
use crate::parser::is_ident;
use crate::record::Payload;
use crate::symbol::Symbols;

/// Encode one instruction or data statement from its split operands.
///
/// `ORG`, `EQU` and `INCLUDE` change assembler state instead of emitting
/// anything and are handled by the caller.
pub fn encode(op: Op, args: &[&str], symbols: &Symbols) -> Result<Payload, Error> {
    let (form, base) = op.encoding();

    // Exact operand count
    // Example: count!(2) -> `MOV d, s`
    macro_rules! count {
        ($n:expr) => {
            if args.len() != $n {
                return Err(Error::Syntax(format!(
                    "`{}` takes {} operand(s), found {}",
                    op,
                    $n,
                    args.len()
                )));
            }
        };
    }

    // Get argument by index and evaluate it as a 6-bit field
    // Example: arg!(0, "Register") -> Field
    macro_rules! arg {
        ($index:expr, $what:expr) => {
            field(args[$index], symbols, $what)?
        };
    }

    let payload = match form {
        Form::Simple => {
            count!(0);
            Payload::SingleWord(base)
        }
        Form::Level => {
            count!(1);
            Payload::SingleWord(base | ranged(args[0], symbols, LEVEL_MAX, "LEVEL value")?)
        }
        Form::Timer => {
            count!(1);
            Payload::SingleWord(base | ranged(args[0], symbols, TIMER_MAX, "TIMER value")?)
        }
        Form::Jump | Form::Call => {
            count!(1);
            if !is_ident(args[0]) {
                return Err(Error::syntax(format!(
                    "`{}` expects a label, found `{}`",
                    op, args[0]
                )));
            }
            Payload::AddressRef(base, args[0].to_string())
        }
        Form::Skip => {
            count!(1);
            Payload::SingleWord(word::pack_dst(base, arg!(0, "Bit number")))
        }
        Form::Bit => {
            count!(1);
            let bit = arg!(0, "Bit number");
            Payload::SingleWord(word::pack(base, bit, bit))
        }
        Form::Pair => {
            count!(2);
            Payload::SingleWord(word::pack(base, arg!(0, "Operand"), arg!(1, "Operand")))
        }
        Form::Alu1 => {
            count!(1);
            let reg = arg!(0, "Register");
            Payload::SingleWord(word::pack(base, reg, reg))
        }
        Form::Alu2 => {
            count!(2);
            let dst = arg!(0, "Register");
            match args[1].strip_prefix('#') {
                Some(imm) => {
                    let imm = field(imm, symbols, "Constant")?;
                    Payload::SingleWord(word::pack(base | OpCode::ALU_IMM, dst, imm))
                }
                None => Payload::SingleWord(word::pack(base, dst, arg!(1, "Register"))),
            }
        }
        Form::Mov => {
            count!(2);
            let dst = arg!(0, "Register");
            match args[1].strip_prefix('#') {
                Some(imm) => immediate(imm, symbols, word::pack_dst(OpCode::MOV_LONG, dst), |value| {
                    Field::new(value).map(|src| word::pack(OpCode::MOV_SHORT, dst, src))
                })?,
                None => Payload::SingleWord(word::pack(base, dst, arg!(1, "Register"))),
            }
        }
        Form::Cmp => {
            count!(2);
            let dst = arg!(0, "Register");
            let src = arg!(1, "Register");
            if src.get() as i64 == CPI_SOURCE {
                return Err(Error::syntax("`CMP` cannot use source register 63"));
            }
            Payload::SingleWord(word::pack(base, dst, src))
        }
        Form::Cpi => {
            count!(2);
            let dst = arg!(0, "Register");
            immediate(args[1], symbols, word::pack_dst(base, dst), |_| None)?
        }
        Form::Load => {
            count!(2);
            let dst = arg!(0, "Register");
            let src = field(indirect(args[1])?, symbols, "Register")?;
            Payload::SingleWord(word::pack(base, dst, src))
        }
        Form::Store => {
            count!(2);
            let dst = field(indirect(args[0])?, symbols, "Register")?;
            let src = arg!(1, "Register");
            Payload::SingleWord(word::pack(base, dst, src))
        }
        Form::Dc => {
            if args.is_empty() {
                return Err(Error::syntax("`DC` needs at least one value"));
            }
            let words = args
                .iter()
                .map(|arg| expr::value(arg, symbols))
                .collect::<Result<Vec<_>, _>>()?;
            Payload::DataWords(words)
        }
        Form::Ds => {
            count!(1);
            let size = expr::value(args[0], symbols)?;
            if size < 0 {
                return Err(Error::OutOfRange("DS size", size));
            }
            Payload::DataSpace(size)
        }
        Form::Equ | Form::Org | Form::Include => {
            return Err(Error::syntax(format!("`{}` does not emit code", op)));
        }
    };
    Ok(payload)
}

/// Evaluate an operand that must fit a 6-bit field.
fn field(text: &str, symbols: &Symbols, what: &'static str) -> Result<Field, Error> {
    let value = expr::value(text, symbols)?;
    Field::new(value).ok_or(Error::OutOfRange(what, value))
}

fn ranged(text: &str, symbols: &Symbols, max: i64, what: &'static str) -> Result<Word, Error> {
    let value = expr::value(text, symbols)?;
    if (0..=max).contains(&value) {
        Ok(value as Word)
    } else {
        Err(Error::OutOfRange(what, value))
    }
}

/// Immediate operand of MOV and CPI.
///
/// An undefined bare label is deferred. Otherwise `short` may pack the
/// value into a single word; if it declines, the value trails `opcode`.
fn immediate<F>(text: &str, symbols: &Symbols, opcode: Word, short: F) -> Result<Payload, Error>
where
    F: Fn(i64) -> Option<Word>,
{
    if is_ident(text) && symbols.get(text).is_none() {
        return Ok(Payload::ImmediateRef(opcode, text.to_string()));
    }
    let value = expr::value(text, symbols)?;
    match short(value) {
        Some(word) => Ok(Payload::SingleWord(word)),
        None => Ok(Payload::DoubleWord(opcode, value)),
    }
}

/// Strip the parentheses of a register-indirect operand: `(Rn)`.
fn indirect(text: &str) -> Result<&str, Error> {
    match text.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) if !inner.is_empty() => Ok(inner),
        _ => Err(Error::syntax(format!(
            "expected register-indirect operand `(reg)`, found `{}`",
            text
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Symbols {
        let mut symbols = Symbols::new();
        for reg in 0..64 {
            symbols.insert(&format!("R{reg}"), reg).unwrap();
        }
        symbols.insert("PORT", 0o12).unwrap();
        symbols.insert("BIG", 0o1234).unwrap();
        symbols
    }

    fn enc(op: Op, args: &[&str]) -> Result<Payload, Error> {
        encode(op, args, &symbols())
    }

    fn single(op: Op, args: &[&str]) -> Word {
        match enc(op, args).unwrap() {
            Payload::SingleWord(word) => word,
            other => panic!("expected single word, got {other:?}"),
        }
    }

    #[test]
    fn simple() {
        assert_eq!(single(Op::NOP, &[]), 0);
        assert_eq!(single(Op::HALT, &[]), 0o00_01_00);
        assert_eq!(single(Op::RTI, &[]), 0o00_04_00);
        assert_eq!(single(Op::RESTART, &[]), 0o20_00_00);
        assert!(matches!(enc(Op::NOP, &["1"]), Err(Error::Syntax(_))));
    }

    #[test]
    fn level_and_timer() {
        assert_eq!(single(Op::LEVEL, &["15"]), 0o00_05_17);
        assert_eq!(single(Op::TIMER, &["0xFFF"]), 0o05_77_77);
        assert!(matches!(
            enc(Op::LEVEL, &["16"]),
            Err(Error::OutOfRange("LEVEL value", 16))
        ));
        assert!(matches!(
            enc(Op::TIMER, &["4096"]),
            Err(Error::OutOfRange("TIMER value", 4096))
        ));
        assert!(matches!(enc(Op::LEVEL, &["-1"]), Err(Error::OutOfRange(..))));
    }

    #[test]
    fn mov_register() {
        assert_eq!(single(Op::MOV, &["R1", "R2"]), 0o42_02_01);
    }

    #[test]
    fn mov_short_immediate() {
        assert_eq!(single(Op::MOV, &["R1", "#10"]), 0o61_12_01);
        assert_eq!(single(Op::MOV, &["R1", "#0"]), 0o61_00_01);
        assert_eq!(single(Op::MOV, &["R1", "#63"]), 0o61_77_01);
        assert_eq!(single(Op::MOV, &["R3", "#PORT"]), 0o61_12_03);
    }

    #[test]
    fn mov_long_immediate() {
        assert_eq!(
            enc(Op::MOV, &["R1", "#1000"]).unwrap(),
            Payload::DoubleWord(0o00_07_01, 1000)
        );
        assert_eq!(
            enc(Op::MOV, &["R1", "#64"]).unwrap(),
            Payload::DoubleWord(0o00_07_01, 64)
        );
        assert_eq!(
            enc(Op::MOV, &["R2", "#-1"]).unwrap(),
            Payload::DoubleWord(0o00_07_02, -1)
        );
        assert_eq!(
            enc(Op::MOV, &["R2", "#BIG"]).unwrap(),
            Payload::DoubleWord(0o00_07_02, 0o1234)
        );
    }

    #[test]
    fn mov_deferred() {
        assert_eq!(
            enc(Op::MOV, &["R4", "#TABLE"]).unwrap(),
            Payload::ImmediateRef(0o00_07_04, "TABLE".into())
        );
        // Expressions never defer
        assert!(matches!(
            enc(Op::MOV, &["R4", "#TABLE+1"]),
            Err(Error::UndefinedSymbol(_))
        ));
    }

    #[test]
    fn cmp_and_cpi() {
        assert_eq!(single(Op::CMP, &["R1", "R2"]), 0o04_02_01);
        assert!(matches!(enc(Op::CMP, &["R1", "R63"]), Err(Error::Syntax(_))));
        assert_eq!(
            enc(Op::CPI, &["R1", "5"]).unwrap(),
            Payload::DoubleWord(0o04_77_01, 5)
        );
        assert_eq!(
            enc(Op::CPI, &["R1", "LIMIT"]).unwrap(),
            Payload::ImmediateRef(0o04_77_01, "LIMIT".into())
        );
    }

    #[test]
    fn alu() {
        assert_eq!(single(Op::ADD, &["R1", "R2"]), 0o50_02_01);
        assert_eq!(single(Op::ADD, &["R1", "#2"]), 0o70_02_01);
        assert_eq!(single(Op::XOR, &["5", "#0o77"]), 0o75_77_05);
        assert_eq!(single(Op::SHL, &["R7", "R7"]), 0o45_07_07);
        assert!(matches!(
            enc(Op::SUB, &["R1", "#64"]),
            Err(Error::OutOfRange("Constant", 64))
        ));
        assert!(matches!(
            enc(Op::SUB, &["64", "R1"]),
            Err(Error::OutOfRange("Register", 64))
        ));
        assert!(matches!(enc(Op::ADD, &["R1"]), Err(Error::Syntax(_))));
        assert!(matches!(enc(Op::ADD, &["R1", ""]), Err(Error::Syntax(_))));
    }

    #[test]
    fn alu_unary() {
        assert_eq!(single(Op::TST, &["R5"]), 0o41_05_05);
        assert_eq!(single(Op::CLR, &["R63"]), 0o45_77_77);
        assert!(matches!(enc(Op::NEG, &["R1", "R2"]), Err(Error::Syntax(_))));
    }

    #[test]
    fn bits() {
        assert_eq!(single(Op::BSET, &["9"]), 0o33_11_11);
        assert_eq!(single(Op::BMOV, &["1", "2"]), 0o31_02_01);
        assert_eq!(single(Op::IN, &["R3", "PORT"]), 0o06_12_03);
        assert_eq!(single(Op::SEQ, &["4"]), 0o12_00_04);
        assert!(matches!(
            enc(Op::BTST, &["64"]),
            Err(Error::OutOfRange("Bit number", 64))
        ));
        assert!(matches!(
            enc(Op::BAND, &["1", "-1"]),
            Err(Error::OutOfRange("Operand", -1))
        ));
    }

    #[test]
    fn indirect_memory() {
        assert_eq!(single(Op::LDR, &["R1", "(R2)"]), 0o02_02_01);
        assert_eq!(single(Op::LDC, &["R1", "(R2)"]), 0o04_02_01);
        assert_eq!(single(Op::STR, &["(R3)", "R4"]), 0o03_04_03);
        for bad in ["R2", "(R2", "R2)", "()"] {
            assert!(matches!(enc(Op::LDR, &["R1", bad]), Err(Error::Syntax(_))), "{bad}");
        }
        assert!(matches!(enc(Op::STR, &["R3", "R4"]), Err(Error::Syntax(_))));
    }

    #[test]
    fn control_transfer() {
        assert_eq!(
            enc(Op::JMP, &["LOOP"]).unwrap(),
            Payload::AddressRef(0o20_00_00, "LOOP".into())
        );
        assert_eq!(
            enc(Op::CALL, &["F.ENTRY"]).unwrap(),
            Payload::AddressRef(0o01_00_00, "F.ENTRY".into())
        );
        assert!(matches!(enc(Op::JEQ, &["1+2"]), Err(Error::Syntax(_))));
        assert!(matches!(enc(Op::JNE, &[]), Err(Error::Syntax(_))));
    }

    #[test]
    fn data() {
        assert_eq!(
            enc(Op::DC, &["1", "PORT", "'A'", "-1"]).unwrap(),
            Payload::DataWords(vec![1, 0o12, 65, -1])
        );
        assert!(matches!(enc(Op::DC, &[]), Err(Error::Syntax(_))));
        assert_eq!(enc(Op::DS, &["0x10"]).unwrap(), Payload::DataSpace(16));
        assert!(matches!(enc(Op::DS, &["-1"]), Err(Error::OutOfRange(..))));
    }

    #[test]
    fn state_ops_rejected() {
        assert!(matches!(enc(Op::ORG, &["0"]), Err(Error::Syntax(_))));
        assert!(matches!(enc(Op::EQU, &["0"]), Err(Error::Syntax(_))));
        assert!(matches!(enc(Op::INCLUDE, &["\"defs.asm\""]), Err(Error::Syntax(_))));
    }
}
