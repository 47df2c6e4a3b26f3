use std::fmt::Write;

use p18arch::word::{truncate, Word};

use crate::record::{Payload, Record};
use crate::source::SourceLine;

/// Source listing annotated with addresses and octal words.
///
/// `records` must be in source order, as the assembler produces them.
pub fn listing(lines: &[SourceLine], records: &[Record]) -> String {
    let mut out = String::new();
    let mut next = 1;

    for record in records {
        while next < record.line {
            if let Some(src) = lines.get(next - 1) {
                plain(&mut out, &src.text);
            }
            next += 1;
        }
        let Some(src) = record.line.checked_sub(1).and_then(|idx| lines.get(idx)) else {
            break;
        };
        let text = &src.text;
        next = record.line + 1;

        let addr = record.addr;
        match &record.payload {
            Payload::SingleWord(word) | Payload::AddressRef(word, _) => {
                let _ = writeln!(out, "{:03o} {:06o}        : {}", addr, mask(*word), text);
            }
            Payload::DoubleWord(word, value) => {
                let _ = writeln!(
                    out,
                    "{:03o} {:06o} {:06o} : {}",
                    addr,
                    mask(*word),
                    truncate(*value),
                    text
                );
            }
            Payload::ImmediateRef(word, _) => {
                let _ = writeln!(out, "{:03o} {:06o} ?????? : {}", addr, mask(*word), text);
            }
            Payload::DataSpace(_) => {
                let _ = writeln!(out, "{:03o}               : {}", addr, text);
            }
            Payload::DataWords(words) => {
                plain(&mut out, text);
                let _ = write!(out, "{:03o}   ", addr);
                for word in words {
                    let _ = write!(out, "{:03o}  ", truncate(*word));
                }
                out.push('\n');
            }
        }
    }

    for src in lines.iter().skip(next - 1) {
        plain(&mut out, &src.text);
    }
    out
}

fn plain(out: &mut String, text: &str) {
    let _ = writeln!(out, "                  : {}", text);
}

fn mask(word: Word) -> Word {
    truncate(word as i64)
}
