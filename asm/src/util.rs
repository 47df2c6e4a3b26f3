use color_print::{cformat, cprintln};
use p18arch::word::truncate;

use crate::assembler::Assembler;
use crate::record::Payload;

/// Print every source line with the code it produced, then the symbol table.
pub fn print_dump(asm: &Assembler) {
    let mut records = asm.records().iter().peekable();
    let mut file = None;

    for (idx, src) in asm.lines().iter().enumerate() {
        let line_no = idx + 1;

        // Print file header when the file changes
        if file != Some(src.file.as_str()) {
            file = Some(src.file.as_str());
            println!(
                "{}+------[{}]{}",
                "-".repeat(21),
                src.file,
                "-".repeat(45usize.saturating_sub(src.file.len()))
            );
        }

        let record = records.next_if(|record| record.line == line_no);
        let body = match record.map(|record| (record.addr, &record.payload)) {
            None => format!("{:21}", ""),
            Some((addr, Payload::SingleWord(word))) => {
                format!("[{:04o}] {:06o}        ", addr, word)
            }
            Some((addr, Payload::DoubleWord(word, value))) => {
                format!("[{:04o}] {:06o} {:06o} ", addr, word, truncate(*value))
            }
            Some((addr, Payload::AddressRef(word, _) | Payload::ImmediateRef(word, _))) => {
                cformat!("[{:04o}] {:06o} <r,s>??????</> ", addr, word)
            }
            Some((addr, Payload::DataWords(words))) => {
                cformat!("<y>#{:04o}</> {:>3} word(s)    ", addr, words.len())
            }
            Some((addr, Payload::DataSpace(size))) => {
                cformat!("<c>@{:04o}</> {:>3} word(s)    ", addr, size)
            }
        };
        println!("{}| {:>4}: {}", body, line_no, src.text);
    }
    println!("---------------------+-----------------------------------------------------");

    cprintln!("<bold>Symbols</> ({})", asm.symbols().len());
    for (name, value) in asm.symbols().iter() {
        cprintln!("  <g>{:<16}</> {:>8o} {:>8}", name, value, value);
    }
}
