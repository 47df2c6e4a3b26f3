use std::fmt::Write;

use p18arch::Word;

pub const WORDS_PER_ROW: usize = 16;

/// Hex text of a memory image, 16 words per row.
pub fn hex_dump(words: &[Word]) -> String {
    let mut out = String::with_capacity(words.len() * 6 + words.len() / WORDS_PER_ROW + 1);
    for row in words.chunks(WORDS_PER_ROW) {
        for word in row {
            let _ = write!(out, "{:05X} ", word);
        }
        out.push('\n');
    }
    out
}

#[test]
fn test() {
    let words: Vec<Word> = (0..18).collect();
    let dump = hex_dump(&words);
    let rows: Vec<_> = dump.lines().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        "00000 00001 00002 00003 00004 00005 00006 00007 \
         00008 00009 0000A 0000B 0000C 0000D 0000E 0000F "
    );
    assert_eq!(rows[1], "00010 00011 ");
    assert!(dump.ends_with('\n'));

    assert_eq!(hex_dump(&[0o777777]), "3FFFF \n");
    assert_eq!(hex_dump(&[]), "");
}
