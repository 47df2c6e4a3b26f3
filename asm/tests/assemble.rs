use p18asm::{hex_dump, listing, Assembler, Config, Error, Image, LineError};

fn assemble(code: &str) -> Result<(Assembler, Image), LineError> {
    let config = Config {
        code_size: 64,
        const_size: 64,
        ..Config::default()
    };
    let mut asm = Assembler::new(config);
    asm.read_str("main.asm", code)?;
    let image = asm.assemble()?;
    Ok((asm, image))
}

fn assert(code: &str, expects: &[u32], consts: &[u32]) {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>3}: {}", idx + 1, line);
    }
    let (_, image) = match assemble(code) {
        Ok(ok) => ok,
        Err(err) => panic!("{err}"),
    };
    for (addr, word) in image.code[..image.code_end].iter().enumerate() {
        println!("{:03o}: {:06o}", addr, word);
    }
    assert_eq!(&image.code[..image.code_end], expects);
    assert_eq!(&image.consts[..image.const_end], consts);
    assert!(image.code[image.code_end..].iter().all(|w| *w == 0));
}

fn assert_err(code: &str, line: usize) -> Error {
    match assemble(code) {
        Ok(_) => panic!("expected an error at line {line}"),
        Err(err) => {
            println!("{err}");
            assert_eq!(err.line, line);
            err.error
        }
    }
}

macro_rules! case {
    ($name:ident, $code:expr, $expects:expr) => {
        case!($name, $code, $expects, []);
    };
    ($name:ident, $code:expr, $expects:expr, $consts:expr) => {
        #[test]
        fn $name() {
            assert($code, &$expects, &$consts);
        }
    };
}

const REGS: &str = "\
R0  EQU 0
R1  EQU 1
R2  EQU 2
R3  EQU 3
";

fn with_regs(body: &str) -> String {
    format!("{REGS}{body}")
}

case!(
    nop_mov_add_jmp,
    "\
R1      EQU 1
R2      EQU 2
START   NOP
        MOV R1, #10
        MOV R2, #1000
        ADD R1, R2
        JMP DONE
DONE    HALT
",
    [
        0o00_00_00,
        0o61_12_01,
        0o00_07_02,
        0o00_17_50,
        0o50_02_01,
        0o20_00_06,
        0o00_01_00,
    ]
);

case!(
    alu_forms,
    "\
    ADD 1, #3
    SUB 2, 3
    SHL 4, #1
    CLR 5
    TST 6
",
    [0o70_03_01, 0o51_03_02, 0o65_01_04, 0o45_05_05, 0o41_06_06]
);

case!(
    control_ops,
    "\
    LEVEL 3
    TIMER 0x100
    CALL SUBR
    RTI
SUBR RTS
",
    [0o00_05_03, 0o05_04_00, 0o01_00_04, 0o00_04_00, 0o00_03_00]
);

case!(
    memory_ops,
    "\
    LDR 1, (2)
    LDC 3, (4)
    STR (5), 6
",
    [0o02_02_01, 0o04_04_03, 0o03_06_05]
);

case!(
    compare_and_skip,
    "\
    CMP 1, 2
    CPI 1, 0o1234
    SEQ 7
    BSET 3
",
    [0o04_02_01, 0o04_77_01, 0o00_12_34, 0o12_00_07, 0o33_03_03]
);

case!(
    forward_immediate,
    "\
    MOV 1, #TABLE
    HALT
TABLE DC 5, 6
",
    [0o00_07_01, 0, 0o00_01_00],
    [5, 6]
);

case!(
    data_words,
    "\
ONE  EQU 1
TBL  DC 'A', ONE + 1, -1, TBL
TBL2 DC TBL2
",
    [],
    [0o101, 2, 0o777777, 0, 4]
);

case!(
    org_places_code,
    "\
    ORG 0o10
    NOP
    HALT
    ORG 2
    RTS
",
    [0, 0, 0o00_03_00, 0, 0, 0, 0, 0, 0, 0o00_01_00]
);

case!(
    data_space_takes_no_memory,
    "\
BUF  DS 16
BUF2 DS 4
     MOV 1, #BUF2
",
    [0o61_20_01]
);

case!(
    expressions_in_operands,
    "\
BASE EQU 0o100
     MOV 1, #BASE + 2 * 3
     MOV 2, #(BASE >> 2) | 1
     DC BASE << 1, -BASE / 3
",
    [0o00_07_01, 0o106, 0o61_21_02],
    [0o200, 0o777752]
);

#[test]
fn registers_by_name() {
    assert(
        &with_regs("    ADD R1, R2\n    MOV R3, R0\n"),
        &[0o50_02_01, 0o42_00_03],
        &[],
    );
}

#[test]
fn duplicate_label() {
    let err = assert_err("LOOP NOP\n     NOP\nLOOP HALT\n", 3);
    assert!(matches!(err, Error::DuplicateLabel(name) if name == "LOOP"));
}

#[test]
fn undefined_label() {
    let err = assert_err("    NOP\n    JMP NOWHERE\n", 2);
    assert!(matches!(err, Error::UndefinedLabel(name) if name == "NOWHERE"));
}

#[test]
fn undefined_symbol_in_expression() {
    let err = assert_err("    MOV 1, #LATER + 1\nLATER NOP\n", 1);
    assert!(matches!(err, Error::UndefinedSymbol(name) if name == "LATER"));
}

#[test]
fn org_conflict() {
    let err = assert_err("    NOP\n    NOP\n    ORG 1\n    HALT\n", 4);
    assert!(matches!(err, Error::MemoryConflict(1)));
}

#[test]
fn out_of_capacity() {
    let err = assert_err("    ORG 63\n    MOV 1, #1000\n", 2);
    assert!(matches!(err, Error::OutOfRange("Address", 64)));

    let mut code = String::new();
    for _ in 0..65 {
        code.push_str("    NOP\n");
    }
    let err = assert_err(&code, 65);
    assert!(matches!(err, Error::OutOfRange("Address", 64)));
}

#[test]
fn label_required() {
    assert!(matches!(assert_err("    DS 4\n", 1), Error::LabelRequired("DS")));
    assert!(matches!(assert_err("    NOP\n    EQU 4\n", 2), Error::LabelRequired("EQU")));
}

#[test]
fn operand_errors() {
    assert!(matches!(assert_err("    MOV 64, 1\n", 1), Error::OutOfRange(..)));
    assert!(matches!(assert_err("    LEVEL 16\n", 1), Error::OutOfRange(..)));
    assert!(matches!(assert_err("    CMP 1, 63\n", 1), Error::Syntax(_)));
    assert!(matches!(assert_err("    LDR 1, 2\n", 1), Error::Syntax(_)));
    assert!(matches!(assert_err("    HALT 1\n", 1), Error::Syntax(_)));
    assert!(matches!(assert_err("    JMP 12\n", 1), Error::Syntax(_)));
    assert!(matches!(assert_err("    FOO\n", 1), Error::InvalidOpcode(_)));
    assert!(matches!(assert_err("    DC 'a\n", 1), Error::UnterminatedQuote));
    assert!(matches!(assert_err("    DC 1 / 0\n", 1), Error::DivisionByZero));
}

#[test]
fn jump_target_must_fit() {
    let code = "FAR EQU 0o10000\n    JMP FAR\n";
    assert!(matches!(assert_err(code, 2), Error::OutOfRange("Address", 0o10000)));
}

// ----------------------------------------------------------------------------
// INCLUDE

struct TempDir(std::path::PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("p18asm-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        TempDir(dir)
    }

    fn file(&self, name: &str, text: &str) -> String {
        let path = self.0.join(name);
        std::fs::write(&path, text).unwrap();
        path.to_string_lossy().into_owned()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn include_splices_lines() {
    let dir = TempDir::new("splice");
    let defs = dir.file("defs.asm", "ONE EQU 1\nTWO EQU 2\n");
    let main = dir.file(
        "main.asm",
        &format!("    INCLUDE \"{defs}\"\n    MOV ONE, TWO\n    JMP BAD\n"),
    );

    let mut asm = Assembler::new(Config::default());
    asm.read_file(&main).unwrap();
    assert_eq!(asm.symbols().get("TWO"), Some(2));
    assert_eq!(asm.lines().len(), 5);
    assert_eq!(asm.lines()[1].file, defs);
    assert_eq!(asm.lines()[3].idx, 1);

    // Global numbering continues after the included file
    let err = asm.resolve().unwrap_err();
    assert_eq!(err.line, 5);
    assert_eq!(asm.lines()[err.line - 1].text, "    JMP BAD");
}

#[test]
fn include_read_once() {
    let dir = TempDir::new("once");
    let defs = dir.file("defs.asm", "ONE EQU 1\n");
    let main = dir.file(
        "main.asm",
        &format!("    INCLUDE '{defs}'\n    INCLUDE '{defs}'\n    MOV ONE, #ONE\n"),
    );

    let mut asm = Assembler::new(Config::default());
    asm.read_file(&main).unwrap();
    assert_eq!(asm.lines().len(), 4);
    assert_eq!(asm.files().count(), 2);
    let image = asm.assemble().unwrap();
    assert_eq!(image.code[0], 0o61_01_01);
}

#[test]
fn include_missing_file() {
    let dir = TempDir::new("missing");
    let main = dir.file("main.asm", "    INCLUDE \"/nonexistent/p18/none.asm\"\n");
    let mut asm = Assembler::new(Config::default());
    let err = asm.read_file(&main).unwrap_err();
    assert_eq!(err.line, 0);
    assert!(matches!(err.error, Error::FileOpen(..)));
}

// ----------------------------------------------------------------------------
// Outputs

#[test]
fn listing_and_hex() {
    let code = "\
; demo
START MOV 1, #10
      MOV 2, #1000
      JMP START
TBL   DC 1, 2
";
    let (asm, image) = assemble(code).unwrap();

    let expected = [
        "                  : ; demo",
        "000 611201        : START MOV 1, #10",
        "001 000702 001750 :       MOV 2, #1000",
        "003 200000        :       JMP START",
        "                  : TBL   DC 1, 2",
        "000   001  002  ",
    ];
    let expected: String = expected.iter().map(|l| format!("{l}\n")).collect();
    assert_eq!(listing(asm.lines(), asm.records()), expected);

    let hex = hex_dump(&image.code);
    let rows: Vec<_> = hex.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].starts_with("31281 001C2 003E8 10000 00000 "));
    assert!(rows.iter().all(|row| row.len() == 16 * 6));

    let consts = hex_dump(&image.consts);
    assert!(consts.starts_with("00001 00002 00000 "));
}
