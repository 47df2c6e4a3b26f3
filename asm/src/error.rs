use color_print::ceprintln;
use thiserror::Error;

use crate::source::SourceLine;

#[derive(Error, Debug)]
pub enum Error {
    // Syntax errors
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Invalid opcode: `{0}`")]
    InvalidOpcode(String),

    #[error("Invalid string constant")]
    UnterminatedQuote,

    // Range errors
    #[error("{0} out of range: {1}")]
    OutOfRange(&'static str, i64),

    // Symbol errors
    #[error("Duplicate label: `{0}`")]
    DuplicateLabel(String),

    #[error("Symbol not defined: `{0}`")]
    UndefinedSymbol(String),

    #[error("Label not defined: `{0}`")]
    UndefinedLabel(String),

    #[error("{0} requires a label")]
    LabelRequired(&'static str),

    // Layout errors
    #[error("Memory conflict at address {0:o}")]
    MemoryConflict(i64),

    #[error("Unresolved reference: `{0}`")]
    Unresolved(String),

    // Expression errors
    #[error("Invalid number: `{0}`")]
    InvalidNumber(String),

    #[error("Missing char constant quote")]
    MissingCharQuote,

    #[error("Invalid char constant: `{0}`")]
    InvalidChar(char),

    #[error("Missing right paren")]
    MissingRightParen,

    #[error("Invalid expression")]
    InvalidExpression,

    #[error("Expression nested too deeply")]
    TooDeep,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid shift count: {0}")]
    InvalidShift(i64),

    // I/O errors
    #[error("File not found: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    pub fn at(self, line: usize) -> LineError {
        LineError { line, error: self }
    }

    pub fn syntax(msg: impl Into<String>) -> Self {
        Error::Syntax(msg.into())
    }
}

/// An error tied to its global source line (0 when no line applies).
#[derive(Error, Debug)]
#[error("{error} at line {line}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub error: Error,
}

impl LineError {
    /// Print error with the file location and line content
    pub fn print_diag(&self, lines: &[SourceLine]) {
        ceprintln!("<red,bold>error</>: {}", self.error);

        let src = self.line.checked_sub(1).and_then(|idx| lines.get(idx));
        match src {
            Some(src) => {
                let line_num = src.idx + 1;
                ceprintln!("     <blue>--></> <underline>{}:{}</>", src.file, line_num);
                ceprintln!("      <blue>|</>");
                ceprintln!(" <blue>{:>4} |</> {}", line_num, src.text);
                ceprintln!("      <blue>|</>");
            }
            None if self.line > 0 => ceprintln!("     <blue>--></> line {}", self.line),
            None => {}
        }
    }
}
