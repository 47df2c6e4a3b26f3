use indexmap::IndexSet;
use p18arch::{Form, Op};

use crate::config::Config;
use crate::encode::encode;
use crate::error::{Error, LineError};
use crate::expr;
use crate::layout::{self, Image};
use crate::parser::Line;
use crate::record::{Record, Space};
use crate::resolve;
use crate::source::{self, SourceLine};
use crate::symbol::Symbols;

/// State of one assembly run.
pub struct Assembler {
    config: Config,
    symbols: Symbols,
    records: Vec<Record>,
    lines: Vec<SourceLine>,
    included: IndexSet<String>,
    code_addr: i64,
    const_addr: i64,
    data_addr: i64,
}

impl Assembler {
    pub fn new(config: Config) -> Self {
        Assembler {
            config,
            symbols: Symbols::new(),
            records: Vec::new(),
            lines: Vec::new(),
            included: IndexSet::new(),
            code_addr: 0,
            const_addr: 0,
            data_addr: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Every line read so far; global line `n` is `lines()[n - 1]`.
    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    /// Files read so far, in order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.included.iter().map(String::as_str)
    }
}

// ----------------------------------------------------------------------------
// Pass 1: read, parse and encode

impl Assembler {
    /// Read and assemble a file. A file already read in this run is skipped.
    pub fn read_file(&mut self, path: &str) -> Result<(), LineError> {
        if !self.included.insert(path.to_string()) {
            return Ok(());
        }
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileOpen(path.to_string(), e).at(0),
            _ => Error::FileRead(path.to_string(), e).at(0),
        })?;
        self.read_lines(path, &text)
    }

    /// Assemble in-memory source as if it were the file `name`.
    pub fn read_str(&mut self, name: &str, text: &str) -> Result<(), LineError> {
        if !self.included.insert(name.to_string()) {
            return Ok(());
        }
        self.read_lines(name, text)
    }

    fn read_lines(&mut self, file: &str, text: &str) -> Result<(), LineError> {
        for (idx, raw) in text.lines().enumerate() {
            self.lines.push(SourceLine {
                file: file.to_string(),
                idx,
                text: raw.to_string(),
            });
            let line_no = self.lines.len();

            let Some(line) = Line::parse(raw).map_err(|e| e.at(line_no))? else {
                continue;
            };

            if line.op == Op::INCLUDE.to_string() {
                let path = source::include_path(&line.operands).ok_or_else(|| {
                    Error::syntax("`INCLUDE` expects a quoted file name").at(line_no)
                })?;
                self.read_file(path)?;
                continue;
            }

            self.statement(line_no, &line).map_err(|e| e.at(line_no))?;
        }
        Ok(())
    }

    fn statement(&mut self, line_no: usize, line: &Line) -> Result<(), Error> {
        let op = match line.op.as_str() {
            "" if !line.operands.is_empty() => {
                return Err(Error::syntax(format!("expected mnemonic, found `{}`", line.operands)));
            }
            "" => None,
            op => Some(Op::parse(op).map_err(|_| Error::InvalidOpcode(op.to_string()))?),
        };

        // Plain labels take the code address
        if let Some(label) = &line.label {
            if !op.is_some_and(|op| op.binds_own_label()) {
                self.symbols.insert(label, self.code_addr)?;
            }
        }

        let Some(op) = op else {
            return Ok(());
        };
        let args = line.args();

        match op.form() {
            Form::Org => {
                if args.len() != 1 {
                    return Err(Error::syntax("`ORG` takes one address"));
                }
                self.code_addr = expr::value(args[0], &self.symbols)?;
                Ok(())
            }
            Form::Equ => {
                let label = line.label.as_deref().ok_or(Error::LabelRequired("EQU"))?;
                let value = expr::value(&line.operands, &self.symbols)?;
                self.symbols.insert(label, value)
            }
            Form::Dc => {
                if let Some(label) = &line.label {
                    self.symbols.insert(label, self.const_addr)?;
                }
                self.emit(line_no, op, &args)
            }
            Form::Ds => {
                let label = line.label.as_deref().ok_or(Error::LabelRequired("DS"))?;
                self.symbols.insert(label, self.data_addr)?;
                self.emit(line_no, op, &args)
            }
            _ => self.emit(line_no, op, &args),
        }
    }

    /// Encode at the current address of the payload's space and advance it.
    fn emit(&mut self, line_no: usize, op: Op, args: &[&str]) -> Result<(), Error> {
        let payload = encode(op, args, &self.symbols)?;
        let counter = match payload.space() {
            Space::Code => &mut self.code_addr,
            Space::Const => &mut self.const_addr,
            Space::Data => &mut self.data_addr,
        };
        let addr = *counter;
        *counter = addr
            .checked_add(payload.size())
            .ok_or(Error::OutOfRange("Address", addr))?;
        self.records.push(Record::new(line_no, addr, payload));
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Pass 2: resolve and lay out

impl Assembler {
    pub fn resolve(&mut self) -> Result<(), LineError> {
        resolve::resolve(&mut self.records, &self.symbols)
    }

    pub fn layout(&self) -> Result<Image, LineError> {
        self.config.validate().map_err(|e| e.at(0))?;
        layout::layout(&self.records, &self.config)
    }

    /// Run both remaining passes once all source has been read.
    pub fn assemble(&mut self) -> Result<Image, LineError> {
        self.resolve()?;
        self.layout()
    }
}
