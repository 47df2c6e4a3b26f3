use p18arch::word::{self, Word};

use crate::config::Config;
use crate::error::{Error, LineError};
use crate::record::{Payload, Record};

/// Final memory images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub code: Vec<Word>,
    pub consts: Vec<Word>,
    /// One past the highest code address written
    pub code_end: usize,
    /// One past the highest constant address written
    pub const_end: usize,
}

struct Buffer {
    slots: Vec<Option<Word>>,
    end: usize,
}

impl Buffer {
    fn new(size: usize) -> Self {
        Buffer {
            slots: vec![None; size],
            end: 0,
        }
    }

    /// Each slot takes exactly one write.
    fn write(&mut self, addr: i64, value: i64) -> Result<(), Error> {
        let idx = usize::try_from(addr)
            .ok()
            .filter(|idx| *idx < self.slots.len())
            .ok_or(Error::OutOfRange("Address", addr))?;
        if self.slots[idx].is_some() {
            return Err(Error::MemoryConflict(addr));
        }
        self.slots[idx] = Some(word::truncate(value));
        self.end = self.end.max(idx + 1);
        Ok(())
    }

    fn finish(self) -> (Vec<Word>, usize) {
        let words = self.slots.into_iter().map(|w| w.unwrap_or(0)).collect();
        (words, self.end)
    }
}

fn next_addr(addr: i64, offset: usize) -> Result<i64, Error> {
    i64::try_from(offset)
        .ok()
        .and_then(|offset| addr.checked_add(offset))
        .ok_or(Error::OutOfRange("Address", addr))
}

/// Place resolved records into the code and constant buffers.
pub fn layout(records: &[Record], config: &Config) -> Result<Image, LineError> {
    let mut code = Buffer::new(config.code_size);
    for record in records {
        let at = |e: Error| e.at(record.line);
        match &record.payload {
            Payload::SingleWord(opcode) => {
                code.write(record.addr, *opcode as i64).map_err(at)?;
            }
            Payload::DoubleWord(opcode, value) => {
                code.write(record.addr, *opcode as i64).map_err(at)?;
                let next = next_addr(record.addr, 1).map_err(at)?;
                code.write(next, *value).map_err(at)?;
            }
            Payload::AddressRef(_, label) | Payload::ImmediateRef(_, label) => {
                return Err(Error::Unresolved(label.clone()).at(record.line));
            }
            Payload::DataWords(_) | Payload::DataSpace(_) => {}
        }
    }

    let mut consts = Buffer::new(config.const_size);
    for record in records {
        if let Payload::DataWords(words) = &record.payload {
            for (offset, value) in words.iter().enumerate() {
                let at = |e: Error| e.at(record.line);
                let addr = next_addr(record.addr, offset).map_err(at)?;
                consts.write(addr, *value).map_err(at)?;
            }
        }
    }

    let (code, code_end) = code.finish();
    let (consts, const_end) = consts.finish();
    Ok(Image {
        code,
        consts,
        code_end,
        const_end,
    })
}
