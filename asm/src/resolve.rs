use p18arch::word;

use crate::error::{Error, LineError};
use crate::record::{Payload, Record};
use crate::symbol::Symbols;

/// Second pass: fill every pending label now that all symbols exist.
pub fn resolve(records: &mut [Record], symbols: &Symbols) -> Result<(), LineError> {
    for record in records.iter_mut() {
        let resolved = match &record.payload {
            Payload::AddressRef(opcode, label) => {
                let addr = lookup(symbols, label).map_err(|e| e.at(record.line))?;
                if !word::fits_addr(addr) {
                    return Err(Error::OutOfRange("Address", addr).at(record.line));
                }
                Payload::SingleWord(*opcode | addr as u32)
            }
            Payload::ImmediateRef(opcode, label) => {
                let value = lookup(symbols, label).map_err(|e| e.at(record.line))?;
                Payload::DoubleWord(*opcode, value)
            }
            _ => continue,
        };
        record.payload = resolved;
    }
    Ok(())
}

fn lookup(symbols: &Symbols, label: &str) -> Result<i64, Error> {
    symbols
        .get(label)
        .ok_or_else(|| Error::UndefinedLabel(label.to_string()))
}
