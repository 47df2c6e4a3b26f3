mod assembler;
mod config;
mod encode;
mod error;
mod expr;
mod hex;
mod layout;
mod listing;
mod parser;
mod record;
mod resolve;
mod source;
mod symbol;
mod token;
mod util;

pub use assembler::Assembler;
pub use config::Config;
pub use encode::encode;
pub use error::{Error, LineError};
pub use expr::{eval, value};
pub use hex::hex_dump;
pub use layout::Image;
pub use listing::listing;
pub use parser::Line;
pub use record::{Payload, Record, Space};
pub use source::SourceLine;
pub use symbol::Symbols;
pub use util::print_dump;
