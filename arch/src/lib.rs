pub mod field;
pub mod op;
pub mod word;

pub use field::Field;
pub use op::{Form, Op};
pub use word::Word;
