use p18arch::Word;

/// Address space a record is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Code,
    Const,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Fully resolved one-word instruction
    SingleWord(Word),
    /// Opcode word and trailing value word
    DoubleWord(Word, i64),
    /// Jump or call whose address field waits for a label
    AddressRef(Word, String),
    /// Two-word instruction whose trailing word waits for a label
    ImmediateRef(Word, String),
    /// `DC` block
    DataWords(Vec<i64>),
    /// `DS` reservation of N words
    DataSpace(i64),
}

/// One emitted (or pending) unit of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    pub addr: i64,
    pub payload: Payload,
}

impl Record {
    pub fn new(line: usize, addr: i64, payload: Payload) -> Self {
        Record {
            line,
            addr,
            payload,
        }
    }
}

impl Payload {
    pub fn space(&self) -> Space {
        match self {
            Payload::SingleWord(_)
            | Payload::DoubleWord(..)
            | Payload::AddressRef(..)
            | Payload::ImmediateRef(..) => Space::Code,
            Payload::DataWords(_) => Space::Const,
            Payload::DataSpace(_) => Space::Data,
        }
    }

    /// Number of words this payload occupies in its address space.
    pub fn size(&self) -> i64 {
        match self {
            Payload::SingleWord(_) | Payload::AddressRef(..) => 1,
            Payload::DoubleWord(..) | Payload::ImmediateRef(..) => 2,
            Payload::DataWords(words) => words.len() as i64,
            Payload::DataSpace(size) => *size,
        }
    }
}

#[test]
fn test() {
    let jump = Payload::AddressRef(0o20_00_00, "LOOP".into());
    assert_eq!((jump.space(), jump.size()), (Space::Code, 1));
    let mov = Payload::ImmediateRef(0o00_07_01, "TABLE".into());
    assert_eq!((mov.space(), mov.size()), (Space::Code, 2));
    let data = Payload::DataWords(vec![1, 2, 3]);
    assert_eq!((data.space(), data.size()), (Space::Const, 3));
    let space = Payload::DataSpace(16);
    assert_eq!((space.space(), space.size()), (Space::Data, 16));
}
