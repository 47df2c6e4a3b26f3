use std::fmt;

/// 6-bit operand field. Registers, bit numbers and I/O ports all share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Field(u8);

impl Field {
    pub const MAX: i64 = 0o77;

    pub fn new(value: i64) -> Option<Self> {
        if (0..=Self::MAX).contains(&value) {
            Some(Field(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02o}", self.0)
    }
}

#[test]
fn test() {
    assert_eq!(Field::new(0).map(Field::get), Some(0));
    assert_eq!(Field::new(63).map(Field::get), Some(63));
    assert_eq!(Field::new(64), None);
    assert_eq!(Field::new(-1), None);
    assert_eq!(Field::new(9).unwrap().to_string(), "11");
}
