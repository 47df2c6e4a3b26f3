use crate::error::Error;

/// Memory sizes and switches of one assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Code buffer capacity in words
    pub code_size: usize,
    /// Constant buffer capacity in words
    pub const_size: usize,
    pub debug: bool,
}

impl Config {
    pub const DEFAULT_SIZE: usize = 4096;

    pub fn validate(&self) -> Result<(), Error> {
        if self.code_size == 0 {
            return Err(Error::OutOfRange("Code size", 0));
        }
        if self.const_size == 0 {
            return Err(Error::OutOfRange("Constant size", 0));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            code_size: Self::DEFAULT_SIZE,
            const_size: Self::DEFAULT_SIZE,
            debug: false,
        }
    }
}

#[test]
fn test() {
    let config = Config::default();
    assert_eq!((config.code_size, config.const_size), (4096, 4096));
    assert!(config.validate().is_ok());
    let empty = Config {
        const_size: 0,
        ..Config::default()
    };
    assert!(matches!(empty.validate(), Err(Error::OutOfRange(..))));
}
