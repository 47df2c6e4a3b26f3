/// One line of input as read, in global line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub file: String,
    /// 0-based index within `file`
    pub idx: usize,
    pub text: String,
}

/// File name of an `INCLUDE` operand: `"path"` or `'path'`.
pub fn include_path(operands: &str) -> Option<&str> {
    let quote = operands.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    operands
        .strip_prefix(quote)?
        .strip_suffix(quote)
        .filter(|path| !path.is_empty())
}

#[test]
fn test() {
    assert_eq!(include_path("\"defs.asm\""), Some("defs.asm"));
    assert_eq!(include_path("'lib/io.asm'"), Some("lib/io.asm"));
    assert_eq!(include_path("\"\""), None);
    assert_eq!(include_path("DEFS.ASM"), None);
    assert_eq!(include_path("\"defs.asm'"), None);
}
