use crate::error::Error;

// ----------------------------------------------------------------------------
// Line

/// One source statement split into its label, mnemonic and operand fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: Option<String>,
    pub op: String,
    pub operands: String,
}

impl Line {
    /// Returns `None` for blank and comment-only lines.
    pub fn parse(raw: &str) -> Result<Option<Line>, Error> {
        let code = strip_comment(raw).trim_end();
        if code.is_empty() {
            return Ok(None);
        }
        let mut chars = code.chars().peekable();

        // Label: only in the first column
        let label = if code.starts_with(|c: char| c.is_alphabetic()) {
            let mut label = String::new();
            while let Some(ch) = chars.next_if(|&c| is_label_char(c)) {
                label.push(ch);
            }
            let label = label.to_uppercase();
            match label.strip_suffix(':') {
                Some(name) => Some(name.to_string()),
                None => Some(label),
            }
        } else {
            None
        };

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        // Mnemonic
        let mut op = String::new();
        while let Some(ch) = chars.next_if(|c| c.is_alphabetic()) {
            op.push(ch);
        }
        let op = op.to_uppercase();

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        // Operands
        let mut operands = String::new();
        while let Some(ch) = chars.next() {
            if ch == '\'' || ch == '"' {
                operands.push(ch);
                loop {
                    match chars.next() {
                        Some(c) => {
                            operands.push(c);
                            if c == ch {
                                break;
                            }
                        }
                        None => return Err(Error::UnterminatedQuote),
                    }
                }
            } else if !ch.is_whitespace() {
                operands.extend(ch.to_uppercase());
            }
        }

        Ok(Some(Line {
            label,
            op,
            operands,
        }))
    }

    /// Operand text split on commas outside quotes.
    pub fn args(&self) -> Vec<&str> {
        if self.operands.is_empty() {
            return vec![];
        }
        let mut args = vec![];
        let mut quote = None;
        let mut start = 0;
        for (idx, ch) in self.operands.char_indices() {
            match (quote, ch) {
                (None, '\'' | '"') => quote = Some(ch),
                (Some(q), _) if q == ch => quote = None,
                (None, ',') => {
                    args.push(&self.operands[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            }
        }
        args.push(&self.operands[start..]);
        args
    }
}

fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == ':'
}

/// Cut the line at the first `;` that is not inside quotes.
fn strip_comment(raw: &str) -> &str {
    let mut quote = None;
    for (idx, ch) in raw.char_indices() {
        match (quote, ch) {
            (None, ';') => return &raw[..idx],
            (None, '\'' | '"') => quote = Some(ch),
            (Some(q), _) if q == ch => quote = None,
            _ => {}
        }
    }
    raw
}

/// A bare symbol name as it may appear in an operand.
pub fn is_ident(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() => chars.all(is_label_char),
        _ => false,
    }
}
