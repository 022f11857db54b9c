// Filter tokens for lexical analysis

/// Lexical class of a character. A token is a maximal run of characters of
/// the same class, except for `Single` tokens which are one character long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Operator,
    Single,
    Text,
    Space,
    End,
}

impl TokenClass {
    /// Classify a character; `None` stands for the end of the input
    pub fn of(c: Option<char>) -> Self {
        match c {
            None | Some(')') | Some(',') => TokenClass::End,
            Some('(') | Some('"') => TokenClass::Single,
            Some('-' | '+' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^') => {
                TokenClass::Operator
            }
            Some(c) if c.is_whitespace() => TokenClass::Space,
            Some(_) => TokenClass::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub text: String,
    /// Character offset of the first character
    pub position: usize,
}

impl Token {
    pub fn new(class: TokenClass, text: impl Into<String>, position: usize) -> Self {
        Self {
            class,
            text: text.into(),
            position,
        }
    }

    /// Registry key for this token
    pub fn spelling(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Printable form of a terminator for error messages
pub fn visible(c: Option<char>) -> String {
    match c {
        None => "end of input".to_string(),
        Some(c) if c.is_control() => format!("'\\u{{{:x}}}'", c as u32),
        Some(c) => format!("'{}'", c),
    }
}
