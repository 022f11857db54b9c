// Filter lexer - splits filter text into classified tokens

use super::token::{Token, TokenClass};
use crate::expression::{ParseError, ParseResult};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Character offset of the next unread character
    pub fn position(&self) -> usize {
        self.position
    }

    /// Peek at the next character without advancing
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn peek_class(&self) -> TokenClass {
        TokenClass::of(self.peek())
    }

    /// Consume the next character
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    /// Skip whitespace characters
    pub fn skip_whitespace(&mut self) {
        while self.peek_class() == TokenClass::Space {
            self.advance();
        }
    }

    /// Read the next token, or `None` when the next character ends the
    /// current sequence (`)`, `,` or the end of input). Terminators are not
    /// consumed.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let class = self.peek_class();
        if class == TokenClass::End {
            return None;
        }

        let start = self.position;
        let mut text = String::new();
        text.extend(self.advance());
        if class != TokenClass::Single {
            while self.peek_class() == class {
                text.extend(self.advance());
            }
        }
        Some(Token::new(class, text, start))
    }

    /// Read the body of a quoted string whose opening quote (at `start`) has
    /// already been consumed. `\"` and `\\` are escapes.
    pub fn read_quoted(&mut self, start: usize) -> ParseResult<String> {
        let mut string = String::new();

        loop {
            match self.advance() {
                Some('"') => return Ok(string),
                Some('\\') if matches!(self.peek(), Some('"') | Some('\\')) => {
                    string.extend(self.advance());
                }
                Some(c) => string.push(c),
                None => {
                    return Err(ParseError::lexical(
                        format!("\"{}", string),
                        start,
                        "Unexpected end of quoted string",
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ErrorKind;

    fn tokens(input: &str) -> Vec<(TokenClass, String)> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push((token.class, token.text));
        }
        tokens
    }

    #[test]
    fn test_maximal_runs() {
        assert_eq!(
            tokens("qty>=10 and price<3.5"),
            vec![
                (TokenClass::Text, "qty".to_string()),
                (TokenClass::Operator, ">=".to_string()),
                (TokenClass::Text, "10".to_string()),
                (TokenClass::Text, "and".to_string()),
                (TokenClass::Text, "price".to_string()),
                (TokenClass::Operator, "<".to_string()),
                (TokenClass::Text, "3.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_operator_runs_are_not_split() {
        assert_eq!(
            tokens("a==-3"),
            vec![
                (TokenClass::Text, "a".to_string()),
                (TokenClass::Operator, "==-".to_string()),
                (TokenClass::Text, "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_tokens_are_one_character() {
        assert_eq!(
            tokens("((x"),
            vec![
                (TokenClass::Single, "(".to_string()),
                (TokenClass::Single, "(".to_string()),
                (TokenClass::Text, "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_stops_at_terminators() {
        let mut lexer = Lexer::new("a , b)");
        assert_eq!(lexer.next_token().map(|t| t.text), Some("a".to_string()));
        assert_eq!(lexer.next_token(), None);
        assert_eq!(lexer.peek(), Some(','));
        assert_eq!(lexer.position(), 2);
    }

    #[test]
    fn test_positions_count_characters() {
        let mut lexer = Lexer::new("é > 1");
        assert_eq!(lexer.next_token().map(|t| t.position), Some(0));
        assert_eq!(lexer.next_token().map(|t| t.position), Some(2));
        assert_eq!(lexer.next_token().map(|t| t.position), Some(4));
    }

    #[test]
    fn test_read_quoted() -> ParseResult<()> {
        let mut lexer = Lexer::new(r#""hello world" rest"#);
        let quote = lexer.next_token().unwrap();
        assert_eq!(quote.class, TokenClass::Single);
        assert_eq!(lexer.read_quoted(quote.position)?, "hello world");
        assert_eq!(lexer.next_token().map(|t| t.text), Some("rest".to_string()));
        Ok(())
    }

    #[test]
    fn test_read_quoted_escapes() -> ParseResult<()> {
        let mut lexer = Lexer::new(r#""say \"hi\" \\ \n""#);
        lexer.advance();
        assert_eq!(lexer.read_quoted(0)?, r#"say "hi" \ \n"#);
        Ok(())
    }

    #[test]
    fn test_unterminated_quote() {
        let mut lexer = Lexer::new(r#"x == "abc"#);
        lexer.next_token();
        lexer.next_token();
        let quote = lexer.next_token().unwrap();
        let err = lexer.read_quoted(quote.position).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert_eq!(err.position(), 5);
        assert_eq!(err.token(), "\"abc");
    }
}
