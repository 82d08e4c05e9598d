use crate::token::{RawToken, TokenKind, PUNCTUATORS};
use crate::LexerError;
use tracing::trace;

/// Words that are followed by an operand, so a `/` after them opens a regex.
const OPERAND_KEYWORDS: &[&str] = &["return", "typeof", "case", "in", "delete", "void", "throw"];

/// C-like source scanner.
///
/// Tokenizes source text into raw tokens: names, string/number/regex
/// literals, comments, punctuators and hard line breaks. Whitespace other
/// than line breaks is dropped. Comments are kept; the parser skips them.
///
/// - `Vec<char>` source for index-based navigation
/// - Position tracking on every token
/// - Regex literals recognized only where an operand may start
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<RawToken>,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source into a vector of raw tokens.
    pub fn tokenize(source: &str) -> Result<Vec<RawToken>, LexerError> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens()?;
        trace!(count = scanner.tokens.len(), "tokenized source");
        Ok(scanner.tokens)
    }

    fn scan_tokens(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() {
            self.scan_token()?;
        }
        Ok(())
    }

    fn scan_token(&mut self) -> Result<(), LexerError> {
        let ch = self.peek();

        match ch {
            ' ' | '\t' => {
                self.advance();
                Ok(())
            }

            '\n' => {
                self.push(TokenKind::LineBreak, "\n", self.line, self.column);
                self.advance();
                self.newline();
                Ok(())
            }
            '\r' => {
                let (line, column) = (self.line, self.column);
                self.advance();
                // Handle \r\n as single line break
                if !self.is_at_end() && self.peek() == '\n' {
                    self.advance();
                }
                self.push(TokenKind::LineBreak, "\n", line, column);
                self.newline();
                Ok(())
            }

            '/' if self.peek_next() == '/' => self.scan_line_comment(),
            '/' if self.peek_next() == '*' => self.scan_block_comment(),
            '/' if self.regex_allowed() => self.scan_regex(),

            '"' | '\'' => self.scan_string(),

            '0'..='9' => self.scan_number(),
            '.' if self.peek_next().is_ascii_digit() => self.scan_number(),

            c if c.is_alphabetic() || c == '_' || c == '$' => self.scan_name(),

            _ => self.scan_punctuator(),
        }
    }

    // --- Scanners ---

    /// Scan a string literal. The token value is the unescaped content.
    fn scan_string(&mut self) -> Result<(), LexerError> {
        let quote = self.peek();
        let start_line = self.line;
        let start_col = self.column;
        self.advance(); // consume opening quote

        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            match self.peek() {
                '\\' => {
                    self.advance(); // consume backslash
                    if self.is_at_end() {
                        return Err(self.error("Unterminated escape sequence".into()));
                    }
                    match self.peek() {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\\' => value.push('\\'),
                        c if c == quote => value.push(c),
                        c => {
                            value.push('\\');
                            value.push(c);
                        }
                    }
                    self.advance();
                }
                '\n' | '\r' => {
                    return Err(LexerError {
                        message: "Unterminated string".into(),
                        line: start_line,
                        column: start_col,
                    });
                }
                c => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        if self.is_at_end() {
            return Err(LexerError {
                message: "Unterminated string".into(),
                line: start_line,
                column: start_col,
            });
        }

        self.advance(); // consume closing quote
        self.push(TokenKind::String, value, start_line, start_col);
        Ok(())
    }

    /// Scan an identifier. Keywords are not distinguished here.
    fn scan_name(&mut self) -> Result<(), LexerError> {
        let start_col = self.column;
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.peek().is_alphanumeric() || self.peek() == '_' || self.peek() == '$')
        {
            ident.push(self.peek());
            self.advance();
        }

        self.push(TokenKind::Name, ident, self.line, start_col);
        Ok(())
    }

    /// Scan a number literal: decimal with optional fraction and exponent,
    /// or hexadecimal. The token value is the source text.
    fn scan_number(&mut self) -> Result<(), LexerError> {
        let start_col = self.column;
        let mut text = String::new();

        if self.peek() == '0' && matches!(self.peek_next(), 'x' | 'X') {
            text.push(self.peek());
            self.advance();
            text.push(self.peek());
            self.advance();
            while !self.is_at_end() && self.peek().is_ascii_hexdigit() {
                text.push(self.peek());
                self.advance();
            }
            if text.len() == 2 {
                return Err(self.error(format!("Invalid number: '{text}'")));
            }
        } else {
            self.take_digits(&mut text);
            if self.peek() == '.' {
                text.push('.');
                self.advance();
                self.take_digits(&mut text);
            }
            if matches!(self.peek(), 'e' | 'E') {
                text.push(self.peek());
                self.advance();
                if matches!(self.peek(), '+' | '-') {
                    text.push(self.peek());
                    self.advance();
                }
                if !self.peek().is_ascii_digit() {
                    return Err(self.error(format!("Invalid number: '{text}'")));
                }
                self.take_digits(&mut text);
            }
        }

        if self.peek().is_alphabetic() || self.peek() == '_' {
            return Err(self.error(format!(
                "Invalid number: '{text}{}'",
                self.peek()
            )));
        }

        self.push(TokenKind::Number, text, self.line, start_col);
        Ok(())
    }

    /// Scan a line comment (`// ...`). The value keeps the comment text
    /// without the leading slashes.
    fn scan_line_comment(&mut self) -> Result<(), LexerError> {
        let start_col = self.column;

        // Skip the two `/` characters
        self.advance();
        self.advance();

        let mut content = String::new();
        while !self.is_at_end() && self.peek() != '\n' && self.peek() != '\r' {
            content.push(self.peek());
            self.advance();
        }

        self.push(TokenKind::Comment, content.trim().to_string(), self.line, start_col);
        Ok(())
    }

    /// Scan a block comment (`/* ... */`), which may span lines.
    fn scan_block_comment(&mut self) -> Result<(), LexerError> {
        let start_line = self.line;
        let start_col = self.column;

        self.advance();
        self.advance();

        let mut content = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexerError {
                    message: "Unterminated block comment".into(),
                    line: start_line,
                    column: start_col,
                });
            }
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                break;
            }
            let c = self.peek();
            content.push(c);
            self.advance();
            if c == '\n' {
                self.newline();
            }
        }

        self.push(TokenKind::Comment, content.trim().to_string(), start_line, start_col);
        Ok(())
    }

    /// Scan a regex literal `/body/flags`. The value is the full source text.
    fn scan_regex(&mut self) -> Result<(), LexerError> {
        let start_col = self.column;
        let mut text = String::from('/');
        self.advance();

        let mut in_class = false;
        loop {
            if self.is_at_end() || self.peek() == '\n' || self.peek() == '\r' {
                return Err(LexerError {
                    message: "Unterminated regex literal".into(),
                    line: self.line,
                    column: start_col,
                });
            }
            let c = self.peek();
            text.push(c);
            self.advance();
            match c {
                '\\' if !self.is_at_end() => {
                    text.push(self.peek());
                    self.advance();
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }

        while !self.is_at_end() && self.peek().is_ascii_alphabetic() {
            text.push(self.peek());
            self.advance();
        }

        self.push(TokenKind::Regex, text, self.line, start_col);
        Ok(())
    }

    /// Greedy longest match against the punctuator list.
    fn scan_punctuator(&mut self) -> Result<(), LexerError> {
        let start_col = self.column;

        let matched = PUNCTUATORS.iter().find(|p| {
            p.chars()
                .enumerate()
                .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
        });

        match matched {
            Some(p) => {
                for _ in 0..p.chars().count() {
                    self.advance();
                }
                self.push(TokenKind::Operator, *p, self.line, start_col);
                Ok(())
            }
            None => Err(self.error(format!("Unexpected character: '{}'", self.peek()))),
        }
    }

    // --- Regex detection ---

    /// A `/` starts a regex only where an operand may begin: at the start of
    /// input, after an operator other than a closing bracket, or after a
    /// keyword that takes an operand.
    fn regex_allowed(&self) -> bool {
        let previous = self
            .tokens
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::Comment && !t.is_line_break());

        match previous {
            None => true,
            Some(t) => match t.kind {
                TokenKind::Operator => !matches!(t.value.as_str(), ")" | "]" | "}"),
                TokenKind::Name => OPERAND_KEYWORDS.contains(&t.value.as_str()),
                _ => false,
            },
        }
    }

    // --- Helpers ---

    fn push(&mut self, kind: TokenKind, value: impl Into<String>, line: usize, column: usize) {
        self.tokens.push(RawToken::new(kind, value, line, column));
    }

    fn take_digits(&mut self, text: &mut String) {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            text.push(self.peek());
            self.advance();
        }
    }

    fn newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.pos]
        }
    }

    fn peek_next(&self) -> char {
        if self.pos + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.pos + 1]
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
            self.column += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, message: String) -> LexerError {
        LexerError {
            message,
            line: self.line,
            column: self.column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: tokenize and return (kind, value) pairs (ignoring positions).
    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        Scanner::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    fn name(v: &str) -> (TokenKind, String) {
        (TokenKind::Name, v.into())
    }

    fn op(v: &str) -> (TokenKind, String) {
        (TokenKind::Operator, v.into())
    }

    fn num(v: &str) -> (TokenKind, String) {
        (TokenKind::Number, v.into())
    }

    fn brk() -> (TokenKind, String) {
        (TokenKind::LineBreak, "\n".into())
    }

    // =========================================================================
    // Structure: empty input, whitespace, line breaks
    // =========================================================================

    #[test]
    fn test_empty_source() {
        assert!(Scanner::tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_only() {
        assert!(Scanner::tokenize("  \t ").unwrap().is_empty());
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(kinds("a\nb"), vec![name("a"), brk(), name("b")]);
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(kinds("a\r\nb"), vec![name("a"), brk(), name("b")]);
    }

    // =========================================================================
    // Names, numbers, strings
    // =========================================================================

    #[test]
    fn test_keywords_are_names() {
        assert_eq!(
            kinds("if while foo_bar $el"),
            vec![name("if"), name("while"), name("foo_bar"), name("$el")]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 3.14 .5 1e10 2.5E-3 0xFF"),
            vec![
                num("42"),
                num("3.14"),
                num(".5"),
                num("1e10"),
                num("2.5E-3"),
                num("0xFF"),
            ]
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = Scanner::tokenize("12abc").unwrap_err();
        assert!(err.message.contains("Invalid number"));
        let err = Scanner::tokenize("1e+").unwrap_err();
        assert!(err.message.contains("Invalid number"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            kinds(r#""hello" 'it\'s' "a\nb""#),
            vec![
                (TokenKind::String, "hello".into()),
                (TokenKind::String, "it's".into()),
                (TokenKind::String, "a\nb".into()),
            ]
        );
    }

    #[test]
    fn test_string_unterminated() {
        let err = Scanner::tokenize("'hello").unwrap_err();
        assert!(err.message.contains("Unterminated string"));
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 1);
    }

    #[test]
    fn test_string_does_not_span_lines() {
        let err = Scanner::tokenize("\"abc\ndef\"").unwrap_err();
        assert!(err.message.contains("Unterminated string"));
    }

    // =========================================================================
    // Operators
    // =========================================================================

    #[test]
    fn test_longest_match() {
        assert_eq!(
            kinds("a === b !== c == d"),
            vec![
                name("a"),
                op("==="),
                name("b"),
                op("!=="),
                name("c"),
                op("=="),
                name("d"),
            ]
        );
    }

    #[test]
    fn test_adjacent_operators() {
        assert_eq!(
            kinds("x+=-y"),
            vec![name("x"), op("+="), op("-"), name("y")]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = Scanner::tokenize("a # b").unwrap_err();
        assert!(err.message.contains("Unexpected character"));
        assert_eq!(err.column, 3);
    }

    // =========================================================================
    // Comments
    // =========================================================================

    #[test]
    fn test_line_comment() {
        assert_eq!(
            kinds("a // trailing\nb"),
            vec![
                name("a"),
                (TokenKind::Comment, "trailing".into()),
                brk(),
                name("b"),
            ]
        );
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let tokens = Scanner::tokenize("/* one\ntwo */ x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].value, "one\ntwo");
        assert_eq!(tokens[1].value, "x");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_block_comment_unterminated() {
        let err = Scanner::tokenize("/* open").unwrap_err();
        assert!(err.message.contains("Unterminated block comment"));
    }

    // =========================================================================
    // Regex literals
    // =========================================================================

    #[test]
    fn test_regex_after_operator() {
        assert_eq!(
            kinds("x = /a[/]b/gi"),
            vec![name("x"), op("="), (TokenKind::Regex, "/a[/]b/gi".into())]
        );
    }

    #[test]
    fn test_division_after_operand() {
        assert_eq!(
            kinds("a / b / c"),
            vec![name("a"), op("/"), name("b"), op("/"), name("c")]
        );
    }

    #[test]
    fn test_regex_after_operand_keyword() {
        assert_eq!(
            kinds("return /a/g"),
            vec![name("return"), (TokenKind::Regex, "/a/g".into())]
        );
        assert_eq!(
            kinds("typeof\n/x/"),
            vec![name("typeof"), brk(), (TokenKind::Regex, "/x/".into())]
        );
    }

    #[test]
    fn test_division_after_plain_name() {
        assert_eq!(
            kinds("total / count"),
            vec![name("total"), op("/"), name("count")]
        );
    }

    #[test]
    fn test_division_after_closing_paren() {
        assert_eq!(
            kinds("(a) / 2"),
            vec![op("("), name("a"), op(")"), op("/"), num("2")]
        );
    }

    // =========================================================================
    // Positions
    // =========================================================================

    #[test]
    fn test_positions() {
        let tokens = Scanner::tokenize("a +\n  bc").unwrap();
        assert_eq!((tokens[0].line, tokens[0].char_pos), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].char_pos), (1, 3));
        assert_eq!((tokens[2].line, tokens[2].char_pos), (1, 4));
        assert_eq!((tokens[3].line, tokens[3].char_pos), (2, 3));
    }
}
