//! Lexer for Prolog-style program text.

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Names
    Atom(String),     // lowercase word or 'quoted'
    Variable(String), // uppercase or underscore
    Int(i64),
    Float(f64),
    StringLit(String),

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Bar,      // |
    Dot,      // . at the end of a clause

    Neck,  // :-
    Query, // ?-
    Colon, // :

    /// Symbolic operator such as `=`, `\==`, `+`, `**`.
    Op(&'static str),

    // End of input
    Eof,
}

/// Symbolic operators, longest first.
const OPERATORS: &[&str] = &[
    "=:=", "=\\=", "\\==", "@=<", "@<=", "@>=", "=<", "<=", ">=", "==", "\\=", "@<", "@>", "\\+",
    "//", "**", "=", "<", ">", "+", "-", "*", "/", "#",
];

/// Lexer state.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    start: (usize, usize),
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
            start: (1, 1),
        }
    }

    /// Line and column where the last token returned by
    /// [`Lexer::next_token`] starts.
    pub fn token_location(&self) -> (usize, usize) {
        self.start
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        self.start = (self.line, self.column);

        let remaining = &self.input[self.position..];
        let Some(ch) = remaining.chars().next() else {
            return Ok(Token::Eof);
        };

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ',' => Some(Token::Comma),
            '|' => Some(Token::Bar),
            _ => None,
        };
        if let Some(token) = single {
            self.advance(1);
            return Ok(token);
        }

        if remaining.starts_with(":-") {
            self.advance(2);
            return Ok(Token::Neck);
        }
        if remaining.starts_with("?-") {
            self.advance(2);
            return Ok(Token::Query);
        }
        if ch == ':' {
            self.advance(1);
            return Ok(Token::Colon);
        }
        if ch == '.' {
            let next = remaining[1..].chars().next();
            if next.map_or(true, |c| c.is_whitespace() || c == '%') {
                self.advance(1);
                return Ok(Token::Dot);
            }
        }
        if ch == '"' {
            return self.lex_quoted('"').map(Token::StringLit);
        }
        if ch == '\'' {
            return self.lex_quoted('\'').map(Token::Atom);
        }
        if ch.is_ascii_digit() {
            return self.lex_number();
        }
        if ch.is_ascii_lowercase() {
            return Ok(Token::Atom(self.lex_word()));
        }
        if ch.is_ascii_uppercase() || ch == '_' {
            return Ok(Token::Variable(self.lex_word()));
        }
        if let Some(op) = OPERATORS.iter().find(|op| remaining.starts_with(**op)) {
            self.advance(op.len());
            return Ok(Token::Op(*op));
        }

        Err(self.error(format!("unexpected character: '{}'", ch)))
    }

    /// Peek at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Token, LexError> {
        let saved_position = self.position;
        let saved_line = self.line;
        let saved_column = self.column;
        let saved_start = self.start;

        let token = self.next_token();

        self.position = saved_position;
        self.line = saved_line;
        self.column = saved_column;
        self.start = saved_start;

        token
    }

    fn error(&self, message: String) -> LexError {
        LexError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self, bytes: usize) {
        let consumed = &self.input[self.position..self.position + bytes];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += bytes;
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        while let Some(ch) = self.peek_char() {
            let remaining = &self.input[self.position..];
            if ch.is_whitespace() {
                self.advance(ch.len_utf8());
            } else if ch == '%' {
                let end = remaining.find('\n').unwrap_or(remaining.len());
                self.advance(end);
            } else if remaining.starts_with("/*") {
                match remaining[2..].find("*/") {
                    Some(end) => self.advance(end + 4),
                    None => return Err(self.error("unterminated block comment".to_string())),
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn lex_word(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance(ch.len_utf8());
            } else {
                break;
            }
        }
        self.input[start..self.position].to_string()
    }

    fn digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.digits();
        let mut float = false;

        let rest = &self.input[self.position..];
        let mut chars = rest.chars();
        if chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
            float = true;
            self.advance(1);
            self.digits();
        }

        let rest = &self.input[self.position..];
        if rest.starts_with(['e', 'E']) {
            let after = &rest[1..];
            let sign = usize::from(after.starts_with(['+', '-']));
            if after[sign..].starts_with(|c: char| c.is_ascii_digit()) {
                float = true;
                self.advance(1 + sign);
                self.digits();
            }
        }

        let text = &self.input[start..self.position];
        if float {
            text.parse()
                .map(Token::Float)
                .map_err(|_| self.error(format!("invalid number: {}", text)))
        } else {
            text.parse()
                .map(Token::Int)
                .map_err(|_| self.error(format!("integer out of range: {}", text)))
        }
    }

    /// Quoted text; a backslash escapes the next character.
    fn lex_quoted(&mut self, quote: char) -> Result<String, LexError> {
        self.advance(1);
        let mut content = String::new();
        while let Some(ch) = self.peek_char() {
            self.advance(ch.len_utf8());
            match ch {
                '\\' => match self.peek_char() {
                    Some(escaped) if escaped != '\n' => {
                        self.advance(escaped.len_utf8());
                        content.push(escaped);
                    }
                    _ => break,
                },
                '\n' => break,
                c if c == quote => return Ok(content),
                c => content.push(c),
            }
        }
        Err(self.error("unterminated quoted text".to_string()))
    }
}

/// Lexer error.
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
