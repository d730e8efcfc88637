//! Manifest tokenizer.

use std::fmt;

use super::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TokenKind {
    Ident(String),
    Str(String),
    Symbol(String),
    /// Ruby 1.9 style hash key (`display_name:`).
    Label(String),
    Number(String),
    Rocket,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Newline,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier `{}`", name),
            TokenKind::Str(_) => write!(f, "string"),
            TokenKind::Symbol(name) => write!(f, "symbol `:{}`", name),
            TokenKind::Label(name) => write!(f, "label `{}:`", name),
            TokenKind::Number(n) => write!(f, "number `{}`", n),
            TokenKind::Rocket => write!(f, "`=>`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Dot => write!(f, "`.`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::LBracket => write!(f, "`[`"),
            TokenKind::RBracket => write!(f, "`]`"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

pub(super) struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. The result always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia();

        let (line, column) = (self.line, self.column);
        let token = |kind| Token { kind, line, column };

        let Some(c) = self.bump() else {
            return Ok(token(TokenKind::Eof));
        };

        let kind = match c {
            '\n' => TokenKind::Newline,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '=' if self.peek() == Some('>') => {
                self.bump();
                TokenKind::Rocket
            }
            '"' | '\'' => TokenKind::Str(self.string(c, line, column)?),
            ':' => match self.peek() {
                Some(q @ ('"' | '\'')) => {
                    self.bump();
                    TokenKind::Symbol(self.string(q, line, column)?)
                }
                Some(n) if is_ident_start(n) => TokenKind::Symbol(self.ident_tail(String::new())),
                _ => return Err(ParseError::UnexpectedChar { ch: c, line, column }),
            },
            c if is_ident_start(c) => {
                let name = self.ident_tail(c.to_string());
                if self.peek() == Some(':') && self.label_follows() {
                    self.bump();
                    TokenKind::Label(name)
                } else {
                    TokenKind::Ident(name)
                }
            }
            c if c.is_ascii_digit() || (c == '-' && self.peek().is_some_and(|n| n.is_ascii_digit())) => {
                TokenKind::Number(self.number(c))
            }
            other => {
                return Err(ParseError::UnexpectedChar {
                    ch: other,
                    line,
                    column,
                })
            }
        };

        Ok(token(kind))
    }

    /// Skip spaces, comments and escaped line breaks. Plain newlines are
    /// significant and left in place.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.bump();
                }
                Some('#') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('\\') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    let next = ahead.find(|c| *c != '\r');
                    if next == Some('\n') {
                        while self.peek() != Some('\n') {
                            self.bump();
                        }
                        self.bump();
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// `name:` is a label unless the colon starts `::`.
    fn label_follows(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next() != Some(':')
    }

    fn ident_tail(&mut self, mut name: String) -> String {
        while let Some(c) = self.peek().filter(|c| is_ident_continue(*c)) {
            name.push(c);
            self.bump();
        }
        // Predicate and bang method names.
        if let Some(c @ ('?' | '!')) = self.peek() {
            name.push(c);
            self.bump();
        }
        name
    }

    fn number(&mut self, first: char) -> String {
        let mut text = first.to_string();
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '_')
        {
            text.push(c);
            self.bump();
        }
        text
    }

    fn string(&mut self, quote: char, line: usize, column: usize) -> Result<String, ParseError> {
        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::UnterminatedString { line, column });
            };
            match c {
                c if c == quote => return Ok(value),
                '\\' => {
                    let Some(escaped) = self.bump() else {
                        return Err(ParseError::UnterminatedString { line, column });
                    };
                    if quote == '\'' {
                        // Single quotes only escape the quote and the backslash.
                        if escaped != '\'' && escaped != '\\' {
                            value.push('\\');
                        }
                        value.push(escaped);
                    } else {
                        match escaped {
                            'n' => value.push('\n'),
                            't' => value.push('\t'),
                            'r' => value.push('\r'),
                            '0' => value.push('\0'),
                            other => value.push(other),
                        }
                    }
                }
                c => value.push(c),
            }
        }
    }
}
