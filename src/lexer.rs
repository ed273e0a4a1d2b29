use crate::diagnostics::{Diagnostic, DiagnosticKind};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Single-char punctuation/operators
    Plus,
    Minus,
    Times,
    Divide,
    Lt,
    Gt,
    Assign,
    Semi,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Quote,
    Backslash,

    // Two-char operators
    Eq,
    NotEq,
    Lte,
    Gte,

    // Literals and identifiers
    Name,
    Integer,

    // Keywords
    Var,
    Print,
    If,
    Else,
    While,
    Func,
    Return,
    Break,
    And,
    Or,
    Not,
    True,
    False,
    IntType,
    FloatType,
    CharType,
    BoolType,
}

impl TokenKind {
    /// Human-readable form used in "Expected ..." diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Times => "`*`",
            TokenKind::Divide => "`/`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Assign => "`=`",
            TokenKind::Semi => "`;`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Quote => "`'`",
            TokenKind::Backslash => "`\\`",
            TokenKind::Eq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lte => "`<=`",
            TokenKind::Gte => "`>=`",
            TokenKind::Name => "a name",
            TokenKind::Integer => "an integer",
            TokenKind::Var => "`var`",
            TokenKind::Print => "`print`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::Func => "`func`",
            TokenKind::Return => "`return`",
            TokenKind::Break => "`break`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Not => "`not`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::IntType => "`int`",
            TokenKind::FloatType => "`float`",
            TokenKind::CharType => "`char`",
            TokenKind::BoolType => "`bool`",
        }
    }
}

/// A lexed token: kind, literal text, and its 1-based source position.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    source: &'a str,
    fname: &'a str,
}

/// Tokenize a whole source file. Fails only on a character the language has
/// no use for; everything else is deferred to the parser.
pub fn tokenize(source: &str, fname: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(source, fname).lex()
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, fname: &'a str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            source,
            fname,
        }
    }

    // Look at the current character without consuming it
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    // Look ahead n characters without consuming
    fn peek_n(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    // Consume the current character and advance the cursor by one
    fn consume(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn push(&mut self, tokens: &mut Vec<Token>, kind: TokenKind, text: &str) {
        tokens.push(Token {
            kind,
            text: text.to_string(),
            line: self.line,
            column: self.column,
        });
        for _ in 0..text.chars().count() {
            self.consume();
        }
    }

    pub fn lex(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens: Vec<Token> = Vec::new();

        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.consume();
                continue;
            }

            // Line comments
            if c == '/' && self.peek_n(1) == Some('/') {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.consume();
                }
                continue;
            }

            // Two-character operators before their one-character prefixes
            if c == '<' && self.peek_n(1) == Some('=') {
                self.push(&mut tokens, TokenKind::Lte, "<=");
                continue;
            }
            if c == '>' && self.peek_n(1) == Some('=') {
                self.push(&mut tokens, TokenKind::Gte, ">=");
                continue;
            }
            if c == '=' && self.peek_n(1) == Some('=') {
                self.push(&mut tokens, TokenKind::Eq, "==");
                continue;
            }
            if c == '!' && self.peek_n(1) == Some('=') {
                self.push(&mut tokens, TokenKind::NotEq, "!=");
                continue;
            }

            match c {
                '+' => self.push(&mut tokens, TokenKind::Plus, "+"),
                '-' => self.push(&mut tokens, TokenKind::Minus, "-"),
                '*' => self.push(&mut tokens, TokenKind::Times, "*"),
                '/' => self.push(&mut tokens, TokenKind::Divide, "/"),
                '<' => self.push(&mut tokens, TokenKind::Lt, "<"),
                '>' => self.push(&mut tokens, TokenKind::Gt, ">"),
                '=' => self.push(&mut tokens, TokenKind::Assign, "="),
                ';' => self.push(&mut tokens, TokenKind::Semi, ";"),
                '(' => self.push(&mut tokens, TokenKind::LParen, "("),
                ')' => self.push(&mut tokens, TokenKind::RParen, ")"),
                '{' => self.push(&mut tokens, TokenKind::LBrace, "{"),
                '}' => self.push(&mut tokens, TokenKind::RBrace, "}"),
                ',' => self.push(&mut tokens, TokenKind::Comma, ","),
                '.' => self.push(&mut tokens, TokenKind::Dot, "."),
                '\'' => self.push(&mut tokens, TokenKind::Quote, "'"),
                '\\' => self.push(&mut tokens, TokenKind::Backslash, "\\"),
                '0'..='9' => {
                    let text = self.scan_digits();
                    self.push(&mut tokens, TokenKind::Integer, &text);
                }
                _ if c.is_alphabetic() || c == '_' => {
                    let text = self.scan_word();
                    let kind = keyword_kind(&text).unwrap_or(TokenKind::Name);
                    self.push(&mut tokens, kind, &text);
                }
                _ => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::Syntax,
                        format!("Unexpected character `{}`.", c),
                        self.fname,
                        self.source,
                        self.line,
                        self.column,
                        self.column + 1,
                    ));
                }
            }
        }
        Ok(tokens)
    }

    fn scan_digits(&self) -> String {
        let mut text = String::new();
        let mut n = self.pos;
        while let Some(ch) = self.chars.get(n).copied() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            n += 1;
        }
        text
    }

    fn scan_word(&self) -> String {
        let mut text = String::new();
        let mut n = self.pos;
        while let Some(ch) = self.chars.get(n).copied() {
            if !ch.is_alphanumeric() && ch != '_' {
                break;
            }
            text.push(ch);
            n += 1;
        }
        text
    }
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "var" => TokenKind::Var,
        "print" => TokenKind::Print,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "func" => TokenKind::Func,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "int" => TokenKind::IntType,
        "float" => TokenKind::FloatType,
        "char" => TokenKind::CharType,
        "bool" => TokenKind::BoolType,
        _ => return None,
    };
    Some(kind)
}
