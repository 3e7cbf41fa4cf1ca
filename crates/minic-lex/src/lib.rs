//! minic-lex - Lexical Analyzer
//!
//! ================================================================
//! LEXICAL ANALYSIS THEORY
//! ================================================================
//!
//! FORMAL DEFINITION:
//!
//! Given an alphabet Σ (here, 7-bit ASCII) and the set of strings over it
//! Σ*, a lexer is a function L: Σ* → T*, mapping a source string to a
//! sequence of tokens. Each token is a (kind, lexeme, position) triple;
//! `minic-lex` drops the lexeme once it has been classified, keeping only
//! the [`TokenKind`] (which already carries the decoded value, for numbers
//! and identifiers) and the starting [`Pos`](minic_util::Pos).
//!
//! PROPERTIES:
//!
//! - Maximal munch: at each position, the longest valid lexeme is taken.
//!   `<=` lexes as one token, never `<` followed by `=`.
//! - Single pass, no backtracking: the scanner never re-reads a byte once
//!   consumed, so lexing is O(n) in source length.
//! - Total: every input either lexes to completion (ending in `Eof`) or
//!   fails with a [`CompileError::Lexer`] at the first byte that cannot
//!   start any token.
//!
//! LEXEME vs TOKEN:
//!
//! The lexeme is the raw slice of source text; the token is what the
//! lexeme means. `while` and `x` are both identifier-shaped lexemes, but
//! `TokenKind::keyword` reclassifies the former to `TokenKind::While`,
//! leaving only non-keyword lexemes as `TokenKind::Ident`.
//!
//! Turns a MiniC source string into a flat token stream terminated by
//! `TokenKind::Eof`. The scanner is a direct-coded, single-pass reader over
//! the byte string: no regex, no table-driven state machine, just a
//! `match` on the current character that advances by however much it
//! consumed.
//!
//! Only 7-bit ASCII is meaningful; any other byte is a lex error, since
//! MiniC has no string or character literals that would need to carry
//! arbitrary text through the pipeline.

use minic_util::{CompileError, CompileResult, Interner, Pos, Symbol};

/// A lexical token: its kind plus the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

/// The closed set of token kinds MiniC recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Int,
    Bool,
    If,
    Else,
    While,
    Print,
    True,
    False,

    // Identifier and literal
    Ident(Symbol),
    Number(i64),

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Relational
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,

    // Logical
    AndAnd,
    OrOr,
    Bang,

    // Assignment
    Assign,

    // Delimiters
    Semi,
    LParen,
    RParen,
    LBrace,
    RBrace,

    Eof,
}

impl TokenKind {
    /// Reclassify an identifier lexeme as a keyword kind, if it is one.
    fn keyword(lexeme: &str) -> Option<TokenKind> {
        Some(match lexeme {
            "int" => TokenKind::Int,
            "bool" => TokenKind::Bool,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "print" => TokenKind::Print,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        })
    }
}

/// Lex `source` into a token vector ending in a single `Eof`, interning
/// identifiers into `interner` as they are encountered.
///
/// Fails with `CompileError::Lexer` on the first character that cannot
/// start any token.
pub fn lex(source: &str, interner: &mut Interner) -> CompileResult<Vec<Token>> {
    Lexer::new(source).tokenize(interner)
}

struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, col: 1 }
    }

    fn tokenize(mut self, interner: &mut Interner) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token(interner)?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self, interner: &mut Interner) -> CompileResult<Token> {
        self.skip_trivia()?;

        let start_pos = self.here();

        let Some(c) = self.current() else {
            return Ok(Token::new(TokenKind::Eof, start_pos));
        };

        if !c.is_ascii() {
            return Err(CompileError::lexer(start_pos, "non-ASCII byte in source"));
        }

        let kind = match c {
            '+' => self.one(TokenKind::Plus),
            '-' => self.one(TokenKind::Minus),
            '*' => self.one(TokenKind::Star),
            '/' => self.one(TokenKind::Slash),
            '%' => self.one(TokenKind::Percent),
            ';' => self.one(TokenKind::Semi),
            '(' => self.one(TokenKind::LParen),
            ')' => self.one(TokenKind::RParen),
            '{' => self.one(TokenKind::LBrace),
            '}' => self.one(TokenKind::RBrace),

            '<' => self.one_or_two('=', TokenKind::Lt, TokenKind::Le),
            '>' => self.one_or_two('=', TokenKind::Gt, TokenKind::Ge),
            '=' => self.one_or_two('=', TokenKind::Assign, TokenKind::EqEq),
            '!' => self.one_or_two('=', TokenKind::Bang, TokenKind::NotEq),

            '&' => self.two('&', TokenKind::AndAnd, start_pos)?,
            '|' => self.two('|', TokenKind::OrOr, start_pos)?,

            c if c.is_ascii_digit() => self.number(start_pos)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.ident_or_keyword(interner),

            c => {
                return Err(CompileError::lexer(
                    start_pos,
                    format!("unexpected character '{c}'"),
                ))
            }
        };

        Ok(Token::new(kind, start_pos))
    }

    /// Skip whitespace, line comments, and block comments until real
    /// source text (or EOF) is reached.
    fn skip_trivia(&mut self) -> CompileResult<()> {
        loop {
            match self.current() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while self.current().is_some() && self.current() != Some('\n') {
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.here();
                    self.advance();
                    self.advance();
                    loop {
                        match (self.current(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => self.advance(),
                            (None, _) => {
                                return Err(CompileError::lexer(
                                    start,
                                    "unterminated block comment",
                                ))
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn number(&mut self, start_pos: Pos) -> CompileResult<TokenKind> {
        let start = self.pos;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).expect("ascii digits");
        let value: i64 = text
            .parse()
            .map_err(|_| CompileError::lexer(start_pos, format!("integer literal '{text}' out of range")))?;
        Ok(TokenKind::Number(value))
    }

    fn ident_or_keyword(&mut self, interner: &mut Interner) -> TokenKind {
        let start = self.pos;
        while self.current().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).expect("ascii ident");
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(interner.intern(text)))
    }

    fn one(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn one_or_two(&mut self, second: char, one: TokenKind, two: TokenKind) -> TokenKind {
        self.advance();
        if self.current() == Some(second) {
            self.advance();
            two
        } else {
            one
        }
    }

    /// Consumes a strictly two-character operator (`&&`, `||`); the first
    /// character alone is not a valid MiniC token.
    fn two(&mut self, second: char, kind: TokenKind, start_pos: Pos) -> CompileResult<TokenKind> {
        let first = self.current().unwrap();
        self.advance();
        if self.current() == Some(second) {
            self.advance();
            Ok(kind)
        } else {
            Err(CompileError::lexer(start_pos, format!("unexpected character '{first}'")))
        }
    }

    fn here(&self) -> Pos {
        Pos::new(self.line, self.col)
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).map(|&b| b as char)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset).map(|&b| b as char)
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        lex(src, &mut interner).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_are_reclassified_from_identifiers() {
        assert_eq!(
            kinds("int bool if else while print true false"),
            vec![
                TokenKind::Int,
                TokenKind::Bool,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Print,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn two_char_operators_take_priority_over_one_char_prefixes() {
        assert_eq!(
            kinds("<= >= == != && ||"),
            vec![
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("< > = !"), vec![TokenKind::Lt, TokenKind::Gt, TokenKind::Assign, TokenKind::Bang, TokenKind::Eof]);
    }

    #[test]
    fn line_and_block_comments_are_discarded() {
        assert_eq!(kinds("// hello\nint"), vec![TokenKind::Int, TokenKind::Eof]);
        assert_eq!(kinds("/* a\nb */ int"), vec![TokenKind::Int, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_block_comment_is_a_lexer_error() {
        let mut interner = Interner::new();
        let err = lex("/* never closes", &mut interner).unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    #[test]
    fn single_ampersand_is_an_error() {
        let mut interner = Interner::new();
        let err = lex("&", &mut interner).unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    #[test]
    fn line_and_column_tracking_advances_on_newline() {
        let mut interner = Interner::new();
        let tokens = lex("int\nx", &mut interner).unwrap();
        assert_eq!(tokens[0].pos, Pos::new(1, 1));
        assert_eq!(tokens[1].pos, Pos::new(2, 1));
    }

    #[test]
    fn same_identifier_text_interns_to_the_same_symbol() {
        let mut interner = Interner::new();
        let tokens = lex("x x y", &mut interner).unwrap();
        let TokenKind::Ident(sx1) = tokens[0].kind else { panic!() };
        let TokenKind::Ident(sx2) = tokens[1].kind else { panic!() };
        let TokenKind::Ident(sy) = tokens[2].kind else { panic!() };
        assert_eq!(sx1, sx2);
        assert_ne!(sx1, sy);
    }

    #[test]
    fn number_literal_parses_value() {
        assert_eq!(kinds("42"), vec![TokenKind::Number(42), TokenKind::Eof]);
    }

    #[test]
    fn number_literal_wider_than_i64_is_a_lexer_error() {
        let mut interner = Interner::new();
        let err = lex("99999999999999999999999999999", &mut interner).unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    proptest::proptest! {
        #[test]
        fn never_panics_on_arbitrary_ascii(s in "[ -~\\n\\t]{0,64}") {
            let mut interner = Interner::new();
            let _ = lex(&s, &mut interner);
        }
    }
}
