use log::debug;

use crate::config::Heuristics;
use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::vocabulary::{
    builtin_code, is_arithmetic, is_function_name, is_ident_char, is_ident_start,
};

/// Tokenize an expression into a lazy sequence of tokens.
///
/// Never fails: characters that cannot start a token come out as
/// one-character `Unknown` tokens, and unterminated string literals are
/// closed at the end of input or at a plausible boundary.
#[must_use]
pub const fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Single-pass expression lexer.
///
/// A tokenizer can be pooled and pointed at new text with
/// [`Tokenizer::reset`]; it is single-owner and holds no state that
/// outlives the text it was given.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    heuristics: Heuristics,
    last: Option<TokenKind>,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            heuristics: Heuristics {
                runaway_literal_limit: crate::config::DEFAULT_RUNAWAY_LITERAL_LIMIT,
                operator_window: crate::config::DEFAULT_OPERATOR_WINDOW,
            },
            last: None,
        }
    }

    #[must_use]
    pub const fn with_heuristics(input: &'a str, heuristics: Heuristics) -> Self {
        Self {
            cursor: Cursor::new(input),
            heuristics,
            last: None,
        }
    }

    /// Point the tokenizer at new text, keeping its heuristics.
    pub const fn reset(&mut self, input: &'a str) {
        self.cursor = Cursor::new(input);
        self.last = None;
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.cursor.skip_whitespace();
        let start = self.cursor.pos();
        let ch = self.cursor.peek()?;

        let token = match ch {
            '\'' => self.read_string(start),
            '0'..='9' => self.read_number(start),
            '-' if self.starts_negative_number() => self.read_number(start),
            '@' => self.read_at(start),
            '{' => self.read_open_brace(start),
            c if is_ident_start(c) => self.read_word(start),
            _ => self.read_symbol(start, ch),
        };

        self.last = Some(token.kind);
        Some(token)
    }

    fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        let text = self.cursor.slice(start, self.cursor.pos());
        Token::new(kind, text.to_string(), start, text.len())
    }

    fn starts_negative_number(&self) -> bool {
        self.cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit())
            && !self.last.is_some_and(TokenKind::ends_operand)
    }

    fn read_number(&mut self, start: usize) -> Token {
        if self.cursor.peek() == Some('-') {
            self.cursor.bump();
        }

        let is_hex = self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_at(1), Some('x' | 'X'))
            && self.cursor.peek_at(2).is_some_and(|c| c.is_ascii_hexdigit());

        if is_hex {
            self.cursor.bump();
            self.cursor.bump();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
        } else {
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '.');
        }

        self.make_token(TokenKind::NumberLiteral, start)
    }

    fn read_string(&mut self, start: usize) -> Token {
        self.cursor.bump(); // opening quote

        let mut value = String::from("'");
        let mut scanned = 0usize;

        while let Some(ch) = self.cursor.peek() {
            if ch == '\'' {
                self.cursor.bump();
                if self.cursor.peek() == Some('\'') {
                    // '' is an escaped quote
                    self.cursor.bump();
                    value.push('\'');
                    scanned += 2;
                    continue;
                }
                value.push('\'');
                break;
            }

            if is_arithmetic(ch)
                && scanned < self.heuristics.operator_window
                && value.ends_with('.')
            {
                debug!("closing string literal at {start} early on a trailing dot");
                break;
            }

            if scanned > self.heuristics.runaway_literal_limit && matches!(ch, ')' | ']' | '}') {
                debug!("closing runaway string literal at {start} before '{ch}'");
                break;
            }

            value.push(ch);
            self.cursor.bump();
            scanned += 1;
        }

        Token::new(TokenKind::StringLiteral, value, start, self.cursor.pos() - start)
    }

    fn read_at(&mut self, start: usize) -> Token {
        self.cursor.bump(); // skip @

        if let Some(code) = builtin_code(self.cursor.rest()) {
            self.cursor.set_pos(self.cursor.pos() + code.len());
            return self.make_token(TokenKind::BuiltinProperty, start);
        }

        if self.cursor.peek().is_some_and(is_ident_start) {
            // `@timestamp` and friends stay whole rather than splitting
            // into a built-in plus a tail.
            self.cursor.eat_while(is_ident_char);
            return self.make_token(TokenKind::Identifier, start);
        }

        self.make_token(TokenKind::Unknown, start)
    }

    fn read_open_brace(&mut self, start: usize) -> Token {
        self.cursor.bump(); // skip {

        if self.cursor.peek() != Some('#') {
            return self.make_token(TokenKind::OpenBrace, start);
        }

        self.cursor.bump(); // skip #
        let word_start = self.cursor.pos();
        self.cursor.eat_while(|c| !c.is_whitespace() && c != '}' && c != '{');
        let word = self.cursor.slice(word_start, self.cursor.pos());

        let kind = match word {
            "if" => TokenKind::DirectiveIf,
            "else" if self.match_following(&["if"]) => TokenKind::DirectiveElseIf,
            "else" => TokenKind::DirectiveElse,
            "end" => TokenKind::DirectiveEnd,
            "each" => TokenKind::DirectiveEach,
            "delimit" => TokenKind::DirectiveDelimit,
            _ => TokenKind::Unknown,
        };

        self.make_token(kind, start)
    }

    fn read_word(&mut self, start: usize) -> Token {
        self.cursor.eat_while(is_ident_char);
        let word = self.cursor.slice(start, self.cursor.pos());
        let lower = word.to_ascii_lowercase();

        let kind = match lower.as_str() {
            "and" | "or" => TokenKind::BooleanOperator,
            "not" if self.match_following(&["like"]) => TokenKind::StringOperator,
            "not" if self.match_following(&["in"]) => TokenKind::MembershipOperator,
            "not" => TokenKind::BooleanOperator,
            "like" => TokenKind::StringOperator,
            "in" => TokenKind::MembershipOperator,
            "is" if self.match_following(&["null"]) => TokenKind::NullOperator,
            "is" if self.match_following(&["not", "null"]) => TokenKind::NullOperator,
            "true" | "false" => TokenKind::BooleanLiteral,
            "null" => TokenKind::NullLiteral,
            "ci" => TokenKind::CaseModifier,
            "if" | "then" | "else" | "is" => TokenKind::Keyword,
            _ if is_function_name(word) && self.next_is_open_paren() => TokenKind::Function,
            _ => TokenKind::Identifier,
        };

        self.make_token(kind, start)
    }

    /// Consume the whitespace-separated `words` if they follow, otherwise
    /// leave the cursor where it was.
    fn match_following(&mut self, words: &[&str]) -> bool {
        let saved = self.cursor.pos();

        for expected in words {
            let before_ws = self.cursor.pos();
            self.cursor.skip_whitespace();
            if self.cursor.pos() == before_ws {
                self.cursor.set_pos(saved);
                return false;
            }

            let word_start = self.cursor.pos();
            self.cursor.eat_while(is_ident_char);
            let word = self.cursor.slice(word_start, self.cursor.pos());
            if !word.eq_ignore_ascii_case(expected) {
                self.cursor.set_pos(saved);
                return false;
            }
        }

        true
    }

    fn next_is_open_paren(&mut self) -> bool {
        let saved = self.cursor.pos();
        self.cursor.skip_whitespace();
        let found = self.cursor.peek() == Some('(');
        self.cursor.set_pos(saved);
        found
    }

    fn read_symbol(&mut self, start: usize, ch: char) -> Token {
        self.cursor.bump();

        let kind = match ch {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '}' => TokenKind::CloseBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' if self.eat('.') => TokenKind::Spread,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Wildcard,
            '*' if self.last == Some(TokenKind::OpenBracket) && self.cursor.peek() == Some(']') => {
                TokenKind::Wildcard
            }
            '+' | '-' | '*' | '/' | '%' | '^' => TokenKind::ArithmeticOperator,
            '=' => {
                self.eat('=');
                TokenKind::ComparisonOperator
            }
            '<' => {
                if !self.eat('=') {
                    self.eat('>');
                }
                TokenKind::ComparisonOperator
            }
            '>' => {
                self.eat('=');
                TokenKind::ComparisonOperator
            }
            '!' if self.eat('=') => TokenKind::ComparisonOperator,
            _ => TokenKind::Unknown,
        };

        self.make_token(kind, start)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.cursor.peek() == Some(expected) {
            self.cursor.bump();
            true
        } else {
            false
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}
