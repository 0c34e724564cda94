use std::ops::Range;

/// Token kinds produced by the expression lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Property name or other bare word.
    Identifier,
    /// Single-quoted string (`'...'`), `''` escapes a quote.
    StringLiteral,
    /// Decimal or `0x` hexadecimal number, optionally negative.
    NumberLiteral,
    /// `true` or `false`.
    BooleanLiteral,
    /// `null`.
    NullLiteral,
    /// `=`, `==`, `<>`, `!=`, `<`, `<=`, `>`, `>=`.
    ComparisonOperator,
    /// `and`, `or`, `not`.
    BooleanOperator,
    /// `+`, `-`, `*`, `/`, `%`, `^`.
    ArithmeticOperator,
    /// `like`, `not like`.
    StringOperator,
    /// `in`, `not in`.
    MembershipOperator,
    /// `is null`, `is not null`.
    NullOperator,
    /// `ci`.
    CaseModifier,
    /// Library function name directly followed by `(`.
    Function,
    /// `if`, `then`, `else`, bare `is`.
    Keyword,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Dot,
    Colon,
    /// `{#if`.
    DirectiveIf,
    /// `{#else if`.
    DirectiveElseIf,
    /// `{#else`.
    DirectiveElse,
    /// `{#end`.
    DirectiveEnd,
    /// `{#each`.
    DirectiveEach,
    /// `{#delimit`.
    DirectiveDelimit,
    /// `@t`, `@m`, `@mt`, `@l`, `@x`, `@i`, `@p`, `@r`, `@tr`, `@sp`.
    BuiltinProperty,
    /// `..`.
    Spread,
    /// `?`, or `*` inside an indexer.
    Wildcard,
    /// Any character that cannot start a token.
    Unknown,
}

impl TokenKind {
    /// True for the six template directive markers.
    #[must_use]
    pub const fn is_directive(self) -> bool {
        matches!(
            self,
            Self::DirectiveIf
                | Self::DirectiveElseIf
                | Self::DirectiveElse
                | Self::DirectiveEnd
                | Self::DirectiveEach
                | Self::DirectiveDelimit
        )
    }

    /// True for kinds that can end an operand, after which a `-` is
    /// subtraction rather than a sign.
    #[must_use]
    pub const fn ends_operand(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::StringLiteral
                | Self::NumberLiteral
                | Self::BooleanLiteral
                | Self::NullLiteral
                | Self::BuiltinProperty
                | Self::CloseParen
                | Self::CloseBracket
        )
    }
}

/// A single token with its kind, decoded text, and offsets.
///
/// `length` always equals `text.len()`. For string literals containing
/// `''` escapes the raw source span is longer than the decoded text, so
/// `source_len` records the number of source bytes the token covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub length: usize,
    pub source_len: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: String, start: usize, source_len: usize) -> Self {
        Self {
            kind,
            length: text.len(),
            text,
            start,
            source_len,
        }
    }

    /// Byte range of the token in the text the lexer was given.
    #[must_use]
    pub const fn source_range(&self) -> Range<usize> {
        self.start..self.start + self.source_len
    }
}
