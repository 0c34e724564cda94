//! Fixed word lists shared by the lexer and the classifiers.
//!
//! Text classified against these tables is part of the public contract,
//! so entries are only ever added.

/// Library functions, matched case-insensitively.
pub const FUNCTION_NAMES: &[&str] = &[
    "Coalesce",
    "Concat",
    "Contains",
    "ElementAt",
    "EndsWith",
    "IndexOf",
    "IndexOfMatch",
    "Inspect",
    "IsDefined",
    "IsMatch",
    "LastIndexOf",
    "Length",
    "Now",
    "Rest",
    "Round",
    "StartsWith",
    "Substring",
    "TagOf",
    "ToLower",
    "ToString",
    "ToUpper",
    "TypeOf",
    "Undefined",
    "UtcDateTime",
];

/// Built-in property codes following `@`, longest first so that `@tr`
/// wins over `@t`.
pub const BUILTIN_CODES: &[&str] = &["tr", "mt", "sp", "t", "m", "l", "x", "p", "i", "r"];

#[must_use]
pub fn is_function_name(word: &str) -> bool {
    FUNCTION_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(word))
}

/// The built-in code at the start of `rest` (the text after `@`), if the
/// code is not immediately followed by another identifier character.
#[must_use]
pub fn builtin_code(rest: &str) -> Option<&'static str> {
    BUILTIN_CODES.iter().copied().find(|code| {
        rest.starts_with(code)
            && !rest[code.len()..]
                .chars()
                .next()
                .is_some_and(is_ident_char)
    })
}

#[must_use]
pub fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

#[must_use]
pub fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[must_use]
pub const fn is_arithmetic(ch: char) -> bool {
    matches!(ch, '+' | '-' | '*' | '/' | '%' | '^')
}
