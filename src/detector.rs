//! Call-site detection for expression strings.
//!
//! Given one line of source and a cursor offset, decide whether the cursor
//! sits inside a string passed to one of the expression APIs, and which
//! kind of expression that string holds.

use std::sync::LazyLock;

use regex::Regex;

/// Which grammar applies to the string under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpressionContext {
    /// Not an expression: treat as a plain message template.
    #[default]
    None,
    /// `Filter.ByExcluding("...")`, `Filter.ByIncludingOnly("...")`.
    FilterExpression,
    /// `new ExpressionTemplate("...")`.
    ExpressionTemplate,
    /// `Enrich.WithComputed("Name", "...")`.
    ComputedProperty,
    /// `WriteTo.Conditional("...", ...)`, `Enrich.When("...", ...)`.
    ConditionalExpression,
}

impl ExpressionContext {
    #[must_use]
    pub const fn is_expression(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Call-site patterns, each ending at the opening quote of the string the
/// context applies to. `@` and `$` prefixes and raw `"""` strings are
/// accepted.
static CALL_SITES: LazyLock<Vec<(ExpressionContext, Regex)>> = LazyLock::new(|| {
    [
        (
            ExpressionContext::FilterExpression,
            r#"Filter\s*\.\s*By(?:Excluding|IncludingOnly)\s*\(\s*[@$]*"+"#,
        ),
        (
            ExpressionContext::ExpressionTemplate,
            r#"\bExpressionTemplate\s*\(\s*[@$]*"+"#,
        ),
        (
            ExpressionContext::ComputedProperty,
            r#"\bWithComputed\s*\(\s*[@$]*"[^"]*"\s*,\s*[@$]*"+"#,
        ),
        (
            ExpressionContext::ConditionalExpression,
            r#"\.\s*(?:Conditional|When)\s*\(\s*[@$]*"+"#,
        ),
    ]
    .into_iter()
    .map(|(context, pattern)| {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|_| unreachable!("call-site patterns are constants"));
        (context, regex)
    })
    .collect()
});

/// Classify the string under `position` (a byte offset into `line`).
///
/// The context of the nearest call site whose opening quote is at or
/// before `position` wins. Pure: identical input always yields the same
/// answer, so results may be cached by `(line, position)`.
#[must_use]
pub fn get_context(line: &str, position: usize) -> ExpressionContext {
    let mut best: Option<(usize, ExpressionContext)> = None;

    for (context, regex) in CALL_SITES.iter() {
        for found in regex.find_iter(line) {
            let quote = found.end() - 1;
            if position >= quote && best.is_none_or(|(nearest, _)| quote > nearest) {
                best = Some((quote, *context));
            }
        }
    }

    best.map_or(ExpressionContext::None, |(_, context)| context)
}
