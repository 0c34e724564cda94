//! Syntax classification for structured-logging message templates and the
//! filter/template expression language built on top of them.
//!
//! Every entry point is pure and total: any input, however malformed,
//! yields a (possibly empty) list of classified regions with byte offsets
//! into the input. Editors use these to drive highlighting, brace
//! matching, and navigation while the user is still typing.
//!
//! # Quick start
//!
//! ## Message templates
//!
//! ```
//! use message_template_syntax::{Category, PropertyKind, classify_template, parse_template};
//!
//! let properties: Vec<_> = parse_template("Hello {@User}, you have {Count,5} items").collect();
//! assert_eq!(properties[0].name, "User");
//! assert_eq!(properties[0].kind, PropertyKind::Destructured);
//! assert_eq!(properties[1].alignment.as_ref().map(|a| a.value.as_str()), Some("5"));
//!
//! let regions = classify_template("Hi {Name}");
//! assert_eq!(regions[1].category, Category::PropertyName);
//! assert_eq!((regions[1].start, regions[1].length), (4, 4));
//! ```
//!
//! ## Expressions
//!
//! ```
//! use message_template_syntax::{Category, ExpressionContext, classify, get_context};
//!
//! let line = r#".Filter.ByExcluding("RequestPath like '/health%'")"#;
//! let context = get_context(line, 21);
//! assert_eq!(context, ExpressionContext::FilterExpression);
//!
//! let regions = classify(context, "RequestPath like '/health%'");
//! let categories: Vec<_> = regions.iter().map(|r| r.category).collect();
//! assert_eq!(
//!     categories,
//!     [
//!         Category::ExpressionProperty,
//!         Category::ExpressionOperator,
//!         Category::ExpressionLiteral,
//!     ]
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

mod cursor;

pub mod cache;
pub mod config;
pub mod detector;
pub mod lexer;
pub mod parser;
pub mod region;
pub mod template;
pub mod token;
pub mod vocabulary;

pub use cache::{DetectorCache, LruCache, TemplateCache};
pub use config::{ConfigError, Heuristics};
pub use detector::{ExpressionContext, get_context};
pub use lexer::{Tokenizer, tokenize};
pub use parser::{ExpressionParser, category_for, parse_expression, parse_expression_template};
pub use region::{Category, ClassifiedRegion};
pub use template::{
    PropertyKind, PropertyPart, TemplateProperties, TemplateProperty, classify_template,
    parse_template,
};
pub use token::{Token, TokenKind};

/// Classify `text` with the grammar `context` selects.
///
/// Filters, computed properties, and conditions are flat expressions;
/// expression templates mix literal text with holes and directives;
/// anything else is an ordinary message template.
#[must_use]
pub fn classify(context: ExpressionContext, text: &str) -> Vec<ClassifiedRegion> {
    match context {
        ExpressionContext::FilterExpression
        | ExpressionContext::ComputedProperty
        | ExpressionContext::ConditionalExpression => parse_expression(text),
        ExpressionContext::ExpressionTemplate => parse_expression_template(text),
        ExpressionContext::None => classify_template(text),
    }
}
