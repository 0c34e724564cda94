//! Expression classification.
//!
//! Two entry points share one category table:
//!
//! - [`parse_expression`] classifies a plain filter, computed-property, or
//!   conditional expression token by token.
//! - [`parse_expression_template`] walks an expression template, where
//!   literal text is interleaved with `{...}` holes and `{#if}`/`{#each}`
//!   directives, and re-tokenizes each embedded expression in place.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::config::Heuristics;
use crate::lexer::Tokenizer;
use crate::region::{Category, ClassifiedRegion, Regions};
use crate::token::TokenKind;
use crate::vocabulary::{builtin_code, is_ident_char};

/// Classify a plain expression with default heuristics.
#[must_use]
pub fn parse_expression(expr: &str) -> Vec<ClassifiedRegion> {
    ExpressionParser::new().parse(expr)
}

/// Classify an expression template with default heuristics.
#[must_use]
pub fn parse_expression_template(text: &str) -> Vec<ClassifiedRegion> {
    ExpressionParser::new().parse_template(text)
}

/// Highlight category for a token kind. Parentheses, braces, commas,
/// dots, colons, and unknown characters are left unclassified.
#[must_use]
pub const fn category_for(kind: TokenKind) -> Option<Category> {
    match kind {
        TokenKind::Identifier => Some(Category::ExpressionProperty),
        TokenKind::StringLiteral
        | TokenKind::NumberLiteral
        | TokenKind::BooleanLiteral
        | TokenKind::NullLiteral => Some(Category::ExpressionLiteral),
        TokenKind::ComparisonOperator
        | TokenKind::BooleanOperator
        | TokenKind::ArithmeticOperator
        | TokenKind::StringOperator
        | TokenKind::MembershipOperator
        | TokenKind::NullOperator
        | TokenKind::OpenBracket
        | TokenKind::CloseBracket
        | TokenKind::Spread
        | TokenKind::Wildcard => Some(Category::ExpressionOperator),
        TokenKind::CaseModifier | TokenKind::Keyword => Some(Category::ExpressionKeyword),
        TokenKind::Function => Some(Category::ExpressionFunction),
        TokenKind::BuiltinProperty => Some(Category::ExpressionBuiltin),
        TokenKind::DirectiveIf
        | TokenKind::DirectiveElseIf
        | TokenKind::DirectiveElse
        | TokenKind::DirectiveEnd
        | TokenKind::DirectiveEach
        | TokenKind::DirectiveDelimit => Some(Category::ExpressionDirective),
        TokenKind::OpenParen
        | TokenKind::CloseParen
        | TokenKind::OpenBrace
        | TokenKind::CloseBrace
        | TokenKind::Comma
        | TokenKind::Dot
        | TokenKind::Colon
        | TokenKind::Unknown => None,
    }
}

/// Expression classifier carrying the lexer heuristics it tokenizes with.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionParser {
    heuristics: Heuristics,
}

impl ExpressionParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_heuristics(heuristics: Heuristics) -> Self {
        Self { heuristics }
    }

    /// Classify every token of a plain expression.
    #[must_use]
    pub fn parse(&self, expr: &str) -> Vec<ClassifiedRegion> {
        let mut regions = Regions::default();
        push_tokens(&mut regions, self.heuristics, 0, expr);
        regions.into_vec()
    }

    /// Classify an expression template: holes, directives, and the
    /// expressions embedded in them.
    #[must_use]
    pub fn parse_template(&self, text: &str) -> Vec<ClassifiedRegion> {
        TemplateScan::new(text, self.heuristics).run()
    }
}

/// Tokenize `text` and push a region for every classified token, offset
/// by `offset`.
fn push_tokens(regions: &mut Regions, heuristics: Heuristics, offset: usize, text: &str) {
    for token in Tokenizer::with_heuristics(text, heuristics) {
        if let Some(category) = category_for(token.kind) {
            let source = text.get(token.source_range()).unwrap_or_default();
            regions.push(category, offset + token.start, source);
        }
    }
}

struct TemplateScan<'a> {
    input: &'a str,
    pos: usize,
    heuristics: Heuristics,
    regions: Regions,
    loop_vars: HashSet<String>,
    /// Outcome of every nested `{...}` group matched so far, by the offset
    /// of its `{`.
    nested_ends: HashMap<usize, Option<usize>>,
}

impl<'a> TemplateScan<'a> {
    fn new(input: &'a str, heuristics: Heuristics) -> Self {
        Self {
            input,
            pos: 0,
            heuristics,
            regions: Regions::default(),
            loop_vars: HashSet::new(),
            nested_ends: HashMap::new(),
        }
    }

    fn run(mut self) -> Vec<ClassifiedRegion> {
        let bytes = self.input.as_bytes();

        while let Some(&b) = bytes.get(self.pos) {
            let doubled = bytes.get(self.pos + 1) == Some(&b);
            match b {
                b'{' | b'}' if doubled => self.pos += 2,
                b'{' => self.read_segment(),
                _ => self.pos += 1,
            }
        }

        self.regions.into_vec()
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or_default()
    }

    fn read_segment(&mut self) {
        let open = self.pos;

        if self.try_simple_directive(open) {
            return;
        }

        let Some(close) = self.find_segment_end(open) else {
            trace!("no closing brace for template segment at {open}, skipping");
            self.pos = open + 1;
            return;
        };

        if self.slice(open + 1, close).trim().is_empty() {
            self.pos = close + 1;
            return;
        }

        self.regions.push(Category::PropertyBrace, open, "{");
        self.classify_segment(open + 1, close);
        let terminator = self.slice(close, close + 1);
        self.regions.push(Category::PropertyBrace, close, terminator);
        self.pos = close + 1;
    }

    /// `{#end` and `{#else` followed by a space (or the end of input)
    /// stand on their own while the closing brace is still being typed.
    fn try_simple_directive(&mut self, open: usize) -> bool {
        let rest = self.slice(open + 1, self.input.len());
        let keyword = if rest.starts_with("#end") {
            "#end"
        } else if rest.starts_with("#else") && else_if_len(&rest[5..]).is_none() {
            "#else"
        } else {
            return false;
        };

        let after = open + 1 + keyword.len();
        let tail = self.slice(after, self.input.len());
        match tail.chars().next() {
            None => {}
            Some(' ') if !tail.trim_start_matches(' ').starts_with('}') => {}
            _ => return false,
        }

        debug!("treating {keyword} at {open} as a directive without closing brace");
        self.regions.push(Category::PropertyBrace, open, "{");
        self.regions.push(Category::ExpressionDirective, open + 1, keyword);
        if keyword == "#end" {
            self.loop_vars.clear();
        }
        self.pos = after;
        true
    }

    /// Offset of the brace (or stray `]`) ending the segment opened at
    /// `open`, if it closes at all.
    ///
    /// Quotes and brackets are honoured until a top-level `:` starts a
    /// format specifier; from there only `}` or a mistyped `]` can end the
    /// segment, and a `{` means it was never closed. Nested `{...}` groups
    /// are matched once and their outcome remembered, so no group is
    /// scanned twice however many segments contain it.
    fn find_segment_end(&mut self, open: usize) -> Option<usize> {
        let input = self.input;
        let bytes = input.as_bytes();
        let is_directive = self.slice(open + 1, input.len()).trim_start().starts_with('#');
        let mut stack = vec![Frame::new(open, !is_directive)];
        let mut i = open + 1;

        while let Some(&b) = bytes.get(i) {
            let Some(frame) = stack.last_mut() else {
                break;
            };

            if frame.in_format {
                match b {
                    b'}' => return Some(i),
                    b']' => {
                        debug!("format specifier closed by ']' at {i}");
                        return Some(i);
                    }
                    b'{' => return None,
                    _ => {}
                }
            } else if frame.in_string {
                if b == b'\'' {
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 1;
                    } else {
                        frame.in_string = false;
                    }
                }
            } else {
                match b {
                    b'\'' => frame.in_string = true,
                    b'(' | b'[' => frame.depth += 1,
                    b')' | b']' => frame.depth = frame.depth.saturating_sub(1),
                    b':' if frame.depth == 0 && frame.allow_format => frame.in_format = true,
                    b'{' => match self.nested_ends.get(&i) {
                        Some(&Some(end)) => i = end,
                        Some(&None) => return self.abandon(&stack),
                        None => stack.push(Frame::new(i, false)),
                    },
                    b'}' => {
                        if stack.len() == 1 {
                            return Some(i);
                        }
                        if let Some(closed) = stack.pop() {
                            self.nested_ends.insert(closed.open, Some(i));
                        }
                    }
                    _ => {}
                }
            }
            i += 1;
        }

        self.abandon(&stack)
    }

    /// Record every nested group still open as never closed.
    fn abandon(&mut self, stack: &[Frame]) -> Option<usize> {
        for frame in stack.iter().skip(1) {
            self.nested_ends.insert(frame.open, None);
        }
        trace!("{} open groups never close", stack.len());
        None
    }

    fn classify_segment(&mut self, start: usize, end: usize) {
        let content = self.slice(start, end);
        let body = content.trim();
        if body.is_empty() {
            return;
        }
        let offset = start + (content.len() - content.trim_start().len());

        if body.starts_with('#') {
            self.classify_directive(offset, body);
        } else if !self.classify_builtin_indexer(offset, body) {
            self.classify_hole(offset, body);
        }
    }

    fn classify_directive(&mut self, offset: usize, body: &str) {
        let word_end = body[1..]
            .find(|c: char| !is_ident_char(c))
            .map_or(body.len(), |i| i + 1);

        match &body[1..word_end] {
            "if" => {
                self.regions.push(Category::ExpressionDirective, offset, &body[..word_end]);
                self.push_tokens(offset + word_end, &body[word_end..]);
            }
            "else" => match else_if_len(&body[word_end..]) {
                Some(len) => {
                    let marker_end = word_end + len;
                    self.regions.push(Category::ExpressionDirective, offset, &body[..marker_end]);
                    self.push_tokens(offset + marker_end, &body[marker_end..]);
                }
                None => {
                    self.regions.push(Category::ExpressionDirective, offset, &body[..word_end]);
                }
            },
            "end" => {
                self.regions.push(Category::ExpressionDirective, offset, &body[..word_end]);
                self.loop_vars.clear();
            }
            "delimit" => {
                self.regions.push(Category::ExpressionDirective, offset, &body[..word_end]);
            }
            "each" => {
                self.regions.push(Category::ExpressionDirective, offset, &body[..word_end]);
                self.classify_each(offset + word_end, &body[word_end..]);
            }
            other => trace!("ignoring unknown directive #{other} at {offset}"),
        }
    }

    /// `#each name[, index] in collection`: the names before `in` become
    /// loop variables until the next `#end`.
    fn classify_each(&mut self, offset: usize, text: &str) {
        let mut seen_in = false;

        for token in Tokenizer::with_heuristics(text, self.heuristics) {
            let source = text.get(token.source_range()).unwrap_or_default();
            let start = offset + token.start;

            if !seen_in {
                match token.kind {
                    TokenKind::Identifier => {
                        self.loop_vars.insert(token.text.clone());
                        self.regions.push(Category::ExpressionProperty, start, source);
                        continue;
                    }
                    TokenKind::MembershipOperator if token.text.eq_ignore_ascii_case("in") => {
                        seen_in = true;
                        self.regions.push(Category::ExpressionKeyword, start, source);
                        continue;
                    }
                    _ => {}
                }
            }

            if let Some(category) = category_for(token.kind) {
                self.regions.push(category, start, source);
            }
        }
    }

    /// `@p['key']` and `@p["key"]` split into built-in, brackets, and key.
    fn classify_builtin_indexer(&mut self, offset: usize, body: &str) -> bool {
        let Some(rest) = body.strip_prefix('@') else {
            return false;
        };
        let Some(code) = builtin_code(rest) else {
            return false;
        };

        let open_bracket = 1 + code.len();
        let quote_pos = open_bracket + 1;
        let bytes = body.as_bytes();
        if bytes.get(open_bracket) != Some(&b'[') {
            return false;
        }
        let quote = match bytes.get(quote_pos) {
            Some(&q) if q == b'\'' || q == b'"' => q,
            _ => return false,
        };
        let Some(close_quote) = bytes[quote_pos + 1..]
            .iter()
            .position(|&b| b == quote)
            .map(|i| quote_pos + 1 + i)
        else {
            return false;
        };
        let close_bracket = close_quote + 1;
        if bytes.get(close_bracket) != Some(&b']') {
            return false;
        }

        self.regions.push(Category::ExpressionBuiltin, offset, &body[..open_bracket]);
        self.regions.push(Category::ExpressionOperator, offset + open_bracket, "[");
        self.regions.push(
            Category::ExpressionLiteral,
            offset + quote_pos,
            &body[quote_pos..=close_quote],
        );
        self.regions.push(Category::ExpressionOperator, offset + close_bracket, "]");

        let tail_start = close_bracket + 1;
        let tail = &body[tail_start..];
        if let Some(format) = tail.strip_prefix(':') {
            self.regions.push(Category::FormatSpecifier, offset + tail_start + 1, format);
        } else {
            self.push_tokens(offset + tail_start, tail);
        }
        true
    }

    fn classify_hole(&mut self, offset: usize, body: &str) {
        let (expr, format) = match top_level_colon(body) {
            Some(colon) => (&body[..colon], Some((colon + 1, &body[colon + 1..]))),
            None => (body, None),
        };

        let expr_text = expr.trim_end();
        let mut tokens = Tokenizer::with_heuristics(expr_text, self.heuristics);
        let single = tokens.next().filter(|_| tokens.next().is_none());

        match single {
            Some(token) if token.kind == TokenKind::Identifier && !token.text.starts_with('@') => {
                let category = if self.loop_vars.contains(&token.text) {
                    Category::ExpressionProperty
                } else {
                    Category::PropertyName
                };
                self.regions.push(category, offset + token.start, &token.text);
            }
            _ => self.push_tokens(offset, expr_text),
        }

        if let Some((format_start, format)) = format {
            self.regions.push(Category::FormatSpecifier, offset + format_start, format);
        }
    }

    fn push_tokens(&mut self, offset: usize, text: &str) {
        push_tokens(&mut self.regions, self.heuristics, offset, text);
    }
}

/// Length of a leading `<whitespace>if` word in `tail`, as in `#else if`.
fn else_if_len(tail: &str) -> Option<usize> {
    let trimmed = tail.trim_start();
    let ws = tail.len() - trimmed.len();
    let is_if = ws > 0
        && trimmed.starts_with("if")
        && !trimmed[2..].chars().next().is_some_and(is_ident_char);
    is_if.then_some(ws + 2)
}

/// A `{` whose closing brace is still being looked for.
#[derive(Debug)]
struct Frame {
    open: usize,
    allow_format: bool,
    depth: usize,
    in_string: bool,
    in_format: bool,
}

impl Frame {
    const fn new(open: usize, allow_format: bool) -> Self {
        Self {
            open,
            allow_format,
            depth: 0,
            in_string: false,
            in_format: false,
        }
    }
}

/// First `:` outside strings, brackets, and parentheses.
fn top_level_colon(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'\'' => in_string = !in_string,
            _ if in_string => {}
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => return Some(i),
            _ => {}
        }
    }

    None
}
