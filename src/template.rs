//! Message-template property extraction.
//!
//! A message template is literal text with `{...}` placeholders:
//!
//! ```text
//! User {UserId} bought {@Order} for {Price,10:C2} ({0})
//! ```
//!
//! [`parse_template`] walks the text with a small state machine and yields
//! one [`TemplateProperty`] per well-formed placeholder, as soon as its
//! closing brace is seen. Malformed placeholders are skipped and the scan
//! resynchronizes at the next brace; nothing is ever reported for a
//! placeholder that is still open at the end of the input.

use std::ops::Range;

use log::trace;

use crate::cursor::Cursor;
use crate::region::{Category, ClassifiedRegion, Regions};

/// How a property's value is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// `{Name}`.
    Standard,
    /// `{@Name}`: the value is destructured.
    Destructured,
    /// `{$Name}`: the value is stringified.
    Stringified,
    /// `{0}`: the name is an argument index.
    Positional,
}

/// An alignment or format specifier and its offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPart {
    pub value: String,
    pub start: usize,
}

/// One placeholder found in a message template.
///
/// All offsets are byte offsets into the parsed text. `brace_start` and
/// `brace_end` index the `{` and `}` delimiters themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateProperty {
    pub name: String,
    pub kind: PropertyKind,
    pub brace_start: usize,
    pub brace_end: usize,
    pub name_start: usize,
    pub name_length: usize,
    pub operator_index: Option<usize>,
    pub alignment: Option<PropertyPart>,
    pub format_specifier: Option<PropertyPart>,
}

impl TemplateProperty {
    /// Byte range covering the whole placeholder, braces included.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.brace_start..self.brace_end + 1
    }
}

/// Parse a message template into a lazy sequence of properties.
#[must_use]
pub const fn parse_template(template: &str) -> TemplateProperties<'_> {
    TemplateProperties {
        cursor: Cursor::new(template),
    }
}

/// Map every property of a message template to highlight regions.
#[must_use]
pub fn classify_template(template: &str) -> Vec<ClassifiedRegion> {
    let mut regions = Regions::default();

    for property in parse_template(template) {
        regions.push(Category::PropertyBrace, property.brace_start, "{");

        if let Some(index) = property.operator_index {
            let category = match property.kind {
                PropertyKind::Stringified => Category::StringifyOperator,
                _ => Category::DestructureOperator,
            };
            regions.push(category, index, &template[index..=index]);
        }

        let name_category = match property.kind {
            PropertyKind::Positional => Category::PositionalIndex,
            _ => Category::PropertyName,
        };
        regions.push(name_category, property.name_start, &property.name);

        if let Some(alignment) = &property.alignment {
            regions.push(Category::Alignment, alignment.start, &alignment.value);
        }
        if let Some(format) = &property.format_specifier {
            regions.push(Category::FormatSpecifier, format.start, &format.value);
        }

        regions.push(Category::PropertyBrace, property.brace_end, "}");
    }

    regions.into_vec()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    OpenBrace,
    Property,
    Alignment,
    Format,
}

/// Offsets collected for the placeholder currently being read.
#[derive(Debug, Default)]
struct Attempt {
    brace_start: usize,
    operator: Option<(usize, char)>,
    name: Option<Range<usize>>,
    trailing_space: bool,
    alignment: Option<Range<usize>>,
    format: Option<Range<usize>>,
}

impl Attempt {
    fn new(brace_start: usize) -> Self {
        Self {
            brace_start,
            ..Self::default()
        }
    }

    fn finish(self, input: &str, brace_end: usize) -> Option<TemplateProperty> {
        let range = self.name?;
        let name = input.get(range.clone())?.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return None;
        }

        let kind = match self.operator {
            Some((_, '@')) => PropertyKind::Destructured,
            Some((_, '$')) => PropertyKind::Stringified,
            _ if name.bytes().all(|b| b.is_ascii_digit()) => PropertyKind::Positional,
            _ => PropertyKind::Standard,
        };

        Some(TemplateProperty {
            name: name.to_string(),
            kind,
            brace_start: self.brace_start,
            brace_end,
            name_start: range.start,
            name_length: name.len(),
            operator_index: self.operator.map(|(index, _)| index),
            alignment: part(input, self.alignment),
            format_specifier: part(input, self.format),
        })
    }
}

fn part(input: &str, range: Option<Range<usize>>) -> Option<PropertyPart> {
    let range = range?;
    let value = input.get(range.clone())?;
    if value.is_empty() {
        return None;
    }
    Some(PropertyPart {
        value: value.to_string(),
        start: range.start,
    })
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

/// Lazy iterator over the properties of a message template.
#[derive(Debug, Clone)]
pub struct TemplateProperties<'a> {
    cursor: Cursor<'a>,
}

impl TemplateProperties<'_> {
    /// Skip to the next brace after an invalid placeholder. A `}` is
    /// consumed as the end of the broken attempt; a `{` is left for the
    /// next attempt.
    fn resynchronize(&mut self, attempt: &Attempt) {
        trace!(
            "abandoning template property at {}, resynchronizing",
            attempt.brace_start
        );
        self.cursor.eat_while(|c| c != '{' && c != '}');
        if self.cursor.peek() == Some('}') {
            self.cursor.bump();
        }
    }

    fn close(&mut self, attempt: &mut Attempt, brace_end: usize) -> Option<TemplateProperty> {
        self.cursor.bump();
        std::mem::take(attempt).finish(self.cursor.input(), brace_end)
    }
}

impl Iterator for TemplateProperties<'_> {
    type Item = TemplateProperty;

    #[allow(clippy::too_many_lines)]
    fn next(&mut self) -> Option<TemplateProperty> {
        let mut state = State::Outside;
        let mut attempt = Attempt::default();

        loop {
            let pos = self.cursor.pos();
            let Some(ch) = self.cursor.peek() else {
                if state != State::Outside {
                    trace!(
                        "dropping unterminated template property at {}",
                        attempt.brace_start
                    );
                }
                return None;
            };

            match state {
                State::Outside => {
                    if ch == '{' {
                        if self.cursor.peek_at(1) == Some('{') {
                            // escaped brace
                            self.cursor.bump();
                        } else {
                            attempt = Attempt::new(pos);
                            state = State::OpenBrace;
                        }
                    }
                    self.cursor.bump();
                }
                State::OpenBrace => match ch {
                    '@' | '$' if attempt.operator.is_none() => {
                        attempt.operator = Some((pos, ch));
                        self.cursor.bump();
                    }
                    c if c.is_whitespace() => {
                        if attempt.operator.is_some() {
                            self.resynchronize(&attempt);
                            state = State::Outside;
                        } else {
                            self.cursor.bump();
                        }
                    }
                    c if c.is_alphanumeric() || c == '_' => {
                        self.cursor.bump();
                        attempt.name = Some(pos..self.cursor.pos());
                        state = State::Property;
                    }
                    '}' => {
                        // empty body
                        self.cursor.bump();
                        state = State::Outside;
                    }
                    '{' => state = State::Outside,
                    _ => {
                        self.resynchronize(&attempt);
                        state = State::Outside;
                    }
                },
                State::Property => match ch {
                    c if is_name_char(c) => {
                        if attempt.trailing_space {
                            self.resynchronize(&attempt);
                            state = State::Outside;
                        } else {
                            self.cursor.bump();
                            if let Some(name) = attempt.name.as_mut() {
                                name.end = self.cursor.pos();
                            }
                        }
                    }
                    c if c.is_whitespace() => {
                        attempt.trailing_space = true;
                        self.cursor.bump();
                    }
                    ':' => {
                        self.cursor.bump();
                        attempt.format = Some(self.cursor.pos()..self.cursor.pos());
                        state = State::Format;
                    }
                    ',' => {
                        self.cursor.bump();
                        attempt.alignment = Some(self.cursor.pos()..self.cursor.pos());
                        state = State::Alignment;
                    }
                    '}' => {
                        if let Some(property) = self.close(&mut attempt, pos) {
                            return Some(property);
                        }
                        state = State::Outside;
                    }
                    '{' => state = State::Outside,
                    _ => {
                        self.resynchronize(&attempt);
                        state = State::Outside;
                    }
                },
                State::Alignment => match ch {
                    ':' => {
                        self.cursor.bump();
                        attempt.format = Some(self.cursor.pos()..self.cursor.pos());
                        state = State::Format;
                    }
                    '}' => {
                        if let Some(property) = self.close(&mut attempt, pos) {
                            return Some(property);
                        }
                        state = State::Outside;
                    }
                    '{' => state = State::Outside,
                    '|' => {
                        self.cursor.bump();
                        state = State::Outside;
                    }
                    _ => {
                        self.cursor.bump();
                        if let Some(alignment) = attempt.alignment.as_mut() {
                            alignment.end = self.cursor.pos();
                        }
                    }
                },
                State::Format => match ch {
                    '}' if self.cursor.peek_at(1) == Some('}') => {
                        // `}}` is a literal brace inside the format string
                        self.cursor.bump();
                        self.cursor.bump();
                        if let Some(format) = attempt.format.as_mut() {
                            format.end = self.cursor.pos();
                        }
                    }
                    '}' => {
                        if let Some(property) = self.close(&mut attempt, pos) {
                            return Some(property);
                        }
                        state = State::Outside;
                    }
                    '{' => state = State::Outside,
                    '|' => {
                        self.cursor.bump();
                        state = State::Outside;
                    }
                    _ => {
                        self.cursor.bump();
                        if let Some(format) = attempt.format.as_mut() {
                            format.end = self.cursor.pos();
                        }
                    }
                },
            }
        }
    }
}

impl std::iter::FusedIterator for TemplateProperties<'_> {}
