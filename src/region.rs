/// Semantic category of a highlighted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Name of a template property: `Name` in `{Name}`.
    PropertyName,
    /// Index of a positional property: `0` in `{0}`.
    PositionalIndex,
    /// `@` in `{@Order}`.
    DestructureOperator,
    /// `$` in `{$Order}`.
    StringifyOperator,
    /// `C2` in `{Price:C2}`.
    FormatSpecifier,
    /// `10` in `{Price,10}`.
    Alignment,
    /// Opening or closing property delimiter.
    PropertyBrace,
    /// Property referenced inside an expression.
    ExpressionProperty,
    ExpressionOperator,
    ExpressionFunction,
    /// String, number, boolean, or null literal.
    ExpressionLiteral,
    ExpressionKeyword,
    /// `@t`, `@m`, `@l`, and the other built-in properties.
    ExpressionBuiltin,
    /// `#if`, `#each`, `#end`, and the other template directives.
    ExpressionDirective,
}

/// A classified span of text, in byte offsets relative to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRegion {
    pub category: Category,
    pub start: usize,
    pub length: usize,
    pub text: String,
}

impl ClassifiedRegion {
    #[must_use]
    pub fn new(category: Category, start: usize, text: &str) -> Self {
        Self {
            category,
            start,
            length: text.len(),
            text: text.to_string(),
        }
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Shift the region into an outer coordinate space.
    #[must_use]
    pub fn rebase(mut self, offset: usize) -> Self {
        self.start += offset;
        self
    }
}

/// Collects regions, dropping any that would be empty.
#[derive(Debug, Default)]
pub(crate) struct Regions {
    items: Vec<ClassifiedRegion>,
}

impl Regions {
    pub(crate) fn push(&mut self, category: Category, start: usize, text: &str) {
        if !text.is_empty() {
            self.items.push(ClassifiedRegion::new(category, start, text));
        }
    }

    pub(crate) fn into_vec(self) -> Vec<ClassifiedRegion> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_shifts_start_only() {
        let region = ClassifiedRegion::new(Category::PropertyName, 3, "Name").rebase(10);
        assert_eq!(region.start, 13);
        assert_eq!(region.length, 4);
        assert_eq!(region.end(), 17);
    }

    #[test]
    fn empty_regions_are_dropped() {
        let mut regions = Regions::default();
        regions.push(Category::FormatSpecifier, 0, "");
        regions.push(Category::PropertyBrace, 0, "{");
        assert_eq!(regions.into_vec().len(), 1);
    }
}
