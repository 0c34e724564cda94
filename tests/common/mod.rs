#![allow(dead_code)]

use message_template_syntax::{Category, ClassifiedRegion, TemplateProperty, parse_template};

/// `(category, text)` pairs, for compact assertions.
pub fn summary(regions: &[ClassifiedRegion]) -> Vec<(Category, &str)> {
    regions
        .iter()
        .map(|r| (r.category, r.text.as_str()))
        .collect()
}

pub fn properties(template: &str) -> Vec<TemplateProperty> {
    parse_template(template).collect()
}

pub fn names(template: &str) -> Vec<String> {
    parse_template(template).map(|p| p.name).collect()
}

/// Every region must describe exactly the source bytes it points at.
pub fn assert_regions_match_source(text: &str, regions: &[ClassifiedRegion]) {
    for region in regions {
        assert_eq!(region.length, region.text.len(), "length mismatch: {region:?}");
        let source = text.get(region.start..region.end()).unwrap_or_else(|| {
            panic!(
                "region out of bounds or off a char boundary: {region:?}\n\
                 --- text ---\n{text}"
            )
        });
        assert_eq!(
            source, region.text,
            "region text differs from source\n--- text ---\n{text}"
        );
    }
}
