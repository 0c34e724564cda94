//! Expression classification: flat expressions and expression templates.

mod common;

use common::{assert_regions_match_source, summary};
use message_template_syntax::{
    Category, ExpressionParser, Heuristics, TokenKind, category_for, parse_expression,
    parse_expression_template,
};

// -----------------------------------------------------------
// Flat expressions.
// -----------------------------------------------------------

#[test]
fn filter_expression() {
    let text = "@l = 'Error' and StartsWith(SourceContext, 'App')";
    let regions = parse_expression(text);
    assert_eq!(
        summary(&regions),
        [
            (Category::ExpressionBuiltin, "@l"),
            (Category::ExpressionOperator, "="),
            (Category::ExpressionLiteral, "'Error'"),
            (Category::ExpressionOperator, "and"),
            (Category::ExpressionFunction, "StartsWith"),
            (Category::ExpressionProperty, "SourceContext"),
            (Category::ExpressionLiteral, "'App'"),
        ]
    );
    assert_regions_match_source(text, &regions);
}

#[test]
fn escaped_quote_region_covers_source() {
    let text = "Name = 'It''s'";
    let regions = parse_expression(text);
    let literal = regions.last().expect("literal");
    assert_eq!(literal.text, "'It''s'");
    assert_eq!((literal.start, literal.length), (7, 7));
}

#[test]
fn punctuation_is_invisible() {
    let regions = parse_expression("Coalesce(A.B, 0)");
    assert_eq!(
        summary(&regions),
        [
            (Category::ExpressionFunction, "Coalesce"),
            (Category::ExpressionProperty, "A"),
            (Category::ExpressionProperty, "B"),
            (Category::ExpressionLiteral, "0"),
        ]
    );
}

#[test]
fn keywords_and_modifiers() {
    let regions = parse_expression("if A is null then 'x' else Name like 'y' ci");
    let keywords: Vec<_> = regions
        .iter()
        .filter(|r| r.category == Category::ExpressionKeyword)
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(keywords, ["if", "then", "else", "ci"]);
}

#[test]
fn multibyte_literal_offsets() {
    let text = "Nome = 'São'";
    let regions = parse_expression(text);
    assert_regions_match_source(text, &regions);
    assert_eq!(regions[2].length, "'São'".len());
}

#[test]
fn category_table_hides_structure() {
    for kind in [
        TokenKind::OpenParen,
        TokenKind::CloseParen,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
        TokenKind::Comma,
        TokenKind::Dot,
        TokenKind::Colon,
        TokenKind::Unknown,
    ] {
        assert_eq!(category_for(kind), None, "{kind:?}");
    }
    assert_eq!(category_for(TokenKind::Wildcard), Some(Category::ExpressionOperator));
    assert_eq!(category_for(TokenKind::DirectiveEach), Some(Category::ExpressionDirective));
}

#[test]
fn parser_with_heuristics() {
    let parser = ExpressionParser::with_heuristics(Heuristics::new(4, 3).expect("heuristics"));
    let regions = parser.parse("Contains('abcdef) and B");
    assert_eq!(
        summary(&regions),
        [
            (Category::ExpressionFunction, "Contains"),
            (Category::ExpressionLiteral, "'abcdef"),
            (Category::ExpressionOperator, "and"),
            (Category::ExpressionProperty, "B"),
        ]
    );
}

// -----------------------------------------------------------
// Expression templates.
// -----------------------------------------------------------

#[test]
fn timestamp_level_message() {
    let text = "[{@t:HH:mm:ss} {@l:u3}] {@m}\n{@x}";
    let regions = parse_expression_template(text);
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::ExpressionBuiltin, "@t"),
            (Category::FormatSpecifier, "HH:mm:ss"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionBuiltin, "@l"),
            (Category::FormatSpecifier, "u3"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionBuiltin, "@m"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionBuiltin, "@x"),
            (Category::PropertyBrace, "}"),
        ]
    );
    assert_eq!(regions[2].start, 5);
    assert_regions_match_source(text, &regions);
}

#[test]
fn plain_hole_is_property_name() {
    let regions = parse_expression_template("Hello {Name}!");
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::PropertyName, "Name"),
            (Category::PropertyBrace, "}"),
        ]
    );
}

#[test]
fn hole_with_expression() {
    let text = "{Substring(Name, 0, 3)}";
    let regions = parse_expression_template(text);
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::ExpressionFunction, "Substring"),
            (Category::ExpressionProperty, "Name"),
            (Category::ExpressionLiteral, "0"),
            (Category::ExpressionLiteral, "3"),
            (Category::PropertyBrace, "}"),
        ]
    );
    assert_regions_match_source(text, &regions);
}

#[test]
fn if_else_end() {
    let text = "{#if @l = 'Error'}!{#else if Count > 0}?{#else}.{#end}";
    let regions = parse_expression_template(text);
    let directives: Vec<_> = regions
        .iter()
        .filter(|r| r.category == Category::ExpressionDirective)
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(directives, ["#if", "#else if", "#else", "#end"]);
    assert!(
        summary(&regions).contains(&(Category::ExpressionProperty, "Count")),
        "{regions:?}"
    );
    assert_regions_match_source(text, &regions);
}

#[test]
fn each_registers_loop_variables() {
    let text = "{#each name, i in Names}{i}: {name}{#end} {name}";
    let regions = parse_expression_template(text);
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::ExpressionDirective, "#each"),
            (Category::ExpressionProperty, "name"),
            (Category::ExpressionProperty, "i"),
            (Category::ExpressionKeyword, "in"),
            (Category::ExpressionProperty, "Names"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionProperty, "i"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionProperty, "name"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionDirective, "#end"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::PropertyName, "name"),
            (Category::PropertyBrace, "}"),
        ]
    );
    assert_regions_match_source(text, &regions);
}

#[test]
fn delimit_directive() {
    let regions = parse_expression_template("{#each x in Xs}{x}{#delimit}, {#end}");
    assert!(summary(&regions).contains(&(Category::ExpressionDirective, "#delimit")));
}

#[test]
fn builtin_indexer_is_split() {
    let text = "{@p['RequestId']}";
    let regions = parse_expression_template(text);
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::ExpressionBuiltin, "@p"),
            (Category::ExpressionOperator, "["),
            (Category::ExpressionLiteral, "'RequestId'"),
            (Category::ExpressionOperator, "]"),
            (Category::PropertyBrace, "}"),
        ]
    );
    assert_regions_match_source(text, &regions);
}

#[test]
fn builtin_indexer_with_format() {
    let regions = parse_expression_template("{@p['Elapsed']:0.00}");
    assert!(summary(&regions).contains(&(Category::FormatSpecifier, "0.00")));
    assert!(summary(&regions).contains(&(Category::ExpressionLiteral, "'Elapsed'")));
}

#[test]
fn bracket_typo_ends_format() {
    let text = "{@l:u3] {#if @x is not null}!{#end}";
    let regions = parse_expression_template(text);
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::ExpressionBuiltin, "@l"),
            (Category::FormatSpecifier, "u3"),
            (Category::PropertyBrace, "]"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionDirective, "#if"),
            (Category::ExpressionBuiltin, "@x"),
            (Category::ExpressionOperator, "is not null"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionDirective, "#end"),
            (Category::PropertyBrace, "}"),
        ]
    );
    assert_regions_match_source(text, &regions);
}

#[test]
fn simple_directive_without_close() {
    let regions = parse_expression_template("{#if A}x{#else y");
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::ExpressionDirective, "#if"),
            (Category::ExpressionProperty, "A"),
            (Category::PropertyBrace, "}"),
            (Category::PropertyBrace, "{"),
            (Category::ExpressionDirective, "#else"),
        ]
    );
}

#[test]
fn escaped_braces_are_skipped() {
    let regions = parse_expression_template("{{not}} {Real}");
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::PropertyName, "Real"),
            (Category::PropertyBrace, "}"),
        ]
    );
    assert_eq!(regions[0].start, 8);
}

#[test]
fn unclosed_segments_yield_nothing() {
    assert!(parse_expression_template("{Unclosed").is_empty());
    assert!(parse_expression_template("{@m").is_empty());
    assert!(parse_expression_template("").is_empty());
}

#[test]
fn unclosed_segment_does_not_hide_later_text() {
    let regions = parse_expression_template("{A:x {B}");
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::PropertyName, "B"),
            (Category::PropertyBrace, "}"),
        ]
    );
}

#[test]
fn simple_end_leaves_trailing_text_unclassified() {
    let text = "{#end foo}";
    let regions = parse_expression_template(text);
    assert_eq!(
        summary(&regions),
        [
            (Category::PropertyBrace, "{"),
            (Category::ExpressionDirective, "#end"),
        ]
    );
    assert!(regions.iter().all(|r| r.start < 9), "{regions:?}");
}

#[test]
fn nested_group_stays_inside_its_segment() {
    let text = "{ {a: {b}} }";
    let regions = parse_expression_template(text);
    assert_eq!(regions.first().map(|r| r.start), Some(0));
    assert_eq!(regions.last().map(|r| r.start), Some(11));
    assert_eq!(
        regions.iter().filter(|r| r.category == Category::PropertyBrace).count(),
        2
    );
    assert_regions_match_source(text, &regions);
}
