//! Six concrete input/output scenarios, one test per
//! numbered scenario, each driving the full source-parser -> template-parser
//! -> renderer pipeline the way a caller assembling the core crates would.

use blogc_utils::SourceEntry;

/// Scenario 1: a single entry block renders `TITLE` and the body's
/// `FIRST_HEADER`.
#[test]
fn scenario_1_entry_block_with_title_and_first_header() {
    let entry = blogc_source::parse("TITLE: Hi\n---\n# Hello\n\nworld\n", "post.txt", None).unwrap();
    let program =
        blogc_template::parse("{% block entry %}{{ TITLE }}:{{ FIRST_HEADER }}{% endblock %}")
            .unwrap();
    let global = SourceEntry::new();
    let rendered = blogc_render::render(&program, &[entry], &global, false);
    assert_eq!(rendered, "Hi:Hello");
}

/// Scenario 2: `{% if X == "a" %}A{% else %}B{% endif %}` branches on a
/// global, and falls to the else branch when the variable is absent.
#[test]
fn scenario_2_if_else_on_quoted_literal() {
    let program = blogc_template::parse(r#"{% if X == "a" %}A{% else %}B{% endif %}"#).unwrap();

    let mut global = SourceEntry::new();
    global.insert("X", "a".to_string());
    assert_eq!(blogc_render::render(&program, &[], &global, false), "A");

    let mut global = SourceEntry::new();
    global.insert("X", "b".to_string());
    assert_eq!(blogc_render::render(&program, &[], &global, false), "B");

    let global = SourceEntry::new();
    assert_eq!(blogc_render::render(&program, &[], &global, false), "B");
}

/// Scenario 3: two indented lines become a single `<pre><code>` block with
/// an internal (not trailing) newline.
#[test]
fn scenario_3_code_block_joins_lines_with_single_newline() {
    let result = blogc_content::parse("  code line 1\n  code line 2\n", false, false);
    assert_eq!(
        result.html,
        "<pre><code>code line 1\ncode line 2</code></pre>\n"
    );
}

/// Scenario 4: `[foo](bar)` inline-renders to an anchor tag.
#[test]
fn scenario_4_inline_link() {
    assert_eq!(
        blogc_content::parse_inline("[foo](bar)"),
        r#"<a href="bar">foo</a>"#
    );
}

/// Scenario 5: an excerpt marker splits the rendered HTML so `EXCERPT`
/// contains only the header and the first paragraph.
#[test]
fn scenario_5_excerpt_marker_splits_content() {
    let result = blogc_content::parse("# T\n\nfoo\n\n...\n\nbar\n", true, false);
    assert_eq!(result.excerpt(), "<h1 id=\"t\">T</h1>\n<p>foo</p>\n");
    assert!(result.html.contains("<p>bar</p>"));
}

/// Scenario 6: `{% foreach XS %}` splits a whitespace-separated global on
/// any run of ASCII whitespace, discarding empty tokens.
#[test]
fn scenario_6_foreach_splits_on_whitespace() {
    let program =
        blogc_template::parse("{% foreach XS %}<{{ FOREACH_ITEM }}>{% endforeach %}").unwrap();
    let mut global = SourceEntry::new();
    global.insert("XS", "a  b\tc".to_string());
    assert_eq!(blogc_render::render(&program, &[], &global, false), "<a><b><c>");
}
