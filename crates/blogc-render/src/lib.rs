//! The renderer: a single-pass interpreter over a parsed template's
//! statement stream. Rendering never fails — missing variables and undefined
//! branches expand to empty strings, so there is no error type here.

pub mod datefmt;

use blogc_template::{OP_EQ, OP_GT, OP_LT, StmtKind, TemplateStmt};
use blogc_utils::{ByteBuffer, SourceEntry};

pub use datefmt::DateTimeParseError;

/// Render `program` against `sources` and `global`, with the renderer's
/// listing flag set per `listing`.
///
/// `sources` is a plain slice rather than a whole `SourceList` so that a
/// paginated slice (`SourceList::page`) can be rendered directly without an
/// intermediate copy.
#[must_use]
pub fn render(
    program: &[TemplateStmt],
    sources: &[SourceEntry],
    global: &SourceEntry,
    listing: bool,
) -> String {
    let mut out = ByteBuffer::new();
    let mut idx = 0usize;

    let mut inside_block = false;
    let mut current_source: Option<usize> = None;
    let mut listing_start: Option<usize> = None;

    let mut foreach_tokens: Option<Vec<String>> = None;
    let mut foreach_cursor = 0usize;
    let mut foreach_start: Option<usize> = None;

    while idx < program.len() {
        let stmt = &program[idx];

        match stmt.kind {
            StmtKind::Content => {
                if let Some(v) = &stmt.value {
                    out.push_str(v);
                }
            }

            StmtKind::Block => {
                inside_block = true;
                let name = stmt.value.as_deref().unwrap_or("");
                let skip = match (listing, name) {
                    (false, "entry") => false,
                    (false, _) => true,
                    (true, "entry") => true,
                    (true, "listing") => sources.is_empty(),
                    (true, "listing_once") => false,
                    _ => true,
                };
                if skip {
                    idx = skip_to_endblock(program, idx);
                    inside_block = false;
                    continue;
                }
                if !listing && name == "entry" {
                    current_source = if sources.is_empty() { None } else { Some(0) };
                } else if listing && name == "listing" && current_source.is_none() {
                    listing_start = Some(idx);
                    current_source = Some(0);
                }
            }

            StmtKind::EndBlock => {
                inside_block = false;
                if let (Some(start), Some(cur)) = (listing_start, current_source) {
                    let next = cur + 1;
                    if next < sources.len() {
                        current_source = Some(next);
                        idx = start;
                        continue;
                    }
                    listing_start = None;
                    current_source = None;
                }
            }

            StmtKind::Variable => {
                if let Some(name) = &stmt.value {
                    let local = local_scope(inside_block, current_source, sources);
                    let item = foreach_tokens
                        .as_ref()
                        .and_then(|t| t.get(foreach_cursor))
                        .map(String::as_str);
                    if let Some(v) = format_variable(name, global, local, item) {
                        out.push_str(&v);
                    }
                }
            }

            StmtKind::IfDef | StmtKind::IfNDef | StmtKind::If => {
                let local = local_scope(inside_block, current_source, sources);
                let item = foreach_tokens
                    .as_ref()
                    .and_then(|t| t.get(foreach_cursor))
                    .map(String::as_str);
                if !evaluate_condition(stmt, global, local, item) {
                    idx = skip_false_branch(program, idx);
                    continue;
                }
            }

            StmtKind::Else => {
                idx = skip_else_to_endif(program, idx);
                continue;
            }

            StmtKind::EndIf => {}

            StmtKind::Foreach => {
                if foreach_tokens.is_none() {
                    let local = local_scope(inside_block, current_source, sources);
                    let name = stmt.value.as_deref().unwrap_or("");
                    match split_list_variable(name, global, local) {
                        Some(tokens) if !tokens.is_empty() => {
                            foreach_tokens = Some(tokens);
                            foreach_cursor = 0;
                            foreach_start = Some(idx);
                        }
                        _ => {
                            idx = skip_to_endforeach(program, idx);
                            continue;
                        }
                    }
                }
            }

            StmtKind::EndForeach => {
                if let (Some(start), Some(tokens)) = (foreach_start, &foreach_tokens) {
                    let next = foreach_cursor + 1;
                    if next < tokens.len() {
                        foreach_cursor = next;
                        idx = start;
                        continue;
                    }
                }
                foreach_start = None;
                foreach_tokens = None;
                foreach_cursor = 0;
            }
        }

        idx += 1;
    }

    out.into_string()
}

fn local_scope(
    inside_block: bool,
    current_source: Option<usize>,
    sources: &[SourceEntry],
) -> Option<&SourceEntry> {
    if !inside_block {
        return None;
    }
    current_source.and_then(|i| sources.get(i))
}

/// Walk forward from an unmatched `block` statement to its `endblock`.
/// Blocks never nest, so the first `EndBlock` encountered is the match.
fn skip_to_endblock(program: &[TemplateStmt], start: usize) -> usize {
    let mut i = start + 1;
    while i < program.len() && program[i].kind != StmtKind::EndBlock {
        i += 1;
    }
    i + 1
}

/// Walk forward from an unmatched `foreach` statement to its `endforeach`.
fn skip_to_endforeach(program: &[TemplateStmt], start: usize) -> usize {
    let mut i = start + 1;
    while i < program.len() && program[i].kind != StmtKind::EndForeach {
        i += 1;
    }
    i + 1
}

/// Walk forward from a false `if`/`ifdef`/`ifndef`, counting nested
/// conditionals, until the matching `else` (stop just after it, so the
/// else-body renders) or the matching `endif` (stop just after it, so
/// nothing renders).
fn skip_false_branch(program: &[TemplateStmt], start: usize) -> usize {
    let mut i = start + 1;
    let mut depth = 0usize;
    while i < program.len() {
        match program[i].kind {
            StmtKind::If | StmtKind::IfDef | StmtKind::IfNDef => depth += 1,
            StmtKind::Else if depth == 0 => return i + 1,
            StmtKind::EndIf => {
                if depth == 0 {
                    return i + 1;
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }
    program.len()
}

/// Walk forward from an `else` reached during a true branch's execution to
/// its matching `endif`, so the else-body is never rendered.
fn skip_else_to_endif(program: &[TemplateStmt], start: usize) -> usize {
    let mut i = start + 1;
    let mut depth = 0usize;
    while i < program.len() {
        match program[i].kind {
            StmtKind::If | StmtKind::IfDef | StmtKind::IfNDef => depth += 1,
            StmtKind::EndIf => {
                if depth == 0 {
                    return i + 1;
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }
    program.len()
}

fn evaluate_condition(
    stmt: &TemplateStmt,
    global: &SourceEntry,
    local: Option<&SourceEntry>,
    foreach_item: Option<&str>,
) -> bool {
    let lhs = stmt
        .value
        .as_deref()
        .and_then(|name| format_variable(name, global, local, foreach_item));

    match stmt.kind {
        StmtKind::IfDef => lhs.is_some(),
        StmtKind::IfNDef => lhs.is_none(),
        StmtKind::If => {
            let rhs = stmt
                .value2
                .as_deref()
                .and_then(|operand| resolve_if_operand(operand, global, local, foreach_item));
            match (lhs, rhs) {
                (Some(l), Some(r)) => {
                    let bit = match l.as_str().cmp(r.as_str()) {
                        std::cmp::Ordering::Less => OP_LT,
                        std::cmp::Ordering::Equal => OP_EQ,
                        std::cmp::Ordering::Greater => OP_GT,
                    };
                    stmt.op & bit != 0
                }
                _ => false,
            }
        }
        _ => false,
    }
}

/// Resolve the right-hand operand of an `if`: a quoted literal (unquoted,
/// with `\"` unescaped) or another variable name.
fn resolve_if_operand(
    raw: &str,
    global: &SourceEntry,
    local: Option<&SourceEntry>,
    foreach_item: Option<&str>,
) -> Option<String> {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        Some(unescape_quoted(&raw[1..raw.len() - 1]))
    } else {
        format_variable(raw, global, local, foreach_item)
    }
}

fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'"') {
            out.push('"');
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve `name`, applying the `_FORMATTED` suffix convention and the
/// `FOREACH_ITEM` special case. Local scope (the current source entry, if
/// any) shadows global.
fn format_variable(
    name: &str,
    global: &SourceEntry,
    local: Option<&SourceEntry>,
    foreach_item: Option<&str>,
) -> Option<String> {
    if name == "FOREACH_ITEM" {
        return foreach_item.map(str::to_string);
    }

    let base = name.strip_suffix("_FORMATTED").unwrap_or(name);
    let must_format = base != name;

    let value = resolve_variable(base, global, local)?;

    if must_format && name.starts_with("DATE_") {
        let date_format = resolve_variable("DATE_FORMAT", global, local);
        return Some(datefmt::format_date(value, date_format));
    }

    Some(value.to_string())
}

/// Look up `name` in local scope first, then global, falling back to the
/// small set of compiler-injected variables (currently just
/// `BLOGC_VERSION`) evaluated lazily on first lookup — there is nothing to
/// cache since the value is a compile-time constant, so no mutation of the
/// (read-only) config maps is needed.
fn resolve_variable<'a>(
    name: &str,
    global: &'a SourceEntry,
    local: Option<&'a SourceEntry>,
) -> Option<&'a str> {
    if let Some(l) = local {
        if let Some(v) = l.get(name) {
            return Some(v.as_str());
        }
    }
    if let Some(v) = global.get(name) {
        return Some(v.as_str());
    }
    if name == "BLOGC_VERSION" {
        return Some(env!("CARGO_PKG_VERSION"));
    }
    None
}

/// Split `name`'s value on ASCII whitespace for `foreach`, discarding empty
/// tokens. `None` distinguishes "variable undefined" from "defined but
/// empty" only insofar as both end up skipping the loop body.
fn split_list_variable(
    name: &str,
    global: &SourceEntry,
    local: Option<&SourceEntry>,
) -> Option<Vec<String>> {
    let value = resolve_variable(name, global, local)?;
    Some(value.split_whitespace().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogc_template::parse as parse_template;

    fn entry(pairs: &[(&str, &str)]) -> SourceEntry {
        let mut e = SourceEntry::new();
        for (k, v) in pairs {
            e.insert(k, (*v).to_string());
        }
        e
    }

    #[test]
    fn scenario_entry_block_renders_title_and_first_header() {
        let program = parse_template(
            "{% block entry %}{{ TITLE }}:{{ FIRST_HEADER }}{% endblock %}",
        )
        .unwrap();
        let sources = vec![entry(&[("TITLE", "Hi"), ("FIRST_HEADER", "Hello")])];
        let global = SourceEntry::new();
        assert_eq!(render(&program, &sources, &global, false), "Hi:Hello");
    }

    #[test]
    fn scenario_if_else_branches_on_global() {
        let program =
            parse_template(r#"{% if X == "a" %}A{% else %}B{% endif %}"#).unwrap();
        let sources: Vec<SourceEntry> = vec![];

        let mut global = SourceEntry::new();
        global.insert("X", "a".to_string());
        assert_eq!(render(&program, &sources, &global, false), "A");

        let mut global = SourceEntry::new();
        global.insert("X", "b".to_string());
        assert_eq!(render(&program, &sources, &global, false), "B");

        let global = SourceEntry::new();
        assert_eq!(render(&program, &sources, &global, false), "B");
    }

    #[test]
    fn scenario_foreach_splits_on_whitespace() {
        let program =
            parse_template("{% foreach XS %}<{{ FOREACH_ITEM }}>{% endforeach %}").unwrap();
        let sources: Vec<SourceEntry> = vec![];
        let mut global = SourceEntry::new();
        global.insert("XS", "a  b\tc".to_string());
        assert_eq!(render(&program, &sources, &global, false), "<a><b><c>");
    }

    #[test]
    fn listing_iterates_every_source() {
        let program = parse_template("{% block listing %}[{{ TITLE }}]{% endblock %}").unwrap();
        let sources = vec![entry(&[("TITLE", "one")]), entry(&[("TITLE", "two")])];
        let global = SourceEntry::new();
        assert_eq!(render(&program, &sources, &global, true), "[one][two]");
    }

    #[test]
    fn listing_entry_block_is_skipped() {
        let program = parse_template("{% block entry %}x{% endblock %}").unwrap();
        let sources = vec![entry(&[("TITLE", "one")])];
        let global = SourceEntry::new();
        assert_eq!(render(&program, &sources, &global, true), "");
    }

    #[test]
    fn non_listing_listing_block_is_skipped() {
        let program = parse_template("{% block listing %}x{% endblock %}").unwrap();
        let sources = vec![entry(&[("TITLE", "one")])];
        let global = SourceEntry::new();
        assert_eq!(render(&program, &sources, &global, false), "");
    }

    #[test]
    fn listing_once_renders_a_single_time_without_local_scope() {
        let program =
            parse_template("{% block listing_once %}{{ SITE_NAME }}{% endblock %}").unwrap();
        let sources = vec![entry(&[("TITLE", "one")]), entry(&[("TITLE", "two")])];
        let mut global = SourceEntry::new();
        global.insert("SITE_NAME", "blog".to_string());
        assert_eq!(render(&program, &sources, &global, true), "blog");
    }

    #[test]
    fn missing_variable_renders_empty() {
        let program = parse_template("[{{ NOPE }}]").unwrap();
        let sources: Vec<SourceEntry> = vec![];
        let global = SourceEntry::new();
        assert_eq!(render(&program, &sources, &global, false), "[]");
    }

    #[test]
    fn date_formatted_suffix_reformats_with_date_format() {
        let program = parse_template("{{ DATE_FORMATTED }}").unwrap();
        let sources: Vec<SourceEntry> = vec![];
        let mut global = SourceEntry::new();
        global.insert("DATE", "2021-01-02 15:04:05".to_string());
        global.insert("DATE_FORMAT", "%Y".to_string());
        assert_eq!(render(&program, &sources, &global, false), "2021");
    }

    #[test]
    fn date_formatted_without_date_format_falls_back_to_raw() {
        let program = parse_template("{{ DATE_FORMATTED }}").unwrap();
        let sources: Vec<SourceEntry> = vec![];
        let mut global = SourceEntry::new();
        global.insert("DATE", "2021-01-02 15:04:05".to_string());
        assert_eq!(
            render(&program, &sources, &global, false),
            "2021-01-02 15:04:05"
        );
    }

    #[test]
    fn nested_if_with_own_else_both_render_correctly() {
        let program = parse_template(
            r#"{% if A == "a" %}{% ifdef B %}yes{% else %}no{% endif %}{% else %}outer-no{% endif %}"#,
        )
        .unwrap();
        let sources: Vec<SourceEntry> = vec![];

        let mut global = SourceEntry::new();
        global.insert("A", "a".to_string());
        global.insert("B", "1".to_string());
        assert_eq!(render(&program, &sources, &global, false), "yes");

        let mut global = SourceEntry::new();
        global.insert("A", "a".to_string());
        assert_eq!(render(&program, &sources, &global, false), "no");

        let mut global = SourceEntry::new();
        global.insert("A", "z".to_string());
        assert_eq!(render(&program, &sources, &global, false), "outer-no");
    }

    #[test]
    fn blogc_version_resolves_without_being_set() {
        let program = parse_template("{{ BLOGC_VERSION }}").unwrap();
        let sources: Vec<SourceEntry> = vec![];
        let global = SourceEntry::new();
        assert_eq!(
            render(&program, &sources, &global, false),
            env!("CARGO_PKG_VERSION")
        );
    }
}
