//! The template parser: lexes `{% ... %}` statements and `{{ VARIABLE }}`
//! expansions into a flat statement stream.
//!
//! The parser is single-pass and character-driven, mirroring the block
//! parser's line-scanning style in `blogc-content`: no lookahead beyond what
//! is needed to recognize the end of the current construct.

pub mod error;

pub use error::TemplateParseError;

/// Bit set over `{LT, GT, EQ}`. Zero means "no operator" — used by
/// `IFDEF`/`IFNDEF`, which test only for variable presence.
pub const OP_LT: u8 = 0b001;
pub const OP_GT: u8 = 0b010;
pub const OP_EQ: u8 = 0b100;
pub const OP_NEQ: u8 = OP_LT | OP_GT;
pub const OP_LE: u8 = OP_LT | OP_EQ;
pub const OP_GE: u8 = OP_GT | OP_EQ;

/// The kind of statement a single [`TemplateStmt`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StmtKind {
    Content,
    Block,
    EndBlock,
    Variable,
    IfDef,
    IfNDef,
    If,
    Else,
    EndIf,
    Foreach,
    EndForeach,
}

/// One entry in a template program. Field usage varies by `kind`:
///
/// - `Content`: `value` holds the literal text.
/// - `Block`: `value` holds the block type (`entry`/`listing`/`listing_once`).
/// - `Variable`, `IfDef`, `IfNDef`, `Foreach`: `value` holds the variable name.
/// - `If`: `value` is the left-hand variable name, `op` the comparison, and
///   `value2` the right-hand operand — either another variable name or a
///   quoted string literal (quotes and escapes retained; unquoting is the
///   renderer's job).
/// - `EndBlock`, `Else`, `EndIf`, `EndForeach`: no fields used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateStmt {
    pub kind: StmtKind,
    pub value: Option<String>,
    pub value2: Option<String>,
    pub op: u8,
}

impl TemplateStmt {
    fn simple(kind: StmtKind) -> Self {
        Self {
            kind,
            value: None,
            value2: None,
            op: 0,
        }
    }

    fn with_value(kind: StmtKind, value: String) -> Self {
        Self {
            kind,
            value: Some(value),
            value2: None,
            op: 0,
        }
    }
}

pub type TemplateProgram = Vec<TemplateStmt>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockKind {
    Entry,
    Listing,
    ListingOnce,
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_var_start(b: u8) -> bool {
    b.is_ascii_uppercase()
}

fn is_var_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_lowercase()
}

fn is_block_type_char(b: u8) -> bool {
    b.is_ascii_lowercase() || b == b'_'
}

fn skip_ws(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && is_ws(bytes[*pos]) {
        *pos += 1;
    }
}

/// Parse a whole template into a flat statement stream.
///
/// # Errors
///
/// Returns a [`TemplateParseError`] at the first malformed construct, block
/// nesting violation, or unclosed construct at end of input.
pub fn parse(src: &str) -> Result<TemplateProgram, TemplateParseError> {
    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut pos = 0usize;
    let mut content_start = 0usize;
    let mut stmts: TemplateProgram = Vec::new();
    let mut lstrip_next = false;
    let mut block_open: Option<BlockKind> = None;
    let mut foreach_open = false;
    let mut if_stack: Vec<bool> = Vec::new();

    while pos < len {
        match find_open(bytes, pos) {
            None => break,
            Some((idx, is_var)) => {
                push_content(&mut stmts, &src[content_start..idx], &mut lstrip_next);
                pos = idx + 2;

                if is_var {
                    let stmt = parse_variable(src, bytes, &mut pos)?;
                    stmts.push(stmt);
                } else {
                    let mut rstrip_prev = false;
                    if pos < len && bytes[pos] == b'-' {
                        if pos + 1 < len && bytes[pos + 1] == b'-' {
                            return Err(TemplateParseError::duplicated_trim_marker(src, pos));
                        }
                        rstrip_prev = true;
                        pos += 1;
                    }
                    if rstrip_prev {
                        if let Some(last) = stmts.last_mut() {
                            if last.kind == StmtKind::Content {
                                if let Some(v) = &last.value {
                                    last.value = Some(v.trim_end().to_string());
                                }
                            }
                        }
                    }

                    let (stmt, sets_lstrip) = parse_statement(
                        src,
                        bytes,
                        &mut pos,
                        &mut block_open,
                        &mut foreach_open,
                        &mut if_stack,
                    )?;
                    stmts.push(stmt);
                    lstrip_next = sets_lstrip;
                }

                content_start = pos;
            }
        }
    }

    push_content(&mut stmts, &src[content_start..len], &mut lstrip_next);

    if !if_stack.is_empty() {
        return Err(TemplateParseError::UnclosedIf {
            count: if_stack.len(),
        });
    }
    if block_open.is_some() {
        return Err(TemplateParseError::UnclosedBlock);
    }
    if foreach_open {
        return Err(TemplateParseError::UnclosedForeach);
    }

    Ok(stmts)
}

/// Find the next `{%` or `{{` at or after `from`. Returns the byte offset of
/// the opening brace and whether it is a variable (`{{`) construct.
fn find_open(bytes: &[u8], from: usize) -> Option<(usize, bool)> {
    let len = bytes.len();
    let mut i = from;
    while i + 1 < len {
        if bytes[i] == b'{' {
            match bytes[i + 1] {
                b'{' => return Some((i, true)),
                b'%' => return Some((i, false)),
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/// Emit a CONTENT statement for `text`, applying a pending lstrip. Empty
/// runs are never emitted — two back-to-back constructs, a template that
/// ends exactly at a construct's close, and the empty template all produce
/// no CONTENT statement for that (non-)run.
fn push_content(stmts: &mut TemplateProgram, text: &str, lstrip_next: &mut bool) {
    let mut text = text.to_string();
    if *lstrip_next {
        text = text.trim_start().to_string();
        *lstrip_next = false;
    }
    if text.is_empty() {
        return;
    }
    stmts.push(TemplateStmt::with_value(StmtKind::Content, text));
}

/// Parse the inside of `{{ ... }}`, cursor positioned right after `{{`.
fn parse_variable(
    src: &str,
    bytes: &[u8],
    pos: &mut usize,
) -> Result<TemplateStmt, TemplateParseError> {
    let len = bytes.len();
    skip_ws(bytes, pos);
    if *pos >= len || !is_var_start(bytes[*pos]) {
        return Err(TemplateParseError::bad_variable_name(src, *pos));
    }
    let start = *pos;
    while *pos < len && is_var_char(bytes[*pos]) {
        *pos += 1;
    }
    let name = src[start..*pos].to_string();
    skip_ws(bytes, pos);
    if *pos + 1 >= len || bytes[*pos] != b'}' || bytes[*pos + 1] != b'}' {
        return Err(TemplateParseError::unclosed_statement(src, *pos));
    }
    *pos += 2;
    Ok(TemplateStmt::with_value(StmtKind::Variable, name))
}

/// Parse the inside of a `{% ... %}` statement, cursor positioned right
/// after `{%` (and any trim marker already consumed). Returns the statement
/// plus whether the following CONTENT statement should be lstripped.
fn parse_statement(
    src: &str,
    bytes: &[u8],
    pos: &mut usize,
    block_open: &mut Option<BlockKind>,
    foreach_open: &mut bool,
    if_stack: &mut Vec<bool>,
) -> Result<(TemplateStmt, bool), TemplateParseError> {
    let len = bytes.len();
    skip_ws(bytes, pos);
    let name_start = *pos;
    while *pos < len && is_name_char(bytes[*pos]) {
        *pos += 1;
    }
    let name = &src[name_start..*pos];
    if name.is_empty() {
        return Err(TemplateParseError::bad_statement_name(src, name_start));
    }

    match name {
        "block" => {
            if block_open.is_some() {
                return Err(TemplateParseError::nested_block(src, name_start));
            }
            skip_ws(bytes, pos);
            let type_start = *pos;
            while *pos < len && is_block_type_char(bytes[*pos]) {
                *pos += 1;
            }
            let block_type = &src[type_start..*pos];
            let kind = match block_type {
                "entry" => BlockKind::Entry,
                "listing" => BlockKind::Listing,
                "listing_once" => BlockKind::ListingOnce,
                _ => return Err(TemplateParseError::unknown_block_type(src, type_start)),
            };
            *block_open = Some(kind);
            let lstrip = close_statement(src, bytes, pos)?;
            Ok((
                TemplateStmt::with_value(StmtKind::Block, block_type.to_string()),
                lstrip,
            ))
        }
        "endblock" => {
            if block_open.is_none() {
                return Err(TemplateParseError::unmatched_endblock(src, name_start));
            }
            *block_open = None;
            let lstrip = close_statement(src, bytes, pos)?;
            Ok((TemplateStmt::simple(StmtKind::EndBlock), lstrip))
        }
        "ifdef" | "ifndef" => {
            let var = read_variable_name(src, bytes, pos)?;
            if_stack.push(false);
            let lstrip = close_statement(src, bytes, pos)?;
            let kind = if name == "ifdef" {
                StmtKind::IfDef
            } else {
                StmtKind::IfNDef
            };
            Ok((TemplateStmt::with_value(kind, var), lstrip))
        }
        "if" => {
            let var = read_variable_name(src, bytes, pos)?;
            skip_ws(bytes, pos);
            let op = read_operator(src, bytes, pos)?;
            skip_ws(bytes, pos);
            let operand = read_operand(src, bytes, pos)?;
            if_stack.push(false);
            let lstrip = close_statement(src, bytes, pos)?;
            Ok((
                TemplateStmt {
                    kind: StmtKind::If,
                    value: Some(var),
                    value2: Some(operand),
                    op,
                },
                lstrip,
            ))
        }
        "else" => {
            match if_stack.last_mut() {
                None => return Err(TemplateParseError::unmatched_else(src, name_start)),
                Some(has_else) => {
                    if *has_else {
                        return Err(TemplateParseError::duplicated_else(src, name_start));
                    }
                    *has_else = true;
                }
            }
            let lstrip = close_statement(src, bytes, pos)?;
            Ok((TemplateStmt::simple(StmtKind::Else), lstrip))
        }
        "endif" => {
            if if_stack.pop().is_none() {
                return Err(TemplateParseError::unmatched_endif(src, name_start));
            }
            let lstrip = close_statement(src, bytes, pos)?;
            Ok((TemplateStmt::simple(StmtKind::EndIf), lstrip))
        }
        "foreach" => {
            if *foreach_open {
                return Err(TemplateParseError::nested_foreach(src, name_start));
            }
            let var = read_variable_name(src, bytes, pos)?;
            *foreach_open = true;
            let lstrip = close_statement(src, bytes, pos)?;
            Ok((TemplateStmt::with_value(StmtKind::Foreach, var), lstrip))
        }
        "endforeach" => {
            if !*foreach_open {
                return Err(TemplateParseError::unmatched_endforeach(src, name_start));
            }
            *foreach_open = false;
            let lstrip = close_statement(src, bytes, pos)?;
            Ok((TemplateStmt::simple(StmtKind::EndForeach), lstrip))
        }
        _ => Err(TemplateParseError::bad_statement_name(src, name_start)),
    }
}

fn read_variable_name(
    src: &str,
    bytes: &[u8],
    pos: &mut usize,
) -> Result<String, TemplateParseError> {
    let len = bytes.len();
    skip_ws(bytes, pos);
    if *pos >= len || !is_var_start(bytes[*pos]) {
        return Err(TemplateParseError::bad_variable_name(src, *pos));
    }
    let start = *pos;
    while *pos < len && is_var_char(bytes[*pos]) {
        *pos += 1;
    }
    Ok(src[start..*pos].to_string())
}

const OPERATORS: &[(&str, u8)] = &[
    ("==", OP_EQ),
    ("!=", OP_NEQ),
    ("<=", OP_LE),
    (">=", OP_GE),
    ("<", OP_LT),
    (">", OP_GT),
];

fn read_operator(src: &str, bytes: &[u8], pos: &mut usize) -> Result<u8, TemplateParseError> {
    for (token, op) in OPERATORS {
        let token_bytes = token.as_bytes();
        if bytes[*pos..].starts_with(token_bytes) {
            *pos += token_bytes.len();
            return Ok(*op);
        }
    }
    Err(TemplateParseError::bad_operator(src, *pos))
}

/// Read the right-hand operand of an `if` statement: either a variable name
/// or a double-quoted string (returned verbatim, quotes and escapes intact).
fn read_operand(src: &str, bytes: &[u8], pos: &mut usize) -> Result<String, TemplateParseError> {
    let len = bytes.len();
    if *pos < len && bytes[*pos] == b'"' {
        let start = *pos;
        *pos += 1;
        loop {
            if *pos >= len {
                return Err(TemplateParseError::unterminated_string(src, start));
            }
            match bytes[*pos] {
                b'\\' if *pos + 1 < len => *pos += 2,
                b'"' => {
                    *pos += 1;
                    break;
                }
                b'\n' => return Err(TemplateParseError::unterminated_string(src, start)),
                _ => *pos += 1,
            }
        }
        Ok(src[start..*pos].to_string())
    } else {
        read_variable_name(src, bytes, pos)
    }
}

/// Consume the optional trim marker and the mandatory `%}` closing a
/// statement. Returns whether the following content should be lstripped.
fn close_statement(src: &str, bytes: &[u8], pos: &mut usize) -> Result<bool, TemplateParseError> {
    let len = bytes.len();
    skip_ws(bytes, pos);
    let mut lstrip_next = false;
    if *pos < len && bytes[*pos] == b'-' {
        if *pos + 1 < len && bytes[*pos + 1] == b'-' {
            return Err(TemplateParseError::duplicated_trim_marker(src, *pos));
        }
        lstrip_next = true;
        *pos += 1;
    }
    if *pos + 1 >= len || bytes[*pos] != b'%' || bytes[*pos + 1] != b'}' {
        return Err(TemplateParseError::unclosed_statement(src, *pos));
    }
    *pos += 2;
    Ok(lstrip_next)
}
