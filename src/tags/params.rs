//! Argument grammar of the `render` tag: `"<name>"( , <key>: <expr> )*`.
//!
//! Clauses are split with a small scanner that skips over string literals
//! and bracketed groups, so `label: "a, b"` or `row: {"x": 1}` stay intact.

/// Parsed arguments of a `render` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationArgs {
    pub target_name: String,
    /// Parameter clauses as written, without the leading comma.
    pub raw_params: String,
}

/// One `key: expression` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub expression: String,
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Like [`is_identifier`], but also allows `-` after the first character.
pub fn is_macro_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Parses and validates the arguments of a `render` tag.
///
/// The parameter clauses are checked here but kept unsplit; see
/// [`split_params`].
pub fn parse_invocation(args: &str) -> Result<InvocationArgs, String> {
    let args = args.trim();
    let quote = match args.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err("expected a quoted template name".to_string()),
    };
    let close = args[1..]
        .find(quote)
        .map(|at| at + 1)
        .ok_or_else(|| "unterminated template name".to_string())?;
    let name = &args[1..close];
    if !is_macro_name(name) {
        return Err(format!("'{name}' is not a valid template name"));
    }

    let rest = args[close + 1..].trim_start();
    let raw_params = if rest.is_empty() {
        ""
    } else if let Some(params) = rest.strip_prefix(',') {
        let params = params.trim();
        if params.is_empty() {
            return Err("expected parameters after ','".to_string());
        }
        split_params(params)?;
        params
    } else {
        return Err(format!("expected ',' after the template name, found '{rest}'"));
    };

    Ok(InvocationArgs { target_name: name.to_string(), raw_params: raw_params.to_string() })
}

/// Splits raw parameter clauses into `key: expression` pairs.
pub fn split_params(raw: &str) -> Result<Vec<Param>, String> {
    split_top_level(raw, ',')?
        .into_iter()
        .map(|clause| {
            let clause = clause.trim();
            if clause.is_empty() {
                return Err("empty parameter clause".to_string());
            }
            let colon = top_level_positions(clause, ':')?
                .first()
                .copied()
                .ok_or_else(|| format!("expected 'key: expression', found '{clause}'"))?;
            let key = clause[..colon].trim();
            let expression = clause[colon + 1..].trim();
            if !is_identifier(key) {
                return Err(format!("'{key}' is not a valid parameter name"));
            }
            if expression.is_empty() {
                return Err(format!("missing expression for parameter '{key}'"));
            }
            Ok(Param { key: key.to_string(), expression: expression.to_string() })
        })
        .collect()
}

fn split_top_level(source: &str, separator: char) -> Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut start = 0;
    for at in top_level_positions(source, separator)? {
        parts.push(&source[start..at]);
        start = at + separator.len_utf8();
    }
    parts.push(&source[start..]);
    Ok(parts)
}

/// Byte offsets of `separator` outside string literals and brackets.
fn top_level_positions(source: &str, separator: char) -> Result<Vec<usize>, String> {
    let mut positions = Vec::new();
    let mut closers: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (at, c) in source.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => closers.push(')'),
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ')' | ']' | '}' => {
                if closers.pop() != Some(c) {
                    return Err(format!("unbalanced '{c}'"));
                }
            }
            c if c == separator && closers.is_empty() => positions.push(at),
            _ => {}
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated string literal ({q})"));
    }
    if let Some(c) = closers.last() {
        return Err(format!("missing '{c}'"));
    }
    Ok(positions)
}
