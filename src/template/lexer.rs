use crate::constants::{OUTPUT_END, OUTPUT_START, TAG_END, TAG_START, TRIM_MARKER};
use crate::error::{Error, Result};

/// A `{% name args %}` directive as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// First word inside the delimiters.
    pub name: String,
    /// Everything after the name, trimmed.
    pub args: String,
    /// Line on which the opening delimiter appears (1-based).
    pub line: usize,
}

impl TagToken {
    /// Reconstructs the directive text, used in error messages.
    pub fn text(&self) -> String {
        if self.args.is_empty() {
            format!("{TAG_START} {} {TAG_END}", self.name)
        } else {
            format!("{TAG_START} {} {} {TAG_END}", self.name, self.args)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Output { source: String, line: usize },
    Tag(TagToken),
}

#[derive(Debug, Clone, Copy)]
enum Delimiter {
    Output,
    Tag,
}

impl Delimiter {
    fn start(self) -> &'static str {
        match self {
            Delimiter::Output => OUTPUT_START,
            Delimiter::Tag => TAG_START,
        }
    }

    fn end(self) -> &'static str {
        match self {
            Delimiter::Output => OUTPUT_END,
            Delimiter::Tag => TAG_END,
        }
    }
}

/// Splits template source into text, output and tag tokens.
///
/// Whitespace control markers (`{{-`, `-}}`, `{%-`, `-%}`) strip the
/// whitespace of the neighbouring text token. Text that ends up empty is
/// dropped.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;
    let mut trim_next = false;

    loop {
        let next = [
            rest.find(OUTPUT_START).map(|at| (at, Delimiter::Output)),
            rest.find(TAG_START).map(|at| (at, Delimiter::Tag)),
        ]
        .into_iter()
        .flatten()
        .min_by_key(|(at, _)| *at);

        let Some((start, delimiter)) = next else {
            push_text(&mut tokens, rest, trim_next, false);
            break;
        };

        let (text, opened) = rest.split_at(start);
        let body = &opened[delimiter.start().len()..];
        let trim_before = body.starts_with(TRIM_MARKER);
        push_text(&mut tokens, text, trim_next, trim_before);
        line += text.matches('\n').count();

        let Some(end) = body.find(delimiter.end()) else {
            return Err(Error::UnclosedDelimiter { delimiter: delimiter.start(), line });
        };

        let raw = &body[..end];
        let mut inner = if trim_before { &raw[TRIM_MARKER.len_utf8()..] } else { raw };
        trim_next = inner.ends_with(TRIM_MARKER);
        if trim_next {
            inner = &inner[..inner.len() - TRIM_MARKER.len_utf8()];
        }

        tokens.push(match delimiter {
            Delimiter::Output => Token::Output { source: inner.trim().to_string(), line },
            Delimiter::Tag => Token::Tag(tag_token(inner, line)),
        });

        line += raw.matches('\n').count();
        rest = &body[end + delimiter.end().len()..];
    }

    Ok(tokens)
}

fn tag_token(inner: &str, line: usize) -> TagToken {
    let inner = inner.trim();
    let (name, args) = match inner.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (inner, ""),
    };
    TagToken { name: name.to_string(), args: args.to_string(), line }
}

fn push_text(tokens: &mut Vec<Token>, text: &str, trim_start: bool, trim_end: bool) {
    let text = if trim_start { text.trim_start() } else { text };
    let text = if trim_end { text.trim_end() } else { text };
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, args: &str, line: usize) -> Token {
        Token::Tag(TagToken { name: name.into(), args: args.into(), line })
    }

    #[test]
    fn splits_text_output_and_tags() {
        let tokens = tokenize("Hi {{ name }}!{% render \"row\", x: 1 %}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("Hi ".into()),
                Token::Output { source: "name".into(), line: 1 },
                Token::Text("!".into()),
                tag("render", "\"row\", x: 1", 1),
            ]
        );
    }

    #[test]
    fn tracks_line_numbers() {
        let tokens = tokenize("a\nb\n{% template row %}\n{{ x }}").unwrap();
        assert_eq!(tokens[1], tag("template", "row", 3));
        assert_eq!(tokens[3], Token::Output { source: "x".into(), line: 4 });
    }

    #[test]
    fn trim_markers_strip_adjacent_whitespace() {
        let tokens = tokenize("a  \n {%- assign x = 1 -%} \n b {{- x }}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Text("a".into()),
                tag("assign", "x = 1", 2),
                Token::Text("b".into()),
                Token::Output { source: "x".into(), line: 3 },
            ]
        );
    }

    #[test]
    fn tag_without_arguments() {
        let tokens = tokenize("{% endtemplate %}").unwrap();
        assert_eq!(tokens, vec![tag("endtemplate", "", 1)]);
        if let Token::Tag(token) = &tokens[0] {
            assert_eq!(token.text(), "{% endtemplate %}");
        }
    }

    #[test]
    fn unclosed_delimiters_report_line() {
        let err = tokenize("ok\n{{ name").unwrap_err();
        assert!(matches!(err, Error::UnclosedDelimiter { delimiter: "{{", line: 2 }));

        let err = tokenize("{% template row").unwrap_err();
        assert!(matches!(err, Error::UnclosedDelimiter { delimiter: "{%", line: 1 }));
    }

    #[test]
    fn plain_text_only() {
        assert_eq!(tokenize("just text").unwrap(), vec![Token::Text("just text".into())]);
        assert!(tokenize("").unwrap().is_empty());
    }
}
