use log::{debug, warn};
use minijinja::Value;
use regex::Regex;

// Re-export all the case conversion and string manipulation functions
pub use cruet::{
    case::{
        camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
        screaming_snake::to_screaming_snake_case, snake::to_snake_case,
        table::to_table_case, train::to_train_case,
    },
    string::{pluralize::to_plural, singularize::to_singular},
    suffix::foreign_key::to_foreign_key,
};

/// Parses a JSON string into a structured value.
///
/// Never fails: unparseable input and non-string values yield `none`, so a
/// bad payload renders as empty text instead of aborting the render.
///
/// # Arguments
/// * `value` - The string to parse
///
/// # Returns
/// * `Value` - The parsed value, or `none`
pub fn parse_json(value: Value) -> Value {
    let Some(source) = value.as_str() else {
        debug!("parse_json received a non-string value: {value}");
        return Value::from(());
    };
    match serde_json::from_str::<serde_json::Value>(source) {
        Ok(parsed) => Value::from_serialize(&parsed),
        Err(err) => {
            debug!("parse_json could not parse input: {err}");
            Value::from(())
        }
    }
}

/// Custom regex filter for template processing.
///
/// Tests if a string matches a given regular expression pattern.
///
/// # Arguments
/// * `val` - The string to test
/// * `re` - The regular expression pattern
///
/// # Returns
/// * `bool` - True if the string matches the pattern, false otherwise
pub fn regex_filter(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_object() {
        let value = parse_json(Value::from(r#"{"a":1,"b":[true,null]}"#));
        assert_eq!(value.get_attr("a").unwrap(), Value::from(1));
        assert_eq!(value.get_attr("b").unwrap().len(), Some(2));
    }

    #[test]
    fn test_parse_json_scalars() {
        assert_eq!(parse_json(Value::from("42")), Value::from(42));
        assert_eq!(parse_json(Value::from("\"text\"")), Value::from("text"));
        assert!(parse_json(Value::from("null")).is_none());
    }

    #[test]
    fn test_parse_json_invalid_yields_none() {
        assert!(parse_json(Value::from("not json")).is_none());
        assert!(parse_json(Value::from("")).is_none());
        assert!(parse_json(Value::from(7)).is_none());
    }

    #[test]
    fn test_regex_filter_matches() {
        assert!(regex_filter("hello123", r"hello\d+"));
    }

    #[test]
    fn test_regex_filter_no_match() {
        assert!(!regex_filter("hello", r"\d+"));
    }

    #[test]
    fn test_regex_filter_invalid_regex() {
        assert!(!regex_filter("anything", r"([unclosed"));
    }
}
