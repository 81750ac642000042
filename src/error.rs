use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to evaluate expression. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse context as YAML. Original error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse partial glob. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Invalid pattern. Original error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Failed to walk partials directory. Original error: {0}")]
    WalkDirError(#[from] walkdir::Error),

    /// A `template` block reached the end of input without `endtemplate`.
    #[error("Tag '{directive}' not closed: expected '{{% endtemplate %}}' before end of input.")]
    MalformedDefinition { directive: String },

    #[error("Invalid template syntax '{directive}': {reason}.")]
    InvalidDefinitionSyntax { directive: String, reason: String },

    #[error("Invalid render syntax '{directive}': {reason}.")]
    InvalidInvocationSyntax { directive: String, reason: String },

    /// A `render` tag executed before any `template` tag registered the name.
    #[error("Template \"{name}\" not found.")]
    UnknownMacro { name: String },

    #[error("Rendering \"{name}\" exceeded the maximum nesting depth of {limit}.")]
    RecursionLimit { name: String, limit: usize },

    #[error("Invalid assign syntax '{directive}': expected 'assign <name> = <expression>'.")]
    InvalidAssignSyntax { directive: String },

    #[error("Unknown tag '{name}' on line {line}.")]
    UnknownTag { name: String, line: usize },

    #[error("Unclosed '{delimiter}' opened on line {line}.")]
    UnclosedDelimiter { delimiter: &'static str, line: usize },

    #[error("Cannot proceed: template file '{template}' does not exist.")]
    TemplateDoesNotExistsError { template: String },

    #[error("Cannot proceed: unsupported context file '{path}'. Expected .json, .yaml or .yml.")]
    UnsupportedContextFile { path: String },
}

/// Convenience type alias for Results with the crate error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
