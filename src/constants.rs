//! Constants used throughout trmnl-liquid

/// Opening and closing delimiters of an output expression.
pub const OUTPUT_START: &str = "{{";
pub const OUTPUT_END: &str = "}}";

/// Opening and closing delimiters of a tag.
pub const TAG_START: &str = "{%";
pub const TAG_END: &str = "%}";

/// Whitespace control marker placed inside a delimiter.
pub const TRIM_MARKER: char = '-';

/// Tag names installed by the macro extension.
pub mod tags {
    pub const TEMPLATE: &str = "template";
    pub const END_TEMPLATE: &str = "endtemplate";
    pub const RENDER: &str = "render";
    pub const ASSIGN: &str = "assign";
}

/// Maximum number of nested `render` invocations within one pass.
pub const MAX_INVOCATION_DEPTH: usize = 64;

/// File extension stripped from partial names.
pub const PARTIAL_EXTENSION: &str = ".liquid";

/// Glob used when no partial globs are configured.
pub const DEFAULT_PARTIAL_GLOB: &str = "**/*.liquid";

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
