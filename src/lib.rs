/// Handles argument parsing and the render workflow.
pub mod cli;

/// Defines custom error types.
pub mod error;

/// Constants shared across the crate.
pub mod constants;

/// The engine, its filters and the renderer interface.
pub mod renderer;

/// Template macros: `template`, `render` and `assign`.
pub mod tags;

/// Lexing, parsing and the render context.
pub mod template;

/// Literal substitution of `{% include %}` directives.
pub mod partials;

/// A set of helpers for working with the file system.
pub mod ioutils;

pub use error::{Error, Result};
pub use renderer::{Engine, TemplateRenderer};
