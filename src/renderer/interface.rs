use crate::error::Result;

/// Trait for template rendering engines.
///
/// The methods block until the render completes; async callers use the
/// engine's own `parse_and_render` instead.
pub trait TemplateRenderer {
    /// Parses and renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;

    /// Evaluates a single expression against the given context.
    ///
    /// # Arguments
    /// * `expr` - Expression to evaluate
    /// * `context` - Context variables for evaluation
    ///
    /// # Returns
    /// * `Result<serde_json::Value>` - The evaluated value
    fn evaluate_expression(
        &self,
        expr: &str,
        context: &serde_json::Value,
    ) -> Result<serde_json::Value>;
}
