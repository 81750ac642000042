pub mod engine;
pub mod filters;
pub mod interface;

pub use engine::Engine;
pub use interface::TemplateRenderer;
