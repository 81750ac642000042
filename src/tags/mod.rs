//! Tags installed on every [`Engine`]
//!
//! - `definition`: `{% template name %}...{% endtemplate %}` registers a macro
//! - `invocation`: `{% render "name", key: expr %}` renders a registered macro
//! - `assign`: `{% assign name = expr %}` binds a variable in the current scope
//! - `registry`: the per-engine macro store
//! - `params`: the argument grammar of `render`

pub mod assign;
pub mod definition;
pub mod invocation;
pub mod params;
pub mod registry;

pub use assign::AssignTag;
pub use definition::DefinitionTag;
pub use invocation::InvocationTag;
pub use registry::{Macro, MacroRegistry};

use crate::constants::tags;
use crate::renderer::Engine;

pub fn register_builtin_tags(engine: &mut Engine) {
    engine.register_tag(tags::TEMPLATE, DefinitionTag);
    engine.register_tag(tags::RENDER, InvocationTag);
    engine.register_tag(tags::ASSIGN, AssignTag);
}
