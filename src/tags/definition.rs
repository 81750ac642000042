use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use log::debug;

use super::params::is_macro_name;
use crate::constants::tags::END_TEMPLATE;
use crate::error::{Error, Result};
use crate::renderer::Engine;
use crate::template::{Context, Node, Parser, TagNode, TagParser, TagToken, TokenStream};

/// Parses `{% template <name> %} ... {% endtemplate %}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionTag;

/// A parsed definition block waiting to be registered.
#[derive(Debug)]
pub struct Definition {
    pub name: String,
    pub body: Rc<[Node]>,
}

impl TagParser for DefinitionTag {
    fn parse(
        &self,
        token: TagToken,
        stream: &mut TokenStream,
        parser: &Parser<'_>,
    ) -> Result<Box<dyn TagNode>> {
        let name = token.args.trim();
        if !is_macro_name(name) {
            return Err(Error::InvalidDefinitionSyntax {
                directive: token.text(),
                reason: format!("'{name}' is not a valid template name"),
            });
        }

        let body = parser
            .parse_until(stream, END_TEMPLATE)?
            .ok_or_else(|| Error::MalformedDefinition { directive: token.text() })?;

        Ok(Box::new(Definition { name: name.to_string(), body: Rc::from(body) }))
    }
}

impl TagNode for Definition {
    fn render<'a>(
        &'a self,
        _ctx: &'a mut Context,
        engine: &'a Engine,
        _out: &'a mut String,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            debug!("Registering template '{}' ({} nodes)", self.name, self.body.len());
            engine.register_macro(&self.name, Rc::clone(&self.body));
            Ok(())
        }
        .boxed_local()
    }
}
