use std::fmt;

use futures::future::LocalBoxFuture;

use super::context::Context;
use super::lexer::TagToken;
use super::parser::{Parser, TokenStream};
use crate::error::Result;
use crate::renderer::Engine;

/// One parsed element of a template.
#[derive(Debug)]
pub enum Node {
    /// Literal text, emitted as-is.
    Text(String),
    /// A `{{ expression }}` whose value is emitted.
    Output(OutputNode),
    /// A tag instance produced by a registered [`TagParser`].
    Tag(Box<dyn TagNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNode {
    pub source: String,
    pub line: usize,
}

/// Render hook of a parsed tag.
///
/// Rendering is cooperative: the returned future may await expression
/// evaluation or nested renders before it writes into `out`.
pub trait TagNode: fmt::Debug {
    fn render<'a>(
        &'a self,
        ctx: &'a mut Context,
        engine: &'a Engine,
        out: &'a mut String,
    ) -> LocalBoxFuture<'a, Result<()>>;
}

/// Parse hook of a tag, installed with [`Engine::register_tag`].
pub trait TagParser {
    /// Builds the tag node from its directive.
    ///
    /// Block tags may keep consuming `stream` (for example up to a closing
    /// tag); whatever they leave is parsed by the caller.
    fn parse(
        &self,
        token: TagToken,
        stream: &mut TokenStream,
        parser: &Parser<'_>,
    ) -> Result<Box<dyn TagNode>>;
}

/// A parsed document.
#[derive(Debug)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
