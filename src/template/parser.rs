use std::collections::VecDeque;

use super::lexer::{tokenize, Token};
use super::node::{Node, OutputNode, Template};
use crate::error::{Error, Result};
use crate::renderer::Engine;

/// Remaining tokens of a document being parsed.
///
/// Block tags receive the stream mid-parse and pull their nested tokens from
/// it; whatever they do not consume goes back to the enclosing parser.
#[derive(Debug, Default)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens: tokens.into() }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Turns tokens into nodes, dispatching tags to the engine's tag parsers.
pub struct Parser<'e> {
    engine: &'e Engine,
}

impl<'e> Parser<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    /// Parses a whole document.
    pub fn parse(&self, source: &str) -> Result<Template> {
        let mut stream = TokenStream::new(tokenize(source)?);
        let (nodes, _) = self.parse_nodes(&mut stream, None)?;
        Ok(Template::new(nodes))
    }

    /// Parses nodes until a tag named `sentinel` is reached.
    ///
    /// The sentinel itself is consumed and dropped. Returns `None` when the
    /// stream runs out before the sentinel shows up.
    pub fn parse_until(
        &self,
        stream: &mut TokenStream,
        sentinel: &str,
    ) -> Result<Option<Vec<Node>>> {
        let (nodes, closed) = self.parse_nodes(stream, Some(sentinel))?;
        Ok(closed.then_some(nodes))
    }

    fn parse_nodes(
        &self,
        stream: &mut TokenStream,
        sentinel: Option<&str>,
    ) -> Result<(Vec<Node>, bool)> {
        let mut nodes = Vec::new();
        while let Some(token) = stream.next_token() {
            let node = match token {
                Token::Text(text) => Node::Text(text),
                Token::Output { source, line } => {
                    self.engine.check_expression(&source)?;
                    Node::Output(OutputNode { source, line })
                }
                Token::Tag(tag) if Some(tag.name.as_str()) == sentinel => {
                    return Ok((nodes, true));
                }
                Token::Tag(tag) => {
                    let parser = self.engine.tag_parser(&tag.name).ok_or_else(|| {
                        Error::UnknownTag { name: tag.name.clone(), line: tag.line }
                    })?;
                    Node::Tag(parser.parse(tag, stream, self)?)
                }
            };
            nodes.push(node);
        }
        Ok((nodes, false))
    }
}
