//! Liquid-style block layer the macro tags plug into
//!
//! - `lexer`: splits source into text, output and tag tokens
//! - `parser`: turns tokens into nodes, handing tags to their parse hooks
//! - `node`: the node tree and the tag hook traits
//! - `context`: the scope stack used while rendering

pub mod context;
pub mod lexer;
pub mod node;
pub mod parser;

pub use context::{Context, Frame, Scope};
pub use lexer::{TagToken, Token};
pub use node::{Node, OutputNode, TagNode, TagParser, Template};
pub use parser::{Parser, TokenStream};
