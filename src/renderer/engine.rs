use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::executor::block_on;
use futures::future::{FutureExt, LocalBoxFuture};
use minijinja::{Environment, Value};

use super::filters::*;
use super::interface::TemplateRenderer;
use crate::error::Result;
use crate::tags::{register_builtin_tags, MacroRegistry};
use crate::template::{Context, Node, Parser, TagParser, Template};

/// Liquid-style template engine with reusable template macros.
///
/// Expressions and filters are evaluated by MiniJinja; the block structure
/// (`{% tag %}`, `{{ output }}`) is handled by registered tag parsers.
///
/// An engine owns the registry that `{% template %}` blocks write into, so
/// macros defined in one render stay visible to every later render on the
/// same engine. Create a fresh engine for each independent render.
pub struct Engine {
    /// MiniJinja environment used for expressions and filters
    env: Environment<'static>,
    tags: HashMap<String, Box<dyn TagParser>>,
    macros: RefCell<MacroRegistry>,
}

impl Engine {
    /// Creates a new engine with the built-in tags and filters installed.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_filter("parse_json", parse_json);
        env.add_filter("camel_case", to_camel_case);
        env.add_filter("kebab_case", to_kebab_case);
        env.add_filter("pascal_case", to_pascal_case);
        env.add_filter("screaming_snake_case", to_screaming_snake_case);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("table_case", to_table_case);
        env.add_filter("train_case", to_train_case);
        env.add_filter("plural", to_plural);
        env.add_filter("singular", to_singular);
        env.add_filter("foreign_key", to_foreign_key);
        env.add_filter("regex", regex_filter);

        let mut engine = Self { env, tags: HashMap::new(), macros: RefCell::default() };
        register_builtin_tags(&mut engine);
        engine
    }

    /// Installs a tag; a later registration under the same name replaces it.
    pub fn register_tag(&mut self, name: impl Into<String>, parser: impl TagParser + 'static) {
        self.tags.insert(name.into(), Box::new(parser));
    }

    pub fn tag_parser(&self, name: &str) -> Option<&dyn TagParser> {
        self.tags.get(name).map(|parser| parser.as_ref())
    }

    /// Gives access to the MiniJinja environment, e.g. to add filters.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    pub fn parse(&self, source: &str) -> Result<Template> {
        Parser::new(self).parse(source)
    }

    /// Renders a parsed template with a fresh context built from `context`.
    pub async fn render_template(
        &self,
        template: &Template,
        context: &serde_json::Value,
    ) -> Result<String> {
        let mut ctx = Context::from_json(context);
        self.render_nodes(template.nodes(), &mut ctx).await
    }

    pub async fn parse_and_render(
        &self,
        source: &str,
        context: &serde_json::Value,
    ) -> Result<String> {
        let template = self.parse(source)?;
        self.render_template(&template, context).await
    }

    /// Renders `nodes` in order against `ctx`.
    pub fn render_nodes<'a>(
        &'a self,
        nodes: &'a [Node],
        ctx: &'a mut Context,
    ) -> LocalBoxFuture<'a, Result<String>> {
        async move {
            let mut out = String::new();
            for node in nodes {
                match node {
                    Node::Text(text) => out.push_str(text),
                    Node::Output(output) => {
                        let value = self.evaluate(&output.source, ctx).await?;
                        out.push_str(&to_output(&value));
                    }
                    Node::Tag(tag) => tag.render(ctx, self, &mut out).await?,
                }
            }
            Ok(out)
        }
        .boxed_local()
    }

    /// Evaluates an expression against the current scope stack.
    pub fn evaluate<'a>(
        &'a self,
        source: &'a str,
        ctx: &'a Context,
    ) -> LocalBoxFuture<'a, Result<Value>> {
        async move {
            let expr = self.env.compile_expression(source)?;
            Ok(expr.eval(ctx.to_value())?)
        }
        .boxed_local()
    }

    /// Compiles an expression without evaluating it, to report syntax errors at parse time.
    pub fn check_expression(&self, source: &str) -> Result<()> {
        self.env.compile_expression(source)?;
        Ok(())
    }

    /// Stores `body` under `name`, replacing any previous macro of that name.
    pub fn register_macro(&self, name: &str, body: Rc<[Node]>) {
        self.macros.borrow_mut().insert(name, body);
    }

    pub fn lookup_macro(&self, name: &str) -> Option<Rc<[Node]>> {
        self.macros.borrow().body(name)
    }

    /// Names of the macros registered so far, sorted.
    pub fn macro_names(&self) -> Vec<String> {
        self.macros.borrow().names()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for Engine {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        block_on(self.parse_and_render(template, context))
    }

    fn evaluate_expression(
        &self,
        expr: &str,
        context: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let ctx = Context::from_json(context);
        let value = block_on(self.evaluate(expr, &ctx))?;
        Ok(serde_json::to_value(&value)?)
    }
}

/// Text emitted for a value; `none` and undefined print nothing.
fn to_output(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        String::new()
    } else {
        value.to_string()
    }
}
