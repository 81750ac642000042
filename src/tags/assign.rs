use futures::future::{FutureExt, LocalBoxFuture};

use super::params::is_identifier;
use crate::error::{Error, Result};
use crate::renderer::Engine;
use crate::template::{Context, Parser, TagNode, TagParser, TagToken, TokenStream};

/// Parses `{% assign <name> = <expression> %}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignTag;

#[derive(Debug)]
pub struct Assign {
    pub name: String,
    pub expression: String,
}

impl TagParser for AssignTag {
    fn parse(
        &self,
        token: TagToken,
        _stream: &mut TokenStream,
        parser: &Parser<'_>,
    ) -> Result<Box<dyn TagNode>> {
        let (name, expression) = token
            .args
            .split_once('=')
            .map(|(name, expression)| (name.trim(), expression.trim()))
            .filter(|(name, expression)| is_identifier(name) && !expression.is_empty())
            .ok_or_else(|| Error::InvalidAssignSyntax { directive: token.text() })?;
        parser.engine().check_expression(expression)?;

        Ok(Box::new(Assign { name: name.to_string(), expression: expression.to_string() }))
    }
}

impl TagNode for Assign {
    fn render<'a>(
        &'a self,
        ctx: &'a mut Context,
        engine: &'a Engine,
        _out: &'a mut String,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let value = engine.evaluate(&self.expression, ctx).await?;
            ctx.set(self.name.as_str(), value);
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::TemplateRenderer;
    use serde_json::json;

    #[test]
    fn assigns_into_current_scope() {
        let out = Engine::new()
            .render("{% assign total = count * 2 %}{{ total }}", &json!({ "count": 4 }))
            .unwrap();
        assert_eq!(out, "8");
    }

    #[test]
    fn equality_operators_stay_in_expression() {
        let out = Engine::new()
            .render("{% assign same = 1 == 1 %}{{ same }}", &json!({}))
            .unwrap();
        assert_eq!(out, "true");
    }

    #[test]
    fn assignment_inside_invocation_scope_is_discarded() {
        let out = Engine::new()
            .render(
                "{% template row %}{% assign label = 'inner' %}{{ label }}{% endtemplate %}{% render \"row\", x: 1 %}|{{ label }}",
                &json!({ "label": "outer" }),
            )
            .unwrap();
        assert_eq!(out, "inner|outer");
    }

    #[test]
    fn malformed_assign() {
        let engine = Engine::new();
        for source in ["{% assign %}", "{% assign x %}", "{% assign = 1 %}", "{% assign x = %}"] {
            let err = engine.parse(source).unwrap_err();
            assert!(matches!(err, Error::InvalidAssignSyntax { .. }), "{source}");
        }
    }
}
