use futures::future::{FutureExt, LocalBoxFuture};
use log::debug;

use super::params::{parse_invocation, split_params};
use crate::error::{Error, Result};
use crate::renderer::Engine;
use crate::template::{Context, Parser, Scope, TagNode, TagParser, TagToken, TokenStream};

/// Parses `{% render "<name>"[, key: expr]... %}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvocationTag;

/// A call site of a registered macro.
#[derive(Debug)]
pub struct Invocation {
    pub target_name: String,
    /// Unsplit `key: expr` clauses; empty when the call binds nothing.
    pub raw_params: String,
    directive: String,
}

impl TagParser for InvocationTag {
    fn parse(
        &self,
        token: TagToken,
        _stream: &mut TokenStream,
        parser: &Parser<'_>,
    ) -> Result<Box<dyn TagNode>> {
        let directive = token.text();
        let syntax_error =
            |reason| Error::InvalidInvocationSyntax { directive: directive.clone(), reason };
        let args = parse_invocation(&token.args).map_err(syntax_error)?;
        if !args.raw_params.is_empty() {
            for param in split_params(&args.raw_params).map_err(syntax_error)? {
                parser.engine().check_expression(&param.expression)?;
            }
        }

        Ok(Box::new(Invocation {
            target_name: args.target_name,
            raw_params: args.raw_params,
            directive,
        }))
    }
}

impl Invocation {
    /// Evaluates every parameter against `ctx` into a new scope.
    async fn bind_params(&self, ctx: &Context, engine: &Engine) -> Result<Scope> {
        let params = split_params(&self.raw_params).map_err(|reason| {
            Error::InvalidInvocationSyntax { directive: self.directive.clone(), reason }
        })?;
        let mut scope = Scope::new();
        for param in params {
            let value = engine.evaluate(&param.expression, ctx).await?;
            scope.insert(param.key, value);
        }
        Ok(scope)
    }
}

impl TagNode for Invocation {
    fn render<'a>(
        &'a self,
        ctx: &'a mut Context,
        engine: &'a Engine,
        out: &'a mut String,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let body = engine
                .lookup_macro(&self.target_name)
                .ok_or_else(|| Error::UnknownMacro { name: self.target_name.clone() })?;

            let scope = if self.raw_params.is_empty() {
                None
            } else {
                Some(self.bind_params(ctx, engine).await?)
            };
            debug!(
                "Rendering template '{}' with {} parameter(s)",
                self.target_name,
                scope.as_ref().map_or(0, Scope::len)
            );

            let mut frame = ctx.enter(&self.target_name, scope)?;
            let rendered = engine.render_nodes(&body, &mut frame).await?;
            drop(frame);

            out.push_str(&rendered);
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

    fn render(source: &str, context: serde_json::Value) -> Result<String> {
        Engine::new().render(source, &context)
    }

    #[test]
    fn renders_body_in_place() {
        let out = render(
            "{% template row %}<li>{{ name }}</li>{% endtemplate %}<ul>{% render \"row\", name: 'A' %}{% render \"row\", name: 'B' %}</ul>",
            json!({}),
        )
        .unwrap();
        assert_eq!(out, "<ul><li>A</li><li>B</li></ul>");
    }

    #[test]
    fn params_are_evaluated_in_caller_context() {
        let out = render(
            "{% template line %}{{ line }} → {{ direction }}{% endtemplate %}{% render 'line', line: departures[0].line.name, direction: departures[0].direction | upper %}",
            json!({ "departures": [{ "line": { "name": "RE 1" }, "direction": "Hamburg" }] }),
        )
        .unwrap();
        assert_eq!(out, "RE 1 → HAMBURG");
    }

    #[test]
    fn params_do_not_see_each_other() {
        let out = render(
            "{% template pair %}{{ a }}/{{ b }}{% endtemplate %}{% render \"pair\", a: 1, b: a %}",
            json!({ "a": "outer" }),
        )
        .unwrap();
        assert_eq!(out, "1/outer");
    }

    #[test]
    fn unknown_macro() {
        let err = render("{% render \"missing\" %}", json!({})).unwrap_err();
        assert!(matches!(err, Error::UnknownMacro { ref name } if name == "missing"));
    }

    #[test]
    fn invalid_syntax_is_reported_at_parse_time() {
        let engine = Engine::new();
        let err = engine.parse("{% render missing %}").unwrap_err();
        assert!(matches!(err, Error::InvalidInvocationSyntax { .. }));

        let err = engine.parse("{% render \"row\", x = 1 %}").unwrap_err();
        assert!(matches!(err, Error::InvalidInvocationSyntax { .. }));
    }

    #[test]
    fn parameter_expression_errors_surface_at_parse_time() {
        let err = Engine::new().parse("{% render \"row\", x: 1 + %}").unwrap_err();
        assert!(matches!(err, Error::MinijinjaError(_)));
    }

    #[test]
    fn failed_body_render_restores_context() {
        let engine = Engine::new();
        let template = engine
            .parse("{% template broken %}{{ x }}{% render \"missing\" %}{% endtemplate %}")
            .unwrap();
        let mut ctx = Context::from_json(&json!({}));
        futures::executor::block_on(engine.render_nodes(template.nodes(), &mut ctx)).unwrap();

        let call = engine.parse("{% render \"broken\", x: 1 %}").unwrap();
        let err = futures::executor::block_on(engine.render_nodes(call.nodes(), &mut ctx))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMacro { .. }));
        assert_eq!(ctx.depth(), 1);
        assert_eq!(ctx.invocation_depth(), 0);
        assert!(ctx.get("x").is_none());
    }

    #[test]
    fn self_recursion_hits_depth_limit() {
        let err = render(
            "{% template forever %}.{% render \"forever\", n: 1 %}{% endtemplate %}{% render \"forever\" %}",
            json!({}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RecursionLimit { ref name, .. } if name == "forever"));
    }
}
