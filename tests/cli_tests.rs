#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use test_log::test;
    use trmnl_liquid::cli::{run, Args, Runner};
    use trmnl_liquid::Error;

    fn args(template: &str) -> Args {
        Args {
            template: PathBuf::from(template),
            context: None,
            context_file: None,
            partials: None,
            partial_globs: Vec::new(),
            output: None,
            verbose: 0,
        }
    }

    fn fixture_args(context_file: &str) -> Args {
        Args {
            context_file: Some(PathBuf::from(context_file)),
            partials: Some(PathBuf::from("tests/templates/views")),
            ..args("tests/templates/views/trmnl.liquid")
        }
    }

    fn expected(name: &str) -> String {
        fs::read_to_string(Path::new("tests/expected").join(name)).unwrap()
    }

    #[test]
    fn test_renders_layout_with_partials_and_json_context() {
        let rendered = Runner::new(fixture_args("tests/templates/context.json"))
            .render()
            .unwrap();
        assert_eq!(rendered, expected("trmnl.html"));
    }

    #[test]
    fn test_renders_layout_with_yaml_context() {
        let rendered = Runner::new(fixture_args("tests/templates/context.yaml"))
            .render()
            .unwrap();
        assert_eq!(rendered, expected("trmnl.html"));
    }

    #[test]
    fn test_inline_context_overrides_file() {
        let args = Args {
            context: Some(r#"{"realtimeDataUpdatedAt": "14:01"}"#.to_string()),
            ..fixture_args("tests/templates/context.json")
        };
        let rendered = Runner::new(args).render().unwrap();
        assert!(rendered.contains("<p>2 departures, 14:01</p>"));
    }

    #[test]
    fn test_partial_glob_restricts_includes() {
        let args = Args {
            partial_globs: vec!["partials/full.liquid".to_string()],
            ..fixture_args("tests/templates/context.json")
        };
        // The shared include is left as written, and `include` is not a tag.
        let err = Runner::new(args).render().unwrap_err();
        assert!(matches!(err, Error::UnknownTag { ref name, line: 1 } if name == "include"));
    }

    #[test]
    fn test_writes_output_file() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("out").join("trmnl.html");
        let args = Args {
            output: Some(output.clone()),
            ..fixture_args("tests/templates/context.json")
        };
        run(args).unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), expected("trmnl.html"));
    }

    #[test]
    fn test_template_without_partials_or_context() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("plain.liquid");
        fs::write(
            &template,
            "{% template hi %}Hello {{ who | default('there') }}{% endtemplate %}{% render 'hi' %}",
        )
        .unwrap();
        let rendered = Runner::new(args(template.to_str().unwrap())).render().unwrap();
        assert_eq!(rendered, "Hello there");
    }

    #[test]
    fn test_missing_template_file() {
        let err = Runner::new(args("tests/templates/does-not-exist.liquid"))
            .render()
            .unwrap_err();
        assert!(matches!(err, Error::TemplateDoesNotExistsError { .. }));
    }

    #[test]
    fn test_invalid_inline_context() {
        let args = Args {
            context: Some("{not json".to_string()),
            ..args("tests/templates/views/partials/shared.liquid")
        };
        let err = Runner::new(args).render().unwrap_err();
        assert!(matches!(err, Error::JsonError(_)));
    }
}
