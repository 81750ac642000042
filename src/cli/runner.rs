use crate::{
    cli::Args,
    constants::STDIN_INDICATOR,
    error::Result,
    ioutils::{
        parse_string_to_json, read_context_file, read_from, read_template, write_file,
        ContextMap,
    },
    partials::Partials,
    renderer::{Engine, TemplateRenderer},
};

/// Main CLI runner that orchestrates loading, preprocessing and rendering
pub struct Runner {
    args: Args,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Executes the complete render workflow
    pub fn run(self) -> Result<()> {
        let rendered = self.render()?;

        match &self.args.output {
            Some(output) => {
                write_file(&rendered, output)?;
                log::info!("Rendered {} to {}", self.args.template.display(), output.display());
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }

    /// Renders the template and returns the output
    pub fn render(&self) -> Result<String> {
        let template = read_template(&self.args.template)?;
        let partials = self.load_partials()?;
        let source = partials.resolve(&template)?;
        let context = self.collect_context()?;

        // One engine per render keeps macro definitions from leaking between runs.
        let engine = Engine::new();
        let rendered = engine.render(&source, &serde_json::Value::Object(context))?;
        log::debug!("Registered templates: {:?}", engine.macro_names());
        Ok(rendered)
    }

    /// Loads partials from the configured directory, if any
    fn load_partials(&self) -> Result<Partials> {
        match &self.args.partials {
            Some(dir) => {
                let partials = Partials::from_dir(dir, &self.args.partial_globs)?;
                log::debug!("Loaded {} partial(s) from {}", partials.len(), dir.display());
                Ok(partials)
            }
            None => Ok(Partials::new()),
        }
    }

    /// Collects the context from the context file and the `--context` argument
    fn collect_context(&self) -> Result<ContextMap> {
        let mut context = match &self.args.context_file {
            Some(path) => read_context_file(path)?,
            None => ContextMap::new(),
        };

        if let Some(inline) = &self.args.context {
            let buf = if inline == STDIN_INDICATOR {
                read_from(std::io::stdin())?
            } else {
                inline.clone()
            };
            context.extend(parse_string_to_json(&buf)?);
        }

        Ok(context)
    }
}

/// Main entry point for CLI execution
pub fn run(args: Args) -> Result<()> {
    let runner = Runner::new(args);
    runner.run()
}
