use quickfill_config::Config;
use quickfill_suggest::apply_template;

#[derive(Debug, Clone)]
pub struct ApplyInput {
    pub template: String,
    /// Current form values as a JSON object.
    pub fields: Option<String>,
    pub json: bool,
}

/// Merges a template into existing form values and prints the result.
#[derive(Debug, Clone, Copy)]
pub struct ApplyStrategy;

impl super::CommandStrategy for ApplyStrategy {
    type Input = ApplyInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let engine = super::build_engine(&config);
        let current = super::parse_fields(input.fields.as_deref())?;

        let Some(template) = engine.template(&input.template) else {
            anyhow::bail!(
                "Unknown template '{}'. Run 'quickfill templates' to list them.",
                input.template
            );
        };
        let merged = apply_template(template, &current);

        super::open_analytics(&config)?.track_template_usage(&template.name);

        if input.json {
            println!("{}", serde_json::to_string_pretty(&merged)?);
        } else {
            println!("{} {}:", template.icon, template.name);
            super::print_fields(&merged);
        }
        Ok(())
    }
}
