use quickfill_config::Config;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct TemplatesInput {
    /// When set, list only templates matching this text, best first.
    pub text: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplatesStrategy;

impl super::CommandStrategy for TemplatesStrategy {
    type Input = TemplatesInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let engine = super::build_engine(&config);

        let rows: Vec<(&str, &str, String, f64)> = match &input.text {
            Some(text) => engine
                .suggested_templates(text)
                .into_iter()
                .map(|m| {
                    (
                        m.template.icon.as_str(),
                        m.template.name.as_str(),
                        m.template.entity.to_string(),
                        m.score,
                    )
                })
                .collect(),
            None => engine
                .templates()
                .iter()
                .map(|t| (t.icon.as_str(), t.name.as_str(), t.entity.to_string(), 0.0))
                .collect(),
        };

        if input.json {
            let out: Vec<_> = rows
                .iter()
                .map(|(icon, name, entity, score)| {
                    json!({"name": name, "icon": icon, "entity": entity, "score": score})
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No matching templates.");
        }
        for (icon, name, entity, score) in rows {
            if input.text.is_some() {
                println!("{icon} {name:<20} {entity:<8} {:>3.0}%", score * 100.0);
            } else {
                println!("{icon} {name:<20} {entity}");
            }
        }
        Ok(())
    }
}
