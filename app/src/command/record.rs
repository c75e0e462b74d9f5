use quickfill_config::Config;
use quickfill_core::EntityKind;

#[derive(Debug, Clone)]
pub struct RecordInput {
    pub kind: EntityKind,
    /// Final field values of the created record, as a JSON object.
    pub fields: String,
}

/// Records that a task or project was created with the given fields.
#[derive(Debug, Clone, Copy)]
pub struct RecordStrategy;

impl super::CommandStrategy for RecordStrategy {
    type Input = RecordInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let fields = super::parse_fields(Some(&input.fields))?;

        super::open_analytics(&config)?.track_field_creation(input.kind, &fields);
        println!("Recorded {} with {} fields.", input.kind, fields.len());
        Ok(())
    }
}
