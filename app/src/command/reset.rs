use quickfill_config::Config;

/// Zeroes the stored usage counters.
#[derive(Debug, Clone, Copy)]
pub struct ResetStrategy;

impl super::CommandStrategy for ResetStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        super::open_analytics(&config)?.reset();
        println!("Analytics reset.");
        Ok(())
    }
}
