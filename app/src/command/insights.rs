use quickfill_analytics::RecommendationKind;
use quickfill_config::Config;

#[derive(Debug, Clone, Copy)]
pub struct InsightsInput {
    pub json: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct InsightsStrategy;

impl super::CommandStrategy for InsightsStrategy {
    type Input = InsightsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let insights = super::open_analytics(&config)?.productivity_insights();

        if input.json {
            println!("{}", serde_json::to_string_pretty(&insights)?);
            return Ok(());
        }

        println!("=== quickfill Insights ===\n");
        println!(
            "Analyses: {} ({} with suggestions, {:.1}% accuracy)",
            insights.total_analyses, insights.successful_analyses, insights.accuracy
        );
        println!(
            "Created: {} tasks, {} projects",
            insights.tasks_created, insights.projects_created
        );
        if let Some(category) = &insights.favourite_category {
            println!("Favourite category: {category}");
        }
        if let Some(area) = &insights.favourite_life_area {
            println!("Favourite life area: {area}");
        }
        if let Some(hours) = insights.average_duration {
            println!("Average duration: {hours:.1}h");
        }
        if let Some(budget) = insights.average_budget {
            println!("Average budget: ${budget:.0}");
        }

        for (title, entries) in [
            ("Top patterns", &insights.top_patterns),
            ("Top templates", &insights.top_templates),
            ("Top tags", &insights.top_tags),
        ] {
            if entries.is_empty() {
                continue;
            }
            println!("\n{title}:");
            for entry in entries {
                println!("  {:<24} {}", entry.value, entry.count);
            }
        }

        println!("\nRecommendations:");
        for rec in &insights.recommendations {
            let marker = match rec.kind {
                RecommendationKind::Info => "ℹ️",
                RecommendationKind::Improvement => "📈",
                RecommendationKind::Success => "✅",
                RecommendationKind::Suggestion => "💡",
            };
            println!("  {marker} {}: {}", rec.title, rec.message);
        }
        Ok(())
    }
}
