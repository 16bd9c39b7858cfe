//! Consume posts, clean them and write them to CSV

use std::sync::Arc;

use tracing::info;

use crate::cli::output::*;
use crate::config::Goal;
use crate::ingest::JsonLinesSource;
use crate::pipeline::PostProcessor;
use crate::preprocessing::Normalizer;
use crate::services::ServiceClient;
use crate::sink::CsvSink;
use crate::AppConfig;
use crate::Result;

pub async fn handle_run_command(
    config: &AppConfig,
    goal: Option<Goal>,
    source: Option<String>,
    append: bool,
) -> Result<()> {
    let goal = goal.unwrap_or_else(|| config.goal());
    let source = source.unwrap_or_else(|| config.ingest.source.clone());

    let normalizer = Arc::new(Normalizer::from_config(&config.preprocessing)?);
    let client = Arc::new(ServiceClient::new(&config.services)?);
    let processor = PostProcessor::new(
        normalizer,
        Arc::clone(&client),
        client,
        config.source_lang(),
        goal,
    );

    let output = config.output_path(goal);
    let mut sink = if append {
        CsvSink::append(output)?
    } else {
        CsvSink::create(output)?
    };

    info!(
        "Goal {goal}, topic {} (group {}), source {source}",
        config.ingest.topic, config.ingest.group_id
    );
    print_info(&format!("Writing {goal} rows to {}", output.display()));

    let stats = if source == "-" {
        processor
            .run(&mut JsonLinesSource::stdin(), &mut sink)
            .await?
    } else {
        let mut file_source = JsonLinesSource::open(&source).await?;
        processor.run(&mut file_source, &mut sink).await?
    };

    print_run_stats(&stats);
    if stats.failed > 0 {
        print_warning(&format!("{} posts were skipped, see the log", stats.failed));
    } else {
        print_success(&format!("{} rows written", sink.rows_written()));
    }
    Ok(())
}
