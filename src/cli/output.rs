//! CLI output formatting utilities

use crate::pipeline::RunStats;
use crate::preprocessing::Stage;
use crate::preprocessing::Tables;
use crate::AppConfig;

/// Hide all but the last four characters of a secret
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}

/// Print the text after every normalization stage
pub fn print_stage_trace(input: &str, trace: &[(Stage, String)]) {
    println!("🧹 Normalizing: {input:?}");
    println!();
    for (idx, (stage, text)) in trace.iter().enumerate() {
        println!("  {:>2}. {:<20} {:?}", idx + 1, stage.name(), text);
    }
}

pub fn print_tables(tables: &Tables) {
    println!("📚 Preprocessing tables:");
    println!("  Emojis: {}", tables.emojis.len());
    println!("  Abbreviations: {}", tables.abbreviations.len());
    println!("  Stopwords: {}", tables.stopwords.len());
}

pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("📊 Run summary:");
    println!("  Processed: {}", stats.processed);
    println!("  Failed: {}", stats.failed);
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 sentiflow configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!("  Directory: {}", config.logging.directory);
    println!();

    println!("🧹 Preprocessing:");
    println!("  Emojis: {}", config.preprocessing.emojis_path.display());
    println!(
        "  Abbreviations: {}",
        config.preprocessing.abbreviations_path.display()
    );
    println!("  Stopwords: {}", config.preprocessing.stopwords_path.display());
    println!("  Table reload: {:?}", config.preprocessing.table_reload);
    println!("  Unknown emojis: {:?}", config.preprocessing.emoji_miss);
    println!();

    println!("🌐 Services:");
    println!("  Host: {}", config.services_host());
    println!("  Translator: {}", config.services.translator);
    println!(
        "  Translator key: {}",
        mask_secret(&config.services.translator_api_key)
    );
    println!("  ML tool: {}", config.services.ml_tool);
    println!("  ML tool key: {}", mask_secret(&config.services.ml_tool_api_key));
    println!("  Source language: {}", config.source_lang());
    println!("  Timeout: {}s", config.services.timeout_secs);
    println!();

    println!("📥 Ingest:");
    println!("  Goal: {}", config.goal());
    println!("  Topic: {}", config.ingest.topic);
    println!("  Group ID: {}", config.ingest.group_id);
    println!("  Source: {}", config.ingest.source);
    println!();

    println!("📤 Output:");
    println!("  Training CSV: {}", config.output.training_csv.display());
    println!("  Output CSV: {}", config.output.output_csv.display());
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}
