//! Single-text normalization handler

use crate::cli::output::*;
use crate::preprocessing::Normalizer;
use crate::AppConfig;
use crate::Result;

pub fn handle_clean_command(config: &AppConfig, text: &str, explain: bool) -> Result<()> {
    let normalizer = Normalizer::from_config(&config.preprocessing)?;

    if explain {
        let trace = normalizer.transform_traced(text);
        print_stage_trace(text, &trace);
        return Ok(());
    }

    println!("{}", normalizer.transform(text));
    Ok(())
}
