//! Information display handlers (tables, config)

use crate::cli::output::*;
use crate::preprocessing::Tables;
use crate::AppConfig;
use crate::Result;

pub fn handle_tables_command(config: &AppConfig) -> Result<()> {
    let tables = Tables::load(&config.preprocessing)?;
    print_tables(&tables);

    if tables.emojis.is_empty() {
        print_warning("Emoji table is empty, every emoji will fall back to the miss policy");
    }
    Ok(())
}

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
