//! store-import CLI - loads scraped stores from JSON into SQLite

use clap::Parser;
use store_import::config::load_config;
use store_import::ui::{self, Icons};
use store_import::Importer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "store-import")]
#[command(version)]
#[command(about = "Import scraped store records from JSON into a SQLite table")]
#[command(long_about = r#"
Runs every phase, in order, on each invocation:
  1. create the stores table and the unique index on url
  2. report NULL/empty and duplicate urls
  3. insert every entry of the input JSON array, skipping bad or duplicate ones
  4. report NULL/empty and duplicate urls again
  5. print every stored row

Defaults: database stores.db, table stores, input final_scrape_21.json.
There are no options. The only way to change these names is an optional
store-import.toml in the working directory with any of the keys
database, table and input.
"#)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::new("info"))
        .init();

    let config = load_config(None)?;
    ui::status(Icons::DATABASE, "Database", &config.database.display().to_string());

    let importer = Importer::new(config)?;
    let report = importer.run()?;

    if let Some(summary) = report.import.summary() {
        tracing::info!(
            "done: {} inserted, {} skipped, {} rows stored",
            summary.inserted,
            summary.skipped(),
            report.rows.len()
        );
    } else {
        tracing::info!("done without loading input; {} rows stored", report.rows.len());
    }
    Ok(())
}
