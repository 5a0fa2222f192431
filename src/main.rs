use anyhow::Result;

use torneos_etl::config::Config;
use torneos_etl::{logging, pipeline};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init_logging();

    let config = Config::from_env()?;
    let summary = pipeline::run(&config)?;

    println!("Season ETL complete");
    println!("Source dir: {}", config.source_dir.display());
    println!("Files loaded: {}", summary.source_files.len());
    for file in &summary.source_files {
        println!(" - {file}");
    }
    let counts = &summary.counts;
    println!(
        "Rows: combined={} finalized={} whitelisted={}",
        counts.combined, counts.finalized, counts.whitelisted
    );
    println!(
        "Tables: matches={} players={} teams={} tournaments={} events={}",
        counts.matches, counts.players, counts.teams, counts.tournaments, counts.events
    );
    for path in &summary.outputs {
        println!("Wrote {}", path.display());
    }
    println!("{}", summary.to_json()?);

    Ok(())
}
