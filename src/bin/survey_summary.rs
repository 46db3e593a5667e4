//! Bird Survey Summary
//!
//! Loads a bird survey CSV (`date,site,species,count`) and prints row,
//! site and species counts plus statistics over the per-row tallies.
//!
//! Usage:
//!   cargo run --bin survey_summary -- data/bird_survey.csv

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use tidewatch::logging;
use tidewatch::survey::{load_survey, write_survey_report};

#[derive(Parser, Debug)]
#[command(name = "survey_summary", about = "Summarise a bird survey CSV")]
struct Cli {
    /// Survey CSV file
    #[arg(default_value = "data/bird_survey.csv", value_hint = ValueHint::FilePath)]
    path: PathBuf,

    /// Debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    println!("🐦 Bird Survey Summary");
    println!("======================\n");

    let data = load_survey(&cli.path).map_err(|e| format!("{}: {}", cli.path.display(), e))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_survey_report(&data, &mut out)?;
    out.flush()?;

    Ok(())
}
