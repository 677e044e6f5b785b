//! Generates a synthetic position file (and optionally a matching run profile) for smoke-testing
//! the similarity pipeline without dragging real scraped data around.

use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tinyrand::{Rand, StdRand};
use tracing::{debug, info};

use deviance::config::{CohortKey, Profile};
use deviance::csv::{CsvWriter, Record};
use deviance::file::WriteJsonFile;

const STATS: [&str; 4] = [
    "receiving_rec",
    "receiving_yds",
    "receiving_td",
    "receiving_1st",
];
const MISSING_RATE: u64 = 10; // roughly one cell in ten left blank

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to write the player-seasons to
    out: Option<PathBuf>,

    /// number of players to fabricate
    #[clap(short = 'n', long, default_value = "100")]
    players: usize,

    /// longest fabricated career, in seasons
    #[clap(short = 's', long, default_value = "8")]
    max_seasons: usize,

    /// also write a matching run profile
    #[clap(long)]
    profile_out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.out
            .as_ref()
            .ok_or(anyhow!("output file must be specified"))?;
        if self.players == 0 || self.max_seasons == 0 {
            return Err(anyhow!("players and max-seasons must be nonzero"));
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let mut rand = StdRand::default();
    let out = args.out.unwrap();
    let mut writer = CsvWriter::create(&out)?;

    let mut header = Record::with_capacity(STATS.len() + 2);
    header.set(0usize, "url");
    header.set(1usize, "years_exp");
    for (ordinal, stat) in STATS.iter().enumerate() {
        header.set(ordinal + 2, stat);
    }
    writer.append(header)?;

    let mut rows = 0;
    for player in 0..args.players {
        let career = 1 + (rand.next_u64() as usize % args.max_seasons);
        for years_exp in 0..career {
            let mut record = Record::with_capacity(STATS.len() + 2);
            record.set(0usize, format!("player-{player:04}"));
            record.set(1usize, years_exp);
            for ordinal in 0..STATS.len() {
                if rand.next_u64() % MISSING_RATE == 0 {
                    continue; // leave the cell blank
                }
                let value = (rand.next_u64() % 1_500) as f64 / 10.0;
                record.set(ordinal + 2, value);
            }
            writer.append(record)?;
            rows += 1;
        }
    }
    writer.flush()?;
    info!(
        "wrote {rows} seasons for {} players to {}",
        args.players,
        out.display()
    );

    if let Some(profile_out) = args.profile_out {
        let profile = Profile {
            player_column: String::from("url"),
            cohort_key: CohortKey::YearsExp,
            tracked: STATS.iter().map(ToString::to_string).collect(),
            zero_fill: vec![],
        };
        profile.write_json_file(&profile_out)?;
        info!("wrote profile to {}", profile_out.display());
    }

    Ok(())
}
