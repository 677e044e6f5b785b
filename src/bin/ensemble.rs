use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing::{debug, info};

use deviance::ensemble;
use deviance::ensemble::ScoreGrid;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// similarity-matrix CSVs to combine
    files: Vec<PathBuf>,

    /// file to write the combined matrix to
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.files.len() < 2 {
            return Err(anyhow!("at least two matrix files must be specified"));
        }
        self.out
            .as_ref()
            .ok_or(anyhow!("output file must be specified"))?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let mut grids = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let grid = ScoreGrid::read_csv(file)?;
        info!("read {} players from {}", grid.players.len(), file.display());
        grids.push(grid);
    }

    let combined = ensemble::average(&grids)?;
    let out = args.out.unwrap();
    combined.write_csv(&out)?;
    info!(
        "wrote combined matrix of {} players to {}",
        combined.players.len(),
        out.display()
    );

    Ok(())
}
