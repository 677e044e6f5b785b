use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::anyhow;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Cell, Col, Row, Table};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use deviance::cohort::CohortStatsSet;
use deviance::config::{Position, Profile};
use deviance::data::Frame;
use deviance::deviance::transform;
use deviance::file::ReadJsonFile;
use deviance::similarity::{Aggregate, SimilarityMatrix};

const TOP_SUBSET: usize = 25;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// position file to read the player-seasons from
    data: Option<PathBuf>,

    /// run profile (JSON)
    #[clap(short = 'p', long)]
    profile: Option<PathBuf>,

    /// position group, used to name the output files
    #[clap(short = 'g', long, value_parser = parse_position)]
    position: Position,

    /// directory to write the similarity matrices into
    #[clap(short = 'o', long, default_value = ".")]
    out: PathBuf,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.data
            .as_ref()
            .ok_or(anyhow!("position file must be specified"))?;
        self.profile
            .as_ref()
            .ok_or(anyhow!("profile must be specified"))?;
        Ok(())
    }
}
fn parse_position(s: &str) -> anyhow::Result<Position> {
    use std::str::FromStr;
    Position::from_str(&s.to_uppercase()).map_err(|_| anyhow!("unsupported position {s}"))
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

    let profile = Profile::read_json_file(args.profile.unwrap())?;
    profile.validate()?;
    debug!("profile: {profile:?}");

    let start_time = Instant::now();
    let frame = Frame::load(args.data.unwrap(), &profile)?;
    info!(
        "loaded {} seasons, tracking {} statistics",
        frame.seasons.len(),
        frame.stats.len()
    );

    let stats = CohortStatsSet::build(&frame);
    info!("computed baselines for {} cohorts", stats.len());

    let vectors = transform(&frame, &stats)?;
    let matrix = SimilarityMatrix::aggregate(&vectors)?;
    let elapsed = start_time.elapsed();
    info!(
        "scored {} players in {}s",
        matrix.players.len(),
        elapsed.as_millis() as f64 / 1_000.
    );

    for aggregate in Aggregate::iter() {
        let filename = args
            .position
            .similarity_filename(profile.cohort_key, aggregate);
        let path = args.out.join(filename);
        matrix.write_csv(aggregate, &path)?;
        info!("wrote {aggregate} matrix to {}", path.display());
    }

    let top_pairs = find_top_pairs(&matrix, TOP_SUBSET);
    info!(
        "most similar pairs:\n{}",
        Console::default().render(&tabulate_top_pairs(&top_pairs))
    );

    Ok(())
}

struct TopPair {
    a: String,
    b: String,
    mean: f64,
    median: f64,
}

fn find_top_pairs(matrix: &SimilarityMatrix, limit: usize) -> Vec<TopPair> {
    let mut pairs = vec![];
    let ids = matrix.players.ids();
    for (a, id_a) in ids.iter().enumerate() {
        for id_b in &ids[a + 1..] {
            if let Some(mean) = matrix.entry(id_a, id_b, Aggregate::Mean) {
                let median = matrix
                    .entry(id_a, id_b, Aggregate::Median)
                    .unwrap_or(mean);
                pairs.push(TopPair {
                    a: id_a.clone(),
                    b: id_b.clone(),
                    mean,
                    median,
                });
            }
        }
    }
    pairs.sort_by(|x, y| y.mean.total_cmp(&x.mean));
    pairs.truncate(limit);
    pairs
}

fn tabulate_top_pairs(pairs: &[TopPair]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(6))),
            Col::new(Styles::default().with(MinWidth(30))),
            Col::new(Styles::default().with(MinWidth(30))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(12))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Rank".into(),
                "Player A".into(),
                "Player B".into(),
                "Mean".into(),
                "Median".into(),
            ],
        ));
    table.push_rows(pairs.iter().enumerate().map(|(index, pair)| {
        Row::new(
            Styles::default(),
            vec![
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{}", index + 1).into(),
                ),
                Cell::new(Styles::default(), pair.a.clone().into()),
                Cell::new(Styles::default(), pair.b.clone().into()),
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{:.3}", pair.mean).into(),
                ),
                Cell::new(
                    Styles::default().with(HAlign::Right),
                    format!("{:.3}", pair.median).into(),
                ),
            ],
        )
    }));
    table
}
