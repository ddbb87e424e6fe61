use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use sportsball::feature::{process_all, Config, Feature, SeasonStartFeature, SkillFeature};
use sportsball::file::ReadJsonFile;
use sportsball::frame::Frame;
use sportsball::print;
use sportsball::skill::{extract_fixtures, SkillEngine, Window};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the flattened games from
    input: PathBuf,

    /// feature configuration, in JSON form
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// file to write the games and their features to, in CSV form
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,

    /// number of teams to print
    #[clap(short = 't', long, default_value = "10")]
    top: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.top == 0 {
            bail!("at least one team must be printed");
        }
        Ok(())
    }
}

fn widest(windows: &[Window]) -> Window {
    windows
        .iter()
        .copied()
        .max_by_key(|window| match window {
            Window::All => u32::MAX,
            Window::Years(years) => *years,
        })
        .unwrap_or(Window::All)
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

    let config = match &args.config {
        Some(path) => Config::read_json_file(path)?,
        None => Config::default(),
    };
    debug!("config: {config:?}");
    let skill = SkillFeature::try_from(config)?;

    let frame = Frame::read_csv(&args.input)?;
    info!(
        "read {} rows and {} columns",
        frame.rows(),
        frame.names().len()
    );

    let window = widest(&skill.config().windows);
    let fixtures = extract_fixtures(&frame);
    let standings = SkillEngine::new(skill.model(), window).standings(&fixtures);
    let top = &standings[..usize::min(args.top, standings.len())];
    let table = print::tabulate_ratings(top);
    info!(
        "top teams over window {window}:\n{}",
        Console::default().render(&table)
    );

    let start_time = Instant::now();
    let features: Vec<Box<dyn Feature>> = vec![Box::new(skill), Box::new(SeasonStartFeature)];
    let frame = process_all(&features, frame)?;
    let elapsed = start_time.elapsed();
    info!(
        "assembled {} columns over {} games in {}s",
        frame.names().len(),
        fixtures.len(),
        elapsed.as_millis() as f64 / 1_000.
    );

    if let Some(out) = &args.out {
        frame.write_csv(out)?;
        info!("wrote {} rows to {}", frame.rows(), out.display());
    }
    Ok(())
}
