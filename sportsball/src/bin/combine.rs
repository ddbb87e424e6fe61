use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use sportsball::file::{json_files, ReadJsonFile, WriteJsonFile};
use sportsball::frame::flatten::flatten;
use sportsball::identity::IdentityTables;
use sportsball::league::{CombinedLeague, ProviderGames};
use sportsball::model::League;
use sportsball::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// provider file, or directory to source provider files from
    #[clap(short = 'p', long = "provider")]
    providers: Vec<PathBuf>,

    /// league to combine
    #[clap(short = 'l', long, default_value = "afl")]
    league: League,

    /// team identity map
    #[clap(long)]
    teams: Option<PathBuf>,

    /// venue identity map
    #[clap(long)]
    venues: Option<PathBuf>,

    /// file to write the combined games to
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,

    /// file to write the flattened games to, in CSV form
    #[clap(short = 'f', long)]
    frame: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.providers.is_empty() {
            bail!("at least one provider must be specified");
        }
        if self.teams.is_some() != self.venues.is_some() {
            bail!("--teams and --venues must be specified together");
        }
        if self.teams.is_none() && self.league != League::Afl {
            bail!("identity maps must be specified for {}", self.league);
        }
        Ok(())
    }

    fn tables(&self) -> anyhow::Result<IdentityTables> {
        match (&self.teams, &self.venues) {
            (Some(teams), Some(venues)) => Ok(IdentityTables::read_json_files(teams, venues)?),
            _ => Ok(IdentityTables::afl()?),
        }
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

    let tables = args.tables()?;
    info!(
        "{} team and {} venue identities",
        tables.teams.len(),
        tables.venues.len()
    );

    let mut providers = vec![];
    for path in &args.providers {
        for file in json_files(path)? {
            let provider = ProviderGames::read_json_file(&file)?;
            info!(
                "read {} games from {} ({})",
                provider.games.len(),
                provider.provider,
                file.display()
            );
            providers.push(provider);
        }
    }

    let start_time = Instant::now();
    let combined = CombinedLeague::new(args.league, &tables).combine(providers);
    let elapsed = start_time.elapsed();

    let num_games = combined.len();
    let (merged, failures): (Vec<_>, Vec<_>) =
        combined.into_iter().partition(|game| game.result.is_ok());
    let games: Vec<_> = merged
        .into_iter()
        .filter_map(|game| game.result.ok())
        .collect();
    info!(
        "combined {num_games} games in {}s; {} failed",
        elapsed.as_millis() as f64 / 1_000.,
        failures.len()
    );
    if !failures.is_empty() {
        let table = print::tabulate_failures(&failures);
        info!("failures:\n{}", Console::default().render(&table));
    }

    if let Some(out) = &args.out {
        games.write_json_file(out)?;
        info!("wrote {} games to {}", games.len(), out.display());
    }
    if let Some(path) = &args.frame {
        let frame = flatten(&games);
        frame.write_csv(path)?;
        info!(
            "wrote {} rows and {} columns to {}",
            frame.rows(),
            frame.names().len(),
            path.display()
        );
    }
    Ok(())
}

