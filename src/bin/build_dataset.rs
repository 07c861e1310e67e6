use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use valuenet::config::Settings;
use valuenet::dataset::{BuildOutcome, DatasetBuilder};

#[derive(Parser, Debug)]
#[command(name = "valuenet-build-dataset", about = "Encode every ply of a PGN file into a feature dataset")]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input PGN (overrides settings)
    #[arg(long)]
    pgn: Option<PathBuf>,
    /// Output dataset (overrides settings); skipped if it exists
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    progress_every: Option<usize>,
    /// Show a spinner on stderr
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let a = Args::parse();
    let mut settings = Settings::load_or_default(a.config.as_deref())?.dataset;
    if let Some(p) = a.pgn { settings.pgn = p; }
    if let Some(o) = a.out { settings.output = o; }
    if let Some(n) = a.progress_every { settings.progress_every = n; }

    let mut builder = DatasetBuilder::new(&settings.output).progress_every(settings.progress_every);
    if a.progress {
        let bar = ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {human_pos} positions @ {per_sec}")?,
        );
        builder = builder.with_progress_bar(bar);
    }

    match builder.build_pgn(&settings.pgn).context("building dataset")? {
        BuildOutcome::Skipped => eprintln!("{} exists, nothing to do", settings.output.display()),
        BuildOutcome::Written { games, positions } => eprintln!("Wrote {} positions from {} games", positions, games),
    }
    Ok(())
}
