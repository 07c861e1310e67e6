use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use valuenet::config::Settings;
use valuenet::inference;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate one position with a trained value network", long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model checkpoint (overrides settings)
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Position to evaluate (overrides settings)
    #[arg(long)]
    fen: Option<String>,

    /// UCI engine for the reference score
    #[arg(long)]
    engine: Option<PathBuf>,

    #[arg(long)]
    engine_depth: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings::load_or_default(args.config.as_deref())?.inference;
    if let Some(c) = args.checkpoint { settings.checkpoint = c; }
    if let Some(f) = args.fen { settings.fen = f; }
    if let Some(e) = args.engine { settings.engine = Some(e); }
    if let Some(d) = args.engine_depth { settings.engine_depth = d; }

    let pred = inference::run(&settings)
        .with_context(|| format!("evaluating {:?} with {}", settings.fen, settings.checkpoint.display()))?;

    println!("{}", pred.diagram);
    println!("Expected value: {}", pred.expected);
    println!("Predicted value: {}", pred.predicted);
    Ok(())
}
