use clap::Parser;
use valuenet::board::Position;
use valuenet::config::DEFAULT_FEN;
use valuenet::encode;

#[derive(Parser, Debug)]
#[command(name = "valuenet-encode-fen", about = "Print the feature line for a position")]
struct Args {
    #[arg(long, default_value = DEFAULT_FEN)]
    fen: String,
    /// Also print the board
    #[arg(long)]
    board: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let pos = Position::from_fen(&a.fen)?;
    if a.board { eprintln!("{}\n", pos.diagram()); }
    println!("{}", encode(&pos)?);
    Ok(())
}
