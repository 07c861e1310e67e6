use clap::Parser;
use std::path::PathBuf;
use valuenet::model::ValueNet;

#[derive(Parser, Debug)]
#[command(name = "valuenet-create-model", about = "Write a seeded random value-network checkpoint")]
struct Args {
    #[arg(long, default_value = "model_checkpoint.bin")]
    out: PathBuf,
    #[arg(long, default_value_t = 64)]
    hidden: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let net = ValueNet::random(a.hidden, a.seed);
    net.save(&a.out)?;
    println!("Wrote {} (input {}, hidden {}, seed {})", a.out.display(), net.meta.input_dim, a.hidden, a.seed);
    Ok(())
}
