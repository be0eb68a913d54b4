use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use overlapper::cli::Args;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    args.execute()
}
