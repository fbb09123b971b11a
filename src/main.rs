use anyhow::Result;
use clap::Parser;
use desk_pet::config::Args;

fn main() -> Result<()> {
    desk_pet::app::run(Args::parse())
}
