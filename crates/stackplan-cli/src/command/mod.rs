use clap::{Parser, Subcommand};

use self::{plan::PlanArg, selfplay::SelfPlayArg};

mod plan;
mod selfplay;
mod weights;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Plan the current piece of an engine snapshot
    Plan(#[clap(flatten)] PlanArg),
    /// Learn rotations and plan against a built-in emulator
    #[command(name = "selfplay")]
    SelfPlay(#[clap(flatten)] SelfPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Plan(arg) => plan::run(&arg)?,
        Mode::SelfPlay(arg) => selfplay::run(&arg)?,
    }
    Ok(())
}
