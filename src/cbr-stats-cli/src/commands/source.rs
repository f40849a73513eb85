pub mod list;

use clap::{Parser, Subcommand};

use super::CommandError;

#[derive(Debug, Parser)]
#[command(name = "source")]
pub struct SourceCommand {
    #[command(subcommand)]
    pub subcommand: SubCommand,
}

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// Prints every known feed source as JSON.
    List,
}

pub fn dispatch(cmd: SourceCommand) -> Result<(), CommandError> {
    match cmd.subcommand {
        SubCommand::List => list::exec(),
    }
}
