use clap::Subcommand;

pub mod report;
pub mod source;

/// The error returned by a failed command.
pub type CommandError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collects the rates of the trailing window and prints the statistics.
    Report(report::ReportCommand),
    /// Used to retrieve feed source information.
    Source(source::SourceCommand),
}

pub async fn dispatch(command: Command) -> Result<(), CommandError> {
    match command {
        Command::Report(cmd) => report::exec(cmd).await,
        Command::Source(cmd) => source::dispatch(cmd),
    }
}
