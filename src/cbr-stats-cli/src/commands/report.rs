use cbr_stats::{CentralBankOfRussia, Forex, LiveEnvironment, OutputFormat, SetupError};
use clap::Parser;

use super::CommandError;

const DATE_PLACEHOLDER: &str = "DATE";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// One line per currency.
    #[default]
    Text,
    /// Pretty printed JSON.
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    /// How to print the statistics.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Overrides the feed URL template. `DATE` is replaced with the requested day.
    #[arg(long, env = "CBR_STATS_BASE_URL")]
    pub base_url: Option<String>,
}

pub async fn exec(cmd: ReportCommand) -> Result<(), CommandError> {
    if let Some(base_url) = &cmd.base_url {
        if !base_url.contains(DATE_PLACEHOLDER) {
            return Err(SetupError::MissingDatePlaceholder(base_url.clone()).into());
        }
    }

    let env = LiveEnvironment::new()?;
    let source = Forex::CentralBankOfRussia(CentralBankOfRussia);
    let report = cbr_stats::run(&env, &source, cmd.base_url.as_deref()).await;

    print!("{}", report.render(cmd.format.into())?);
    if cmd.format == Format::Json {
        println!();
    }
    Ok(())
}
