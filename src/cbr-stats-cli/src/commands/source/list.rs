use serde::Serialize;

use super::CommandError;

#[derive(Serialize)]
struct Source {
    name: String,
    host: String,
    path: String,
    max_response_bytes: u64,
}

pub fn exec() -> Result<(), CommandError> {
    let sources = cbr_stats::FOREX_SOURCES
        .iter()
        .map(|source| -> Result<Source, url::ParseError> {
            let url = url::Url::parse(source.get_base_url())?;
            Ok(Source {
                name: source.to_string(),
                host: url.host_str().unwrap_or_default().to_string(),
                path: url.path().to_string(),
                max_response_bytes: source.max_response_bytes(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    println!("{}", serde_json::to_string_pretty(&sources)?);
    Ok(())
}
