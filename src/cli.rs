use clap::ValueHint;
use url::Url;

use std::path::PathBuf;

#[derive(clap::Parser, Debug, Clone, Default)]
#[command(version, about)]
pub struct Args {
    /// Path to the config file.
    ///
    /// By default, podfeed looks for a file named `podfeed.toml` in the following directories
    /// (in order):
    ///
    /// - `./` (the current directory)
    /// - `/etc`
    #[arg(
        short,
        long,
        env = "PODFEED_CONFIG",
        value_hint(ValueHint::FilePath)
    )]
    pub config_path: Option<PathBuf>,

    /// Address to bind the HTTP server to.
    #[arg(long, env = "PODFEED_BIND_ADDR")]
    pub bind_addr: Option<String>,

    /// Path the feed endpoint is served at.
    #[arg(long, env = "PODFEED_ENDPOINT")]
    pub endpoint: Option<String>,

    /// URL of the upstream podcast RSS feed.
    #[arg(long, env = "PODFEED_FEED_URL", value_hint(ValueHint::Url))]
    pub feed_url: Option<Url>,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
