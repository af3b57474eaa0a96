use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::encode::Compression;
use crate::feed::MalformedItemPolicy;

const DEFAULT_FEED_URL: &str = "https://anchor.fm/s/49f0c604/podcast/rss";

fn default_bind_addr() -> String {
    Config::default().bind_addr
}

fn default_endpoint() -> String {
    Config::default().endpoint
}

fn default_feed_url() -> Url {
    Config::default().feed_url
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_feed_url")]
    pub feed_url: Url,

    #[serde(default)]
    pub on_malformed_item: MalformedItemPolicy,

    #[serde(default)]
    pub compression: Compression,
}

impl Config {
    pub fn update(&mut self, args: crate::cli::Args) {
        fn set_if_some<T>(dst: &mut T, v: Option<T>) {
            if let Some(v) = v {
                *dst = v;
            }
        }

        set_if_some(&mut self.bind_addr, args.bind_addr);
        set_if_some(&mut self.endpoint, args.endpoint);
        set_if_some(&mut self.feed_url, args.feed_url);
    }

    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with('/') {
            bail!(
                "the endpoint `{}` must be an absolute path starting with `/`",
                self.endpoint
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1:20655".into(),
            endpoint: "/api".into(),
            feed_url: Url::parse(DEFAULT_FEED_URL).expect("the default feed URL is valid"),
            on_malformed_item: Default::default(),
            compression: Default::default(),
        }
    }
}

pub fn load(search_paths: &[PathBuf]) -> Result<Config> {
    for path in search_paths {
        debug!("Trying to load {}", path.display());
        let mut contents = String::new();

        {
            let mut f = match File::open(path) {
                Ok(f) => f,

                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(file = %path.display(), "File not found, skipping");
                    continue;
                }

                Err(e) => {
                    return Err(e)
                        .context(anyhow!("could not load a config file `{}`", path.display()));
                }
            };

            f.read_to_string(&mut contents).with_context(|| {
                anyhow!(
                    "could not read the contents of a config file `{}`",
                    path.display()
                )
            })?;
        }

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| anyhow!("could not load the config file `{}`", path.display()))?;

        info!("Loaded a config file `{}`", path.display());

        return Ok(cfg);
    }

    info!("Using the default config");

    Ok(Default::default())
}
