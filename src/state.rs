use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::fetch::Fetcher;

#[derive(Clone)]
pub struct State {
    pub cfg: Arc<Config>,
    pub fetcher: Arc<Fetcher>,
}

impl State {
    pub fn new(cfg: Config) -> Result<Self> {
        let fetcher = Arc::new(Fetcher::new(cfg.feed_url.clone())?);
        let cfg = Arc::new(cfg);

        Ok(State { cfg, fetcher })
    }
}
