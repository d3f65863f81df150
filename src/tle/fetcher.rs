//! TLE fetching functionality
//!
//! Resolution order for one fetch:
//! 1. disk cache, if written within the revalidation window
//! 2. upstream HTTP (written back to the cache on success)
//! 3. bundled local file
//!
//! If all three fail the fetch fails and the caller keeps whatever TLE it had.

use bevy::log::{info, warn};
use chrono::Utc;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use crate::config::TleSourceConfig;
use crate::tle::cache::{CachedTle, TleCache};
use crate::tle::parser::extract_tle_block;
use crate::tle::types::{FetchChannels, FetchCommand, FetchResultMsg, TleOrigin, TleSet};

/// HTTP-backed TLE source with disk cache and local fallback
pub struct HttpTleSource {
    client: reqwest::Client,
    config: TleSourceConfig,
    cache: Option<TleCache>,
}

impl HttpTleSource {
    /// Build a source using the platform cache directory when enabled.
    /// A cache that cannot be created is logged and skipped.
    pub fn new(config: TleSourceConfig) -> anyhow::Result<Self> {
        let cache = if config.use_disk_cache {
            match TleCache::new(config.cache_expiration_days, config.revalidate) {
                Ok(cache) => Some(cache),
                Err(e) => {
                    warn!("[TLE CACHE] disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Self::with_cache(config, cache)
    }

    pub fn with_cache(config: TleSourceConfig, cache: Option<TleCache>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            cache,
        })
    }

    pub fn config(&self) -> &TleSourceConfig {
        &self.config
    }

    pub async fn fetch(&self) -> anyhow::Result<(TleSet, TleOrigin)> {
        let norad = self.config.norad_id;
        let now = Utc::now();

        if let Some(cache) = &self.cache {
            match cache.read(norad) {
                Ok(Some(entry)) if cache.is_fresh(&entry, now) => {
                    info!("[TLE CACHE] norad={} hit, cached_at={}", norad, entry.cached_at);
                    return Ok((entry.to_tle(), TleOrigin::Cache));
                }
                Ok(_) => {}
                Err(e) => warn!("[TLE CACHE] norad={} unreadable: {}", norad, e),
            }
        }

        match self.fetch_upstream().await {
            Ok(tle) => {
                if let Some(cache) = &self.cache
                    && let Err(e) = cache.write(&CachedTle::from_tle(norad, &tle, now))
                {
                    warn!("[TLE CACHE] norad={} write failed: {}", norad, e);
                }
                return Ok((tle, TleOrigin::Upstream));
            }
            Err(e) => warn!("[TLE FETCH] upstream failed: {}", e),
        }

        match self.read_local_fallback() {
            Ok(tle) => Ok((tle, TleOrigin::LocalFallback)),
            Err(e) => {
                warn!(
                    "[TLE FETCH] local fallback {} failed: {}",
                    self.config.local_fallback_path.display(),
                    e
                );
                anyhow::bail!("TLE not available")
            }
        }
    }

    async fn fetch_upstream(&self) -> anyhow::Result<TleSet> {
        let url = &self.config.upstream_url;
        let resp = self
            .client
            .get(url)
            .header("accept", "text/plain")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} from {}", status, url);
        }
        let body = resp.text().await?;
        info!(
            "[TLE FETCH] status={} url={} bytes={}",
            status,
            url,
            body.len()
        );
        extract_tle_block(&body, self.config.norad_id)
    }

    fn read_local_fallback(&self) -> anyhow::Result<TleSet> {
        let body = std::fs::read_to_string(&self.config.local_fallback_path)?;
        extract_tle_block(&body, self.config.norad_id)
    }
}

/// Start the background TLE worker thread
pub fn start_tle_worker(source: HttpTleSource) -> FetchChannels {
    let (cmd_tx, cmd_rx) = mpsc::channel::<FetchCommand>();
    let (res_tx, res_rx) = mpsc::channel::<FetchResultMsg>();

    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
        rt.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    FetchCommand::Fetch => {
                        let msg = match source.fetch().await {
                            Ok((tle, origin)) => {
                                info!(
                                    "[TLE RESULT] norad={} SUCCESS origin={} epoch={}",
                                    source.config().norad_id,
                                    origin,
                                    tle.epoch_utc.to_rfc3339()
                                );
                                FetchResultMsg::Success { tle, origin }
                            }
                            Err(e) => {
                                warn!(
                                    "[TLE RESULT] norad={} FAILURE: {}",
                                    source.config().norad_id,
                                    e
                                );
                                FetchResultMsg::Failure {
                                    error: e.to_string(),
                                }
                            }
                        };
                        if res_tx.send(msg).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    });

    FetchChannels {
        cmd_tx,
        res_rx: Arc::new(Mutex::new(res_rx)),
    }
}
