use std::ops::Deref;

use chrono::{Local, NaiveDate};
use futures_locks::{Mutex, RwLock};

use super::HoursCache;
use crate::config::Config;

/// Shares one [`HoursCache`] between request handlers and the refresh task.
#[derive(Debug)]
pub struct MultithreadedCache {
    cache: RwLock<HoursCache>,
    /// Held for the whole of a refresh so only one scrape runs at a time.
    refreshing: Mutex<()>,
    client: reqwest::Client,
    config: Config,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl MultithreadedCache {
    /// Starts out empty; nothing is scraped until the first refresh.
    pub fn new(client: reqwest::Client, config: Config) -> Self {
        Self {
            cache: RwLock::new(HoursCache::empty(config.refresh_interval)),
            refreshing: Mutex::new(()),
            client,
            config,
            today: local_today,
        }
    }

    /// Scrapes the hours page and replaces the cached schedules.
    /// On failure the previous schedules stay in place.
    pub async fn refresh(&self) -> crate::Result<()> {
        let _refreshing = self.refreshing.lock().await;
        self.replace_cache().await
    }

    /// Refreshes only if the cache is stale once any running refresh has finished.
    pub async fn maybe_refresh(&self) -> crate::Result<bool> {
        let _refreshing = self.refreshing.lock().await;
        if self.get().await.needs_refresh() {
            self.replace_cache().await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn replace_cache(&self) -> crate::Result<()> {
        // scrape before taking the write lock so readers are not blocked on the network
        let new_cache = HoursCache::load(&self.client, &self.config, (self.today)()).await?;
        log::info!("Refreshed hours of {} restaurants", new_cache.schedules().len());
        let mut guard = self.cache.write().await;
        *guard = new_cache;
        Ok(())
    }

    pub async fn get(&self) -> impl Deref<Target = HoursCache> + '_ {
        self.cache.read().await
    }

    /// Pins the date used to place the page's month/day headers in a year.
    #[cfg(test)]
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}
