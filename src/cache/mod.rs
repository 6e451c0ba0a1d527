mod multithreaded_cache;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{config::Config, parse::Schedules};

pub use multithreaded_cache::MultithreadedCache as Multithreaded;

/// The latest successful scrape of the hours page.
#[derive(Debug, Clone)]
pub struct HoursCache {
    /// `None` until the first scrape succeeds.
    cached_at: Option<DateTime<Utc>>,
    schedules: Schedules,
    refresh_interval: Duration,
}

impl HoursCache {
    #[must_use]
    pub fn empty(refresh_interval: Duration) -> Self {
        Self {
            cached_at: None,
            schedules: Schedules::default(),
            refresh_interval,
        }
    }

    #[inline]
    #[must_use]
    pub fn time_since_refresh(&self) -> Option<Duration> {
        self.cached_at
            .map(|cached_at| Utc::now().signed_duration_since(cached_at))
    }

    #[inline]
    #[must_use]
    pub fn time_until_refresh(&self) -> Duration {
        self.time_since_refresh()
            .map_or_else(Duration::zero, |since| self.refresh_interval - since)
    }

    #[inline]
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.time_since_refresh()
            .map_or(true, |since| since > self.refresh_interval)
    }

    #[inline]
    #[must_use]
    pub const fn schedules(&self) -> &Schedules {
        &self.schedules
    }

    pub async fn load(
        client: &reqwest::Client,
        config: &Config,
        today: NaiveDate,
    ) -> crate::Result<Self> {
        let schedules = Schedules::load(client, &config.hours_url, today).await?;
        if schedules.is_empty() {
            log::warn!("hours page at {} lists no restaurants", config.hours_url);
        }
        Ok(Self {
            cached_at: Some(Utc::now()),
            schedules,
            refresh_interval: config.refresh_interval,
        })
    }
}
