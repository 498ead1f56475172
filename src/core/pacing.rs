use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inclusive range of seconds a pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn sample(&self) -> Duration {
        let (low, high) = if self.min_secs <= self.max_secs {
            (self.min_secs, self.max_secs)
        } else {
            (self.max_secs, self.min_secs)
        };
        let low = low.max(0.0);
        let high = high.max(0.0);

        let secs = if high > low {
            rand::thread_rng().gen_range(low..=high)
        } else {
            low
        };
        Duration::from_secs_f64(secs)
    }
}

/// Delays applied around page loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacer {
    /// After navigation, before reading the page.
    pub page_settle: DelayRange,
    /// Between two visited rows.
    pub between_rows: DelayRange,
    /// After clicking "show more".
    pub expand: DelayRange,
    pub linkedin_timeout: Duration,
    pub site_timeout: Duration,
}

impl Pacer {
    pub fn for_details() -> Self {
        Self {
            page_settle: DelayRange::new(2.0, 4.0),
            between_rows: DelayRange::new(3.0, 6.0),
            expand: DelayRange::new(0.5, 0.5),
            linkedin_timeout: Duration::from_secs(10),
            site_timeout: Duration::from_secs(15),
        }
    }

    pub fn for_descriptions() -> Self {
        Self {
            between_rows: DelayRange::new(2.0, 4.0),
            ..Self::for_details()
        }
    }

    /// No pauses at all; page waits keep a short timeout.
    pub fn immediate() -> Self {
        Self {
            page_settle: DelayRange::zero(),
            between_rows: DelayRange::zero(),
            expand: DelayRange::zero(),
            linkedin_timeout: Duration::from_secs(1),
            site_timeout: Duration::from_secs(1),
        }
    }

    pub async fn settle(&self) {
        pause(self.page_settle.sample()).await;
    }

    pub async fn after_expand(&self) {
        pause(self.expand.sample()).await;
    }

    pub async fn between(&self) {
        let delay = self.between_rows.sample();
        if !delay.is_zero() {
            tracing::info!("⏳ Waiting {:.1}s before next request...", delay.as_secs_f64());
        }
        pause(delay).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_in_range() {
        let range = DelayRange::new(2.0, 4.0);
        for _ in 0..50 {
            let d = range.sample().as_secs_f64();
            assert!((2.0..=4.0).contains(&d), "{} out of range", d);
        }
    }

    #[test]
    fn test_sample_handles_swapped_and_negative_bounds() {
        let swapped = DelayRange::new(1.0, 0.5).sample().as_secs_f64();
        assert!((0.5..=1.0).contains(&swapped));
        assert_eq!(DelayRange::new(-3.0, -1.0).sample(), Duration::ZERO);
        assert_eq!(DelayRange::zero().sample(), Duration::ZERO);
    }

    #[test]
    fn test_immediate_pacer_does_not_sleep() {
        let pacer = Pacer::immediate();
        let start = std::time::Instant::now();
        tokio_test::block_on(async {
            pacer.settle().await;
            pacer.after_expand().await;
            pacer.between().await;
        });
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
