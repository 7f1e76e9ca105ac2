use hdrhistogram::Histogram;

use crate::error::HarnessError;

const SIGNIFICANT_DIGITS: u8 = 3;

/// Millisecond latency distribution of successful requests.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, HarnessError> {
        let hist = Histogram::<u64>::new(SIGNIFICANT_DIGITS).map_err(|err| {
            HarnessError::Histogram {
                message: format!("Failed to create histogram: {}", err),
            }
        })?;
        Ok(Self { hist })
    }

    /// Records a latency in milliseconds. Zero is stored as one so fast
    /// responses still count.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency_ms: u64) -> Result<(), HarnessError> {
        let value = latency_ms.max(1);
        self.hist
            .record(value)
            .map_err(|err| HarnessError::Histogram {
                message: format!("Failed to record latency: {}", err),
            })
    }

    /// # Errors
    ///
    /// Returns an error if the merge fails.
    pub fn merge(&mut self, other: &LatencyHistogram) -> Result<(), HarnessError> {
        self.hist
            .add(&other.hist)
            .map_err(|err| HarnessError::Histogram {
                message: format!("Failed to merge histogram: {}", err),
            })
    }

    /// p50, p90 and p99, or zeros when nothing was recorded.
    #[must_use]
    pub fn percentiles(&self) -> (u64, u64, u64) {
        if self.count() == 0 {
            return (0, 0, 0);
        }
        (
            self.hist.value_at_quantile(0.5),
            self.hist.value_at_quantile(0.9),
            self.hist.value_at_quantile(0.99),
        )
    }

    #[must_use]
    pub fn min(&self) -> u64 {
        if self.count() == 0 { 0 } else { self.hist.min() }
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        self.hist.max()
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
