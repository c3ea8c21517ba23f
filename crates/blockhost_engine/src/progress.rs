use std::sync::mpsc;

use crate::EngineEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Overall job progress across `source_count` equally weighted sources.
///
/// Every value handed out is clamped to `[last reported, 1.0]`, so the
/// sequence is non-decreasing even when a server under-reports its size.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressAccumulator {
    source_count: usize,
    per_source: f64,
    completed_sources: usize,
    last_reported: f64,
}

impl ProgressAccumulator {
    pub fn new(source_count: usize) -> Self {
        let per_source = if source_count == 0 {
            1.0
        } else {
            1.0 / source_count as f64
        };
        Self {
            source_count,
            per_source,
            completed_sources: 0,
            last_reported: 0.0,
        }
    }

    /// Progress inside the current source. `None` when the total size is
    /// unknown or zero; only the boundary jump in `finish_source` applies then.
    pub fn within_source(&mut self, received: u64, total: Option<u64>) -> Option<f64> {
        let total = total.filter(|total| *total > 0)?;
        let fraction = (received as f64 / total as f64).min(1.0);
        Some(self.report(self.completed_boundary() + fraction * self.per_source))
    }

    /// Marks the current source done and returns the boundary it reached.
    pub fn finish_source(&mut self) -> f64 {
        self.completed_sources = (self.completed_sources + 1).min(self.source_count);
        self.report(self.completed_boundary())
    }

    pub fn last_reported(&self) -> f64 {
        self.last_reported
    }

    fn completed_boundary(&self) -> f64 {
        if self.completed_sources >= self.source_count {
            1.0
        } else {
            self.completed_sources as f64 * self.per_source
        }
    }

    fn report(&mut self, value: f64) -> f64 {
        self.last_reported = value.min(1.0).max(self.last_reported);
        self.last_reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_sources_end_exactly_at_one() {
        let mut acc = ProgressAccumulator::new(3);
        let mut last = 0.0;
        for _ in 0..3 {
            let value = acc.finish_source();
            assert!(value >= last);
            last = value;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn within_source_scales_by_allotment() {
        let mut acc = ProgressAccumulator::new(2);
        assert_eq!(acc.within_source(50, Some(100)), Some(0.25));
        assert_eq!(acc.finish_source(), 0.5);
        assert_eq!(acc.within_source(100, Some(100)), Some(1.0));
    }

    #[test]
    fn unknown_or_zero_total_skips_incremental_reports() {
        let mut acc = ProgressAccumulator::new(2);
        assert_eq!(acc.within_source(10, None), None);
        assert_eq!(acc.within_source(10, Some(0)), None);
        assert_eq!(acc.last_reported(), 0.0);
    }

    #[test]
    fn overshoot_is_clamped_to_the_source_allotment() {
        let mut acc = ProgressAccumulator::new(2);
        assert_eq!(acc.within_source(300, Some(100)), Some(0.5));
        assert_eq!(acc.finish_source(), 0.5);
    }
}
