// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineStats {
    pub tokens_processed: u64,
    pub transitions_fired: u64,
    #[serde(skip)]
    total_fire_duration: Duration,
}

impl EngineStats {
    pub(crate) fn record_token(&mut self) {
        self.tokens_processed += 1;
    }

    pub(crate) fn record_fire(&mut self, duration: Duration) {
        self.transitions_fired += 1;
        self.total_fire_duration += duration;
    }

    pub fn average_fire_duration(&self) -> Duration {
        if self.transitions_fired == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.total_fire_duration.as_secs_f64() / self.transitions_fired as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_fire_duration() {
        let mut stats = EngineStats::default();
        assert_eq!(stats.average_fire_duration(), Duration::ZERO);

        stats.record_fire(Duration::from_millis(10));
        stats.record_fire(Duration::from_millis(30));
        assert_eq!(stats.transitions_fired, 2);
        let average = stats.average_fire_duration().as_secs_f64();
        assert!((average - 0.020).abs() < 1e-6, "average {}", average);
    }

    #[test]
    fn test_average_survives_counts_beyond_u32() {
        let fired = u64::from(u32::MAX) + 2;
        let stats = EngineStats {
            tokens_processed: 0,
            transitions_fired: fired,
            total_fire_duration: Duration::from_secs(fired),
        };
        let average = stats.average_fire_duration().as_secs_f64();
        assert!((average - 1.0).abs() < 1e-6, "average {}", average);
    }
}
