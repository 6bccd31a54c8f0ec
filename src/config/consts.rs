// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Retries a token gets before the reject route takes it
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Step ceiling for a single `run()`
pub const DEFAULT_MAX_STEPS: u64 = 100;
/// Buffered events per subscriber before lagging receivers drop the oldest
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Max item confidence at or above which critique always runs
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.85;
/// Max item confidence below which critique is skipped and the token escalated
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.3;
/// Node plus edge count at or above which critique runs
pub const DEFAULT_MIN_STRUCTURE_SIZE: usize = 10;
/// Fraction of otherwise-unselected proposals sent to critique
pub const DEFAULT_SAMPLE_RATE: f64 = 0.1;

pub const DEFAULT_SURVIVAL_THRESHOLD: f64 = 0.7;
pub const DEFAULT_REJECTION_THRESHOLD: f64 = 0.4;

pub const DEFAULT_RETENTION_DAYS: u32 = 30;

// Counter-argument severity weights for the survival score
pub const MAJOR_WEIGHT: f64 = 0.5;
pub const MODERATE_WEIGHT: f64 = 0.3;
pub const MINOR_WEIGHT: f64 = 0.2;
