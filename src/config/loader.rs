// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::consts::*;
use crate::config::validate_config;
use crate::errors::ConfigError;

/// Top-level configuration for an AXIOM deployment.
///
/// Every section is optional; anything left out takes the defaults from
/// [`crate::config::consts`].
///
/// # Example
/// ```yaml
/// net: critique
/// engine:
///   max_steps: 200
/// retry:
///   max_retries: 2
/// critique:
///   trigger:
///     min_confidence: 0.9
///     sensitive_categories: [medical, legal]
///   routing:
///     survival_threshold: 0.75
/// store:
///   retention_days: 7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxiomConfig {
    pub net: NetKind,
    pub engine: EngineSection,
    pub retry: RetrySection,
    pub critique: CritiqueSection,
    pub store: StoreSection,
}

/// Which bundled workflow net to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetKind {
    #[default]
    Validation,
    Critique,
    Council,
}

impl NetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetKind::Validation => "validation",
            NetKind::Critique => "critique",
            NetKind::Council => "council",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub max_steps: u64,
    pub event_capacity: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub max_retries: u32,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CritiqueSection {
    pub trigger: TriggerConfig,
    pub routing: RoutingConfig,
}

/// When a verified proposal gets an adversarial critique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub min_confidence: f64,
    pub min_structure_size: usize,
    pub sensitive_categories: Vec<String>,
    pub sample_rate: f64,
    pub confidence_floor: f64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_structure_size: DEFAULT_MIN_STRUCTURE_SIZE,
            sensitive_categories: Vec::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
        }
    }
}

/// Survival-score bands after critique: accept at or above `survival_threshold`,
/// reject below `rejection_threshold`, escalate in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub survival_threshold: f64,
    pub rejection_threshold: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            survival_threshold: DEFAULT_SURVIVAL_THRESHOLD,
            rejection_threshold: DEFAULT_REJECTION_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub retention_days: u32,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AxiomConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: AxiomConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a config from a YAML file and check its value ranges.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<AxiomConfig, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(errors) = validate_config(&cfg) {
        return Err(ConfigError::Invalid(errors));
    }

    Ok(cfg)
}
