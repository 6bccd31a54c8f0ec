// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

use crate::token::TokenColor;

/// Errors raised while wiring places and transitions into an engine.
///
/// These are setup-time failures only: a net that registers cleanly never
/// produces one of these once it starts running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetConfigError {
    /// A place with this id is already registered
    #[error("Duplicate place id: '{place_id}'")]
    DuplicatePlace { place_id: String },

    /// A transition with this id is already registered
    #[error("Duplicate transition id: '{transition_id}'")]
    DuplicateTransition { transition_id: String },

    /// A transition references a place that was never registered
    #[error("Transition '{transition_id}' references unknown place '{place_id}'")]
    UnknownPlace {
        transition_id: String,
        place_id: String,
    },

    /// A transition has no input places at all
    #[error("Transition '{transition_id}' declares no input places")]
    NoInputs { transition_id: String },

    /// Sink places never release tokens, so they cannot feed a transition
    #[error("Transition '{transition_id}' uses sink place '{place_id}' as an input")]
    SinkAsInput {
        transition_id: String,
        place_id: String,
    },

    /// The action can emit a color that no output place accepts
    #[error("Transition '{transition_id}' can emit {color:?} but no output place accepts it")]
    UnroutableColor {
        transition_id: String,
        color: TokenColor,
    },

    /// The action can emit a color that more than one output place accepts
    #[error(
        "Transition '{transition_id}' routes {color:?} ambiguously to [{}]",
        .candidates.join(", ")
    )]
    AmbiguousRoute {
        transition_id: String,
        color: TokenColor,
        candidates: Vec<String>,
    },

    /// The requested net needs a collaborator that was not supplied
    #[error("The {net} net requires a {collaborator}")]
    MissingCollaborator {
        net: &'static str,
        collaborator: &'static str,
    },
}

/// Errors raised while loading or validating an `AxiomConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// One or more values are out of range; every violation is listed
    #[error("Configuration validation failed:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),
}
