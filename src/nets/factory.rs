// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{AxiomConfig, NetKind};
use crate::errors::NetConfigError;
use crate::nets::council::council_net;
use crate::nets::critique::critique_net;
use crate::nets::validation::validation_net;
use crate::nets::WorkflowNet;
use crate::traits::{Committer, CouncilAgent, CritiqueAgent, Regenerator, TokenStore, Validator};

/// External services a net may call. Each net kind needs a different subset.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub validator: Option<Arc<dyn Validator>>,
    pub regenerator: Option<Arc<dyn Regenerator>>,
    pub committer: Option<Arc<dyn Committer>>,
    pub critic: Option<Arc<dyn CritiqueAgent>>,
    pub council: Option<Arc<dyn CouncilAgent>>,
    pub store: Option<Arc<dyn TokenStore>>,
}

impl Collaborators {
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_regenerator(mut self, regenerator: Arc<dyn Regenerator>) -> Self {
        self.regenerator = Some(regenerator);
        self
    }

    pub fn with_committer(mut self, committer: Arc<dyn Committer>) -> Self {
        self.committer = Some(committer);
        self
    }

    pub fn with_critic(mut self, critic: Arc<dyn CritiqueAgent>) -> Self {
        self.critic = Some(critic);
        self
    }

    pub fn with_council(mut self, council: Arc<dyn CouncilAgent>) -> Self {
        self.council = Some(council);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }
}

fn require<T: ?Sized>(
    net: NetKind,
    slot: Option<Arc<T>>,
    collaborator: &'static str,
) -> Result<Arc<T>, NetConfigError> {
    slot.ok_or(NetConfigError::MissingCollaborator {
        net: net.as_str(),
        collaborator,
    })
}

/// Factory for building workflow nets from configuration
pub struct NetFactory;

impl NetFactory {
    /// Build the net named by `cfg.net`, failing if a collaborator it needs
    /// is missing.
    pub fn from_config(cfg: &AxiomConfig, collaborators: Collaborators) -> Result<WorkflowNet, NetConfigError> {
        let kind = cfg.net;
        let Collaborators {
            validator,
            regenerator,
            committer,
            critic,
            council,
            store,
        } = collaborators;

        let mut net = match kind {
            NetKind::Validation => validation_net(
                cfg,
                require(kind, validator, "validator")?,
                require(kind, regenerator, "regenerator")?,
                require(kind, committer, "committer")?,
            )?,
            NetKind::Critique => critique_net(
                cfg,
                require(kind, validator, "validator")?,
                require(kind, regenerator, "regenerator")?,
                require(kind, committer, "committer")?,
                require(kind, critic, "critique agent")?,
            )?,
            NetKind::Council => council_net(cfg, require(kind, council, "council agent")?)?,
        };

        if let Some(store) = store {
            net.attach_store(store);
        }
        Ok(net)
    }
}
