// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The bundled workflow nets and the wrapper that runs one request through them.
//!
//! Each net is a fixed topology of places and transitions registered into its
//! own [`PetriEngine`]. The validation and critique nets carry a
//! [`GraphProposal`] payload through a bounded retry loop; the council net is a
//! linear pipeline over a [`CouncilSession`](crate::token::CouncilSession).
//!
//! ```no_run
//! use std::sync::Arc;
//! use axiom::backends::local::{FeedbackRegenerator, LogCommitter, StructuralValidator};
//! use axiom::config::AxiomConfig;
//! use axiom::nets::factory::{Collaborators, NetFactory};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let collaborators = Collaborators::default()
//!     .with_validator(Arc::new(StructuralValidator))
//!     .with_regenerator(Arc::new(FeedbackRegenerator))
//!     .with_committer(Arc::new(LogCommitter));
//! let mut net = NetFactory::from_config(&AxiomConfig::default(), collaborators)?;
//! let result = net.submit(serde_json::json!({"id": "req-1", "nodes": []})).await;
//! println!("{}", result.outcome.as_str());
//! # Ok(())
//! # }
//! ```

pub mod council;
pub mod critique;
pub mod factory;
pub mod validation;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::NetKind;
use crate::engine::events::{EngineEventKind, EventData};
use crate::engine::{PetriEngine, Place, RunResult};
use crate::errors::ActionError;
use crate::observability::messages::workflow::{TokenParked, WorkflowFinished};
use crate::observability::messages::StructuredLog;
use crate::token::{GraphProposal, Token, TokenColor};
use crate::traits::TokenStore;

/// Place ids shared by the bundled nets.
pub mod places {
    pub const PROPOSAL: &str = "proposal";
    pub const VALIDATED: &str = "validated";
    pub const VERIFIED: &str = "verified";
    pub const INVALID: &str = "invalid";
    pub const FEEDBACK: &str = "feedback";
    pub const CRITIQUED: &str = "critiqued";
    pub const COMMITTED: &str = "committed";
    pub const REJECTED: &str = "rejected";
    pub const ESCALATED: &str = "escalated";

    pub const PROMPT: &str = "prompt";
    pub const GENERATED: &str = "generated";
    pub const REVIEWED: &str = "reviewed";
    pub const SYNTHESIZED: &str = "synthesized";
    pub const EMITTED: &str = "emitted";
}

/// Transition ids shared by the bundled nets.
pub mod transitions {
    pub const VALIDATE: &str = "validate";
    pub const DECIDE: &str = "decide";
    pub const ACCEPT: &str = "accept";
    pub const PREPARE_RETRY: &str = "prepare_retry";
    pub const REJECT: &str = "reject";
    pub const REGENERATE: &str = "regenerate";

    pub const CRITIQUE: &str = "critique";
    pub const SKIP_CRITIQUE: &str = "skip_critique";
    pub const ACCEPT_ADJUSTED: &str = "accept_adjusted";
    pub const ESCALATE: &str = "escalate";
    pub const AUTO_REJECT: &str = "auto_reject";

    pub const GENERATE: &str = "generate";
    pub const SYNTHESIZE: &str = "synthesize";
    pub const EMIT: &str = "emit";
}

/// Priority of the success route out of a decision place.
pub const PRIORITY_ACCEPT: i32 = 20;
/// Priority of the retry route; loses to accept, beats reject.
pub const PRIORITY_RETRY: i32 = 15;
pub const PRIORITY_REJECT: i32 = 10;

/// A built net plus what is needed to run one request through it.
#[derive(Debug)]
pub struct WorkflowNet {
    kind: NetKind,
    engine: PetriEngine,
    source_place: &'static str,
    source_color: TokenColor,
    success_sinks: Vec<&'static str>,
    max_retries: u32,
    parked: Vec<Token>,
}

impl WorkflowNet {
    pub(crate) fn new(
        kind: NetKind,
        engine: PetriEngine,
        source_place: &'static str,
        source_color: TokenColor,
        success_sinks: Vec<&'static str>,
        max_retries: u32,
    ) -> Self {
        Self {
            kind,
            engine,
            source_place,
            source_color,
            success_sinks,
            max_retries,
            parked: Vec::new(),
        }
    }

    pub fn kind(&self) -> NetKind {
        self.kind
    }

    pub fn engine(&self) -> &PetriEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PetriEngine {
        &mut self.engine
    }

    /// Persist every placement in this net's engine to `store`.
    pub fn attach_store(&mut self, store: Arc<dyn TokenStore>) {
        self.engine.set_store(store);
    }

    /// Waits until every placement so far has reached the attached store.
    pub async fn flush(&self) {
        self.engine.flush().await;
    }

    pub fn source_place(&self) -> &str {
        self.source_place
    }

    pub fn success_sinks(&self) -> &[&'static str] {
        &self.success_sinks
    }

    /// Tokens of earlier requests that ended outside any sink (failed,
    /// stalled, inconclusive or stopped), oldest first. They keep the
    /// place they stopped in as `current_place`.
    pub fn parked(&self) -> &[Token] {
        &self.parked
    }

    /// Wraps `payload` in a fresh token and runs it to completion.
    ///
    /// A string `id` field on the payload becomes the correlation id.
    pub async fn submit(&mut self, payload: Value) -> RunResult {
        let correlation_id = payload.get("id").and_then(Value::as_str).map(str::to_string);
        let mut token = Token::new(payload, self.source_color).with_max_retries(self.max_retries);
        if let Some(id) = correlation_id {
            token = token.with_correlation_id(id);
        }
        self.submit_token(token).await
    }

    pub async fn submit_proposal(&mut self, proposal: &GraphProposal) -> Result<RunResult, serde_json::Error> {
        let token = Token::for_proposal(proposal)?.with_max_retries(self.max_retries);
        Ok(self.submit_token(token).await)
    }

    /// Places `token` at the source place, runs the engine and reports where
    /// the token came to rest.
    ///
    /// A token that does not reach a sink is withdrawn from the net and
    /// parked, so the next request starts from empty working places.
    pub async fn submit_token(&mut self, token: Token) -> RunResult {
        let token_id = token.id();
        let correlation_id = token.correlation_id().to_string();
        let steps_before = self.engine.step_count();

        let run = match self.engine.add_token(self.source_place, token) {
            Ok(_) => self.engine.run().await,
            Err(e) => Err(e),
        };

        let found = self.engine.find_token(token_id);
        let in_sink = found
            .and_then(|(place, _)| self.engine.place(place))
            .map_or(false, Place::is_sink);
        let result = RunResult::from_run(
            run.as_ref(),
            found.map(|(_, token)| token),
            in_sink,
            &self.success_sinks,
        );
        let result = match run {
            Ok(_) => result,
            Err(_) => result.with_steps(self.engine.step_count() - steps_before),
        };

        if !in_sink {
            self.park(token_id, &correlation_id, &result);
        }

        self.announce(&correlation_id, &result);
        result
    }

    fn park(&mut self, token_id: Uuid, correlation_id: &str, result: &RunResult) {
        if let Some(token) = self.engine.withdraw(token_id) {
            TokenParked {
                net: self.kind.as_str(),
                correlation_id,
                place: result.final_place.as_deref(),
                outcome: result.outcome.as_str(),
            }
            .log();
            self.parked.push(token);
        }
    }

    fn announce(&self, correlation_id: &str, result: &RunResult) {
        let kind = if result.success {
            EngineEventKind::WorkflowCompleted
        } else {
            EngineEventKind::WorkflowFailed
        };
        self.engine.events().emit(
            kind,
            EventData::Workflow {
                correlation_id: correlation_id.to_string(),
                final_place: result.final_place.clone(),
                outcome: result.outcome.as_str().to_string(),
            },
        );
        WorkflowFinished {
            net: self.kind.as_str(),
            correlation_id,
            success: result.success,
            outcome: result.outcome.as_str(),
            final_place: result.final_place.as_deref(),
            total_steps: result.total_steps,
        }
        .log();
    }
}

pub(crate) fn read_proposal(token: &Token) -> Result<GraphProposal, ActionError> {
    GraphProposal::from_token(token).map_err(|source| ActionError::MalformedPayload {
        expected: "graph proposal",
        source,
    })
}

/// Serializes `value` back onto the token's payload.
pub(crate) fn write_payload<T: Serialize>(
    token: &mut Token,
    value: &T,
    expected: &'static str,
) -> Result<(), ActionError> {
    let payload = serde_json::to_value(value)
        .map_err(|source| ActionError::MalformedPayload { expected, source })?;
    token.set_payload(payload);
    Ok(())
}
