// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Council net: a linear pipeline with no retry loop.
//!
//! ```text
//! prompt ─generate─▶ generated ─critique─▶ reviewed ─synthesize─▶ synthesized ─emit─▶ emitted
//! ```
//!
//! `emit` only fires when the synthesis has content. A blank synthesis leaves
//! the token in `synthesized` for good; the run result reports it as stalled.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::config::{AxiomConfig, NetKind};
use crate::engine::{PetriEngine, PlaceConfig, TransitionConfig};
use crate::errors::{ActionError, NetConfigError};
use crate::guards::critique::has_synthesis_content;
use crate::nets::places::{EMITTED, GENERATED, PROMPT, REVIEWED, SYNTHESIZED};
use crate::nets::transitions::{CRITIQUE, EMIT, GENERATE, SYNTHESIZE};
use crate::nets::{write_payload, WorkflowNet};
use crate::token::{CouncilSession, Token, TokenColor};
use crate::traits::action::single_input;
use crate::traits::{ActionOutput, CouncilAgent, FireContext, TransitionAction};

pub fn council_net(config: &AxiomConfig, council: Arc<dyn CouncilAgent>) -> Result<WorkflowNet, NetConfigError> {
    let mut engine = PetriEngine::new(&config.engine);

    engine.add_place(PlaceConfig::new(PROMPT).accepting([TokenColor::Prompt]).source())?;
    engine.add_place(PlaceConfig::new(GENERATED).accepting([TokenColor::Generated]))?;
    engine.add_place(PlaceConfig::new(REVIEWED).accepting([TokenColor::Reviewed]))?;
    engine.add_place(PlaceConfig::new(SYNTHESIZED).accepting([TokenColor::Synthesized]))?;
    engine.add_place(PlaceConfig::new(EMITTED).accepting([TokenColor::Emitted]).sink())?;

    let stages: [(&str, Stage, &str, &str); 3] = [
        (GENERATE, Stage::Generate, PROMPT, GENERATED),
        (CRITIQUE, Stage::Review, GENERATED, REVIEWED),
        (SYNTHESIZE, Stage::Synthesize, REVIEWED, SYNTHESIZED),
    ];
    for (id, stage, from, to) in stages {
        let action = CouncilAction {
            council: council.clone(),
            stage,
        };
        engine.add_transition(
            TransitionConfig::new(id, Arc::new(action))
                .from_places(&[from])
                .to_places(&[to]),
        )?;
    }

    engine.add_transition(
        TransitionConfig::new(EMIT, Arc::new(EmitAction))
            .from_places(&[SYNTHESIZED])
            .to_places(&[EMITTED])
            .guard(has_synthesis_content()),
    )?;

    Ok(WorkflowNet::new(
        NetKind::Council,
        engine,
        PROMPT,
        TokenColor::Prompt,
        vec![EMITTED],
        config.retry.max_retries,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Generate,
    Review,
    Synthesize,
}

/// Reads the session off a token. A bare string payload is taken as the prompt.
fn read_session(token: &Token) -> Result<CouncilSession, ActionError> {
    match &token.payload {
        Value::String(prompt) => Ok(CouncilSession::new(prompt.clone())),
        _ => CouncilSession::from_token(token).map_err(|source| ActionError::MalformedPayload {
            expected: "council session",
            source,
        }),
    }
}

/// One council stage; which one is decided by `stage`.
struct CouncilAction {
    council: Arc<dyn CouncilAgent>,
    stage: Stage,
}

#[async_trait]
impl TransitionAction for CouncilAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        let mut session = read_session(&token)?;

        let reason = match self.stage {
            Stage::Generate => {
                session.responses = self
                    .council
                    .generate(&session.prompt)
                    .await
                    .map_err(ActionError::Council)?;
                format!("{} member response(s) generated", session.responses.len())
            }
            Stage::Review => {
                session.reviews = self
                    .council
                    .critique(&session.responses)
                    .await
                    .map_err(ActionError::Council)?;
                format!("{} peer review(s) collected", session.reviews.len())
            }
            Stage::Synthesize => {
                let synthesis = self
                    .council
                    .synthesize(&session)
                    .await
                    .map_err(ActionError::Council)?;
                session.has_content = !synthesis.trim().is_empty();
                session.synthesis = Some(synthesis);
                if session.has_content {
                    "synthesis produced".to_string()
                } else {
                    "synthesis came back empty".to_string()
                }
            }
        };

        write_payload(&mut token, &session, "council session")?;
        token.color = self.color();
        Ok(ActionOutput::single(token).with_reason(reason))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![self.color()]
    }

    fn name(&self) -> &'static str {
        match self.stage {
            Stage::Generate => "council_generate",
            Stage::Review => "council_critique",
            Stage::Synthesize => "council_synthesize",
        }
    }
}

impl CouncilAction {
    fn color(&self) -> TokenColor {
        match self.stage {
            Stage::Generate => TokenColor::Generated,
            Stage::Review => TokenColor::Reviewed,
            Stage::Synthesize => TokenColor::Synthesized,
        }
    }
}

struct EmitAction;

#[async_trait]
impl TransitionAction for EmitAction {
    async fn execute(&self, inputs: Vec<Token>, _ctx: &FireContext) -> Result<ActionOutput, ActionError> {
        let mut token = single_input(inputs)?;
        token.color = TokenColor::Emitted;
        Ok(ActionOutput::single(token).with_reason("synthesis has content; emitted"))
    }

    fn emits(&self) -> Vec<TokenColor> {
        vec![TokenColor::Emitted]
    }

    fn name(&self) -> &'static str {
        "emit"
    }
}
