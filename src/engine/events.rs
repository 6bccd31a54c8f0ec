// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine event vocabulary and the broadcast bus observers subscribe to.
//!
//! Events are immutable snapshots. Sending never blocks the engine; a slow
//! subscriber that falls more than the channel capacity behind skips ahead.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineEventKind {
    TokenCreated,
    TokenMoved,
    TransitionFired,
    TransitionBlocked,
    EngineStarted,
    EnginePaused,
    EngineResumed,
    EngineStopped,
    EngineStep,
    EngineMaxSteps,
    WorkflowCompleted,
    WorkflowFailed,
    CritiqueStarted,
    CritiqueCompleted,
    CritiqueSkipped,
    CritiqueEscalated,
    CritiqueRejected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventData {
    Token {
        token_id: Uuid,
        place_id: String,
        from_place: Option<String>,
    },
    Transition {
        transition_id: String,
        step: u64,
        detail: String,
    },
    Engine {
        step: u64,
        detail: Option<String>,
    },
    Workflow {
        correlation_id: String,
        final_place: Option<String>,
        outcome: String,
    },
    Critique {
        token_id: Uuid,
        survival_score: Option<f64>,
        detail: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineEvent {
    pub kind: EngineEventKind,
    pub timestamp: DateTime<Utc>,
    pub data: EventData,
}

/// Cloneable sending side shared by the engine, its control handle and actions.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn emit(&self, kind: EngineEventKind, data: EventData) {
        // No subscribers is not an error.
        let _ = self.sender.send(EngineEvent {
            kind,
            timestamp: Utc::now(),
            data,
        });
    }

    /// Every event from now on.
    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            receiver: self.sender.subscribe(),
            filter: None,
        }
    }

    /// Only events of `kind` from now on.
    pub fn subscribe_to(&self, kind: EngineEventKind) -> EventSubscription {
        EventSubscription {
            receiver: self.sender.subscribe(),
            filter: Some(kind),
        }
    }
}

pub struct EventSubscription {
    receiver: broadcast::Receiver<EngineEvent>,
    filter: Option<EngineEventKind>,
}

impl EventSubscription {
    fn wants(&self, event: &EngineEvent) -> bool {
        self.filter.map_or(true, |k| k == event.kind)
    }

    /// Next matching event; `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<EngineEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event already buffered, without waiting.
    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Everything matching that is already buffered.
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
