// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::engine::events::{EngineEventKind, EventBus, EventData};
use crate::observability::messages::{engine::EngineStateChanged, StructuredLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Default)]
struct ControlFlags {
    running: AtomicBool,
    paused: AtomicBool,
    stop_requested: AtomicBool,
    step: AtomicU64,
    wake: Notify,
}

/// Cloneable handle for steering an engine from another task.
///
/// Requests take effect at the next step boundary; a fire already in
/// progress always completes.
#[derive(Debug, Clone)]
pub struct EngineControl {
    flags: Arc<ControlFlags>,
    events: EventBus,
}

impl EngineControl {
    pub(crate) fn new(events: EventBus) -> Self {
        Self {
            flags: Arc::new(ControlFlags::default()),
            events,
        }
    }

    pub fn state(&self) -> EngineState {
        if !self.flags.running.load(Ordering::SeqCst) {
            EngineState::Stopped
        } else if self.is_paused() {
            EngineState::Paused
        } else {
            EngineState::Running
        }
    }

    pub fn is_paused(&self) -> bool {
        self.flags.paused.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        if !self.flags.paused.swap(true, Ordering::SeqCst) {
            self.announce(EngineEventKind::EnginePaused, "paused");
        }
    }

    pub fn resume(&self) {
        if self.flags.paused.swap(false, Ordering::SeqCst) {
            self.flags.wake.notify_one();
            self.announce(EngineEventKind::EngineResumed, "resumed");
        }
    }

    /// Ask a running loop to halt before its next step.
    pub fn stop(&self) {
        self.flags.stop_requested.store(true, Ordering::SeqCst);
        self.flags.wake.notify_one();
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.flags.stop_requested.load(Ordering::SeqCst)
    }

    pub(crate) fn begin_run(&self) {
        self.flags.stop_requested.store(false, Ordering::SeqCst);
        self.flags.running.store(true, Ordering::SeqCst);
    }

    pub(crate) fn end_run(&self) {
        self.flags.running.store(false, Ordering::SeqCst);
        self.flags.stop_requested.store(false, Ordering::SeqCst);
    }

    pub(crate) fn set_step(&self, step: u64) {
        self.flags.step.store(step, Ordering::SeqCst);
    }

    /// Parks the caller until resumed or stopped.
    pub(crate) async fn wait_while_paused(&self) {
        // notify_one keeps a permit, so a resume landing between the check
        // and the await is not lost.
        while self.is_paused() && !self.stop_requested() {
            self.flags.wake.notified().await;
        }
    }

    fn announce(&self, kind: EngineEventKind, action: &str) {
        let step = self.flags.step.load(Ordering::SeqCst);
        EngineStateChanged { action, step }.log();
        self.events.emit(kind, EventData::Engine { step, detail: None });
    }
}
