// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The net interpreter: owns places and transitions and runs the step loop.
//!
//! Steps are strictly sequential. While an action awaits external work no
//! other transition of this engine fires; separate engines are independent.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::config::EngineSection;
use crate::engine::arbitration::{Arbiter, Candidate};
use crate::engine::control::{EngineControl, EngineState};
use crate::engine::events::{EngineEventKind, EventBus, EventData, EventSubscription};
use crate::engine::persistence::Persister;
use crate::engine::place::{Place, PlaceConfig, PlaceSnapshot};
use crate::engine::run_result::{HaltReason, RunSummary};
use crate::engine::stats::EngineStats;
use crate::engine::transition::{Transition, TransitionConfig};
use crate::errors::{ExecutionError, NetConfigError};
use crate::observability::messages::engine::{
    EngineStateChanged, RunCompleted, RunFailed, RunStarted, StepLimitReached,
};
use crate::observability::messages::transition::{
    TokenPlaced, TransitionBlocked, TransitionFailed, TransitionFired,
};
use crate::observability::messages::StructuredLog;
use crate::token::{Token, TransitionRecord};
use crate::traits::{FireContext, TokenStore};

pub struct PetriEngine {
    places: HashMap<String, Place>,
    place_order: Vec<String>,
    transitions: Vec<Transition>,
    persister: Option<Persister>,
    events: EventBus,
    control: EngineControl,
    stats: EngineStats,
    step_count: u64,
    max_steps: u64,
}

impl PetriEngine {
    pub fn new(options: &EngineSection) -> Self {
        let events = EventBus::new(options.event_capacity);
        Self {
            places: HashMap::new(),
            place_order: Vec::new(),
            transitions: Vec::new(),
            persister: None,
            control: EngineControl::new(events.clone()),
            events,
            stats: EngineStats::default(),
            step_count: 0,
            max_steps: options.max_steps,
        }
    }

    /// Every placement is saved to `store` in the background, in placement
    /// order.
    pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.set_store(store);
        self
    }

    pub fn set_store(&mut self, store: Arc<dyn TokenStore>) {
        self.persister = Some(Persister::new(store));
    }

    /// Waits until every placement made so far has reached the store.
    pub async fn flush(&self) {
        if let Some(persister) = &self.persister {
            persister.flush().await;
        }
    }

    // --- topology -------------------------------------------------------

    pub fn add_place(&mut self, config: PlaceConfig) -> Result<(), NetConfigError> {
        if self.places.contains_key(&config.id) {
            return Err(NetConfigError::DuplicatePlace { place_id: config.id });
        }
        self.place_order.push(config.id.clone());
        self.places.insert(config.id.clone(), Place::new(config));
        Ok(())
    }

    /// Registers a transition after checking its places exist and that every
    /// color its action emits routes to exactly one output place.
    pub fn add_transition(&mut self, config: TransitionConfig) -> Result<(), NetConfigError> {
        if self.transitions.iter().any(|t| t.id() == config.id) {
            return Err(NetConfigError::DuplicateTransition {
                transition_id: config.id,
            });
        }
        let transition = Transition::build(config, &self.places)?;
        self.transitions.push(transition);
        Ok(())
    }

    pub fn place(&self, id: &str) -> Option<&Place> {
        self.places.get(id)
    }

    /// Places in registration order.
    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.place_order.iter().filter_map(|id| self.places.get(id))
    }

    pub fn transition(&self, id: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id() == id)
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    // --- tokens ---------------------------------------------------------

    /// Places a new token, records it and persists it in the background.
    pub fn add_token(&mut self, place_id: &str, mut token: Token) -> Result<Uuid, ExecutionError> {
        let place = self
            .places
            .get(place_id)
            .ok_or_else(|| ExecutionError::UnknownPlace(place_id.to_string()))?;

        if !place.can_accept(&token) {
            return Err(ExecutionError::TokenRejected {
                place_id: place_id.to_string(),
                token_id: token.id().to_string(),
                color: token.color,
            });
        }

        token.move_to(place_id);
        let id = token.id();
        self.persist(&token);
        self.events.emit(
            EngineEventKind::TokenCreated,
            EventData::Token {
                token_id: id,
                place_id: place_id.to_string(),
                from_place: None,
            },
        );
        TokenPlaced {
            token_id: id,
            place_id,
            color: token.color.as_str(),
        }
        .log();

        let place = self
            .places
            .get_mut(place_id)
            .ok_or_else(|| ExecutionError::UnknownPlace(place_id.to_string()))?;
        if let Err(refused) = place.try_push(token) {
            return Err(ExecutionError::TokenRejected {
                place_id: place_id.to_string(),
                token_id: refused.id().to_string(),
                color: refused.color,
            });
        }
        self.stats.record_token();
        Ok(id)
    }

    /// The token with `id` and the place holding it.
    pub fn find_token(&self, id: Uuid) -> Option<(&str, &Token)> {
        self.places()
            .find_map(|p| p.tokens().find(|t| t.id() == id).map(|t| (p.id(), t)))
    }

    /// Takes the token with `id` out of whichever non-sink place holds it.
    /// Tokens resting in sinks stay where they are.
    pub fn withdraw(&mut self, id: Uuid) -> Option<Token> {
        self.places.values_mut().find_map(|p| p.remove(id))
    }

    pub fn tokens_by_correlation(&self, correlation_id: &str) -> Vec<&Token> {
        self.places()
            .flat_map(|p| p.tokens())
            .filter(|t| t.correlation_id() == correlation_id)
            .collect()
    }

    pub fn snapshot(&self) -> Vec<PlaceSnapshot> {
        self.places().map(Place::snapshot).collect()
    }

    // --- execution ------------------------------------------------------

    /// Ids of enabled transitions in the order arbitration would pick them.
    pub fn enabled_transitions(&self) -> Vec<&str> {
        self.arbiter()
            .ranked()
            .into_iter()
            .filter_map(|c| self.transitions.get(c.index).map(Transition::id))
            .collect()
    }

    pub fn evaluate_guards(&self, transition_id: &str) -> Result<BTreeMap<String, bool>, ExecutionError> {
        let transition = self
            .transition(transition_id)
            .ok_or_else(|| ExecutionError::UnknownTransition(transition_id.to_string()))?;
        Ok(transition.evaluate_guards(&self.places))
    }

    fn arbiter(&self) -> Arbiter {
        self.transitions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_enabled(&self.places))
            .map(|(i, t)| Candidate::new(i, t.id(), t.priority()))
            .collect()
    }

    fn announce_blocked(&self) {
        for t in &self.transitions {
            if let Some(guard_id) = t.blocking_guard(&self.places) {
                TransitionBlocked {
                    transition_id: t.id(),
                    guard_id,
                }
                .log();
                self.events.emit(
                    EngineEventKind::TransitionBlocked,
                    EventData::Transition {
                        transition_id: t.id().to_string(),
                        step: self.step_count,
                        detail: format!("blocked by guard '{}'", guard_id),
                    },
                );
            }
        }
    }

    /// Fires the highest-priority enabled transition, if any.
    ///
    /// Returns whether something fired. An action failure leaves the taken
    /// tokens back in their input places and propagates.
    pub async fn step(&mut self) -> Result<bool, ExecutionError> {
        self.announce_blocked();
        let arbiter = self.arbiter();
        let enabled = arbiter.len();
        let Some(winner) = arbiter.winner() else {
            return Ok(false);
        };

        let reason = format!(
            "highest priority ({}) of {} enabled transition(s)",
            winner.priority, enabled
        );
        self.fire_index(winner.index, &reason).await.map(|_| true)
    }

    /// Fires a specific transition outside arbitration; it must be enabled.
    pub async fn fire(&mut self, transition_id: &str, reason: &str) -> Result<TransitionRecord, ExecutionError> {
        let index = self
            .transitions
            .iter()
            .position(|t| t.id() == transition_id)
            .ok_or_else(|| ExecutionError::UnknownTransition(transition_id.to_string()))?;
        self.fire_index(index, reason).await
    }

    async fn fire_index(&mut self, index: usize, reason: &str) -> Result<TransitionRecord, ExecutionError> {
        let transition = &self.transitions[index];
        let step = self.step_count + 1;
        let ctx = FireContext {
            transition_id: transition.id().to_string(),
            step,
            events: self.events.clone(),
        };

        let started = Instant::now();
        let outcome = match transition.fire(&mut self.places, &ctx, Some(reason)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                TransitionFailed {
                    transition_id: transition.id(),
                    error: &e,
                }
                .log();
                return Err(e);
            }
        };
        let duration = started.elapsed();

        self.step_count = step;
        self.control.set_step(step);
        self.stats.record_fire(duration);

        for token in &outcome.deposited {
            self.persist(token);
            let place_id = token.metadata.current_place.clone().unwrap_or_default();
            self.events.emit(
                EngineEventKind::TokenMoved,
                EventData::Token {
                    token_id: token.id(),
                    place_id,
                    from_place: token.metadata.previous_place.clone(),
                },
            );
        }

        TransitionFired {
            transition_id: &outcome.record.transition_id,
            step,
            reason: &outcome.record.reason,
            output_places: &outcome.record.to_places,
            duration,
        }
        .log();
        self.events.emit(
            EngineEventKind::TransitionFired,
            EventData::Transition {
                transition_id: outcome.record.transition_id.clone(),
                step,
                detail: outcome.record.reason.clone(),
            },
        );
        self.events.emit(EngineEventKind::EngineStep, EventData::Engine { step, detail: None });

        Ok(outcome.record)
    }

    /// Steps until nothing is enabled, the step ceiling is hit or a stop is
    /// requested. Hitting the ceiling is not an error.
    pub async fn run(&mut self) -> Result<RunSummary, ExecutionError> {
        let started = Instant::now();
        let mut steps = 0u64;

        self.control.begin_run();
        RunStarted {
            place_count: self.places.len(),
            transition_count: self.transitions.len(),
            max_steps: self.max_steps,
        }
        .log();
        self.events.emit(
            EngineEventKind::EngineStarted,
            EventData::Engine { step: self.step_count, detail: None },
        );

        let halt_reason = loop {
            self.control.wait_while_paused().await;
            if self.control.stop_requested() {
                break HaltReason::Stopped;
            }
            if steps >= self.max_steps {
                if self.arbiter().is_empty() {
                    break HaltReason::Quiescent;
                }
                StepLimitReached { max_steps: self.max_steps }.log();
                self.events.emit(
                    EngineEventKind::EngineMaxSteps,
                    EventData::Engine { step: self.step_count, detail: None },
                );
                break HaltReason::MaxSteps;
            }

            match self.step().await {
                Ok(true) => steps += 1,
                Ok(false) => break HaltReason::Quiescent,
                Err(e) => {
                    self.control.end_run();
                    RunFailed { steps, error: &e }.log();
                    self.events.emit(
                        EngineEventKind::EngineStopped,
                        EventData::Engine {
                            step: self.step_count,
                            detail: Some(format!("failed: {}", e)),
                        },
                    );
                    return Err(e);
                }
            }
        };

        self.control.end_run();
        RunCompleted {
            steps,
            halt_reason: halt_reason.as_str(),
            duration: started.elapsed(),
        }
        .log();
        self.events.emit(
            EngineEventKind::EngineStopped,
            EventData::Engine {
                step: self.step_count,
                detail: Some(halt_reason.as_str().to_string()),
            },
        );

        Ok(RunSummary { steps, halt_reason })
    }

    // --- control --------------------------------------------------------

    pub fn control(&self) -> EngineControl {
        self.control.clone()
    }

    pub fn state(&self) -> EngineState {
        self.control.state()
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    /// Empties every place, sinks included, and zeroes all counters.
    /// Places and transitions stay registered.
    pub fn reset(&mut self) {
        for place in self.places.values_mut() {
            place.reset();
        }
        self.stats = EngineStats::default();
        self.step_count = 0;
        self.control.set_step(0);
        EngineStateChanged { action: "reset", step: 0 }.log();
    }

    // --- observation ----------------------------------------------------

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> EventSubscription {
        self.events.subscribe()
    }

    pub fn subscribe_to(&self, kind: EngineEventKind) -> EventSubscription {
        self.events.subscribe_to(kind)
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    // Fire and forget; never waits on the store.
    fn persist(&self, token: &Token) {
        if let Some(persister) = &self.persister {
            persister.save(token);
        }
    }
}

impl Default for PetriEngine {
    fn default() -> Self {
        Self::new(&EngineSection::default())
    }
}

impl std::fmt::Debug for PetriEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetriEngine")
            .field("places", &self.place_order)
            .field(
                "transitions",
                &self.transitions.iter().map(Transition::id).collect::<Vec<_>>(),
            )
            .field("step_count", &self.step_count)
            .field("max_steps", &self.max_steps)
            .finish()
    }
}
