// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use crate::engine::place::Place;
use crate::errors::{ExecutionError, NetConfigError};
use crate::guards::Guard;
use crate::token::{Token, TokenColor, TransitionRecord};
use crate::traits::{FireContext, TransitionAction};

/// Static description of a transition.
#[derive(Clone)]
pub struct TransitionConfig {
    pub id: String,
    pub inputs: Vec<String>,
    /// Candidate destinations; the routing table picks one per color
    pub outputs: Vec<String>,
    /// Evaluated in order, short-circuiting on the first `false`
    pub guards: Vec<Guard>,
    pub action: Arc<dyn TransitionAction>,
    pub priority: i32,
}

impl TransitionConfig {
    pub fn new(id: impl Into<String>, action: Arc<dyn TransitionAction>) -> Self {
        Self {
            id: id.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            guards: Vec::new(),
            action,
            priority: 0,
        }
    }

    pub fn from_places(mut self, places: &[&str]) -> Self {
        self.inputs = places.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn to_places(mut self, places: &[&str]) -> Self {
        self.outputs = places.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl std::fmt::Debug for TransitionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionConfig")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("guards", &self.guards)
            .field("action", &self.action.name())
            .field("priority", &self.priority)
            .finish()
    }
}

/// A successful fire: the audit record plus copies of the deposited tokens.
#[derive(Debug, Clone)]
pub struct FireOutcome {
    pub record: TransitionRecord,
    pub deposited: Vec<Token>,
}

/// A registered transition with its color routing table.
#[derive(Debug)]
pub struct Transition {
    config: TransitionConfig,
    routes: BTreeMap<TokenColor, String>,
}

impl Transition {
    /// Validates the config against registered places and builds the routing
    /// table: every color the action emits must land in exactly one output.
    pub(crate) fn build(
        config: TransitionConfig,
        places: &HashMap<String, Place>,
    ) -> Result<Self, NetConfigError> {
        if config.inputs.is_empty() {
            return Err(NetConfigError::NoInputs {
                transition_id: config.id.clone(),
            });
        }

        for place_id in config.inputs.iter().chain(config.outputs.iter()) {
            if !places.contains_key(place_id) {
                return Err(NetConfigError::UnknownPlace {
                    transition_id: config.id.clone(),
                    place_id: place_id.clone(),
                });
            }
        }

        if let Some(sink) = config.inputs.iter().find(|p| places[p.as_str()].is_sink()) {
            return Err(NetConfigError::SinkAsInput {
                transition_id: config.id.clone(),
                place_id: sink.clone(),
            });
        }

        let mut routes = BTreeMap::new();
        for color in config.action.emits() {
            let candidates: Vec<String> = config
                .outputs
                .iter()
                .filter(|p| places[p.as_str()].config().accepts_color(color))
                .cloned()
                .collect();

            match candidates.len() {
                0 => {
                    return Err(NetConfigError::UnroutableColor {
                        transition_id: config.id.clone(),
                        color,
                    })
                }
                1 => {
                    routes.insert(color, candidates[0].clone());
                }
                _ => {
                    return Err(NetConfigError::AmbiguousRoute {
                        transition_id: config.id.clone(),
                        color,
                        candidates,
                    })
                }
            }
        }

        Ok(Self { config, routes })
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn priority(&self) -> i32 {
        self.config.priority
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn route(&self, color: TokenColor) -> Option<&str> {
        self.routes.get(&color).map(String::as_str)
    }

    pub fn routes(&self) -> &BTreeMap<TokenColor, String> {
        &self.routes
    }

    /// Head token of every input place, or `None` if any is empty.
    fn peek_inputs<'a>(&self, places: &'a HashMap<String, Place>) -> Option<Vec<&'a Token>> {
        self.config
            .inputs
            .iter()
            .map(|id| places.get(id).and_then(Place::peek))
            .collect()
    }

    /// All inputs hold a token and every guard passes. Guards short-circuit
    /// on the first failure.
    pub fn is_enabled(&self, places: &HashMap<String, Place>) -> bool {
        self.peek_inputs(places)
            .map_or(false, |tokens| self.config.guards.iter().all(|g| g.evaluate(&tokens)))
    }

    /// First failing guard when inputs are present; `None` otherwise.
    pub fn blocking_guard(&self, places: &HashMap<String, Place>) -> Option<&str> {
        let tokens = self.peek_inputs(places)?;
        self.config
            .guards
            .iter()
            .find(|g| !g.evaluate(&tokens))
            .map(Guard::id)
    }

    /// Every guard's result over the current head tokens, without
    /// short-circuiting. All false when an input is empty.
    pub fn evaluate_guards(&self, places: &HashMap<String, Place>) -> BTreeMap<String, bool> {
        let tokens = self.peek_inputs(places);
        self.config
            .guards
            .iter()
            .map(|g| {
                let passed = tokens.as_ref().map_or(false, |t| g.evaluate(t));
                (g.id().to_string(), passed)
            })
            .collect()
    }

    /// Takes one token per input, runs the action and routes its outputs.
    ///
    /// Any failure after the take (action error, missing reason, unroutable
    /// color, refused deposit) puts the taken tokens back where they were.
    pub async fn fire(
        &self,
        places: &mut HashMap<String, Place>,
        ctx: &FireContext,
        reason: Option<&str>,
    ) -> Result<FireOutcome, ExecutionError> {
        if !self.is_enabled(places) {
            return Err(ExecutionError::NotEnabled(self.id().to_string()));
        }
        let guard_results = self.evaluate_guards(places);
        let started = Instant::now();

        let mut taken: Vec<(String, Token)> = Vec::with_capacity(self.config.inputs.len());
        for place_id in &self.config.inputs {
            let place = places
                .get_mut(place_id)
                .ok_or_else(|| ExecutionError::UnknownPlace(place_id.clone()))?;
            if let Some(token) = place.take(Some(1)).pop() {
                taken.push((place_id.clone(), token));
            }
        }
        let inputs: Vec<Token> = taken.iter().map(|(_, t)| t.clone()).collect();

        let output = match self.config.action.execute(inputs, ctx).await {
            Ok(output) => output,
            Err(source) => {
                restore(places, taken);
                return Err(ExecutionError::ActionFailed {
                    transition_id: self.id().to_string(),
                    source,
                });
            }
        };

        let reason = match output.reason.as_deref().or(reason).map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => {
                restore(places, taken);
                return Err(ExecutionError::EmptyReason(self.id().to_string()));
            }
        };

        let routed = match self.plan_deposits(places, output.tokens) {
            Ok(routed) => routed,
            Err(e) => {
                restore(places, taken);
                return Err(e);
            }
        };

        let record = TransitionRecord {
            transition_id: self.id().to_string(),
            from_places: self.config.inputs.clone(),
            to_places: routed.iter().map(|(p, _)| p.clone()).collect(),
            reason,
            guard_results,
            step: ctx.step,
            fired_at: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
        };

        let mut deposited = Vec::with_capacity(routed.len());
        for (place_id, mut token) in routed {
            token.record_transition(record.clone());
            token.move_to(&place_id);
            deposited.push(token.clone());
            if let Some(place) = places.get_mut(&place_id) {
                if let Err(refused) = place.try_push(token) {
                    return Err(ExecutionError::DepositRejected {
                        transition_id: self.id().to_string(),
                        place_id,
                        token_id: refused.id().to_string(),
                    });
                }
            }
        }

        Ok(FireOutcome { record, deposited })
    }

    /// Pairs each output token with its destination and checks every
    /// destination can take its share before anything is moved.
    fn plan_deposits(
        &self,
        places: &HashMap<String, Place>,
        tokens: Vec<Token>,
    ) -> Result<Vec<(String, Token)>, ExecutionError> {
        let mut routed = Vec::with_capacity(tokens.len());
        let mut per_place: HashMap<&str, usize> = HashMap::new();

        for token in tokens {
            let place_id = self.route(token.color).ok_or(ExecutionError::UnroutableToken {
                transition_id: self.id().to_string(),
                color: token.color,
            })?;
            let count = per_place.entry(place_id).or_insert(0);
            *count += 1;

            let fits = places.get(place_id).map_or(false, |p| {
                p.config().accepts_color(token.color) && p.has_room_for(*count)
            });
            if !fits {
                return Err(ExecutionError::DepositRejected {
                    transition_id: self.id().to_string(),
                    place_id: place_id.to_string(),
                    token_id: token.id().to_string(),
                });
            }
            routed.push((place_id.to_string(), token));
        }

        Ok(routed)
    }
}

fn restore(places: &mut HashMap<String, Place>, taken: Vec<(String, Token)>) {
    for (place_id, token) in taken.into_iter().rev() {
        if let Some(place) = places.get_mut(&place_id) {
            place.restore(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{FailingAction, RecolorAction};
    use crate::engine::place::PlaceConfig;
    use crate::engine::EventBus;
    use serde_json::json;

    fn places(configs: Vec<PlaceConfig>) -> HashMap<String, Place> {
        configs.into_iter().map(|c| (c.id.clone(), Place::new(c))).collect()
    }

    fn ctx(id: &str) -> FireContext {
        FireContext {
            transition_id: id.to_string(),
            step: 1,
            events: EventBus::new(8),
        }
    }

    #[test]
    fn test_routing_table_built_from_emitted_colors() {
        let places = places(vec![
            PlaceConfig::new("in"),
            PlaceConfig::new("ok").accepting([TokenColor::Valid]),
            PlaceConfig::new("bad").accepting([TokenColor::Invalid]),
        ]);
        let config = TransitionConfig::new(
            "decide",
            Arc::new(RecolorAction::emitting(vec![TokenColor::Valid, TokenColor::Invalid])),
        )
        .from_places(&["in"])
        .to_places(&["ok", "bad"]);

        let t = Transition::build(config, &places).unwrap();
        assert_eq!(t.route(TokenColor::Valid), Some("ok"));
        assert_eq!(t.route(TokenColor::Invalid), Some("bad"));
        assert_eq!(t.route(TokenColor::Pending), None);
    }

    #[test]
    fn test_unroutable_and_ambiguous_colors_rejected() {
        let places = places(vec![
            PlaceConfig::new("in"),
            PlaceConfig::new("any"),
            PlaceConfig::new("also_any"),
            PlaceConfig::new("ok").accepting([TokenColor::Valid]),
        ]);

        let unroutable = TransitionConfig::new("t", Arc::new(RecolorAction::new(TokenColor::Invalid)))
            .from_places(&["in"])
            .to_places(&["ok"]);
        assert!(matches!(
            Transition::build(unroutable, &places),
            Err(NetConfigError::UnroutableColor { color: TokenColor::Invalid, .. })
        ));

        let ambiguous = TransitionConfig::new("t", Arc::new(RecolorAction::new(TokenColor::Valid)))
            .from_places(&["in"])
            .to_places(&["any", "also_any"]);
        match Transition::build(ambiguous, &places) {
            Err(NetConfigError::AmbiguousRoute { candidates, .. }) => {
                assert_eq!(candidates, vec!["any", "also_any"])
            }
            other => panic!("expected AmbiguousRoute, got {:?}", other.map(|t| t.id().to_string())),
        }
    }

    #[test]
    fn test_sink_input_and_unknown_place_rejected() {
        let places = places(vec![PlaceConfig::new("done").sink(), PlaceConfig::new("out")]);
        let action: Arc<dyn TransitionAction> = Arc::new(RecolorAction::new(TokenColor::Pending));

        let from_sink = TransitionConfig::new("t", action.clone()).from_places(&["done"]).to_places(&["out"]);
        assert!(matches!(Transition::build(from_sink, &places), Err(NetConfigError::SinkAsInput { .. })));

        let unknown = TransitionConfig::new("t", action).from_places(&["nowhere"]).to_places(&["out"]);
        assert!(matches!(Transition::build(unknown, &places), Err(NetConfigError::UnknownPlace { .. })));
    }

    #[test]
    fn test_guard_results_map_and_short_circuit() {
        let mut places = places(vec![PlaceConfig::new("in"), PlaceConfig::new("out")]);
        places.get_mut("in").unwrap().push(Token::new(json!({}), TokenColor::Pending));

        let config = TransitionConfig::new("t", Arc::new(RecolorAction::new(TokenColor::Valid)))
            .from_places(&["in"])
            .to_places(&["out"])
            .guard(Guard::new("yes", |_| true))
            .guard(Guard::new("no", |_| false))
            .guard(Guard::new("later", |_| true));
        let t = Transition::build(config, &places).unwrap();

        assert!(!t.is_enabled(&places));
        assert_eq!(t.blocking_guard(&places), Some("no"));
        let results = t.evaluate_guards(&places);
        assert_eq!(results.len(), 3);
        assert_eq!(results["later"], true);
    }

    #[tokio::test]
    async fn test_fire_moves_token_and_records_reason() {
        let mut places = places(vec![PlaceConfig::new("in"), PlaceConfig::new("out")]);
        let token = Token::new(json!({"k": 1}), TokenColor::Pending);
        let id = token.id();
        places.get_mut("in").unwrap().push(token);

        let config = TransitionConfig::new("t", Arc::new(RecolorAction::new(TokenColor::Valid)))
            .from_places(&["in"])
            .to_places(&["out"]);
        let t = Transition::build(config, &places).unwrap();

        let outcome = t.fire(&mut places, &ctx("t"), Some("manual")).await.unwrap();
        assert_eq!(outcome.record.reason, "manual");
        assert_eq!(outcome.record.to_places, vec!["out"]);

        let moved = places["out"].peek().unwrap();
        assert_eq!(moved.id(), id);
        assert_eq!(moved.color, TokenColor::Valid);
        assert_eq!(moved.metadata.current_place.as_deref(), Some("out"));
        assert_eq!(moved.metadata.transition_history().len(), 1);
        assert!(places["in"].is_empty());
    }

    #[tokio::test]
    async fn test_failed_action_restores_inputs() {
        let mut places = places(vec![PlaceConfig::new("in"), PlaceConfig::new("out")]);
        let token = Token::new(json!({}), TokenColor::Pending);
        let id = token.id();
        places.get_mut("in").unwrap().push(token);

        let config = TransitionConfig::new("t", Arc::new(FailingAction::new(TokenColor::Valid)))
            .from_places(&["in"])
            .to_places(&["out"]);
        let t = Transition::build(config, &places).unwrap();

        let err = t.fire(&mut places, &ctx("t"), Some("try")).await.unwrap_err();
        assert!(matches!(err, ExecutionError::ActionFailed { .. }));
        assert_eq!(places["in"].peek().map(|t| t.id()), Some(id));
        assert!(places["out"].is_empty());
    }

    #[tokio::test]
    async fn test_blank_reason_is_an_error() {
        let mut places = places(vec![PlaceConfig::new("in"), PlaceConfig::new("out")]);
        places.get_mut("in").unwrap().push(Token::new(json!({}), TokenColor::Pending));

        let config = TransitionConfig::new("t", Arc::new(RecolorAction::new(TokenColor::Valid)))
            .from_places(&["in"])
            .to_places(&["out"]);
        let t = Transition::build(config, &places).unwrap();

        let err = t.fire(&mut places, &ctx("t"), Some("   ")).await.unwrap_err();
        assert!(matches!(err, ExecutionError::EmptyReason(_)));
        assert_eq!(places["in"].len(), 1);
    }

    #[tokio::test]
    async fn test_undeclared_color_is_an_error_not_a_drop() {
        let mut places = places(vec![
            PlaceConfig::new("in"),
            PlaceConfig::new("out").accepting([TokenColor::Valid]),
        ]);
        places.get_mut("in").unwrap().push(Token::new(json!({}), TokenColor::Pending));

        // Declares Valid but actually produces Invalid.
        let config = TransitionConfig::new("t", Arc::new(RecolorAction::lying(TokenColor::Valid, TokenColor::Invalid)))
            .from_places(&["in"])
            .to_places(&["out"]);
        let t = Transition::build(config, &places).unwrap();

        let err = t.fire(&mut places, &ctx("t"), Some("go")).await.unwrap_err();
        assert!(matches!(err, ExecutionError::UnroutableToken { color: TokenColor::Invalid, .. }));
        assert_eq!(places["in"].len(), 1);
    }

    #[tokio::test]
    async fn test_full_destination_refuses_before_moving() {
        let mut places = places(vec![PlaceConfig::new("in"), PlaceConfig::new("out").with_capacity(1)]);
        places.get_mut("in").unwrap().push(Token::new(json!({}), TokenColor::Pending));
        places.get_mut("out").unwrap().push(Token::new(json!({}), TokenColor::Valid));

        let config = TransitionConfig::new("t", Arc::new(RecolorAction::new(TokenColor::Valid)))
            .from_places(&["in"])
            .to_places(&["out"]);
        let t = Transition::build(config, &places).unwrap();

        let err = t.fire(&mut places, &ctx("t"), Some("go")).await.unwrap_err();
        assert!(matches!(err, ExecutionError::DepositRejected { .. }));
        assert_eq!(places["in"].len(), 1);
        assert_eq!(places["out"].len(), 1);
    }
}
