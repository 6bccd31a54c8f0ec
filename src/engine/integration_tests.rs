// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::backends::local::InMemoryTokenStore;
use crate::backends::stub::{FailingAction, FailingStore, RecolorAction};
use crate::config::EngineSection;
use crate::engine::{
    EngineEventKind, EngineState, HaltReason, PetriEngine, PlaceConfig, TransitionConfig,
};
use crate::errors::{ExecutionError, NetConfigError};
use crate::guards::Guard;
use crate::token::{Token, TokenColor};
use crate::traits::TokenStore;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Engine scenarios over small hand-built nets
#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_ceiling(max_steps: u64) -> PetriEngine {
        PetriEngine::new(&EngineSection {
            max_steps,
            ..EngineSection::default()
        })
    }

    /// in -> (high | low) -> out_high / out_low
    fn competing_net() -> PetriEngine {
        let mut engine = PetriEngine::default();
        engine.add_place(PlaceConfig::new("in").source()).unwrap();
        engine
            .add_place(PlaceConfig::new("out_high").accepting([TokenColor::Valid]).sink())
            .unwrap();
        engine
            .add_place(PlaceConfig::new("out_low").accepting([TokenColor::Invalid]).sink())
            .unwrap();

        engine
            .add_transition(
                TransitionConfig::new("low", Arc::new(RecolorAction::new(TokenColor::Invalid)))
                    .from_places(&["in"])
                    .to_places(&["out_low"])
                    .priority(10),
            )
            .unwrap();
        engine
            .add_transition(
                TransitionConfig::new("high", Arc::new(RecolorAction::new(TokenColor::Valid)))
                    .from_places(&["in"])
                    .to_places(&["out_high"])
                    .priority(20),
            )
            .unwrap();
        engine
    }

    /// Two places bouncing a token forever.
    fn ping_pong(max_steps: u64) -> PetriEngine {
        let mut engine = engine_with_ceiling(max_steps);
        engine.add_place(PlaceConfig::new("ping")).unwrap();
        engine.add_place(PlaceConfig::new("pong")).unwrap();
        engine
            .add_transition(
                TransitionConfig::new("to_pong", Arc::new(RecolorAction::new(TokenColor::Pending)))
                    .from_places(&["ping"])
                    .to_places(&["pong"]),
            )
            .unwrap();
        engine
            .add_transition(
                TransitionConfig::new("to_ping", Arc::new(RecolorAction::new(TokenColor::Pending)))
                    .from_places(&["pong"])
                    .to_places(&["ping"]),
            )
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_step_fires_highest_priority() {
        let mut engine = competing_net();
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();

        assert_eq!(engine.enabled_transitions(), vec!["high", "low"]);
        assert!(engine.step().await.unwrap());
        assert_eq!(engine.place("out_high").unwrap().len(), 1);
        assert!(engine.place("out_low").unwrap().is_empty());
        assert!(!engine.step().await.unwrap());
    }

    #[tokio::test]
    async fn test_equal_priority_fires_first_registered() {
        let mut engine = PetriEngine::default();
        engine.add_place(PlaceConfig::new("in")).unwrap();
        engine.add_place(PlaceConfig::new("a").sink()).unwrap();
        engine.add_place(PlaceConfig::new("b").sink()).unwrap();
        for (id, out) in [("first", "a"), ("second", "b")] {
            engine
                .add_transition(
                    TransitionConfig::new(id, Arc::new(RecolorAction::new(TokenColor::Valid)))
                        .from_places(&["in"])
                        .to_places(&[out]),
                )
                .unwrap();
        }
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();

        engine.step().await.unwrap();
        assert_eq!(engine.place("a").unwrap().len(), 1);
    }

    #[test]
    fn test_setup_errors_fail_fast() {
        let mut engine = competing_net();
        assert_eq!(
            engine.add_place(PlaceConfig::new("in")),
            Err(NetConfigError::DuplicatePlace { place_id: "in".into() })
        );

        let dup = TransitionConfig::new("high", Arc::new(RecolorAction::new(TokenColor::Valid)))
            .from_places(&["in"])
            .to_places(&["out_high"]);
        assert!(matches!(
            engine.add_transition(dup),
            Err(NetConfigError::DuplicateTransition { .. })
        ));

        let unknown = TransitionConfig::new("ghost", Arc::new(RecolorAction::new(TokenColor::Valid)))
            .from_places(&["nowhere"])
            .to_places(&["out_high"]);
        assert!(matches!(
            engine.add_transition(unknown),
            Err(NetConfigError::UnknownPlace { .. })
        ));
    }

    #[test]
    fn test_add_token_rejects_wrong_color() {
        let mut engine = competing_net();
        let result = engine.add_token("out_high", Token::new(json!({}), TokenColor::Pending));
        assert!(matches!(result, Err(ExecutionError::TokenRejected { .. })));
        assert!(matches!(
            engine.add_token("missing", Token::new(json!({}), TokenColor::Pending)),
            Err(ExecutionError::UnknownPlace(_))
        ));
    }

    #[tokio::test]
    async fn test_run_to_quiescence_keeps_token_inspectable() {
        let mut engine = competing_net();
        let id = engine.add_token("in", Token::new(json!({"x": 1}), TokenColor::Pending)).unwrap();

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.halt_reason, HaltReason::Quiescent);
        assert_eq!(summary.steps, 1);

        let (place, token) = engine.find_token(id).unwrap();
        assert_eq!(place, "out_high");
        let history = token.metadata.transition_history();
        assert_eq!(history.len(), 1);
        assert!(!history[0].reason.trim().is_empty());
        assert_eq!(history[0].step, 1);
    }

    #[tokio::test]
    async fn test_step_ceiling_halts_with_event_not_error() {
        let mut engine = ping_pong(5);
        let mut max_steps = engine.subscribe_to(EngineEventKind::EngineMaxSteps);
        engine.add_token("ping", Token::new(json!({}), TokenColor::Pending)).unwrap();

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.halt_reason, HaltReason::MaxSteps);
        assert_eq!(summary.steps, 5);
        assert_eq!(max_steps.drain().len(), 1);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[tokio::test]
    async fn test_history_grows_monotonically_with_reasons() {
        let mut engine = ping_pong(7);
        let id = engine.add_token("ping", Token::new(json!({}), TokenColor::Pending)).unwrap();

        let mut last_len = 0;
        for _ in 0..7 {
            engine.step().await.unwrap();
            let (_, token) = engine.find_token(id).unwrap();
            let history = token.metadata.transition_history();
            assert!(history.len() > last_len);
            assert!(history.iter().all(|r| !r.reason.is_empty()));
            last_len = history.len();
        }
    }

    #[tokio::test]
    async fn test_action_failure_propagates_and_restores_token() {
        let mut engine = PetriEngine::default();
        engine.add_place(PlaceConfig::new("in")).unwrap();
        engine.add_place(PlaceConfig::new("out")).unwrap();
        engine
            .add_transition(
                TransitionConfig::new("boom", Arc::new(FailingAction::new(TokenColor::Valid)))
                    .from_places(&["in"])
                    .to_places(&["out"]),
            )
            .unwrap();
        let id = engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, ExecutionError::ActionFailed { ref transition_id, .. } if transition_id == "boom"));
        assert_eq!(engine.find_token(id).map(|(p, _)| p), Some("in"));
        assert_eq!(engine.stats().transitions_fired, 0);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[tokio::test]
    async fn test_reset_clears_tokens_and_counters_keeps_topology() {
        let mut engine = competing_net();
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();
        engine.run().await.unwrap();
        assert_eq!(engine.stats().tokens_processed, 1);
        assert_eq!(engine.stats().transitions_fired, 1);

        engine.reset();

        assert!(engine.places().all(|p| p.is_empty()));
        assert_eq!(engine.stats().tokens_processed, 0);
        assert_eq!(engine.stats().transitions_fired, 0);
        assert_eq!(engine.step_count(), 0);
        assert_eq!(engine.places().count(), 3);
        assert_eq!(engine.transitions().len(), 2);
    }

    #[tokio::test]
    async fn test_events_for_a_single_fire() {
        let mut engine = competing_net();
        let mut events = engine.subscribe();
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();
        engine.run().await.unwrap();

        let kinds: Vec<_> = events.drain().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds.first(), Some(&EngineEventKind::TokenCreated));
        assert!(kinds.contains(&EngineEventKind::EngineStarted));
        assert!(kinds.contains(&EngineEventKind::TokenMoved));
        assert!(kinds.contains(&EngineEventKind::TransitionFired));
        assert!(kinds.contains(&EngineEventKind::EngineStep));
        assert_eq!(kinds.last(), Some(&EngineEventKind::EngineStopped));
    }

    /// in -> gated -> out, where the guard never passes
    fn gated_net() -> PetriEngine {
        let mut engine = PetriEngine::default();
        engine.add_place(PlaceConfig::new("in")).unwrap();
        engine.add_place(PlaceConfig::new("out")).unwrap();
        engine
            .add_transition(
                TransitionConfig::new("gated", Arc::new(RecolorAction::new(TokenColor::Valid)))
                    .from_places(&["in"])
                    .to_places(&["out"])
                    .guard(Guard::new("never", |_| false)),
            )
            .unwrap();
        engine
    }

    /// Counts log records that name a blocking guard.
    #[derive(Clone, Default)]
    struct BlockedLogCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for BlockedLogCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().fields().field("guard_id").is_some() {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_blocked_transition_is_announced() {
        let mut engine = gated_net();
        let mut blocked = engine.subscribe_to(EngineEventKind::TransitionBlocked);
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();

        assert!(!engine.step().await.unwrap());
        assert_eq!(blocked.drain().len(), 1);
        assert_eq!(engine.evaluate_guards("gated").unwrap()["never"], false);
    }

    #[tokio::test]
    async fn test_blocked_transition_logs_once_per_step() {
        let counter = BlockedLogCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let _default = tracing::subscriber::set_default(subscriber);
        let mut engine = gated_net();
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.halt_reason, HaltReason::Quiescent);
        assert!(engine.enabled_transitions().is_empty());

        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_from_control_handle_halts_run() {
        let mut engine = ping_pong(100_000);
        engine.add_token("ping", Token::new(json!({}), TokenColor::Pending)).unwrap();
        let control = engine.control();

        let handle = tokio::spawn(async move {
            let summary = engine.run().await;
            (engine, summary)
        });
        while control.state() != EngineState::Running && !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        control.stop();

        let (engine, summary) = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("run should stop")
            .unwrap();
        assert_eq!(summary.unwrap().halt_reason, HaltReason::Stopped);
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_before_run_is_cleared() {
        let mut engine = competing_net();
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();
        engine.stop();

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.halt_reason, HaltReason::Quiescent);
        assert_eq!(summary.steps, 1);
    }

    #[tokio::test]
    async fn test_paused_engine_waits_at_step_boundary() {
        let mut engine = ping_pong(50);
        engine.add_token("ping", Token::new(json!({}), TokenColor::Pending)).unwrap();
        let control = engine.control();
        control.pause();

        let handle = tokio::spawn(async move {
            let summary = engine.run().await;
            (engine, summary)
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(control.state(), EngineState::Paused);
        assert!(!handle.is_finished());

        control.resume();
        let (_, summary) = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("run should finish after resume")
            .unwrap();
        assert_eq!(summary.unwrap().halt_reason, HaltReason::MaxSteps);
    }

    #[tokio::test]
    async fn test_store_failure_never_blocks_the_net() {
        let store = Arc::new(FailingStore::default());
        let mut engine = competing_net().with_store(store.clone());
        engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();

        let summary = engine.run().await.unwrap();
        assert_eq!(summary.halt_reason, HaltReason::Quiescent);

        engine.flush().await;
        assert_eq!(store.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_every_placement_is_persisted() {
        let store = Arc::new(InMemoryTokenStore::new());
        let mut engine = competing_net().with_store(store.clone());
        let id = engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).unwrap();
        engine.run().await.unwrap();

        engine.flush().await;
        let saved = store.get(id).await.unwrap().unwrap();
        assert_eq!(saved.metadata.current_place.as_deref(), Some("out_high"));
    }

    #[test]
    fn test_add_token_without_runtime_skips_persistence() {
        let store = Arc::new(InMemoryTokenStore::new());
        let mut engine = competing_net().with_store(store);
        assert!(engine.add_token("in", Token::new(json!({}), TokenColor::Pending)).is_ok());
    }

    #[test]
    fn test_snapshot_and_correlation_lookup() {
        let mut engine = competing_net();
        engine
            .add_token("in", Token::new(json!({}), TokenColor::Pending).with_correlation_id("req-1"))
            .unwrap();
        engine
            .add_token("in", Token::new(json!({}), TokenColor::Pending).with_correlation_id("req-2"))
            .unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].config.id, "in");
        assert_eq!(snapshot[0].count, 2);
        assert_eq!(engine.tokens_by_correlation("req-1").len(), 1);
    }
}
