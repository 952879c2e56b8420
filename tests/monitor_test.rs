//! End-to-end game-monitor cycle tests
//!
//! Each test drives `run_cycle` over scripted sources, a recording chat
//! transport and a real temp-dir state file, then asserts on what was sent
//! and what was durably committed.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_test::assert_ok;

use common::{game, RecordingApi, ScriptedSource, SendMode};
use herald::models::{Feature, Item};
use herald::monitor::GameMonitor;
use herald::notify::Notifier;
use herald::store::GameState;

const INTERVAL: Duration = Duration::from_secs(300);

struct Harness {
    _dir: TempDir,
    api: Arc<RecordingApi>,
    monitor: GameMonitor,
    state_path: std::path::PathBuf,
}

fn harness(
    games: ScriptedSource,
    fixes: ScriptedSource,
    api: RecordingApi,
    seed: Option<GameState>,
) -> Harness {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("game_state.json");
    if let Some(state) = seed {
        state.save(&state_path).unwrap();
    }

    let api = Arc::new(api);
    let monitor = GameMonitor::new(
        Box::new(games),
        Box::new(fixes),
        Notifier::new(api.clone()),
        state_path.clone(),
        INTERVAL,
    );
    Harness {
        _dir: dir,
        api,
        monitor,
        state_path,
    }
}

fn configured_state() -> GameState {
    let mut state = GameState::default();
    state.set_channel(Feature::NewGames, 1);
    state.set_channel(Feature::UpdatedGames, 2);
    state.set_channel(Feature::FixedGames, 3);
    state
}

#[tokio::test]
async fn test_first_cycle_announces_new_and_commits_both_sets() {
    let h = harness(
        ScriptedSource::snapshot("games", vec![game("Alpha", "1"), game("Beta", "2")]),
        ScriptedSource::snapshot("fixes", vec![]),
        RecordingApi::new(),
        Some(configured_state()),
    );

    tokio_test::assert_ok!(h.monitor.run_cycle().await);

    // Both items are unseen by both game features, but the UPDATED rendering
    // is suppressed for keys announced as NEW this same cycle.
    let titles = h.api.sent_titles();
    assert_eq!(titles, vec!["🎮 Alpha", "🎮 Beta"]);
    for (_, payload) in h.api.sends.lock().unwrap().iter() {
        assert!(payload.description.contains("NEW"));
    }

    let state = GameState::load(&h.state_path);
    assert!(state.seen(Feature::NewGames).contains("Alpha"));
    assert!(state.seen(Feature::UpdatedGames).contains("Alpha"));
    assert!(state.seen(Feature::NewGames).contains("Beta"));
}

#[tokio::test]
async fn test_second_cycle_is_quiet() {
    let h = harness(
        ScriptedSource::snapshot("games", vec![game("Alpha", "1")]),
        ScriptedSource::snapshot("fixes", vec![]),
        RecordingApi::new(),
        Some(configured_state()),
    );

    h.monitor.run_cycle().await.unwrap();
    let after_first = h.api.send_count();
    h.monitor.run_cycle().await.unwrap();

    assert_eq!(h.api.send_count(), after_first);
}

#[tokio::test]
async fn test_announce_order_is_sorted_ascending() {
    let h = harness(
        ScriptedSource::snapshot(
            "games",
            vec![game("Zeta", "3"), game("Alpha", "1"), game("Mid", "2")],
        ),
        ScriptedSource::snapshot("fixes", vec![]),
        RecordingApi::new(),
        Some(configured_state()),
    );

    h.monitor.run_cycle().await.unwrap();

    assert_eq!(h.api.sent_titles(), vec!["🎮 Alpha", "🎮 Mid", "🎮 Zeta"]);
}

#[tokio::test]
async fn test_seen_item_with_unseen_update_announces_updated() {
    let mut seed = configured_state();
    seed.seen_new.insert("Alpha".to_string());

    let h = harness(
        ScriptedSource::snapshot("games", vec![game("Alpha", "1")]),
        ScriptedSource::snapshot("fixes", vec![]),
        RecordingApi::new(),
        Some(seed),
    );

    h.monitor.run_cycle().await.unwrap();

    let sends = h.api.sends.lock().unwrap();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, 2);
    assert!(sends[0].1.description.contains("UPDATED"));
}

#[tokio::test]
async fn test_unavailable_feed_leaves_state_untouched() {
    let h = harness(
        ScriptedSource::unavailable("games"),
        ScriptedSource::unavailable("fixes"),
        RecordingApi::new(),
        Some(configured_state()),
    );
    let before = std::fs::read(&h.state_path).unwrap();

    h.monitor.run_cycle().await.unwrap();

    assert_eq!(h.api.send_count(), 0);
    let after = std::fs::read(&h.state_path).unwrap();
    assert_eq!(before, after, "an unavailable source must not modify state");
}

#[tokio::test]
async fn test_no_destination_sends_nothing_but_commits_seen() {
    let h = harness(
        ScriptedSource::snapshot("games", vec![game("Alpha", "1")]),
        ScriptedSource::snapshot("fixes", vec![Item::new("Patch1")]),
        RecordingApi::new(),
        None,
    );

    h.monitor.run_cycle().await.unwrap();

    assert_eq!(h.api.send_count(), 0);
    let state = GameState::load(&h.state_path);
    assert!(state.seen(Feature::NewGames).contains("Alpha"));
    assert!(state.seen(Feature::FixedGames).contains("Patch1"));
}

#[tokio::test]
async fn test_forbidden_destination_still_counts_as_announced() {
    let h = harness(
        ScriptedSource::snapshot("games", vec![game("Alpha", "1")]),
        ScriptedSource::snapshot("fixes", vec![]),
        RecordingApi::new().with_send_mode(SendMode::Forbidden),
        Some(configured_state()),
    );

    h.monitor.run_cycle().await.unwrap();

    // Announce-once semantics: the failed delivery is not retried later.
    let state = GameState::load(&h.state_path);
    assert!(state.seen(Feature::NewGames).contains("Alpha"));
}

#[tokio::test]
async fn test_fixes_pipeline_announces_to_fixed_channel() {
    let fix = Item::new("Patch1")
        .with_meta("download", "https://cdn/p1.zip")
        .with_meta("size", "5 MB");
    let h = harness(
        ScriptedSource::snapshot("games", vec![]),
        ScriptedSource::snapshot("fixes", vec![fix]),
        RecordingApi::new(),
        Some(configured_state()),
    );

    h.monitor.run_cycle().await.unwrap();

    let sends = h.api.sends.lock().unwrap();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, 3);
    assert_eq!(sends[0].1.title, "🛠️ Patch1");
    assert!(sends[0].1.description.contains("https://cdn/p1.zip"));
}

#[tokio::test]
async fn test_peek_new_does_not_commit() {
    let h = harness(
        ScriptedSource::snapshot("games", vec![game("Alpha", "1")]),
        ScriptedSource::snapshot("fixes", vec![]),
        RecordingApi::new(),
        None,
    );

    let peeked = h.monitor.peek_new().await.unwrap();
    assert_eq!(peeked.len(), 1);
    assert_eq!(peeked[0].key, "Alpha");

    // Read-only: no state file appears and a later cycle still announces.
    assert!(!h.state_path.exists());
    assert_eq!(h.api.send_count(), 0);
    h.monitor.run_cycle().await.unwrap();
    let state = GameState::load(&h.state_path);
    assert!(state.seen(Feature::NewGames).contains("Alpha"));
}

#[tokio::test]
async fn test_restart_does_not_reannounce() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("game_state.json");
    configured_state().save(&state_path).unwrap();

    let first_api = Arc::new(RecordingApi::new());
    let first = GameMonitor::new(
        Box::new(ScriptedSource::snapshot("games", vec![game("Alpha", "1")])),
        Box::new(ScriptedSource::snapshot("fixes", vec![])),
        Notifier::new(first_api.clone()),
        state_path.clone(),
        INTERVAL,
    );
    first.run_cycle().await.unwrap();
    assert_eq!(first_api.send_count(), 1);

    // A fresh monitor over the same state file models a process restart.
    let second_api = Arc::new(RecordingApi::new());
    let second = GameMonitor::new(
        Box::new(ScriptedSource::snapshot("games", vec![game("Alpha", "1")])),
        Box::new(ScriptedSource::snapshot("fixes", vec![])),
        Notifier::new(second_api.clone()),
        state_path,
        INTERVAL,
    );
    second.run_cycle().await.unwrap();
    assert_eq!(second_api.send_count(), 0);
}
