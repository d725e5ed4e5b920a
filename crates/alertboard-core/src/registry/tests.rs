use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use tokio::sync::broadcast::error::TryRecvError;

use super::*;

/// Holds scheduled tasks until the test fires them
#[derive(Default)]
struct RecordingScheduler {
    pending: Mutex<Vec<(Duration, Task)>>,
}

impl RecordingScheduler {
    fn delays(&self) -> Vec<Duration> {
        self.pending.lock().iter().map(|(delay, _)| *delay).collect()
    }

    fn fire_all(&self) {
        let tasks = std::mem::take(&mut *self.pending.lock());
        for (_, task) in tasks {
            task();
        }
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.pending.lock().push((delay, task));
    }
}

fn recording_registry() -> (AlertRegistry, Arc<RecordingScheduler>) {
    let scheduler = Arc::new(RecordingScheduler::default());
    let registry = AlertRegistry::with_scheduler(AlertsConfig::default(), scheduler.clone());
    (registry, scheduler)
}

fn drain(rx: &mut broadcast::Receiver<AlertEvent>) -> Vec<AlertEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) => return events,
            Err(e) => panic!("unexpected receive error: {e}"),
        }
    }
}

#[test]
fn test_ids_count_up_from_one() {
    let (registry, _) = recording_registry();

    let first = registry.add(AlertKind::Info, "a", "b", None);
    let second = registry.add(AlertKind::Info, "a", "b", None);

    assert_eq!(first.as_str(), "alert-1");
    assert_eq!(second.as_str(), "alert-2");
}

#[test]
fn test_ids_never_reused_after_removal() {
    let (registry, _) = recording_registry();

    let first = registry.add(AlertKind::Info, "a", "b", None);
    registry.remove(&first);
    registry.clear();
    let next = registry.add(AlertKind::Info, "a", "b", None);

    assert_eq!(next.as_str(), "alert-2");
}

#[test]
fn test_zero_timeout_is_persistent() {
    let (registry, scheduler) = recording_registry();

    let id = registry.add(AlertKind::Success, "T", "X", Some(Duration::ZERO));

    let alerts = registry.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, id);
    assert_eq!(alerts[0].kind, AlertKind::Success);
    assert_eq!(alerts[0].title, "T");
    assert_eq!(alerts[0].text, "X");
    assert!(alerts[0].is_persistent());
    assert!(scheduler.delays().is_empty());

    scheduler.fire_all();
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_sub_millisecond_timeout_is_persistent() {
    let (registry, scheduler) = recording_registry();

    let id = registry.add(AlertKind::Info, "T", "X", Some(Duration::from_micros(500)));

    let alert = registry.get(&id).unwrap();
    assert_eq!(alert.timeout, 0);
    assert!(alert.is_persistent());
    assert!(scheduler.delays().is_empty());

    scheduler.fire_all();
    assert!(registry.get(&id).is_some());
}

#[test]
fn test_timer_delay_matches_stored_timeout() {
    let (registry, scheduler) = recording_registry();

    let id = registry.add(AlertKind::Info, "T", "X", Some(Duration::from_micros(1500)));

    assert_eq!(registry.get(&id).unwrap().timeout, 1);
    assert_eq!(scheduler.delays(), vec![Duration::from_millis(1)]);
}

#[test]
fn test_one_timer_per_expiring_alert() {
    let (registry, scheduler) = recording_registry();

    registry.add(AlertKind::Info, "a", "b", None);
    registry.add(AlertKind::Info, "a", "b", Some(Duration::from_millis(100)));
    registry.add(AlertKind::Info, "a", "b", Some(Duration::ZERO));

    assert_eq!(
        scheduler.delays(),
        vec![Duration::from_millis(5000), Duration::from_millis(100)]
    );
}

#[test]
fn test_insertion_order_is_display_order() {
    let (registry, _) = recording_registry();

    let a = registry.show_info("first", "", None);
    let b = registry.show_info("second", "", None);
    let c = registry.show_info("third", "", None);
    registry.remove(&b);

    let ids: Vec<AlertId> = registry.alerts().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn test_remove_missing_id_is_noop() {
    let (registry, _) = recording_registry();
    registry.add(AlertKind::Warning, "W", "careful", None);
    let before = registry.alerts();
    let mut rx = registry.subscribe();

    assert!(!registry.remove(&AlertId::from("alert-99")));

    assert_eq!(registry.alerts(), before);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_remove_is_idempotent() {
    let (registry, _) = recording_registry();
    let id = registry.add(AlertKind::Error, "E", "boom", None);

    assert!(registry.remove(&id));
    assert!(!registry.remove(&id));
    assert!(registry.is_empty());
}

#[test]
fn test_timer_after_clear_is_harmless() {
    let (registry, scheduler) = recording_registry();
    let mut rx = registry.subscribe();

    registry.add(AlertKind::Info, "a", "", Some(Duration::ZERO));
    registry.add(AlertKind::Info, "b", "", Some(Duration::from_millis(50)));
    registry.add(AlertKind::Info, "c", "", Some(Duration::ZERO));
    registry.clear();
    assert!(registry.is_empty());

    scheduler.fire_all();

    assert!(registry.is_empty());
    let events = drain(&mut rx);
    assert_eq!(events.len(), 4);
    assert_eq!(events[3], AlertEvent::Cleared { count: 3 });
}

#[test]
fn test_clear_empty_emits_nothing() {
    let (registry, _) = recording_registry();
    let mut rx = registry.subscribe();

    registry.clear();

    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_timer_outliving_registry_does_nothing() {
    let (registry, scheduler) = recording_registry();
    registry.add(AlertKind::Info, "a", "", Some(Duration::from_millis(10)));
    drop(registry);

    scheduler.fire_all();
}

#[rstest]
#[case(AlertKind::Success)]
#[case(AlertKind::Error)]
#[case(AlertKind::Warning)]
#[case(AlertKind::Info)]
fn test_wrappers_bind_kind(#[case] kind: AlertKind) {
    let (registry, scheduler) = recording_registry();

    let id = match kind {
        AlertKind::Success => registry.show_success("T", "X", None),
        AlertKind::Error => registry.show_error("T", "X", None),
        AlertKind::Warning => registry.show_warning("T", "X", None),
        AlertKind::Info => registry.show_info("T", "X", None),
    };

    let alert = registry.get(&id).unwrap();
    assert_eq!(alert.kind, kind);
    assert_eq!(alert.timeout, 5000);
    assert_eq!(scheduler.delays(), vec![Duration::from_millis(5000)]);
}

#[test]
fn test_show_error_matches_add() {
    let (registry, _) = recording_registry();

    let shown = registry.show_error("E", "oops", None);
    let added = registry.add(AlertKind::Error, "E", "oops", Some(Duration::from_millis(5000)));

    let shown = registry.get(&shown).unwrap();
    let added = registry.get(&added).unwrap();
    assert_eq!(
        (shown.kind, shown.title, shown.text, shown.timeout),
        (added.kind, added.title, added.text, added.timeout)
    );
}

#[test]
fn test_wrapper_timeout_override() {
    let (registry, _) = recording_registry();

    let id = registry.show_warning("W", "w", Some(Duration::from_millis(750)));

    assert_eq!(registry.get(&id).unwrap().timeout, 750);
}

#[test]
fn test_configured_default_timeout() {
    let config = AlertsConfig {
        default_timeout_ms: 1200,
        ..Default::default()
    };
    let scheduler = Arc::new(RecordingScheduler::default());
    let registry = AlertRegistry::with_scheduler(config, scheduler.clone());

    let id = registry.show_info("I", "i", None);

    assert_eq!(registry.get(&id).unwrap().timeout, 1200);
    assert_eq!(scheduler.delays(), vec![Duration::from_millis(1200)]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_alert_expires_after_timeout() {
    let registry = AlertRegistry::new(AlertsConfig::default()).unwrap();
    let mut rx = registry.subscribe();

    let id = registry.add(AlertKind::Info, "T", "X", Some(Duration::from_millis(100)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(registry.get(&id).is_some());

    tokio::time::sleep(Duration::from_millis(51)).await;
    assert!(registry.get(&id).is_none());

    assert!(matches!(rx.recv().await.unwrap(), AlertEvent::Added(a) if a.id == id));
    assert_eq!(
        rx.recv().await.unwrap(),
        AlertEvent::Removed {
            id,
            reason: RemovalReason::Expired
        }
    );
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_timers_fire_in_delay_order() {
    let registry = AlertRegistry::new(AlertsConfig::default()).unwrap();

    let slow = registry.add(AlertKind::Info, "slow", "", Some(Duration::from_millis(300)));
    let fast = registry.add(AlertKind::Info, "fast", "", Some(Duration::from_millis(100)));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(registry.get(&fast).is_none());
    assert!(registry.get(&slow).is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(registry.is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_early_dismissal_then_timer() {
    let registry = AlertRegistry::new(AlertsConfig::default()).unwrap();
    let mut rx = registry.subscribe();

    let id = registry.add(AlertKind::Warning, "W", "", Some(Duration::from_millis(50)));
    assert!(registry.remove(&id));

    tokio::time::sleep(Duration::from_millis(60)).await;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        AlertEvent::Removed {
            id,
            reason: RemovalReason::Dismissed
        }
    );
}

#[test]
fn test_concurrent_adds_keep_id_list_and_event_order() {
    let (registry, _) = recording_registry();
    let mut rx = registry.subscribe();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..8 {
                    registry.add(AlertKind::Info, "t", "x", Some(Duration::ZERO));
                }
            });
        }
    });

    let listed: Vec<AlertId> = registry.alerts().into_iter().map(|a| a.id).collect();
    let expected: Vec<AlertId> = (1..=32).map(AlertId::from_sequence).collect();
    assert_eq!(listed, expected);

    let announced: Vec<AlertId> = drain(&mut rx)
        .into_iter()
        .map(|event| match event {
            AlertEvent::Added(alert) => alert.id,
            other => panic!("unexpected event: {other:?}"),
        })
        .collect();
    assert_eq!(announced, expected);
}

#[test]
fn test_new_outside_runtime_fails() {
    assert!(AlertRegistry::new(AlertsConfig::default()).is_err());
}

proptest! {
    #[test]
    fn test_ids_pairwise_distinct(kinds in prop::collection::vec(0usize..4, 1..64)) {
        let (registry, _) = recording_registry();

        let ids: Vec<AlertId> = kinds
            .iter()
            .map(|&k| registry.add(AlertKind::ALL[k], "t", "x", None))
            .collect();

        let unique: HashSet<&AlertId> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert_eq!(registry.len(), ids.len());
    }
}
