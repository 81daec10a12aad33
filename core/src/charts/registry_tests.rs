//! Tests for chart registry lifecycle
//!
//! Verifies release-before-create, destroy-failure tolerance and the
//! one-instance-per-slot guarantee.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

/// Handle that counts its destroy calls and can be told to fail
#[derive(Debug)]
struct FakeHandle {
    id: u32,
    destroys: Arc<AtomicUsize>,
    fail: bool,
}

impl ChartHandle for FakeHandle {
    fn destroy(&mut self) -> Result<(), ChartError> {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(ChartError::Destroy {
                reason: "engine already torn down".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn handle(id: u32, destroys: &Arc<AtomicUsize>) -> FakeHandle {
    FakeHandle {
        id,
        destroys: Arc::clone(destroys),
        fail: false,
    }
}

#[test]
fn test_double_replace_destroys_first_once() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let mut registry = ChartRegistry::new();

    registry.replace("trend", || handle(1, &first));
    registry.replace("trend", || handle(2, &second));

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("trend").map(|h| h.id), Some(2));
}

#[test]
fn test_destroy_failure_does_not_block_replacement() {
    let destroys = Arc::new(AtomicUsize::new(0));
    let mut registry = ChartRegistry::new();

    registry.replace("summary", || FakeHandle {
        id: 1,
        destroys: Arc::clone(&destroys),
        fail: true,
    });
    let stored = registry.replace("summary", || handle(2, &destroys));

    assert_eq!(stored.map(|h| h.id), Some(2));
    assert_eq!(destroys.load(Ordering::SeqCst), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_old_instance_released_before_factory_runs() {
    let destroys = Arc::new(AtomicUsize::new(0));
    let mut registry = ChartRegistry::new();
    registry.replace("slot", || handle(1, &destroys));

    let seen = Arc::clone(&destroys);
    registry.replace("slot", move || {
        // the factory observes the prior destroy already done
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        handle(2, &seen)
    });
}

#[test]
fn test_blank_slot_is_noop() {
    let destroys = Arc::new(AtomicUsize::new(0));
    let mut registry: ChartRegistry<FakeHandle> = ChartRegistry::new();
    let mut called = false;

    let stored = registry.replace("  ", || {
        called = true;
        handle(1, &destroys)
    });

    assert!(stored.is_none());
    assert!(!called);
    assert!(registry.is_empty());
}

#[test]
fn test_try_replace_failure_leaves_slot_empty() {
    let destroys = Arc::new(AtomicUsize::new(0));
    let mut registry = ChartRegistry::new();
    registry.replace("moroso", || handle(1, &destroys));

    let result: Result<Option<&FakeHandle>, ChartError> =
        registry.try_replace("moroso", || {
            Err(ChartError::Empty {
                slot: "moroso".to_string(),
            })
        });

    assert!(result.is_err());
    assert_eq!(destroys.load(Ordering::SeqCst), 1);
    assert!(!registry.contains("moroso"));
}

#[test]
fn test_release_all_destroys_every_slot() {
    let destroys = Arc::new(AtomicUsize::new(0));
    let mut registry = ChartRegistry::new();
    registry.replace("b", || handle(1, &destroys));
    registry.replace("a", || handle(2, &destroys));
    assert_eq!(registry.slots(), vec!["a", "b"]);

    registry.release_all();
    assert_eq!(destroys.load(Ordering::SeqCst), 2);
    assert!(registry.is_empty());
    assert!(!registry.release("a"));
}

struct FakeEngine {
    destroys: Arc<AtomicUsize>,
    rendered: u32,
}

impl ChartEngine for FakeEngine {
    type Handle = FakeHandle;

    fn render(&mut self, slot: &str, spec: &ChartSpec) -> Result<FakeHandle, ChartError> {
        if spec.is_empty() {
            return Err(ChartError::Empty {
                slot: slot.to_string(),
            });
        }
        self.rendered += 1;
        Ok(handle(self.rendered, &self.destroys))
    }
}

#[test]
fn test_render_into_uses_engine_and_registry() {
    let destroys = Arc::new(AtomicUsize::new(0));
    let mut engine = FakeEngine {
        destroys: Arc::clone(&destroys),
        rendered: 0,
    };
    let mut registry = ChartRegistry::new();
    let spec = ChartSpec {
        title: "Trend".to_string(),
        kind: ChartKind::Line,
        labels: vec!["01/2024".to_string()],
        series: vec![SeriesSpec {
            name: "saldo".to_string(),
            values: vec![1.0],
        }],
    };

    assert!(render_into(&mut registry, &mut engine, "trend", &spec).unwrap());
    assert!(render_into(&mut registry, &mut engine, "trend", &spec).unwrap());
    assert_eq!(registry.get("trend").map(|h| h.id), Some(2));
    assert_eq!(destroys.load(Ordering::SeqCst), 1);

    let empty = ChartSpec {
        labels: vec![],
        ..spec
    };
    assert!(render_into(&mut registry, &mut engine, "trend", &empty).is_err());
    assert!(!registry.contains("trend"));
    assert_eq!(destroys.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_shared_registry_serializes_concurrent_replace() {
    let destroys = Arc::new(AtomicUsize::new(0));
    let registry: SharedChartRegistry<FakeHandle> = SharedChartRegistry::new();

    let mut tasks = Vec::new();
    for id in 0..16 {
        let registry = registry.clone();
        let destroys = Arc::clone(&destroys);
        tasks.push(tokio::spawn(async move {
            registry.replace("trend", || handle(id, &destroys)).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap());
    }

    assert_eq!(registry.len().await, 1);
    // every instance but the surviving one was destroyed exactly once
    assert_eq!(destroys.load(Ordering::SeqCst), 15);
}
