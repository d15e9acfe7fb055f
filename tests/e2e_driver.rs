//! Tokio frame loop (requires the `runtime` feature).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hexmesh::driver::{Driver, FrameSink, WatchSink};
use hexmesh::{ClusterVisual, Error, Frame, NodeId, Result, Stage, VisualConfig};

fn visual() -> ClusterVisual {
    ClusterVisual::new(VisualConfig::default().with_seed(5)).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_driver_publishes_frames() {
    let (sink, mut rx) = WatchSink::new();
    let driver = Driver::spawn(visual(), sink);

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().as_ref().unwrap().stage, Stage::Cluster);

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    rx.changed().await.unwrap();
    let at = rx.borrow().as_ref().unwrap().at;
    assert!(at >= 2_000, "frame clock lagging: {at}");

    let shared = driver.visual();
    assert!(shared.lock().stats().beams_fired >= 2);

    driver.shutdown().await.unwrap();
    assert!(!shared.lock().is_running());
}

#[tokio::test(start_paused = true)]
async fn test_driver_stage_and_hover_commands() {
    let (sink, mut rx) = WatchSink::new();
    let driver = Driver::spawn(visual(), sink);

    assert!(driver.set_stage(Stage::Hive));
    assert!(!driver.set_stage(Stage::Hive));
    tokio::time::sleep(Duration::from_millis(50)).await;
    rx.changed().await.unwrap();
    {
        let frame = rx.borrow();
        let frame = frame.as_ref().unwrap();
        assert_eq!(frame.stage, Stage::Hive);
        assert_eq!(frame.nodes.len(), 19);
    }

    assert!(driver.hover_enter(NodeId(0)));
    assert!(!driver.hover_enter(NodeId(0)));
    driver.hover_leave(NodeId(0));
    assert_eq!(driver.visual().lock().scene().hovered(), None);

    driver.shutdown().await.unwrap();
}

struct FailingSink {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl FrameSink for FailingSink {
    async fn present(&self, _frame: Frame) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::DriverClosed)
    }
}

#[tokio::test(start_paused = true)]
async fn test_driver_stops_on_sink_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let driver = Driver::spawn(visual(), FailingSink { calls: calls.clone() });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    driver.shutdown().await.unwrap();
}
