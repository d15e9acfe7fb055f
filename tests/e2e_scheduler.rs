//! Pulse scheduler behaviour: beam timing, chains, breathing, stage changes
//! and hover bursts.

use hexmesh::scheduler::Scheduler;
use hexmesh::timing::*;
use hexmesh::{Activation, ClusterVisual, NodeId, Scene, Stage, VisualConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn visual(stage: Stage, seed: u64) -> ClusterVisual {
    ClusterVisual::new(VisualConfig::default().with_seed(seed).with_initial_stage(stage)).unwrap()
}

// ============================================================================
// 1. One beam, step by step
// ============================================================================

#[test]
fn test_beam_lifecycle_ordering() {
    let mut v = visual(Stage::Cluster, 11);

    assert_eq!(v.scene().pulses().len(), 1);
    let first = v.scene().pulses()[0];
    let (s, t) = (first.from, first.to);
    assert_ne!(s, t);
    assert_eq!(first.created_at, 0);
    assert_eq!(v.scene().activation().sorted(), vec![(s, Activation::Source)]);

    v.advance(TRAVEL_MS - 1);
    assert_eq!(v.scene().activation().get(t), None, "target lit before arrival");

    v.advance(TRAVEL_MS);
    assert_eq!(v.scene().activation().get(s), Some(Activation::Source));
    assert_eq!(v.scene().activation().get(t), Some(Activation::Target));

    v.advance(SOURCE_CLEAR_MS - 1);
    assert_eq!(v.scene().activation().get(s), Some(Activation::Source));

    v.advance(SOURCE_CLEAR_MS);
    assert_eq!(v.scene().activation().sorted(), vec![(t, Activation::Target)]);

    v.advance(PULSE_LIFETIME_MS - 1);
    assert_eq!(v.scene().pulses().len(), 1);
    v.advance(PULSE_LIFETIME_MS);
    assert!(v.scene().pulses().is_empty());

    v.advance(TARGET_CLEAR_MS - 1);
    assert_eq!(v.scene().activation().sorted(), vec![(t, Activation::Target)]);

    // Hand-off: the target becomes the next source in the same instant.
    v.advance(TARGET_CLEAR_MS);
    assert_eq!(v.scene().activation().sorted(), vec![(t, Activation::Source)]);
    let next = v.scene().pulses()[0];
    assert_eq!(next.from, t);
    assert_eq!(next.created_at, TARGET_CLEAR_MS);
}

#[test]
fn test_no_target_lit_before_travel_completes() {
    let mut v = visual(Stage::Cluster, 5);
    for now in 0..=20_000u64 {
        v.advance(now);
        for p in v.scene().pulses() {
            if p.age(now) < TRAVEL_MS {
                let a = v.scene().activation().get(p.to);
                assert!(
                    !matches!(a, Some(Activation::Target | Activation::Both)),
                    "t={now}: node {} shows {a:?} before pulse {:?} arrived",
                    p.to,
                    p.id
                );
            }
        }
    }
}

#[test]
fn test_coarse_advance_keeps_exact_timing() {
    let mut fine = visual(Stage::Cluster, 21);
    let mut coarse = visual(Stage::Cluster, 21);
    for now in (0..=9_000).step_by(1) {
        fine.advance(now);
    }
    coarse.advance(9_000);
    assert_eq!(fine.scene().activation(), coarse.scene().activation());
    assert_eq!(fine.scene().pulses(), coarse.scene().pulses());
}

// ============================================================================
// 2. Chains
// ============================================================================

#[test]
fn test_cluster_chain_runs_indefinitely() {
    let mut v = visual(Stage::Cluster, 3);
    v.advance(60_000);
    let stats = v.stats();
    // One emission every TARGET_CLEAR_MS from t=0, inclusive of t=60000.
    assert_eq!(stats.beams_fired + stats.beams_skipped, 31);
    assert!(v.pending_timers() > 0);
}

#[test]
fn test_hive_runs_two_staggered_chains() {
    let mut v = visual(Stage::Hive, 9);
    assert_eq!(v.scene().pulses().len(), 1);

    v.advance(CHAIN_STAGGER_MS);
    assert_eq!(v.scene().pulses().len(), 2);
    let created: Vec<u64> = v.scene().pulses().iter().map(|p| p.created_at).collect();
    assert_eq!(created, vec![0, CHAIN_STAGGER_MS]);

    v.advance(10_000);
    let stats = v.stats();
    // Chain 1 at 0, 2000, .., 10000; chain 2 at 800, 2800, .., 8800.
    assert_eq!(stats.beams_fired + stats.beams_skipped, 11);
}

#[test]
fn test_chain_count_per_stage() {
    assert_eq!(Stage::Single.chain_count(), 0);
    assert_eq!(Stage::Cluster.chain_count(), 1);
    assert_eq!(Stage::Hive.chain_count(), 2);
}

// ============================================================================
// 3. Single stage breathing
// ============================================================================

#[test]
fn test_single_breathes_without_pulses() {
    let mut v = visual(Stage::Single, 1);
    let both = vec![(NodeId(0), Activation::Both)];

    for cycle in 0..10u64 {
        let lit_at = cycle * 2 * BREATH_PERIOD_MS;
        let dark_at = lit_at + BREATH_PERIOD_MS;

        v.advance(lit_at);
        assert_eq!(v.scene().activation().sorted(), both, "t={lit_at}");
        v.advance(dark_at - 1);
        assert_eq!(v.scene().activation().sorted(), both, "t={}", dark_at - 1);

        v.advance(dark_at);
        assert!(v.scene().activation().is_empty(), "t={dark_at}");
        v.advance(dark_at + BREATH_PERIOD_MS - 1);
        assert!(v.scene().activation().is_empty());

        assert!(v.scene().pulses().is_empty());
    }
    assert_eq!(v.stats().beams_fired, 0);
}

// ============================================================================
// 4. Stage changes and teardown
// ============================================================================

#[test]
fn test_stage_change_leaves_no_stale_ids() {
    let mut v = visual(Stage::Hive, 17);
    v.advance(5_000);
    let before = v.generation();

    assert!(v.set_stage(Stage::Cluster, 5_000));
    assert!(v.generation() > before);
    assert_eq!(v.scene().layout().len(), 7);

    for now in (5_000..40_000).step_by(10) {
        v.advance(now);
        for (id, _) in v.scene().activation().iter() {
            assert!(id.0 < 7, "t={now}: stale activation on node {id}");
        }
        for p in v.scene().pulses() {
            assert!(p.from.0 < 7 && p.to.0 < 7, "t={now}: stale pulse {p:?}");
        }
    }
}

#[test]
fn test_switch_to_single_only_touches_origin() {
    let mut v = visual(Stage::Hive, 2);
    v.advance(3_333);
    v.set_stage(Stage::Single, 3_333);

    for now in (3_333..20_000).step_by(7) {
        v.advance(now);
        assert!(v.scene().pulses().is_empty());
        for (id, a) in v.scene().activation().iter() {
            assert_eq!((id, a), (NodeId(0), Activation::Both));
        }
    }
}

#[test]
fn test_same_stage_is_noop() {
    let mut v = visual(Stage::Cluster, 4);
    let g = v.generation();
    assert!(!v.set_stage(Stage::Cluster, 100));
    assert_eq!(v.generation(), g);
}

#[test]
fn test_teardown_freezes_scene() {
    let mut v = visual(Stage::Hive, 8);
    v.advance(1_000);
    let snapshot = v.scene().activation().clone();
    v.teardown();
    assert_eq!(v.pending_timers(), 0);
    assert_eq!(v.advance(100_000), 0);
    assert_eq!(v.scene().activation(), &snapshot);
    assert!(!v.is_running());

    // A stage selection brings it back.
    assert!(v.set_stage(Stage::Hive, 100_000));
    assert!(v.is_running());
    assert!(v.pending_timers() > 0);
}

// ============================================================================
// 5. Hover bursts
// ============================================================================

fn burst_only(stage: Stage) -> (Scheduler, Scene) {
    let config = VisualConfig::default().with_seed(1);
    (Scheduler::new(&config), Scene::new(stage))
}

#[test]
fn test_burst_reaches_ring_with_beam_timing() {
    let (mut s, mut scene) = burst_only(Stage::Cluster);
    assert!(s.burst(&mut scene, NodeId(0), 0));

    let ring: Vec<NodeId> = (1..7).map(NodeId).collect();
    let targets: Vec<NodeId> = scene.pulses().iter().map(|p| p.to).collect();
    assert_eq!(targets, ring);
    assert_eq!(scene.activation().sorted(), vec![(NodeId(0), Activation::Source)]);

    s.advance(&mut scene, TRAVEL_MS - 1);
    assert_eq!(scene.activation().len(), 1);

    s.advance(&mut scene, TRAVEL_MS);
    assert_eq!(scene.activation().len(), 7);
    for id in &ring {
        assert_eq!(scene.activation().get(*id), Some(Activation::Target));
    }

    s.advance(&mut scene, SOURCE_CLEAR_MS);
    assert_eq!(scene.activation().get(NodeId(0)), None);

    s.advance(&mut scene, TARGET_CLEAR_MS);
    assert!(scene.activation().is_empty());
    assert!(scene.pulses().is_empty());
    // Bursts do not chain.
    assert_eq!(s.pending(), 0);
}

#[test]
fn test_burst_cooldown() {
    let mut v = visual(Stage::Cluster, 6);
    assert!(v.hover_enter(NodeId(3), 100));
    v.hover_leave(NodeId(3));
    assert!(!v.hover_enter(NodeId(3), 500));
    assert!(!v.hover_enter(NodeId(3), 100 + HOVER_COOLDOWN_MS - 1));
    assert!(v.hover_enter(NodeId(2), 600), "cooldown is per node");
    assert!(v.hover_enter(NodeId(3), 100 + HOVER_COOLDOWN_MS));
    assert_eq!(v.stats().bursts_fired, 3);
    assert_eq!(v.stats().bursts_suppressed, 2);
}

#[test]
fn test_single_stage_hover_highlights_without_burst() {
    let mut v = visual(Stage::Single, 6);
    assert!(!v.hover_enter(NodeId(0), 10));
    assert_eq!(v.scene().hovered(), Some(NodeId(0)));
    assert!(v.scene().pulses().is_empty());

    v.hover_leave(NodeId(5));
    assert_eq!(v.scene().hovered(), Some(NodeId(0)));
    v.hover_leave(NodeId(0));
    assert_eq!(v.scene().hovered(), None);
}

#[test]
fn test_burst_timers_die_with_stage() {
    let mut v = visual(Stage::Hive, 12);
    v.hover_enter(NodeId(18), 0);
    v.set_stage(Stage::Cluster, 100);
    for now in (100..5_000).step_by(5) {
        v.advance(now);
        assert!(v.scene().activation().iter().all(|(id, _)| id.0 < 7));
    }
}

proptest! {
    #[test]
    fn prop_at_most_one_burst_per_cooldown(mut times in proptest::collection::vec(0u64..20_000, 1..60)) {
        times.sort_unstable();
        let mut v = visual(Stage::Cluster, 99);
        let mut fired_at: Vec<u64> = Vec::new();
        for t in times {
            if v.hover_enter(NodeId(0), t) {
                fired_at.push(t);
            }
        }
        prop_assert!(!fired_at.is_empty());
        for pair in fired_at.windows(2) {
            prop_assert!(pair[1] - pair[0] >= HOVER_COOLDOWN_MS);
        }
    }
}
