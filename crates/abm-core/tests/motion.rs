use std::time::{Duration, Instant};

use abm_core::{Model, StepRng, Ticker, Vec3};

fn agent_at(model: &mut Model, pos: Vec3) -> abm_core::AgentId {
    let id = model.create_agents(1, "m")[0];
    model.agent_mut(id).unwrap().set_position(pos);
    id
}

#[test]
fn face_then_forward_moves_toward_target() {
    let mut model = Model::new();
    let id = agent_at(&mut model, Vec3::ZERO);
    let target = Vec3::new(0.0, 10.0, 0.0);

    let a = model.agent_mut(id).unwrap();
    a.face(target);
    a.forward(5.0);

    let p = model.agent(id).unwrap().position;
    assert!((p.x).abs() < 1e-9);
    assert!((p.y - 5.0).abs() < 1e-9);
    assert!((p.z).abs() < 1e-9);
}

#[test]
fn face_is_noop_when_coincident() {
    let mut model = Model::new();
    let id = agent_at(&mut model, Vec3::new(1.0, 2.0, 3.0));
    let a = model.agent_mut(id).unwrap();
    let before = a.transform;
    a.face(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(a.transform, before);
}

#[test]
fn within_box_is_per_axis() {
    let mut model = Model::new();
    let id = agent_at(&mut model, Vec3::new(0.9, -0.9, 0.0));
    let a = model.agent(id).unwrap();
    assert!(a.within_box(Vec3::ZERO, 1.0));
    assert!(!a.within_box(Vec3::ZERO, 0.5));
}

#[test]
fn position_changes_set_dirty() {
    let mut model = Model::new();
    let id = agent_at(&mut model, Vec3::ZERO);
    let a = model.agent_mut(id).unwrap();
    a.dirty = false;
    a.forward(1.0);
    assert!(a.dirty);
}

#[test]
fn ticker_skips_frames_below_interval() {
    let t0 = Instant::now();
    let mut ticker = Ticker::start(Duration::from_secs(1), t0);

    assert_eq!(ticker.poll(t0 + Duration::from_millis(400)), None);
    let elapsed = ticker.poll(t0 + Duration::from_millis(1200)).unwrap();
    assert_eq!(elapsed, Duration::from_millis(1200));
    // Skipped frames are dropped, not queued.
    assert_eq!(ticker.poll(t0 + Duration::from_millis(1300)), None);
    let elapsed = ticker.poll(t0 + Duration::from_millis(2300)).unwrap();
    assert_eq!(elapsed, Duration::from_millis(1100));
}

#[test]
fn step_rng_is_deterministic_and_in_range() {
    let mut a = StepRng::new(7);
    let mut b = StepRng::new(7);
    for _ in 0..100 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut rng = StepRng::new(1);
    for _ in 0..100 {
        assert!(rng.pick_index(3) < 3);
    }
    assert_eq!(rng.pick_index(0), 0);
    assert_eq!(rng.pick_index(1), 0);
}
