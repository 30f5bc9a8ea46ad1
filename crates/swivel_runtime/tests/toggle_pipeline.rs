//! End-to-end toggle scenarios against the headless world

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use swivel_animation::{AnimationState, AnimationType};
use swivel_core::{
    ActorId, Archetype, BlockDescriptor, ChunkStatus, Cuboid, HeadlessWorld, IVec3,
    MovementDirection, StructureId, StructureSnapshot, WorldContext,
};
use swivel_runtime::{
    EventVerdict, PreparedToggle, RuntimeBuilder, RuntimeConfig, TickExecutor, ToggleAction,
    ToggleCause, ToggleListener, ToggleRequest, ToggleResult, TogglePipeline,
};

const GATE: StructureId = StructureId(1);
const PLAYER: ActorId = ActorId(7);

// ============================================================================
// Fixtures
// ============================================================================

/// 5x1x5 portcullis lifting 3 blocks
fn gate() -> StructureSnapshot {
    StructureSnapshot::new(
        GATE,
        "gate",
        Archetype::Portcullis { blocks_to_move: 3 },
        Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(4, 64, 4)),
        IVec3::new(2, 64, 2),
        MovementDirection::Up,
    )
}

fn windmill() -> StructureSnapshot {
    StructureSnapshot::new(
        StructureId(2),
        "windmill",
        Archetype::Windmill { quarter_circles: 4 },
        Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(0, 66, 2)),
        IVec3::new(0, 65, 1),
        MovementDirection::North,
    )
}

fn world_with(snapshot: StructureSnapshot) -> Arc<HeadlessWorld> {
    let world = Arc::new(HeadlessWorld::new());
    world.insert_structure(snapshot, &BlockDescriptor::new("iron_bars"));
    world
}

fn runtime(world: &Arc<HeadlessWorld>, config: RuntimeConfig) -> (TogglePipeline, TickExecutor) {
    RuntimeBuilder::new(WorldContext::from_shared(Arc::clone(world)))
        .with_config(config)
        .build()
}

fn run_to_idle(executor: &mut TickExecutor) {
    executor.tick();
    for _ in 0..10_000 {
        if executor.is_idle() {
            return;
        }
        executor.tick();
    }
    panic!("animations did not finish");
}

fn player_request(id: StructureId) -> ToggleRequest {
    ToggleRequest::new(id, ToggleCause::Player(PLAYER))
}

#[derive(Default)]
struct Recorder {
    starts: Mutex<Vec<StructureId>>,
    ends: Mutex<Vec<(StructureId, AnimationState)>>,
    veto: Option<String>,
}

impl ToggleListener for Recorder {
    fn on_prepare(&self, _toggle: &PreparedToggle) -> EventVerdict {
        match &self.veto {
            Some(reason) => EventVerdict::Cancel(reason.clone()),
            None => EventVerdict::Allow,
        }
    }

    fn on_start(&self, toggle: &PreparedToggle) {
        self.starts.lock().push(toggle.id());
    }

    fn on_end(&self, toggle: &PreparedToggle, state: AnimationState) {
        self.ends.lock().push((toggle.id(), state));
    }
}

/// Listener that panics on the named events
struct Panicking(&'static [&'static str]);

impl ToggleListener for Panicking {
    fn on_prepare(&self, _toggle: &PreparedToggle) -> EventVerdict {
        if self.0.contains(&"prepare") {
            panic!("prepare listener broke");
        }
        EventVerdict::Allow
    }

    fn on_start(&self, _toggle: &PreparedToggle) {
        if self.0.contains(&"start") {
            panic!("start listener broke");
        }
    }

    fn on_end(&self, _toggle: &PreparedToggle, _state: AnimationState) {
        if self.0.contains(&"end") {
            panic!("end listener broke");
        }
    }
}

// ============================================================================
// Admission
// ============================================================================

#[test]
fn test_toggle_opens_and_commits() {
    let world = world_with(gate());
    let recorder = Arc::new(Recorder::default());
    let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(RuntimeConfig::testing())
        .with_listener(recorder.clone())
        .build();

    let mut ticket = pipeline.submit(player_request(GATE));
    assert_eq!(ticket.try_result(), None);
    run_to_idle(&mut executor);

    assert_eq!(ticket.try_result(), Some(ToggleResult::Success));
    let gate = world.structure(GATE).unwrap();
    assert!(gate.is_open());
    assert_eq!(gate.cuboid(), Cuboid::new(IVec3::new(0, 67, 0), IVec3::new(4, 67, 4)));
    assert_eq!(world.blocks_in(&gate.cuboid()), 25);
    assert_eq!(world.block_count(), 25);
    assert_eq!(world.live_proxies(), 0);
    assert!(world.notifications().is_empty());
    assert!(pipeline.registry().is_empty());

    assert_eq!(*recorder.starts.lock(), vec![GATE]);
    assert_eq!(*recorder.ends.lock(), vec![(GATE, AnimationState::Completed)]);
}

#[test]
fn test_same_tick_requests_second_is_busy() {
    let world = world_with(gate());
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut first = pipeline.submit(ToggleRequest::new(GATE, ToggleCause::Redstone));
    let mut second = pipeline.submit(player_request(GATE));
    executor.tick();

    assert_eq!(first.try_result(), Some(ToggleResult::Success));
    assert_eq!(second.try_result(), Some(ToggleResult::Busy));
    assert_eq!(world.stats().proxies_spawned, 25);
    assert_eq!(executor.active_count(), 1);

    let notifications = world.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].actor, PLAYER);
    assert_eq!(notifications[0].key, "toggle.busy");

    run_to_idle(&mut executor);
    assert_eq!(world.stats().commits, 1);
    assert_eq!(world.stats().proxies_spawned, 25);
}

#[test]
fn test_request_while_animating_is_busy() {
    let world = world_with(gate());
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    pipeline.submit(ToggleRequest::new(GATE, ToggleCause::Redstone));
    executor.tick();
    executor.tick();
    assert!(pipeline.registry().is_busy(GATE));
    assert_eq!(pipeline.registry().state(GATE), Some(AnimationState::Active));

    let mut late = pipeline.submit(player_request(GATE));
    executor.tick();
    assert_eq!(late.try_result(), Some(ToggleResult::Busy));
}

// ============================================================================
// Chunk gate
// ============================================================================

#[test]
fn test_chunk_failure_touches_nothing() {
    let world = world_with(gate());
    world.set_chunk_status(ChunkStatus::Fail);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut ticket = pipeline.submit(player_request(GATE));
    executor.tick();

    assert_eq!(ticket.try_result(), Some(ToggleResult::Error));
    let stats = world.stats();
    assert_eq!(stats.blocks_placed, 0);
    assert_eq!(stats.blocks_cleared, 0);
    assert_eq!(stats.proxies_spawned, 0);
    assert_eq!(stats.commits, 0);
    assert!(!pipeline.registry().is_busy(GATE));
    assert!(executor.is_idle());

    let notifications = world.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].key, "toggle.error.chunks_unavailable");
}

#[test]
fn test_chunks_loaded_on_demand() {
    let world = world_with(gate());
    world.set_chunk_status(ChunkStatus::RequiredLoad);
    world.set_loadable(true);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut ticket = pipeline.submit(player_request(GATE));
    run_to_idle(&mut executor);

    assert_eq!(ticket.try_result(), Some(ToggleResult::Success));
    assert_eq!(world.stats().chunk_loads, 1);
    assert!(world.structure(GATE).unwrap().is_open());
}

#[test]
fn test_unloadable_chunks_are_unavailable() {
    let world = world_with(gate());
    world.set_chunk_status(ChunkStatus::RequiredLoad);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut ticket = pipeline.submit(player_request(GATE));
    executor.tick();

    assert_eq!(ticket.try_result(), Some(ToggleResult::Error));
    assert_eq!(world.stats().proxies_spawned, 0);
    assert_eq!(world.notifications().len(), 1);
}

// ============================================================================
// Rejections before admission
// ============================================================================

#[test]
fn test_invalid_direction_is_reported() {
    let door = StructureSnapshot::new(
        StructureId(3),
        "door",
        Archetype::BigDoor,
        Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(0, 66, 3)),
        IVec3::new(0, 64, 0),
        MovementDirection::Up,
    );
    let world = world_with(door);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut ticket = pipeline.submit(player_request(StructureId(3)));
    assert_eq!(ticket.try_result(), Some(ToggleResult::Error));
    executor.tick();

    assert_eq!(world.stats().proxies_spawned, 0);
    let notifications = world.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].key, "toggle.error.invalid_direction");
}

#[test]
fn test_move_past_world_coordinates_is_reported() {
    let far_gate = StructureSnapshot::new(
        GATE,
        "gate",
        Archetype::Portcullis {
            blocks_to_move: u32::MAX,
        },
        Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(4, 64, 4)),
        IVec3::new(2, 64, 2),
        MovementDirection::Up,
    );
    let world = world_with(far_gate);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let result = pipeline.toggle(player_request(GATE));
    executor.tick();

    assert_eq!(result, ToggleResult::Error);
    assert_eq!(world.stats().proxies_spawned, 0);
    assert!(!world.structure(GATE).unwrap().is_open());
    let notifications = world.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].key, "toggle.error.out_of_range");
    assert_eq!(notifications[0].args, vec!["#1", "up"]);
}

#[test]
fn test_prepare_veto_cancels() {
    let world = world_with(gate());
    let recorder = Arc::new(Recorder {
        veto: Some("protected region".to_string()),
        ..Recorder::default()
    });
    let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(RuntimeConfig::testing())
        .with_listener(recorder.clone())
        .build();

    let result = pipeline.toggle(player_request(GATE));
    executor.tick();

    assert_eq!(result, ToggleResult::Cancelled);
    assert!(recorder.starts.lock().is_empty());
    assert_eq!(world.stats().proxies_spawned, 0);
    let notifications = world.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].key, "toggle.cancelled");
    assert_eq!(notifications[0].args, vec!["#1", "protected region"]);
}

#[test]
fn test_panicking_prepare_listener_cancels() {
    let world = world_with(gate());
    let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(RuntimeConfig::testing())
        .with_listener(Arc::new(Panicking(&["prepare"])))
        .build();

    let result = pipeline.toggle(player_request(GATE));
    executor.tick();

    assert_eq!(result, ToggleResult::Cancelled);
    assert_eq!(world.stats().proxies_spawned, 0);
    let notifications = world.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].args, vec!["#1", "a toggle listener failed"]);
}

#[test]
fn test_panicking_listener_does_not_stop_animation() {
    let world = world_with(gate());
    let recorder = Arc::new(Recorder::default());
    let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(RuntimeConfig::testing())
        .with_listener(Arc::new(Panicking(&["start", "end"])))
        .with_listener(recorder.clone())
        .build();

    let mut ticket = pipeline.submit(player_request(GATE));
    run_to_idle(&mut executor);

    assert_eq!(ticket.try_result(), Some(ToggleResult::Success));
    let gate = world.structure(GATE).unwrap();
    assert!(gate.is_open());
    assert_eq!(world.blocks_in(&gate.cuboid()), 25);
    assert_eq!(world.live_proxies(), 0);
    assert!(pipeline.registry().is_empty());
    assert_eq!(*recorder.starts.lock(), vec![GATE]);
    assert_eq!(*recorder.ends.lock(), vec![(GATE, AnimationState::Completed)]);
}

#[test]
fn test_state_locked_and_size_rejections() {
    let world = Arc::new(HeadlessWorld::new());
    let block = BlockDescriptor::new("iron_bars");
    world.insert_structure(gate().with_open(true), &block);
    let locked = StructureSnapshot::new(
        StructureId(4),
        "vault",
        Archetype::SlidingDoor { blocks_to_move: 0 },
        Cuboid::new(IVec3::new(10, 64, 0), IVec3::new(12, 65, 0)),
        IVec3::new(10, 64, 0),
        MovementDirection::East,
    )
    .with_locked(true);
    world.insert_structure(locked, &block);
    let (pipeline, _executor) =
        runtime(&world, RuntimeConfig::testing().with_max_block_count(10));

    let already = pipeline.toggle(player_request(GATE).with_action(ToggleAction::Open));
    let locked = pipeline.toggle(player_request(StructureId(4)));
    let too_big = pipeline.toggle(player_request(GATE));
    let unknown = pipeline.toggle(player_request(StructureId(99)));

    assert_eq!(already, ToggleResult::NoChange);
    assert_eq!(locked, ToggleResult::Locked);
    assert_eq!(too_big, ToggleResult::TooBig);
    assert_eq!(unknown, ToggleResult::Error);

    let keys: Vec<String> = world.notifications().into_iter().map(|n| n.key).collect();
    assert_eq!(
        keys,
        vec![
            "toggle.already_open",
            "toggle.locked",
            "toggle.too_big",
            "toggle.error.unknown_structure",
        ]
    );
}

#[test]
fn test_failures_without_actor_are_not_notified() {
    let world = world_with(gate().with_locked(true));
    world.set_chunk_status(ChunkStatus::Fail);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    assert_eq!(
        pipeline.toggle(ToggleRequest::new(GATE, ToggleCause::Redstone)),
        ToggleResult::Locked
    );
    executor.tick();
    assert!(world.notifications().is_empty());
}

// ============================================================================
// Animation variants
// ============================================================================

#[test]
fn test_air_only_structure_is_skipped_and_committed() {
    let world = Arc::new(HeadlessWorld::new());
    world.insert_snapshot(gate());
    let recorder = Arc::new(Recorder::default());
    let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(RuntimeConfig::testing())
        .with_listener(recorder.clone())
        .build();

    let mut ticket = pipeline.submit(player_request(GATE));
    executor.tick();

    assert_eq!(ticket.try_result(), Some(ToggleResult::Success));
    assert!(executor.is_idle());
    assert_eq!(*recorder.ends.lock(), vec![(GATE, AnimationState::Skipped)]);
    let gate = world.structure(GATE).unwrap();
    assert!(gate.is_open());
    assert_eq!(gate.cuboid().min(), IVec3::new(0, 67, 0));
    assert_eq!(world.stats().proxies_spawned, 0);
}

#[test]
fn test_skip_animation_places_final_blocks() {
    let world = world_with(gate());
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut ticket = pipeline.submit(player_request(GATE).with_skip_animation(true));
    executor.tick();

    assert_eq!(ticket.try_result(), Some(ToggleResult::Success));
    assert!(executor.is_idle());
    let stats = world.stats();
    assert_eq!(stats.proxies_spawned, 0);
    assert_eq!(stats.blocks_placed, 25);
    assert_eq!(stats.commits, 1);
    let open = world.structure(GATE).unwrap();
    assert_eq!(world.blocks_in(&open.cuboid()), 25);
    assert_eq!(world.block_count(), 25);
}

#[test]
fn test_global_skip_animations() {
    let world = world_with(gate());
    let (pipeline, mut executor) =
        runtime(&world, RuntimeConfig::testing().with_skip_animations(true));

    pipeline.submit(player_request(GATE));
    executor.tick();

    assert!(executor.is_idle());
    assert_eq!(world.stats().proxies_spawned, 0);
    assert!(world.structure(GATE).unwrap().is_open());
}

#[test]
fn test_preview_leaves_world_untouched() {
    let world = world_with(gate());
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    pipeline.submit(player_request(GATE).with_animation_type(AnimationType::Preview));
    run_to_idle(&mut executor);

    let stats = world.stats();
    assert_eq!(stats.proxies_spawned, 25);
    assert_eq!(stats.blocks_placed, 0);
    assert_eq!(stats.blocks_cleared, 0);
    assert_eq!(stats.commits, 0);
    assert_eq!(world.live_proxies(), 0);
    let gate = world.structure(GATE).unwrap();
    assert!(!gate.is_open());
    assert_eq!(world.blocks_in(&gate.cuboid()), 25);
}

#[test]
fn test_failed_proxy_block_still_lands() {
    let world = world_with(gate());
    world.fail_spawn_at(IVec3::new(2, 64, 2));
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut ticket = pipeline.submit(player_request(GATE));
    run_to_idle(&mut executor);

    assert_eq!(ticket.try_result(), Some(ToggleResult::Success));
    let stats = world.stats();
    assert_eq!(stats.spawn_failures, 1);
    assert_eq!(stats.proxies_spawned, 24);
    let open = world.structure(GATE).unwrap();
    assert_eq!(world.blocks_in(&open.cuboid()), 25);
    assert!(world.notifications().is_empty());
}

#[test]
fn test_close_after_open_returns_to_start() {
    let world = world_with(gate());
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    pipeline.submit(player_request(GATE));
    run_to_idle(&mut executor);
    let mut close = pipeline.submit(player_request(GATE).with_action(ToggleAction::Close));
    run_to_idle(&mut executor);

    assert_eq!(close.try_result(), Some(ToggleResult::Success));
    let closed = world.structure(GATE).unwrap();
    assert!(!closed.is_open());
    assert_eq!(closed.cuboid(), gate().cuboid());
    assert_eq!(world.blocks_in(&closed.cuboid()), 25);
    assert_eq!(world.block_count(), 25);
}

#[test]
fn test_commit_failure_still_releases_slot() {
    let world = world_with(gate());
    world.fail_commit_for(GATE);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    pipeline.submit(player_request(GATE));
    run_to_idle(&mut executor);

    assert!(!pipeline.registry().is_busy(GATE));
    assert!(!world.structure(GATE).unwrap().is_open());
}

// ============================================================================
// Perpetual structures
// ============================================================================

#[test]
fn test_windmill_cycles_until_stopped() {
    let world = world_with(windmill());
    let id = StructureId(2);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    let mut ticket = pipeline.submit(player_request(id));
    executor.tick();
    assert_eq!(ticket.try_result(), Some(ToggleResult::Success));

    for _ in 0..200 {
        if world.stats().commits >= 2 {
            break;
        }
        executor.tick();
    }
    assert_eq!(world.stats().commits, 2);
    assert_eq!(executor.active_count(), 1);
    assert!(pipeline.registry().is_busy(id));

    pipeline.handle().stop_perpetual(id).unwrap();
    run_to_idle(&mut executor);

    assert_eq!(world.stats().commits, 3);
    assert!(!pipeline.registry().is_busy(id));
    let windmill = world.structure(id).unwrap();
    assert_eq!(windmill.cuboid(), self::windmill().cuboid());
    assert!(!windmill.is_open());
    assert_eq!(world.blocks_in(&windmill.cuboid()), 9);
}

#[test]
fn test_locked_windmill_keeps_turning() {
    let world = world_with(windmill());
    let id = StructureId(2);
    let (pipeline, mut executor) = runtime(&world, RuntimeConfig::testing());

    pipeline.submit(player_request(id));
    executor.tick();
    world.insert_snapshot(windmill().with_locked(true));

    for _ in 0..200 {
        if world.stats().commits >= 2 {
            break;
        }
        executor.tick();
    }
    assert_eq!(world.stats().commits, 2);
    assert_eq!(executor.active_count(), 1);

    executor.shutdown();
    assert!(executor.is_idle());
    assert!(world.notifications().is_empty());
}

// ============================================================================
// Shutdown
// ============================================================================

#[test]
fn test_shutdown_finishes_running_animations() {
    let world = world_with(gate());
    let recorder = Arc::new(Recorder::default());
    let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(RuntimeConfig::testing())
        .with_listener(recorder.clone())
        .build();

    pipeline.submit(player_request(GATE));
    executor.tick();
    executor.tick();
    assert_eq!(executor.active_count(), 1);

    pipeline.handle().shutdown().unwrap();
    assert!(!executor.tick());

    assert!(executor.is_idle());
    assert!(executor.is_shut_down());
    assert_eq!(*recorder.ends.lock(), vec![(GATE, AnimationState::Completed)]);
    let open = world.structure(GATE).unwrap();
    assert!(open.is_open());
    assert_eq!(world.blocks_in(&open.cuboid()), 25);
    assert_eq!(world.live_proxies(), 0);

    let mut late = pipeline.submit(player_request(GATE));
    assert!(!executor.tick());
    assert_eq!(late.try_result(), Some(ToggleResult::Cancelled));
}

#[test]
fn test_spawned_tick_thread() {
    let world = world_with(gate());
    let (pipeline, thread) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(RuntimeConfig::testing())
        .spawn()
        .unwrap();

    let requester = pipeline.clone();
    let result = std::thread::spawn(move || requester.toggle(player_request(GATE)))
        .join()
        .unwrap();
    assert_eq!(result, ToggleResult::Success);

    let deadline = Instant::now() + Duration::from_secs(20);
    while !world.structure(GATE).unwrap().is_open() {
        assert!(Instant::now() < deadline, "toggle did not finish");
        std::thread::sleep(Duration::from_millis(10));
    }

    pipeline.handle().shutdown().unwrap();
    thread.join().unwrap();
    assert_eq!(pipeline.toggle(player_request(GATE)), ToggleResult::Error);
}
