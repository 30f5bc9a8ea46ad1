//! Tick-synchronous animator
//!
//! The [`Animator`] owns one in-flight [`Animation`]: it materializes the
//! structure's blocks, spawns a proxy per block, advances them once per world
//! tick through the structure's [`AnimationComponent`] and finally places the
//! blocks in their resting cells.
//!
//! An animator is confined to the tick thread; it is neither `Send` nor `Sync`.

use crate::animation::{Animation, AnimationState};
use crate::block::AnimatedBlock;
use crate::component::{AnimationComponent, MovementMethod};
use crate::config::AnimationConfig;
use crate::error::Result;
use crate::hooks::{AnimationHookManager, HookSet};
use std::sync::Arc;
use swivel_core::math::{block_center, resting_cell};
use swivel_core::{DVec3, Rotation, TickBound, WorldContext, FINAL_POSITION_TOLERANCE};

/// Drives one animation from its first block to its last placement
pub struct Animator {
    animation: Animation,
    component: Arc<dyn AnimationComponent>,
    hooks: HookSet,
    world: WorldContext,
    rotation: Rotation,
    min_y: i32,
    max_y: i32,
    _tick: TickBound,
}

impl Animator {
    /// Create an animator and instantiate the hooks that want to observe it
    pub fn new(
        animation: Animation,
        component: Arc<dyn AnimationComponent>,
        hook_manager: &AnimationHookManager,
        world: WorldContext,
        config: &AnimationConfig,
    ) -> Self {
        let hooks = hook_manager.instantiate(&animation);
        Self {
            animation,
            component,
            hooks,
            world,
            rotation: Rotation::default(),
            min_y: config.world_min_y,
            max_y: config.world_max_y,
            _tick: TickBound::default(),
        }
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn state(&self) -> AnimationState {
        self.animation.state()
    }

    /// Every animated block, in stable order
    ///
    /// Index 0 is the movement anchor.
    pub fn animated_blocks(&self) -> &[AnimatedBlock] {
        self.animation.blocks()
    }

    /// Number of hooks observing this animation
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Materialize one animated block per non-air cell of the structure
    ///
    /// The region is clamped to the world's vertical range first. Returns the
    /// number of blocks that will move.
    pub fn prepare_animation(&mut self) -> usize {
        let snapshot = Arc::clone(self.animation.snapshot());
        let mut blocks = Vec::new();

        match snapshot.cuboid().clamp_y(self.min_y, self.max_y) {
            Some(region) => {
                for origin in region.positions() {
                    let Some(block) = self.world.blocks.block_at(origin) else {
                        continue;
                    };
                    let radius = self.component.radius(origin);
                    let start_angle = self.component.start_angle(origin);
                    let final_position = self.component.final_position(block_center(origin), radius);
                    blocks.push(AnimatedBlock::new(
                        block,
                        origin,
                        radius,
                        start_angle,
                        final_position,
                    ));
                }
            }
            None => {
                tracing::debug!(
                    "Structure {} lies outside the world height {}..={}",
                    snapshot.id(),
                    self.min_y,
                    self.max_y
                );
            }
        }

        let count = blocks.len();
        self.animation.set_blocks(blocks);
        self.hooks.on_prepare(&self.animation);
        tracing::debug!("Prepared {} blocks for structure {}", count, snapshot.id());
        count
    }

    /// Start moving, or skip straight to the final placement
    ///
    /// An animation without blocks is always skipped. Skipping clears the
    /// original cells and places every block in its final cell at once.
    pub fn start_animation(&mut self, skip: bool) -> Result<AnimationState> {
        if skip || self.animation.blocks().is_empty() {
            self.animation.transition(AnimationState::Skipped)?;
            if !self.animation.is_preview() {
                self.clear_originals();
                self.place_finals();
            }
            return Ok(self.animation.state());
        }

        self.animation.transition(AnimationState::Active)?;
        let proxies = Arc::clone(&self.world.proxies);
        for block in self.animation.blocks_mut() {
            match proxies.spawn_proxy(block.start_position(), block.block(), Rotation::default()) {
                Ok(handle) => block.attach_proxy(handle),
                Err(err) => {
                    tracing::warn!("Block at {} will not animate: {}", block.origin(), err);
                    block.kill();
                }
            }
        }
        if !self.animation.is_preview() {
            self.clear_originals();
        }
        Ok(self.animation.state())
    }

    /// Advance by one world tick
    ///
    /// While active, executes one step; the last step moves the animation to
    /// finishing. The tick after that settles every block and completes it.
    pub fn tick(&mut self) -> Result<AnimationState> {
        match self.animation.state() {
            AnimationState::Active => {
                let ticks = self.animation.record_step();
                let ticks_remaining = self.animation.ticks_remaining();

                self.hooks.on_pre_animation_step(&self.animation);
                let component = Arc::clone(&self.component);
                component.execute_animation_step(self, ticks, ticks_remaining);
                self.animation.invalidate_region();
                self.hooks.on_post_animation_step(&self.animation);

                if ticks_remaining == 0 {
                    self.animation.transition(AnimationState::Finishing)?;
                    self.hooks.on_animation_ending(&self.animation);
                }
            }
            AnimationState::Finishing => {
                self.settle();
                self.animation.transition(AnimationState::Completed)?;
                self.hooks.on_animation_completed(&self.animation);
            }
            AnimationState::Pending | AnimationState::Completed | AnimationState::Skipped => {}
        }
        Ok(self.animation.state())
    }

    /// Bring the animation to a terminal state immediately
    ///
    /// Active animations skip their remaining steps and settle in their final
    /// cells; pending ones are skipped.
    pub fn force_finish(&mut self) -> Result<AnimationState> {
        match self.animation.state() {
            AnimationState::Pending => self.start_animation(true),
            AnimationState::Active => {
                self.animation.transition(AnimationState::Finishing)?;
                self.hooks.on_animation_ending(&self.animation);
                self.tick()
            }
            AnimationState::Finishing => self.tick(),
            state @ (AnimationState::Completed | AnimationState::Skipped) => Ok(state),
        }
    }

    // ========================================================================
    // Movement
    // ========================================================================

    /// Orientation applied to proxies by the following movements
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Apply `goal` to every living block
    pub fn move_blocks<F>(&mut self, ticks_remaining: u32, mut goal: F)
    where
        F: FnMut(&AnimatedBlock) -> DVec3,
    {
        for index in 0..self.animation.blocks().len() {
            let block = &self.animation.blocks()[index];
            if !block.is_alive() {
                continue;
            }
            let target = goal(block);
            self.apply_movement(index, target, ticks_remaining);
        }
    }

    /// Relocate one block
    ///
    /// With no ticks remaining this is the terminal placement: the block is
    /// snapped onto its final position, and a target farther away than the
    /// tolerance is reported. A proxy that refuses to move kills its block.
    pub fn apply_movement(&mut self, index: usize, target: DVec3, ticks_remaining: u32) {
        let method = self.component.movement_method();
        let rotation = self.rotation;
        let Some(block) = self.animation.blocks_mut().get_mut(index) else {
            return;
        };
        if !block.is_alive() {
            return;
        }
        block.record_target(target);

        let mut position = target;
        if ticks_remaining == 0 {
            let error = target.distance(block.final_position());
            if error > FINAL_POSITION_TOLERANCE {
                tracing::warn!(
                    "Block at {} ended {:.6} away from its final position",
                    block.origin(),
                    error
                );
            }
            position = block.final_position();
        }

        let Some(handle) = block.proxy() else {
            return;
        };
        let result = match method {
            MovementMethod::Teleport => self.world.proxies.teleport_proxy(handle, position, rotation),
            MovementMethod::Velocity => self.world.proxies.step_proxy(handle, position, rotation),
        };
        match result {
            Ok(()) => block.move_to(position, rotation),
            Err(err) => {
                tracing::warn!("Lost proxy of block at {}: {}", block.origin(), err);
                if let Some(handle) = block.kill() {
                    self.world.proxies.despawn_proxy(handle);
                }
            }
        }
    }

    /// Recreate every living proxy where it currently is
    pub fn respawn_blocks(&mut self) {
        let proxies = Arc::clone(&self.world.proxies);
        let mut respawned = 0;
        for block in self.animation.blocks_mut() {
            if !block.is_alive() {
                continue;
            }
            if let Some(handle) = block.detach_proxy() {
                proxies.despawn_proxy(handle);
            }
            match proxies.spawn_proxy(block.current_position(), block.block(), block.rotation()) {
                Ok(handle) => {
                    block.attach_proxy(handle);
                    respawned += 1;
                }
                Err(err) => {
                    tracing::warn!("Failed to respawn block at {}: {}", block.origin(), err);
                    block.kill();
                }
            }
        }
        tracing::debug!("Respawned {} proxies", respawned);
    }

    // ========================================================================
    // World placement
    // ========================================================================

    fn clear_originals(&self) {
        for block in self.animation.blocks() {
            self.world.sink.clear_block(block.origin());
        }
    }

    fn place_finals(&self) {
        let final_rotation = self.component.final_rotation();
        for block in self.animation.blocks() {
            let rotation = if block.can_rotate() {
                final_rotation
            } else {
                Rotation::default()
            };
            self.world
                .sink
                .place_block(resting_cell(block.final_position()), block.block(), rotation);
        }
    }

    /// Remove every proxy and put the blocks down
    ///
    /// Blocks whose proxy was lost are placed too, so the structure never
    /// loses a block.
    fn settle(&mut self) {
        let proxies = Arc::clone(&self.world.proxies);
        for block in self.animation.blocks_mut() {
            if let Some(handle) = block.detach_proxy() {
                proxies.despawn_proxy(handle);
            }
        }
        if !self.animation.is_preview() {
            self.place_finals();
        }
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("structure", &self.animation.snapshot().id())
            .field("state", &self.animation.state())
            .field("steps_executed", &self.animation.steps_executed())
            .field("duration", &self.animation.duration())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationType;
    use crate::archetype::{animation_duration, create_component, plan_motion};
    use crate::components::VerticalLift;
    use crate::error::HookError;
    use crate::hooks::{AnimationHook, AnimationHookFactory};
    use parking_lot::Mutex;
    use swivel_core::{
        Archetype, BlockDescriptor, Cuboid, HeadlessWorld, IVec3, MovementDirection, StructureId,
        StructureSnapshot,
    };

    fn animator_for(
        world: &Arc<HeadlessWorld>,
        snapshot: StructureSnapshot,
        animation_type: AnimationType,
        hooks: &AnimationHookManager,
    ) -> Animator {
        let config = AnimationConfig::testing();
        let plan = plan_motion(&snapshot).unwrap();
        let duration = animation_duration(snapshot.archetype(), &plan, None, &config);
        let component = create_component(&snapshot, &plan, duration, &config);
        let animation = Animation::new(Arc::new(snapshot), plan.new_cuboid, duration, animation_type);
        Animator::new(
            animation,
            component,
            hooks,
            WorldContext::from_shared(world.clone()),
            &config,
        )
    }

    fn run_to_end(animator: &mut Animator) -> u32 {
        let mut ticks = 0;
        while !animator.tick().unwrap().is_terminal() {
            ticks += 1;
            assert!(ticks < 10_000, "animation never finished");
        }
        ticks + 1
    }

    fn structures() -> Vec<StructureSnapshot> {
        let base = IVec3::new(10, 64, -20);
        let door = Cuboid::new(base, base + IVec3::new(3, 2, 0));
        let slab = Cuboid::new(base, base + IVec3::new(4, 0, 4));
        let wall = Cuboid::new(base, base + IVec3::new(2, 4, 0));
        let cloth = Cuboid::new(base, base + IVec3::new(5, 3, 0));
        let rotor = Cuboid::new(base - IVec3::new(0, 3, 0), base + IVec3::new(0, 3, 0));
        let s = |id, archetype, cuboid, direction| {
            StructureSnapshot::new(StructureId(id), "test", archetype, cuboid, base, direction)
        };
        vec![
            s(1, Archetype::BigDoor, door, MovementDirection::Clockwise),
            s(2, Archetype::BigDoor, door, MovementDirection::CounterClockwise),
            s(3, Archetype::RevolvingDoor { quarter_circles: 3 }, door, MovementDirection::Clockwise),
            s(4, Archetype::Portcullis { blocks_to_move: 3 }, slab, MovementDirection::Up),
            s(5, Archetype::Elevator { blocks_to_move: 0 }, slab, MovementDirection::Down),
            s(6, Archetype::SlidingDoor { blocks_to_move: 2 }, wall, MovementDirection::West),
            s(7, Archetype::SlidingDoor { blocks_to_move: 0 }, wall, MovementDirection::South),
            s(8, Archetype::Drawbridge, wall, MovementDirection::North),
            s(9, Archetype::Drawbridge, wall, MovementDirection::East),
            s(10, Archetype::Flag { north_south_aligned: false }, cloth, MovementDirection::None),
            s(11, Archetype::Windmill { quarter_circles: 4 }, rotor, MovementDirection::South),
            s(12, Archetype::Windmill { quarter_circles: 2 }, rotor, MovementDirection::West),
        ]
    }

    #[test]
    fn test_last_step_lands_on_final_position() {
        for snapshot in structures() {
            let world = Arc::new(HeadlessWorld::new());
            world.insert_structure(snapshot.clone(), &BlockDescriptor::new("stone"));
            let mut animator =
                animator_for(&world, snapshot.clone(), AnimationType::MoveBlocks, &AnimationHookManager::new());

            let count = animator.prepare_animation();
            assert_eq!(count as u64, snapshot.cuboid().volume());
            animator.start_animation(false).unwrap();
            let ticks = run_to_end(&mut animator);

            let animation = animator.animation();
            assert_eq!(animator.state(), AnimationState::Completed, "{:?}", snapshot.archetype());
            assert_eq!(animation.steps_executed(), animation.duration());
            assert_eq!(ticks, animation.duration() + 1);
            for block in animator.animated_blocks() {
                let error = block.previous_target().distance(block.final_position());
                assert!(
                    error <= FINAL_POSITION_TOLERANCE,
                    "{:?}: block {} off by {}",
                    snapshot.archetype(),
                    block.origin(),
                    error
                );
            }

            let new_cuboid = animation.new_cuboid();
            assert_eq!(world.blocks_in(&new_cuboid), count, "{:?}", snapshot.archetype());
            assert_eq!(world.block_count(), count);
            assert_eq!(world.live_proxies(), 0);
        }
    }

    #[test]
    fn test_lift_scenario() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = StructureSnapshot::new(
            StructureId(1),
            "platform",
            Archetype::Elevator { blocks_to_move: 3 },
            Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(4, 64, 4)),
            IVec3::new(2, 64, 2),
            MovementDirection::Up,
        );
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("oak_planks"));
        let new_cuboid = snapshot.cuboid().checked_translated(IVec3::Y * 3).unwrap();
        let animation = Animation::new(Arc::new(snapshot), new_cuboid, 40, AnimationType::MoveBlocks);
        let mut animator = Animator::new(
            animation,
            Arc::new(VerticalLift::new(3, 40)),
            &AnimationHookManager::new(),
            WorldContext::from_shared(world.clone()),
            &AnimationConfig::testing(),
        );

        assert_eq!(animator.prepare_animation(), 25);
        animator.start_animation(false).unwrap();
        for _ in 0..20 {
            animator.tick().unwrap();
        }
        for block in animator.animated_blocks() {
            assert_eq!(block.current_position().y, 65.5);
            let proxy = block.proxy().unwrap();
            assert_eq!(world.proxy_position(proxy), Some(block.current_position()));
        }

        for _ in 0..20 {
            animator.tick().unwrap();
        }
        assert_eq!(animator.state(), AnimationState::Finishing);
        for block in animator.animated_blocks() {
            assert_eq!(block.current_position().y, 67.0);
        }

        assert_eq!(animator.tick().unwrap(), AnimationState::Completed);
        assert_eq!(world.blocks_in(&new_cuboid), 25);
        assert_eq!(world.stats().steps, 25 * 40);
    }

    #[test]
    fn test_hinged_round_trip_restores_cells() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(0);
        world.insert_structure(snapshot.clone(), &BlockDescriptor::rotatable("oak_stairs"));
        let hooks = AnimationHookManager::new();

        let mut opening = animator_for(&world, snapshot.clone(), AnimationType::MoveBlocks, &hooks);
        opening.prepare_animation();
        opening.start_animation(false).unwrap();
        run_to_end(&mut opening);
        let opened = snapshot.with_geometry(opening.animation().new_cuboid(), true);
        assert_ne!(opened.cuboid(), snapshot.cuboid());

        let mut closing = animator_for(&world, opened, AnimationType::MoveBlocks, &hooks);
        closing.prepare_animation();
        closing.start_animation(false).unwrap();
        run_to_end(&mut closing);

        assert_eq!(closing.animation().new_cuboid(), snapshot.cuboid());
        assert_eq!(world.blocks_in(&snapshot.cuboid()), 12);
        assert_eq!(world.block_count(), 12);
    }

    #[test]
    fn test_drawbridge_respawns_halfway() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(7);
        assert_eq!(snapshot.archetype(), Archetype::Drawbridge);
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("spruce_planks"));

        let mut animator = animator_for(&world, snapshot, AnimationType::MoveBlocks, &AnimationHookManager::new());
        let count = animator.prepare_animation() as u64;
        animator.start_animation(false).unwrap();
        let respawn_tick = animator.animation().duration() / 2;
        assert!(respawn_tick > 0);

        for _ in 1..respawn_tick {
            animator.tick().unwrap();
        }
        assert_eq!(world.stats().proxies_spawned, count);
        animator.tick().unwrap();
        assert_eq!(world.stats().proxies_spawned, 2 * count);
        assert_eq!(world.live_proxies() as u64, count);

        run_to_end(&mut animator);
        assert_eq!(world.stats().proxies_spawned, 2 * count);
        assert_eq!(world.stats().proxies_despawned, 2 * count);
    }

    #[test]
    fn test_failed_proxy_keeps_index_and_block() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(3);
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("iron_bars"));
        let broken = snapshot.cuboid().min() + IVec3::new(1, 0, 1);
        world.fail_spawn_at(broken);

        let mut animator = animator_for(&world, snapshot, AnimationType::MoveBlocks, &AnimationHookManager::new());
        animator.prepare_animation();
        animator.start_animation(false).unwrap();

        let dead: Vec<_> = animator
            .animated_blocks()
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_alive())
            .map(|(index, block)| (index, block.origin()))
            .collect();
        assert_eq!(dead, vec![(6, broken)]);

        run_to_end(&mut animator);
        let block = &animator.animated_blocks()[6];
        assert_eq!(block.origin(), broken);
        assert_eq!(block.current_position(), block.start_position());
        assert!(world.block(broken + IVec3::Y * 3).is_some());
        assert_eq!(world.block_count(), 25);
    }

    #[test]
    fn test_air_only_region_is_skipped() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(3);
        world.insert_snapshot(snapshot.clone());

        let mut animator = animator_for(&world, snapshot, AnimationType::MoveBlocks, &AnimationHookManager::new());
        assert_eq!(animator.prepare_animation(), 0);
        assert_eq!(animator.start_animation(false).unwrap(), AnimationState::Skipped);
        assert_eq!(animator.tick().unwrap(), AnimationState::Skipped);
        assert_eq!(world.stats().proxies_spawned, 0);
        assert_eq!(world.stats().blocks_placed, 0);
    }

    #[test]
    fn test_skip_places_final_cells_directly() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(5);
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("glass"));

        let mut animator = animator_for(&world, snapshot, AnimationType::MoveBlocks, &AnimationHookManager::new());
        let count = animator.prepare_animation();
        assert_eq!(animator.start_animation(true).unwrap(), AnimationState::Skipped);

        let new_cuboid = animator.animation().new_cuboid();
        assert_eq!(world.blocks_in(&new_cuboid), count);
        assert_eq!(world.block_count(), count);
        assert_eq!(world.stats().proxies_spawned, 0);
        assert_eq!(animator.animation().steps_executed(), 0);
    }

    #[test]
    fn test_preview_leaves_world_untouched() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(0);
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("oak_planks"));
        let placed_before = world.stats().blocks_placed;

        let mut animator = animator_for(&world, snapshot.clone(), AnimationType::Preview, &AnimationHookManager::new());
        let count = animator.prepare_animation() as u64;
        animator.start_animation(false).unwrap();
        run_to_end(&mut animator);

        let stats = world.stats();
        assert_eq!(stats.blocks_placed, placed_before);
        assert_eq!(stats.blocks_cleared, 0);
        assert_eq!(stats.proxies_spawned, count);
        assert_eq!(world.live_proxies(), 0);
        assert_eq!(world.blocks_in(&snapshot.cuboid()), count as usize);
    }

    #[test]
    fn test_force_finish_settles_blocks() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(3);
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("iron_bars"));

        let mut animator = animator_for(&world, snapshot, AnimationType::MoveBlocks, &AnimationHookManager::new());
        animator.prepare_animation();
        animator.start_animation(false).unwrap();
        animator.tick().unwrap();
        animator.tick().unwrap();

        assert_eq!(animator.force_finish().unwrap(), AnimationState::Completed);
        assert!(animator.animation().steps_executed() < animator.animation().duration());
        assert_eq!(world.blocks_in(&animator.animation().new_cuboid()), 25);
        assert_eq!(world.live_proxies(), 0);
    }

    #[test]
    fn test_region_is_clamped_to_world_height() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = StructureSnapshot::new(
            StructureId(5),
            "deep",
            Archetype::Elevator { blocks_to_move: 2 },
            Cuboid::new(IVec3::new(0, -66, 0), IVec3::new(0, -63, 0)),
            IVec3::ZERO,
            MovementDirection::Up,
        );
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("stone"));

        let mut animator = animator_for(&world, snapshot, AnimationType::MoveBlocks, &AnimationHookManager::new());
        assert_eq!(animator.prepare_animation(), 2);
        assert!(animator
            .animated_blocks()
            .iter()
            .all(|block| block.origin().y >= -64));
    }

    #[test]
    fn test_lifecycle_rejects_restart() {
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = structures().remove(3);
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("stone"));

        let mut animator = animator_for(&world, snapshot, AnimationType::MoveBlocks, &AnimationHookManager::new());
        assert_eq!(animator.tick().unwrap(), AnimationState::Pending);
        animator.prepare_animation();
        animator.start_animation(false).unwrap();
        assert!(animator.start_animation(false).is_err());
        assert!(animator.start_animation(true).is_err());
    }

    struct Sequence(Arc<Mutex<Vec<&'static str>>>);

    impl AnimationHook for Sequence {
        fn name(&self) -> &str {
            "sequence"
        }

        fn on_prepare(&mut self, _animation: &Animation) -> std::result::Result<(), HookError> {
            self.0.lock().push("prepare");
            Ok(())
        }

        fn on_pre_animation_step(&mut self, _animation: &Animation) -> std::result::Result<(), HookError> {
            self.0.lock().push("pre");
            Ok(())
        }

        fn on_post_animation_step(&mut self, _animation: &Animation) -> std::result::Result<(), HookError> {
            self.0.lock().push("post");
            Ok(())
        }

        fn on_animation_ending(&mut self, animation: &Animation) -> std::result::Result<(), HookError> {
            assert_eq!(animation.state(), AnimationState::Finishing);
            self.0.lock().push("ending");
            Ok(())
        }

        fn on_animation_completed(&mut self, animation: &Animation) -> std::result::Result<(), HookError> {
            assert_eq!(animation.state(), AnimationState::Completed);
            self.0.lock().push("completed");
            Ok(())
        }
    }

    struct SequenceFactory(Arc<Mutex<Vec<&'static str>>>);

    impl AnimationHookFactory for SequenceFactory {
        fn create(&self, _animation: &Animation) -> Option<Box<dyn AnimationHook>> {
            Some(Box::new(Sequence(self.0.clone())))
        }
    }

    #[test]
    fn test_hook_callback_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = AnimationHookManager::new().with_factory(Arc::new(SequenceFactory(log.clone())));
        let world = Arc::new(HeadlessWorld::new());
        let snapshot = StructureSnapshot::new(
            StructureId(1),
            "gate",
            Archetype::Portcullis { blocks_to_move: 1 },
            Cuboid::single(IVec3::new(0, 64, 0)),
            IVec3::ZERO,
            MovementDirection::Up,
        );
        world.insert_structure(snapshot.clone(), &BlockDescriptor::new("stone"));
        let animation = Animation::new(
            Arc::new(snapshot),
            Cuboid::single(IVec3::new(0, 65, 0)),
            2,
            AnimationType::MoveBlocks,
        );
        let mut animator = Animator::new(
            animation,
            Arc::new(VerticalLift::new(1, 2)),
            &hooks,
            WorldContext::from_shared(world),
            &AnimationConfig::testing(),
        );
        assert_eq!(animator.hook_count(), 1);

        animator.prepare_animation();
        animator.start_animation(false).unwrap();
        run_to_end(&mut animator);

        assert_eq!(
            *log.lock(),
            vec!["prepare", "pre", "post", "pre", "post", "ending", "completed"]
        );
    }
}
