//! Structure files and headless simulation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use swivel_animation::AnimationType;
use swivel_core::{
    BlockDescriptor, Cuboid, HeadlessStats, HeadlessWorld, StructureSnapshot, WorldContext,
};
use swivel_runtime::{
    RuntimeBuilder, RuntimeConfig, ToggleAction, ToggleCause, ToggleRequest, ToggleResult,
};

/// A structure to simulate
///
/// ```toml
/// block = "iron_bars"
///
/// [structure]
/// id = 1
/// name = "front gate"
/// cuboid = { min = [0, 64, 0], max = [4, 64, 4] }
/// rotation_point = [2, 64, 2]
/// open_direction = "up"
///
/// [structure.archetype]
/// type = "portcullis"
/// blocks_to_move = 3
/// ```
#[derive(Debug, Deserialize)]
pub struct StructureFile {
    /// Block filling the structure's cuboid
    #[serde(default = "default_block")]
    pub block: String,
    #[serde(default)]
    pub rotatable: bool,
    pub structure: StructureSnapshot,
}

fn default_block() -> String {
    "stone".to_string()
}

impl StructureFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: StructureFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(file)
    }

    fn descriptor(&self) -> BlockDescriptor {
        if self.rotatable {
            BlockDescriptor::rotatable(&self.block)
        } else {
            BlockDescriptor::new(&self.block)
        }
    }
}

/// Options of one simulated toggle
#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub action: ToggleAction,
    pub time: Option<f64>,
    pub skip_animation: bool,
    pub preview: bool,
    pub max_ticks: u64,
}

/// What a simulated toggle did
#[derive(Debug)]
pub struct SimulationReport {
    pub result: ToggleResult,
    pub ticks: u64,
    pub before: StructureSnapshot,
    pub after: StructureSnapshot,
    pub stats: HeadlessStats,
    pub blocks_in_final: usize,
}

/// Run one toggle of `file` to completion in a headless world
///
/// Perpetual structures run a single cycle.
pub fn simulate(
    file: &StructureFile,
    config: RuntimeConfig,
    options: &SimulationOptions,
) -> Result<SimulationReport> {
    let before = file.structure.clone();
    let id = before.id();

    let world = Arc::new(HeadlessWorld::new());
    world.insert_structure(before.clone(), &file.descriptor());

    let (pipeline, mut executor) = RuntimeBuilder::new(WorldContext::from_shared(world.clone()))
        .with_config(config)
        .build();

    let mut request = ToggleRequest::new(id, ToggleCause::Plugin)
        .with_action(options.action)
        .with_skip_animation(options.skip_animation);
    if let Some(seconds) = options.time {
        request = request.with_time(seconds);
    }
    if options.preview {
        request = request.with_animation_type(AnimationType::Preview);
    }

    let mut ticket = pipeline.submit(request);
    if before.archetype().is_perpetual() {
        pipeline.handle().stop_perpetual(id)?;
    }

    executor.tick();
    while !executor.is_idle() {
        if executor.tick_count() >= options.max_ticks {
            executor.shutdown();
            tracing::warn!(
                "Stopped {} after {} ticks without finishing",
                id,
                options.max_ticks
            );
            break;
        }
        executor.tick();
    }

    let result = ticket.try_result().unwrap_or(ToggleResult::Error);
    let after = world
        .structure(id)
        .with_context(|| format!("Structure {} disappeared from the world", id))?;
    let final_cuboid: Cuboid = after.cuboid();

    Ok(SimulationReport {
        result,
        ticks: executor.tick_count(),
        blocks_in_final: world.blocks_in(&final_cuboid),
        stats: world.stats(),
        before,
        after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATE: &str = r#"
        block = "iron_bars"

        [structure]
        id = 1
        name = "front gate"
        cuboid = { min = [0, 64, 0], max = [4, 64, 4] }
        rotation_point = [2, 64, 2]
        open_direction = "up"

        [structure.archetype]
        type = "portcullis"
        blocks_to_move = 3
    "#;

    fn options() -> SimulationOptions {
        SimulationOptions {
            action: ToggleAction::Toggle,
            time: None,
            skip_animation: false,
            preview: false,
            max_ticks: 10_000,
        }
    }

    #[test]
    fn test_parse_structure_file() {
        let file: StructureFile = toml::from_str(GATE).unwrap();
        assert_eq!(file.block, "iron_bars");
        assert_eq!(file.structure.name(), "front gate");
        assert_eq!(file.structure.cuboid().volume(), 25);
        assert!(!file.structure.is_open());
    }

    #[test]
    fn test_simulate_opens_gate() {
        let file: StructureFile = toml::from_str(GATE).unwrap();
        let report = simulate(&file, RuntimeConfig::testing(), &options()).unwrap();

        assert_eq!(report.result, ToggleResult::Success);
        assert!(report.after.is_open());
        assert_eq!(
            Some(report.after.cuboid()),
            report.before.cuboid().checked_translated([0, 3, 0].into())
        );
        assert_eq!(report.blocks_in_final, 25);
        assert_eq!(report.stats.commits, 1);
    }

    #[test]
    fn test_simulate_rejected_toggle() {
        let file: StructureFile = toml::from_str(GATE).unwrap();
        let options = SimulationOptions {
            action: ToggleAction::Close,
            ..options()
        };
        let report = simulate(&file, RuntimeConfig::testing(), &options).unwrap();

        assert_eq!(report.result, ToggleResult::NoChange);
        assert_eq!(report.after, report.before);
        assert_eq!(report.ticks, 1);
    }
}
