//! Animation configuration presets.

use serde::{Deserialize, Serialize};
use swivel_core::{ArchetypeKind, DEFAULT_TICK_RATE};

/// A sound played while a structure moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioDescription {
    /// Host sound identifier.
    pub sound: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    /// Length of the sound in ticks, used to decide when to replay it.
    #[serde(default)]
    pub duration: u32,
}

fn default_volume() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

impl AudioDescription {
    pub fn new(sound: impl Into<String>, duration: u32) -> Self {
        Self {
            sound: sound.into(),
            volume: default_volume(),
            pitch: default_pitch(),
            duration,
        }
    }
}

/// Sounds of one archetype.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSet {
    /// Looped while the structure moves.
    pub active: Option<AudioDescription>,
    /// Played once when the movement ends.
    pub end: Option<AudioDescription>,
}

impl AudioSet {
    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.end.is_none()
    }
}

/// Timing and audio settings of one archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeSettings {
    /// Default speed in blocks per second.
    pub speed: f64,
    /// Upper speed limit in blocks per second; the duration is stretched to respect it.
    pub max_speed: f64,
    /// Factor applied to every computed duration.
    pub time_multiplier: f64,
    pub audio: AudioSet,
}

impl Default for ArchetypeSettings {
    fn default() -> Self {
        Self {
            speed: 2.0,
            max_speed: 10.0,
            time_multiplier: 1.0,
            audio: AudioSet::default(),
        }
    }
}

impl ArchetypeSettings {
    fn with_speed(speed: f64, max_speed: f64) -> Self {
        Self {
            speed,
            max_speed,
            ..Self::default()
        }
    }

    fn with_audio(mut self, active: Option<AudioDescription>, end: Option<AudioDescription>) -> Self {
        self.audio = AudioSet { active, end };
        self
    }
}

/// Settings of every archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeTable {
    pub big_door: ArchetypeSettings,
    pub revolving_door: ArchetypeSettings,
    pub portcullis: ArchetypeSettings,
    pub elevator: ArchetypeSettings,
    pub sliding_door: ArchetypeSettings,
    pub drawbridge: ArchetypeSettings,
    pub flag: ArchetypeSettings,
    pub windmill: ArchetypeSettings,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        let door_open = || Some(AudioDescription::new("block.wooden_door.open", 0));
        let piston = || Some(AudioDescription::new("block.piston.extend", 15));
        let gravel = || Some(AudioDescription::new("block.gravel.step", 10));
        Self {
            big_door: ArchetypeSettings::with_speed(2.0, 10.0).with_audio(None, door_open()),
            revolving_door: ArchetypeSettings::with_speed(2.0, 10.0).with_audio(None, door_open()),
            portcullis: ArchetypeSettings::with_speed(1.5, 8.0).with_audio(gravel(), piston()),
            elevator: ArchetypeSettings::with_speed(1.5, 8.0).with_audio(gravel(), piston()),
            sliding_door: ArchetypeSettings::with_speed(2.0, 10.0).with_audio(piston(), None),
            drawbridge: ArchetypeSettings::with_speed(1.5, 8.0).with_audio(gravel(), piston()),
            flag: ArchetypeSettings::with_speed(1.0, 10.0),
            windmill: ArchetypeSettings::with_speed(1.0, 10.0),
        }
    }
}

impl ArchetypeTable {
    pub fn get(&self, kind: ArchetypeKind) -> &ArchetypeSettings {
        match kind {
            ArchetypeKind::BigDoor => &self.big_door,
            ArchetypeKind::RevolvingDoor => &self.revolving_door,
            ArchetypeKind::Portcullis => &self.portcullis,
            ArchetypeKind::Elevator => &self.elevator,
            ArchetypeKind::SlidingDoor => &self.sliding_door,
            ArchetypeKind::Drawbridge => &self.drawbridge,
            ArchetypeKind::Flag => &self.flag,
            ArchetypeKind::Windmill => &self.windmill,
        }
    }

    pub fn get_mut(&mut self, kind: ArchetypeKind) -> &mut ArchetypeSettings {
        match kind {
            ArchetypeKind::BigDoor => &mut self.big_door,
            ArchetypeKind::RevolvingDoor => &mut self.revolving_door,
            ArchetypeKind::Portcullis => &mut self.portcullis,
            ArchetypeKind::Elevator => &mut self.elevator,
            ArchetypeKind::SlidingDoor => &mut self.sliding_door,
            ArchetypeKind::Drawbridge => &mut self.drawbridge,
            ArchetypeKind::Flag => &mut self.flag,
            ArchetypeKind::Windmill => &mut self.windmill,
        }
    }
}

/// Parameters of the flag wave.
///
/// A block at distance `r` from the pole, height `h` above the pole base, at
/// tick `t` is offset by
/// `min(max_offset · min(r, length), amplitude · r · sin(r / wavelength + t / period + h · vertical_phase))`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveFormula {
    pub amplitude: f64,
    pub wavelength: f64,
    pub period: f64,
    pub vertical_phase: f64,
    /// Offset cap as a fraction of the distance to the pole.
    pub max_offset: f64,
}

impl Default for WaveFormula {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            wavelength: 1.5,
            period: 4.0,
            vertical_phase: 0.25,
            max_offset: 0.4,
        }
    }
}

/// Configuration of the animation engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// World ticks per second.
    pub tick_rate: u32,
    /// Lowest block row that can be animated.
    pub world_min_y: i32,
    /// Highest block row that can be animated.
    pub world_max_y: i32,
    pub archetypes: ArchetypeTable,
    pub wave: WaveFormula,
    /// Duration of one windmill quarter turn.
    pub ticks_per_quarter_circle: u32,
    /// Duration of one flag cycle.
    pub flag_cycle_ticks: u32,
    /// Upper bound on the length of any single movement.
    pub max_animation_seconds: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl AnimationConfig {
    /// Standard configuration for a 20 tick-per-second world.
    pub fn standard() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            world_min_y: -64,
            world_max_y: 319,
            archetypes: ArchetypeTable::default(),
            wave: WaveFormula::default(),
            ticks_per_quarter_circle: 40,
            flag_cycle_ticks: 100,
            max_animation_seconds: 600.0,
        }
    }

    /// Silent configuration with short perpetual cycles, used by tests and simulations.
    pub fn testing() -> Self {
        let mut config = Self::standard();
        for kind in ArchetypeKind::ALL {
            config.archetypes.get_mut(kind).audio = AudioSet::default();
        }
        config.ticks_per_quarter_circle = 5;
        config.flag_cycle_ticks = 10;
        config
    }

    /// Set the tick rate.
    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate.max(1);
        self
    }

    /// Set the vertical range blocks may be animated in.
    pub fn with_world_height(mut self, min_y: i32, max_y: i32) -> Self {
        self.world_min_y = min_y.min(max_y);
        self.world_max_y = min_y.max(max_y);
        self
    }

    /// Replace the settings of one archetype.
    pub fn with_archetype(mut self, kind: ArchetypeKind, settings: ArchetypeSettings) -> Self {
        *self.archetypes.get_mut(kind) = settings;
        self
    }

    /// Set the windmill quarter turn duration.
    pub fn with_ticks_per_quarter_circle(mut self, ticks: u32) -> Self {
        self.ticks_per_quarter_circle = ticks.max(1);
        self
    }

    /// Set the flag cycle duration.
    pub fn with_flag_cycle_ticks(mut self, ticks: u32) -> Self {
        self.flag_cycle_ticks = ticks.max(1);
        self
    }

    /// Set the upper bound on movement length.
    pub fn with_max_animation_seconds(mut self, seconds: f64) -> Self {
        self.max_animation_seconds = seconds;
        self
    }

    /// The longest movement in ticks, at least one.
    pub fn max_duration_ticks(&self) -> u32 {
        let ticks = (self.max_animation_seconds * f64::from(self.tick_rate.max(1))).round();
        (ticks as u32).max(1)
    }

    pub fn settings(&self, kind: ArchetypeKind) -> &ArchetypeSettings {
        self.archetypes.get(kind)
    }
}
