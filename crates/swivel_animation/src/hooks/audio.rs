//! Movement sounds

use super::{AnimationHook, AnimationHookFactory};
use crate::animation::Animation;
use crate::config::{AnimationConfig, AudioDescription, AudioSet};
use crate::error::HookError;
use std::sync::Arc;
use swivel_core::{DVec3, SoundSink};

/// Plays an archetype's sounds at the center of the moving structure
///
/// The active sound is played on the first step and replayed whenever it has
/// run its full duration and at least that many ticks remain, so it never
/// overlaps itself or runs past the end of the movement.
pub struct AudioHook {
    sounds: Arc<dyn SoundSink>,
    audio: AudioSet,
    has_played: bool,
    ticks_since_played: u32,
}

impl AudioHook {
    pub fn new(sounds: Arc<dyn SoundSink>, audio: AudioSet) -> Self {
        Self {
            sounds,
            audio,
            has_played: false,
            ticks_since_played: 0,
        }
    }

    fn play(&self, sound: &AudioDescription, animation: &Animation) {
        let position = animation.region().center() + DVec3::splat(0.5);
        self.sounds
            .play_sound(position, &sound.sound, sound.volume, sound.pitch);
    }
}

impl AnimationHook for AudioHook {
    fn name(&self) -> &str {
        "audio"
    }

    fn on_post_animation_step(&mut self, animation: &Animation) -> Result<(), HookError> {
        let Some(active) = &self.audio.active else {
            return Ok(());
        };
        let due = !self.has_played
            || (self.ticks_since_played >= active.duration
                && animation.ticks_remaining() >= active.duration);
        if due {
            self.play(active, animation);
            self.has_played = true;
            self.ticks_since_played = 0;
        } else {
            self.ticks_since_played += 1;
        }
        Ok(())
    }

    fn on_animation_ending(&mut self, animation: &Animation) -> Result<(), HookError> {
        if let Some(end) = &self.audio.end {
            self.play(end, animation);
        }
        Ok(())
    }
}

/// Creates an [`AudioHook`] for every archetype that has sounds configured
pub struct AudioHookFactory {
    sounds: Arc<dyn SoundSink>,
    config: Arc<AnimationConfig>,
}

impl AudioHookFactory {
    pub fn new(sounds: Arc<dyn SoundSink>, config: Arc<AnimationConfig>) -> Self {
        Self { sounds, config }
    }
}

impl AnimationHookFactory for AudioHookFactory {
    fn create(&self, animation: &Animation) -> Option<Box<dyn AnimationHook>> {
        let kind = animation.snapshot().archetype().kind();
        let audio = &self.config.settings(kind).audio;
        if audio.is_empty() {
            return None;
        }
        Some(Box::new(AudioHook::new(self.sounds.clone(), audio.clone())))
    }
}
