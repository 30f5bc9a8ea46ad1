//! Animation hooks
//!
//! Hooks layer cross-cutting behavior onto an animation without touching the
//! movement strategies. Each registered [`AnimationHookFactory`] is offered
//! every new [`Animation`] and may return a hook for it or decline.
//!
//! Every callback of every hook runs isolated: an error or a panic is logged
//! with the hook's name and the callback, and the remaining hooks still run.

mod audio;

pub use audio::{AudioHook, AudioHookFactory};

use crate::animation::Animation;
use crate::error::HookError;
use smallvec::SmallVec;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Observer of one animation
///
/// All callbacks default to doing nothing.
pub trait AnimationHook {
    /// Name used when reporting failures
    fn name(&self) -> &str;

    /// The animation's blocks have been materialized
    fn on_prepare(&mut self, _animation: &Animation) -> Result<(), HookError> {
        Ok(())
    }

    /// A step is about to execute
    fn on_pre_animation_step(&mut self, _animation: &Animation) -> Result<(), HookError> {
        Ok(())
    }

    /// A step has executed
    fn on_post_animation_step(&mut self, _animation: &Animation) -> Result<(), HookError> {
        Ok(())
    }

    /// The last step has executed
    fn on_animation_ending(&mut self, _animation: &Animation) -> Result<(), HookError> {
        Ok(())
    }

    /// Every block is at rest
    fn on_animation_completed(&mut self, _animation: &Animation) -> Result<(), HookError> {
        Ok(())
    }
}

/// Creates hooks for new animations
pub trait AnimationHookFactory: Send + Sync {
    /// Return a hook for `animation`, or `None` to decline
    fn create(&self, animation: &Animation) -> Option<Box<dyn AnimationHook>>;
}

/// Ordered list of hook factories
#[derive(Clone, Default)]
pub struct AnimationHookManager {
    factories: Vec<Arc<dyn AnimationHookFactory>>,
}

impl AnimationHookManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory; hooks run in registration order
    pub fn register(&mut self, factory: Arc<dyn AnimationHookFactory>) {
        self.factories.push(factory);
    }

    pub fn with_factory(mut self, factory: Arc<dyn AnimationHookFactory>) -> Self {
        self.register(factory);
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Offer `animation` to every factory
    pub fn instantiate(&self, animation: &Animation) -> HookSet {
        let hooks = self
            .factories
            .iter()
            .filter_map(|factory| {
                match panic::catch_unwind(AssertUnwindSafe(|| factory.create(animation))) {
                    Ok(hook) => hook,
                    Err(payload) => {
                        tracing::warn!(
                            "Hook factory panicked while creating a hook: {}",
                            panic_message(&*payload)
                        );
                        None
                    }
                }
            })
            .collect();
        HookSet { hooks }
    }
}

impl std::fmt::Debug for AnimationHookManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHookManager")
            .field("factories", &self.factories.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HookCallback {
    Prepare,
    PreStep,
    PostStep,
    Ending,
    Completed,
}

impl HookCallback {
    fn name(self) -> &'static str {
        match self {
            HookCallback::Prepare => "on_prepare",
            HookCallback::PreStep => "on_pre_animation_step",
            HookCallback::PostStep => "on_post_animation_step",
            HookCallback::Ending => "on_animation_ending",
            HookCallback::Completed => "on_animation_completed",
        }
    }
}

/// Hooks attached to one animation
#[derive(Default)]
pub struct HookSet {
    hooks: SmallVec<[Box<dyn AnimationHook>; 4]>,
}

impl HookSet {
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn on_prepare(&mut self, animation: &Animation) {
        self.dispatch(HookCallback::Prepare, animation);
    }

    pub fn on_pre_animation_step(&mut self, animation: &Animation) {
        self.dispatch(HookCallback::PreStep, animation);
    }

    pub fn on_post_animation_step(&mut self, animation: &Animation) {
        self.dispatch(HookCallback::PostStep, animation);
    }

    pub fn on_animation_ending(&mut self, animation: &Animation) {
        self.dispatch(HookCallback::Ending, animation);
    }

    pub fn on_animation_completed(&mut self, animation: &Animation) {
        self.dispatch(HookCallback::Completed, animation);
    }

    fn dispatch(&mut self, callback: HookCallback, animation: &Animation) {
        for hook in self.hooks.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| match callback {
                HookCallback::Prepare => hook.on_prepare(animation),
                HookCallback::PreStep => hook.on_pre_animation_step(animation),
                HookCallback::PostStep => hook.on_post_animation_step(animation),
                HookCallback::Ending => hook.on_animation_ending(animation),
                HookCallback::Completed => hook.on_animation_completed(animation),
            }));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        "Animation hook '{}' failed in {}: {}",
                        hook.name(),
                        callback.name(),
                        err
                    );
                }
                Err(payload) => {
                    tracing::warn!(
                        "Animation hook '{}' panicked in {}: {}",
                        hook.name(),
                        callback.name(),
                        panic_message(&*payload)
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
