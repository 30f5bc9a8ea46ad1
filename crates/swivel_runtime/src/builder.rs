//! Runtime construction

use crate::config::RuntimeConfig;
use crate::events::{EventBus, ToggleListener};
use crate::executor::{TickCommand, TickExecutor, TickHandle};
use crate::pipeline::{RuntimeShared, TogglePipeline};
use crate::registry::AnimationRegistry;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use swivel_animation::{AnimationHookFactory, AnimationHookManager, AudioHookFactory};
use swivel_core::WorldContext;

/// Assembles a [`TogglePipeline`] and its [`TickExecutor`]
pub struct RuntimeBuilder {
    world: WorldContext,
    config: RuntimeConfig,
    factories: Vec<Arc<dyn AnimationHookFactory>>,
    listeners: Vec<Arc<dyn ToggleListener>>,
    audio: bool,
}

impl RuntimeBuilder {
    pub fn new(world: WorldContext) -> Self {
        Self {
            world,
            config: RuntimeConfig::default(),
            factories: Vec::new(),
            listeners: Vec::new(),
            audio: true,
        }
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a hook factory; hooks run after the audio hook in registration order
    pub fn with_hook_factory(mut self, factory: Arc<dyn AnimationHookFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn ToggleListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Do not register the built-in audio hook
    pub fn without_audio(mut self) -> Self {
        self.audio = false;
        self
    }

    /// Build for manual ticking on the current thread
    pub fn build(self) -> (TogglePipeline, TickExecutor) {
        let (shared, receiver, handle) = self.into_parts();
        let executor = TickExecutor::new(Arc::clone(&shared), receiver);
        (TogglePipeline::new(shared, handle), executor)
    }

    /// Start the tick loop on its own thread
    ///
    /// The loop stops after [`TickHandle::shutdown`] or once every pipeline
    /// clone has been dropped.
    pub fn spawn(self) -> std::io::Result<(TogglePipeline, JoinHandle<()>)> {
        let (shared, receiver, handle) = self.into_parts();
        let executor_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("swivel-tick".to_string())
            .spawn(move || TickExecutor::new(executor_shared, receiver).run())?;
        Ok((TogglePipeline::new(shared, handle), thread))
    }

    fn into_parts(
        self,
    ) -> (
        Arc<RuntimeShared>,
        mpsc::Receiver<TickCommand>,
        TickHandle,
    ) {
        let animation_config = Arc::new(self.config.animation.clone());

        let mut hooks = AnimationHookManager::new();
        if self.audio {
            hooks.register(Arc::new(AudioHookFactory::new(
                Arc::clone(&self.world.sounds),
                Arc::clone(&animation_config),
            )));
        }
        for factory in self.factories {
            hooks.register(factory);
        }

        let events = EventBus::new();
        for listener in self.listeners {
            events.subscribe(listener);
        }

        let shared = Arc::new(RuntimeShared {
            world: self.world,
            config: self.config,
            animation_config,
            registry: AnimationRegistry::new(),
            events,
            hooks,
        });
        let (sender, receiver) = mpsc::channel();
        (shared, receiver, TickHandle::new(sender))
    }
}
