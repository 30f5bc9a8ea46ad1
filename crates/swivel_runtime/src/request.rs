//! Toggle requests and their outcomes

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;
use swivel_animation::AnimationType;
use swivel_core::{ActorId, StructureId};

/// What triggered a toggle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleCause {
    Player(ActorId),
    Redstone,
    Scheduler,
    Plugin,
    /// The next cycle of a perpetual structure
    PerpetualMotion,
}

/// What the requester wants the structure to end up as
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Open,
    Close,
    /// Whichever of open or close applies
    #[default]
    Toggle,
}

/// A request to move a structure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub structure: StructureId,
    pub cause: ToggleCause,
    pub action: ToggleAction,
    /// Who is told about failures
    pub responsible: Option<ActorId>,
    /// Place the final blocks without animating
    pub skip_animation: bool,
    /// Requested animation time in seconds
    pub time: Option<f64>,
    pub animation_type: AnimationType,
}

impl ToggleRequest {
    /// Toggle `structure`; a player cause becomes the responsible actor
    pub fn new(structure: StructureId, cause: ToggleCause) -> Self {
        let responsible = match cause {
            ToggleCause::Player(actor) => Some(actor),
            _ => None,
        };
        Self {
            structure,
            cause,
            action: ToggleAction::Toggle,
            responsible,
            skip_animation: false,
            time: None,
            animation_type: AnimationType::MoveBlocks,
        }
    }

    pub fn with_action(mut self, action: ToggleAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_responsible(mut self, actor: Option<ActorId>) -> Self {
        self.responsible = actor;
        self
    }

    pub fn with_skip_animation(mut self, skip: bool) -> Self {
        self.skip_animation = skip;
        self
    }

    /// Ask for the movement to take `seconds`
    pub fn with_time(mut self, seconds: f64) -> Self {
        self.time = Some(seconds);
        self
    }

    pub fn with_animation_type(mut self, animation_type: AnimationType) -> Self {
        self.animation_type = animation_type;
        self
    }
}

/// Outcome of a toggle request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleResult {
    /// The animation was admitted and started
    Success,
    /// Another animation of the same structure is in flight
    Busy,
    Error,
    /// An observer vetoed the toggle
    Cancelled,
    /// The structure already is in the requested state
    NoChange,
    Locked,
    /// The structure has more blocks than allowed
    TooBig,
}

impl ToggleResult {
    pub fn is_success(self) -> bool {
        self == ToggleResult::Success
    }
}

/// Pending outcome of a submitted request
///
/// Requests rejected before reaching the tick thread resolve immediately;
/// admitted ones resolve on the tick that starts their animation.
#[derive(Debug)]
pub struct ToggleTicket {
    receiver: Option<Receiver<ToggleResult>>,
    result: Option<ToggleResult>,
}

impl ToggleTicket {
    pub(crate) fn pending(receiver: Receiver<ToggleResult>) -> Self {
        Self {
            receiver: Some(receiver),
            result: None,
        }
    }

    pub(crate) fn ready(result: ToggleResult) -> Self {
        Self {
            receiver: None,
            result: Some(result),
        }
    }

    /// The outcome, if it is already known
    pub fn try_result(&mut self) -> Option<ToggleResult> {
        if self.result.is_none() {
            if let Some(receiver) = &self.receiver {
                match receiver.try_recv() {
                    Ok(result) => self.resolve(result),
                    Err(TryRecvError::Disconnected) => self.resolve(ToggleResult::Error),
                    Err(TryRecvError::Empty) => {}
                }
            }
        }
        self.result
    }

    /// Block until the outcome is known
    ///
    /// A tick thread that stops before answering yields [`ToggleResult::Error`].
    pub fn wait(mut self) -> ToggleResult {
        if let Some(result) = self.result {
            return result;
        }
        match self.receiver.take() {
            Some(receiver) => receiver.recv().unwrap_or(ToggleResult::Error),
            None => ToggleResult::Error,
        }
    }

    /// Block until the outcome is known or `timeout` elapses
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<ToggleResult> {
        if self.result.is_none() {
            if let Some(receiver) = &self.receiver {
                match receiver.recv_timeout(timeout) {
                    Ok(result) => self.resolve(result),
                    Err(RecvTimeoutError::Disconnected) => self.resolve(ToggleResult::Error),
                    Err(RecvTimeoutError::Timeout) => {}
                }
            }
        }
        self.result
    }

    fn resolve(&mut self, result: ToggleResult) {
        self.result = Some(result);
        self.receiver = None;
    }
}
