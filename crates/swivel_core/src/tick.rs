//! Tick-thread confinement
//!
//! Everything that owns animation state lives on a single logical tick thread.
//! Types that must stay there embed [`TickBound`], which makes them `!Send` and
//! `!Sync`, so the compiler rejects moving them to another thread. Handles that
//! may be shared freely (request pipelines, registries, command senders) do not
//! carry the marker.

use std::marker::PhantomData;
use std::rc::Rc;

/// Ticks per second of the host world
pub const DEFAULT_TICK_RATE: u32 = 20;

/// Zero-sized marker that pins its owner to the thread it was created on
pub type TickBound = PhantomData<Rc<()>>;
