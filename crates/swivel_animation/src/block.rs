//! Animated blocks

use swivel_core::math::block_center;
use swivel_core::{BlockDescriptor, DVec3, IVec3, ProxyHandle, Rotation};

/// One physical block moving as part of an animation
///
/// Blocks are stored in a flat list whose indices never change: a block whose
/// proxy failed is marked dead and skipped, but stays in place.
#[derive(Clone, Debug)]
pub struct AnimatedBlock {
    block: BlockDescriptor,
    origin: IVec3,
    start_position: DVec3,
    current_position: DVec3,
    previous_position: DVec3,
    previous_target: DVec3,
    radius: f64,
    start_angle: f64,
    final_position: DVec3,
    rotation: Rotation,
    alive: bool,
    proxy: Option<ProxyHandle>,
}

impl AnimatedBlock {
    pub fn new(
        block: BlockDescriptor,
        origin: IVec3,
        radius: f64,
        start_angle: f64,
        final_position: DVec3,
    ) -> Self {
        let start_position = block_center(origin);
        Self {
            block,
            origin,
            start_position,
            current_position: start_position,
            previous_position: start_position,
            previous_target: start_position,
            radius,
            start_angle,
            final_position,
            rotation: Rotation::default(),
            alive: true,
            proxy: None,
        }
    }

    pub fn block(&self) -> &BlockDescriptor {
        &self.block
    }

    /// Whether the block's own orientation follows the structure
    pub fn can_rotate(&self) -> bool {
        self.block.can_rotate
    }

    /// The cell the block occupied before the animation
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn start_position(&self) -> DVec3 {
        self.start_position
    }

    pub fn current_position(&self) -> DVec3 {
        self.current_position
    }

    pub fn previous_position(&self) -> DVec3 {
        self.previous_position
    }

    /// The last target requested by the movement strategy, before any snapping
    pub fn previous_target(&self) -> DVec3 {
        self.previous_target
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Where the block comes to rest
    pub fn final_position(&self) -> DVec3 {
        self.final_position
    }

    /// Visual orientation of the proxy
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn proxy(&self) -> Option<ProxyHandle> {
        self.proxy
    }

    pub(crate) fn attach_proxy(&mut self, proxy: ProxyHandle) {
        self.proxy = Some(proxy);
    }

    pub(crate) fn detach_proxy(&mut self) -> Option<ProxyHandle> {
        self.proxy.take()
    }

    pub(crate) fn kill(&mut self) -> Option<ProxyHandle> {
        self.alive = false;
        self.proxy.take()
    }

    pub(crate) fn record_target(&mut self, target: DVec3) {
        self.previous_target = target;
    }

    pub(crate) fn move_to(&mut self, position: DVec3, rotation: Rotation) {
        self.previous_position = self.current_position;
        self.current_position = position;
        self.rotation = rotation;
    }
}
