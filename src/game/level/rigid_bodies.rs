//! Rigid Body Pool with Generational Handles
//!
//! Fixed-capacity storage for every simulated rectangle in a level: the
//! player, boxes and bodies spawned by scripts. Other components only hold
//! `RigidBodyId`s, never references into the pool.
//!
//! The generational index pattern prevents dangling handles:
//! - Each slot has a generation counter
//! - When a body is removed, its slot can be reused
//! - The generation increments on reuse, invalidating old handles

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::game::camera::Camera;
use crate::math::{Color, Rect, Vec2};
use crate::system::LineStream;
use super::error::LevelError;
use super::platforms::Platforms;
use super::section::{expect_line, Fields};

/// Penetrations at or below this depth count as resting contact.
pub const CONTACT_EPSILON: f32 = 1e-3;
/// Resolution sweeps per body before it counts as jammed
const MAX_COLLIDE_PASSES: usize = 4;

/// A handle to a body in `RigidBodies`.
///
/// Consists of a slot index and the generation of that slot at the time the
/// body was added. Two ids with the same index but different generations
/// are different bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyId {
    index: u32,
    generation: u32,
}

impl RigidBodyId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Numeric form handed to scripts. A first-generation body's raw id is
    /// its slot index.
    pub fn to_raw(self) -> i64 {
        ((self.generation as i64) << 32) | self.index as i64
    }

    pub fn from_raw(raw: i64) -> Option<Self> {
        if raw < 0 {
            return None;
        }
        Some(Self::new((raw & 0xffff_ffff) as u32, (raw >> 32) as u32))
    }
}

impl std::fmt::Display for RigidBodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (slot {}, generation {})", self.to_raw(), self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub hitbox: Rect,
    pub velocity: Vec2,
    /// Walking intent, added to the position each step but never
    /// accumulated into velocity
    pub movement: Vec2,
    /// Forces accumulated since the last integration step
    pub force: Vec2,
    pub color: Color,
    /// Resting on top of a platform after the last collision pass
    pub grounded: bool,
    /// Disabled bodies are skipped by forces, integration, collision and
    /// rendering
    pub disabled: bool,
}

impl RigidBody {
    fn new(hitbox: Rect, color: Color) -> Self {
        Self {
            hitbox,
            velocity: Vec2::ZERO,
            movement: Vec2::ZERO,
            force: Vec2::ZERO,
            color,
            grounded: false,
            disabled: false,
        }
    }
}

struct Slot {
    generation: u32,
    /// `None` while the slot is free
    body: Option<RigidBody>,
}

pub struct RigidBodies {
    slots: Vec<Slot>,
    /// Free slot indices, lowest first
    free: BinaryHeap<Reverse<u32>>,
    capacity: usize,
    live: usize,
}

impl RigidBodies {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: BinaryHeap::new(),
            capacity,
            live: 0,
        }
    }

    /// Add a body, reusing the lowest free slot if there is one.
    pub fn add(&mut self, hitbox: Rect, color: Color) -> Result<RigidBodyId, LevelError> {
        let body = RigidBody::new(hitbox, color);

        let id = if let Some(Reverse(index)) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.body = Some(body);
            RigidBodyId::new(index, slot.generation)
        } else if self.slots.len() < self.capacity {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                body: Some(body),
            });
            RigidBodyId::new(index, 0)
        } else {
            return Err(LevelError::CapacityExceeded {
                what: "rigid bodies",
                capacity: self.capacity,
            });
        };

        self.live += 1;
        Ok(id)
    }

    /// Parse one `x y w h color` line and add the body.
    pub fn add_from_stream(&mut self, stream: &mut LineStream) -> Result<RigidBodyId, LevelError> {
        let line = expect_line(stream, "rigid body")?;
        let mut fields = Fields::new(line, "rigid body");
        let hitbox = fields.next_rect()?;
        let color = fields.next_color("color")?;
        self.add(hitbox, color)
    }

    /// Free the body's slot. The id (and every copy of it) stops resolving.
    pub fn remove(&mut self, id: RigidBodyId) -> Result<(), LevelError> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation && slot.body.is_some())
            .ok_or(LevelError::InvalidHandle(id))?;
        slot.body = None;
        self.free.push(Reverse(id.index));
        self.live -= 1;
        Ok(())
    }

    pub fn is_alive(&self, id: RigidBodyId) -> bool {
        self.get(id).is_ok()
    }

    pub fn get(&self, id: RigidBodyId) -> Result<&RigidBody, LevelError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.body.as_ref())
            .ok_or(LevelError::InvalidHandle(id))
    }

    fn get_mut(&mut self, id: RigidBodyId) -> Result<&mut RigidBody, LevelError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.body.as_mut())
            .ok_or(LevelError::InvalidHandle(id))
    }

    /// Number of live bodies
    pub fn count(&self) -> usize {
        self.live
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // =========================================================================
    // Forces and integration
    // =========================================================================

    /// Add `force` to every live, enabled body (gravity).
    pub fn apply_omniforce(&mut self, force: Vec2) {
        for body in self.slots.iter_mut().filter_map(|slot| slot.body.as_mut()) {
            if !body.disabled {
                body.force += force;
            }
        }
    }

    pub fn apply_force(&mut self, id: RigidBodyId, force: Vec2) -> Result<(), LevelError> {
        self.get_mut(id)?.force += force;
        Ok(())
    }

    /// Integrate one body: velocity += force * dt, position += (velocity +
    /// movement) * dt, then clear the accumulated force. Mass is unit.
    pub fn update(&mut self, id: RigidBodyId, delta_time: f32) -> Result<(), LevelError> {
        let body = self.get_mut(id)?;
        if body.disabled {
            return Ok(());
        }

        body.velocity += body.force * delta_time;
        let step = (body.velocity + body.movement) * delta_time;
        body.hitbox = body.hitbox.translate(step);
        body.force = Vec2::ZERO;
        Ok(())
    }

    pub fn set_movement(&mut self, id: RigidBodyId, movement: Vec2) -> Result<(), LevelError> {
        self.get_mut(id)?.movement = movement;
        Ok(())
    }

    pub fn set_velocity(&mut self, id: RigidBodyId, velocity: Vec2) -> Result<(), LevelError> {
        self.get_mut(id)?.velocity = velocity;
        Ok(())
    }

    /// Entrywise velocity scaling (damping)
    pub fn transform_velocity(&mut self, id: RigidBodyId, multiplier: Vec2) -> Result<(), LevelError> {
        let body = self.get_mut(id)?;
        body.velocity = body.velocity.entrywise_multiply(multiplier);
        Ok(())
    }

    pub fn teleport_to(&mut self, id: RigidBodyId, position: Vec2) -> Result<(), LevelError> {
        let body = self.get_mut(id)?;
        body.hitbox.x = position.x;
        body.hitbox.y = position.y;
        Ok(())
    }

    pub fn disable(&mut self, id: RigidBodyId, disabled: bool) -> Result<(), LevelError> {
        let body = self.get_mut(id)?;
        body.disabled = disabled;
        if disabled {
            body.force = Vec2::ZERO;
            body.grounded = false;
        }
        Ok(())
    }

    pub fn hitbox(&self, id: RigidBodyId) -> Result<Rect, LevelError> {
        Ok(self.get(id)?.hitbox)
    }

    pub fn velocity(&self, id: RigidBodyId) -> Result<Vec2, LevelError> {
        Ok(self.get(id)?.velocity)
    }

    pub fn is_grounded(&self, id: RigidBodyId) -> Result<bool, LevelError> {
        Ok(self.get(id)?.grounded)
    }

    // =========================================================================
    // Collision
    // =========================================================================

    /// Push every live, enabled body out of the platforms, in slot order.
    ///
    /// Among the platforms a body overlaps, the one with the smallest
    /// penetration is resolved first; the remaining ones are then re-tested
    /// against the moved body. If a push drove the body back into a platform
    /// resolved earlier, the pass is repeated. A body jammed in a gap smaller
    /// than itself is left where it was, so a second call never moves a body
    /// the first call settled.
    pub fn collide(&mut self, platforms: &Platforms) {
        let rects = platforms.rects();
        let mut resolved = vec![false; rects.len()];

        for body in self.slots.iter_mut().filter_map(|slot| slot.body.as_mut()) {
            if body.disabled {
                continue;
            }

            body.grounded = false;
            let entry = body.hitbox;

            let mut passes = 0;
            while passes < MAX_COLLIDE_PASSES && overlaps_any(&body.hitbox, rects) {
                resolved.iter_mut().for_each(|r| *r = false);
                resolve_pass(body, rects, &mut resolved);
                passes += 1;
            }
            if overlaps_any(&body.hitbox, rects) {
                tracing::trace!(?entry, "body jammed between platforms");
                body.hitbox = entry;
            }

            if !body.grounded {
                body.grounded = rects.iter().any(|platform| rests_on(&body.hitbox, platform));
            }
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn render(&self, id: RigidBodyId, camera: &mut Camera) -> Result<(), LevelError> {
        let body = self.get(id)?;
        if !body.disabled {
            camera.fill_rect(body.hitbox, body.color);
        }
        Ok(())
    }
}

/// Smallest displacement that moves `body` out of `platform`, or `None` if
/// they only touch or are apart.
/// One smallest-first sweep; each platform is pushed out of at most once.
fn resolve_pass(body: &mut RigidBody, rects: &[Rect], resolved: &mut [bool]) {
    loop {
        let mut best: Option<(usize, Vec2, f32)> = None;
        for (i, platform) in rects.iter().enumerate() {
            if resolved[i] {
                continue;
            }
            if let Some(push) = penetration(&body.hitbox, platform) {
                let depth = push.magnitude();
                if best.map_or(true, |(_, _, d)| depth < d) {
                    best = Some((i, push, depth));
                }
            }
        }

        let Some((i, push, _)) = best else { return };
        resolved[i] = true;
        body.hitbox = body.hitbox.translate(push);
        if push.x != 0.0 {
            body.velocity.x = 0.0;
        } else {
            body.velocity.y = 0.0;
        }
        if push.y < 0.0 {
            body.grounded = true;
        }
    }
}

fn overlaps_any(body: &Rect, rects: &[Rect]) -> bool {
    rects.iter().any(|platform| penetration(body, platform).is_some())
}

fn penetration(body: &Rect, platform: &Rect) -> Option<Vec2> {
    if !body.overlaps(platform) {
        return None;
    }

    let push_left = platform.x - body.right();
    let push_right = platform.right() - body.x;
    let push_up = platform.y - body.bottom();
    let push_down = platform.bottom() - body.y;

    let dx = if push_right < -push_left { push_right } else { push_left };
    let dy = if push_down < -push_up { push_down } else { push_up };

    if dx.abs().min(dy.abs()) <= CONTACT_EPSILON {
        return None;
    }

    if dy.abs() <= dx.abs() {
        Some(Vec2::new(0.0, dy))
    } else {
        Some(Vec2::new(dx, 0.0))
    }
}

/// Bottom edge sits on the platform's top edge with horizontal overlap.
fn rests_on(body: &Rect, platform: &Rect) -> bool {
    (body.bottom() - platform.y).abs() <= CONTACT_EPSILON
        && body.x < platform.right()
        && platform.x < body.right()
}
