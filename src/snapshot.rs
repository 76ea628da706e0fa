//! Per-frame poses for the host renderer
//!
//! Plain `Pod` records a renderer can upload straight into an instance
//! buffer. Built fresh from the world each frame; holds no physics state.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Bubble, HookState, Ring, World, bubbles};

/// Ring transform plus hook state (0 free, 1 left post, 2 right post)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RingPose {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub hook: u32,
}

impl RingPose {
    pub fn from_ring(ring: &Ring) -> Self {
        Self {
            position: ring.position.to_array(),
            rotation: ring.rotation.to_array(),
            hook: match ring.hook {
                HookState::Free => 0,
                HookState::HookedLeft => 1,
                HookState::HookedRight => 2,
            },
        }
    }
}

/// Bubble position with display hints
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BubblePose {
    pub position: [f32; 3],
    pub scale: f32,
    pub opacity: f32,
}

/// Peak bubble opacity, reached at full life
const BUBBLE_MAX_OPACITY: f32 = 0.6;

impl BubblePose {
    /// Bubbles shrink a little and fade out as their life runs down
    pub fn from_bubble(bubble: &Bubble, radius: f32) -> Self {
        let life = bubble.life.clamp(0.0, 1.0);
        Self {
            position: bubble.position.to_array(),
            scale: radius * (0.6 + 0.4 * life),
            opacity: BUBBLE_MAX_OPACITY * life,
        }
    }
}

/// Everything the host draws for one frame
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub frame: u64,
    pub rings: Vec<RingPose>,
    pub bubbles: Vec<BubblePose>,
    pub hooked_count: usize,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        let radius = world.params.bubble_radius;
        Self {
            frame: world.frame,
            rings: world.rings.iter().map(RingPose::from_ring).collect(),
            bubbles: world
                .bubbles
                .iter()
                .filter(|b| bubbles::is_alive(b, &world.params))
                .map(|b| BubblePose::from_bubble(b, radius))
                .collect(),
            hooked_count: world.hooked_count(),
        }
    }

    /// Ring instance data as raw bytes
    pub fn ring_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rings)
    }

    /// Bubble instance data as raw bytes
    pub fn bubble_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.bubbles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use crate::sim::{Side, TickInput, tick};
    use glam::Vec3;

    #[test]
    fn test_pose_layout() {
        assert_eq!(std::mem::size_of::<RingPose>(), 28);
        assert_eq!(std::mem::size_of::<BubblePose>(), 20);
    }

    #[test]
    fn test_capture_matches_world() {
        let mut world = World::new(Params::default(), 3, Some(11)).unwrap();
        assert!(world.hook_ring(1, Side::Right));
        for _ in 0..30 {
            tick(&mut world, &TickInput { left: true, right: false });
        }

        let snapshot = Snapshot::capture(&world);
        assert_eq!(snapshot.frame, 30);
        assert_eq!(snapshot.rings.len(), 3);
        assert_eq!(snapshot.rings[1].hook, 2);
        assert_eq!(snapshot.rings[0].position, world.rings[0].position.to_array());
        assert_eq!(snapshot.bubbles.len(), world.bubbles.len());
        assert_eq!(snapshot.hooked_count, world.hooked_count());
        assert_eq!(snapshot.ring_bytes().len(), 3 * 28);
        assert_eq!(snapshot.bubble_bytes().len(), snapshot.bubbles.len() * 20);
    }

    #[test]
    fn test_bubble_fades_with_life() {
        let fresh = Bubble {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: 1.0,
            phase: 0.0,
        };
        let old = Bubble { life: 0.1, ..fresh.clone() };
        let a = BubblePose::from_bubble(&fresh, 0.1);
        let b = BubblePose::from_bubble(&old, 0.1);
        assert!(b.opacity < a.opacity);
        assert!(b.scale < a.scale);
        assert!(b.opacity >= 0.0);
    }
}
