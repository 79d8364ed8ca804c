//! Collision detection for the Plinko board
//!
//! Balls are circles; pins are static circles; walls are the vertical board
//! edges. Detection returns the contact normal and penetration so the caller
//! decides the response.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the obstacle surface
    pub point: Vec2,
    /// Unit normal pointing from the obstacle toward the ball center
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a circular pin
///
/// A ball centered exactly on the pin gets the angle-zero normal (+x), which
/// matches `atan2(0, 0)`.
pub fn ball_pin_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    pin_pos: Vec2,
    pin_radius: f32,
) -> CollisionResult {
    let delta = ball_pos - pin_pos;
    let distance = delta.length();
    let radius_sum = ball_radius + pin_radius;

    if distance >= radius_sum {
        return CollisionResult::miss();
    }

    let normal = if distance > f32::EPSILON {
        delta / distance
    } else {
        Vec2::X
    };

    CollisionResult {
        hit: true,
        point: pin_pos + normal * pin_radius,
        normal,
        penetration: radius_sum - distance,
    }
}

/// Check a ball against the left (x = 0) and right (x = width) board walls
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32, board_width: f32) -> CollisionResult {
    if ball_pos.x < ball_radius {
        return CollisionResult {
            hit: true,
            point: Vec2::new(0.0, ball_pos.y),
            normal: Vec2::X,
            penetration: ball_radius - ball_pos.x,
        };
    }

    let right = board_width - ball_radius;
    if ball_pos.x > right {
        return CollisionResult {
            hit: true,
            point: Vec2::new(board_width, ball_pos.y),
            normal: Vec2::NEG_X,
            penetration: ball_pos.x - right,
        };
    }

    CollisionResult::miss()
}

/// Point where a ball of `ball_radius` rests tangent to the obstacle
#[inline]
pub fn tangent_position(contact: &CollisionResult, ball_radius: f32) -> Vec2 {
    contact.point + contact.normal * ball_radius
}
