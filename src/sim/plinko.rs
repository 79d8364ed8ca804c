//! Plinko ball physics
//!
//! Discrete-time integrator advanced once per display frame. Constants are
//! per-frame, so the caller must step at a fixed rate (see `FrameClock`).
//! Each pin contact re-randomizes the bounce direction within ±45° of the
//! contact normal; that jitter is what spreads balls across the buckets.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{ball_pin_collision, ball_wall_collision, tangent_position};
use crate::config::{PlinkoTuning, RiskLevel};
use crate::consts::PLINKO_BOUNCE_SPREAD;
use crate::outcome::MultiplierTable;
use crate::rng::RandomSource;
use crate::round::{BallPosition, RoundId};

/// A static pin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub pos: Vec2,
    pub radius: f32,
}

/// Pin layout derived from board size and row count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlinkoBoard {
    pub width: f32,
    pub height: f32,
    pub rows: usize,
    pub pin_radius: f32,
    pub pins: Vec<Pin>,
}

impl PlinkoBoard {
    /// Triangular layout: row `r` holds `r + 3` pins, centered horizontally,
    /// spaced `width / (rows + 2)` apart, starting two spacings down.
    pub fn new(rows: usize, width: f32, height: f32, pin_radius: f32) -> Self {
        let mut board = Self {
            width,
            height,
            rows,
            pin_radius,
            pins: Vec::new(),
        };
        board.generate_pins();
        board
    }

    pub fn from_tuning(tuning: &PlinkoTuning) -> Self {
        Self::new(tuning.rows, tuning.width, tuning.height, tuning.pin_radius)
    }

    pub fn spacing(&self) -> f32 {
        self.width / (self.rows + 2) as f32
    }

    fn generate_pins(&mut self) {
        let spacing = self.spacing();
        let start_y = spacing * 2.0;

        self.pins.clear();
        for row in 0..self.rows {
            let pins_in_row = row + 3;
            let row_width = (pins_in_row - 1) as f32 * spacing;
            let start_x = (self.width - row_width) / 2.0;
            for i in 0..pins_in_row {
                self.pins.push(Pin {
                    pos: Vec2::new(start_x + i as f32 * spacing, start_y + row as f32 * spacing),
                    radius: self.pin_radius,
                });
            }
        }
    }

    /// Rebuild the pin layout for a new canvas size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.generate_pins();
    }
}

/// Per-frame physics constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlinkoPhysics {
    pub gravity: f32,
    pub friction: f32,
    pub bounce: f32,
}

impl From<&PlinkoTuning> for PlinkoPhysics {
    fn from(t: &PlinkoTuning) -> Self {
        Self {
            gravity: t.gravity,
            friction: t.friction,
            bounce: t.bounce,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallPhase {
    Falling,
    /// Touched a pin or wall this frame
    Colliding,
    Landed,
}

/// A ball in flight. Each ball is its own round.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: RoundId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub bet: f64,
    /// Table captured at drop time
    pub table: MultiplierTable,
    pub phase: BallPhase,
    /// Frames since drop
    pub frames: u32,
}

impl Ball {
    pub fn new(id: RoundId, pos: Vec2, radius: f32, bet: f64, table: MultiplierTable) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            bet,
            table,
            phase: BallPhase::Falling,
            frames: 0,
        }
    }
}

/// A ball that reached the bottom edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub ball_id: RoundId,
    pub bet: f64,
    pub bucket: usize,
    pub multiplier: f64,
    pub payout: f64,
}

/// Advance one ball by one frame. Returns the landing when it leaves the board.
pub fn step_ball(
    ball: &mut Ball,
    board: &PlinkoBoard,
    physics: &PlinkoPhysics,
    rng: &mut impl RandomSource,
) -> Option<Landing> {
    ball.frames += 1;
    ball.phase = BallPhase::Falling;

    ball.vel.y += physics.gravity;
    ball.vel *= physics.friction;
    ball.pos += ball.vel;

    for pin in &board.pins {
        let contact = ball_pin_collision(ball.pos, ball.radius, pin.pos, pin.radius);
        if !contact.hit {
            continue;
        }
        let normal_angle = contact.normal.y.atan2(contact.normal.x);
        let speed = ball.vel.length();
        ball.pos = tangent_position(&contact, ball.radius);

        let spread = f64::from(PLINKO_BOUNCE_SPREAD);
        let bounce_angle = normal_angle + rng.uniform(-spread, spread) as f32;
        ball.vel = Vec2::from_angle(bounce_angle) * speed * physics.bounce;
        ball.phase = BallPhase::Colliding;
    }

    let wall = ball_wall_collision(ball.pos, ball.radius, board.width);
    if wall.hit {
        ball.pos.x = tangent_position(&wall, ball.radius).x;
        ball.vel.x *= -physics.bounce;
        ball.phase = BallPhase::Colliding;
    }

    if ball.pos.y > board.height - ball.radius {
        ball.phase = BallPhase::Landed;
        let bucket = ball.table.bucket_for(ball.pos.x, board.width);
        let multiplier = ball.table.get(bucket);
        return Some(Landing {
            ball_id: ball.id,
            bet: ball.bet,
            bucket,
            multiplier,
            payout: ball.bet * multiplier,
        });
    }

    None
}

/// All balls on one board, stepped together once per frame
#[derive(Debug, Clone)]
pub struct PlinkoSim {
    pub board: PlinkoBoard,
    pub physics: PlinkoPhysics,
    pub ball_radius: f32,
    balls: Vec<Ball>,
}

impl PlinkoSim {
    pub fn new(tuning: &PlinkoTuning) -> Self {
        Self {
            board: PlinkoBoard::from_tuning(tuning),
            physics: PlinkoPhysics::from(tuning),
            ball_radius: tuning.ball_radius,
            balls: Vec::new(),
        }
    }

    /// Release a ball at the top center with zero velocity
    pub fn drop_ball(&mut self, id: RoundId, bet: f64, risk: RiskLevel) {
        let start = Vec2::new(self.board.width / 2.0, self.ball_radius);
        self.balls.push(Ball::new(
            id,
            start,
            self.ball_radius,
            bet,
            MultiplierTable::for_risk(risk),
        ));
    }

    /// Advance every ball one frame; landed balls are removed and returned.
    /// Balls never interact, so order within the pass does not matter.
    pub fn step(&mut self, rng: &mut impl RandomSource) -> Vec<Landing> {
        let mut landings = Vec::new();
        for ball in &mut self.balls {
            if let Some(landing) = step_ball(ball, &self.board, &self.physics, rng) {
                landings.push(landing);
            }
        }
        self.balls.retain(|b| b.phase != BallPhase::Landed);
        landings
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.board.resize(width, height);
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn is_idle(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn positions(&self) -> Vec<BallPosition> {
        self.balls
            .iter()
            .map(|b| BallPosition {
                id: b.id,
                x: b.pos.x,
                y: b.pos.y,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;
    use crate::rng::testing::ScriptedRandom;

    const MAX_TEST_FRAMES: u32 = 10_000;

    fn run_until_landed(sim: &mut PlinkoSim, rng: &mut impl RandomSource) -> Vec<Landing> {
        let mut landed = Vec::new();
        for _ in 0..MAX_TEST_FRAMES {
            landed.extend(sim.step(rng));
            if sim.is_idle() {
                return landed;
            }
        }
        panic!("balls still in flight after {MAX_TEST_FRAMES} frames");
    }

    #[test]
    fn test_board_layout() {
        let board = PlinkoBoard::new(8, 600.0, 600.0, 3.0);
        // 3 + 4 + ... + 10
        assert_eq!(board.pins.len(), 52);
        assert!((board.spacing() - 60.0).abs() < 1e-4);

        // First row: 3 pins centered, middle one at the board center
        assert!((board.pins[1].pos.x - 300.0).abs() < 1e-4);
        assert!((board.pins[0].pos.y - 120.0).abs() < 1e-4);

        // Mirror symmetric about the center line
        let mut xs: Vec<f32> = board.pins.iter().map(|p| p.pos.x - 300.0).collect();
        let mut mirrored: Vec<f32> = xs.iter().map(|x| -x).collect();
        xs.sort_by(f32::total_cmp);
        mirrored.sort_by(f32::total_cmp);
        for (a, b) in xs.iter().zip(&mirrored) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_resize_rebuilds_pins() {
        let mut board = PlinkoBoard::new(8, 600.0, 600.0, 3.0);
        board.resize(1200.0, 900.0);
        assert_eq!(board.pins.len(), 52);
        assert!((board.spacing() - 120.0).abs() < 1e-4);
        assert!((board.pins[1].pos.x - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_free_fall_integration() {
        let board = PlinkoBoard {
            pins: Vec::new(),
            ..PlinkoBoard::new(8, 600.0, 600.0, 3.0)
        };
        let physics = PlinkoPhysics::from(&PlinkoTuning::default());
        let table = MultiplierTable::for_risk(RiskLevel::Medium);
        let mut ball = Ball::new(RoundId(1), Vec2::new(100.0, 6.0), 6.0, 10.0, table);
        let mut rng = SeededRandom::new(1);

        assert!(step_ball(&mut ball, &board, &physics, &mut rng).is_none());
        assert!((ball.vel.y - 0.198).abs() < 1e-6);
        assert!((ball.pos.y - 6.198).abs() < 1e-5);
        assert_eq!(ball.vel.x, 0.0);
        assert_eq!(ball.phase, BallPhase::Falling);

        let landing = loop {
            if let Some(l) = step_ball(&mut ball, &board, &physics, &mut rng) {
                break l;
            }
            assert!(ball.frames < MAX_TEST_FRAMES);
        };
        // x = 100 on 600 wide, 8 buckets -> bucket 1 (1.5x on medium)
        assert_eq!(landing.bucket, 1);
        assert_eq!(landing.multiplier, 1.5);
        assert!((landing.payout - 15.0).abs() < 1e-9);
        assert_eq!(ball.phase, BallPhase::Landed);
    }

    #[test]
    fn test_pin_bounce_along_normal() {
        let board = PlinkoBoard {
            pins: vec![Pin {
                pos: Vec2::new(300.0, 100.0),
                radius: 3.0,
            }],
            ..PlinkoBoard::new(8, 600.0, 600.0, 3.0)
        };
        let physics = PlinkoPhysics {
            gravity: 0.0,
            friction: 1.0,
            bounce: 0.5,
        };
        let table = MultiplierTable::for_risk(RiskLevel::Low);
        // Moving straight down onto the pin top
        let mut ball = Ball::new(RoundId(1), Vec2::new(300.0, 88.0), 6.0, 1.0, table);
        ball.vel = Vec2::new(0.0, 4.0);

        // Scripted uniform returns the midpoint: zero jitter
        let mut rng = ScriptedRandom::new([]);
        step_ball(&mut ball, &board, &physics, &mut rng);

        assert_eq!(ball.phase, BallPhase::Colliding);
        // Resting tangent above the pin
        assert!((ball.pos - Vec2::new(300.0, 91.0)).length() < 1e-4);
        // Thrown straight back up at half speed
        assert!((ball.vel - Vec2::new(0.0, -2.0)).length() < 1e-4);
    }

    #[test]
    fn test_wall_bounce_inverts_and_clamps() {
        let board = PlinkoBoard {
            pins: Vec::new(),
            ..PlinkoBoard::new(8, 600.0, 600.0, 3.0)
        };
        let physics = PlinkoPhysics {
            gravity: 0.0,
            friction: 1.0,
            bounce: 0.6,
        };
        let table = MultiplierTable::for_risk(RiskLevel::Low);
        let mut ball = Ball::new(RoundId(1), Vec2::new(8.0, 50.0), 6.0, 1.0, table);
        ball.vel = Vec2::new(-5.0, 0.0);

        let mut rng = SeededRandom::new(3);
        step_ball(&mut ball, &board, &physics, &mut rng);
        assert_eq!(ball.pos.x, 6.0);
        assert!((ball.vel.x - 3.0).abs() < 1e-6);
        assert_eq!(ball.phase, BallPhase::Colliding);
    }

    #[test]
    fn test_balls_are_independent() {
        let mut sim = PlinkoSim::new(&PlinkoTuning::default());
        sim.drop_ball(RoundId(1), 10.0, RiskLevel::Low);
        sim.drop_ball(RoundId(2), 20.0, RiskLevel::High);
        assert_eq!(sim.positions().len(), 2);

        let mut rng = SeededRandom::new(11);
        let landings = run_until_landed(&mut sim, &mut rng);
        assert_eq!(landings.len(), 2);
        for landing in &landings {
            let table = if landing.ball_id == RoundId(1) {
                MultiplierTable::for_risk(RiskLevel::Low)
            } else {
                MultiplierTable::for_risk(RiskLevel::High)
            };
            assert!(landing.bucket < table.len());
            assert_eq!(landing.multiplier, table.get(landing.bucket));
            assert!((landing.payout - landing.bet * landing.multiplier).abs() < 1e-9);
        }
    }

    #[test]
    fn test_center_drop_distribution_is_symmetric() {
        let mut sim = PlinkoSim::new(&PlinkoTuning::default());
        let mut rng = SeededRandom::new(0x5EED);
        let drops = 1_000u64;
        for id in 0..drops {
            sim.drop_ball(RoundId(id), 1.0, RiskLevel::Medium);
        }
        let landings = run_until_landed(&mut sim, &mut rng);
        assert_eq!(landings.len() as u64, drops);

        let left = landings.iter().filter(|l| l.bucket < 4).count() as f64;
        let share = left / drops as f64;
        assert!((0.42..=0.58).contains(&share), "left share {share}");

        // Outer pair vs outer pair should also roughly balance
        let edge_left = landings.iter().filter(|l| l.bucket <= 1).count() as i64;
        let edge_right = landings.iter().filter(|l| l.bucket >= 6).count() as i64;
        assert!((edge_left - edge_right).abs() < 100, "{edge_left} vs {edge_right}");
    }
}
