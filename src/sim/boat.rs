//! Boat kinematics
//!
//! No physics: pressed controls move the boat along its heading and turn it at
//! fixed rates. The coin field only ever reads `position`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Steering controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl Control {
    /// WASD mapping
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" => Some(Control::Forward),
            "s" => Some(Control::Backward),
            "a" => Some(Control::TurnLeft),
            "d" => Some(Control::TurnRight),
            _ => None,
        }
    }
}

/// Currently held controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl Controls {
    fn slot(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Forward => &mut self.forward,
            Control::Backward => &mut self.backward,
            Control::TurnLeft => &mut self.turn_left,
            Control::TurnRight => &mut self.turn_right,
        }
    }
}

/// Player boat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoatState {
    pub position: Vec3,
    /// Yaw (radians); zero faces +z
    pub heading: f32,
    pub controls: Controls,
    speed: f32,
    turn_speed: f32,
}

impl BoatState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: Vec3::ZERO,
            heading: 0.0,
            controls: Controls::default(),
            speed: tuning.boat_speed,
            turn_speed: tuning.turn_speed,
        }
    }

    pub fn set_control(&mut self, control: Control, pressed: bool) {
        *self.controls.slot(control) = pressed;
    }

    /// Back to the origin facing +z, controls released
    pub fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.heading = 0.0;
        self.controls = Controls::default();
    }

    /// Unit vector the bow points along
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// Integrate one frame. Movement uses the heading from before this frame's turn.
    pub fn step(&mut self, dt: f32) {
        let dir = self.forward();
        if self.controls.forward {
            self.position += dir * self.speed * dt;
        }
        if self.controls.backward {
            self.position -= dir * self.speed * dt;
        }
        if self.controls.turn_left {
            self.heading += self.turn_speed * dt;
        }
        if self.controls.turn_right {
            self.heading -= self.turn_speed * dt;
        }
        self.heading = crate::normalize_angle(self.heading);
    }
}
