use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetState {
    Walking,
    Sitting,
}

impl PetState {
    pub fn other(self) -> Self {
        match self {
            PetState::Walking => PetState::Sitting,
            PetState::Sitting => PetState::Walking,
        }
    }
}

/// Horizontal motion of the pet. Only touched while walking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub position: f64,
    pub target: f64,
    pub velocity: f64,
    pub facing_right: bool,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            velocity: 0.0,
            facing_right: true,
        }
    }
}
