use serde::{Deserialize, Serialize};

/// Weights applied to the three flocking rules.
///
/// They are expected to sum to roughly 1.0 so a flocking boid never receives
/// more than `max_force` of combined steering per tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockWeights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
}

impl Default for FlockWeights {
    fn default() -> Self {
        Self {
            separation: 0.3,
            alignment: 0.4,
            cohesion: 0.3,
        }
    }
}

impl FlockWeights {
    pub fn total(&self) -> f32 {
        self.separation + self.alignment + self.cohesion
    }
}
