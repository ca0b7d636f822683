use serde::{Deserialize, Serialize};

/// Food spawner parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Maximum simultaneously live food sources (default: 5)
    pub max_food_count: usize,
    /// Half extents (x, z) of the spawn rectangle (default: 20 x 20)
    pub spawn_area: [f32; 2],
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            max_food_count: 5,
            spawn_area: [20.0, 20.0],
        }
    }
}
