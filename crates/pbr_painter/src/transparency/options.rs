//! # Stochastic Transparency Options
//!
//! Settings holder read by the stochastic transparency passes. Changing the
//! sample count invalidates the host's sampling pattern, so the options keep a
//! dirty flag that the pattern regenerator consumes exactly once.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Alpha correction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StochasticTransparencyOptimization {
    /// Correct total alpha only
    AlphaCorrection,
    /// Correct total alpha and weight by depth
    #[default]
    AlphaCorrectionAndDepthBased,
}

/// Stochastic transparency settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticTransparencyOptions {
    transparency: u8,
    optimization: StochasticTransparencyOptimization,
    back_face_culling: bool,
    num_samples: u16,
    #[serde(skip)]
    num_samples_changed: bool,
}

impl Default for StochasticTransparencyOptions {
    fn default() -> Self {
        Self {
            transparency: 128,
            optimization: StochasticTransparencyOptimization::default(),
            back_face_culling: true,
            num_samples: 8,
            num_samples_changed: false,
        }
    }
}

impl StochasticTransparencyOptions {
    /// Create options with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transparency level, 0 (opaque) to 255
    #[must_use]
    pub const fn transparency(&self) -> u8 {
        self.transparency
    }

    /// Set the transparency level
    pub fn set_transparency(&mut self, transparency: u8) {
        self.transparency = transparency;
    }

    /// Transparency level as a coverage probability in [0, 1]
    #[must_use]
    pub fn coverage(&self) -> f32 {
        f32::from(self.transparency) / f32::from(u8::MAX)
    }

    /// Alpha correction strategy
    #[must_use]
    pub const fn optimization(&self) -> StochasticTransparencyOptimization {
        self.optimization
    }

    /// Set the alpha correction strategy
    pub fn set_optimization(&mut self, optimization: StochasticTransparencyOptimization) {
        self.optimization = optimization;
    }

    /// Whether back faces are culled
    #[must_use]
    pub const fn back_face_culling(&self) -> bool {
        self.back_face_culling
    }

    /// Enable or disable back-face culling
    pub fn set_back_face_culling(&mut self, enabled: bool) {
        self.back_face_culling = enabled;
    }

    /// Samples per pixel
    #[must_use]
    pub const fn num_samples(&self) -> u16 {
        self.num_samples
    }

    /// Set the samples per pixel; only a different value marks the count changed
    pub fn set_num_samples(&mut self, num_samples: u16) {
        if num_samples != self.num_samples {
            log::debug!("Stochastic transparency samples: {} -> {}", self.num_samples, num_samples);
            self.num_samples = num_samples;
            self.num_samples_changed = true;
        }
    }

    /// Whether the sample count changed since the flag was last consumed
    #[must_use]
    pub const fn num_samples_changed(&self) -> bool {
        self.num_samples_changed
    }

    /// Return and clear the sample-count flag
    pub fn take_num_samples_changed(&mut self) -> bool {
        std::mem::take(&mut self.num_samples_changed)
    }
}

impl Config for StochasticTransparencyOptions {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let options = StochasticTransparencyOptions::new();
        assert_eq!(options.transparency(), 128);
        assert_eq!(
            options.optimization(),
            StochasticTransparencyOptimization::AlphaCorrectionAndDepthBased
        );
        assert!(options.back_face_culling());
        assert_eq!(options.num_samples(), 8);
        assert!(!options.num_samples_changed());
    }

    #[test]
    fn test_sample_flag_consumed_once() {
        let mut options = StochasticTransparencyOptions::new();

        options.set_num_samples(8);
        assert!(!options.take_num_samples_changed());

        options.set_num_samples(16);
        options.set_num_samples(32);
        assert!(options.take_num_samples_changed());
        assert!(!options.take_num_samples_changed());
        assert_eq!(options.num_samples(), 32);
    }

    #[test]
    fn test_coverage() {
        let mut options = StochasticTransparencyOptions::new();
        options.set_transparency(0);
        assert_relative_eq!(options.coverage(), 0.0);
        options.set_transparency(255);
        assert_relative_eq!(options.coverage(), 1.0);
        options.set_transparency(128);
        assert_relative_eq!(options.coverage(), 128.0 / 255.0);
    }

    #[test]
    fn test_ron_round_trip_drops_flag() {
        let mut options = StochasticTransparencyOptions::new();
        options.set_num_samples(4);
        options.set_optimization(StochasticTransparencyOptimization::AlphaCorrection);

        let text = ron::to_string(&options).unwrap();
        let restored: StochasticTransparencyOptions = ron::from_str(&text).unwrap();
        assert_eq!(restored.num_samples(), 4);
        assert_eq!(restored.optimization(), StochasticTransparencyOptimization::AlphaCorrection);
        assert!(!restored.num_samples_changed());
    }

    #[test]
    fn test_partial_toml() {
        let options: StochasticTransparencyOptions = toml::from_str("transparency = 64").unwrap();
        assert_eq!(options.transparency(), 64);
        assert_eq!(options.num_samples(), 8);
    }
}
