//! Math utilities and types
//!
//! Provides the math types used for colours, transforms and camera matrices.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type, also used for RGB colours
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math utility functions
pub mod utils {
    use super::Vec3;

    /// Convert degrees to radians
    #[must_use]
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Build a vector from a plain `[x, y, z]` array (config files store arrays)
    #[must_use]
    pub fn vec3_from_array(values: [f32; 3]) -> Vec3 {
        Vec3::new(values[0], values[1], values[2])
    }

    /// Whether `value` lies inside the closed unit interval
    #[must_use]
    pub fn in_unit_range(value: f32) -> bool {
        (0.0..=1.0).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;

    #[test]
    fn test_unit_range() {
        assert!(in_unit_range(0.0));
        assert!(in_unit_range(1.0));
        assert!(in_unit_range(0.42));
        assert!(!in_unit_range(-0.01));
        assert!(!in_unit_range(1.01));
        assert!(!in_unit_range(f32::NAN));
    }
}
