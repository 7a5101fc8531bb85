//! Physically based material
//!
//! A [`PbrMaterial`] is plain data: albedo (colour or texture), optional normal
//! map, microsurface, reflectivity, the program variant it renders with and
//! the environment map that variant needs. Setters reject out-of-range values
//! and leave the material untouched when they fail. Nothing here talks to the
//! GPU; uniforms are pushed by [`crate::render::binding::RenderableBinding`].

use serde::{Deserialize, Serialize};

use super::texture_registry::TextureHandle;
use crate::foundation::math::{utils, Vec3};

/// Closed set of precompiled shading programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramVariant {
    /// Image-based lighting from the environment panorama
    #[serde(rename = "WithEnvMap")]
    WithEnvironmentMap,
    /// Analytic lighting only
    #[serde(rename = "WithoutEnvMap")]
    WithoutEnvironmentMap,
}

impl ProgramVariant {
    /// Every variant, in display order
    pub const ALL: [Self; 2] = [Self::WithoutEnvironmentMap, Self::WithEnvironmentMap];

    /// Display name used by the property surface
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WithEnvironmentMap => "WithEnvMap",
            Self::WithoutEnvironmentMap => "WithoutEnvMap",
        }
    }

    /// Parse a display name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.name() == name)
    }

    /// Whether programs of this variant sample the environment map
    #[must_use]
    pub const fn requires_environment_map(self) -> bool {
        matches!(self, Self::WithEnvironmentMap)
    }
}

/// Material errors, raised at the call that would introduce invalid state
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaterialError {
    /// A scalar or colour channel lies outside [0, 1]
    #[error("Invalid value {value} for {parameter}: expected a value in [0, 1]")]
    InvalidParameter {
        /// Parameter name
        parameter: &'static str,
        /// Rejected value
        value: f32,
    },

    /// A resource required by the current configuration is not set
    #[error("Missing resource: {0}")]
    MissingResource(&'static str),

    /// No preset with this name exists
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// The program for this variant never compiled
    #[error("Program unavailable for variant {}", .0.name())]
    ProgramUnavailable(ProgramVariant),

    /// `bind` was called while a previous bind was not released
    #[error("Binding is already bound; release it before binding again")]
    AlreadyBound,
}

/// Whether the albedo comes from the colour or from a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbedoMode {
    /// Constant colour
    Color,
    /// Albedo texture
    Texture,
}

/// Resolved albedo input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Albedo {
    /// Constant colour
    Color(Vec3),
    /// Albedo texture
    Texture(TextureHandle),
}

/// Live, mutable PBR material
#[derive(Debug, Clone, PartialEq)]
pub struct PbrMaterial {
    albedo_mode: AlbedoMode,
    albedo_color: Vec3,
    albedo_texture: Option<TextureHandle>,
    normal_map: Option<TextureHandle>,
    microsurface: f32,
    reflectivity: Vec3,
    program_variant: ProgramVariant,
    environment_map: Option<TextureHandle>,
}

impl Default for PbrMaterial {
    fn default() -> Self {
        Self {
            albedo_mode: AlbedoMode::Color,
            albedo_color: Vec3::new(0.8, 0.8, 0.8),
            albedo_texture: None,
            normal_map: None,
            microsurface: 0.5,
            reflectivity: Vec3::new(0.04, 0.04, 0.04),
            program_variant: ProgramVariant::WithoutEnvironmentMap,
            environment_map: None,
        }
    }
}

fn check_unit(parameter: &'static str, value: f32) -> Result<(), MaterialError> {
    if utils::in_unit_range(value) {
        Ok(())
    } else {
        Err(MaterialError::InvalidParameter { parameter, value })
    }
}

fn check_unit_rgb(parameters: [&'static str; 3], rgb: Vec3) -> Result<(), MaterialError> {
    for (parameter, value) in parameters.into_iter().zip(rgb.iter().copied()) {
        check_unit(parameter, value)?;
    }
    Ok(())
}

impl PbrMaterial {
    /// Create a material with default parameters (grey, no textures, no environment)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        albedo: Albedo,
        normal_map: Option<TextureHandle>,
        microsurface: f32,
        reflectivity: Vec3,
        program_variant: ProgramVariant,
        environment_map: Option<TextureHandle>,
    ) -> Self {
        let mut material = Self {
            normal_map,
            microsurface,
            reflectivity,
            program_variant,
            environment_map,
            ..Self::default()
        };
        match albedo {
            Albedo::Color(color) => material.albedo_color = color,
            Albedo::Texture(texture) => {
                material.albedo_mode = AlbedoMode::Texture;
                material.albedo_texture = Some(texture);
            }
        }
        material
    }

    /// Current albedo mode
    #[must_use]
    pub const fn albedo_mode(&self) -> AlbedoMode {
        self.albedo_mode
    }

    /// Albedo input in effect
    #[must_use]
    pub fn albedo(&self) -> Albedo {
        match (self.albedo_mode, self.albedo_texture) {
            (AlbedoMode::Texture, Some(texture)) => Albedo::Texture(texture),
            _ => Albedo::Color(self.albedo_color),
        }
    }

    /// Albedo colour, kept even while a texture is in use
    #[must_use]
    pub const fn albedo_color(&self) -> Vec3 {
        self.albedo_color
    }

    /// Last albedo texture, kept even while the colour is in use
    #[must_use]
    pub const fn albedo_texture(&self) -> Option<TextureHandle> {
        self.albedo_texture
    }

    /// Overwrite the albedo colour and switch to colour mode.
    ///
    /// The albedo texture handle is kept but unused until
    /// [`Self::set_albedo_texture`] is called again.
    pub fn set_albedo_color(&mut self, color: Vec3) -> Result<(), MaterialError> {
        check_unit_rgb(["albedoColorR", "albedoColorG", "albedoColorB"], color)?;
        self.albedo_color = color;
        self.albedo_mode = AlbedoMode::Color;
        Ok(())
    }

    /// Switch back to the stored albedo colour
    pub fn use_albedo_color(&mut self) {
        self.albedo_mode = AlbedoMode::Color;
    }

    /// Sample albedo from `texture`
    pub fn set_albedo_texture(&mut self, texture: TextureHandle) {
        self.albedo_texture = Some(texture);
        self.albedo_mode = AlbedoMode::Texture;
    }

    /// Normal map; `None` means a flat normal
    #[must_use]
    pub const fn normal_map(&self) -> Option<TextureHandle> {
        self.normal_map
    }

    /// Set or clear the normal map
    pub fn set_normal_map(&mut self, normal_map: Option<TextureHandle>) {
        self.normal_map = normal_map;
    }

    /// Roughness-like scalar in [0, 1]
    #[must_use]
    pub const fn microsurface(&self) -> f32 {
        self.microsurface
    }

    /// Set the microsurface; values outside [0, 1] are rejected
    pub fn set_microsurface(&mut self, microsurface: f32) -> Result<(), MaterialError> {
        check_unit("microsurface", microsurface)?;
        self.microsurface = microsurface;
        Ok(())
    }

    /// Specular reflectivity per channel
    #[must_use]
    pub const fn reflectivity(&self) -> Vec3 {
        self.reflectivity
    }

    /// Set the reflectivity; every channel must lie in [0, 1]
    pub fn set_reflectivity(&mut self, reflectivity: Vec3) -> Result<(), MaterialError> {
        check_unit_rgb(["reflectivityR", "reflectivityG", "reflectivityB"], reflectivity)?;
        self.reflectivity = reflectivity;
        Ok(())
    }

    /// Environment panorama
    #[must_use]
    pub const fn environment_map(&self) -> Option<TextureHandle> {
        self.environment_map
    }

    /// Set the environment panorama
    pub fn set_environment_map(&mut self, environment_map: TextureHandle) {
        self.environment_map = Some(environment_map);
    }

    /// Remove the environment panorama.
    ///
    /// A material left on [`ProgramVariant::WithEnvironmentMap`] without one
    /// fails at bind time with [`MaterialError::MissingResource`].
    pub fn clear_environment_map(&mut self) -> Option<TextureHandle> {
        self.environment_map.take()
    }

    /// Program variant this material renders with
    #[must_use]
    pub const fn program_variant(&self) -> ProgramVariant {
        self.program_variant
    }

    /// Select the program variant
    pub fn set_program_variant(&mut self, variant: ProgramVariant) -> Result<(), MaterialError> {
        if variant.requires_environment_map() && self.environment_map.is_none() {
            return Err(MaterialError::MissingResource("environment map"));
        }
        self.program_variant = variant;
        Ok(())
    }

    /// Copy every parameter and handle of `other`.
    ///
    /// Handles are copied by value and keep referring to the same textures.
    pub fn copy_settings_from(&mut self, other: &Self) {
        self.albedo_mode = other.albedo_mode;
        self.albedo_color = other.albedo_color;
        self.albedo_texture = other.albedo_texture;
        self.normal_map = other.normal_map;
        self.microsurface = other.microsurface;
        self.reflectivity = other.reflectivity;
        self.program_variant = other.program_variant;
        self.environment_map = other.environment_map;
    }

    /// Check that everything the selected variant reads is present
    pub fn validate_for_binding(&self) -> Result<(), MaterialError> {
        if self.program_variant.requires_environment_map() && self.environment_map.is_none() {
            return Err(MaterialError::MissingResource("environment map"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn handles(count: usize) -> Vec<TextureHandle> {
        let mut map: SlotMap<TextureHandle, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_microsurface_accepts_unit_range() {
        let mut material = PbrMaterial::new();
        for value in [0.0, 0.25, 0.86, 1.0] {
            material.set_microsurface(value).unwrap();
            assert_relative_eq!(material.microsurface(), value);
        }
    }

    #[test]
    fn test_microsurface_rejects_out_of_range() {
        let mut material = PbrMaterial::new();
        material.set_microsurface(0.3).unwrap();

        for value in [-0.1, 1.5, f32::NAN] {
            let err = material.set_microsurface(value).unwrap_err();
            assert!(matches!(err, MaterialError::InvalidParameter { parameter: "microsurface", .. }));
            assert_relative_eq!(material.microsurface(), 0.3);
        }
    }

    #[test]
    fn test_reflectivity_rejects_without_partial_mutation() {
        let mut material = PbrMaterial::new();
        let before = material.reflectivity();

        let err = material.set_reflectivity(Vec3::new(0.5, 1.2, 0.5)).unwrap_err();
        assert_eq!(err, MaterialError::InvalidParameter { parameter: "reflectivityG", value: 1.2 });
        assert_eq!(material.reflectivity(), before);
    }

    #[test]
    fn test_albedo_color_keeps_texture_handle() {
        let textures = handles(1);
        let mut material = PbrMaterial::new();

        material.set_albedo_texture(textures[0]);
        assert_eq!(material.albedo(), Albedo::Texture(textures[0]));

        material.set_albedo_color(Vec3::new(0.1, 0.2, 0.3)).unwrap();
        assert_eq!(material.albedo_mode(), AlbedoMode::Color);
        assert_eq!(material.albedo(), Albedo::Color(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(material.albedo_texture(), Some(textures[0]));
    }

    #[test]
    fn test_environment_variant_requires_environment_map() {
        let textures = handles(1);
        let mut material = PbrMaterial::new();

        let err = material.set_program_variant(ProgramVariant::WithEnvironmentMap).unwrap_err();
        assert_eq!(err, MaterialError::MissingResource("environment map"));
        assert_eq!(material.program_variant(), ProgramVariant::WithoutEnvironmentMap);

        material.set_environment_map(textures[0]);
        material.set_program_variant(ProgramVariant::WithEnvironmentMap).unwrap();
        assert!(material.validate_for_binding().is_ok());

        material.clear_environment_map();
        assert_eq!(
            material.validate_for_binding(),
            Err(MaterialError::MissingResource("environment map"))
        );
    }

    #[test]
    fn test_copy_settings_shares_handles() {
        let textures = handles(3);
        let mut source = PbrMaterial::new();
        source.set_albedo_texture(textures[0]);
        source.set_normal_map(Some(textures[1]));
        source.set_environment_map(textures[2]);
        source.set_program_variant(ProgramVariant::WithEnvironmentMap).unwrap();
        source.set_microsurface(0.7).unwrap();

        let mut copy = PbrMaterial::new();
        copy.copy_settings_from(&source);
        assert_eq!(copy, source);

        copy.set_microsurface(0.1).unwrap();
        assert_relative_eq!(source.microsurface(), 0.7);
        assert_eq!(copy.normal_map(), source.normal_map());
    }

    #[test]
    fn test_variant_names() {
        for variant in ProgramVariant::ALL {
            assert_eq!(ProgramVariant::from_name(variant.name()), Some(variant));
        }
        assert_eq!(ProgramVariant::from_name("Raytraced"), None);
    }
}
