//! Active preset and live material
//!
//! The host owns an [`ActiveSelection`] and passes it to the painter each
//! frame. Switching to a catalog preset replaces the live material wholesale;
//! switching to [`Preset::Manual`] copies the material that was visible at the
//! moment of the switch so editing continues from it.

use crate::foundation::math::Vec3;
use crate::render::material::{
    AlbedoPreset, MaterialError, MaterialPresetCatalog, NormalMapPreset, PbrMaterial, Preset,
    PresetTextures,
};

/// RGB channel index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red
    R = 0,
    /// Green
    G = 1,
    /// Blue
    B = 2,
}

/// Currently selected preset plus the material being drawn
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSelection {
    preset: Preset,
    material: PbrMaterial,
    albedo_preset: AlbedoPreset,
    normal_map_preset: NormalMapPreset,
}

impl ActiveSelection {
    /// Start on `preset`.
    ///
    /// Starting on manual uses the default material, with the catalog's shared
    /// environment map attached when there is one.
    pub fn new(catalog: &MaterialPresetCatalog, preset: Preset) -> Result<Self, MaterialError> {
        let mut material = PbrMaterial::new();
        if let Some(textures) = catalog.textures() {
            material.set_environment_map(textures.environment);
        }

        let mut selection = Self {
            preset: Preset::Manual,
            material,
            albedo_preset: AlbedoPreset::Color,
            normal_map_preset: NormalMapPreset::None,
        };
        if preset != Preset::Manual {
            selection.set_preset(catalog, preset)?;
        }
        Ok(selection)
    }

    /// Selected preset
    #[must_use]
    pub const fn preset(&self) -> Preset {
        self.preset
    }

    /// Material drawn this frame
    #[must_use]
    pub const fn material(&self) -> &PbrMaterial {
        &self.material
    }

    /// Mutable access to the live material
    pub fn material_mut(&mut self) -> &mut PbrMaterial {
        &mut self.material
    }

    /// Albedo sub-preset shown by the manual settings
    #[must_use]
    pub const fn albedo_preset(&self) -> AlbedoPreset {
        self.albedo_preset
    }

    /// Normal-map sub-preset shown by the manual settings
    #[must_use]
    pub const fn normal_map_preset(&self) -> NormalMapPreset {
        self.normal_map_preset
    }

    /// Switch preset.
    ///
    /// Catalog presets replace the material and discard any edits. Manual
    /// copies the current material. On failure nothing changes.
    pub fn set_preset(
        &mut self,
        catalog: &MaterialPresetCatalog,
        preset: Preset,
    ) -> Result<(), MaterialError> {
        let material = match preset {
            Preset::Manual => {
                let mut manual = PbrMaterial::new();
                manual.copy_settings_from(&self.material);
                manual
            }
            _ => catalog.materialize(preset.name())?,
        };

        log::info!("Preset switched: {} -> {}", self.preset, preset);
        self.preset = preset;
        self.material = material;
        self.sync_sub_presets(catalog.textures());
        Ok(())
    }

    /// Switch albedo between the colour and one of the shared textures
    pub fn set_albedo_preset(
        &mut self,
        catalog: &MaterialPresetCatalog,
        preset: AlbedoPreset,
    ) -> Result<(), MaterialError> {
        match preset {
            AlbedoPreset::Color => self.material.use_albedo_color(),
            _ => {
                let texture = catalog
                    .textures()
                    .and_then(|textures| textures.albedo(preset))
                    .ok_or(MaterialError::MissingResource("albedo texture"))?;
                self.material.set_albedo_texture(texture);
            }
        }
        self.albedo_preset = preset;
        Ok(())
    }

    /// Select one of the shared normal maps, or none
    pub fn set_normal_map_preset(
        &mut self,
        catalog: &MaterialPresetCatalog,
        preset: NormalMapPreset,
    ) -> Result<(), MaterialError> {
        let normal_map = match preset {
            NormalMapPreset::None => None,
            _ => Some(
                catalog
                    .textures()
                    .and_then(|textures| textures.normal_map(preset))
                    .ok_or(MaterialError::MissingResource("normal map"))?,
            ),
        };
        self.material.set_normal_map(normal_map);
        self.normal_map_preset = preset;
        Ok(())
    }

    /// Overwrite one albedo colour channel
    pub fn set_albedo_channel(&mut self, channel: Channel, value: f32) -> Result<(), MaterialError> {
        let mut color = self.material.albedo_color();
        color[channel as usize] = value;
        self.material.set_albedo_color(color)?;
        self.albedo_preset = AlbedoPreset::Color;
        Ok(())
    }

    /// Overwrite one reflectivity channel
    pub fn set_reflectivity_channel(&mut self, channel: Channel, value: f32) -> Result<(), MaterialError> {
        let mut reflectivity: Vec3 = self.material.reflectivity();
        reflectivity[channel as usize] = value;
        self.material.set_reflectivity(reflectivity)
    }

    fn sync_sub_presets(&mut self, textures: Option<&PresetTextures>) {
        if let Some(textures) = textures {
            self.albedo_preset = textures.albedo_preset_of(&self.material);
            self.normal_map_preset = textures.normal_map_preset_of(&self.material);
        } else {
            self.albedo_preset = AlbedoPreset::Color;
            self.normal_map_preset = NormalMapPreset::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::material::preset::tests::test_textures;
    use crate::render::material::{Albedo, ProgramVariant};
    use approx::assert_relative_eq;

    fn catalog() -> MaterialPresetCatalog {
        MaterialPresetCatalog::standard(&test_textures())
    }

    #[test]
    fn test_manual_continues_from_gold() {
        let catalog = catalog();
        let mut selection = ActiveSelection::new(&catalog, Preset::Gold).unwrap();
        let gold = selection.material().clone();

        selection.set_preset(&catalog, Preset::Manual).unwrap();
        assert_eq!(selection.preset(), Preset::Manual);
        assert_eq!(selection.material(), &gold);
        assert_eq!(selection.albedo_preset(), AlbedoPreset::Color);
        assert_eq!(selection.normal_map_preset(), NormalMapPreset::Metal);
    }

    #[test]
    fn test_manual_continuity_includes_live_edits() {
        let catalog = catalog();
        let mut selection = ActiveSelection::new(&catalog, Preset::Plastic).unwrap();
        selection.material_mut().set_microsurface(0.12).unwrap();

        selection.set_preset(&catalog, Preset::Manual).unwrap();
        assert_relative_eq!(selection.material().microsurface(), 0.12);
        assert_eq!(selection.albedo_preset(), AlbedoPreset::Plastic);
    }

    #[test]
    fn test_catalog_preset_discards_edits() {
        let catalog = catalog();
        let mut selection = ActiveSelection::new(&catalog, Preset::Gold).unwrap();
        selection.material_mut().set_microsurface(0.1).unwrap();

        selection.set_preset(&catalog, Preset::Stone).unwrap();
        selection.set_preset(&catalog, Preset::Gold).unwrap();
        assert_relative_eq!(selection.material().microsurface(), 0.86);
    }

    #[test]
    fn test_failed_switch_changes_nothing() {
        let catalog = MaterialPresetCatalog::new();
        let mut selection = ActiveSelection::new(&catalog, Preset::Manual).unwrap();
        let before = selection.clone();

        assert_eq!(
            selection.set_preset(&catalog, Preset::Tiles),
            Err(MaterialError::UnknownPreset("tiles".to_string()))
        );
        assert_eq!(selection, before);
    }

    #[test]
    fn test_sub_presets() {
        let textures = test_textures();
        let catalog = MaterialPresetCatalog::standard(&textures);
        let mut selection = ActiveSelection::new(&catalog, Preset::Manual).unwrap();

        selection.set_albedo_preset(&catalog, AlbedoPreset::Tiles).unwrap();
        assert_eq!(selection.material().albedo(), Albedo::Texture(textures.albedo_tiles));

        selection.set_albedo_preset(&catalog, AlbedoPreset::Color).unwrap();
        assert!(matches!(selection.material().albedo(), Albedo::Color(_)));

        selection.set_normal_map_preset(&catalog, NormalMapPreset::Stone).unwrap();
        assert_eq!(selection.material().normal_map(), Some(textures.normal_stone));
        selection.set_normal_map_preset(&catalog, NormalMapPreset::None).unwrap();
        assert_eq!(selection.material().normal_map(), None);
    }

    #[test]
    fn test_manual_start_can_use_environment_variant() {
        let catalog = catalog();
        let mut selection = ActiveSelection::new(&catalog, Preset::Manual).unwrap();
        selection
            .material_mut()
            .set_program_variant(ProgramVariant::WithEnvironmentMap)
            .unwrap();
    }

    #[test]
    fn test_channel_setters() {
        let catalog = catalog();
        let mut selection = ActiveSelection::new(&catalog, Preset::Stone).unwrap();
        selection.set_preset(&catalog, Preset::Manual).unwrap();

        selection.set_reflectivity_channel(Channel::G, 0.9).unwrap();
        assert_relative_eq!(selection.material().reflectivity().y, 0.9);

        assert!(selection.set_reflectivity_channel(Channel::B, -1.0).is_err());
        assert_relative_eq!(selection.material().reflectivity().z, 0.25);

        selection.set_albedo_channel(Channel::R, 0.3).unwrap();
        assert_eq!(selection.albedo_preset(), AlbedoPreset::Color);
        assert_relative_eq!(selection.material().albedo_color().x, 0.3);
    }
}
