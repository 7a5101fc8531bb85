//! Material presets
//!
//! Presets are immutable definitions built once at initialization. A
//! [`MaterialPresetCatalog`] turns a preset name into a fresh [`PbrMaterial`]
//! by value; materials never alias their preset, and textures are shared
//! through handles rather than reloaded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::material::{Albedo, MaterialError, PbrMaterial, ProgramVariant};
use super::texture_registry::TextureHandle;
use crate::foundation::math::{utils, Vec3};

/// Top-level preset selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Free editing, continuing from the last visible material
    Manual,
    /// Polished gold
    Gold,
    /// Textured plastic
    Plastic,
    /// Textured stone, no environment lighting
    Stone,
    /// Plain tiles
    Tiles,
}

impl Preset {
    /// Every preset, in display order
    pub const ALL: [Self; 5] = [Self::Manual, Self::Gold, Self::Plastic, Self::Stone, Self::Tiles];

    /// Preset name, also the catalog key for non-manual presets
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Gold => "gold",
            Self::Plastic => "plastic",
            Self::Stone => "stone",
            Self::Tiles => "tiles",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| MaterialError::UnknownPreset(s.to_string()))
    }
}

/// Albedo sub-preset used while editing manually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbedoPreset {
    /// The material's albedo colour
    Color,
    /// Scratched metal texture
    Metal,
    /// Plastic texture
    Plastic,
    /// Stone texture
    Stone,
    /// Tiles texture
    Tiles,
}

impl AlbedoPreset {
    /// Every albedo preset, in display order
    pub const ALL: [Self; 5] = [Self::Color, Self::Metal, Self::Plastic, Self::Stone, Self::Tiles];

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Metal => "metal",
            Self::Plastic => "plastic",
            Self::Stone => "stone",
            Self::Tiles => "tiles",
        }
    }

    /// Parse a display name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }
}

/// Normal-map sub-preset used while editing manually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalMapPreset {
    /// Flat normal
    None,
    /// Scratched metal
    Metal,
    /// Plastic
    Plastic,
    /// Stone
    Stone,
    /// Tiles
    Tiles,
}

impl NormalMapPreset {
    /// Every normal-map preset, in display order
    pub const ALL: [Self; 5] = [Self::None, Self::Metal, Self::Plastic, Self::Stone, Self::Tiles];

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Metal => "metal",
            Self::Plastic => "plastic",
            Self::Stone => "stone",
            Self::Tiles => "tiles",
        }
    }

    /// Parse a display name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name)
    }
}

/// Shared textures referenced by presets and sub-presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetTextures {
    /// Scratched metal albedo
    pub albedo_metal: TextureHandle,
    /// Plastic albedo
    pub albedo_plastic: TextureHandle,
    /// Stone albedo
    pub albedo_stone: TextureHandle,
    /// Tiles albedo
    pub albedo_tiles: TextureHandle,
    /// Scratched metal normal map
    pub normal_metal: TextureHandle,
    /// Plastic normal map
    pub normal_plastic: TextureHandle,
    /// Stone normal map
    pub normal_stone: TextureHandle,
    /// Tiles normal map
    pub normal_tiles: TextureHandle,
    /// Environment panorama
    pub environment: TextureHandle,
}

impl PresetTextures {
    /// Albedo texture of a sub-preset; `None` for [`AlbedoPreset::Color`]
    #[must_use]
    pub const fn albedo(&self, preset: AlbedoPreset) -> Option<TextureHandle> {
        match preset {
            AlbedoPreset::Color => None,
            AlbedoPreset::Metal => Some(self.albedo_metal),
            AlbedoPreset::Plastic => Some(self.albedo_plastic),
            AlbedoPreset::Stone => Some(self.albedo_stone),
            AlbedoPreset::Tiles => Some(self.albedo_tiles),
        }
    }

    /// Normal map of a sub-preset; `None` for [`NormalMapPreset::None`]
    #[must_use]
    pub const fn normal_map(&self, preset: NormalMapPreset) -> Option<TextureHandle> {
        match preset {
            NormalMapPreset::None => None,
            NormalMapPreset::Metal => Some(self.normal_metal),
            NormalMapPreset::Plastic => Some(self.normal_plastic),
            NormalMapPreset::Stone => Some(self.normal_stone),
            NormalMapPreset::Tiles => Some(self.normal_tiles),
        }
    }

    /// Sub-preset matching the albedo currently used by `material`.
    ///
    /// Textures outside this set are reported as [`AlbedoPreset::Color`].
    #[must_use]
    pub fn albedo_preset_of(&self, material: &PbrMaterial) -> AlbedoPreset {
        match material.albedo() {
            Albedo::Color(_) => AlbedoPreset::Color,
            Albedo::Texture(texture) => AlbedoPreset::ALL
                .into_iter()
                .find(|preset| self.albedo(*preset) == Some(texture))
                .unwrap_or(AlbedoPreset::Color),
        }
    }

    /// Sub-preset matching the normal map of `material`
    #[must_use]
    pub fn normal_map_preset_of(&self, material: &PbrMaterial) -> NormalMapPreset {
        NormalMapPreset::ALL
            .into_iter()
            .find(|preset| self.normal_map(*preset) == material.normal_map())
            .unwrap_or(NormalMapPreset::None)
    }
}

/// Immutable preset definition
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDefinition {
    /// Catalog key
    pub name: String,
    /// Program variant
    pub program_variant: ProgramVariant,
    /// Environment panorama
    pub environment_map: Option<TextureHandle>,
    /// Normal map
    pub normal_map: Option<TextureHandle>,
    /// Albedo colour or texture
    pub albedo: Albedo,
    /// Microsurface in [0, 1]
    pub microsurface: f32,
    /// Reflectivity, every channel in [0, 1]
    pub reflectivity: Vec3,
}

impl PresetDefinition {
    /// Build a fresh material carrying this definition's values
    #[must_use]
    pub fn to_material(&self) -> PbrMaterial {
        PbrMaterial::from_parts(
            self.albedo,
            self.normal_map,
            self.microsurface,
            self.reflectivity,
            self.program_variant,
            self.environment_map,
        )
    }

    /// Check ranges and resource requirements
    pub fn validate(&self) -> Result<(), MaterialError> {
        if !utils::in_unit_range(self.microsurface) {
            return Err(MaterialError::InvalidParameter {
                parameter: "microsurface",
                value: self.microsurface,
            });
        }
        if let Some(value) = self.reflectivity.iter().copied().find(|v| !utils::in_unit_range(*v)) {
            return Err(MaterialError::InvalidParameter { parameter: "reflectivity", value });
        }
        if let Albedo::Color(color) = self.albedo {
            if let Some(value) = color.iter().copied().find(|v| !utils::in_unit_range(*v)) {
                return Err(MaterialError::InvalidParameter { parameter: "albedoColor", value });
            }
        }
        if self.program_variant.requires_environment_map() && self.environment_map.is_none() {
            return Err(MaterialError::MissingResource("environment map"));
        }
        Ok(())
    }
}

/// Named, immutable preset definitions
#[derive(Debug, Clone, Default)]
pub struct MaterialPresetCatalog {
    presets: Vec<PresetDefinition>,
    textures: Option<PresetTextures>,
}

impl MaterialPresetCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in gold, plastic, stone and tiles presets over `textures`
    #[must_use]
    pub fn standard(textures: &PresetTextures) -> Self {
        let env = Some(textures.environment);
        let presets = vec![
            PresetDefinition {
                name: Preset::Gold.name().to_string(),
                program_variant: ProgramVariant::WithEnvironmentMap,
                environment_map: env,
                normal_map: Some(textures.normal_metal),
                albedo: Albedo::Color(Vec3::new(0.0, 0.0, 0.0)),
                microsurface: 0.86,
                reflectivity: Vec3::new(1.0, 0.86, 0.58),
            },
            PresetDefinition {
                name: Preset::Plastic.name().to_string(),
                program_variant: ProgramVariant::WithEnvironmentMap,
                environment_map: env,
                normal_map: Some(textures.normal_plastic),
                albedo: Albedo::Texture(textures.albedo_plastic),
                microsurface: 0.46,
                reflectivity: Vec3::new(0.34, 0.41, 0.53),
            },
            PresetDefinition {
                name: Preset::Stone.name().to_string(),
                program_variant: ProgramVariant::WithoutEnvironmentMap,
                environment_map: env,
                normal_map: Some(textures.normal_stone),
                albedo: Albedo::Texture(textures.albedo_stone),
                microsurface: 0.29,
                reflectivity: Vec3::new(0.24, 0.24, 0.25),
            },
            PresetDefinition {
                name: Preset::Tiles.name().to_string(),
                program_variant: ProgramVariant::WithEnvironmentMap,
                environment_map: env,
                normal_map: Some(textures.normal_tiles),
                albedo: Albedo::Texture(textures.albedo_tiles),
                microsurface: 0.36,
                reflectivity: Vec3::new(0.47, 0.49, 0.51),
            },
        ];
        Self {
            presets,
            textures: Some(*textures),
        }
    }

    /// Shared textures used by the albedo and normal-map sub-presets
    #[must_use]
    pub const fn textures(&self) -> Option<&PresetTextures> {
        self.textures.as_ref()
    }

    /// Add a preset, replacing any preset with the same name
    pub fn insert(&mut self, definition: PresetDefinition) -> Result<(), MaterialError> {
        definition.validate()?;
        match self.presets.iter_mut().find(|p| p.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.presets.push(definition),
        }
        Ok(())
    }

    /// Look up a definition
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PresetDefinition> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Construct a fresh material from the named preset
    pub fn materialize(&self, name: &str) -> Result<PbrMaterial, MaterialError> {
        self.get(name)
            .map(PresetDefinition::to_material)
            .ok_or_else(|| MaterialError::UnknownPreset(name.to_string()))
    }

    /// Preset names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    /// Number of presets
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the catalog holds no presets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    pub(crate) fn test_textures() -> PresetTextures {
        let mut map: SlotMap<TextureHandle, ()> = SlotMap::with_key();
        PresetTextures {
            albedo_metal: map.insert(()),
            albedo_plastic: map.insert(()),
            albedo_stone: map.insert(()),
            albedo_tiles: map.insert(()),
            normal_metal: map.insert(()),
            normal_plastic: map.insert(()),
            normal_stone: map.insert(()),
            normal_tiles: map.insert(()),
            environment: map.insert(()),
        }
    }

    #[test]
    fn test_materialize_twice_is_equal_but_independent() {
        let catalog = MaterialPresetCatalog::standard(&test_textures());
        let names: Vec<String> = catalog.names().map(str::to_string).collect();
        assert_eq!(names, ["gold", "plastic", "stone", "tiles"]);

        for name in &names {
            let mut first = catalog.materialize(name).unwrap();
            let second = catalog.materialize(name).unwrap();
            assert_eq!(first, second);

            first.set_microsurface(0.01).unwrap();
            assert_ne!(first, second);
            assert_eq!(second, catalog.materialize(name).unwrap());
        }
    }

    #[test]
    fn test_unknown_preset() {
        let catalog = MaterialPresetCatalog::standard(&test_textures());
        assert_eq!(
            catalog.materialize("chrome"),
            Err(MaterialError::UnknownPreset("chrome".to_string()))
        );
        assert!(matches!("manual".parse::<Preset>(), Ok(Preset::Manual)));
        assert!(matches!("chrome".parse::<Preset>(), Err(MaterialError::UnknownPreset(_))));
    }

    #[test]
    fn test_gold_values() {
        let textures = test_textures();
        let gold = MaterialPresetCatalog::standard(&textures).materialize("gold").unwrap();

        assert_relative_eq!(gold.microsurface(), 0.86);
        assert_eq!(gold.reflectivity(), Vec3::new(1.0, 0.86, 0.58));
        assert_eq!(gold.program_variant(), ProgramVariant::WithEnvironmentMap);
        assert_eq!(gold.environment_map(), Some(textures.environment));
        assert_eq!(gold.normal_map(), Some(textures.normal_metal));
        assert_eq!(gold.albedo(), Albedo::Color(Vec3::zeros()));
    }

    #[test]
    fn test_presets_share_environment_handle() {
        let textures = test_textures();
        let catalog = MaterialPresetCatalog::standard(&textures);
        for name in catalog.names() {
            assert_eq!(catalog.materialize(name).unwrap().environment_map(), Some(textures.environment));
        }
    }

    #[test]
    fn test_insert_validates_definition() {
        let mut catalog = MaterialPresetCatalog::new();
        let mut definition = PresetDefinition {
            name: "mirror".to_string(),
            program_variant: ProgramVariant::WithEnvironmentMap,
            environment_map: None,
            normal_map: None,
            albedo: Albedo::Color(Vec3::new(1.0, 1.0, 1.0)),
            microsurface: 1.0,
            reflectivity: Vec3::new(1.0, 1.0, 1.0),
        };
        assert_eq!(
            catalog.insert(definition.clone()),
            Err(MaterialError::MissingResource("environment map"))
        );

        definition.program_variant = ProgramVariant::WithoutEnvironmentMap;
        definition.microsurface = 2.0;
        assert!(matches!(catalog.insert(definition.clone()), Err(MaterialError::InvalidParameter { .. })));

        definition.microsurface = 0.9;
        catalog.insert(definition).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_sub_presets_round_trip_through_material() {
        let textures = test_textures();
        let catalog = MaterialPresetCatalog::standard(&textures);

        let stone = catalog.materialize("stone").unwrap();
        assert_eq!(textures.albedo_preset_of(&stone), AlbedoPreset::Stone);
        assert_eq!(textures.normal_map_preset_of(&stone), NormalMapPreset::Stone);

        let gold = catalog.materialize("gold").unwrap();
        assert_eq!(textures.albedo_preset_of(&gold), AlbedoPreset::Color);
        assert_eq!(textures.normal_map_preset_of(&gold), NormalMapPreset::Metal);

        assert_eq!(textures.normal_map_preset_of(&PbrMaterial::new()), NormalMapPreset::None);
    }
}
