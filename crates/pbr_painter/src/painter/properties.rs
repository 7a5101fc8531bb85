//! # Property Surface
//!
//! Index-addressed descriptor table that lets a host UI (or a script, or a
//! test) drive the active selection without holding pointers into the
//! material. Every property is identified by a [`PropertyId`]; reads and
//! writes go through the accessors of [`ActiveSelection`] and [`PbrMaterial`],
//! so their validation applies unchanged.
//!
//! ```text
//! preset
//! manualSettings/
//!     ProgramPreset
//!     albedo
//!     albedoColor/albedoColorR, albedoColorG, albedoColorB
//!     microsurface
//!     reflectivity/reflectivityR, reflectivityG, reflectivityB
//!     normalMap
//! ```
//!
//! [`PbrMaterial`]: crate::render::material::PbrMaterial

use std::fmt;

use super::selection::{ActiveSelection, Channel};
use crate::render::material::{
    AlbedoPreset, MaterialError, MaterialPresetCatalog, NormalMapPreset, Preset, ProgramVariant,
};

const PRESET_OPTIONS: &[&str] = &["manual", "gold", "plastic", "stone", "tiles"];
const PROGRAM_OPTIONS: &[&str] = &["WithEnvMap", "WithoutEnvMap"];
const ALBEDO_OPTIONS: &[&str] = &["color", "metal", "plastic", "stone", "tiles"];
const NORMAL_MAP_OPTIONS: &[&str] = &["none", "metal", "plastic", "stone", "tiles"];

const MANUAL_GROUP: &str = "manualSettings";
const ALBEDO_COLOR_GROUP: &str = "manualSettings/albedoColor";
const REFLECTIVITY_GROUP: &str = "manualSettings/reflectivity";

/// Identifier of one property; doubles as its index in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyId {
    /// Top-level preset
    Preset,
    /// Program variant
    ProgramPreset,
    /// Albedo sub-preset
    Albedo,
    /// Albedo colour, red
    AlbedoColorR,
    /// Albedo colour, green
    AlbedoColorG,
    /// Albedo colour, blue
    AlbedoColorB,
    /// Microsurface
    Microsurface,
    /// Reflectivity, red
    ReflectivityR,
    /// Reflectivity, green
    ReflectivityG,
    /// Reflectivity, blue
    ReflectivityB,
    /// Normal-map sub-preset
    NormalMap,
}

impl PropertyId {
    /// Every property, in table order
    pub const ALL: [Self; 11] = [
        Self::Preset,
        Self::ProgramPreset,
        Self::Albedo,
        Self::AlbedoColorR,
        Self::AlbedoColorG,
        Self::AlbedoColorB,
        Self::Microsurface,
        Self::ReflectivityR,
        Self::ReflectivityG,
        Self::ReflectivityB,
        Self::NormalMap,
    ];

    /// Position in the table
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Property at `index`
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Value type and editing hints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyKind {
    /// Scalar slider
    Float {
        /// Lower bound
        minimum: f32,
        /// Upper bound
        maximum: f32,
        /// Slider step
        step: f32,
        /// Decimal places shown
        precision: u8,
    },
    /// One of a fixed list of names
    Choice {
        /// Accepted names
        options: &'static [&'static str],
    },
}

impl PropertyKind {
    const fn unit_float() -> Self {
        Self::Float {
            minimum: 0.0,
            maximum: 1.0,
            step: 0.1,
            precision: 2,
        }
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::Float { .. } => "float",
            Self::Choice { .. } => "choice",
        }
    }
}

/// Static description of one property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDescriptor {
    /// Identifier
    pub id: PropertyId,
    /// Short name
    pub name: &'static str,
    /// Enclosing group path, `None` at the top level
    pub group: Option<&'static str>,
    /// Value type
    pub kind: PropertyKind,
}

impl PropertyDescriptor {
    const fn new(id: PropertyId, name: &'static str, group: Option<&'static str>, kind: PropertyKind) -> Self {
        Self { id, name, group, kind }
    }

    /// Full path, e.g. `manualSettings/reflectivity/reflectivityG`
    #[must_use]
    pub fn path(&self) -> String {
        match self.group {
            Some(group) => format!("{group}/{}", self.name),
            None => self.name.to_string(),
        }
    }

    fn in_group(&self, group: &str) -> bool {
        self.group.is_some_and(|g| g == group || g.starts_with(&format!("{group}/")))
    }
}

/// Current or requested property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Scalar
    Float(f32),
    /// Option name
    Choice(String),
}

impl PropertyValue {
    /// Choice value from anything string-like
    pub fn choice(name: impl Into<String>) -> Self {
        Self::Choice(name.into())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value:.2}"),
            Self::Choice(name) => f.write_str(name),
        }
    }
}

/// Property access errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// No property with this name
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Float written to a choice property or the other way round
    #[error("Property {property} expects a {expected} value")]
    TypeMismatch {
        /// Property name
        property: &'static str,
        /// Expected value type
        expected: &'static str,
    },

    /// Choice value outside the property's options
    #[error("Property {property} has no option {value:?}")]
    UnknownChoice {
        /// Property name
        property: &'static str,
        /// Rejected option
        value: String,
    },

    /// Manual settings are read-only unless the manual preset is selected
    #[error("Property {0} is only editable with the manual preset")]
    NotEditable(&'static str),

    /// The material rejected the value
    #[error(transparent)]
    Material(#[from] MaterialError),
}

/// Descriptor table over an [`ActiveSelection`]
#[derive(Debug, Clone)]
pub struct PropertyTable {
    descriptors: [PropertyDescriptor; 11],
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTable {
    /// Build the table
    #[must_use]
    pub const fn new() -> Self {
        use PropertyId as Id;
        let float = PropertyKind::unit_float();
        Self {
            descriptors: [
                PropertyDescriptor::new(Id::Preset, "preset", None, PropertyKind::Choice { options: PRESET_OPTIONS }),
                PropertyDescriptor::new(
                    Id::ProgramPreset,
                    "ProgramPreset",
                    Some(MANUAL_GROUP),
                    PropertyKind::Choice { options: PROGRAM_OPTIONS },
                ),
                PropertyDescriptor::new(
                    Id::Albedo,
                    "albedo",
                    Some(MANUAL_GROUP),
                    PropertyKind::Choice { options: ALBEDO_OPTIONS },
                ),
                PropertyDescriptor::new(Id::AlbedoColorR, "albedoColorR", Some(ALBEDO_COLOR_GROUP), float),
                PropertyDescriptor::new(Id::AlbedoColorG, "albedoColorG", Some(ALBEDO_COLOR_GROUP), float),
                PropertyDescriptor::new(Id::AlbedoColorB, "albedoColorB", Some(ALBEDO_COLOR_GROUP), float),
                PropertyDescriptor::new(Id::Microsurface, "microsurface", Some(MANUAL_GROUP), float),
                PropertyDescriptor::new(Id::ReflectivityR, "reflectivityR", Some(REFLECTIVITY_GROUP), float),
                PropertyDescriptor::new(Id::ReflectivityG, "reflectivityG", Some(REFLECTIVITY_GROUP), float),
                PropertyDescriptor::new(Id::ReflectivityB, "reflectivityB", Some(REFLECTIVITY_GROUP), float),
                PropertyDescriptor::new(
                    Id::NormalMap,
                    "normalMap",
                    Some(MANUAL_GROUP),
                    PropertyKind::Choice { options: NORMAL_MAP_OPTIONS },
                ),
            ],
        }
    }

    /// Every descriptor, in table order
    #[must_use]
    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    /// Descriptor of `id`
    #[must_use]
    pub const fn descriptor(&self, id: PropertyId) -> &PropertyDescriptor {
        &self.descriptors[id.index()]
    }

    /// Look a property up by short name or full path
    pub fn find(&self, name: &str) -> Result<PropertyId, PropertyError> {
        self.descriptors
            .iter()
            .find(|d| d.name == name || d.path() == name)
            .map(|d| d.id)
            .ok_or_else(|| PropertyError::UnknownProperty(name.to_string()))
    }

    /// Whether a UI should currently show `id`.
    ///
    /// Manual settings are shown only with the manual preset, the albedo colour
    /// group only while the albedo sub-preset is `color`.
    #[must_use]
    pub fn is_visible(&self, selection: &ActiveSelection, id: PropertyId) -> bool {
        let descriptor = self.descriptor(id);
        if descriptor.in_group(MANUAL_GROUP) && selection.preset() != Preset::Manual {
            return false;
        }
        if descriptor.in_group(ALBEDO_COLOR_GROUP) && selection.albedo_preset() != AlbedoPreset::Color {
            return false;
        }
        true
    }

    /// Properties a UI should currently show, in table order
    pub fn visible<'a>(&'a self, selection: &'a ActiveSelection) -> impl Iterator<Item = &'a PropertyDescriptor> + 'a {
        self.descriptors.iter().filter(move |d| self.is_visible(selection, d.id))
    }

    /// Read a property
    #[must_use]
    pub fn get(&self, selection: &ActiveSelection, id: PropertyId) -> PropertyValue {
        let material = selection.material();
        match id {
            PropertyId::Preset => PropertyValue::choice(selection.preset().name()),
            PropertyId::ProgramPreset => PropertyValue::choice(material.program_variant().name()),
            PropertyId::Albedo => PropertyValue::choice(selection.albedo_preset().name()),
            PropertyId::AlbedoColorR => PropertyValue::Float(material.albedo_color().x),
            PropertyId::AlbedoColorG => PropertyValue::Float(material.albedo_color().y),
            PropertyId::AlbedoColorB => PropertyValue::Float(material.albedo_color().z),
            PropertyId::Microsurface => PropertyValue::Float(material.microsurface()),
            PropertyId::ReflectivityR => PropertyValue::Float(material.reflectivity().x),
            PropertyId::ReflectivityG => PropertyValue::Float(material.reflectivity().y),
            PropertyId::ReflectivityB => PropertyValue::Float(material.reflectivity().z),
            PropertyId::NormalMap => PropertyValue::choice(selection.normal_map_preset().name()),
        }
    }

    /// Write a property.
    ///
    /// Rejected writes leave the selection unchanged.
    pub fn set(
        &self,
        selection: &mut ActiveSelection,
        catalog: &MaterialPresetCatalog,
        id: PropertyId,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        let descriptor = self.descriptor(id);
        if descriptor.in_group(MANUAL_GROUP) && selection.preset() != Preset::Manual {
            return Err(PropertyError::NotEditable(descriptor.name));
        }

        match (descriptor.kind, value) {
            (PropertyKind::Float { .. }, PropertyValue::Float(value)) => set_float(selection, id, value)?,
            (PropertyKind::Choice { options }, PropertyValue::Choice(name)) => {
                if !options.contains(&name.as_str()) {
                    return Err(PropertyError::UnknownChoice {
                        property: descriptor.name,
                        value: name,
                    });
                }
                set_choice(selection, catalog, id, &name)?;
            }
            (kind, _) => {
                return Err(PropertyError::TypeMismatch {
                    property: descriptor.name,
                    expected: kind.type_name(),
                })
            }
        }

        log::debug!("Property {} set to {}", descriptor.path(), self.get(selection, id));
        Ok(())
    }
}

fn set_float(selection: &mut ActiveSelection, id: PropertyId, value: f32) -> Result<(), PropertyError> {
    match id {
        PropertyId::AlbedoColorR => selection.set_albedo_channel(Channel::R, value)?,
        PropertyId::AlbedoColorG => selection.set_albedo_channel(Channel::G, value)?,
        PropertyId::AlbedoColorB => selection.set_albedo_channel(Channel::B, value)?,
        PropertyId::Microsurface => selection.material_mut().set_microsurface(value)?,
        PropertyId::ReflectivityR => selection.set_reflectivity_channel(Channel::R, value)?,
        PropertyId::ReflectivityG => selection.set_reflectivity_channel(Channel::G, value)?,
        PropertyId::ReflectivityB => selection.set_reflectivity_channel(Channel::B, value)?,
        PropertyId::Preset | PropertyId::ProgramPreset | PropertyId::Albedo | PropertyId::NormalMap => {
            return Err(PropertyError::TypeMismatch {
                property: PropertyTable::new().descriptor(id).name,
                expected: "choice",
            })
        }
    }
    Ok(())
}

fn set_choice(
    selection: &mut ActiveSelection,
    catalog: &MaterialPresetCatalog,
    id: PropertyId,
    name: &str,
) -> Result<(), PropertyError> {
    let property = PropertyTable::new().descriptor(id).name;
    let unknown = || PropertyError::UnknownChoice {
        property,
        value: name.to_string(),
    };

    match id {
        PropertyId::Preset => {
            let preset: Preset = name.parse().map_err(|_| unknown())?;
            selection.set_preset(catalog, preset)?;
        }
        PropertyId::ProgramPreset => {
            let variant = ProgramVariant::from_name(name).ok_or_else(unknown)?;
            selection.material_mut().set_program_variant(variant)?;
        }
        PropertyId::Albedo => {
            let preset = AlbedoPreset::from_name(name).ok_or_else(unknown)?;
            selection.set_albedo_preset(catalog, preset)?;
        }
        PropertyId::NormalMap => {
            let preset = NormalMapPreset::from_name(name).ok_or_else(unknown)?;
            selection.set_normal_map_preset(catalog, preset)?;
        }
        _ => return Err(PropertyError::TypeMismatch { property, expected: "float" }),
    }
    Ok(())
}
