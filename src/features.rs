//! Typed feature options for rig drawers.
//!
//! [`FeatureOverrides`] is what callers pass in: every field optional, plus
//! an open-ended `extensions` map for names this version does not know.
//! [`FeatureSet`] is the resolved, fully populated form drawers read.
//!
//! Resolution order: archetype defaults, then the subtype preset
//! (skeletons carry swords, knights wear helmets...), then caller overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::resolver::Archetype;

/// Hair drawn on humanoid heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairStyle {
    #[default]
    Short,
    Long,
    Spiky,
    Bald,
}

impl FromStr for HairStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(HairStyle::Short),
            "long" => Ok(HairStyle::Long),
            "spiky" => Ok(HairStyle::Spiky),
            "bald" | "none" => Ok(HairStyle::Bald),
            other => Err(format!("unknown hair style '{}'", other)),
        }
    }
}

/// Weapon held by a humanoid. Unrecognised names are kept as `Other`
/// and simply not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WeaponKind {
    #[default]
    Sword,
    Staff,
    Axe,
    Bow,
    Dagger,
    Other(String),
}

impl WeaponKind {
    pub fn as_str(&self) -> &str {
        match self {
            WeaponKind::Sword => "sword",
            WeaponKind::Staff => "staff",
            WeaponKind::Axe => "axe",
            WeaponKind::Bow => "bow",
            WeaponKind::Dagger => "dagger",
            WeaponKind::Other(name) => name,
        }
    }
}

impl From<&str> for WeaponKind {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "sword" => WeaponKind::Sword,
            "staff" | "wand" => WeaponKind::Staff,
            "axe" => WeaponKind::Axe,
            "bow" => WeaponKind::Bow,
            "dagger" | "knife" => WeaponKind::Dagger,
            other => WeaponKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WeaponKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WeaponKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(WeaponKind::from(name.as_str()))
    }
}

/// Wall construction for `tile_wall_*` patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    Brick,
    Stone,
    Wood,
    Dungeon,
}

impl FromStr for WallType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brick" => Ok(WallType::Brick),
            "stone" => Ok(WallType::Stone),
            "wood" => Ok(WallType::Wood),
            "dungeon" => Ok(WallType::Dungeon),
            other => Err(format!("unknown wall type '{}'", other)),
        }
    }
}

/// Caller-supplied partial feature options.
///
/// Unknown fields are collected into `extensions` so configs written for a
/// newer version still load.
///
/// # Examples
///
/// ```
/// use mockart::features::{FeatureOverrides, HairStyle};
///
/// let overrides: FeatureOverrides =
///     serde_json::from_str(r#"{"hair_style": "long", "sparkles": 3}"#).unwrap();
/// assert_eq!(overrides.hair_style, Some(HairStyle::Long));
/// assert!(overrides.extensions.contains_key("sparkles"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureOverrides {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hair_style: Option<HairStyle>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_helmet: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_weapon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weapon_type: Option<WeaponKind>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_shield: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has_cape: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hair_color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub eye_color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub glow: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wall_type: Option<WallType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fill_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pressed: Option<bool>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl FeatureOverrides {
    pub fn is_empty(&self) -> bool {
        *self == FeatureOverrides::default()
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(&self, other: &FeatureOverrides) -> FeatureOverrides {
        let mut extensions = self.extensions.clone();
        extensions.extend(other.extensions.iter().map(|(k, v)| (k.clone(), v.clone())));
        FeatureOverrides {
            hair_style: other.hair_style.or(self.hair_style),
            has_helmet: other.has_helmet.or(self.has_helmet),
            has_weapon: other.has_weapon.or(self.has_weapon),
            weapon_type: other.weapon_type.clone().or_else(|| self.weapon_type.clone()),
            has_shield: other.has_shield.or(self.has_shield),
            has_cape: other.has_cape.or(self.has_cape),
            hair_color: other.hair_color.or(self.hair_color),
            eye_color: other.eye_color.or(self.eye_color),
            glow: other.glow.or(self.glow),
            wall_type: other.wall_type.or(self.wall_type),
            fill_ratio: other.fill_ratio.or(self.fill_ratio),
            pressed: other.pressed.or(self.pressed),
            extensions,
        }
    }
}

/// Fully resolved feature options for one draw call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSet {
    pub hair_style: HairStyle,
    pub has_helmet: bool,
    pub has_weapon: bool,
    pub weapon_type: WeaponKind,
    pub has_shield: bool,
    pub has_cape: bool,
    pub hair_color: u32,
    pub eye_color: u32,
    pub glow: u32,
    pub wall_type: WallType,
    pub fill_ratio: f32,
    pub pressed: bool,
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl FeatureSet {
    /// Documented defaults for an archetype.
    ///
    /// | archetype | defaults |
    /// |-----------|----------|
    /// | humanoid  | short brown hair, no helmet/weapon/shield/cape, dark eyes |
    /// | ghost     | pale blue glow, black eyes |
    /// | slime     | white glow (core/highlight), black eyes |
    /// | monster   | red eyes |
    /// | tile      | brick walls |
    /// | ui        | bar 75% full, button released |
    pub fn defaults_for(archetype: Archetype) -> Self {
        let base = FeatureSet {
            hair_style: HairStyle::Short,
            has_helmet: false,
            has_weapon: false,
            weapon_type: WeaponKind::Sword,
            has_shield: false,
            has_cape: false,
            hair_color: 0x5C3A1E,
            eye_color: 0x1A1A1A,
            glow: 0xFFFFFF,
            wall_type: WallType::Brick,
            fill_ratio: 0.75,
            pressed: false,
            extensions: BTreeMap::new(),
        };
        match archetype {
            Archetype::Ghost => FeatureSet { glow: 0xB0E0FF, eye_color: 0x000000, ..base },
            Archetype::Slime => FeatureSet { eye_color: 0x000000, ..base },
            Archetype::Monster => FeatureSet { eye_color: 0xFF3030, ..base },
            _ => base,
        }
    }

    /// Apply overrides on top of this set.
    pub fn apply(mut self, overrides: &FeatureOverrides) -> Self {
        if let Some(v) = overrides.hair_style {
            self.hair_style = v;
        }
        if let Some(v) = overrides.has_helmet {
            self.has_helmet = v;
        }
        if let Some(v) = overrides.has_weapon {
            self.has_weapon = v;
        }
        if let Some(v) = &overrides.weapon_type {
            self.weapon_type = v.clone();
            // Naming a weapon implies carrying one unless explicitly disabled
            if overrides.has_weapon.is_none() {
                self.has_weapon = true;
            }
        }
        if let Some(v) = overrides.has_shield {
            self.has_shield = v;
        }
        if let Some(v) = overrides.has_cape {
            self.has_cape = v;
        }
        if let Some(v) = overrides.hair_color {
            self.hair_color = v;
        }
        if let Some(v) = overrides.eye_color {
            self.eye_color = v;
        }
        if let Some(v) = overrides.glow {
            self.glow = v;
        }
        if let Some(v) = overrides.wall_type {
            self.wall_type = v;
        }
        if let Some(v) = overrides.fill_ratio {
            self.fill_ratio = if v.is_finite() { v.clamp(0.0, 1.0) } else { self.fill_ratio };
        }
        if let Some(v) = overrides.pressed {
            self.pressed = v;
        }
        self.extensions
            .extend(overrides.extensions.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}
