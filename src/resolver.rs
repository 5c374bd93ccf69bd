//! Asset key resolution.
//!
//! Turns an [`AssetKey`] into a [`DrawSpec`]: which rig draws it, which
//! variant of that rig, what colour, what size, and which features. The
//! resolver is a pure function of the key, the caller's overrides, the
//! engine configuration and the static tables in this module.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::color::NEUTRAL_GREY;
use crate::config::{EngineConfig, SizeConfig};
use crate::features::{FeatureOverrides, FeatureSet, HairStyle, WallType, WeaponKind};
use crate::key::{Action, AssetKey, Direction};

/// Body-plan family a key is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Humanoid,
    Ghost,
    Slime,
    Monster,
    Tile,
    Item,
    Ui,
    Generic,
}

impl Archetype {
    pub const ALL: [Archetype; 8] = [
        Archetype::Humanoid,
        Archetype::Ghost,
        Archetype::Slime,
        Archetype::Monster,
        Archetype::Tile,
        Archetype::Item,
        Archetype::Ui,
        Archetype::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Humanoid => "humanoid",
            Archetype::Ghost => "ghost",
            Archetype::Slime => "slime",
            Archetype::Monster => "monster",
            Archetype::Tile => "tile",
            Archetype::Item => "item",
            Archetype::Ui => "ui",
            Archetype::Generic => "generic",
        }
    }

    /// Asset substituted when a key of this archetype cannot be drawn.
    pub fn default_key(self) -> &'static str {
        match self {
            Archetype::Humanoid => "npc_villager",
            Archetype::Ghost => "enemy_ghost",
            Archetype::Slime => "enemy_slime",
            Archetype::Monster => "enemy_wolf",
            Archetype::Tile => "tile_grass",
            Archetype::Item => "item_chest",
            Archetype::Ui => "ui_panel",
            Archetype::Generic => "generic_placeholder",
        }
    }

    /// Whether assets of this archetype animate (poses, sheets).
    pub fn is_character(self) -> bool {
        matches!(
            self,
            Archetype::Humanoid | Archetype::Ghost | Archetype::Slime | Archetype::Monster
        )
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanoidVariant {
    #[default]
    Normal,
    Armored,
    Robed,
    Hooded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostVariant {
    #[default]
    Normal,
    Wisp,
    Phantom,
    Shadow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlimeVariant {
    #[default]
    Normal,
    Metal,
    Elemental,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPlan {
    #[default]
    Beast,
    Arachnid,
    Winged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TilePattern {
    Grass,
    Dirt,
    Sand,
    Water,
    Lava,
    Stone,
    Wood,
    Wall(WallType),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Chest,
    Potion,
    Coin,
    Key,
    Sword,
    Shield,
    Scroll,
    Gem,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiElement {
    Panel,
    Button,
    Bar,
    Slot,
    Cursor,
    Unknown(String),
}

/// Archetype-specific variant selected for a draw call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "archetype", content = "variant", rename_all = "lowercase")]
pub enum Variant {
    Humanoid(HumanoidVariant),
    Ghost(GhostVariant),
    Slime(SlimeVariant),
    Monster(BodyPlan),
    Tile(TilePattern),
    Item(ItemKind),
    Ui(UiElement),
    Generic,
}

impl Variant {
    /// Short name for registry metadata and logs.
    pub fn name(&self) -> String {
        match self {
            Variant::Humanoid(v) => format!("{:?}", v).to_lowercase(),
            Variant::Ghost(v) => format!("{:?}", v).to_lowercase(),
            Variant::Slime(v) => format!("{:?}", v).to_lowercase(),
            Variant::Monster(v) => format!("{:?}", v).to_lowercase(),
            Variant::Tile(TilePattern::Wall(w)) => format!("wall-{:?}", w).to_lowercase(),
            Variant::Tile(TilePattern::Unknown(name))
            | Variant::Item(ItemKind::Unknown(name))
            | Variant::Ui(UiElement::Unknown(name)) => name.clone(),
            Variant::Tile(p) => format!("{:?}", p).to_lowercase(),
            Variant::Item(i) => format!("{:?}", i).to_lowercase(),
            Variant::Ui(u) => format!("{:?}", u).to_lowercase(),
            Variant::Generic => "generic".to_string(),
        }
    }
}

/// Largest frame edge, in pixels.
pub const MAX_FRAME_SIZE: u32 = 4096;

/// Largest texture edge, in pixels. Bounds the width of sheet strips.
pub const MAX_TEXTURE_SIZE: u32 = 16384;

/// Fully resolved parameters for one render call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawSpec {
    pub key: AssetKey,
    pub archetype: Archetype,
    pub variant: Variant,
    pub base_color: u32,
    /// Size of one frame
    pub width: u32,
    pub height: u32,
    pub features: FeatureSet,
    pub direction: Direction,
    pub action: Action,
    pub frame_index: u32,
    pub sheet: bool,
    /// Pinned seed for decorative noise; `None` draws a fresh one per render
    pub seed: Option<u64>,
}

impl DrawSpec {
    /// Frames this spec renders: the whole action for sheets, else one.
    pub fn frame_count(&self) -> u32 {
        if self.sheet {
            self.action.frame_count()
        } else {
            1
        }
    }

    /// Size of the finished texture, or `None` if the strip width overflows.
    pub fn texture_size(&self) -> Option<(u32, u32)> {
        let width = self.width.checked_mul(self.frame_count())?;
        Some((width, self.height))
    }
}

/// Name → archetype table, with the variant a name implies.
///
/// Looked up with the subtype first, then the category.
const NAME_TABLE: &[(&str, Archetype, Option<&str>)] = &[
    ("player", Archetype::Humanoid, None),
    ("hero", Archetype::Humanoid, None),
    ("npc", Archetype::Humanoid, None),
    ("villager", Archetype::Humanoid, None),
    ("merchant", Archetype::Humanoid, None),
    ("guard", Archetype::Humanoid, None),
    ("knight", Archetype::Humanoid, Some("armored")),
    ("mage", Archetype::Humanoid, Some("robed")),
    ("skeleton", Archetype::Humanoid, None),
    ("zombie", Archetype::Humanoid, None),
    ("goblin", Archetype::Humanoid, None),
    ("orc", Archetype::Humanoid, None),
    ("boss", Archetype::Humanoid, None),
    ("bandit", Archetype::Humanoid, Some("hooded")),
    ("ghost", Archetype::Ghost, None),
    ("spirit", Archetype::Ghost, None),
    ("specter", Archetype::Ghost, None),
    ("wraith", Archetype::Ghost, Some("phantom")),
    ("wisp", Archetype::Ghost, Some("wisp")),
    ("phantom", Archetype::Ghost, Some("phantom")),
    ("shade", Archetype::Ghost, Some("shadow")),
    ("slime", Archetype::Slime, None),
    ("blob", Archetype::Slime, None),
    ("ooze", Archetype::Slime, None),
    ("jelly", Archetype::Slime, None),
    ("spider", Archetype::Monster, Some("arachnid")),
    ("scorpion", Archetype::Monster, Some("arachnid")),
    ("wolf", Archetype::Monster, Some("beast")),
    ("rat", Archetype::Monster, Some("beast")),
    ("boar", Archetype::Monster, Some("beast")),
    ("bat", Archetype::Monster, Some("winged")),
    ("beast", Archetype::Monster, None),
    ("monster", Archetype::Monster, None),
    ("tile", Archetype::Tile, None),
    ("floor", Archetype::Tile, None),
    ("wall", Archetype::Tile, None),
    ("terrain", Archetype::Tile, None),
    ("item", Archetype::Item, None),
    ("pickup", Archetype::Item, None),
    ("chest", Archetype::Item, None),
    ("potion", Archetype::Item, None),
    ("weapon", Archetype::Item, None),
    ("ui", Archetype::Ui, None),
    ("generic", Archetype::Generic, None),
];

/// Built-in base colours by name (subtype, category or variant).
const COLOR_TABLE: &[(&str, u32)] = &[
    ("player", 0x4169E1),
    ("hero", 0x4169E1),
    ("npc", 0xDEB887),
    ("villager", 0xC19A6B),
    ("merchant", 0x8B6914),
    ("guard", 0x5F6A7A),
    ("knight", 0xB0B7C0),
    ("mage", 0x6A5ACD),
    ("skeleton", 0xE8E8D0),
    ("zombie", 0x6B8E23),
    ("goblin", 0x556B2F),
    ("orc", 0x4F7942),
    ("boss", 0x8B0000),
    ("bandit", 0x3B3B3B),
    ("ghost", 0xE6E6FA),
    ("spirit", 0xDDF4FF),
    ("specter", 0xC8C8E8),
    ("wraith", 0x9F8FBF),
    ("wisp", 0xCCF2FF),
    ("phantom", 0xB8A9D9),
    ("shade", 0x2A2A3A),
    ("shadow", 0x2A2A3A),
    ("slime", 0x32CD32),
    ("blob", 0x9370DB),
    ("ooze", 0x8FBC8F),
    ("jelly", 0xFF69B4),
    ("metal", 0xA8A9AD),
    ("elemental", 0xFF7F27),
    ("spider", 0x2F2F2F),
    ("scorpion", 0x8B4513),
    ("wolf", 0x808080),
    ("rat", 0x6E6259),
    ("boar", 0x5C4033),
    ("bat", 0x3D2B4F),
    ("grass", 0x3A7D2C),
    ("dirt", 0x7B5B3A),
    ("sand", 0xDCC48E),
    ("water", 0x1E90FF),
    ("lava", 0xCF3A10),
    ("stone", 0x808080),
    ("floor", 0x8A8A8A),
    ("wood", 0x8B5A2B),
    ("wall", 0x8B4513),
    ("brick", 0x9C4A2F),
    ("dungeon", 0x4A4A55),
    ("chest", 0x8B5A2B),
    ("potion", 0xDC143C),
    ("coin", 0xFFD700),
    ("key", 0xDAA520),
    ("sword", 0xC0C0C0),
    ("shield", 0x4682B4),
    ("scroll", 0xF5DEB3),
    ("gem", 0x40E0D0),
    ("ui", 0x3C3C50),
    ("panel", 0x3C3C50),
    ("button", 0x4A6FA5),
    ("bar", 0xC0392B),
    ("slot", 0x2E2E3A),
    ("cursor", 0xFFFFFF),
];

/// Look a name up in the archetype table.
pub fn lookup_archetype(name: &str) -> Option<(Archetype, Option<&'static str>)> {
    NAME_TABLE
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, archetype, implied)| (*archetype, *implied))
}

/// Archetype for a key plus the variant its name implies.
///
/// Generic keys are always `Generic`; otherwise subtype, then category;
/// anything unknown is drawn as a humanoid.
pub fn archetype_for(key: &AssetKey) -> (Archetype, Option<&'static str>) {
    if key.is_generic() {
        return (Archetype::Generic, None);
    }
    lookup_archetype(&key.subtype)
        .or_else(|| lookup_archetype(&key.category))
        .unwrap_or((Archetype::Humanoid, None))
}

fn builtin_color(name: &str) -> Option<u32> {
    COLOR_TABLE.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

/// Features a subtype carries unless the caller says otherwise.
pub fn subtype_preset(subtype: &str) -> FeatureOverrides {
    let mut preset = FeatureOverrides::default();
    match subtype {
        "skeleton" => {
            preset.hair_style = Some(HairStyle::Bald);
            preset.weapon_type = Some(WeaponKind::Sword);
            preset.eye_color = Some(0xFF4040);
        }
        "zombie" => preset.hair_style = Some(HairStyle::Long),
        "boss" => {
            preset.has_helmet = Some(true);
            preset.has_cape = Some(true);
            preset.weapon_type = Some(WeaponKind::Axe);
        }
        "knight" => {
            preset.has_helmet = Some(true);
            preset.weapon_type = Some(WeaponKind::Sword);
            preset.has_shield = Some(true);
        }
        "mage" => preset.weapon_type = Some(WeaponKind::Staff),
        "guard" => {
            preset.has_helmet = Some(true);
            preset.weapon_type = Some(WeaponKind::Sword);
        }
        "bandit" => preset.weapon_type = Some(WeaponKind::Dagger),
        "orc" => preset.weapon_type = Some(WeaponKind::Axe),
        "goblin" => {
            preset.hair_style = Some(HairStyle::Spiky);
            preset.weapon_type = Some(WeaponKind::Dagger);
        }
        "player" | "hero" => preset.weapon_type = Some(WeaponKind::Sword),
        "wall" | "brick" | "stone" | "wood" | "dungeon" => {}
        _ => {}
    }
    preset
}

/// Resolves keys against the static tables and one engine configuration.
#[derive(Debug, Clone)]
pub struct Resolver {
    sizes: SizeConfig,
    colors: HashMap<String, u32>,
    seed: Option<u64>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Resolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self { sizes: config.sizes.clone(), colors: config.colors.clone(), seed: config.seed }
    }

    /// Resolve a raw key string.
    pub fn resolve_str(&self, raw: &str, color: Option<u32>, overrides: &FeatureOverrides) -> DrawSpec {
        self.resolve(&AssetKey::parse(raw), color, overrides)
    }

    /// Resolve a structured key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockart::features::FeatureOverrides;
    /// use mockart::key::AssetKey;
    /// use mockart::resolver::{Archetype, Resolver};
    ///
    /// let resolver = Resolver::default();
    /// let spec = resolver.resolve(&AssetKey::parse("enemy_skeleton_walk_left"), None, &FeatureOverrides::default());
    /// assert_eq!(spec.archetype, Archetype::Humanoid);
    /// assert!(spec.features.has_weapon);
    /// ```
    pub fn resolve(&self, key: &AssetKey, color: Option<u32>, overrides: &FeatureOverrides) -> DrawSpec {
        let (archetype, implied) = archetype_for(key);
        let preset = subtype_preset(&key.subtype);
        let features = FeatureSet::defaults_for(archetype).apply(&preset).apply(overrides);
        let variant = resolve_variant(archetype, key, implied, &features);
        let (width, height) = self.size_for(&variant);
        let base_color = color.unwrap_or_else(|| self.base_color(key, archetype));

        log::debug!(
            "resolved '{}' -> {} ({}) {}x{}",
            key,
            archetype,
            variant.name(),
            width,
            height
        );

        DrawSpec {
            key: key.clone(),
            archetype,
            variant,
            base_color,
            width,
            height,
            features,
            direction: key.direction_or_default(),
            action: key.action_or_default(),
            frame_index: key.frame_index.unwrap_or(0),
            sheet: key.sheet,
            seed: self.seed.map(|seed| seed ^ fnv1a(&key.to_string())),
        }
    }

    fn size_for(&self, variant: &Variant) -> (u32, u32) {
        let [w, h] = match variant {
            Variant::Humanoid(_) | Variant::Ghost(_) | Variant::Slime(_) | Variant::Monster(_) => {
                self.sizes.character
            }
            Variant::Tile(_) => self.sizes.tile,
            Variant::Item(_) => self.sizes.item,
            Variant::Ui(UiElement::Button) => self.sizes.button,
            Variant::Ui(UiElement::Bar) => self.sizes.bar,
            Variant::Ui(UiElement::Slot) => self.sizes.slot,
            Variant::Ui(UiElement::Cursor) => self.sizes.cursor,
            Variant::Ui(_) => self.sizes.panel,
            Variant::Generic => self.sizes.character,
        };
        (w, h)
    }

    /// Configured colours win over built-ins; the most specific name wins.
    fn base_color(&self, key: &AssetKey, archetype: Archetype) -> u32 {
        let candidates = key.variant.iter().map(String::as_str).chain([
            key.subtype.as_str(),
            key.category.as_str(),
        ]);
        let names: Vec<&str> = candidates.collect();

        names
            .iter()
            .find_map(|n| self.colors.get(*n).copied())
            .or_else(|| names.iter().find_map(|n| builtin_color(n)))
            .or_else(|| builtin_color(archetype.as_str()))
            .unwrap_or(NEUTRAL_GREY)
    }
}

fn resolve_variant(
    archetype: Archetype,
    key: &AssetKey,
    implied: Option<&str>,
    features: &FeatureSet,
) -> Variant {
    let requested = key.variant.as_deref();
    let pick = |parse: &dyn Fn(&str) -> bool| -> Option<String> {
        requested.filter(|v| parse(v)).or(implied.filter(|v| parse(v))).map(str::to_string)
    };

    match archetype {
        Archetype::Humanoid => Variant::Humanoid(
            match pick(&|v| matches!(v, "normal" | "armored" | "robed" | "hooded")).as_deref() {
                Some("armored") => HumanoidVariant::Armored,
                Some("robed") => HumanoidVariant::Robed,
                Some("hooded") => HumanoidVariant::Hooded,
                _ => HumanoidVariant::Normal,
            },
        ),
        Archetype::Ghost => Variant::Ghost(
            match pick(&|v| matches!(v, "normal" | "wisp" | "phantom" | "shadow")).as_deref() {
                Some("wisp") => GhostVariant::Wisp,
                Some("phantom") => GhostVariant::Phantom,
                Some("shadow") => GhostVariant::Shadow,
                _ => GhostVariant::Normal,
            },
        ),
        Archetype::Slime => Variant::Slime(
            match pick(&|v| matches!(v, "normal" | "metal" | "elemental" | "king")).as_deref() {
                Some("metal") => SlimeVariant::Metal,
                Some("elemental") => SlimeVariant::Elemental,
                Some("king") => SlimeVariant::King,
                _ => SlimeVariant::Normal,
            },
        ),
        Archetype::Monster => Variant::Monster(
            match pick(&|v| matches!(v, "beast" | "arachnid" | "winged")).as_deref() {
                Some("arachnid") => BodyPlan::Arachnid,
                Some("winged") => BodyPlan::Winged,
                _ => BodyPlan::Beast,
            },
        ),
        Archetype::Tile => Variant::Tile(tile_pattern(key, features)),
        Archetype::Item => Variant::Item(item_kind(key)),
        Archetype::Ui => Variant::Ui(ui_element(&key.subtype)),
        Archetype::Generic => Variant::Generic,
    }
}

fn tile_pattern(key: &AssetKey, features: &FeatureSet) -> TilePattern {
    let wall_from = |name: Option<&str>| {
        name.and_then(|n| n.parse::<WallType>().ok()).unwrap_or(features.wall_type)
    };
    if key.subtype == "wall" {
        return TilePattern::Wall(wall_from(key.variant.as_deref()));
    }
    if key.category == "wall" {
        return TilePattern::Wall(wall_from(Some(&key.subtype)));
    }
    match key.subtype.as_str() {
        "grass" => TilePattern::Grass,
        "dirt" | "path" => TilePattern::Dirt,
        "sand" => TilePattern::Sand,
        "water" => TilePattern::Water,
        "lava" => TilePattern::Lava,
        "stone" | "floor" | "cobble" => TilePattern::Stone,
        "wood" | "plank" => TilePattern::Wood,
        other => TilePattern::Unknown(other.to_string()),
    }
}

fn parse_item(name: &str) -> Option<ItemKind> {
    Some(match name {
        "chest" => ItemKind::Chest,
        "potion" => ItemKind::Potion,
        "coin" | "gold" => ItemKind::Coin,
        "key" => ItemKind::Key,
        "sword" => ItemKind::Sword,
        "shield" => ItemKind::Shield,
        "scroll" => ItemKind::Scroll,
        "gem" => ItemKind::Gem,
        _ => return None,
    })
}

fn item_kind(key: &AssetKey) -> ItemKind {
    parse_item(&key.subtype)
        .or_else(|| parse_item(&key.category))
        .unwrap_or_else(|| ItemKind::Unknown(key.subtype.clone()))
}

fn ui_element(name: &str) -> UiElement {
    match name {
        "panel" | "window" | "dialog" => UiElement::Panel,
        "button" => UiElement::Button,
        "bar" | "healthbar" | "manabar" => UiElement::Bar,
        "slot" => UiElement::Slot,
        "cursor" | "pointer" => UiElement::Cursor,
        other => UiElement::Unknown(other.to_string()),
    }
}

/// 64-bit FNV-1a, used to derive per-key noise seeds from a pinned seed.
fn fnv1a(text: &str) -> u64 {
    text.bytes()
        .fold(0xcbf29ce484222325u64, |hash, b| (hash ^ b as u64).wrapping_mul(0x100000001b3))
}
