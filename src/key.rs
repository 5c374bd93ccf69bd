//! Semantic asset keys.
//!
//! Assets are addressed by what they depict, not where they live:
//!
//! ```text
//! <category>_<subtype>[_<variant>][_<action>[_<direction>]][_f<N>][_sheet]
//! ```
//!
//! Tokens after the subtype are recognised by vocabulary, so
//! `enemy_skeleton_walk_left_sheet` and `enemy_skeleton_armored_f2` both parse.
//! Anything that cannot be split into at least a category and a subtype is a
//! malformed key and becomes `generic_<raw>` instead of an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Token separator in key strings.
pub const SEPARATOR: char = '_';

/// Category assigned to malformed keys.
pub const GENERIC_CATEGORY: &str = "generic";

/// Facing direction of a sprite.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Left, Direction::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Horizontal facing: -1 for left, 1 for right, 0 for front/back views.
    pub fn facing(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
            Direction::Up | Direction::Down => 0.0,
        }
    }

    /// Side views show a profile instead of a front or back.
    pub fn is_side(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Animation an asset depicts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Idle,
    Walk,
    Attack,
    Hurt,
    Death,
    Cast,
}

impl Action {
    pub const ALL: [Action; 6] =
        [Action::Idle, Action::Walk, Action::Attack, Action::Hurt, Action::Death, Action::Cast];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Walk => "walk",
            Action::Attack => "attack",
            Action::Hurt => "hurt",
            Action::Death => "death",
            Action::Cast => "cast",
        }
    }

    /// Frames in this action's animation.
    ///
    /// Fixed per action so every entity animates with the same timing.
    pub fn frame_count(self) -> u32 {
        match self {
            Action::Idle => 4,
            Action::Walk => 4,
            Action::Attack => 3,
            Action::Hurt => 2,
            Action::Death => 5,
            Action::Cast => 4,
        }
    }

    /// Looping actions wrap frame indices; one-shots hold their last frame.
    pub fn loops(self) -> bool {
        matches!(self, Action::Idle | Action::Walk | Action::Cast)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Ok(Action::Idle),
            "walk" => Ok(Action::Walk),
            "attack" => Ok(Action::Attack),
            "hurt" => Ok(Action::Hurt),
            "death" => Ok(Action::Death),
            "cast" => Ok(Action::Cast),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// Structured identifier of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetKey {
    pub category: String,
    pub subtype: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub frame_index: Option<u32>,
    #[serde(default)]
    pub sheet: bool,
}

impl AssetKey {
    pub fn new(category: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            category: category.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
            variant: None,
            action: None,
            direction: None,
            frame_index: None,
            sheet: false,
        }
    }

    /// Key for something that could not be parsed; keeps the raw text as subtype.
    pub fn generic(raw: &str) -> Self {
        Self {
            category: GENERIC_CATEGORY.to_string(),
            subtype: raw.to_string(),
            variant: None,
            action: None,
            direction: None,
            frame_index: None,
            sheet: false,
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into().to_ascii_lowercase());
        self
    }

    pub fn with_action(mut self, action: Action, direction: Direction) -> Self {
        self.action = Some(action);
        self.direction = Some(direction);
        self
    }

    pub fn with_frame(mut self, frame_index: u32) -> Self {
        self.frame_index = Some(frame_index);
        self
    }

    pub fn as_sheet(mut self) -> Self {
        self.sheet = true;
        self
    }

    pub fn is_generic(&self) -> bool {
        self.category == GENERIC_CATEGORY
    }

    pub fn action_or_default(&self) -> Action {
        self.action.unwrap_or_default()
    }

    pub fn direction_or_default(&self) -> Direction {
        self.direction.unwrap_or_default()
    }

    /// Parse a key string. Never fails: malformed input yields a generic key.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockart::key::{Action, AssetKey, Direction};
    ///
    /// let key = AssetKey::parse("enemy_skeleton_walk_left_sheet");
    /// assert_eq!(key.category, "enemy");
    /// assert_eq!(key.subtype, "skeleton");
    /// assert_eq!(key.action, Some(Action::Walk));
    /// assert_eq!(key.direction, Some(Direction::Left));
    /// assert!(key.sheet);
    ///
    /// assert!(AssetKey::parse("").is_generic());
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let mut tokens: Vec<&str> = trimmed.split(SEPARATOR).collect();
        if trimmed.is_empty() || tokens.len() < 2 || tokens.iter().any(|t| t.is_empty()) {
            return Self::generic(raw);
        }

        let sheet = tokens.last().is_some_and(|t| t.eq_ignore_ascii_case("sheet"));
        if sheet {
            tokens.pop();
            if tokens.len() < 2 {
                return Self::generic(raw);
            }
        }

        let mut key = AssetKey::new(tokens[0], tokens[1]);
        key.sheet = sheet;

        for token in &tokens[2..] {
            let lower = token.to_ascii_lowercase();
            if let Ok(action) = lower.parse::<Action>() {
                key.action.get_or_insert(action);
            } else if let Ok(direction) = lower.parse::<Direction>() {
                key.direction.get_or_insert(direction);
            } else if let Some(frame) = parse_frame_token(&lower) {
                key.frame_index.get_or_insert(frame);
            } else if key.variant.is_none() {
                key.variant = Some(lower);
            } else {
                log::debug!("ignoring extra token '{}' in key '{}'", token, raw);
            }
        }

        key
    }
}

/// `f<digits>` selects a frame.
fn parse_frame_token(token: &str) -> Option<u32> {
    let digits = token.strip_prefix('f')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for AssetKey {
    /// Canonical key string; absent tokens are omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_generic() && self.subtype.split(SEPARATOR).count() != 1 {
            return f.write_str(&self.subtype);
        }
        write!(f, "{}{}{}", self.category, SEPARATOR, self.subtype)?;
        if let Some(variant) = &self.variant {
            write!(f, "{}{}", SEPARATOR, variant)?;
        }
        if let Some(action) = self.action {
            write!(f, "{}{}", SEPARATOR, action)?;
        }
        if let Some(direction) = self.direction {
            write!(f, "{}{}", SEPARATOR, direction)?;
        }
        if let Some(frame) = self.frame_index {
            write!(f, "{}f{}", SEPARATOR, frame)?;
        }
        if self.sheet {
            write!(f, "{}sheet", SEPARATOR)?;
        }
        Ok(())
    }
}

impl From<&str> for AssetKey {
    fn from(raw: &str) -> Self {
        AssetKey::parse(raw)
    }
}
