//! The asset engine: cache lookup, generation and fallback descent.
//!
//! [`AssetEngine`] owns one texture host, the registry describing what it put
//! there and the drawer table. Every request runs the same state machine:
//!
//! 1. **Lookup** - a texture already in the host is returned as is.
//! 2. **Resolve** - the key becomes a [`DrawSpec`].
//! 3. **Commit** - every frame is drawn onto a fresh surface, which is then
//!    registered with the host and recorded in the registry.
//! 4. **Degrade** - any [`GenerationError`] walks the [`FallbackLadder`]:
//!    the archetype's default key, then a flat-colour emergency asset.
//!
//! Failures are recorded as [`Warning`]s and logged, never returned. The only
//! error a caller sees is [`HostUnavailable`].

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{GenerationError, HostUnavailable, Warning};
use crate::fallback::{draw_emergency, emergency_key, EmergencySpec, FallbackLadder};
use crate::features::FeatureOverrides;
use crate::host::TextureHost;
use crate::key::{Action, AssetKey, Direction};
use crate::noise::DecorativeNoise;
use crate::pose::{synthesize_frame, synthesize_sheet};
use crate::registry::{AssetRegistry, EntryKind, EntryMeta, EntrySource, Registry, RegistryEntry};
use crate::resolver::{Archetype, DrawSpec, Resolver};
use crate::rigs::{check_layout, DrawerTable, RigDrawer};
use crate::surface::{Surface, Viewport};

/// Caller overrides for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateParams {
    /// Base colour, winning over config and built-in colours
    pub color: Option<u32>,
    pub features: FeatureOverrides,
}

impl GenerateParams {
    pub fn with_color(color: u32) -> Self {
        Self { color: Some(color), ..Self::default() }
    }
}

/// How a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Texture already existed, nothing drawn
    Cached,
    Generated,
    /// Served by the archetype's default key
    Fallback,
    /// Served by a flat-colour emergency asset
    Emergency,
}

/// A key that is guaranteed to name a texture in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedKey {
    pub key: String,
    pub outcome: Outcome,
}

impl ResolvedKey {
    fn new(key: impl Into<String>, outcome: Outcome) -> Self {
        Self { key: key.into(), outcome }
    }

    /// True when the texture is a stand-in for what was asked.
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, Outcome::Fallback | Outcome::Emergency)
    }
}

/// action → direction → sheet key
pub type AnimationSet = BTreeMap<Action, BTreeMap<Direction, String>>;

/// Counters for introspection and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub requests: u64,
    pub cache_hits: u64,
    /// Textures committed by a drawer
    pub generated: u64,
    /// Individual frames handed to a drawer
    pub frames_drawn: u64,
    pub fallbacks: u64,
    pub emergencies: u64,
}

/// Placeholder asset engine bound to one texture host.
#[derive(Debug)]
pub struct AssetEngine<H: TextureHost> {
    host: H,
    config: EngineConfig,
    resolver: Resolver,
    drawers: DrawerTable,
    registry: AssetRegistry,
    in_flight: HashSet<String>,
    warnings: Vec<Warning>,
    stats: EngineStats,
    emergency_seq: u64,
}

impl<H: TextureHost> AssetEngine<H> {
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            resolver: Resolver::new(&config),
            config,
            drawers: DrawerTable::builtin(),
            registry: AssetRegistry::new(),
            in_flight: HashSet::new(),
            warnings: Vec::new(),
            stats: EngineStats::default(),
            emergency_seq: 0,
        }
    }

    pub fn with_defaults(host: H) -> Self {
        Self::new(host, EngineConfig::default())
    }

    /// Return a key naming a texture for `raw`, generating it if needed.
    ///
    /// Textures are stored under the trimmed raw string. Never fails while
    /// the host is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockart::engine::{AssetEngine, GenerateParams, Outcome};
    /// use mockart::host::MemoryHost;
    ///
    /// let mut engine = AssetEngine::with_defaults(MemoryHost::new());
    /// let first = engine.get_or_create("tile_grass", &GenerateParams::default()).unwrap();
    /// assert_eq!(first.outcome, Outcome::Generated);
    ///
    /// let again = engine.get_or_create("tile_grass", &GenerateParams::default()).unwrap();
    /// assert_eq!(again.outcome, Outcome::Cached);
    /// ```
    pub fn get_or_create(&mut self, raw: &str, params: &GenerateParams) -> Result<ResolvedKey, HostUnavailable> {
        let key = AssetKey::parse(raw);
        let texture_key = texture_key_for(raw, &key);
        let terminal = self.default_emergency(&key);
        self.serve(&texture_key, &key, params, terminal)
    }

    /// Same as [`get_or_create`](Self::get_or_create) for a structured key,
    /// stored under its canonical string.
    pub fn get_or_create_key(
        &mut self,
        key: &AssetKey,
        params: &GenerateParams,
    ) -> Result<ResolvedKey, HostUnavailable> {
        let terminal = self.default_emergency(key);
        self.serve(&key.to_string(), key, params, terminal)
    }

    /// uses the given size and colour, clamped to `1..=MAX_FRAME_SIZE` per side.
    /// uses the given size and colour.
    pub fn get_texture(
        &mut self,
        raw: &str,
        fallback_width: u32,
        fallback_height: u32,
        fallback_color: u32,
    ) -> Result<String, HostUnavailable> {
        let key = AssetKey::parse(raw);
        let texture_key = texture_key_for(raw, &key);
        let terminal = EmergencySpec::new(&key.category, fallback_width, fallback_height, fallback_color);
        if (terminal.width, terminal.height) != (fallback_width, fallback_height) {
            self.warn(format!(
                "fallback size {}x{} for '{}' clamped to {}x{}",
                fallback_width, fallback_height, texture_key, terminal.width, terminal.height
            ));
        }
        self.serve(&texture_key, &key, &GenerateParams::default(), terminal)
            .map(|resolved| resolved.key)
    }

    /// Default texture for a category name such as `tile` or `ghost`.
    pub fn get_fallback_texture(&mut self, category: &str) -> Result<String, HostUnavailable> {
        let probe = AssetKey::new(category.trim(), "");
        let archetype = match crate::resolver::lookup_archetype(&probe.category) {
            Some((archetype, _)) => archetype,
            None if probe.category.is_empty() => Archetype::Generic,
            None => Archetype::Humanoid,
        };
        self.get_or_create(archetype.default_key(), &GenerateParams::default())
            .map(|resolved| resolved.key)
    }

    /// One sheet per action and direction of a character.
    ///
    /// Empty `actions` or `directions` mean all of them. Any action,
    /// direction, frame or sheet token in `base_key` is replaced.
    pub fn create_character_animation_set(
        &mut self,
        base_key: &str,
        color: Option<u32>,
        actions: &[Action],
        directions: &[Direction],
        features: &FeatureOverrides,
    ) -> Result<AnimationSet, HostUnavailable> {
        if !self.host.is_available() {
            return Err(HostUnavailable);
        }
        let base = AssetKey::parse(base_key);
        let actions = if actions.is_empty() { &Action::ALL[..] } else { actions };
        let directions = if directions.is_empty() { &Direction::ALL[..] } else { directions };
        let params = GenerateParams { color, features: features.clone() };

        let mut set = AnimationSet::new();
        for &action in actions {
            for &direction in directions {
                let mut key = base.clone().with_action(action, direction).as_sheet();
                key.frame_index = None;
                let resolved = self.get_or_create_key(&key, &params)?;
                set.entry(action).or_default().insert(direction, resolved.key);
            }
        }
        Ok(set)
    }

    /// Resolve a raw key without drawing anything.
    pub fn resolve(&self, raw: &str) -> DrawSpec {
        self.resolver.resolve_str(raw, None, &FeatureOverrides::default())
    }

    pub fn resolve_with(&self, raw: &str, params: &GenerateParams) -> DrawSpec {
        self.resolver.resolve_str(raw, params.color, &params.features)
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Warnings recorded since the last call.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Replace the drawer for an archetype, returning the previous one.
    ///
    /// Textures already generated are kept.
    pub fn register_drawer(
        &mut self,
        archetype: Archetype,
        drawer: impl RigDrawer + 'static,
    ) -> Option<Box<dyn RigDrawer>> {
        self.drawers.register(archetype, Box::new(drawer))
    }

    /// Context teardown: drop every texture this engine registered and
    /// forget all bookkeeping.
    pub fn reset(&mut self) {
        let keys: Vec<String> = self.registry.names().cloned().collect();
        for key in &keys {
            self.host.remove_texture(key);
        }
        log::debug!("reset: dropped {} registry entries", keys.len());
        self.registry.clear();
        self.in_flight.clear();
        self.warnings.clear();
        self.stats = EngineStats::default();
    }

    /// Swap in a new host, returning the old one. The registry described
    /// the old host's textures, so it is cleared.
    pub fn replace_host(&mut self, host: H) -> H {
        self.registry.clear();
        self.in_flight.clear();
        std::mem::replace(&mut self.host, host)
    }

    fn default_emergency(&self, key: &AssetKey) -> EmergencySpec {
        let [w, h] = self.config.emergency_size;
        EmergencySpec::new(&key.category, w, h, self.config.emergency_color)
    }

    fn serve(
        &mut self,
        texture_key: &str,
        key: &AssetKey,
        params: &GenerateParams,
        terminal: EmergencySpec,
    ) -> Result<ResolvedKey, HostUnavailable> {
        if !self.host.is_available() {
            return Err(HostUnavailable);
        }
        self.stats.requests += 1;

        if let Some(hit) = self.lookup(texture_key) {
            self.stats.cache_hits += 1;
            log::debug!("cache hit '{}' -> '{}'", texture_key, hit.key);
            return Ok(hit);
        }
        log::debug!("cache miss '{}'", texture_key);

        let spec = self.resolver.resolve(key, params.color, &params.features);
        let ladder = FallbackLadder::build(texture_key, spec, &self.resolver, terminal);
        let (attempts, terminal) = ladder.into_parts();

        for (rung, attempt) in attempts.into_iter().enumerate() {
            if rung > 0 && self.host.texture_exists(&attempt.key) {
                return Ok(self.serve_fallback(texture_key, &attempt.key));
            }
            match self.synthesize(&attempt.key, &attempt.spec) {
                Ok(()) if rung == 0 => return Ok(ResolvedKey::new(texture_key, Outcome::Generated)),
                Ok(()) => return Ok(self.serve_fallback(texture_key, &attempt.key)),
                Err(err) => {
                    self.warn(format!("failed to generate '{}': {}", attempt.key, err));
                    if matches!(err, GenerationError::CyclicKey(_)) {
                        return Ok(self.emergency(texture_key, &terminal, false));
                    }
                }
            }
        }

        Ok(self.emergency(texture_key, &terminal, true))
    }

    /// Cache step. Registry aliases are followed; entries whose texture has
    /// left the host are dropped so the key regenerates.
    fn lookup(&mut self, texture_key: &str) -> Option<ResolvedKey> {
        if self.host.texture_exists(texture_key) {
            return Some(ResolvedKey::new(texture_key, Outcome::Cached));
        }

        let entry = self.registry.get(texture_key)?;
        let served = entry.served_key().to_string();
        let outcome = match self.registry.get(&served).map(|e| e.kind) {
            Some(EntryKind::Emergency) => Outcome::Emergency,
            _ => Outcome::Fallback,
        };
        if served != texture_key && self.host.texture_exists(&served) {
            return Some(ResolvedKey::new(served, outcome));
        }

        log::debug!("dropping stale registry entry '{}'", texture_key);
        self.registry.remove(texture_key);
        None
    }

    /// Draw and commit one texture, guarding against re-entry for the same key.
    fn synthesize(&mut self, texture_key: &str, spec: &DrawSpec) -> Result<(), GenerationError> {
        if !self.in_flight.insert(texture_key.to_string()) {
            return Err(GenerationError::CyclicKey(texture_key.to_string()));
        }
        let result = self.draw_and_commit(texture_key, spec);
        self.in_flight.remove(texture_key);
        result
    }

    fn draw_and_commit(&mut self, texture_key: &str, spec: &DrawSpec) -> Result<(), GenerationError> {
        let (width, height) = check_layout(spec)?;
        let poses = if spec.sheet {
            synthesize_sheet(spec, spec.frame_count())
        } else {
            vec![synthesize_frame(spec, spec.frame_index)]
        };

        let mut surface = self.host.create_surface(width, height);
        for (i, pose) in poses.iter().enumerate() {
            surface.set_viewport(Viewport {
                x: (i as u32 * spec.width) as i32,
                y: 0,
                w: spec.width,
                h: spec.height,
            });
            let mut noise = DecorativeNoise::new(spec.seed.map(|seed| seed.wrapping_add(i as u64)));
            self.drawers.draw(&mut surface, spec, pose, &mut noise)?;
            self.stats.frames_drawn += 1;
        }

        // Nothing reaches the host unless every frame drew.
        self.host.register_texture(texture_key, surface);
        self.registry.record(entry_for(texture_key, spec, width, height));
        self.stats.generated += 1;
        log::debug!("generated '{}' ({}x{}, {} frames)", texture_key, width, height, poses.len());
        Ok(())
    }

    fn serve_fallback(&mut self, requested: &str, served: &str) -> ResolvedKey {
        self.stats.fallbacks += 1;
        self.warn(format!("'{}' served by fallback '{}'", requested, served));
        self.record_alias(requested, served);
        ResolvedKey::new(served, Outcome::Fallback)
    }

    /// Terminal rung: one fill, one registration.
    fn emergency(&mut self, requested: &str, spec: &EmergencySpec, memoize: bool) -> ResolvedKey {
        self.emergency_seq += 1;
        let key = emergency_key(&spec.category, self.emergency_seq);
        let mut surface = self.host.create_surface(spec.width, spec.height);
        draw_emergency(&mut surface, spec);
        self.host.register_texture(&key, surface);
        self.registry.record(
            RegistryEntry::new(&key, EntryKind::Emergency, spec.width, spec.height).with_meta(EntryMeta {
                source: EntrySource::Emergency { requested: requested.to_string() },
                ..Default::default()
            }),
        );
        if memoize {
            self.record_alias(requested, &key);
        }
        self.stats.emergencies += 1;
        self.warn(format!("'{}' served by emergency asset '{}'", requested, key));
        ResolvedKey::new(key, Outcome::Emergency)
    }

    fn record_alias(&mut self, requested: &str, served: &str) {
        let (width, height) = self
            .registry
            .get(served)
            .map(|e| (e.width, e.height))
            .unwrap_or((0, 0));
        self.registry.record(
            RegistryEntry::new(requested, EntryKind::Fallback, width, height).with_meta(EntryMeta {
                source: EntrySource::Fallback { served: served.to_string() },
                ..Default::default()
            }),
        );
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(Warning::new(message));
    }
}

/// Trimmed raw key, or the canonical form when nothing is left.
fn texture_key_for(raw: &str, key: &AssetKey) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        key.to_string()
    } else {
        trimmed.to_string()
    }
}

fn entry_for(texture_key: &str, spec: &DrawSpec, width: u32, height: u32) -> RegistryEntry {
    let kind = if spec.sheet {
        EntryKind::Sheet
    } else {
        match spec.archetype {
            Archetype::Tile => EntryKind::Tile,
            Archetype::Item => EntryKind::Icon,
            Archetype::Ui => EntryKind::Chrome,
            _ => EntryKind::Sprite,
        }
    };
    let character = spec.archetype.is_character();
    RegistryEntry::new(texture_key, kind, width, height).with_meta(EntryMeta {
        archetype: Some(spec.archetype),
        variant: Some(spec.variant.name()),
        action: character.then_some(spec.action),
        direction: character.then_some(spec.direction),
        frames: spec.sheet.then(|| spec.frame_count()),
        frame_width: spec.sheet.then_some(spec.width),
        source: EntrySource::Generated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, RecordingHost};
    use crate::pose::Pose;
    use crate::surface::Layer;

    fn engine() -> AssetEngine<MemoryHost> {
        AssetEngine::with_defaults(MemoryHost::new())
    }

    fn failing(
        _surface: &mut dyn Surface,
        _spec: &DrawSpec,
        _pose: &Pose,
        _noise: &mut DecorativeNoise,
    ) -> Result<(), GenerationError> {
        Err(GenerationError::Drawer("forced".to_string()))
    }

    #[test]
    fn test_generate_then_cache() {
        let mut engine = engine();
        let params = GenerateParams::default();
        let first = engine.get_or_create("enemy_slime", &params).unwrap();
        assert_eq!(first, ResolvedKey::new("enemy_slime", Outcome::Generated));
        let second = engine.get_or_create("enemy_slime", &params).unwrap();
        assert_eq!(second.outcome, Outcome::Cached);
        assert_eq!(engine.stats().generated, 1);
        assert_eq!(engine.stats().cache_hits, 1);
    }

    #[test]
    fn test_registry_entry_kinds() {
        let mut engine = engine();
        let params = GenerateParams::default();
        for raw in ["tile_water", "item_potion", "ui_bar", "npc_guard", "npc_guard_walk_up_sheet"] {
            engine.get_or_create(raw, &params).unwrap();
        }
        let kind = |k: &str| engine.registry().get(k).map(|e| e.kind);
        assert_eq!(kind("tile_water"), Some(EntryKind::Tile));
        assert_eq!(kind("item_potion"), Some(EntryKind::Icon));
        assert_eq!(kind("ui_bar"), Some(EntryKind::Chrome));
        assert_eq!(kind("npc_guard"), Some(EntryKind::Sprite));
        assert_eq!(kind("npc_guard_walk_up_sheet"), Some(EntryKind::Sheet));

        let sheet = engine.registry().get("npc_guard_walk_up_sheet").unwrap();
        assert_eq!(sheet.meta.frames, Some(4));
        assert_eq!(sheet.meta.direction, Some(Direction::Up));
    }

    #[test]
    fn test_unknown_tile_falls_back_to_grass() {
        let mut engine = engine();
        let resolved = engine.get_or_create("tile_moonrock", &GenerateParams::default()).unwrap();
        assert_eq!(resolved, ResolvedKey::new("tile_grass", Outcome::Fallback));
        assert!(engine.host().texture_exists("tile_grass"));
        assert!(!engine.host().texture_exists("tile_moonrock"));
        assert_eq!(engine.take_warnings().len(), 2);
        assert!(engine.take_warnings().is_empty());
    }

    #[test]
    fn test_fallback_is_memoized() {
        let mut engine = engine();
        engine.get_or_create("item_widget", &GenerateParams::default()).unwrap();
        let generated = engine.stats().generated;
        let again = engine.get_or_create("item_widget", &GenerateParams::default()).unwrap();
        assert_eq!(again, ResolvedKey::new("item_chest", Outcome::Fallback));
        assert_eq!(engine.stats().generated, generated);
        assert!(engine.registry().get("item_widget").is_some_and(|e| e.is_degraded()));
    }

    #[test]
    fn test_emergency_when_every_drawer_fails() {
        let mut engine = engine();
        engine.register_drawer(Archetype::Tile, failing);
        let resolved = engine.get_or_create("tile_moonrock", &GenerateParams::default()).unwrap();
        assert_eq!(resolved.outcome, Outcome::Emergency);
        assert!(resolved.key.starts_with("emergency_tile_"));

        let image = engine.host().texture(&resolved.key).unwrap();
        assert_eq!(image.dimensions(), (32, 32));
        assert_eq!(image.get_pixel(5, 5).0, [0xFF, 0x00, 0xFF, 0xFF]);

        // Repeat requests reuse the same emergency texture.
        let again = engine.get_or_create("tile_moonrock", &GenerateParams::default()).unwrap();
        assert_eq!(again, resolved);
        assert_eq!(engine.stats().emergencies, 1);
    }

    #[test]
    fn test_get_texture_uses_fallback_size_and_color() {
        let mut engine = engine();
        engine.register_drawer(Archetype::Item, failing);
        let key = engine.get_texture("item_sword", 10, 6, 0x00FF00).unwrap();
        let image = engine.host().texture(&key).unwrap();
        assert_eq!(image.dimensions(), (10, 6));
        assert_eq!(image.get_pixel(0, 0).0, [0x00, 0xFF, 0x00, 0xFF]);
    }

    #[test]
    fn test_get_fallback_texture() {
        let mut engine = engine();
        assert_eq!(engine.get_fallback_texture("tile").unwrap(), "tile_grass");
        assert_eq!(engine.get_fallback_texture("ghost").unwrap(), "enemy_ghost");
        assert_eq!(engine.get_fallback_texture("spider").unwrap(), "enemy_wolf");
        assert_eq!(engine.get_fallback_texture("ui").unwrap(), "ui_panel");
        assert_eq!(engine.get_fallback_texture("martian").unwrap(), "npc_villager");
        assert_eq!(engine.get_fallback_texture("").unwrap(), "generic_placeholder");
    }

    #[test]
    fn test_cyclic_request_goes_to_emergency() {
        let mut engine = engine();
        engine.in_flight.insert("tile_grass".to_string());
        let resolved = engine.get_or_create("tile_grass", &GenerateParams::default()).unwrap();
        assert_eq!(resolved.outcome, Outcome::Emergency);
        assert!(engine.registry().get("tile_grass").is_none());
        let warnings = engine.take_warnings();
        assert!(warnings[0].message.contains("cyclic"));
    }

    #[test]
    fn test_sheet_frames_use_viewports() {
        let mut engine = AssetEngine::with_defaults(RecordingHost::new());
        engine.get_or_create("enemy_slime_idle_down_sheet", &GenerateParams::default()).unwrap();
        let recording = engine.host().recording("enemy_slime_idle_down_sheet").unwrap();
        let mut origins: Vec<i32> = recording.calls().iter().map(|c| c.viewport.x).collect();
        origins.dedup();
        assert_eq!(origins, vec![0, 32, 64, 96]);
    }

    #[test]
    fn test_failed_sheet_commits_nothing() {
        let mut engine = AssetEngine::with_defaults(RecordingHost::new());
        let calls = std::cell::Cell::new(0);
        let calls = std::rc::Rc::new(calls);
        let counter = calls.clone();
        engine.register_drawer(Archetype::Slime, move |surface: &mut dyn Surface, _: &DrawSpec, pose: &Pose, _: &mut DecorativeNoise| {
            counter.set(counter.get() + 1);
            if pose.frame == 2 {
                return Err(GenerationError::Drawer("frame 2".to_string()));
            }
            surface.set_layer(Layer::Body);
            Ok(())
        });
        let resolved = engine.get_or_create("enemy_slime_idle_down_sheet", &GenerateParams::default()).unwrap();
        assert!(!engine.host().texture_exists("enemy_slime_idle_down_sheet"));
        assert!(resolved.is_degraded());
        assert!(calls.get() >= 3);
    }

    #[test]
    fn test_stale_registry_entry_regenerates() {
        let mut engine = engine();
        engine.get_or_create("tile_sand", &GenerateParams::default()).unwrap();
        engine.host_mut().remove_texture("tile_sand");
        let resolved = engine.get_or_create("tile_sand", &GenerateParams::default()).unwrap();
        assert_eq!(resolved.outcome, Outcome::Generated);
        assert_eq!(engine.stats().generated, 2);
    }

    #[test]
    fn test_host_unavailable() {
        let mut engine = engine();
        engine.host_mut().close();
        assert_eq!(engine.get_or_create("tile_grass", &GenerateParams::default()), Err(HostUnavailable));
        assert_eq!(engine.get_fallback_texture("tile"), Err(HostUnavailable));
        assert!(engine
            .create_character_animation_set("npc_guard", None, &[], &[], &FeatureOverrides::default())
            .is_err());
    }

    #[test]
    fn test_reset_clears_host_and_registry() {
        let mut engine = engine();
        engine.get_or_create("tile_dirt", &GenerateParams::default()).unwrap();
        engine.reset();
        assert!(engine.registry().is_empty());
        assert!(!engine.host().texture_exists("tile_dirt"));
        assert_eq!(engine.stats(), EngineStats::default());
    }

    #[test]
    fn test_replace_host() {
        let mut engine = engine();
        engine.get_or_create("tile_dirt", &GenerateParams::default()).unwrap();
        let old = engine.replace_host(MemoryHost::new());
        assert!(old.texture_exists("tile_dirt"));
        assert!(engine.registry().is_empty());
        let resolved = engine.get_or_create("tile_dirt", &GenerateParams::default()).unwrap();
        assert_eq!(resolved.outcome, Outcome::Generated);
    }

    #[test]
    fn test_animation_set_defaults_to_everything() {
        let mut engine = engine();
        let set = engine
            .create_character_animation_set("npc_mage_f2", Some(0x4040C0), &[], &[], &FeatureOverrides::default())
            .unwrap();
        assert_eq!(set.len(), Action::ALL.len());
        assert_eq!(set[&Action::Cast][&Direction::Left], "npc_mage_cast_left_sheet");
        assert!(set.values().all(|d| d.len() == 4));
    }

    #[test]
    fn test_empty_key_is_resolvable() {
        let mut engine = engine();
        let resolved = engine.get_or_create("", &GenerateParams::default()).unwrap();
        assert!(engine.host().texture_exists(&resolved.key));
    }
}
