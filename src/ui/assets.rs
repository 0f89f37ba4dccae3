/// Glyph sprite table: the terminal's stand-in for an image atlas.
///
/// Decoding real image/audio files is outside this program; a "sprite"
/// here is a short glyph run plus a color, and an asset key resolves by
/// walking the resolver's fallback chain through this table. A chain with
/// no backing sprite degrades to a colored placeholder block sized to the
/// entity's footprint — a miss is recorded for the shutdown report and is
/// never an error.

use std::collections::{BTreeSet, HashMap};

use crossterm::style::Color;

use crate::ui::resolver::{AssetKey, PlantVariant, ZombieDress, ZombieStatus};

// ── Roster data shown on cards and unlock screens ──

pub const PLANT_NAMES: [&str; 6] = ["Pea", "Sun", "Nut", "Mine", "Bomb", "Ice"];
pub const PLANT_COSTS: [i32; 6] = [100, 50, 50, 25, 150, 0];

/// Unlock reveal content, id = the level just cleared (1..=6). Id 4 is
/// the shovel; the others map to plant kinds (id below 4 → kind id,
/// above 4 → kind id − 1).
pub fn unlock_info(id: u32) -> Option<(&'static str, &'static str)> {
    match id {
        1 => Some(("Sunflower", "Produces sun for your economy.")),
        2 => Some(("Wall-Nut", "Blocks zombies with high health.")),
        3 => Some(("Potato Mine", "Arms itself, then explodes underfoot.")),
        4 => Some(("Shovel", "Dig up plants you no longer want.")),
        5 => Some(("Cherry Bomb", "Explodes immediately in an area.")),
        6 => Some(("Ice Shroom", "Freezes a zombie on contact.")),
        _ => None,
    }
}

/// Sprite icon for the unlock screen, reusing the plant/shovel art.
pub fn unlock_icon(id: u32) -> Option<Sprite> {
    match id {
        4 => Some(Sprite::new("⛏ ", Color::Grey)),
        1..=3 => Some(plant_base_sprite(id as u8)),
        5 | 6 => Some(plant_base_sprite(id as u8 - 1)),
        _ => None,
    }
}

// ── Sprites ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Sprite {
    pub glyphs: &'static str,
    pub fg: Color,
}

impl Sprite {
    const fn new(glyphs: &'static str, fg: Color) -> Self {
        Sprite { glyphs, fg }
    }
}

/// Placeholder colors per entity family, used when a whole chain misses.
pub fn placeholder_for(key: AssetKey) -> Sprite {
    match key {
        AssetKey::Plant { .. } => Sprite::new("▒▒", Color::Green),
        AssetKey::Zombie { .. } => Sprite::new("▒▒", Color::Magenta),
        AssetKey::Projectile { .. } => Sprite::new("▒", Color::White),
        AssetKey::Effect { .. } => Sprite::new("▒▒", Color::Yellow),
    }
}

fn plant_base_sprite(kind: u8) -> Sprite {
    match kind {
        0 => Sprite::new("🌱", Color::Green),
        1 => Sprite::new("🌻", Color::Yellow),
        2 => Sprite::new("🥜", Color::DarkYellow),
        3 => Sprite::new("🥔", Color::DarkYellow),
        4 => Sprite::new("🍒", Color::Red),
        5 => Sprite::new("🍄", Color::Cyan),
        _ => Sprite::new("??", Color::Green),
    }
}

pub struct AssetStore {
    sprites: HashMap<AssetKey, Sprite>,
    /// Primary keys that failed their whole chain, for the shutdown report.
    missing: BTreeSet<String>,
}

impl AssetStore {
    /// The built-in sprite set. Deliberately sparse in places (frozen
    /// variants of stripped zombies, high armor tiers of kind 2): the
    /// fallback chain is expected to cover those.
    pub fn standard() -> Self {
        let mut s = HashMap::new();

        // Plants: base sprites for every kind.
        for kind in 0..6u8 {
            s.insert(
                AssetKey::Plant { kind, variant: PlantVariant::Base },
                plant_base_sprite(kind),
            );
        }
        // Wallnut damage stages.
        s.insert(key_plant(2, PlantVariant::Stage1), Sprite::new("🥜", Color::DarkYellow));
        s.insert(key_plant(2, PlantVariant::Stage2), Sprite::new("🥜", Color::Yellow));
        s.insert(key_plant(2, PlantVariant::Stage3), Sprite::new("🥜", Color::Red));
        // Potato mine arming and armed frames.
        s.insert(key_plant(3, PlantVariant::Arming(0)), Sprite::new("..", Color::DarkYellow));
        s.insert(key_plant(3, PlantVariant::Arming(1)), Sprite::new("oo", Color::DarkYellow));
        s.insert(key_plant(3, PlantVariant::Arming(2)), Sprite::new("OO", Color::Yellow));
        s.insert(key_plant(3, PlantVariant::Armed), Sprite::new("🥔", Color::Red));
        s.insert(key_plant(3, PlantVariant::ArmedBlink), Sprite::new("🥔", Color::Yellow));
        // Cherry pulse frames.
        s.insert(key_plant(4, PlantVariant::Pulse(0)), Sprite::new("🍒", Color::Red));
        s.insert(key_plant(4, PlantVariant::Pulse(1)), Sprite::new("🍒", Color::DarkRed));
        s.insert(key_plant(4, PlantVariant::Pulse(2)), Sprite::new("🍒", Color::Red));
        s.insert(key_plant(4, PlantVariant::Pulse(3)), Sprite::new("💢", Color::DarkRed));
        s.insert(key_plant(4, PlantVariant::Pulse(4)), Sprite::new("💢", Color::Red));

        // Zombies: plain and frozen base for every kind.
        for kind in 0..8u8 {
            // Kind 7 is the boss-tier walker, tinted red.
            let fg = if kind == 7 { Color::Red } else { Color::Magenta };
            s.insert(key_zombie(kind, ZombieDress::Full, ZombieStatus::Normal), Sprite::new("🧟", fg));
            s.insert(key_zombie(kind, ZombieDress::Full, ZombieStatus::Frozen), Sprite::new("🧟", Color::Cyan));
        }
        // Armor tiers for cone (1) and bucket (2) carriers.
        s.insert(key_zombie(1, ZombieDress::Armor(1), ZombieStatus::Normal), Sprite::new("🔶", Color::DarkYellow));
        s.insert(key_zombie(1, ZombieDress::Armor(2), ZombieStatus::Normal), Sprite::new("🔸", Color::DarkYellow));
        s.insert(key_zombie(2, ZombieDress::Armor(1), ZombieStatus::Normal), Sprite::new("🪣", Color::Grey));
        s.insert(key_zombie(2, ZombieDress::Armor(2), ZombieStatus::Normal), Sprite::new("🪣", Color::DarkGrey));
        // Stripped variants for helmet (3) and paper (4) carriers.
        s.insert(key_zombie(3, ZombieDress::Stripped, ZombieStatus::Normal), Sprite::new("🧟", Color::DarkMagenta));
        s.insert(key_zombie(3, ZombieDress::StrippedNoArm, ZombieStatus::Normal), Sprite::new("🦴", Color::DarkMagenta));
        s.insert(key_zombie(4, ZombieDress::Stripped, ZombieStatus::Normal), Sprite::new("🗞", Color::DarkMagenta));
        s.insert(key_zombie(4, ZombieDress::StrippedNoArm, ZombieStatus::Normal), Sprite::new("🦴", Color::DarkMagenta));
        // Generic arm loss.
        for kind in [0u8, 5, 7] {
            s.insert(key_zombie(kind, ZombieDress::NoArm, ZombieStatus::Normal), Sprite::new("🦴", Color::Magenta));
        }

        // Projectiles.
        s.insert(AssetKey::Projectile { frozen: false }, Sprite::new("•", Color::Green));
        s.insert(AssetKey::Projectile { frozen: true }, Sprite::new("❄", Color::Cyan));

        // Effects: mine blast, cherry flipbook, ice nova.
        s.insert(AssetKey::Effect { kind: 0, frame: 0 }, Sprite::new("💥", Color::Yellow));
        for frame in 0..8u8 {
            let glyph = match frame {
                0 | 1 => "✸ ",
                2..=5 => "💥",
                _ => "～",
            };
            s.insert(AssetKey::Effect { kind: 1, frame }, Sprite::new(glyph, Color::Red));
        }
        s.insert(AssetKey::Effect { kind: 2, frame: 0 }, Sprite::new("❄❄", Color::Cyan));

        AssetStore { sprites: s, missing: BTreeSet::new() }
    }

    /// Walk a fallback chain and return the first backed sprite, or the
    /// placeholder for the primary key when the whole chain misses.
    pub fn resolve(&mut self, chain: &[AssetKey]) -> Sprite {
        for key in chain {
            if let Some(sprite) = self.sprites.get(key) {
                return *sprite;
            }
        }
        let primary = chain.first().copied();
        if let Some(key) = primary {
            self.missing.insert(format!("{key:?}"));
            placeholder_for(key)
        } else {
            // Resolver chains are never empty; guard anyway.
            Sprite::new("??", Color::White)
        }
    }

    /// Distinct primary keys that fell through to placeholders, reported
    /// once after the terminal is restored.
    pub fn missing_report(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(|s| s.as_str())
    }
}

fn key_plant(kind: u8, variant: PlantVariant) -> AssetKey {
    AssetKey::Plant { kind, variant }
}

fn key_zombie(kind: u8, dress: ZombieDress, status: ZombieStatus) -> AssetKey {
    AssetKey::Zombie { kind, dress, status }
}
