/// Entity visual resolver.
///
/// Maps one simulation entity record to an asset key, a screen position
/// and a size scale. Pure per call: the only inputs besides the record are
/// the grid geometry and the current wall-clock seconds (for sway phase
/// and blink/countdown frame selection).
///
/// Keys are tagged variants rather than concatenated strings, and every
/// resolution carries an ordered fallback chain ending in the plain
/// normal-status key for the entity's kind. The asset store walks the
/// chain; a known kind therefore always produces something drawable.

use crate::engine::snapshot::{EffectRecord, PlantRecord, ProjectileRecord, ZombieRecord};
use crate::grid::GridGeometry;

// ── Keys ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PlantVariant {
    Base,
    /// Wallnut damage stages: Stage1 intact, Stage3 nearly gone.
    Stage1,
    Stage2,
    Stage3,
    /// Potato mine arming countdown, 3 frames.
    Arming(u8),
    Armed,
    ArmedBlink,
    /// Cherry bomb pre-detonation pulse, 5 frames.
    Pulse(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ZombieDress {
    Full,
    /// Tiered armor still present (cone/bucket), tier 1 or 2.
    Armor(u8),
    /// Headgear or paper armor gone, arm still attached.
    Stripped,
    /// Headgear or paper armor gone and arm lost.
    StrippedNoArm,
    /// Arm lost on a kind without stripped variants.
    NoArm,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ZombieStatus {
    Normal,
    Frozen,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AssetKey {
    Plant { kind: u8, variant: PlantVariant },
    Zombie { kind: u8, dress: ZombieDress, status: ZombieStatus },
    Projectile { frozen: bool },
    Effect { kind: u8, frame: u8 },
}

// ── Resolution result ──

/// One drawable entity. `chain` is the ordered fallback list: the first
/// key the asset store knows wins, and the chain is never empty.
#[derive(Clone, Debug)]
pub struct Visual {
    pub chain: Vec<AssetKey>,
    pub pos: (i32, i32),
    pub scale: f32,
    /// Set on the first resolved frame of an effect's lifetime so the
    /// caller can fire the paired one-shot cue exactly once.
    pub just_started: bool,
}

impl Visual {
    fn new(chain: Vec<AssetKey>, pos: (i32, i32)) -> Self {
        Visual { chain, pos, scale: 1.0, just_started: false }
    }

    pub fn key(&self) -> AssetKey {
        self.chain[0]
    }
}

// ── Plant kinds (simulation contract) ──

pub const PLANT_PEASHOOTER: i32 = 0;
pub const PLANT_SUNFLOWER: i32 = 1;
pub const PLANT_WALLNUT: i32 = 2;
pub const PLANT_MINE: i32 = 3;
pub const PLANT_CHERRY: i32 = 4;
pub const PLANT_ICE: i32 = 5;

/// Seconds before firing at which the sunflower swells.
const SUN_SWELL_WINDOW: f32 = 0.2;
const SUN_SWELL_SCALE: f32 = 1.15;
/// Mine arming animation covers the last part of the countdown.
const MINE_ARMING_WINDOW: f32 = 0.8;
const MINE_ARMING_FRAMES: u8 = 3;
const MINE_BLINK_HZ: f64 = 2.0;
const CHERRY_PULSE_FRAMES: u8 = 5;

/// Zombie kind whose visual never shows limb loss.
const ZOMBIE_SPECIAL_KIND: i32 = 6;

// ── Effects ──

pub const EFFECT_MINE_BLAST: i32 = 0;
pub const EFFECT_CHERRY_BLAST: i32 = 1;
pub const EFFECT_ICE_NOVA: i32 = 2;

const CHERRY_BLAST_FRAMES: u8 = 8;
/// An effect's timer starts at the nominal duration and counts down; a
/// timer within one tick of full duration is the first visible frame.
const FIRST_FRAME_SLACK: f32 = 0.05;

pub fn effect_duration(kind: i32) -> f32 {
    match kind {
        EFFECT_CHERRY_BLAST => 1.2,
        _ => 0.5,
    }
}

/// First visible frame of an effect's lifetime. The frame tick pairs
/// the one-shot cue with this crossing; `resolve_effect` mirrors it on
/// the returned visual.
pub fn effect_just_started(e: &EffectRecord) -> bool {
    e.timer > effect_duration(e.kind) - FIRST_FRAME_SLACK
}

fn clamp_kind(kind: i32) -> u8 {
    kind.clamp(0, u8::MAX as i32) as u8
}

/// Countdown fraction elapsed, clamped to [0,1]. Robust against a zero
/// or negative nominal duration.
fn elapsed_fraction(timer: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (1.0 - timer / duration).clamp(0.0, 1.0)
}

fn frame_index(fraction: f32, frames: u8) -> u8 {
    ((fraction * frames as f32) as i32).clamp(0, frames as i32 - 1) as u8
}

/// Sideways sway offset in cells for idle plants, phase from wall clock.
fn sway_offset(now_seconds: f64, period: f64) -> i32 {
    ((now_seconds * std::f64::consts::TAU / period).sin() * 1.5) as i32
}

// ── Plants ──

pub fn resolve_plant(p: &PlantRecord, now_seconds: f64, geom: &GridGeometry) -> Visual {
    let kind = clamp_kind(p.kind);
    let mut pos = geom.sim_to_screen(p.x, p.y);
    let base = AssetKey::Plant { kind, variant: PlantVariant::Base };

    let mut visual = match p.kind {
        PLANT_SUNFLOWER => {
            pos.0 += sway_offset(now_seconds, 2.0);
            let mut v = Visual::new(vec![base], pos);
            if p.max_timer > 0.0 && p.timer > p.max_timer - SUN_SWELL_WINDOW {
                v.scale = SUN_SWELL_SCALE;
            }
            v
        }
        PLANT_WALLNUT => {
            pos.0 += sway_offset(now_seconds, 3.0);
            let frac = if p.max_health > 0.0 { p.health / p.max_health } else { 1.0 };
            let variant = if frac < 0.33 {
                PlantVariant::Stage3
            } else if frac < 0.66 {
                PlantVariant::Stage2
            } else {
                PlantVariant::Stage1
            };
            Visual::new(vec![AssetKey::Plant { kind, variant }, base], pos)
        }
        PLANT_MINE => {
            if p.timer <= 0.0 {
                // Armed: alternate between the two armed frames.
                let blink = (now_seconds * MINE_BLINK_HZ) as i64 % 2 == 0;
                let variant = if blink { PlantVariant::ArmedBlink } else { PlantVariant::Armed };
                Visual::new(
                    vec![
                        AssetKey::Plant { kind, variant },
                        AssetKey::Plant { kind, variant: PlantVariant::Armed },
                        base,
                    ],
                    pos,
                )
            } else if p.timer < MINE_ARMING_WINDOW {
                let frac = elapsed_fraction(p.timer, MINE_ARMING_WINDOW);
                let frame = frame_index(frac, MINE_ARMING_FRAMES);
                Visual::new(
                    vec![AssetKey::Plant { kind, variant: PlantVariant::Arming(frame) }, base],
                    pos,
                )
            } else {
                Visual::new(vec![base], pos)
            }
        }
        PLANT_CHERRY => {
            let frac = elapsed_fraction(p.timer, p.max_timer);
            let frame = frame_index(frac, CHERRY_PULSE_FRAMES);
            Visual::new(
                vec![AssetKey::Plant { kind, variant: PlantVariant::Pulse(frame) }, base],
                pos,
            )
        }
        _ => Visual::new(vec![base], pos),
    };

    dedup_chain(&mut visual.chain);
    visual
}

// ── Zombies ──

pub fn resolve_zombie(z: &ZombieRecord, geom: &GridGeometry) -> Visual {
    let kind = clamp_kind(z.kind);
    let pos = geom.sim_to_screen(z.x, z.y);
    let status = if z.is_frozen() { ZombieStatus::Frozen } else { ZombieStatus::Normal };

    let primary = match z.kind {
        // Cone / bucket: armor tier picks the variant; with armor gone the
        // body underneath is just a basic zombie.
        1 | 2 => match z.armor_tier {
            1 => AssetKey::Zombie { kind, dress: ZombieDress::Armor(1), status },
            t if t >= 2 => AssetKey::Zombie { kind, dress: ZombieDress::Armor(2), status },
            _ => AssetKey::Zombie { kind: 0, dress: ZombieDress::Full, status },
        },
        // Helmeted: tier 0 means the helmet is knocked off.
        3 => {
            if z.armor_tier == 0 {
                let dress = if z.has_arm() { ZombieDress::Stripped } else { ZombieDress::StrippedNoArm };
                AssetKey::Zombie { kind, dress, status }
            } else {
                AssetKey::Zombie { kind, dress: ZombieDress::Full, status }
            }
        }
        // Newspaper carrier: the paper flag gates the stripped variants.
        4 => {
            if !z.has_paper() {
                let dress = if z.has_arm() { ZombieDress::Stripped } else { ZombieDress::StrippedNoArm };
                AssetKey::Zombie { kind, dress, status }
            } else {
                AssetKey::Zombie { kind, dress: ZombieDress::Full, status }
            }
        }
        k if k == ZOMBIE_SPECIAL_KIND => AssetKey::Zombie { kind, dress: ZombieDress::Full, status },
        _ => {
            if z.has_arm() {
                AssetKey::Zombie { kind, dress: ZombieDress::Full, status }
            } else {
                AssetKey::Zombie { kind, dress: ZombieDress::NoArm, status }
            }
        }
    };

    let mut chain = vec![
        primary,
        AssetKey::Zombie { kind, dress: ZombieDress::Full, status },
        AssetKey::Zombie { kind, dress: ZombieDress::Full, status: ZombieStatus::Normal },
    ];
    dedup_chain(&mut chain);
    Visual::new(chain, pos)
}

// ── Projectiles ──

pub fn resolve_projectile(b: &ProjectileRecord, geom: &GridGeometry) -> Visual {
    let frozen = b.frozen != 0;
    let pos = geom.sim_to_screen(b.x, b.y);
    let mut chain = vec![AssetKey::Projectile { frozen }, AssetKey::Projectile { frozen: false }];
    dedup_chain(&mut chain);
    Visual::new(chain, pos)
}

// ── Effects ──

pub fn resolve_effect(e: &EffectRecord, geom: &GridGeometry) -> Visual {
    let kind = clamp_kind(e.kind);
    let pos = geom.sim_to_screen(e.x, e.y);
    let duration = effect_duration(e.kind);
    let frac = elapsed_fraction(e.timer, duration);

    let frames = match e.kind {
        EFFECT_CHERRY_BLAST => CHERRY_BLAST_FRAMES,
        _ => 1,
    };
    let frame = frame_index(frac, frames);

    let mut chain = vec![
        AssetKey::Effect { kind, frame },
        AssetKey::Effect { kind, frame: 0 },
    ];
    dedup_chain(&mut chain);

    let mut visual = Visual::new(chain, pos);
    // Blast and nova footprints grow as the effect plays out.
    if e.kind != EFFECT_CHERRY_BLAST {
        visual.scale = 1.0 + 0.5 * frac;
    }
    visual.just_started = effect_just_started(e);
    visual
}

fn dedup_chain(chain: &mut Vec<AssetKey>) {
    let mut seen = Vec::with_capacity(chain.len());
    chain.retain(|k| {
        if seen.contains(k) {
            false
        } else {
            seen.push(*k);
            true
        }
    });
}
