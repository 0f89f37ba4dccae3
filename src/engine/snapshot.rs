/// Fixed-layout entity records mirrored from the native engine.
///
/// These are the only types that cross the foreign boundary. Layouts are
/// part of the versioned engine contract and must not be reordered. An
/// entity has no identity beyond its index within one frame's snapshot;
/// nothing here may be cached across frames.

use crate::engine::Simulation;

// ── Zombie status flag bits ──
// Bit 4 marks the engine's special walker; its visual is keyed off the
// kind field instead, so no accessor reads it here.

pub const FLAG_ARM: i32 = 1;
pub const FLAG_PAPER: i32 = 2;
pub const FLAG_FROZEN: i32 = 8;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PlantRecord {
    pub x: f32,
    pub y: f32,
    pub kind: i32,
    pub health: f32,
    pub max_health: f32,
    pub timer: f32,
    pub max_timer: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ZombieRecord {
    pub x: f32,
    pub y: f32,
    pub kind: i32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub id: i32,
    pub armor_tier: i32,
    pub flags: i32,
}

impl ZombieRecord {
    pub fn has_arm(&self) -> bool {
        self.flags & FLAG_ARM != 0
    }

    pub fn has_paper(&self) -> bool {
        self.flags & FLAG_PAPER != 0
    }

    pub fn is_frozen(&self) -> bool {
        self.flags & FLAG_FROZEN != 0
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectileRecord {
    pub x: f32,
    pub y: f32,
    /// Non-zero = frozen pea.
    pub frozen: i32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectRecord {
    pub x: f32,
    pub y: f32,
    pub kind: i32,
    pub timer: f32,
}

/// Everything the renderer and audio dispatcher need for one frame,
/// pulled from the engine in a single pass. Owned by the frame, dropped
/// after render.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    pub money: i32,
    pub lives: i32,
    pub plants: Vec<PlantRecord>,
    pub zombies: Vec<ZombieRecord>,
    pub projectiles: Vec<ProjectileRecord>,
    pub effects: Vec<EffectRecord>,
}

impl FrameSnapshot {
    /// Pull all entity data for the current frame. The one place that
    /// walks the count/data index pairs of the foreign contract.
    pub fn pull(sim: &dyn Simulation) -> Self {
        let mut snap = FrameSnapshot {
            money: sim.money(),
            lives: sim.lives(),
            plants: Vec::with_capacity(sim.plant_count()),
            zombies: Vec::with_capacity(sim.zombie_count()),
            projectiles: Vec::with_capacity(sim.projectile_count()),
            effects: Vec::with_capacity(sim.effect_count()),
        };
        for i in 0..sim.plant_count() {
            if let Some(p) = sim.plant_at(i) {
                snap.plants.push(p);
            }
        }
        for i in 0..sim.zombie_count() {
            if let Some(z) = sim.zombie_at(i) {
                snap.zombies.push(z);
            }
        }
        for i in 0..sim.projectile_count() {
            if let Some(b) = sim.projectile_at(i) {
                snap.projectiles.push(b);
            }
        }
        for i in 0..sim.effect_count() {
            if let Some(e) = sim.effect_at(i) {
                snap.effects.push(e);
            }
        }
        snap
    }
}
