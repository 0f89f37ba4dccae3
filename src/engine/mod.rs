/// The simulation boundary.
///
/// The authoritative game rules (pathing, damage, economy, win/lose) live
/// in the native TowerEngine library; this module is the only place that
/// talks to it. `Simulation` captures the versioned call contract so the
/// rest of the controller never touches a raw handle, and so tests can
/// substitute a scripted implementation.

pub mod ffi;
pub mod snapshot;

#[cfg(test)]
pub mod fake;

use snapshot::{EffectRecord, PlantRecord, ProjectileRecord, ZombieRecord};

/// Outcome of a build or dig request.
///
/// The engine gives no direct success signal for these two calls; the
/// contract is to diff the plant count before and after. A strict increase
/// means a build landed, a strict decrease means a removal landed, and no
/// change is a silent rejection (insufficient funds, occupied cell,
/// cooldown — indistinguishable from here).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActionOutcome {
    Accepted,
    Rejected,
}

impl ActionOutcome {
    pub fn accepted(self) -> bool {
        self == ActionOutcome::Accepted
    }
}

pub trait Simulation {
    // ── Lifecycle ──
    fn load_level(&mut self, level: u32);
    fn advance(&mut self, dt_seconds: f32);

    // ── Scalar queries ──
    fn money(&self) -> i32;
    fn lives(&self) -> i32;
    fn map_width(&self) -> i32;
    fn map_height(&self) -> i32;
    fn level_complete(&self) -> bool;
    fn game_over(&self) -> bool;
    fn card_cooldown_fraction(&self, card: usize) -> f32;

    // ── Bulk entity access (index in 0..count, this frame only) ──
    fn plant_count(&self) -> usize;
    fn plant_at(&self, index: usize) -> Option<PlantRecord>;
    fn zombie_count(&self) -> usize;
    fn zombie_at(&self, index: usize) -> Option<ZombieRecord>;
    fn projectile_count(&self) -> usize;
    fn projectile_at(&self, index: usize) -> Option<ProjectileRecord>;
    fn effect_count(&self) -> usize;
    fn effect_at(&self, index: usize) -> Option<EffectRecord>;

    // ── Action requests (no direct success signal, see ActionOutcome) ──
    fn try_build_plant(&mut self, x: f32, y: f32, plant_index: usize);
    fn remove_plant(&mut self, x: f32, y: f32);

    // ── Sound event queue ──
    fn sound_event_count(&self) -> usize;
    fn sound_event_code(&self, index: usize) -> i32;

    // ── Derived operations ──

    /// Request a build and report whether it landed, per the count-diff
    /// contract. Computed once here so feedback logic never re-derives it.
    fn attempt_placement(&mut self, x: f32, y: f32, plant_index: usize) -> ActionOutcome {
        let before = self.plant_count();
        self.try_build_plant(x, y, plant_index);
        if self.plant_count() > before {
            ActionOutcome::Accepted
        } else {
            ActionOutcome::Rejected
        }
    }

    /// Request a removal; accepted iff the plant count strictly decreased.
    fn attempt_removal(&mut self, x: f32, y: f32) -> ActionOutcome {
        let before = self.plant_count();
        self.remove_plant(x, y);
        if self.plant_count() < before {
            ActionOutcome::Accepted
        } else {
            ActionOutcome::Rejected
        }
    }

    /// Drain up to `bound` codes from the engine's sound event queue.
    /// The engine drops drained events; each occurrence is seen once.
    fn drain_sound_events(&mut self, bound: usize) -> Vec<i32> {
        let count = self.sound_event_count().min(bound);
        (0..count).map(|i| self.sound_event_code(i)).collect()
    }
}
