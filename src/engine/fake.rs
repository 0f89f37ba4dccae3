/// Scripted in-process simulation for tests.
///
/// Implements the same contract as the native engine, with knobs for the
/// behaviors the controller has to react to: silent build/dig rejection,
/// completion and game-over flags, and a pre-loaded sound event queue.

use crate::engine::snapshot::{EffectRecord, PlantRecord, ProjectileRecord, ZombieRecord};
use crate::engine::Simulation;

pub struct ScriptedSimulation {
    pub loaded_level: Option<u32>,
    pub advanced_by: Vec<f32>,
    pub money: i32,
    pub lives: i32,
    pub map_w: i32,
    pub map_h: i32,
    pub level_complete: bool,
    pub game_over: bool,
    pub accept_builds: bool,
    pub accept_removals: bool,
    pub plants: Vec<PlantRecord>,
    pub zombies: Vec<ZombieRecord>,
    pub projectiles: Vec<ProjectileRecord>,
    pub effects: Vec<EffectRecord>,
    pub sound_queue: Vec<i32>,
    pub cooldowns: Vec<f32>,
}

impl ScriptedSimulation {
    pub fn new() -> Self {
        ScriptedSimulation {
            loaded_level: None,
            advanced_by: Vec::new(),
            money: 50,
            lives: 5,
            map_w: 9,
            map_h: 5,
            level_complete: false,
            game_over: false,
            accept_builds: true,
            accept_removals: true,
            plants: Vec::new(),
            zombies: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            sound_queue: Vec::new(),
            cooldowns: vec![0.0; 6],
        }
    }
}

impl Simulation for ScriptedSimulation {
    fn load_level(&mut self, level: u32) {
        self.loaded_level = Some(level);
        self.level_complete = false;
        self.game_over = false;
        self.plants.clear();
        self.zombies.clear();
        self.projectiles.clear();
        self.effects.clear();
        self.sound_queue.clear();
    }

    fn advance(&mut self, dt_seconds: f32) {
        self.advanced_by.push(dt_seconds);
    }

    fn money(&self) -> i32 {
        self.money
    }

    fn lives(&self) -> i32 {
        self.lives
    }

    fn map_width(&self) -> i32 {
        self.map_w
    }

    fn map_height(&self) -> i32 {
        self.map_h
    }

    fn level_complete(&self) -> bool {
        self.level_complete
    }

    fn game_over(&self) -> bool {
        self.game_over
    }

    fn card_cooldown_fraction(&self, card: usize) -> f32 {
        self.cooldowns.get(card).copied().unwrap_or(0.0)
    }

    fn plant_count(&self) -> usize {
        self.plants.len()
    }

    fn plant_at(&self, index: usize) -> Option<PlantRecord> {
        self.plants.get(index).copied()
    }

    fn zombie_count(&self) -> usize {
        self.zombies.len()
    }

    fn zombie_at(&self, index: usize) -> Option<ZombieRecord> {
        self.zombies.get(index).copied()
    }

    fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    fn projectile_at(&self, index: usize) -> Option<ProjectileRecord> {
        self.projectiles.get(index).copied()
    }

    fn effect_count(&self) -> usize {
        self.effects.len()
    }

    fn effect_at(&self, index: usize) -> Option<EffectRecord> {
        self.effects.get(index).copied()
    }

    fn try_build_plant(&mut self, x: f32, y: f32, plant_index: usize) {
        if self.accept_builds {
            self.plants.push(PlantRecord {
                x,
                y,
                kind: plant_index as i32,
                health: 100.0,
                max_health: 100.0,
                timer: 0.0,
                max_timer: 1.0,
            });
        }
    }

    fn remove_plant(&mut self, x: f32, y: f32) {
        if self.accept_removals {
            if let Some(i) = self
                .plants
                .iter()
                .position(|p| (p.x - x).abs() < 1.0 && (p.y - y).abs() < 1.0)
            {
                self.plants.remove(i);
            } else if !self.plants.is_empty() {
                self.plants.pop();
            }
        }
    }

    fn sound_event_count(&self) -> usize {
        self.sound_queue.len()
    }

    fn sound_event_code(&self, index: usize) -> i32 {
        self.sound_queue.get(index).copied().unwrap_or(0)
    }

    // The native engine clears its queue after the frame that drained it;
    // the fake drops drained codes eagerly so tests never see a re-report.
    fn drain_sound_events(&mut self, bound: usize) -> Vec<i32> {
        let count = self.sound_queue.len().min(bound);
        self.sound_queue.drain(..count).collect()
    }
}
