/// Runtime binding to the native TowerEngine library.
///
/// The library is loaded with `libloading` at startup; if it cannot be
/// located or any symbol is missing, `NativeEngine::load` fails and main
/// exits non-zero before the frame loop starts. Every exported function
/// takes the opaque handle returned by `Engine_Create`; the handle is
/// released on drop.
///
/// All foreign-memory interpretation happens here and in the `#[repr(C)]`
/// records of `snapshot.rs` — nothing else in the crate is unsafe.

use std::os::raw::{c_float, c_int, c_void};
use std::path::Path;

use libloading::Library;

use crate::engine::snapshot::{EffectRecord, PlantRecord, ProjectileRecord, ZombieRecord};
use crate::engine::Simulation;

type CreateFn = unsafe extern "C" fn() -> *mut c_void;
type DestroyFn = unsafe extern "C" fn(*mut c_void);
type LoadLevelFn = unsafe extern "C" fn(*mut c_void, c_int);
type AdvanceFn = unsafe extern "C" fn(*mut c_void, c_float);
type BuildFn = unsafe extern "C" fn(*mut c_void, c_float, c_float, c_int);
type RemoveFn = unsafe extern "C" fn(*mut c_void, c_float, c_float);
type IntQueryFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type BoolQueryFn = unsafe extern "C" fn(*mut c_void) -> bool;
type PlantDataFn = unsafe extern "C" fn(*mut c_void, c_int, *mut PlantRecord) -> bool;
type ZombieDataFn = unsafe extern "C" fn(*mut c_void, c_int, *mut ZombieRecord) -> bool;
type ProjectileDataFn = unsafe extern "C" fn(*mut c_void, c_int, *mut ProjectileRecord) -> bool;
type EffectDataFn = unsafe extern "C" fn(*mut c_void, c_int, *mut EffectRecord) -> bool;
type CooldownFn = unsafe extern "C" fn(*mut c_void, c_int) -> c_float;
type SoundDataFn = unsafe extern "C" fn(*mut c_void, c_int) -> c_int;

/// Function pointers resolved once at load time. Valid for as long as the
/// owning `Library` stays alive; `NativeEngine` keeps both together.
struct Api {
    create: CreateFn,
    destroy: DestroyFn,
    load_level: LoadLevelFn,
    advance: AdvanceFn,
    try_build: BuildFn,
    remove: RemoveFn,
    get_money: IntQueryFn,
    get_lives: IntQueryFn,
    get_map_width: IntQueryFn,
    get_map_height: IntQueryFn,
    is_level_complete: BoolQueryFn,
    is_game_over: BoolQueryFn,
    plant_count: IntQueryFn,
    plant_data: PlantDataFn,
    zombie_count: IntQueryFn,
    zombie_data: ZombieDataFn,
    projectile_count: IntQueryFn,
    projectile_data: ProjectileDataFn,
    effect_count: IntQueryFn,
    effect_data: EffectDataFn,
    card_cooldown: CooldownFn,
    sound_count: IntQueryFn,
    sound_data: SoundDataFn,
}

pub struct NativeEngine {
    handle: *mut c_void,
    api: Api,
    // Dropped last; the fn pointers in `api` dangle without it.
    _lib: Library,
}

impl NativeEngine {
    /// Load the engine library and create a simulation handle.
    ///
    /// `name` may be a bare library name ("TowerEngine", decorated per
    /// platform) or an explicit path/file name.
    pub fn load(name: &str) -> Result<Self, libloading::Error> {
        let bare = !name.contains('.') && !Path::new(name).is_absolute();
        let lib = if bare {
            unsafe { Library::new(libloading::library_filename(name))? }
        } else {
            unsafe { Library::new(name)? }
        };

        let api = unsafe {
            Api {
                create: *lib.get(b"Engine_Create\0")?,
                destroy: *lib.get(b"Engine_Destroy\0")?,
                load_level: *lib.get(b"Engine_LoadLevel\0")?,
                advance: *lib.get(b"Engine_Update\0")?,
                try_build: *lib.get(b"Engine_TryBuildPlant\0")?,
                remove: *lib.get(b"Engine_RemovePlant\0")?,
                get_money: *lib.get(b"Engine_GetMoney\0")?,
                get_lives: *lib.get(b"Engine_GetLives\0")?,
                get_map_width: *lib.get(b"Engine_GetMapWidth\0")?,
                get_map_height: *lib.get(b"Engine_GetMapHeight\0")?,
                is_level_complete: *lib.get(b"Engine_IsLevelComplete\0")?,
                is_game_over: *lib.get(b"Engine_IsGameOver\0")?,
                plant_count: *lib.get(b"Engine_GetPlantCount\0")?,
                plant_data: *lib.get(b"Engine_GetPlantData\0")?,
                zombie_count: *lib.get(b"Engine_GetZombieCount\0")?,
                zombie_data: *lib.get(b"Engine_GetZombieData\0")?,
                projectile_count: *lib.get(b"Engine_GetProjectileCount\0")?,
                projectile_data: *lib.get(b"Engine_GetProjectileData\0")?,
                effect_count: *lib.get(b"Engine_GetEffectCount\0")?,
                effect_data: *lib.get(b"Engine_GetEffectData\0")?,
                card_cooldown: *lib.get(b"Engine_GetCardCooldownPct\0")?,
                sound_count: *lib.get(b"Engine_GetSoundCount\0")?,
                sound_data: *lib.get(b"Engine_GetSoundData\0")?,
            }
        };

        let handle = unsafe { (api.create)() };
        Ok(NativeEngine { handle, api, _lib: lib })
    }

    fn count(&self, f: IntQueryFn) -> usize {
        let n = unsafe { f(self.handle) };
        n.max(0) as usize
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        unsafe { (self.api.destroy)(self.handle) };
    }
}

impl Simulation for NativeEngine {
    fn load_level(&mut self, level: u32) {
        unsafe { (self.api.load_level)(self.handle, level as c_int) }
    }

    fn advance(&mut self, dt_seconds: f32) {
        unsafe { (self.api.advance)(self.handle, dt_seconds) }
    }

    fn money(&self) -> i32 {
        unsafe { (self.api.get_money)(self.handle) }
    }

    fn lives(&self) -> i32 {
        unsafe { (self.api.get_lives)(self.handle) }
    }

    fn map_width(&self) -> i32 {
        unsafe { (self.api.get_map_width)(self.handle) }
    }

    fn map_height(&self) -> i32 {
        unsafe { (self.api.get_map_height)(self.handle) }
    }

    fn level_complete(&self) -> bool {
        unsafe { (self.api.is_level_complete)(self.handle) }
    }

    fn game_over(&self) -> bool {
        unsafe { (self.api.is_game_over)(self.handle) }
    }

    fn card_cooldown_fraction(&self, card: usize) -> f32 {
        let pct = unsafe { (self.api.card_cooldown)(self.handle, card as c_int) };
        pct.clamp(0.0, 1.0)
    }

    fn plant_count(&self) -> usize {
        self.count(self.api.plant_count)
    }

    fn plant_at(&self, index: usize) -> Option<PlantRecord> {
        let mut out = PlantRecord::default();
        let ok = unsafe { (self.api.plant_data)(self.handle, index as c_int, &mut out) };
        ok.then_some(out)
    }

    fn zombie_count(&self) -> usize {
        self.count(self.api.zombie_count)
    }

    fn zombie_at(&self, index: usize) -> Option<ZombieRecord> {
        let mut out = ZombieRecord::default();
        let ok = unsafe { (self.api.zombie_data)(self.handle, index as c_int, &mut out) };
        ok.then_some(out)
    }

    fn projectile_count(&self) -> usize {
        self.count(self.api.projectile_count)
    }

    fn projectile_at(&self, index: usize) -> Option<ProjectileRecord> {
        let mut out = ProjectileRecord::default();
        let ok = unsafe { (self.api.projectile_data)(self.handle, index as c_int, &mut out) };
        ok.then_some(out)
    }

    fn effect_count(&self) -> usize {
        self.count(self.api.effect_count)
    }

    fn effect_at(&self, index: usize) -> Option<EffectRecord> {
        let mut out = EffectRecord::default();
        let ok = unsafe { (self.api.effect_data)(self.handle, index as c_int, &mut out) };
        ok.then_some(out)
    }

    fn try_build_plant(&mut self, x: f32, y: f32, plant_index: usize) {
        unsafe { (self.api.try_build)(self.handle, x, y, plant_index as c_int) }
    }

    fn remove_plant(&mut self, x: f32, y: f32) {
        unsafe { (self.api.remove)(self.handle, x, y) }
    }

    fn sound_event_count(&self) -> usize {
        self.count(self.api.sound_count)
    }

    fn sound_event_code(&self, index: usize) -> i32 {
        unsafe { (self.api.sound_data)(self.handle, index as c_int) }
    }
}
