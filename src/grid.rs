/// Coordinate transforms between simulation space and terminal screen space.
///
/// The simulation reports positions in its own units (one lawn tile is
/// `sim_tile_w` × `sim_tile_h` units); the terminal draws the lawn as a
/// grid of character cells starting at `origin`. Both directions of the
/// mapping live here so the rest of the code never does tile math inline.

use crate::config::GridConfig;

/// A lawn cell, column/row. May be out of bounds — callers check.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

#[derive(Clone, Debug)]
pub struct GridGeometry {
    /// Top-left terminal cell of lawn cell (0,0).
    pub origin_x: u16,
    pub origin_y: u16,
    /// Terminal cells per lawn tile.
    pub tile_w: u16,
    pub tile_h: u16,
    /// Simulation units per lawn tile.
    pub sim_tile_w: f32,
    pub sim_tile_h: f32,
}

impl GridGeometry {
    pub fn new(cfg: &GridConfig) -> Self {
        GridGeometry {
            origin_x: cfg.origin_x,
            origin_y: cfg.origin_y,
            tile_w: cfg.tile_w,
            tile_h: cfg.tile_h,
            sim_tile_w: cfg.sim_tile_w,
            sim_tile_h: cfg.sim_tile_h,
        }
    }

    /// Simulation position → terminal cell (the anchor point of a sprite).
    pub fn sim_to_screen(&self, sim_x: f32, sim_y: f32) -> (i32, i32) {
        let gx = sim_x / self.sim_tile_w;
        let gy = sim_y / self.sim_tile_h;
        (
            self.origin_x as i32 + (gx * self.tile_w as f32) as i32,
            self.origin_y as i32 + (gy * self.tile_h as f32) as i32,
        )
    }

    /// Terminal cell (e.g. a mouse click) → lawn cell. Inverse of
    /// `cell_to_screen` for every cell inside the map bounds.
    pub fn screen_to_cell(&self, screen_x: u16, screen_y: u16) -> Cell {
        let rel_x = screen_x as i32 - self.origin_x as i32;
        let rel_y = screen_y as i32 - self.origin_y as i32;
        Cell {
            col: rel_x.div_euclid(self.tile_w as i32),
            row: rel_y.div_euclid(self.tile_h as i32),
        }
    }

    /// Lawn cell → top-left terminal cell of that tile.
    pub fn cell_to_screen(&self, cell: Cell) -> (i32, i32) {
        (
            self.origin_x as i32 + cell.col * self.tile_w as i32,
            self.origin_y as i32 + cell.row * self.tile_h as i32,
        )
    }

    /// Lawn cell → simulation position at the tile center. Build and
    /// dig requests are issued at tile centers.
    pub fn cell_to_sim(&self, cell: Cell) -> (f32, f32) {
        (
            cell.col as f32 * self.sim_tile_w + self.sim_tile_w / 2.0,
            cell.row as f32 * self.sim_tile_h + self.sim_tile_h / 2.0,
        )
    }
}
