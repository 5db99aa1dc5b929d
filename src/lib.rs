//! boardlift — drive a headless Chromium to extract puzzle-board color
//! grids and persist each board as a JSON file.
//!
//! One sequential enumeration over `(size, level)` pairs; per pair the
//! harvester navigates to the puzzle page, waits for the board cells to
//! render, reads their row/column attributes and resolved background
//! colors, sorts them, and writes `boards/{size}x{size}_level{level}.json`.

pub mod cli;
pub mod extraction;
pub mod harvest;
pub mod persist;
pub mod renderer;
pub mod solver;
pub mod summary;
