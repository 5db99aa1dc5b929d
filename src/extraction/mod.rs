//! Board extraction from rendered puzzle pages.

pub mod board;

pub use board::{BoardCell, BoardExtractor, ExtractError};
