//! Color grouping and ASCII rendering of a harvested board.
//!
//! Each distinct color gets a symbol letter (`A`, `B`, ...) in first-seen
//! order over the sorted board, so the assignment is deterministic for
//! identical board files.

use crate::extraction::BoardCell;

/// All cells of one color, with its assigned symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGroup {
    pub color: String,
    pub symbol: char,
    pub cells: Vec<(u32, u32)>,
}

/// Groups a board's cells by display color.
pub struct ColorMap {
    size: u32,
    groups: Vec<ColorGroup>,
}

impl ColorMap {
    /// Build the color map from sorted cells. Symbols wrap past `Z` in
    /// the unlikely case of more than 26 colors.
    pub fn new(size: u32, cells: &[BoardCell]) -> Self {
        let mut groups: Vec<ColorGroup> = Vec::new();
        for cell in cells {
            match groups.iter_mut().find(|g| g.color == cell.color) {
                Some(group) => group.cells.push((cell.row, cell.col)),
                None => {
                    let symbol = (b'A' + (groups.len() % 26) as u8) as char;
                    groups.push(ColorGroup {
                        color: cell.color.clone(),
                        symbol,
                        cells: vec![(cell.row, cell.col)],
                    });
                }
            }
        }
        Self { size, groups }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn groups(&self) -> &[ColorGroup] {
        &self.groups
    }

    pub fn symbol_for(&self, color: &str) -> Option<char> {
        self.groups
            .iter()
            .find(|g| g.color == color)
            .map(|g| g.symbol)
    }

    /// Render the board as a `size` x `size` grid of symbols, `.` for
    /// positions with no cell. Out-of-range positions are ignored.
    pub fn render_grid(&self) -> String {
        let size = self.size as usize;
        let mut grid = vec![vec!['.'; size]; size];
        for group in &self.groups {
            for &(row, col) in &group.cells {
                if (row as usize) < size && (col as usize) < size {
                    grid[row as usize][col as usize] = group.symbol;
                }
            }
        }

        let mut out = String::new();
        for row in grid {
            let line: Vec<String> = row.into_iter().map(|c| c.to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: u32, col: u32, color: &str) -> BoardCell {
        BoardCell {
            row,
            col,
            color: color.to_string(),
        }
    }

    #[test]
    fn first_color_in_sorted_order_gets_a() {
        let cells = vec![
            cell(0, 0, "rgb(255, 0, 0)"),
            cell(0, 1, "rgb(0, 0, 255)"),
            cell(1, 0, "rgb(0, 0, 255)"),
            cell(1, 1, "rgb(255, 0, 0)"),
        ];
        let map = ColorMap::new(2, &cells);

        assert_eq!(map.symbol_for("rgb(255, 0, 0)"), Some('A'));
        assert_eq!(map.symbol_for("rgb(0, 0, 255)"), Some('B'));
        assert_eq!(map.symbol_for("rgb(0, 255, 0)"), None);
    }

    #[test]
    fn grid_renders_symbols_and_gaps() {
        let cells = vec![
            cell(0, 0, "red"),
            cell(0, 1, "blue"),
            cell(1, 1, "red"),
        ];
        let map = ColorMap::new(2, &cells);
        assert_eq!(map.render_grid(), "A B\n. A\n");
    }

    #[test]
    fn groups_count_cells_per_color() {
        let cells = vec![
            cell(0, 0, "red"),
            cell(0, 1, "red"),
            cell(1, 0, "blue"),
        ];
        let map = ColorMap::new(2, &cells);

        assert_eq!(map.groups().len(), 2);
        assert_eq!(map.groups()[0].cells.len(), 2);
        assert_eq!(map.groups()[1].cells.len(), 1);
    }
}
