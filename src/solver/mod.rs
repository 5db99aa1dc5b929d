//! Backtracking solver for harvested queens boards.
//!
//! Places exactly one queen per color region, subject to: one queen per
//! row, one per column, and no two queens in adjacent cells (full
//! 8-neighborhood). Diagonals beyond immediate adjacency are allowed.
//! Each color's domain is its own cell list, so the color constraint
//! never needs checking during search.
//!
//! Validity is O(1) per candidate via row/column flags and a per-cell
//! adjacency reference count, updated as queens are placed and removed.

use crate::summary::ColorMap;

/// One placed queen in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queen {
    pub symbol: char,
    pub color: String,
    pub row: u32,
    pub col: u32,
}

/// A complete assignment, one queen per color, in color-symbol order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub queens: Vec<Queen>,
}

impl Solution {
    /// Render the board with `Q` at queen positions and the color symbol
    /// elsewhere, mirroring the plain grid layout.
    pub fn render(&self, map: &ColorMap) -> String {
        let size = map.size() as usize;
        let mut grid: Vec<Vec<char>> = map
            .render_grid()
            .lines()
            .map(|line| line.split(' ').filter_map(|s| s.chars().next()).collect())
            .collect();
        grid.resize(size, vec!['.'; size]);

        for queen in &self.queens {
            let (row, col) = (queen.row as usize, queen.col as usize);
            if row < size && col < size {
                grid[row][col] = 'Q';
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

/// Search counters for one solve run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub steps: u64,
    pub backtracks: u64,
}

/// Depth-first backtracking search over color domains.
pub struct BacktrackingSolver {
    size: usize,
    /// Per color: symbol, color string, candidate positions.
    domains: Vec<(char, String, Vec<(u32, u32)>)>,
    row_used: Vec<bool>,
    col_used: Vec<bool>,
    adjacent_count: Vec<Vec<u32>>,
    occupied: Vec<Vec<bool>>,
    stats: SolveStats,
}

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl BacktrackingSolver {
    /// Build a solver over a board's color map. Domains are tried in
    /// symbol order, candidates in sorted cell order, so the search is
    /// deterministic.
    pub fn new(map: &ColorMap) -> Self {
        let size = map.size() as usize;
        let domains = map
            .groups()
            .iter()
            .map(|g| (g.symbol, g.color.clone(), g.cells.clone()))
            .collect();
        Self {
            size,
            domains,
            row_used: vec![false; size],
            col_used: vec![false; size],
            adjacent_count: vec![vec![0; size]; size],
            occupied: vec![vec![false; size]; size],
            stats: SolveStats::default(),
        }
    }

    /// Run the search. Returns the first solution found, or `None` when
    /// no assignment satisfies the constraints.
    pub fn solve(&mut self) -> Option<Solution> {
        let mut chosen: Vec<usize> = Vec::with_capacity(self.domains.len());
        if self.place_queens(0, &mut chosen) {
            let queens = chosen
                .iter()
                .zip(&self.domains)
                .map(|(&i, (symbol, color, cells))| Queen {
                    symbol: *symbol,
                    color: color.clone(),
                    row: cells[i].0,
                    col: cells[i].1,
                })
                .collect();
            Some(Solution { queens })
        } else {
            None
        }
    }

    pub fn stats(&self) -> SolveStats {
        self.stats
    }

    fn place_queens(&mut self, color_index: usize, chosen: &mut Vec<usize>) -> bool {
        if color_index == self.domains.len() {
            return true;
        }
        self.stats.steps += 1;

        for i in 0..self.domains[color_index].2.len() {
            let (row, col) = self.domains[color_index].2[i];
            let (row, col) = (row as usize, col as usize);
            if row >= self.size || col >= self.size || !self.is_valid(row, col) {
                continue;
            }

            self.place(row, col);
            chosen.push(i);

            if self.place_queens(color_index + 1, chosen) {
                return true;
            }

            self.stats.backtracks += 1;
            chosen.pop();
            self.remove(row, col);
        }

        false
    }

    fn is_valid(&self, row: usize, col: usize) -> bool {
        !self.occupied[row][col]
            && !self.row_used[row]
            && !self.col_used[col]
            && self.adjacent_count[row][col] == 0
    }

    fn place(&mut self, row: usize, col: usize) {
        self.occupied[row][col] = true;
        self.row_used[row] = true;
        self.col_used[col] = true;
        self.for_each_neighbor(row, col, |count| *count += 1);
    }

    fn remove(&mut self, row: usize, col: usize) {
        self.occupied[row][col] = false;
        self.row_used[row] = false;
        self.col_used[col] = false;
        self.for_each_neighbor(row, col, |count| *count = count.saturating_sub(1));
    }

    fn for_each_neighbor(&mut self, row: usize, col: usize, apply: impl Fn(&mut u32)) {
        for (dr, dc) in NEIGHBORS {
            let r = row as i64 + dr;
            let c = col as i64 + dc;
            if r >= 0 && (r as usize) < self.size && c >= 0 && (c as usize) < self.size {
                apply(&mut self.adjacent_count[r as usize][c as usize]);
            }
        }
    }
}
