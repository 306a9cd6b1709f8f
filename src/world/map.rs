use std::str::FromStr;

use glam::Vec2;
use thiserror::Error;

/// Map cell code: `0` is walkable floor, anything else is a wall material.
pub type Cell = u16;

pub const EMPTY: Cell = 0;

/// Reasons a grid cannot become a [`Map`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no cells")]
    Empty,

    #[error("map row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Rays would be able to leave the grid through this cell.
    #[error("border cell ({x}, {y}) is walkable; the outer ring must be solid")]
    OpenBorder { x: usize, y: usize },

    #[error("line {line}: `{token}` is not a cell code")]
    Parse { line: usize, token: String },
}

/// Rectangular grid of cell codes, row-major, `y` grows downwards.
///
/// Construction guarantees a solid outer ring so every ray terminates
/// inside the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    w: usize,
    h: usize,
    cells: Vec<Cell>,
}

impl Map {
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, MapError> {
        let h = rows.len();
        let w = rows.first().map_or(0, |r| r.as_ref().len());
        if h == 0 || w == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(w * h);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != w {
                return Err(MapError::Ragged {
                    row,
                    expected: w,
                    found: r.len(),
                });
            }
            cells.extend_from_slice(r);
        }

        let map = Self { w, h, cells };
        map.check_border()?;
        Ok(map)
    }

    fn check_border(&self) -> Result<(), MapError> {
        let ring = (0..self.w)
            .flat_map(|x| [(x, 0), (x, self.h - 1)])
            .chain((0..self.h).flat_map(|y| [(0, y), (self.w - 1, y)]));
        for (x, y) in ring {
            if self.cells[y * self.w + x] == EMPTY {
                return Err(MapError::OpenBorder { x, y });
            }
        }
        Ok(())
    }

    /// The 10×10 demo room: solid border of material 2 with a few pillars.
    pub fn reference() -> Self {
        const ROWS: [[Cell; 10]; 10] = [
            [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
            [2, 0, 0, 0, 0, 0, 0, 0, 0, 2],
            [2, 0, 0, 0, 0, 0, 0, 0, 0, 2],
            [2, 0, 0, 2, 2, 0, 2, 0, 0, 2],
            [2, 0, 0, 2, 0, 0, 2, 0, 0, 2],
            [2, 0, 0, 2, 0, 0, 2, 0, 0, 2],
            [2, 0, 0, 2, 0, 2, 2, 0, 0, 2],
            [2, 0, 0, 0, 0, 0, 0, 0, 0, 2],
            [2, 0, 0, 0, 0, 0, 0, 0, 0, 2],
            [2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        ];
        // the constant grid is rectangular and closed
        Self {
            w: 10,
            h: 10,
            cells: ROWS.concat(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// Cell at integer grid coordinates, `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return None;
        }
        Some(self.cells[y as usize * self.w + x as usize])
    }

    /// Cell under a continuous world position.
    #[inline]
    pub fn cell_at(&self, p: Vec2) -> Option<Cell> {
        self.get(p.x.floor() as i32, p.y.floor() as i32)
    }

    /// `true` if `p` lies inside `[0, w) × [0, h)`.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.w as f32 && p.y < self.h as f32
    }

    /// Walkable test used by collision; cells outside the grid block.
    #[inline]
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(EMPTY)
    }

    /// Every `(x, y, code)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &c)| (i % self.w, i / self.w, c))
    }
}

/// Text grid: one row per line, codes separated by whitespace or commas.
/// Blank lines and `#` comments are ignored.
impl FromStr for Map {
    type Err = MapError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (n, line) in src.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(|t| {
                    t.parse::<Cell>().map_err(|_| MapError::Parse {
                        line: n + 1,
                        token: t.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
