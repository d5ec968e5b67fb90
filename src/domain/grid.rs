// Grid placement model - bounds and collision checks for boxes
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const GRID_WIDTH: u32 = 6;
pub const GRID_HEIGHT: u32 = 4;

/// Box sizes offered by the editor palette (width, height).
pub const PALETTE: [BoxSize; 6] = [
    BoxSize { w: 2, h: 2 },
    BoxSize { w: 2, h: 1 },
    BoxSize { w: 4, h: 1 },
    BoxSize { w: 6, h: 1 },
    BoxSize { w: 3, h: 3 },
    BoxSize { w: 4, h: 4 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const STANDARD: GridSize = GridSize {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
    };

    pub fn cell_count(&self) -> u32 {
        self.width * self.height
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Rectangle of unit cells, half-open: `[x, x+w) × [y, y+h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Footprint {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn intersects(&self, other: &Footprint) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn contains_cell(&self, col: u32, row: u32) -> bool {
        col >= self.x && col < self.right() && row >= self.y && row < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("box {w}x{h} at ({x},{y}) does not fit the {grid_width}x{grid_height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        grid_width: u32,
        grid_height: u32,
    },

    #[error("space is occupied by box #{}", .index + 1)]
    Occupied { index: usize },

    #[error("box must span at least one cell in each direction")]
    EmptySpan,
}

/// Decide whether `candidate` may be placed next to `existing`.
///
/// Bounds are checked before collisions, so a candidate that both overflows
/// and overlaps is reported as `OutOfBounds`. `Occupied` carries the position
/// of the first colliding footprint in `existing`.
pub fn can_place<I>(existing: I, candidate: Footprint, grid: GridSize) -> Result<(), PlacementError>
where
    I: IntoIterator<Item = Footprint>,
{
    if candidate.w == 0 || candidate.h == 0 {
        return Err(PlacementError::EmptySpan);
    }

    if candidate.right() > grid.width || candidate.bottom() > grid.height {
        return Err(PlacementError::OutOfBounds {
            x: candidate.x,
            y: candidate.y,
            w: candidate.w,
            h: candidate.h,
            grid_width: grid.width,
            grid_height: grid.height,
        });
    }

    match existing
        .into_iter()
        .position(|placed| candidate.intersects(&placed))
    {
        Some(index) => Err(PlacementError::Occupied { index }),
        None => Ok(()),
    }
}

/// Resolve a row-major cell index to `(col, row)`.
pub fn cell_at(index: u32, grid: GridSize) -> Option<(u32, u32)> {
    if grid.width == 0 || index >= grid.cell_count() {
        return None;
    }
    Some((index % grid.width, index / grid.width))
}

/// Number of unit cells not covered by any footprint.
pub fn free_cells<I>(placed: I, grid: GridSize) -> u32
where
    I: IntoIterator<Item = Footprint>,
{
    let placed: Vec<Footprint> = placed.into_iter().collect();
    (0..grid.cell_count())
        .filter_map(|index| cell_at(index, grid))
        .filter(|&(col, row)| !placed.iter().any(|f| f.contains_cell(col, row)))
        .count() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxSize {
    pub w: u32,
    pub h: u32,
}

impl BoxSize {
    pub fn at(&self, x: u32, y: u32) -> Footprint {
        Footprint::new(x, y, self.w, self.h)
    }
}

impl fmt::Display for BoxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoxSizeError {
    #[error("expected a size like 2x2, got '{0}'")]
    Malformed(String),

    #[error("size {0} is not in the palette")]
    NotInPalette(BoxSize),
}

impl FromStr for BoxSize {
    type Err = BoxSizeError;

    /// Parses `WxH` and only accepts sizes from [`PALETTE`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BoxSizeError::Malformed(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X', '×']).ok_or_else(malformed)?;
        let size = BoxSize {
            w: w.trim().parse().map_err(|_| malformed())?,
            h: h.trim().parse().map_err(|_| malformed())?,
        };

        if PALETTE.contains(&size) {
            Ok(size)
        } else {
            Err(BoxSizeError::NotInPalette(size))
        }
    }
}
