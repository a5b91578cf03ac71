//! A finder's private record of visited cells.
//!
//! The grid is addressed in its own index space, `(0, 0)` being the top-left cell. The finder
//! keeps an offset next to it so that `index = relative - offset`; prepending a row or column
//! shifts every index by one and the offset absorbs the shift.

use crate::coords::{
    point_in_borders, point_with_delta, Borders, Coord, Delta, Direction, Point, RelativePoint,
};
use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExploredMap")]
pub struct ExploredMap {
    width: usize,
    height: usize,
    // row-major
    cells: Vec<bool>,
}

#[derive(Deserialize)]
struct RawExploredMap {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl TryFrom<RawExploredMap> for ExploredMap {
    type Error = GridError;

    fn try_from(raw: RawExploredMap) -> Result<Self, Self::Error> {
        if raw.width.checked_mul(raw.height) != Some(raw.cells.len()) {
            return Err(GridError::CellCountMismatch {
                width: raw.width,
                height: raw.height,
                len: raw.cells.len(),
            });
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            cells: raw.cells,
        })
    }
}

impl ExploredMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// 3x3 grid with only the center marked, the memory a finder spawns with.
    pub fn spawn_area() -> Self {
        let mut map = Self::new(3, 3);
        map.cells[4] = true;
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn explored_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Value at a grid index, `None` when the index is outside the grid.
    pub fn get<P: Coord>(&self, point: P) -> Option<bool> {
        self.index_of(point.to_point()).map(|i| self.cells[i])
    }

    pub fn set_box_value<P: Coord>(&self, point: P, value: bool) -> Result<Self, GridError> {
        let p = point.to_point();
        let idx = self.index_of(p).ok_or(GridError::IndexOutOfRange {
            x: p.x,
            y: p.y,
            width: self.width,
            height: self.height,
        })?;
        let mut next = self.clone();
        next.cells[idx] = value;
        Ok(next)
    }

    /// Adds one unexplored row or column on the `direction` side. The returned delta must be
    /// added to the owner's offset: prepending at the top or left moves every old cell down or
    /// right by one index.
    pub fn append_line(&self, direction: Direction) -> (Self, Delta) {
        let map = match direction {
            Direction::Top | Direction::Bottom => self.append_row(direction),
            Direction::Left | Direction::Right => self.append_column(direction),
        };
        let offset = match direction {
            Direction::Top => Delta::new(0, -1),
            Direction::Left => Delta::new(-1, 0),
            Direction::Bottom | Direction::Right => Delta::ZERO,
        };
        (map, offset)
    }

    fn append_row(&self, direction: Direction) -> Self {
        let blank = vec![false; self.width];
        let cells = if direction == Direction::Top {
            blank.into_iter().chain(self.cells.iter().copied()).collect()
        } else {
            self.cells.iter().copied().chain(blank).collect()
        };
        Self {
            width: self.width,
            height: self.height + 1,
            cells,
        }
    }

    fn append_column(&self, direction: Direction) -> Self {
        let width = self.width + 1;
        let mut cells = Vec::with_capacity(width * self.height);
        for row in self.rows().take(self.height) {
            if direction == Direction::Left {
                cells.push(false);
                cells.extend_from_slice(row);
            } else {
                cells.extend_from_slice(row);
                cells.push(false);
            }
        }
        Self {
            width,
            height: self.height,
            cells,
        }
    }

    /// The grid extent in the owner's relative frame.
    pub fn relative_borders(&self, offset: Delta) -> Borders {
        Borders {
            top: offset.dy,
            left: offset.dx,
            bottom: self.height as i32 + offset.dy,
            right: self.width as i32 + offset.dx,
        }
    }

    pub fn to_relative(&self, anchor: RelativePoint) -> ExploredMapRelative {
        let mut cells = BTreeMap::new();
        for (y, row) in self.rows().take(self.height).enumerate() {
            for (x, &value) in row.iter().enumerate() {
                let key = RelativePoint::new(x as i32 - anchor.rx, y as i32 - anchor.ry);
                cells.insert(key, value);
            }
        }
        ExploredMapRelative {
            width: self.width,
            height: self.height,
            cells,
        }
    }
}

/// Sparse view of an `ExploredMap` keyed by relative coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploredMapRelative {
    pub width: usize,
    pub height: usize,
    cells: BTreeMap<RelativePoint, bool>,
}

impl ExploredMapRelative {
    pub fn get(&self, point: RelativePoint) -> Option<bool> {
        self.cells.get(&point).copied()
    }

    pub fn is_explored(&self, point: RelativePoint) -> bool {
        self.get(point).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelativePoint, bool)> + '_ {
        self.cells.iter().map(|(&k, &v)| (k, v))
    }
}

/// Grows `map` if `new_position` touches or leaves its relative borders, then marks
/// `new_position` explored. A unit move never needs more than one appended line.
pub fn grow_and_mark(
    map: &ExploredMap,
    offset: Delta,
    new_position: RelativePoint,
    direction: Direction,
) -> Result<(ExploredMap, Delta), GridError> {
    let borders = map.relative_borders(offset);
    let (grown, correction) = if point_in_borders(new_position, &borders, false) {
        (map.clone(), Delta::ZERO)
    } else {
        let (grown, correction) = map.append_line(direction);
        debug!(
            direction = direction.as_str(),
            width = grown.width(),
            height = grown.height(),
            "exploration grid grew"
        );
        (grown, correction)
    };

    let offset = offset + correction;
    let index = point_with_delta(new_position, offset, -1);
    Ok((grown.set_box_value(index, true)?, offset))
}
