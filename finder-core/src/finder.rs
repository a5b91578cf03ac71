use crate::coords::{point_with_delta, point_with_direction, Delta, Direction, RelativePoint};
use crate::error::GridError;
use crate::explored_map::{grow_and_mark, ExploredMap, ExploredMapRelative};
use serde::{Deserialize, Serialize};

pub type FinderId = u32;

/// An agent that only knows where it is relative to its own spawn cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finder {
    pub id: FinderId,
    pub relative_position: RelativePoint,
    pub explored_map: ExploredMap,
    pub explored_map_offset: Delta,
}

impl Finder {
    /// Fresh finder: a 3x3 grid centered on the spawn cell, which is already explored.
    pub fn new(id: FinderId) -> Self {
        Self {
            id,
            relative_position: RelativePoint::ORIGIN,
            explored_map: ExploredMap::spawn_area(),
            explored_map_offset: Delta::new(-1, -1),
        }
    }

    /// The finder after one accepted step. Only the room calls this, once it has checked the
    /// walls.
    pub(crate) fn moved(&self, direction: Direction) -> Result<Finder, GridError> {
        let relative_position = point_with_direction(self.relative_position, direction);
        let (explored_map, explored_map_offset) = grow_and_mark(
            &self.explored_map,
            self.explored_map_offset,
            relative_position,
            direction,
        )?;
        Ok(Finder {
            id: self.id,
            relative_position,
            explored_map,
            explored_map_offset,
        })
    }

    /// The exploration grid keyed by relative coordinates.
    pub fn relative_view(&self) -> ExploredMapRelative {
        let anchor = -self.explored_map_offset;
        self.explored_map.to_relative(RelativePoint::new(anchor.dx, anchor.dy))
    }

    pub fn is_explored(&self, point: RelativePoint) -> bool {
        let index = point_with_delta(point, self.explored_map_offset, -1);
        self.explored_map.get(index).unwrap_or(false)
    }
}
