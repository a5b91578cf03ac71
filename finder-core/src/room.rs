use crate::coords::{point_with_delta, point_with_direction, Delta, Direction, Point};
use crate::error::RoomError;
use crate::finder::{Finder, FinderId};
use crate::maze::{rng_for, Maze, MazeBox, MazeGenerator};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveResult {
    Success,
    Fault,
    /// Never produced by the room today; kept so callers already match on it.
    Unknown,
}

/// What `Room::create` needs besides the generator.
#[derive(Debug, Clone)]
pub struct RoomSpec<'a> {
    pub width: usize,
    pub height: usize,
    pub spawns: Vec<(Finder, Point)>,
    pub finish_point: Option<Point>,
    pub seed: Option<&'a str>,
}

/// The absolute world. Values are replaced, not edited: every accepted move yields a new room
/// that shares the maze with its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    maze: Arc<Maze>,
    // registration order
    finders: Vec<Finder>,
    positions: BTreeMap<FinderId, Point>,
    finish_point: Point,
}

impl Room {
    pub fn create<G: MazeGenerator + ?Sized>(
        generator: &G,
        spec: RoomSpec<'_>,
    ) -> Result<Room, RoomError> {
        let maze = generator.generate(spec.width, spec.height, spec.seed)?;
        let finish_point = match spec.finish_point {
            Some(p) => p,
            None => {
                let finish_seed = spec.seed.map(|s| format!("{s}:finish"));
                let mut rng = rng_for(finish_seed.as_deref());
                Point::new(
                    rng.gen_range(0..maze.width()) as i32,
                    rng.gen_range(0..maze.height()) as i32,
                )
            }
        };
        debug!(
            width = maze.width(),
            height = maze.height(),
            finish_x = finish_point.x,
            finish_y = finish_point.y,
            "room created"
        );
        Room::from_maze(maze, spec.spawns, finish_point)
    }

    pub fn from_maze(
        maze: Maze,
        spawns: Vec<(Finder, Point)>,
        finish_point: Point,
    ) -> Result<Room, RoomError> {
        if !maze.contains(finish_point) {
            return Err(RoomError::FinishOutsideMaze(finish_point));
        }

        let mut finders = Vec::with_capacity(spawns.len());
        let mut positions = BTreeMap::new();
        for (finder, point) in spawns {
            if !maze.contains(point) {
                return Err(RoomError::OutsideMaze {
                    id: finder.id,
                    point,
                });
            }
            if positions.insert(finder.id, point).is_some() {
                return Err(RoomError::DuplicateFinder(finder.id));
            }
            finders.push(finder);
        }

        Ok(Room {
            maze: Arc::new(maze),
            finders,
            positions,
            finish_point,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn finders(&self) -> &[Finder] {
        &self.finders
    }

    pub fn finder_count(&self) -> usize {
        self.finders.len()
    }

    pub fn finder(&self, id: FinderId) -> Result<&Finder, RoomError> {
        self.finders
            .iter()
            .find(|f| f.id == id)
            .ok_or(RoomError::UnknownFinder(id))
    }

    pub fn position(&self, id: FinderId) -> Result<Point, RoomError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(RoomError::UnknownFinder(id))
    }

    pub fn positions(&self) -> &BTreeMap<FinderId, Point> {
        &self.positions
    }

    pub fn finish_point(&self) -> Point {
        self.finish_point
    }

    /// Attempts one step. A wall on `direction` yields `Fault` and an unchanged room; otherwise
    /// the absolute position and the finder's relative state advance together.
    pub fn try_move_finder(
        &self,
        id: FinderId,
        direction: Direction,
    ) -> Result<(MoveResult, Room), RoomError> {
        let index = self
            .finders
            .iter()
            .position(|f| f.id == id)
            .ok_or(RoomError::UnknownFinder(id))?;
        let position = self.position(id)?;
        let current = self
            .maze
            .get(position)
            .ok_or(RoomError::OutsideMaze { id, point: position })?;

        if current.has_wall(direction) {
            debug!(finder = id, direction = direction.as_str(), "move blocked");
            return Ok((MoveResult::Fault, self.clone()));
        }

        let next = point_with_direction(position, direction);
        if !self.maze.contains(next) {
            return Err(RoomError::OutsideMaze { id, point: next });
        }

        let moved = self.finders[index].moved(direction)?;
        let mut room = self.clone();
        room.finders[index] = moved;
        room.positions.insert(id, next);
        debug!(
            finder = id,
            direction = direction.as_str(),
            x = next.x,
            y = next.y,
            "finder moved"
        );
        Ok((MoveResult::Success, room))
    }

    /// The absolute cell `delta` away from the finder's current cell.
    pub fn relative_point_to_absolute(
        &self,
        id: FinderId,
        delta: Delta,
    ) -> Result<Point, RoomError> {
        Ok(point_with_delta(self.position(id)?, delta, 1))
    }

    pub fn maze_box_near(&self, id: FinderId, delta: Delta) -> Result<&MazeBox, RoomError> {
        let point = self.relative_point_to_absolute(id, delta)?;
        self.maze
            .get(point)
            .ok_or(RoomError::OutsideMaze { id, point })
    }

    /// Where the finder started: its absolute position minus everything it walked since.
    pub fn spawn_point(&self, id: FinderId) -> Result<Point, RoomError> {
        let walked = self.finder(id)?.relative_position;
        Ok(point_with_delta(
            self.position(id)?,
            Delta::new(walked.rx, walked.ry),
            -1,
        ))
    }

    /// First finder, in registration order, standing on the finish cell.
    pub fn finder_at_finish(&self) -> Option<&Finder> {
        self.finders
            .iter()
            .find(|f| self.positions.get(&f.id) == Some(&self.finish_point))
    }
}
