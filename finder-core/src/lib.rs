//! Multi-agent maze exploration: finders that only know where they have been walk a shared
//! maze until one of them reaches the finish cell.

pub mod coords;
pub mod error;
pub mod explored_map;
pub mod finder;
pub mod maze;
pub mod render;
pub mod room;
pub mod simulation;

pub use coords::{Coordinate, Delta, Direction, Point, RelativePoint};
pub use error::{GridError, MazeError, RoomError};
pub use explored_map::ExploredMap;
pub use finder::{Finder, FinderId};
pub use maze::{BacktrackerGenerator, Maze, MazeBox, MazeGenerator, Walls};
pub use room::{MoveResult, Room, RoomSpec};
pub use simulation::{
    run_simulation, FinderProcessor, NoopObserver, Simulation, SimulationObserver, SimulationResult,
    DEFAULT_MAX_TICKS,
};
