use crate::coords::Point;
use crate::finder::FinderId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid index ({x}, {y}) is outside a {width}x{height} exploration grid")]
    IndexOutOfRange {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[error("{len} cells cannot fill a {width}x{height} exploration grid")]
    CellCountMismatch {
        width: usize,
        height: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze must be at least 1x1, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    #[error("row {row} has {len} boxes, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },
    #[error("box at grid index ({x}, {y}) claims coordinates ({box_x}, {box_y})")]
    MisplacedBox {
        x: usize,
        y: usize,
        box_x: i32,
        box_y: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("finder {0} is not registered in this room")]
    UnknownFinder(FinderId),
    #[error("finder {0} is registered twice")]
    DuplicateFinder(FinderId),
    #[error("finder {id} would stand at {point:?}, outside the maze")]
    OutsideMaze { id: FinderId, point: Point },
    #[error("finish point {0:?} is outside the maze")]
    FinishOutsideMaze(Point),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Maze(#[from] MazeError),
}
