//! Maze cells with wall flags, and the generator seam that produces them.

use crate::coords::{point_with_direction, Direction, Point};
use crate::error::MazeError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// `true` = wall present on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub const ALL: Walls = Walls {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub const NONE: Walls = Walls {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::Top => self.top,
            Direction::Right => self.right,
            Direction::Bottom => self.bottom,
            Direction::Left => self.left,
        }
    }

    fn set(&mut self, direction: Direction, present: bool) {
        match direction {
            Direction::Top => self.top = present,
            Direction::Right => self.right = present,
            Direction::Bottom => self.bottom = present,
            Direction::Left => self.left = present,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeBox {
    pub x: i32,
    pub y: i32,
    pub walls: Walls,
}

impl MazeBox {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls.has(direction)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    boxes: Vec<MazeBox>,
}

impl Maze {
    /// Builds a maze from `height` rows of `width` boxes. Every box must carry its own grid
    /// coordinates.
    pub fn from_rows(rows: Vec<Vec<MazeBox>>) -> Result<Self, MazeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyDimensions { width, height });
        }

        let mut boxes = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    len: row.len(),
                    width,
                });
            }
            for (x, b) in row.into_iter().enumerate() {
                if b.x != x as i32 || b.y != y as i32 {
                    return Err(MazeError::MisplacedBox {
                        x,
                        y,
                        box_x: b.x,
                        box_y: b.y,
                    });
                }
                boxes.push(b);
            }
        }
        Ok(Self {
            width,
            height,
            boxes,
        })
    }

    /// Every cell closed on all four sides.
    pub fn walled(width: usize, height: usize) -> Result<Self, MazeError> {
        Self::filled(width, height, Walls::ALL)
    }

    /// A single open field: walls only along the outer border.
    pub fn open(width: usize, height: usize) -> Result<Self, MazeError> {
        let mut maze = Self::filled(width, height, Walls::NONE)?;
        let (w, h) = (width as i32, height as i32);
        for b in &mut maze.boxes {
            b.walls.top = b.y == 0;
            b.walls.left = b.x == 0;
            b.walls.bottom = b.y == h - 1;
            b.walls.right = b.x == w - 1;
        }
        Ok(maze)
    }

    fn filled(width: usize, height: usize, walls: Walls) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyDimensions { width, height });
        }
        let boxes = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| MazeBox {
                    x: x as i32,
                    y: y as i32,
                    walls,
                })
            })
            .collect();
        Ok(Self {
            width,
            height,
            boxes,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        self.index_of(point).is_some()
    }

    fn index_of(&self, point: Point) -> Option<usize> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, point: Point) -> Option<&MazeBox> {
        self.index_of(point).map(|i| &self.boxes[i])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[MazeBox]> {
        self.boxes.chunks(self.width)
    }

    /// Removes the wall between `point` and its neighbor in `direction` on both sides.
    /// Returns false when the neighbor is outside the maze.
    pub fn carve(&mut self, point: Point, direction: Direction) -> bool {
        let next = point_with_direction(point, direction);
        match (self.index_of(point), self.index_of(next)) {
            (Some(a), Some(b)) => {
                self.boxes[a].walls.set(direction, false);
                self.boxes[b].walls.set(direction.opposite(), false);
                true
            }
            _ => false,
        }
    }
}

/// Produces the maze a room is built on. Implementations must return exactly `height` rows of
/// `width` boxes and keep the walls of adjacent cells consistent.
pub trait MazeGenerator {
    fn generate(&self, width: usize, height: usize, seed: Option<&str>) -> Result<Maze, MazeError>;
}

/// Randomized depth-first carve: a perfect maze, every cell reachable, outer border closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackerGenerator;

impl MazeGenerator for BacktrackerGenerator {
    fn generate(&self, width: usize, height: usize, seed: Option<&str>) -> Result<Maze, MazeError> {
        let mut maze = Maze::walled(width, height)?;
        let mut rng = rng_for(seed);
        carve_maze(&mut maze, &mut rng);
        Ok(maze)
    }
}

fn carve_maze(maze: &mut Maze, rng: &mut StdRng) {
    let mut visited = vec![false; maze.width * maze.height];
    let mut stack = vec![Point::new(0, 0)];
    visited[0] = true;

    while let Some(&current) = stack.last() {
        let mut candidates = [Direction::Top; 4];
        let mut n = 0usize;
        for direction in Direction::ALL {
            let next = point_with_direction(current, direction);
            if let Some(i) = maze.index_of(next) {
                if !visited[i] {
                    candidates[n] = direction;
                    n += 1;
                }
            }
        }

        if n == 0 {
            stack.pop();
            continue;
        }

        let direction = candidates[rng.gen_range(0..n)];
        let next = point_with_direction(current, direction);
        maze.carve(current, direction);
        if let Some(i) = maze.index_of(next) {
            visited[i] = true;
        }
        stack.push(next);
    }
}

/// FNV-1a; stable across platforms and releases, unlike `DefaultHasher`.
pub fn seed_from_str(seed: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    seed.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
}

/// Seeded when a seed is given, from OS entropy otherwise.
pub fn rng_for(seed: Option<&str>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(seed_from_str(s)),
        None => StdRng::from_entropy(),
    }
}
