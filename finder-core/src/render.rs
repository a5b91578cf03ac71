//! Read-only text projections of mazes, rooms and exploration grids.

use crate::coords::{point_with_delta, Delta, Point};
use crate::error::RoomError;
use crate::explored_map::ExploredMap;
use crate::finder::FinderId;
use crate::maze::{Maze, Walls};
use crate::room::Room;
use std::collections::BTreeMap;

const FINDER_MARK: char = '●';
const FINISH_MARK: char = 'X';
const EXPLORED_MARK: char = '·';

/// One cell of a finder's grid projected onto the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploredBox {
    pub x: i32,
    pub y: i32,
    pub walls: Walls,
    pub explored: bool,
}

fn draw<I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<(Walls, char)>>,
{
    let mut lines = Vec::new();
    let mut last_bottom = None;
    for row in rows {
        let mut top = String::new();
        let mut middle = String::new();
        let mut bottom = String::new();
        for (walls, mark) in &row {
            top.push('+');
            top.push_str(if walls.top { "---" } else { "   " });
            bottom.push('+');
            bottom.push_str(if walls.bottom { "---" } else { "   " });
            middle.push(if walls.left { '|' } else { ' ' });
            middle.push(' ');
            middle.push(*mark);
            middle.push(' ');
        }
        top.push('+');
        bottom.push('+');
        middle.push(match row.last() {
            Some((walls, _)) if walls.right => '|',
            _ => ' ',
        });
        lines.push(top);
        lines.push(middle);
        last_bottom = Some(bottom);
    }
    lines.extend(last_bottom);
    lines
}

pub fn maze_to_strings(maze: &Maze, positions: &BTreeMap<FinderId, Point>) -> Vec<String> {
    draw(maze.rows().map(|row| {
        row.iter()
            .map(|b| {
                let here = positions.values().any(|p| *p == b.point());
                (b.walls, if here { FINDER_MARK } else { ' ' })
            })
            .collect()
    }))
}

/// The maze with every finder and the finish cell marked.
pub fn room_to_strings(room: &Room) -> Vec<String> {
    let finish = room.finish_point();
    draw(room.maze().rows().map(|row| {
        row.iter()
            .map(|b| {
                let mark = if room.positions().values().any(|p| *p == b.point()) {
                    FINDER_MARK
                } else if b.point() == finish {
                    FINISH_MARK
                } else {
                    ' '
                };
                (b.walls, mark)
            })
            .collect()
    }))
}

pub fn explored_map_to_strings(map: &ExploredMap) -> Vec<String> {
    map.rows()
        .take(map.height())
        .map(|row| {
            row.iter()
                .map(|&v| if v { " o " } else { " . " })
                .collect()
        })
        .collect()
}

/// Projects the finder's grid onto the maze: each grid cell becomes the maze box it covers,
/// flagged with whether the finder has been there. Cells hanging over the maze edge become
/// wall-less placeholders.
pub fn explored_view(room: &Room, id: FinderId) -> Result<Vec<Vec<ExploredBox>>, RoomError> {
    let finder = room.finder(id)?;
    let spawn = room.spawn_point(id)?;
    let origin = point_with_delta(spawn, finder.explored_map_offset, 1);

    let rows = finder
        .explored_map
        .rows()
        .take(finder.explored_map.height())
        .enumerate()
        .map(|(gy, row)| {
            row.iter()
                .enumerate()
                .map(|(gx, &explored)| {
                    let p = point_with_delta(origin, Delta::new(gx as i32, gy as i32), 1);
                    match room.maze().get(p) {
                        Some(b) => ExploredBox {
                            x: p.x,
                            y: p.y,
                            walls: b.walls,
                            explored,
                        },
                        None => ExploredBox {
                            x: p.x,
                            y: p.y,
                            walls: Walls::NONE,
                            explored: false,
                        },
                    }
                })
                .collect()
        })
        .collect();
    Ok(rows)
}

pub fn explored_view_to_strings(room: &Room, id: FinderId) -> Result<Vec<String>, RoomError> {
    let position = room.position(id)?;
    let view = explored_view(room, id)?;
    Ok(draw(view.into_iter().map(|row| {
        row.into_iter()
            .map(|b| {
                let mark = if Point::new(b.x, b.y) == position {
                    FINDER_MARK
                } else if b.explored {
                    EXPLORED_MARK
                } else {
                    ' '
                };
                (b.walls, mark)
            })
            .collect()
    })))
}
