//! Tick loop: every finder attempts one move per tick, in registration order, until one of
//! them stands on the finish cell or the tick budget runs out.

use crate::coords::Direction;
use crate::error::RoomError;
use crate::finder::{Finder, FinderId};
use crate::room::{MoveResult, Room};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

pub const DEFAULT_MAX_TICKS: usize = 100;

/// Picks the direction a finder attempts. Sees only the finder's own snapshot.
pub trait FinderProcessor {
    fn decide(&mut self, finder: &Finder, tick_index: usize, finder_count: usize) -> Direction;
}

impl<F> FinderProcessor for F
where
    F: FnMut(&Finder, usize, usize) -> Direction,
{
    fn decide(&mut self, finder: &Finder, tick_index: usize, finder_count: usize) -> Direction {
        self(finder, tick_index, finder_count)
    }
}

/// Side-effect hooks. Neither feeds anything back into the loop.
pub trait SimulationObserver {
    /// After each attempted move; `finder` is the snapshot the processor decided on.
    fn on_finder_tick(&mut self, _tick_index: usize, _finder: &Finder, _result: MoveResult) {}

    /// After every finder moved, before the finish check. `ticks_done` counts completed ticks,
    /// starting at 1.
    fn on_whole_tick(&mut self, _room: &Room, _ticks_done: usize) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub ticks_elapsed: usize,
    pub exit_founded: bool,
    pub finder_winner_id: Option<FinderId>,
}

pub struct Simulation<P, O = NoopObserver> {
    processor: P,
    observer: O,
    max_ticks_count: usize,
}

impl<P: FinderProcessor> Simulation<P> {
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            observer: NoopObserver,
            max_ticks_count: DEFAULT_MAX_TICKS,
        }
    }
}

impl<P: FinderProcessor, O: SimulationObserver> Simulation<P, O> {
    pub fn with_observer<O2: SimulationObserver>(self, observer: O2) -> Simulation<P, O2> {
        Simulation {
            processor: self.processor,
            observer,
            max_ticks_count: self.max_ticks_count,
        }
    }

    pub fn with_max_ticks_count(mut self, max_ticks_count: usize) -> Self {
        self.max_ticks_count = max_ticks_count;
        self
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Runs to completion and returns the outcome together with the final room.
    pub fn run(&mut self, room: Room) -> Result<(SimulationResult, Room), RoomError> {
        let mut room = room;
        let mut tick_index = 0;
        let mut winner: Option<FinderId> = None;

        while winner.is_none() && tick_index < self.max_ticks_count {
            room = self.tick(room, tick_index)?;
            tick_index += 1;
            self.observer.on_whole_tick(&room, tick_index);
            winner = room.finder_at_finish().map(|f| f.id);
        }

        let result = SimulationResult {
            ticks_elapsed: tick_index,
            exit_founded: winner.is_some(),
            finder_winner_id: winner,
        };
        info!(
            ticks = result.ticks_elapsed,
            exit_founded = result.exit_founded,
            winner = ?result.finder_winner_id,
            "simulation finished"
        );
        Ok((result, room))
    }

    fn tick(&mut self, room: Room, tick_index: usize) -> Result<Room, RoomError> {
        let ids: Vec<FinderId> = room.finders().iter().map(|f| f.id).collect();
        let finder_count = ids.len();
        trace!(tick = tick_index, finders = finder_count, "tick");

        let mut room = room;
        for id in ids {
            let finder = room.finder(id)?;
            let direction = self.processor.decide(finder, tick_index, finder_count);
            let (result, next) = room.try_move_finder(id, direction)?;
            self.observer.on_finder_tick(tick_index, finder, result);
            room = next;
        }
        Ok(room)
    }
}

/// `Simulation::new(processor).run(room)` with the default tick budget.
pub fn run_simulation<P: FinderProcessor>(
    room: Room,
    processor: P,
) -> Result<(SimulationResult, Room), RoomError> {
    Simulation::new(processor).run(room)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Point, RelativePoint};
    use crate::maze::{BacktrackerGenerator, Maze, MazeGenerator};
    use crate::room::RoomSpec;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Finder(usize, FinderId, MoveResult),
        Whole(usize, Vec<Point>),
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl SimulationObserver for Recorder {
        fn on_finder_tick(&mut self, tick_index: usize, finder: &Finder, result: MoveResult) {
            self.0.push(Event::Finder(tick_index, finder.id, result));
        }

        fn on_whole_tick(&mut self, room: &Room, ticks_done: usize) {
            self.0
                .push(Event::Whole(ticks_done, room.positions().values().copied().collect()));
        }
    }

    #[test]
    fn immediate_win_on_single_cell() {
        let room = Room::from_maze(
            Maze::walled(1, 1).unwrap(),
            vec![(Finder::new(4), Point::new(0, 0))],
            Point::new(0, 0),
        )
        .unwrap();
        let (result, _) =
            run_simulation(room, |_: &Finder, _: usize, _: usize| Direction::Top).unwrap();
        assert_eq!(
            result,
            SimulationResult {
                ticks_elapsed: 1,
                exit_founded: true,
                finder_winner_id: Some(4),
            }
        );
    }

    #[test]
    fn walled_in_finder_times_out() {
        let room = Room::from_maze(
            Maze::walled(3, 3).unwrap(),
            vec![(Finder::new(1), Point::new(1, 1))],
            Point::new(0, 0),
        )
        .unwrap();
        let mut sim = Simulation::new(|_: &Finder, tick: usize, _: usize| Direction::ALL[tick % 4])
            .with_observer(Recorder::default())
            .with_max_ticks_count(5);
        let (result, end) = sim.run(room.clone()).unwrap();
        assert_eq!(
            result,
            SimulationResult {
                ticks_elapsed: 5,
                exit_founded: false,
                finder_winner_id: None,
            }
        );
        assert_eq!(end, room);
        let faults = sim
            .observer()
            .0
            .iter()
            .filter(|e| matches!(e, Event::Finder(_, 1, MoveResult::Fault)))
            .count();
        assert_eq!(faults, 5);
    }

    #[test]
    fn whole_tick_receives_completed_tick_count() {
        let room = Room::from_maze(
            Maze::walled(2, 1).unwrap(),
            vec![(Finder::new(1), Point::new(0, 0))],
            Point::new(1, 0),
        )
        .unwrap();
        let mut sim = Simulation::new(|_: &Finder, _: usize, _: usize| Direction::Right)
            .with_observer(Recorder::default())
            .with_max_ticks_count(3);
        let (result, _) = sim.run(room).unwrap();
        assert_eq!(result.ticks_elapsed, 3);

        let whole: Vec<usize> = sim
            .observer()
            .0
            .iter()
            .filter_map(|e| match e {
                Event::Whole(n, _) => Some(*n),
                Event::Finder(..) => None,
            })
            .collect();
        assert_eq!(whole, vec![1, 2, 3]);
        let moves: Vec<usize> = sim
            .observer()
            .0
            .iter()
            .filter_map(|e| match e {
                Event::Finder(tick, ..) => Some(*tick),
                Event::Whole(..) => None,
            })
            .collect();
        assert_eq!(moves, vec![0, 1, 2]);
    }

    #[test]
    fn default_budget_is_one_hundred_ticks() {
        let room = Room::from_maze(
            Maze::open(2, 2).unwrap(),
            vec![(Finder::new(1), Point::new(0, 0))],
            Point::new(1, 1),
        )
        .unwrap();
        let (result, _) =
            run_simulation(room, |_: &Finder, _: usize, _: usize| Direction::Left).unwrap();
        assert_eq!(result.ticks_elapsed, DEFAULT_MAX_TICKS);
        assert!(!result.exit_founded);
    }

    #[test]
    fn earlier_registered_finder_wins_a_shared_tick() {
        let toward_center = |f: &Finder, _: usize, _: usize| {
            if f.id == 1 { Direction::Right } else { Direction::Left }
        };

        let room = Room::from_maze(
            Maze::open(3, 1).unwrap(),
            vec![
                (Finder::new(1), Point::new(0, 0)),
                (Finder::new(2), Point::new(2, 0)),
            ],
            Point::new(1, 0),
        )
        .unwrap();
        let (result, end) = run_simulation(room, toward_center).unwrap();
        assert_eq!(result.finder_winner_id, Some(1));
        assert_eq!(result.ticks_elapsed, 1);
        assert_eq!(end.position(2).unwrap(), Point::new(1, 0));

        let reversed = Room::from_maze(
            Maze::open(3, 1).unwrap(),
            vec![
                (Finder::new(2), Point::new(2, 0)),
                (Finder::new(1), Point::new(0, 0)),
            ],
            Point::new(1, 0),
        )
        .unwrap();
        let (result, _) = run_simulation(reversed, toward_center).unwrap();
        assert_eq!(result.finder_winner_id, Some(2));
    }

    #[test]
    fn callbacks_fire_in_order() {
        let room = Room::from_maze(
            Maze::open(4, 1).unwrap(),
            vec![
                (Finder::new(1), Point::new(0, 0)),
                (Finder::new(2), Point::new(3, 0)),
            ],
            Point::new(0, 0),
        )
        .unwrap();
        // finder 1 starts on the finish cell but the check only runs after a full tick, and
        // it walks away first
        let mut sim = Simulation::new(|f: &Finder, _: usize, count: usize| {
            assert_eq!(count, 2);
            if f.id == 1 { Direction::Right } else { Direction::Top }
        })
        .with_observer(Recorder::default())
        .with_max_ticks_count(2);
        let (result, _) = sim.run(room).unwrap();
        assert!(!result.exit_founded);

        assert_eq!(
            sim.into_observer().0,
            vec![
                Event::Finder(0, 1, MoveResult::Success),
                Event::Finder(0, 2, MoveResult::Fault),
                Event::Whole(1, vec![Point::new(1, 0), Point::new(3, 0)]),
                Event::Finder(1, 1, MoveResult::Success),
                Event::Finder(1, 2, MoveResult::Fault),
                Event::Whole(2, vec![Point::new(2, 0), Point::new(3, 0)]),
            ]
        );
    }

    #[test]
    fn processor_sees_pre_move_snapshot() {
        let room = Room::from_maze(
            Maze::open(5, 1).unwrap(),
            vec![(Finder::new(1), Point::new(0, 0))],
            Point::new(4, 0),
        )
        .unwrap();
        let mut seen = Vec::new();
        let (result, end) = run_simulation(room, |f: &Finder, tick: usize, _: usize| {
            seen.push((tick, f.relative_position));
            Direction::Right
        })
        .unwrap();
        assert_eq!(result.ticks_elapsed, 4);
        assert_eq!(result.finder_winner_id, Some(1));
        assert_eq!(
            seen,
            (0..4).map(|t| (t, RelativePoint::new(t as i32, 0))).collect::<Vec<_>>()
        );
        assert_eq!(end.finder(1).unwrap().explored_map.explored_count(), 5);
    }

    fn pure_strategy(f: &Finder, tick: usize, count: usize) -> Direction {
        let p = f.relative_position;
        let h = (p.rx * 31 + p.ry * 17) as i64 + (tick * 7 + count + f.id as usize) as i64;
        Direction::ALL[h.rem_euclid(4) as usize]
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = || {
            let room = Room::create(
                &BacktrackerGenerator,
                RoomSpec {
                    width: 10,
                    height: 10,
                    spawns: vec![
                        (Finder::new(1), Point::new(0, 0)),
                        (Finder::new(2), Point::new(9, 0)),
                        (Finder::new(3), Point::new(5, 5)),
                    ],
                    finish_point: None,
                    seed: Some("determinism"),
                },
            )
            .unwrap();
            Simulation::new(pure_strategy)
                .with_max_ticks_count(300)
                .run(room)
                .unwrap()
        };
        let (a, room_a) = run();
        let (b, room_b) = run();
        assert_eq!(a, b);
        assert_eq!(room_a, room_b);
    }

    #[test]
    fn spawns_keep_relative_and_absolute_consistent() {
        let maze = BacktrackerGenerator.generate(8, 8, Some("spawns")).unwrap();
        let room = Room::from_maze(
            maze,
            vec![
                (Finder::new(1), Point::new(0, 0)),
                (Finder::new(2), Point::new(7, 7)),
            ],
            Point::new(3, 4),
        )
        .unwrap();
        let (_, end) = Simulation::new(pure_strategy)
            .with_max_ticks_count(60)
            .run(room)
            .unwrap();
        assert_eq!(end.spawn_point(1).unwrap(), Point::new(0, 0));
        assert_eq!(end.spawn_point(2).unwrap(), Point::new(7, 7));
        for f in end.finders() {
            assert!(f.is_explored(f.relative_position));
        }
    }

    #[test]
    fn result_serializes_with_stable_field_names() {
        let result = SimulationResult {
            ticks_elapsed: 3,
            exit_founded: true,
            finder_winner_id: Some(2),
        };
        assert_eq!(
            serde_json::to_value(result).unwrap(),
            serde_json::json!({"ticks_elapsed": 3, "exit_founded": true, "finder_winner_id": 2})
        );
        assert_eq!(
            serde_json::to_string(&Direction::Bottom).unwrap(),
            "\"bottom\""
        );
    }
}
