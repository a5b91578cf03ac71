use crate::config::StrategyKind;
use finder_core::coords::point_with_direction;
use finder_core::maze::rng_for;
use finder_core::{Direction, Finder, FinderProcessor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Uniform choice over the four directions.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(seed: Option<&str>) -> Self {
        Self { rng: rng_for(seed) }
    }

    fn pick(&mut self, options: &[Direction]) -> Direction {
        options.choose(&mut self.rng).copied().unwrap_or(Direction::Top)
    }
}

impl FinderProcessor for RandomStrategy {
    fn decide(&mut self, _finder: &Finder, _tick_index: usize, _finder_count: usize) -> Direction {
        self.pick(&Direction::ALL)
    }
}

/// Steps toward a neighbor the finder has not stood on yet, if any. The finder cannot see
/// walls, so a blocked frontier is retried with a fresh draw on the next tick.
pub struct FrontierStrategy {
    inner: RandomStrategy,
}

impl FrontierStrategy {
    pub fn new(seed: Option<&str>) -> Self {
        Self {
            inner: RandomStrategy::new(seed),
        }
    }
}

impl FinderProcessor for FrontierStrategy {
    fn decide(&mut self, finder: &Finder, _tick_index: usize, _finder_count: usize) -> Direction {
        let frontier: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| !finder.is_explored(point_with_direction(finder.relative_position, d)))
            .collect();
        if frontier.is_empty() {
            self.inner.pick(&Direction::ALL)
        } else {
            self.inner.pick(&frontier)
        }
    }
}

pub enum Strategy {
    Random(RandomStrategy),
    Frontier(FrontierStrategy),
}

impl Strategy {
    pub fn new(kind: StrategyKind, seed: Option<&str>) -> Self {
        match kind {
            StrategyKind::Random => Strategy::Random(RandomStrategy::new(seed)),
            StrategyKind::Frontier => Strategy::Frontier(FrontierStrategy::new(seed)),
        }
    }
}

impl FinderProcessor for Strategy {
    fn decide(&mut self, finder: &Finder, tick_index: usize, finder_count: usize) -> Direction {
        match self {
            Strategy::Random(s) => s.decide(finder, tick_index, finder_count),
            Strategy::Frontier(s) => s.decide(finder, tick_index, finder_count),
        }
    }
}
