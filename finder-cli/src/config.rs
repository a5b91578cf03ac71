use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use finder_core::maze::rng_for;
use finder_core::{Point, DEFAULT_MAX_TICKS};
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SEED_ENV: &str = "MAZE_SEED";

const DEFAULT_WIDTH: usize = 10;
const DEFAULT_HEIGHT: usize = 10;
const DEFAULT_FINDERS: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Random,
    Frontier,
}

/// Every knob as optional, shared by the JSON config file and the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub finders: Option<u32>,
    pub seed: Option<String>,
    pub max_ticks: Option<usize>,
    pub finish_x: Option<i32>,
    pub finish_y: Option<i32>,
    pub strategy: Option<StrategyKind>,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Settings> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Fields set in `overrides` win.
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            finders: overrides.finders.or(self.finders),
            seed: overrides.seed.or(self.seed),
            max_ticks: overrides.max_ticks.or(self.max_ticks),
            finish_x: overrides.finish_x.or(self.finish_x),
            finish_y: overrides.finish_y.or(self.finish_y),
            strategy: overrides.strategy.or(self.strategy),
        }
    }

    /// Fills the gaps with defaults; `env_seed` is only consulted when no seed was given.
    pub fn resolve(self, env_seed: Option<String>) -> Result<RunConfig> {
        let finish = match (self.finish_x, self.finish_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            (None, None) => None,
            _ => bail!("finish_x and finish_y must be given together"),
        };
        let finders = self.finders.unwrap_or(DEFAULT_FINDERS);
        if finders == 0 {
            bail!("at least one finder is required");
        }

        Ok(RunConfig {
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            finders,
            seed: self.seed.or(env_seed).filter(|s| !s.is_empty()),
            max_ticks: self.max_ticks.unwrap_or(DEFAULT_MAX_TICKS),
            finish,
            strategy: self.strategy.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    pub width: usize,
    pub height: usize,
    pub finders: u32,
    pub seed: Option<String>,
    pub max_ticks: usize,
    pub finish: Option<Point>,
    pub strategy: StrategyKind,
}

impl RunConfig {
    /// Derived seed for one consumer, so the maze, spawns and strategy draw independent streams.
    pub fn sub_seed(&self, purpose: &str) -> Option<String> {
        self.seed.as_ref().map(|s| format!("{s}:{purpose}"))
    }

    /// One distinct cell per finder, or all on the origin when there are more finders than
    /// cells.
    pub fn spawn_points(&self) -> Vec<Point> {
        let cells = self.width * self.height;
        let count = self.finders as usize;
        if count > cells || self.width == 0 {
            return vec![Point::new(0, 0); count];
        }

        let mut rng = rng_for(self.sub_seed("spawn").as_deref());
        index::sample(&mut rng, cells, count)
            .into_iter()
            .map(|i| Point::new((i % self.width) as i32, (i / self.width) as i32))
            .collect()
    }
}
