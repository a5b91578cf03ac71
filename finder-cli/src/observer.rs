use finder_core::{Finder, FinderId, MoveResult, Room, SimulationObserver};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveCounts {
    pub success: usize,
    pub fault: usize,
}

/// Tallies move outcomes per finder and traces every tick.
#[derive(Debug, Default)]
pub struct MoveStats {
    counts: BTreeMap<FinderId, MoveCounts>,
}

impl MoveStats {
    pub fn counts(&self) -> &BTreeMap<FinderId, MoveCounts> {
        &self.counts
    }
}

impl SimulationObserver for MoveStats {
    fn on_finder_tick(&mut self, tick_index: usize, finder: &Finder, result: MoveResult) {
        let entry = self.counts.entry(finder.id).or_default();
        match result {
            MoveResult::Success => entry.success += 1,
            MoveResult::Fault => entry.fault += 1,
            MoveResult::Unknown => {}
        }
        trace!(tick = tick_index, finder = finder.id, ?result, "finder moved");
    }

    fn on_whole_tick(&mut self, room: &Room, ticks_done: usize) {
        debug!(ticks = ticks_done, positions = ?room.positions(), "tick done");
    }
}
