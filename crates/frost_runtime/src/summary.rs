//! End-of-run report

use frost_gamestate::SessionStats;
use serde::Serialize;

/// What happened during a run, printed as JSON when it ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub level: String,
    pub simulated_seconds: f64,
    pub fixed_ticks: u64,
    pub frames: u64,
    pub respawns: u32,
    pub resets: u32,
    pub threat_deaths: u32,
    pub contacts: u32,
    pub rejected_player_ticks: u32,
    pub final_temperature: f32,
    pub route_finished: bool,
}

impl RunSummary {
    /// Fill the counters from session stats
    pub fn with_stats(mut self, stats: SessionStats) -> Self {
        self.respawns = stats.respawns;
        self.resets = stats.resets;
        self.threat_deaths = stats.threat_deaths;
        self.contacts = stats.contacts;
        self.rejected_player_ticks = stats.rejected_player_ticks;
        self
    }
}
