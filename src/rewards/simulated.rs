//! Simulated referral feed.
//!
//! Nothing upstream produces these events; the feed rolls a die on a fixed
//! interval and reports how many referrals "arrived". It is kept separate from
//! the ledger so a real event source can take its place.
use std::time::Duration;

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::config::FeedConfig;

#[derive(Resource, Debug)]
pub struct SimulatedEventFeed {
    enabled: bool,
    timer: Timer,
    probability: f64,
    rng: StdRng,
}

impl SimulatedEventFeed {
    pub fn new(config: &FeedConfig) -> Self {
        let rng = config
            .seed
            .map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_os_rng);
        Self {
            enabled: config.enabled,
            timer: Timer::new(config.interval, TimerMode::Repeating),
            probability: config.probability,
            rng,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.timer.duration()
    }

    /// Advances the feed and returns how many referral events fired.
    pub fn tick(&mut self, delta: Duration) -> u32 {
        if !self.enabled {
            return 0;
        }
        self.timer.tick(delta);
        let rolls = self.timer.times_finished_this_tick();
        (0..rolls)
            .filter(|_| self.rng.random_bool(self.probability))
            .count() as u32
    }
}
