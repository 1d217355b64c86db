//! CorePlugin owns the session clock every delayed reward is measured against.
use bevy::prelude::*;
use std::time::Duration;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
const MAX_TIME_SCALE: f32 = 100.0;

/// Scaled session time derived from real frame deltas.
///
/// Reward systems read `last_scaled_delta` once per frame; tests drive the
/// clock by hand with [`SimulationClock::tick`] instead of adding this plugin.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    last_scaled_delta: Duration,
    elapsed: Duration,
    frames: u64,
}

impl SimulationClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: clamp_time_scale(time_scale),
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Replaces the scale for subsequent ticks; already elapsed time is kept.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = clamp_time_scale(time_scale);
    }

    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Applies one frame's real delta and returns the scaled delta.
    pub fn tick(&mut self, real_delta: Duration) -> Duration {
        self.last_scaled_delta = real_delta.mul_f32(self.time_scale);
        self.elapsed += self.last_scaled_delta;
        self.frames += 1;
        self.last_scaled_delta
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

fn clamp_time_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
    } else {
        DEFAULT_TIME_SCALE
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .add_systems(Startup, log_session_time_scale)
            .add_systems(PreUpdate, advance_simulation_clock);
    }
}

fn advance_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_session_time_scale(clock: Res<SimulationClock>) {
    if (clock.time_scale() - DEFAULT_TIME_SCALE).abs() > f32::EPSILON {
        info!(
            "CorePlugin running accelerated session clock: x{:.3}",
            clock.time_scale()
        );
    } else {
        info!("CorePlugin initialised with real-time session clock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_scales_and_accumulates() {
        let mut clock = SimulationClock::new(4.0);
        assert_eq!(clock.tick(Duration::from_millis(500)), Duration::from_secs(2));
        clock.tick(Duration::from_millis(250));

        assert_eq!(clock.last_scaled_delta(), Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(3));
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn time_scale_is_clamped_to_sane_range() {
        assert_eq!(SimulationClock::new(0.0).time_scale(), MIN_TIME_SCALE);
        assert_eq!(SimulationClock::new(1_000.0).time_scale(), MAX_TIME_SCALE);
        assert_eq!(SimulationClock::new(f32::NAN).time_scale(), DEFAULT_TIME_SCALE);
    }

    #[test]
    fn rescaling_keeps_elapsed_time() {
        let mut clock = SimulationClock::default();
        clock.tick(Duration::from_secs(1));
        clock.set_time_scale(10.0);
        clock.tick(Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(11));

        clock.set_time_scale(-3.0);
        assert_eq!(clock.time_scale(), MIN_TIME_SCALE);
    }

    #[test]
    fn zero_tick_clears_last_delta() {
        let mut clock = SimulationClock::default();
        clock.tick(Duration::from_secs(1));
        clock.tick(Duration::ZERO);
        assert_eq!(clock.last_scaled_delta(), Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }
}
