//! Time management utilities

use std::time::Instant;

/// Wall-clock cost of simulation frames
///
/// Wrap each frame's physics work in [`StepTimer::begin`] / [`StepTimer::end`]
/// to track the average and worst frame cost.
#[derive(Debug, Clone, Default)]
pub struct StepTimer {
    started: Option<Instant>,
    total_ms: f64,
    worst_ms: f32,
    frames: u64,
}

impl StepTimer {
    /// Create a timer with no recorded frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a frame
    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Mark the end of a frame and return its cost in milliseconds
    ///
    /// Returns 0 when no frame was begun.
    pub fn end(&mut self) -> f32 {
        let Some(started) = self.started.take() else {
            return 0.0;
        };
        let elapsed_ms = started.elapsed().as_secs_f32() * 1000.0;
        self.total_ms += f64::from(elapsed_ms);
        self.worst_ms = self.worst_ms.max(elapsed_ms);
        self.frames += 1;
        elapsed_ms
    }

    /// Mean frame cost in milliseconds
    pub fn average_ms(&self) -> f32 {
        if self.frames == 0 {
            0.0
        } else {
            (self.total_ms / self.frames as f64) as f32
        }
    }

    /// Most expensive frame in milliseconds
    pub fn worst_ms(&self) -> f32 {
        self.worst_ms
    }

    /// Frames recorded
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Accumulator that turns variable frame times into fixed simulation steps
///
/// The physics step is a complete unit of work, so callers feed real frame
/// time in and run `update(step)` once per returned step.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
}

impl FixedTimestep {
    /// Create an accumulator producing steps of `step` seconds
    ///
    /// `max_steps_per_frame` bounds catch-up work after a long stall; excess
    /// time is dropped.
    pub fn new(step: f32, max_steps_per_frame: u32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps_per_frame: max_steps_per_frame.max(1),
        }
    }

    /// Length of one step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add elapsed frame time and return how many steps are due
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        if !(self.step > 0.0) || !frame_time.is_finite() || frame_time <= 0.0 {
            return 0;
        }

        self.accumulator += frame_time;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == self.max_steps_per_frame && self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.4}s of simulation time after {} catch-up steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.step;
        }

        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        if self.step > 0.0 {
            self.accumulator / self.step
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep_accumulates() {
        let mut timestep = FixedTimestep::new(0.25, 8);
        assert_eq!(timestep.advance(0.1), 0);
        assert_eq!(timestep.advance(0.2), 1);
        assert!((timestep.alpha() - 0.2).abs() < 1e-5);
        assert_eq!(timestep.advance(0.5), 2);
    }

    #[test]
    fn test_fixed_timestep_caps_catch_up() {
        let mut timestep = FixedTimestep::new(0.1, 3);
        assert_eq!(timestep.advance(10.0), 3);
        assert!(timestep.alpha() < 1.0);
    }

    #[test]
    fn test_fixed_timestep_ignores_bad_input() {
        let mut timestep = FixedTimestep::new(0.1, 3);
        assert_eq!(timestep.advance(-1.0), 0);
        assert_eq!(timestep.advance(f32::NAN), 0);
    }

    #[test]
    fn test_step_timer_records_frames() {
        let mut timer = StepTimer::new();
        assert_eq!(timer.end(), 0.0);
        assert_eq!(timer.frames(), 0);

        for _ in 0..3 {
            timer.begin();
            timer.end();
        }
        assert_eq!(timer.frames(), 3);
        assert!(timer.worst_ms() >= timer.average_ms());
    }
}
