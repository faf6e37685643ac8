use std::time::Duration;

use stopwatch_core::{Phase, Snapshot, StopwatchCore};

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::pump::Pump;

/// Stopwatch core plus the clock it samples and the pump that refreshes it.
/// The pump runs exactly while the core is running; dropping the engine
/// drops the pump, which cancels it.
pub struct StopwatchEngine<C: Clock> {
    core: StopwatchCore,
    clock: C,
    pump: Pump,
    tick_interval: Duration,
    lap_scroll_offset: usize,
}

impl<C: Clock> StopwatchEngine<C> {
    pub fn new(clock: C, pump: Pump, config: &AppConfig) -> Self {
        let core = match config.max_laps {
            Some(max) => StopwatchCore::with_max_laps(max),
            None => StopwatchCore::new(),
        };
        Self {
            core,
            clock,
            pump,
            tick_interval: config.tick_interval(),
            lap_scroll_offset: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.core.phase()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.core.snapshot()
    }

    pub fn lap_times(&self) -> Vec<u64> {
        self.core.lap_times()
    }

    pub fn pump_generation(&self) -> usize {
        self.pump.generation()
    }

    pub fn start(&mut self) -> bool {
        let now = self.clock.now_ms();
        if !self.core.start(now) {
            log::trace!("start ignored while {:?}", self.core.phase());
            return false;
        }
        log::debug!("started at {}", now);
        self.pump.start(self.tick_interval);
        true
    }

    pub fn tick(&mut self) -> bool {
        self.core.tick(self.clock.now_ms())
    }

    /// Ticks on behalf of the pump, dropping anything a cancelled
    /// registration left in the queue.
    pub fn handle_pump(&mut self, generation: usize) -> bool {
        if !self.pump.is_current(generation) {
            log::trace!("dropping stale tick from pump {}", generation);
            return false;
        }
        self.tick()
    }

    pub fn lap(&mut self) -> bool {
        let now = self.clock.now_ms();
        if !self.core.lap(now) {
            log::trace!("lap ignored while {:?}", self.core.phase());
            return false;
        }
        log::debug!("lap {} opened at {}", self.core.lap_count(), now);
        true
    }

    pub fn stop(&mut self) -> bool {
        if !self.core.is_running() {
            log::trace!("stop ignored while {:?}", self.core.phase());
            return false;
        }
        self.pump.stop();
        let now = self.clock.now_ms();
        self.core.stop(now);
        log::debug!("stopped at {}, total {} ms", now, self.core.total_elapsed_ms());
        true
    }

    pub fn resume(&mut self) -> bool {
        let now = self.clock.now_ms();
        if !self.core.resume(now) {
            log::trace!("resume ignored while {:?}", self.core.phase());
            return false;
        }
        log::debug!("resumed at {}", now);
        self.pump.start(self.tick_interval);
        true
    }

    /// Clears all laps. A running stopwatch is stopped first.
    pub fn reset(&mut self) -> bool {
        self.pump.stop();
        self.lap_scroll_offset = 0;
        let cleared = self.core.reset();
        if cleared {
            log::debug!("reset");
        }
        cleared
    }

    /// Single-button control: start when idle, stop when running, resume
    /// when paused.
    pub fn toggle(&mut self) -> bool {
        match self.core.phase() {
            Phase::Idle => self.start(),
            Phase::Running => self.stop(),
            Phase::Paused => self.resume(),
        }
    }

    pub fn lap_scroll_offset(&self) -> usize {
        self.lap_scroll_offset
    }

    /// Moves the lap list window towards older laps.
    pub fn scroll_down(&mut self) -> bool {
        if self.lap_scroll_offset + 1 < self.core.lap_count() {
            self.lap_scroll_offset += 1;
            true
        } else {
            false
        }
    }

    pub fn scroll_up(&mut self) -> bool {
        if self.lap_scroll_offset > 0 {
            self.lap_scroll_offset -= 1;
            true
        } else {
            false
        }
    }
}
