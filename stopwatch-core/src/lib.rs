//! Pure stopwatch logic library with no platform dependencies.
//! Testable on host. Callers sample the clock and pass readings in.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// One row of the lap table, most recent first.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapRow {
    pub lap_number: usize,
    pub duration_ms: u64,
    pub is_fastest: bool,
    pub is_slowest: bool,
}

/// Read-only projection of the stopwatch for whatever draws it.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Snapshot {
    pub total_elapsed_ms: u64,
    pub laps: Vec<LapRow>,
    pub is_running: bool,
    pub can_lap: bool,
    pub can_start: bool,
    pub can_resume: bool,
    pub can_stop: bool,
    pub can_reset: bool,
}

/// Stopwatch state machine.
///
/// The lap in progress lives in `current_lap_ms`; while running it holds the
/// time banked before the live segment began, once paused it holds the whole
/// lap. `completed` is oldest first.
#[derive(Clone, Debug, Default)]
pub struct StopwatchCore {
    segment_start_ms: Option<u64>,
    now_ms: u64,
    current_lap_ms: Option<u64>,
    completed: Vec<u64>,
    max_laps: Option<usize>,
}

impl StopwatchCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the lap list; `lap()` becomes a no-op once `max_laps` laps exist.
    pub fn with_max_laps(max_laps: usize) -> Self {
        Self {
            max_laps: Some(max_laps),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.segment_start_ms, self.current_lap_ms) {
            (Some(_), _) => Phase::Running,
            (None, Some(_)) => Phase::Paused,
            (None, None) => Phase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.segment_start_ms.is_some()
    }

    fn segment_ms(&self) -> u64 {
        self.segment_start_ms
            .map(|start| self.now_ms.saturating_sub(start))
            .unwrap_or(0)
    }

    /// Number of laps including the one in progress.
    pub fn lap_count(&self) -> usize {
        self.completed.len() + usize::from(self.current_lap_ms.is_some())
    }

    pub fn can_lap(&self) -> bool {
        self.is_running() && self.max_laps.map_or(true, |max| self.lap_count() < max)
    }

    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.phase() != Phase::Idle {
            return false;
        }
        self.segment_start_ms = Some(now_ms);
        self.now_ms = now_ms;
        self.current_lap_ms = Some(0);
        true
    }

    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.now_ms = now_ms;
        true
    }

    /// Closes the lap in progress and opens a fresh one at `now_ms`.
    pub fn lap(&mut self, now_ms: u64) -> bool {
        if !self.can_lap() {
            return false;
        }
        self.now_ms = now_ms;
        let finished = self.current_lap_ms.unwrap_or(0) + self.segment_ms();
        self.completed.push(finished);
        self.current_lap_ms = Some(0);
        self.segment_start_ms = Some(now_ms);
        true
    }

    /// Folds the live segment into the current lap without opening a new one.
    pub fn stop(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.now_ms = now_ms;
        self.current_lap_ms = Some(self.current_lap_ms.unwrap_or(0) + self.segment_ms());
        self.segment_start_ms = None;
        self.now_ms = 0;
        true
    }

    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.phase() != Phase::Paused {
            return false;
        }
        self.segment_start_ms = Some(now_ms);
        self.now_ms = now_ms;
        true
    }

    /// Clears everything back to idle. Returns false if already idle.
    pub fn reset(&mut self) -> bool {
        if self.phase() == Phase::Idle {
            return false;
        }
        self.segment_start_ms = None;
        self.now_ms = 0;
        self.current_lap_ms = None;
        self.completed.clear();
        true
    }

    pub fn total_elapsed_ms(&self) -> u64 {
        self.completed.iter().sum::<u64>() + self.current_lap_ms.unwrap_or(0) + self.segment_ms()
    }

    /// Live duration of the lap in progress.
    pub fn current_lap_ms(&self) -> Option<u64> {
        self.current_lap_ms.map(|banked| banked + self.segment_ms())
    }

    /// Lap durations most recent first; index 0 is the banked part of the lap
    /// in progress, without the live segment.
    pub fn lap_times(&self) -> Vec<u64> {
        self.current_lap_ms
            .into_iter()
            .chain(self.completed.iter().rev().copied())
            .collect()
    }

    pub fn completed_laps(&self) -> &[u64] {
        &self.completed
    }

    pub fn snapshot(&self) -> Snapshot {
        let phase = self.phase();
        let extremes = lap_extremes(&self.completed);
        let count = self.lap_count();

        let mut laps = Vec::with_capacity(count);
        if let Some(current) = self.current_lap_ms() {
            laps.push(LapRow {
                lap_number: count,
                duration_ms: current,
                is_fastest: false,
                is_slowest: false,
            });
        }
        for (idx, &duration_ms) in self.completed.iter().enumerate().rev() {
            let (is_fastest, is_slowest) = match extremes {
                Some((fastest, slowest)) => (duration_ms == fastest, duration_ms == slowest),
                None => (false, false),
            };
            laps.push(LapRow {
                lap_number: idx + 1,
                duration_ms,
                is_fastest,
                is_slowest,
            });
        }

        Snapshot {
            total_elapsed_ms: self.total_elapsed_ms(),
            laps,
            is_running: phase == Phase::Running,
            can_lap: self.can_lap(),
            can_start: phase == Phase::Idle,
            can_resume: phase == Phase::Paused,
            can_stop: phase == Phase::Running,
            can_reset: phase == Phase::Paused,
        }
    }
}

/// Fastest and slowest durations among completed laps.
/// `None` with fewer than two laps, where nothing gets marked.
pub fn lap_extremes(completed: &[u64]) -> Option<(u64, u64)> {
    if completed.len() < 2 {
        return None;
    }
    let fastest = completed.iter().copied().min()?;
    let slowest = completed.iter().copied().max()?;
    Some((fastest, slowest))
}

/// Format milliseconds as "MM:SS,cc" (minutes wrap at the hour)
pub fn format_mm_ss_cs(ms: u64) -> String {
    let total_secs = ms / 1000;
    let cs = (ms % 1000) / 10;
    let m = (total_secs / 60) % 60;
    let s = total_secs % 60;
    format!("{:02}:{:02},{:02}", m, s, cs)
}

/// Format milliseconds as "HH:MM:SS.cs" (centiseconds)
pub fn format_hms_cs(ms: u64) -> String {
    let total_secs = ms / 1000;
    let cs = (ms % 1000) / 10;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}.{:02}", h, m, s, cs)
}
