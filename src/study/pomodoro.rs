//! Pomodoro countdown state machine.
//!
//! The machine itself is pure; the TUI drives it by sending one tick per
//! second from a spawned task while it is running. Pause and reset abort
//! that task, so a stale tick can never race a fresh run.

pub const DEFAULT_DURATION_SECS: u32 = 1500; // 25 minutes

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Decremented, still counting down.
    Continued,
    /// Reached zero; the timer forced itself to Paused. Raised exactly once
    /// per run-down.
    Finished,
    /// Not running; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pomodoro {
    pub remaining: u32,
    pub phase: Phase,
    duration: u32,
}

impl Pomodoro {
    pub fn new(duration: u32) -> Self {
        Self {
            remaining: duration,
            phase: Phase::Idle,
            duration,
        }
    }

    /// Idle/Paused -> Running, only while time remains. Returns whether the
    /// transition happened (the caller starts the ticker on `true`).
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Running || self.remaining == 0 {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// Running -> Paused. No-op otherwise.
    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    /// Any state -> Idle with the full duration restored.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.remaining = self.duration;
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Running {
            return Tick::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = Phase::Paused;
            Tick::Finished
        } else {
            Tick::Continued
        }
    }
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

/// Formats seconds as `M:SS` (`1500` -> `"25:00"`).
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
