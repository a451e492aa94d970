//! Pour-over brew timer
//!
//! The timer never reads a clock. Callers pass the current monotonic time
//! as a `Duration` since any fixed origin, once per animation frame.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::schedule::BrewStep;

/// How long the last step runs after it starts
pub const FINAL_STEP_SECS: u64 = 60;

/// `"1:30"` -> 90. Missing or unreadable parts count as zero.
pub fn parse_step_time(time: &str) -> u64 {
    let mut parts = time.split(':');
    let part = |p: Option<&str>| {
        p.map(str::trim)
            .and_then(|p| p.parse::<u64>().ok())
            .unwrap_or(0)
    };
    let minutes = part(parts.next());
    let seconds = part(parts.next());
    minutes.saturating_mul(60).saturating_add(seconds)
}

/// `MM:SS` with both halves zero-padded
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTiming {
    pub start_secs: u64,
    pub end_secs: u64,
}

impl StepTiming {
    pub fn duration_secs(&self) -> u64 {
        self.end_secs.saturating_sub(self.start_secs)
    }

    /// Share of this step completed after `elapsed` seconds, in [0, 1]
    pub fn progress(&self, elapsed: f64) -> f64 {
        if elapsed >= self.end_secs as f64 {
            1.0
        } else if elapsed > self.start_secs as f64 {
            ((elapsed - self.start_secs as f64) / self.duration_secs() as f64).min(1.0)
        } else {
            0.0
        }
    }
}

/// Each step ends where the next starts; the last runs for a minute.
pub fn step_timings(steps: &[BrewStep]) -> Vec<StepTiming> {
    let starts: Vec<u64> = steps.iter().map(|s| parse_step_time(&s.time)).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| StepTiming {
            start_secs: start,
            end_secs: starts.get(i + 1).copied().unwrap_or(start.saturating_add(FINAL_STEP_SECS)),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Running,
    Paused,
}

/// Frame data for one timer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerTick {
    pub elapsed_secs: f64,
    pub display: String,
    pub active_step: Option<usize>,
    pub progress: Vec<f64>,
    pub state: TimerState,
}

#[derive(Debug, Clone)]
pub struct BrewTimer {
    steps: Vec<StepTiming>,
    started_at: Duration,
    paused_elapsed: Option<Duration>,
}

impl BrewTimer {
    pub fn start(steps: &[BrewStep], now: Duration) -> Self {
        Self {
            steps: step_timings(steps),
            started_at: now,
            paused_elapsed: None,
        }
    }

    pub fn state(&self) -> TimerState {
        if self.paused_elapsed.is_some() {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        self.paused_elapsed
            .unwrap_or_else(|| now.saturating_sub(self.started_at))
    }

    pub fn pause(&mut self, now: Duration) {
        if self.paused_elapsed.is_none() {
            self.paused_elapsed = Some(now.saturating_sub(self.started_at));
        }
    }

    /// Rebase the start so elapsed time continues from where it paused
    pub fn resume(&mut self, now: Duration) {
        if let Some(elapsed) = self.paused_elapsed.take() {
            self.started_at = now.saturating_sub(elapsed);
        }
    }

    /// The pause button: pauses a running timer, resumes a paused one
    pub fn toggle_pause(&mut self, now: Duration) -> TimerState {
        match self.state() {
            TimerState::Running => self.pause(now),
            TimerState::Paused => self.resume(now),
        }
        self.state()
    }

    pub fn tick(&self, now: Duration) -> TimerTick {
        let elapsed = self.elapsed(now).as_secs_f64();
        let active_step = self
            .steps
            .iter()
            .position(|s| elapsed >= s.start_secs as f64 && elapsed < s.end_secs as f64);
        TimerTick {
            elapsed_secs: elapsed,
            display: format_elapsed(elapsed.floor() as u64),
            active_step,
            progress: self.steps.iter().map(|s| s.progress(elapsed)).collect(),
            state: self.state(),
        }
    }
}

/// Independent timers, one per coffee id
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: HashMap<String, BrewTimer>,
}

impl TimerRegistry {
    pub fn start(&mut self, coffee_id: &str, steps: &[BrewStep], now: Duration) -> &BrewTimer {
        tracing::debug!(coffee_id, "brew timer started");
        self.timers
            .insert(coffee_id.to_string(), BrewTimer::start(steps, now));
        &self.timers[coffee_id]
    }

    pub fn toggle_pause(&mut self, coffee_id: &str, now: Duration) -> Option<TimerState> {
        self.timers.get_mut(coffee_id).map(|t| t.toggle_pause(now))
    }

    /// Stop and forget the timer. Returns whether one was running.
    pub fn reset(&mut self, coffee_id: &str) -> bool {
        self.timers.remove(coffee_id).is_some()
    }

    pub fn tick(&self, coffee_id: &str, now: Duration) -> Option<TimerTick> {
        self.timers.get(coffee_id).map(|t| t.tick(now))
    }

    pub fn is_active(&self, coffee_id: &str) -> bool {
        self.timers.contains_key(coffee_id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
