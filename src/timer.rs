//! Pomodoro work/break sequencer.
//!
//! A cycle is a fixed queue of phases consumed from the front. Starting a
//! phase pops it from the queue; when its time runs out the timer stops and
//! waits for the next `start`, `next`, or auto-advance event.

use crate::constants::{DEFAULT_LONG_BREAK_MINUTES, DEFAULT_SHORT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};
use log::{info, warn};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// One step of the Pomodoro cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Focused work
    Work,
    /// Short rest between work phases
    ShortBreak,
    /// Long rest at the end of the cycle
    LongBreak,
    /// Cycle finished
    Done,
}

impl Phase {
    /// True for both kinds of break
    #[must_use]
    pub const fn is_break(self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Work => "Work",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
            Self::Done => "Done",
        };
        f.write_str(label)
    }
}

/// Phase order of a full cycle
pub const POMODORO_SEQUENCE: [Phase; 7] = [
    Phase::Work,
    Phase::ShortBreak,
    Phase::Work,
    Phase::ShortBreak,
    Phase::Work,
    Phase::LongBreak,
    Phase::Done,
];

/// Configured length of each timed phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    /// Work phase length
    pub work: Duration,
    /// Short break length
    pub short_break: Duration,
    /// Long break length
    pub long_break: Duration,
}

impl PhaseDurations {
    /// Durations given in whole minutes, saturating on overflow
    #[must_use]
    pub const fn from_minutes(work: u64, short_break: u64, long_break: u64) -> Self {
        Self {
            work: Duration::from_secs(work.saturating_mul(60)),
            short_break: Duration::from_secs(short_break.saturating_mul(60)),
            long_break: Duration::from_secs(long_break.saturating_mul(60)),
        }
    }

    /// Length of `phase`; `Done` has no length
    #[must_use]
    pub const fn for_phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => self.work,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
            Phase::Done => Duration::ZERO,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_WORK_MINUTES, DEFAULT_SHORT_BREAK_MINUTES, DEFAULT_LONG_BREAK_MINUTES)
    }
}

/// Pomodoro timer state, owned by one session
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    durations: PhaseDurations,
    queue: VecDeque<Phase>,
    current: Option<Phase>,
    phase_length: Duration,
    start_time: Duration,
    paused_duration: Duration,
    pause_started: Option<Duration>,
    running: bool,
    remaining: Duration,
}

impl PomodoroTimer {
    /// A timer at the start of a fresh cycle
    #[must_use]
    pub fn new(durations: PhaseDurations) -> Self {
        let mut timer = Self {
            durations,
            queue: VecDeque::with_capacity(POMODORO_SEQUENCE.len()),
            current: None,
            phase_length: Duration::ZERO,
            start_time: Duration::ZERO,
            paused_duration: Duration::ZERO,
            pause_started: None,
            running: false,
            remaining: Duration::ZERO,
        };
        timer.reset();
        timer
    }

    /// Restore the full cycle and clear all timing state
    pub fn reset(&mut self) {
        self.queue.clear();
        self.queue.extend(POMODORO_SEQUENCE);
        self.current = None;
        self.phase_length = Duration::ZERO;
        self.start_time = Duration::ZERO;
        self.paused_duration = Duration::ZERO;
        self.pause_started = None;
        self.running = false;
        self.remaining = Duration::ZERO;
    }

    /// Begin the next queued phase if the timer is idle
    ///
    /// Returns the phase that was started.
    pub fn start(&mut self, now: Duration) -> Option<Phase> {
        if self.running {
            return None;
        }
        self.begin_next(now)
    }

    /// Skip whatever is running and begin the next queued phase
    pub fn next(&mut self, now: Duration) -> Option<Phase> {
        self.begin_next(now)
    }

    /// Pause or resume the running phase; returns whether it is now paused
    pub fn toggle_pause(&mut self, now: Duration) -> bool {
        if !self.running {
            return false;
        }

        match self.pause_started.take() {
            Some(started) => {
                self.paused_duration += now.saturating_sub(started);
                false
            }
            None => {
                self.pause_started = Some(now);
                true
            }
        }
    }

    /// Update the remaining time; stops the timer once the phase has elapsed
    pub fn tick(&mut self, now: Duration) -> Duration {
        if self.running && self.pause_started.is_none() {
            let elapsed = now
                .saturating_sub(self.start_time)
                .saturating_sub(self.paused_duration);
            self.remaining = self.phase_length.saturating_sub(elapsed);

            if self.remaining.is_zero() {
                self.running = false;
                if let Some(phase) = self.current {
                    info!("{phase} finished");
                }
            }
        }
        self.remaining
    }

    /// Start the next phase from the standing/sitting signal, if appropriate
    ///
    /// Sitting down while a work phase is queued starts it; standing up while a
    /// break is queued starts the break. Nothing happens while a phase runs.
    pub fn auto_advance(&mut self, standing: bool, now: Duration) -> Option<Phase> {
        if self.running {
            return None;
        }

        let upcoming = *self.queue.front()?;
        let should_start = if standing { upcoming.is_break() } else { upcoming == Phase::Work };
        if !should_start {
            return None;
        }

        info!(
            "Auto-advancing to {upcoming} ({})",
            if standing { "standing" } else { "sitting" }
        );
        self.begin_next(now)
    }

    fn begin_next(&mut self, now: Duration) -> Option<Phase> {
        let Some(phase) = self.queue.pop_front() else {
            warn!("Pomodoro cycle exhausted; reset the timer to start again");
            self.running = false;
            return None;
        };

        self.current = Some(phase);
        self.start_time = now;
        self.paused_duration = Duration::ZERO;
        self.pause_started = None;
        self.phase_length = self.durations.for_phase(phase);

        if phase == Phase::Done {
            info!("You completed a work cycle!");
            self.running = false;
            self.remaining = Duration::ZERO;
        } else {
            info!("Starting {phase} for {}s", self.phase_length.as_secs());
            self.running = true;
            self.remaining = self.phase_length;
        }

        Some(phase)
    }

    /// Phases still queued, front first
    pub fn sequence(&self) -> impl Iterator<Item = Phase> + '_ {
        self.queue.iter().copied()
    }

    /// Next phase to start
    #[must_use]
    pub fn upcoming(&self) -> Option<Phase> {
        self.queue.front().copied()
    }

    /// Phase most recently started
    #[must_use]
    pub const fn current_phase(&self) -> Option<Phase> {
        self.current
    }

    /// Time left in the current phase as of the last tick
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// A phase is in progress (possibly paused)
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The running phase is paused
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.pause_started.is_some()
    }

    /// Accumulated pause time of the current phase
    #[must_use]
    pub const fn paused_duration(&self) -> Duration {
        self.paused_duration
    }

    /// The `Done` phase has been reached
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current == Some(Phase::Done)
    }

    /// Configured phase lengths
    #[must_use]
    pub const fn durations(&self) -> PhaseDurations {
        self.durations
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(PhaseDurations::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_reset_state() {
        let timer = PomodoroTimer::default();
        assert_eq!(timer.sequence().collect::<Vec<_>>(), POMODORO_SEQUENCE.to_vec());
        assert_eq!(timer.remaining(), Duration::ZERO);
        assert!(!timer.is_running());
        assert!(timer.current_phase().is_none());
    }

    #[test]
    fn test_work_phase_runs_out() {
        let mut timer = PomodoroTimer::new(PhaseDurations::from_minutes(25, 3, 35));
        assert_eq!(timer.start(secs(0)), Some(Phase::Work));
        assert_eq!(timer.tick(secs(600)), secs(900));
        assert!(timer.is_running());

        assert_eq!(timer.tick(secs(1500)), Duration::ZERO);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut timer = PomodoroTimer::default();
        timer.start(secs(0));
        assert_eq!(timer.start(secs(10)), None);
        assert_eq!(timer.upcoming(), Some(Phase::ShortBreak));
    }

    #[test]
    fn test_next_discards_current_phase() {
        let mut timer = PomodoroTimer::default();
        timer.start(secs(0));
        assert_eq!(timer.next(secs(60)), Some(Phase::ShortBreak));
        assert_eq!(timer.tick(secs(60)), secs(180));
    }

    #[test]
    fn test_pause_excludes_time() {
        let mut timer = PomodoroTimer::new(PhaseDurations::from_minutes(1, 1, 1));
        timer.start(secs(0));
        timer.tick(secs(10));

        assert!(timer.toggle_pause(secs(10)));
        assert_eq!(timer.tick(secs(40)), secs(50));
        assert!(!timer.toggle_pause(secs(40)));
        assert_eq!(timer.paused_duration(), secs(30));

        assert_eq!(timer.tick(secs(50)), secs(40));
    }

    #[test]
    fn test_pause_when_idle_is_noop() {
        let mut timer = PomodoroTimer::default();
        assert!(!timer.toggle_pause(secs(5)));
        assert!(!timer.is_paused());
    }

    #[test]
    fn test_done_completes_cycle() {
        let mut timer = PomodoroTimer::default();
        for _ in 0..6 {
            timer.next(secs(0));
        }
        assert_eq!(timer.next(secs(0)), Some(Phase::Done));
        assert!(timer.is_complete());
        assert!(!timer.is_running());
        assert_eq!(timer.next(secs(0)), None);
    }

    #[test]
    fn test_auto_advance_sitting_starts_work() {
        let mut timer = PomodoroTimer::default();
        assert_eq!(timer.auto_advance(true, secs(0)), None);
        assert_eq!(timer.auto_advance(false, secs(0)), Some(Phase::Work));
        assert_eq!(timer.auto_advance(false, secs(1)), None);
    }

    #[test]
    fn test_auto_advance_standing_starts_break() {
        let mut timer = PomodoroTimer::new(PhaseDurations::from_minutes(1, 1, 1));
        timer.start(secs(0));
        timer.tick(secs(60));
        assert!(!timer.is_running());

        assert_eq!(timer.auto_advance(false, secs(61)), None);
        assert_eq!(timer.auto_advance(true, secs(61)), Some(Phase::ShortBreak));
    }

    #[test]
    fn test_reset_restores_sequence() {
        let mut timer = PomodoroTimer::default();
        timer.start(secs(0));
        timer.toggle_pause(secs(5));
        timer.reset();

        assert_eq!(timer.sequence().count(), 7);
        assert!(!timer.is_running());
        assert!(!timer.is_paused());
        assert_eq!(timer.remaining(), Duration::ZERO);
    }
}
