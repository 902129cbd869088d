use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::targets::{self, is_bull, EndOption, GameMode, Multiplier, Target, TargetSequence};

/// Maximum number of darts in a round
pub const THROWS_PER_ROUND: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrowResult {
    Hit,
    Miss,
}

/// A single dart aimed at `target`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throw {
    pub result: ThrowResult,
    pub target: Target,
    /// Only present on hits when the multiplier rule is enabled
    pub multiplier: Option<Multiplier>,
}

impl Throw {
    pub fn hit(target: Target) -> Self {
        Self {
            result: ThrowResult::Hit,
            target,
            multiplier: None,
        }
    }

    pub fn miss(target: Target) -> Self {
        Self {
            result: ThrowResult::Miss,
            target,
            multiplier: None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.result == ThrowResult::Hit
    }

    /// Short label for the segment this throw landed on or missed, e.g. `T7`
    pub fn segment_label(&self, mode: GameMode) -> String {
        match self.multiplier {
            Some(m) if !is_bull(self.target) => format!("{}{}", m.prefix(), self.target),
            _ => targets::label(self.target, mode),
        }
    }

    /// Round log text, e.g. `Hit D5` or `Miss S12`
    pub fn describe(&self, mode: GameMode) -> String {
        match self.result {
            ThrowResult::Hit => format!("Hit {}", self.segment_label(mode)),
            ThrowResult::Miss => format!("Miss {}", targets::label(self.target, mode)),
        }
    }
}

/// Throws committed together. Normally three, shorter if submitted early.
pub type Round = Vec<Throw>;

/// User-facing choice of what to practise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub end_option: EndOption,
    /// Hits carry a multiplier and advance past that many targets
    pub skip_mode: bool,
}

impl SessionConfig {
    pub fn new(mode: GameMode, end_option: EndOption, skip_mode: bool) -> Self {
        Self {
            mode,
            end_option,
            skip_mode,
        }
    }

    pub fn title(&self) -> String {
        if self.skip_mode {
            format!("Darts {} Trainer (Skip Mode)", self.mode.title())
        } else {
            format!("Darts {} Trainer", self.mode.title())
        }
    }
}

/// Parameters the state machine runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub multiplier_enabled: bool,
    pub skip_advances_by_multiplier: bool,
    pub targets: TargetSequence,
}

impl From<&SessionConfig> for Rules {
    fn from(config: &SessionConfig) -> Self {
        Self {
            multiplier_enabled: config.skip_mode,
            skip_advances_by_multiplier: config.skip_mode,
            targets: targets::generate(config.mode, config.end_option),
        }
    }
}

/// Notifications for collaborators (sound cue, flashes, name prompt)
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    ThrowRecorded(Throw),
    TargetSkipped(Target),
    RoundSubmitted { throws: usize, auto: bool },
    Undone,
    Completed { darts_thrown: usize },
}

/// Round/throw tracking for one practice session
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    rules: Rules,
    current_idx: usize,
    pending: Vec<Throw>,
    rounds: Vec<Round>,
    skipped: Vec<Target>,
    suppress_auto_submit: bool,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let rules = Rules::from(&config);
        Self::with_rules(config, rules)
    }

    pub fn with_rules(config: SessionConfig, rules: Rules) -> Self {
        Self {
            config,
            rules,
            current_idx: 0,
            pending: Vec::with_capacity(THROWS_PER_ROUND),
            rounds: Vec::new(),
            skipped: Vec::new(),
            suppress_auto_submit: false,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn targets(&self) -> &TargetSequence {
        &self.rules.targets
    }

    pub fn current_index(&self) -> usize {
        self.current_idx
    }

    pub fn current_target(&self) -> Option<Target> {
        self.rules.targets.get(self.current_idx)
    }

    pub fn pending(&self) -> &[Throw] {
        &self.pending
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn skipped(&self) -> &[Target] {
        &self.skipped
    }

    pub fn is_complete(&self) -> bool {
        self.current_idx >= self.rules.targets.len()
    }

    /// Committed throws followed by pending ones
    pub fn all_throws(&self) -> impl Iterator<Item = &Throw> + '_ {
        self.rounds.iter().flatten().chain(self.pending.iter())
    }

    pub fn darts_thrown(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum::<usize>() + self.pending.len()
    }

    /// Hand over the events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record a dart against the current target. Returns false if ignored.
    pub fn record_throw(&mut self, result: ThrowResult, multiplier: Option<Multiplier>) -> bool {
        if self.pending.len() >= THROWS_PER_ROUND {
            debug!("throw ignored: round already has {THROWS_PER_ROUND} darts");
            return false;
        }
        let Some(target) = self.current_target() else {
            debug!("throw ignored: session complete");
            return false;
        };

        let multiplier = match result {
            ThrowResult::Hit if self.rules.multiplier_enabled => {
                Some(multiplier.unwrap_or(Multiplier::Single))
            }
            _ => None,
        };
        if matches!(multiplier, Some(m) if m != Multiplier::Single) && is_bull(target) {
            debug!(segment = target, "throw ignored: bulls have no double or treble");
            return false;
        }

        let throw = Throw {
            result,
            target,
            multiplier,
        };
        self.pending.push(throw);
        self.events.push(SessionEvent::ThrowRecorded(throw));

        if throw.is_hit() {
            let span = self.hit_span(&throw);
            let passed_over = self.rules.targets.as_slice()[span.start + 1..span.end].to_vec();
            self.skipped.extend(passed_over);
            self.current_idx = span.end;
            debug!(segment = target, next_index = self.current_idx, "hit");
            if self.is_complete() {
                self.mark_complete();
            }
        }

        if self.pending.len() == THROWS_PER_ROUND {
            if self.suppress_auto_submit {
                self.suppress_auto_submit = false;
            } else {
                self.commit(true);
            }
        }
        true
    }

    /// Pass over the current target without throwing at it
    pub fn skip_target(&mut self) -> bool {
        let Some(target) = self.current_target() else {
            return false;
        };
        self.skipped.push(target);
        self.current_idx += 1;
        self.events.push(SessionEvent::TargetSkipped(target));
        debug!(segment = target, "target skipped");
        if self.is_complete() {
            self.mark_complete();
        }
        true
    }

    /// Commit the pending throws, or three misses if nothing was thrown
    pub fn submit_round(&mut self) -> bool {
        self.commit(false)
    }

    /// Take back the last pending throw, or reopen the last committed round
    pub fn undo(&mut self) -> bool {
        if let Some(throw) = self.pending.pop() {
            if throw.is_hit() {
                self.revert_hit(&throw);
            }
            self.suppress_auto_submit = true;
        } else if let Some(round) = self.rounds.pop() {
            for throw in round.iter().rev().filter(|t| t.is_hit()) {
                self.revert_hit(throw);
            }
            self.pending = round;
            // A reopened full round is the re-fill the flag guards against
            self.suppress_auto_submit = self.pending.len() != THROWS_PER_ROUND;
        } else {
            return false;
        }
        self.events.push(SessionEvent::Undone);
        debug!(index = self.current_idx, pending = self.pending.len(), "undo");
        true
    }

    fn commit(&mut self, auto: bool) -> bool {
        let round = if self.pending.is_empty() {
            let Some(target) = self.current_target() else {
                debug!("submit ignored: nothing pending and session complete");
                return false;
            };
            vec![Throw::miss(target); THROWS_PER_ROUND]
        } else {
            std::mem::take(&mut self.pending)
        };

        self.suppress_auto_submit = false;
        self.events.push(SessionEvent::RoundSubmitted {
            throws: round.len(),
            auto,
        });
        debug!(throws = round.len(), auto, "round submitted");
        self.rounds.push(round);
        true
    }

    fn mark_complete(&mut self) {
        let darts_thrown = self.darts_thrown();
        self.events.push(SessionEvent::Completed { darts_thrown });
        debug!(darts_thrown, "session complete");
    }

    /// Indices a hit moved across: from the target it was aimed at to where
    /// the session went next, clamped to the end of the sequence
    fn hit_span(&self, throw: &Throw) -> Range<usize> {
        let from = self
            .rules
            .targets
            .position(throw.target)
            .unwrap_or(self.current_idx);
        let step = match throw.multiplier {
            Some(m) if self.rules.skip_advances_by_multiplier => m.factor(),
            _ => 1,
        };
        from..(from + step).min(self.rules.targets.len())
    }

    fn revert_hit(&mut self, throw: &Throw) {
        let span = self.hit_span(throw);
        self.current_idx = self.current_idx.saturating_sub(span.len());
        for idx in span.start + 1..span.end {
            let passed = self.rules.targets.as_slice()[idx];
            if let Some(pos) = self.skipped.iter().rposition(|&t| t == passed) {
                self.skipped.remove(pos);
            }
        }
    }
}
