use std::fmt;

use crate::session::{Round, Session, Throw};
use crate::targets::{Target, TargetSequence};
use crate::util::{median, percentage, round_to_tenth};

/// Attempts at which the heat colour saturates
const HEAT_SATURATION_ATTEMPTS: f64 = 30.0;

/// A percentage rounded to one decimal, or `-` when there is nothing to rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    Value(f64),
    Unavailable,
}

impl Rate {
    pub fn from_counts(hits: usize, total: usize) -> Self {
        percentage(hits, total)
            .map(|p| Rate::Value(round_to_tenth(p)))
            .unwrap_or(Rate::Unavailable)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Rate::Value(v) => Some(*v),
            Rate::Unavailable => None,
        }
    }

    /// `75.0%`, or a bare `-`
    pub fn with_percent(&self) -> String {
        match self {
            Rate::Value(v) => format!("{v:.1}%"),
            Rate::Unavailable => "-".to_string(),
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Value(v) => write!(f, "{v:.1}"),
            Rate::Unavailable => f.write_str("-"),
        }
    }
}

/// Median number of darts per committed round
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundLengthMedian {
    /// Odd number of rounds: the middle length
    Middle(usize),
    /// Even number of rounds: mean of the two middle lengths
    Between(f64),
}

impl fmt::Display for RoundLengthMedian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundLengthMedian::Middle(n) => write!(f, "{n}"),
            RoundLengthMedian::Between(v) => write!(f, "{v:.1}"),
        }
    }
}

pub fn median_round_length(rounds: &[Round]) -> Option<RoundLengthMedian> {
    let lengths: Vec<f64> = rounds.iter().map(|r| r.len() as f64).collect();
    let value = median(&lengths)?;
    if lengths.len() % 2 == 1 {
        Some(RoundLengthMedian::Middle(value as usize))
    } else {
        Some(RoundLengthMedian::Between(value))
    }
}

pub fn format_median(median: Option<RoundLengthMedian>) -> String {
    median.map_or_else(|| "-".to_string(), |m| m.to_string())
}

/// One row of the per-target table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetStat {
    pub target: Target,
    pub attempts: usize,
    pub rate: Rate,
    pub cumulative: usize,
}

/// Per-target attempts, hit rate and cumulative attempts, in sequence order.
///
/// Cumulative counts run up to the furthest target that has been thrown at;
/// rows past it read as untouched.
pub fn target_stats<'a, I>(sequence: &TargetSequence, throws: I, skipped: &[Target]) -> Vec<TargetStat>
where
    I: IntoIterator<Item = &'a Throw>,
{
    let mut attempts = vec![0usize; sequence.len()];
    let mut hits = vec![0usize; sequence.len()];
    for throw in throws {
        if let Some(idx) = sequence.position(throw.target) {
            attempts[idx] += 1;
            if throw.is_hit() {
                hits[idx] += 1;
            }
        }
    }

    let furthest = attempts.iter().rposition(|&a| a > 0);
    let mut running = 0;

    sequence
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            if furthest.map_or(true, |f| idx > f) {
                return TargetStat {
                    target,
                    attempts: 0,
                    rate: Rate::Unavailable,
                    cumulative: 0,
                };
            }
            running += attempts[idx];
            let rate = if skipped.contains(&target) {
                Rate::Unavailable
            } else {
                Rate::from_counts(hits[idx], attempts[idx])
            };
            TargetStat {
                target,
                attempts: attempts[idx],
                rate,
                cumulative: running,
            }
        })
        .collect()
}

/// Everything shown in the stats panels, recomputed from session state
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub hits: usize,
    pub misses: usize,
    pub darts_thrown: usize,
    pub hit_rate: Rate,
    pub targets: Vec<TargetStat>,
    pub median_round_length: Option<RoundLengthMedian>,
    pub skipped: Vec<Target>,
}

impl SessionStats {
    pub fn from_session(session: &Session) -> Self {
        let hits = session.all_throws().filter(|t| t.is_hit()).count();
        let darts_thrown = session.darts_thrown();

        Self {
            hits,
            misses: darts_thrown - hits,
            darts_thrown,
            hit_rate: Rate::from_counts(hits, darts_thrown),
            targets: target_stats(session.targets(), session.all_throws(), session.skipped()),
            median_round_length: median_round_length(session.rounds()),
            skipped: session.skipped().to_vec(),
        }
    }
}

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// `#ccc`
pub const NO_DATA_GREY: Rgb = Rgb(204, 204, 204);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Dark red below 5%, orange to yellow from 5% to 10%, green from 10% up
pub fn rate_color(rate: Rate) -> Rgb {
    match rate {
        Rate::Unavailable => NO_DATA_GREY,
        Rate::Value(r) if r >= 10.0 => Rgb(0, channel(100.0 + (r - 10.0) / 90.0 * 100.0), 0),
        Rate::Value(r) if r >= 5.0 => Rgb(255, channel(120.0 + (r - 5.0) / 5.0 * 80.0), 0),
        Rate::Value(r) => Rgb(channel(150.0 + r / 5.0 * 105.0), 0, 0),
    }
}

/// Green for few attempts through to red at 30 or more
pub fn attempts_color(attempts: usize) -> Rgb {
    if attempts == 0 {
        return NO_DATA_GREY;
    }
    let ratio = (attempts as f64 / HEAT_SATURATION_ATTEMPTS).min(1.0);
    Rgb(channel(255.0 * ratio), channel(255.0 * (1.0 - ratio)), 0)
}
