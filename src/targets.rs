use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Outer bull segment value
pub const OUTER_BULL: Target = 25;
/// Inner bull segment value
pub const INNER_BULL: Target = 50;

/// A dartboard segment value: 1-20, or one of the bulls
pub type Target = u8;

/// Which ring of the board a session aims at
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameMode {
    Singles,
    #[default]
    Doubles,
    Trebles,
}

impl GameMode {
    /// Prefix used when labelling a plain (non-bull) target in this mode
    pub fn prefix(&self) -> char {
        match self {
            GameMode::Singles => 'S',
            GameMode::Doubles => 'D',
            GameMode::Trebles => 'T',
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameMode::Singles => "Singles",
            GameMode::Doubles => "Doubles",
            GameMode::Trebles => "Trebles",
        }
    }
}

/// Where a session stops: after 20, or after one or both bulls
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EndOption {
    #[default]
    End,
    Bull,
    Inner,
}

impl EndOption {
    pub fn describe(&self, mode: GameMode) -> String {
        match self {
            EndOption::End => format!("to {}20", mode.prefix()),
            EndOption::Bull => "25 + Bull".to_string(),
            EndOption::Inner => "Bull".to_string(),
        }
    }
}

/// Multiplier carried by a hit in skip mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplier {
    Single,
    Double,
    Treble,
}

impl Multiplier {
    pub fn factor(&self) -> usize {
        match self {
            Multiplier::Single => 1,
            Multiplier::Double => 2,
            Multiplier::Treble => 3,
        }
    }

    pub fn prefix(&self) -> char {
        match self {
            Multiplier::Single => 'S',
            Multiplier::Double => 'D',
            Multiplier::Treble => 'T',
        }
    }
}

pub fn is_bull(target: Target) -> bool {
    target == OUTER_BULL || target == INNER_BULL
}

/// Label a target the way the board reads it in the given mode
pub fn label(target: Target, mode: GameMode) -> String {
    match target {
        INNER_BULL => "Bull".to_string(),
        OUTER_BULL => "25".to_string(),
        t => format!("{}{}", mode.prefix(), t),
    }
}

/// Ordered, duplicate-free list of targets for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSequence {
    targets: Vec<Target>,
}

impl TargetSequence {
    pub fn generate(end_option: EndOption) -> Self {
        let mut targets: Vec<Target> = (1..=20).collect();
        match end_option {
            EndOption::End => {}
            EndOption::Bull => targets.extend([OUTER_BULL, INNER_BULL]),
            EndOption::Inner => targets.push(INNER_BULL),
        }
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Target> {
        self.targets.get(idx).copied()
    }

    pub fn position(&self, target: Target) -> Option<usize> {
        self.targets.iter().position(|&t| t == target)
    }

    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        self.targets.iter().copied()
    }
}

/// Build the target sequence for a mode and end option.
///
/// The mode only affects labelling; every mode walks 1..20 in order.
pub fn generate(_mode: GameMode, end_option: EndOption) -> TargetSequence {
    TargetSequence::generate(end_option)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_end_is_one_to_twenty() {
        let seq = generate(GameMode::Doubles, EndOption::End);
        assert_eq!(seq.len(), 20);
        assert_eq!(seq.as_slice(), (1..=20).collect::<Vec<Target>>().as_slice());
    }

    #[test]
    fn test_generate_bull_appends_both_bulls() {
        let seq = generate(GameMode::Singles, EndOption::Bull);
        assert_eq!(seq.len(), 22);
        assert_eq!(seq.get(20), Some(OUTER_BULL));
        assert_eq!(seq.get(21), Some(INNER_BULL));
    }

    #[test]
    fn test_generate_inner_appends_inner_bull_only() {
        let seq = generate(GameMode::Singles, EndOption::Inner);
        assert_eq!(seq.len(), 21);
        assert_eq!(seq.get(20), Some(INNER_BULL));
        assert_eq!(seq.position(OUTER_BULL), None);
    }

    #[test]
    fn test_generate_is_duplicate_free() {
        for end in [EndOption::End, EndOption::Bull, EndOption::Inner] {
            let seq = generate(GameMode::Trebles, end);
            let mut sorted = seq.as_slice().to_vec();
            sorted.dedup();
            assert_eq!(sorted.len(), seq.len());
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(5, GameMode::Singles), "S5");
        assert_eq!(label(20, GameMode::Doubles), "D20");
        assert_eq!(label(1, GameMode::Trebles), "T1");
        assert_eq!(label(OUTER_BULL, GameMode::Singles), "25");
        assert_eq!(label(INNER_BULL, GameMode::Doubles), "Bull");
    }

    #[test]
    fn test_end_option_describe() {
        assert_eq!(EndOption::End.describe(GameMode::Singles), "to S20");
        assert_eq!(EndOption::Bull.describe(GameMode::Singles), "25 + Bull");
        assert_eq!(EndOption::Inner.describe(GameMode::Singles), "Bull");
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(GameMode::Trebles.to_string(), "trebles");
        assert_eq!(EndOption::Inner.to_string(), "inner");
    }

    #[test]
    fn test_multiplier_factor() {
        assert_eq!(Multiplier::Single.factor(), 1);
        assert_eq!(Multiplier::Double.factor(), 2);
        assert_eq!(Multiplier::Treble.factor(), 3);
    }
}
