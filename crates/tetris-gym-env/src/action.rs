use std::str::FromStr;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// The discrete action space.
///
/// Discriminants are the integer action ids an agent emits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Action {
    /// Let gravity act: same effect as [`Action::SoftDrop`].
    #[display("noop")]
    Noop = 0,
    #[display("move-left")]
    MoveLeft = 1,
    #[display("move-right")]
    MoveRight = 2,
    #[display("soft-drop")]
    SoftDrop = 3,
    #[display("rotate-clockwise")]
    RotateClockwise = 4,
    #[display("rotate-counter-clockwise")]
    RotateCounterClockwise = 5,
    #[display("hard-drop")]
    HardDrop = 6,
}

impl Action {
    pub const COUNT: usize = 7;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Noop,
        Self::MoveLeft,
        Self::MoveRight,
        Self::SoftDrop,
        Self::RotateClockwise,
        Self::RotateCounterClockwise,
        Self::HardDrop,
    ];

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// An action id outside `0..Action::COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid action {value}, expected 0..={}", Action::COUNT - 1)]
pub struct InvalidActionError {
    pub value: usize,
}

/// An unknown action name.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown action '{name}'")]
pub struct ParseActionError {
    pub name: String,
}

impl TryFrom<usize> for Action {
    type Error = InvalidActionError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value)
            .copied()
            .ok_or(InvalidActionError { value })
    }
}

impl TryFrom<u8> for Action {
    type Error = InvalidActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(usize::from(value))
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.to_string() == s)
            .ok_or_else(|| ParseActionError { name: s.to_owned() })
    }
}

impl Distribution<Action> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action::ALL[rng.random_range(0..Action::COUNT)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_positions() {
        for (i, action) in Action::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(action.id()), i);
            assert_eq!(Action::try_from(i), Ok(action));
        }
    }

    #[test]
    fn test_out_of_range_id() {
        assert_eq!(
            Action::try_from(7_u8),
            Err(InvalidActionError { value: 7 })
        );
        assert_eq!(
            InvalidActionError { value: 9 }.to_string(),
            "invalid action 9, expected 0..=6"
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hard-drop".parse::<Action>(), Ok(Action::HardDrop));
        assert_eq!(
            "rotate-counter-clockwise".parse::<Action>(),
            Ok(Action::RotateCounterClockwise)
        );
        assert!("jump".parse::<Action>().is_err());
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Action::MoveLeft).unwrap();
        assert_eq!(json, r#""move-left""#);
        let action: Action = serde_json::from_str(r#""soft-drop""#).unwrap();
        assert_eq!(action, Action::SoftDrop);
    }

    #[test]
    fn test_sampling_covers_all_actions() {
        use rand::SeedableRng as _;

        let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
        let mut seen = [false; Action::COUNT];
        for _ in 0..500 {
            let action: Action = rng.random();
            seen[usize::from(action.id())] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
