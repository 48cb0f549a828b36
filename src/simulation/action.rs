use crate::simulation::params::ACTION_COUNT;

/// Discrete controls available to the driver, one per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Accelerate,
    RotateLeft,
    RotateRight,
    Decelerate,
}

impl Action {
    /// All actions in table order.
    pub const ALL: [Self; ACTION_COUNT] = [
        Self::Accelerate,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Decelerate,
    ];

    /// Column of this action in a Q-table row.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Accelerate => 0,
            Self::RotateLeft => 1,
            Self::RotateRight => 2,
            Self::Decelerate => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Keyboard state for manual driving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualInput {
    pub throttle: bool,
    pub steer: Option<Steer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(ACTION_COUNT), None);
    }
}
