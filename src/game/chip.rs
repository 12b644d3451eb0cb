/// A cell's contents: empty, or one of the two player chips.
///
/// `Empty` is never a valid chip to place; operations that take a chip to
/// play reject it with [`EngineError::InvalidChip`](crate::error::EngineError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chip {
    Empty,
    Red,
    Yellow,
}

impl Chip {
    /// The opposing player chip. `Empty` has no opponent and maps to itself.
    pub fn other(self) -> Chip {
        match self {
            Chip::Red => Chip::Yellow,
            Chip::Yellow => Chip::Red,
            Chip::Empty => Chip::Empty,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Chip::Red => "Red",
            Chip::Yellow => "Yellow",
            Chip::Empty => "Empty",
        }
    }
}

/// Outcome of a board position, derived on demand rather than stored.
///
/// Red is checked before Yellow, so on an illegal synthetic board where both
/// have four in a row, `RedWon` is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Tied,
    RedWon,
    YellowWon,
}

impl GameStatus {
    /// True for any status other than `Ongoing`.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Ongoing
    }

    /// The winning chip, if one side has won.
    pub fn winner(self) -> Option<Chip> {
        match self {
            GameStatus::RedWon => Some(Chip::Red),
            GameStatus::YellowWon => Some(Chip::Yellow),
            GameStatus::Ongoing | GameStatus::Tied => None,
        }
    }
}
