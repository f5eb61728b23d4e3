//! User decisions and the parsing of their raw input.

use std::fmt;

use tango_shared::{ActionData, ActionType};

use crate::error::InputError;

/// Index into the three dealt cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CardSlot(usize);

impl CardSlot {
    pub const COUNT: usize = 3;

    pub fn index(self) -> usize {
        self.0
    }

    pub fn all() -> impl Iterator<Item = CardSlot> {
        (0..Self::COUNT).map(CardSlot)
    }
}

impl TryFrom<usize> for CardSlot {
    type Error = InputError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        if index < Self::COUNT {
            Ok(CardSlot(index))
        } else {
            Err(InputError::BadSlot(index))
        }
    }
}

/// A decision the local player can submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    PlaceAnte(u32),
    ChooseTrash(CardSlot),
    ChooseTango(CardSlot),
    Check,
    Call,
    Raise(u32),
    Fold,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::PlaceAnte(_) => "ante",
            Action::ChooseTrash(_) => "trash",
            Action::ChooseTango(_) => "tango",
            Action::Check => "check",
            Action::Call => "call",
            Action::Raise(_) => "raise",
            Action::Fold => "fold",
        }
    }

    /// Wire representation. `call_amount` is the bet being matched; ante,
    /// call and raise all travel as `bet`.
    pub fn to_wire(&self, call_amount: u32) -> (ActionType, ActionData) {
        match *self {
            Action::PlaceAnte(amount) | Action::Raise(amount) => {
                (ActionType::Bet, ActionData::Amount { amount })
            }
            Action::Call => (
                ActionType::Bet,
                ActionData::Amount {
                    amount: call_amount,
                },
            ),
            Action::ChooseTrash(slot) => (
                ActionType::Kill,
                ActionData::Card {
                    card_index: slot.index(),
                },
            ),
            Action::ChooseTango(slot) => (
                ActionType::Kick,
                ActionData::Card {
                    card_index: slot.index(),
                },
            ),
            Action::Check => (ActionType::Check, ActionData::Empty {}),
            Action::Fold => (ActionType::Fold, ActionData::Empty {}),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::PlaceAnte(n) => write!(f, "ante {}", n),
            Action::ChooseTrash(slot) => write!(f, "trash card {}", slot.index() + 1),
            Action::ChooseTango(slot) => write!(f, "tango card {}", slot.index() + 1),
            Action::Raise(n) => write!(f, "raise {}", n),
            other => f.write_str(other.name()),
        }
    }
}

/// Parse a typed chip amount and check it against the available balance.
pub fn parse_amount(text: &str, chips: u32) -> Result<u32, InputError> {
    let trimmed = text.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(InputError::NotPositive);
    }
    let amount = u32::try_from(value).map_err(|_| InputError::ExceedsChips {
        amount: u32::MAX,
        chips,
    })?;
    check_affordable(amount, chips)?;
    Ok(amount)
}

/// Reject amounts that are zero or larger than the balance.
pub fn check_affordable(amount: u32, chips: u32) -> Result<(), InputError> {
    if amount == 0 {
        return Err(InputError::NotPositive);
    }
    if amount > chips {
        return Err(InputError::ExceedsChips { amount, chips });
    }
    Ok(())
}

/// Parse a card slot typed as 0, 1 or 2.
pub fn parse_slot(text: &str) -> Result<CardSlot, InputError> {
    let trimmed = text.trim();
    let index: usize = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    CardSlot::try_from(index)
}
