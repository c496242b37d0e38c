use cosmwasm_schema::cw_serde;

/// A person entered into the raffle. Ids are unique within a roster,
/// names are not.
#[cw_serde]
pub struct Participant {
    pub id: String,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A prize. Prizes are awarded in list order.
#[cw_serde]
pub struct Prize {
    pub id: String,
    pub name: String,
}

impl Prize {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An accepted draw. Written once, never mutated.
#[cw_serde]
pub struct Winner {
    pub participant: Participant,
    pub prize: Prize,
}

/// Lifecycle stage of a draw session.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Stage {
    Setup,
    ReadyToSpin,
    Spinning,
    AwaitingDecision,
    PrizeAwarded,
    GameOver,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::ReadyToSpin => "ready_to_spin",
            Stage::Spinning => "spinning",
            Stage::AwaitingDecision => "awaiting_decision",
            Stage::PrizeAwarded => "prize_awarded",
            Stage::GameOver => "game_over",
        }
    }

    /// Stages that depend on a live animation or timer and cannot be resumed
    /// from a snapshot.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Stage::Spinning | Stage::PrizeAwarded)
    }

    /// Stages in which `current_winner` may be populated.
    pub fn holds_winner(&self) -> bool {
        matches!(self, Stage::AwaitingDecision | Stage::PrizeAwarded)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
