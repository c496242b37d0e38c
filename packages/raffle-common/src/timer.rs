use cosmwasm_schema::cw_serde;

use crate::session::SessionState;
use crate::types::Stage;

/// The award pause: after a prize is awarded the session advances on its own
/// once `due_at_seconds` passes. Owned outside the state machine and tied to
/// the game it was scheduled in, so a restart leaves it nothing to fire on.
#[cw_serde]
pub struct PendingAdvance {
    pub game_id: u64,
    pub due_at_seconds: u64,
}

impl PendingAdvance {
    /// Schedule an advance for a session that has just awarded a prize.
    pub fn schedule(
        state: &SessionState,
        game_id: u64,
        now_seconds: u64,
        delay_seconds: u64,
    ) -> Option<Self> {
        if state.stage != Stage::PrizeAwarded {
            return None;
        }
        Some(Self {
            game_id,
            due_at_seconds: now_seconds.saturating_add(delay_seconds),
        })
    }

    pub fn is_due(&self, now_seconds: u64) -> bool {
        now_seconds >= self.due_at_seconds
    }

    /// A pending advance only ever moves the game it was scheduled in, and
    /// only while that game still sits on the award.
    pub fn applies_to(&self, state: &SessionState, game_id: u64) -> bool {
        self.game_id == game_id && state.stage == Stage::PrizeAwarded
    }
}
