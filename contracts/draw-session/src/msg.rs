use cosmwasm_schema::{cw_serde, QueryResponses};
use raffle_common::{Participant, Prize, SessionState, Stage, Winner};

use crate::state::{GameRecord, SessionConfig, SetupDraft};

#[cw_serde]
pub struct InstantiateMsg {
    /// Address allowed to drive the session. Defaults to the instantiator.
    pub operator: Option<String>,
    /// Pause between an award and the automatic advance (seconds)
    pub advance_delay_seconds: Option<u64>,
    /// Refuse to begin when prizes outnumber participants
    pub strict_prize_count: Option<bool>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Replace the draft roster with one name per line.
    SetRoster { names_text: String },
    AddParticipant { name: String },
    RenameParticipant { id: String, name: String },
    RemoveParticipant { id: String },
    AddPrize { name: String },
    RenamePrize { id: String, name: String },
    RemovePrize { id: String },
    /// Move a prize to a new position in the award order.
    MovePrize { id: String, to_index: u32 },
    /// Fix the draft roster and prizes and start the game.
    Begin {},
    SpinStart {},
    /// Record the participant picked by an external draw.
    ResolveSpin { participant_id: String },
    /// Pick uniformly from the pool using caller-supplied entropy.
    ResolveSpinWithEntropy {
        /// Hex-encoded seed, any length
        entropy_hex: String,
    },
    Accept {},
    Reject {},
    RejectAndRedraw {},
    /// Leave the award screen now. Operator only.
    Advance {},
    /// Fire the pending award advance once it is due. Anyone can call.
    Tick {},
    Restart {},
    /// Restart with the current roster and prizes kept as the setup draft.
    /// In setup the draft is left as it is.
    RestartKeepData {},
    /// Reload the session from its stored snapshot, repairing a spin or award
    /// that was cut off.
    Resume {},
    /// Update configuration. Admin only.
    UpdateConfig {
        operator: Option<String>,
        advance_delay_seconds: Option<u64>,
        strict_prize_count: Option<bool>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(SessionConfig)]
    Config {},
    #[returns(SessionState)]
    Session {},
    #[returns(StatusResponse)]
    Status {},
    #[returns(SetupDraft)]
    Draft {},
    #[returns(PoolResponse)]
    Pool {},
    #[returns(WinnersResponse)]
    Winners {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(Option<raffle_common::PendingAdvance>)]
    PendingAdvance {},
    /// Who `ResolveSpinWithEntropy` would pick right now for this seed.
    #[returns(Option<Participant>)]
    PickPreview { entropy_hex: String },
    #[returns(GameHistoryResponse)]
    GameHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Option<GameRecord>)]
    Game { game_id: u64 },
}

#[cw_serde]
pub struct StatusResponse {
    pub stage: Stage,
    pub game_id: u64,
    pub current_prize: Option<Prize>,
    pub current_prize_index: u32,
    pub prize_count: u32,
    pub pool_size: u32,
    pub winners_count: u32,
    pub current_winner: Option<Participant>,
    pub is_over: bool,
}

#[cw_serde]
pub struct PoolResponse {
    pub participants: Vec<Participant>,
}

#[cw_serde]
pub struct WinnersResponse {
    pub winners: Vec<Winner>,
    pub total: u32,
}

#[cw_serde]
pub struct GameHistoryResponse {
    pub games: Vec<GameRecord>,
}
