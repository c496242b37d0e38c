use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, StdResult, Storage, Timestamp};
use cw_storage_plus::{Item, Map};
use raffle_common::snapshot::{self, Restored, RestoreOutcome};
use raffle_common::{
    Participant, PendingAdvance, Prize, SessionState, SnapshotError, SnapshotSource,
    SnapshotStore, Winner,
};

pub const CONFIG: Item<SessionConfig> = Item::new("config");
pub const SETUP_DRAFT: Item<SetupDraft> = Item::new("setup_draft");
pub const GAME_COUNTERS: Item<GameCounters> = Item::new("game_counters");
pub const PENDING_ADVANCE: Item<PendingAdvance> = Item::new("pending_advance");
/// Completed games keyed by game id
pub const GAMES: Map<u64, GameRecord> = Map::new("games");

/// Fixed key holding the session snapshot. Written after every transition.
pub const SESSION_KEY: &[u8] = b"session";
/// Live view of the snapshot slot. Between messages the session is read back
/// exactly as written; repairs only happen on resume.
pub const SESSION: Item<SessionState> = Item::new("session");

/// Default pause on the award screen before advancing
pub const DEFAULT_ADVANCE_DELAY_SECONDS: u64 = 3;

#[cw_serde]
pub struct SessionConfig {
    pub admin: Addr,
    pub operator: Addr,
    pub advance_delay_seconds: u64,
    pub strict_prize_count: bool,
}

/// Roster and prizes being edited before a game begins.
#[cw_serde]
#[derive(Default)]
pub struct SetupDraft {
    pub participants: Vec<Participant>,
    pub prizes: Vec<Prize>,
}

#[cw_serde]
pub struct GameCounters {
    /// Id of the game in progress (or last played). 0 before the first game.
    pub current_game_id: u64,
    /// Spins resolved in the current game, rejected ones included
    pub draws_in_game: u64,
    pub games_completed: u64,
    pub started_at: Option<Timestamp>,
}

#[cw_serde]
pub struct GameRecord {
    pub game_id: u64,
    pub roster_size: u32,
    pub winners: Vec<Winner>,
    /// Prizes left over when the pool ran out first
    pub unawarded_prizes: Vec<Prize>,
    pub draws: u64,
    pub started_at: Option<Timestamp>,
    pub finished_at: Timestamp,
}

struct StoredSnapshot<'a>(&'a dyn Storage);

impl SnapshotSource for StoredSnapshot<'_> {
    fn read(&self) -> Option<Vec<u8>> {
        self.0.get(SESSION_KEY)
    }
}

struct SnapshotSlot<'a>(&'a mut dyn Storage);

impl SnapshotSource for SnapshotSlot<'_> {
    fn read(&self) -> Option<Vec<u8>> {
        self.0.get(SESSION_KEY)
    }
}

impl SnapshotStore for SnapshotSlot<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SnapshotError> {
        self.0.set(SESSION_KEY, bytes);
        Ok(())
    }
}

/// The live session. No snapshot stored means the empty setup session.
pub fn load_session(storage: &dyn Storage) -> StdResult<SessionState> {
    Ok(SESSION.may_load(storage)?.unwrap_or_default())
}

pub fn read_snapshot(storage: &dyn Storage) -> Restored {
    snapshot::load(&StoredSnapshot(storage))
}

/// Rebuild the session from the stored snapshot as after a restart, noting
/// repaired or discarded snapshots in the debug log.
pub fn restore_session(storage: &dyn Storage, api: &dyn Api) -> Restored {
    let restored = read_snapshot(storage);
    if matches!(
        restored.outcome,
        RestoreOutcome::Sanitized | RestoreOutcome::Discarded
    ) {
        api.debug(&format!(
            "raffle: session snapshot {} on load (stage now {})",
            restored.outcome.as_str(),
            restored.state.stage
        ));
    }
    restored
}

/// Overwrite the session snapshot. Failures are logged and swallowed.
pub fn save_session(storage: &mut dyn Storage, api: &dyn Api, state: &SessionState) {
    if *state == SessionState::default() {
        storage.remove(SESSION_KEY);
        return;
    }
    if let Err(e) = snapshot::save(&mut SnapshotSlot(storage), state) {
        api.debug(&format!("raffle: session snapshot not saved: {}", e));
    }
}

pub fn load_counters(storage: &dyn Storage) -> StdResult<GameCounters> {
    Ok(GAME_COUNTERS.may_load(storage)?.unwrap_or(GameCounters {
        current_game_id: 0,
        draws_in_game: 0,
        games_completed: 0,
        started_at: None,
    }))
}
