use std::collections::HashSet;

use cosmwasm_std::{from_json, to_json_vec};
use serde::Deserialize;

use crate::error::SnapshotError;
use crate::session::SessionState;
use crate::types::{Participant, Prize, Stage, Winner};

/// Stored session snapshots are untrusted: every field is optional here and
/// checked before it is used to rebuild a `SessionState`.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSnapshot {
    stage: Option<Stage>,
    participants: Option<Vec<Participant>>,
    remaining_participants: Option<Vec<Participant>>,
    prizes: Option<Vec<Prize>>,
    current_prize_index: Option<usize>,
    current_winner: Option<Participant>,
    winners: Option<Vec<Winner>>,
    is_over: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No snapshot stored.
    Empty,
    /// Snapshot restored as written.
    Intact,
    /// Snapshot restored after repairing an unsafe resume point.
    Sanitized,
    /// Snapshot unreadable or unusable; the default session was returned.
    Discarded,
}

impl RestoreOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreOutcome::Empty => "empty",
            RestoreOutcome::Intact => "intact",
            RestoreOutcome::Sanitized => "sanitized",
            RestoreOutcome::Discarded => "discarded",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub state: SessionState,
    pub outcome: RestoreOutcome,
}

impl Restored {
    fn discarded() -> Self {
        Self {
            state: SessionState::default(),
            outcome: RestoreOutcome::Discarded,
        }
    }
}

/// Read side of the single-key snapshot medium.
pub trait SnapshotSource {
    fn read(&self) -> Option<Vec<u8>>;
}

/// Write side of the single-key snapshot medium. Each write replaces the
/// previous snapshot wholesale.
pub trait SnapshotStore: SnapshotSource {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SnapshotError>;
}

pub fn encode(state: &SessionState) -> Result<Vec<u8>, SnapshotError> {
    Ok(to_json_vec(state)?)
}

/// Rebuild a session from snapshot bytes. Never fails: anything unreadable
/// comes back as the default setup session.
pub fn decode(bytes: &[u8]) -> Restored {
    let raw: RawSnapshot = match from_json(bytes) {
        Ok(raw) => raw,
        Err(_) => return Restored::discarded(),
    };

    let (
        Some(stage),
        Some(participants),
        Some(remaining_participants),
        Some(prizes),
        Some(current_prize_index),
        Some(winners),
        Some(is_over),
    ) = (
        raw.stage,
        raw.participants,
        raw.remaining_participants,
        raw.prizes,
        raw.current_prize_index,
        raw.winners,
        raw.is_over,
    )
    else {
        return Restored::discarded();
    };

    if participants.is_empty() || prizes.is_empty() {
        return Restored::discarded();
    }

    let parsed = SessionState {
        stage,
        participants,
        remaining_participants,
        prizes,
        current_prize_index,
        current_winner: raw.current_winner,
        winners,
        is_over,
    };
    let state = sanitize(parsed.clone());
    let outcome = if state == parsed {
        RestoreOutcome::Intact
    } else {
        RestoreOutcome::Sanitized
    };
    Restored { state, outcome }
}

/// Repair a decoded session into one the state machine can safely resume.
///
/// Rosters and prize lists are assumed non-empty; `decode` discards
/// snapshots where they are not.
pub fn sanitize(mut state: SessionState) -> SessionState {
    // pool: roster members only, once each, never someone already awarded
    let roster: HashSet<String> = state.participants.iter().map(|p| p.id.clone()).collect();
    let mut excluded: HashSet<String> = state
        .winners
        .iter()
        .map(|w| w.participant.id.clone())
        .collect();
    state.remaining_participants.retain(|p| {
        roster.contains(&p.id) && excluded.insert(p.id.clone())
    });

    if state.stage == Stage::Setup {
        state.current_winner = None;
        return state;
    }

    // a draw or award in flight depended on a live animation or timer
    if state.stage.is_in_flight() {
        state.stage = if state.stage == Stage::PrizeAwarded && state.is_over {
            Stage::GameOver
        } else {
            Stage::ReadyToSpin
        };
    }

    if state.stage == Stage::AwaitingDecision {
        let valid = state
            .current_winner
            .as_ref()
            .is_some_and(|w| state.is_in_pool(&w.id));
        if !valid {
            state.stage = Stage::ReadyToSpin;
        }
    }
    if !state.stage.holds_winner() {
        state.current_winner = None;
    }

    if state.current_prize_index >= state.prizes.len() {
        state.current_prize_index = state.prizes.len() - 1;
        state.stage = Stage::GameOver;
    }
    if state.remaining_participants.is_empty() || state.is_over {
        state.stage = Stage::GameOver;
    }
    if state.stage == Stage::GameOver {
        state.is_over = true;
        state.current_winner = None;
    }
    state
}

pub fn load(source: &impl SnapshotSource) -> Restored {
    match source.read() {
        Some(bytes) => decode(&bytes),
        None => Restored {
            state: SessionState::default(),
            outcome: RestoreOutcome::Empty,
        },
    }
}

/// Best-effort write of the full session. The error is informational only;
/// the session carries on in memory either way.
pub fn save(store: &mut impl SnapshotStore, state: &SessionState) -> Result<(), SnapshotError> {
    let bytes = encode(state)?;
    store.write(&bytes)
}
