use cosmwasm_schema::cw_serde;

use crate::error::TransitionError;
use crate::types::{Participant, Prize, Stage, Winner};

/// The full draw session aggregate. Snapshots always carry every field.
#[cw_serde]
pub struct SessionState {
    pub stage: Stage,
    /// Roster fixed when the game begins; the editable draft while in setup.
    pub participants: Vec<Participant>,
    /// Participants still eligible to win. Always a subset of `participants`.
    pub remaining_participants: Vec<Participant>,
    /// Prizes in award order.
    pub prizes: Vec<Prize>,
    pub current_prize_index: usize,
    /// Proposed or just-awarded winner of the current prize.
    pub current_winner: Option<Participant>,
    pub winners: Vec<Winner>,
    pub is_over: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            stage: Stage::Setup,
            participants: vec![],
            remaining_participants: vec![],
            prizes: vec![],
            current_prize_index: 0,
            current_winner: None,
            winners: vec![],
            is_over: false,
        }
    }
}

impl SessionState {
    pub fn current_prize(&self) -> Option<&Prize> {
        self.prizes.get(self.current_prize_index)
    }

    pub fn is_in_pool(&self, participant_id: &str) -> bool {
        self.remaining_participants
            .iter()
            .any(|p| p.id == participant_id)
    }

    /// Prizes that have not been awarded yet. When the pool runs dry before
    /// the prize list, these are never awarded.
    pub fn unawarded_prizes(&self) -> &[Prize] {
        let awarded = self.winners.len().min(self.prizes.len());
        &self.prizes[awarded..]
    }
}

/// Commands accepted by the state machine.
#[cw_serde]
pub enum Command {
    Begin {
        participants: Vec<Participant>,
        prizes: Vec<Prize>,
    },
    SpinStart,
    SpinResolved { winner: Participant },
    Accept,
    Reject,
    RejectAndRedraw,
    Advance,
    Restart,
    RestartKeepData,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Begin { .. } => "begin",
            Command::SpinStart => "spin_start",
            Command::SpinResolved { .. } => "spin_resolved",
            Command::Accept => "accept",
            Command::Reject => "reject",
            Command::RejectAndRedraw => "reject_and_redraw",
            Command::Advance => "advance",
            Command::Restart => "restart",
            Command::RestartKeepData => "restart_keep_data",
        }
    }
}

fn require_stage(state: &SessionState, command: &str, stage: Stage) -> Result<(), TransitionError> {
    if state.stage != stage {
        return Err(TransitionError::InvalidStage {
            command: command.to_string(),
            stage: state.stage,
        });
    }
    Ok(())
}

/// Apply one command to a session and return the next session.
///
/// This is a pure function: no storage, no clock, no randomness. Setup input
/// validation (roster size, prize count) belongs to the caller; `Begin` only
/// checks that the session is in setup.
///
/// A guard violation returns `TransitionError` and produces no new state.
pub fn transition(state: &SessionState, command: Command) -> Result<SessionState, TransitionError> {
    let name = command.name();
    match command {
        Command::Begin {
            participants,
            prizes,
        } => {
            require_stage(state, name, Stage::Setup)?;
            Ok(SessionState {
                stage: Stage::ReadyToSpin,
                remaining_participants: participants.clone(),
                participants,
                prizes,
                current_prize_index: 0,
                current_winner: None,
                winners: vec![],
                is_over: false,
            })
        }
        Command::SpinStart => {
            require_stage(state, name, Stage::ReadyToSpin)?;
            if state.is_over {
                return Err(TransitionError::GameOver);
            }
            if state.remaining_participants.is_empty() {
                return Err(TransitionError::EmptyPool);
            }
            Ok(SessionState {
                stage: Stage::Spinning,
                ..state.clone()
            })
        }
        Command::SpinResolved { winner } => {
            require_stage(state, name, Stage::Spinning)?;
            let drawn = state
                .remaining_participants
                .iter()
                .find(|p| p.id == winner.id)
                .cloned()
                .ok_or(TransitionError::NotInPool { id: winner.id })?;
            Ok(SessionState {
                stage: Stage::AwaitingDecision,
                current_winner: Some(drawn),
                ..state.clone()
            })
        }
        Command::Accept => {
            require_stage(state, name, Stage::AwaitingDecision)?;
            let winner = state
                .current_winner
                .clone()
                .ok_or(TransitionError::NoCurrentWinner)?;
            if !state.is_in_pool(&winner.id) {
                return Err(TransitionError::NotInPool { id: winner.id });
            }
            let prize = state
                .current_prize()
                .cloned()
                .ok_or(TransitionError::NoCurrentPrize {
                    index: state.current_prize_index,
                })?;

            let remaining: Vec<Participant> = state
                .remaining_participants
                .iter()
                .filter(|p| p.id != winner.id)
                .cloned()
                .collect();
            let mut winners = state.winners.clone();
            winners.push(Winner {
                participant: winner.clone(),
                prize,
            });

            // The index holds on the final award so it keeps naming the last
            // prize handed out.
            let next_index = state.current_prize_index + 1;
            let is_over = next_index >= state.prizes.len() || remaining.is_empty();

            Ok(SessionState {
                stage: Stage::PrizeAwarded,
                remaining_participants: remaining,
                current_prize_index: if is_over {
                    state.current_prize_index
                } else {
                    next_index
                },
                current_winner: Some(winner),
                winners,
                is_over,
                ..state.clone()
            })
        }
        Command::Reject => {
            require_stage(state, name, Stage::AwaitingDecision)?;
            Ok(SessionState {
                stage: Stage::ReadyToSpin,
                current_winner: None,
                ..state.clone()
            })
        }
        Command::RejectAndRedraw => {
            require_stage(state, name, Stage::AwaitingDecision)?;
            Ok(SessionState {
                stage: Stage::Spinning,
                current_winner: None,
                ..state.clone()
            })
        }
        Command::Advance => {
            require_stage(state, name, Stage::PrizeAwarded)?;
            Ok(SessionState {
                stage: if state.is_over {
                    Stage::GameOver
                } else {
                    Stage::ReadyToSpin
                },
                current_winner: None,
                ..state.clone()
            })
        }
        Command::Restart => Ok(SessionState::default()),
        Command::RestartKeepData => Ok(SessionState {
            participants: state.participants.clone(),
            prizes: state.prizes.clone(),
            ..SessionState::default()
        }),
    }
}
