use cosmwasm_std::{Addr, DepsMut, Env, Event, MessageInfo, Response};
use raffle_common::roster::{
    move_entry, new_participant, new_prize, parse_participant_text, remove_entry, rename_entry,
    validate_setup,
};
use raffle_common::selection::{draw_entropy, pick_winner};
use raffle_common::snapshot::Restored;
use raffle_common::{
    transition, Command, Participant, PendingAdvance, SessionState, Stage, TransitionError,
};

use crate::error::ContractError;
use crate::state::{
    load_counters, load_session, restore_session, save_session, GameRecord, SessionConfig,
    SetupDraft, CONFIG, GAMES, GAME_COUNTERS, PENDING_ADVANCE, SETUP_DRAFT,
};

fn authorize(config: &SessionConfig, sender: &Addr) -> Result<(), ContractError> {
    if *sender != config.operator && *sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only operator or admin can drive the session".to_string(),
        });
    }
    Ok(())
}

/// Load the session, apply one command and persist the result.
/// Refused commands are logged and leave storage untouched.
fn apply(deps: &mut DepsMut, command: Command) -> Result<(SessionState, SessionState), ContractError> {
    let state = load_session(deps.storage)?;
    let name = command.name();
    let next = transition(&state, command).map_err(|e| {
        deps.api
            .debug(&format!("raffle: {} refused in stage {}: {}", name, state.stage, e));
        e
    })?;
    save_session(deps.storage, deps.api, &next);
    Ok((state, next))
}

// ─── Setup editing ───

fn edit_draft<F>(
    deps: DepsMut,
    info: MessageInfo,
    action: &str,
    edit: F,
) -> Result<Response, ContractError>
where
    F: FnOnce(&mut SetupDraft) -> Result<(), ContractError>,
{
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let state = load_session(deps.storage)?;
    if state.stage != Stage::Setup {
        return Err(ContractError::SetupLocked { stage: state.stage });
    }

    let mut draft = SETUP_DRAFT.may_load(deps.storage)?.unwrap_or_default();
    edit(&mut draft)?;
    SETUP_DRAFT.save(deps.storage, &draft)?;

    Ok(Response::new()
        .add_attribute("action", action)
        .add_attribute("participants", draft.participants.len().to_string())
        .add_attribute("prizes", draft.prizes.len().to_string()))
}

pub fn set_roster(
    deps: DepsMut,
    info: MessageInfo,
    names_text: String,
) -> Result<Response, ContractError> {
    edit_draft(deps, info, "set_roster", |draft| {
        draft.participants = parse_participant_text(&names_text);
        Ok(())
    })
}

pub fn add_participant(
    deps: DepsMut,
    info: MessageInfo,
    name: String,
) -> Result<Response, ContractError> {
    edit_draft(deps, info, "add_participant", |draft| {
        let participant = new_participant(&name, &draft.participants)?;
        draft.participants.push(participant);
        Ok(())
    })
}

pub fn rename_participant(
    deps: DepsMut,
    info: MessageInfo,
    id: String,
    name: String,
) -> Result<Response, ContractError> {
    edit_draft(deps, info, "rename_participant", |draft| {
        Ok(rename_entry(&mut draft.participants, &id, &name)?)
    })
}

pub fn remove_participant(
    deps: DepsMut,
    info: MessageInfo,
    id: String,
) -> Result<Response, ContractError> {
    edit_draft(deps, info, "remove_participant", |draft| {
        remove_entry(&mut draft.participants, &id)?;
        Ok(())
    })
}

pub fn add_prize(deps: DepsMut, info: MessageInfo, name: String) -> Result<Response, ContractError> {
    edit_draft(deps, info, "add_prize", |draft| {
        let prize = new_prize(&name, &draft.prizes)?;
        draft.prizes.push(prize);
        Ok(())
    })
}

pub fn rename_prize(
    deps: DepsMut,
    info: MessageInfo,
    id: String,
    name: String,
) -> Result<Response, ContractError> {
    edit_draft(deps, info, "rename_prize", |draft| {
        Ok(rename_entry(&mut draft.prizes, &id, &name)?)
    })
}

pub fn remove_prize(deps: DepsMut, info: MessageInfo, id: String) -> Result<Response, ContractError> {
    edit_draft(deps, info, "remove_prize", |draft| {
        remove_entry(&mut draft.prizes, &id)?;
        Ok(())
    })
}

pub fn move_prize(
    deps: DepsMut,
    info: MessageInfo,
    id: String,
    to_index: u32,
) -> Result<Response, ContractError> {
    edit_draft(deps, info, "move_prize", |draft| {
        Ok(move_entry(&mut draft.prizes, &id, to_index as usize)?)
    })
}

// ─── Game flow ───

/// Fix the draft as the game's roster and prize list and start drawing.
pub fn begin(mut deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let draft = SETUP_DRAFT.may_load(deps.storage)?.unwrap_or_default();
    validate_setup(&draft.participants, &draft.prizes, config.strict_prize_count)?;

    let (_, next) = apply(
        &mut deps,
        Command::Begin {
            participants: draft.participants,
            prizes: draft.prizes,
        },
    )?;

    let mut counters = load_counters(deps.storage)?;
    counters.current_game_id += 1;
    counters.draws_in_game = 0;
    counters.started_at = Some(env.block.time);
    GAME_COUNTERS.save(deps.storage, &counters)?;
    PENDING_ADVANCE.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "begin")
        .add_attribute("game_id", counters.current_game_id.to_string())
        .add_event(
            Event::new("raffle_game_started")
                .add_attribute("game_id", counters.current_game_id.to_string())
                .add_attribute("participants", next.participants.len().to_string())
                .add_attribute("prizes", next.prizes.len().to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

pub fn spin_start(mut deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let (_, next) = apply(&mut deps, Command::SpinStart)?;

    Ok(Response::new()
        .add_attribute("action", "spin_start")
        .add_attribute("pool_size", next.remaining_participants.len().to_string()))
}

/// Record the drawn participant and put them up for accept/reject.
fn record_spin(
    mut deps: DepsMut,
    winner: Participant,
    source: &str,
) -> Result<Response, ContractError> {
    let (_, next) = apply(&mut deps, Command::SpinResolved { winner })?;

    let mut counters = load_counters(deps.storage)?;
    counters.draws_in_game += 1;
    GAME_COUNTERS.save(deps.storage, &counters)?;

    let drawn = next
        .current_winner
        .as_ref()
        .ok_or(TransitionError::NoCurrentWinner)?;
    let prize_name = next
        .current_prize()
        .map(|p| p.name.clone())
        .unwrap_or_default();

    Ok(Response::new()
        .add_attribute("action", "resolve_spin")
        .add_attribute("participant_id", drawn.id.clone())
        .add_event(
            Event::new("raffle_spin_resolved")
                .add_attribute("game_id", counters.current_game_id.to_string())
                .add_attribute("draw", counters.draws_in_game.to_string())
                .add_attribute("participant_id", drawn.id.clone())
                .add_attribute("participant", drawn.name.clone())
                .add_attribute("prize", prize_name)
                .add_attribute("source", source),
        ))
}

pub fn resolve_spin(
    deps: DepsMut,
    info: MessageInfo,
    participant_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let state = load_session(deps.storage)?;
    let winner = state
        .remaining_participants
        .iter()
        .find(|p| p.id == participant_id)
        .cloned()
        .ok_or(TransitionError::NotInPool { id: participant_id })?;

    record_spin(deps, winner, "external")
}

pub fn resolve_spin_with_entropy(
    deps: DepsMut,
    info: MessageInfo,
    entropy_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let seed = hex::decode(&entropy_hex).map_err(|_| ContractError::InvalidHex {
        field: "entropy_hex".to_string(),
    })?;

    let state = load_session(deps.storage)?;
    let counters = load_counters(deps.storage)?;
    let entropy = draw_entropy(&seed, counters.current_game_id, counters.draws_in_game);
    let winner = pick_winner(&state.remaining_participants, &entropy)
        .cloned()
        .ok_or(TransitionError::EmptyPool)?;

    record_spin(deps, winner, "entropy")
}

/// Award the current prize to the drawn participant and start the award pause.
pub fn accept(mut deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let (_, next) = apply(&mut deps, Command::Accept)?;
    let counters = load_counters(deps.storage)?;

    let award = next
        .winners
        .last()
        .ok_or(TransitionError::NoCurrentWinner)?;
    let pending = PendingAdvance::schedule(
        &next,
        counters.current_game_id,
        env.block.time.seconds(),
        config.advance_delay_seconds,
    );
    match &pending {
        Some(p) => PENDING_ADVANCE.save(deps.storage, p)?,
        None => PENDING_ADVANCE.remove(deps.storage),
    }

    Ok(Response::new()
        .add_attribute("action", "accept")
        .add_attribute("participant_id", award.participant.id.clone())
        .add_attribute("prize_id", award.prize.id.clone())
        .add_event(
            Event::new("raffle_winner_accepted")
                .add_attribute("game_id", counters.current_game_id.to_string())
                .add_attribute("participant_id", award.participant.id.clone())
                .add_attribute("participant", award.participant.name.clone())
                .add_attribute("prize_id", award.prize.id.clone())
                .add_attribute("prize", award.prize.name.clone())
                .add_attribute("award", next.winners.len().to_string())
                .add_attribute("pool_size", next.remaining_participants.len().to_string())
                .add_attribute("is_over", next.is_over.to_string())
                .add_attribute(
                    "advance_due_at",
                    pending
                        .map(|p| p.due_at_seconds.to_string())
                        .unwrap_or_default(),
                ),
        ))
}

/// Turn down the drawn participant. They stay in the pool.
pub fn reject(
    mut deps: DepsMut,
    info: MessageInfo,
    redraw: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let command = if redraw {
        Command::RejectAndRedraw
    } else {
        Command::Reject
    };
    let action = command.name();
    let (prev, next) = apply(&mut deps, command)?;
    let rejected = prev.current_winner.map(|p| p.id).unwrap_or_default();

    Ok(Response::new()
        .add_attribute("action", action)
        .add_attribute("participant_id", rejected.clone())
        .add_event(
            Event::new("raffle_winner_rejected")
                .add_attribute("participant_id", rejected)
                .add_attribute("redraw", redraw.to_string())
                .add_attribute("stage", next.stage.as_str()),
        ))
}

/// Leave the award screen. Archives the game when it just ended.
fn advance_session(mut deps: DepsMut, env: &Env, trigger: &str) -> Result<Response, ContractError> {
    let (_, next) = apply(&mut deps, Command::Advance)?;
    PENDING_ADVANCE.remove(deps.storage);

    let mut response = Response::new()
        .add_attribute("action", "advance")
        .add_attribute("trigger", trigger)
        .add_attribute("stage", next.stage.as_str());

    if next.stage == Stage::GameOver {
        let mut counters = load_counters(deps.storage)?;
        let record = GameRecord {
            game_id: counters.current_game_id,
            roster_size: next.participants.len() as u32,
            winners: next.winners.clone(),
            unawarded_prizes: next.unawarded_prizes().to_vec(),
            draws: counters.draws_in_game,
            started_at: counters.started_at,
            finished_at: env.block.time,
        };
        GAMES.save(deps.storage, record.game_id, &record)?;
        counters.games_completed += 1;
        GAME_COUNTERS.save(deps.storage, &counters)?;

        response = response.add_event(
            Event::new("raffle_game_over")
                .add_attribute("game_id", record.game_id.to_string())
                .add_attribute("winners", record.winners.len().to_string())
                .add_attribute("unawarded_prizes", record.unawarded_prizes.len().to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        );
    }

    Ok(response)
}

pub fn advance(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;
    advance_session(deps, &env, "operator")
}

/// Fire the award pause once due. Anyone can call. A pending advance left
/// over from an earlier game or an already-left award is dropped instead.
pub fn tick(deps: DepsMut, env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let pending = PENDING_ADVANCE
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdvance)?;

    let state = load_session(deps.storage)?;
    let counters = load_counters(deps.storage)?;
    if !pending.applies_to(&state, counters.current_game_id) {
        PENDING_ADVANCE.remove(deps.storage);
        deps.api.debug(&format!(
            "raffle: dropped stale advance for game {} (current game {}, stage {})",
            pending.game_id, counters.current_game_id, state.stage
        ));
        return Ok(Response::new()
            .add_attribute("action", "tick")
            .add_attribute("fired", "false"));
    }

    let now = env.block.time.seconds();
    if !pending.is_due(now) {
        return Err(ContractError::AdvanceNotDue {
            due_at: pending.due_at_seconds,
        });
    }

    Ok(advance_session(deps, &env, "timer")?.add_attribute("fired", "true"))
}

pub fn restart(mut deps: DepsMut, info: MessageInfo, keep_data: bool) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let command = if keep_data {
        Command::RestartKeepData
    } else {
        Command::Restart
    };
    let action = command.name();
    let (prev, next) = apply(&mut deps, command)?;

    // an award pause from the abandoned game must never fire into the new one
    PENDING_ADVANCE.remove(deps.storage);
    if !keep_data {
        SETUP_DRAFT.remove(deps.storage);
    } else if prev.stage != Stage::Setup {
        SETUP_DRAFT.save(
            deps.storage,
            &SetupDraft {
                participants: next.participants.clone(),
                prizes: next.prizes.clone(),
            },
        )?;
    }
    let draft = SETUP_DRAFT.may_load(deps.storage)?.unwrap_or_default();

    Ok(Response::new()
        .add_attribute("action", action)
        .add_attribute("participants", draft.participants.len().to_string())
        .add_attribute("prizes", draft.prizes.len().to_string()))
}

/// Rebuild the session from its stored snapshot as after a restart: an
/// interrupted spin or award resumes from a stable stage, and an unusable
/// snapshot falls back to setup. Any pending award pause is dropped.
pub(crate) fn resume_session(deps: DepsMut) -> Restored {
    let restored = restore_session(deps.storage, deps.api);
    save_session(deps.storage, deps.api, &restored.state);
    PENDING_ADVANCE.remove(deps.storage);
    restored
}

pub fn resume(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    authorize(&config, &info.sender)?;

    let restored = resume_session(deps);

    Ok(Response::new()
        .add_attribute("action", "resume")
        .add_attribute("outcome", restored.outcome.as_str())
        .add_attribute("stage", restored.state.stage.as_str()))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    operator: Option<String>,
    advance_delay_seconds: Option<u64>,
    strict_prize_count: Option<bool>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(op) = operator {
        config.operator = deps.api.addr_validate(&op)?;
    }
    if let Some(delay) = advance_delay_seconds {
        config.advance_delay_seconds = delay;
    }
    if let Some(strict) = strict_prize_count {
        config.strict_prize_count = strict;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}
