use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{
    GameCounters, SessionConfig, CONFIG, DEFAULT_ADVANCE_DELAY_SECONDS, GAME_COUNTERS,
};

const CONTRACT_NAME: &str = "crates.io:raffle-draw-session";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let operator = match msg.operator {
        Some(op) => deps.api.addr_validate(&op)?,
        None => info.sender.clone(),
    };

    let config = SessionConfig {
        admin: info.sender.clone(),
        operator,
        advance_delay_seconds: msg
            .advance_delay_seconds
            .unwrap_or(DEFAULT_ADVANCE_DELAY_SECONDS),
        strict_prize_count: msg.strict_prize_count.unwrap_or(false),
    };
    CONFIG.save(deps.storage, &config)?;

    GAME_COUNTERS.save(
        deps.storage,
        &GameCounters {
            current_game_id: 0,
            draws_in_game: 0,
            games_completed: 0,
            started_at: None,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "draw-session")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("operator", config.operator.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetRoster { names_text } => execute::set_roster(deps, info, names_text),
        ExecuteMsg::AddParticipant { name } => execute::add_participant(deps, info, name),
        ExecuteMsg::RenameParticipant { id, name } => {
            execute::rename_participant(deps, info, id, name)
        }
        ExecuteMsg::RemoveParticipant { id } => execute::remove_participant(deps, info, id),
        ExecuteMsg::AddPrize { name } => execute::add_prize(deps, info, name),
        ExecuteMsg::RenamePrize { id, name } => execute::rename_prize(deps, info, id, name),
        ExecuteMsg::RemovePrize { id } => execute::remove_prize(deps, info, id),
        ExecuteMsg::MovePrize { id, to_index } => execute::move_prize(deps, info, id, to_index),
        ExecuteMsg::Begin {} => execute::begin(deps, env, info),
        ExecuteMsg::SpinStart {} => execute::spin_start(deps, info),
        ExecuteMsg::ResolveSpin { participant_id } => {
            execute::resolve_spin(deps, info, participant_id)
        }
        ExecuteMsg::ResolveSpinWithEntropy { entropy_hex } => {
            execute::resolve_spin_with_entropy(deps, info, entropy_hex)
        }
        ExecuteMsg::Accept {} => execute::accept(deps, env, info),
        ExecuteMsg::Reject {} => execute::reject(deps, info, false),
        ExecuteMsg::RejectAndRedraw {} => execute::reject(deps, info, true),
        ExecuteMsg::Advance {} => execute::advance(deps, env, info),
        ExecuteMsg::Tick {} => execute::tick(deps, env, info),
        ExecuteMsg::Restart {} => execute::restart(deps, info, false),
        ExecuteMsg::RestartKeepData {} => execute::restart(deps, info, true),
        ExecuteMsg::Resume {} => execute::resume(deps, info),
        ExecuteMsg::UpdateConfig {
            operator,
            advance_delay_seconds,
            strict_prize_count,
        } => execute::update_config(
            deps,
            info,
            operator,
            advance_delay_seconds,
            strict_prize_count,
        ),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Session {} => query::query_session(deps),
        QueryMsg::Status {} => query::query_status(deps),
        QueryMsg::Draft {} => query::query_draft(deps),
        QueryMsg::Pool {} => query::query_pool(deps),
        QueryMsg::Winners { start_after, limit } => {
            query::query_winners(deps, start_after, limit)
        }
        QueryMsg::PendingAdvance {} => query::query_pending_advance(deps),
        QueryMsg::PickPreview { entropy_hex } => query::query_pick_preview(deps, entropy_hex),
        QueryMsg::GameHistory { start_after, limit } => {
            query::query_game_history(deps, start_after, limit)
        }
        QueryMsg::Game { game_id } => query::query_game(deps, game_id),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // new code picks the session up the way a reload would
    let restored = execute::resume_session(deps);

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION)
        .add_attribute("session", restored.outcome.as_str()))
}
