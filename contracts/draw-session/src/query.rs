use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use raffle_common::selection::{draw_entropy, pick_winner};

use crate::msg::{GameHistoryResponse, PoolResponse, StatusResponse, WinnersResponse};
use crate::state::{
    load_counters, load_session, CONFIG, GAMES, PENDING_ADVANCE, SETUP_DRAFT,
};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_session(deps: Deps) -> StdResult<Binary> {
    let state = load_session(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_status(deps: Deps) -> StdResult<Binary> {
    let state = load_session(deps.storage)?;
    let counters = load_counters(deps.storage)?;
    to_json_binary(&StatusResponse {
        stage: state.stage,
        game_id: counters.current_game_id,
        current_prize: state.current_prize().cloned(),
        current_prize_index: state.current_prize_index as u32,
        prize_count: state.prizes.len() as u32,
        pool_size: state.remaining_participants.len() as u32,
        winners_count: state.winners.len() as u32,
        current_winner: state.current_winner,
        is_over: state.is_over,
    })
}

pub fn query_draft(deps: Deps) -> StdResult<Binary> {
    let draft = SETUP_DRAFT.may_load(deps.storage)?.unwrap_or_default();
    to_json_binary(&draft)
}

pub fn query_pool(deps: Deps) -> StdResult<Binary> {
    let state = load_session(deps.storage)?;
    to_json_binary(&PoolResponse {
        participants: state.remaining_participants,
    })
}

/// Winners in award order. `start_after` is the 0-based position of the last
/// winner already seen.
pub fn query_winners(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let state = load_session(deps.storage)?;
    let limit = limit.unwrap_or(20).min(100) as usize;
    let skip = start_after.map(|i| i as usize + 1).unwrap_or(0);
    let total = state.winners.len() as u32;

    let winners = state.winners.into_iter().skip(skip).take(limit).collect();
    to_json_binary(&WinnersResponse { winners, total })
}

pub fn query_pending_advance(deps: Deps) -> StdResult<Binary> {
    let pending = PENDING_ADVANCE.may_load(deps.storage)?;
    to_json_binary(&pending)
}

pub fn query_pick_preview(deps: Deps, entropy_hex: String) -> StdResult<Binary> {
    let seed = hex::decode(&entropy_hex)
        .map_err(|_| StdError::generic_err("invalid hex input: entropy_hex"))?;
    let state = load_session(deps.storage)?;
    let counters = load_counters(deps.storage)?;
    let entropy = draw_entropy(&seed, counters.current_game_id, counters.draws_in_game);
    let pick = pick_winner(&state.remaining_participants, &entropy).cloned();
    to_json_binary(&pick)
}

pub fn query_game_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let games: Vec<_> = GAMES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, game)| game)
        .collect();

    to_json_binary(&GameHistoryResponse { games })
}

pub fn query_game(deps: Deps, game_id: u64) -> StdResult<Binary> {
    let game = GAMES.may_load(deps.storage, game_id)?;
    to_json_binary(&game)
}
