//! Integration tests for the raffle draw session.
//!
//! These tests drive the draw-session contract through its `instantiate` /
//! `execute` / `query` entry points using `cosmwasm_std::testing` mocks,
//! playing the part of the presentation layer: it edits the setup, starts
//! spins, reports draw results and lets the award pause run out.
//!
//! Run:
//! ```bash
//! cargo test -p raffle-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Env, MemoryStorage, OwnedDeps, Storage};
use raffle_common::{Participant, SessionState, Stage};
use raffle_draw_session::contract::{execute, instantiate, query};
use raffle_draw_session::msg::{
    ExecuteMsg, GameHistoryResponse, InstantiateMsg, PoolResponse, QueryMsg, StatusResponse,
    WinnersResponse,
};
use raffle_draw_session::state::{GameRecord, SESSION_KEY};
use raffle_draw_session::ContractError;

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Helpers ───

fn setup(advance_delay_seconds: u64) -> Deps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    let operator = deps.api.addr_make("operator");
    let msg = InstantiateMsg {
        operator: Some(operator.to_string()),
        advance_delay_seconds: Some(advance_delay_seconds),
        strict_prize_count: None,
    };
    instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg).unwrap();
    deps
}

fn run_at(deps: &mut Deps, env: Env, msg: ExecuteMsg) -> Result<cosmwasm_std::Response, ContractError> {
    let operator = deps.api.addr_make("operator");
    execute(deps.as_mut(), env, message_info(&operator, &[]), msg)
}

fn run(deps: &mut Deps, msg: ExecuteMsg) {
    run_at(deps, mock_env(), msg).unwrap();
}

fn status(deps: &Deps) -> StatusResponse {
    from_json(query(deps.as_ref(), mock_env(), QueryMsg::Status {}).unwrap()).unwrap()
}

fn session(deps: &Deps) -> SessionState {
    from_json(query(deps.as_ref(), mock_env(), QueryMsg::Session {}).unwrap()).unwrap()
}

fn pool_names(deps: &Deps) -> Vec<String> {
    let pool: PoolResponse =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::Pool {}).unwrap()).unwrap();
    pool.participants.into_iter().map(|p| p.name).collect()
}

/// Roster text ids follow line order: A → p-0, B → p-1, ...
fn start_game(deps: &mut Deps, names: &[&str], prizes: &[&str]) {
    run(
        deps,
        ExecuteMsg::SetRoster {
            names_text: names.join("\n"),
        },
    );
    for prize in prizes {
        run(
            deps,
            ExecuteMsg::AddPrize {
                name: prize.to_string(),
            },
        );
    }
    run(deps, ExecuteMsg::Begin {});
}

fn draw(deps: &mut Deps, participant_id: &str) {
    run(deps, ExecuteMsg::SpinStart {});
    run(
        deps,
        ExecuteMsg::ResolveSpin {
            participant_id: participant_id.to_string(),
        },
    );
}

fn winner_pairs(state: &SessionState) -> Vec<(String, String)> {
    state
        .winners
        .iter()
        .map(|w| (w.participant.name.clone(), w.prize.name.clone()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_game() {
    let mut deps = setup(3);
    start_game(&mut deps, &["A", "B", "C"], &["P1", "P2"]);
    assert_eq!(status(&deps).stage, Stage::ReadyToSpin);
    assert_eq!(pool_names(&deps), vec!["A", "B", "C"]);

    run(&mut deps, ExecuteMsg::SpinStart {});
    assert_eq!(status(&deps).stage, Stage::Spinning);

    run(
        &mut deps,
        ExecuteMsg::ResolveSpin {
            participant_id: "p-1".to_string(),
        },
    );
    let st = status(&deps);
    assert_eq!(st.stage, Stage::AwaitingDecision);
    assert_eq!(st.current_winner.map(|p| p.name), Some("B".to_string()));

    run(&mut deps, ExecuteMsg::Accept {});
    let state = session(&deps);
    assert_eq!(state.stage, Stage::PrizeAwarded);
    assert_eq!(winner_pairs(&state), vec![("B".into(), "P1".into())]);
    assert_eq!(pool_names(&deps), vec!["A", "C"]);
    assert_eq!(state.current_prize_index, 1);

    run(&mut deps, ExecuteMsg::Advance {});
    assert_eq!(status(&deps).stage, Stage::ReadyToSpin);

    draw(&mut deps, "p-0");
    assert_eq!(status(&deps).stage, Stage::AwaitingDecision);

    run(&mut deps, ExecuteMsg::Reject {});
    let st = status(&deps);
    assert_eq!(st.stage, Stage::ReadyToSpin);
    assert_eq!(st.current_winner, None);
    assert_eq!(pool_names(&deps), vec!["A", "C"]);

    draw(&mut deps, "p-2");
    run(&mut deps, ExecuteMsg::Accept {});
    let state = session(&deps);
    assert_eq!(state.stage, Stage::PrizeAwarded);
    assert_eq!(
        winner_pairs(&state),
        vec![("B".into(), "P1".into()), ("C".into(), "P2".into())]
    );
    assert_eq!(pool_names(&deps), vec!["A"]);
    assert!(state.is_over);

    run(&mut deps, ExecuteMsg::Advance {});
    assert_eq!(status(&deps).stage, Stage::GameOver);

    let err = run_at(&mut deps, mock_env(), ExecuteMsg::SpinStart {}).unwrap_err();
    assert!(matches!(err, ContractError::Transition(_)));

    // the finished game is archived
    let game: Option<GameRecord> = from_json(
        query(deps.as_ref(), mock_env(), QueryMsg::Game { game_id: 1 }).unwrap(),
    )
    .unwrap();
    let game = game.unwrap();
    assert_eq!(game.roster_size, 3);
    assert_eq!(game.winners.len(), 2);
    assert_eq!(game.draws, 3);
    assert!(game.unawarded_prizes.is_empty());
}

#[test]
fn test_pool_exhausted_before_prizes() {
    let mut deps = setup(3);
    start_game(&mut deps, &["A", "B"], &["P1", "P2", "P3"]);

    draw(&mut deps, "p-0");
    run(&mut deps, ExecuteMsg::Accept {});
    run(&mut deps, ExecuteMsg::Advance {});
    draw(&mut deps, "p-1");
    run(&mut deps, ExecuteMsg::Accept {});

    let state = session(&deps);
    assert!(state.is_over);
    assert!(state.remaining_participants.is_empty());
    assert_eq!(state.current_prize_index, 1);

    run(&mut deps, ExecuteMsg::Advance {});
    assert_eq!(status(&deps).stage, Stage::GameOver);

    let history: GameHistoryResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::GameHistory {
                start_after: None,
                limit: None,
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(history.games.len(), 1);
    let unawarded: Vec<_> = history.games[0]
        .unawarded_prizes
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(unawarded, vec!["P3"]);
}

#[test]
fn test_award_pause_advances_on_tick() {
    let mut deps = setup(5);
    start_game(&mut deps, &["A", "B", "C"], &["P1", "P2"]);
    draw(&mut deps, "p-0");
    run(&mut deps, ExecuteMsg::Accept {});

    let pending: Option<raffle_common::PendingAdvance> = from_json(
        query(deps.as_ref(), mock_env(), QueryMsg::PendingAdvance {}).unwrap(),
    )
    .unwrap();
    let pending = pending.unwrap();
    assert_eq!(pending.due_at_seconds, mock_env().block.time.seconds() + 5);

    let anyone = deps.api.addr_make("anyone");
    let mut later = mock_env();
    later.block.time = later.block.time.plus_seconds(5);
    execute(deps.as_mut(), later, message_info(&anyone, &[]), ExecuteMsg::Tick {}).unwrap();

    assert_eq!(status(&deps).stage, Stage::ReadyToSpin);
    assert_eq!(status(&deps).current_prize.map(|p| p.name), Some("P2".to_string()));
}

#[test]
fn test_restart_discards_pending_award_advance() {
    let mut deps = setup(5);
    start_game(&mut deps, &["A", "B", "C"], &["P1", "P2"]);
    draw(&mut deps, "p-0");
    run(&mut deps, ExecuteMsg::Accept {});

    // restart mid-award, keep the data and start over straight away
    run(&mut deps, ExecuteMsg::RestartKeepData {});
    run(&mut deps, ExecuteMsg::Begin {});
    draw(&mut deps, "p-2");

    let mut later = mock_env();
    later.block.time = later.block.time.plus_seconds(60);
    let err = run_at(&mut deps, later, ExecuteMsg::Tick {}).unwrap_err();
    assert!(matches!(err, ContractError::NoPendingAdvance));

    let st = status(&deps);
    assert_eq!(st.stage, Stage::AwaitingDecision);
    assert_eq!(st.game_id, 2);
    assert_eq!(st.winners_count, 0);
    assert_eq!(pool_names(&deps), vec!["A", "B", "C"]);
}

#[test]
fn test_reload_mid_spin_resumes_ready() {
    let mut deps = setup(3);
    start_game(&mut deps, &["A", "B", "C"], &["P1", "P2"]);
    let before = session(&deps);
    run(&mut deps, ExecuteMsg::SpinStart {});

    // between messages the spin is kept as written
    let raw: serde_json::Value =
        serde_json::from_slice(&deps.storage.get(SESSION_KEY).unwrap()).unwrap();
    assert_eq!(raw["stage"], "spinning");
    assert_eq!(status(&deps).stage, Stage::Spinning);

    // a reload never resumes inside a spin
    run(&mut deps, ExecuteMsg::Resume {});
    let resumed = session(&deps);
    assert_eq!(resumed.stage, Stage::ReadyToSpin);
    assert_eq!(resumed, before);

    run(&mut deps, ExecuteMsg::SpinStart {});
    assert_eq!(status(&deps).stage, Stage::Spinning);
}

#[test]
fn test_corrupt_snapshot_falls_back_to_setup() {
    let mut deps = setup(3);
    start_game(&mut deps, &["A", "B"], &["P1"]);
    deps.storage.set(SESSION_KEY, b"\x00not a snapshot");
    assert!(query(deps.as_ref(), mock_env(), QueryMsg::Status {}).is_err());

    run(&mut deps, ExecuteMsg::Resume {});
    let st = status(&deps);
    assert_eq!(st.stage, Stage::Setup);
    assert_eq!(st.pool_size, 0);
    assert_eq!(session(&deps), SessionState::default());

    // the setup draft survives and a new game can begin
    run(&mut deps, ExecuteMsg::Begin {});
    assert_eq!(status(&deps).stage, Stage::ReadyToSpin);
}

#[test]
fn test_entropy_draws_never_repeat_a_winner() {
    let mut deps = setup(0);
    let names = ["A", "B", "C", "D", "E"];
    start_game(&mut deps, &names, &["P1", "P2", "P3", "P4", "P5", "P6"]);

    for round in 0u8..5 {
        run(&mut deps, ExecuteMsg::SpinStart {});
        run(
            &mut deps,
            ExecuteMsg::ResolveSpinWithEntropy {
                entropy_hex: format!("{:02x}", round),
            },
        );
        run(&mut deps, ExecuteMsg::Accept {});
        run(&mut deps, ExecuteMsg::Tick {});
    }

    let state = session(&deps);
    assert_eq!(state.stage, Stage::GameOver);
    let mut won: Vec<String> = state
        .winners
        .iter()
        .map(|w| w.participant.name.clone())
        .collect();
    won.sort();
    assert_eq!(won, names.iter().map(|n| n.to_string()).collect::<Vec<_>>());

    let awarded: Vec<_> = state.winners.iter().map(|w| w.prize.name.as_str()).collect();
    assert_eq!(awarded, vec!["P1", "P2", "P3", "P4", "P5"]);
}

#[test]
fn test_winners_pagination() {
    let mut deps = setup(3);
    start_game(&mut deps, &["A", "B", "C", "D"], &["P1", "P2", "P3"]);
    for id in ["p-3", "p-2", "p-1"] {
        draw(&mut deps, id);
        run(&mut deps, ExecuteMsg::Accept {});
        run(&mut deps, ExecuteMsg::Advance {});
    }

    let page: WinnersResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Winners {
                start_after: Some(0),
                limit: Some(1),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.winners.len(), 1);
    assert_eq!(page.winners[0].participant.name, "C");
    assert_eq!(page.winners[0].prize.name, "P2");
}

#[test]
fn test_duplicate_names_are_distinct_participants() {
    let mut deps = setup(3);
    start_game(&mut deps, &["Sam", "Sam", "Lee"], &["P1"]);

    draw(&mut deps, "p-1");
    run(&mut deps, ExecuteMsg::Accept {});

    let remaining: Vec<Participant> = session(&deps).remaining_participants;
    let ids: Vec<_> = remaining.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p-0", "p-2"]);
    assert_eq!(pool_names(&deps), vec!["Sam", "Lee"]);
}
