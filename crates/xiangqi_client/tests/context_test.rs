//! Tests for response ordering, resets and the game-over announcement.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ScriptedEngine, coord, state_with};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::time::timeout;
use xiangqi_board::{GameState, MoveRequest, Side};
use xiangqi_client::tui::App;
use xiangqi_client::{
    ClientError, ClientEvent, Completion, Driver, GameContext, Request, SelectionState,
};

fn won_by_red() -> GameState {
    state_with(
        &[(9, 4, Side::Red, "帥"), (0, 4, Side::Red, "俥")],
        Side::Black,
        true,
        Some(Side::Red),
    )
}

fn ok(seq: u64, request: Request, state: GameState) -> Completion {
    Completion {
        seq,
        request,
        result: Ok(state),
    }
}

#[test]
fn test_initial_fetch_renders_opening() {
    let mut context = GameContext::new();
    assert_eq!(context.turn_indicator(), "Connecting...");

    let dispatch = context.fetch_state();
    assert_eq!(dispatch.request, Request::FetchState);
    assert!(!context.request_in_flight(), "fetch does not gate clicks");

    context.complete(ok(dispatch.seq, dispatch.request, GameState::opening()));
    assert_eq!(context.state(), Some(&GameState::opening()));
    assert_eq!(context.turn_indicator(), "Red to move");
    assert_eq!(context.grid().cells().iter().filter(|c| c.glyph().is_some()).count(), 32);
}

#[test]
fn test_older_fetch_discarded_after_newer_applied() {
    let mut context = GameContext::new();
    let first = context.fetch_state();
    let second = context.fetch_state();

    context.complete(ok(second.seq, second.request, common::after_general_step()));
    context.complete(ok(first.seq, first.request, GameState::opening()));

    assert_eq!(context.state(), Some(&common::after_general_step()));
}

#[test]
fn test_stale_move_response_after_reset_is_discarded() {
    let mut context = GameContext::new();
    context.apply_state(GameState::opening());

    context.click(coord(9, 4));
    let mv = context.click(coord(8, 4)).expect("move dispatched");
    let reset = context.reset();

    context.complete(ok(reset.seq, reset.request, GameState::opening()));
    context.complete(ok(mv.seq, mv.request, common::after_general_step()));

    assert_eq!(context.state(), Some(&GameState::opening()));
    assert!(!context.request_in_flight());
}

#[test]
fn test_move_response_arriving_before_reset_response_is_overwritten() {
    let mut context = GameContext::new();
    context.apply_state(GameState::opening());

    context.click(coord(9, 4));
    let mv = context.click(coord(8, 4)).expect("move dispatched");
    let reset = context.reset();

    // The move was superseded, so its response is dropped even when early
    context.complete(ok(mv.seq, mv.request, common::after_general_step()));
    assert_eq!(context.state(), Some(&GameState::opening()));
    assert!(context.request_in_flight(), "reset still pending");

    context.complete(ok(reset.seq, reset.request, GameState::opening()));
    assert!(!context.request_in_flight());
}

#[test]
fn test_reset_returns_to_opening_and_idle() {
    let mut context = GameContext::new();
    context.apply_state(common::after_general_step());
    context.click(coord(0, 0));
    assert_eq!(context.selection(), SelectionState::Armed(coord(0, 0)));

    let reset = context.reset();
    assert_eq!(context.selection(), SelectionState::Idle);
    assert_eq!(context.grid().selected_count(), 0);

    context.complete(ok(reset.seq, reset.request, GameState::opening()));
    let state = context.state().expect("state applied");
    assert_eq!(state, &GameState::opening());
    assert!(!state.is_over());
    assert_eq!(context.selection(), SelectionState::Idle);
}

#[test]
fn test_reset_from_game_over_allows_play_again() {
    let mut context = GameContext::new();
    assert!(context.apply_state(won_by_red()).is_some());

    let reset = context.reset();
    context.complete(ok(reset.seq, reset.request, GameState::opening()));

    assert!(!context.announcement_current());
    assert!(context.click(coord(9, 4)).is_none());
    assert_eq!(context.selection(), SelectionState::Armed(coord(9, 4)));
}

#[test]
fn test_announcement_once_per_transition() {
    let mut context = GameContext::new();
    context.apply_state(GameState::opening());

    let announcement = context.apply_state(won_by_red()).expect("announced");
    assert_eq!(announcement.winner(), Some(Side::Red));
    assert_eq!(announcement.message(), "Game over! Red wins!");
    assert_eq!(context.turn_indicator(), "Game over: Red wins");

    // Re-rendering the same terminal state stays quiet
    assert!(context.apply_state(won_by_red()).is_none());

    // A new game and a new ending announce again
    assert!(context.apply_state(GameState::opening()).is_none());
    assert!(context.apply_state(won_by_red()).is_some());
}

#[test]
fn test_announcement_without_winner() {
    let mut context = GameContext::new();
    let drawn = state_with(&[], Side::Red, true, None);
    let announcement = context.apply_state(drawn).expect("announced");
    assert_eq!(announcement.winner(), None);
    assert_eq!(announcement.message(), "Game over!");
    assert_eq!(context.turn_indicator(), "Game over");
}

#[test]
fn test_network_failure_keeps_state() {
    let mut context = GameContext::new();
    context.apply_state(GameState::opening());

    let reset = context.reset();
    context.complete(Completion {
        seq: reset.seq,
        request: reset.request,
        result: Err(ClientError::network("connection refused")),
    });

    assert_eq!(context.state(), Some(&GameState::opening()));
    assert_eq!(context.notice(), Some("Could not reach the server (reset)"));
    assert!(!context.request_in_flight());
}

#[test]
fn test_malformed_state_keeps_previous_board() {
    let mut context = GameContext::new();
    context.apply_state(GameState::opening());
    let before = context.grid().cells().to_vec();

    let fetch = context.fetch_state();
    context.complete(Completion {
        seq: fetch.seq,
        request: fetch.request,
        result: Err(ClientError::malformed("board has 9 rows")),
    });

    assert_eq!(context.grid().cells(), before.as_slice());
    assert_eq!(context.notice(), Some("Server sent an unreadable state"));
}

#[test]
fn test_notice_cleared_by_next_success() {
    let mut context = GameContext::new();
    context.apply_state(GameState::opening());

    context.click(coord(9, 4));
    let mv = context.click(coord(5, 4)).expect("move dispatched");
    context.complete(Completion {
        seq: mv.seq,
        request: mv.request,
        result: Err(ClientError::invalid_move("Invalid move")),
    });
    assert_eq!(context.notice(), Some("Move rejected"));

    context.click(coord(9, 4));
    let mv = context.click(coord(8, 4)).expect("move dispatched");
    context.complete(ok(mv.seq, mv.request, common::after_general_step()));
    assert_eq!(context.notice(), None);
}

async fn next_event(
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<ClientEvent>,
) -> ClientEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

#[tokio::test]
async fn test_driver_runs_dispatch_and_reports_completion() {
    let engine = Arc::new(ScriptedEngine::new());
    engine.push_ok(GameState::opening());
    let (driver, mut rx) = Driver::new(engine.clone(), Duration::from_millis(10));

    let mut context = GameContext::new();
    driver.submit(context.fetch_state());

    match next_event(&mut rx).await {
        ClientEvent::Completed(completion) => {
            assert_eq!(completion.request, Request::FetchState);
            context.complete(completion);
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(context.state(), Some(&GameState::opening()));
    assert_eq!(engine.requests(), vec![Request::FetchState]);
}

#[tokio::test]
async fn test_app_shows_announcement_after_winning_move() {
    let engine = Arc::new(ScriptedEngine::new());
    engine.push_ok(state_with(
        &[(9, 4, Side::Red, "帥"), (1, 4, Side::Red, "俥"), (0, 4, Side::Black, "將")],
        Side::Red,
        false,
        None,
    ));
    engine.push_ok(won_by_red());
    let (driver, mut rx) = Driver::new(engine.clone(), Duration::from_millis(10));

    let mut app = App::new(driver);
    let event = next_event(&mut rx).await;
    app.handle_client_event(event);
    assert_eq!(app.context().turn_indicator(), "Red to move");

    let press = |code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
    // Walk the cursor from the red general up to the chariot
    for _ in 0..8 {
        app.handle_terminal_event(press(KeyCode::Up));
    }
    assert_eq!(app.cursor(), coord(1, 4));
    app.handle_terminal_event(press(KeyCode::Enter));
    assert_eq!(app.context().selection(), SelectionState::Armed(coord(1, 4)));
    app.handle_terminal_event(press(KeyCode::Up));
    app.handle_terminal_event(press(KeyCode::Enter));
    assert!(app.context().request_in_flight());

    let event = next_event(&mut rx).await;
    app.handle_client_event(event);
    assert!(app.context().state().expect("state").is_over());
    assert!(app.popup().is_none(), "announcement is deferred");

    let event = next_event(&mut rx).await;
    assert!(matches!(event, ClientEvent::Announce(_)));
    app.handle_client_event(event);
    assert_eq!(
        app.popup().map(|a| a.message()),
        Some("Game over! Red wins!".to_string())
    );

    // Any key dismisses the popup
    app.handle_terminal_event(press(KeyCode::Char('x')));
    assert!(app.popup().is_none());

    assert_eq!(
        engine.requests(),
        vec![
            Request::FetchState,
            Request::Move(MoveRequest::new(coord(1, 4), coord(0, 4))),
        ]
    );
}

#[tokio::test]
async fn test_announcement_dropped_when_reset_first() {
    let engine = Arc::new(ScriptedEngine::new());
    engine.push_ok(won_by_red());
    engine.push_ok(GameState::opening());
    let (driver, mut rx) = Driver::new(engine.clone(), Duration::from_millis(200));

    let mut app = App::new(driver);
    let event = next_event(&mut rx).await;
    app.handle_client_event(event);
    assert!(app.context().state().expect("state").is_over());

    app.handle_terminal_event(Event::Key(KeyEvent::new(
        KeyCode::Char('r'),
        KeyModifiers::NONE,
    )));

    // The reset completes before the deferred announcement fires
    let event = next_event(&mut rx).await;
    assert!(matches!(event, ClientEvent::Completed(_)));
    app.handle_client_event(event);
    assert!(!app.context().state().expect("state").is_over());

    let event = next_event(&mut rx).await;
    assert!(matches!(event, ClientEvent::Announce(_)));
    app.handle_client_event(event);
    assert!(app.popup().is_none());
}
