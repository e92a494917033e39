pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod locale;
pub mod model;
pub mod notifier;
pub mod rng;
pub mod rules;
pub mod schedule;

pub use controller::RoundController;
pub use error::Rejected;

use model::*;
use rules::{battle_winner, bet_collides, is_face, winning_players};
use serde_json::json;

fn emit(state: &mut State, ty: EventType, payload: serde_json::Value) -> Event {
    state.events_seq += 1;
    Event { seq: state.events_seq, ty, round: state.round, payload }
}

fn not_rolling(state: &State) -> Result<(), Rejected> {
    if state.is_rolling() { Err(Rejected::AlreadyRolling) } else { Ok(()) }
}

fn require_mode(state: &State, mode: Mode) -> Result<(), Rejected> {
    not_rolling(state)?;
    if state.mode != mode { return Err(Rejected::WrongMode(state.mode)); }
    Ok(())
}

fn next_round(state: &mut State) {
    state.round = RoundToken(state.round.0 + 1);
}

/// Sub-choice the current mode still needs before a roll is possible.
fn missing_config(state: &State) -> Option<Rejected> {
    match state.mode {
        Mode::OddEven if state.parity.is_none() => Some(Rejected::NoParity),
        Mode::Battle if state.battle_format.is_none() => Some(Rejected::NoBattleFormat),
        Mode::SelectNumbers if state.selected_numbers.len() < 2 => {
            Some(Rejected::TooFewNumbers { have: state.selected_numbers.len() })
        }
        _ => None,
    }
}

fn refresh_phase(state: &mut State) {
    if state.is_rolling() { return; }
    if missing_config(state).is_some() {
        state.phase = Phase::AwaitingConfig;
    } else if matches!(state.phase, Phase::Idle | Phase::AwaitingConfig) {
        state.phase = Phase::ReadyToRoll;
    }
}

fn clear_round(state: &mut State) {
    state.round_rolls.clear();
    state.winner = None;
    state.round_winners.clear();
    state.display_value = None;
}

pub fn new_state() -> State {
    State::default()
}

pub fn select_mode(state: &mut State, mode: Mode) -> Result<Event, Rejected> {
    not_rolling(state)?;
    state.mode = mode;
    state.parity = None;
    state.battle_format = None;
    state.selected_numbers.clear();
    clear_round(state);
    if mode == Mode::Battle {
        for p in state.players.iter_mut() { p.bet = None; }
    } else {
        state.players = vec![Player::default()];
    }
    next_round(state);
    state.phase = Phase::AwaitingConfig;
    refresh_phase(state);
    Ok(emit(state, EventType::ModeSelected, json!({ "mode": mode })))
}

pub fn choose_parity(state: &mut State, parity: Parity) -> Result<Event, Rejected> {
    require_mode(state, Mode::OddEven)?;
    state.parity = Some(parity);
    refresh_phase(state);
    Ok(emit(state, EventType::ConfigChanged, json!({ "parity": parity })))
}

pub fn choose_battle_format(state: &mut State, format: BattleFormat) -> Result<Event, Rejected> {
    require_mode(state, Mode::Battle)?;
    if !state.round_rolls.is_empty() { return Err(Rejected::RoundInProgress); }
    state.battle_format = Some(format);
    clear_round(state);
    for p in state.players.iter_mut() { p.bet = None; }
    next_round(state);
    state.phase = Phase::AwaitingConfig;
    refresh_phase(state);
    Ok(emit(state, EventType::ConfigChanged, json!({ "battleFormat": format, "threshold": format.threshold() })))
}

pub fn toggle_selected_number(state: &mut State, n: Face) -> Result<Event, Rejected> {
    require_mode(state, Mode::SelectNumbers)?;
    if !is_face(n) { return Err(Rejected::NotAFace(n)); }
    if let Some(pos) = state.selected_numbers.iter().position(|&s| s == n) {
        state.selected_numbers.remove(pos);
    } else {
        state.selected_numbers.push(n);
        state.selected_numbers.sort_unstable();
    }
    refresh_phase(state);
    let payload = json!({ "selected": state.selected_numbers });
    Ok(emit(state, EventType::ConfigChanged, payload))
}

fn players_changed(state: &mut State) -> Event {
    let payload = json!({ "players": state.players });
    emit(state, EventType::PlayersChanged, payload)
}

pub fn add_player(state: &mut State) -> Result<Event, Rejected> {
    require_mode(state, Mode::Battle)?;
    state.players.push(Player::default());
    Ok(players_changed(state))
}

pub fn remove_player(state: &mut State, idx: usize) -> Result<Event, Rejected> {
    require_mode(state, Mode::Battle)?;
    if state.players.len() == 1 { return Err(Rejected::LastPlayer); }
    if idx >= state.players.len() { return Err(Rejected::NoSuchPlayer(idx)); }
    // bets decide which faces can win, so the roster is frozen with the round
    if !state.round_rolls.is_empty() { return Err(Rejected::RoundInProgress); }
    state.players.remove(idx);
    Ok(players_changed(state))
}

/// Names longer than the limit are cut at a char boundary.
pub fn set_player_name(state: &mut State, idx: usize, name: &str) -> Result<Event, Rejected> {
    require_mode(state, Mode::Battle)?;
    let player = state.players.get_mut(idx).ok_or(Rejected::NoSuchPlayer(idx))?;
    player.name = name.chars().take(MAX_NAME_CHARS).collect();
    Ok(players_changed(state))
}

pub fn set_player_bet(state: &mut State, idx: usize, bet: Option<Face>) -> Result<Event, Rejected> {
    require_mode(state, Mode::Battle)?;
    if idx >= state.players.len() { return Err(Rejected::NoSuchPlayer(idx)); }
    if !state.round_rolls.is_empty() { return Err(Rejected::RoundInProgress); }
    if let Some(b) = bet {
        if !is_face(b) { return Err(Rejected::NotAFace(b)); }
        if bet_collides(&state.players, idx, b) { return Err(Rejected::BetTaken { bet: b }); }
    }
    state.players[idx].bet = bet;
    Ok(players_changed(state))
}

/// Guards shared by `begin_roll` and the view's roll button.
pub fn roll_guard(state: &State) -> Result<(), Rejected> {
    not_rolling(state)?;
    if let Some(missing) = missing_config(state) { return Err(missing); }
    if state.mode == Mode::Battle && state.winner.is_some() { return Err(Rejected::BattleDecided); }
    Ok(())
}

/// Faces the next roll samples from.
pub fn roll_domain(state: &State) -> Vec<Face> {
    match state.mode {
        Mode::SelectNumbers => state.selected_numbers.clone(),
        _ => FACES.to_vec(),
    }
}

pub fn begin_roll(state: &mut State) -> Result<(RollTicket, Event), Rejected> {
    roll_guard(state)?;
    state.phase = Phase::Rolling;
    state.display_value = None;
    if state.mode != Mode::Battle {
        state.winner = None;
        state.round_winners.clear();
    }
    state.roll_seq += 1;
    let ticket = RollTicket { round: state.round, roll_seq: state.roll_seq };
    let payload = json!({ "mode": state.mode, "rollSeq": state.roll_seq });
    let ev = emit(state, EventType::RollStarted, payload);
    Ok((ticket, ev))
}

fn check_ticket(state: &State, ticket: RollTicket) -> Result<(), Rejected> {
    let current = RollTicket { round: state.round, roll_seq: state.roll_seq };
    if !state.is_rolling() || ticket != current { return Err(Rejected::StaleTicket); }
    Ok(())
}

/// Lands an in-flight roll on `face` and evaluates the round.
pub fn resolve_roll(state: &mut State, ticket: RollTicket, face: Face) -> Result<Vec<Event>, Rejected> {
    check_ticket(state, ticket)?;
    if !is_face(face) { return Err(Rejected::NotAFace(face)); }
    state.display_value = Some(face);
    state.phase = Phase::Resolved;
    match state.mode {
        Mode::Battle => {
            state.round_rolls.push(face);
            let found = state.battle_format.and_then(|f| battle_winner(&state.round_rolls, f, &state.players));
            match found {
                Some(w) => {
                    state.winner = Some(Winner::Face(w));
                    state.round_winners = winning_players(&state.players, w);
                }
                None => state.phase = Phase::ReadyToRoll,
            }
        }
        Mode::OddEven => state.winner = Some(Winner::Parity(Parity::of(face))),
        Mode::Normal | Mode::SelectNumbers => {}
    }
    let mut events = Vec::with_capacity(2);
    let payload = json!({ "value": face, "mode": state.mode, "rolls": state.round_rolls });
    events.push(emit(state, EventType::RollProduced, payload));
    if let Some(winner) = state.winner {
        let choice_won = match (winner, state.parity) {
            (Winner::Parity(p), Some(choice)) => Some(p == choice),
            _ => None,
        };
        let payload = json!({ "winner": winner, "players": state.round_winners, "choiceWon": choice_won });
        events.push(emit(state, EventType::RoundWon, payload));
    }
    Ok(events)
}

/// Drops an in-flight roll without an outcome.
pub fn abort_roll(state: &mut State, ticket: RollTicket) -> Result<(), Rejected> {
    check_ticket(state, ticket)?;
    state.phase = Phase::AwaitingConfig;
    refresh_phase(state);
    Ok(())
}

pub fn reset_battle(state: &mut State) -> Result<Event, Rejected> {
    require_mode(state, Mode::Battle)?;
    clear_round(state);
    for p in state.players.iter_mut() { p.bet = None; }
    next_round(state);
    state.phase = Phase::AwaitingConfig;
    refresh_phase(state);
    let payload = json!({ "battleFormat": state.battle_format });
    Ok(emit(state, EventType::RoundReset, payload))
}
