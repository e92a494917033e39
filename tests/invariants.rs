//! Property tests over arbitrary action sequences.

use dice_roller_engine::model::{BattleFormat, Face, Mode, Parity, Phase, State, Winner, FACES};
use dice_roller_engine::rules::{battle_winner, bets_unique, face_counts, winning_players};
use dice_roller_engine::*;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Select(Mode),
    Parity(Parity),
    Format(BattleFormat),
    Toggle(Face),
    AddPlayer,
    RemovePlayer(usize),
    Bet(usize, Option<Face>),
    Roll(Face),
    Reset,
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Normal), Just(Mode::OddEven), Just(Mode::Battle), Just(Mode::SelectNumbers)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_mode().prop_map(Op::Select),
        prop_oneof![Just(Parity::Odd), Just(Parity::Even)].prop_map(Op::Parity),
        prop_oneof![Just(BattleFormat::BestOf3), Just(BattleFormat::BestOf5)].prop_map(Op::Format),
        (0u8..8).prop_map(Op::Toggle),
        Just(Op::AddPlayer),
        (0usize..4).prop_map(Op::RemovePlayer),
        (0usize..4, prop::option::of(0u8..8)).prop_map(|(i, b)| Op::Bet(i, b)),
        (1u8..=6).prop_map(Op::Roll),
        Just(Op::Reset),
    ]
}

/// Applies one op; rolls land immediately on the given face, remapped into
/// the selected pool when the mode restricts it.
fn apply(state: &mut State, op: &Op) {
    let _ = match *op {
        Op::Select(m) => select_mode(state, m).map(|_| ()),
        Op::Parity(p) => choose_parity(state, p).map(|_| ()),
        Op::Format(f) => choose_battle_format(state, f).map(|_| ()),
        Op::Toggle(n) => toggle_selected_number(state, n).map(|_| ()),
        Op::AddPlayer => add_player(state).map(|_| ()),
        Op::RemovePlayer(i) => remove_player(state, i).map(|_| ()),
        Op::Bet(i, b) => set_player_bet(state, i, b).map(|_| ()),
        Op::Roll(face) => {
            let domain = roll_domain(state);
            begin_roll(state).and_then(|(ticket, _)| {
                let face = domain[(face as usize - 1) % domain.len()];
                resolve_roll(state, ticket, face).map(|_| ())
            })
        }
        Op::Reset => reset_battle(state).map(|_| ()),
    };
}

proptest! {
    #[test]
    fn structural_invariants_hold(ops in prop::collection::vec(arb_op(), 0..80)) {
        let mut state = new_state();
        for op in &ops {
            apply(&mut state, op);
            prop_assert!(!state.players.is_empty());
            prop_assert!(bets_unique(&state.players));
            prop_assert!(state.phase != Phase::Rolling);
            prop_assert!(state.selected_numbers.windows(2).all(|w| w[0] < w[1]));
            if state.mode != Mode::Battle {
                prop_assert!(state.round_rolls.is_empty());
            }
            match state.winner {
                Some(Winner::Parity(_)) => prop_assert_eq!(state.mode, Mode::OddEven),
                Some(Winner::Face(_)) => prop_assert_eq!(state.mode, Mode::Battle),
                None => {}
            }
            if let (Mode::Battle, Some(format)) = (state.mode, state.battle_format) {
                let expected = battle_winner(&state.round_rolls, format, &state.players);
                prop_assert_eq!(state.winner, expected.map(Winner::Face));
                let names = expected.map(|f| winning_players(&state.players, f)).unwrap_or_default();
                prop_assert_eq!(&state.round_winners, &names);
            }
        }
    }

    #[test]
    fn battle_winner_is_lowest_eligible_face_at_threshold(
        bets in prop::collection::btree_set(1u8..=6, 0..4),
        rolls in prop::collection::vec(1u8..=6, 1..20),
        best_of_five in any::<bool>(),
    ) {
        let format = if best_of_five { BattleFormat::BestOf5 } else { BattleFormat::BestOf3 };
        let mut state = new_state();
        select_mode(&mut state, Mode::Battle).unwrap();
        choose_battle_format(&mut state, format).unwrap();
        for (i, &bet) in bets.iter().enumerate() {
            if i > 0 { add_player(&mut state).unwrap(); }
            set_player_bet(&mut state, i, Some(bet)).unwrap();
        }
        let eligible: Vec<Face> = if bets.is_empty() { FACES.to_vec() } else { bets.iter().copied().collect() };

        let mut landed = vec![];
        for &face in &rolls {
            let Ok((ticket, _)) = begin_roll(&mut state) else { break };
            resolve_roll(&mut state, ticket, face).unwrap();
            landed.push(face);
            let counts = face_counts(&landed);
            let expected = eligible.iter().copied().find(|&f| counts[(f - 1) as usize] >= format.threshold());
            prop_assert_eq!(state.winner, expected.map(Winner::Face));
            if let Some(w) = expected {
                let winners: Vec<usize> = state.players.iter().enumerate()
                    .filter(|(_, p)| p.bet == Some(w)).map(|(i, _)| i).collect();
                prop_assert_eq!(&state.round_winners, &winners);
            }
        }
        prop_assert_eq!(&state.round_rolls, &landed);
    }
}
