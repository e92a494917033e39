use serde::{Deserialize, Serialize};

pub type Face = u8;

pub const FACES: [Face; 6] = [1, 2, 3, 4, 5, 6];
pub const MAX_NAME_CHARS: usize = 20;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Normal,
    OddEven,
    Battle,
    SelectNumbers,
}

impl Mode {
    /// Label stored in roll history records.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::OddEven => "odd-even",
            Mode::Battle => "battle",
            Mode::SelectNumbers => "select-numbers",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn of(face: Face) -> Self {
        if face % 2 == 1 { Parity::Odd } else { Parity::Even }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BattleFormat {
    BestOf3,
    BestOf5,
}

impl BattleFormat {
    /// Wins a single face needs before it takes the battle.
    pub fn threshold(self) -> usize {
        match self {
            BattleFormat::BestOf3 => 2,
            BattleFormat::BestOf5 => 3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Player {
    pub name: String,
    pub bet: Option<Face>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingConfig,
    ReadyToRoll,
    Rolling,
    Resolved,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Winner {
    Parity(Parity),
    Face(Face),
}

/// Identity of the current round. Scheduled work created under an older
/// token is stale and gets dropped.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RoundToken(pub u64);

/// Handed out when a roll is accepted; the roll can only be resolved with the
/// ticket it was started under.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RollTicket {
    pub round: RoundToken,
    pub roll_seq: u64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    ModeSelected,
    ConfigChanged,
    PlayersChanged,
    RollStarted,
    RollProduced,
    RoundWon,
    RoundReset,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    pub ty: EventType,
    pub round: RoundToken,
    pub payload: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct State {
    pub mode: Mode,
    pub phase: Phase,
    pub parity: Option<Parity>,
    pub battle_format: Option<BattleFormat>,
    pub players: Vec<Player>,
    pub selected_numbers: Vec<Face>,
    pub round_rolls: Vec<Face>,
    pub winner: Option<Winner>,
    pub round_winners: Vec<usize>,
    pub display_value: Option<Face>,
    pub round: RoundToken,
    pub roll_seq: u64,
    pub events_seq: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            phase: Phase::Idle,
            parity: None,
            battle_format: None,
            players: vec![Player::default()],
            selected_numbers: vec![],
            round_rolls: vec![],
            winner: None,
            round_winners: vec![],
            display_value: None,
            round: RoundToken::default(),
            roll_seq: 0,
            events_seq: 0,
        }
    }
}

impl State {
    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, Phase::Rolling)
    }

    /// Player names of the recorded round winners, skipping blank names.
    pub fn round_winner_names(&self) -> Vec<&str> {
        self.round_winners
            .iter()
            .filter_map(|&i| self.players.get(i))
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_follow_format() {
        assert_eq!(BattleFormat::BestOf3.threshold(), 2);
        assert_eq!(BattleFormat::BestOf5.threshold(), 3);
    }

    #[test]
    fn parity_of_faces() {
        assert_eq!(Parity::of(3), Parity::Odd);
        assert_eq!(Parity::of(4), Parity::Even);
        assert_eq!(Parity::of(1), Parity::Odd);
    }

    #[test]
    fn state_serializes_with_kebab_modes() {
        let state = State { mode: Mode::SelectNumbers, ..State::default() };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["mode"], "select-numbers");
        let back: State = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
