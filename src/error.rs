use thiserror::Error;

use crate::model::{Face, Mode};

/// Why a transition was refused. A refused transition never changes state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    #[error("a roll is already in flight")]
    AlreadyRolling,
    #[error("action not available in {0:?} mode")]
    WrongMode(Mode),
    #[error("no parity chosen")]
    NoParity,
    #[error("no battle format chosen")]
    NoBattleFormat,
    #[error("need at least two selected numbers (have {have})")]
    TooFewNumbers { have: usize },
    #[error("battle already has a winner")]
    BattleDecided,
    #[error("round already has rolls")]
    RoundInProgress,
    #[error("{0} is not a die face")]
    NotAFace(Face),
    #[error("no player at index {0}")]
    NoSuchPlayer(usize),
    #[error("cannot remove the last player")]
    LastPlayer,
    #[error("bet {bet} already held by another player")]
    BetTaken { bet: Face },
    #[error("stale roll ticket")]
    StaleTicket,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("speech not supported on this platform")]
    Unsupported,
    #[error("no voice for {language}")]
    NoVoice { language: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
