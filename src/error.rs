//! Error taxonomy shared by every public engine operation.

use thiserror::Error;

/// Errors returned to callers as structured results. None of these are fatal
/// to the engine; background loops log them and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Insufficient credits: balance {balance}, required {required}")]
    InsufficientFunds { balance: u64, required: u64 },

    #[error("No skill points available")]
    NoSkillPoints,

    #[error("Invalid stat '{0}'")]
    InvalidStat(String),

    #[error("Tournament {0} not found")]
    TournamentNotFound(String),

    #[error("Tournament {0} already started")]
    TournamentAlreadyStarted(String),

    #[error("Battle {0} not found")]
    BattleNotFound(String),
}

impl EngineError {
    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InsufficientFunds { .. } => "insufficient_funds",
            EngineError::NoSkillPoints => "no_skill_points",
            EngineError::InvalidStat(_) => "invalid_stat",
            EngineError::TournamentNotFound(_) => "tournament_not_found",
            EngineError::TournamentAlreadyStarted(_) => "tournament_already_started",
            EngineError::BattleNotFound(_) => "battle_not_found",
        }
    }

    /// Whether the error means the addressed entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::TournamentNotFound(_) | EngineError::BattleNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
