mod bank;
mod development;
mod longest_road;
mod players;
mod resources;
mod round;
mod state;
mod trade;
mod trading;


pub use bank::Bank;
pub use players::{OwnedDevelopmentCard, PlayerState};
pub use resources::{
    CITY_COST, DEVELOPMENT_CARD_COST, ROAD_COST, ResourceBundle, SETTLEMENT_COST,
};
pub use round::RoundState;
pub use state::{BuildingKind, GameParams, GameState, StateLogEntry};
pub use trade::{Trade, TradeId, TradeStatus};

use crate::types::RoundType;

/// Every recoverable failure an operation can return. Validation runs
/// before any mutation, so a returned error leaves the state untouched;
/// the one exception is an accepter who cannot pay, who is recorded as
/// rejecting while the call still errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("operation not allowed during {0} round")]
    WrongPhase(RoundType),
    #[error("not {0}'s turn")]
    NotYourTurn(String),
    #[error("unknown player: {0}")]
    UnknownPlayer(String),
    #[error("insufficient resources: {0}")]
    InsufficientResources(String),
    #[error("illegal placement: {0}")]
    IllegalPlacement(String),
    #[error("unknown trade: {0}")]
    UnknownTrade(TradeId),
    #[error("{player} is not an eligible responder for trade {trade}")]
    NotEligibleResponder { player: String, trade: TradeId },
    #[error("trade {0} already resolved")]
    TradeAlreadyResolved(TradeId),
    #[error("invalid resource set: {0}")]
    InvalidResourceSet(String),
    #[error("card not playable: {0}")]
    CardNotPlayable(String),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
}
