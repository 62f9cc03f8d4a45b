#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

//! Deterministic rules engine for a multiplayer resource-trading board
//! game: turn sequencing, production, building placement, trading,
//! development cards, the robber, longest-road scoring and victory.
//!
//! The engine is synchronous and performs no I/O. Callers own all
//! concurrency: serialize every operation against one match through a
//! single logical queue, and conflicting requests resolve by arrival
//! order (losers fail validation with a typed [`game::GameError`]).

pub mod board;
pub mod coords;
pub mod game;
pub mod types;

pub use board::{BoardGraph, EdgeId, MapType, TileId, VertexId};
pub use game::{GameError, GameParams, GameState, ResourceBundle, TradeId};
pub use types::{DevelopmentCard, PlayerColor, PlayerSpec, PortKind, Resource, RoundType};
