use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Resource {
    Lumber,
    Brick,
    Sheep,
    Grain,
    Ore,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Lumber,
        Resource::Brick,
        Resource::Sheep,
        Resource::Grain,
        Resource::Ore,
    ];
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DevelopmentCard {
    Knight,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
    VictoryPoint,
}

impl DevelopmentCard {
    pub const ALL: [DevelopmentCard; 5] = [
        DevelopmentCard::Knight,
        DevelopmentCard::RoadBuilding,
        DevelopmentCard::YearOfPlenty,
        DevelopmentCard::Monopoly,
        DevelopmentCard::VictoryPoint,
    ];
}

/// The full set of round types the engine's state machine moves through.
///
/// The four setup states repeat per player (snake order on the second
/// pass). Interrupt states (`MoveRobberDueKnight`, the development-card
/// pick states, `DiscardPhase`) suspend the state they interrupted and
/// restore it on completion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundType {
    SetupSettlement1,
    SetupRoad1,
    SetupSettlement2,
    SetupRoad2,
    FirstRound,
    Regular,
    MoveRobberDue7,
    MoveRobberDueKnight,
    PickRobbed,
    BetweenTurns,
    BuildRoad1Development,
    BuildRoad2Development,
    MonopolyPickResource,
    YearOfPlentyPickResources,
    DiscardPhase,
    GameOver,
}

/// Display colors for a roster entry. Supplied by the caller at
/// construction and never interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub background: String,
    pub foreground: String,
}

/// Roster entry handed to [`crate::game::GameState::new`]; roster order
/// is turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub id: String,
    pub color: PlayerColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    General,
    Resource(Resource),
}

impl PortKind {
    pub fn matches(self, resource: Resource) -> bool {
        match self {
            PortKind::General => true,
            PortKind::Resource(kind) => kind == resource,
        }
    }
}
