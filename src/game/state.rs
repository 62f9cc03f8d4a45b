use std::collections::{HashMap, HashSet};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::board::{
    BoardGraph, EdgeId, MapType, TileId, VertexId, edge_contains_vertex, normalize_edge,
};
use crate::game::GameError;
use crate::game::bank::Bank;
use crate::game::longest_road::longest_road_length;
use crate::game::players::PlayerState;
use crate::game::resources::{CITY_COST, ROAD_COST, SETTLEMENT_COST, ResourceBundle};
use crate::game::round::RoundState;
use crate::game::trade::TradeBook;
use crate::types::{DevelopmentCard, PlayerSpec, Resource, RoundType};

/// Rule knobs fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParams {
    pub bank_trade_ratio: u8,
    pub hand_cap: u32,
    pub max_dev_cards_per_round: u8,
    pub max_settlements: u8,
    pub max_cities: u8,
    pub max_roads: u8,
    pub target_points: u8,
    pub points_per_settlement: u8,
    pub points_per_city: u8,
    pub points_for_longest_road: u8,
    pub points_for_largest_army: u8,
    pub longest_road_minimum: u8,
    pub largest_army_minimum: u8,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            bank_trade_ratio: 4,
            hand_cap: 7,
            max_dev_cards_per_round: 1,
            max_settlements: 5,
            max_cities: 4,
            max_roads: 15,
            target_points: 10,
            points_per_settlement: 1,
            points_per_city: 2,
            points_for_longest_road: 2,
            points_for_largest_army: 2,
            longest_road_minimum: 5,
            largest_army_minimum: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingKind {
    Settlement,
    City,
}

/// Human-readable record of a successful mutation, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLogEntry {
    pub sequence: u64,
    pub message: String,
}

/// The aggregate every operation goes through. Single-writer: callers
/// serialize all calls against one match; the engine never blocks and
/// performs no I/O.
#[derive(Debug, Clone)]
pub struct GameState {
    pub id: Uuid,
    pub(crate) board: BoardGraph,
    pub(crate) players: Vec<PlayerState>,
    pub(crate) bank: Bank,
    pub(crate) round: RoundState,
    pub(crate) trades: TradeBook,
    pub(crate) params: GameParams,
    pub(crate) rng: StdRng,
    robber_tile: TileId,
    building_by_vertex: HashMap<VertexId, (usize, BuildingKind)>,
    road_by_edge: HashMap<EdgeId, usize>,
    longest_road_lengths: Vec<u8>,
    setup_order: Vec<usize>,
    setup_cursor: usize,
    pending_setup_vertex: Option<VertexId>,
    log: Vec<StateLogEntry>,
}

impl GameState {
    pub fn new(
        roster: Vec<PlayerSpec>,
        map_type: MapType,
        seed: u64,
        params: GameParams,
    ) -> Result<Self, GameError> {
        if !(2..=4).contains(&roster.len()) {
            return Err(GameError::InvalidTarget(format!(
                "roster needs 2 to 4 players, got {}",
                roster.len()
            )));
        }
        let mut seen = HashSet::new();
        for spec in &roster {
            if !seen.insert(spec.id.clone()) {
                return Err(GameError::InvalidTarget(format!(
                    "duplicate player id: {}",
                    spec.id
                )));
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let board = BoardGraph::generate(map_type, &mut rng);
        let bank = Bank::standard(&mut rng);
        let robber_tile = board.desert_tile().unwrap_or(0);
        let player_count = roster.len();
        let setup_order: Vec<usize> = (0..player_count).chain((0..player_count).rev()).collect();

        let mut state = Self {
            id: Uuid::new_v4(),
            board,
            players: roster.into_iter().map(PlayerState::new).collect(),
            bank,
            round: RoundState::new(),
            trades: TradeBook::new(),
            params,
            rng,
            robber_tile,
            building_by_vertex: HashMap::new(),
            road_by_edge: HashMap::new(),
            longest_road_lengths: vec![0; player_count],
            setup_order,
            setup_cursor: 0,
            pending_setup_vertex: None,
            log: Vec::new(),
        };
        state.push_log(format!("match started with {player_count} players"));
        Ok(state)
    }

    // ---- shared plumbing ----------------------------------------------

    pub(crate) fn player_index(&self, id: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|player| player.id == id)
            .ok_or_else(|| GameError::UnknownPlayer(id.to_string()))
    }

    pub(crate) fn ensure_current(&self, index: usize) -> Result<(), GameError> {
        if index == self.round.current_player {
            Ok(())
        } else {
            Err(GameError::NotYourTurn(self.players[index].id.clone()))
        }
    }

    pub(crate) fn push_log(&mut self, message: String) {
        let sequence = self.log.len() as u64 + 1;
        debug!(sequence, %message, "state log");
        self.log.push(StateLogEntry { sequence, message });
    }

    fn in_setup(&self) -> bool {
        matches!(
            self.round.round_type,
            RoundType::SetupSettlement1
                | RoundType::SetupRoad1
                | RoundType::SetupSettlement2
                | RoundType::SetupRoad2
        )
    }

    /// Vertices where some other player has a building, which sever
    /// road connectivity and walks for `index`.
    fn blocked_vertices_for(&self, index: usize) -> HashSet<VertexId> {
        self.building_by_vertex
            .iter()
            .filter(|(_, (owner, _))| *owner != index)
            .map(|(&vertex, _)| vertex)
            .collect()
    }

    // ---- building placement -------------------------------------------

    pub fn build_settlement(&mut self, player: &str, vertex: VertexId) -> Result<(), GameError> {
        self.round.ensure(&[
            RoundType::SetupSettlement1,
            RoundType::SetupSettlement2,
            RoundType::Regular,
        ])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;
        self.validate_settlement_spot(index, vertex, self.in_setup())?;

        let setup = self.in_setup();
        if !setup {
            if self.players[index].settlements.len() as u8 >= self.params.max_settlements {
                return Err(GameError::IllegalPlacement(
                    "settlement limit reached".to_string(),
                ));
            }
            if !self.players[index].hand.can_afford(&SETTLEMENT_COST) {
                return Err(GameError::InsufficientResources(format!(
                    "a settlement costs {SETTLEMENT_COST}"
                )));
            }
            self.players[index].hand.subtract_bundle(&SETTLEMENT_COST);
            self.bank.deposit(&SETTLEMENT_COST);
        }

        self.players[index].settlements.push(vertex);
        self.building_by_vertex
            .insert(vertex, (index, BuildingKind::Settlement));
        if let Some(port) = self.board.port_at(vertex) {
            self.players[index].add_port(port);
        }
        self.push_log(format!("{player} built a settlement at vertex {vertex}"));

        if setup {
            self.pending_setup_vertex = Some(vertex);
            if self.round.round_type == RoundType::SetupSettlement2 {
                self.grant_initial_resources(index, vertex);
            }
            self.round.round_type = if self.round.round_type == RoundType::SetupSettlement1 {
                RoundType::SetupRoad1
            } else {
                RoundType::SetupRoad2
            };
        } else {
            // A new settlement can sever an opponent's road network.
            self.recompute_longest_road();
            self.check_victory();
        }
        Ok(())
    }

    pub fn build_city(&mut self, player: &str, vertex: VertexId) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::Regular])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;

        if !self.players[index].settlements.contains(&vertex) {
            return Err(GameError::IllegalPlacement(format!(
                "no own settlement at vertex {vertex} to upgrade"
            )));
        }
        if self.players[index].cities.len() as u8 >= self.params.max_cities {
            return Err(GameError::IllegalPlacement("city limit reached".to_string()));
        }
        if !self.players[index].hand.can_afford(&CITY_COST) {
            return Err(GameError::InsufficientResources(format!(
                "a city costs {CITY_COST}"
            )));
        }
        self.players[index].hand.subtract_bundle(&CITY_COST);
        self.bank.deposit(&CITY_COST);
        self.players[index].settlements.retain(|&v| v != vertex);
        self.players[index].cities.push(vertex);
        self.building_by_vertex
            .insert(vertex, (index, BuildingKind::City));
        self.push_log(format!("{player} upgraded vertex {vertex} to a city"));
        self.check_victory();
        Ok(())
    }

    pub fn build_road(&mut self, player: &str, edge: EdgeId) -> Result<(), GameError> {
        self.round.ensure(&[
            RoundType::SetupRoad1,
            RoundType::SetupRoad2,
            RoundType::Regular,
        ])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;

        let setup = self.in_setup();
        let anchor = if setup { self.pending_setup_vertex } else { None };
        self.validate_road_spot(index, edge, anchor)?;

        if !setup {
            if !self.players[index].hand.can_afford(&ROAD_COST) {
                return Err(GameError::InsufficientResources(format!(
                    "a road costs {ROAD_COST}"
                )));
            }
            self.players[index].hand.subtract_bundle(&ROAD_COST);
            self.bank.deposit(&ROAD_COST);
        }

        self.place_road(index, edge);

        if setup {
            self.pending_setup_vertex = None;
            self.advance_setup();
        } else {
            self.check_victory();
        }
        Ok(())
    }

    fn validate_settlement_spot(
        &self,
        index: usize,
        vertex: VertexId,
        setup: bool,
    ) -> Result<(), GameError> {
        if !self.board.contains_vertex(vertex) {
            return Err(GameError::IllegalPlacement(format!(
                "vertex {vertex} is not on the board"
            )));
        }
        if self.building_by_vertex.contains_key(&vertex) {
            return Err(GameError::IllegalPlacement(format!(
                "vertex {vertex} is occupied"
            )));
        }
        if self
            .board
            .neighbors(vertex)
            .iter()
            .any(|neighbor| self.building_by_vertex.contains_key(neighbor))
        {
            return Err(GameError::IllegalPlacement(format!(
                "vertex {vertex} is adjacent to another building"
            )));
        }
        if !setup {
            let touches_own_road = self.players[index]
                .roads
                .iter()
                .any(|&road| edge_contains_vertex(road, vertex));
            if !touches_own_road {
                return Err(GameError::IllegalPlacement(format!(
                    "vertex {vertex} is not connected to an own road"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn validate_road_spot(
        &self,
        index: usize,
        edge: EdgeId,
        anchor: Option<VertexId>,
    ) -> Result<(), GameError> {
        let edge = normalize_edge(edge);
        if !self.board.contains_edge(edge) {
            return Err(GameError::IllegalPlacement(format!(
                "edge {edge:?} is not on the board"
            )));
        }
        if self.road_by_edge.contains_key(&edge) {
            return Err(GameError::IllegalPlacement(format!(
                "edge {edge:?} is occupied"
            )));
        }
        if self.players[index].roads.len() as u8 >= self.params.max_roads {
            return Err(GameError::IllegalPlacement("road limit reached".to_string()));
        }
        if let Some(anchor) = anchor {
            if !edge_contains_vertex(edge, anchor) {
                return Err(GameError::IllegalPlacement(format!(
                    "setup road must touch the settlement at vertex {anchor}"
                )));
            }
            return Ok(());
        }
        if !self.road_connects(index, edge) {
            return Err(GameError::IllegalPlacement(format!(
                "edge {edge:?} does not connect to own road or building"
            )));
        }
        Ok(())
    }

    /// A road connects at an endpoint with an own building, or with an
    /// own road through a junction no opponent has built on.
    fn road_connects(&self, index: usize, edge: EdgeId) -> bool {
        [edge.0, edge.1].into_iter().any(|vertex| {
            match self.building_by_vertex.get(&vertex) {
                Some((owner, _)) => *owner == index,
                None => self.players[index]
                    .roads
                    .iter()
                    .any(|&road| edge_contains_vertex(road, vertex)),
            }
        })
    }

    /// Unconditionally occupy `edge` for `index` and refresh road-derived
    /// state. Callers have validated and paid.
    pub(crate) fn place_road(&mut self, index: usize, edge: EdgeId) {
        let edge = normalize_edge(edge);
        self.players[index].roads.push(edge);
        self.road_by_edge.insert(edge, index);
        let id = self.players[index].id.clone();
        self.push_log(format!("{id} built a road at edge {edge:?}"));
        self.recompute_longest_road();
    }

    pub(crate) fn has_road_spot(&self, index: usize) -> bool {
        if self.players[index].roads.len() as u8 >= self.params.max_roads {
            return false;
        }
        self.board
            .edges()
            .iter()
            .any(|&edge| self.validate_road_spot(index, edge, None).is_ok())
    }

    fn advance_setup(&mut self) {
        self.setup_cursor += 1;
        let player_count = self.players.len();
        if self.setup_cursor == self.setup_order.len() {
            self.round.round_type = RoundType::FirstRound;
            self.round.current_player = 0;
            self.round.round_number = 0;
            self.push_log("setup complete".to_string());
            return;
        }
        self.round.current_player = self.setup_order[self.setup_cursor];
        self.round.round_type = if self.setup_cursor < player_count {
            RoundType::SetupSettlement1
        } else {
            RoundType::SetupSettlement2
        };
    }

    /// One resource per producing tile around the second settlement.
    fn grant_initial_resources(&mut self, index: usize, vertex: VertexId) {
        let mut grant = ResourceBundle::new();
        for &tile_id in self.board.tiles_at(vertex) {
            if let Some(resource) = self.board.tiles[tile_id as usize].resource {
                if self.bank.has(resource, grant.get(resource) + 1) {
                    grant.add(resource, 1);
                }
            }
        }
        if grant.is_empty() {
            return;
        }
        self.bank.withdraw(&grant);
        self.players[index].hand.add_bundle(&grant);
        let id = self.players[index].id.clone();
        self.push_log(format!("{id} received {grant} for their second settlement"));
    }

    // ---- dice, production, turn hand-off ------------------------------

    pub fn roll_dice(&mut self, player: &str) -> Result<(u8, u8), GameError> {
        self.round
            .ensure(&[RoundType::FirstRound, RoundType::BetweenTurns])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;

        let dice = (self.rng.gen_range(1..=6), self.rng.gen_range(1..=6));
        let total = dice.0 + dice.1;
        self.round.dice = Some(dice);
        self.push_log(format!("{player} rolled a {total} ({} + {})", dice.0, dice.1));

        if self.round.round_type == RoundType::FirstRound {
            // The opening roll of each player's first turn has no
            // production or robber effect.
            self.round.round_type = RoundType::Regular;
            return Ok(dice);
        }

        self.round.round_type = RoundType::Regular;
        if total == 7 {
            let mut any_discard = false;
            for player_state in &mut self.players {
                if player_state.hand.total() > self.params.hand_cap {
                    player_state.discard_due = (player_state.hand.total() / 2) as u8;
                    any_discard = true;
                }
            }
            if any_discard {
                self.round.suspend(RoundType::DiscardPhase);
            } else {
                self.round.suspend(RoundType::MoveRobberDue7);
            }
        } else {
            self.distribute_production(total);
        }
        Ok(dice)
    }

    fn distribute_production(&mut self, total: u8) {
        let mut grants: Vec<ResourceBundle> = vec![ResourceBundle::new(); self.players.len()];
        for tile in &self.board.tiles {
            if tile.token != Some(total) || tile.id == self.robber_tile {
                continue;
            }
            let Some(resource) = tile.resource else {
                continue;
            };
            for &vertex in &tile.vertices {
                if let Some(&(owner, kind)) = self.building_by_vertex.get(&vertex) {
                    let amount = match kind {
                        BuildingKind::Settlement => 1,
                        BuildingKind::City => 2,
                    };
                    grants[owner].add(resource, amount);
                }
            }
        }

        // A kind whose total demand exceeds the remaining supply is
        // skipped entirely for this roll.
        for resource in Resource::ALL {
            let demand: u32 = grants.iter().map(|grant| grant.get(resource) as u32).sum();
            if demand > self.bank.supply().get(resource) as u32 {
                for grant in &mut grants {
                    let held = grant.get(resource);
                    grant.remove(resource, held);
                }
            }
        }

        for index in 0..self.players.len() {
            let grant = grants[index];
            if grant.is_empty() {
                continue;
            }
            self.bank.withdraw(&grant);
            self.players[index].hand.add_bundle(&grant);
            let id = self.players[index].id.clone();
            self.push_log(format!("{id} received {grant}"));
        }
    }

    pub fn end_round(&mut self, player: &str) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::Regular])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;

        self.trades.cancel_all_open();
        self.players[index].reset_round_counters();
        self.round.dice = None;
        self.round.round_number += 1;
        self.round.current_player = (index + 1) % self.players.len();
        self.round.round_type = if self.round.round_number < self.players.len() as u32 {
            RoundType::FirstRound
        } else {
            RoundType::BetweenTurns
        };
        let next = self.players[self.round.current_player].id.clone();
        self.push_log(format!("{player} ended their turn; {next} is up"));
        Ok(())
    }

    // ---- discard phase ------------------------------------------------

    pub fn discard_player_cards(
        &mut self,
        player: &str,
        discarded: ResourceBundle,
    ) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::DiscardPhase])?;
        let index = self.player_index(player)?;
        let due = self.players[index].discard_due;
        if due == 0 {
            return Err(GameError::InvalidTarget(format!(
                "{player} has nothing to discard"
            )));
        }
        if discarded.total() != due as u32 {
            return Err(GameError::InvalidTarget(format!(
                "{player} must discard exactly {due} cards, got {}",
                discarded.total()
            )));
        }
        if !self.players[index].hand.can_afford(&discarded) {
            return Err(GameError::InsufficientResources(format!(
                "{player} does not hold {discarded}"
            )));
        }

        self.players[index].hand.subtract_bundle(&discarded);
        self.bank.deposit(&discarded);
        self.players[index].discard_due = 0;
        self.push_log(format!("{player} discarded {discarded}"));

        if self.players.iter().all(|p| p.discard_due == 0) {
            self.round.continue_interrupt(RoundType::MoveRobberDue7);
        }
        Ok(())
    }

    // ---- robber -------------------------------------------------------

    pub fn move_robber(&mut self, player: &str, tile: TileId) -> Result<(), GameError> {
        self.round
            .ensure(&[RoundType::MoveRobberDue7, RoundType::MoveRobberDueKnight])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;
        if self.board.tile(tile).is_none() {
            return Err(GameError::InvalidTarget(format!("no tile {tile} on the board")));
        }
        if tile == self.robber_tile {
            return Err(GameError::InvalidTarget(
                "the robber must move to a different tile".to_string(),
            ));
        }

        self.robber_tile = tile;
        self.push_log(format!("{player} moved the robber to tile {tile}"));

        let victims = self.robbable_indices(index);
        match victims.as_slice() {
            [] => self.round.resume(),
            [victim] => {
                let victim = *victim;
                self.steal_card(index, victim);
                self.round.resume();
            }
            _ => self.round.continue_interrupt(RoundType::PickRobbed),
        }
        Ok(())
    }

    pub fn rob_player(&mut self, player: &str, target: &str) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::PickRobbed])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;
        let victim = self.player_index(target)?;
        if !self.robbable_indices(index).contains(&victim) {
            return Err(GameError::InvalidTarget(format!(
                "{target} cannot be robbed from the current robber tile"
            )));
        }
        self.steal_card(index, victim);
        self.round.resume();
        Ok(())
    }

    fn robbable_indices(&self, thief: usize) -> Vec<usize> {
        let Some(tile) = self.board.tile(self.robber_tile) else {
            return Vec::new();
        };
        let mut victims: Vec<usize> = tile
            .vertices
            .iter()
            .filter_map(|vertex| self.building_by_vertex.get(vertex))
            .map(|&(owner, _)| owner)
            .filter(|&owner| owner != thief && self.players[owner].hand.total() > 0)
            .collect();
        victims.sort_unstable();
        victims.dedup();
        victims
    }

    /// Draw one card from the victim's hand, flattened in fixed
    /// resource order so a seed replays to the same card.
    fn steal_card(&mut self, thief: usize, victim: usize) {
        let total = self.players[victim].hand.total();
        debug_assert!(total > 0);
        let mut pick = self.rng.gen_range(0..total);
        for resource in Resource::ALL {
            let held = self.players[victim].hand.get(resource) as u32;
            if pick < held {
                self.players[victim].hand.remove(resource, 1);
                self.players[thief].hand.add(resource, 1);
                break;
            }
            pick -= held;
        }
        let thief_id = self.players[thief].id.clone();
        let victim_id = self.players[victim].id.clone();
        self.push_log(format!("{thief_id} stole a card from {victim_id}"));
    }

    // ---- derived values and victory -----------------------------------

    pub(crate) fn recompute_longest_road(&mut self) {
        for index in 0..self.players.len() {
            let blocked = self.blocked_vertices_for(index);
            self.longest_road_lengths[index] =
                longest_road_length(&self.board, &self.players[index].roads, &blocked);
        }

        let minimum = self.params.longest_road_minimum;
        let incumbent = self.players.iter().position(|p| p.has_longest_road);
        let best = self.longest_road_lengths.iter().copied().max().unwrap_or(0);
        let leaders: Vec<usize> = self
            .longest_road_lengths
            .iter()
            .enumerate()
            .filter(|&(_, &length)| length == best)
            .map(|(index, _)| index)
            .collect();

        match incumbent {
            Some(holder) if self.longest_road_lengths[holder] < minimum => {
                // Severed below the minimum: the title lapses with no
                // immediate successor.
                self.players[holder].has_longest_road = false;
                let id = self.players[holder].id.clone();
                self.push_log(format!("{id} lost the longest road"));
            }
            Some(holder) => {
                if best > self.longest_road_lengths[holder]
                    && best >= minimum
                    && leaders.len() == 1
                    && leaders[0] != holder
                {
                    self.players[holder].has_longest_road = false;
                    self.players[leaders[0]].has_longest_road = true;
                    let id = self.players[leaders[0]].id.clone();
                    self.push_log(format!("{id} took the longest road ({best} segments)"));
                }
            }
            None => {
                if best >= minimum && leaders.len() == 1 {
                    self.players[leaders[0]].has_longest_road = true;
                    let id = self.players[leaders[0]].id.clone();
                    self.push_log(format!("{id} took the longest road ({best} segments)"));
                }
            }
        }
    }

    pub(crate) fn update_largest_army(&mut self, actor: usize) {
        let knights = self.players[actor].knights_played;
        match self.players.iter().position(|p| p.has_largest_army) {
            None => {
                if knights >= self.params.largest_army_minimum {
                    self.players[actor].has_largest_army = true;
                    let id = self.players[actor].id.clone();
                    self.push_log(format!("{id} took the largest army ({knights} knights)"));
                }
            }
            Some(holder) if holder != actor => {
                if knights > self.players[holder].knights_played {
                    self.players[holder].has_largest_army = false;
                    self.players[actor].has_largest_army = true;
                    let id = self.players[actor].id.clone();
                    self.push_log(format!("{id} took the largest army ({knights} knights)"));
                }
            }
            Some(_) => {}
        }
    }

    fn points_of(&self, index: usize, public: bool) -> u8 {
        let player = &self.players[index];
        let mut points = player.settlements.len() as u8 * self.params.points_per_settlement
            + player.cities.len() as u8 * self.params.points_per_city;
        if player.has_longest_road {
            points += self.params.points_for_longest_road;
        }
        if player.has_largest_army {
            points += self.params.points_for_largest_army;
        }
        if !public {
            points += player.victory_point_cards();
        }
        points
    }

    /// Ends the game when the acting player has reached the target.
    /// Only the current-turn player can trigger it.
    pub(crate) fn check_victory(&mut self) {
        let index = self.round.current_player;
        if self.points_of(index, false) >= self.params.target_points {
            self.round.round_type = RoundType::GameOver;
            let id = self.players[index].id.clone();
            self.push_log(format!("{id} won the match"));
        }
    }

    // ---- read-only queries --------------------------------------------

    pub fn board(&self) -> &BoardGraph {
        &self.board
    }

    pub fn params(&self) -> &GameParams {
        &self.params
    }

    pub fn round_type(&self) -> RoundType {
        self.round.round_type
    }

    pub fn current_player(&self) -> &str {
        &self.players[self.round.current_player].id
    }

    pub fn round_number(&self) -> u32 {
        self.round.round_number
    }

    pub fn dice(&self) -> Option<(u8, u8)> {
        self.round.dice
    }

    pub fn robber_tile(&self) -> TileId {
        self.robber_tile
    }

    /// Remaining bank supply, for UIs and conservation checks.
    pub fn bank_supply(&self) -> ResourceBundle {
        *self.bank.supply()
    }

    pub fn development_cards_remaining(&self) -> usize {
        self.bank.development_cards_remaining()
    }

    pub fn hand(&self, player: &str) -> Result<ResourceBundle, GameError> {
        Ok(self.players[self.player_index(player)?].hand)
    }

    pub fn development_hand(
        &self,
        player: &str,
    ) -> Result<HashMap<DevelopmentCard, u8>, GameError> {
        Ok(self.players[self.player_index(player)?].development_summary())
    }

    pub fn settlements(&self, player: &str) -> Result<Vec<VertexId>, GameError> {
        Ok(self.players[self.player_index(player)?].settlements.clone())
    }

    pub fn cities(&self, player: &str) -> Result<Vec<VertexId>, GameError> {
        Ok(self.players[self.player_index(player)?].cities.clone())
    }

    pub fn roads(&self, player: &str) -> Result<Vec<EdgeId>, GameError> {
        Ok(self.players[self.player_index(player)?].roads.clone())
    }

    pub fn ports(&self, player: &str) -> Result<Vec<crate::types::PortKind>, GameError> {
        Ok(self.players[self.player_index(player)?].ports().to_vec())
    }

    pub fn knights_played(&self, player: &str) -> Result<u8, GameError> {
        Ok(self.players[self.player_index(player)?].knights_played)
    }

    pub fn longest_road_of(&self, player: &str) -> Result<u8, GameError> {
        Ok(self.longest_road_lengths[self.player_index(player)?])
    }

    /// Points visible to everyone (hidden victory cards excluded).
    pub fn public_points(&self, player: &str) -> Result<u8, GameError> {
        Ok(self.points_of(self.player_index(player)?, true))
    }

    pub fn total_points(&self, player: &str) -> Result<u8, GameError> {
        Ok(self.points_of(self.player_index(player)?, false))
    }

    pub fn building_at(&self, vertex: VertexId) -> Option<(&str, BuildingKind)> {
        self.building_by_vertex
            .get(&vertex)
            .map(|&(owner, kind)| (self.players[owner].id.as_str(), kind))
    }

    pub fn road_at(&self, edge: EdgeId) -> Option<&str> {
        self.road_by_edge
            .get(&normalize_edge(edge))
            .map(|&owner| self.players[owner].id.as_str())
    }

    pub fn discard_amounts(&self) -> HashMap<String, u8> {
        self.players
            .iter()
            .filter(|player| player.discard_due > 0)
            .map(|player| (player.id.clone(), player.discard_due))
            .collect()
    }

    pub fn robbable_players(&self, player: &str) -> Result<Vec<String>, GameError> {
        let index = self.player_index(player)?;
        Ok(self
            .robbable_indices(index)
            .into_iter()
            .map(|victim| self.players[victim].id.clone())
            .collect())
    }

    pub fn available_settlement_spots(&self, player: &str) -> Result<Vec<VertexId>, GameError> {
        let index = self.player_index(player)?;
        let setup = self.in_setup();
        let mut spots: Vec<VertexId> = self
            .board
            .vertices()
            .filter(|&vertex| self.validate_settlement_spot(index, vertex, setup).is_ok())
            .collect();
        spots.sort_unstable();
        Ok(spots)
    }

    pub fn available_road_spots(&self, player: &str) -> Result<Vec<EdgeId>, GameError> {
        let index = self.player_index(player)?;
        let anchor = if self.in_setup() { self.pending_setup_vertex } else { None };
        Ok(self
            .board
            .edges()
            .iter()
            .copied()
            .filter(|&edge| self.validate_road_spot(index, edge, anchor).is_ok())
            .collect())
    }

    pub fn available_city_spots(&self, player: &str) -> Result<Vec<VertexId>, GameError> {
        self.settlements(player)
    }

    pub fn log(&self) -> &[StateLogEntry] {
        &self.log
    }

    pub fn is_game_over(&self) -> bool {
        self.round.is_game_over()
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.players.iter().map(|player| player.id.clone()).collect()
    }
}
