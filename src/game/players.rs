use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{EdgeId, VertexId};
use crate::game::resources::ResourceBundle;
use crate::types::{DevelopmentCard, PlayerColor, PlayerSpec, PortKind};

/// A development card in a player's hand, tagged with the global round
/// number it was bought in. It becomes playable on any later round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedDevelopmentCard {
    pub kind: DevelopmentCard,
    pub round_bought: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: String,
    pub color: PlayerColor,
    pub hand: ResourceBundle,
    development: Vec<OwnedDevelopmentCard>,
    pub settlements: Vec<VertexId>,
    pub cities: Vec<VertexId>,
    pub roads: Vec<EdgeId>,
    ports: SmallVec<[PortKind; 4]>,
    pub knights_played: u8,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
    /// Cards still owed to the bank while a discard phase is pending.
    pub discard_due: u8,
    pub dev_cards_bought_this_round: u8,
}

impl PlayerState {
    pub fn new(spec: PlayerSpec) -> Self {
        Self {
            id: spec.id,
            color: spec.color,
            hand: ResourceBundle::new(),
            development: Vec::new(),
            settlements: Vec::new(),
            cities: Vec::new(),
            roads: Vec::new(),
            ports: SmallVec::new(),
            knights_played: 0,
            has_longest_road: false,
            has_largest_army: false,
            discard_due: 0,
            dev_cards_bought_this_round: 0,
        }
    }

    pub fn add_development_card(&mut self, kind: DevelopmentCard, round_bought: u32) {
        self.development
            .push(OwnedDevelopmentCard { kind, round_bought });
    }

    /// Copies of `kind` bought before `current_round`.
    pub fn playable_count(&self, kind: DevelopmentCard, current_round: u32) -> usize {
        self.development
            .iter()
            .filter(|card| card.kind == kind && card.round_bought < current_round)
            .count()
    }

    /// Remove the oldest playable copy of `kind`. Returns false without
    /// mutating when none is playable.
    pub fn spend_development_card(&mut self, kind: DevelopmentCard, current_round: u32) -> bool {
        let position = self
            .development
            .iter()
            .enumerate()
            .filter(|(_, card)| card.kind == kind && card.round_bought < current_round)
            .min_by_key(|(_, card)| card.round_bought)
            .map(|(index, _)| index);
        match position {
            Some(index) => {
                self.development.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn development_summary(&self) -> HashMap<DevelopmentCard, u8> {
        let mut summary = HashMap::new();
        for card in &self.development {
            *summary.entry(card.kind).or_insert(0) += 1;
        }
        summary
    }

    pub fn development_hand(&self) -> &[OwnedDevelopmentCard] {
        &self.development
    }

    pub fn victory_point_cards(&self) -> u8 {
        self.development
            .iter()
            .filter(|card| card.kind == DevelopmentCard::VictoryPoint)
            .count() as u8
    }

    pub fn has_port(&self, kind: PortKind) -> bool {
        self.ports.contains(&kind)
    }

    pub fn add_port(&mut self, kind: PortKind) {
        if !self.ports.contains(&kind) {
            self.ports.push(kind);
        }
    }

    pub fn ports(&self) -> &[PortKind] {
        &self.ports
    }

    pub fn reset_round_counters(&mut self) {
        self.dev_cards_bought_this_round = 0;
    }
}
