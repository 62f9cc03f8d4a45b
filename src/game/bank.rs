use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::resources::ResourceBundle;
use crate::types::{DevelopmentCard, Resource};

/// Per-kind resource supply at construction.
pub const SUPPLY_PER_KIND: u8 = 19;

const DECK_COMPOSITION: [(DevelopmentCard, usize); 5] = [
    (DevelopmentCard::Knight, 14),
    (DevelopmentCard::VictoryPoint, 5),
    (DevelopmentCard::RoadBuilding, 2),
    (DevelopmentCard::YearOfPlenty, 2),
    (DevelopmentCard::Monopoly, 2),
];

/// The shared pool: resource supply plus the face-down development
/// deck. The deck is shuffled once at construction and never reshuffled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    supply: ResourceBundle,
    development_deck: Vec<DevelopmentCard>,
}

impl Bank {
    pub fn standard(rng: &mut impl rand::Rng) -> Self {
        let mut deck: Vec<DevelopmentCard> = DECK_COMPOSITION
            .iter()
            .flat_map(|&(card, count)| std::iter::repeat(card).take(count))
            .collect();
        deck.shuffle(rng);
        Self {
            supply: ResourceBundle::uniform(SUPPLY_PER_KIND),
            development_deck: deck,
        }
    }

    pub fn supply(&self) -> &ResourceBundle {
        &self.supply
    }

    pub fn has(&self, resource: Resource, count: u8) -> bool {
        self.supply.get(resource) >= count
    }

    pub fn covers(&self, bundle: &ResourceBundle) -> bool {
        self.supply.can_afford(bundle)
    }

    /// Move `bundle` out of the supply. Callers validate coverage first.
    pub fn withdraw(&mut self, bundle: &ResourceBundle) {
        self.supply.subtract_bundle(bundle);
    }

    pub fn deposit(&mut self, bundle: &ResourceBundle) {
        self.supply.add_bundle(bundle);
    }

    pub fn draw_development_card(&mut self) -> Option<DevelopmentCard> {
        self.development_deck.pop()
    }

    pub fn development_cards_remaining(&self) -> usize {
        self.development_deck.len()
    }
}
