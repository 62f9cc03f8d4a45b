use crate::board::EdgeId;
use crate::game::GameError;
use crate::game::resources::{DEVELOPMENT_CARD_COST, ResourceBundle};
use crate::game::state::GameState;
use crate::types::{DevelopmentCard, Resource, RoundType};

impl GameState {
    pub fn buy_development_card(&mut self, player: &str) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::Regular])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;
        if self.players[index].dev_cards_bought_this_round >= self.params.max_dev_cards_per_round {
            return Err(GameError::CardNotPlayable(format!(
                "{player} already bought {} development card(s) this round",
                self.players[index].dev_cards_bought_this_round
            )));
        }
        if self.bank.development_cards_remaining() == 0 {
            return Err(GameError::CardNotPlayable(
                "the development deck is empty".to_string(),
            ));
        }
        if !self.players[index].hand.can_afford(&DEVELOPMENT_CARD_COST) {
            return Err(GameError::InsufficientResources(format!(
                "a development card costs {DEVELOPMENT_CARD_COST}"
            )));
        }

        self.players[index].hand.subtract_bundle(&DEVELOPMENT_CARD_COST);
        self.bank.deposit(&DEVELOPMENT_CARD_COST);
        let card = self
            .bank
            .draw_development_card()
            .ok_or_else(|| GameError::CardNotPlayable("the development deck is empty".to_string()))?;
        let round = self.round.round_number;
        self.players[index].add_development_card(card, round);
        self.players[index].dev_cards_bought_this_round += 1;
        self.push_log(format!("{player} bought a development card"));
        // A drawn victory point counts towards the total immediately.
        self.check_victory();
        Ok(())
    }

    pub fn use_development_card(
        &mut self,
        player: &str,
        kind: DevelopmentCard,
    ) -> Result<(), GameError> {
        let allowed: &[RoundType] = match kind {
            // A knight may pre-empt the dice roll.
            DevelopmentCard::Knight => &[
                RoundType::Regular,
                RoundType::BetweenTurns,
                RoundType::FirstRound,
            ],
            DevelopmentCard::VictoryPoint => {
                return Err(GameError::CardNotPlayable(
                    "victory point cards are never played".to_string(),
                ));
            }
            _ => &[RoundType::Regular],
        };
        self.round.ensure(allowed)?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;

        let round = self.round.round_number;
        if self.players[index].playable_count(kind, round) == 0 {
            return Err(GameError::CardNotPlayable(format!(
                "{player} holds no playable {kind}"
            )));
        }

        match kind {
            DevelopmentCard::Knight => {
                self.players[index].spend_development_card(kind, round);
                self.players[index].knights_played += 1;
                self.push_log(format!("{player} played a knight"));
                self.update_largest_army(index);
                self.round.suspend(RoundType::MoveRobberDueKnight);
                self.check_victory();
            }
            DevelopmentCard::RoadBuilding => {
                self.players[index].spend_development_card(kind, round);
                self.push_log(format!("{player} played road building"));
                if self.has_road_spot(index) {
                    self.round.suspend(RoundType::BuildRoad1Development);
                }
                // With no legal edge left the card resolves with no effect.
            }
            DevelopmentCard::YearOfPlenty => {
                self.players[index].spend_development_card(kind, round);
                self.push_log(format!("{player} played year of plenty"));
                self.round.suspend(RoundType::YearOfPlentyPickResources);
            }
            DevelopmentCard::Monopoly => {
                self.players[index].spend_development_card(kind, round);
                self.push_log(format!("{player} played monopoly"));
                self.round.suspend(RoundType::MonopolyPickResource);
            }
            DevelopmentCard::VictoryPoint => unreachable!("rejected above"),
        }
        Ok(())
    }

    /// Every other player hands over their whole holding of `resource`.
    pub fn pick_monopoly_resource(
        &mut self,
        player: &str,
        resource: Resource,
    ) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::MonopolyPickResource])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;

        let mut collected: u8 = 0;
        for other in 0..self.players.len() {
            if other == index {
                continue;
            }
            let held = self.players[other].hand.get(resource);
            if held > 0 {
                self.players[other].hand.remove(resource, held);
                collected += held;
            }
        }
        self.players[index].hand.add(resource, collected);
        self.push_log(format!(
            "{player} monopolized {resource} and collected {collected} card(s)"
        ));
        self.round.resume();
        Ok(())
    }

    /// Take two resources of choice from the bank (the same kind twice
    /// is allowed).
    pub fn pick_year_of_plenty_resources(
        &mut self,
        player: &str,
        first: Resource,
        second: Resource,
    ) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::YearOfPlentyPickResources])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;

        let picked = ResourceBundle::new().with(first, 1).with(second, 1);
        if !self.bank.covers(&picked) {
            return Err(GameError::InsufficientResources(format!(
                "the bank cannot cover {picked}"
            )));
        }
        self.bank.withdraw(&picked);
        self.players[index].hand.add_bundle(&picked);
        self.push_log(format!("{player} took {picked} from the bank"));
        self.round.resume();
        Ok(())
    }

    /// Place one of the two free roads granted by Road Building.
    pub fn pick_road_building_spot(&mut self, player: &str, edge: EdgeId) -> Result<(), GameError> {
        self.round.ensure(&[
            RoundType::BuildRoad1Development,
            RoundType::BuildRoad2Development,
        ])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;
        self.validate_road_spot(index, edge, None)?;

        let first = self.round.round_type == RoundType::BuildRoad1Development;
        self.place_road(index, edge);

        if first && self.has_road_spot(index) {
            self.round.continue_interrupt(RoundType::BuildRoad2Development);
        } else {
            self.round.resume();
        }
        self.check_victory();
        Ok(())
    }
}
