use crate::game::GameError;
use crate::game::resources::ResourceBundle;
use crate::game::state::GameState;
use crate::game::trade::{Trade, TradeId};
use crate::types::{PortKind, Resource, RoundType};

const GENERAL_PORT_RATIO: u8 = 3;
const RESOURCE_PORT_RATIO: u8 = 2;

impl GameState {
    // ---- bank and port trades -----------------------------------------

    pub fn make_bank_trade(
        &mut self,
        player: &str,
        given: ResourceBundle,
        requested: ResourceBundle,
    ) -> Result<(), GameError> {
        let ratio = self.params.bank_trade_ratio;
        self.commodity_trade(player, given, requested, "the bank", move |_, _| Ok(ratio))
    }

    pub fn make_general_port_trade(
        &mut self,
        player: &str,
        given: ResourceBundle,
        requested: ResourceBundle,
    ) -> Result<(), GameError> {
        self.commodity_trade(player, given, requested, "a general port", |state, kind| {
            if !state.has_port(PortKind::General) {
                return Err(GameError::InvalidTarget(
                    "no general port owned".to_string(),
                ));
            }
            // The 2:1 port supersedes: its kind cannot go through the
            // general port.
            if state.has_port(PortKind::Resource(kind)) {
                return Err(GameError::InvalidResourceSet(format!(
                    "{kind} must be traded through its own port"
                )));
            }
            Ok(GENERAL_PORT_RATIO)
        })
    }

    pub fn make_resource_port_trade(
        &mut self,
        player: &str,
        given: ResourceBundle,
        requested: ResourceBundle,
    ) -> Result<(), GameError> {
        self.commodity_trade(player, given, requested, "a resource port", |state, kind| {
            if !state.has_port(PortKind::Resource(kind)) {
                return Err(GameError::InvalidTarget(format!("no {kind} port owned")));
            }
            Ok(RESOURCE_PORT_RATIO)
        })
    }

    /// Shared legality and exchange for the three fixed-ratio trades.
    /// `ratio_of` yields the ratio for each given kind, or rejects it.
    fn commodity_trade(
        &mut self,
        player: &str,
        given: ResourceBundle,
        requested: ResourceBundle,
        counterparty: &str,
        ratio_of: impl Fn(&crate::game::players::PlayerState, Resource) -> Result<u8, GameError>,
    ) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::Regular])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;
        validate_exchange_maps(&given, &requested)?;

        let mut earned: u32 = 0;
        for kind in given.kinds() {
            let ratio = ratio_of(&self.players[index], kind)? as u32;
            let count = given.get(kind) as u32;
            if count % ratio != 0 {
                return Err(GameError::InvalidResourceSet(format!(
                    "{count} {kind} is not a multiple of the {ratio}:1 ratio"
                )));
            }
            earned += count / ratio;
        }
        if earned != requested.total() {
            return Err(GameError::InvalidResourceSet(format!(
                "given resources convert to {earned}, but {} were requested",
                requested.total()
            )));
        }
        if !self.players[index].hand.can_afford(&given) {
            return Err(GameError::InsufficientResources(format!(
                "{player} does not hold {given}"
            )));
        }
        if !self.bank.covers(&requested) {
            return Err(GameError::InsufficientResources(format!(
                "the bank cannot cover {requested}"
            )));
        }

        self.players[index].hand.subtract_bundle(&given);
        self.bank.deposit(&given);
        self.bank.withdraw(&requested);
        self.players[index].hand.add_bundle(&requested);
        self.push_log(format!(
            "{player} traded {given} for {requested} with {counterparty}"
        ));
        Ok(())
    }

    // ---- player-to-player negotiation ---------------------------------

    pub fn make_trade_offer(
        &mut self,
        player: &str,
        given: ResourceBundle,
        requested: ResourceBundle,
        allowed_targets: Vec<String>,
    ) -> Result<TradeId, GameError> {
        self.round.ensure(&[RoundType::Regular])?;
        let index = self.player_index(player)?;
        self.ensure_current(index)?;
        validate_exchange_maps(&given, &requested)?;
        if !self.players[index].hand.can_afford(&given) {
            return Err(GameError::InsufficientResources(format!(
                "{player} does not hold {given}"
            )));
        }
        for target in &allowed_targets {
            self.player_index(target)?;
            if target == player {
                return Err(GameError::InvalidTarget(
                    "the initiator cannot target themselves".to_string(),
                ));
            }
        }

        let id = self
            .trades
            .open_root(player, given, requested, allowed_targets);
        self.push_log(format!(
            "{player} offered {given} for {requested} (trade {id})"
        ));
        Ok(id)
    }

    /// Counter maps stay in the root initiator's perspective: `given`
    /// is what the root initiator would pay, `requested` what the
    /// countering player would pay.
    pub fn make_counter_trade_offer(
        &mut self,
        player: &str,
        parent: TradeId,
        given: ResourceBundle,
        requested: ResourceBundle,
    ) -> Result<TradeId, GameError> {
        self.round.ensure(&[RoundType::Regular])?;
        self.player_index(player)?;
        validate_exchange_maps(&given, &requested)?;
        let parent_trade = self.trades.get(parent)?;
        if !parent_trade.is_open() {
            return Err(GameError::TradeAlreadyResolved(parent));
        }
        let root = self.trades.root_of(parent)?;
        if !self.trade_eligible(root, player) {
            return Err(GameError::NotEligibleResponder {
                player: player.to_string(),
                trade: parent,
            });
        }
        let index = self.player_index(player)?;
        if !self.players[index].hand.can_afford(&requested) {
            return Err(GameError::InsufficientResources(format!(
                "{player} does not hold {requested}"
            )));
        }

        let id = self.trades.open_counter(player, parent, given, requested);
        self.push_log(format!(
            "{player} countered trade {parent} with {given} for {requested} (trade {id})"
        ));
        Ok(id)
    }

    pub fn accept_trade_offer(&mut self, player: &str, trade: TradeId) -> Result<(), GameError> {
        if self.round.is_game_over() {
            return Err(GameError::WrongPhase(RoundType::GameOver));
        }
        let index = self.player_index(player)?;
        let node = self.trades.get(trade)?;
        if !node.is_open() {
            return Err(GameError::TradeAlreadyResolved(trade));
        }
        let requested = node.requested;
        let creator = node.creator.clone();
        let root = self.trades.root_of(trade)?;
        if creator == player || !self.trade_eligible(root, player) {
            return Err(GameError::NotEligibleResponder {
                player: player.to_string(),
                trade,
            });
        }
        if !self.players[index].hand.can_afford(&requested) {
            // A responder who cannot pay is recorded as a rejection.
            self.trades.get_mut(trade)?.record_rejection(player);
            self.push_log(format!(
                "{player} could not afford trade {trade} and was marked as rejecting"
            ));
            self.close_root_if_fully_rejected(trade)?;
            return Err(GameError::InsufficientResources(format!(
                "{player} does not hold {requested}"
            )));
        }

        self.trades.get_mut(trade)?.record_acceptance(player);
        self.push_log(format!("{player} accepted trade {trade}"));
        Ok(())
    }

    pub fn reject_trade_offer(&mut self, player: &str, trade: TradeId) -> Result<(), GameError> {
        if self.round.is_game_over() {
            return Err(GameError::WrongPhase(RoundType::GameOver));
        }
        self.player_index(player)?;
        let node = self.trades.get(trade)?;
        if !node.is_open() {
            return Err(GameError::TradeAlreadyResolved(trade));
        }
        let creator = node.creator.clone();
        let root = self.trades.root_of(trade)?;
        if creator == player || !self.trade_eligible(root, player) {
            return Err(GameError::NotEligibleResponder {
                player: player.to_string(),
                trade,
            });
        }

        self.trades.get_mut(trade)?.record_rejection(player);
        self.push_log(format!("{player} rejected trade {trade}"));
        self.close_root_if_fully_rejected(trade)?;
        Ok(())
    }

    /// A root offer every eligible responder has turned down is dead.
    /// No-op for counter nodes and already-resolved trades.
    fn close_root_if_fully_rejected(&mut self, trade: TradeId) -> Result<(), GameError> {
        let node = self.trades.get(trade)?;
        if node.parent.is_some() || !node.is_open() {
            return Ok(());
        }
        let all_rejected = self
            .eligible_responders(node)
            .iter()
            .all(|id| node.rejected_by.contains(id));
        if all_rejected {
            self.trades.close_tree(trade, None)?;
            self.push_log(format!("trade {trade} was rejected by every player"));
        }
        Ok(())
    }

    /// Only the root initiator may finalize, against any node of the
    /// tree and any player who accepted that node. The exchange is
    /// always between the root initiator and the accepter.
    pub fn finalize_trade(
        &mut self,
        player: &str,
        accepter: &str,
        trade: TradeId,
    ) -> Result<(), GameError> {
        self.round.ensure(&[RoundType::Regular])?;
        let initiator = self.player_index(player)?;
        self.ensure_current(initiator)?;
        let node = self.trades.get(trade)?;
        if !node.is_open() {
            return Err(GameError::TradeAlreadyResolved(trade));
        }
        let root = self.trades.root_of(trade)?;
        if root.creator != player {
            return Err(GameError::NotYourTurn(player.to_string()));
        }
        let node = self.trades.get(trade)?;
        if !node.has_accepted(accepter) {
            return Err(GameError::NotEligibleResponder {
                player: accepter.to_string(),
                trade,
            });
        }
        let given = node.given;
        let requested = node.requested;
        let accepter_index = self.player_index(accepter)?;

        // Hands may have changed since acceptance; re-validate both
        // sides before touching anything.
        if !self.players[initiator].hand.can_afford(&given) {
            return Err(GameError::InsufficientResources(format!(
                "{player} no longer holds {given}"
            )));
        }
        if !self.players[accepter_index].hand.can_afford(&requested) {
            return Err(GameError::InsufficientResources(format!(
                "{accepter} no longer holds {requested}"
            )));
        }

        self.players[initiator].hand.subtract_bundle(&given);
        self.players[accepter_index].hand.add_bundle(&given);
        self.players[accepter_index].hand.subtract_bundle(&requested);
        self.players[initiator].hand.add_bundle(&requested);
        self.trades.close_tree(trade, Some(trade))?;
        self.push_log(format!(
            "{player} traded {given} for {requested} with {accepter} (trade {trade})"
        ));
        Ok(())
    }

    pub fn cancel_trade_offer(&mut self, player: &str, trade: TradeId) -> Result<(), GameError> {
        if self.round.is_game_over() {
            return Err(GameError::WrongPhase(RoundType::GameOver));
        }
        self.player_index(player)?;
        let node = self.trades.get(trade)?;
        if !node.is_open() {
            return Err(GameError::TradeAlreadyResolved(trade));
        }
        let root = self.trades.root_of(trade)?;
        if root.creator != player {
            return Err(GameError::NotYourTurn(player.to_string()));
        }
        self.trades.close_tree(trade, None)?;
        self.push_log(format!("{player} cancelled trade {trade}"));
        Ok(())
    }

    // ---- queries ------------------------------------------------------

    pub fn active_trades(&self) -> Vec<Trade> {
        self.trades.active().cloned().collect()
    }

    pub fn all_trades(&self) -> &[Trade] {
        self.trades.all()
    }

    fn trade_eligible(&self, root: &Trade, player: &str) -> bool {
        if root.creator == player {
            return false;
        }
        root.allowed_targets.is_empty() || root.allowed_targets.iter().any(|id| id == player)
    }

    fn eligible_responders(&self, root: &Trade) -> Vec<String> {
        if root.allowed_targets.is_empty() {
            self.players
                .iter()
                .filter(|p| p.id != root.creator)
                .map(|p| p.id.clone())
                .collect()
        } else {
            root.allowed_targets.clone()
        }
    }
}

fn validate_exchange_maps(
    given: &ResourceBundle,
    requested: &ResourceBundle,
) -> Result<(), GameError> {
    if given.is_empty() || requested.is_empty() {
        return Err(GameError::InvalidResourceSet(
            "given and requested must both be non-empty".to_string(),
        ));
    }
    if given.overlaps(requested) {
        return Err(GameError::InvalidResourceSet(
            "given and requested share a resource kind".to_string(),
        ));
    }
    Ok(())
}
