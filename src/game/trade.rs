use serde::{Deserialize, Serialize};
use strum::Display;

use crate::game::GameError;
use crate::game::resources::ResourceBundle;

pub type TradeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Open,
    Finalized,
    Cancelled,
}

/// One node of a trade tree. Counter-offers reference their parent, and
/// every node's maps are expressed from the root initiator's
/// perspective: `given` is what the root initiator pays, `requested`
/// is what the accepting responder pays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub parent: Option<TradeId>,
    /// Creator of this node: the root initiator for root offers, the
    /// countering responder for counter-offers.
    pub creator: String,
    pub given: ResourceBundle,
    pub requested: ResourceBundle,
    /// Root offers only; empty means every other player may respond.
    pub allowed_targets: Vec<String>,
    pub accepted_by: Vec<String>,
    pub rejected_by: Vec<String>,
    pub status: TradeStatus,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn record_acceptance(&mut self, player: &str) {
        self.rejected_by.retain(|id| id != player);
        if !self.accepted_by.iter().any(|id| id == player) {
            self.accepted_by.push(player.to_string());
        }
    }

    pub fn record_rejection(&mut self, player: &str) {
        self.accepted_by.retain(|id| id != player);
        if !self.rejected_by.iter().any(|id| id == player) {
            self.rejected_by.push(player.to_string());
        }
    }

    pub fn has_accepted(&self, player: &str) -> bool {
        self.accepted_by.iter().any(|id| id == player)
    }
}

/// Arena of all trades of a match, keyed by monotonically increasing
/// id. Resolved trades stay in the table for history queries; the
/// active set is the nodes still `Open`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeBook {
    trades: Vec<Trade>,
}

impl TradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_root(
        &mut self,
        creator: &str,
        given: ResourceBundle,
        requested: ResourceBundle,
        allowed_targets: Vec<String>,
    ) -> TradeId {
        self.push(None, creator, given, requested, allowed_targets)
    }

    pub fn open_counter(
        &mut self,
        creator: &str,
        parent: TradeId,
        given: ResourceBundle,
        requested: ResourceBundle,
    ) -> TradeId {
        let id = self.push(Some(parent), creator, given, requested, Vec::new());
        // A counter-offer implies its creator's own acceptance.
        self.trades[id as usize].record_acceptance(creator);
        id
    }

    fn push(
        &mut self,
        parent: Option<TradeId>,
        creator: &str,
        given: ResourceBundle,
        requested: ResourceBundle,
        allowed_targets: Vec<String>,
    ) -> TradeId {
        let id = self.trades.len() as TradeId;
        self.trades.push(Trade {
            id,
            parent,
            creator: creator.to_string(),
            given,
            requested,
            allowed_targets,
            accepted_by: Vec::new(),
            rejected_by: Vec::new(),
            status: TradeStatus::Open,
        });
        id
    }

    pub fn get(&self, id: TradeId) -> Result<&Trade, GameError> {
        self.trades
            .get(id as usize)
            .ok_or(GameError::UnknownTrade(id))
    }

    pub fn get_mut(&mut self, id: TradeId) -> Result<&mut Trade, GameError> {
        self.trades
            .get_mut(id as usize)
            .ok_or(GameError::UnknownTrade(id))
    }

    /// Walk parent links up to the root offer of `id`'s tree.
    pub fn root_of(&self, id: TradeId) -> Result<&Trade, GameError> {
        let mut node = self.get(id)?;
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
        }
        Ok(node)
    }

    /// Ids of every node in the tree rooted at `root` (the root included).
    pub fn tree_ids(&self, root: TradeId) -> Vec<TradeId> {
        let mut ids = vec![root];
        let mut cursor = 0;
        while cursor < ids.len() {
            let current = ids[cursor];
            cursor += 1;
            ids.extend(
                self.trades
                    .iter()
                    .filter(|trade| trade.parent == Some(current))
                    .map(|trade| trade.id),
            );
        }
        ids
    }

    /// Close every node of the tree containing `id`. The node picked
    /// for finalization is marked `Finalized`, the rest `Cancelled`.
    pub fn close_tree(&mut self, id: TradeId, finalized: Option<TradeId>) -> Result<(), GameError> {
        let root = self.root_of(id)?.id;
        for node_id in self.tree_ids(root) {
            let trade = &mut self.trades[node_id as usize];
            if trade.is_open() {
                trade.status = if Some(node_id) == finalized {
                    TradeStatus::Finalized
                } else {
                    TradeStatus::Cancelled
                };
            }
        }
        Ok(())
    }

    pub fn cancel_all_open(&mut self) {
        for trade in &mut self.trades {
            if trade.is_open() {
                trade.status = TradeStatus::Cancelled;
            }
        }
    }

    pub fn all(&self) -> &[Trade] {
        &self.trades
    }

    pub fn active(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|trade| trade.is_open())
    }
}
