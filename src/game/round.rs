use serde::{Deserialize, Serialize};

use crate::game::GameError;
use crate::types::RoundType;

/// Whose turn it is and which phase the turn is in. Interrupt phases
/// (robber moves, development-card picks, discards) park the phase they
/// interrupted in the single `suspended` slot and restore it when done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub round_type: RoundType,
    pub current_player: usize,
    /// Global turn counter. 0 during setup and for the first player's
    /// opening turn; incremented by every turn hand-off.
    pub round_number: u32,
    pub dice: Option<(u8, u8)>,
    suspended: Option<RoundType>,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            round_type: RoundType::SetupSettlement1,
            current_player: 0,
            round_number: 0,
            dice: None,
            suspended: None,
        }
    }

    pub fn ensure(&self, allowed: &[RoundType]) -> Result<(), GameError> {
        if allowed.contains(&self.round_type) {
            Ok(())
        } else {
            Err(GameError::WrongPhase(self.round_type))
        }
    }

    /// Enter an interrupt phase, remembering the phase to resume.
    pub fn suspend(&mut self, interrupt: RoundType) {
        debug_assert!(self.suspended.is_none(), "interrupt phases do not nest");
        self.suspended = Some(self.round_type);
        self.round_type = interrupt;
    }

    /// Swap to another interrupt phase without touching the parked one.
    pub fn continue_interrupt(&mut self, interrupt: RoundType) {
        debug_assert!(self.suspended.is_some());
        self.round_type = interrupt;
    }

    pub fn resume(&mut self) {
        self.round_type = self.suspended.take().unwrap_or(RoundType::Regular);
    }

    pub fn suspended(&self) -> Option<RoundType> {
        self.suspended
    }

    pub fn dice_total(&self) -> Option<u8> {
        self.dice.map(|(a, b)| a + b)
    }

    pub fn is_game_over(&self) -> bool {
        self.round_type == RoundType::GameOver
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}
