#![allow(dead_code)]

use settlers_core::{
    GameParams, GameState, MapType, PlayerColor, PlayerSpec, Resource, ResourceBundle, RoundType,
    TileId,
};

pub const IDS: [&str; 4] = ["alice", "bob", "carol", "dave"];

pub fn roster(count: usize) -> Vec<PlayerSpec> {
    IDS[..count]
        .iter()
        .map(|id| PlayerSpec {
            id: id.to_string(),
            color: PlayerColor {
                background: "#1565c0".to_string(),
                foreground: "#ffffff".to_string(),
            },
        })
        .collect()
}

pub fn new_game(seed: u64, count: usize) -> GameState {
    GameState::new(roster(count), MapType::Base, seed, GameParams::default()).unwrap()
}

/// Drive the whole setup phase by always taking the first legal spot.
pub fn run_setup(game: &mut GameState) {
    loop {
        let current = game.current_player().to_string();
        match game.round_type() {
            RoundType::SetupSettlement1 | RoundType::SetupSettlement2 => {
                let spot = game.available_settlement_spots(&current).unwrap()[0];
                game.build_settlement(&current, spot).unwrap();
            }
            RoundType::SetupRoad1 | RoundType::SetupRoad2 => {
                let spot = game.available_road_spots(&current).unwrap()[0];
                game.build_road(&current, spot).unwrap();
            }
            _ => break,
        }
    }
}

/// Greedily assemble a legal discard of `amount` cards from `hand`.
pub fn discard_bundle(hand: &ResourceBundle, amount: u8) -> ResourceBundle {
    let mut bundle = ResourceBundle::new();
    let mut left = amount;
    for resource in Resource::ALL {
        let take = hand.get(resource).min(left);
        bundle.add(resource, take);
        left -= take;
    }
    bundle
}

pub fn any_other_tile(game: &GameState) -> TileId {
    let robber = game.robber_tile();
    game.board()
        .tiles
        .iter()
        .map(|tile| tile.id)
        .find(|&tile| tile != robber)
        .expect("more than one tile")
}

/// Resolve exactly one pending engine step with a default legal action.
pub fn step(game: &mut GameState) {
    let current = game.current_player().to_string();
    match game.round_type() {
        RoundType::FirstRound | RoundType::BetweenTurns => {
            game.roll_dice(&current).unwrap();
        }
        RoundType::Regular => game.end_round(&current).unwrap(),
        RoundType::DiscardPhase => {
            for (id, due) in game.discard_amounts() {
                let bundle = discard_bundle(&game.hand(&id).unwrap(), due);
                game.discard_player_cards(&id, bundle).unwrap();
            }
        }
        RoundType::MoveRobberDue7 | RoundType::MoveRobberDueKnight => {
            let tile = any_other_tile(game);
            game.move_robber(&current, tile).unwrap();
        }
        RoundType::PickRobbed => {
            let victim = game.robbable_players(&current).unwrap()[0].clone();
            game.rob_player(&current, &victim).unwrap();
        }
        other => panic!("unexpected phase {other}"),
    }
}

/// Play `turns` full turns with default actions (roll, resolve any
/// interrupts, end the turn).
pub fn play_turns(game: &mut GameState, turns: u32) {
    let target = game.round_number() + turns;
    while game.round_number() < target && !game.is_game_over() {
        step(game);
    }
}
