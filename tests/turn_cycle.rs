mod common;

use settlers_core::{GameError, RoundType};

#[test]
fn dice_can_only_be_rolled_once_per_turn() {
    let mut game = common::new_game(211, 2);
    common::run_setup(&mut game);

    game.roll_dice("alice").unwrap();
    let err = game.roll_dice("alice").unwrap_err();
    assert!(matches!(err, GameError::WrongPhase(_)));
}

#[test]
fn the_turn_cannot_end_before_the_roll() {
    let mut game = common::new_game(223, 2);
    common::run_setup(&mut game);
    assert_eq!(game.round_type(), RoundType::FirstRound);
    let err = game.end_round("alice").unwrap_err();
    assert!(matches!(err, GameError::WrongPhase(_)));
}

#[test]
fn only_the_current_player_rolls_and_ends() {
    let mut game = common::new_game(227, 2);
    common::run_setup(&mut game);

    assert_eq!(
        game.roll_dice("bob").unwrap_err(),
        GameError::NotYourTurn("bob".to_string())
    );
    game.roll_dice("alice").unwrap();
    assert_eq!(
        game.end_round("bob").unwrap_err(),
        GameError::NotYourTurn("bob".to_string())
    );
}

#[test]
fn turns_rotate_through_the_roster() {
    let mut game = common::new_game(229, 3);
    common::run_setup(&mut game);
    common::play_turns(&mut game, 10);

    assert_eq!(game.round_number(), 10);
    assert_eq!(game.current_player(), common::IDS[10 % 3]);
    // Dice are cleared by the turn hand-off.
    assert!(game.dice().is_none());
}

#[test]
fn the_log_sequence_is_strictly_increasing() {
    let mut game = common::new_game(233, 2);
    common::run_setup(&mut game);
    common::play_turns(&mut game, 15);

    let log = game.log();
    assert!(!log.is_empty());
    for window in log.windows(2) {
        assert_eq!(window[1].sequence, window[0].sequence + 1);
    }
}

#[test]
fn production_moves_resources_out_of_the_bank() {
    let mut game = common::new_game(239, 3);
    common::run_setup(&mut game);
    common::play_turns(&mut game, 25);

    let held: u32 = game
        .player_ids()
        .iter()
        .map(|id| game.hand(id).unwrap().total())
        .sum();
    assert_eq!(game.bank_supply().total() + held, 5 * 19);
}
