use bura_client::domain::cards_parsing::try_parse_cards;
use bura_client::domain::{ComboKind, SelectionError};
use bura_client::{evaluate_selection, ClientMsg, GameState, PlayMode, Suit, TableView};
use serde_json::json;

fn responder_snapshot() -> Result<GameState, serde_json::Error> {
    serde_json::from_value(json!({
        "room_id": "r1",
        "started": true,
        "me": {"id": "p1", "name": "Ann"},
        "players": [{"id": "p1", "name": "Ann"}, {"id": "p2", "name": "Bo"}],
        "trump": "♣",
        "hands": [
            {"id": "AD", "suit": "♦", "rank": 14},
            {"id": "8C", "suit": "♣", "rank": 8},
            {"id": "6H", "suit": "♥", "rank": 6}
        ],
        "turn_player_id": "p1",
        "round_id": "r_2",
        "trick": {
            "leader_id": "p2",
            "owner_id": "p2",
            "required_count": 2,
            "trick_index": 1,
            "plays": [{
                "player_id": "p2",
                "cards": [
                    {"cardId": "KD", "faceUp": true, "suit": "♦", "rank": 13},
                    {"cardId": "7D", "faceUp": true, "suit": "♦", "rank": 7}
                ],
                "owner": true
            }]
        },
        "some_future_field": {"ignored": true}
    }))
}

#[test]
fn responder_snapshot_yields_winning_pair() -> Result<(), Box<dyn std::error::Error>> {
    let view = TableView::from_snapshot(&responder_snapshot()?);
    assert!(view.my_turn);
    assert_eq!(view.trump, Some(Suit::Clubs));

    let pick = view.suggested_play(None).ok_or("no suggestion")?;
    assert_eq!(pick, try_parse_cards(["AD", "8C"])?);

    let mode = view.play_mode();
    assert_eq!(evaluate_selection(&view.hand, &[0, 1], &mode)?, pick);
    assert_eq!(
        evaluate_selection(&view.hand, &[0], &mode),
        Err(SelectionError::WrongCount {
            required: 2,
            selected: 1
        })
    );

    let msg = view.play_message(pick).ok_or("no player id")?;
    let v = serde_json::to_value(&msg)?;
    assert_eq!(v["type"], "play_cards");
    assert_eq!(v["roundId"], "r_2");
    assert_eq!(v["trickIndex"], 1);
    Ok(())
}

#[test]
fn leader_selection_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let hand = try_parse_cards(["6S", "9S", "QS", "AS", "AH"])?;
    let mode = PlayMode::Leader;

    assert_eq!(evaluate_selection(&hand, &[0, 1, 2, 3], &mode)?.len(), 4);
    assert_eq!(evaluate_selection(&hand, &[0, 1, 2], &mode)?.len(), 3);
    assert_eq!(
        evaluate_selection(&hand, &[0, 4], &mode),
        Err(SelectionError::MixedSuits)
    );
    Ok(())
}

fn waiting_snapshot(hand: serde_json::Value) -> Result<GameState, serde_json::Error> {
    serde_json::from_value(json!({
        "room_id": "r1",
        "started": true,
        "me": {"id": "p1", "name": "Ann"},
        "trump": "♠",
        "hands": hand,
        "turn_player_id": "p2",
        "round_id": "r_7",
        "trick_index": 0,
        "announcements": [{"player_id": "p1", "combo": "bura", "cards": []}],
        "config": {"enableFourEnds": false}
    }))
}

#[test]
fn waiting_player_sees_early_combos_and_declarations() -> Result<(), Box<dyn std::error::Error>> {
    let state = waiting_snapshot(json!([
        {"suit": "♠", "rank": 14},
        {"suit": "♠", "rank": 10},
        {"suit": "♠", "rank": 9},
        {"suit": "♠", "rank": 6},
        {"suit": "♥", "rank": 14}
    ]))?;
    let view = TableView::from_snapshot(&state);

    let combos = view.early_combos();
    assert_eq!(combos.len(), 1);
    assert_eq!(combos[0].suit, Some(Suit::Spades));
    // Only two high cards in spades: the server would refuse the early turn.
    assert_eq!(view.early_turn_message(&combos[0]), None);

    // Bura is already announced.
    assert_eq!(view.declarations(), vec![ComboKind::Molodka]);
    Ok(())
}

#[test]
fn early_turn_requested_when_the_server_would_grant_it() -> Result<(), Box<dyn std::error::Error>> {
    let state = waiting_snapshot(json!([
        {"id": "c_ah1", "suit": "♥", "rank": 14},
        {"id": "c_ah2", "suit": "♥", "rank": 14},
        {"suit": "♥", "rank": 10},
        {"suit": "♥", "rank": 9}
    ]))?;
    let view = TableView::from_snapshot(&state);

    let combos = view.early_combos();
    assert_eq!(combos.len(), 1);
    assert_eq!(
        view.early_turn_message(&combos[0]),
        Some(ClientMsg::RequestEarlyTurn {
            player_id: "p1".into(),
            suit: Suit::Hearts,
            round_id: Some("r_7".into()),
        })
    );
    Ok(())
}

#[test]
fn hidden_table_cards_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let mut state = responder_snapshot()?;
    if let Some(trick) = state.trick.as_mut() {
        trick.plays[0].cards[1] = serde_json::from_value(json!({"hidden": true}))?;
    }
    let view = TableView::from_snapshot(&state);
    let trick = view.trick.ok_or("expected a trick to answer")?;
    assert_eq!(trick.owner_cards, try_parse_cards(["KD"])?);
    Ok(())
}
