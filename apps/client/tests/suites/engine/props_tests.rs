// Cross-module properties: every suggestion the engines make is a selection
// the validator accepts.

use bura_client::domain::subsets::subsets_of;
use bura_client::domain::{classify_response, ResponseOutcome};
use bura_client::{
    enumerate_early_combos, evaluate_selection, suggest_leader_open, suggest_response, Card,
    PlayMode, Rank, Suit,
};
use proptest::prelude::*;

use crate::common::proptest_prelude::proptest_prelude_config;

fn deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
        .collect()
}

fn hand(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    proptest::sample::subsequence(deck(), min..=max).prop_shuffle()
}

fn trump() -> impl Strategy<Value = Suit> {
    proptest::sample::select(Suit::ALL.to_vec())
}

/// Hand positions of `cards`; hands are duplicate-free here.
fn indices_of(hand: &[Card], cards: &[Card]) -> Vec<usize> {
    cards
        .iter()
        .filter_map(|c| hand.iter().position(|h| h == c))
        .collect()
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn leader_suggestion_is_a_valid_selection(hand in hand(1, 10), trump in trump()) {
        let open = suggest_leader_open(&hand, None, trump).expect("non-empty hand has an open");
        let picked = indices_of(&hand, &open);
        prop_assert_eq!(picked.len(), open.len());
        let accepted = evaluate_selection(&hand, &picked, &PlayMode::Leader);
        prop_assert_eq!(accepted, Ok(open));
    }

    #[test]
    fn response_suggestion_is_a_valid_selection(
        cards in hand(2, 12),
        split in 1usize..=4,
        trump in trump(),
    ) {
        let split = split.min(cards.len() - 1);
        let (owner, hand) = cards.split_at(split);
        let required = owner.len();
        let mode = PlayMode::Responder { owner_cards: owner.to_vec(), required };

        match suggest_response(hand, owner, required, trump) {
            Some(pick) => {
                let picked = indices_of(hand, &pick);
                prop_assert_eq!(evaluate_selection(hand, &picked, &mode), Ok(pick.clone()));

                let can_cover = subsets_of(hand, required)
                    .any(|c| classify_response(&c, owner, trump) == ResponseOutcome::Beat);
                if can_cover {
                    prop_assert_eq!(classify_response(&pick, owner, trump), ResponseOutcome::Beat);
                }
            }
            None => prop_assert!(hand.len() < required),
        }
    }

    #[test]
    fn early_combos_are_valid_four_card_leads(hand in hand(4, 12)) {
        for combo in enumerate_early_combos(&hand) {
            let picked = indices_of(&hand, &combo.cards);
            prop_assert_eq!(
                evaluate_selection(&hand, &picked, &PlayMode::Leader),
                Ok(combo.cards.clone())
            );
        }
    }
}
