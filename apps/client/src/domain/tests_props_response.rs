//! Response and leader-open suggestions checked against a brute-force oracle.

use proptest::prelude::*;

use crate::domain::cards_logic::same_suit;
use crate::domain::response::play_cost;
use crate::domain::subsets::subsets_of;
use crate::domain::{
    card_beats, classify_response, suggest_leader_open, suggest_response, Card, ResponseOutcome,
    Suit,
};
use crate::domain::{test_gens, test_prelude};

/// Independent oracle: does some ordering of `response` beat `owner` card by card?
fn oracle_covers(response: &[Card], owner: &[Card], trump: Suit) -> bool {
    if response.len() != owner.len() {
        return false;
    }
    fn assign(rest: &mut Vec<Card>, owner: &[Card], trump: Suit) -> bool {
        let Some((&first, tail)) = owner.split_first() else {
            return true;
        };
        for i in 0..rest.len() {
            if card_beats(rest[i], first, trump) {
                let c = rest.remove(i);
                let ok = assign(rest, tail, trump);
                rest.insert(i, c);
                if ok {
                    return true;
                }
            }
        }
        false
    }
    assign(&mut response.to_vec(), owner, trump)
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_response_is_subset_of_hand((hand, owner, trump) in test_gens::response_setup()) {
        let required = owner.len();
        match suggest_response(&hand, &owner, required, trump) {
            Some(pick) => {
                prop_assert_eq!(pick.len(), required);
                prop_assert!(pick.iter().all(|c| hand.contains(c)));
                let mut dedup = pick.clone();
                dedup.sort();
                dedup.dedup();
                prop_assert_eq!(dedup.len(), pick.len());
            }
            None => prop_assert!(required > hand.len()),
        }
    }

    /// A winning response is suggested iff one exists, and it is the cheapest.
    #[test]
    fn prop_response_wins_when_possible((hand, owner, trump) in test_gens::response_setup()) {
        let required = owner.len();
        prop_assume!(required <= hand.len());

        let winners: Vec<Vec<Card>> = subsets_of(&hand, required)
            .filter(|cand| oracle_covers(cand, &owner, trump))
            .collect();
        let pick = suggest_response(&hand, &owner, required, trump).unwrap();

        if winners.is_empty() {
            prop_assert_ne!(classify_response(&pick, &owner, trump), ResponseOutcome::Beat);
        } else {
            prop_assert!(oracle_covers(&pick, &owner, trump));
            prop_assert_eq!(classify_response(&pick, &owner, trump), ResponseOutcome::Beat);
            let cheapest = winners.iter().map(|w| play_cost(w, trump)).min().unwrap();
            prop_assert_eq!(play_cost(&pick, trump), cheapest);
        }
    }

    #[test]
    fn prop_leader_open_is_one_suit((hand, trump) in (test_gens::hand(), test_gens::suit())) {
        match suggest_leader_open(&hand, None, trump) {
            Some(open) => {
                prop_assert!(!open.is_empty() && open.len() <= 3);
                prop_assert!(same_suit(&open).is_some());
                prop_assert!(open.iter().all(|c| hand.contains(c)));
                // No suit offers a larger group.
                let largest = Suit::ALL
                    .iter()
                    .map(|&s| hand.iter().filter(|c| c.suit == s).count().min(3))
                    .max()
                    .unwrap_or(0);
                prop_assert_eq!(open.len(), largest);
            }
            None => prop_assert!(hand.is_empty()),
        }
    }

    #[test]
    fn prop_seeded_open_contains_seed((hand, trump) in (test_gens::unique_cards(1, 12), test_gens::suit()), pick in any::<prop::sample::Index>()) {
        let seed = hand[pick.index(hand.len())];
        let open = suggest_leader_open(&hand, Some(seed), trump).unwrap();
        prop_assert!(open.contains(&seed));
        prop_assert!(open.iter().all(|c| c.suit == seed.suit));
        prop_assert!(open.len() <= 3);
    }
}
