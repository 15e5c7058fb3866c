//! Leader-mode opening suggestions.

use super::cards_logic::rank_strength;
use super::cards_types::{Card, Suit};
use super::response::play_cost;

/// Most cards a leader may open with outside of a four-card combo.
pub const MAX_LEAD_CARDS: usize = 3;

fn strongest_first(cards: &mut [Card]) {
    cards.sort_by(|a, b| rank_strength(b.rank).cmp(&rank_strength(a.rank)));
}

/// Suggest an opening play for the leader.
///
/// With a `seed` card, returns the seed plus the strongest other cards of its
/// suit, up to three in total. Without a seed, takes the top three of each
/// suit and returns the largest group, breaking ties by lower spending cost
/// and then suit priority. Cards come back strongest first.
pub fn suggest_leader_open(hand: &[Card], seed: Option<Card>, trump: Suit) -> Option<Vec<Card>> {
    match seed {
        Some(seed) => {
            if !hand.contains(&seed) {
                return None;
            }
            let mut others: Vec<Card> = hand
                .iter()
                .copied()
                .filter(|c| c.suit == seed.suit && *c != seed)
                .collect();
            strongest_first(&mut others);
            let mut group = vec![seed];
            group.extend(others.into_iter().take(MAX_LEAD_CARDS - 1));
            strongest_first(&mut group);
            Some(group)
        }
        None => Suit::ALL
            .iter()
            .filter_map(|&suit| {
                let mut group: Vec<Card> =
                    hand.iter().copied().filter(|c| c.suit == suit).collect();
                if group.is_empty() {
                    return None;
                }
                strongest_first(&mut group);
                group.truncate(MAX_LEAD_CARDS);
                Some(group)
            })
            // Suit::ALL is in priority order, so min_by_key keeps the earlier suit on full ties.
            .min_by_key(|group| (std::cmp::Reverse(group.len()), play_cost(group, trump))),
    }
}
