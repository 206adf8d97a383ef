use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::geo::DistanceRange;
use crate::models::Candidate;

/// Nearer first; on an exact tie the lower factory id wins.
fn closer(a: &Candidate, b: &Candidate) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.factory_id.cmp(&b.factory_id))
}

/// Collapse candidate locations to one row per seller and rank them.
///
/// Candidates outside `range` are dropped, each seller keeps its nearest
/// remaining factory, and the survivors are sorted nearest first and cut
/// to `limit`. The output does not depend on the input order.
pub fn rank_nearest_per_seller(
    candidates: Vec<Candidate>,
    range: DistanceRange,
    limit: usize,
) -> Vec<Candidate> {
    let mut best: HashMap<_, Candidate> = HashMap::new();

    for candidate in candidates.into_iter().filter(|c| range.contains(c.distance_km)) {
        match best.entry(candidate.seller_id) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if closer(&candidate, slot.get()) == Ordering::Less {
                    slot.insert(candidate);
                }
            }
        }
    }

    let mut ranked: Vec<Candidate> = best.into_values().collect();
    ranked.sort_by(closer);
    ranked.truncate(limit);
    ranked
}

/// Sort a within-city listing nearest first, without dropping anything
pub fn sort_by_distance(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(closer);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::RESULT_LIMIT;
    use crate::models::FactoryType;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn candidate(seller_id: Uuid, factory_id: Uuid, distance_km: f64) -> Candidate {
        Candidate {
            seller_id,
            seller_name: format!("seller-{}", seller_id),
            factory_id,
            factory_name: format!("factory-{}", factory_id),
            factory_type: FactoryType::Shop,
            categories: vec![],
            latitude: 12.97,
            longitude: 77.59,
            address_line1: "1 Main Road".into(),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            distance_km,
        }
    }

    fn ids(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_keeps_nearest_factory_per_seller() {
        let seller = ids(1);
        let ranked = rank_nearest_per_seller(
            vec![
                candidate(seller, ids(10), 42.0),
                candidate(seller, ids(11), 3.5),
                candidate(ids(2), ids(20), 10.0),
            ],
            DistanceRange::default(),
            RESULT_LIMIT,
        );

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].factory_id, ids(11));
        assert_eq!(ranked[1].seller_id, ids(2));
    }

    #[test]
    fn test_equidistant_factories_pick_lowest_factory_id() {
        let seller = ids(1);
        for input in [
            vec![candidate(seller, ids(30), 5.0), candidate(seller, ids(12), 5.0)],
            vec![candidate(seller, ids(12), 5.0), candidate(seller, ids(30), 5.0)],
        ] {
            let ranked = rank_nearest_per_seller(input, DistanceRange::default(), RESULT_LIMIT);
            assert_eq!(ranked.len(), 1);
            assert_eq!(ranked[0].factory_id, ids(12));
        }
    }

    #[test]
    fn test_range_filter_applies_before_dedup() {
        // The seller's nearest factory is inside the exclusion zone, so the
        // farther one represents it.
        let seller = ids(1);
        let ranked = rank_nearest_per_seller(
            vec![candidate(seller, ids(10), 2.0), candidate(seller, ids(11), 15.0)],
            DistanceRange::new(5.0, 50.0),
            RESULT_LIMIT,
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].factory_id, ids(11));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let ranked = rank_nearest_per_seller(
            vec![candidate(ids(1), ids(10), 7.0)],
            DistanceRange::new(10.0, 5.0),
            RESULT_LIMIT,
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_result_properties_hold_for_many_sellers() {
        let range = DistanceRange::new(1.0, 120.0);
        let mut input = Vec::new();
        for s in 0..40u128 {
            for f in 0..3u128 {
                let distance = ((s * 37 + f * 53) % 150) as f64 + 0.25;
                input.push(candidate(ids(s), ids(1000 + s * 10 + f), distance));
            }
        }

        let ranked = rank_nearest_per_seller(input, range, RESULT_LIMIT);

        assert!(ranked.len() <= RESULT_LIMIT);
        assert!(ranked.iter().all(|c| range.contains(c.distance_km)));
        let sellers: HashSet<_> = ranked.iter().map(|c| c.seller_id).collect();
        assert_eq!(sellers.len(), ranked.len());
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let input = vec![
            candidate(ids(1), ids(10), 9.0),
            candidate(ids(2), ids(20), 9.0),
            candidate(ids(1), ids(11), 4.0),
            candidate(ids(3), ids(30), 1.0),
        ];
        let mut reversed = input.clone();
        reversed.reverse();

        assert_eq!(
            rank_nearest_per_seller(input, DistanceRange::default(), RESULT_LIMIT),
            rank_nearest_per_seller(reversed, DistanceRange::default(), RESULT_LIMIT)
        );
    }

    #[test]
    fn test_sort_by_distance_keeps_every_row() {
        let seller = ids(1);
        let sorted = sort_by_distance(vec![
            candidate(seller, ids(11), 8.0),
            candidate(seller, ids(10), 2.0),
            candidate(ids(2), ids(20), 5.0),
        ]);

        let distances: Vec<_> = sorted.iter().map(|c| c.distance_km).collect();
        assert_eq!(distances, vec![2.0, 5.0, 8.0]);
    }
}
