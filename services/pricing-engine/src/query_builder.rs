//! Query Builder
//!
//! Decides, per part, which lookups to send: one SKU query for every
//! distributor the BOM already gives a stock code for, then a single
//! manufacturer P/N query covering the distributors that are left.

use bomprice_models::{Part, Query, QueryEntry};

/// Builds the queries for a whole part list, in part order.
///
/// `distributors` must already be filtered down to the enabled web
/// distributors this pass targets.
pub fn build_queries(parts: &[Part], distributors: &[String]) -> Vec<QueryEntry> {
    let mut distributors = distributors.to_vec();
    distributors.sort();
    distributors.dedup();

    parts
        .iter()
        .enumerate()
        .flat_map(|(index, part)| part_queries(index, part, &distributors))
        .collect()
}

/// Queries for one part: SKU queries first, then at most one P/N query.
pub fn part_queries(part_index: usize, part: &Part, distributors: &[String]) -> Vec<QueryEntry> {
    let mut entries = Vec::new();
    let mut need_mpn = Vec::new();

    for distributor in distributors {
        match part.stock_code(distributor) {
            Some(code) => entries.push(QueryEntry {
                query: Query::sku(distributor.as_str(), code),
                part_index,
                distributors_wanted: vec![distributor.clone()],
            }),
            None => need_mpn.push(distributor.clone()),
        }
    }

    if need_mpn.is_empty() {
        return entries;
    }

    if let (Some(manufacturer), Some(mpn)) = (part.manufacturer(), part.manufacturer_pn()) {
        entries.push(QueryEntry {
            query: Query::mpn(manufacturer, mpn),
            part_index,
            distributors_wanted: need_mpn,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomprice_models::{FIELD_MANUFACTURER, FIELD_MANUFACTURER_PN};
    use proptest::prelude::*;

    fn dists(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn acme_part() -> Part {
        Part::new(["U1"])
            .with_field(FIELD_MANUFACTURER, "ACME")
            .with_field(FIELD_MANUFACTURER_PN, "XYZ-1")
    }

    #[test]
    fn test_mpn_query_covers_all_distributors() {
        let entries = build_queries(&[acme_part()], &dists(&["mouser", "digikey"]));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].query, Query::mpn("ACME", "XYZ-1"));
        assert_eq!(entries[0].distributors_wanted, dists(&["digikey", "mouser"]));
    }

    #[test]
    fn test_sku_queries_before_mpn_query() {
        let part = acme_part().with_field("mouser#", "595-XYZ1");
        let entries = build_queries(&[part], &dists(&["digikey", "mouser", "tme"]));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, Query::sku("mouser", "595-XYZ1"));
        assert_eq!(entries[0].distributors_wanted, dists(&["mouser"]));
        assert_eq!(entries[1].query, Query::mpn("ACME", "XYZ-1"));
        assert_eq!(entries[1].distributors_wanted, dists(&["digikey", "tme"]));
    }

    #[test]
    fn test_stock_code_for_every_distributor_skips_mpn() {
        let part = acme_part()
            .with_field("digikey#", "XYZ1-ND")
            .with_field("mouser#", "595-XYZ1");
        let entries = build_queries(&[part], &dists(&["digikey", "mouser"]));

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.query.is_sku()));
    }

    #[test]
    fn test_part_without_codes_emits_nothing() {
        let part = Part::new(["R7"]).with_field("value", "10k");

        assert!(build_queries(&[part], &dists(&["digikey"])).is_empty());
    }

    #[test]
    fn test_mpn_without_manufacturer_emits_nothing() {
        let part = Part::new(["R7"]).with_field(FIELD_MANUFACTURER_PN, "RC0603FR-0710KL");

        assert!(build_queries(&[part], &dists(&["digikey"])).is_empty());
    }

    #[test]
    fn test_stock_codes_for_unselected_distributors_ignored() {
        let part = acme_part().with_field("farnell#", "1234567");
        let entries = build_queries(&[part], &dists(&["digikey"]));

        assert_eq!(entries.len(), 1);
        assert!(!entries[0].query.is_sku());
    }

    #[test]
    fn test_part_indexes_follow_input_order() {
        let parts = vec![
            acme_part(),
            Part::new(["R1"]),
            acme_part().with_field("digikey#", "A-ND"),
        ];
        let entries = build_queries(&parts, &dists(&["digikey", "mouser"]));

        let indexes: Vec<usize> = entries.iter().map(|e| e.part_index).collect();
        assert_eq!(indexes, vec![0, 2, 2]);
    }

    proptest! {
        /// The P/N query, when emitted, names exactly the distributors
        /// without a stock code.
        #[test]
        fn prop_mpn_query_wants_uncovered_distributors(
            coverage in proptest::collection::vec(any::<bool>(), 1..6),
        ) {
            let all: Vec<String> = (0..coverage.len()).map(|i| format!("dist{}", i)).collect();
            let mut part = acme_part();
            for (name, covered) in all.iter().zip(&coverage) {
                if *covered {
                    part = part.with_field(Part::stock_code_field(name), format!("{}-SKU", name));
                }
            }

            let entries = build_queries(&[part], &all);
            let skus = entries.iter().filter(|e| e.query.is_sku()).count();
            let uncovered: Vec<String> = all
                .iter()
                .zip(&coverage)
                .filter(|(_, covered)| !**covered)
                .map(|(name, _)| name.clone())
                .collect();

            prop_assert_eq!(skus, coverage.iter().filter(|c| **c).count());
            match entries.iter().find(|e| !e.query.is_sku()) {
                Some(mpn) => prop_assert_eq!(&mpn.distributors_wanted, &uncovered),
                None => prop_assert!(uncovered.is_empty()),
            }
        }
    }
}
