use goodall_lib::similarity::{FrequencyTable, ProbabilityModel, SimilarityWeightTable};
use goodall_lib::{CategoricalDataset, GoodallModel};
use proptest::prelude::*;

/// Random categorical table: 2..40 records, 1..5 attributes, small alphabets
/// so that agreements and ties are common.
fn categorical_rows() -> impl Strategy<Value = (usize, Vec<Vec<u8>>)> {
    (1usize..5).prop_flat_map(|m| {
        (
            Just(m),
            prop::collection::vec(prop::collection::vec(0u8..4, m), 2..40),
        )
    })
}

fn build(m: usize, rows: Vec<Vec<u8>>) -> CategoricalDataset<u8> {
    let attributes = (0..m).map(|a| format!("attr_{}", a)).collect();
    CategoricalDataset::from_rows(attributes, rows).unwrap()
}

/// Per-attribute count columns, topped up so every column covers the same
/// number of records (at least 2).
fn count_columns() -> impl Strategy<Value = Vec<Vec<u64>>> {
    prop::collection::vec(prop::collection::vec(1u64..6, 1..8), 1..4).prop_map(|mut columns| {
        let target = columns
            .iter()
            .map(|c| c.iter().sum::<u64>())
            .max()
            .unwrap_or(0)
            .max(2);
        for column in &mut columns {
            let total: u64 = column.iter().sum();
            if total < target {
                column.push(target - total);
            }
        }
        columns
    })
}

fn weights_from_counts(columns: Vec<Vec<u64>>) -> (SimilarityWeightTable, SimilarityWeightTable, Vec<Vec<f64>>) {
    let freq = FrequencyTable::from_counts(columns).unwrap();
    let model = ProbabilityModel::build(&freq, freq.n_records()).unwrap();
    let pair = model.pair();
    let p2 = (0..pair.n_attributes()).map(|a| pair.values(a).to_vec()).collect();
    (
        SimilarityWeightTable::build(pair),
        SimilarityWeightTable::build_naive(pair),
        p2,
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal_and_bounded((m, rows) in categorical_rows()) {
        let ds = build(m, rows);
        let model = GoodallModel::fit(&ds).unwrap();
        let matrix = model.distance_matrix(&ds, false).unwrap();
        let n = ds.n_records();

        for i in 0..n {
            prop_assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..n {
                prop_assert_eq!(matrix.get(i, j), matrix.get(j, i));
                prop_assert!((0.0..=1.0).contains(&matrix.get(i, j)));
            }
        }
    }

    #[test]
    fn repeated_runs_are_identical((m, rows) in categorical_rows()) {
        let ds = build(m, rows);
        let model = GoodallModel::fit(&ds).unwrap();
        let first = model.distance_matrix(&ds, false).unwrap();
        let again = GoodallModel::fit(&ds).unwrap().distance_matrix(&ds, false).unwrap();
        let parallel = model.distance_matrix(&ds, true).unwrap();
        prop_assert_eq!(&first, &again);
        prop_assert_eq!(&first, &parallel);
    }

    #[test]
    fn condensed_list_follows_pair_order((m, rows) in categorical_rows()) {
        let ds = build(m, rows);
        let matrix = GoodallModel::fit(&ds).unwrap().distance_matrix(&ds, false).unwrap();
        let n = ds.n_records();

        let mut k = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                prop_assert_eq!(matrix.condensed()[k], matrix.get(i, j));
                k += 1;
            }
        }
        prop_assert_eq!(k, matrix.condensed().len());
    }

    #[test]
    fn sorted_weights_equal_threshold_definition(columns in count_columns()) {
        let (fast, naive, _) = weights_from_counts(columns);
        for attr in 0..fast.n_attributes() {
            for (a, b) in fast.weights(attr).iter().zip(naive.weights(attr)) {
                prop_assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn rarer_values_weigh_at_least_as_much(
        counts in prop::collection::vec(1u64..20, 1..10)
            .prop_filter("at least two records", |c| c.iter().sum::<u64>() >= 2)
    ) {
        let (weights, _, p2) = weights_from_counts(vec![counts]);
        let p2 = &p2[0];
        let w = weights.weights(0);
        for i in 0..p2.len() {
            prop_assert!((0.0..=1.0).contains(&w[i]));
            for j in 0..p2.len() {
                if p2[i] < p2[j] {
                    prop_assert!(w[i] >= w[j]);
                }
                if p2[i] == p2[j] {
                    prop_assert_eq!(w[i], w[j]);
                }
            }
        }
    }

    #[test]
    fn tie_order_does_not_change_weights(counts in prop::collection::vec(1u64..6, 2..10)) {
        let mut reversed = counts.clone();
        reversed.reverse();

        let (forward, _, _) = weights_from_counts(vec![counts.clone()]);
        let (backward, _, _) = weights_from_counts(vec![reversed]);

        let len = counts.len();
        for code in 0..len {
            prop_assert_eq!(forward.weights(0)[code], backward.weights(0)[len - 1 - code]);
        }
    }
}
