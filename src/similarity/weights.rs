// Goodall similarity weights

use super::frequency::offsets_for;
use super::probability::PairProbabilityTable;

/// w(a, v) = 1 − Σ p2(a, v') over every value v' of `a` with p2(a, v') <= p2(a, v).
///
/// Rare values get weights near 1, a value held by every record gets 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityWeightTable {
    offsets: Vec<usize>,
    weights: Vec<f64>,
}

impl SimilarityWeightTable {
    /// Sort each attribute's values by pair probability once and take prefix
    /// sums, O(V log V) per attribute.
    ///
    /// Tied values share one cumulative sum that includes all of them. The
    /// sums run over integer pair counts, so ties and their order are exact.
    pub fn build(pair: &PairProbabilityTable) -> Self {
        let offsets = pair.offsets().to_vec();
        let denominator = pair.denominator() as f64;
        let mut weights = vec![0.0; offsets[offsets.len() - 1]];

        for attr in 0..pair.n_attributes() {
            let counts = pair.pair_counts(attr);
            let out = &mut weights[offsets[attr]..offsets[attr + 1]];

            let mut order: Vec<usize> = (0..counts.len()).collect();
            order.sort_unstable_by_key(|&v| counts[v]);

            let mut cumulative: u128 = 0;
            let mut start = 0;
            while start < order.len() {
                let key = counts[order[start]];
                let mut end = start;
                while end < order.len() && counts[order[end]] == key {
                    cumulative += key;
                    end += 1;
                }

                let weight = (1.0 - cumulative as f64 / denominator).clamp(0.0, 1.0);
                for &code in &order[start..end] {
                    out[code] = weight;
                }
                start = end;
            }
        }

        log::debug!("Built {} similarity weights", weights.len());

        Self { offsets, weights }
    }

    /// Threshold sum evaluated directly from the definition, O(V²) per
    /// attribute. Agrees with [`SimilarityWeightTable::build`] up to float
    /// summation order.
    pub fn build_naive(pair: &PairProbabilityTable) -> Self {
        let offsets = offsets_for((0..pair.n_attributes()).map(|a| pair.cardinality(a)));
        let mut weights = Vec::with_capacity(offsets[offsets.len() - 1]);

        for attr in 0..pair.n_attributes() {
            let p2 = pair.values(attr);
            for &own in p2 {
                let below: f64 = p2.iter().filter(|&&other| other <= own).sum();
                weights.push((1.0 - below).clamp(0.0, 1.0));
            }
        }

        Self { offsets, weights }
    }

    pub fn n_attributes(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn cardinality(&self, attr: usize) -> usize {
        self.offsets[attr + 1] - self.offsets[attr]
    }

    /// Weights of one attribute, indexed by value code
    pub fn weights(&self, attr: usize) -> &[f64] {
        &self.weights[self.offsets[attr]..self.offsets[attr + 1]]
    }

    #[inline]
    pub fn get(&self, attr: usize, code: u32) -> f64 {
        self.weights[self.offsets[attr] + code as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::{FrequencyTable, ProbabilityModel};

    fn weights_for(columns: Vec<Vec<u64>>) -> SimilarityWeightTable {
        let freq = FrequencyTable::from_counts(columns).unwrap();
        let model = ProbabilityModel::build(&freq, freq.n_records()).unwrap();
        SimilarityWeightTable::build(model.pair())
    }

    #[test]
    fn rare_value_outweighs_common_one() {
        // red x2, blue x1 over three records
        let table = weights_for(vec![vec![2, 1]]);
        assert!((table.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((table.get(0, 0) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn universal_value_has_zero_weight() {
        let table = weights_for(vec![vec![7]]);
        assert_eq!(table.get(0, 0), 0.0);
    }

    #[test]
    fn tied_values_share_cumulative_sum() {
        // two values with 3 occurrences each, one with 2
        let table = weights_for(vec![vec![3, 2, 3]]);
        // N = 8, D = 56; pair counts 6, 2, 6
        let expected_tied = 1.0 - (2.0 + 6.0 + 6.0) / 56.0;
        let expected_rare = 1.0 - 2.0 / 56.0;
        assert_eq!(table.get(0, 0), table.get(0, 2));
        assert!((table.get(0, 0) - expected_tied).abs() < 1e-12);
        assert!((table.get(0, 1) - expected_rare).abs() < 1e-12);
    }

    #[test]
    fn singletons_all_weigh_one() {
        let table = weights_for(vec![vec![1, 1, 1, 1]]);
        assert!(table.weights(0).iter().all(|&w| w == 1.0));
    }
}
