// Marginal and pair probabilities derived from value frequencies

use super::frequency::FrequencyTable;
use super::SimilarityError;

/// p(a, v) = freq(a, v) / N for every (attribute, value code)
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    offsets: Vec<usize>,
    values: Vec<f64>,
}

impl ProbabilityTable {
    pub fn n_attributes(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn values(&self, attr: usize) -> &[f64] {
        &self.values[self.offsets[attr]..self.offsets[attr + 1]]
    }

    pub fn get(&self, attr: usize, code: u32) -> f64 {
        self.values(attr)[code as usize]
    }
}

/// p2(a, v) = freq·(freq − 1) / (N·(N − 1)): the chance that two distinct
/// records drawn without replacement both hold `v` in attribute `a`.
///
/// The integer numerators are kept next to the float values so that sums over
/// equal-probability values can be formed exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct PairProbabilityTable {
    n_records: usize,
    offsets: Vec<usize>,
    pair_counts: Vec<u128>,
    values: Vec<f64>,
}

impl PairProbabilityTable {
    pub fn n_records(&self) -> usize {
        self.n_records
    }

    pub fn n_attributes(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn cardinality(&self, attr: usize) -> usize {
        self.offsets[attr + 1] - self.offsets[attr]
    }

    pub fn values(&self, attr: usize) -> &[f64] {
        &self.values[self.offsets[attr]..self.offsets[attr + 1]]
    }

    pub fn get(&self, attr: usize, code: u32) -> f64 {
        self.values(attr)[code as usize]
    }

    /// Ordered same-value pair counts freq·(freq − 1), indexed by value code
    pub fn pair_counts(&self, attr: usize) -> &[u128] {
        &self.pair_counts[self.offsets[attr]..self.offsets[attr + 1]]
    }

    /// Number of ordered pairs of distinct records, N·(N − 1)
    pub fn denominator(&self) -> u128 {
        ordered_pairs(self.n_records as u128)
    }

    /// Probability that two distinct records share any value in `attr`
    pub fn agreement_probability(&self, attr: usize) -> f64 {
        let shared: u128 = self.pair_counts(attr).iter().sum();
        shared as f64 / self.denominator() as f64
    }

    pub(crate) fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

/// Both probability tables for one frequency table
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityModel {
    marginal: ProbabilityTable,
    pair: PairProbabilityTable,
}

impl ProbabilityModel {
    /// Derive p and p2 from `frequencies` over `n_records` records.
    pub fn build(frequencies: &FrequencyTable, n_records: usize) -> Result<Self, SimilarityError> {
        if n_records < 2 {
            return Err(SimilarityError::InsufficientSamples { n: n_records });
        }
        if frequencies.n_records() != n_records {
            return Err(SimilarityError::InconsistentSchema(format!(
                "frequency table covers {} records, expected {}",
                frequencies.n_records(),
                n_records
            )));
        }

        let n = n_records as f64;
        let denominator = ordered_pairs(n_records as u128) as f64;
        let offsets = frequencies.offsets().to_vec();

        let mut marginal = Vec::with_capacity(offsets[offsets.len() - 1]);
        let mut pair_counts = Vec::with_capacity(marginal.capacity());
        let mut pair = Vec::with_capacity(marginal.capacity());

        for attr in 0..frequencies.n_attributes() {
            for &count in frequencies.counts(attr) {
                let shared = ordered_pairs(count as u128);
                marginal.push(count as f64 / n);
                pair_counts.push(shared);
                // shared is 0 whenever count <= 1
                pair.push((shared as f64 / denominator).max(0.0));
            }
        }

        Ok(Self {
            marginal: ProbabilityTable {
                offsets: offsets.clone(),
                values: marginal,
            },
            pair: PairProbabilityTable {
                n_records,
                offsets,
                pair_counts,
                values: pair,
            },
        })
    }

    pub fn marginal(&self) -> &ProbabilityTable {
        &self.marginal
    }

    pub fn pair(&self) -> &PairProbabilityTable {
        &self.pair
    }

    pub fn into_parts(self) -> (ProbabilityTable, PairProbabilityTable) {
        (self.marginal, self.pair)
    }
}

fn ordered_pairs(count: u128) -> u128 {
    count * count.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn red_red_blue() {
        // red = code 0 (2 records), blue = code 1 (1 record)
        let freq = FrequencyTable::from_counts(vec![vec![2, 1]]).unwrap();
        let model = ProbabilityModel::build(&freq, 3).unwrap();

        assert!(approx(model.marginal().get(0, 0), 2.0 / 3.0));
        assert!(approx(model.marginal().get(0, 1), 1.0 / 3.0));
        assert!(approx(model.pair().get(0, 0), 1.0 / 3.0));
        assert_eq!(model.pair().get(0, 1), 0.0);
        assert_eq!(model.pair().pair_counts(0), &[2, 0]);
        assert_eq!(model.pair().denominator(), 6);
    }

    #[test]
    fn marginals_sum_to_one() {
        let freq = FrequencyTable::from_counts(vec![vec![5, 3, 1, 1], vec![10]]).unwrap();
        let model = ProbabilityModel::build(&freq, 10).unwrap();
        for attr in 0..2 {
            let total: f64 = model.marginal().values(attr).iter().sum();
            assert!(approx(total, 1.0));
        }
        // a value every record shares
        assert_eq!(model.pair().get(1, 0), 1.0);
        assert_eq!(model.pair().agreement_probability(1), 1.0);
    }

    #[test]
    fn single_record_is_insufficient() {
        let freq = FrequencyTable::from_counts(vec![vec![1]]).unwrap();
        assert!(matches!(
            ProbabilityModel::build(&freq, 1),
            Err(SimilarityError::InsufficientSamples { n: 1 })
        ));
    }

    #[test]
    fn record_count_must_match_table() {
        let freq = FrequencyTable::from_counts(vec![vec![2, 2]]).unwrap();
        assert!(matches!(
            ProbabilityModel::build(&freq, 5),
            Err(SimilarityError::InconsistentSchema(_))
        ));
    }
}
