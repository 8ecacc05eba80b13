// Goodall categorical distance
//
// Boriah, Chandola & Kumar (2008), "Similarity measures for categorical data:
// a comparative evaluation", SIAM SDM, Goodall-1 variant.

use std::hash::Hash;

use super::frequency::FrequencyTable;
use super::matrix::{fill_upper_triangle, DistanceMatrix};
use super::probability::ProbabilityModel;
use super::weights::SimilarityWeightTable;
use super::SimilarityError;
use crate::dataset::CategoricalDataset;

/// Datasets with at least this many records assemble their matrix in parallel
pub const DEFAULT_PARALLEL_MIN_RECORDS: usize = 64;

/// Every intermediate table fitted on one dataset
#[derive(Debug, Clone)]
pub struct GoodallModel {
    frequencies: FrequencyTable,
    probabilities: ProbabilityModel,
    weights: SimilarityWeightTable,
}

impl GoodallModel {
    /// Run frequency counting, probability derivation and weighting.
    ///
    /// All input validation happens here; a model that builds can always
    /// produce a distance matrix for the same dataset.
    pub fn fit<V: Eq + Hash + Clone>(dataset: &CategoricalDataset<V>) -> Result<Self, SimilarityError> {
        let frequencies = FrequencyTable::build(dataset)?;
        let probabilities = ProbabilityModel::build(&frequencies, dataset.n_records())?;
        let weights = SimilarityWeightTable::build(probabilities.pair());

        Ok(Self {
            frequencies,
            probabilities,
            weights,
        })
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn probabilities(&self) -> &ProbabilityModel {
        &self.probabilities
    }

    pub fn weights(&self) -> &SimilarityWeightTable {
        &self.weights
    }

    /// Similarity of records `i` and `j` under the fitted weights
    pub fn similarity<V>(&self, dataset: &CategoricalDataset<V>, i: usize, j: usize) -> f64 {
        pair_similarity(dataset, &self.weights, i, j)
    }

    pub fn distance_matrix<V: Sync>(
        &self,
        dataset: &CategoricalDataset<V>,
        parallel: bool,
    ) -> Result<DistanceMatrix, SimilarityError> {
        pairwise_distances(dataset, &self.weights, parallel)
    }
}

/// Combine per-attribute weights over every record pair.
///
/// similarity(i, j) = (1/M) · Σ w(a, value) over attributes a where the two
/// records agree, and distance = 1 − similarity. Dividing by the full column
/// count M rather than the matching count is part of the measure.
///
/// Cost is O(N²·M): O(M) per pair, N(N−1)/2 pairs. This is the dominant cost
/// of the whole pipeline.
pub fn pairwise_distances<V: Sync>(
    dataset: &CategoricalDataset<V>,
    weights: &SimilarityWeightTable,
    parallel: bool,
) -> Result<DistanceMatrix, SimilarityError> {
    let n = dataset.n_records();
    if dataset.is_empty() {
        return Err(SimilarityError::EmptyInput);
    }
    if n < 2 {
        return Err(SimilarityError::InsufficientSamples { n });
    }
    check_weights_cover(dataset, weights)?;

    let condensed = fill_upper_triangle(n, parallel, |i, j| {
        (1.0 - pair_similarity(dataset, weights, i, j)).clamp(0.0, 1.0)
    });

    log::debug!(
        "Goodall distances for {} records over {} attributes ({} pairs)",
        n,
        dataset.n_attributes(),
        condensed.len()
    );

    DistanceMatrix::from_condensed(n, condensed)
}

/// Fit a model and build the full distance matrix in one call.
pub fn goodall_distance<V: Eq + Hash + Clone + Sync>(
    dataset: &CategoricalDataset<V>,
) -> Result<DistanceMatrix, SimilarityError> {
    goodall_distance_with(dataset, DEFAULT_PARALLEL_MIN_RECORDS)
}

/// As [`goodall_distance`], going parallel once the dataset reaches
/// `parallel_min_records` records.
pub fn goodall_distance_with<V: Eq + Hash + Clone + Sync>(
    dataset: &CategoricalDataset<V>,
    parallel_min_records: usize,
) -> Result<DistanceMatrix, SimilarityError> {
    let model = GoodallModel::fit(dataset)?;
    model.distance_matrix(dataset, dataset.n_records() >= parallel_min_records)
}

fn pair_similarity<V>(
    dataset: &CategoricalDataset<V>,
    weights: &SimilarityWeightTable,
    i: usize,
    j: usize,
) -> f64 {
    let codes = dataset.codes();
    let shared: f64 = codes
        .row(i)
        .iter()
        .zip(codes.row(j).iter())
        .enumerate()
        .filter(|(_, (a, b))| a == b)
        .map(|(attr, (&code, _))| weights.get(attr, code))
        .sum();
    shared / dataset.n_attributes() as f64
}

fn check_weights_cover<V>(
    dataset: &CategoricalDataset<V>,
    weights: &SimilarityWeightTable,
) -> Result<(), SimilarityError> {
    if weights.n_attributes() != dataset.n_attributes() {
        return Err(SimilarityError::InconsistentSchema(format!(
            "weight table has {} attributes, dataset has {}",
            weights.n_attributes(),
            dataset.n_attributes()
        )));
    }
    for attr in 0..dataset.n_attributes() {
        if weights.cardinality(attr) != dataset.cardinality(attr) {
            return Err(SimilarityError::InconsistentSchema(format!(
                "attribute '{}' has {} values but {} weights",
                dataset.attributes()[attr],
                dataset.cardinality(attr),
                weights.cardinality(attr)
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(attributes: &[&str], rows: Vec<Vec<&'static str>>) -> CategoricalDataset<&'static str> {
        CategoricalDataset::from_rows(attributes.iter().map(|s| s.to_string()).collect(), rows).unwrap()
    }

    #[test]
    fn red_red_blue_distances() {
        let ds = dataset(&["colour"], vec![vec!["red"], vec!["red"], vec!["blue"]]);
        let matrix = goodall_distance(&ds).unwrap();

        assert!((matrix.get(0, 1) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(matrix.get(0, 2), 1.0);
        assert_eq!(matrix.get(1, 2), 1.0);
        assert_eq!(matrix.condensed().len(), 3);
        assert!((matrix.condensed()[0] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn divides_by_total_attribute_count() {
        // records 0 and 1 agree on the rare "jazz" value only
        let ds = dataset(
            &["genre", "era"],
            vec![
                vec!["jazz", "60s"],
                vec!["jazz", "90s"],
                vec!["rock", "60s"],
                vec!["rock", "70s"],
                vec!["rock", "80s"],
            ],
        );
        let model = GoodallModel::fit(&ds).unwrap();
        let jazz = ds.code_of(0, &"jazz").unwrap();
        let w = model.weights().get(0, jazz);

        assert!((model.similarity(&ds, 0, 1) - w / 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_dataset_is_reported_before_sample_count() {
        let fitted = dataset(&["a"], vec![vec!["x"], vec!["y"]]);
        let model = GoodallModel::fit(&fitted).unwrap();
        let no_rows = CategoricalDataset::<&'static str>::from_rows(vec!["a".to_string()], Vec::new()).unwrap();

        assert!(matches!(
            pairwise_distances(&no_rows, model.weights(), false),
            Err(SimilarityError::EmptyInput)
        ));
    }

    #[test]
    fn mismatched_weights_are_rejected() {
        let small = dataset(&["a"], vec![vec!["x"], vec!["y"]]);
        let wide = dataset(&["a", "b"], vec![vec!["x", "p"], vec!["y", "q"]]);
        let model = GoodallModel::fit(&small).unwrap();

        assert!(matches!(
            pairwise_distances(&wide, model.weights(), false),
            Err(SimilarityError::InconsistentSchema(_))
        ));
    }

    #[test]
    fn single_record_is_insufficient() {
        let ds = dataset(&["a"], vec![vec!["x"]]);
        assert!(matches!(
            goodall_distance(&ds),
            Err(SimilarityError::InsufficientSamples { n: 1 })
        ));
    }
}
