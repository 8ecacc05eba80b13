// Per-attribute value frequencies

use std::hash::Hash;

use super::SimilarityError;
use crate::dataset::CategoricalDataset;

/// Occurrence count of every (attribute, value code), stored flat.
///
/// Attribute `a` owns `counts[offsets[a]..offsets[a + 1]]`, indexed by the
/// dataset's value code. Counts of each attribute sum to the record count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    n_records: usize,
    offsets: Vec<usize>,
    counts: Vec<u64>,
}

impl FrequencyTable {
    /// Count value occurrences for every attribute of `dataset`.
    pub fn build<V: Eq + Hash + Clone>(dataset: &CategoricalDataset<V>) -> Result<Self, SimilarityError> {
        if dataset.is_empty() {
            return Err(SimilarityError::EmptyInput);
        }

        let n_attributes = dataset.n_attributes();
        let offsets = offsets_for((0..n_attributes).map(|a| dataset.cardinality(a)));
        let mut counts = vec![0u64; offsets[n_attributes]];

        for row in dataset.codes().rows() {
            for (attr, &code) in row.iter().enumerate() {
                counts[offsets[attr] + code as usize] += 1;
            }
        }

        log::debug!(
            "Counted {} distinct values across {} attributes",
            counts.len(),
            n_attributes
        );

        Ok(Self {
            n_records: dataset.n_records(),
            offsets,
            counts,
        })
    }

    /// Build a table from already aggregated counts, one column per attribute.
    ///
    /// Every column must be non-empty, hold only positive counts and sum to the
    /// same record total.
    pub fn from_counts(columns: Vec<Vec<u64>>) -> Result<Self, SimilarityError> {
        let n_records = match columns.first() {
            Some(first) => column_total(0, first)?,
            None => return Err(SimilarityError::EmptyInput),
        };
        if n_records == 0 {
            return Err(SimilarityError::EmptyInput);
        }

        for (attr, column) in columns.iter().enumerate() {
            if column.iter().any(|&c| c == 0) {
                return Err(SimilarityError::InconsistentSchema(format!(
                    "attribute {} has a value with zero occurrences",
                    attr
                )));
            }
            let total = column_total(attr, column)?;
            if total != n_records {
                return Err(SimilarityError::InconsistentSchema(format!(
                    "attribute {} counts {} records, expected {}",
                    attr, total, n_records
                )));
            }
        }

        let offsets = offsets_for(columns.iter().map(Vec::len));
        Ok(Self {
            n_records,
            offsets,
            counts: columns.into_iter().flatten().collect(),
        })
    }

    pub fn n_records(&self) -> usize {
        self.n_records
    }

    pub fn n_attributes(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn cardinality(&self, attr: usize) -> usize {
        self.offsets[attr + 1] - self.offsets[attr]
    }

    /// Counts of one attribute, indexed by value code
    pub fn counts(&self, attr: usize) -> &[u64] {
        &self.counts[self.offsets[attr]..self.offsets[attr + 1]]
    }

    pub fn count(&self, attr: usize, code: u32) -> u64 {
        self.counts(attr)[code as usize]
    }

    pub(crate) fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

/// Record total of one count column; fails instead of wrapping on overflow.
fn column_total(attr: usize, column: &[u64]) -> Result<usize, SimilarityError> {
    column
        .iter()
        .try_fold(0u64, |total, &c| total.checked_add(c))
        .and_then(|total| usize::try_from(total).ok())
        .ok_or_else(|| {
            SimilarityError::InconsistentSchema(format!(
                "attribute {} counts more records than fit in memory",
                attr
            ))
        })
}

/// Prefix offsets for a flat per-attribute layout; has one entry more than
/// there are attributes.
pub(crate) fn offsets_for(cardinalities: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut offsets = vec![0];
    let mut total = 0;
    for cardinality in cardinalities {
        total += cardinality;
        offsets.push(total);
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_to_record_total() {
        let ds = CategoricalDataset::from_rows(
            vec!["timbre".into(), "tonal".into()],
            vec![
                vec!["bright", "tonal"],
                vec!["dark", "tonal"],
                vec!["bright", "atonal"],
                vec!["bright", "tonal"],
            ],
        )
        .unwrap();

        let table = FrequencyTable::build(&ds).unwrap();
        assert_eq!(table.n_records(), 4);
        assert_eq!(table.n_attributes(), 2);
        assert_eq!(table.counts(0), &[3, 1]);
        assert_eq!(table.counts(1), &[3, 1]);
        for attr in 0..table.n_attributes() {
            assert_eq!(table.counts(attr).iter().sum::<u64>(), 4);
        }
        let dark = ds.code_of(0, &"dark").unwrap();
        assert_eq!(table.count(0, dark), 1);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let no_rows = CategoricalDataset::<String>::from_rows(vec!["a".into()], Vec::new()).unwrap();
        assert!(matches!(FrequencyTable::build(&no_rows), Err(SimilarityError::EmptyInput)));

        let no_columns = CategoricalDataset::<String>::from_rows(Vec::new(), vec![Vec::new()]).unwrap();
        assert!(matches!(FrequencyTable::build(&no_columns), Err(SimilarityError::EmptyInput)));
    }

    #[test]
    fn from_counts_checks_totals() {
        assert!(FrequencyTable::from_counts(vec![vec![2, 1], vec![3]]).is_ok());
        assert!(matches!(
            FrequencyTable::from_counts(vec![vec![2, 1], vec![2]]),
            Err(SimilarityError::InconsistentSchema(_))
        ));
        assert!(matches!(
            FrequencyTable::from_counts(vec![vec![3, 0]]),
            Err(SimilarityError::InconsistentSchema(_))
        ));
        assert!(matches!(FrequencyTable::from_counts(Vec::new()), Err(SimilarityError::EmptyInput)));
    }

    #[test]
    fn overflowing_counts_are_rejected() {
        assert!(matches!(
            FrequencyTable::from_counts(vec![vec![u64::MAX, 2]]),
            Err(SimilarityError::InconsistentSchema(_))
        ));
        assert!(matches!(
            FrequencyTable::from_counts(vec![vec![2], vec![u64::MAX, 1]]),
            Err(SimilarityError::InconsistentSchema(_))
        ));
    }
}
