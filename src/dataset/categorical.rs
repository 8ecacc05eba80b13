// Categorical dataset with per-attribute value interning

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use ndarray::{Array2, ArrayView1};

use crate::similarity::SimilarityError;

/// Categorical table with every value interned to a dense per-attribute code.
///
/// Record `i`, attribute `a` is stored as `codes[[i, a]]`; the code indexes
/// into `dictionary(a)`. Codes are assigned in first-seen order, so the same
/// input always produces the same layout.
#[derive(Debug, Clone)]
pub struct CategoricalDataset<V = String> {
    attributes: Vec<String>,
    dictionaries: Vec<Vec<V>>,
    lookups: Vec<HashMap<V, u32>>,
    codes: Array2<u32>,
}

impl<V: Eq + Hash + Clone> CategoricalDataset<V> {
    /// Build a dataset from rows whose values follow the order of `attributes`.
    pub fn from_rows(attributes: Vec<String>, rows: Vec<Vec<V>>) -> Result<Self, SimilarityError> {
        check_attribute_names(&attributes)?;

        let n_attributes = attributes.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_attributes {
                return Err(SimilarityError::InconsistentSchema(format!(
                    "record {} has {} values, expected {}",
                    i,
                    row.len(),
                    n_attributes
                )));
            }
        }

        let mut dictionaries: Vec<Vec<V>> = vec![Vec::new(); n_attributes];
        let mut lookups: Vec<HashMap<V, u32>> = (0..n_attributes).map(|_| HashMap::new()).collect();
        let mut flat = Vec::with_capacity(rows.len() * n_attributes);

        for row in &rows {
            for (attr, value) in row.iter().enumerate() {
                let dictionary = &mut dictionaries[attr];
                let code = *lookups[attr].entry(value.clone()).or_insert_with(|| {
                    dictionary.push(value.clone());
                    (dictionary.len() - 1) as u32
                });
                flat.push(code);
            }
        }

        let codes = Array2::from_shape_vec((rows.len(), n_attributes), flat)
            .map_err(|e| SimilarityError::InconsistentSchema(e.to_string()))?;

        log::debug!(
            "Interned {} records x {} attributes ({} distinct values)",
            rows.len(),
            n_attributes,
            dictionaries.iter().map(Vec::len).sum::<usize>()
        );

        Ok(Self {
            attributes,
            dictionaries,
            lookups,
            codes,
        })
    }

    /// Build a dataset from records keyed by attribute name.
    ///
    /// Every record must carry exactly the declared attributes; a missing or
    /// undeclared key fails before anything is interned.
    pub fn from_records(
        attributes: Vec<String>,
        records: Vec<HashMap<String, V>>,
    ) -> Result<Self, SimilarityError> {
        check_attribute_names(&attributes)?;

        let mut rows = Vec::with_capacity(records.len());
        for (i, mut record) in records.into_iter().enumerate() {
            let mut row = Vec::with_capacity(attributes.len());
            for attr in &attributes {
                let value = record.remove(attr).ok_or_else(|| {
                    SimilarityError::InconsistentSchema(format!(
                        "record {} is missing attribute '{}'",
                        i, attr
                    ))
                })?;
                row.push(value);
            }

            if !record.is_empty() {
                let mut extra: Vec<String> = record.into_keys().collect();
                extra.sort();
                return Err(SimilarityError::InconsistentSchema(format!(
                    "record {} has undeclared attributes: {}",
                    i,
                    extra.join(", ")
                )));
            }

            rows.push(row);
        }

        Self::from_rows(attributes, rows)
    }

    /// Code assigned to `value` in attribute `attr`, if the value occurs.
    pub fn code_of(&self, attr: usize, value: &V) -> Option<u32> {
        self.lookups.get(attr)?.get(value).copied()
    }
}

impl<V> CategoricalDataset<V> {
    pub fn n_records(&self) -> usize {
        self.codes.nrows()
    }

    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_records() == 0 || self.n_attributes() == 0
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == name)
    }

    /// Number of distinct values observed for an attribute
    pub fn cardinality(&self, attr: usize) -> usize {
        self.dictionaries[attr].len()
    }

    /// Distinct values of an attribute, indexed by code
    pub fn dictionary(&self, attr: usize) -> &[V] {
        &self.dictionaries[attr]
    }

    pub fn value(&self, attr: usize, code: u32) -> Option<&V> {
        self.dictionaries.get(attr)?.get(code as usize)
    }

    /// Value held by `record` for `attr`
    pub fn value_at(&self, record: usize, attr: usize) -> &V {
        &self.dictionaries[attr][self.codes[[record, attr]] as usize]
    }

    /// N x M matrix of value codes
    pub fn codes(&self) -> &Array2<u32> {
        &self.codes
    }

    pub fn record_codes(&self, record: usize) -> ArrayView1<'_, u32> {
        self.codes.row(record)
    }
}

fn check_attribute_names(attributes: &[String]) -> Result<(), SimilarityError> {
    let mut seen = HashSet::with_capacity(attributes.len());
    for attr in attributes {
        if !seen.insert(attr.as_str()) {
            return Err(SimilarityError::InconsistentSchema(format!(
                "attribute '{}' declared more than once",
                attr
            )));
        }
    }
    Ok(())
}
