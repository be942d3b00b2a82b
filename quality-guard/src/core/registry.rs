//! Named collections of datasets used to resolve cross-dataset references.

use super::dataset::Dataset;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A mapping from dataset name to [`Dataset`].
///
/// The engine resolves the reference side of foreign-key rules through a
/// registry, and [`ValidationEngine::evaluate_all`](crate::engine::ValidationEngine::evaluate_all)
/// also looks up the dataset each suite is bound to here. Datasets are held in
/// `Arc`s so one registry can be shared by concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, Arc<Dataset>>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dataset under its own name, builder style.
    pub fn with_dataset(mut self, dataset: impl Into<Arc<Dataset>>) -> Self {
        self.insert(dataset);
        self
    }

    /// Adds a dataset under its own name, returning any dataset it replaced.
    pub fn insert(&mut self, dataset: impl Into<Arc<Dataset>>) -> Option<Arc<Dataset>> {
        let dataset = dataset.into();
        self.datasets.insert(dataset.name().to_string(), dataset)
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name).map(Arc::as_ref)
    }

    pub fn get_arc(&self, name: &str) -> Option<Arc<Dataset>> {
        self.datasets.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}

impl FromIterator<Dataset> for DatasetRegistry {
    fn from_iter<T: IntoIterator<Item = Dataset>>(iter: T) -> Self {
        let mut registry = Self::new();
        for dataset in iter {
            registry.insert(dataset);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ColumnType;

    fn dataset(name: &str, ids: &[&str]) -> Dataset {
        Dataset::builder(name)
            .column("id", ColumnType::Text, ids.iter().copied())
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = DatasetRegistry::new().with_dataset(dataset("equipment", &["E1"]));
        assert!(registry.contains("equipment"));
        assert_eq!(registry.get("equipment").unwrap().row_count(), 1);
        assert!(registry.get("sensor_readings").is_none());

        let replaced = registry.insert(dataset("equipment", &["E1", "E2"]));
        assert_eq!(replaced.unwrap().row_count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_from_iterator() {
        let registry: DatasetRegistry = vec![dataset("b", &[]), dataset("a", &["x"])]
            .into_iter()
            .collect();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
