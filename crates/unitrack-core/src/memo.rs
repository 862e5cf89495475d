//! Value-equality memoization for derived metrics.
//!
//! Consumers that re-render on every change can hold a [`MetricsCache`] and
//! skip recomputation when neither the records nor the curriculum changed.
//! The engine functions themselves stay stateless.

use crate::model::{CourseRecord, CurriculumConfig};
use crate::report::DerivedMetrics;

#[derive(Debug, Clone)]
struct CacheEntry {
    records: Vec<CourseRecord>,
    curriculum: CurriculumConfig,
    external_hours: u32,
    derived: DerivedMetrics,
}

/// Single-entry cache keyed by the full input values.
#[derive(Debug, Clone, Default)]
pub struct MetricsCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return metrics for the inputs, recomputing only when they differ from
    /// the previous call.
    pub fn get_or_compute(
        &mut self,
        records: &[CourseRecord],
        curriculum: &CurriculumConfig,
        external_hours: u32,
    ) -> &DerivedMetrics {
        let fresh = match &self.entry {
            Some(entry) => {
                entry.external_hours == external_hours
                    && entry.curriculum == *curriculum
                    && entry.records == records
            }
            None => false,
        };

        if fresh {
            self.hits += 1;
            tracing::debug!(hits = self.hits, "metrics cache hit");
        } else {
            self.misses += 1;
            tracing::debug!(misses = self.misses, "metrics cache miss");
            self.entry = None;
        }

        &self
            .entry
            .get_or_insert_with(|| CacheEntry {
                records: records.to_vec(),
                curriculum: curriculum.clone(),
                external_hours,
                derived: DerivedMetrics::compute(records, curriculum, external_hours),
            })
            .derived
    }

    /// Drop the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn records() -> Vec<CourseRecord> {
        vec![
            CourseRecord::new("2022.1", "A", Category::Mandatory, 60).with_grade(8.0),
            CourseRecord::new("2022.2", "B", Category::Mandatory, 60).with_grade(6.0),
        ]
    }

    #[test]
    fn equal_inputs_hit_the_cache() {
        let curriculum = CurriculumConfig::new("c", 600);
        let mut cache = MetricsCache::new();

        let first = cache.get_or_compute(&records(), &curriculum, 0).clone();
        let second = cache.get_or_compute(&records(), &curriculum, 0).clone();
        assert_eq!(first, second);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn changed_inputs_recompute() {
        let curriculum = CurriculumConfig::new("c", 600);
        let mut cache = MetricsCache::new();
        cache.get_or_compute(&records(), &curriculum, 0);

        let mut changed = records();
        changed[1].grade = Some(10.0);
        let cr = cache.get_or_compute(&changed, &curriculum, 0).metrics.cr;
        assert_eq!(cr, 9.0);

        cache.get_or_compute(&changed, &CurriculumConfig::new("other", 600), 0);
        cache.get_or_compute(&changed, &CurriculumConfig::new("other", 600), 5);
        assert_eq!(cache.misses(), 4);
        assert_eq!(cache.hits(), 0);

        cache.invalidate();
        cache.get_or_compute(&changed, &CurriculumConfig::new("other", 600), 5);
        assert_eq!(cache.misses(), 5);
    }
}
