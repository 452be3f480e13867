use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::CleanedRecord;

/// Spread of `data_quality_score` across a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QualityStats {
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summary of the present values of a numeric field (price or area).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValueStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// What a `clean_batch` call did, for logs and for the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleaningReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub processed_count: usize,
    pub duplicate_count: usize,
    pub unique_count: usize,
    /// Records with a title, a city and a price or area
    pub listable_count: usize,
    /// Seen-set lookups that failed and were treated as first sightings
    pub dedup_store_errors: usize,
    /// `None` for an empty batch
    pub quality: Option<QualityStats>,
    pub price: Option<ValueStats>,
    pub area: Option<ValueStats>,
}

impl CleaningReport {
    pub fn build(
        records: &[CleanedRecord],
        listable_count: usize,
        dedup_store_errors: usize,
    ) -> Self {
        let duplicate_count = records.iter().filter(|r| r.is_duplicate).count();

        let scores: Vec<f64> = records.iter().map(|r| r.data_quality_score).collect();
        let prices: Vec<f64> = records.iter().filter_map(|r| r.price_pkr).collect();
        let areas: Vec<f64> = records.iter().filter_map(|r| r.area_size).collect();

        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            processed_count: records.len(),
            duplicate_count,
            unique_count: records.len() - duplicate_count,
            listable_count,
            dedup_store_errors,
            quality: quality_stats(scores),
            price: value_stats(prices),
            area: value_stats(areas),
        }
    }
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

fn quality_stats(scores: Vec<f64>) -> Option<QualityStats> {
    if scores.is_empty() {
        return None;
    }
    let scores = sorted(scores);
    Some(QualityStats {
        mean: mean(&scores),
        min: scores[0],
        q1: quantile(&scores, 0.25),
        median: quantile(&scores, 0.5),
        q3: quantile(&scores, 0.75),
        max: scores[scores.len() - 1],
    })
}

fn value_stats(values: Vec<f64>) -> Option<ValueStats> {
    if values.is_empty() {
        return None;
    }
    let values = sorted(values);
    Some(ValueStats {
        count: values.len(),
        mean: mean(&values),
        median: quantile(&values, 0.5),
        min: values[0],
        max: values[values.len() - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 1.0), 4.0);
        assert_eq!(quantile(&[7.0], 0.75), 7.0);
    }

    #[test]
    fn stats_sort_their_input() {
        let stats = value_stats(vec![30.0, 10.0, 20.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.median, 20.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.mean, 20.0);
    }

    #[test]
    fn empty_inputs_skip_quantiles() {
        assert_eq!(quality_stats(Vec::new()), None);
        assert_eq!(value_stats(Vec::new()), None);
        let single = quality_stats(vec![0.7]).unwrap();
        assert_eq!((single.q1, single.median, single.q3), (0.7, 0.7, 0.7));
    }

    #[test]
    fn empty_batch_has_no_stats() {
        let report = CleaningReport::build(&[], 0, 0);
        assert_eq!(report.processed_count, 0);
        assert!(report.quality.is_none());
        assert!(report.price.is_none());
        assert!(report.area.is_none());
    }
}
