//! Outcome predictor
//!
//! Narrows the historical dataset to the rows that exactly match the
//! submitted fields, then takes the most common violation and stop outcome
//! among them. This is a lookup over past stops, not a trained model.
//!
//! Ties between equally frequent values go to the value seen first in
//! dataset order (rows are loaded ordered by `id`).

use std::collections::HashMap;

use crate::models::{FilterCriteria, Prediction, StopRecord, FALLBACK_OUTCOME, FALLBACK_VIOLATION};

/// Rows matching every set criterion. Age matches exactly, no bucketing.
pub fn filter<'a>(dataset: &'a [StopRecord], criteria: &FilterCriteria) -> Vec<&'a StopRecord> {
    dataset.iter().filter(|row| matches(row, criteria)).collect()
}

fn matches(row: &StopRecord, criteria: &FilterCriteria) -> bool {
    let gender = criteria
        .gender
        .map_or(true, |g| row.driver_gender.as_deref() == Some(g.as_str()));
    let age = criteria.age.map_or(true, |a| row.driver_age == Some(a));
    let searched = criteria
        .search_conducted
        .map_or(true, |s| row.search_conducted == Some(s));
    let drugs = criteria
        .drug_related
        .map_or(true, |d| row.drug_related_stop == Some(d));
    let duration = criteria
        .stop_duration
        .as_deref()
        .map_or(true, |d| row.stop_duration.as_deref() == Some(d));

    gender && age && searched && drugs && duration
}

/// Most frequent non-null value; ties resolved by first occurrence.
pub fn mode<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    // value -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, value) in values.into_iter().enumerate() {
        if let Some(value) = value {
            counts.entry(value).or_insert((0, pos)).0 += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Predict violation and outcome, along with how many rows matched. Never
/// fails: an empty match set (or an empty dataset) yields `Speeding` / `Warning`.
pub fn predict(dataset: &[StopRecord], criteria: &FilterCriteria) -> (Prediction, usize) {
    let matched = filter(dataset, criteria);
    (from_subset(&matched), matched.len())
}

fn from_subset(matched: &[&StopRecord]) -> Prediction {
    let violation = mode(matched.iter().map(|r| r.violation.as_deref()));
    let outcome = mode(matched.iter().map(|r| r.stop_outcome.as_deref()));

    Prediction {
        predicted_violation: violation.unwrap_or(FALLBACK_VIOLATION).to_string(),
        predicted_outcome: outcome.unwrap_or(FALLBACK_OUTCOME).to_string(),
    }
}

/// Distinct non-null stop durations in first-seen order.
pub fn distinct_durations(dataset: &[StopRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for duration in dataset.iter().filter_map(|r| r.stop_duration.as_deref()) {
        if !seen.iter().any(|d| d == duration) {
            seen.push(duration.to_string());
        }
    }
    seen
}
