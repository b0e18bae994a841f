//! Descriptive statistics for generated data and adaptive sessions.
//!
//! Classical test-theory summaries only; nothing here estimates IRT
//! parameters.

use serde::{Deserialize, Serialize};

use crate::adaptive::AdaptiveResult;
use crate::generator::GeneratedData;
use crate::model::ResponseMatrix;

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0.0` for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Share of students answering each item correctly, in item order.
pub fn item_proportions(responses: &ResponseMatrix) -> Vec<f64> {
    let (n_students, n_items) = responses.shape();
    let mut correct = vec![0usize; n_items];
    for row in responses.rows() {
        for (j, &outcome) in row.iter().enumerate() {
            correct[j] += outcome as usize;
        }
    }
    correct
        .into_iter()
        .map(|c| c as f64 / n_students.max(1) as f64)
        .collect()
}

/// Number of correct responses per student, in student order.
pub fn raw_scores(responses: &ResponseMatrix) -> Vec<usize> {
    responses
        .rows()
        .map(|row| row.iter().map(|&o| o as usize).sum())
        .collect()
}

/// Summary of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item_id: usize,
    pub difficulty: f64,
    pub discrimination: f64,
    pub guessing: f64,
    /// Observed proportion correct.
    pub proportion_correct: f64,
}

/// Summary of a generated data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub n_students: usize,
    pub n_items: usize,
    pub ability_mean: f64,
    pub ability_std_dev: f64,
    pub mean_raw_score: f64,
    pub items: Vec<ItemSummary>,
}

impl GenerationSummary {
    pub fn compute(data: &GeneratedData) -> Self {
        let (n_students, n_items) = data.responses.shape();
        let proportions = item_proportions(&data.responses);
        let scores: Vec<f64> = raw_scores(&data.responses)
            .into_iter()
            .map(|s| s as f64)
            .collect();

        let items = data
            .items
            .iter()
            .zip(proportions)
            .map(|(item, proportion_correct)| ItemSummary {
                item_id: item.id(),
                difficulty: item.difficulty(),
                discrimination: item.discrimination(),
                guessing: item.guessing(),
                proportion_correct,
            })
            .collect();

        Self {
            n_students,
            n_items,
            ability_mean: mean(&data.abilities),
            ability_std_dev: std_dev(&data.abilities),
            mean_raw_score: mean(&scores),
            items,
        }
    }
}

/// Summary of an adaptive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSummary {
    pub items_administered: usize,
    pub correct: usize,
    pub true_ability: f64,
    pub final_estimate: f64,
    pub absolute_error: f64,
}

impl AdaptiveSummary {
    pub fn compute(result: &AdaptiveResult) -> Self {
        let final_estimate = result.final_estimate();
        Self {
            items_administered: result.history.len(),
            correct: result
                .history
                .iter()
                .filter(|h| h.response == 1)
                .count(),
            true_ability: result.true_ability,
            final_estimate,
            absolute_error: (final_estimate - result.true_ability).abs(),
        }
    }
}
