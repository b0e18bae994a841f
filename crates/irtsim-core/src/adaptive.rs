//! Adaptive test simulator.
//!
//! Each step scores every unadministered item by its information at the
//! current ability estimate, administers the most informative one, simulates
//! the examinee's response from their true ability, and nudges the estimate
//! with a fixed-step rule:
//!
//! - correct: `θ̂ += (1 - p) · 0.5`
//! - incorrect: `θ̂ -= p · 0.5`
//!
//! where `p` is the administered item's response probability at the
//! pre-update estimate. This is a heuristic, not maximum-likelihood or
//! Bayesian scoring.
//!
//! The session stops after a fixed number of items. There is no
//! precision-based stopping rule.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{IrtError, Result};
use crate::model::{Examinee, Item, ItemPool};
use crate::traits::{LinePlot, PlotSink, ReferenceLine, Series, Table, TableSink};

/// Step size of the fixed-step estimate update.
pub const UPDATE_STEP: f64 = 0.5;
/// Starting ability estimate (middle of the scale).
pub const INITIAL_ESTIMATE: f64 = 0.0;

/// Table name of the exported session history.
pub const RESULTS_TABLE: &str = "adaptive_results";
/// Plot name of the exported estimate trajectory.
pub const CONVERGENCE_PLOT: &str = "adaptive_testing_convergence";

/// One administered item and what happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdministeredItem {
    /// 1-based position in the session.
    pub item_number: usize,
    pub item_id: usize,
    pub difficulty: f64,
    pub discrimination: f64,
    pub guessing: f64,
    /// Information of the item at the estimate it was selected under.
    pub information: f64,
    /// `1` for correct, `0` for incorrect.
    pub response: u8,
    /// Ability estimate after the update.
    pub estimate_after: f64,
}

/// Observer for session progress.
pub trait StepReporter {
    fn on_item_administered(&self, step: &AdministeredItem);
    fn on_session_complete(&self, result: &AdaptiveResult);
}

/// No-op step reporter.
pub struct NoopReporter;

impl StepReporter for NoopReporter {
    fn on_item_administered(&self, _: &AdministeredItem) {}
    fn on_session_complete(&self, _: &AdaptiveResult) {}
}

/// Fixed-step estimate update for one response.
pub fn update_estimate(estimate: f64, item: &Item, response: u8) -> f64 {
    let p = item.probability(estimate);
    if response == 1 {
        estimate + (1.0 - p) * UPDATE_STEP
    } else {
        estimate - p * UPDATE_STEP
    }
}

/// Most informative item at `theta` among `candidates`.
///
/// Ties on exactly equal information go to the lowest item id, regardless of
/// candidate order.
pub fn select_max_information<'a, I>(theta: f64, candidates: I) -> Option<(&'a Item, f64)>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut best: Option<(&Item, f64)> = None;
    for item in candidates {
        let info = item.information(theta);
        best = match best {
            Some((current, best_info))
                if best_info > info || (best_info == info && current.id() < item.id()) =>
            {
                Some((current, best_info))
            }
            _ => Some((item, info)),
        };
    }
    best
}

/// State of one examinee's adaptive session over a borrowed pool.
#[derive(Debug, Clone)]
pub struct AdaptiveSession<'a> {
    pool: &'a ItemPool,
    examinee: Examinee,
    estimate: f64,
    administered: HashSet<usize>,
    history: Vec<AdministeredItem>,
    trajectory: Vec<f64>,
}

impl<'a> AdaptiveSession<'a> {
    pub fn new(pool: &'a ItemPool, examinee: Examinee) -> Self {
        Self {
            pool,
            examinee,
            estimate: INITIAL_ESTIMATE,
            administered: HashSet::with_capacity(pool.len()),
            history: Vec::new(),
            trajectory: vec![INITIAL_ESTIMATE],
        }
    }

    pub fn examinee(&self) -> Examinee {
        self.examinee
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn history(&self) -> &[AdministeredItem] {
        &self.history
    }

    /// Estimates so far, starting with the initial one.
    pub fn trajectory(&self) -> &[f64] {
        &self.trajectory
    }

    /// Items not yet administered, in pool order.
    pub fn available(&self) -> impl Iterator<Item = &'a Item> + '_ {
        self.pool
            .items()
            .iter()
            .filter(move |item| !self.administered.contains(&item.id()))
    }

    pub fn remaining(&self) -> usize {
        self.pool.len() - self.administered.len()
    }

    /// The item the next step would administer, with its information.
    pub fn select_next(&self) -> Result<(&'a Item, f64)> {
        select_max_information(self.estimate, self.available()).ok_or(IrtError::PoolExhausted {
            requested: self.history.len() + 1,
            available: self.pool.len(),
        })
    }

    /// Administer one item. Consumes one draw from `rng`.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<AdministeredItem> {
        let (item, information) = self.select_next()?;
        let response = item.simulate_response(rng, self.examinee.true_ability);

        self.administered.insert(item.id());
        let estimate_before = self.estimate;
        self.estimate = update_estimate(estimate_before, item, response);
        self.trajectory.push(self.estimate);

        let record = AdministeredItem {
            item_number: self.history.len() + 1,
            item_id: item.id(),
            difficulty: item.difficulty(),
            discrimination: item.discrimination(),
            guessing: item.guessing(),
            information,
            response,
            estimate_after: self.estimate,
        };
        self.history.push(record);

        tracing::debug!(
            item_number = record.item_number,
            item_id = record.item_id,
            information,
            response,
            estimate_before,
            estimate_after = self.estimate,
            "administered item"
        );
        Ok(record)
    }

    pub fn finish(self) -> AdaptiveResult {
        AdaptiveResult {
            true_ability: self.examinee.true_ability,
            history: self.history,
            trajectory: self.trajectory,
        }
    }
}

/// Outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveResult {
    pub true_ability: f64,
    pub history: Vec<AdministeredItem>,
    /// Estimates after each step, with the initial estimate first; one longer
    /// than `history`.
    pub trajectory: Vec<f64>,
}

impl AdaptiveResult {
    pub fn final_estimate(&self) -> f64 {
        self.trajectory.last().copied().unwrap_or(INITIAL_ESTIMATE)
    }

    pub fn administered_ids(&self) -> Vec<usize> {
        self.history.iter().map(|h| h.item_id).collect()
    }

    /// `item_number, item_id, difficulty, response`.
    pub fn results_table(&self) -> Table {
        let header = ["item_number", "item_id", "difficulty", "response"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut table = Table::new(RESULTS_TABLE, header);
        for h in &self.history {
            table.push_row(vec![
                h.item_number.to_string(),
                h.item_id.to_string(),
                h.difficulty.to_string(),
                h.response.to_string(),
            ]);
        }
        table
    }

    /// Estimate vs. number of items administered, with the true ability as a
    /// reference line.
    pub fn convergence_plot(&self) -> LinePlot {
        let points = self
            .trajectory
            .iter()
            .enumerate()
            .map(|(i, &est)| (i as f64, est))
            .collect();
        LinePlot {
            name: CONVERGENCE_PLOT.to_string(),
            title: "Adaptive Testing: Ability Estimate Convergence".to_string(),
            x_label: "Number of Items Administered".to_string(),
            y_label: "Ability Estimate (θ)".to_string(),
            series: vec![Series::new("Ability estimate", points).with_markers()],
            reference_lines: vec![ReferenceLine {
                label: format!("True Ability = {}", self.true_ability),
                y: self.true_ability,
            }],
        }
    }

    /// Hand the results table and the convergence plot to their sinks.
    pub fn export<T, P>(&self, tables: &mut T, plots: &mut P) -> anyhow::Result<()>
    where
        T: TableSink + ?Sized,
        P: PlotSink + ?Sized,
    {
        tables.write_table(&self.results_table())?;
        plots.render(&self.convergence_plot())?;
        Ok(())
    }
}

/// Run a fixed-length session of `max_items` steps.
///
/// Fails with [`IrtError::InvalidParameter`] when `max_items` is zero and with
/// [`IrtError::PoolExhausted`] when the pool is smaller than `max_items`;
/// both checks happen before any random draw, so a failed run leaves no
/// partial result.
pub fn run_adaptive_test<R: Rng + ?Sized>(
    pool: &ItemPool,
    true_ability: f64,
    max_items: usize,
    rng: &mut R,
    reporter: &dyn StepReporter,
) -> Result<AdaptiveResult> {
    if max_items == 0 {
        return Err(IrtError::invalid("max_items", "must be greater than zero"));
    }
    if !true_ability.is_finite() {
        return Err(IrtError::invalid(
            "true_ability",
            format!("must be finite, got {true_ability}"),
        ));
    }
    if max_items > pool.len() {
        return Err(IrtError::PoolExhausted {
            requested: max_items,
            available: pool.len(),
        });
    }

    tracing::info!(
        true_ability,
        max_items,
        pool_size = pool.len(),
        "starting adaptive session"
    );

    let mut session = AdaptiveSession::new(
        pool,
        Examinee {
            id: 1,
            true_ability,
        },
    );
    for _ in 0..max_items {
        let step = session.step(rng)?;
        reporter.on_item_administered(&step);
    }

    let result = session.finish();
    tracing::info!(
        final_estimate = result.final_estimate(),
        "adaptive session complete"
    );
    reporter.on_session_complete(&result);
    Ok(result)
}
