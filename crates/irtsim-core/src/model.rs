//! Core data model types for irtsim.
//!
//! Items, examinees, responses and the item pool that the generator and the
//! adaptive simulator share.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::curves::linspace;
use crate::error::{IrtError, Result};
use crate::probability;

/// IRT model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Difficulty only.
    #[serde(rename = "1PL")]
    OnePL,
    /// Difficulty and discrimination.
    #[serde(rename = "2PL")]
    TwoPL,
    /// Difficulty, discrimination and guessing.
    #[serde(rename = "3PL")]
    ThreePL,
}

impl ModelKind {
    /// Whether item discriminations are free parameters.
    pub fn has_discrimination(self) -> bool {
        matches!(self, ModelKind::TwoPL | ModelKind::ThreePL)
    }

    /// Whether item guessing parameters are free parameters.
    pub fn has_guessing(self) -> bool {
        matches!(self, ModelKind::ThreePL)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::OnePL => write!(f, "1PL"),
            ModelKind::TwoPL => write!(f, "2PL"),
            ModelKind::ThreePL => write!(f, "3PL"),
        }
    }
}

impl FromStr for ModelKind {
    type Err = IrtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "1PL" => Ok(ModelKind::OnePL),
            "2PL" => Ok(ModelKind::TwoPL),
            "3PL" => Ok(ModelKind::ThreePL),
            _ => Err(IrtError::InvalidModelKind(s.to_string())),
        }
    }
}

/// A test item with its logistic parameters.
///
/// Fields are private so every `Item` has passed validation: finite
/// difficulty, finite positive discrimination, guessing in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Item {
    id: usize,
    difficulty: f64,
    discrimination: f64,
    guessing: f64,
}

impl Item {
    /// Build a 3PL item.
    pub fn new(id: usize, difficulty: f64, discrimination: f64, guessing: f64) -> Result<Self> {
        if !difficulty.is_finite() {
            return Err(IrtError::invalid(
                "difficulty",
                format!("must be finite, got {difficulty}"),
            ));
        }
        if !discrimination.is_finite() || discrimination <= 0.0 {
            return Err(IrtError::invalid(
                "discrimination",
                format!("must be finite and greater than zero, got {discrimination}"),
            ));
        }
        if !(0.0..1.0).contains(&guessing) {
            return Err(IrtError::invalid(
                "guessing",
                format!("must lie in [0, 1), got {guessing}"),
            ));
        }
        Ok(Self {
            id,
            difficulty,
            discrimination,
            guessing,
        })
    }

    /// Build a 1PL item (`a = 1`, `c = 0`).
    pub fn one_pl(id: usize, difficulty: f64) -> Result<Self> {
        Self::new(id, difficulty, 1.0, 0.0)
    }

    /// Build a 2PL item (`c = 0`).
    pub fn two_pl(id: usize, difficulty: f64, discrimination: f64) -> Result<Self> {
        Self::new(id, difficulty, discrimination, 0.0)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn discrimination(&self) -> f64 {
        self.discrimination
    }

    pub fn guessing(&self) -> f64 {
        self.guessing
    }

    /// Column label used in exported tables (`item_<id>`).
    pub fn label(&self) -> String {
        format!("item_{}", self.id)
    }

    /// Probability of a correct response at `theta`.
    pub fn probability(&self, theta: f64) -> f64 {
        probability::probability(theta, self.difficulty, self.discrimination, self.guessing)
    }

    /// Item information at `theta`.
    pub fn information(&self, theta: f64) -> f64 {
        probability::information(theta, self.difficulty, self.discrimination, self.guessing)
    }

    /// Simulate a response of an examinee with ability `theta`.
    pub fn simulate_response<R: Rng + ?Sized>(&self, rng: &mut R, theta: f64) -> u8 {
        probability::simulate_response(
            rng,
            theta,
            self.difficulty,
            self.discrimination,
            self.guessing,
        )
    }
}

/// A simulated test taker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Examinee {
    /// 1-based identifier.
    pub id: usize,
    /// True latent ability; never observed by the adaptive simulator.
    pub true_ability: f64,
}

/// A single scored response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub student_id: usize,
    pub item_id: usize,
    /// `1` for correct, `0` for incorrect.
    pub outcome: u8,
}

/// Dense `n_students × n_items` matrix of dichotomous outcomes, stored
/// row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseMatrix {
    n_students: usize,
    n_items: usize,
    cells: Vec<u8>,
}

impl ResponseMatrix {
    pub(crate) fn with_capacity(n_students: usize, n_items: usize) -> Self {
        Self {
            n_students,
            n_items,
            cells: Vec::with_capacity(n_students * n_items),
        }
    }

    pub(crate) fn push(&mut self, outcome: u8) {
        debug_assert!(self.cells.len() < self.n_students * self.n_items);
        self.cells.push(outcome);
    }

    /// Build a matrix from explicit rows. Rows must be non-empty, of equal
    /// length, and contain only `0`/`1`.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let n_students = rows.len();
        let n_items = rows.first().map(Vec::len).unwrap_or(0);
        if n_students == 0 || n_items == 0 {
            return Err(IrtError::invalid("rows", "matrix must not be empty"));
        }
        let mut cells = Vec::with_capacity(n_students * n_items);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_items {
                return Err(IrtError::invalid(
                    "rows",
                    format!("row {i} has {} columns, expected {n_items}", row.len()),
                ));
            }
            if let Some(bad) = row.iter().find(|&&v| v > 1) {
                return Err(IrtError::invalid(
                    "rows",
                    format!("row {i} contains non-binary outcome {bad}"),
                ));
            }
            cells.extend(row);
        }
        Ok(Self {
            n_students,
            n_items,
            cells,
        })
    }

    /// `(n_students, n_items)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_students, self.n_items)
    }

    pub fn get(&self, student: usize, item: usize) -> Option<u8> {
        if student >= self.n_students || item >= self.n_items {
            return None;
        }
        self.cells.get(student * self.n_items + item).copied()
    }

    /// All outcomes of one student, in item order.
    pub fn row(&self, student: usize) -> Option<&[u8]> {
        if student >= self.n_students {
            return None;
        }
        let start = student * self.n_items;
        self.cells.get(start..start + self.n_items)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.n_items.max(1))
    }

    /// Iterate over every response with 1-based student and item ids.
    pub fn responses(&self) -> impl Iterator<Item = Response> + '_ {
        self.rows().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &outcome)| Response {
                student_id: i + 1,
                item_id: j + 1,
                outcome,
            })
        })
    }
}

/// A bank of items available to an adaptive session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPool {
    items: Vec<Item>,
}

impl ItemPool {
    /// Build a pool, rejecting duplicate item ids.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(IrtError::invalid(
                    "item_pool",
                    format!("duplicate item id {}", item.id()),
                ));
            }
        }
        Ok(Self { items })
    }

    /// The classic demonstration pool: ids `1..=size`, difficulties spread
    /// evenly over `[-3, 3]`, discriminations drawn from `U(0.7, 1.8)` and
    /// then guessing parameters from `U(0, 0.25)`.
    pub fn demonstration<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        if size == 0 {
            return Err(IrtError::invalid("pool_size", "must be greater than zero"));
        }
        let difficulties = linspace(-3.0, 3.0, size);
        let a_dist = Uniform::new(0.7, 1.8);
        let c_dist = Uniform::new(0.0, 0.25);
        let discriminations: Vec<f64> = (0..size).map(|_| a_dist.sample(rng)).collect();
        let guessing: Vec<f64> = (0..size).map(|_| c_dist.sample(rng)).collect();

        let items = difficulties
            .into_iter()
            .zip(discriminations)
            .zip(guessing)
            .enumerate()
            .map(|(j, ((b, a), c))| Item::new(j + 1, b, a, c))
            .collect::<Result<Vec<_>>>()?;
        Self::new(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn model_kind_display_and_parse() {
        assert_eq!(ModelKind::OnePL.to_string(), "1PL");
        assert_eq!(ModelKind::ThreePL.to_string(), "3PL");
        assert_eq!("2PL".parse::<ModelKind>().unwrap(), ModelKind::TwoPL);
        assert_eq!("3pl".parse::<ModelKind>().unwrap(), ModelKind::ThreePL);
        assert_eq!(" 1PL ".parse::<ModelKind>().unwrap(), ModelKind::OnePL);
        assert_eq!(
            "4PL".parse::<ModelKind>(),
            Err(IrtError::InvalidModelKind("4PL".into()))
        );
        assert!("".parse::<ModelKind>().is_err());
    }

    #[test]
    fn model_kind_serde_uses_tags() {
        let json = serde_json::to_string(&ModelKind::TwoPL).unwrap();
        assert_eq!(json, "\"2PL\"");
        let parsed: ModelKind = serde_json::from_str("\"3PL\"").unwrap();
        assert_eq!(parsed, ModelKind::ThreePL);
    }

    #[test]
    fn item_validation() {
        assert!(Item::new(1, 0.0, 1.0, 0.0).is_ok());
        assert!(Item::new(1, 0.0, 0.0, 0.0).is_err());
        assert!(Item::new(1, 0.0, -1.0, 0.0).is_err());
        assert!(Item::new(1, 0.0, 1.0, 1.0).is_err());
        assert!(Item::new(1, 0.0, 1.0, -0.1).is_err());
        assert!(Item::new(1, f64::NAN, 1.0, 0.0).is_err());
        assert!(Item::new(1, 0.0, f64::INFINITY, 0.0).is_err());

        let err = Item::new(3, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, IrtError::InvalidParameter { ref name, .. } if name == "discrimination"));
    }

    #[test]
    fn item_defaults() {
        let item = Item::one_pl(4, 0.5).unwrap();
        assert_eq!(item.discrimination(), 1.0);
        assert_eq!(item.guessing(), 0.0);
        assert_eq!(item.label(), "item_4");
        assert_eq!(item.probability(0.5), 0.5);

        let item = Item::two_pl(5, 0.0, 2.0).unwrap();
        assert_eq!(item.guessing(), 0.0);
        assert_eq!(item.information(0.0), 1.0);
    }

    #[test]
    fn response_matrix_from_rows() {
        let m = ResponseMatrix::from_rows(vec![vec![1, 0, 1], vec![0, 0, 1]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2), Some(1));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(0), Some(&[1, 0, 1][..]));
        assert_eq!(m.row(1), Some(&[0, 0, 1][..]));
        assert_eq!(m.row(2), None);
        assert_eq!(m.rows().count(), 2);

        let responses: Vec<Response> = m.responses().collect();
        assert_eq!(responses.len(), 6);
        assert_eq!(
            responses[4],
            Response {
                student_id: 2,
                item_id: 2,
                outcome: 0
            }
        );

        assert!(ResponseMatrix::from_rows(vec![]).is_err());
        assert!(ResponseMatrix::from_rows(vec![vec![1], vec![1, 0]]).is_err());
        assert!(ResponseMatrix::from_rows(vec![vec![2]]).is_err());
    }

    #[test]
    fn pool_rejects_duplicate_ids() {
        let items = vec![
            Item::one_pl(1, 0.0).unwrap(),
            Item::one_pl(1, 1.0).unwrap(),
        ];
        assert!(ItemPool::new(items).is_err());
    }

    #[test]
    fn demonstration_pool_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let pool = ItemPool::demonstration(20, &mut rng).unwrap();
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.items()[0].difficulty(), -3.0);
        assert_eq!(pool.items()[19].difficulty(), 3.0);
        for (j, item) in pool.items().iter().enumerate() {
            assert_eq!(item.id(), j + 1);
            assert!((0.7..1.8).contains(&item.discrimination()));
            assert!((0.0..0.25).contains(&item.guessing()));
        }
        assert_eq!(pool.get(7).map(Item::id), Some(7));
        assert!(pool.get(21).is_none());

        assert!(ItemPool::demonstration(0, &mut rng).is_err());
    }
}
