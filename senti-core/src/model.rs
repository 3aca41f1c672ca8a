//! Model providers: turn a feature vector into a label and a class distribution.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ModelError, Result};
use crate::vectorizer::SparseVector;

/// Per-class scores; sentiment models rarely have more than a handful of classes.
pub type ClassScores = SmallVec<[f32; 4]>;

/// A fitted classifier queried once per request.
///
/// # Preconditions
///
/// The service shares one instance across every request handler and never
/// locks around it. Implementations must be `Send + Sync` and `predict` /
/// `predict_proba` must be re-entrant.
///
/// `predict` is expected to return the class whose probability is the
/// maximum of `predict_proba`. The service reports that maximum as the
/// confidence without relying on the two agreeing.
pub trait ModelProvider: Send + Sync {
    /// Class labels, in the order used by [`predict_proba`](Self::predict_proba).
    fn classes(&self) -> &[String];

    /// Predicts the label of a single vector.
    fn predict(&self, x: &SparseVector) -> Result<String>;

    /// Returns one probability per class.
    fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f32>>;
}

/// How class probabilities are derived from decision scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    /// Softmax over all decision scores.
    #[default]
    Multinomial,
    /// Independent sigmoids, rescaled to sum to one.
    Ovr,
}

/// Linear classifier (logistic regression family).
///
/// Holds one coefficient row and intercept per class. For two classes a single
/// row may be given; it scores the second class against the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    classes: Vec<String>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
    #[serde(default)]
    multi_class: MultiClass,
}

#[inline(always)]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximum, `None` for an empty slice.
pub(crate) fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

impl LinearClassifier {
    /// Creates a classifier and validates its shape.
    pub fn new(
        classes: Vec<String>,
        coef: Vec<Vec<f32>>,
        intercept: Vec<f32>,
        multi_class: MultiClass,
    ) -> Result<Self> {
        let model = Self {
            classes,
            coef,
            intercept,
            multi_class,
        };
        model.validate()?;
        Ok(model)
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    #[inline]
    fn is_binary_row(&self) -> bool {
        self.classes.len() == 2 && self.coef.len() == 1
    }

    /// Checks class count, row count, row width and that every weight is finite.
    pub fn validate(&self) -> Result<()> {
        if self.classes.len() < 2 {
            return Err(ModelError::Shape(format!(
                "at least 2 classes required, got {}",
                self.classes.len()
            )));
        }

        let rows = self.coef.len();
        if !(rows == self.classes.len() || self.is_binary_row()) {
            return Err(ModelError::Shape(format!(
                "{} coefficient rows for {} classes",
                rows,
                self.classes.len()
            )));
        }

        if self.intercept.len() != rows {
            return Err(ModelError::Shape(format!(
                "{} intercepts for {} coefficient rows",
                self.intercept.len(),
                rows
            )));
        }

        let width = self.n_features();
        if let Some(row) = self.coef.iter().find(|row| row.len() != width) {
            return Err(ModelError::Shape(format!(
                "ragged coefficients: row of {} features, expected {}",
                row.len(),
                width
            )));
        }

        let finite = self
            .coef
            .iter()
            .flatten()
            .chain(&self.intercept)
            .all(|w| w.is_finite());
        if !finite {
            return Err(ModelError::Shape("non-finite weight".to_string()));
        }

        Ok(())
    }

    /// Raw decision score per coefficient row.
    pub fn decision_function(&self, x: &SparseVector) -> Result<ClassScores> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row).map(|d| d + b))
            .collect()
    }
}

impl ModelProvider for LinearClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, x: &SparseVector) -> Result<String> {
        let scores = self.decision_function(x)?;

        let index = if self.is_binary_row() {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores).ok_or(ModelError::EmptyDistribution)?
        };

        self.classes
            .get(index)
            .cloned()
            .ok_or(ModelError::EmptyDistribution)
    }

    fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f32>> {
        let scores = self.decision_function(x)?;

        if self.is_binary_row() {
            let p = sigmoid(scores[0]);
            return Ok(vec![1.0 - p, p]);
        }

        let proba = match self.multi_class {
            MultiClass::Multinomial => softmax(&scores),
            MultiClass::Ovr => {
                let raw: Vec<f32> = scores.iter().map(|&s| sigmoid(s)).collect();
                let sum: f32 = raw.iter().sum();
                raw.into_iter().map(|p| p / sum).collect()
            }
        };
        Ok(proba)
    }
}
