//! CART regression tree (squared-error splits).
//!
//! Shared by the single-tree model, the forest and the boosted ensemble.

use ndarray::{Array2, ArrayView1};

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    /// Nodes with fewer rows become leaves
    pub min_samples_split: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    /// Total squared-error reduction per feature
    gains: Vec<f64>,
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct Grower<'a> {
    x: &'a Array2<f64>,
    y: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
    gains: Vec<f64>,
}

impl RegressionTree {
    /// Fit on the given row indices; repeated indices act as sample weights
    pub fn fit(x: &Array2<f64>, y: &[f64], rows: &[usize], params: TreeParams) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(AnalysisError::DataShape(format!(
                "{} feature rows but {} targets",
                x.nrows(),
                y.len()
            )));
        }
        if rows.is_empty() {
            return Err(AnalysisError::DataShape("cannot fit a tree on zero rows".into()));
        }

        let mut grower = Grower {
            x,
            y,
            params,
            nodes: Vec::new(),
            gains: vec![0.0; x.ncols()],
        };
        grower.grow(rows, 0);

        Ok(Self {
            nodes: grower.nodes,
            gains: grower.gains,
        })
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows().into_iter().map(|row| self.predict_row(row)).collect()
    }

    pub fn raw_gains(&self) -> &[f64] {
        &self.gains
    }

    /// Impurity-based importances summing to 1 (all zero for a single leaf)
    pub fn feature_importances(&self) -> Vec<f64> {
        normalize_importances(self.gains.clone())
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes[index] {
                Node::Leaf(_) => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Scale to unit sum, leaving an all-zero vector as is
pub(crate) fn normalize_importances(mut values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
    values
}

impl Grower<'_> {
    /// Grow the subtree for `rows` and return its node index
    fn grow(&mut self, rows: &[usize], depth: usize) -> usize {
        let n = rows.len() as f64;
        let sum: f64 = rows.iter().map(|&r| self.y[r]).sum();
        let mean = sum / n;

        let first = self.y[rows[0]];
        let pure = rows.iter().all(|&r| self.y[r] == first);

        if pure || depth >= self.params.max_depth || rows.len() < self.params.min_samples_split.max(2) {
            return self.leaf(mean);
        }

        let Some(split) = self.best_split(rows) else {
            return self.leaf(mean);
        };

        let index = self.leaf(mean);
        self.gains[split.feature] += split.gain;

        let (left, right): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&r| self.x[[r, split.feature]] <= split.threshold);

        let left = self.grow(&left, depth + 1);
        let right = self.grow(&right, depth + 1);

        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        index
    }

    fn leaf(&mut self, value: f64) -> usize {
        self.nodes.push(Node::Leaf(value));
        self.nodes.len() - 1
    }

    /// Largest squared-error reduction over all features and thresholds
    fn best_split(&self, rows: &[usize]) -> Option<Split> {
        let n = rows.len();
        let total_sum: f64 = rows.iter().map(|&r| self.y[r]).sum();
        let total_sq: f64 = rows.iter().map(|&r| self.y[r] * self.y[r]).sum();
        let parent_sse = sse(total_sum, total_sq, n as f64);

        let mut best: Option<Split> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..self.x.ncols() {
            pairs.clear();
            pairs.extend(rows.iter().map(|&r| (self.x[[r, feature]], self.y[r])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for i in 0..n - 1 {
                let (value, target) = pairs[i];
                left_sum += target;
                left_sq += target * target;

                let next = pairs[i + 1].0;
                if value == next {
                    continue;
                }

                let n_left = (i + 1) as f64;
                let n_right = (n - i - 1) as f64;
                let gain = parent_sse
                    - sse(left_sum, left_sq, n_left)
                    - sse(total_sum - left_sum, total_sq - left_sq, n_right);

                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

fn sse(sum: f64, sum_sq: f64, n: f64) -> f64 {
    (sum_sq - sum * sum / n).max(0.0)
}
