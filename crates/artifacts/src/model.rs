//! Scoring model artifacts.
//!
//! The model is trained offline and exported as JSON. Two families are
//! supported:
//!
//! ```json
//! {"kind": "linear", "intercept": 1200.0, "coefficients": {"year": 310.5, "model_bmw": 4200.0}}
//! ```
//!
//! ```json
//! {
//!   "kind": "tree_ensemble",
//!   "base_score": 0.0,
//!   "aggregation": "mean",
//!   "trees": [
//!     {"nodes": [
//!       {"feature": "year", "threshold": 2015.5, "left": 1, "right": 2},
//!       {"leaf": 9000.0},
//!       {"leaf": 21000.0}
//!     ]}
//!   ]
//! }
//! ```
//!
//! Column names are resolved against the [`FeatureSchema`] once, when the
//! artifact is bound, so prediction is plain index arithmetic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, Result};
use crate::schema::FeatureSchema;

/// Model artifact as it appears on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        intercept: f64,
        coefficients: BTreeMap<String, f64>,
    },
    TreeEnsemble {
        #[serde(default)]
        base_score: f64,
        #[serde(default)]
        aggregation: Aggregation,
        trees: Vec<TreeSpec>,
    },
}

/// How tree outputs are combined
///
/// `Mean` matches a random forest, `Sum` a gradient-boosted ensemble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Mean,
    Sum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

/// A model whose columns have been resolved against a schema
#[derive(Debug, Clone)]
pub struct Model {
    width: usize,
    kind: ModelKind,
}

#[derive(Debug, Clone)]
enum ModelKind {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone)]
struct LinearModel {
    intercept: f64,
    weights: Vec<f64>,
}

#[derive(Debug, Clone)]
struct TreeEnsemble {
    base_score: f64,
    aggregation: Aggregation,
    trees: Vec<Tree>,
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

impl ModelArtifact {
    /// Resolve column names against `schema` and validate the structure.
    pub fn bind(self, schema: &FeatureSchema) -> Result<Model> {
        let kind = match self {
            ModelArtifact::Linear {
                intercept,
                coefficients,
            } => {
                let mut weights = vec![0.0; schema.len()];
                for (column, weight) in coefficients {
                    let idx = resolve(schema, &column)?;
                    weights[idx] = weight;
                }
                ModelKind::Linear(LinearModel { intercept, weights })
            }
            ModelArtifact::TreeEnsemble {
                base_score,
                aggregation,
                trees,
            } => {
                if trees.is_empty() {
                    return Err(ArtifactError::InvalidTree {
                        tree: 0,
                        reason: "ensemble has no trees".into(),
                    });
                }
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(idx, spec)| bind_tree(idx, spec, schema))
                    .collect::<Result<Vec<_>>>()?;
                ModelKind::TreeEnsemble(TreeEnsemble {
                    base_score,
                    aggregation,
                    trees,
                })
            }
        };

        Ok(Model {
            width: schema.len(),
            kind,
        })
    }
}

fn resolve(schema: &FeatureSchema, column: &str) -> Result<usize> {
    schema
        .index_of(column)
        .ok_or_else(|| ArtifactError::UnknownColumn {
            column: column.to_string(),
        })
}

/// Children must point forward so traversal always terminates.
fn bind_tree(tree_idx: usize, spec: TreeSpec, schema: &FeatureSchema) -> Result<Tree> {
    if spec.nodes.is_empty() {
        return Err(ArtifactError::InvalidTree {
            tree: tree_idx,
            reason: "tree has no nodes".into(),
        });
    }

    let node_count = spec.nodes.len();
    let mut nodes = Vec::with_capacity(node_count);
    for (node_idx, node) in spec.nodes.into_iter().enumerate() {
        let node = match node {
            NodeSpec::Leaf { leaf } => Node::Leaf(leaf),
            NodeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                for child in [left, right] {
                    if child <= node_idx || child >= node_count {
                        return Err(ArtifactError::InvalidTree {
                            tree: tree_idx,
                            reason: format!(
                                "node {} has out-of-order child {} ({} nodes)",
                                node_idx, child, node_count
                            ),
                        });
                    }
                }
                Node::Split {
                    feature: resolve(schema, &feature)?,
                    threshold,
                    left,
                    right,
                }
            }
        };
        nodes.push(node);
    }

    Ok(Tree { nodes })
}

impl Model {
    /// Number of features the model expects
    pub fn width(&self) -> usize {
        self.width
    }

    /// Predict a single row laid out in schema order.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.width {
            return Err(ArtifactError::WidthMismatch {
                expected: self.width,
                found: row.len(),
            });
        }

        let prediction = match &self.kind {
            ModelKind::Linear(linear) => linear.predict(row),
            ModelKind::TreeEnsemble(ensemble) => ensemble.predict(row),
        };

        if !prediction.is_finite() {
            return Err(ArtifactError::NonFinitePrediction(prediction));
        }
        Ok(prediction)
    }
}

impl LinearModel {
    fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

impl TreeEnsemble {
    fn predict(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => total,
        };
        self.base_score + combined
    }
}

impl Tree {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}
