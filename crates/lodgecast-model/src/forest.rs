//! Random-forest inference over aligned listing features.
//!
//! The artifact is a JSON forest exported by the training side: an ordered
//! feature list, per-tree node arrays, class names, and optional per-feature
//! importances. Trees are stored topologically (children always after their
//! parent), so a walk terminates within the node array by construction.

use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::Deserialize;
use tracing::warn;

use lodgecast_core::Rating;

use crate::error::{ModelLoadError, PredictionError};

/// Number of top features reported by [`RatingModel::feature_importance`].
const IMPORTANCE_TOP_N: usize = 10;

/// Serialized forest as exported by the training pipeline.
#[derive(Debug, Deserialize)]
pub struct ForestArtifact {
    /// Expected feature columns, in the order trees index them.
    pub features: Vec<String>,
    /// Class names leaf indices refer to.
    pub classes: Vec<String>,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

/// In-memory predictor. Loaded once per process and read-only thereafter;
/// prediction never mutates model state.
#[derive(Debug)]
pub struct RatingModel {
    features: Vec<String>,
    classes: Vec<Rating>,
    trees: Vec<Tree>,
    importances: Option<Vec<f64>>,
}

impl RatingModel {
    /// Validate a decoded artifact and build the predictor.
    ///
    /// Rejects empty feature/class/tree lists, class names outside the
    /// rating set, out-of-range node indices, non-topological child links,
    /// and importance vectors that do not match the feature count.
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, ModelLoadError> {
        if artifact.features.is_empty() {
            return Err(ModelLoadError::Artifact("no feature columns".into()));
        }
        if artifact.trees.is_empty() {
            return Err(ModelLoadError::Artifact("no trees".into()));
        }

        let mut classes = Vec::with_capacity(artifact.classes.len());
        for name in &artifact.classes {
            let rating: Rating = name
                .parse()
                .map_err(|e| ModelLoadError::Artifact(format!("{e}")))?;
            if classes.contains(&rating) {
                return Err(ModelLoadError::Artifact(format!(
                    "duplicate class {name:?}"
                )));
            }
            classes.push(rating);
        }
        if classes.is_empty() {
            return Err(ModelLoadError::Artifact("no classes".into()));
        }

        for (t, tree) in artifact.trees.iter().enumerate() {
            validate_tree(t, tree, artifact.features.len(), classes.len())?;
        }

        if let Some(imp) = &artifact.feature_importances
            && imp.len() != artifact.features.len()
        {
            return Err(ModelLoadError::Artifact(format!(
                "{} importances for {} features",
                imp.len(),
                artifact.features.len()
            )));
        }

        Ok(Self {
            features: artifact.features,
            classes,
            trees: artifact.trees,
            importances: artifact.feature_importances,
        })
    }

    /// Expected feature columns, fixed for the lifetime of this instance.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Classes this forest can emit.
    pub fn classes(&self) -> &[Rating] {
        &self.classes
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Classify every row of an aligned batch, one label per row in input
    /// order. The batch must carry exactly [`Self::features`] in order.
    /// Columns are cast to Float64; nulls and values that do not parse as
    /// numbers (categorical strings) fall under the zero-fill imputation
    /// policy and are warned about per column. Only a column whose type
    /// cannot be cast at all is a [`PredictionError`].
    pub fn predict(&self, batch: &RecordBatch) -> Result<Vec<Rating>, PredictionError> {
        let columns = self.numeric_columns(batch)?;
        let n = batch.num_rows();

        let mut labels = Vec::with_capacity(n);
        for row in 0..n {
            let mut votes = vec![0usize; self.classes.len()];
            for tree in &self.trees {
                let class = walk(tree, &columns, row);
                votes[class] += 1;
            }
            labels.push(self.classes[argmax(&votes)]);
        }
        Ok(labels)
    }

    /// Features ranked by importance, descending, top 10.
    ///
    /// `None` when the artifact carries no importance scores.
    pub fn feature_importance(&self) -> Option<Vec<(String, f64)>> {
        let importances = self.importances.as_ref()?;

        let mut ranked: Vec<(String, f64)> = self
            .features
            .iter()
            .cloned()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(IMPORTANCE_TOP_N);
        Some(ranked)
    }

    /// Check the aligned schema and cast every column to Float64.
    fn numeric_columns(&self, batch: &RecordBatch) -> Result<Vec<Float64Array>, PredictionError> {
        if batch.num_columns() != self.features.len() {
            return Err(PredictionError::ColumnCount {
                expected: self.features.len(),
                got: batch.num_columns(),
            });
        }

        let schema = batch.schema();

        let mut columns = Vec::with_capacity(self.features.len());
        for (index, expected) in self.features.iter().enumerate() {
            let got = schema.field(index).name();
            if got != expected {
                return Err(PredictionError::ColumnName {
                    index,
                    expected: expected.clone(),
                    got: got.clone(),
                });
            }

            // Safe cast: unparseable values become null and read as zero
            // below, the same imputation alignment applies to missing
            // columns. Only a wholly non-castable type errors.
            let values = cast(batch.column(index), &DataType::Float64).map_err(|source| {
                PredictionError::NonNumeric {
                    column: expected.clone(),
                    source,
                }
            })?;
            let values = values
                .as_any()
                .downcast_ref::<Float64Array>()
                .cloned()
                .ok_or_else(|| PredictionError::NonNumeric {
                    column: expected.clone(),
                    source: arrow::error::ArrowError::CastError(
                        "cast did not produce Float64".to_string(),
                    ),
                })?;

            if values.null_count() > 0 {
                warn!(
                    column = %expected,
                    nulls = values.null_count(),
                    "imputing missing or non-numeric values as zero"
                );
            }
            columns.push(values);
        }
        Ok(columns)
    }
}

fn validate_tree(
    index: usize,
    tree: &Tree,
    n_features: usize,
    n_classes: usize,
) -> Result<(), ModelLoadError> {
    if tree.nodes.is_empty() {
        return Err(ModelLoadError::Artifact(format!("tree {index} is empty")));
    }
    for (i, node) in tree.nodes.iter().enumerate() {
        match *node {
            Node::Split {
                feature,
                left,
                right,
                ..
            } => {
                if feature >= n_features {
                    return Err(ModelLoadError::Artifact(format!(
                        "tree {index} node {i}: feature {feature} out of range"
                    )));
                }
                // Topological layout guarantees termination.
                if left <= i || right <= i || left >= tree.nodes.len() || right >= tree.nodes.len()
                {
                    return Err(ModelLoadError::Artifact(format!(
                        "tree {index} node {i}: child indices must follow their parent"
                    )));
                }
            }
            Node::Leaf { class } => {
                if class >= n_classes {
                    return Err(ModelLoadError::Artifact(format!(
                        "tree {index} node {i}: class {class} out of range"
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Walk one tree to a leaf for the given row. Null feature values read as
/// zero, the same imputation alignment applies to missing columns.
fn walk(tree: &Tree, columns: &[Float64Array], row: usize) -> usize {
    let mut i = 0;
    loop {
        match tree.nodes[i] {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = if columns[feature].is_null(row) {
                    0.0
                } else {
                    columns[feature].value(row)
                };
                i = if value <= threshold { left } else { right };
            }
            Node::Leaf { class } => return class,
        }
    }
}

/// Index of the highest vote count, ties broken by class order.
fn argmax(votes: &[usize]) -> usize {
    let mut best = 0;
    for (i, &v) in votes.iter().enumerate().skip(1) {
        if v > votes[best] {
            best = i;
        }
    }
    best
}
