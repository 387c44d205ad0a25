//! Tree ensemble regressor loaded from a JSON artifact
//!
//! The artifact is an exported forest: every tree is a flat list of nodes,
//! node 0 is the root, and split nodes point at their children by index.
//! A prediction is the mean of the leaf reached in each tree.
//!
//! ```json
//! {
//!   "name": "calories-rf",
//!   "version": "2.0",
//!   "feature_names": ["Age", "Weight (kg)", ...],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": "Session_Duration (hours)", "threshold": 1.25, "left": 1, "right": 2 },
//!         { "value": 780.0 },
//!         { "value": 1240.0 }
//!     ] }
//!   ]
//! }
//! ```

use super::{CaloriePredictor, InferenceError, ModelInfo};
use crate::config::ModelBackend;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use calorie_predictor_shared::{FeatureVector, FEATURE_NAMES};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// One node of a regression tree
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// On-disk representation of the forest
#[derive(Debug, Clone, Deserialize)]
struct ForestArtifact {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_version")]
    version: String,
    feature_names: Vec<String>,
    trees: Vec<Tree>,
}

fn default_name() -> String {
    "calories-forest".to_string()
}

fn default_version() -> String {
    "unversioned".to_string()
}

/// Averaging tree ensemble
#[derive(Debug, Clone)]
pub struct ForestModel {
    name: String,
    version: String,
    trees: Vec<Tree>,
}

impl ForestModel {
    /// Read and verify a forest artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Parse and verify a forest from its JSON text
    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: ForestArtifact =
            serde_json::from_str(raw).context("model artifact is not a valid forest")?;
        Self::verify(&artifact)?;

        Ok(Self {
            name: artifact.name,
            version: artifact.version,
            trees: artifact.trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn verify(artifact: &ForestArtifact) -> Result<()> {
        let declared: HashSet<&str> = artifact.feature_names.iter().map(String::as_str).collect();
        let expected: HashSet<&str> = FEATURE_NAMES.iter().copied().collect();
        if declared != expected {
            let missing: Vec<_> = expected.difference(&declared).collect();
            let unknown: Vec<_> = declared.difference(&expected).collect();
            bail!(
                "model features do not match workout features (missing: {:?}, unknown: {:?})",
                missing,
                unknown
            );
        }

        if artifact.trees.is_empty() {
            bail!("model contains no trees");
        }

        for (t, tree) in artifact.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                bail!("tree {} has no nodes", t);
            }
            let len = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if !declared.contains(feature.as_str()) {
                            bail!("tree {} node {} splits on unknown feature {:?}", t, i, feature);
                        }
                        if !threshold.is_finite() {
                            bail!("tree {} node {} has a non-finite threshold", t, i);
                        }
                        // Children must come later in the list, which rules out cycles
                        for child in [*left, *right] {
                            if child <= i || child >= len {
                                bail!("tree {} node {} has invalid child index {}", t, i, child);
                            }
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if !value.is_finite() {
                            bail!("tree {} node {} has a non-finite leaf value", t, i);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn evaluate(tree: &Tree, features: &FeatureVector) -> Result<f64, InferenceError> {
        let mut index = 0;
        loop {
            match &tree.nodes[index] {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features.get(feature).ok_or_else(|| {
                        InferenceError::Rejected(format!("missing feature {:?}", feature))
                    })?;
                    if !x.is_finite() {
                        return Err(InferenceError::Rejected(format!(
                            "feature {:?} is not finite",
                            feature
                        )));
                    }
                    index = if x <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

#[async_trait]
impl CaloriePredictor for ForestModel {
    async fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let mut total = 0.0;
        for tree in &self.trees {
            total += Self::evaluate(tree, features)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            backend: ModelBackend::File,
        }
    }
}
