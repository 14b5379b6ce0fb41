//! Inference over a trained decision forest.
//!
//! The artifact mirrors the flattened layout emitted by the offline training
//! pipeline: each tree is a node array with the root at index 0, split nodes
//! reference their children by index, and children always come after their
//! parent. That ordering is validated at load time and is what bounds every
//! traversal.

use orient_types::error::{ArtifactError, PredictError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single node in a flattened decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Binary split: rows with `feature <= threshold` go left, the rest go
    /// right.
    Split {
        /// Index of the feature column tested by this node.
        feature: usize,
        /// Decision threshold.
        threshold: f64,
        /// Node index taken when the test passes.
        left: usize,
        /// Node index taken when the test fails.
        right: usize,
    },
    /// Terminal node voting for a class code.
    Leaf {
        /// The class code this leaf votes for.
        class: usize,
    },
}

/// One decision tree, nodes flattened with the root at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Flattened node array.
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    fn validate(&self, index: usize, n_features: usize) -> Result<(), ArtifactError> {
        if self.nodes.is_empty() {
            return Err(ArtifactError::Invalid(format!("tree {index} has no nodes")));
        }
        for (pos, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {index} node {pos} splits on feature {feature}, \
                         but the forest declares {n_features} features"
                    )));
                }
                for child in [*left, *right] {
                    // Children must strictly follow their parent; this is the
                    // invariant that makes traversal terminate.
                    if child <= pos || child >= self.nodes.len() {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {index} node {pos} references child {child} out of order"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Routes one row to a leaf and returns its class code.
    ///
    /// Bounds checks stay in place so a hand-built, unvalidated tree surfaces
    /// [`PredictError::MalformedTree`] instead of panicking.
    pub fn predict(&self, row: &[f64]) -> Result<usize, PredictError> {
        let mut pos = 0usize;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(pos) {
                Some(Node::Leaf { class }) => return Ok(*class),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().ok_or_else(|| {
                        PredictError::MalformedTree(format!(
                            "split references feature {feature} outside a {}-column row",
                            row.len()
                        ))
                    })?;
                    pos = if value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictError::MalformedTree(format!(
                        "node index {pos} out of bounds"
                    )))
                }
            }
        }
        Err(PredictError::MalformedTree(
            "tree walk did not reach a leaf".to_string(),
        ))
    }
}

/// A trained classification forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    /// Number of input columns the forest was fitted on.
    pub n_features: usize,
    /// The ensemble's trees.
    pub trees: Vec<DecisionTree>,
}

impl Forest {
    /// Structural validation, run once when the artifact loads.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.n_features == 0 {
            return Err(ArtifactError::Invalid(
                "forest declares zero input features".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("forest has no trees".to_string()));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, self.n_features)?;
        }
        Ok(())
    }

    /// Highest class code any leaf can vote for.
    pub fn max_class(&self) -> usize {
        self.trees
            .iter()
            .flat_map(|tree| &tree.nodes)
            .filter_map(|node| match node {
                Node::Leaf { class } => Some(*class),
                Node::Split { .. } => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Majority vote across trees.
    ///
    /// Ties resolve to the smallest class code, so a fixed forest always maps
    /// the same row to the same code.
    pub fn predict(&self, row: &[f64]) -> Result<usize, PredictError> {
        let mut votes: BTreeMap<usize, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict(row)?).or_insert(0) += 1;
        }
        let mut winner: Option<(usize, usize)> = None;
        for (class, count) in votes {
            // Strict comparison keeps the smallest class on equal counts.
            if winner.map_or(true, |(_, best)| count > best) {
                winner = Some((class, count));
            }
        }
        winner
            .map(|(class, _)| class)
            .ok_or_else(|| PredictError::MalformedTree("forest has no trees".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Node {
        Node::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn leaf(class: usize) -> Node {
        Node::Leaf { class }
    }

    /// Three trees over math (column 0) and self-study hours (column 6):
    /// two vote class 0 below / class 2 above their thresholds, one always
    /// votes class 1.
    fn fixture_forest() -> Forest {
        Forest {
            n_features: 8,
            trees: vec![
                DecisionTree {
                    nodes: vec![split(0, 50.0, 1, 2), leaf(0), leaf(2)],
                },
                DecisionTree {
                    nodes: vec![split(6, 10.0, 1, 2), leaf(0), leaf(2)],
                },
                DecisionTree {
                    nodes: vec![leaf(1)],
                },
            ],
        }
    }

    #[test]
    fn fixture_is_valid() {
        fixture_forest().validate().unwrap();
        assert_eq!(fixture_forest().max_class(), 2);
    }

    #[test]
    fn majority_vote_wins() {
        let forest = fixture_forest();
        let strong = [80.0, 0.0, 0.0, 0.0, 0.0, 0.0, 20.0, 0.0];
        assert_eq!(forest.predict(&strong).unwrap(), 2);
        let weak = [30.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0];
        assert_eq!(forest.predict(&weak).unwrap(), 0);
    }

    #[test]
    fn boundary_value_goes_left() {
        let forest = Forest {
            n_features: 8,
            trees: vec![DecisionTree {
                nodes: vec![split(0, 50.0, 1, 2), leaf(0), leaf(2)],
            }],
        };
        let row = [50.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(forest.predict(&row).unwrap(), 0);
    }

    #[test]
    fn tie_resolves_to_smallest_class() {
        let forest = Forest {
            n_features: 8,
            trees: vec![
                DecisionTree {
                    nodes: vec![leaf(2)],
                },
                DecisionTree {
                    nodes: vec![leaf(0)],
                },
            ],
        };
        assert_eq!(forest.predict(&[0.0; 8]).unwrap(), 0);
    }

    #[test]
    fn out_of_order_child_fails_validation() {
        let forest = Forest {
            n_features: 8,
            // Node 0 points back at itself.
            trees: vec![DecisionTree {
                nodes: vec![split(0, 1.0, 0, 1), leaf(0)],
            }],
        };
        assert!(forest.validate().is_err());
    }

    #[test]
    fn oversized_feature_index_fails_validation() {
        let forest = Forest {
            n_features: 8,
            trees: vec![DecisionTree {
                nodes: vec![split(8, 1.0, 1, 2), leaf(0), leaf(1)],
            }],
        };
        assert!(forest.validate().is_err());
    }

    #[test]
    fn unvalidated_tree_errors_instead_of_panicking() {
        let tree = DecisionTree {
            nodes: vec![split(99, 1.0, 1, 2), leaf(0), leaf(1)],
        };
        let err = tree.predict(&[0.0; 8]).unwrap_err();
        assert!(matches!(err, PredictError::MalformedTree(_)));
    }

    #[test]
    fn artifact_json_roundtrip() {
        let forest = fixture_forest();
        let raw = serde_json::to_string(&forest).unwrap();
        let back: Forest = serde_json::from_str(&raw).unwrap();
        back.validate().unwrap();
        assert_eq!(
            back.predict(&[80.0, 0.0, 0.0, 0.0, 0.0, 0.0, 20.0, 0.0])
                .unwrap(),
            2
        );
    }
}
