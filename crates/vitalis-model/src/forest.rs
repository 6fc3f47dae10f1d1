//! Decision tree and random forest inference over flattened node arrays.
//!
//! Trees use the array layout scikit-learn exposes on `tree_`: node `i` is a
//! leaf when `children_left[i] == -1`, otherwise the sample goes left when
//! `x[feature[i]] <= threshold[i]`. `value[i]` holds per-class weights.

use serde::Deserialize;
use vitalis_common::{FeatureVector, FEATURE_COUNT};

use crate::error::{ModelError, Result};
use crate::predictor::{argmax, finite_input, ClassId, Predictor};

const LEAF: i64 = -1;

/// One fitted tree in flattened form.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl Tree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    /// Check array shapes and indices so `leaf` can index without bounds
    /// failures and always terminates.
    fn validate(&self, n_classes: usize) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(invalid("tree has no nodes"));
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(invalid("tree node arrays differ in length"));
        }

        for i in 0..n {
            if self.value[i].len() != n_classes {
                return Err(invalid(format!(
                    "node {i} has {} class weights, expected {n_classes}",
                    self.value[i].len()
                )));
            }

            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF {
                if right != LEAF {
                    return Err(invalid(format!("node {i} has a right child but no left child")));
                }
                continue;
            }

            // Children come after their parent, which rules out cycles
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(invalid(format!("node {i} has out-of-range child {child}")));
                }
            }
            let f = self.feature[i];
            if f < 0 || f >= FEATURE_COUNT as i64 {
                return Err(invalid(format!("node {i} splits on unknown feature {f}")));
            }
        }
        Ok(())
    }

    /// Walk from the root to the leaf this sample falls into.
    fn leaf(&self, x: &[f64; FEATURE_COUNT]) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            node = if x[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Leaf class weights normalised to a distribution.
    fn predict_proba(&self, x: &[f64; FEATURE_COUNT]) -> Vec<f64> {
        let weights = &self.value[self.leaf(x)];
        let total: f64 = weights.iter().sum();
        let norm = if total > 0.0 { total } else { 1.0 };
        weights.iter().map(|w| w / norm).collect()
    }
}

/// One or more trees averaged by soft voting.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    kind: &'static str,
    classes: Vec<ClassId>,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Single decision tree.
    pub fn decision_tree(classes: Vec<ClassId>, tree: Tree) -> Result<Self> {
        Self::build("decision_tree", classes, vec![tree])
    }

    /// Random forest; class probabilities are averaged across trees.
    pub fn random_forest(classes: Vec<ClassId>, trees: Vec<Tree>) -> Result<Self> {
        Self::build("random_forest", classes, trees)
    }

    fn build(kind: &'static str, classes: Vec<ClassId>, trees: Vec<Tree>) -> Result<Self> {
        if classes.is_empty() {
            return Err(invalid("classes must not be empty"));
        }
        if trees.is_empty() {
            return Err(invalid("ensemble has no trees"));
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(classes.len()).map_err(|e| match e {
                ModelError::InvalidArtifact(msg) => invalid(format!("tree {i}: {msg}")),
                other => other,
            })?;
        }
        Ok(Self { kind, classes, trees })
    }

    /// Mean class distribution over all trees.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let x = finite_input(features)?;
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(&x)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }
}

impl Predictor for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<ClassId> {
        let proba = self.predict_proba(features)?;
        Ok(self.classes[argmax(&proba)])
    }

    fn describe(&self) -> String {
        format!("{} ({} trees, {} classes)", self.kind, self.trees.len(), self.classes.len())
    }
}

fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::InvalidArtifact(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalis_common::RawSubmission;

    /// Root splits on Age (slot 0) at 50; left leaf favours class 0,
    /// right leaf favours class 1.
    fn age_stump(left: [f64; 2], right: [f64; 2]) -> Tree {
        Tree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![50.0, -2.0, -2.0],
            value: vec![vec![10.0, 10.0], left.to_vec(), right.to_vec()],
        }
    }

    fn age(v: &str) -> FeatureVector {
        FeatureVector::assemble(&[("Age", v)].into_iter().collect::<RawSubmission>())
    }

    fn classes() -> Vec<ClassId> {
        vec![ClassId(0), ClassId(1)]
    }

    #[test]
    fn test_decision_tree_splits_on_threshold() {
        let model = TreeEnsemble::decision_tree(classes(), age_stump([8.0, 2.0], [1.0, 9.0])).unwrap();
        assert_eq!(model.predict(&age("30")).unwrap(), ClassId(0));
        // Equal to the threshold goes left
        assert_eq!(model.predict(&age("50")).unwrap(), ClassId(0));
        assert_eq!(model.predict(&age("70")).unwrap(), ClassId(1));
    }

    #[test]
    fn test_forest_soft_voting() {
        // Two trees vote weakly for class 0, one votes strongly for class 1
        let trees = vec![
            age_stump([0.55, 0.45], [0.0, 1.0]),
            age_stump([0.55, 0.45], [0.0, 1.0]),
            age_stump([0.0, 1.0], [0.0, 1.0]),
        ];
        let model = TreeEnsemble::random_forest(classes(), trees).unwrap();
        let proba = model.predict_proba(&age("30")).unwrap();
        assert!((proba[0] - 1.1 / 3.0).abs() < 1e-9);
        assert_eq!(model.predict(&age("30")).unwrap(), ClassId(1));
    }

    #[test]
    fn test_rejects_nan_input() {
        let model = TreeEnsemble::decision_tree(classes(), age_stump([1.0, 0.0], [0.0, 1.0])).unwrap();
        let err = model.predict(&age("nan")).unwrap_err();
        assert!(matches!(err, ModelError::Inference(_)));
    }

    #[test]
    fn test_rejects_cyclic_tree() {
        let mut tree = age_stump([1.0, 0.0], [0.0, 1.0]);
        tree.children_left[0] = 0;
        let err = TreeEnsemble::decision_tree(classes(), tree).unwrap_err();
        assert!(err.to_string().contains("out-of-range child"), "{err}");
    }

    #[test]
    fn test_rejects_unknown_feature() {
        let mut tree = age_stump([1.0, 0.0], [0.0, 1.0]);
        tree.feature[0] = 15;
        assert!(TreeEnsemble::decision_tree(classes(), tree).is_err());
    }

    #[test]
    fn test_rejects_class_width_mismatch() {
        let tree = age_stump([1.0, 0.0], [0.0, 1.0]);
        let err = TreeEnsemble::decision_tree(vec![ClassId(0), ClassId(1), ClassId(2)], tree).unwrap_err();
        assert!(err.to_string().contains("class weights"), "{err}");
    }

    #[test]
    fn test_describe() {
        let model = TreeEnsemble::random_forest(
            classes(),
            vec![age_stump([1.0, 0.0], [0.0, 1.0]), age_stump([1.0, 0.0], [0.0, 1.0])],
        )
        .unwrap();
        assert_eq!(model.describe(), "random_forest (2 trees, 2 classes)");
    }
}
