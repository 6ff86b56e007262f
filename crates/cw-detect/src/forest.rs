//! Isolation forest over two-feature points.
//!
//! Ensemble of random partition trees per Liu et al. (2008): each tree is
//! grown on a without-replacement subsample by splitting on a uniformly
//! random feature at a uniformly random cut between that feature's min and
//! max within the node. Points that separate from the bulk in fewer splits
//! (shorter average path across the ensemble) score closer to 1. No
//! distributional assumption is imposed on the features.

use cw_common::{DetectorSettings, Error, Result};
use rand::rngs::StdRng;
use rand::Rng;

/// Number of model features: `(volume, speed)`.
pub const N_FEATURES: usize = 2;

/// Euler-Mascheroni constant, for the average-path-length normalizer.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Expected average path length of an unsuccessful BST search over n
/// points: `c(n) = 2*H(n-1) - 2*(n-1)/n`. Used both to normalize scores
/// and to credit unresolved leaf nodes with their remaining depth.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug)]
enum Node {
    Internal {
        feature: usize,
        split: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Unsplittable node: single point, identical points, or height limit.
    Leaf { size: usize },
}

#[derive(Debug)]
struct Tree {
    root: Node,
}

impl Tree {
    fn grow(points: &[[f64; N_FEATURES]], height_limit: u32, rng: &mut StdRng) -> Tree {
        Tree {
            root: Self::grow_node(points, 0, height_limit, rng),
        }
    }

    fn grow_node(
        points: &[[f64; N_FEATURES]],
        depth: u32,
        height_limit: u32,
        rng: &mut StdRng,
    ) -> Node {
        if points.len() <= 1 || depth >= height_limit {
            return Node::Leaf { size: points.len() };
        }

        // Only features with spread can split; identical points terminate.
        let mut splittable = [false; N_FEATURES];
        let mut any = false;
        for f in 0..N_FEATURES {
            let (min, max) = feature_bounds(points, f);
            if max > min {
                splittable[f] = true;
                any = true;
            }
        }
        if !any {
            return Node::Leaf { size: points.len() };
        }

        let feature = loop {
            let f = rng.random_range(0..N_FEATURES);
            if splittable[f] {
                break f;
            }
        };
        let (min, max) = feature_bounds(points, feature);
        let split = rng.random_range(min..max);

        let (left, right): (Vec<[f64; N_FEATURES]>, Vec<[f64; N_FEATURES]>) =
            points.iter().copied().partition(|p| p[feature] < split);

        Node::Internal {
            feature,
            split,
            left: Box::new(Self::grow_node(&left, depth + 1, height_limit, rng)),
            right: Box::new(Self::grow_node(&right, depth + 1, height_limit, rng)),
        }
    }

    /// Path length of `point`: splits traversed plus the estimated
    /// remaining depth of the leaf it lands in.
    fn path_length(&self, point: &[f64; N_FEATURES]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Internal {
                    feature,
                    split,
                    left,
                    right,
                } => {
                    node = if point[*feature] < *split { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn feature_bounds(points: &[[f64; N_FEATURES]], feature: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        min = min.min(p[feature]);
        max = max.max(p[feature]);
    }
    (min, max)
}

/// A fitted ensemble of isolation trees.
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<Tree>,
    subsample: usize,
}

impl IsolationForest {
    /// Fit an ensemble on `points`.
    ///
    /// Each tree sees a without-replacement subsample of
    /// `min(settings.sample_size, points.len())` points and grows to at
    /// most `ceil(log2(subsample))` levels. Fitting on an empty slice is a
    /// contract violation the caller must short-circuit first.
    pub fn fit(
        points: &[[f64; N_FEATURES]],
        settings: &DetectorSettings,
        rng: &mut StdRng,
    ) -> Result<IsolationForest> {
        if points.is_empty() {
            return Err(Error::Detection(
                "cannot fit isolation forest on an empty window".into(),
            ));
        }

        let subsample = settings.sample_size.min(points.len());
        let height_limit = (subsample as f64).log2().ceil().max(1.0) as u32;

        let mut trees = Vec::with_capacity(settings.n_trees);
        for _ in 0..settings.n_trees {
            let idx = rand::seq::index::sample(rng, points.len(), subsample);
            let sample: Vec<[f64; N_FEATURES]> = idx.iter().map(|i| points[i]).collect();
            trees.push(Tree::grow(&sample, height_limit, rng));
        }

        Ok(IsolationForest { trees, subsample })
    }

    /// Anomaly score in (0, 1]: `2^(-E[h(x)] / c(subsample))`.
    ///
    /// Scores near 1 mean the point separates from the bulk in very few
    /// splits; scores well below 0.5 mean it is deeply embedded.
    pub fn score(&self, point: &[f64; N_FEATURES]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.path_length(point)).sum();
        let mean_path = total / self.trees.len() as f64;
        let norm = average_path_length(self.subsample).max(1.0);
        2f64.powf(-mean_path / norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn settings(seed: u64) -> DetectorSettings {
        DetectorSettings {
            random_state: Some(seed),
            ..DetectorSettings::default()
        }
    }

    #[test]
    fn average_path_length_known_values() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) from the isolation forest paper is roughly 10.24.
        let c256 = average_path_length(256);
        assert!((c256 - 10.24).abs() < 0.1, "c(256) = {}", c256);
    }

    #[test]
    fn fit_on_empty_input_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = IsolationForest::fit(&[], &settings(0), &mut rng).unwrap_err();
        assert_eq!(err.code(), 31);
    }

    #[test]
    fn isolated_point_scores_above_cluster() {
        let mut points: Vec<[f64; 2]> = (0..30)
            .map(|i| [45.0 + (i % 10) as f64, 18.0 + (i % 5) as f64])
            .collect();
        points.push([100.0, 1.0]);

        let mut rng = StdRng::seed_from_u64(7);
        let forest = IsolationForest::fit(&points, &settings(7), &mut rng).unwrap();

        let outlier = forest.score(&[100.0, 1.0]);
        let max_inlier = points[..30]
            .iter()
            .map(|p| forest.score(p))
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(
            outlier > max_inlier,
            "outlier {} <= max inlier {}",
            outlier,
            max_inlier
        );
    }

    #[test]
    fn identical_points_share_one_score() {
        let points = vec![[50.0, 20.0]; 16];
        let mut rng = StdRng::seed_from_u64(3);
        let forest = IsolationForest::fit(&points, &settings(3), &mut rng).unwrap();

        let first = forest.score(&points[0]);
        for p in &points {
            assert_eq!(forest.score(p), first);
        }
    }

    #[test]
    fn same_seed_reproduces_scores() {
        let points: Vec<[f64; 2]> = (0..25)
            .map(|i| [20.0 + 3.0 * i as f64, 40.0 - 0.9 * i as f64])
            .collect();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let forest_a = IsolationForest::fit(&points, &settings(42), &mut rng_a).unwrap();
        let forest_b = IsolationForest::fit(&points, &settings(42), &mut rng_b).unwrap();

        for p in &points {
            assert_eq!(forest_a.score(p), forest_b.score(p));
        }
    }
}
