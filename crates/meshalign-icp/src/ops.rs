use kiddo::immutable::float::kdtree::ImmutableKdTree;
use rayon::prelude::*;

/// k-d tree over the fixed points, queried once per floating point and iteration.
pub(crate) type FixedTree = ImmutableKdTree<f64, u32, 3, 32>;

/// Matched point pairs that passed the distance threshold.
#[derive(Debug, Default)]
pub(crate) struct Correspondences {
    /// Points from the transformed floating set.
    pub floating: Vec<[f64; 3]>,
    /// Nearest fixed point of each floating point.
    pub fixed: Vec<[f64; 3]>,
    /// Squared distance of each pair.
    pub distances_sq: Vec<f64>,
}

impl Correspondences {
    pub fn len(&self) -> usize {
        self.floating.len()
    }

    /// RMS distance of the pairs before any update, zero if there are none.
    pub fn rmse(&self) -> f64 {
        if self.distances_sq.is_empty() {
            return 0.0;
        }
        (self.distances_sq.iter().sum::<f64>() / self.distances_sq.len() as f64).sqrt()
    }
}

/// Pair each source point with its nearest target point.
///
/// Queries run in parallel but the output keeps the order of `source`. Pairs
/// further apart than `max_distance_sq` (squared) are dropped.
pub(crate) fn find_correspondences(
    source: &[[f64; 3]],
    target: &[[f64; 3]],
    kdtree: &FixedTree,
    max_distance_sq: f64,
) -> Correspondences {
    let nn_results = source
        .par_iter()
        .map(|p| kdtree.nearest_one::<kiddo::SquaredEuclidean>(p))
        .collect::<Vec<_>>();

    let mut res = Correspondences::default();
    for (p, nn) in source.iter().zip(nn_results) {
        if nn.distance <= max_distance_sq {
            res.floating.push(*p);
            res.fixed.push(target[nn.item as usize]);
            res.distances_sq.push(nn.distance);
        }
    }
    res
}
