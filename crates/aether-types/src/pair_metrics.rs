//! Pairwise metrics between two observations, keyed by canonical id order.

/// Canonically ordered pair of observation ids: `(min, max)` by
/// lexicographic order, used as the lookup key for [`PairMetrics`].
pub type PairKey = (String, String);

/// Orders two observation ids into the canonical key used to look up
/// [`PairMetrics`] for an unordered pair.
pub fn canonical_pair_key(a: &str, b: &str) -> PairKey {
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}

/// Multi-view geometric agreement metrics for an unordered pair of
/// observations, keyed by [`canonical_pair_key`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairMetrics {
    /// Reprojection error between the pair's rays, in pixels.
    pub reprojection_error_px: f64,
    /// Triangulated depth variance between the pair.
    pub triangulated_variance: f64,
}
