//! The L1/L2/L3 validity predicates.

use std::collections::HashMap;

use aether_kernel::scalar::clamp;
use aether_types::{
    canonical_pair_key, InvalidReason, Observation, OcclusionState, PairKey, PairMetrics, ValidityOutcome,
};

use crate::constants::ValidityConstants;

/// Classifies a single observation against the L1 geometric-plausibility
/// predicate.
pub fn l1(observation: &Observation, constants: &ValidityConstants) -> ValidityOutcome {
    if !observation.geometry_finite() {
        return ValidityOutcome::Invalid(InvalidReason::NonFiniteInput);
    }
    match &observation.ray.intersection {
        None => return ValidityOutcome::Invalid(InvalidReason::NoGeometricIntersection),
        Some(point) if !point.is_finite() => {
            return ValidityOutcome::Invalid(InvalidReason::NoGeometricIntersection)
        }
        Some(_) => {}
    }
    if observation.ray.projected_overlap_area < constants.epsilon_area {
        return ValidityOutcome::Invalid(InvalidReason::InsufficientOverlapArea);
    }
    if observation.occlusion == OcclusionState::FullyOccluded {
        return ValidityOutcome::Invalid(InvalidReason::FullyOccluded);
    }
    ValidityOutcome::L1
}

/// Outcome of the fine-grained distinct-viewpoints check, distinguishing
/// *why* two observations fail to count as distinct viewpoints.
fn classify_distinct_viewpoints(
    a: &Observation,
    b: &Observation,
    constants: &ValidityConstants,
) -> Result<(), InvalidReason> {
    if !a.sensor_pose.position.is_finite() || !a.sensor_pose.forward.is_finite() {
        return Err(InvalidReason::NonFiniteInput);
    }
    if !b.sensor_pose.position.is_finite() || !b.sensor_pose.forward.is_finite() {
        return Err(InvalidReason::NonFiniteInput);
    }
    let (depth_a, depth_b) = match (a.raw.depth_m, b.raw.depth_m) {
        (Some(da), Some(db)) if da.is_finite() && db.is_finite() && da > 0.0 && db > 0.0 => (da, db),
        _ => return Err(InvalidReason::MissingDepthMeasurement),
    };

    let baseline = a.sensor_pose.position.sub(&b.sensor_pose.position).length();
    let avg_depth = (depth_a + depth_b) / 2.0;
    if avg_depth <= constants.epsilon_finite {
        return Err(InvalidReason::ParallaxThresholdNotMet);
    }
    if baseline / avg_depth < constants.r_min {
        return Err(InvalidReason::ParallaxThresholdNotMet);
    }

    let cosine = clamp(a.sensor_pose.forward.dot(&b.sensor_pose.forward), -1.0, 1.0);
    let theta = cosine.acos();
    if !theta.is_finite() || theta < constants.theta_min {
        return Err(InvalidReason::ParallaxThresholdNotMet);
    }
    Ok(())
}

/// Boolean distinct-viewpoints predicate used by [`l2`]'s pairwise scan
/// and [`l3`]'s greedy candidate selection.
pub fn distinct_viewpoints(a: &Observation, b: &Observation, constants: &ValidityConstants) -> bool {
    classify_distinct_viewpoints(a, b, constants).is_ok()
}

/// Classifies a set of observations and their pairwise metrics against
/// the L2 multi-view-support predicate.
///
/// `pairs` is keyed by [`canonical_pair_key`]; callers build it however
/// they like (it is not part of the pure model).
pub fn l2(
    observations: &[Observation],
    pairs: &HashMap<PairKey, PairMetrics>,
    constants: &ValidityConstants,
) -> ValidityOutcome {
    let v: Vec<&Observation> = observations
        .iter()
        .filter(|o| l1(o, constants) == ValidityOutcome::L1)
        .collect();
    if v.len() < 2 {
        return ValidityOutcome::Invalid(InvalidReason::InsufficientMultiViewSupport);
    }

    for i in 0..v.len() {
        for j in (i + 1)..v.len() {
            let key = canonical_pair_key(&v[i].id, &v[j].id);
            let Some(metrics) = pairs.get(&key) else {
                continue;
            };
            if metrics.reprojection_error_px > constants.epsilon_rep {
                return ValidityOutcome::Invalid(InvalidReason::ReprojectionErrorExceeded);
            }
            if metrics.triangulated_variance > constants.epsilon_geom {
                return ValidityOutcome::Invalid(InvalidReason::GeometricVarianceExceeded);
            }
            return ValidityOutcome::L2;
        }
    }
    ValidityOutcome::Invalid(InvalidReason::MissingPairMetrics)
}

/// Population variance of `samples`. Deterministic given a fixed
/// iteration order, which every caller here supplies via a prior
/// deterministic sort or stable collection.
fn variance(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let sum_sq = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>();
    sum_sq / samples.len() as f64
}

/// Classifies a set of observations against the L3 photometric-consistency
/// predicate, selecting `L3_core` or `L3_strict` depending on Lab sample
/// availability.
pub fn l3(observations: &[Observation], constants: &ValidityConstants) -> ValidityOutcome {
    let mut v: Vec<&Observation> = observations
        .iter()
        .filter(|o| l1(o, constants) == ValidityOutcome::L1)
        .collect();
    v.sort_by(|a, b| a.selection_key().cmp(&b.selection_key()));

    let mut selected: Vec<&Observation> = Vec::new();
    for candidate in &v {
        if selected
            .iter()
            .all(|already| distinct_viewpoints(candidate, already, constants))
        {
            selected.push(candidate);
        }
    }
    if selected.len() < 3 {
        return ValidityOutcome::Invalid(InvalidReason::InsufficientDistinctViewpoints);
    }

    let depth_samples: Vec<f64> = selected.iter().filter_map(|o| o.raw.depth_m).collect();
    if depth_samples.len() < 3 {
        return ValidityOutcome::Invalid(InvalidReason::MissingDepthMeasurement);
    }
    if variance(&depth_samples) > constants.epsilon_depth {
        return ValidityOutcome::Invalid(InvalidReason::DepthVarianceExceeded);
    }

    let luminance_samples: Vec<f64> = selected.iter().filter_map(|o| o.raw.luminance_l_star).collect();
    if luminance_samples.len() < 3 {
        return ValidityOutcome::Invalid(InvalidReason::LuminanceVarianceExceeded);
    }
    if variance(&luminance_samples) > constants.epsilon_l {
        return ValidityOutcome::Invalid(InvalidReason::LuminanceVarianceExceeded);
    }

    let lab_samples: Vec<_> = selected.iter().filter_map(|o| o.raw.lab).collect();
    if lab_samples.len() < 3 {
        return ValidityOutcome::L3Core;
    }
    let l_var = variance(&lab_samples.iter().map(|lab| lab.l).collect::<Vec<_>>());
    let a_var = variance(&lab_samples.iter().map(|lab| lab.a).collect::<Vec<_>>());
    let b_var = variance(&lab_samples.iter().map(|lab| lab.b).collect::<Vec<_>>());
    let max_var = l_var.max(a_var).max(b_var);
    if max_var > constants.epsilon_lab {
        return ValidityOutcome::Invalid(InvalidReason::LabVarianceExceeded);
    }
    ValidityOutcome::L3Strict
}
