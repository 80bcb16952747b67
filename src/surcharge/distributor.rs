use nalgebra as na;
use serde::Serialize;

use crate::geometry::{Polygon3, VerticalClip, spread_rigid};

use super::analysis::SurchargeWarning;
use super::selector::SamplePoint;

/// Per-sample force vectors (newtons, global frame), in sample order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForceAssignment {
    entries: Vec<(u32, na::Vector3<f64>)>,

    /// Resultant application point used for the moment balance, when one
    /// was constructed.
    pub application: Option<na::Point3<f64>>,
}

impl ForceAssignment {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: u32) -> Option<na::Vector3<f64>> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, force)| *force)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(u32, na::Vector3<f64>)> {
        self.entries.iter()
    }

    /// Sum of all assigned forces.
    pub fn total(&self) -> na::Vector3<f64> {
        self.entries.iter().map(|(_, force)| force).sum()
    }

    pub(crate) fn push(&mut self, id: u32, force: na::Vector3<f64>) {
        self.entries.push((id, force));
    }
}

/// Spread the loaded share of `total_force` over the selected samples.
///
/// The resultant acts on the vertical segment through the shadow centroid,
/// one third of the segment length below its top (the resultant of a
/// trapezoidal pressure block). A single loaded sample takes the full
/// scaled force with no moment balance; consumers needing a moment at that
/// point must model it downstream.
pub fn distribute_force(
    total_force: na::Vector3<f64>,
    loaded_area_ratio: f64,
    selected: &[(usize, f64)],
    samples: &[SamplePoint],
    shadow: &Polygon3,
) -> (ForceAssignment, Vec<SurchargeWarning>) {
    let mut assignment = ForceAssignment::default();
    let mut warnings = Vec::new();

    let scaled = total_force * loaded_area_ratio;

    let loaded: Vec<(usize, f64)> = selected
        .iter()
        .filter(|(_, area)| *area > 0.0)
        .copied()
        .collect();

    match loaded.len() {
        0 => (assignment, warnings),
        1 => {
            let (index, _) = loaded[0];
            assignment.application = Some(samples[index].position);
            assignment.push(samples[index].id, scaled);
            (assignment, warnings)
        }
        _ => {
            let centroid = shadow.centroid();
            let application = match shadow.clip_vertical(&centroid) {
                VerticalClip::Segment {
                    top,
                    bottom,
                    extra_crossings,
                } => {
                    if extra_crossings > 0 {
                        let warning = SurchargeWarning::AmbiguousVerticalClip {
                            crossings: extra_crossings + 2,
                        };
                        log::warn!("{warning}");
                        warnings.push(warning);
                    }
                    top + (bottom - top) / 3.0
                }
                VerticalClip::Degenerate => {
                    let warning = SurchargeWarning::DegenerateVerticalClip;
                    log::warn!("{warning}");
                    warnings.push(warning);
                    centroid
                }
            };
            assignment.application = Some(application);

            let targets: Vec<(na::Point3<f64>, f64)> = loaded
                .iter()
                .map(|(index, area)| (samples[*index].position, *area))
                .collect();

            match spread_rigid(application, scaled, na::Vector3::zeros(), &targets) {
                Some(solution) => {
                    if !solution.exact_moment {
                        let warning = SurchargeWarning::UnbalancedMoment;
                        log::warn!("{warning}");
                        warnings.push(warning);
                    }
                    for ((index, _), force) in loaded.iter().zip(solution.forces) {
                        assignment.push(samples[*index].id, force);
                    }
                }
                None => {
                    // Unreachable with positive areas; fall back to a
                    // weight-proportional split
                    let total_area: f64 = loaded.iter().map(|(_, area)| area).sum();
                    let warning = SurchargeWarning::UnbalancedMoment;
                    log::warn!("{warning}");
                    warnings.push(warning);
                    for (index, area) in &loaded {
                        assignment.push(samples[*index].id, scaled * (*area / total_area));
                    }
                }
            }
            (assignment, warnings)
        }
    }
}
