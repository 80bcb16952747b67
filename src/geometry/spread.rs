use nalgebra as na;

/// Forces spread over weighted application points.
#[derive(Debug, Clone)]
pub struct SpreadSolution {
    /// One force per target, in target order.
    pub forces: Vec<na::Vector3<f64>>,
    /// False when the requested moment is unreachable for the point layout
    /// (collinear or coincident targets) and the nearest achievable moment
    /// was produced instead.
    pub exact_moment: bool,
}

/// Spread a sliding-vector system `(force, moment)` acting at `application`
/// over weighted points.
///
/// The returned forces sum to `force` exactly. Their net moment about
/// `application` reproduces `moment` whenever the point layout allows it;
/// each point carries a share proportional to its weight plus a rigid
/// correction field `w_i · (a × r_i)` that sums to zero.
///
/// Returns `None` when the total weight is not positive.
pub fn spread_rigid(
    application: na::Point3<f64>,
    force: na::Vector3<f64>,
    moment: na::Vector3<f64>,
    targets: &[(na::Point3<f64>, f64)],
) -> Option<SpreadSolution> {
    let total_weight: f64 = targets.iter().map(|(_, w)| w).sum();
    if targets.is_empty() || total_weight <= 0.0 {
        return None;
    }

    if targets.len() == 1 {
        let produced = (targets[0].0 - application).cross(&force);
        return Some(SpreadSolution {
            exact_moment: (produced - moment).norm() <= moment_tolerance(&force, targets),
            forces: vec![force],
        });
    }

    let centroid = na::Point3::from(
        targets
            .iter()
            .map(|(p, w)| p.coords * *w)
            .sum::<na::Vector3<f64>>()
            / total_weight,
    );

    // Weight-proportional share reproduces the force but acts at the
    // weighted centroid; the rest of the moment comes from the correction
    let m_base = (centroid - application).cross(&force);
    let m_needed = moment - m_base;

    let mut forces: Vec<na::Vector3<f64>> = targets
        .iter()
        .map(|(_, w)| force * (*w / total_weight))
        .collect();

    if m_needed.norm() <= 1e-12 {
        return Some(SpreadSolution {
            forces,
            exact_moment: true,
        });
    }

    // Σ w (|r|² I − r rᵀ) a = m_needed, with r taken about the weighted
    // centroid so the correction forces sum to zero
    let mut inertia = na::Matrix3::<f64>::zeros();
    for (p, w) in targets {
        let r = p - centroid;
        inertia += (na::Matrix3::identity() * r.norm_squared() - r * r.transpose()) * *w;
    }

    let a = match inertia.try_inverse() {
        Some(inv) => inv * m_needed,
        None => inertia
            .svd(true, true)
            .solve(&m_needed, 1e-12)
            .unwrap_or_else(|_| na::Vector3::zeros()),
    };

    for ((p, w), f) in targets.iter().zip(forces.iter_mut()) {
        *f += a.cross(&(p - centroid)) * *w;
    }

    let produced: na::Vector3<f64> = targets
        .iter()
        .zip(&forces)
        .map(|((p, _), f)| (p - application).cross(f))
        .sum();

    Some(SpreadSolution {
        exact_moment: (produced - moment).norm() <= moment_tolerance(&force, targets),
        forces,
    })
}

fn moment_tolerance(force: &na::Vector3<f64>, targets: &[(na::Point3<f64>, f64)]) -> f64 {
    let reach = targets
        .iter()
        .map(|(p, _)| p.coords.norm())
        .fold(1.0, f64::max);
    1e-6 * (1.0 + force.norm() * reach)
}
