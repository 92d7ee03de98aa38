//! Bezier spline smoothing for line series.
//!
//! Control points follow the usual "spline curve" construction: each point's
//! handles are parallel to the chord between its neighbours and scaled by
//! `tension`, split in proportion to the adjacent segment lengths. A tension
//! of zero degenerates to straight segments.

/// Tension applied when line smoothing is switched on.
pub const SMOOTH_TENSION: f64 = 0.4;

/// Densify `points` into a smoothed path with `steps` samples per segment.
///
/// The returned path passes through every input point.
pub fn smooth_path(points: &[(f64, f64)], tension: f64, steps: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || tension <= 0.0 || steps < 2 {
        return points.to_vec();
    }

    let controls: Vec<((f64, f64), (f64, f64))> = (0..points.len())
        .map(|i| {
            let cur = points[i];
            let prev = if i == 0 { cur } else { points[i - 1] };
            let next = if i + 1 == points.len() { cur } else { points[i + 1] };
            control_points(prev, cur, next, tension)
        })
        .collect();

    let mut out = Vec::with_capacity((points.len() - 1) * steps + 1);
    out.push(points[0]);
    for i in 0..points.len() - 1 {
        let p0 = points[i];
        let p3 = points[i + 1];
        let p1 = controls[i].1;
        let p2 = controls[i + 1].0;
        for s in 1..=steps {
            let t = s as f64 / steps as f64;
            out.push(cubic(p0, p1, p2, p3, t));
        }
    }
    out
}

fn control_points(
    prev: (f64, f64),
    cur: (f64, f64),
    next: (f64, f64),
    tension: f64,
) -> ((f64, f64), (f64, f64)) {
    let d01 = dist(prev, cur);
    let d12 = dist(cur, next);
    let total = d01 + d12;
    if total <= f64::EPSILON {
        return (cur, cur);
    }
    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let dx = next.0 - prev.0;
    let dy = next.1 - prev.1;
    (
        (cur.0 - fa * dx, cur.1 - fa * dy),
        (cur.0 + fb * dx, cur.1 + fb * dy),
    )
}

fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn cubic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    (
        b0 * p0.0 + b1 * p1.0 + b2 * p2.0 + b3 * p3.0,
        b0 * p0.1 + b1 * p1.1 + b2 * p2.1 + b3 * p3.1,
    )
}
