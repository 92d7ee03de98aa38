//! Aligning per-year samples on the calendar axis and covering missing slots.
//!
//! Interior gaps are linearly interpolated between their two bounding
//! observations. A trailing gap repeats the last observation (the value
//! persists until the next publication). A leading gap has nothing to anchor
//! to and stays empty.

use crate::domain::calendar::slot_of;
use crate::domain::{Dataset, RawSample};

/// Write each sample's value into its calendar slot.
///
/// Samples without a value or with an unparseable date are ignored.
/// Returns the number of slots written.
pub fn place_samples(dataset: &mut Dataset, samples: &[RawSample]) -> usize {
    let points = dataset.points_mut();
    let mut written = 0;
    for sample in samples {
        let (Some(day), Some(value)) = (sample.day(), sample.value) else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        points[slot_of(day)] = Some(value);
        written += 1;
    }
    written
}

/// Gap-filled copies of `datasets`. Inputs are left untouched.
pub fn fill_gaps(datasets: &[Dataset]) -> Vec<Dataset> {
    datasets
        .iter()
        .map(|ds| {
            let mut out = ds.clone();
            fill_points(out.points_mut());
            out
        })
        .collect()
}

/// Single forward pass over one point array.
pub fn fill_points(points: &mut [Option<f64>]) {
    let mut last_known: Option<(usize, f64)> = None;
    let mut i = 0;
    while i < points.len() {
        if let Some(v) = points[i] {
            last_known = Some((i, v));
            i += 1;
            continue;
        }

        let run_start = i;
        let mut run_end = i;
        while run_end < points.len() && points[run_end].is_none() {
            run_end += 1;
        }

        match (last_known, points.get(run_end).copied().flatten()) {
            (Some((lo, v0)), Some(v1)) => {
                let span = (run_end - lo) as f64;
                let step = (v1 - v0) / span;
                for (k, slot) in points[run_start..run_end].iter_mut().enumerate() {
                    *slot = Some(v0 + step * (k + 1) as f64);
                }
            }
            (Some((_, v0)), None) => {
                for slot in &mut points[run_start..run_end] {
                    *slot = Some(v0);
                }
            }
            // Leading gap: no left bound, nothing to extrapolate backwards from.
            (None, _) => {}
        }

        i = run_end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(input: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut v = input.to_vec();
        fill_points(&mut v);
        v
    }

    #[test]
    fn interior_gap_is_evenly_spaced() {
        assert_eq!(
            filled(&[Some(5.0), None, None, Some(8.0)]),
            vec![Some(5.0), Some(6.0), Some(7.0), Some(8.0)]
        );
    }

    #[test]
    fn leading_gap_is_left_alone() {
        assert_eq!(filled(&[None, None, Some(5.0)]), vec![None, None, Some(5.0)]);
    }

    #[test]
    fn trailing_gap_carries_the_last_value() {
        assert_eq!(
            filled(&[Some(5.0), None, None]),
            vec![Some(5.0), Some(5.0), Some(5.0)]
        );
    }

    #[test]
    fn several_gaps_in_one_array() {
        assert_eq!(
            filled(&[None, Some(1.0), None, Some(3.0), None, None, None, Some(7.0), None]),
            vec![
                None,
                Some(1.0),
                Some(2.0),
                Some(3.0),
                Some(4.0),
                Some(5.0),
                Some(6.0),
                Some(7.0),
                Some(7.0)
            ]
        );
    }

    #[test]
    fn all_empty_stays_empty() {
        assert_eq!(filled(&[None, None]), vec![None, None]);
    }

    #[test]
    fn fill_gaps_does_not_mutate_its_input() {
        let ds = Dataset::from_points("d", 2024, 0, &[Some(1.0), None, Some(3.0)]);
        let out = fill_gaps(std::slice::from_ref(&ds));
        assert_eq!(ds.points()[1], None);
        assert_eq!(out[0].points()[1], Some(2.0));
        // slots past the last sample are flat-filled
        assert_eq!(out[0].points()[365], Some(3.0));
    }

    #[test]
    fn samples_land_on_their_day_month_slot() {
        let mut ds = Dataset::empty("d", 2021, 0);
        let samples = vec![
            RawSample::new("2021-03-15T03:00:00.000Z", Some(710.5)),
            RawSample::new("2021-03-14T03:00:00.000Z", None),
            RawSample::new("garbage", Some(1.0)),
        ];
        assert_eq!(place_samples(&mut ds, &samples), 1);
        let slot = crate::domain::calendar::day_month_labels()
            .iter()
            .position(|l| l == "03-15")
            .unwrap();
        assert_eq!(ds.points()[slot], Some(710.5));
        assert_eq!(ds.filled(), 1);
    }
}
