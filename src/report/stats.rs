//! Summary statistics over the most recent year that has data.

use crate::domain::{Change, Indicator, RawSample, Stat};
use crate::report::format::{format_api_date, format_value};

/// Label shown when no year produced a sample.
pub const NO_UPDATE_LABEL: &str = "Not available";

/// Build the statistics cards.
///
/// `yearly` is ordered oldest to newest; each year's samples are newest first,
/// as the API returns them. Only samples carrying a value count.
pub fn compute_stats(indicator: &Indicator, yearly: &[Option<Vec<RawSample>>]) -> Vec<Stat> {
    let Some(samples) = latest_valued_year(yearly) else {
        return Vec::new();
    };

    let latest = samples[0];
    let latest_value = latest.value.unwrap_or_default();
    let previous_value = samples.get(1).and_then(|s| s.value);

    let change = previous_value
        .filter(|prev| *prev != 0.0)
        .map(|prev| {
            let delta = latest_value - prev;
            Change {
                delta,
                percent: delta / prev * 100.0,
            }
        });

    let values: Vec<f64> = samples.iter().filter_map(|s| s.value).collect();
    let count = values.len();
    let average = values.iter().sum::<f64>() / count as f64;
    let min = values.iter().copied().reduce(f64::min);
    let max = values.iter().copied().reduce(f64::max);

    let unit = indicator.unit;
    let mut stats = Vec::with_capacity(4);

    stats.push(Stat {
        title: "Last recorded value".to_string(),
        value: format_value(Some(latest_value), unit),
        subtext: format_api_date(&latest.date),
        change,
    });

    stats.push(Stat {
        title: "Current year average".to_string(),
        value: format_value(Some(average), unit),
        subtext: format!("Based on {count} records"),
        change: None,
    });

    if let Some(min) = min {
        stats.push(Stat {
            title: "Minimum (current year)".to_string(),
            value: format_value(Some(min), unit),
            subtext: relative_to_average(min, average),
            change: None,
        });
    }

    if let Some(max) = max {
        stats.push(Stat {
            title: "Maximum (current year)".to_string(),
            value: format_value(Some(max), unit),
            subtext: relative_to_average(max, average),
            change: None,
        });
    }

    stats
}

/// Date of the newest sample of the most recent year with data.
pub fn last_update_label(yearly: &[Option<Vec<RawSample>>]) -> String {
    yearly
        .iter()
        .rev()
        .flatten()
        .find_map(|samples| samples.first())
        .map(|s| format_api_date(&s.date))
        .unwrap_or_else(|| NO_UPDATE_LABEL.to_string())
}

fn latest_valued_year(yearly: &[Option<Vec<RawSample>>]) -> Option<Vec<&RawSample>> {
    yearly.iter().rev().flatten().find_map(|samples| {
        let valued: Vec<&RawSample> = samples
            .iter()
            .filter(|s| s.value.is_some_and(f64::is_finite))
            .collect();
        (!valued.is_empty()).then_some(valued)
    })
}

fn relative_to_average(value: f64, average: f64) -> String {
    if average == 0.0 {
        return String::new();
    }
    format!("{:.2}% vs average", (value / average - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Registry;

    fn dolar() -> Indicator {
        Registry::builtin().find("dolar").unwrap().clone()
    }

    fn year(samples: &[(&str, Option<f64>)]) -> Option<Vec<RawSample>> {
        Some(samples.iter().map(|(d, v)| RawSample::new(*d, *v)).collect())
    }

    #[test]
    fn no_data_no_cards() {
        assert!(compute_stats(&dolar(), &[]).is_empty());
        assert!(compute_stats(&dolar(), &[None, Some(Vec::new())]).is_empty());
        assert!(compute_stats(&dolar(), &[year(&[("2024-01-01", None)])]).is_empty());
    }

    #[test]
    fn single_sample_has_flat_stats_and_no_change() {
        let stats = compute_stats(&dolar(), &[None, year(&[("2024-06-03", Some(950.0))])]);
        assert_eq!(stats.len(), 4);
        assert!(stats[0].change.is_none());
        for card in &stats {
            assert_eq!(card.value, "$950,00");
        }
        assert_eq!(stats[1].subtext, "Based on 1 records");
        assert_eq!(stats[2].subtext, "0.00% vs average");
    }

    #[test]
    fn change_is_against_the_next_sample() {
        let stats = compute_stats(
            &dolar(),
            &[year(&[("2024-01-03", Some(110.0)), ("2024-01-02", Some(100.0)), ("2024-01-01", Some(90.0))])],
        );
        let change = stats[0].change.clone().unwrap();
        assert!((change.delta - 10.0).abs() < 1e-9);
        assert!((change.percent - 10.0).abs() < 1e-9);
        assert!(change.is_positive());
        assert_eq!(stats[0].subtext, "03-01-2024");
        assert_eq!(stats[1].value, "$100,00");
        assert_eq!(stats[2].value, "$90,00");
        assert_eq!(stats[3].value, "$110,00");
        assert_eq!(stats[2].subtext, "-10.00% vs average");
    }

    #[test]
    fn zero_previous_suppresses_the_change() {
        let stats = compute_stats(&dolar(), &[year(&[("2024-01-02", Some(5.0)), ("2024-01-01", Some(0.0))])]);
        assert!(stats[0].change.is_none());
    }

    #[test]
    fn only_the_most_recent_year_counts() {
        let stats = compute_stats(
            &dolar(),
            &[
                year(&[("2023-12-29", Some(1000.0))]),
                year(&[("2024-01-02", Some(10.0)), ("2024-01-01", Some(20.0))]),
                Some(Vec::new()),
            ],
        );
        assert_eq!(stats[1].value, "$15,00");
        assert_eq!(stats[3].value, "$20,00");
    }

    #[test]
    fn last_update_uses_the_newest_year_with_samples() {
        let yearly = vec![year(&[("2023-12-29", Some(1.0))]), None];
        assert_eq!(last_update_label(&yearly), "29-12-2023");
        assert_eq!(last_update_label(&[None]), NO_UPDATE_LABEL);
    }
}
