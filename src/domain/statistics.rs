// Summary statistics over windows of the sample log
use super::sample::{Channel, Sample};

/// Mean and spread of one channel over a window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelStats {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl ChannelStats {
    pub fn of(window: &[Sample], channel: Channel) -> Self {
        Self {
            mean: mean(window, channel),
            std_dev: std_dev(window, channel),
            count: window.len(),
        }
    }
}

/// Arithmetic mean, 0 for an empty window
pub fn mean(window: &[Sample], channel: Channel) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|s| s.value(channel)).sum::<f64>() / window.len() as f64
}

/// Population standard deviation (divides by n), 0 for an empty window
pub fn std_dev(window: &[Sample], channel: Channel) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let mean = mean(window, channel);
    let variance = window
        .iter()
        .map(|s| {
            let diff = s.value(channel) - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

/// Degrees per minute between the first and last sample of the window.
/// Endpoint difference, not a fitted slope.
pub fn rate_per_minute(window: &[Sample], channel: Channel) -> f64 {
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return 0.0;
    };
    if window.len() < 2 {
        return 0.0;
    }

    let elapsed_minutes = (last.time - first.time).num_milliseconds() as f64 / 60_000.0;
    if elapsed_minutes <= 0.0 {
        return 0.0;
    }
    (last.value(channel) - first.value(channel)) / elapsed_minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn probe_series(values: &[(i64, f64)]) -> Vec<Sample> {
        values
            .iter()
            .map(|(secs, v)| Sample::new(t0() + Duration::seconds(*secs), 225.0, *v))
            .collect()
    }

    #[test]
    fn test_empty_window_defaults_to_zero() {
        let stats = ChannelStats::of(&[], Channel::Grill);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.count, 0);
        assert_eq!(rate_per_minute(&[], Channel::Probe), 0.0);
    }

    #[test]
    fn test_mean_lies_within_min_max() {
        let window = probe_series(&[(0, 101.5), (2, 99.0), (4, 140.25), (6, 120.0), (8, 100.0)]);
        let m = mean(&window, Channel::Probe);
        assert!((99.0..=140.25).contains(&m));
        assert!((m - 112.15).abs() < 1e-9);
    }

    #[test]
    fn test_population_std_dev() {
        // Classic population example: sigma = 2
        let window = probe_series(&[
            (0, 2.0),
            (1, 4.0),
            (2, 4.0),
            (3, 4.0),
            (4, 5.0),
            (5, 5.0),
            (6, 7.0),
            (7, 9.0),
        ]);
        assert!((std_dev(&window, Channel::Probe) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_zero_iff_constant() {
        let constant = probe_series(&[(0, 150.0), (2, 150.0), (4, 150.0)]);
        assert_eq!(std_dev(&constant, Channel::Probe), 0.0);

        let varying = probe_series(&[(0, 150.0), (2, 150.0), (4, 150.5)]);
        assert!(std_dev(&varying, Channel::Probe) > 0.0);
    }

    #[test]
    fn test_rate_with_two_samples() {
        let window = probe_series(&[(0, 100.0), (90, 103.0)]);
        // 3 degrees over 1.5 minutes
        assert!((rate_per_minute(&window, Channel::Probe) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rate_uses_endpoints_only() {
        let window = probe_series(&[(0, 100.0), (60, 180.0), (120, 20.0), (180, 106.0)]);
        assert!((rate_per_minute(&window, Channel::Probe) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rate_with_single_sample_is_zero() {
        let window = probe_series(&[(0, 100.0)]);
        assert_eq!(rate_per_minute(&window, Channel::Probe), 0.0);
    }

    #[test]
    fn test_rate_with_duplicate_timestamps_is_zero() {
        let window = probe_series(&[(30, 100.0), (30, 130.0)]);
        assert_eq!(rate_per_minute(&window, Channel::Probe), 0.0);
    }

    #[test]
    fn test_cooling_rate_is_negative() {
        let mut window = probe_series(&[(0, 120.0), (120, 110.0)]);
        for s in &mut window {
            s.grill_temp = s.probe_temp * 2.0;
        }
        assert!((rate_per_minute(&window, Channel::Probe) + 5.0).abs() < 1e-12);
        assert!((rate_per_minute(&window, Channel::Grill) + 10.0).abs() < 1e-12);
    }
}
