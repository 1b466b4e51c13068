// Scope selection and time windowing over the sample log
use super::error::ControlError;
use super::sample::Sample;
use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Samples no older than this many minutes before "now"
    Minutes(u32),
    All,
}

impl Scope {
    pub fn parse(value: &str) -> Result<Self, ControlError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("all") {
            return Ok(Scope::All);
        }
        match value.parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(Scope::Minutes(minutes)),
            _ => Err(ControlError::UnknownScope(value.to_string())),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Scope::Minutes(minutes) => format!("{}m", minutes),
            Scope::All => "All Time".to_string(),
        }
    }

    /// Select the samples inside this scope relative to `now`
    pub fn select<'a>(&self, samples: &'a [Sample], now: DateTime<Utc>) -> &'a [Sample] {
        match self {
            Scope::All => samples,
            Scope::Minutes(minutes) => {
                select_recent(samples, now, Duration::minutes(i64::from(*minutes)))
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Minutes(minutes) => write!(f, "{}", minutes),
            Scope::All => f.write_str("all"),
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The scopes a user may pick from, `All` always last
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeOptions {
    options: Vec<Scope>,
}

impl ScopeOptions {
    pub fn new(minutes: &[u32]) -> Self {
        let mut options: Vec<Scope> = minutes
            .iter()
            .filter(|m| **m > 0)
            .map(|m| Scope::Minutes(*m))
            .collect();
        options.sort_by_key(|scope| match scope {
            Scope::Minutes(m) => *m,
            Scope::All => u32::MAX,
        });
        options.dedup();
        options.push(Scope::All);
        Self { options }
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.options.contains(&scope)
    }

    /// Accept a user selection only if it is one of the offered scopes
    pub fn validate(&self, scope: Scope) -> Result<Scope, ControlError> {
        if self.contains(scope) {
            Ok(scope)
        } else {
            Err(ControlError::ScopeNotOffered(scope.to_string()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.options.iter()
    }
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self::new(&[5, 10, 30])
    }
}

/// Samples with `now - time <= window`. The log is sorted so the cut-off is a
/// single binary search; samples stamped after `now` stay in the window.
pub fn select_recent(samples: &[Sample], now: DateTime<Utc>, window: Duration) -> &[Sample] {
    let cutoff = now - window;
    let start = samples.partition_point(|s| s.time < cutoff);
    &samples[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_003_600, 0).unwrap()
    }

    fn minutes_ago(minutes: i64) -> Sample {
        Sample::new(now() - Duration::minutes(minutes), 225.0, 150.0)
    }

    #[test]
    fn test_all_selects_everything() {
        let samples = vec![minutes_ago(600), minutes_ago(45), minutes_ago(1)];
        assert_eq!(Scope::All.select(&samples, now()).len(), 3);
        // "now" does not matter for the unbounded scope
        let far_future = now() + Duration::days(30);
        assert_eq!(Scope::All.select(&samples, far_future).len(), 3);
    }

    #[test]
    fn test_minutes_scope_is_boundary_inclusive() {
        let cutoff = now() - Duration::minutes(5);
        let just_outside = Sample::new(cutoff - Duration::milliseconds(1), 1.0, 1.0);
        let samples = vec![just_outside, minutes_ago(5), minutes_ago(2), minutes_ago(0)];

        let window = Scope::Minutes(5).select(&samples, now());
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].time, now() - Duration::minutes(5));
    }

    #[test]
    fn test_empty_log_yields_empty_window() {
        assert!(Scope::Minutes(10).select(&[], now()).is_empty());
        assert!(Scope::All.select(&[], now()).is_empty());
    }

    #[test]
    fn test_window_with_only_old_samples_is_empty() {
        let samples = vec![minutes_ago(90), minutes_ago(60)];
        assert!(Scope::Minutes(30).select(&samples, now()).is_empty());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Scope::parse("5").unwrap(), Scope::Minutes(5));
        assert_eq!(Scope::parse("all").unwrap(), Scope::All);
        assert_eq!(Scope::parse("All").unwrap(), Scope::All);
        assert!(Scope::parse("0").is_err());
        assert!(Scope::parse("forever").is_err());
        assert_eq!(Scope::Minutes(30).to_string(), "30");
        assert_eq!(Scope::Minutes(30).label(), "30m");
        assert_eq!(Scope::All.label(), "All Time");
    }

    #[test]
    fn test_scope_options_validate() {
        let options = ScopeOptions::default();
        let listed: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        assert_eq!(listed, vec!["5", "10", "30", "all"]);

        assert!(options.validate(Scope::Minutes(10)).is_ok());
        assert!(options.validate(Scope::All).is_ok());
        assert!(matches!(
            options.validate(Scope::Minutes(15)),
            Err(ControlError::ScopeNotOffered(_))
        ));
    }
}
