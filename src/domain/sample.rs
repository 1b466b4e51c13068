// Sample domain model and the ordered sample log
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The two temperature sensors on the grill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Grill,
    Probe,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Grill, Channel::Probe];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "grill" => Some(Channel::Grill),
            "probe" => Some(Channel::Probe),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Channel::Grill => "Grill Temperature",
            Channel::Probe => "Probe Temperature",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub grill_temp: f64,
    pub probe_temp: f64,
}

impl Sample {
    pub fn new(time: DateTime<Utc>, grill_temp: f64, probe_temp: f64) -> Self {
        Self {
            time,
            grill_temp,
            probe_temp,
        }
    }

    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Grill => self.grill_temp,
            Channel::Probe => self.probe_temp,
        }
    }

    /// Both sensors reading exactly zero means "disconnected", not a reading
    pub fn is_disconnected(&self) -> bool {
        self.grill_temp == 0.0 && self.probe_temp == 0.0
    }
}

/// Outcome of handing a reading to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Appended,
    /// Arrived older than the tail and was placed at its chronological slot
    Inserted { index: usize },
    Rejected,
}

/// Append-only log of accepted samples, non-decreasing in time
#[derive(Debug, Clone, Default)]
pub struct SampleLog {
    samples: Vec<Sample>,
}

impl SampleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, sample: Sample) -> Ingest {
        if sample.is_disconnected() {
            tracing::debug!("Dropping disconnected-sensor sample at {}", sample.time);
            return Ingest::Rejected;
        }

        let out_of_order = self.samples.last().is_some_and(|tail| sample.time < tail.time);
        if !out_of_order {
            self.samples.push(sample);
            return Ingest::Appended;
        }

        // Equal timestamps keep arrival order
        let index = self.samples.partition_point(|s| s.time <= sample.time);
        self.samples.insert(index, sample);
        tracing::debug!("Out-of-order sample at {} inserted at {}", sample.time, index);
        Ingest::Inserted { index }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }
}
