//! Per-topic frame counters

use serde::Serialize;
use std::fmt;
use types::Topic;

/// Frames seen per topic on one connection, or summed over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicCounts {
    pub sample: u64,
    pub diagnostic: u64,
    pub initialization: u64,
    /// Frames whose topic value is outside the schema
    pub unknown: u64,
}

impl TopicCounts {
    /// Count one frame by its raw topic value
    pub fn record(&mut self, topic: i32) {
        match Topic::try_from(topic) {
            Ok(Topic::Sample) => self.sample += 1,
            Ok(Topic::Diagnostic) => self.diagnostic += 1,
            Ok(Topic::Initialization) => self.initialization += 1,
            Err(_) => self.unknown += 1,
        }
    }

    pub fn merge(&mut self, other: &TopicCounts) {
        self.sample += other.sample;
        self.diagnostic += other.diagnostic;
        self.initialization += other.initialization;
        self.unknown += other.unknown;
    }

    pub fn total(&self) -> u64 {
        self.sample + self.diagnostic + self.initialization + self.unknown
    }
}

impl fmt::Display for TopicCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample={} diagnostic={} initialization={}",
            self.sample, self.diagnostic, self.initialization
        )?;
        if self.unknown > 0 {
            write!(f, " unknown={}", self.unknown)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_merge() {
        let mut a = TopicCounts::default();
        a.record(Topic::Sample as i32);
        a.record(Topic::Sample as i32);
        a.record(Topic::Initialization as i32);

        let mut b = TopicCounts::default();
        b.record(Topic::Diagnostic as i32);
        b.record(7);

        a.merge(&b);
        assert_eq!(
            a,
            TopicCounts {
                sample: 2,
                diagnostic: 1,
                initialization: 1,
                unknown: 1
            }
        );
        assert_eq!(a.total(), 5);
    }

    #[test]
    fn test_display() {
        let mut counts = TopicCounts::default();
        counts.record(Topic::Sample as i32);
        assert_eq!(counts.to_string(), "sample=1 diagnostic=0 initialization=0");

        counts.record(-1);
        assert_eq!(
            counts.to_string(),
            "sample=1 diagnostic=0 initialization=0 unknown=1"
        );
    }
}
