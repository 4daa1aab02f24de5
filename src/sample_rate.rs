// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2015-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::types::{ErrorKind, MetricError};
use std::fmt;

/// Represents the sample rate of a send. This determines how often a batch
/// of updates is actually written to the Statsd server.
///
/// Any value of `1.0` or greater means "always send" and is never written
/// on the wire. Values below `1.0` are written as a `|@<rate>` suffix with
/// six fixed decimals so the server can scale sampled counters back up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRate {
    value: f32,
}

impl SampleRate {
    pub const ALWAYS: SampleRate = SampleRate { value: 1.0 };

    pub fn value(&self) -> f32 {
        self.value
    }

    /// True when a random draw decides whether the batch goes out.
    pub fn is_sampled(&self) -> bool {
        self.value < 1.0
    }

    /// True when nothing sent at this rate can ever go out.
    pub fn is_never(&self) -> bool {
        self.value == 0.0
    }

    /// Suffix appended to each value string of a sampled-in batch.
    pub fn suffix(&self) -> Option<String> {
        if self.is_sampled() {
            Some(format!("|@{}", self))
        } else {
            None
        }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.value)
    }
}

impl TryFrom<f32> for SampleRate {
    type Error = MetricError;

    fn try_from(rate: f32) -> Result<Self, Self::Error> {
        if rate.is_nan() || rate < 0.0 {
            Err(MetricError::from((
                ErrorKind::InvalidInput,
                "Sample rate must be a non-negative number",
            )))
        } else {
            Ok(SampleRate { value: rate })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SampleRate;
    use crate::types::ErrorKind;

    #[test]
    fn test_sample_rate_fixed_decimals() {
        let rate = SampleRate::try_from(0.5).unwrap();
        assert_eq!("0.500000", rate.to_string());
        assert_eq!(Some("|@0.500000".to_string()), rate.suffix());
    }

    #[test]
    fn test_sample_rate_rounding() {
        let rate = SampleRate::try_from(1.0 / 54.0).unwrap();
        assert_eq!(Some("|@0.018519".to_string()), rate.suffix());
    }

    #[test]
    fn test_sample_rate_one_has_no_suffix() {
        let rate = SampleRate::try_from(1.0).unwrap();
        assert!(!rate.is_sampled());
        assert_eq!(None, rate.suffix());
    }

    #[test]
    fn test_sample_rate_above_one_has_no_suffix() {
        let rate = SampleRate::try_from(2.5).unwrap();
        assert!(!rate.is_sampled());
        assert_eq!(None, rate.suffix());
    }

    #[test]
    fn test_sample_rate_zero_is_never() {
        let rate = SampleRate::try_from(0.0).unwrap();
        assert!(rate.is_sampled());
        assert!(rate.is_never());
    }

    #[test]
    fn test_sample_rate_negative() {
        let err = SampleRate::try_from(-0.1).unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }

    #[test]
    fn test_sample_rate_nan() {
        let err = SampleRate::try_from(f32::NAN).unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, err.kind());
    }
}
