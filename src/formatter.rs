// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2018-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Builds the single line written for one metric of a batch.
///
/// The value string is expected to already carry its type marker
/// (`"4|c"`). A sample rate below one adds the `|@<rate>` suffix.
#[derive(Debug, Clone)]
pub(crate) struct MetricFormatter<'a> {
    key: &'a str,
    value: &'a str,
    suffix: Option<&'a str>,
}

impl<'a> MetricFormatter<'a> {
    pub(crate) fn new(key: &'a str, value: &'a str) -> Self {
        MetricFormatter {
            key,
            value,
            suffix: None,
        }
    }

    pub(crate) fn with_suffix(&mut self, suffix: Option<&'a str>) {
        self.suffix = suffix;
    }

    pub(crate) fn format(&self) -> String {
        let suffix = self.suffix.unwrap_or("");
        // key, ':', value and the optional rate suffix
        let mut out = String::with_capacity(self.key.len() + 1 + self.value.len() + suffix.len());
        out.push_str(self.key);
        out.push(':');
        out.push_str(self.value);
        out.push_str(suffix);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::MetricFormatter;
    use crate::sample_rate::SampleRate;

    #[test]
    fn test_metric_formatter_unsampled() {
        let fmt = MetricFormatter::new("some.key", "4|c");
        assert_eq!("some.key:4|c", &fmt.format());
    }

    #[test]
    fn test_metric_formatter_sampled() {
        let suffix = SampleRate::try_from(0.25).unwrap().suffix();
        let mut fmt = MetricFormatter::new("some.key", "150|ms");
        fmt.with_suffix(suffix.as_deref());
        assert_eq!("some.key:150|ms|@0.250000", &fmt.format());
    }

    #[test]
    fn test_metric_formatter_default_rate_not_written() {
        let suffix = SampleRate::ALWAYS.suffix();
        let mut fmt = MetricFormatter::new("some.key", "7|g");
        fmt.with_suffix(suffix.as_deref());
        assert_eq!("some.key:7|g", &fmt.format());
    }
}
