// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2015-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sinks::core::MetricSink;
use log::Level;
use std::io;

/// Implementation of a `MetricSink` that emits metrics using the `log!` macro.
///
/// Metrics are emitted at the `Level` provided at construction with a target
/// of `metrics`. Useful for a dry run where nothing should reach the network.
///
/// Note that the number of bytes returned by `emit` does not reflect whether
/// the level is actually enabled.
#[derive(Debug, Clone, Copy)]
pub struct LoggingMetricSink {
    level: Level,
}

impl LoggingMetricSink {
    pub fn new(level: Level) -> LoggingMetricSink {
        LoggingMetricSink { level }
    }
}

impl MetricSink for LoggingMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        log::log!(target: "metrics", self.level, "{}", metric);
        Ok(metric.len())
    }
}
