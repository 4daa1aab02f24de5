// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2015-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of datagrams written or dropped by a sink.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub bytes_sent: u64,
    pub packets_sent: u64,
    pub bytes_dropped: u64,
    pub packets_dropped: u64,
}

/// Live counters behind a `SinkStats` snapshot.
#[derive(Debug, Default)]
pub(crate) struct SocketStats {
    bytes_sent: AtomicU64,
    packets_sent: AtomicU64,
    bytes_dropped: AtomicU64,
    packets_dropped: AtomicU64,
}

impl SocketStats {
    /// Record the outcome of one datagram write of `len` bytes and pass the
    /// result through untouched.
    pub(crate) fn update(&self, res: io::Result<usize>, len: usize) -> io::Result<usize> {
        match res {
            Ok(written) => {
                self.bytes_sent.fetch_add(written as u64, Ordering::Relaxed);
                self.packets_sent.fetch_add(1, Ordering::Relaxed);
                Ok(written)
            }
            Err(e) => {
                self.bytes_dropped.fetch_add(len as u64, Ordering::Relaxed);
                self.packets_dropped.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub(crate) fn snapshot(&self) -> SinkStats {
        SinkStats {
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            bytes_dropped: self.bytes_dropped.load(Ordering::Relaxed),
            packets_dropped: self.packets_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Trait for backends that send Statsd metric lines somewhere.
///
/// Each call to `emit` receives one complete line, without a trailing
/// newline, and is expected to become one datagram. Examples of each
/// supported metric type are given below.
///
/// ## Counter
///
/// ``` text
/// some.counter:1|c
/// some.counter:-1|c|@0.500000
/// ```
///
/// ## Timer
///
/// ``` text
/// some.timer:150|ms
/// ```
///
/// ## Gauge
///
/// ``` text
/// some.gauge:42|g
/// ```
pub trait MetricSink {
    /// Send the metric line using this sink and return the number of bytes
    /// written or an I/O error.
    fn emit(&self, metric: &str) -> io::Result<usize>;

    /// Flush anything the sink holds on to. Called before the sink is
    /// released by `MetricClient::close`.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Return telemetry about packets sent or dropped.
    ///
    /// Sinks that don't track this return zeros.
    fn stats(&self) -> SinkStats {
        SinkStats::default()
    }
}

/// Implementation of a `MetricSink` that discards all metrics.
///
/// Useful for disabling metric collection or unit tests.
#[derive(Debug, Clone)]
pub struct NopMetricSink;

impl MetricSink for NopMetricSink {
    fn emit(&self, _metric: &str) -> io::Result<usize> {
        Ok(0)
    }
}
