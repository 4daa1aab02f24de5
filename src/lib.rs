// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2015-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small fire-and-forget Statsd client for Rust.
//!
//! Counters, gauges and timings are formatted as Statsd lines and written
//! to a UDP socket, one datagram per metric. Nothing is buffered, batched
//! or acknowledged.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use statsd_udp::prelude::*;
//! use statsd_udp::{MetricClient, DEFAULT_PORT};
//!
//! // Opens a non-blocking UDP socket. Failures are logged, not returned;
//! // use `MetricClient::open` to get them as a `Result` instead.
//! let client = MetricClient::new("metrics.example.com", DEFAULT_PORT);
//!
//! client.increment("some.counter");            // some.counter:1|c
//! client.decrement("some.counter");            // some.counter:-1|c
//! client.gauge("some.gauge", 42);              // some.gauge:42|g
//! client.timing("some.timer", 150);            // some.timer:150|ms
//! client.increment_with_sampling("hot", 0.5);  // hot:1|c|@0.500000, half the time
//!
//! client.close().unwrap();
//! ```
//!
//! ## Sampling
//!
//! Every send carries a sample rate. At `1.0` or above the updates are
//! always written. Below `1.0` the client draws one number from its own
//! generator for the whole batch; if the batch goes out, each line gets a
//! `|@<rate>` suffix so the server can scale counters back up.
//!
//! ## Errors
//!
//! The metric methods never return errors. Failures are handed to an error
//! handler that logs them through the `log` crate by default; see
//! `MetricClientBuilder::with_error_handler`. `MetricClient::try_send`
//! and `MetricClient::close` return them instead.
//!
//! ## Custom Sinks
//!
//! The client writes through a `MetricSink`. `UdpMetricSink` is the
//! default; `LoggingMetricSink`, `NopMetricSink` and `SpyMetricSink` can
//! be plugged in with `MetricClientBuilder::with_sink`.
//!
//! ```rust
//! use statsd_udp::prelude::*;
//! use statsd_udp::{MetricClient, SpyMetricSink};
//!
//! let (rx, sink) = SpyMetricSink::new();
//! let client = MetricClient::builder("localhost", 8125)
//!     .with_sink(sink)
//!     .build();
//!
//! client.counter("some.counter", 99);
//! assert_eq!("some.counter:1|c", rx.recv().unwrap());
//! ```

#![forbid(unsafe_code)]

pub const DEFAULT_PORT: u16 = 8125;

pub use self::client::{Counted, Gauged, MetricClient, MetricClientBuilder, Timed};

pub use self::sample_rate::SampleRate;

pub use self::sinks::{LoggingMetricSink, MetricSink, NopMetricSink, SinkStats, SpyMetricSink, UdpMetricSink};

pub use self::types::{ErrorKind, MetricError, MetricResult, MetricType};

mod client;
mod formatter;
pub mod prelude;
mod sample_rate;
mod sampler;
mod sinks;
mod types;
