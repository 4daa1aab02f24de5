// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2015-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Export the metric traits for easy glob imports
//!
//! # Example
//!
//! ```
//! use statsd_udp::prelude::*;
//! use statsd_udp::{MetricClient, NopMetricSink};
//!
//! let client = MetricClient::builder("localhost", 8125)
//!     .with_sink(NopMetricSink)
//!     .build();
//!
//! client.increment("some.counter");
//! client.timing("some.timer", 23);
//! client.gauge("some.gauge", 45);
//! ```

pub use crate::client::{Counted, Gauged, Timed};
