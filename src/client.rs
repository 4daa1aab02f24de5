// statsd-udp - A small fire-and-forget Statsd client for Rust
//
// Copyright 2015-2021 Nick Pillitteri
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use log::{debug, trace, warn};
use rand::RngCore;

use crate::formatter::MetricFormatter;
use crate::sample_rate::SampleRate;
use crate::sampler::Sampler;
use crate::sinks::{MetricSink, SinkStats, UdpMetricSink};
use crate::types::{ErrorKind, MetricError, MetricResult, MetricType};

type BoxedSink = Box<dyn MetricSink + Sync + Send>;
type ErrorHandler = Box<dyn Fn(MetricError) + Sync + Send>;

/// Trait for incrementing and decrementing counters.
///
/// Counters are simple values incremented or decremented by a client. The
/// rates at which these events occur or average values will be determined
/// by the server receiving them. Examples of counter uses include number
/// of logins to a system or requests received.
///
/// All methods are fire-and-forget: failures go to the client's error
/// handler and are never returned.
pub trait Counted {
    /// Update the counter by `delta`, sent with probability `rate`.
    fn count_with_sampling(&self, key: &str, delta: i64, rate: f32);

    /// Increment the counter by `1`
    fn increment(&self, key: &str) {
        self.count_with_sampling(key, 1, 1.0)
    }

    /// Increment the counter by `1`, sent with probability `rate`
    fn increment_with_sampling(&self, key: &str, rate: f32) {
        self.count_with_sampling(key, 1, rate)
    }

    /// Increment the counter by `value`
    fn increment_by_value(&self, key: &str, value: i64) {
        self.count_with_sampling(key, value, 1.0)
    }

    /// Decrement the counter by `1`
    fn decrement(&self, key: &str) {
        self.count_with_sampling(key, -1, 1.0)
    }

    /// Decrement the counter by `1`, sent with probability `rate`
    fn decrement_with_sampling(&self, key: &str, rate: f32) {
        self.count_with_sampling(key, -1, rate)
    }

    /// Increment the counter by `1`.
    ///
    /// **Note** that `value` is ignored and the counter always moves by
    /// one, exactly like `increment`. Existing callers depend on this; use
    /// `increment_by_value` to move a counter by an arbitrary amount.
    fn counter(&self, key: &str, _value: i64) {
        self.count_with_sampling(key, 1, 1.0)
    }
}

/// Trait for recording gauge values.
///
/// Gauge values are an instantaneous measurement of a value determined
/// by the client. They do not change unless changed by the client. Examples
/// include things like load average or how many connections are active.
pub trait Gauged {
    /// Record a gauge value, sent with probability `rate`
    fn gauge_with_sampling(&self, key: &str, value: i64, rate: f32);

    /// Record a gauge value with the given key
    fn gauge(&self, key: &str, value: i64) {
        self.gauge_with_sampling(key, value, 1.0)
    }
}

/// Trait for recording timings in milliseconds.
///
/// Timings are a positive number of milliseconds between a start and end
/// time. Examples include time taken to render a web page or time taken
/// for a database call to return.
pub trait Timed {
    /// Record a timing in milliseconds, sent with probability `rate`
    fn timing_with_sample_rate(&self, key: &str, millis: i64, rate: f32);

    /// Record a timing in milliseconds with the given key
    fn timing(&self, key: &str, millis: i64) {
        self.timing_with_sample_rate(key, millis, 1.0)
    }
}

/// Builder for creating and customizing `MetricClient` instances.
///
/// Instances of the builder should be created by calling the `::builder()`
/// method on the `MetricClient` struct.
///
/// # Example
///
/// ```
/// use statsd_udp::prelude::*;
/// use statsd_udp::{MetricClient, MetricError, NopMetricSink};
///
/// fn my_error_handler(err: MetricError) {
///     eprintln!("Metric error! {}", err);
/// }
///
/// let client = MetricClient::builder("localhost", 8125)
///     .with_sink(NopMetricSink)
///     .with_error_handler(my_error_handler)
///     .build();
///
/// client.increment("some.counter");
/// ```
pub struct MetricClientBuilder {
    host: String,
    port: u16,
    sink: Option<BoxedSink>,
    sampler: Option<Sampler>,
    errors: ErrorHandler,
}

impl MetricClientBuilder {
    fn new(host: &str, port: u16) -> Self {
        MetricClientBuilder {
            // required
            host: host.to_string(),
            port,

            // optional with defaults
            sink: None,
            sampler: None,
            errors: Box::new(log_error_handler),
        }
    }

    /// Send metrics to the given sink instead of opening a UDP socket to
    /// the configured host and port.
    pub fn with_sink<T>(mut self, sink: T) -> Self
    where
        T: MetricSink + Sync + Send + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Use the given generator for sampling decisions.
    ///
    /// By default each client seeds its own generator from system entropy.
    /// A seeded generator makes the sampled-in and sampled-out sequence
    /// reproducible.
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.sampler = Some(Sampler::from_rng(rng));
        self
    }

    /// Set an error handler for failures encountered by the quiet send path.
    ///
    /// The handler is invoked for invalid sample rates, sends on a client
    /// without a socket, and every failed datagram write. The default
    /// handler logs the error at `warn` level.
    ///
    /// The error handler should consume the error without panicking.
    pub fn with_error_handler<F>(mut self, errors: F) -> Self
    where
        F: Fn(MetricError) + Sync + Send + 'static,
    {
        self.errors = Box::new(errors);
        self
    }

    /// Construct a new `MetricClient`, logging (rather than returning) any
    /// failure to open the UDP socket.
    ///
    /// A client whose socket could not be opened is still usable: every
    /// send reports `ErrorKind::SocketUnavailable` to the error handler.
    pub fn build(self) -> MetricClient {
        let MetricClientBuilder {
            host,
            port,
            sink,
            sampler,
            errors,
        } = self;

        let sink = match sink {
            Some(sink) => Some(sink),
            None => match UdpMetricSink::connect(&host, port) {
                Ok(udp) => Some(Box::new(udp) as BoxedSink),
                Err(e) => {
                    warn!("unable to open metrics socket to {}:{}: {}", host, port, e);
                    None
                }
            },
        };

        MetricClient::from_parts(host, port, sink, sampler, errors)
    }

    /// Construct a new `MetricClient`, returning any failure to open the
    /// UDP socket.
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * The host is empty or the port is zero.
    /// * It is unable to resolve the hostname of the metric server.
    /// * It is unable to create a local UDP socket or make it non-blocking.
    pub fn try_build(self) -> MetricResult<MetricClient> {
        let MetricClientBuilder {
            host,
            port,
            sink,
            sampler,
            errors,
        } = self;

        let sink = match sink {
            Some(sink) => sink,
            None => Box::new(UdpMetricSink::connect(&host, port)?),
        };

        Ok(MetricClient::from_parts(host, port, Some(sink), sampler, errors))
    }
}

/// Client for a Statsd daemon that writes each metric as its own UDP
/// datagram.
///
/// # Traits
///
/// * `Counted` for emitting counters.
/// * `Timed` for emitting timings.
/// * `Gauged` for emitting gauge values.
///
/// These all funnel into `update_stats` or `send`, which apply sampling
/// and write one line per metric to the socket.
///
/// # Errors
///
/// Metrics are fire-and-forget. Opening the socket in `new`, and every
/// write made by `send` and the trait methods, reports failures to the
/// error handler (by default a `warn!` log line) and carries on. Callers
/// that want to see failures can use `open`, `try_send` and `close`,
/// which return them.
///
/// # Threading
///
/// The client is `Send` and `Sync` and can be shared between threads
/// behind an `Arc`. The socket slot is guarded by a read-write lock and
/// the sampling generator by a mutex.
///
/// # Example
///
/// ```no_run
/// use statsd_udp::prelude::*;
/// use statsd_udp::{MetricClient, DEFAULT_PORT};
///
/// let client = MetricClient::new("metrics.example.com", DEFAULT_PORT);
///
/// client.increment("some.counter");
/// client.increment_with_sampling("some.hot.counter", 0.1);
/// client.gauge("some.gauge", 42);
/// client.timing("some.timer", 150);
///
/// client.close().unwrap();
/// ```
pub struct MetricClient {
    host: String,
    port: u16,
    sink: RwLock<Option<BoxedSink>>,
    sampler: Sampler,
    errors: ErrorHandler,
}

impl MetricClient {
    /// Create a new client that sends metrics to `host:port` over UDP.
    ///
    /// The socket is opened eagerly. If that fails the failure is logged,
    /// not returned, and the client is left without a socket.
    pub fn new(host: &str, port: u16) -> Self {
        Self::builder(host, port).build()
    }

    /// Create a new client that sends metrics to `host:port` over UDP,
    /// returning an error if the socket can't be opened.
    pub fn open(host: &str, port: u16) -> MetricResult<Self> {
        Self::builder(host, port).try_build()
    }

    /// Create a new builder for a client that sends to `host:port`.
    ///
    /// General defaults:
    ///
    /// * A non-blocking UDP socket is opened when the client is built.
    /// * Sampling uses a generator seeded from system entropy.
    /// * Errors from the quiet send path are logged at `warn` level.
    pub fn builder(host: &str, port: u16) -> MetricClientBuilder {
        MetricClientBuilder::new(host, port)
    }

    fn from_parts(
        host: String,
        port: u16,
        sink: Option<BoxedSink>,
        sampler: Option<Sampler>,
        errors: ErrorHandler,
    ) -> Self {
        if sink.is_some() {
            debug!("metrics client ready for {}:{}", host, port);
        }

        MetricClient {
            host,
            port,
            sink: RwLock::new(sink),
            sampler: sampler.unwrap_or_else(Sampler::from_entropy),
            errors,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// True until `close` is called, provided the socket opened at all.
    pub fn is_open(&self) -> bool {
        self.sink.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Packets and bytes written or dropped so far. Zero once closed.
    pub fn stats(&self) -> SinkStats {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|sink| sink.stats())
            .unwrap_or_default()
    }

    /// Flush and release the socket.
    ///
    /// Closing is idempotent: a second call, or a call on a client whose
    /// socket never opened, returns `Ok(())`. Any later send reports
    /// `ErrorKind::SocketUnavailable`.
    pub fn close(&self) -> MetricResult<()> {
        let sink = self.sink.write().unwrap_or_else(PoisonError::into_inner).take();

        match sink {
            Some(sink) => {
                debug!("closing metrics socket to {}:{}", self.host, self.port);
                sink.flush()?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Update every name in `names` by `delta` as metrics of the given type,
    /// all sharing one sample rate.
    ///
    /// Names are collected into a map first, so repeated names are sent
    /// once and the order of the writes is unspecified. Returns the number
    /// of datagrams written.
    pub fn update_stats<I, S>(&self, names: I, delta: i64, rate: f32, metric_type: MetricType) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let value = metric_type.format_value(delta);
        let updates: HashMap<String, String> = names
            .into_iter()
            .map(|name| (name.as_ref().to_string(), value.clone()))
            .collect();

        self.send(&updates, rate)
    }

    /// Send a batch of updates, each a metric name and a formatted value
    /// string such as `"4|c"`, with a shared sample rate.
    ///
    /// With a rate below one, a single draw decides whether the whole batch
    /// is written; if it is, every value gets the `|@<rate>` suffix. Each
    /// metric is written as its own datagram, and a failed write doesn't
    /// stop the rest. Failures go to the error handler. Returns the number
    /// of datagrams written.
    pub fn send<I, K, V>(&self, updates: I, rate: f32) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.emit_updates(updates, rate, |err| (self.errors)(err))
    }

    /// Like `send`, but returns the first failure instead of handing it to
    /// the error handler.
    ///
    /// Every update in the batch is still attempted before the error is
    /// returned. A batch that was sampled out is `Ok(0)`.
    pub fn try_send<I, K, V>(&self, updates: I, rate: f32) -> MetricResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut first = None;
        let sent = self.emit_updates(updates, rate, |err| {
            if first.is_none() {
                first = Some(err);
            }
        });

        match first {
            Some(err) => Err(err),
            None => Ok(sent),
        }
    }

    fn emit_updates<I, K, V, F>(&self, updates: I, rate: f32, mut on_error: F) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        F: FnMut(MetricError),
    {
        let rate = match SampleRate::try_from(rate) {
            Ok(rate) => rate,
            Err(e) => {
                on_error(e);
                return 0;
            }
        };

        if !self.sampler.sample(&rate) {
            trace!("batch sampled out at rate {}", rate);
            return 0;
        }

        let guard = self.sink.read().unwrap_or_else(PoisonError::into_inner);
        let sink = match guard.as_ref() {
            Some(sink) => sink,
            None => {
                drop(guard);
                on_error(MetricError::from((
                    ErrorKind::SocketUnavailable,
                    "Metrics socket is not open",
                )));
                return 0;
            }
        };

        let suffix = rate.suffix();
        let mut sent = 0;
        let mut failures = Vec::new();

        for (key, value) in updates {
            let mut fmt = MetricFormatter::new(key.as_ref(), value.as_ref());
            fmt.with_suffix(suffix.as_deref());

            match sink.emit(&fmt.format()) {
                Ok(_) => sent += 1,
                Err(e) => failures.push(MetricError::from(e)),
            }
        }

        // handlers run without the lock held so they may close the client
        drop(guard);
        failures.into_iter().for_each(on_error);
        sent
    }
}

impl fmt::Debug for MetricClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MetricClient {{ host: {:?}, port: {}, open: {}, sink: ..., errors: ... }}",
            self.host,
            self.port,
            self.is_open(),
        )
    }
}

impl Counted for MetricClient {
    fn count_with_sampling(&self, key: &str, delta: i64, rate: f32) {
        self.update_stats([key], delta, rate, MetricType::Counter);
    }
}

impl Gauged for MetricClient {
    fn gauge_with_sampling(&self, key: &str, value: i64, rate: f32) {
        self.send([(key, MetricType::Gauge.format_value(value))], rate);
    }
}

impl Timed for MetricClient {
    fn timing_with_sample_rate(&self, key: &str, millis: i64, rate: f32) {
        self.send([(key, MetricType::Timer.format_value(millis))], rate);
    }
}

#[allow(clippy::needless_pass_by_value)]
fn log_error_handler(err: MetricError) {
    warn!("failed to send metric: {}", err);
}
