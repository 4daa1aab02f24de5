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
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::sinks::core::{MetricSink, SinkStats, SocketStats};
use crate::types::{ErrorKind, MetricError, MetricResult};

/// Attempt to convert anything implementing the `ToSocketAddrs` trait
/// into a concrete `SocketAddr` instance, returning an `InvalidInput`
/// error if the address could not be parsed.
#[allow(clippy::needless_pass_by_value)]
fn get_addr<A: ToSocketAddrs>(addr: A) -> MetricResult<SocketAddr> {
    match addr.to_socket_addrs()?.next() {
        Some(addr) => Ok(addr),
        None => Err(MetricError::from((ErrorKind::InvalidInput, "No socket addresses yielded"))),
    }
}

/// Implementation of a `MetricSink` that emits metrics over UDP.
///
/// Every call to `.emit()` is one `send_to` on the socket, in the thread of
/// the caller. Nothing is buffered and nothing waits for the server.
#[derive(Debug)]
pub struct UdpMetricSink {
    addr: SocketAddr,
    socket: UdpSocket,
    stats: SocketStats,
}

impl UdpMetricSink {
    /// Construct a new `UdpMetricSink` from an already bound socket.
    ///
    /// The address should be the address of the remote metric server. The
    /// socket should already be bound to a local address with any desired
    /// configuration applied (blocking vs non-blocking, timeouts, etc.).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::net::UdpSocket;
    /// use statsd_udp::{UdpMetricSink, DEFAULT_PORT};
    ///
    /// let socket = UdpSocket::bind("0.0.0.0:0").unwrap();
    /// let host = ("metrics.example.com", DEFAULT_PORT);
    /// let sink = UdpMetricSink::from(host, socket);
    /// ```
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * It is unable to resolve the hostname of the metric server.
    /// * The host address is otherwise unable to be parsed
    pub fn from<A>(to_addr: A, socket: UdpSocket) -> MetricResult<UdpMetricSink>
    where
        A: ToSocketAddrs,
    {
        let addr = get_addr(to_addr)?;
        let stats = SocketStats::default();
        Ok(UdpMetricSink { addr, socket, stats })
    }

    /// Resolve `host:port`, bind a local socket on an ephemeral port and put
    /// it into non-blocking mode.
    ///
    /// # Failures
    ///
    /// This method may fail if:
    ///
    /// * The host is empty or the port is zero.
    /// * It is unable to resolve the hostname of the metric server.
    /// * It is unable to create a local UDP socket.
    /// * It is unable to put the UDP socket into non-blocking mode.
    pub fn connect(host: &str, port: u16) -> MetricResult<UdpMetricSink> {
        if host.is_empty() {
            return Err(MetricError::from((ErrorKind::InvalidInput, "Host must not be empty")));
        }
        if port == 0 {
            return Err(MetricError::from((ErrorKind::InvalidInput, "Port must be between 1 and 65535")));
        }

        let addr = get_addr((host, port))?;
        let local = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;
        UdpMetricSink::from(addr, socket)
    }

    /// Address of the remote metric server.
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl MetricSink for UdpMetricSink {
    fn emit(&self, metric: &str) -> io::Result<usize> {
        self.stats
            .update(self.socket.send_to(metric.as_bytes(), self.addr), metric.len())
    }

    fn stats(&self) -> SinkStats {
        self.stats.snapshot()
    }
}
