use statsd_udp::prelude::*;
use statsd_udp::MetricClient;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[allow(dead_code)]
pub const NUM_THREADS: u64 = 10;
#[allow(dead_code)]
pub const NUM_ITERATIONS: u64 = 100;

#[allow(dead_code)]
pub fn run_arc_threaded_test(client: MetricClient, num_threads: u64, iterations: u64) {
    let shared_client = Arc::new(client);

    let threads: Vec<_> = (0..num_threads)
        .map(|_| {
            let local_client = Arc::clone(&shared_client);

            thread::spawn(move || {
                for i in 0..iterations {
                    local_client.increment("some.counter");
                    local_client.increment_by_value("some.counter", i as i64);
                    local_client.decrement_with_sampling("some.counter", 0.5);
                    local_client.timing("some.timer", i as i64);
                    local_client.gauge("some.gauge", i as i64);
                    thread::sleep(Duration::from_millis(1));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().unwrap();
    }
}
