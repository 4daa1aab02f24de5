use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use statsd_udp::prelude::*;
use statsd_udp::{ErrorKind, MetricClient, SpyMetricSink};

mod utils;
use utils::{run_arc_threaded_test, NUM_ITERATIONS, NUM_THREADS};

fn new_spy_client(seed: u64) -> (crossbeam_channel::Receiver<String>, MetricClient) {
    let (rx, sink) = SpyMetricSink::new();
    let client = MetricClient::builder("localhost", 8125)
        .with_sink(sink)
        .with_rng(ChaCha8Rng::seed_from_u64(seed))
        .build();
    (rx, client)
}

#[test]
fn test_metric_client_spy_sink_single_threaded() {
    let (rx, client) = new_spy_client(1);
    run_arc_threaded_test(client, 1, 1);

    let lines: Vec<String> = rx.try_iter().collect();
    assert!(lines.contains(&"some.counter:1|c".to_string()));
    assert!(lines.contains(&"some.counter:0|c".to_string()));
    assert!(lines.contains(&"some.timer:0|ms".to_string()));
    assert!(lines.contains(&"some.gauge:0|g".to_string()));
}

#[test]
fn test_metric_client_spy_sink_many_threaded() {
    let (rx, client) = new_spy_client(2);
    run_arc_threaded_test(client, NUM_THREADS, NUM_ITERATIONS);

    let lines: Vec<String> = rx.try_iter().collect();
    let unsampled = (NUM_THREADS * NUM_ITERATIONS * 4) as usize;
    let sampled = lines.iter().filter(|l| l.ends_with("|@0.500000")).count();

    assert_eq!(unsampled, lines.len() - sampled);
    assert!(sampled > 0);
    assert!(sampled < (NUM_THREADS * NUM_ITERATIONS) as usize);
}

#[test]
fn test_metric_client_sampling_converges() {
    let (rx, client) = new_spy_client(3);
    let trials = 10_000;

    for _ in 0..trials {
        client.increment_with_sampling("some.counter", 0.1);
    }

    let fraction = rx.try_iter().count() as f64 / trials as f64;
    assert!(fraction > 0.08 && fraction < 0.12, "fraction was {}", fraction);
}

#[test]
fn test_metric_client_sampled_lines_carry_rate() {
    let (rx, client) = new_spy_client(4);

    for _ in 0..100 {
        client.increment_with_sampling("some.counter", 0.5);
    }

    let lines: Vec<String> = rx.try_iter().collect();
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|l| l == "some.counter:1|c|@0.500000"));
}

#[test]
fn test_metric_client_unsampled_rate_always_one_write() {
    let (rx, client) = new_spy_client(5);

    for rate in [1.0, 1.5, 100.0] {
        assert_eq!(1, client.try_send([("name", "v|c")], rate).unwrap());
        assert_eq!("name:v|c", rx.try_recv().unwrap());
        assert!(rx.try_recv().is_err());
    }
}

#[test]
fn test_metric_client_close_then_send() {
    let (rx, client) = new_spy_client(6);
    client.increment("before.close");
    client.close().unwrap();
    client.increment("after.close");
    client.close().unwrap();

    let lines: Vec<String> = rx.try_iter().collect();
    assert_eq!(vec!["before.close:1|c"], lines);

    let err = client.try_send([("after.close", "1|c")], 1.0).unwrap_err();
    assert_eq!(ErrorKind::SocketUnavailable, err.kind());
}
