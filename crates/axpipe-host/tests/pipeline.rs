//! End-to-end pipeline tests over the simulated accelerator.
//!
//! These drive the full path: submit -> input queue -> dispatch -> input
//! region -> sim kernels -> output region -> collection -> result queue ->
//! sink -> results file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use axpipe_device::SimDevice;
use axpipe_host::{HostConfig, Pipeline};

fn test_config(tag: &str) -> HostConfig {
    let path = std::env::temp_dir().join(format!(
        "axpipe-test-{}-{}.txt",
        tag,
        std::process::id()
    ));
    let _ = fs::remove_file(&path);
    HostConfig::from_env()
        .ack_poll_interval(Duration::from_millis(1))
        .result_poll_interval(Duration::from_millis(1))
        .results_path(path)
}

fn read_lines(path: &PathBuf) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

/// Poll the results file until it holds `count` lines (the sink flushes
/// per item, so the file is always observable mid-run).
fn wait_for_lines(path: &PathBuf, count: usize) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let lines = read_lines(path);
        if lines.len() >= count {
            return lines;
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {} results, have {:?}",
            count,
            lines
        );
        std::thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn test_running_product_order_preserved() {
    let config = test_config("order");
    let pipeline = Pipeline::launch(SimDevice::launch().unwrap(), &config).unwrap();

    // 0 resets the device accumulation; order must survive end to end.
    for value in [3, 4, 0, 5] {
        pipeline.submit(value);
    }

    let lines = wait_for_lines(&config.results_path, 4);
    pipeline.shutdown().unwrap();

    assert_eq!(lines, vec!["3", "12", "1", "5"]);
    let _ = fs::remove_file(&config.results_path);
}

#[test]
fn test_immediate_shutdown_leaves_store_unchanged() {
    let config = test_config("empty");
    let pipeline = Pipeline::launch(SimDevice::launch().unwrap(), &config).unwrap();

    pipeline.shutdown().unwrap();

    assert!(read_lines(&config.results_path).is_empty());
    let _ = fs::remove_file(&config.results_path);
}

#[test]
fn test_backlog_dispatched_in_fifo_order() {
    let config = test_config("backlog");
    let pipeline = Pipeline::launch(SimDevice::launch().unwrap(), &config).unwrap();

    // Enqueue everything before the dispatch worker can drain the first
    // item; the single-outstanding handshake serializes them anyway.
    let values = [2, 3, 5, 7, 0, 11, 13];
    for value in values {
        pipeline.submit(value);
    }

    let lines = wait_for_lines(&config.results_path, values.len());
    pipeline.shutdown().unwrap();

    let mut product: i32 = 1;
    let expected: Vec<String> = values
        .iter()
        .map(|&v| {
            if v == 0 {
                product = 1;
            } else {
                product = product.wrapping_mul(v);
            }
            product.to_string()
        })
        .collect();
    assert_eq!(lines, expected);
    let _ = fs::remove_file(&config.results_path);
}

#[test]
fn test_request_stop_is_idempotent() {
    let config = test_config("idem");
    let pipeline = Pipeline::launch(SimDevice::launch().unwrap(), &config).unwrap();

    pipeline.submit(6);
    let lines = wait_for_lines(&config.results_path, 1);
    assert_eq!(lines, vec!["6"]);

    pipeline.request_stop();
    pipeline.request_stop();
    pipeline.shutdown().unwrap();

    assert_eq!(read_lines(&config.results_path), vec!["6"]);
    let _ = fs::remove_file(&config.results_path);
}

#[test]
fn test_results_drained_after_stop() {
    let config = test_config("drain");
    let pipeline = Pipeline::launch(SimDevice::launch().unwrap(), &config).unwrap();

    for value in [4, 25] {
        pipeline.submit(value);
    }
    // Make sure both results are at least collected before stopping; the
    // sink must still persist whatever sits in the result queue.
    let lines = wait_for_lines(&config.results_path, 2);
    pipeline.shutdown().unwrap();

    assert_eq!(lines, vec!["4", "100"]);
    let _ = fs::remove_file(&config.results_path);
}
