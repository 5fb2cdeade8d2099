//! Configured collector receiving a run, then dumping it

use drawstream_config::DrawstreamConfig;
use drawstream_e2e_tests::init_test_logging;
use fit_collector::{dump_frames, FitCollector};
use std::fs;
use tempfile::tempdir;
use tokio::sync::oneshot;
use types::Topic;
use writer::{Callbacks, WriterSet};

#[tokio::test]
async fn test_configured_collector_stores_every_frame() {
    init_test_logging();
    let dir = tempdir().unwrap();

    let mut config = DrawstreamConfig::default();
    config.socket.path = dir.path().join("sockets").join("fit.sock");
    config.collector.output = dir.path().join("fits").join("run.fit");

    let collector = FitCollector::bind(config.socket.to_socket_config(), &config.collector.output)
        .await
        .unwrap();
    assert_eq!(collector.socket_path(), config.socket.path.as_path());

    let (stop, stopped) = oneshot::channel::<()>();
    let run = tokio::spawn(collector.run_until(async {
        let _ = stopped.await;
    }));

    let socket_path = config.socket.path.clone();
    let sent = tokio::task::spawn_blocking(move || {
        let mut writers = WriterSet::connect(&socket_path).unwrap();
        writers.init.values(&[1.5, 2.5]).unwrap();
        writers.sample.names(&["lp__"]).unwrap();
        for draw in 0..25 {
            writers.sample.values(&[-(draw as f64)]).unwrap();
        }
        writers.diagnostic.text("Gradient evaluation took 2e-05 seconds").unwrap();
        let sent = writers.frames_sent();
        writers.close().unwrap();
        sent
    })
    .await
    .unwrap();

    stop.send(()).unwrap();
    let summary = run.await.unwrap().unwrap();
    assert_eq!(summary.frames.total(), sent);
    assert_eq!(summary.frames.sample, 25);

    // socket file is removed on shutdown
    assert!(!config.socket.path.exists());

    let data = fs::read(&config.collector.output).unwrap();
    let messages = codec::decode_frames(&data).unwrap();
    assert_eq!(messages.len() as u64, sent);

    // draws from one writer keep their order in the file
    let draws: Vec<f64> = messages
        .iter()
        .filter(|m| m.topic == Topic::Sample as i32)
        .map(|m| m.features()[0].double_values().unwrap()[0])
        .collect();
    assert_eq!(draws, (0..25).map(|d| -(d as f64)).collect::<Vec<_>>());

    let mut out = Vec::new();
    assert_eq!(dump_frames(&data, &mut out).unwrap(), messages.len());
}
