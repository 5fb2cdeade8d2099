//! Writer to listener scenarios over real Unix sockets

use assert_matches::assert_matches;
use drawstream_e2e_tests::{init_test_logging, CaptureListener};
use types::{Feature, Topic, WriterMessage};
use writer::{
    AdaptationPhase, Callbacks, ProtocolViolation, Role, SocketWriter, WriterError, WriterSet,
};

#[tokio::test]
async fn test_sample_header_then_one_draw() {
    init_test_logging();
    let capture = CaptureListener::start(1).await.unwrap();
    let path = capture.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        let mut writer = SocketWriter::connect(&path, Role::Sample).unwrap();
        writer.names(&["lp__", "accept_stat__"]).unwrap();
        writer.values(&[-3.167e-06, 0.999965]).unwrap();
        writer.close().unwrap();
    })
    .await
    .unwrap();

    let capture = capture.finish().await.unwrap();
    assert_eq!(
        capture.connections,
        vec![vec![WriterMessage::new(
            Topic::Sample,
            vec![
                Feature::doubles("lp__", vec![-3.167e-06]),
                Feature::doubles("accept_stat__", vec![0.999965]),
            ]
        )]]
    );
}

#[tokio::test]
async fn test_init_values_then_names_rejected() {
    init_test_logging();
    let capture = CaptureListener::start(1).await.unwrap();
    let path = capture.path().to_path_buf();

    let rejected = tokio::task::spawn_blocking(move || {
        let mut writer = SocketWriter::connect(&path, Role::Init).unwrap();
        writer.values(&[0.1, -0.2, 0.3]).unwrap();
        let rejected = writer.names(&["theta"]);
        writer.close().unwrap();
        rejected
    })
    .await
    .unwrap();

    assert_matches!(
        rejected,
        Err(WriterError::Protocol(ProtocolViolation::UnexpectedCall { role: Role::Init, .. }))
    );

    let capture = capture.finish().await.unwrap();
    assert_eq!(capture.total(), 1);
    assert_eq!(
        capture.topic(Topic::Initialization)[0].features(),
        &[Feature::unnamed_doubles(vec![0.1, -0.2, 0.3])]
    );
}

#[tokio::test]
async fn test_full_run_with_adaptation() {
    init_test_logging();
    let capture = CaptureListener::start(3).await.unwrap();
    let path = capture.path().to_path_buf();

    let phases = tokio::task::spawn_blocking(move || {
        let mut writers = WriterSet::connect(&path).unwrap();
        let header = ["lp__", "accept_stat__", "mu"];

        writers.init.values(&[0.5]).unwrap();
        writers.sample.names(&header).unwrap();
        writers.diagnostic.names(&header).unwrap();

        // warmup draws go out before adaptation is reported
        writers.sample.values(&[-8.0, 0.7, 0.4]).unwrap();
        writers.diagnostic.values(&[-8.0, 0.7, 0.4]).unwrap();

        let mut phases = Vec::new();
        for line in [
            "Adaptation terminated",
            "Step size = 0.82",
            "Diagonal elements of inverse mass matrix:",
            "1.03",
        ] {
            writers.sample.text(line).unwrap();
            phases.push(writers.sample.adaptation_phase());
            if writers.sample.adaptation_phase() != AdaptationPhase::After {
                assert!(writers.sample.values(&[0.0, 0.0, 0.0]).is_err());
            }
        }

        writers.sample.values(&[-7.5, 0.9, 0.35]).unwrap();
        writers.sample.noop();
        writers.diagnostic.names(&["mu"]).unwrap();
        writers.close().unwrap();
        phases
    })
    .await
    .unwrap();

    assert_eq!(
        phases,
        vec![
            AdaptationPhase::During,
            AdaptationPhase::During,
            AdaptationPhase::Final,
            AdaptationPhase::After
        ]
    );

    let capture = capture.finish().await.unwrap();
    assert_eq!(capture.connections.len(), 3);

    assert_eq!(capture.topic(Topic::Initialization).len(), 1);

    let samples = capture.topic(Topic::Sample);
    // two draws plus four text lines
    assert_eq!(samples.len(), 6);
    assert_eq!(samples[0].features()[2], Feature::doubles("mu", vec![0.4]));
    assert_eq!(
        samples[2].features(),
        &[Feature::unnamed_bytes(vec![b"Step size = 0.82".to_vec()])]
    );
    assert_eq!(samples[5].features()[0], Feature::doubles("lp__", vec![-7.5]));

    let diagnostics = capture.topic(Topic::Diagnostic);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].features().len(), 3);
    assert_eq!(
        diagnostics[1].features(),
        &[Feature::unnamed_bytes(vec![b"mu".to_vec()])]
    );
}

#[tokio::test]
async fn test_listener_gone_surfaces_transport_error() {
    init_test_logging();
    let capture = CaptureListener::start(1).await.unwrap();
    let path = capture.path().to_path_buf();
    drop(capture);

    let result = tokio::task::spawn_blocking(move || SocketWriter::connect(&path, Role::Sample))
        .await
        .unwrap();
    assert_matches!(result, Err(WriterError::Transport(_)));
}
