//! Error handling tests: invalid construction, degenerate geometry and failing collaborators

use posture_monitor::{
    alert::{AlertSink, SoundAlert},
    geometry::inclination_angle,
    metrics::try_calculate_metrics,
    landmarks::{Landmark, LandmarkCollection, PoseLandmark},
    pose_engine::{decode_landmarks, OnnxPoseEngine},
    tracker::{PostureTracker, TrackerSettings},
    utils::safe_cast::{f64_to_i32, normalized_to_pixel},
    Error,
};

#[test]
fn test_tracker_rejects_bad_frame_rate() {
    for fps in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        let settings = TrackerSettings {
            fps,
            ..TrackerSettings::default()
        };
        assert!(matches!(PostureTracker::new(settings), Err(Error::InvalidInput(_))));
    }
}

#[test]
fn test_degenerate_geometry_is_explicit() {
    let result = inclination_angle(320.0, 0.0, 330.0, 50.0);
    match result {
        Err(Error::DegenerateGeometry(msg)) => assert!(!msg.is_empty()),
        other => panic!("expected DegenerateGeometry, got {other:?}"),
    }
}

#[test]
fn test_metrics_report_missing_landmark() {
    let collection = LandmarkCollection::new(vec![Landmark::new(0.5, 0.5, 0.0); 8]);
    let err = try_calculate_metrics(&collection, 640, 480).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.to_string().contains(&PoseLandmark::LeftShoulder.to_string()));
}

#[test]
fn test_missing_sound_file_is_audio_error() {
    let mut sink = SoundAlert::with_system_player("no/such/sound.mp3", 0.2);
    assert!(matches!(sink.alert(), Err(Error::Audio(_))));
    assert_eq!(sink.name(), "SoundAlert");
}

#[test]
fn test_missing_player_is_audio_error() {
    let sound = std::env::temp_dir().join(format!("posture_monitor_{}_alert.mp3", std::process::id()));
    std::fs::write(&sound, b"").unwrap();

    let mut sink = SoundAlert::new("definitely-not-an-audio-player", Vec::new(), &sound);
    let result = sink.alert();
    std::fs::remove_file(&sound).ok();

    assert!(matches!(result, Err(Error::Audio(_))));
}

#[test]
fn test_missing_model_fails_to_load() {
    assert!(OnnxPoseEngine::new("no/such/model.onnx").is_err());
}

#[test]
fn test_truncated_model_output() {
    let result = decode_landmarks(&[0.0; 40], Some(1.0), 256, 0.5);
    assert!(matches!(result, Err(Error::ModelOutputError(_))));
}

#[test]
fn test_pixel_conversion_errors() {
    assert!(normalized_to_pixel(f32::NAN, 640).is_err());
    assert!(normalized_to_pixel(0.5, -1).is_err());
    assert!(f64_to_i32(1e12).is_err());
}

#[test]
fn test_error_messages() {
    let err = Error::Camera("Cannot open camera 3".to_string());
    assert!(err.to_string().contains("camera 3"));

    let err = Error::ConfigError("bad fps".to_string());
    assert!(err.to_string().contains("bad fps"));
}
