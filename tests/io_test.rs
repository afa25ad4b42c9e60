use cone_orientation::config::DetectorConfig;
use cone_orientation::contours::SelectionPolicy;
use cone_orientation::data_loader::{
    FrameKind, list_frames, load_font, load_mask, process_frames,
};
use cone_orientation::detector::FrameResult;
use cone_orientation::io::{
    RunReport, TelemetryRecord, TelemetryWriter, object_from_json, object_to_json,
    timestamp_string,
};
use cone_orientation::synthetic::ConeSilhouette;
use cone_orientation::visualization::pose_caption;
use cone_orientation::ObjectPose;
use glam::{DVec2, IVec2};
use image::GrayImage;
use tempfile::tempdir;

fn pose(angle: f64) -> ObjectPose {
    ObjectPose::new(
        DVec2::new(1.5, 40.0),
        DVec2::new(2.0, 55.0),
        IVec2::new(320, 200),
        IVec2::new(322, 150),
        angle,
    )
}

#[test]
fn test_config_json_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = DetectorConfig::default();
    config.selection = SelectionPolicy::Biggest;
    config.corners.near_distance = 12.0;
    object_to_json(&path, &config).unwrap();

    let loaded: DetectorConfig = object_from_json(&path).unwrap();
    assert_eq!(loaded.selection, SelectionPolicy::Biggest);
    assert_eq!(loaded.corners, config.corners);
    assert_eq!(loaded.camera.resolution, config.camera.resolution);
    assert!((loaded.camera.fov - config.camera.fov).abs().max_element() < 1e-12);
    assert!((loaded.max_tip_error - config.max_tip_error).abs() < 1e-12);
    assert_eq!(loaded.preprocess, config.preprocess);
}

#[test]
fn test_partial_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(
        &path,
        r#"{"min_contour_area": 1000.0, "selection": "smallest", "corners": {"close_distance": 4.0}}"#,
    )
    .unwrap();

    let loaded: DetectorConfig = object_from_json(&path).unwrap();
    let defaults = DetectorConfig::default();
    assert_eq!(loaded.min_contour_area, 1000.0);
    assert_eq!(loaded.selection, SelectionPolicy::Smallest);
    assert_eq!(loaded.corners.close_distance, 4.0);
    assert_eq!(loaded.corners.near_distance, defaults.corners.near_distance);
    assert_eq!(loaded.max_contour_area, defaults.max_contour_area);
    assert_eq!(loaded.camera, defaults.camera);
}

#[test]
fn test_object_from_json_errors() {
    let dir = tempdir().unwrap();
    assert!(object_from_json::<DetectorConfig>(dir.path().join("missing.json")).is_err());

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(object_from_json::<DetectorConfig>(&path).is_err());
}

#[test]
fn test_telemetry_records() {
    let found = FrameResult {
        found: true,
        pose: Some(pose(std::f64::consts::FRAC_PI_4)),
    };
    let record = TelemetryRecord::from_frame_result(3, &found);
    assert_eq!(record.frame, 3);
    assert!(record.found);
    assert!((record.angle_deg - 45.0).abs() < 1e-9);
    assert_eq!((record.x, record.y), (1.5, 40.0));

    let held = FrameResult {
        found: false,
        pose: Some(pose(0.0)),
    };
    let record = TelemetryRecord::from_frame_result(4, &held);
    assert!(!record.found);
    assert_eq!(record.y, 40.0);

    let none = FrameResult {
        found: false,
        pose: None,
    };
    let record = TelemetryRecord::from_frame_result(5, &none);
    assert_eq!((record.angle_deg, record.x, record.y), (0.0, 0.0, 0.0));
}

#[test]
fn test_telemetry_writer_json_lines() {
    let mut writer = TelemetryWriter::new(Vec::new());
    let records = [
        TelemetryRecord {
            frame: 0,
            found: true,
            angle_deg: 10.0,
            x: 1.0,
            y: 2.0,
        },
        TelemetryRecord {
            frame: 1,
            found: false,
            angle_deg: 0.0,
            x: 0.0,
            y: 0.0,
        },
    ];
    for r in &records {
        writer.publish(r).unwrap();
    }
    writer.flush().unwrap();

    let text = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let parsed: TelemetryRecord = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(parsed, records[0]);
}

#[test]
fn test_run_report() {
    let records: Vec<TelemetryRecord> = [(true, 10.0), (false, 0.0), (true, 30.0), (false, 0.0)]
        .iter()
        .enumerate()
        .map(|(frame, &(found, angle_deg))| TelemetryRecord {
            frame,
            found,
            angle_deg,
            x: 0.0,
            y: 0.0,
        })
        .collect();
    let report = RunReport::from_records("t".to_string(), &records, 2.0);
    assert_eq!(report.frames, 4);
    assert_eq!(report.detections, 2);
    assert_eq!(report.detection_rate, 0.5);
    assert_eq!(report.mean_angle_deg, Some(20.0));

    let empty = RunReport::from_records("t".to_string(), &[], 0.0);
    assert_eq!(empty.detection_rate, 0.0);
    assert_eq!(empty.mean_angle_deg, None);
}

#[test]
fn test_timestamp_format() {
    let ts = timestamp_string();
    assert_eq!(ts.len(), 15);
    assert_eq!(ts.as_bytes()[8], b'_');
    assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
}

#[test]
fn test_list_frames() {
    let dir = tempdir().unwrap();
    for name in ["b.png", "a.PNG", "c.jpg", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    let frames = list_frames(dir.path()).unwrap();
    let names: Vec<String> = frames
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.PNG", "b.png", "c.jpg"]);

    assert!(list_frames(dir.path().join("missing")).is_err());
}

#[test]
fn test_process_mask_frames() {
    let dir = tempdir().unwrap();
    let overlay = tempdir().unwrap();
    let mut config = DetectorConfig::default();
    config.camera.resolution = IVec2::new(640, 480);

    let center = DVec2::new(320.0, 240.0);
    ConeSilhouette::from_heading(center, 100.0, 100.0, 0.3)
        .render(640, 480)
        .save(dir.path().join("000000.png"))
        .unwrap();
    GrayImage::new(640, 480)
        .save(dir.path().join("000001.png"))
        .unwrap();
    std::fs::write(dir.path().join("000002.png"), b"not an image").unwrap();

    let (_, mask) = load_mask(&dir.path().join("000000.png"), FrameKind::Mask, &config).unwrap();
    assert_eq!(mask.dimensions(), (640, 480));
    assert!(load_mask(&dir.path().join("000002.png"), FrameKind::Mask, &config).is_err());

    let frames = list_frames(dir.path()).unwrap();
    let outputs = process_frames(&frames, FrameKind::Mask, &config, Some(overlay.path()), None);
    assert_eq!(outputs.len(), 3);
    assert_eq!(
        outputs.iter().map(|o| o.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(outputs[0].detection.is_some());
    assert!(outputs[1].detection.is_none());
    assert!(outputs[2].detection.is_none());
    assert!(overlay.path().join("000000_overlay.png").exists());
    assert!(overlay.path().join("000001_overlay.png").exists());
}

#[test]
fn test_pose_caption() {
    let caption = pose_caption(&pose(std::f64::consts::FRAC_PI_2));
    assert_eq!(caption, "X:1.500000, Y:40.000000, A:90.000000");
}

#[test]
fn test_load_font_errors() {
    let dir = tempdir().unwrap();
    assert!(load_font(dir.path().join("missing.ttf")).is_err());

    let path = dir.path().join("bogus.ttf");
    std::fs::write(&path, b"definitely not a font").unwrap();
    assert!(load_font(&path).is_err());
}
