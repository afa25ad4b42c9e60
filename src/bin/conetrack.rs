use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use cone_orientation::config::DetectorConfig;
use cone_orientation::contours::SelectionPolicy;
use cone_orientation::data_loader::{FrameKind, list_frames, load_font, process_frames};
use cone_orientation::detector::resolve_with_previous;
use cone_orientation::io::{
    RunReport, TelemetryRecord, TelemetryWriter, object_from_json, object_to_json, timestamp_string,
};
use cone_orientation::types::ObjectPose;

#[derive(Parser)]
#[command(version, about, author)]
struct ConeTrackCli {
    /// path to image folder
    path: Option<String>,

    /// detector config json, defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// whether the frames are camera images or ready binary masks
    #[arg(short, long, value_enum, default_value = "color")]
    kind: FrameKind,

    /// override the contour selection policy of the config
    #[arg(long, value_enum)]
    selection: Option<SelectionPolicy>,

    /// output folder, defaults to results/<timestamp>
    #[arg(short, long)]
    output: Option<String>,

    /// write a debug overlay png per frame
    #[arg(long)]
    overlay: bool,

    /// ttf/otf font used to print the pose on overlays
    #[arg(long)]
    font: Option<String>,

    /// report the last found pose on frames without a detection
    #[arg(long)]
    hold_last: bool,

    /// write the default config to this path and exit
    #[arg(long)]
    dump_config: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = ConeTrackCli::parse();

    if let Some(path) = &cli.dump_config {
        object_to_json(path, &DetectorConfig::default())?;
        println!("default config written to {}", path);
        return Ok(());
    }
    let Some(path) = &cli.path else {
        return Err("an image folder is required".into());
    };

    let mut config: DetectorConfig = match &cli.config {
        Some(p) => object_from_json(p)?,
        None => DetectorConfig::default(),
    };
    if let Some(selection) = cli.selection {
        config.selection = selection;
    }
    config.validate()?;

    let timestamp = timestamp_string();
    let output_folder = PathBuf::from(
        cli.output
            .clone()
            .unwrap_or_else(|| format!("results/{}", timestamp)),
    );
    std::fs::create_dir_all(&output_folder)?;
    let overlay_dir = if cli.overlay {
        let dir = output_folder.join("overlay");
        std::fs::create_dir_all(&dir)?;
        Some(dir)
    } else {
        None
    };
    object_to_json(output_folder.join("config.json"), &config)?;

    let frames = list_frames(path)?;
    log::info!("{} frames in {}", frames.len(), path);

    let now = Instant::now();
    let font = match &cli.font {
        Some(p) => Some(load_font(p)?),
        None => None,
    };
    let outputs = process_frames(
        &frames,
        cli.kind,
        &config,
        overlay_dir.as_deref(),
        font.as_ref(),
    );
    let duration_sec = now.elapsed().as_secs_f64();
    println!("detecting cones took {:.6} sec", duration_sec);
    if !outputs.is_empty() {
        println!("avg: {} sec", duration_sec / outputs.len() as f64);
    }

    let mut telemetry = TelemetryWriter::create(output_folder.join("telemetry.jsonl"))?;
    let mut records = Vec::with_capacity(outputs.len());
    let mut previous: Option<ObjectPose> = None;
    for out in &outputs {
        let detected = out.detection.as_ref().map(|d| d.pose);
        let held = if cli.hold_last { previous.as_ref() } else { None };
        let result = resolve_with_previous(detected, held);
        if result.found {
            previous = result.pose;
        }
        let record = TelemetryRecord::from_frame_result(out.index, &result);
        log::debug!(
            "{}: found {}, x {:.3}, y {:.3}, angle {:.3}",
            out.path.display(),
            record.found,
            record.x,
            record.y,
            record.angle_deg
        );
        telemetry.publish(&record)?;
        records.push(record);
    }
    telemetry.flush()?;

    let report = RunReport::from_records(timestamp, &records, duration_sec);
    println!(
        "found a cone in {} of {} frames",
        report.detections, report.frames
    );
    object_to_json(output_folder.join("report.json"), &report)?;
    Ok(())
}
