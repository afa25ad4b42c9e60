use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::detector::FrameResult;
use crate::error::Result;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: impl AsRef<Path>, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Values published for the robot controller each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub frame: usize,
    pub found: bool,
    pub angle_deg: f64,
    pub x: f64,
    pub y: f64,
}

impl TelemetryRecord {
    /// Zeros are published when there is neither a detection nor a held pose.
    pub fn from_frame_result(frame: usize, result: &FrameResult) -> TelemetryRecord {
        let (angle_deg, x, y) = result
            .pose
            .map(|p| {
                let c = p.centroid_position();
                (p.angle_degrees(), c.x, c.y)
            })
            .unwrap_or((0.0, 0.0, 0.0));
        TelemetryRecord {
            frame,
            found: result.found,
            angle_deg,
            x,
            y,
        }
    }
}

/// Writes one JSON object per line.
pub struct TelemetryWriter<W: Write> {
    out: W,
}

impl<W: Write> TelemetryWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn publish(&mut self, record: &TelemetryRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TelemetryWriter<std::io::BufWriter<std::fs::File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(std::io::BufWriter::new(std::fs::File::create(path)?)))
    }
}

/// Summary of a processed batch of frames.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub frames: usize,
    pub detections: usize,
    pub detection_rate: f64,
    pub mean_angle_deg: Option<f64>,
    pub elapsed_sec: f64,
}

impl RunReport {
    pub fn from_records(timestamp: String, records: &[TelemetryRecord], elapsed_sec: f64) -> Self {
        let found: Vec<_> = records.iter().filter(|r| r.found).collect();
        let mean_angle_deg = if found.is_empty() {
            None
        } else {
            Some(found.iter().map(|r| r.angle_deg).sum::<f64>() / found.len() as f64)
        };
        let detection_rate = if records.is_empty() {
            0.0
        } else {
            found.len() as f64 / records.len() as f64
        };
        RunReport {
            timestamp,
            frames: records.len(),
            detections: found.len(),
            detection_rate,
            mean_angle_deg,
            elapsed_sec,
        }
    }
}

/// Local time as `YYYYmmdd_HHMMSS`, UTC when the local offset is unknown.
pub fn timestamp_string() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
