pub mod camera_model;
pub mod config;
pub mod contours;
pub mod corners;
pub mod data_loader;
pub mod detector;
pub mod error;
pub mod geometry;
pub mod heading;
pub mod io;
pub mod preprocess;
pub mod synthetic;
pub mod types;
pub mod visualization;

pub use config::DetectorConfig;
pub use detector::{detect_cone, detect_cone_detailed, detect_cone_or_previous};
pub use error::{ConeError, Result};
pub use types::{Contour, CornerGroup, ObjectPose};
