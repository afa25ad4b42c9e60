use clap::{Parser, Subcommand};
use cone_orientation::synthetic::ConeSilhouette;
use glam::DVec2;
use serde::Serialize;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic cone masks sweeping the heading
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of frames to generate
        #[arg(short, long, default_value = "36")]
        num_frames: usize,

        /// Cone length in pixels, apex to base
        #[arg(long, default_value = "100.0")]
        length: f64,

        /// Cone base width in pixels
        #[arg(long, default_value = "100.0")]
        base_width: f64,

        /// Image width
        #[arg(long, default_value = "642")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "482")]
        height: u32,
    },
}

#[derive(Serialize)]
struct FrameTruth {
    file: String,
    heading_deg: f64,
    apex: [f64; 2],
    base_center: [f64; 2],
    area: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            num_frames,
            length,
            base_width,
            width,
            height,
        } => {
            generate_dataset(&output, num_frames, length, base_width, width, height)?;
        }
    }

    Ok(())
}

fn generate_dataset(
    output_dir: &str,
    num_frames: usize,
    length: f64,
    base_width: f64,
    width: u32,
    height: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::fs;

    fs::create_dir_all(output_dir)?;
    let center = DVec2::new(width as f64 / 2.0, height as f64 / 2.0);

    let mut truth = Vec::with_capacity(num_frames);
    for frame_idx in 0..num_frames {
        let heading = std::f64::consts::TAU * frame_idx as f64 / num_frames.max(1) as f64
            - std::f64::consts::PI;
        let cone = ConeSilhouette::from_heading(center, length, base_width, heading);
        let mask = cone.render(width, height);

        let filename = format!("{:06}.png", frame_idx);
        mask.save(Path::new(output_dir).join(&filename))?;
        log::trace!("wrote {} at heading {:.3}", filename, heading);

        truth.push(FrameTruth {
            file: filename,
            heading_deg: heading.to_degrees(),
            apex: cone.apex.to_array(),
            base_center: cone.base_center.to_array(),
            area: cone.area(),
        });
    }

    fs::write(
        Path::new(output_dir).join("truth.json"),
        serde_json::to_string_pretty(&truth)?,
    )?;

    println!("Generated {} frames in {}", num_frames, output_dir);
    Ok(())
}
