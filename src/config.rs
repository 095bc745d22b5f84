// Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::draw::BrushSlider;
use crate::error::Error;
use crate::landmarker::Confidence;

/// Finger paint - draw in the air with your index finger
#[derive(Parser, Debug, Clone)]
#[command(name = "finger-paint")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Camera device index
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width (the camera may pick the closest it supports)
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Requested capture frame rate
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Minimum hand detection confidence (0.0 - 1.0)
    #[arg(long, default_value_t = 0.5)]
    pub detection_confidence: f32,

    /// Minimum hand tracking confidence (0.0 - 1.0)
    #[arg(long, default_value_t = 0.5)]
    pub tracking_confidence: f32,

    /// Interpreter used to run the landmark helper
    #[arg(long, default_value = "python3")]
    pub python: String,

    /// Hand landmark helper script
    #[arg(long, default_value = "helpers/hand_landmarks.py")]
    pub landmarker: PathBuf,

    /// Initial brush size in pixels (0 - 100; 0 still paints 1 px)
    #[arg(long, default_value_t = 10)]
    pub brush: u32,

    /// Show the camera image unmirrored
    #[arg(long)]
    pub no_mirror: bool,

    /// Skip lighting normalisation before hand detection
    #[arg(long)]
    pub no_enhance: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Check values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("detection-confidence", self.detection_confidence),
            ("tracking-confidence", self.tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{name} must be in [0, 1], got {value}")));
            }
        }
        if self.brush > BrushSlider::MAX {
            return Err(Error::Config(format!(
                "brush must be in [0, {}], got {}",
                BrushSlider::MAX,
                self.brush
            )));
        }
        if self.width == 0 || self.height == 0 || self.fps == 0 {
            return Err(Error::Config(format!(
                "capture format must be non-zero, got {}x{} @ {}",
                self.width, self.height, self.fps
            )));
        }
        Ok(())
    }

    pub fn confidence(&self) -> Confidence {
        Confidence {
            detection: self.detection_confidence,
            tracking: self.tracking_confidence,
        }
    }
}
