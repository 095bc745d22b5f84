// Hand landmark source.
// Inference runs in a helper process (MediaPipe Hands). Per frame we write a little-endian
// header `width, height, channels` (u32 each) followed by the raw RGB bytes, and read back
// one JSON line:
//   {"hands":[{"handedness":"Right","score":0.97,"landmarks":[{"x":0.5,"y":0.4,"z":0.0}, ...]}],"error":null}

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::hand::{Handedness, HandObservation, Landmark, LANDMARK_COUNT};

/// Anything that can find hands in a frame.
pub trait LandmarkSource {
    /// Detected hands in the order the detector reports them; empty when there is no hand.
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandObservation>, Error>;
}

/// Detector thresholds, fixed for the whole session.
#[derive(Debug, Clone, Copy)]
pub struct Confidence {
    pub detection: f32,
    pub tracking: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: Handedness,
    #[serde(default)]
    score: f32,
    landmarks: Vec<Landmark>,
}

#[derive(Deserialize, Debug)]
struct DetectionReply {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one reply line. Hands with the wrong landmark count are dropped.
fn parse_reply(line: &str) -> Result<Vec<HandObservation>, Error> {
    let reply: DetectionReply = serde_json::from_str(line)?;
    if let Some(err) = reply.error {
        warn!("landmark helper reported: {err}");
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(reply.hands.len());
    for hand in reply.hands {
        let count = hand.landmarks.len();
        let Ok(landmarks) = <[Landmark; LANDMARK_COUNT]>::try_from(hand.landmarks) else {
            warn!("expected {LANDMARK_COUNT} landmarks, got {count}; skipping hand");
            continue;
        };
        debug!("{:?} hand (score {:.2})", hand.handedness, hand.score);
        hands.push(HandObservation::new(landmarks, hand.handedness));
    }
    Ok(hands)
}

/// MediaPipe helper running as a child process.
pub struct SubprocessLandmarker {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    line: String,
}

impl SubprocessLandmarker {
    /// Start `interpreter script` and wait for it to print `READY`.
    pub fn spawn(interpreter: &str, script: &Path, confidence: Confidence) -> Result<Self, Error> {
        if !script.exists() {
            return Err(Error::Landmarker(format!("helper script not found at {}", script.display())));
        }

        info!("starting hand landmark helper: {interpreter} {}", script.display());
        let mut process = Command::new(interpreter)
            .arg(script)
            .arg("--min-detection-confidence")
            .arg(confidence.detection.to_string())
            .arg("--min-tracking-confidence")
            .arg(confidence.tracking.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Landmarker(format!("spawn {interpreter}: {e}")))?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(Error::Landmarker("helper pipes unavailable".into()));
        };

        let mut helper = Self { process, stdin, stdout: BufReader::new(stdout), line: String::new() };
        helper.read_line()?;
        if helper.line.trim() != "READY" {
            return Err(Error::Landmarker(format!(
                "helper did not signal ready, got {:?}",
                helper.line.trim()
            )));
        }
        info!("hand landmark helper ready");
        Ok(helper)
    }

    fn read_line(&mut self) -> Result<(), Error> {
        self.line.clear();
        if self.stdout.read_line(&mut self.line)? == 0 {
            return Err(Error::Landmarker("helper closed its output".into()));
        }
        Ok(())
    }
}

impl LandmarkSource for SubprocessLandmarker {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandObservation>, Error> {
        let (w, h) = frame.dimensions();
        self.stdin.write_all(&w.to_le_bytes())?;
        self.stdin.write_all(&h.to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(frame.as_raw())?;
        self.stdin.flush()?;

        self.read_line()?;
        parse_reply(&self.line)
    }
}

impl Drop for SubprocessLandmarker {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
