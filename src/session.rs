// Per-frame pipeline state: everything that outlives a single frame lives in Session.

use log::{debug, info};

use crate::canvas::{Canvas, StrokeAccumulator};
use crate::gesture::GestureMode;
use crate::hand::{landmarks, FingerState, HandObservation};
use crate::history::{TipSmoother, WaveDetector};
use crate::types::{Point, Segment};

/// What one frame did, for the overlay and the log.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub mode: GestureMode,
    pub fingers: Option<FingerState>,
    /// Where the cursor ring goes: smoothed index tip in Draw mode, raw thumb tip otherwise.
    pub cursor: Option<Point>,
    /// The wave gesture wiped the canvas this frame.
    pub cleared: bool,
    pub segment: Option<Segment>,
}

pub struct Session {
    canvas: Option<Canvas>,
    strokes: StrokeAccumulator,
    smoother: TipSmoother,
    wave: WaveDetector,
    mode: GestureMode,
}

impl Session {
    pub fn new() -> Self {
        Self {
            canvas: None,
            strokes: StrokeAccumulator::new(),
            smoother: TipSmoother::new(),
            wave: WaveDetector::default(),
            mode: GestureMode::Idle,
        }
    }

    /// `None` until the first frame has been processed.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    #[cfg(test)]
    pub fn strokes(&self) -> &StrokeAccumulator {
        &self.strokes
    }

    /// Run one frame: classify, resolve, smooth, maybe clear, maybe draw.
    ///
    /// The canvas is created at the size of the first frame and keeps that size. Only the first
    /// detected hand should be passed in.
    pub fn process_frame(
        &mut self,
        hand: Option<&HandObservation>,
        width: usize,
        height: usize,
        brush: u32,
    ) -> FrameOutcome {
        let canvas = self.canvas.get_or_insert_with(|| {
            info!("canvas created at {width}x{height}");
            Canvas::new(width, height)
        });

        let Some(hand) = hand else {
            self.strokes.reset();
            if self.mode != GestureMode::Idle {
                debug!("hand lost, {:?} -> Idle", self.mode);
            }
            self.mode = GestureMode::Idle;
            return FrameOutcome {
                mode: GestureMode::Idle,
                fingers: None,
                cursor: None,
                cleared: false,
                segment: None,
            };
        };

        let waving = self.wave.push(hand.wrist_x());
        let tip = self.smoother.push(hand.pixel(landmarks::INDEX_TIP, width, height));
        let thumb = hand.pixel(landmarks::THUMB_TIP, width, height);

        let fingers = FingerState::classify(hand);
        let mode = GestureMode::resolve(Some(&fingers));
        if mode != self.mode {
            debug!("{:?} -> {mode:?} ({fingers:?})", self.mode);
            self.mode = mode;
        }

        if waving {
            canvas.clear();
        }

        let point = if mode == GestureMode::Draw { tip } else { thumb };
        let segment = self.strokes.step(canvas, mode, point, brush);

        FrameOutcome {
            mode,
            fingers: Some(fingers),
            cursor: Some(point),
            cleared: waving,
            segment,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
