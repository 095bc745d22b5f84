// Hand observations and the per-frame finger pose classifier.
// A HandObservation is a plain value recreated every frame; nothing here tracks a hand
// across frames.

use serde::Deserialize;

use crate::types::Point;

/// Landmark indices (MediaPipe hand model convention).
#[allow(dead_code)]
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

pub const LANDMARK_COUNT: usize = 21;

/// Bone connections used for the skeleton overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = {
    use landmarks::*;
    [
        (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
        (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
        (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
        (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
        (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
        (WRIST, PINKY_MCP),
    ]
};

/// A single landmark in normalized image coordinates (x right, y down, both nominally 0..1).
/// The helper also sends a relative depth `z`; nothing here uses it, so serde drops it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub handedness: Handedness,
}

impl HandObservation {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT], handedness: Handedness) -> Self {
        Self { landmarks, handedness }
    }

    #[inline]
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    /// Landmark position in pixels of a `width` x `height` frame (truncated toward zero).
    /// Scaled in f64 so 0.7 * 100 lands on 69, not on an f32-rounded 70.
    pub fn pixel(&self, index: usize, width: usize, height: usize) -> Point {
        let lm = self.landmarks[index];
        Point::new(
            (lm.x as f64 * width as f64) as i32,
            (lm.y as f64 * height as f64) as i32,
        )
    }

    pub fn wrist_x(&self) -> f32 {
        self.landmarks[landmarks::WRIST].x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    #[cfg(test)]
    pub const ALL: [Finger; 5] = [Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// (tip, dip) landmark indices.
    pub fn joints(self) -> (usize, usize) {
        use landmarks::*;
        match self {
            Finger::Thumb => (THUMB_TIP, THUMB_IP),
            Finger::Index => (INDEX_TIP, INDEX_DIP),
            Finger::Middle => (MIDDLE_TIP, MIDDLE_DIP),
            Finger::Ring => (RING_TIP, RING_DIP),
            Finger::Pinky => (PINKY_TIP, PINKY_DIP),
        }
    }
}

/// Which fingers are extended this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    #[cfg(test)]
    pub fn is_up(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    /// Classify finger extension from one hand's landmarks.
    ///
    /// Fingers count as extended when the tip sits above the DIP joint (smaller y). The thumb
    /// extends sideways, so it compares x instead, with the sign flipped for left hands.
    pub fn classify(hand: &HandObservation) -> Self {
        let up = |finger: Finger| {
            let (tip, dip) = finger.joints();
            let (tip, dip) = (hand.landmark(tip), hand.landmark(dip));
            match finger {
                Finger::Thumb => match hand.handedness {
                    Handedness::Right => tip.x > dip.x,
                    Handedness::Left => tip.x < dip.x,
                },
                _ => tip.y < dip.y,
            }
        };
        Self {
            thumb: up(Finger::Thumb),
            index: up(Finger::Index),
            middle: up(Finger::Middle),
            ring: up(Finger::Ring),
            pinky: up(Finger::Pinky),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Closed fist: every tip below its DIP, thumb tucked toward the palm.
    pub(crate) fn fist(handedness: Handedness) -> HandObservation {
        let tucked = match handedness {
            Handedness::Right => 0.44,
            Handedness::Left => 0.46,
        };
        let mut lms = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        lms[landmarks::WRIST] = Landmark::new(0.5, 0.8);
        for finger in Finger::ALL {
            let (tip, dip) = finger.joints();
            lms[dip] = Landmark::new(0.5, 0.5);
            lms[tip] = Landmark::new(0.5, 0.6);
        }
        lms[landmarks::THUMB_IP] = Landmark::new(0.45, 0.55);
        lms[landmarks::THUMB_TIP] = Landmark::new(tucked, 0.55);
        HandObservation::new(lms, handedness)
    }

    pub(crate) fn raise(hand: &mut HandObservation, finger: Finger) {
        let (tip, dip) = finger.joints();
        let d = hand.landmarks[dip];
        hand.landmarks[tip] = match finger {
            Finger::Thumb => match hand.handedness {
                Handedness::Right => Landmark::new(d.x + 0.05, d.y),
                Handedness::Left => Landmark::new(d.x - 0.05, d.y),
            },
            _ => Landmark::new(d.x, d.y - 0.1),
        };
    }

    #[test]
    fn fist_has_no_fingers_up() {
        let state = FingerState::classify(&fist(Handedness::Right));
        assert_eq!(state, FingerState::default());
    }

    #[test]
    fn single_finger_raised() {
        for finger in Finger::ALL {
            let mut hand = fist(Handedness::Right);
            raise(&mut hand, finger);
            let state = FingerState::classify(&hand);
            for other in Finger::ALL {
                assert_eq!(state.is_up(other), other == finger, "{finger:?} raised, checking {other:?}");
            }
        }
    }

    #[test]
    fn tip_level_with_dip_is_not_extended() {
        let mut hand = fist(Handedness::Right);
        let (tip, dip) = Finger::Index.joints();
        hand.landmarks[tip] = hand.landmarks[dip];
        assert!(!FingerState::classify(&hand).index);
    }

    #[test]
    fn handedness_flips_thumb() {
        let mut hand = fist(Handedness::Right);
        hand.landmarks[landmarks::THUMB_IP] = Landmark::new(0.40, 0.5);
        hand.landmarks[landmarks::THUMB_TIP] = Landmark::new(0.46, 0.5);
        assert!(FingerState::classify(&hand).thumb);

        hand.handedness = Handedness::Left;
        assert!(!FingerState::classify(&hand).thumb);

        hand.landmarks[landmarks::THUMB_TIP] = Landmark::new(0.30, 0.5);
        assert!(FingerState::classify(&hand).thumb);
    }

    #[test]
    fn pixel_truncates() {
        let mut hand = fist(Handedness::Right);
        hand.landmarks[landmarks::INDEX_TIP] = Landmark::new(0.5, 0.2501);
        assert_eq!(hand.pixel(landmarks::INDEX_TIP, 640, 480), Point::new(320, 120));
    }

    #[test]
    fn pixel_scales_without_rounding_up() {
        let mut hand = fist(Handedness::Right);
        // 0.7f32 is 0.69999998..., so the tip sits in column 69 of a 100 px frame.
        hand.landmarks[landmarks::INDEX_TIP] = Landmark::new(0.7, 0.7);
        assert_eq!(hand.pixel(landmarks::INDEX_TIP, 100, 100), Point::new(69, 69));
    }
}
