// Maps the finger pose of one frame to the interaction mode.

use crate::hand::FingerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    /// Index up, middle down.
    Draw,
    /// Thumb up, index and middle down.
    Erase,
    /// Anything else, including frames without a hand.
    Idle,
}

impl GestureMode {
    /// Resolve the mode for this frame; `None` means no hand was detected.
    pub fn resolve(fingers: Option<&FingerState>) -> Self {
        match fingers {
            Some(f) if f.index && !f.middle => GestureMode::Draw,
            Some(f) if f.thumb && !f.index && !f.middle => GestureMode::Erase,
            _ => GestureMode::Idle,
        }
    }

    /// HUD label.
    pub fn label(self) -> &'static str {
        match self {
            GestureMode::Draw => "DRAW",
            GestureMode::Erase => "ERASE",
            GestureMode::Idle => "IDLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(bits: u8) -> FingerState {
        FingerState {
            thumb: bits & 1 != 0,
            index: bits & 2 != 0,
            middle: bits & 4 != 0,
            ring: bits & 8 != 0,
            pinky: bits & 16 != 0,
        }
    }

    #[test]
    fn every_pose_maps_to_exactly_one_mode() {
        for bits in 0..32u8 {
            let f = state(bits);
            let draw = f.index && !f.middle;
            let erase = f.thumb && !f.index && !f.middle;
            assert!(!(draw && erase));

            let expected = if draw {
                GestureMode::Draw
            } else if erase {
                GestureMode::Erase
            } else {
                GestureMode::Idle
            };
            assert_eq!(GestureMode::resolve(Some(&f)), expected, "pose {bits:05b}");
        }
    }

    #[test]
    fn draw_ignores_thumb_ring_pinky() {
        let f = FingerState { thumb: true, index: true, middle: false, ring: true, pinky: true };
        assert_eq!(GestureMode::resolve(Some(&f)), GestureMode::Draw);
    }

    #[test]
    fn peace_sign_is_idle() {
        let f = FingerState { index: true, middle: true, ..Default::default() };
        assert_eq!(GestureMode::resolve(Some(&f)), GestureMode::Idle);
    }

    #[test]
    fn thumb_only_erases() {
        let f = FingerState { thumb: true, ..Default::default() };
        assert_eq!(GestureMode::resolve(Some(&f)), GestureMode::Erase);
    }

    #[test]
    fn no_hand_is_idle() {
        assert_eq!(GestureMode::resolve(None), GestureMode::Idle);
    }
}
