// Bounded per-frame histories: fingertip smoothing and wave detection.

use crate::types::Point;

/// Samples averaged for the index fingertip.
pub const TIP_HISTORY: usize = 5;
/// Wrist samples needed before a wave can be detected.
pub const WRIST_HISTORY: usize = 15;
/// Normalized horizontal wrist excursion that counts as a wave.
pub const WAVE_THRESHOLD: f64 = 0.3;

/// Fixed-capacity FIFO; pushing onto a full ring overwrites the oldest entry.
#[derive(Clone)]
pub struct Ring<T, const N: usize> {
    data: [T; N],
    /// Next slot to write.
    write_index: usize,
    len: usize,
}

impl<T: Copy + Default, const N: usize> Ring<T, N> {
    pub fn new() -> Self {
        Self { data: [T::default(); N], write_index: 0, len: 0 }
    }

    pub fn push(&mut self, value: T) {
        self.data[self.write_index] = value;
        self.write_index = (self.write_index + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let start = (self.write_index + N - self.len) % N;
        (0..self.len).map(move |i| self.data[(start + i) % N])
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.write_index = 0;
        self.len = 0;
    }
}

impl<T: Copy + Default, const N: usize> Default for Ring<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Moving average over the last [`TIP_HISTORY`] raw tip positions.
#[derive(Clone, Default)]
pub struct TipSmoother {
    history: Ring<Point, TIP_HISTORY>,
}

impl TipSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a raw sample and return the integer mean of everything buffered.
    pub fn push(&mut self, raw: Point) -> Point {
        self.history.push(raw);
        let n = self.history.len() as i64;
        let (sx, sy) = self
            .history
            .iter()
            .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
        Point::new((sx / n) as i32, (sy / n) as i32)
    }
}

/// Detects a side-to-side wave from the wrist x history.
#[derive(Clone)]
pub struct WaveDetector {
    history: Ring<f32, WRIST_HISTORY>,
    threshold: f64,
}

impl WaveDetector {
    pub fn new(threshold: f64) -> Self {
        Self { history: Ring::new(), threshold }
    }

    /// Record one wrist x (normalized). True while the full window spans more than the threshold.
    pub fn push(&mut self, wrist_x: f32) -> bool {
        self.history.push(wrist_x);
        self.detected()
    }

    /// The excursion is taken in f64: an f32 subtraction of 0.4 and 0.1 rounds to exactly 0.3.
    pub fn detected(&self) -> bool {
        if !self.history.is_full() {
            return false;
        }
        let (min, max) = self
            .history
            .iter()
            .map(f64::from)
            .fold((f64::MAX, f64::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)));
        max - min > self.threshold
    }
}

impl Default for WaveDetector {
    fn default() -> Self {
        Self::new(WAVE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_evicts_oldest() {
        let mut ring: Ring<u32, 3> = Ring::new();
        assert!(ring.is_empty());
        for v in 1..=4 {
            ring.push(v);
        }
        assert!(ring.is_full());
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        ring.clear();
        assert_eq!(ring.len(), 0);
        ring.push(9);
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn smoother_averages_last_five() {
        let mut s = TipSmoother::new();
        assert_eq!(s.push(Point::new(10, 20)), Point::new(10, 20));
        assert_eq!(s.push(Point::new(20, 30)), Point::new(15, 25));

        let mut s = TipSmoother::new();
        let pts = [(0, 0), (10, 10), (20, 20), (30, 30), (40, 40), (50, 100)];
        let mut out = Point::default();
        for &(x, y) in &pts[..5] {
            out = s.push(Point::new(x, y));
        }
        assert_eq!(out, Point::new(20, 20));
        // (10+20+30+40+50)/5, (10+20+30+40+100)/5
        assert_eq!(s.push(Point::new(pts[5].0, pts[5].1)), Point::new(30, 40));
    }

    #[test]
    fn smoother_truncates_mean() {
        let mut s = TipSmoother::new();
        s.push(Point::new(1, 1));
        assert_eq!(s.push(Point::new(2, 4)), Point::new(1, 2));
    }

    #[test]
    fn no_wave_before_window_fills() {
        let mut w = WaveDetector::default();
        for i in 0..WRIST_HISTORY - 1 {
            let x = if i % 2 == 0 { 0.0 } else { 1.0 };
            assert!(!w.push(x), "push {i}");
        }
        assert!(w.push(0.0));
    }

    #[test]
    fn wave_threshold_on_full_window() {
        let mut w = WaveDetector::default();
        for i in 0..WRIST_HISTORY {
            w.push(0.1 + 0.35 * i as f32 / (WRIST_HISTORY - 1) as f32);
        }
        assert!(w.detected());

        let mut w = WaveDetector::default();
        for i in 0..WRIST_HISTORY {
            w.push(0.1 + 0.25 * i as f32 / (WRIST_HISTORY - 1) as f32);
        }
        assert!(!w.detected());
    }

    #[test]
    fn excursion_just_over_threshold_is_a_wave() {
        // As f32 these are 0.10000000149 and 0.40000000596: 0.3000000045 apart.
        let mut w = WaveDetector::default();
        for i in 0..WRIST_HISTORY {
            w.push(if i % 2 == 0 { 0.1 } else { 0.4 });
        }
        assert!(w.detected());
    }

    #[test]
    fn wave_stays_detected_while_excursion_in_window() {
        let mut w = WaveDetector::default();
        w.push(0.9);
        for _ in 1..WRIST_HISTORY {
            w.push(0.1);
        }
        assert!(w.detected());
        // 0.9 falls out of the window on the next push.
        assert!(!w.push(0.1));
    }
}
