//! Adaptive performance monitoring
//!
//! Samples per-frame wall-clock cost, keeps a rolling average and a
//! worst case, and steers a quality factor the renderer can use to shed
//! detail. Adjustment is asymmetric on purpose: quality drops as soon as
//! the average falls below the low-water mark but recovers only once the
//! average clears the high-water mark, so the factor cannot oscillate
//! around the target.

use std::collections::VecDeque;

use crate::foundation::time::Stopwatch;

/// Quality factor floor
pub const MIN_QUALITY: f32 = 0.1;

/// Quality factor ceiling
pub const MAX_QUALITY: f32 = 1.0;

/// Drop quality when average FPS falls below this fraction of target
const LOW_WATER: f32 = 0.8;

/// Raise quality only when average FPS exceeds this fraction of target
const HIGH_WATER: f32 = 0.95;

/// Named measurement spans within one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// State machine and physics
    Update,
    /// Host-side drawing
    Render,
    /// Spatial registration and queries
    Collision,
    /// Timeline advance
    Animation,
}

impl Phase {
    fn index(self) -> usize {
        match self {
            Phase::Update => 0,
            Phase::Render => 1,
            Phase::Collision => 2,
            Phase::Animation => 3,
        }
    }
}

/// Frame-time statistics and quality-factor control
pub struct PerfMonitor {
    target_frame_time: f32,
    quality_step: f32,
    history_cap: usize,
    frame_stopwatch: Stopwatch,
    history: VecDeque<f32>,
    history_sum: f32,
    worst_frame_time: f32,
    frame_count: u64,
    quality_factor: f32,
    spans: [Stopwatch; 4],
}

impl PerfMonitor {
    /// Create a monitor targeting `target_fps`
    ///
    /// `quality_step` bounds the per-frame quality change; `history_cap`
    /// bounds the rolling frame-time window.
    pub fn new(target_fps: u32, quality_step: f32, history_cap: usize) -> Self {
        Self {
            target_frame_time: 1.0 / target_fps.max(1) as f32,
            quality_step,
            history_cap: history_cap.max(1),
            frame_stopwatch: Stopwatch::new(),
            history: VecDeque::new(),
            history_sum: 0.0,
            worst_frame_time: 0.0,
            frame_count: 0,
            quality_factor: MAX_QUALITY,
            spans: [Stopwatch::new(), Stopwatch::new(), Stopwatch::new(), Stopwatch::new()],
        }
    }

    /// Begin timing a frame
    pub fn begin_frame(&mut self) {
        self.frame_stopwatch.restart();
    }

    /// Finish timing a frame and record its cost
    pub fn end_frame(&mut self) {
        let sample = self.frame_stopwatch.elapsed_secs();
        self.frame_stopwatch.stop();
        self.record_sample(sample);
    }

    /// Record one frame-time sample (seconds) and adjust quality
    pub fn record_sample(&mut self, sample: f32) {
        self.history.push_back(sample);
        self.history_sum += sample;
        if self.history.len() > self.history_cap {
            if let Some(evicted) = self.history.pop_front() {
                self.history_sum -= evicted;
            }
        }

        if sample > self.worst_frame_time {
            self.worst_frame_time = sample;
        }
        self.frame_count += 1;
        self.adjust_quality();
    }

    /// Most recent frame-time sample in seconds
    pub fn last_frame_time(&self) -> f32 {
        self.history.back().copied().unwrap_or(0.0)
    }

    /// Rolling average frame time in seconds
    pub fn average_frame_time(&self) -> f32 {
        if self.history.is_empty() {
            0.0
        } else {
            self.history_sum / self.history.len() as f32
        }
    }

    /// Worst frame time observed since creation or cleanup
    pub fn worst_frame_time(&self) -> f32 {
        self.worst_frame_time
    }

    /// Frames recorded since creation
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Rolling average FPS
    pub fn average_fps(&self) -> f32 {
        let average = self.average_frame_time();
        if average > 0.0 {
            1.0 / average
        } else {
            0.0
        }
    }

    /// Current quality factor in [0.1, 1.0]
    pub fn quality_factor(&self) -> f32 {
        self.quality_factor
    }

    /// Start a named measurement span
    pub fn span_start(&mut self, phase: Phase) {
        self.spans[phase.index()].start();
    }

    /// Stop a named measurement span
    pub fn span_end(&mut self, phase: Phase) {
        self.spans[phase.index()].stop();
    }

    /// Accumulated time spent in a span, in seconds
    pub fn span_time(&self, phase: Phase) -> f32 {
        self.spans[phase.index()].elapsed_secs()
    }

    /// Truncate the frame-time history and span accumulators
    ///
    /// Part of the engine-wide cleanup that also trims pool free lists.
    pub fn cleanup(&mut self) {
        self.history.clear();
        self.history_sum = 0.0;
        self.worst_frame_time = 0.0;
        for span in &mut self.spans {
            span.reset();
        }
    }

    /// One bounded hysteresis step per recorded frame
    fn adjust_quality(&mut self) {
        let target_fps = 1.0 / self.target_frame_time;
        let average_fps = self.average_fps();
        if average_fps <= 0.0 {
            return;
        }

        let before = self.quality_factor;
        if average_fps < target_fps * LOW_WATER {
            self.quality_factor = (self.quality_factor - self.quality_step).max(MIN_QUALITY);
        } else if average_fps > target_fps * HIGH_WATER {
            self.quality_factor = (self.quality_factor + self.quality_step).min(MAX_QUALITY);
        }

        if (self.quality_factor - before).abs() > f32::EPSILON {
            log::debug!(
                "quality factor {before:.2} -> {:.2} (avg {average_fps:.1} fps)",
                self.quality_factor
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> PerfMonitor {
        // 60 fps target, 0.05 steps, 8-frame window
        PerfMonitor::new(60, 0.05, 8)
    }

    #[test]
    fn test_quality_drops_under_slow_frames() {
        let mut monitor = monitor();

        // 30 fps is far below 80% of the 60 fps target
        monitor.record_sample(1.0 / 30.0);
        assert!(monitor.quality_factor() < MAX_QUALITY);
    }

    #[test]
    fn test_quality_change_bounded_per_frame() {
        let mut monitor = monitor();

        let before = monitor.quality_factor();
        monitor.record_sample(1.0);
        let after = monitor.quality_factor();
        assert!((before - after).abs() <= 0.05 + f32::EPSILON);
    }

    #[test]
    fn test_quality_clamped_to_floor() {
        let mut monitor = monitor();

        for _ in 0..200 {
            monitor.record_sample(1.0);
        }
        assert!((monitor.quality_factor() - MIN_QUALITY).abs() < 1e-6);
    }

    #[test]
    fn test_quality_recovers_cautiously() {
        let mut monitor = monitor();

        // Push quality down with slow frames
        for _ in 0..10 {
            monitor.record_sample(1.0 / 20.0);
        }
        let degraded = monitor.quality_factor();
        assert!(degraded < MAX_QUALITY);

        // Fast frames must flush the slow window before recovery starts,
        // then climb one bounded step at a time
        let mut previous = degraded;
        for _ in 0..100 {
            monitor.record_sample(1.0 / 120.0);
            let current = monitor.quality_factor();
            assert!(current - previous <= 0.05 + f32::EPSILON);
            previous = current;
        }
        assert!((monitor.quality_factor() - MAX_QUALITY).abs() < 1e-6);
    }

    #[test]
    fn test_no_adjustment_in_dead_band() {
        let mut monitor = monitor();

        // 55 fps sits between 80% (48) and 95% (57) of target: hold
        for _ in 0..20 {
            monitor.record_sample(1.0 / 55.0);
        }
        assert!((monitor.quality_factor() - MAX_QUALITY).abs() < 1e-6);
    }

    #[test]
    fn test_rolling_average_and_worst() {
        let mut monitor = monitor();

        monitor.record_sample(0.010);
        monitor.record_sample(0.030);
        assert!((monitor.average_frame_time() - 0.020).abs() < 1e-6);
        assert!((monitor.worst_frame_time() - 0.030).abs() < 1e-6);
        assert_eq!(monitor.last_frame_time(), 0.030);
        assert_eq!(monitor.frame_count(), 2);
    }

    #[test]
    fn test_history_window_is_bounded() {
        let mut monitor = PerfMonitor::new(60, 0.05, 4);

        for _ in 0..4 {
            monitor.record_sample(0.1);
        }
        // Newer samples push the old ones out of the window
        for _ in 0..4 {
            monitor.record_sample(0.02);
        }
        assert!((monitor.average_frame_time() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_cleanup_truncates_history() {
        let mut monitor = monitor();

        monitor.record_sample(0.5);
        monitor.cleanup();
        assert_eq!(monitor.average_frame_time(), 0.0);
        assert_eq!(monitor.worst_frame_time(), 0.0);
        // Frame count survives cleanup
        assert_eq!(monitor.frame_count(), 1);
    }

    #[test]
    fn test_spans_accumulate() {
        let mut monitor = monitor();

        monitor.span_start(Phase::Collision);
        monitor.span_end(Phase::Collision);
        monitor.span_start(Phase::Collision);
        monitor.span_end(Phase::Collision);

        // Spans only accumulate while running
        let time = monitor.span_time(Phase::Collision);
        assert!(time >= 0.0);
        assert_eq!(monitor.span_time(Phase::Render), 0.0);
    }
}
