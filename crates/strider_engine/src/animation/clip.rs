//! Frame clips and per-id playback state

/// An immutable sequence of sprite frame values
///
/// `frames` holds the values handed back to the renderer (sprite-sheet
/// cell indices); the clip never stores per-playback state.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Clip name used by `play` requests
    pub name: String,
    /// Frame values in playback order
    pub frames: Vec<u32>,
    /// Frames per second at playback speed 1.0
    pub frame_rate: f32,
    /// Wrap to frame 0 after the last frame instead of freezing
    pub looping: bool,
}

impl AnimationClip {
    /// Create a new clip
    pub fn new(name: impl Into<String>, frames: Vec<u32>, frame_rate: f32, looping: bool) -> Self {
        Self {
            name: name.into(),
            frames,
            frame_rate,
            looping,
        }
    }
}

/// Playback state for one timeline id
#[derive(Debug, Clone)]
pub struct AnimationInstance {
    /// Name of the clip being played
    pub clip: String,
    /// Index of the current frame within the clip
    pub frame_index: usize,
    /// Time accumulated toward the next frame step (seconds)
    pub frame_timer: f32,
    /// Total playback time accumulated (seconds)
    pub elapsed: f32,
    /// Playback speed multiplier
    pub speed: f32,
    /// Playback is suspended while set
    pub paused: bool,
    /// A non-looping clip has reached its last frame; latches on
    pub finished: bool,
}

impl AnimationInstance {
    /// Start playback of `clip` from frame 0
    pub fn new(clip: impl Into<String>, speed: f32) -> Self {
        Self {
            clip: clip.into(),
            frame_index: 0,
            frame_timer: 0.0,
            elapsed: 0.0,
            speed,
            paused: false,
            finished: false,
        }
    }

    /// Advance playback by `dt` seconds against the given clip
    ///
    /// Accumulates `dt * speed`; each time the accumulator crosses one
    /// frame duration the index steps forward. Looping clips wrap to 0;
    /// one-shot clips clamp on the last frame and latch `finished`.
    pub fn advance(&mut self, clip: &AnimationClip, dt: f32) {
        if self.paused || self.finished || clip.frames.is_empty() || clip.frame_rate <= 0.0 {
            return;
        }

        let scaled = dt * self.speed;
        self.frame_timer += scaled;
        self.elapsed += scaled;

        let frame_duration = 1.0 / clip.frame_rate;
        while self.frame_timer >= frame_duration {
            self.frame_timer -= frame_duration;
            if self.frame_index + 1 < clip.frames.len() {
                self.frame_index += 1;
            } else if clip.looping {
                self.frame_index = 0;
            } else {
                self.finished = true;
                self.frame_timer = 0.0;
                break;
            }
        }
    }

    /// Current frame value within the given clip
    pub fn current_frame(&self, clip: &AnimationClip) -> u32 {
        clip.frames.get(self.frame_index).copied().unwrap_or(0)
    }
}
