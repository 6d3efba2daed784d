//! The animation/tween timeline
//!
//! Clip playback is keyed by caller-chosen ids so any number of
//! independent animations run side by side. Tweens interpolate a numeric
//! value toward a target and write it through an apply closure; finished
//! tweens are removed within the same `update` call that completes them.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::animation::clip::{AnimationClip, AnimationInstance};
use crate::animation::easing::Easing;
use crate::foundation::math::utils;

new_key_type! {
    /// Handle for an active tween
    pub struct TweenKey;
}

/// A value interpolation in flight
struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    apply: Box<dyn FnMut(f32)>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

/// Clip registry, per-id playback, and active tween set
#[derive(Default)]
pub struct Timeline {
    clips: HashMap<String, AnimationClip>,
    instances: HashMap<String, AnimationInstance>,
    tweens: SlotMap<TweenKey, Tween>,
    completed_scratch: Vec<TweenKey>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
            instances: HashMap::new(),
            tweens: SlotMap::with_key(),
            completed_scratch: Vec::new(),
        }
    }

    /// Store a clip; re-registering a name overwrites the previous clip
    pub fn register_clip(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name.clone(), clip);
    }

    /// True if a clip with this name is registered
    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    /// Start playback of `clip_name` under `id` from frame 0
    ///
    /// An unknown clip name is a configuration error: logged as a warning,
    /// playback state is untouched.
    pub fn play(&mut self, id: &str, clip_name: &str, speed: f32) {
        if !self.clips.contains_key(clip_name) {
            log::warn!("play request for unregistered clip '{clip_name}' (id '{id}')");
            return;
        }
        self.instances
            .insert(id.to_string(), AnimationInstance::new(clip_name, speed));
    }

    /// Stop and forget playback under `id`
    pub fn stop(&mut self, id: &str) {
        self.instances.remove(id);
    }

    /// Pause or resume playback under `id`
    pub fn set_paused(&mut self, id: &str, paused: bool) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.paused = paused;
        } else {
            log::warn!("pause request for unknown animation id '{id}'");
        }
    }

    /// Change the playback speed under `id`
    pub fn set_speed(&mut self, id: &str, speed: f32) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.speed = speed;
        } else {
            log::warn!("speed request for unknown animation id '{id}'");
        }
    }

    /// Current frame value under `id`, or 0 when nothing is playing
    pub fn current_frame(&self, id: &str) -> u32 {
        self.instances
            .get(id)
            .and_then(|instance| {
                self.clips
                    .get(&instance.clip)
                    .map(|clip| instance.current_frame(clip))
            })
            .unwrap_or(0)
    }

    /// True once a non-looping clip under `id` has reached its last frame
    pub fn is_finished(&self, id: &str) -> bool {
        self.instances.get(id).is_some_and(|instance| instance.finished)
    }

    /// Name of the clip currently playing under `id`
    pub fn playing_clip(&self, id: &str) -> Option<&str> {
        self.instances.get(id).map(|instance| instance.clip.as_str())
    }

    /// Start a tween from `from` to `to` over `duration` seconds
    ///
    /// Each update writes the interpolated value through `apply`. The
    /// returned key cancels the tween early; owners must cancel tweens
    /// that capture a target before dropping it.
    pub fn tween(
        &mut self,
        from: f32,
        to: f32,
        duration: f32,
        easing: Easing,
        apply: impl FnMut(f32) + 'static,
    ) -> TweenKey {
        self.tween_with_completion(from, to, duration, easing, apply, || {})
    }

    /// Like [`tween`](Self::tween), with a callback fired on completion
    pub fn tween_with_completion(
        &mut self,
        from: f32,
        to: f32,
        duration: f32,
        easing: Easing,
        apply: impl FnMut(f32) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) -> TweenKey {
        self.tweens.insert(Tween {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
            apply: Box::new(apply),
            on_complete: Some(Box::new(on_complete)),
        })
    }

    /// Cancel a tween; its completion callback does not fire
    pub fn cancel(&mut self, key: TweenKey) -> bool {
        self.tweens.remove(key).is_some()
    }

    /// Number of tweens currently in flight
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Advance every active animation and tween by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        for instance in self.instances.values_mut() {
            if let Some(clip) = self.clips.get(&instance.clip) {
                instance.advance(clip, dt);
            }
        }

        self.completed_scratch.clear();
        for (key, tween) in &mut self.tweens {
            tween.elapsed += dt;
            let progress = if tween.duration > 0.0 {
                utils::clamp(tween.elapsed / tween.duration, 0.0, 1.0)
            } else {
                1.0
            };

            // Apply the exact endpoint at completion; lerp through the
            // easing curve otherwise
            let value = if progress >= 1.0 {
                tween.to
            } else {
                utils::lerp(tween.from, tween.to, tween.easing.apply(progress))
            };
            (tween.apply)(value);

            if progress >= 1.0 {
                self.completed_scratch.push(key);
            }
        }

        // Finished tweens leave the active set within this same call
        for index in 0..self.completed_scratch.len() {
            let key = self.completed_scratch[index];
            if let Some(mut tween) = self.tweens.remove(key) {
                if let Some(on_complete) = tween.on_complete.take() {
                    on_complete();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn timeline_with_clips() -> Timeline {
        let mut timeline = Timeline::new();
        timeline.register_clip(AnimationClip::new("run", vec![1, 2, 3, 4], 8.0, true));
        timeline.register_clip(AnimationClip::new("land", vec![10, 11, 12], 8.0, false));
        timeline
    }

    #[test]
    fn test_play_unknown_clip_is_noop() {
        let mut timeline = timeline_with_clips();
        timeline.play("player", "swim", 1.0);
        assert_eq!(timeline.current_frame("player"), 0);
        assert!(timeline.playing_clip("player").is_none());
    }

    #[test]
    fn test_play_and_advance() {
        let mut timeline = timeline_with_clips();
        timeline.play("player", "run", 1.0);
        assert_eq!(timeline.current_frame("player"), 1);

        timeline.update(0.125);
        assert_eq!(timeline.current_frame("player"), 2);
    }

    #[test]
    fn test_ids_advance_independently() {
        let mut timeline = timeline_with_clips();
        timeline.play("player", "run", 1.0);
        timeline.play("sidekick", "run", 2.0);

        timeline.update(0.125);
        assert_eq!(timeline.current_frame("player"), 2);
        assert_eq!(timeline.current_frame("sidekick"), 3);
    }

    #[test]
    fn test_replay_restarts_from_frame_zero() {
        let mut timeline = timeline_with_clips();
        timeline.play("player", "run", 1.0);
        timeline.update(0.25);
        assert_eq!(timeline.current_frame("player"), 3);

        timeline.play("player", "run", 1.0);
        assert_eq!(timeline.current_frame("player"), 1);
    }

    #[test]
    fn test_reregistering_clip_overwrites() {
        let mut timeline = timeline_with_clips();
        timeline.register_clip(AnimationClip::new("run", vec![7, 8], 8.0, true));

        timeline.play("player", "run", 1.0);
        assert_eq!(timeline.current_frame("player"), 7);
    }

    #[test]
    fn test_is_finished_for_one_shot() {
        let mut timeline = timeline_with_clips();
        timeline.play("player", "land", 1.0);
        assert!(!timeline.is_finished("player"));

        timeline.update(1.0);
        assert!(timeline.is_finished("player"));
        assert_eq!(timeline.current_frame("player"), 12);

        // Stays finished under further updates
        timeline.update(1.0);
        assert!(timeline.is_finished("player"));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut timeline = timeline_with_clips();
        timeline.play("player", "run", 1.0);
        timeline.set_paused("player", true);
        timeline.update(1.0);
        assert_eq!(timeline.current_frame("player"), 1);

        timeline.set_paused("player", false);
        timeline.update(0.125);
        assert_eq!(timeline.current_frame("player"), 2);
    }

    #[test]
    fn test_tween_hits_exact_endpoints() {
        let mut timeline = Timeline::new();
        let value = Rc::new(Cell::new(0.0f32));

        let value_clone = Rc::clone(&value);
        timeline.tween(10.0, 20.0, 1.0, Easing::Linear, move |v| value_clone.set(v));

        timeline.update(0.0);
        assert_eq!(value.get(), 10.0);

        timeline.update(0.5);
        assert_eq!(value.get(), 15.0);

        timeline.update(0.5);
        assert_eq!(value.get(), 20.0);
    }

    #[test]
    fn test_tween_removed_on_completion() {
        let mut timeline = Timeline::new();
        let value = Rc::new(Cell::new(0.0f32));

        let value_clone = Rc::clone(&value);
        timeline.tween(0.0, 1.0, 0.5, Easing::Linear, move |v| value_clone.set(v));

        timeline.update(1.0);
        assert_eq!(timeline.tween_count(), 0);

        // A completed tween no longer mutates its target
        value.set(123.0);
        timeline.update(1.0);
        assert_eq!(value.get(), 123.0);
    }

    #[test]
    fn test_tween_completion_callback_fires_once() {
        let mut timeline = Timeline::new();
        let fired = Rc::new(Cell::new(0u32));

        let fired_clone = Rc::clone(&fired);
        timeline.tween_with_completion(
            0.0,
            1.0,
            0.25,
            Easing::QuadOut,
            |_| {},
            move || fired_clone.set(fired_clone.get() + 1),
        );

        timeline.update(0.5);
        timeline.update(0.5);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_cancel_stops_tween_without_completion() {
        let mut timeline = Timeline::new();
        let value = Rc::new(Cell::new(0.0f32));
        let fired = Rc::new(Cell::new(false));

        let value_clone = Rc::clone(&value);
        let fired_clone = Rc::clone(&fired);
        let key = timeline.tween_with_completion(
            0.0,
            1.0,
            1.0,
            Easing::Linear,
            move |v| value_clone.set(v),
            move || fired_clone.set(true),
        );

        timeline.update(0.25);
        assert!(timeline.cancel(key));
        assert!(!timeline.cancel(key));

        timeline.update(1.0);
        assert_eq!(value.get(), 0.25);
        assert!(!fired.get());
    }

    #[test]
    fn test_zero_duration_tween_completes_immediately() {
        let mut timeline = Timeline::new();
        let value = Rc::new(Cell::new(0.0f32));

        let value_clone = Rc::clone(&value);
        timeline.tween(3.0, 7.0, 0.0, Easing::Linear, move |v| value_clone.set(v));

        timeline.update(0.016);
        assert_eq!(value.get(), 7.0);
        assert_eq!(timeline.tween_count(), 0);
    }
}
