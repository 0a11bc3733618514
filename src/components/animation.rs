//! Sprite-sheet animation clips and playback state.
//!
//! An [`AnimationClip`] is the immutable description of a named animation: a
//! contiguous range of frames on a sprite sheet, a playback rate, and how many
//! times it repeats. An [`AnimationPlayer`] is the per-sprite cursor that walks
//! a clip forward or backward as time passes.
//!
//! # Repeat semantics
//!
//! - [`Repeat::Forever`] loops until another clip is played or playback stops
//!   (encoded as `-1` in repeat counts).
//! - [`Repeat::Times(n)`] plays the clip `n + 1` times and then holds the last
//!   frame shown. `Times(0)` plays exactly once.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::controller::RenderError;

/// How many extra times a clip plays after the first run.
///
/// Serialized as its repeat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Repeat {
    Forever,
    Times(u32),
}

impl Repeat {
    /// Decode a repeat count where any negative value means "forever".
    pub fn from_count(count: i32) -> Self {
        if count < 0 {
            Repeat::Forever
        } else {
            Repeat::Times(count as u32)
        }
    }

    /// Encode back to a repeat count (`-1` for forever).
    pub fn count(self) -> i32 {
        match self {
            Repeat::Forever => -1,
            Repeat::Times(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    pub fn is_looping(self) -> bool {
        matches!(self, Repeat::Forever)
    }
}

impl From<i32> for Repeat {
    fn from(count: i32) -> Self {
        Repeat::from_count(count)
    }
}

impl From<Repeat> for i32 {
    fn from(repeat: Repeat) -> Self {
        repeat.count()
    }
}

/// Named animation over a contiguous frame range of a sprite sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub key: String,
    /// Texture key of the sprite sheet the frames come from.
    pub texture: String,
    /// First frame index (inclusive).
    pub start: u32,
    /// Last frame index (inclusive).
    pub end: u32,
    /// Frames per second.
    pub frame_rate: f32,
    pub repeat: Repeat,
}

impl AnimationClip {
    pub fn new(
        key: impl Into<String>,
        texture: impl Into<String>,
        frames: RangeInclusive<u32>,
        frame_rate: f32,
        repeat: Repeat,
    ) -> Self {
        Self {
            key: key.into(),
            texture: texture.into(),
            start: *frames.start(),
            end: *frames.end(),
            frame_rate,
            repeat,
        }
    }

    /// Check the clip can be played: a non-empty frame range and a positive,
    /// finite frame rate.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.start > self.end {
            return Err(RenderError::InvalidFrameRange {
                key: self.key.clone(),
                start: self.start,
                end: self.end,
            });
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(RenderError::InvalidFrameRate {
                key: self.key.clone(),
                frame_rate: self.frame_rate,
            });
        }
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        (self.end.saturating_sub(self.start) + 1) as usize
    }

    /// Seconds each frame stays on screen.
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

/// Playback cursor over an [`AnimationClip`].
///
/// `cursor` counts frames in playback order: in reverse playback cursor `0`
/// is the clip's last frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationPlayer {
    /// Key of the clip being shown, if any clip was ever played.
    pub key: Option<String>,
    pub cursor: usize,
    pub reverse: bool,
    pub playing: bool,
    /// Seconds accumulated towards the next frame.
    pub elapsed: f32,
    /// Completed runs of the clip in the current playback.
    pub completed_runs: u32,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `clip` from its first frame in the requested direction.
    pub fn start(&mut self, clip: &AnimationClip, reverse: bool) {
        self.key = Some(clip.key.clone());
        self.cursor = 0;
        self.reverse = reverse;
        self.playing = true;
        self.elapsed = 0.0;
        self.completed_runs = 0;
    }

    /// Whether `key` is currently running in the given direction.
    pub fn is_playing(&self, key: &str, reverse: bool) -> bool {
        self.playing && self.reverse == reverse && self.key.as_deref() == Some(key)
    }

    /// Halt playback, keeping the current frame on screen.
    pub fn stop(&mut self) {
        self.playing = false;
        self.elapsed = 0.0;
    }

    /// Sprite-sheet frame index for the cursor position.
    pub fn frame(&self, clip: &AnimationClip) -> u32 {
        let cursor = self.cursor.min(clip.frame_count() - 1) as u32;
        if self.reverse {
            clip.end - cursor
        } else {
            clip.start + cursor
        }
    }

    /// Advance playback by `dt` seconds. Returns true when the visible frame
    /// changed.
    pub fn advance(&mut self, clip: &AnimationClip, dt: f32) -> bool {
        if !self.playing {
            return false;
        }
        let before = self.cursor;
        let frame_count = clip.frame_count();
        let frame_duration = clip.frame_duration();

        self.elapsed += dt;
        while self.playing && self.elapsed >= frame_duration {
            self.elapsed -= frame_duration;
            self.cursor += 1;
            if self.cursor < frame_count {
                continue;
            }
            match clip.repeat {
                Repeat::Forever => self.cursor = 0,
                Repeat::Times(n) if self.completed_runs < n => {
                    self.completed_runs += 1;
                    self.cursor = 0;
                }
                Repeat::Times(_) => {
                    // finished: hold the last frame shown
                    self.cursor = frame_count - 1;
                    self.stop();
                }
            }
        }
        self.cursor != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hatch() -> AnimationClip {
        AnimationClip::new("openTopHatch", "minisub", 0..=3, 10.0, Repeat::Times(0))
    }

    #[test]
    fn test_repeat_serializes_as_count() {
        assert_eq!(serde_json::to_string(&Repeat::Forever).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Repeat::Times(2)).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Repeat>("0").unwrap(), Repeat::Times(0));
        assert_eq!(serde_json::from_str::<Repeat>("-7").unwrap(), Repeat::Forever);

        let clip: AnimationClip = serde_json::from_str(
            r#"{"key":"move","texture":"minisub","start":4,"end":7,"frame_rate":8.0,"repeat":-1}"#,
        )
        .unwrap();
        assert!(clip.repeat.is_looping());
    }

    #[test]
    fn test_repeat_count_round_trip_values() {
        assert_eq!(Repeat::from_count(-1), Repeat::Forever);
        assert_eq!(Repeat::from_count(-7), Repeat::Forever);
        assert_eq!(Repeat::from_count(0), Repeat::Times(0));
        assert_eq!(Repeat::Forever.count(), -1);
        assert_eq!(Repeat::Times(2).count(), 2);
        assert!(Repeat::Forever.is_looping());
        assert!(!Repeat::Times(0).is_looping());
    }

    #[test]
    fn test_validate_rejects_bad_range_and_rate() {
        let bad_range = AnimationClip::new("x", "t", 5..=2, 10.0, Repeat::Forever);
        assert!(matches!(
            bad_range.validate(),
            Err(RenderError::InvalidFrameRange { start: 5, end: 2, .. })
        ));
        let bad_rate = AnimationClip::new("x", "t", 0..=2, 0.0, Repeat::Forever);
        assert!(matches!(
            bad_rate.validate(),
            Err(RenderError::InvalidFrameRate { .. })
        ));
        assert!(hatch().validate().is_ok());
    }

    #[test]
    fn test_single_frame_clip() {
        let idle = AnimationClip::new("idle", "minisub", 0..=0, 15.0, Repeat::Forever);
        assert_eq!(idle.frame_count(), 1);
        let mut player = AnimationPlayer::new();
        player.start(&idle, false);
        assert!(!player.advance(&idle, 1.0));
        assert_eq!(player.frame(&idle), 0);
        assert!(player.playing);
    }

    #[test]
    fn test_play_once_holds_last_frame() {
        let clip = hatch();
        let mut player = AnimationPlayer::new();
        player.start(&clip, false);
        assert_eq!(player.frame(&clip), 0);

        player.advance(&clip, 0.15);
        assert_eq!(player.frame(&clip), 1);

        player.advance(&clip, 1.0);
        assert_eq!(player.frame(&clip), 3);
        assert!(!player.playing);

        assert!(!player.advance(&clip, 1.0));
        assert_eq!(player.frame(&clip), 3);
    }

    #[test]
    fn test_reverse_walks_backwards() {
        let clip = hatch();
        let mut player = AnimationPlayer::new();
        player.start(&clip, true);
        assert_eq!(player.frame(&clip), 3);
        player.advance(&clip, 0.1);
        assert_eq!(player.frame(&clip), 2);
        player.advance(&clip, 1.0);
        assert_eq!(player.frame(&clip), 0);
        assert!(!player.playing);
    }

    #[test]
    fn test_forever_wraps() {
        let clip = AnimationClip::new("move", "minisub", 9..=11, 10.0, Repeat::Forever);
        let mut player = AnimationPlayer::new();
        player.start(&clip, false);
        player.advance(&clip, 0.35);
        assert_eq!(player.frame(&clip), 9);
        assert!(player.playing);
    }

    #[test]
    fn test_repeat_times_plays_n_plus_one_runs() {
        let clip = AnimationClip::new("blink", "t", 0..=1, 10.0, Repeat::Times(1));
        let mut player = AnimationPlayer::new();
        player.start(&clip, false);
        // first run ends at 0.2s and restarts
        player.advance(&clip, 0.25);
        assert!(player.playing);
        assert_eq!(player.completed_runs, 1);
        player.advance(&clip, 0.5);
        assert!(!player.playing);
        assert_eq!(player.frame(&clip), 1);
    }

    #[test]
    fn test_is_playing_checks_direction() {
        let clip = hatch();
        let mut player = AnimationPlayer::new();
        player.start(&clip, false);
        assert!(player.is_playing("openTopHatch", false));
        assert!(!player.is_playing("openTopHatch", true));
        player.stop();
        assert!(!player.is_playing("openTopHatch", false));
    }
}
