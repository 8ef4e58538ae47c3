//! Fire-and-forget sound cues
//!
//! The simulation reports `GameEvent`s; this module maps them to cues and
//! hands them to whatever backend the host plugs in. Nothing here waits on
//! playback.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Breakable brick destroyed
    BrickBreak,
    /// Ball bounced off a solid brick
    SolidHit,
    /// Ball hits paddle
    PaddleHit,
    /// Power-up collected
    PowerUpCollect,
}

impl SoundEffect {
    /// Asset the backend should load for this cue
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::BrickBreak => "bleep.mp3",
            SoundEffect::SolidHit => "solid.wav",
            SoundEffect::PaddleHit => "bleep.wav",
            SoundEffect::PowerUpCollect => "powerup.wav",
        }
    }
}

/// Background track started once at startup
pub const MUSIC_TRACK: &str = "breakout.mp3";

/// Which cue, if any, an event should trigger
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::BrickDestroyed { .. } => Some(SoundEffect::BrickBreak),
        GameEvent::SolidBrickHit => Some(SoundEffect::SolidHit),
        GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
        GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUpCollect),
        _ => None,
    }
}

/// Playback backend supplied by the host
pub trait AudioSink {
    /// Start a one-shot cue and return immediately.
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Start a looping track and return immediately.
    fn play_looping(&mut self, track: &str, volume: f32);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {:?} ({}) at {:.2}", effect, effect.file_name(), volume);
    }

    fn play_looping(&mut self, track: &str, volume: f32) {
        log::debug!("music {} at {:.2}", track, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_started: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            music_started: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Start the background loop. Later calls do nothing.
    pub fn start_music(&mut self) {
        if self.music_started {
            return;
        }
        self.music_started = true;
        let vol = self.effective_volume(self.music_volume);
        self.sink.play_looping(MUSIC_TRACK, vol);
    }

    pub fn music_started(&self) -> bool {
        self.music_started
    }

    /// Play whatever cue belongs to a simulation event.
    pub fn handle_event(&mut self, event: &GameEvent) {
        if let Some(effect) = sound_for(event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use crate::sim::PowerUpKind;

    #[derive(Default, Clone)]
    struct Recorder {
        played: Rc<RefCell<Vec<(SoundEffect, f32)>>>,
        music: Rc<RefCell<Vec<String>>>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.played.borrow_mut().push((effect, volume));
        }

        fn play_looping(&mut self, track: &str, _volume: f32) {
            self.music.borrow_mut().push(track.to_string());
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            sound_for(&GameEvent::BrickDestroyed { pos: Vec2::ZERO }),
            Some(SoundEffect::BrickBreak)
        );
        assert_eq!(sound_for(&GameEvent::SolidBrickHit), Some(SoundEffect::SolidHit));
        assert_eq!(sound_for(&GameEvent::PaddleHit), Some(SoundEffect::PaddleHit));
        assert_eq!(
            sound_for(&GameEvent::PowerUpCollected {
                id: 1,
                kind: PowerUpKind::Speed
            }),
            Some(SoundEffect::PowerUpCollect)
        );
        assert_eq!(sound_for(&GameEvent::BallLaunched), None);
        assert_eq!(sound_for(&GameEvent::GameOver), None);
    }

    #[test]
    fn test_music_starts_once() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()), &Settings::default());
        audio.start_music();
        audio.start_music();
        assert!(audio.music_started());
        assert_eq!(*recorder.music.borrow(), vec![MUSIC_TRACK.to_string()]);
    }

    #[test]
    fn test_volume_and_mute() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Box::new(recorder.clone()), &Settings::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::PaddleHit);
        audio.set_muted(true);
        audio.handle_event(&GameEvent::PaddleHit);

        let played = recorder.played.borrow();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0], (SoundEffect::PaddleHit, 0.5));
    }
}
