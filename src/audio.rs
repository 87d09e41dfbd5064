//! Sound cues
//!
//! The game only ever fires short one-shot cues at a scene node. The host
//! supplies the actual playback; `AudioManager` is the headless player that
//! keeps the registry, applies volume settings and logs what would play.

use std::collections::HashMap;

use crate::settings::Settings;
use crate::sim::NodeId;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Ball fell off the level
    GameOver,
    /// Pearl collected
    Powerup,
    /// Ball placed back at the spawn point
    Reset,
    /// Ball hit a pillar or crate
    Bump,
}

impl SoundCue {
    pub const ALL: [SoundCue; 4] = [
        SoundCue::GameOver,
        SoundCue::Powerup,
        SoundCue::Reset,
        SoundCue::Bump,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::GameOver => "GameOver",
            SoundCue::Powerup => "Powerup",
            SoundCue::Reset => "Reset",
            SoundCue::Bump => "Bump",
        }
    }

    /// Asset file the cue is loaded from
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundCue::GameOver => "GameOver.wav",
            SoundCue::Powerup => "Powerup.wav",
            SoundCue::Reset => "Reset.wav",
            SoundCue::Bump => "Bump.wav",
        }
    }
}

/// Fire-and-forget cue playback provided by the host
pub trait AudioCuePlayer {
    /// Register a cue and the asset backing it
    fn load_sound(&mut self, cue: SoundCue, file: &str);
    /// Play a registered cue positioned at `node`
    fn play(&mut self, node: NodeId, cue: SoundCue);
}

/// A cue that was actually played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedCue {
    pub cue: SoundCue,
    pub node: NodeId,
    pub volume: f32,
}

/// Headless audio manager
#[derive(Debug)]
pub struct AudioManager {
    sounds: HashMap<SoundCue, String>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: Vec<PlayedCue>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            sounds: HashMap::new(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
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

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn is_loaded(&self, cue: SoundCue) -> bool {
        self.sounds.contains_key(&cue)
    }

    /// Cues played so far, oldest first
    pub fn played(&self) -> &[PlayedCue] {
        &self.played
    }

    /// How many times `cue` has played
    pub fn play_count(&self, cue: SoundCue) -> usize {
        self.played.iter().filter(|p| p.cue == cue).count()
    }
}

impl AudioCuePlayer for AudioManager {
    fn load_sound(&mut self, cue: SoundCue, file: &str) {
        log::debug!("Loaded sound {} from {}", cue.as_str(), file);
        self.sounds.insert(cue, file.to_string());
    }

    fn play(&mut self, node: NodeId, cue: SoundCue) {
        if !self.is_loaded(cue) {
            log::warn!("Sound {} played before it was loaded", cue.as_str());
            return;
        }

        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }

        log::debug!("Playing {} at node {:?} (vol {:.2})", cue.as_str(), node, volume);
        self.played.push(PlayedCue { cue, node, volume });
    }
}
