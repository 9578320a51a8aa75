//! Feedback cues for the buzzer, status LED and vibration motor
//!
//! The core only emits semantic cues; a `FeedbackSink` turns them into
//! hardware output. Each cue has a fixed playback plan whose total length is
//! how long the session loop stays blocked.

use crate::sim::GameEvent;

/// Feedback cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Trigger pulled - white flash
    MuzzleFlash,
    /// Zombie killed - double green blink with buzz
    Hit,
    /// Shot wasted - red blink, low beep
    Miss,
    /// Zombie got through - orange blink, long buzz
    Damage,
    /// Trigger pulled behind the shield - banner only
    ShieldBlocked,
    /// Session start jingle
    GameStart,
}

/// One buzzer note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: u32,
    pub secs: f32,
    pub volume: f32,
}

const fn tone(freq: u32, secs: f32, volume: f32) -> Tone {
    Tone { freq, secs, volume }
}

/// LED colour (0-255 per channel)
pub type Rgb = (u8, u8, u8);

/// One step of a cue: LED colour and motor held for the step, optional note,
/// then a silent gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueStep {
    pub led: Rgb,
    pub vibrate: bool,
    pub tone: Option<Tone>,
    /// Extra pause after the step (LED off)
    pub gap: f32,
    /// Step length when there is no tone
    pub hold: f32,
}

impl CueStep {
    pub fn secs(&self) -> f32 {
        self.tone.map(|t| t.secs).unwrap_or(self.hold) + self.gap
    }
}

const HIT_STEP: CueStep = CueStep {
    led: (0, 255, 0),
    vibrate: true,
    tone: Some(tone(1200, 0.05, 0.4)),
    gap: 0.05,
    hold: 0.0,
};

const MUZZLE_PLAN: [CueStep; 1] = [CueStep {
    led: (255, 255, 255),
    vibrate: false,
    tone: None,
    gap: 0.0,
    hold: 0.03,
}];
const HIT_PLAN: [CueStep; 2] = [HIT_STEP, HIT_STEP];
const MISS_PLAN: [CueStep; 1] = [CueStep {
    led: (255, 0, 0),
    vibrate: false,
    tone: Some(tone(300, 0.1, 0.3)),
    gap: 0.0,
    hold: 0.0,
}];
const DAMAGE_PLAN: [CueStep; 1] = [CueStep {
    led: (255, 50, 0),
    vibrate: true,
    tone: Some(tone(200, 0.15, 0.4)),
    gap: 0.0,
    hold: 0.0,
}];
const BLOCKED_PLAN: [CueStep; 1] = [CueStep {
    led: (0, 0, 0),
    vibrate: false,
    tone: None,
    gap: 0.0,
    hold: 0.1,
}];
const START_PLAN: [CueStep; 3] = [
    CueStep {
        led: (0, 0, 0),
        vibrate: false,
        tone: Some(tone(500, 0.08, 0.3)),
        gap: 0.0,
        hold: 0.0,
    },
    CueStep {
        led: (0, 0, 0),
        vibrate: false,
        tone: Some(tone(750, 0.08, 0.3)),
        gap: 0.0,
        hold: 0.0,
    },
    CueStep {
        led: (0, 0, 0),
        vibrate: false,
        tone: Some(tone(1000, 0.15, 0.35)),
        gap: 0.0,
        hold: 0.0,
    },
];

impl Cue {
    /// Cue for a core event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::MuzzleFlash => Some(Cue::MuzzleFlash),
            GameEvent::Hit { .. } => Some(Cue::Hit),
            GameEvent::Miss => Some(Cue::Miss),
            GameEvent::Damage { .. } => Some(Cue::Damage),
            GameEvent::ShieldBlocked => Some(Cue::ShieldBlocked),
            GameEvent::LevelUp { .. } | GameEvent::SessionOver(_) => None,
        }
    }

    /// Hardware playback plan
    pub fn plan(&self) -> &'static [CueStep] {
        match self {
            Cue::MuzzleFlash => &MUZZLE_PLAN,
            Cue::Hit => &HIT_PLAN,
            Cue::Miss => &MISS_PLAN,
            Cue::Damage => &DAMAGE_PLAN,
            Cue::ShieldBlocked => &BLOCKED_PLAN,
            Cue::GameStart => &START_PLAN,
        }
    }

    /// How long the loop is blocked while this cue plays
    pub fn duration(&self) -> f32 {
        self.plan().iter().map(CueStep::secs).sum()
    }

    /// Text flashed in the info line, if any
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            Cue::ShieldBlocked => Some("SHIELD UP!"),
            _ => None,
        }
    }
}

/// Something that can play cues
pub trait FeedbackSink {
    /// Start a cue. The session loop owns the blocking pause.
    fn play(&mut self, cue: Cue);

    /// Whether the buzzer is sounding right now (sound sensor self-noise)
    fn tone_active(&self) -> bool {
        false
    }
}

/// Sink that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogFeedback {
    muted: bool,
    played: Vec<Cue>,
}

impl LogFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Cues played so far
    pub fn played(&self) -> &[Cue] {
        &self.played
    }
}

impl FeedbackSink for LogFeedback {
    fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        log::debug!("cue {:?} ({:.2}s)", cue, cue.duration());
        self.played.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Outcome, ZombieKind};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_cue_durations() {
        assert!(close(Cue::MuzzleFlash.duration(), 0.03));
        assert!(close(Cue::Hit.duration(), 0.2));
        assert!(close(Cue::Miss.duration(), 0.1));
        assert!(close(Cue::Damage.duration(), 0.15));
        assert!(close(Cue::ShieldBlocked.duration(), 0.1));
        assert!(close(Cue::GameStart.duration(), 0.31));
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            Cue::for_event(&GameEvent::Hit { kind: ZombieKind::SoundWeak }),
            Some(Cue::Hit)
        );
        assert_eq!(Cue::for_event(&GameEvent::ShieldBlocked), Some(Cue::ShieldBlocked));
        assert_eq!(Cue::for_event(&GameEvent::LevelUp { level: 2 }), None);
        assert_eq!(Cue::for_event(&GameEvent::SessionOver(Outcome::Dead)), None);
        assert_eq!(Cue::ShieldBlocked.banner(), Some("SHIELD UP!"));
    }

    #[test]
    fn test_muted_sink_records_nothing() {
        let mut sink = LogFeedback::new();
        sink.play(Cue::Hit);
        sink.set_muted(true);
        sink.play(Cue::Miss);
        assert_eq!(sink.played(), &[Cue::Hit]);
        assert!(!sink.tone_active());
    }
}
