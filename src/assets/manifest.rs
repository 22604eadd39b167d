// Static asset tables: every sound and texture the game loads at startup.

use super::LoadKind;

/// Named sounds. The string names double as the readiness-gate keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    IntroBgm,
    UndyneEasyBgm,
    UndyneMediumBgm,
    UndyneHardBgm,
    ArrowBlockedSfx,
    ArrowDamageSfx,
    UndyneSpeakSfx,
    ButtonHoverSfx,
    ButtonSelectSfx,
}

impl Sound {
    pub fn name(self) -> &'static str {
        match self {
            Sound::IntroBgm => "introBgm",
            Sound::UndyneEasyBgm => "undyneEasyBgm",
            Sound::UndyneMediumBgm => "undyneMediumBgm",
            Sound::UndyneHardBgm => "undyneHardBgm",
            Sound::ArrowBlockedSfx => "arrowBlockedSfx",
            Sound::ArrowDamageSfx => "arrowDamageSfx",
            Sound::UndyneSpeakSfx => "undyneSpeakSfx",
            Sound::ButtonHoverSfx => "buttonHoverSfx",
            Sound::ButtonSelectSfx => "buttonSelectSfx",
        }
    }
}

pub struct AudioAsset {
    pub sound: Sound,
    pub path: &'static str,
    pub looped: bool,
    pub volume: f64,
    pub kind: LoadKind,
}

// Fight tracks are long and stream from the network instead of preloading.
pub const AUDIO_MANIFEST: &[AudioAsset] = &[
    AudioAsset { sound: Sound::IntroBgm, path: "bgm/intro.mp3", looped: true, volume: 0.7, kind: LoadKind::Preload },
    AudioAsset { sound: Sound::UndyneEasyBgm, path: "bgm/undyne_easy.mp3", looped: true, volume: 0.7, kind: LoadKind::Streamed },
    AudioAsset { sound: Sound::UndyneMediumBgm, path: "bgm/undyne_medium.mp3", looped: true, volume: 0.7, kind: LoadKind::Streamed },
    AudioAsset { sound: Sound::UndyneHardBgm, path: "bgm/undyne_hard.mp3", looped: true, volume: 0.7, kind: LoadKind::Streamed },
    AudioAsset { sound: Sound::ArrowBlockedSfx, path: "sfx/arrow_blocked.wav", looped: false, volume: 0.7, kind: LoadKind::Preload },
    AudioAsset { sound: Sound::ArrowDamageSfx, path: "sfx/arrow_damage.wav", looped: false, volume: 0.7, kind: LoadKind::Preload },
    AudioAsset { sound: Sound::UndyneSpeakSfx, path: "sfx/undyne_speak.wav", looped: false, volume: 0.7, kind: LoadKind::Preload },
    AudioAsset { sound: Sound::ButtonHoverSfx, path: "sfx/button_hover.wav", looped: false, volume: 0.7, kind: LoadKind::Preload },
    AudioAsset { sound: Sound::ButtonSelectSfx, path: "sfx/button_select.wav", looped: false, volume: 0.7, kind: LoadKind::Preload },
];

pub const TEX_ARROW: &str = "arrow";
pub const TEX_HEART: &str = "heart";
pub const TEX_SHIELD: &str = "shield";
pub const TEX_SPEECH_BUBBLE: &str = "speechBubble";
pub const TEX_GROUND: &str = "ground1";
pub const TEX_UNDYNE_BODY: &str = "undyne";
pub const TEX_UNDYNE_ARM: &str = "undyne_rightarm";
pub const TEX_TITLE: &str = "fairdyne";
pub const TEX_BUTTON_PLAY: &str = "button_play";
pub const TEX_BUTTON_PLAY_HOVER: &str = "button_play_hover";
pub const TEX_BUTTON_RETRY: &str = "button_retry";
pub const TEX_BUTTON_RETRY_HOVER: &str = "button_retry_hover";

/// (texture name, file under the image directory, pixel-art scaling)
pub const TEXTURE_MANIFEST: &[(&str, &str, bool)] = &[
    ("arrow", "arrow.png", false),
    ("heart", "heart.png", true),
    ("shield", "shield.png", false),
    ("speechBubble", "speechbubble.png", true),
    ("fairdyne", "fairdyne.png", true),
    ("ground1", "ground1.png", true),
    ("undyne", "undyne.png", false),
    ("undyne_rightarm", "undyne_rightarm.png", true),
    ("undyne_head1", "undyne_head1.png", true),
    ("undyne_head2", "undyne_head2.png", true),
    ("undyne_head3", "undyne_head_annoyed.png", true),
    ("undyne_head4", "undyne_head_angry.png", true),
    ("button_play", "button_play.png", true),
    ("button_play_hover", "button_play_hover.png", true),
    ("button_retry", "button_retry.png", true),
    ("button_retry_hover", "button_retry_hover.png", true),
];
