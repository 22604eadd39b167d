//! Top-level gameplay: the title screen, dialogue, the attack sequence and the
//! health/score loop, all advanced by the frame loop through `update`.
//!
//! Flow:
//! - `Title`: intro music, a play button.
//! - `Intro`: Undyne's opening lines; the last one starts the fight.
//! - `Fighting`: attacks are pulled from the `AttackManager` one after another
//!   as the arena goes idle.
//! - `Outro` / `Victory` after the last attack, `GameOver` when health runs out.
//!   Both end on a retry button that restarts from `Intro`.

use log::{debug, info};

use crate::assets::manifest::{
    TEX_BUTTON_PLAY, TEX_BUTTON_PLAY_HOVER, TEX_BUTTON_RETRY, TEX_BUTTON_RETRY_HOVER, TEX_GROUND,
    TEX_SPEECH_BUBBLE, TEX_TITLE,
};
use crate::assets::{Sound, SoundBoard};
use crate::attack::{AttackManager, Difficulty, Direction, LevelData};
use crate::button::Button;
use crate::config::{GameConfig, SCORE_PER_BLOCK, SCORE_PER_HEALTH_LEFT};
use crate::error::GameResult;
use crate::render::{Canvas, Rect};
use crate::speech::{QueueOutcome, SpeechBubble, SpeechItem, TextAdvance};

mod arena;
mod undyne;

pub use arena::{Arena, ArrowOutcome};
pub use undyne::{Pose, Undyne};

const BUBBLE_RECT: Rect = Rect::new(400.0, 10.0, 220.0, 100.0);
const BUBBLE_TEXT_POS: (f64, f64) = (442.0, 30.0);
const BUBBLE_TEXT_WIDTH: f64 = 160.0;
const BUBBLE_FONT: &str = "12px SpeechBubble, monospace";
const HUD_FONT: &str = "16px monospace";
const HEALTH_BAR_WIDTH: f64 = 96.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Title,
    Intro,
    Fighting,
    Outro,
    Victory,
    GameOver,
}

/// What to do once a block of dialogue has been read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueCue {
    BeginFight,
    ShowVictory,
    ShowRetry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Retry,
    HoverSound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Confirm / next message.
    Z,
    /// Skip typing.
    X,
    Arrow(Direction),
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "z" | "Z" | "Enter" => Some(Key::Z),
            "x" | "X" | "Shift" => Some(Key::X),
            "ArrowUp" => Some(Key::Arrow(Direction::Up)),
            "ArrowDown" => Some(Key::Arrow(Direction::Down)),
            "ArrowLeft" => Some(Key::Arrow(Direction::Left)),
            "ArrowRight" => Some(Key::Arrow(Direction::Right)),
            _ => None,
        }
    }
}

pub struct GameHandler {
    level: LevelData,
    difficulty: Difficulty,
    attacks: AttackManager,
    speech: SpeechBubble<DialogueCue>,
    undyne: Undyne,
    arena: Arena,
    play_button: Button<MenuAction>,
    retry_button: Button<MenuAction>,
    phase: Phase,
    health: u32,
    score: u32,
    width: f64,
    height: f64,
}

impl GameHandler {
    pub fn new(config: &GameConfig, level: LevelData, difficulty: Difficulty) -> Self {
        let (w, h) = (config.game_width as f64, config.game_height as f64);
        let arena_center = (w / 2.0, h * 0.69);
        let button_rect = |y: f64| Rect::centered(w / 2.0, y, 160.0, 48.0);
        let mut retry_button = Button::new(button_rect(h * 0.6), TEX_BUTTON_RETRY, MenuAction::Retry).with_hover(
            TEX_BUTTON_RETRY_HOVER,
            MenuAction::HoverSound,
            config.button_transition_ms,
        );
        retry_button.set_visible(false);
        Self {
            attacks: AttackManager::new(level.attacks.clone()),
            level,
            difficulty,
            speech: SpeechBubble::new(config.chars_per_sec, config.speech_defer_ms),
            undyne: Undyne::new(Rect::new(w / 2.0 - 60.0, 20.0, 120.0, 160.0)),
            arena: Arena::new(arena_center, difficulty.speed_factor()),
            play_button: Button::new(button_rect(h * 0.75), TEX_BUTTON_PLAY, MenuAction::Play).with_hover(
                TEX_BUTTON_PLAY_HOVER,
                MenuAction::HoverSound,
                config.button_transition_ms,
            ),
            retry_button,
            phase: Phase::Title,
            health: difficulty.max_health(),
            score: 0,
            width: w,
            height: h,
        }
    }

    pub fn from_json(config: &GameConfig, level_json: &str, difficulty: &str) -> GameResult<Self> {
        let level = LevelData::from_json(level_json)?;
        let difficulty: Difficulty = difficulty.parse()?;
        info!("level loaded: {} attacks, difficulty {:?}", level.attacks.len(), difficulty);
        Ok(Self::new(config, level, difficulty))
    }

    /// One-time start once assets are ready.
    pub fn start(&mut self, sfx: &mut dyn SoundBoard) {
        sfx.play(Sound::IntroBgm);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speech(&self) -> &SpeechBubble<DialogueCue> {
        &self.speech
    }

    pub fn attacks(&self) -> &AttackManager {
        &self.attacks
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn undyne(&self) -> &Undyne {
        &self.undyne
    }

    pub fn play_button(&self) -> &Button<MenuAction> {
        &self.play_button
    }

    pub fn retry_button(&self) -> &Button<MenuAction> {
        &self.retry_button
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            info!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    // --- Input ------------------------------------------------------------------

    pub fn key_down(&mut self, key: Key, sfx: &mut dyn SoundBoard) {
        match key {
            Key::Z => match self.speech.advance_text_z() {
                Some(TextAdvance::Drained(Some(cue))) => self.on_cue(cue, sfx),
                Some(_) => {}
                // no dialogue waiting: Z confirms whichever button is up
                None => {
                    let button = [&self.play_button, &self.retry_button].into_iter().find(|b| b.is_visible());
                    if let Some(action) = button.map(|b| b.click()) {
                        self.on_action(action, sfx);
                    }
                }
            },
            Key::X => {
                self.speech.advance_text_x();
            }
            Key::Arrow(dir) => {
                if self.phase == Phase::Fighting {
                    self.arena.set_shield(dir);
                }
            }
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, sfx: &mut dyn SoundBoard) {
        let hovered = [self.play_button.pointer_move(x, y), self.retry_button.pointer_move(x, y)];
        for action in hovered.into_iter().flatten() {
            self.on_action(action, sfx);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.play_button.pointer_leave();
        self.retry_button.pointer_leave();
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, sfx: &mut dyn SoundBoard) {
        let action = self.play_button.pointer_down(x, y).or_else(|| self.retry_button.pointer_down(x, y));
        if let Some(action) = action {
            self.on_action(action, sfx);
        }
    }

    fn on_action(&mut self, action: MenuAction, sfx: &mut dyn SoundBoard) {
        match action {
            MenuAction::HoverSound => sfx.play(Sound::ButtonHoverSfx),
            MenuAction::Play => {
                sfx.play(Sound::ButtonSelectSfx);
                sfx.stop(Sound::IntroBgm);
                self.play_button.set_visible(false);
                self.begin_intro(sfx);
            }
            MenuAction::Retry => {
                sfx.play(Sound::ButtonSelectSfx);
                self.restart(sfx);
            }
        }
    }

    fn on_cue(&mut self, cue: DialogueCue, sfx: &mut dyn SoundBoard) {
        debug!("dialogue finished: {cue:?}");
        match cue {
            DialogueCue::BeginFight => {
                self.set_phase(Phase::Fighting);
                sfx.play(self.difficulty.bgm());
                self.pull_next_attack(sfx);
            }
            DialogueCue::ShowVictory => {
                self.set_phase(Phase::Victory);
                self.retry_button.set_visible(true);
            }
            DialogueCue::ShowRetry => {
                self.retry_button.set_visible(true);
            }
        }
    }

    fn say(&mut self, lines: Vec<SpeechItem>, cue: DialogueCue, sfx: &mut dyn SoundBoard) {
        let busy = self.undyne.is_swinging();
        if let QueueOutcome::Shown(TextAdvance::Drained(Some(cue))) = self.speech.queue_text(lines, cue, busy) {
            self.on_cue(cue, sfx);
        }
    }

    fn begin_intro(&mut self, sfx: &mut dyn SoundBoard) {
        self.set_phase(Phase::Intro);
        let lines = self.level.intro.clone();
        self.say(lines, DialogueCue::BeginFight, sfx);
    }

    fn pull_next_attack(&mut self, sfx: &mut dyn SoundBoard) {
        match self.attacks.next_attack().cloned() {
            Some(attack) => {
                debug!("attack {}/{} '{}'", self.attacks.cursor(), self.attacks.num_attacks(), attack.name);
                self.arena.start_attack(&attack);
                self.undyne.swing_arm();
            }
            None => {
                info!("all attacks survived with {} health", self.health);
                self.score += self.health * SCORE_PER_HEALTH_LEFT;
                sfx.stop(self.difficulty.bgm());
                self.set_phase(Phase::Outro);
                let lines = self.level.outro.clone();
                self.say(lines, DialogueCue::ShowVictory, sfx);
            }
        }
    }

    fn game_over(&mut self, sfx: &mut dyn SoundBoard) {
        self.arena.clear();
        sfx.stop(self.difficulty.bgm());
        self.set_phase(Phase::GameOver);
        let lines = self.level.defeat.clone();
        self.say(lines, DialogueCue::ShowRetry, sfx);
    }

    /// Rewinds the level and replays it from the intro dialogue.
    pub fn restart(&mut self, sfx: &mut dyn SoundBoard) {
        sfx.stop(self.difficulty.bgm());
        self.attacks.reset();
        self.speech.reset();
        self.arena.clear();
        self.undyne.reset();
        self.health = self.difficulty.max_health();
        self.score = 0;
        self.retry_button.set_visible(false);
        self.begin_intro(sfx);
    }

    // --- Tick -------------------------------------------------------------------

    pub fn update(&mut self, delta_ms: f64, sfx: &mut dyn SoundBoard) {
        self.undyne.update(delta_ms);
        for cue in self.speech.update(delta_ms, self.undyne.is_swinging(), sfx) {
            self.on_cue(cue, sfx);
        }
        self.play_button.update(delta_ms);
        self.retry_button.update(delta_ms);

        if self.phase != Phase::Fighting {
            return;
        }
        for outcome in self.arena.update(delta_ms) {
            match outcome {
                ArrowOutcome::Blocked => {
                    self.score += SCORE_PER_BLOCK;
                    sfx.play(Sound::ArrowBlockedSfx);
                }
                ArrowOutcome::Hit { damage } => {
                    self.health = self.health.saturating_sub(damage);
                    sfx.play(Sound::ArrowDamageSfx);
                }
            }
        }
        if self.health == 0 {
            self.game_over(sfx);
        } else if self.arena.is_idle() {
            self.pull_next_attack(sfx);
        }
    }

    // --- Drawing ----------------------------------------------------------------

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.clear("#000000");
        canvas.draw_sprite(TEX_GROUND, Rect::new(0.0, self.height * 0.4, self.width, self.height * 0.6), 0.0, 1.0);

        if self.phase == Phase::Title {
            canvas.draw_sprite(TEX_TITLE, Rect::centered(self.width / 2.0, self.height * 0.35, 320.0, 120.0), 0.0, 1.0);
        } else {
            self.undyne.draw(canvas, self.speech.face());
        }

        if self.phase == Phase::Fighting {
            self.arena.draw(canvas);
        }

        if self.speech.is_visible() {
            canvas.draw_sprite(TEX_SPEECH_BUBBLE, BUBBLE_RECT, 0.0, 1.0);
            let (tx, ty) = BUBBLE_TEXT_POS;
            canvas.draw_text(self.speech.displayed_text(), tx, ty, BUBBLE_TEXT_WIDTH, BUBBLE_FONT, "#000000");
        }

        if self.phase != Phase::Title {
            // red backing, yellow for what is left
            let bar = Rect::new(12.0, self.height - 40.0, HEALTH_BAR_WIDTH, 12.0);
            let left = self.health as f64 / self.difficulty.max_health() as f64;
            canvas.fill_rect(bar, "#c00000");
            canvas.fill_rect(Rect { w: bar.w * left, ..bar }, "#ffff00");
            let hud = format!("HP {}/{}   SCORE {}", self.health, self.difficulty.max_health(), self.score);
            canvas.draw_text(&hud, 12.0, self.height - 16.0, self.width, HUD_FONT, "#ffffff");
        }

        self.play_button.draw(canvas);
        self.retry_button.draw(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::SoundLog;
    use crate::attack::{ArrowSpec, Attack};
    use crate::render::tests::{DrawCall, RecordingCanvas};
    use crate::speech::TextState;

    fn level(n_attacks: usize) -> LevelData {
        let attack = Attack {
            name: "jab".into(),
            arrows: vec![ArrowSpec { from: Direction::Left, delay_ms: 0.0, speed: 1_000.0, damage: 1 }],
            cooldown_ms: 0.0,
        };
        LevelData {
            attacks: vec![attack; n_attacks],
            intro: vec![SpeechItem::new("En garde!", None)],
            outro: vec![SpeechItem::new("...fine.", None)],
            defeat: vec![SpeechItem::new("Too weak.", None)],
        }
    }

    fn game(n_attacks: usize, difficulty: Difficulty) -> (GameHandler, SoundLog) {
        let mut sfx = SoundLog::default();
        let mut g = GameHandler::new(&GameConfig::default(), level(n_attacks), difficulty);
        g.start(&mut sfx);
        (g, sfx)
    }

    fn tick(g: &mut GameHandler, sfx: &mut SoundLog, ms: f64) {
        let mut t = 0.0;
        while t < ms {
            g.update(16.0, sfx);
            t += 16.0;
        }
    }

    /// Play, then read the intro through to the fight.
    fn into_fight(g: &mut GameHandler, sfx: &mut SoundLog) {
        g.key_down(Key::Z, sfx);
        assert_eq!(g.phase(), Phase::Intro);
        g.key_down(Key::X, sfx);
        g.key_down(Key::Z, sfx);
        assert_eq!(g.phase(), Phase::Fighting);
    }

    #[test]
    fn title_plays_intro_music_and_button_starts() {
        let (mut g, mut sfx) = game(1, Difficulty::Easy);
        assert_eq!(sfx.played, vec![Sound::IntroBgm]);
        g.key_down(Key::Z, &mut sfx);
        assert_eq!(g.phase(), Phase::Intro);
        assert!(!g.play_button().is_visible());
        assert!(sfx.stopped.contains(&Sound::IntroBgm));
        assert_eq!(g.speech().state(), TextState::Talking);
    }

    #[test]
    fn blocking_every_arrow_wins() {
        let (mut g, mut sfx) = game(3, Difficulty::Easy);
        into_fight(&mut g, &mut sfx);
        assert!(sfx.played.contains(&Sound::UndyneEasyBgm));
        g.key_down(Key::Arrow(Direction::Left), &mut sfx);
        tick(&mut g, &mut sfx, 3_000.0);
        assert_eq!(g.phase(), Phase::Outro);
        assert_eq!(g.health(), 8);
        assert_eq!(g.score(), 3 * SCORE_PER_BLOCK + 8 * SCORE_PER_HEALTH_LEFT);
        assert!(g.attacks().is_exhausted());

        // the outro waited for the final arm swing before showing
        tick(&mut g, &mut sfx, 500.0);
        assert_eq!(g.speech().current_text(), Some("...fine."));
        g.key_down(Key::X, &mut sfx);
        g.key_down(Key::Z, &mut sfx);
        assert_eq!(g.phase(), Phase::Victory);
        assert!(g.retry_button().is_visible());
    }

    #[test]
    fn losing_all_health_is_game_over_and_retry_rewinds() {
        let (mut g, mut sfx) = game(10, Difficulty::Hard);
        into_fight(&mut g, &mut sfx);
        g.key_down(Key::Arrow(Direction::Right), &mut sfx);
        tick(&mut g, &mut sfx, 5_000.0);
        assert_eq!(g.phase(), Phase::GameOver);
        assert_eq!(g.health(), 0);
        assert_eq!(g.arena().arrows_in_flight(), 0);

        tick(&mut g, &mut sfx, 1_000.0);
        g.key_down(Key::X, &mut sfx);
        g.key_down(Key::Z, &mut sfx);
        assert!(g.retry_button().is_visible());

        g.key_down(Key::Z, &mut sfx);
        assert_eq!(g.phase(), Phase::Intro);
        assert_eq!(g.health(), Difficulty::Hard.max_health());
        assert_eq!(g.attacks().cursor(), 0);
        assert!(!g.retry_button().is_visible());
    }

    #[test]
    fn shield_only_turns_during_fight() {
        let (mut g, mut sfx) = game(1, Difficulty::Easy);
        g.key_down(Key::Arrow(Direction::Down), &mut sfx);
        assert_eq!(g.arena().shield(), Direction::Up);
    }

    #[test]
    fn hovering_play_button_plays_hover_sound_once() {
        let (mut g, mut sfx) = game(1, Difficulty::Easy);
        let (cx, cy) = g.play_button().rect().center();
        g.pointer_move(cx, cy, &mut sfx);
        g.pointer_move(cx + 1.0, cy, &mut sfx);
        let hovers = sfx.played.iter().filter(|s| **s == Sound::ButtonHoverSfx).count();
        assert_eq!(hovers, 1);
        g.pointer_down(cx, cy, &mut sfx);
        assert_eq!(g.phase(), Phase::Intro);
    }

    #[test]
    fn hidden_retry_button_is_not_drawn() {
        let (g, _) = game(1, Difficulty::Easy);
        let mut canvas = RecordingCanvas::default();
        g.draw(&mut canvas);
        assert!(canvas.sprites(TEX_BUTTON_RETRY).is_empty());
        assert_eq!(canvas.sprites(TEX_BUTTON_PLAY), vec![1.0]);
    }

    #[test]
    fn hud_shows_health_bar_and_score_after_title() {
        let (mut g, mut sfx) = game(1, Difficulty::Medium);
        let mut canvas = RecordingCanvas::default();
        g.draw(&mut canvas);
        assert!(canvas.texts().iter().all(|t| !t.starts_with("HP")));

        g.key_down(Key::Z, &mut sfx);
        let mut canvas = RecordingCanvas::default();
        g.draw(&mut canvas);
        assert!(canvas.texts().contains(&"HP 5/5   SCORE 0".to_string()));
        let fills: Vec<f64> = canvas
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Fill(r) => Some(r.w),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![HEALTH_BAR_WIDTH, HEALTH_BAR_WIDTH]);
    }

    #[test]
    fn empty_intro_goes_straight_to_fight() {
        let mut lvl = level(1);
        lvl.intro.clear();
        let mut sfx = SoundLog::default();
        let mut g = GameHandler::new(&GameConfig::default(), lvl, Difficulty::Medium);
        g.key_down(Key::Z, &mut sfx);
        assert_eq!(g.phase(), Phase::Fighting);
        assert!(g.undyne().is_swinging());
    }

    #[test]
    fn from_json_rejects_bad_difficulty() {
        let res = GameHandler::from_json(&GameConfig::default(), r#"{ "attacks": [] }"#, "impossible");
        assert!(res.is_err());
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Key::from_dom("z"), Some(Key::Z));
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Arrow(Direction::Left)));
        assert_eq!(Key::from_dom("q"), None);
    }
}
