//! Undyne's speech bubble: queued dialogue revealed a few characters at a time.
//!
//! State machine:
//!
//! ```text
//!   None --queue_text--> Talking --all chars shown / X--> Waiting
//!                           ^                                |
//!                           +-------- Z, queue not empty ----+
//!   None <------------------------- Z, queue empty ---------+
//! ```
//!
//! The completion value `C` registered with `queue_text` is handed back exactly
//! once, when the queue drains. The game uses a small enum for it so the
//! handler can decide what happens next without the bubble borrowing anything.

use std::collections::VecDeque;

use log::{debug, trace};
use serde::Deserialize;

use crate::assets::{Sound, SoundBoard};
use crate::scheduler::Scheduler;

/// Expression shown on Undyne's head while a line is spoken.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Normal,
    Smirk,
    Annoyed,
    Angry,
}

impl Face {
    pub fn texture(self) -> &'static str {
        match self {
            Face::Normal => "undyne_head1",
            Face::Smirk => "undyne_head2",
            Face::Annoyed => "undyne_head3",
            Face::Angry => "undyne_head4",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SpeechItem {
    pub text: String,
    #[serde(default)]
    pub face: Option<Face>,
}

impl SpeechItem {
    pub fn new(text: impl Into<String>, face: Option<Face>) -> Self {
        Self { text: text.into(), face }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextState {
    None,
    Talking,
    Waiting,
}

/// Result of moving to the next queued message.
#[derive(Debug, PartialEq, Eq)]
pub enum TextAdvance<C> {
    /// A new message started typing.
    Next,
    /// The queue was empty; the bubble is hidden and the completion value (if
    /// one was registered) is returned. It is never returned twice.
    Drained(Option<C>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum QueueOutcome<C> {
    Shown(TextAdvance<C>),
    /// The speaker was mid-animation; the request retries after the defer delay.
    Deferred,
}

#[derive(Debug)]
struct PendingText<C> {
    items: Vec<SpeechItem>,
    on_done: C,
}

#[derive(Debug)]
pub struct SpeechBubble<C> {
    chars_per_sec: f64,
    defer_ms: f64,
    queue: VecDeque<SpeechItem>,
    current: Option<SpeechItem>,
    current_len: usize,
    state: TextState,
    on_done: Option<C>,
    /// Fractional number of characters revealed, in `[0, current_len]`.
    reveal: f64,
    shown_chars: usize,
    visible: bool,
    deferred: Scheduler<PendingText<C>>,
}

impl<C> SpeechBubble<C> {
    pub fn new(chars_per_sec: f64, defer_ms: f64) -> Self {
        Self {
            chars_per_sec,
            defer_ms,
            queue: VecDeque::new(),
            current: None,
            current_len: 0,
            state: TextState::None,
            on_done: None,
            reveal: 0.0,
            shown_chars: 0,
            visible: false,
            deferred: Scheduler::new(),
        }
    }

    pub fn state(&self) -> TextState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn face(&self) -> Option<Face> {
        self.current.as_ref().and_then(|c| c.face)
    }

    pub fn current_text(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.text.as_str())
    }

    pub fn reveal_progress(&self) -> f64 {
        self.reveal
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// The part of the current message shown so far.
    pub fn displayed_text(&self) -> &str {
        match &self.current {
            Some(item) => prefix_chars(&item.text, self.shown_chars),
            None => "",
        }
    }

    /// Appends `items`, replaces the completion value and moves on to the next
    /// message. Held back while the speaker is in a blocking animation.
    pub fn queue_text(&mut self, items: Vec<SpeechItem>, on_done: C, speaker_busy: bool) -> QueueOutcome<C> {
        if speaker_busy {
            self.deferred.schedule(self.defer_ms, PendingText { items, on_done });
            debug!("speaker busy, dialogue deferred {}ms", self.defer_ms);
            return QueueOutcome::Deferred;
        }
        self.queue.extend(items);
        self.on_done = Some(on_done);
        self.visible = true;
        QueueOutcome::Shown(self.select_next_text())
    }

    pub fn select_next_text(&mut self) -> TextAdvance<C> {
        self.reveal = 0.0;
        self.shown_chars = 0;
        match self.queue.pop_front() {
            Some(item) => {
                self.current_len = item.text.chars().count();
                self.current = Some(item);
                self.state = TextState::Talking;
                TextAdvance::Next
            }
            None => {
                self.current = None;
                self.current_len = 0;
                self.visible = false;
                self.state = TextState::None;
                TextAdvance::Drained(self.on_done.take())
            }
        }
    }

    /// Shows `floor(n)` characters of the current message, playing the speech
    /// blip unless the newest visible character is whitespace.
    pub fn advance_text_chars(&mut self, n: f64, sfx: &mut dyn SoundBoard) {
        let Some(item) = &self.current else {
            return;
        };
        let whole = (n.max(0.0).floor() as usize).min(self.current_len);
        let newest = whole.checked_sub(1).and_then(|i| item.text.chars().nth(i));
        if matches!(newest, Some(c) if !c.is_whitespace()) {
            sfx.play(Sound::UndyneSpeakSfx);
        }
        self.shown_chars = whole;
    }

    /// Z: acknowledge a fully shown message.
    pub fn advance_text_z(&mut self) -> Option<TextAdvance<C>> {
        (self.state == TextState::Waiting).then(|| self.select_next_text())
    }

    /// X: skip the typing effect of the current message.
    pub fn advance_text_x(&mut self) -> bool {
        if self.state != TextState::Talking {
            return false;
        }
        self.reveal = self.current_len as f64;
        self.shown_chars = self.current_len;
        self.state = TextState::Waiting;
        true
    }

    /// Advances typing and retries deferred requests. Returns the completion
    /// value of every retried request that drained the queue immediately, in
    /// the order they were queued.
    pub fn update(&mut self, delta_ms: f64, speaker_busy: bool, sfx: &mut dyn SoundBoard) -> Vec<C> {
        let mut finished = Vec::new();
        for pending in self.deferred.advance(delta_ms) {
            trace!("retrying deferred dialogue");
            if let QueueOutcome::Shown(TextAdvance::Drained(Some(done))) =
                self.queue_text(pending.items, pending.on_done, speaker_busy)
            {
                finished.push(done);
            }
        }

        if self.state != TextState::Talking {
            return finished;
        }
        let len = self.current_len as f64;
        let next = (self.reveal + self.chars_per_sec * delta_ms / 1000.0).min(len);
        if next.floor() > self.reveal.floor() {
            self.advance_text_chars(next, sfx);
        }
        self.reveal = next;
        if self.shown_chars >= self.current_len {
            self.state = TextState::Waiting;
        }
        finished
    }

    /// Back to the freshly constructed state; pending deferred requests are
    /// cancelled and will not fire.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.current = None;
        self.current_len = 0;
        self.state = TextState::None;
        self.on_done = None;
        self.reveal = 0.0;
        self.shown_chars = 0;
        self.visible = false;
        self.deferred.cancel_all();
    }
}

fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::SoundLog;

    fn bubble() -> SpeechBubble<&'static str> {
        SpeechBubble::new(25.0, 250.0)
    }

    fn line(text: &str) -> SpeechItem {
        SpeechItem::new(text, None)
    }

    #[test]
    fn typing_reaches_waiting_then_drains_once() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        let out = b.queue_text(vec![SpeechItem::new("hi", Some(Face::Smirk))], "done", false);
        assert_eq!(out, QueueOutcome::Shown(TextAdvance::Next));
        assert_eq!(b.state(), TextState::Talking);
        assert!(b.is_visible());
        assert_eq!(b.face(), Some(Face::Smirk));

        // 25 chars/s -> one char every 40ms
        assert!(b.update(40.0, false, &mut sfx).is_empty());
        assert_eq!(b.displayed_text(), "h");
        assert_eq!(b.state(), TextState::Talking);
        b.update(40.0, false, &mut sfx);
        assert_eq!(b.displayed_text(), "hi");
        assert_eq!(b.state(), TextState::Waiting);
        assert_eq!(sfx.played, vec![Sound::UndyneSpeakSfx, Sound::UndyneSpeakSfx]);

        assert_eq!(b.advance_text_z(), Some(TextAdvance::Drained(Some("done"))));
        assert_eq!(b.state(), TextState::None);
        assert!(!b.is_visible());
        // nothing left to hand back
        assert_eq!(b.advance_text_z(), None);
        assert_eq!(b.select_next_text(), TextAdvance::Drained(None));
    }

    #[test]
    fn x_skips_typing_regardless_of_time() {
        let mut b = bubble();
        b.queue_text(vec![line("a much longer sentence")], "done", false);
        assert!(b.advance_text_x());
        assert_eq!(b.state(), TextState::Waiting);
        assert_eq!(b.displayed_text(), "a much longer sentence");
        assert!(!b.advance_text_x());
    }

    #[test]
    fn z_is_ignored_while_talking_and_x_while_waiting() {
        let mut b = bubble();
        b.queue_text(vec![line("one"), line("two")], "done", false);
        assert_eq!(b.advance_text_z(), None);
        b.advance_text_x();
        assert!(!b.advance_text_x());
        assert_eq!(b.advance_text_z(), Some(TextAdvance::Next));
        assert_eq!(b.current_text(), Some("two"));
        assert_eq!(b.reveal_progress(), 0.0);
    }

    #[test]
    fn whitespace_is_silent() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        b.queue_text(vec![line("a b")], "done", false);
        b.update(40.0, false, &mut sfx); // "a"
        b.update(40.0, false, &mut sfx); // "a "
        b.update(40.0, false, &mut sfx); // "a b"
        assert_eq!(sfx.played.len(), 2);
    }

    #[test]
    fn large_delta_never_overshoots_text() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        b.queue_text(vec![line("ok")], "done", false);
        b.update(10_000.0, false, &mut sfx);
        assert_eq!(b.reveal_progress(), 2.0);
        assert_eq!(b.displayed_text(), "ok");
        assert_eq!(b.state(), TextState::Waiting);
    }

    #[test]
    fn advance_chars_without_text_is_noop() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        b.advance_text_chars(3.0, &mut sfx);
        assert!(sfx.played.is_empty());
        assert_eq!(b.displayed_text(), "");
    }

    #[test]
    fn multibyte_text_is_sliced_by_chars() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        b.queue_text(vec![line("héé")], "done", false);
        b.advance_text_chars(2.0, &mut sfx);
        assert_eq!(b.displayed_text(), "hé");
    }

    #[test]
    fn busy_speaker_defers_then_retries() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        assert_eq!(b.queue_text(vec![line("wait")], "done", true), QueueOutcome::Deferred);
        assert_eq!(b.state(), TextState::None);
        assert!(!b.is_visible());

        // still swinging when the first retry fires: deferred again
        b.update(250.0, true, &mut sfx);
        assert!(b.has_deferred());
        assert_eq!(b.state(), TextState::None);

        b.update(250.0, false, &mut sfx);
        assert!(!b.has_deferred());
        assert_ne!(b.state(), TextState::None);
        assert!(b.is_visible());
        assert_eq!(b.current_text(), Some("wait"));
    }

    #[test]
    fn every_deferred_completion_is_returned() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        b.queue_text(Vec::new(), "first", true);
        b.queue_text(Vec::new(), "second", true);
        assert_eq!(b.update(250.0, false, &mut sfx), vec!["first", "second"]);
        assert!(!b.has_deferred());
        assert!(b.update(250.0, false, &mut sfx).is_empty());
    }

    #[test]
    fn reset_cancels_deferred_requests() {
        let mut b = bubble();
        let mut sfx = SoundLog::default();
        b.queue_text(vec![line("stale")], "done", true);
        b.reset();
        b.update(1_000.0, false, &mut sfx);
        assert_eq!(b.state(), TextState::None);
        assert!(b.current_text().is_none());
    }

    #[test]
    fn queueing_nothing_drains_immediately() {
        let mut b = bubble();
        assert_eq!(b.queue_text(Vec::new(), "done", false), QueueOutcome::Shown(TextAdvance::Drained(Some("done"))));
        assert!(!b.is_visible());
    }

    #[test]
    fn later_queue_replaces_completion() {
        let mut b = bubble();
        b.queue_text(vec![line("first")], "first-done", false);
        b.queue_text(vec![line("second")], "second-done", false);
        assert_eq!(b.current_text(), Some("second"));
        b.advance_text_x();
        assert_eq!(b.advance_text_z(), Some(TextAdvance::Drained(Some("second-done"))));
    }
}
