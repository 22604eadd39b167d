//! Browser side of the game.
//!
//! `start` builds a `Session` that owns everything the page hands callbacks
//! to: the asset loaders, the gate poll timer, input listeners and the frame
//! loop. Every callback holds only a `Weak` to the session, so once JS calls
//! `GameSession::stop` (or drops the handle) nothing fires into a dead game.

mod audio;
mod canvas;
mod dom;
mod graphics;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, trace};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, window};

use crate::assets::{AssetGate, GateStatus, ReadinessPoll, Sound, SoundBoard};
use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::game::{GameHandler, Key};
use audio::WebAudio;
use canvas::WebCanvas;
use dom::{Listener, Timeout, performance_now};
use graphics::TextureStore;

type FrameCallback = Closure<dyn FnMut(f64)>;

struct Session {
    config: GameConfig,
    running: Cell<bool>,
    gate: Rc<RefCell<AssetGate>>,
    poll: RefCell<ReadinessPoll>,
    poll_timer: RefCell<Option<Timeout>>,
    audio: RefCell<WebAudio>,
    canvas: RefCell<WebCanvas>,
    canvas_el: HtmlCanvasElement,
    document: Document,
    game: RefCell<GameHandler>,
    clock: RefCell<FrameClock>,
    frame: RefCell<Option<FrameCallback>>,
    frame_request: Cell<Option<i32>>,
    listeners: RefCell<Vec<Listener>>,
}

/// Handle returned to JS. Dropping it or calling `stop` ends the game.
#[wasm_bindgen]
pub struct GameSession {
    inner: Rc<Session>,
}

#[wasm_bindgen]
impl GameSession {
    /// Halts the frame loop, cancels a pending asset poll, silences audio and
    /// unhooks all input listeners. Safe to call more than once.
    pub fn stop(&self) {
        self.inner.shutdown();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.running.get()
    }

    /// True once every asset has loaded and play has started.
    #[wasm_bindgen(getter)]
    pub fn ready(&self) -> bool {
        self.inner.frame.borrow().is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.inner.game.borrow().score()
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

pub(crate) fn start(config: GameConfig, level_json: &str, difficulty: &str) -> GameResult<GameSession> {
    let game = GameHandler::from_json(&config, level_json, difficulty)?;

    let win = window().ok_or_else(|| GameError::Dom("no window".into()))?;
    let document = win.document().ok_or_else(|| GameError::Dom("no document".into()))?;
    let canvas_el = find_or_create_canvas(&document, &config)?;
    let ctx: CanvasRenderingContext2d = canvas_el
        .get_context("2d")
        .map_err(GameError::dom)?
        .ok_or_else(|| GameError::Dom("2d context unavailable".into()))?
        .dyn_into()
        .map_err(|o| GameError::dom(o.into()))?;

    let gate = Rc::new(RefCell::new(AssetGate::new()));
    let audio = WebAudio::load(&config.audio_dir, &gate)?;
    let textures = Rc::new(TextureStore::load(&config.image_dir, &gate)?);
    info!("loading {} assets", gate.borrow().len());

    let canvas = WebCanvas::new(ctx, textures, config.game_width as f64, config.game_height as f64);
    let session = Rc::new(Session {
        poll: RefCell::new(ReadinessPoll::new(config.asset_poll_max_attempts)),
        clock: RefCell::new(FrameClock::new(performance_now(), config.max_frame_delta_ms)),
        config,
        running: Cell::new(true),
        gate,
        poll_timer: RefCell::new(None),
        audio: RefCell::new(audio),
        canvas: RefCell::new(canvas),
        canvas_el,
        document,
        game: RefCell::new(game),
        frame: RefCell::new(None),
        frame_request: Cell::new(None),
        listeners: RefCell::new(Vec::new()),
    });
    Session::poll_gate(&session);
    Ok(GameSession { inner: session })
}

fn find_or_create_canvas(doc: &Document, config: &GameConfig) -> GameResult<HtmlCanvasElement> {
    let canvas: HtmlCanvasElement = match doc.get_element_by_id(&config.canvas_id) {
        Some(el) => el.dyn_into().map_err(|_| GameError::Dom(format!("#{} is not a canvas", config.canvas_id)))?,
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")
                .map_err(GameError::dom)?
                .dyn_into()
                .map_err(|_| GameError::Dom("created element is not a canvas".into()))?;
            c.set_id(&config.canvas_id);
            let body = doc.body().ok_or_else(|| GameError::Dom("no body".into()))?;
            body.append_child(&c).map_err(GameError::dom)?;
            c
        }
    };
    canvas.set_width(config.game_width);
    canvas.set_height(config.game_height);
    Ok(canvas)
}

impl Session {
    fn poll_gate(this: &Rc<Self>) {
        if !this.running.get() {
            return;
        }
        let status = this.poll.borrow_mut().poll(&this.gate.borrow());
        match status {
            Ok(GateStatus::Ready { attempts }) => {
                info!("assets ready after {attempts} polls");
                this.poll_timer.borrow_mut().take();
                if let Err(e) = Self::begin(this) {
                    error!("failed to start game: {e}");
                    this.shutdown();
                }
            }
            Ok(GateStatus::Pending { attempt, missing }) => {
                debug!("poll {attempt}: waiting on {missing:?}");
                let weak = Rc::downgrade(this);
                let timer = Timeout::new(this.config.asset_poll_interval_ms, move || {
                    if let Some(s) = weak.upgrade() {
                        Session::poll_gate(&s);
                    }
                });
                match timer {
                    Ok(t) => *this.poll_timer.borrow_mut() = Some(t),
                    Err(e) => {
                        error!("cannot schedule asset poll: {e}");
                        this.shutdown();
                    }
                }
            }
            Err(e) => {
                error!("{e}");
                this.show_loading_error(&e);
                this.shutdown();
            }
        }
    }

    fn begin(this: &Rc<Self>) -> GameResult<()> {
        Self::wire_input(this)?;
        if let Some(loading) = this.document.get_element_by_id(&this.config.loading_element_id) {
            loading.remove();
        }
        this.game.borrow_mut().start(&mut *this.audio.borrow_mut());
        this.clock.borrow_mut().tick(performance_now());
        Self::start_loop(this);
        Ok(())
    }

    fn wire_input(this: &Rc<Self>) -> GameResult<()> {
        let mut listeners = Vec::new();

        let weak = Rc::downgrade(this);
        listeners.push(Listener::new(&this.document, "keydown", move |ev| {
            let Some(ev) = ev.dyn_ref::<KeyboardEvent>() else { return };
            let Some(key) = Key::from_dom(&ev.key()) else { return };
            // keep arrow keys from scrolling the page
            ev.prevent_default();
            with_game(&weak, |game, sfx| game.key_down(key, sfx));
        })?);

        let weak = Rc::downgrade(this);
        listeners.push(Listener::new(&this.canvas_el, "mousemove", move |ev| {
            let Some(ev) = ev.dyn_ref::<MouseEvent>() else { return };
            let (x, y) = (ev.offset_x() as f64, ev.offset_y() as f64);
            with_game(&weak, |game, sfx| game.pointer_move(x, y, sfx));
        })?);

        let weak = Rc::downgrade(this);
        listeners.push(Listener::new(&this.canvas_el, "mouseleave", move |_| {
            with_game(&weak, |game, _| game.pointer_leave());
        })?);

        let weak = Rc::downgrade(this);
        listeners.push(Listener::new(&this.canvas_el, "mousedown", move |ev| {
            let Some(ev) = ev.dyn_ref::<MouseEvent>() else { return };
            let (x, y) = (ev.offset_x() as f64, ev.offset_y() as f64);
            with_game(&weak, |game, sfx| game.pointer_down(x, y, sfx));
        })?);

        // the page's "back home" link shares the menu sounds
        if let Some(back) = this.document.get_element_by_id(&this.config.back_home_element_id) {
            for (event, sound) in [("mouseenter", Sound::ButtonHoverSfx), ("click", Sound::ButtonSelectSfx)] {
                let weak = Rc::downgrade(this);
                listeners.push(Listener::new(&back, event, move |_| {
                    if let Some(s) = weak.upgrade().filter(|s| s.running.get()) {
                        s.audio.borrow_mut().play(sound);
                    }
                })?);
            }
        }

        *this.listeners.borrow_mut() = listeners;
        Ok(())
    }

    fn start_loop(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let callback = Closure::wrap(Box::new(move |ts: f64| {
            let Some(s) = weak.upgrade() else { return };
            if !s.running.get() {
                return;
            }
            s.frame_tick(ts);
            if let Some(f) = s.frame.borrow().as_ref() {
                s.request_frame(f);
            }
        }) as Box<dyn FnMut(f64)>);

        this.request_frame(&callback);
        *this.frame.borrow_mut() = Some(callback);
    }

    fn request_frame(&self, callback: &FrameCallback) {
        let id = window().and_then(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()).ok());
        self.frame_request.set(id);
    }

    fn frame_tick(&self, now: f64) {
        let delta = self.clock.borrow_mut().tick(now);
        trace!("frame dt {delta:.1}ms");
        let mut game = self.game.borrow_mut();
        game.update(delta, &mut *self.audio.borrow_mut());
        game.draw(&mut *self.canvas.borrow_mut());
    }

    fn show_loading_error(&self, err: &GameError) {
        if let Some(loading) = self.document.get_element_by_id(&self.config.loading_element_id) {
            loading.set_text_content(Some(&format!("Failed to load: {err}")));
        }
    }

    fn shutdown(&self) {
        if !self.running.replace(false) {
            return;
        }
        info!("stopping game session");
        self.poll_timer.borrow_mut().take();
        if let (Some(w), Some(id)) = (window(), self.frame_request.take()) {
            let _ = w.cancel_animation_frame(id);
        }
        self.listeners.borrow_mut().clear();
        if let Ok(mut audio) = self.audio.try_borrow_mut() {
            for sound in [Sound::IntroBgm, Sound::UndyneEasyBgm, Sound::UndyneMediumBgm, Sound::UndyneHardBgm] {
                audio.stop(sound);
            }
        }
        // the frame closure itself stays until the session drops
    }
}

fn with_game(weak: &Weak<Session>, f: impl FnOnce(&mut GameHandler, &mut dyn SoundBoard)) {
    let Some(s) = weak.upgrade() else { return };
    if !s.running.get() {
        return;
    }
    let mut game = s.game.borrow_mut();
    f(&mut *game, &mut *s.audio.borrow_mut());
}
