// `SoundBoard` over HtmlAudioElement. Preloaded clips report ready on
// `canplaythrough`; streamed tracks are ready as soon as they are registered.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use web_sys::HtmlAudioElement;

use super::dom::Listener;
use crate::assets::manifest::AUDIO_MANIFEST;
use crate::assets::{AssetGate, LoadKind, Sound, SoundBoard};
use crate::error::{GameError, GameResult};

pub(crate) struct WebAudio {
    clips: HashMap<Sound, HtmlAudioElement>,
    _listeners: Vec<Listener>,
}

impl WebAudio {
    pub fn load(audio_dir: &str, gate: &Rc<RefCell<AssetGate>>) -> GameResult<Self> {
        let mut clips = HashMap::new();
        let mut listeners = Vec::new();
        for asset in AUDIO_MANIFEST {
            let name = asset.sound.name();
            gate.borrow_mut().register(name, asset.kind);

            let clip = HtmlAudioElement::new().map_err(GameError::dom)?;
            clip.set_loop(asset.looped);
            clip.set_volume(asset.volume);
            match asset.kind {
                LoadKind::Preload => {
                    clip.set_preload("auto");
                    let loaded = Rc::clone(gate);
                    listeners.push(Listener::new(&clip, "canplaythrough", move |_| {
                        let _ = loaded.borrow_mut().mark_loaded(name);
                    })?);
                }
                LoadKind::Streamed => clip.set_preload("none"),
            }
            listeners.push(Listener::new(&clip, "error", move |_| {
                warn!("audio '{name}' failed to load");
            })?);
            clip.set_src(&format!("{audio_dir}{}", asset.path));
            clips.insert(asset.sound, clip);
        }
        Ok(Self { clips, _listeners: listeners })
    }
}

impl SoundBoard for WebAudio {
    fn play(&mut self, sound: Sound) {
        let Some(clip) = self.clips.get(&sound) else {
            warn!("no clip for {sound:?}");
            return;
        };
        // restart one-shots so rapid repeats are all audible
        if !clip.loop_() {
            clip.set_current_time(0.0);
        }
        // autoplay may be refused before the first user gesture
        if let Err(e) = clip.play() {
            debug!("play {sound:?} rejected: {e:?}");
        }
    }

    fn stop(&mut self, sound: Sound) {
        if let Some(clip) = self.clips.get(&sound) {
            let _ = clip.pause();
            clip.set_current_time(0.0);
        }
    }
}
