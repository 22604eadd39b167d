// Texture loading: one HtmlImageElement per manifest entry, each flipping its
// gate flag from the image's `load` event.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{trace, warn};
use web_sys::HtmlImageElement;

use super::dom::Listener;
use crate::assets::manifest::TEXTURE_MANIFEST;
use crate::assets::{AssetGate, LoadKind};
use crate::error::{GameError, GameResult};

pub(crate) struct Texture {
    pub image: HtmlImageElement,
    /// Nearest-neighbour scaling.
    pub pixel_art: bool,
}

pub(crate) struct TextureStore {
    textures: HashMap<&'static str, Texture>,
    _listeners: Vec<Listener>,
}

impl TextureStore {
    pub fn load(image_dir: &str, gate: &Rc<RefCell<AssetGate>>) -> GameResult<Self> {
        let mut textures = HashMap::new();
        let mut listeners = Vec::new();
        for &(name, file, pixel_art) in TEXTURE_MANIFEST {
            gate.borrow_mut().register(name, LoadKind::Preload);
            let image = HtmlImageElement::new().map_err(GameError::dom)?;

            let loaded = Rc::clone(gate);
            listeners.push(Listener::new(&image, "load", move |_| {
                let _ = loaded.borrow_mut().mark_loaded(name);
            })?);
            listeners.push(Listener::new(&image, "error", move |_| {
                warn!("texture '{name}' failed to load");
            })?);

            // src last so a cached image cannot fire `load` before the listener exists
            image.set_src(&format!("{image_dir}{file}"));
            textures.insert(name, Texture { image, pixel_art });
        }
        trace!("requested {} textures", textures.len());
        Ok(Self { textures, _listeners: listeners })
    }

    pub fn get(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }
}
