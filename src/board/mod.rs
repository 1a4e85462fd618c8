//! Core data model for a PureRef board.
//!
//! This module contains:
//! - `ImageElement` - One placed image with its transform attributes
//! - `Board` - Ordered collection of images read from one `.pur` file
//! - `codec` - Reader and writer for the `.pur` container

pub mod codec;

pub use codec::{BoardReader, BoardWriter, ParseError, PurCodec, SerializeError};

/// Item type tag PureRef uses for pixmap items.
pub const IMAGE_ITEM_TYPE: &str = "QGraphicsPixmapItem";

/// A single image placed on the board.
///
/// `width` and `height` describe the source image and are never changed by
/// a transform. `x`/`y` are the top-left corner in canvas coordinates and
/// `rotation` is in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub id: u32,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
    /// Encoded image bytes. Opaque to this crate.
    pub payload: Vec<u8>,
}

impl ImageElement {
    /// Create an image of the given size at the origin with an identity transform.
    pub fn new(id: u32, width: f64, height: f64) -> Self {
        Self {
            id,
            name: String::new(),
            width,
            height,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
            payload: Vec::new(),
        }
    }

    /// Move the image to `(x, y)` and clear any rotation or scaling.
    pub fn place_at(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.rotation = 0.0;
        self.scale = 1.0;
    }

    /// Returns the first attribute that is NaN or infinite, if any.
    pub(crate) fn non_finite_attribute(&self) -> Option<(&'static str, f64)> {
        [
            ("width", self.width),
            ("height", self.height),
            ("x", self.x),
            ("y", self.y),
            ("rotation", self.rotation),
            ("scale", self.scale),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    }
}

/// All images from one PureRef file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Format version string from the file header.
    pub version: String,
    pub images: Vec<ImageElement>,
    /// Bytes following the image records (canvas state, text items, ...).
    /// Written back untouched.
    pub trailer: Vec<u8>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            version: codec::DEFAULT_VERSION.to_string(),
            images: Vec::new(),
            trailer: Vec::new(),
        }
    }
}

impl Board {
    /// Create an empty board with the default format version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board holding the given images.
    pub fn with_images(images: Vec<ImageElement>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[ImageElement] {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut [ImageElement] {
        &mut self.images
    }
}
