//! I/O layer: image decoding and JPEG/PNG writers. Codec logic itself lives in
//! the `image` and `jpeg-encoder` crates; this module only adapts pixel layouts.
pub mod decode;
pub use decode::{decode, load};

pub mod writers;
pub use writers::{encode, save};
