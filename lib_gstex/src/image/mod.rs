pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod header;
pub mod profile;

pub use decoder::{decode, decode_with};
pub use encoder::{encode, encode_with, splice};
