// Archive codec modules
pub mod common;
pub mod validator;
pub mod zip_codec;

pub use common::StreamCodec;
pub use validator::is_valid_archive;
pub use zip_codec::ZipCodec;
