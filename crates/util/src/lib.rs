pub mod encoding;
pub mod hashing;
pub mod json_shape;
pub mod path_processing;
pub mod slashes;

pub use encoding::{EncodingError, decode_base64, encode_base64};
pub use hashing::{HashError, KeyedHasher, crc32};
pub use json_shape::{is_structured_json, structured_json};
pub use path_processing::{config_path_from_env, expand_tilde};
pub use slashes::strip_slashes;
