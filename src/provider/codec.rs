// Value codec shared by every provider.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// Turns typed values into the bytes providers store, and back.
///
/// Decoding into a shape other than the one that was encoded must fail
/// with [`CacheError::TypeMismatch`], never panic.
pub trait Codec: Send + Sync + 'static {
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CacheError>;
    fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, CacheError>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, CacheError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| CacheError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, CacheError> {
        serde_json::from_slice(raw).map_err(|e| CacheError::TypeMismatch(e.to_string()))
    }
}
