// Caller-supplied read destinations.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::codec::{Codec, JsonCodec};
use crate::error::CacheError;

/// Write target for a provider read.
///
/// Providers only ever call [`Destination::fill`]. The client additionally
/// uses [`Destination::blank`] to give each racing provider its own copy of
/// the caller's destination and [`Destination::absorb`] to move the winning
/// copy back, so a losing backend never writes into the caller's value.
pub trait Destination: Send {
    /// Decodes stored bytes into this destination.
    fn fill(&mut self, raw: &[u8]) -> Result<(), CacheError>;

    /// Returns an empty destination of the same shape.
    fn blank(&self) -> Box<dyn Destination>;

    /// Takes the value out of a filled destination of the same shape.
    fn absorb(&mut self, filled: Box<dyn Destination>) -> Result<(), CacheError>;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Typed destination decoding with codec `C`.
pub struct Slot<T, C = JsonCodec> {
    value: Option<T>,
    _codec: PhantomData<fn() -> C>,
}

impl<T, C> Slot<T, C> {
    pub fn new() -> Self {
        Self {
            value: None,
            _codec: PhantomData,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T, C> Default for Slot<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Slot<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot").field("value", &self.value).finish()
    }
}

impl<T, C> Destination for Slot<T, C>
where
    T: DeserializeOwned + Send + 'static,
    C: Codec,
{
    fn fill(&mut self, raw: &[u8]) -> Result<(), CacheError> {
        self.value = Some(C::decode(raw)?);
        Ok(())
    }

    fn blank(&self) -> Box<dyn Destination> {
        Box::new(Slot::<T, C>::new())
    }

    fn absorb(&mut self, filled: Box<dyn Destination>) -> Result<(), CacheError> {
        let filled = filled
            .into_any()
            .downcast::<Self>()
            .map_err(|_| CacheError::InvalidDestination)?;
        match filled.value {
            Some(value) => {
                self.value = Some(value);
                Ok(())
            }
            None => Err(CacheError::InvalidDestination),
        }
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
