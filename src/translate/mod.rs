//! Translation between the OpenAI Chat Completions dialect and the Workers AI
//! `responses` dialect.
//!
//! All translation functions are pure (no I/O). The streaming emitter replays a
//! finished response as chunk frames; the transport side lives in `server`.

pub mod openai_types;
pub mod request;
pub mod response;
pub mod streaming;
pub mod workers_types;

use serde::{Deserialize, Deserializer};

/// Decode an explicit JSON `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
