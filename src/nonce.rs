use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::{CryptoRng, RngCore};

use crate::error::Result;

/// Random bytes behind each nonce.
pub const NONCE_BYTES: usize = 16;

/// Generate a single-use nonce for the page's content security policy.
///
/// Entropy failures are returned, never papered over with an empty nonce.
pub fn generate_nonce<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Result<String> {
    let mut bytes = vec![0u8; len];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(URL_SAFE.encode(bytes))
}
