#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
///
/// `accelerate` selects the SIMD path when the `simdutf8` feature is compiled
/// in; it is advisory and has no semantic effect.
#[inline]
pub fn validate(bytes: &[u8], accelerate: bool) -> Result<&str, ()> {
    #[cfg(feature = "simdutf8")]
    {
        if accelerate {
            return simd_utf8::from_utf8(bytes).map_err(|_| ());
        }
    }

    #[cfg(not(feature = "simdutf8"))]
    let _ = accelerate;

    core::str::from_utf8(bytes).map_err(|_| ())
}
