/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum element count for arrays and maps.
///
/// This is a safety limit; adjust explicitly for your deployment.
pub const DEFAULT_MAX_COLLECTION_SIZE: usize = 1 << 16;

/// Default maximum byte length for text and byte strings.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 1 << 20;

/// Default refill/stage buffer capacity for stream substrates.
pub const DEFAULT_STREAM_BUFFER_SIZE: usize = 8 * 1024;

/// Instance configuration consumed at encoder/decoder construction.
///
/// Limits are enforced deterministically while encoding or decoding; they never
/// depend on background timers or global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on text and byte string byte lengths accepted or produced.
    pub max_string_length: usize,
    /// Upper bound on array and map element counts.
    ///
    /// Integer payloads (major types 0 and 1) are numeric values, not lengths,
    /// and are never checked against this bound.
    pub max_collection_size: usize,
    /// Upper bound on nested-item depth, shared between encode and decode.
    pub max_depth: usize,
    /// Capacity of the refill/stage buffer when attached to a stream substrate.
    ///
    /// This also bounds the largest span a stream substrate can return without
    /// copying; longer string payloads must go through an owned or
    /// copy-into-caller-buffer decode path.
    pub stream_buffer_size: usize,
    /// When false, the encoder refuses to emit indefinite-length items and the
    /// decoder refuses to accept them.
    pub enable_indefinite_length: bool,
    /// When true, text string payloads are UTF-8-validated wherever they are
    /// traversed without being materialized as `str` (skip, field extraction,
    /// raw-bytes text emission). Decoding into `str`/`String` always validates.
    pub validate_utf8: bool,
    /// Advisory: select accelerated UTF-8 validation where compiled in.
    pub use_simd: bool,
    /// When false, repeated keys in a decoded map fail with
    /// [`ErrorCode::MalformedInput`](crate::ErrorCode::MalformedInput); when
    /// true, the last occurrence wins.
    pub allow_duplicate_keys: bool,
}

impl Config {
    /// Construct the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_collection_size: DEFAULT_MAX_COLLECTION_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            stream_buffer_size: DEFAULT_STREAM_BUFFER_SIZE,
            enable_indefinite_length: true,
            validate_utf8: true,
            use_simd: true,
            allow_duplicate_keys: true,
        }
    }

    /// Conservative limits derived from a maximum message size.
    ///
    /// String and collection bounds are capped by `max_message_bytes`; the
    /// remaining options keep their defaults. This is a pragmatic baseline;
    /// production deployments should tune limits explicitly.
    #[must_use]
    pub const fn for_message_bytes(max_message_bytes: usize) -> Self {
        let mut cfg = Self::new();
        if max_message_bytes < cfg.max_string_length {
            cfg.max_string_length = max_message_bytes;
        }
        if max_message_bytes < cfg.max_collection_size {
            cfg.max_collection_size = max_message_bytes;
        }
        cfg
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
