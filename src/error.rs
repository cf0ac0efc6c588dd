use core::fmt;

/// A structured error code identifying why an encode or decode operation failed.
///
/// This enum is intentionally payload-light to support `no_std` and to remain hot-path friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Write past the end of a fixed output buffer.
    BufferOverflow,
    /// Read past the end of input, including premature end-of-stream.
    BufferUnderflow,
    /// The underlying reader or writer reported a failure.
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),

    /// Encoded major type or shape does not match the requested type.
    TypeMismatch,
    /// Declared length exceeds a configured limit or contradicts a fixed-shape expectation.
    InvalidLength,
    /// Additional-info value is reserved (28..=30) or inappropriate for its major type.
    InvalidAdditionalInfo,
    /// Float additional info does not match the requested float width.
    InvalidFloat,
    /// Major type 7 additional info is not 20 or 21 where a boolean was requested.
    InvalidBool,
    /// Text string payload is not well-formed UTF-8.
    InvalidUtf8,
    /// Indefinite-length item seen while disabled, or used where a definite length is required.
    InvalidIndefiniteLength,
    /// Break marker appeared outside any indefinite-length item.
    InvalidBreakCode,
    /// Break marker missing where an indefinite-length item must end.
    MissingBreakMarker,

    /// Decoded integer does not fit the requested width.
    IntegerOverflow,
    /// Negative integer decoded into an unsigned type.
    NegativeIntegerForUnsigned,
    /// Nesting depth exceeded the configured maximum.
    DepthExceeded,
    /// A non-optional record field was absent from the encoded map.
    MissingRequiredField,
    /// Operation disabled by configuration or unsupported by the attached substrate.
    UnsupportedValue,
    /// Duplicate map key or other structural inconsistency.
    MalformedInput,
    /// Memory allocation failed while decoding into owned structures.
    OutOfMemory,
}

/// A codec error with a stable code and the byte position where it was detected.
///
/// Positions count bytes consumed (decode) or emitted (encode) on the attached substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    /// The error code.
    pub code: ErrorCode,
    /// Byte position on the substrate where the error was detected.
    pub position: usize,
}

impl Error {
    /// Construct an error at `position`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, position: usize) -> Self {
        Self { code, position }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::BufferOverflow => "write past end of output buffer",
            ErrorCode::BufferUnderflow => "unexpected end of input",
            #[cfg(feature = "std")]
            ErrorCode::Io(kind) => {
                return write!(f, "cbor error at {}: i/o failure ({kind})", self.position)
            }

            ErrorCode::TypeMismatch => "major type does not match requested type",
            ErrorCode::InvalidLength => "length exceeds limit or contradicts expected shape",
            ErrorCode::InvalidAdditionalInfo => "reserved or inappropriate additional info",
            ErrorCode::InvalidFloat => "float width does not match requested type",
            ErrorCode::InvalidBool => "simple value is not a boolean",
            ErrorCode::InvalidUtf8 => "text must be valid UTF-8",
            ErrorCode::InvalidIndefiniteLength => "indefinite length not allowed here",
            ErrorCode::InvalidBreakCode => "break marker outside indefinite item",
            ErrorCode::MissingBreakMarker => "missing break marker",

            ErrorCode::IntegerOverflow => "integer does not fit requested width",
            ErrorCode::NegativeIntegerForUnsigned => "negative integer for unsigned type",
            ErrorCode::DepthExceeded => "nesting depth limit exceeded",
            ErrorCode::MissingRequiredField => "missing required record field",
            ErrorCode::UnsupportedValue => "operation disabled by configuration",
            ErrorCode::MalformedInput => "structurally inconsistent input",
            ErrorCode::OutOfMemory => "allocation failed",
        };

        write!(f, "cbor error at {}: {msg}", self.position)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
