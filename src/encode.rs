//! Type-directed encoding.
//!
//! An [`Encoder`] emits exactly one complete item per top-level value. Atoms
//! map directly onto the head protocol; composites are built through the
//! closure builders ([`Encoder::array`], [`Encoder::map`]) so that declared
//! lengths always match emitted element counts.

use crate::head::{self, major, write_break, write_head, write_indefinite};
use crate::sink::Sink;
use crate::utf8;
use crate::{Config, Error, ErrorCode};

#[cfg(feature = "alloc")]
use crate::sink::VecSink;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
use crate::sink::WriterSink;

/// Encode a value of a statically-known shape into an encoder.
pub trait Encode {
    /// Encode `self` as one complete item.
    ///
    /// # Errors
    ///
    /// Returns an error if the value violates the configured limits or the
    /// substrate cannot accept the bytes.
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error>;
}

/// Marker trait for shapes that may appear as sequence elements.
///
/// `u8` is deliberately excluded so that `Vec<u8>` and `&[u8]` stay byte
/// strings rather than integer arrays.
pub trait SequenceElem {}

/// An encoder instance bound to one output substrate.
pub struct Encoder<S> {
    pub(crate) sink: S,
    pub(crate) config: Config,
    depth: usize,
}

impl<S: Sink> Encoder<S> {
    /// Attach an encoder to a substrate with the given configuration.
    #[must_use]
    pub const fn new(sink: S, config: Config) -> Self {
        Self {
            sink,
            config,
            depth: 0,
        }
    }

    /// Unwrap the substrate.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Bytes emitted to the substrate so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.sink.position()
    }

    /// The instance configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Encode one value of shape `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails; emitted bytes may then not form a
    /// valid prefix.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        value.encode(self)
    }

    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= self.config.max_depth {
            return Err(Error::new(ErrorCode::DepthExceeded, self.sink.position()));
        }
        self.depth += 1;
        Ok(())
    }

    fn exit(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth = self.depth.saturating_sub(1);
    }

    /// Encode null.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the byte.
    pub fn null(&mut self) -> Result<(), Error> {
        self.sink.write_byte(head::NULL_BYTE)
    }

    /// Encode a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the byte.
    pub fn bool(&mut self, v: bool) -> Result<(), Error> {
        self.sink.write_byte(if v { 0xf5 } else { 0xf4 })
    }

    /// Encode an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the bytes.
    pub fn uint(&mut self, v: u64) -> Result<(), Error> {
        write_head(&mut self.sink, major::UNSIGNED, v)
    }

    /// Encode a signed integer; negative values go through the `-1 - n`
    /// transform onto major type 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the bytes.
    pub fn int(&mut self, v: i64) -> Result<(), Error> {
        if v >= 0 {
            let u = u64::try_from(v)
                .map_err(|_| Error::new(ErrorCode::IntegerOverflow, self.sink.position()))?;
            write_head(&mut self.sink, major::UNSIGNED, u)
        } else {
            let n = u64::try_from(-1_i128 - i128::from(v))
                .map_err(|_| Error::new(ErrorCode::IntegerOverflow, self.sink.position()))?;
            write_head(&mut self.sink, major::NEGATIVE, n)
        }
    }

    /// Encode a half-precision float.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the bytes.
    pub fn float16(&mut self, v: half::f16) -> Result<(), Error> {
        self.sink.write_byte((major::SIMPLE << 5) | head::simple::F16)?;
        self.sink.write_span(&v.to_bits().to_be_bytes())
    }

    /// Encode a single-precision float.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the bytes.
    pub fn float32(&mut self, v: f32) -> Result<(), Error> {
        self.sink.write_byte((major::SIMPLE << 5) | head::simple::F32)?;
        self.sink.write_span(&v.to_bits().to_be_bytes())
    }

    /// Encode a double-precision float.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot accept the bytes.
    pub fn float64(&mut self, v: f64) -> Result<(), Error> {
        self.sink.write_byte((major::SIMPLE << 5) | head::simple::F64)?;
        self.sink.write_span(&v.to_bits().to_be_bytes())
    }

    fn string_head(&mut self, mjr: u8, len: usize) -> Result<(), Error> {
        if len > self.config.max_string_length {
            return Err(Error::new(ErrorCode::InvalidLength, self.sink.position()));
        }
        let len = u64::try_from(len)
            .map_err(|_| Error::new(ErrorCode::InvalidLength, self.sink.position()))?;
        write_head(&mut self.sink, mjr, len)
    }

    /// Encode a text string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string exceeds the configured length limit or
    /// the substrate cannot accept the bytes.
    pub fn text(&mut self, s: &str) -> Result<(), Error> {
        // `str` guarantees valid UTF-8.
        let b = s.as_bytes();
        self.string_head(major::TEXT, b.len())?;
        self.sink.write_span(b)
    }

    /// Encode a text string from raw bytes, validating UTF-8 when the
    /// configuration asks for it.
    ///
    /// # Errors
    ///
    /// Returns an error on ill-formed UTF-8 (with validation enabled), a
    /// length over the configured limit, or a substrate failure.
    pub fn text_bytes(&mut self, b: &[u8]) -> Result<(), Error> {
        if self.config.validate_utf8 {
            utf8::validate(b, self.config.use_simd)
                .map_err(|()| Error::new(ErrorCode::InvalidUtf8, self.sink.position()))?;
        }
        self.string_head(major::TEXT, b.len())?;
        self.sink.write_span(b)
    }

    /// Encode a byte string.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload exceeds the configured length limit or
    /// the substrate cannot accept the bytes.
    pub fn bytes(&mut self, b: &[u8]) -> Result<(), Error> {
        self.string_head(major::BYTES, b.len())?;
        self.sink.write_span(b)
    }

    fn collection_head(&mut self, mjr: u8, len: usize) -> Result<(), Error> {
        if len > self.config.max_collection_size {
            return Err(Error::new(ErrorCode::InvalidLength, self.sink.position()));
        }
        let len = u64::try_from(len)
            .map_err(|_| Error::new(ErrorCode::InvalidLength, self.sink.position()))?;
        write_head(&mut self.sink, mjr, len)
    }

    /// Encode a definite-length array, filled through the builder closure.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder emits a different number of elements,
    /// the depth limit is exceeded, or encoding fails.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ArrayEncoder<'_, S>) -> Result<(), Error>,
    {
        self.collection_head(major::ARRAY, len)?;
        self.enter()?;
        let mut a = ArrayEncoder {
            enc: self,
            remaining: Some(len),
        };
        f(&mut a)?;
        let remaining = a.remaining;
        self.exit();
        if remaining != Some(0) {
            return Err(Error::new(ErrorCode::InvalidLength, self.sink.position()));
        }
        Ok(())
    }

    /// Encode an indefinite-length array, terminated by a break marker.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnsupportedValue`] when indefinite lengths are
    /// disabled, or an error if the depth limit is exceeded or encoding fails.
    pub fn array_indefinite<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ArrayEncoder<'_, S>) -> Result<(), Error>,
    {
        if !self.config.enable_indefinite_length {
            return Err(Error::new(ErrorCode::UnsupportedValue, self.sink.position()));
        }
        write_indefinite(&mut self.sink, major::ARRAY)?;
        self.enter()?;
        let mut a = ArrayEncoder {
            enc: self,
            remaining: None,
        };
        f(&mut a)?;
        self.exit();
        write_break(&mut self.sink)
    }

    /// Encode a definite-length map, filled through the builder closure.
    ///
    /// Entries are emitted in call order; no reordering takes place.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder emits a different number of entries,
    /// the depth limit is exceeded, or encoding fails.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut MapEncoder<'_, S>) -> Result<(), Error>,
    {
        self.collection_head(major::MAP, len)?;
        self.enter()?;
        let mut m = MapEncoder {
            enc: self,
            remaining: Some(len),
        };
        f(&mut m)?;
        let remaining = m.remaining;
        self.exit();
        if remaining != Some(0) {
            return Err(Error::new(ErrorCode::InvalidLength, self.sink.position()));
        }
        Ok(())
    }

    /// Encode an indefinite-length map, terminated by a break marker.
    ///
    /// # Errors
    ///
    /// Same failure cases as [`Encoder::array_indefinite`].
    pub fn map_indefinite<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut MapEncoder<'_, S>) -> Result<(), Error>,
    {
        if !self.config.enable_indefinite_length {
            return Err(Error::new(ErrorCode::UnsupportedValue, self.sink.position()));
        }
        write_indefinite(&mut self.sink, major::MAP)?;
        self.enter()?;
        let mut m = MapEncoder {
            enc: self,
            remaining: None,
        };
        f(&mut m)?;
        self.exit();
        write_break(&mut self.sink)
    }
}

/// Builder for array elements.
pub struct ArrayEncoder<'a, S: Sink> {
    enc: &'a mut Encoder<S>,
    remaining: Option<usize>,
}

impl<S: Sink> ArrayEncoder<'_, S> {
    /// Encode the next element.
    ///
    /// # Errors
    ///
    /// Returns an error if more elements are emitted than declared, or if
    /// encoding the element fails.
    pub fn value<T: Encode + ?Sized>(&mut self, v: &T) -> Result<(), Error> {
        self.advance()?;
        v.encode(self.enc)
    }

    /// Encode the next element through a closure over the raw encoder.
    ///
    /// # Errors
    ///
    /// Same failure cases as [`ArrayEncoder::value`].
    pub fn value_with<F>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Encoder<S>) -> Result<(), Error>,
    {
        self.advance()?;
        f(self.enc)
    }

    fn advance(&mut self) -> Result<(), Error> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return Err(Error::new(
                    ErrorCode::InvalidLength,
                    self.enc.sink.position(),
                ));
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

/// Builder for map entries.
pub struct MapEncoder<'a, S: Sink> {
    enc: &'a mut Encoder<S>,
    remaining: Option<usize>,
}

impl<S: Sink> MapEncoder<'_, S> {
    /// Encode the next entry: a text key followed by a value closure.
    ///
    /// # Errors
    ///
    /// Returns an error if more entries are emitted than declared, or if
    /// encoding the key or value fails.
    pub fn entry<F>(&mut self, key: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Encoder<S>) -> Result<(), Error>,
    {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return Err(Error::new(
                    ErrorCode::InvalidLength,
                    self.enc.sink.position(),
                ));
            }
            *remaining -= 1;
        }
        self.enc.text(key)?;
        f(self.enc)
    }
}

impl Encode for () {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.null()
    }
}

impl Encode for bool {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.bool(*self)
    }
}

macro_rules! impl_encode_unsigned {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
                e.uint(u64::from(*self))
            }
        }
    )*};
}

impl_encode_unsigned!(u8, u16, u32, u64);

impl Encode for usize {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        let v = u64::try_from(*self)
            .map_err(|_| Error::new(ErrorCode::IntegerOverflow, e.position()))?;
        e.uint(v)
    }
}

macro_rules! impl_encode_signed {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
                e.int(i64::from(*self))
            }
        }
    )*};
}

impl_encode_signed!(i8, i16, i32, i64);

impl Encode for isize {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        let v = i64::try_from(*self)
            .map_err(|_| Error::new(ErrorCode::IntegerOverflow, e.position()))?;
        e.int(v)
    }
}

impl Encode for half::f16 {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.float16(*self)
    }
}

impl Encode for f32 {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.float32(*self)
    }
}

impl Encode for f64 {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.float64(*self)
    }
}

impl Encode for str {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.text(self)
    }
}

impl Encode for [u8] {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.bytes(self)
    }
}

#[cfg(feature = "alloc")]
impl Encode for String {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.text(self)
    }
}

#[cfg(feature = "alloc")]
impl Encode for Vec<u8> {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.bytes(self)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        (**self).encode(e)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        match self {
            Some(v) => v.encode(e),
            None => e.null(),
        }
    }
}

impl<T: Encode + SequenceElem> Encode for [T] {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        e.array(self.len(), |a| {
            for item in self {
                a.value(item)?;
            }
            Ok(())
        })
    }
}

impl<T: Encode + SequenceElem, const N: usize> Encode for [T; N] {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        self.as_slice().encode(e)
    }
}

#[cfg(feature = "alloc")]
impl<T: Encode + SequenceElem> Encode for Vec<T> {
    fn encode<S: Sink>(&self, e: &mut Encoder<S>) -> Result<(), Error> {
        self.as_slice().encode(e)
    }
}

impl SequenceElem for bool {}
impl SequenceElem for () {}
impl SequenceElem for u16 {}
impl SequenceElem for u32 {}
impl SequenceElem for u64 {}
impl SequenceElem for usize {}
impl SequenceElem for i8 {}
impl SequenceElem for i16 {}
impl SequenceElem for i32 {}
impl SequenceElem for i64 {}
impl SequenceElem for isize {}
impl SequenceElem for half::f16 {}
impl SequenceElem for f32 {}
impl SequenceElem for f64 {}
impl SequenceElem for str {}
impl SequenceElem for [u8] {}
#[cfg(feature = "alloc")]
impl SequenceElem for String {}
#[cfg(feature = "alloc")]
impl<T: SequenceElem> SequenceElem for alloc::vec::Vec<T> {}
impl<T: SequenceElem> SequenceElem for Option<T> {}
impl<T: SequenceElem, const N: usize> SequenceElem for [T; N] {}
impl<T: SequenceElem + ?Sized> SequenceElem for &T {}

/// Encode one value into a freshly allocated vector.
///
/// # Errors
///
/// Returns an error if encoding fails.
#[cfg(feature = "alloc")]
pub fn to_vec<T: Encode + ?Sized>(value: &T, config: &Config) -> Result<Vec<u8>, Error> {
    let mut e = Encoder::new(VecSink::new(), *config);
    value.encode(&mut e)?;
    Ok(e.into_sink().into_vec())
}

/// Encode one value into a fixed buffer, returning the number of bytes written.
///
/// # Errors
///
/// Returns [`ErrorCode::BufferOverflow`] if the buffer is too small, or any
/// other encoding failure.
pub fn to_slice<T: Encode + ?Sized>(
    value: &T,
    buf: &mut [u8],
    config: &Config,
) -> Result<usize, Error> {
    let mut e = Encoder::new(crate::sink::SliceSink::new(buf), *config);
    value.encode(&mut e)?;
    Ok(e.position())
}

/// Encode one value to a writer through a stage buffer, flushing on completion.
///
/// The stage buffer capacity is taken from [`Config::stream_buffer_size`].
///
/// # Errors
///
/// Returns an error if encoding or the underlying writer fails.
#[cfg(feature = "std")]
pub fn to_writer<T: Encode + ?Sized, W: std::io::Write>(
    value: &T,
    writer: W,
    config: &Config,
) -> Result<(), Error> {
    let mut e = Encoder::new(WriterSink::new(writer, config.stream_buffer_size), *config);
    value.encode(&mut e)?;
    e.into_sink().finish().map(|_| ())
}
