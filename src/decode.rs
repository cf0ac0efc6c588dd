//! Type-directed decoding.
//!
//! A [`Decoder`] walks one encoded item per top-level call, dispatching on
//! the compile-time shape of the requested type. Shapes are described by the
//! [`Decode`] trait; the derive macro produces record (named-field struct)
//! implementations on top of the container primitives exposed here.

use core::marker::PhantomData;

use crate::head::{self, major, read_head, Arg};
use crate::source::{SliceSource, Source};
use crate::utf8;
use crate::{Config, Error, ErrorCode};

#[cfg(feature = "alloc")]
use crate::alloc_util::{try_reserve, try_vec_with_capacity, try_vec_zeroed};
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
use crate::source::ReaderSource;

/// Decode a value of a statically-known shape from a decoder.
pub trait Decode<'de>: Sized {
    /// Decode `Self`, consuming exactly one encoded item.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoded item does not match the expected shape
    /// or violates the configured limits.
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error>;
}

/// A decoder instance bound to one input substrate.
///
/// The decoder owns its position and depth counter; after any error the
/// position is indeterminate and the instance should be discarded.
pub struct Decoder<'de, S> {
    pub(crate) source: S,
    pub(crate) config: Config,
    pub(crate) depth: usize,
    _input: PhantomData<&'de [u8]>,
}

impl<'de, S: Source<'de>> Decoder<'de, S> {
    /// Attach a decoder to a substrate with the given configuration.
    #[must_use]
    pub const fn new(source: S, config: Config) -> Self {
        Self {
            source,
            config,
            depth: 0,
            _input: PhantomData,
        }
    }

    /// Unwrap the substrate.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Bytes consumed from the substrate so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// The instance configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Decode one item of shape `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails; the substrate position is then
    /// indeterminate.
    pub fn decode<T: Decode<'de>>(&mut self) -> Result<T, Error> {
        T::decode(self)
    }

    pub(crate) fn enter(&mut self, off: usize) -> Result<(), Error> {
        if self.depth >= self.config.max_depth {
            return Err(Error::new(ErrorCode::DepthExceeded, off));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth = self.depth.saturating_sub(1);
    }

    fn arg_to_len(&self, arg: u64, max: usize, off: usize) -> Result<usize, Error> {
        let len = usize::try_from(arg).map_err(|_| Error::new(ErrorCode::InvalidLength, off))?;
        if len > max {
            return Err(Error::new(ErrorCode::InvalidLength, off));
        }
        Ok(len)
    }

    /// Returns `true` if the next byte is the break marker, without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is exhausted.
    pub fn at_break(&mut self) -> Result<bool, Error> {
        Ok(self.source.peek_byte()? == head::BREAK)
    }

    /// Begin decoding an array head.
    ///
    /// Returns `Some(count)` for a definite array and `None` for an
    /// indefinite one. Nesting depth is entered; close the frame with
    /// [`Decoder::end_array`].
    ///
    /// # Errors
    ///
    /// Returns an error on a non-array item, a count over the configured
    /// limit, or an indefinite head while indefinite lengths are disabled.
    pub fn begin_array(&mut self) -> Result<Option<usize>, Error> {
        self.begin_collection(major::ARRAY)
    }

    /// Begin decoding a map head; the returned count is in entries (pairs).
    ///
    /// # Errors
    ///
    /// Same failure cases as [`Decoder::begin_array`].
    pub fn begin_map(&mut self) -> Result<Option<usize>, Error> {
        self.begin_collection(major::MAP)
    }

    fn begin_collection(&mut self, expect: u8) -> Result<Option<usize>, Error> {
        let off = self.source.position();
        let h = read_head(&mut self.source)?;
        if h.major != expect {
            return Err(Error::new(ErrorCode::TypeMismatch, off));
        }
        match h.arg {
            Arg::Definite(n) => {
                let len = self.arg_to_len(n, self.config.max_collection_size, off)?;
                self.enter(off)?;
                Ok(Some(len))
            }
            Arg::Indefinite => {
                if !self.config.enable_indefinite_length {
                    return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
                }
                self.enter(off)?;
                Ok(None)
            }
        }
    }

    /// Close an array frame opened by [`Decoder::begin_array`].
    ///
    /// For an indefinite frame this consumes the break marker.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::MissingBreakMarker`] if an indefinite frame does
    /// not end with a break.
    pub fn end_array(&mut self, frame: Option<usize>) -> Result<(), Error> {
        self.end_collection(frame)
    }

    /// Close a map frame opened by [`Decoder::begin_map`].
    ///
    /// # Errors
    ///
    /// Same failure cases as [`Decoder::end_array`].
    pub fn end_map(&mut self, frame: Option<usize>) -> Result<(), Error> {
        self.end_collection(frame)
    }

    fn end_collection(&mut self, frame: Option<usize>) -> Result<(), Error> {
        if frame.is_none() {
            let off = self.source.position();
            if self.source.read_byte()? != head::BREAK {
                return Err(Error::new(ErrorCode::MissingBreakMarker, off));
            }
        }
        self.exit();
        Ok(())
    }

    /// Read a map key as text, copied into `scratch`.
    ///
    /// Keys are copied before comparison so that later refills on a stream
    /// substrate cannot invalidate them. Keys are always UTF-8-validated
    /// since they are surfaced as `str`.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-text key, a key longer than `scratch` or the
    /// configured string limit, or an ill-formed key.
    pub fn read_map_key<'k>(&mut self, scratch: &'k mut [u8]) -> Result<&'k str, Error> {
        let off = self.source.position();
        let h = read_head(&mut self.source)?;
        if h.major != major::TEXT {
            return Err(Error::new(ErrorCode::TypeMismatch, off));
        }
        let len = match h.arg {
            Arg::Definite(n) => self.arg_to_len(n, self.config.max_string_length, off)?,
            Arg::Indefinite => return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off)),
        };
        if len > scratch.len() {
            return Err(Error::new(ErrorCode::InvalidLength, off));
        }
        self.source.read_into(&mut scratch[..len])?;
        utf8::validate(&scratch[..len], self.config.use_simd)
            .map_err(|()| Error::new(ErrorCode::InvalidUtf8, off))
    }

    fn begin_string(&mut self, expect: u8) -> Result<(Option<usize>, usize), Error> {
        let off = self.source.position();
        let h = read_head(&mut self.source)?;
        if h.major != expect {
            return Err(Error::new(ErrorCode::TypeMismatch, off));
        }
        match h.arg {
            Arg::Definite(n) => {
                let len = self.arg_to_len(n, self.config.max_string_length, off)?;
                Ok((Some(len), off))
            }
            Arg::Indefinite => {
                if !self.config.enable_indefinite_length {
                    return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
                }
                Ok((None, off))
            }
        }
    }

    /// Decode a definite-length text string into a caller buffer.
    ///
    /// This is the stream-safe variant of borrowed text decoding: the payload
    /// is copied through the refill logic and therefore survives later reads.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-text item, an indefinite-length string, a
    /// payload longer than `buf` or the configured limit, or ill-formed UTF-8.
    pub fn read_text_into<'k>(&mut self, buf: &'k mut [u8]) -> Result<&'k str, Error> {
        let (frame, off) = self.begin_string(major::TEXT)?;
        let Some(len) = frame else {
            return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
        };
        if len > buf.len() {
            return Err(Error::new(ErrorCode::InvalidLength, off));
        }
        self.source.read_into(&mut buf[..len])?;
        utf8::validate(&buf[..len], self.config.use_simd)
            .map_err(|()| Error::new(ErrorCode::InvalidUtf8, off))
    }

    /// Decode a definite-length byte string into a caller buffer.
    ///
    /// # Errors
    ///
    /// Same failure cases as [`Decoder::read_text_into`], minus UTF-8.
    pub fn read_bytes_into<'k>(&mut self, buf: &'k mut [u8]) -> Result<&'k [u8], Error> {
        let (frame, off) = self.begin_string(major::BYTES)?;
        let Some(len) = frame else {
            return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
        };
        if len > buf.len() {
            return Err(Error::new(ErrorCode::InvalidLength, off));
        }
        self.source.read_into(&mut buf[..len])?;
        Ok(&buf[..len])
    }

    fn read_unsigned(&mut self) -> Result<(u64, usize), Error> {
        let off = self.source.position();
        let h = read_head(&mut self.source)?;
        match h.major {
            major::UNSIGNED => match h.arg {
                Arg::Definite(v) => Ok((v, off)),
                Arg::Indefinite => Err(Error::new(ErrorCode::InvalidAdditionalInfo, off)),
            },
            major::NEGATIVE => Err(Error::new(ErrorCode::NegativeIntegerForUnsigned, off)),
            _ => Err(Error::new(ErrorCode::TypeMismatch, off)),
        }
    }

    fn read_signed(&mut self) -> Result<(i64, usize), Error> {
        let off = self.source.position();
        let h = read_head(&mut self.source)?;
        let Arg::Definite(raw) = h.arg else {
            return Err(Error::new(ErrorCode::InvalidAdditionalInfo, off));
        };
        match h.major {
            major::UNSIGNED => {
                let v = i64::try_from(raw)
                    .map_err(|_| Error::new(ErrorCode::IntegerOverflow, off))?;
                Ok((v, off))
            }
            major::NEGATIVE => {
                // -1 - raw; raw == i64::MAX maps to i64::MIN without overflow.
                let n = i64::try_from(raw)
                    .map_err(|_| Error::new(ErrorCode::IntegerOverflow, off))?;
                Ok((-1 - n, off))
            }
            _ => Err(Error::new(ErrorCode::TypeMismatch, off)),
        }
    }

    fn read_float_bits(&mut self, expect_ai: u8) -> Result<(u64, usize), Error> {
        let off = self.source.position();
        let h = read_head(&mut self.source)?;
        if h.major != major::SIMPLE {
            return Err(Error::new(ErrorCode::TypeMismatch, off));
        }
        match h.ai {
            ai if ai == expect_ai => match h.arg {
                Arg::Definite(bits) => Ok((bits, off)),
                Arg::Indefinite => Err(Error::new(ErrorCode::InvalidAdditionalInfo, off)),
            },
            head::simple::F16 | head::simple::F32 | head::simple::F64 => {
                Err(Error::new(ErrorCode::InvalidFloat, off))
            }
            _ => Err(Error::new(ErrorCode::TypeMismatch, off)),
        }
    }

    fn peek_null(&mut self) -> Result<bool, Error> {
        Ok(self.source.peek_byte()? == head::NULL_BYTE)
    }
}

impl<'de, S: Source<'de>> Decoder<'de, S> {
    #[cfg(feature = "alloc")]
    fn read_string_owned(&mut self, expect: u8) -> Result<(Vec<u8>, usize), Error> {
        let (frame, off) = self.begin_string(expect)?;
        match frame {
            Some(len) => {
                let mut v = try_vec_zeroed(len, off)?;
                self.source.read_into(&mut v)?;
                Ok((v, off))
            }
            None => {
                // Chunked string: concatenate same-major definite chunks until break.
                self.enter(off)?;
                let mut v = Vec::new();
                loop {
                    if self.at_break()? {
                        let _ = self.source.read_byte()?;
                        break;
                    }
                    let c_off = self.source.position();
                    let h = read_head(&mut self.source)?;
                    if h.major != expect {
                        return Err(Error::new(ErrorCode::MalformedInput, c_off));
                    }
                    let Arg::Definite(n) = h.arg else {
                        return Err(Error::new(ErrorCode::MalformedInput, c_off));
                    };
                    let n = self.arg_to_len(n, self.config.max_string_length, c_off)?;
                    if v.len() + n > self.config.max_string_length {
                        return Err(Error::new(ErrorCode::InvalidLength, c_off));
                    }
                    let start = v.len();
                    try_reserve(&mut v, n, c_off)?;
                    v.resize(start + n, 0);
                    self.source.read_into(&mut v[start..])?;
                }
                self.exit();
                Ok((v, off))
            }
        }
    }
}

impl<'de> Decode<'de> for () {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let off = d.source.position();
        if d.source.read_byte()? == head::NULL_BYTE {
            Ok(())
        } else {
            Err(Error::new(ErrorCode::TypeMismatch, off))
        }
    }
}

impl<'de> Decode<'de> for bool {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let off = d.source.position();
        let ib = d.source.read_byte()?;
        if ib >> 5 != major::SIMPLE {
            return Err(Error::new(ErrorCode::TypeMismatch, off));
        }
        match ib & 0x1f {
            head::simple::FALSE => Ok(false),
            head::simple::TRUE => Ok(true),
            _ => Err(Error::new(ErrorCode::InvalidBool, off)),
        }
    }
}

macro_rules! impl_decode_unsigned {
    ($($ty:ty),*) => {$(
        impl<'de> Decode<'de> for $ty {
            fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
                let (v, off) = d.read_unsigned()?;
                Self::try_from(v).map_err(|_| Error::new(ErrorCode::IntegerOverflow, off))
            }
        }
    )*};
}

impl_decode_unsigned!(u8, u16, u32, usize);

impl<'de> Decode<'de> for u64 {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        d.read_unsigned().map(|(v, _)| v)
    }
}

macro_rules! impl_decode_signed {
    ($($ty:ty),*) => {$(
        impl<'de> Decode<'de> for $ty {
            fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
                let (v, off) = d.read_signed()?;
                Self::try_from(v).map_err(|_| Error::new(ErrorCode::IntegerOverflow, off))
            }
        }
    )*};
}

impl_decode_signed!(i8, i16, i32, isize);

impl<'de> Decode<'de> for i64 {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        d.read_signed().map(|(v, _)| v)
    }
}

impl<'de> Decode<'de> for half::f16 {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let (bits, _) = d.read_float_bits(head::simple::F16)?;
        Ok(Self::from_bits(bits as u16))
    }
}

impl<'de> Decode<'de> for f32 {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let (bits, _) = d.read_float_bits(head::simple::F32)?;
        Ok(Self::from_bits(bits as u32))
    }
}

impl<'de> Decode<'de> for f64 {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let (bits, _) = d.read_float_bits(head::simple::F64)?;
        Ok(Self::from_bits(bits))
    }
}

impl<'de, T: Decode<'de>> Decode<'de> for Option<T> {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        if d.peek_null()? {
            let _ = d.source.read_byte()?;
            Ok(None)
        } else {
            T::decode(d).map(Some)
        }
    }
}

impl<'de> Decode<'de> for &'de str {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let (frame, off) = d.begin_string(major::TEXT)?;
        let Some(len) = frame else {
            // A chunked string has no contiguous alias to borrow.
            return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
        };
        let accelerate = d.config.use_simd;
        let sp = d.source.read_span(len)?;
        let bytes = sp
            .into_borrowed()
            .ok_or_else(|| Error::new(ErrorCode::UnsupportedValue, off))?;
        utf8::validate(bytes, accelerate).map_err(|()| Error::new(ErrorCode::InvalidUtf8, off))
    }
}

impl<'de> Decode<'de> for &'de [u8] {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let (frame, off) = d.begin_string(major::BYTES)?;
        let Some(len) = frame else {
            return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
        };
        let sp = d.source.read_span(len)?;
        sp.into_borrowed()
            .ok_or_else(|| Error::new(ErrorCode::UnsupportedValue, off))
    }
}

#[cfg(feature = "alloc")]
impl<'de> Decode<'de> for String {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let (v, off) = d.read_string_owned(major::TEXT)?;
        Self::from_utf8(v).map_err(|_| Error::new(ErrorCode::InvalidUtf8, off))
    }
}

#[cfg(feature = "alloc")]
impl<'de> Decode<'de> for Vec<u8> {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        d.read_string_owned(major::BYTES).map(|(v, _)| v)
    }
}

#[cfg(feature = "alloc")]
impl<'de, T: Decode<'de> + crate::SequenceElem> Decode<'de> for Vec<T> {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let off = d.source.position();
        let frame = d.begin_array()?;
        let out = match frame {
            Some(n) => {
                let mut out = try_vec_with_capacity(n, off)?;
                for _ in 0..n {
                    out.push(T::decode(d)?);
                }
                out
            }
            None => {
                let mut out = Vec::new();
                while !d.at_break()? {
                    if out.len() >= d.config.max_collection_size {
                        return Err(Error::new(ErrorCode::InvalidLength, d.position()));
                    }
                    try_reserve(&mut out, 1, d.position())?;
                    out.push(T::decode(d)?);
                }
                out
            }
        };
        d.end_array(frame)?;
        Ok(out)
    }
}

#[cfg(feature = "alloc")]
impl<'de, T: Decode<'de> + crate::SequenceElem, const N: usize> Decode<'de> for [T; N] {
    fn decode<S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<Self, Error> {
        let off = d.source.position();
        let frame = d.begin_array()?;
        if let Some(n) = frame {
            if n != N {
                return Err(Error::new(ErrorCode::InvalidLength, off));
            }
        }
        let mut out = try_vec_with_capacity(N, off)?;
        for _ in 0..N {
            if frame.is_none() && d.at_break()? {
                return Err(Error::new(ErrorCode::InvalidLength, d.position()));
            }
            out.push(T::decode(d)?);
        }
        d.end_array(frame)?;
        out.try_into()
            .map_err(|_| Error::new(ErrorCode::InvalidLength, off))
    }
}

/// Decode one complete item of shape `T` from a byte slice.
///
/// The slice must contain exactly one item; trailing bytes fail with
/// [`ErrorCode::MalformedInput`].
///
/// # Errors
///
/// Returns an error if decoding fails or bytes remain after the item.
pub fn from_slice<'de, T: Decode<'de>>(bytes: &'de [u8], config: &Config) -> Result<T, Error> {
    let mut d = Decoder::new(SliceSource::new(bytes), *config);
    let v = T::decode(&mut d)?;
    if d.position() != bytes.len() {
        return Err(Error::new(ErrorCode::MalformedInput, d.position()));
    }
    Ok(v)
}

/// Decode one complete item of shape `T` from a reader.
///
/// The refill buffer capacity is taken from [`Config::stream_buffer_size`].
/// Bytes after the item are left unread in the reader.
///
/// # Errors
///
/// Returns an error if decoding fails or the reader fails.
#[cfg(feature = "std")]
pub fn from_reader<T, R>(reader: R, config: &Config) -> Result<T, Error>
where
    T: Decode<'static>,
    R: std::io::Read,
{
    let mut d = Decoder::new(
        ReaderSource::new(reader, config.stream_buffer_size),
        *config,
    );
    T::decode(&mut d)
}
