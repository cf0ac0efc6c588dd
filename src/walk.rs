//! Structural traversal.
//!
//! The walker consumes encoded items without interpreting their payloads:
//! [`Decoder::skip_value`] discards exactly one item, and [`extract_field`]
//! locates a single named field inside an encoded map without materializing
//! the other values. Tags (major type 6) are accepted here and only here;
//! the typed codec neither emits nor decodes them.

use crate::decode::{Decode, Decoder};
use crate::head::{major, read_head, Arg};
use crate::source::{SliceSource, Source};
use crate::utf8;
use crate::{Config, Error, ErrorCode};

impl<'de, S: Source<'de>> Decoder<'de, S> {
    /// Consume exactly one encoded item, discarding it.
    ///
    /// Skipping does not interpret payloads: string bytes are discarded
    /// unvalidated and nested containers are traversed structurally. Depth
    /// and collection limits still apply.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed structure, truncated input, a length
    /// over the configured limits, or depth exhaustion.
    pub fn skip_value(&mut self) -> Result<(), Error> {
        skip_item(self)
    }
}

fn skip_item<'de, S: Source<'de>>(d: &mut Decoder<'de, S>) -> Result<(), Error> {
    let off = d.source.position();
    let h = read_head(&mut d.source)?;

    match h.major {
        // Argument bytes were consumed with the head.
        major::UNSIGNED | major::NEGATIVE => Ok(()),

        major::BYTES | major::TEXT => match h.arg {
            Arg::Definite(n) => {
                let len = check_len(n, d.config.max_string_length, off)?;
                d.source.skip_exact(len)
            }
            Arg::Indefinite => {
                require_indefinite(&d.config, off)?;
                d.enter(off)?;
                skip_chunks(d, h.major)?;
                d.exit();
                Ok(())
            }
        },

        major::ARRAY => match h.arg {
            Arg::Definite(n) => {
                let len = check_len(n, d.config.max_collection_size, off)?;
                d.enter(off)?;
                for _ in 0..len {
                    skip_item(d)?;
                }
                d.exit();
                Ok(())
            }
            Arg::Indefinite => {
                require_indefinite(&d.config, off)?;
                d.enter(off)?;
                while !d.at_break()? {
                    skip_item(d)?;
                }
                let _ = d.source.read_byte()?;
                d.exit();
                Ok(())
            }
        },

        major::MAP => match h.arg {
            Arg::Definite(n) => {
                let len = check_len(n, d.config.max_collection_size, off)?;
                d.enter(off)?;
                for _ in 0..len {
                    skip_item(d)?;
                    skip_item(d)?;
                }
                d.exit();
                Ok(())
            }
            Arg::Indefinite => {
                require_indefinite(&d.config, off)?;
                d.enter(off)?;
                while !d.at_break()? {
                    skip_item(d)?;
                    skip_item(d)?;
                }
                let _ = d.source.read_byte()?;
                d.exit();
                Ok(())
            }
        },

        // Tags are skip-only: discard the tag number and skip the follower.
        major::TAG => {
            d.enter(off)?;
            skip_item(d)?;
            d.exit();
            Ok(())
        }

        _ => match h.ai {
            20..=23 => Ok(()),
            // Floats and the one-byte simple form consumed their payload
            // with the head.
            24..=27 => Ok(()),
            _ => Err(Error::new(ErrorCode::InvalidAdditionalInfo, off)),
        },
    }
}

fn skip_chunks<'de, S: Source<'de>>(d: &mut Decoder<'de, S>, chunk_major: u8) -> Result<(), Error> {
    loop {
        if d.at_break()? {
            let _ = d.source.read_byte()?;
            return Ok(());
        }
        let c_off = d.source.position();
        let h = read_head(&mut d.source)?;
        if h.major != chunk_major {
            return Err(Error::new(ErrorCode::MalformedInput, c_off));
        }
        let Arg::Definite(n) = h.arg else {
            return Err(Error::new(ErrorCode::MalformedInput, c_off));
        };
        let len = check_len(n, d.config.max_string_length, c_off)?;
        d.source.skip_exact(len)?;
    }
}

fn check_len(arg: u64, max: usize, off: usize) -> Result<usize, Error> {
    let len = usize::try_from(arg).map_err(|_| Error::new(ErrorCode::InvalidLength, off))?;
    if len > max {
        return Err(Error::new(ErrorCode::InvalidLength, off));
    }
    Ok(len)
}

const fn require_indefinite(config: &Config, off: usize) -> Result<(), Error> {
    if !config.enable_indefinite_length {
        return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
    }
    Ok(())
}

/// Extract one named field from an encoded map without materializing the
/// other values.
///
/// Traverses the map entries in order, skipping non-matching values, and
/// decodes the first value whose key equals `key`. Returns `None` if no entry
/// matches. The input is traversed through a private cursor, so the caller's
/// buffer can be queried repeatedly.
///
/// # Errors
///
/// Returns an error if the item is not a map, a key is not text, or decoding
/// the matching value fails.
pub fn extract_field<'de, T: Decode<'de>>(
    bytes: &'de [u8],
    key: &str,
    config: &Config,
) -> Result<Option<T>, Error> {
    let mut d = Decoder::new(SliceSource::new(bytes), *config);
    let frame = d.begin_map()?;
    match frame {
        Some(n) => {
            for _ in 0..n {
                if let Some(v) = extract_entry(&mut d, key)? {
                    return Ok(Some(v));
                }
            }
        }
        None => {
            while !d.at_break()? {
                if let Some(v) = extract_entry(&mut d, key)? {
                    return Ok(Some(v));
                }
            }
        }
    }
    Ok(None)
}

fn extract_entry<'de, T: Decode<'de>>(
    d: &mut Decoder<'de, SliceSource<'de>>,
    key: &str,
) -> Result<Option<T>, Error> {
    let k = read_key_borrowed(d)?;
    if k == key {
        T::decode(d).map(Some)
    } else {
        d.skip_value()?;
        Ok(None)
    }
}

// Keys can borrow the input here because extraction runs on the buffer
// substrate only; comparison completes before any further read.
fn read_key_borrowed<'de>(d: &mut Decoder<'de, SliceSource<'de>>) -> Result<&'de str, Error> {
    let off = d.source.position();
    let h = read_head(&mut d.source)?;
    if h.major != major::TEXT {
        return Err(Error::new(ErrorCode::TypeMismatch, off));
    }
    let Arg::Definite(n) = h.arg else {
        return Err(Error::new(ErrorCode::InvalidIndefiniteLength, off));
    };
    let len = check_len(n, d.config.max_string_length, off)?;
    let accelerate = d.config.use_simd;
    let sp = d.source.read_span(len)?;
    let bytes = match sp {
        crate::source::Span::Borrowed(b) => b,
        crate::source::Span::Transient(_) => {
            return Err(Error::new(ErrorCode::UnsupportedValue, off))
        }
    };
    utf8::validate(bytes, accelerate).map_err(|()| Error::new(ErrorCode::InvalidUtf8, off))
}
