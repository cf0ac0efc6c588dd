//! Initial-byte/argument protocol.
//!
//! One head is an initial byte packing a 3-bit major type and a 5-bit
//! additional info, followed by 0/1/2/4/8 big-endian argument bytes. The
//! encoder always selects the smallest class that fits the argument; the
//! decoder accepts any class and rejects the reserved additional-info range.

use crate::sink::Sink;
use crate::source::Source;
use crate::{Error, ErrorCode};

/// Major type constants (the high 3 bits of an initial byte).
pub(crate) mod major {
    pub const UNSIGNED: u8 = 0;
    pub const NEGATIVE: u8 = 1;
    pub const BYTES: u8 = 2;
    pub const TEXT: u8 = 3;
    pub const ARRAY: u8 = 4;
    pub const MAP: u8 = 5;
    pub const TAG: u8 = 6;
    pub const SIMPLE: u8 = 7;
}

/// Additional-info constants for major type 7.
pub(crate) mod simple {
    pub const FALSE: u8 = 20;
    pub const TRUE: u8 = 21;
    pub const F16: u8 = 25;
    pub const F32: u8 = 26;
    pub const F64: u8 = 27;
}

/// The indefinite-length / break additional info.
pub(crate) const AI_INDEFINITE: u8 = 31;

/// The break marker terminating an indefinite-length item.
pub(crate) const BREAK: u8 = 0xff;

/// The encoded null item (major 7, additional info 22).
pub(crate) const NULL_BYTE: u8 = 0xf6;

/// A decoded head argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arg {
    /// Definite argument value (a numeric value, length, or count).
    Definite(u64),
    /// Indefinite-length marker; valid for major types 2..=5 only.
    Indefinite,
}

/// A decoded head: major type, raw additional info, and argument.
///
/// The raw additional info is retained because major type 7 interprets it as
/// a value selector (booleans, null, float widths) rather than a length class.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Head {
    pub major: u8,
    pub ai: u8,
    pub arg: Arg,
}

/// Write a head with the smallest argument class that fits `value`.
pub(crate) fn write_head<S: Sink>(sink: &mut S, major: u8, value: u64) -> Result<(), Error> {
    debug_assert!(major <= 7);
    if value < 24 {
        return sink.write_byte((major << 5) | value as u8);
    }
    if value <= 0xff {
        return sink.write_span(&[(major << 5) | 24, value as u8]);
    }
    if value <= 0xffff {
        sink.write_byte((major << 5) | 25)?;
        return sink.write_span(&(value as u16).to_be_bytes());
    }
    if value <= 0xffff_ffff {
        sink.write_byte((major << 5) | 26)?;
        return sink.write_span(&(value as u32).to_be_bytes());
    }
    sink.write_byte((major << 5) | 27)?;
    sink.write_span(&value.to_be_bytes())
}

/// Write an indefinite-length head for `major`.
pub(crate) fn write_indefinite<S: Sink>(sink: &mut S, major: u8) -> Result<(), Error> {
    debug_assert!(matches!(major, 2..=5));
    sink.write_byte((major << 5) | AI_INDEFINITE)
}

/// Write the break marker.
pub(crate) fn write_break<S: Sink>(sink: &mut S) -> Result<(), Error> {
    sink.write_byte(BREAK)
}

/// Read one head: the initial byte plus its argument bytes.
///
/// A break marker (major 7, additional info 31) is rejected here with
/// [`ErrorCode::InvalidBreakCode`]; callers expecting a break must peek for
/// it before reading a head.
pub(crate) fn read_head<'de, S: Source<'de>>(src: &mut S) -> Result<Head, Error> {
    let off = src.position();
    let ib = src.read_byte()?;
    let major = ib >> 5;
    let ai = ib & 0x1f;

    let arg = match ai {
        0..=23 => Arg::Definite(u64::from(ai)),
        24 => Arg::Definite(u64::from(src.read_byte()?)),
        25 => Arg::Definite(u64::from(src.read_be_u16()?)),
        26 => Arg::Definite(u64::from(src.read_be_u32()?)),
        27 => Arg::Definite(src.read_be_u64()?),
        28..=30 => return Err(Error::new(ErrorCode::InvalidAdditionalInfo, off)),
        _ => match major {
            major::BYTES | major::TEXT | major::ARRAY | major::MAP => Arg::Indefinite,
            major::SIMPLE => return Err(Error::new(ErrorCode::InvalidBreakCode, off)),
            _ => return Err(Error::new(ErrorCode::InvalidAdditionalInfo, off)),
        },
    };

    Ok(Head { major, ai, arg })
}
