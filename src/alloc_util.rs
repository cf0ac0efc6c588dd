use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{Error, ErrorCode};

#[inline]
fn check_reserve_len<T>(len: usize, additional: usize, position: usize) -> Result<(), Error> {
    let needed = len
        .checked_add(additional)
        .ok_or_else(|| Error::new(ErrorCode::InvalidLength, position))?;
    Layout::array::<T>(needed).map_err(|_| Error::new(ErrorCode::InvalidLength, position))?;
    Ok(())
}

#[inline]
pub fn try_reserve_exact<T>(v: &mut Vec<T>, additional: usize, position: usize) -> Result<(), Error> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| Error::new(ErrorCode::InvalidLength, position))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, position)?;
    v.try_reserve_exact(additional)
        .map_err(|_| Error::new(ErrorCode::OutOfMemory, position))
}

#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize, position: usize) -> Result<(), Error> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| Error::new(ErrorCode::InvalidLength, position))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, position)?;
    v.try_reserve(additional)
        .map_err(|_| Error::new(ErrorCode::OutOfMemory, position))
}

#[inline]
pub fn try_vec_with_capacity<T>(cap: usize, position: usize) -> Result<Vec<T>, Error> {
    let mut v: Vec<T> = Vec::new();
    try_reserve_exact(&mut v, cap, position)?;
    Ok(v)
}

#[inline]
pub fn try_vec_zeroed(n: usize, position: usize) -> Result<Vec<u8>, Error> {
    let mut v = Vec::new();
    try_reserve_exact(&mut v, n, position)?;
    v.resize(n, 0);
    Ok(v)
}
