//! Primitive wire codec.
//!
//! Everything on the wire is little-endian. Variable-length integers use the
//! 7-bits-per-byte `varuint32` form, and every collection is prefixed by its
//! element count in that form.

use crate::error::CoreError;

/// Append-only output buffer
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Write an unsigned LEB128 value limited to 32 bits
    pub fn write_varuint32(&mut self, v: u32) {
        let mut val = v;
        loop {
            let mut b = (val & 0x7f) as u8;
            val >>= 7;
            if val > 0 {
                b |= 0x80;
            }
            self.buf.push(b);
            if val == 0 {
                break;
            }
        }
    }

    /// Write a collection length as varuint32, rejecting lengths the wire cannot carry
    pub fn try_write_len(&mut self, len: usize) -> Result<(), CoreError> {
        let len = u32::try_from(len).map_err(|_| {
            CoreError::validation(format!("length {len} does not fit in a varuint32"))
        })?;
        self.write_varuint32(len);
        Ok(())
    }

    /// Write the length of an in-memory protocol value.
    ///
    /// Such values stay far below `u32::MAX` elements; input that may not
    /// goes through [`Writer::try_write_len`].
    pub fn write_len(&mut self, len: usize) {
        debug_assert!(u32::try_from(len).is_ok(), "length {len} overflows varuint32");
        self.write_varuint32(u32::try_from(len).unwrap_or(u32::MAX));
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an input slice
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CoreError> {
        if self.remaining() < n {
            return Err(CoreError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CoreError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a varuint32.
    ///
    /// At most five bytes are consumed: once 32 bits of shift have been
    /// accumulated the loop ends even if the continuation bit is still set.
    /// Bits above 32 are discarded and non-minimal encodings are accepted.
    pub fn read_varuint32(&mut self) -> Result<u32, CoreError> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let b = self.read_u8()?;
            value |= u64::from(b & 0x7f) << shift;
            shift += 7;
            if b & 0x80 == 0 || shift >= 32 {
                break;
            }
        }
        Ok(value as u32)
    }

    /// Read a collection length, refusing counts that cannot fit in the input
    pub fn read_len(&mut self) -> Result<usize, CoreError> {
        let len = self.read_varuint32()? as usize;
        if len > self.remaining() {
            return Err(CoreError::UnexpectedEof {
                needed: len,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }
}

/// Types with a fixed binary layout
pub trait Pack {
    fn pack(&self, w: &mut Writer);

    fn to_packed(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.pack(&mut w);
        w.into_bytes()
    }
}

/// Types that can be decoded from their binary layout
pub trait Unpack: Sized {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError>;
}

macro_rules! impl_int {
    ($($t:ty),*) => {
        $(
            impl Pack for $t {
                fn pack(&self, w: &mut Writer) {
                    w.write_bytes(&self.to_le_bytes());
                }
            }

            impl Unpack for $t {
                fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
                    Ok(<$t>::from_le_bytes(r.read_array()?))
                }
            }
        )*
    };
}

impl_int!(i8, u8, i16, u16, i32, u32, i64, u64);

impl Pack for bool {
    fn pack(&self, w: &mut Writer) {
        w.write_u8(u8::from(*self));
    }
}

impl Unpack for bool {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        match r.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CoreError::validation(format!("invalid bool byte {other:#04x}"))),
        }
    }
}

impl Pack for String {
    fn pack(&self, w: &mut Writer) {
        self.as_str().pack(w);
    }
}

impl Pack for str {
    fn pack(&self, w: &mut Writer) {
        w.write_len(self.len());
        w.write_bytes(self.as_bytes());
    }
}

impl Unpack for String {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        let len = r.read_len()?;
        let bytes = r.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| CoreError::validation(format!("invalid utf-8 string: {e}")))
    }
}

impl<T: Pack> Pack for Vec<T> {
    fn pack(&self, w: &mut Writer) {
        self.as_slice().pack(w);
    }
}

impl<T: Pack> Pack for [T] {
    fn pack(&self, w: &mut Writer) {
        w.write_len(self.len());
        for item in self {
            item.pack(w);
        }
    }
}

impl<T: Unpack> Unpack for Vec<T> {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        let len = r.read_varuint32()? as usize;
        // Every element takes at least one byte, so cap the preallocation
        let mut out = Vec::with_capacity(len.min(r.remaining()));
        for _ in 0..len {
            out.push(T::unpack(r)?);
        }
        Ok(out)
    }
}

impl<T: Pack> Pack for Option<T> {
    fn pack(&self, w: &mut Writer) {
        match self {
            Some(v) => {
                w.write_u8(1);
                v.pack(w);
            }
            None => w.write_u8(0),
        }
    }
}

impl<T: Unpack> Unpack for Option<T> {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        if bool::unpack(r)? {
            Ok(Some(T::unpack(r)?))
        } else {
            Ok(None)
        }
    }
}

impl<const N: usize> Pack for [u8; N] {
    fn pack(&self, w: &mut Writer) {
        w.write_bytes(self);
    }
}

impl<const N: usize> Unpack for [u8; N] {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        r.read_array()
    }
}

impl<T: Pack + ?Sized> Pack for &T {
    fn pack(&self, w: &mut Writer) {
        (**self).pack(w);
    }
}

impl<T: Pack + ?Sized> Pack for Box<T> {
    fn pack(&self, w: &mut Writer) {
        (**self).pack(w);
    }
}

impl<T: Unpack> Unpack for Box<T> {
    fn unpack(r: &mut Reader<'_>) -> Result<Self, CoreError> {
        T::unpack(r).map(Box::new)
    }
}

/// Implement `Pack`/`Unpack` for a struct whose wire form is its fields in
/// declaration order.
#[macro_export]
macro_rules! packable_struct {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::codec::Pack for $ty {
            fn pack(&self, w: &mut $crate::codec::Writer) {
                $( $crate::codec::Pack::pack(&self.$field, w); )*
            }
        }

        impl $crate::codec::Unpack for $ty {
            fn unpack(
                r: &mut $crate::codec::Reader<'_>,
            ) -> Result<Self, $crate::error::CoreError> {
                Ok($ty {
                    $( $field: $crate::codec::Unpack::unpack(r)?, )*
                })
            }
        }
    };
}
