//! Typed payload encoding and decoding.
//!
//! Payloads are tuples of fields appended in order: fixed-size scalars and
//! packed structs as little-endian raw bytes, strings as one length byte
//! followed by Latin-1 data. Decoding walks a cursor strictly left to
//! right; trailing [`Option`] fields read as `None` once the payload runs
//! short, and a shortfall inside one optional suppresses all later ones.

use crate::error::{Result, WireError};

/// Accumulates encoded fields.
#[derive(Debug, Default)]
pub struct Packer {
    out: Vec<u8>,
}

impl Packer {
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(64),
        }
    }

    pub fn put<T: PackField>(&mut self, field: &T) -> &mut Self {
        field.put(self);
        self
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.out.push(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

/// Sequential read cursor over a payload.
#[derive(Debug)]
pub struct Unpacker<'a> {
    buf: &'a [u8],
}

impl<'a> Unpacker<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the next `n` bytes. On shortfall the cursor is drained, so a
    /// failed read propagates absence through any trailing optionals.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            self.buf = &[];
            return Err(WireError::OutOfData);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn get<T: UnpackField>(&mut self) -> Result<T> {
        T::get(self)
    }
}

/// A single encodable payload field.
pub trait PackField {
    fn put(&self, p: &mut Packer);
}

/// A single decodable payload field.
pub trait UnpackField: Sized {
    fn get(u: &mut Unpacker) -> Result<Self>;
}

impl PackField for u8 {
    fn put(&self, p: &mut Packer) {
        p.push_byte(*self);
    }
}

impl UnpackField for u8 {
    fn get(u: &mut Unpacker) -> Result<Self> {
        Ok(u.take(1)?[0])
    }
}

macro_rules! scalar_field {
    ($ty:ty) => {
        impl PackField for $ty {
            fn put(&self, p: &mut Packer) {
                p.push_bytes(&self.to_le_bytes());
            }
        }

        impl UnpackField for $ty {
            fn get(u: &mut Unpacker) -> Result<Self> {
                let bytes = u.take(std::mem::size_of::<$ty>())?;
                Ok(<$ty>::from_le_bytes(bytes.try_into().expect("sized take")))
            }
        }
    };
}

scalar_field!(u16);
scalar_field!(u32);

/// Strings travel as a length byte plus Latin-1 data, at most 255 bytes.
impl PackField for &str {
    fn put(&self, p: &mut Packer) {
        let bytes = latin1_from_str(self);
        if bytes.len() > 255 {
            tracing::warn!(len = bytes.len(), "string clamped to 255 bytes");
        }
        let len = bytes.len().min(255);
        p.push_byte(len as u8);
        p.push_bytes(&bytes[..len]);
    }
}

impl PackField for String {
    fn put(&self, p: &mut Packer) {
        self.as_str().put(p);
    }
}

impl UnpackField for String {
    fn get(u: &mut Unpacker) -> Result<Self> {
        let len = usize::from(u.get::<u8>()?);
        Ok(latin1_to_string(u.take(len)?))
    }
}

/// Trailing optional: absent once the payload has run out, and a failed
/// inner read turns into absence instead of an error.
impl<T: UnpackField> UnpackField for Option<T> {
    fn get(u: &mut Unpacker) -> Result<Self> {
        if u.is_empty() {
            return Ok(None);
        }
        Ok(T::get(u).ok())
    }
}

impl<T: PackField> PackField for Option<T> {
    fn put(&self, p: &mut Packer) {
        if let Some(value) = self {
            value.put(p);
        }
    }
}

/// A full payload: a tuple of fields, encoded in order.
pub trait PackArgs {
    fn put_all(&self, p: &mut Packer);
}

/// A full payload schema: a tuple of fields, decoded left to right.
pub trait UnpackArgs: Sized {
    fn get_all(u: &mut Unpacker) -> Result<Self>;
}

impl PackArgs for () {
    fn put_all(&self, _p: &mut Packer) {}
}

impl UnpackArgs for () {
    fn get_all(_u: &mut Unpacker) -> Result<Self> {
        Ok(())
    }
}

macro_rules! tuple_args {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: PackField),+> PackArgs for ($($name,)+) {
            fn put_all(&self, p: &mut Packer) {
                $(self.$idx.put(p);)+
            }
        }

        impl<$($name: UnpackField),+> UnpackArgs for ($($name,)+) {
            fn get_all(u: &mut Unpacker) -> Result<Self> {
                // One statement per field keeps evaluation strictly
                // left to right.
                $(
                    #[allow(non_snake_case)]
                    let $name = $name::get(u)?;
                )+
                Ok(($($name,)+))
            }
        }
    };
}

tuple_args!(A: 0);
tuple_args!(A: 0, B: 1);
tuple_args!(A: 0, B: 1, C: 2);
tuple_args!(A: 0, B: 1, C: 2, D: 3);
tuple_args!(A: 0, B: 1, C: 2, D: 3, E: 4);
tuple_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
tuple_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
tuple_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

/// Encode a tuple of fields into payload bytes.
pub fn pack<T: PackArgs>(args: T) -> Vec<u8> {
    let mut p = Packer::new();
    args.put_all(&mut p);
    p.into_bytes()
}

/// Decode a payload into a tuple of fields, or the first error.
///
/// Bytes beyond the requested schema are ignored.
pub fn unpack<T: UnpackArgs>(payload: &[u8]) -> Result<T> {
    let mut u = Unpacker::new(payload);
    T::get_all(&mut u)
}

/// Latin-1 bytes to a string, one char per byte.
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// String to Latin-1 bytes; characters outside Latin-1 become `?`.
pub fn latin1_from_str(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_scalars_little_endian() {
        assert_eq!(pack((1u8, 2u16, 3u32)), vec![1, 2, 0, 3, 0, 0, 0]);
    }

    #[test]
    fn pack_nothing() {
        assert_eq!(pack(()), Vec::<u8>::new());
    }

    #[test]
    fn pack_string_with_length_prefix() {
        let mut expected = vec![12];
        expected.extend_from_slice(b"Hallo, Welt!");
        assert_eq!(pack(("Hallo, Welt!",)), expected);
    }

    #[test]
    fn pack_latin1_string() {
        let packed = pack(("Größenwahn",));
        assert_eq!(packed[0], 10);
        assert_eq!(packed.len(), 11);
        assert_eq!(packed[3], 0xf6); // ö as a single Latin-1 byte
    }

    #[test]
    fn unpack_scalars() {
        let t: (u8, u16, u32) = unpack(&[1, 2, 0, 3, 0, 0, 0]).unwrap();
        assert_eq!(t, (1, 2, 3));
    }

    #[test]
    fn unpack_is_inverse_of_pack() {
        let packed = pack((7u8, 0x1234u16, 0xdeadbeefu32, "Straße"));
        let t: (u8, u16, u32, String) = unpack(&packed).unwrap();
        assert_eq!(t, (7, 0x1234, 0xdeadbeef, "Straße".to_string()));
    }

    #[test]
    fn unpack_string() {
        let mut buf = vec![12];
        buf.extend_from_slice(b"Hallo, Welt!");
        let (s,): (String,) = unpack(&buf).unwrap();
        assert_eq!(s, "Hallo, Welt!");

        let packed = pack(("Größenwahn",));
        let (s,): (String,) = unpack(&packed).unwrap();
        assert_eq!(s, "Größenwahn");
    }

    #[test]
    fn unpack_nothing() {
        unpack::<()>(&[1]).unwrap();
    }

    #[test]
    fn unpack_out_of_data() {
        assert_eq!(unpack::<(u8, u8)>(&[1]), Err(WireError::OutOfData));
    }

    #[test]
    fn unpack_optional_scalar() {
        let t: (u8, Option<u8>) = unpack(&[1, 2]).unwrap();
        assert_eq!(t, (1, Some(2)));

        let t: (u8, Option<u8>) = unpack(&[1]).unwrap();
        assert_eq!(t, (1, None));
    }

    #[test]
    fn unpack_optional_string() {
        let t: (u8, Option<String>) = unpack(&[1]).unwrap();
        assert_eq!(t, (1, None));

        let mut buf = vec![1, 12];
        buf.extend_from_slice(b"Hallo, Welt!");
        let t: (u8, Option<String>) = unpack(&buf).unwrap();
        assert_eq!(t, (1, Some("Hallo, Welt!".to_string())));

        // Length byte promises more than the payload holds.
        let mut buf = vec![1, 12];
        buf.extend_from_slice(b"Hallo, Welt");
        let t: (u8, Option<String>) = unpack(&buf).unwrap();
        assert_eq!(t, (1, None));

        let t: (u8, Option<String>) = unpack(&[1, 2, b'O', b'K']).unwrap();
        assert_eq!(t, (1, Some("OK".to_string())));
    }

    #[test]
    fn first_absent_optional_suppresses_the_rest() {
        // Two bytes left but the u16 option needs them both plus the
        // trailing u8: u16 succeeds, u8 is absent.
        let t: (u8, Option<u16>, Option<u8>) = unpack(&[1, 10, 4]).unwrap();
        assert_eq!(t, (1, Some(0x040a), None));

        // One byte left: the u16 fails and drains the cursor, so the
        // trailing optional is absent too, not fed from half-consumed data.
        let t: (u8, Option<u16>, Option<u8>) = unpack(&[1, 10]).unwrap();
        assert_eq!(t, (1, None, None));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let t: (u8,) = unpack(&[1, 99, 98]).unwrap();
        assert_eq!(t, (1,));
    }

    #[test]
    fn latin1_helpers_roundtrip() {
        assert_eq!(latin1_to_string(&[0x47, 0xf6]), "Gö");
        assert_eq!(latin1_from_str("Gö"), vec![0x47, 0xf6]);
        assert_eq!(latin1_from_str("G€"), vec![0x47, b'?']);
    }
}
