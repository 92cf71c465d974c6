//! Network-order field readers and writers
//!
//! Every multi-byte integer on the link is big-endian. Commands never index
//! into a payload directly; they go through [`Reader`], which checks the
//! remaining length before each read.

use byteorder::{BigEndian, ByteOrder};
use bytes::BufMut;

use crate::error::{Error, Result};

/// Bounds-checked cursor over an inbound payload
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
    
    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }
    
    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
    
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
    
    /// Take the next `len` bytes
    pub fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::Truncated {
                field,
                needed: len,
                remaining: self.remaining(),
            });
        }
        
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
    
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.read_bytes(field, 1)?[0])
    }
    
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(field, 2)?))
    }
    
    /// Read a u32 as `b0 << 24 | b1 << 16 | b2 << 8 | b3`
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(field, 4)?))
    }
    
    /// Read a field preceded by a one-byte length
    pub fn read_u8_prefixed(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_u8(field)?;
        self.read_bytes(field, usize::from(len))
    }
    
    /// Read a field preceded by a two-byte length
    pub fn read_u16_prefixed(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_u16(field)?;
        self.read_bytes(field, usize::from(len))
    }
    
    /// Read a field preceded by a four-byte length
    pub fn read_u32_prefixed(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_u32(field)?;
        let len = usize::try_from(len).map_err(|_| Error::Truncated {
            field,
            needed: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.read_bytes(field, len)
    }
}

/// Write `data` behind a one-byte length
pub fn put_u8_prefixed(buf: &mut impl BufMut, data: &[u8]) -> Result<()> {
    let len = u8::try_from(data.len()).map_err(|_| Error::PayloadTooLarge {
        size: data.len(),
        max: u8::MAX as usize,
    })?;
    buf.put_u8(len);
    buf.put_slice(data);
    Ok(())
}

/// Write `data` behind a two-byte length
pub fn put_u16_prefixed(buf: &mut impl BufMut, data: &[u8]) -> Result<()> {
    let len = u16::try_from(data.len()).map_err(|_| Error::PayloadTooLarge {
        size: data.len(),
        max: u16::MAX as usize,
    })?;
    buf.put_u16(len);
    buf.put_slice(data);
    Ok(())
}

/// Write `data` behind a four-byte length
pub fn put_u32_prefixed(buf: &mut impl BufMut, data: &[u8]) -> Result<()> {
    let len = u32::try_from(data.len()).map_err(|_| Error::PayloadTooLarge {
        size: data.len(),
        max: u32::MAX as usize,
    })?;
    buf.put_u32(len);
    buf.put_slice(data);
    Ok(())
}

/// Write one of the `mx`/`zx` segments of a challenge response
///
/// The terminal firmware reads these prefixes in network order, the same as
/// every other u16 on the link. This is the only writer for them; change the
/// byte order here if a firmware revision disagrees.
pub fn put_challenge_segment(buf: &mut impl BufMut, data: &[u8]) -> Result<()> {
    put_u16_prefixed(buf, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use pretty_assertions::assert_eq;
    
    #[test]
    fn test_read_integers_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut reader = Reader::new(&data);
        
        assert_eq!(reader.read_u8("a").unwrap(), 0x01);
        assert_eq!(reader.read_u16("b").unwrap(), 0x0203);
        assert_eq!(reader.read_u32("c").unwrap(), 0x04050607);
        assert!(reader.is_empty());
    }
    
    #[test]
    fn test_read_u32_high_bit() {
        // High byte with the top bit set must not sign-extend
        let data = [0xFF, 0x00, 0x00, 0x01];
        assert_eq!(Reader::new(&data).read_u32("len").unwrap(), 0xFF000001);
    }
    
    #[test]
    fn test_read_past_end() {
        let data = [0x00, 0x05, 0xAA];
        let mut reader = Reader::new(&data);
        
        let result = reader.read_u16_prefixed("data");
        assert!(matches!(
            result,
            Err(Error::Truncated { field: "data", needed: 5, remaining: 1 })
        ));
    }
    
    #[test]
    fn test_prefixed_writers() {
        let mut buf = BytesMut::new();
        put_u8_prefixed(&mut buf, b"ab").unwrap();
        put_u16_prefixed(&mut buf, b"c").unwrap();
        put_u32_prefixed(&mut buf, b"").unwrap();
        
        assert_eq!(
            &buf[..],
            &[0x02, b'a', b'b', 0x00, 0x01, b'c', 0x00, 0x00, 0x00, 0x00][..]
        );
    }
    
    #[test]
    fn test_u8_prefix_overflow() {
        let mut buf = BytesMut::new();
        let result = put_u8_prefixed(&mut buf, &[0u8; 256]);
        
        assert!(matches!(result, Err(Error::PayloadTooLarge { size: 256, max: 255 })));
        assert!(buf.is_empty());
    }
    
    #[test]
    fn test_challenge_segment_is_network_order() {
        let mut buf = BytesMut::new();
        put_challenge_segment(&mut buf, &[0xEE; 0x0102]).unwrap();
        
        assert_eq!(&buf[..2], &[0x01, 0x02]);
        assert_eq!(buf.len(), 2 + 0x0102);
    }
}
