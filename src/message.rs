use bytes::{BufMut, BytesMut};

use std::net::SocketAddr;

use crate::attribute::{self, address, AttrKind, ErrKind};
use crate::method::{message_type, split_type, Class, Method};
use crate::token::TransactionId;
use crate::util;
use crate::{StunError, COOKIE, HEADER_SIZE, MAX_MESSAGE_SIZE};

const PADDING: [u8; 4] = [0x20; 4];

/// Builds one STUN message into a caller-owned buffer.
///
/// The writer owns the buffer exclusively while the message is under
/// construction. Appends keep the header length field correct and every
/// attribute on the 4-byte grid; the finish family seals the message
/// with MESSAGE-INTEGRITY and FINGERPRINT. `limit` is the declared
/// maximum total size of the message; once appends have succeeded,
/// finishing cannot run out of room, because every append reserves
/// 24 bytes of headroom on top of its own payload.
pub struct MessageWriter<'a> {
    buf: &'a mut BytesMut,
    limit: usize,
    token: TransactionId,
}

impl<'a> MessageWriter<'a> {
    /// initialize a message buffer with no attributes.
    ///
    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use ice_stun::*;
    ///
    /// let token = TransactionId::from(*b"winter-apple");
    ///
    /// let mut buf = BytesMut::with_capacity(1280);
    /// MessageWriter::new(Class::Request, BINDING, &token, &mut buf, 1280);
    ///
    /// assert_eq!(
    ///     &buf[..],
    ///     &[
    ///         0x00, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42, 0x77, 0x69, 0x6e,
    ///         0x74, 0x65, 0x72, 0x2d, 0x61, 0x70, 0x70, 0x6c, 0x65,
    ///     ]
    /// );
    /// ```
    pub fn new(
        class: Class,
        method: Method,
        token: &TransactionId,
        buf: &'a mut BytesMut,
        limit: usize,
    ) -> Self {
        buf.clear();
        buf.put(&message_type(class, method)[..]);
        buf.put_u16(0);
        buf.put(&COOKIE[..]);
        buf.put(token.as_ref());

        Self {
            buf,
            limit: limit.min(MAX_MESSAGE_SIZE),
            token: *token,
        }
    }

    /// initialize a request with a freshly generated transaction ID.
    pub fn request(method: Method, buf: &'a mut BytesMut, limit: usize) -> Self {
        let token = TransactionId::generate();
        Self::new(Class::Request, method, &token, buf, limit)
    }

    /// initialize a response to a request.
    ///
    /// method and transaction ID are copied from the request, which must
    /// actually be one.
    ///
    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use ice_stun::*;
    ///
    /// let buffer = [
    ///     0x00u8, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42, 0x77, 0x69, 0x6e,
    ///     0x74, 0x65, 0x72, 0x2d, 0x61, 0x70, 0x70, 0x6c, 0x65,
    /// ];
    ///
    /// let request = MessageReader::decode(&buffer).unwrap();
    /// let mut buf = BytesMut::with_capacity(1280);
    /// MessageWriter::response(&request, &mut buf, 1280);
    ///
    /// assert_eq!(buf[0], 0x01);
    /// assert_eq!(buf[1], 0x01);
    /// assert_eq!(&buf[2..4], &[0x00, 0x00]);
    /// assert_eq!(&buf[8..20], &buffer[8..20]);
    /// ```
    pub fn response(request: &MessageReader, buf: &'a mut BytesMut, limit: usize) -> Self {
        assert_eq!(request.class(), Class::Request);
        Self::new(Class::Response, request.method(), &request.token(), buf, limit)
    }

    /// initialize an error response carrying an ERROR-CODE attribute.
    ///
    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use ice_stun::attribute::ErrKind;
    /// use ice_stun::*;
    ///
    /// let buffer = [
    ///     0x00u8, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42, 0x77, 0x69, 0x6e,
    ///     0x74, 0x65, 0x72, 0x2d, 0x61, 0x70, 0x70, 0x6c, 0x65,
    /// ];
    ///
    /// let request = MessageReader::decode(&buffer).unwrap();
    /// let mut buf = BytesMut::with_capacity(1280);
    /// MessageWriter::error(&request, ErrKind::Unauthorized, &mut buf, 1280).unwrap();
    ///
    /// assert_eq!(&buf[..2], &[0x01, 0x11]);
    /// assert_eq!(&buf[20..24], &[0x00, 0x09, 0x00, 0x1a]);
    /// assert_eq!(&buf[24..28], &[0x00, 0x00, 0x04, 0x01]);
    /// assert_eq!(&buf[28..50], b"Authorization required");
    /// ```
    pub fn error(
        request: &MessageReader,
        code: impl Into<u16>,
        buf: &'a mut BytesMut,
        limit: usize,
    ) -> Result<Self, StunError> {
        let mut writer = Self::new(Class::Error, request.method(), &request.token(), buf, limit);
        writer.append_error(code)?;
        Ok(writer)
    }

    /// initialize a 420 error response listing the comprehension-required
    /// attributes of the request this crate does not know.
    ///
    /// the request must contain at least one such attribute.
    pub fn error_unknown(
        request: &MessageReader,
        buf: &'a mut BytesMut,
        limit: usize,
    ) -> Result<Self, StunError> {
        let unknown = request.unknown_attributes();
        assert!(!unknown.is_empty());

        let mut writer = Self::error(request, ErrKind::UnknownAttribute, buf, limit)?;
        writer.append_unknown(&unknown)?;
        Ok(writer)
    }

    /// append an attribute from memory.
    ///
    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use ice_stun::attribute::AttrKind;
    /// use ice_stun::*;
    ///
    /// let token = TransactionId::from(*b"winter-apple");
    ///
    /// let mut buf = BytesMut::with_capacity(1280);
    /// let mut writer = MessageWriter::new(Class::Request, BINDING, &token, &mut buf, 1280);
    /// writer.append_bytes(AttrKind::UserName, b"miaow").unwrap();
    ///
    /// assert_eq!(&buf[2..4], &[0x00, 0x0c]);
    /// assert_eq!(
    ///     &buf[20..],
    ///     &[0x00, 0x06, 0x00, 0x05, 0x6d, 0x69, 0x61, 0x6f, 0x77, 0x20, 0x20, 0x20]
    /// );
    /// ```
    pub fn append_bytes(&mut self, kind: impl Into<u16>, value: &[u8]) -> Result<(), StunError> {
        self.reserve(kind.into(), value.len())?;
        self.buf.put(value);
        self.commit(value.len());
        Ok(())
    }

    /// append an empty ("flag") attribute.
    pub fn append_flag(&mut self, kind: impl Into<u16>) -> Result<(), StunError> {
        self.append_bytes(kind, &[])
    }

    /// append an attribute carrying one 32-bit value.
    ///
    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use ice_stun::attribute::AttrKind;
    /// use ice_stun::*;
    ///
    /// let token = TransactionId::from(*b"winter-apple");
    ///
    /// let mut buf = BytesMut::with_capacity(1280);
    /// let mut writer = MessageWriter::new(Class::Request, BINDING, &token, &mut buf, 1280);
    /// writer.append_u32(AttrKind::Priority, 0xDEADBEEF).unwrap();
    ///
    /// assert_eq!(&buf[2..4], &[0x00, 0x08]);
    /// assert_eq!(&buf[20..], &[0x00, 0x24, 0x00, 0x04, 0xde, 0xad, 0xbe, 0xef]);
    /// ```
    pub fn append_u32(&mut self, kind: impl Into<u16>, value: u32) -> Result<(), StunError> {
        self.append_bytes(kind, &value.to_be_bytes())
    }

    /// append an attribute carrying one 64-bit value, as two big-endian
    /// 32-bit halves.
    pub fn append_u64(&mut self, kind: impl Into<u16>, value: u64) -> Result<(), StunError> {
        self.append_bytes(kind, &value.to_be_bytes())
    }

    /// append a text attribute; no trailing NUL is written.
    pub fn append_string(&mut self, kind: impl Into<u16>, value: &str) -> Result<(), StunError> {
        self.append_bytes(kind, value.as_bytes())
    }

    /// append a network address attribute.
    pub fn append_addr(&mut self, kind: impl Into<u16>, addr: &SocketAddr) -> Result<(), StunError> {
        let size = address::payload_size(addr);
        self.reserve(kind.into(), size)?;
        address::encode(addr, self.buf);
        self.commit(size);
        Ok(())
    }

    /// append a network address attribute, obfuscated with the magic
    /// cookie and this message's transaction ID.
    ///
    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use ice_stun::attribute::AttrKind;
    /// use ice_stun::*;
    ///
    /// let token = TransactionId::from(*b"ICEICEICEICE");
    ///
    /// let addr = "10.0.0.1:3478".parse().unwrap();
    ///
    /// let mut buf = BytesMut::with_capacity(1280);
    /// let mut writer = MessageWriter::new(Class::Response, BINDING, &token, &mut buf, 1280);
    /// writer.append_xor_addr(AttrKind::XorMappedAddress, &addr).unwrap();
    ///
    /// assert_eq!(
    ///     &buf[20..],
    ///     &[0x00, 0x20, 0x00, 0x08, 0x00, 0x01, 0x2c, 0x84, 0x2b, 0x12, 0xa4, 0x43]
    /// );
    /// ```
    pub fn append_xor_addr(
        &mut self,
        kind: impl Into<u16>,
        addr: &SocketAddr,
    ) -> Result<(), StunError> {
        let mixed = address::xor(addr, self.token.as_ref());
        self.append_addr(kind, &mixed)
    }

    /// append an ERROR-CODE attribute with the catalog reason phrase.
    ///
    /// the code must lie in 300..=699.
    pub fn append_error(&mut self, code: impl Into<u16>) -> Result<(), StunError> {
        let code = code.into();
        if !(300..=699).contains(&code) {
            return Err(StunError::InvalidArgument);
        }

        let phrase = attribute::reason(code);
        let size = 4 + phrase.len();
        self.reserve(AttrKind::ErrorCode.into(), size)?;
        self.buf.put_u16(0);
        self.buf.put_u8((code / 100) as u8);
        self.buf.put_u8((code % 100) as u8);
        self.buf.put(phrase.as_bytes());
        self.commit(size);
        Ok(())
    }

    /// append an UNKNOWN-ATTRIBUTES list, each id big-endian back to back.
    pub fn append_unknown(&mut self, kinds: &[u16]) -> Result<(), StunError> {
        let size = kinds.len() * 2;
        self.reserve(AttrKind::UnknownAttributes.into(), size)?;
        for kind in kinds {
            self.buf.put_u16(*kind);
        }

        self.commit(size);
        Ok(())
    }

    /// seal the message, without credentials: only FINGERPRINT is
    /// appended. returns the total message size.
    ///
    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use ice_stun::*;
    ///
    /// let token = TransactionId::from(*b"winter-apple");
    ///
    /// let mut buf = BytesMut::with_capacity(1280);
    /// let size = MessageWriter::new(Class::Request, BINDING, &token, &mut buf, 1280)
    ///     .finish()
    ///     .unwrap();
    ///
    /// assert_eq!(size, 28);
    /// assert_eq!(&buf[2..4], &[0x00, 0x08]);
    /// assert_eq!(&buf[20..24], &[0x80, 0x28, 0x00, 0x04]);
    /// assert_eq!(&buf[24..], &util::fingerprint(&buf[..24]).to_be_bytes());
    /// ```
    pub fn finish(self) -> Result<usize, StunError> {
        self.finish_short(None, None, None)
    }

    /// seal the message with short-term credentials: the password bytes
    /// are the integrity key.
    pub fn finish_short(
        self,
        username: Option<&str>,
        password: Option<&str>,
        nonce: Option<&[u8]>,
    ) -> Result<usize, StunError> {
        self.finish_long(None, username, password.map(str::as_bytes), nonce)
    }

    /// seal the message with long-term credentials.
    ///
    /// appends, in this order: REALM, USERNAME, NONCE, a 20-byte
    /// MESSAGE-INTEGRITY slot (only with a key), and a 4-byte
    /// FINGERPRINT slot; then fills the integrity digest and the
    /// checksum. attributes the caller wants under the signature must
    /// already be in the buffer. on `NoBufferSpace` the partial message
    /// stays in the buffer and no size is reported.
    pub fn finish_long(
        mut self,
        realm: Option<&str>,
        username: Option<&str>,
        key: Option<&[u8]>,
        nonce: Option<&[u8]>,
    ) -> Result<usize, StunError> {
        if let Some(realm) = realm {
            self.append_string(AttrKind::Realm, realm)?;
        }

        if let Some(username) = username {
            self.append_string(AttrKind::UserName, username)?;
        }

        if let Some(nonce) = nonce {
            self.append_bytes(AttrKind::Nonce, nonce)?;
        }

        // reserve the integrity slot first so its length is already part
        // of the header when the digest runs.
        let digest_at = match key {
            Some(_) => {
                self.append_bytes(AttrKind::MessageIntegrity, &[0u8; 20])?;
                Some(self.buf.len() - 20)
            }
            None => None,
        };

        self.append_bytes(AttrKind::Fingerprint, &[0u8; 4])?;

        if let (Some(key), Some(at)) = (key, digest_at) {
            let digest = self.integrity(key)?;
            self.buf[at..at + 20].copy_from_slice(&digest);
        }

        let crc_at = self.buf.len() - 4;
        let crc = util::fingerprint(&self.buf[..crc_at]);
        self.buf[crc_at..].copy_from_slice(&crc.to_be_bytes());

        Ok(self.buf.len())
    }

    /// HMAC-SHA1 over the message prefix the integrity covers.
    ///
    /// the header length field already counts the MESSAGE-INTEGRITY
    /// attribute (24 bytes) and the FINGERPRINT attribute (8 bytes), so
    /// the input ends exactly where MESSAGE-INTEGRITY begins.
    fn integrity(&self, key: &[u8]) -> Result<[u8; 20], StunError> {
        let len = self.buf.len() - HEADER_SIZE;
        assert!(len >= 32);

        util::hmac_sha1(key, &self.buf[..HEADER_SIZE + len - 32])
    }

    /// reserve room for one attribute: write its TLV header after
    /// checking the declared maximum.
    fn reserve(&mut self, kind: u16, size: usize) -> Result<(), StunError> {
        let len = self.buf.len() - HEADER_SIZE;
        debug_assert_eq!(util::pad_size(len), 0);

        // the 24 bytes on top of the payload keep room for a worst-case
        // MESSAGE-INTEGRITY, so the finish step can always complete.
        if len + 24 + size > self.limit {
            return Err(StunError::NoBufferSpace);
        }

        debug_assert!(size < 0xFFFF);

        self.buf.put_u16(kind);
        self.buf.put_u16(size as u16);
        Ok(())
    }

    /// pad the payload onto the 4-byte grid and refresh the header
    /// length field.
    fn commit(&mut self, size: usize) {
        let pad = util::pad_size(size);
        if pad > 0 {
            self.buf.put(&PADDING[..pad]);
        }

        let len = self.buf.len() - HEADER_SIZE;
        self.buf[2..4].copy_from_slice(&(len as u16).to_be_bytes());
    }
}

/// The raw view of a received message a responder needs: header fields
/// and the attribute TLVs, nothing decoded beyond that.
#[derive(Debug)]
pub struct MessageReader<'a> {
    buf: &'a [u8],
    class: Class,
    method: Method,
    token: TransactionId,
}

impl<'a> MessageReader<'a> {
    /// check the header and take a view over the message bytes.
    ///
    /// # Test
    ///
    /// ```
    /// use ice_stun::*;
    ///
    /// let buffer = [
    ///     0x00u8, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42, 0x77, 0x69, 0x6e,
    ///     0x74, 0x65, 0x72, 0x2d, 0x61, 0x70, 0x70, 0x6c, 0x65,
    /// ];
    ///
    /// let message = MessageReader::decode(&buffer).unwrap();
    /// assert_eq!(message.class(), Class::Request);
    /// assert_eq!(message.method(), BINDING);
    /// assert_eq!(message.token().as_bytes(), b"winter-apple");
    /// assert_eq!(message.size(), 20);
    /// ```
    pub fn decode(buf: &'a [u8]) -> Result<Self, StunError> {
        if buf.len() < HEADER_SIZE || buf[0] >> 6 != 0 {
            return Err(StunError::InvalidInput);
        }

        if buf[4..8] != COOKIE {
            return Err(StunError::NotFoundMagicNumber);
        }

        let size = util::as_u16(&buf[2..4]) as usize + HEADER_SIZE;
        if buf.len() < size {
            return Err(StunError::InvalidInput);
        }

        let (class, method) = split_type([buf[0], buf[1]]);
        let mut token = [0u8; 12];
        token.copy_from_slice(&buf[8..20]);

        Ok(Self {
            buf: &buf[..size],
            class,
            method,
            token: TransactionId::from(token),
        })
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn token(&self) -> TransactionId {
        self.token
    }

    /// total message size, header included.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// walk the attribute TLVs in message order.
    ///
    /// a truncated tail ends the walk instead of failing it, the same
    /// way a receiver skips what it cannot frame.
    pub fn attributes(&self) -> Attributes<'a> {
        Attributes {
            buf: self.buf,
            offset: HEADER_SIZE,
        }
    }

    /// comprehension-required attribute codes this crate has no name
    /// for, in message order.
    ///
    /// # Test
    ///
    /// ```
    /// use ice_stun::*;
    ///
    /// let buffer = [
    ///     0x00u8, 0x01, 0x00, 0x04, 0x21, 0x12, 0xa4, 0x42, 0x77, 0x69, 0x6e,
    ///     0x74, 0x65, 0x72, 0x2d, 0x61, 0x70, 0x70, 0x6c, 0x65, 0x77, 0x77,
    ///     0x00, 0x00,
    /// ];
    ///
    /// let message = MessageReader::decode(&buffer).unwrap();
    /// assert_eq!(message.unknown_attributes(), vec![0x7777]);
    /// ```
    pub fn unknown_attributes(&self) -> Vec<u16> {
        self.attributes()
            .map(|(kind, _)| kind)
            .filter(|kind| {
                attribute::comprehension_required(*kind) && AttrKind::try_from(*kind).is_err()
            })
            .collect()
    }
}

impl<'a> AsRef<[u8]> for MessageReader<'a> {
    fn as_ref(&self) -> &'a [u8] {
        self.buf
    }
}

/// Iterator over raw attribute TLVs.
pub struct Attributes<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Attributes<'a> {
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.len().saturating_sub(self.offset) < 4 {
            return None;
        }

        let kind = util::as_u16(&self.buf[self.offset..]);
        let size = util::as_u16(&self.buf[self.offset + 2..]) as usize;
        self.offset += 4;

        if self.buf.len() - self.offset < size {
            return None;
        }

        let value = &self.buf[self.offset..self.offset + size];
        self.offset += size + util::pad_size(size);
        Some((kind, value))
    }
}
