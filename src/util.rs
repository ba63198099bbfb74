use crc::{Crc, CRC_32_ISO_HDLC};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::StunError;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

// the FINGERPRINT payload carries the checksum xor'ed with this mask so
// it cannot collide with CRC-32 trailers of protocols sharing the socket.
const FINGERPRINT_MASK: u32 = 0x5354_554E;

/// big-endian u16 read.
#[inline(always)]
pub fn as_u16(buf: &[u8]) -> u16 {
    u16::from_be_bytes([buf[0], buf[1]])
}

/// big-endian u32 read.
#[inline(always)]
pub fn as_u32(buf: &[u8]) -> u32 {
    u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}

/// bytes needed to land the next attribute on the 4-byte grid.
///
/// # Test
///
/// ```
/// assert_eq!(ice_stun::util::pad_size(1), 3);
/// assert_eq!(ice_stun::util::pad_size(2), 2);
/// assert_eq!(ice_stun::util::pad_size(8), 0);
/// assert_eq!(ice_stun::util::pad_size(13), 3);
/// ```
#[inline(always)]
pub const fn pad_size(size: usize) -> usize {
    (4 - (size % 4)) % 4
}

/// keyed SHA1 digest of a message prefix, the raw 20 bytes the
/// MESSAGE-INTEGRITY attribute carries.
///
/// # Test
///
/// the first keyed-hash vector of RFC 2202:
///
/// ```
/// let digest = ice_stun::util::hmac_sha1(&[0x0b; 20], b"Hi There").unwrap();
///
/// assert_eq!(
///     digest,
///     [
///         0xb6, 0x17, 0x31, 0x86, 0x55, 0x05, 0x72, 0x64, 0xe2, 0x8b, 0xc0,
///         0xb6, 0xfb, 0x37, 0x8c, 0x8e, 0xf1, 0x46, 0xbe, 0x00,
///     ]
/// );
/// ```
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> Result<[u8; 20], StunError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key).map_err(|_| StunError::SummaryFailed)?;
    mac.update(message);

    let mut digest = [0u8; 20];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// CRC-32 of the message bytes under the FINGERPRINT mask.
///
/// # Test
///
/// the CRC-32 check string hashes to 0xCBF43926, so under the mask:
///
/// ```
/// assert_eq!(ice_stun::util::fingerprint(b"123456789"), 0x98A06C68);
/// ```
pub fn fingerprint(bytes: &[u8]) -> u32 {
    CRC32.checksum(bytes) ^ FINGERPRINT_MASK
}
