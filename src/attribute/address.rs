use bytes::{BufMut, BytesMut};

use std::net::{IpAddr, SocketAddr};

use crate::MAGIC_COOKIE;

pub const FAMILY_IPV4: u8 = 0x01;
pub const FAMILY_IPV6: u8 = 0x02;

/// wire size of a MAPPED-ADDRESS style payload for this family:
/// one zero byte, one family byte, the port, then 4 or 16 address octets.
pub const fn payload_size(addr: &SocketAddr) -> usize {
    match addr {
        SocketAddr::V4(_) => 8,
        SocketAddr::V6(_) => 20,
    }
}

/// encode a socket address as a MAPPED-ADDRESS style payload.
///
/// the XOR attribute variants use the same layout over an address
/// already run through [`xor`]. Some NATs rewrite 32-bit payloads that
/// look like their own public address, which breaks both the embedded
/// address and the message-integrity check, hence the obfuscated
/// variants.
///
/// # Test
///
/// ```
/// use bytes::BytesMut;
/// use ice_stun::attribute::address;
///
/// let source = "198.51.100.7:49152".parse().unwrap();
///
/// let mut buf = BytesMut::with_capacity(1280);
/// address::encode(&source, &mut buf);
/// assert_eq!(&buf[..], &[0x00, 0x01, 0xc0, 0x00, 0xc6, 0x33, 0x64, 0x07]);
/// ```
pub fn encode(addr: &SocketAddr, buf: &mut BytesMut) {
    buf.put_u8(0);
    buf.put_u8(match addr {
        SocketAddr::V4(_) => FAMILY_IPV4,
        SocketAddr::V6(_) => FAMILY_IPV6,
    });

    buf.put_u16(addr.port());
    match addr.ip() {
        IpAddr::V4(ip) => buf.put(&ip.octets()[..]),
        IpAddr::V6(ip) => buf.put(&ip.octets()[..]),
    }
}

/// obfuscate a socket address for the XOR attribute variants.
///
/// the key material is the magic cookie followed by the transaction ID.
/// the port absorbs the top 16 cookie bits; an IPv4 address absorbs the
/// 4 cookie bytes, an IPv6 address all 16 key bytes. applying the
/// transform twice under the same transaction ID gives the original
/// address back.
///
/// # Test
///
/// taking 10.0.0.1:3478 under the transaction ID `ICEICEICEICE`: the
/// port becomes 0x0D96 ^ 0x2112 = 0x2C84 and the first address octet
/// 0x0A ^ 0x21 = 0x2B, so the whole endpoint lands on 43.18.164.67:11396.
///
/// ```
/// use ice_stun::attribute::address;
/// use std::net::SocketAddr;
///
/// let token = *b"ICEICEICEICE";
///
/// let plain: SocketAddr = "10.0.0.1:3478".parse().unwrap();
/// let mixed: SocketAddr = "43.18.164.67:11396".parse().unwrap();
///
/// assert_eq!(address::xor(&plain, &token), mixed);
/// assert_eq!(address::xor(&mixed, &token), plain);
///
/// let plain: SocketAddr = "[::1]:0".parse().unwrap();
/// let mixed: SocketAddr = "[2112:a442:4943:4549:4345:4943:4549:4344]:8466"
///     .parse()
///     .unwrap();
///
/// assert_eq!(address::xor(&plain, &token), mixed);
/// ```
pub fn xor(addr: &SocketAddr, token: &[u8]) -> SocketAddr {
    let mut key = [0u8; 16];
    key[..4].copy_from_slice(&MAGIC_COOKIE.to_be_bytes());
    key[4..].copy_from_slice(token);

    let port = addr.port() ^ (MAGIC_COOKIE >> 16) as u16;
    let ip = match addr.ip() {
        IpAddr::V4(ip) => IpAddr::V4(mix(ip.octets(), &key).into()),
        IpAddr::V6(ip) => IpAddr::V6(mix(ip.octets(), &key).into()),
    };

    SocketAddr::new(ip, port)
}

/// fold the leading key bytes into the address octets.
fn mix<const N: usize>(mut octets: [u8; N], key: &[u8; 16]) -> [u8; N] {
    for (octet, key) in octets.iter_mut().zip(key) {
        *octet ^= *key;
    }

    octets
}
