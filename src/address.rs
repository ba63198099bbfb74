use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// A network endpoint as the ICE layer carries it around.
///
/// Exactly one family is ever active. The IPv4 address is stored in host
/// byte order, the IPv6 address as its 16 network-order octets; the port
/// is host byte order for both. The value is plain data with no heap
/// references, so it can be embedded in candidate records and copied
/// freely.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum Address {
    V4(u32, u16),
    V6([u8; 16], u16),
}

impl Address {
    pub const fn from_ipv4(addr: u32, port: u16) -> Self {
        Self::V4(addr, port)
    }

    pub const fn from_ipv6(octets: [u8; 16], port: u16) -> Self {
        Self::V6(octets, port)
    }

    /// parse a dotted-quad IPv4 address.
    ///
    /// returns `None` for anything that is not a valid dotted quad, in
    /// which case no address value exists at all.
    ///
    /// # Test
    ///
    /// ```
    /// use ice_stun::Address;
    ///
    /// let addr = Address::from_ipv4_str("172.16.254.9", 3478).unwrap();
    /// assert_eq!(addr, Address::from_ipv4(0xAC10FE09, 3478));
    /// assert_eq!(addr.to_string(), "172.16.254.9");
    ///
    /// assert_eq!(Address::from_ipv4_str("172.16.254", 3478), None);
    /// assert_eq!(Address::from_ipv4_str("surface", 3478), None);
    /// ```
    pub fn from_ipv4_str(s: &str, port: u16) -> Option<Self> {
        s.parse::<Ipv4Addr>()
            .ok()
            .map(|ip| Self::V4(u32::from(ip), port))
    }

    pub const fn port(&self) -> u16 {
        match self {
            Self::V4(_, port) | Self::V6(_, port) => *port,
        }
    }

    /// whether the address is in a block that is not routable on the
    /// public internet, per RFC 3330.
    ///
    /// only defined for IPv4; panics for IPv6.
    ///
    /// # Test
    ///
    /// ```
    /// use ice_stun::Address;
    ///
    /// assert!(Address::from_ipv4_str("10.0.0.1", 0).unwrap().is_private());
    /// assert!(Address::from_ipv4_str("172.16.0.1", 0).unwrap().is_private());
    /// assert!(Address::from_ipv4_str("192.168.1.1", 0).unwrap().is_private());
    /// assert!(Address::from_ipv4_str("127.0.0.1", 0).unwrap().is_private());
    ///
    /// assert!(!Address::from_ipv4_str("8.8.8.8", 0).unwrap().is_private());
    /// assert!(!Address::from_ipv4_str("172.32.0.1", 0).unwrap().is_private());
    /// assert!(!Address::from_ipv4_str("192.169.0.1", 0).unwrap().is_private());
    /// ```
    pub fn is_private(&self) -> bool {
        match self {
            // 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16, 127.0.0.0/8
            Self::V4(addr, _) => {
                (addr & 0xFF00_0000) == 0x0A00_0000
                    || (addr & 0xFFF0_0000) == 0xAC10_0000
                    || (addr & 0xFFFF_0000) == 0xC0A8_0000
                    || (addr & 0xFF00_0000) == 0x7F00_0000
            }
            Self::V6(..) => panic!("is_private is only defined for IPv4"),
        }
    }
}

/// # Test
///
/// ```
/// use ice_stun::Address;
/// use std::net::SocketAddr;
///
/// let source: SocketAddr = "203.0.113.54:49152".parse().unwrap();
/// let addr = Address::from(source);
/// assert_eq!(SocketAddr::from(addr), source);
///
/// let source: SocketAddr = "[2001:db8::1]:3478".parse().unwrap();
/// let addr = Address::from(source);
/// assert_eq!(SocketAddr::from(addr), source);
/// ```
impl From<SocketAddr> for Address {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Self::V4(u32::from(*v4.ip()), v4.port()),
            SocketAddr::V6(v6) => Self::V6(v6.ip().octets(), v6.port()),
        }
    }
}

impl From<Address> for SocketAddr {
    fn from(addr: Address) -> Self {
        match addr {
            Address::V4(ip, port) => SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ip)), port),
            Address::V6(octets, port) => SocketAddr::new(IpAddr::V6(Ipv6Addr::from(octets)), port),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(ip, _) => write!(f, "{}", Ipv4Addr::from(*ip)),
            Self::V6(octets, _) => write!(f, "{}", Ipv6Addr::from(*octets)),
        }
    }
}
