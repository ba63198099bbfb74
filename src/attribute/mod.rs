pub mod address;
mod error;

use num_enum::{IntoPrimitive, TryFromPrimitive};

pub use error::{reason, ErrKind};

/// attribute type.
///
/// The codes this crate knows by name: the attributes the builder writes
/// itself plus the ICE connectivity-check attributes callers append. The
/// appenders accept any raw `u16` as well, so extension attributes pass
/// through untouched.
#[repr(u16)]
#[derive(TryFromPrimitive, IntoPrimitive)]
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum AttrKind {
    MappedAddress       = 0x0001,
    UserName            = 0x0006,
    MessageIntegrity    = 0x0008,
    ErrorCode           = 0x0009,
    UnknownAttributes   = 0x000A,
    Realm               = 0x0014,
    Nonce               = 0x0015,
    XorMappedAddress    = 0x0020,
    Priority            = 0x0024,
    UseCandidate        = 0x0025,
    Software            = 0x8022,
    AlternateServer     = 0x8023,
    Fingerprint         = 0x8028,
    IceControlled       = 0x8029,
    IceControlling      = 0x802A,
}

/// attribute codes below 0x8000 must be understood by the receiver;
/// anything above is optional and may be silently skipped.
pub const fn comprehension_required(kind: u16) -> bool {
    kind < 0x8000
}
