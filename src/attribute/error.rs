use num_enum::{IntoPrimitive, TryFromPrimitive};

/// STUN error codes with a canonical reason phrase.
///
/// The ERROR-CODE attribute carries a numeric value in the range 300 to
/// 699 plus a textual reason phrase meant for diagnostics; the class
/// (hundreds digit) is what receivers actually dispatch on. Codes the
/// catalog does not name still encode fine, they just report
/// "Unknown error".
#[repr(u16)]
#[derive(TryFromPrimitive, IntoPrimitive)]
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum ErrKind {
    TryAlternate            = 300,
    BadRequest              = 400,
    Unauthorized            = 401,
    UnknownAttribute        = 420,
    StaleCredentials        = 430,
    IntegrityCheckFailure   = 431,
    MissingUsername         = 432,
    UseTls                  = 433,
    MissingRealm            = 434,
    MissingNonce            = 435,
    UnknownUsername         = 436,
    StaleNonce              = 438,
    RoleConflict            = 487,
    ServerError             = 500,
    GlobalFailure           = 600,
}

impl From<ErrKind> for &'static str {
    #[rustfmt::skip]
    fn from(val: ErrKind) -> Self {
        match val {
            ErrKind::TryAlternate => "Try alternate server",
            ErrKind::BadRequest => "Bad request",
            ErrKind::Unauthorized => "Authorization required",
            ErrKind::UnknownAttribute => "Unknown attribute",
            ErrKind::StaleCredentials => "Authentication expired",
            ErrKind::IntegrityCheckFailure => "Incorrect username/password",
            ErrKind::MissingUsername => "Username required",
            ErrKind::UseTls => "Secure connection required",
            ErrKind::MissingRealm => "Authentication domain required",
            ErrKind::MissingNonce => "Authentication token missing",
            ErrKind::UnknownUsername => "Unknown user name",
            ErrKind::StaleNonce => "Authentication token expired",
            ErrKind::RoleConflict => "Role conflict",
            ErrKind::ServerError => "Temporary server error",
            ErrKind::GlobalFailure => "Unrecoverable failure",
        }
    }
}

/// reason phrase for an error code.
///
/// # Test
///
/// ```
/// use ice_stun::attribute::{reason, ErrKind};
///
/// assert_eq!(reason(ErrKind::Unauthorized.into()), "Authorization required");
/// assert_eq!(reason(487), "Role conflict");
/// assert_eq!(reason(444), "Unknown error");
/// ```
pub fn reason(code: u16) -> &'static str {
    match ErrKind::try_from(code) {
        Ok(kind) => kind.into(),
        Err(_) => "Unknown error",
    }
}
