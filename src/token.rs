use rand::Rng;

/// A 12-byte transaction ID binding a request to its response.
///
/// IDs for outgoing requests are drawn from the process RNG, which keeps
/// concurrent in-flight requests distinct and unpredictable to peers.
/// Responders echo the ID of the request they answer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TransactionId([u8; 12]);

impl TransactionId {
    /// # Test
    ///
    /// ```
    /// use ice_stun::TransactionId;
    ///
    /// let a = TransactionId::generate();
    /// let b = TransactionId::generate();
    /// assert_ne!(a, b);
    /// ```
    pub fn generate() -> Self {
        let mut id = [0u8; 12];
        rand::rng().fill(&mut id);
        Self(id)
    }

    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

impl From<[u8; 12]> for TransactionId {
    fn from(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for TransactionId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
