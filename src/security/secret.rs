//! Small helpers and aliases for secret buffers that must be zeroized on drop.
use zeroize::Zeroizing;

/// Common alias for secret byte buffers which will be zeroed when dropped.
pub type SecretVec = Zeroizing<Vec<u8>>;

/// Recovery phrases held in memory; wiped on drop.
pub type SecretString = Zeroizing<String>;

/// Convert a Vec<u8> into a `SecretVec` which will be zeroized on drop.
pub fn vec_to_secret(v: Vec<u8>) -> SecretVec {
    Zeroizing::new(v)
}

/// Wrap an owned phrase so it is wiped once the caller is done with it.
pub fn string_to_secret(s: String) -> SecretString {
    Zeroizing::new(s)
}
