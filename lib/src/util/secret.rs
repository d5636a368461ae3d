use std::fmt;

use redact::Secret;
use serde::Deserialize;
use serde::Deserializer;
use zeroize::Zeroizing;

/// String that is redacted when printed and zeroed when it goes out of scope.
pub struct SecureString(Zeroizing<Secret<String>>);

impl SecureString {
    /// Borrows the plaintext. Keep the borrow as short as possible.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret().as_str()
    }
}

impl<S> From<S> for SecureString
where
    S: AsRef<str>,
{
    fn from(value: S) -> Self {
        SecureString(Zeroizing::new(Secret::new(value.as_ref().into())))
    }
}

impl Clone for SecureString {
    fn clone(&self) -> Self {
        Self::from(self.expose())
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let plain = Zeroizing::new(String::deserialize(deserializer)?);
        Ok(Self::from(plain.as_str()))
    }
}
