//! Operator authentication
//!
//! Credentials come from a small username/password table. Each entry holds
//! either a legacy plaintext password or a salted SHA-256 hash in the form
//! `sha256$<salt>$<hex digest of salt followed by password>`.
//!
//! Plaintext entries are only honoured when the caller allows it, and every
//! plaintext login is logged as a warning.

use crate::types::LedgerError;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

const HASH_SCHEME: &str = "sha256";

/// Stored secret of one operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Secret {
    /// Legacy plaintext password
    Plain(String),
    /// Salted SHA-256 digest (lowercase hex)
    Hashed { salt: String, digest: String },
}

impl Secret {
    /// Parse a `sha256$<salt>$<hex>` string
    pub fn parse_hash(encoded: &str) -> Option<Secret> {
        let mut parts = encoded.trim().splitn(3, '$');
        let scheme = parts.next()?;
        let salt = parts.next()?;
        let digest = parts.next()?;
        if scheme != HASH_SCHEME || salt.is_empty() || digest.is_empty() {
            return None;
        }
        Some(Secret::Hashed {
            salt: salt.to_string(),
            digest: digest.to_lowercase(),
        })
    }

    /// Encoded form as stored in the credentials file
    pub fn encode(&self) -> String {
        match self {
            Secret::Plain(password) => password.clone(),
            Secret::Hashed { salt, digest } => format!("{}${}${}", HASH_SCHEME, salt, digest),
        }
    }

    fn is_plain(&self) -> bool {
        matches!(self, Secret::Plain(_))
    }

    fn matches(&self, password: &str) -> bool {
        match self {
            Secret::Plain(stored) => stored == password,
            Secret::Hashed { salt, digest } => salted_digest(salt, password) == *digest,
        }
    }
}

/// One row of the credential table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub secret: Secret,
}

/// An authenticated operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub username: String,
}

/// The loaded credential table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialStore {
    entries: Vec<Credential>,
}

impl CredentialStore {
    pub fn new(entries: Vec<Credential>) -> Self {
        CredentialStore { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check a username/password pair
    ///
    /// When a username appears more than once the last entry wins, as a
    /// later row overrides an earlier one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown user, a wrong password, or
    /// a plaintext entry while `allow_plaintext` is false.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        allow_plaintext: bool,
    ) -> Result<Operator, LedgerError> {
        let credential = self
            .entries
            .iter()
            .rev()
            .find(|entry| entry.username == username)
            .ok_or(LedgerError::InvalidCredentials)?;

        if credential.secret.is_plain() {
            if !allow_plaintext {
                warn!(username, "plaintext credential refused (auth.allow_plaintext = false)");
                return Err(LedgerError::InvalidCredentials);
            }
            warn!(username, "login against a plaintext password; consider `fee-ledger hash-password`");
        }

        if !credential.secret.matches(password) {
            debug!(username, "password mismatch");
            return Err(LedgerError::InvalidCredentials);
        }

        Ok(Operator {
            username: username.to_string(),
        })
    }
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Secret {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    hash_password_with_salt(password, &salt)
}

/// Hash a password with the given salt
pub fn hash_password_with_salt(password: &str, salt: &str) -> Secret {
    Secret::Hashed {
        salt: salt.to_string(),
        digest: salted_digest(salt, password),
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store() -> CredentialStore {
        CredentialStore::new(vec![
            Credential {
                username: "clerk".to_string(),
                secret: Secret::Plain("letmein".to_string()),
            },
            Credential {
                username: "accounts".to_string(),
                secret: hash_password_with_salt("s3cret", "abc123"),
            },
        ])
    }

    #[rstest]
    #[case::plaintext_ok("clerk", "letmein", true, true)]
    #[case::plaintext_wrong("clerk", "nope", true, false)]
    #[case::plaintext_disabled("clerk", "letmein", false, false)]
    #[case::hashed_ok("accounts", "s3cret", false, true)]
    #[case::hashed_wrong("accounts", "S3cret", true, false)]
    #[case::unknown_user("principal", "letmein", true, false)]
    fn test_authenticate(
        #[case] username: &str,
        #[case] password: &str,
        #[case] allow_plaintext: bool,
        #[case] expected_ok: bool,
    ) {
        let result = store().authenticate(username, password, allow_plaintext);
        match result {
            Ok(operator) => {
                assert!(expected_ok);
                assert_eq!(operator.username, username);
            }
            Err(err) => {
                assert!(!expected_ok);
                assert_eq!(err, LedgerError::InvalidCredentials);
            }
        }
    }

    #[test]
    fn test_hash_encoding_round_trip() {
        let secret = hash_password_with_salt("pw", "salt");
        let encoded = secret.encode();
        assert!(encoded.starts_with("sha256$salt$"));
        assert_eq!(Secret::parse_hash(&encoded), Some(secret));
    }

    #[test]
    fn test_known_digest() {
        // sha256("saltpw")
        let secret = hash_password_with_salt("pw", "salt");
        let expected = format!("{:x}", Sha256::digest(b"saltpw"));
        assert_eq!(
            secret,
            Secret::Hashed {
                salt: "salt".to_string(),
                digest: expected
            }
        );
    }

    #[test]
    fn test_random_salts_differ() {
        assert_ne!(hash_password("pw"), hash_password("pw"));
    }

    #[rstest]
    #[case::wrong_scheme("md5$salt$abcd")]
    #[case::missing_digest("sha256$salt")]
    #[case::empty_salt("sha256$$abcd")]
    #[case::plain_text("hunter2")]
    fn test_parse_hash_rejects(#[case] encoded: &str) {
        assert_eq!(Secret::parse_hash(encoded), None);
    }

    #[test]
    fn test_last_duplicate_username_wins() {
        let store = CredentialStore::new(vec![
            Credential {
                username: "clerk".to_string(),
                secret: Secret::Plain("old".to_string()),
            },
            Credential {
                username: "clerk".to_string(),
                secret: Secret::Plain("new".to_string()),
            },
        ]);
        assert!(store.authenticate("clerk", "new", true).is_ok());
        assert!(store.authenticate("clerk", "old", true).is_err());
    }
}
