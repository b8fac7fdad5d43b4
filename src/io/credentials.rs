//! Credential table reader
//!
//! Reads the `username,password[,password_hash]` CSV into a
//! [`CredentialStore`]. A non-empty `password_hash` takes precedence over
//! the plaintext `password` column of the same row.

use crate::core::auth::{Credential, Secret};
use crate::core::CredentialStore;
use crate::types::LedgerError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

const USERNAME_COLUMN: &str = "username";
const PASSWORD_COLUMN: &str = "password";
const HASH_COLUMN: &str = "password_hash";

/// Load the credential table
///
/// # Errors
///
/// - `FileNotFound` if the file does not exist
/// - `CredentialsUnavailable` if it cannot be read, lacks a `username`
///   column, or lacks both password columns
pub fn load_credentials(path: &Path) -> Result<CredentialStore, LedgerError> {
    let shown = path.display().to_string();

    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LedgerError::FileNotFound {
                path: shown.clone(),
            }
        } else {
            LedgerError::credentials_unavailable(&shown, e)
        }
    })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| LedgerError::credentials_unavailable(&shown, e))?
        .clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
    };

    let username_at = position(USERNAME_COLUMN)
        .ok_or_else(|| LedgerError::credentials_unavailable(&shown, "missing 'username' column"))?;
    let password_at = position(PASSWORD_COLUMN);
    let hash_at = position(HASH_COLUMN);
    if password_at.is_none() && hash_at.is_none() {
        return Err(LedgerError::credentials_unavailable(
            &shown,
            "missing 'password' or 'password_hash' column",
        ));
    }

    let mut entries = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| LedgerError::credentials_unavailable(&shown, e))?;
        let username = row.get(username_at).unwrap_or_default();
        if username.is_empty() {
            continue;
        }

        let hash = hash_at.and_then(|at| row.get(at)).unwrap_or_default();
        let secret = if hash.is_empty() {
            let password = password_at.and_then(|at| row.get(at)).unwrap_or_default();
            Secret::Plain(password.to_string())
        } else {
            match Secret::parse_hash(hash) {
                Some(secret) => secret,
                None => {
                    warn!(username, "unrecognised password_hash; entry skipped");
                    continue;
                }
            }
        };

        entries.push(Credential {
            username: username.to_string(),
            secret,
        });
    }

    debug!(path = %shown, operators = entries.len(), "credentials loaded");
    Ok(CredentialStore::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::hash_password_with_salt;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn credentials_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_plaintext_table() {
        let file = credentials_file("username,password\nclerk,letmein\n");

        let store = load_credentials(file.path()).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.authenticate("clerk", "letmein", true).is_ok());
    }

    #[test]
    fn test_hash_column_takes_precedence() {
        let encoded = hash_password_with_salt("s3cret", "xyz").encode();
        let file = credentials_file(&format!(
            "username,password,password_hash\naccounts,ignored,{}\nclerk,letmein,\n",
            encoded
        ));

        let store = load_credentials(file.path()).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.authenticate("accounts", "s3cret", false).is_ok());
        assert!(store.authenticate("accounts", "ignored", true).is_err());
        assert!(store.authenticate("clerk", "letmein", true).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_credentials(&dir.path().join("credentials.csv")).unwrap_err();
        assert!(matches!(err, LedgerError::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_username_column() {
        let file = credentials_file("user,password\nclerk,letmein\n");
        let err = load_credentials(file.path()).unwrap_err();
        assert!(matches!(err, LedgerError::CredentialsUnavailable { .. }));
    }

    #[test]
    fn test_missing_password_columns() {
        let file = credentials_file("username,role\nclerk,admin\n");
        let err = load_credentials(file.path()).unwrap_err();
        assert!(matches!(err, LedgerError::CredentialsUnavailable { .. }));
    }

    #[test]
    fn test_blank_usernames_and_bad_hashes_are_skipped() {
        let file = credentials_file("username,password_hash\n,sha256$a$b\nclerk,md5$x$y\n");
        let store = load_credentials(file.path()).unwrap();
        assert!(store.is_empty());
    }
}
