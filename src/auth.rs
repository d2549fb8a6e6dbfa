//! Allowed-users list and the authorization check.
//!
//! The allowlist file holds one login per non-empty, non-comment line.
//! Membership is a case-sensitive exact match; the asserted login is not
//! authenticated in any way.

use std::path::{Path, PathBuf};
use tracing::warn;

/// Upper bound on loaded logins; lines past the cap are ignored.
pub const MAX_USERS: usize = 100;

/// Immutable set of permitted logins, in file order.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    users: Vec<String>,
}

impl Allowlist {
    /// Load the allowlist from a file.
    pub fn load(path: &Path) -> Result<Self, AllowlistError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AllowlistError::FileRead(path.to_path_buf(), e))?;
        Ok(Self::parse(&contents))
    }

    /// Parse allowlist contents: one login per line, `#` comments and
    /// blank lines skipped, duplicates dropped, capped at [`MAX_USERS`].
    pub fn parse(contents: &str) -> Self {
        let mut users: Vec<String> = Vec::new();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if users.len() >= MAX_USERS {
                warn!(cap = MAX_USERS, "Allowlist cap reached, ignoring remaining lines");
                break;
            }
            if !users.iter().any(|u| u == line) {
                users.push(line.to_string());
            }
        }
        Allowlist { users }
    }

    /// Exact, case-sensitive membership test.
    pub fn is_allowed(&self, login: &str) -> bool {
        self.users.iter().any(|u| u == login)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Allowlist loading errors
#[derive(Debug)]
pub enum AllowlistError {
    FileRead(PathBuf, std::io::Error),
}

impl std::fmt::Display for AllowlistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllowlistError::FileRead(path, e) => {
                write!(f, "Failed to read users file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for AllowlistError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic() {
        let allowlist = Allowlist::parse("alice\nbob\n");
        assert_eq!(allowlist.len(), 2);
        assert!(allowlist.is_allowed("alice"));
        assert!(allowlist.is_allowed("bob"));
        assert!(!allowlist.is_allowed("mallory"));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let allowlist = Allowlist::parse("# admins\nalice\n\n# operators\nbob\n");
        assert_eq!(allowlist.len(), 2);
    }

    #[test]
    fn test_parse_trims_and_dedups() {
        let allowlist = Allowlist::parse("  alice  \nalice\nbob\n");
        assert_eq!(allowlist.len(), 2);
        assert!(allowlist.is_allowed("alice"));
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let allowlist = Allowlist::parse("alice\n");
        assert!(allowlist.is_allowed("alice"));
        assert!(!allowlist.is_allowed("Alice"));
        assert!(!allowlist.is_allowed(""));
    }

    #[test]
    fn test_parse_caps_entries() {
        let mut contents = String::new();
        for i in 0..150 {
            contents.push_str(&format!("user{}\n", i));
        }
        let allowlist = Allowlist::parse(&contents);
        assert_eq!(allowlist.len(), MAX_USERS);
        assert!(allowlist.is_allowed("user99"));
        assert!(!allowlist.is_allowed("user100"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# allowed users").unwrap();
        writeln!(file, "alice").unwrap();

        let allowlist = Allowlist::load(file.path()).unwrap();
        assert_eq!(allowlist.len(), 1);
        assert!(allowlist.is_allowed("alice"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Allowlist::load(Path::new("/nonexistent/users.conf")),
            Err(AllowlistError::FileRead(_, _))
        ));
    }
}
