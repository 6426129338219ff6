/*
 * Responsibility
 * - Static username → password table for the built-in policy
 * - Constant-time lookup that visits every entry
 */
use std::str::FromStr;

use subtle::Choice;

use super::error::ConfigError;
use crate::services::compare::ct_compare;

#[derive(Clone, Default)]
pub struct UserTable {
    entries: Vec<(String, String)>,
}

impl UserTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub fn insert(&mut self, username: impl Into<String>, password: impl Into<String>) {
        let username = username.into();
        let password = password.into();
        match self.entries.iter_mut().find(|(u, _)| *u == username) {
            Some(entry) => entry.1 = password,
            None => self.entries.push((username, password)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff some entry matches both username and password exactly.
    ///
    /// Every entry is compared and the results are OR-ed into a `Choice`, so
    /// the time taken does not reveal which entry (if any) matched.
    pub fn authorize(&self, username: &str, password: &str) -> bool {
        let mut acc = Choice::from(0);
        for (user, pass) in &self.entries {
            acc |= ct_compare(username, user) & ct_compare(password, pass);
        }
        acc.into()
    }
}

impl<U, P> FromIterator<(U, P)> for UserTable
where
    U: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (U, P)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (user, pass) in iter {
            table.insert(user, pass);
        }
        table
    }
}

/// Parses `user:password` pairs separated by commas, e.g. `admin:secret,ops:hunter2`.
/// Blank entries are skipped. The password is everything after the first `:`.
impl FromStr for UserTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut table = Self::new();
        for (index, entry) in s.split(',').map(str::trim).enumerate() {
            if entry.is_empty() {
                continue;
            }
            let (user, pass) = entry
                .split_once(':')
                .ok_or(ConfigError::InvalidUserEntry { index })?;
            table.insert(user, pass);
        }
        Ok(table)
    }
}

impl std::fmt::Debug for UserTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(u, _)| u))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UserTable {
        [("Admin", "secret1234"), ("ops", "hunter2")]
            .into_iter()
            .collect()
    }

    #[test]
    fn exact_match_is_authorized() {
        let users = table();
        assert!(users.authorize("Admin", "secret1234"));
        assert!(users.authorize("ops", "hunter2"));
    }

    #[test]
    fn prefix_password_is_denied() {
        assert!(!table().authorize("Admin", "secret"));
    }

    #[test]
    fn password_of_another_user_is_denied() {
        assert!(!table().authorize("Admin", "hunter2"));
        assert!(!table().authorize("ops", "secret1234"));
    }

    #[test]
    fn unknown_user_is_denied() {
        assert!(!table().authorize("nobody", "secret1234"));
        assert!(!table().authorize("", ""));
    }

    #[test]
    fn empty_table_denies_everything() {
        let users = UserTable::new();
        assert!(!users.authorize("", ""));
        assert!(!users.authorize("Admin", "secret1234"));
    }

    #[test]
    fn insert_replaces_existing_password() {
        let mut users = table();
        users.insert("Admin", "rotated");
        assert_eq!(users.len(), 2);
        assert!(users.authorize("Admin", "rotated"));
        assert!(!users.authorize("Admin", "secret1234"));
    }

    #[test]
    fn parses_comma_separated_pairs() {
        let users: UserTable = " admin:secret , ops:pa:ss ,".parse().expect("valid list");
        assert_eq!(users.len(), 2);
        assert!(users.authorize("admin", "secret"));
        assert!(users.authorize("ops", "pa:ss"));
    }

    #[test]
    fn rejects_entry_without_colon() {
        let err = "admin:secret,broken".parse::<UserTable>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUserEntry { index: 1 }));
    }

    #[test]
    fn debug_lists_usernames_only() {
        let rendered = format!("{:?}", table());
        assert!(rendered.contains("Admin"));
        assert!(!rendered.contains("secret1234"));
    }
}
