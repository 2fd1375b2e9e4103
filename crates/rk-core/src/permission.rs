// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission sets and the permission evaluator.
//!
//! Permission codes are opaque strings such as `rk:supply:page`. The server
//! returns the codes granted to the current user's roles; the evaluator
//! answers single/any/all membership queries against that set. Administrator
//! sessions bypass the set entirely.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;

// =============================================================================
// PermissionSet
// =============================================================================

/// A set of granted permission codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    codes: HashSet<String>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from individual codes.
    ///
    /// Codes containing commas are split, and blank codes are skipped, so
    /// raw `perms` columns can be fed in directly.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for code in codes {
            set.add(code.as_ref());
        }
        set
    }

    /// Adds a code (or a comma-separated list of codes).
    pub fn add(&mut self, code: &str) {
        for part in code.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            self.codes.insert(part.to_string());
        }
    }

    /// Returns `true` if the set contains `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Returns `true` if every code is present. Vacuously `true` when empty.
    pub fn contains_all<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().all(|code| self.contains(code.as_ref()))
    }

    /// Returns `true` if at least one code is present.
    pub fn contains_any<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().any(|code| self.contains(code.as_ref()))
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Returns an iterator over the codes.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Returns the codes sorted, for display.
    pub fn sorted(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.iter().collect();
        codes.sort_unstable();
        codes
    }

    /// Merges another set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.codes.extend(other.codes.iter().cloned());
    }
}

impl<S: AsRef<str>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_codes(iter)
    }
}

// =============================================================================
// AdminPolicy
// =============================================================================

/// Decides whether a profile carries administrator privileges.
///
/// The server's explicit `admin` claim is honoured by default. Deployments
/// against backends that only know administrators by account name can list
/// those usernames here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminPolicy {
    /// Honour the profile's `admin` claim.
    pub honor_server_flag: bool,
    /// Usernames treated as administrators.
    pub usernames: Vec<String>,
}

impl Default for AdminPolicy {
    fn default() -> Self {
        Self {
            honor_server_flag: true,
            usernames: Vec::new(),
        }
    }
}

impl AdminPolicy {
    /// A policy that only trusts the server claim.
    pub fn server_flag() -> Self {
        Self::default()
    }

    /// A policy that also treats the given usernames as administrators.
    pub fn with_usernames<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usernames = usernames.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if the profile is an administrator under this policy.
    pub fn is_admin(&self, profile: &UserProfile) -> bool {
        (self.honor_server_flag && profile.admin == Some(true))
            || self.usernames.iter().any(|name| name == &profile.username)
    }
}

// =============================================================================
// PermissionEvaluator
// =============================================================================

/// Answers permission queries for one session.
///
/// Administrators short-circuit every query to `true`, including unknown or
/// empty codes.
#[derive(Debug, Clone, Default)]
pub struct PermissionEvaluator {
    granted: Arc<PermissionSet>,
    admin: bool,
}

impl PermissionEvaluator {
    /// Creates an evaluator over a granted set.
    pub fn new(granted: Arc<PermissionSet>, admin: bool) -> Self {
        Self { granted, admin }
    }

    /// An evaluator that denies everything (no session).
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// Returns `true` if this is an administrator evaluator.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Returns the granted set.
    pub fn granted(&self) -> &PermissionSet {
        &self.granted
    }

    /// Single-code query.
    pub fn has_permission(&self, code: &str) -> bool {
        self.admin || self.granted.contains(code)
    }

    /// True if any code is granted. An empty query is `false` for
    /// non-administrators.
    pub fn has_any_permission<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        self.admin || self.granted.contains_any(codes)
    }

    /// True if every code is granted. An empty query is `true`.
    pub fn has_all_permissions<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        self.admin || self.granted.contains_all(codes)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: &str, admin: Option<bool>) -> UserProfile {
        UserProfile {
            id: 1,
            username: username.to_string(),
            name: None,
            nick_name: None,
            department_id: None,
            role_id_list: vec![1],
            admin,
        }
    }

    fn evaluator(codes: &[&str], admin: bool) -> PermissionEvaluator {
        PermissionEvaluator::new(Arc::new(PermissionSet::from_codes(codes)), admin)
    }

    #[test]
    fn test_permission_set_splits_codes() {
        let set = PermissionSet::from_codes(["rk:vendor:page, rk:vendor:add", "", "sys:user:page"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("rk:vendor:add"));
        assert_eq!(set.sorted()[0], "rk:vendor:add");
    }

    #[test]
    fn test_admin_bypass() {
        let admin = evaluator(&[], true);

        assert!(admin.has_permission(""));
        assert!(admin.has_permission("no:such:code"));
        assert!(admin.has_any_permission(&["x", "y"]));
        assert!(admin.has_any_permission::<&str>(&[]));
        assert!(admin.has_all_permissions(&["x", ""]));
    }

    #[test]
    fn test_non_admin_any_all() {
        let user = evaluator(&["rk:supply:page", "rk:supply:info"], false);

        assert!(user.has_permission("rk:supply:page"));
        assert!(!user.has_permission("rk:supply:delete"));
        assert!(user.has_any_permission(&["rk:supply:delete", "rk:supply:info"]));
        assert!(!user.has_any_permission(&["rk:supply:delete"]));
        assert!(!user.has_any_permission::<&str>(&[]));
        assert!(user.has_all_permissions(&["rk:supply:page", "rk:supply:info"]));
        assert!(!user.has_all_permissions(&["rk:supply:page", "rk:supply:delete"]));
        assert!(user.has_all_permissions::<&str>(&[]));
    }

    #[test]
    fn test_deny_all() {
        let none = PermissionEvaluator::deny_all();
        assert!(!none.is_admin());
        assert!(!none.has_permission("anything"));
    }

    #[test]
    fn test_admin_policy_server_flag() {
        let policy = AdminPolicy::server_flag();
        assert!(policy.is_admin(&profile("alice", Some(true))));
        assert!(!policy.is_admin(&profile("alice", Some(false))));
        assert!(!policy.is_admin(&profile("admin", None)));
    }

    #[test]
    fn test_admin_policy_usernames() {
        let policy = AdminPolicy::server_flag().with_usernames(["admin", "root"]);
        assert!(policy.is_admin(&profile("admin", None)));
        assert!(policy.is_admin(&profile("root", Some(false))));
        assert!(!policy.is_admin(&profile("bob", None)));

        let legacy_only = AdminPolicy {
            honor_server_flag: false,
            usernames: vec!["admin".to_string()],
        };
        assert!(!legacy_only.is_admin(&profile("alice", Some(true))));
    }
}
