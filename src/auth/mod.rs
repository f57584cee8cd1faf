//! Credential-to-identity resolution.
//!
//! The platform stores the signed-in user's credential in a named browser
//! cookie and uses it as the user identifier in request bodies. That mapping
//! lives behind [`IdentityProvider`] so a real decoding or identity-lookup
//! step can replace it without touching the views.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::errors::ClientError;

/// Read access to the shell's credential storage (the browser cookie jar in
/// production).
pub trait CredentialStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Opaque authenticated user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the signed-in user's identity from the credential store.
#[derive(Clone)]
pub struct IdentityProvider {
    store: Arc<dyn CredentialStore>,
    cookie_name: String,
}

impl IdentityProvider {
    pub fn new(store: Arc<dyn CredentialStore>, cookie_name: impl Into<String>) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
        }
    }

    /// Returns the authenticated user identifier.
    ///
    /// The credential is treated as an opaque value; no decoding is
    /// attempted. Absent or blank credentials are rejected so requests never
    /// go out with an empty `user_id`.
    pub fn resolve(&self) -> Result<UserId, ClientError> {
        let raw = self
            .store
            .get(&self.cookie_name)
            .ok_or_else(|| ClientError::MissingCredential(self.cookie_name.clone()))?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClientError::MissingCredential(self.cookie_name.clone()));
        }

        Ok(UserId::new(trimmed))
    }
}

/// Credential store backed by a map, for tests and headless tooling.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(name.into(), value.into());
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.read().ok()?.get(name).cloned()
    }
}
