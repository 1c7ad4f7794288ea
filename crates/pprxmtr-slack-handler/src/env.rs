//! Environment lookup behind a trait so configuration can be built from a
//! fixed map in tests instead of the process environment.

use std::env::VarError;

/// Reads a single environment variable.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Result<String, VarError>;
}

/// Zero-sized type, delegates to `std::env`.
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    #[inline]
    fn var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }
}

/// Fixed set of variables, never touches the process environment.
///
/// Built with [`InMemoryEnv::with`] so it stays `Send + Sync` and can be
/// moved into `#[tokio::test]` bodies.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnv {
    vars: std::collections::HashMap<String, String>,
}

#[cfg(any(test, feature = "test-support"))]
impl InMemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ReadEnv for InMemoryEnv {
    fn var(&self, key: &str) -> Result<String, VarError> {
        self.vars.get(key).cloned().ok_or(VarError::NotPresent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_matches_std() {
        assert_eq!(SystemEnv.var("PATH").is_ok(), std::env::var("PATH").is_ok());
    }

    #[test]
    fn in_memory_env_returns_set_values() {
        let env = InMemoryEnv::new().with("REGION", "eu-west-1");
        assert_eq!(env.var("REGION").unwrap(), "eu-west-1");
    }

    #[test]
    fn in_memory_env_missing_is_not_present() {
        let env = InMemoryEnv::new().with("REGION", "eu-west-1").without("REGION");
        assert!(matches!(env.var("REGION"), Err(VarError::NotPresent)));
    }

    #[test]
    fn later_value_overwrites_earlier() {
        let env = InMemoryEnv::new().with("LOCALE", "en").with("LOCALE", "fi");
        assert_eq!(env.var("LOCALE").unwrap(), "fi");
    }
}
