use std::sync::RwLock;

/// The session token as last seen by a dependent store
#[derive(Debug, Default)]
pub(crate) struct TokenSlot {
    inner: RwLock<Option<String>>,
}

impl TokenSlot {
    pub fn get(&self) -> Option<String> {
        self.inner.read().ok().and_then(|t| t.clone())
    }

    /// Store `token`, returning whether it differs from the previous value
    pub fn replace(&self, token: Option<String>) -> bool {
        match self.inner.write() {
            Ok(mut current) => {
                let changed = *current != token;
                *current = token;
                changed
            }
            Err(_) => false,
        }
    }

    /// Results fetched with a token that is no longer held must be dropped
    pub fn is_current(&self, token: &str) -> bool {
        self.inner
            .read()
            .map(|t| t.as_deref() == Some(token))
            .unwrap_or(false)
    }
}
