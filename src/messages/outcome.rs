//! Tagged results for operations that never raise, and the load state of a
//! token-bound store.

/// Result of a store operation that reports failure instead of raising.
/// The caller decides between empty state and a banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(v) => Some(v),
            Outcome::Failed(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Failed(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::Failed(reason) => Outcome::Failed(reason),
        }
    }
}

impl<T: Default> Outcome<T> {
    /// The value, or the empty value on failure
    pub fn or_empty(self) -> T {
        self.ok().unwrap_or_default()
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Outcome::Ok(v),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

/// Load state of data bound to the session token.
///
/// `Unbound` means no token; a token change always restarts from `Loading`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Binding<T> {
    #[default]
    Unbound,
    Loading,
    Bound(T),
    Failed(String),
}

impl<T> Binding<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Binding::Bound(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Binding::Bound(_))
    }

    /// Has a load finished since the last token change (successfully or not)
    pub fn is_initialized(&self) -> bool {
        matches!(self, Binding::Bound(_) | Binding::Failed(_))
    }
}

impl<T: Clone + Default> Binding<T> {
    /// Data to render: the bound value, or the empty value otherwise
    pub fn view(&self) -> T {
        self.data().cloned().unwrap_or_default()
    }
}
