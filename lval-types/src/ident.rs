use crate::span::{Span, Spanned};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// An [Ident] is an _identifier_ with a corresponding `span` from which it was derived.
///
/// Hashing and equality only look at the textual name, so the same name written in two places
/// compares equal.
#[derive(Clone)]
pub struct Ident {
    name_override_opt: Option<Arc<str>>,
    span: Span,
}

impl Ident {
    pub fn new(span: Span) -> Ident {
        Ident {
            name_override_opt: None,
            span,
        }
    }

    pub fn new_with_override(name_override: impl Into<Arc<str>>, span: Span) -> Ident {
        Ident {
            name_override_opt: Some(name_override.into()),
            span,
        }
    }

    pub fn new_no_span(name: impl Into<Arc<str>>) -> Ident {
        Ident::new_with_override(name, Span::dummy())
    }

    pub fn as_str(&self) -> &str {
        self.name_override_opt
            .as_deref()
            .unwrap_or_else(|| self.span.as_str())
    }
}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Ident {}

impl Ord for Ident {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Ident {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span.clone()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}
