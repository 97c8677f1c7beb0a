use lval_types::{Span, Spanned};
use thiserror::Error;

/// Errors raised while lowering typed expressions to IR.
///
/// None of these are user errors: type checking rejects every program shape that could reach
/// them, so each one is a bug in an earlier phase or an unimplemented corner of lowering.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompileError {
    #[error(
        "Internal compiler error: {0}\nPlease file an issue on the repository and include the \
         code that triggered this error."
    )]
    Internal(&'static str, Span),
    #[error(
        "Internal compiler error: {0}\nPlease file an issue on the repository and include the \
         code that triggered this error."
    )]
    InternalOwned(String, Span),
    #[error("Unimplemented feature: {0}")]
    Unimplemented(&'static str, Span),
    #[error(
        "Internal compiler error: unsupported lvalue expression `{kind}`.\nPlease file an issue \
         on the repository and include the code that triggered this error."
    )]
    UnsupportedLValue { kind: &'static str, span: Span },
}

impl CompileError {
    /// Whether this error reports a broken invariant rather than a missing feature.
    pub fn is_internal(&self) -> bool {
        !matches!(self, CompileError::Unimplemented(..))
    }
}

impl Spanned for CompileError {
    fn span(&self) -> Span {
        use CompileError::*;
        match self {
            Internal(_, span) => span.clone(),
            InternalOwned(_, span) => span.clone(),
            Unimplemented(_, span) => span.clone(),
            UnsupportedLValue { span, .. } => span.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_message() {
        let err = CompileError::Internal("var component must be root of lvalue path", Span::dummy());
        assert!(err
            .to_string()
            .starts_with("Internal compiler error: var component must be root of lvalue path"));
        assert!(err.is_internal());
    }

    #[test]
    fn unimplemented_is_not_internal() {
        let err = CompileError::Unimplemented("address-only tuple elements", Span::dummy());
        assert_eq!(
            err.to_string(),
            "Unimplemented feature: address-only tuple elements"
        );
        assert!(!err.is_internal());
    }
}
