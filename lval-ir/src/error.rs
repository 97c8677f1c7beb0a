/// These errors are for internal IR failures, not designed to be useful to an end user, but more
/// for users of the `lval-ir` crate, i.e., compiler developers.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("Local storage for function {0} already has an entry for variable {1}.")]
    FunctionLocalClobbered(String, String),
    #[error("Block {0} has a misplaced terminator.")]
    MisplacedTerminator(String),

    #[error(
        "Verification failed: Call to '{0}' has {2} arguments but the callee expects {1}."
    )]
    VerifyCallArgCountMismatch(String, usize, usize),
    #[error(
        "Verification failed: Argument {1} to '{0}' has type {3} but the callee expects {2}."
    )]
    VerifyCallArgTypeMismatch(String, usize, String, String),
    #[error("Verification failed: elem_addr base is not a pointer: {0}.")]
    VerifyElemAddrFromNonPointer(String),
    #[error("Verification failed: elem_addr base does not point to an aggregate: {0}.")]
    VerifyElemAddrOnNonAggregate(String),
    #[error("Verification failed: elem_addr index {0} is out of range for {1}.")]
    VerifyElemAddrIndexOutOfRange(u64, String),
    #[error(
        "Verification failed: elem_addr result type {1} does not match the element type {0}."
    )]
    VerifyElemAddrInconsistentTypes(String, String),
    #[error("Verification failed: Load must be from a pointer, not {0}.")]
    VerifyLoadFromNonPointer(String),
    #[error("Verification failed: ref_elem_addr base must be a reference, not {0}.")]
    VerifyRefElemAddrFromNonReference(String),
    #[error("Verification failed: Retain or release of a non-reference value of type {0}.")]
    VerifyRefCountOfNonReference(String),
    #[error("Verification failed: Return type {0} does not match the function's {1}.")]
    VerifyReturnMismatchedTypes(String, String),
    #[error("Verification failed: Store value of type {1} through a pointer to {0}.")]
    VerifyStoreMismatchedTypes(String, String),
    #[error("Verification failed: Store must be to a pointer, not {0}.")]
    VerifyStoreToNonPointer(String),
    #[error("Verification failed: An untyped value was used as an operand.")]
    VerifyUntypedValue,
}
