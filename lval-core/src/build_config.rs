/// Configuration for lowering functions to IR.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    // Log the IR of the module once a function has been lowered.
    pub(crate) print_ir: bool,
    // Run the IR verifier once a function has been lowered.
    pub(crate) verify_ir: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            print_ir: false,
            verify_ir: true,
        }
    }
}

impl BuildConfig {
    /// Whether or not to print the IR after lowering.
    pub fn print_ir(self, a: bool) -> Self {
        Self {
            print_ir: a,
            ..self
        }
    }

    /// Whether or not to verify the IR after lowering.
    pub fn verify_ir(self, a: bool) -> Self {
        Self {
            verify_ir: a,
            ..self
        }
    }
}
