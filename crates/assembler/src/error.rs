//! Error types for the SVM assembler.

use thiserror::Error;

/// Errors produced while assembling source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An argument does not satisfy the opcode's shape constraint.
    #[error("argument {position} to {opcode} {constraint}")]
    ArgConstraintUnsatisfied {
        opcode: &'static str,
        position: usize,
        constraint: &'static str,
    },

    /// A referenced label was never defined.
    #[error("undefined label '{name}' referenced at {at:#06x}")]
    UndefinedLabel { name: String, at: usize },

    /// A source file could not be read. Produced by the driver; the
    /// assembler itself works on in-memory text.
    #[error("failed to open '{path}'")]
    FileOpenFailed { path: String },

    /// The source ended where another token was required.
    #[error("expected token after '{after}'")]
    ExpectedToken { after: String },
}

impl AsmError {
    /// Stable error ordinal, used as the driver's process exit code.
    ///
    /// Ordinals 1 (null argument) and 2 (bad allocation) belonged to
    /// conditions with no Rust counterpart and stay reserved.
    pub fn exit_code(&self) -> i32 {
        match self {
            AsmError::ArgConstraintUnsatisfied { .. } => 3,
            AsmError::UndefinedLabel { .. } => 4,
            AsmError::FileOpenFailed { .. } => 5,
            AsmError::ExpectedToken { .. } => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_arg_constraint() {
        let e = AsmError::ArgConstraintUnsatisfied {
            opcode: "pop",
            position: 1,
            constraint: "can only be a register",
        };
        assert_eq!(e.to_string(), "argument 1 to pop can only be a register");
    }

    #[test]
    fn display_undefined_label() {
        let e = AsmError::UndefinedLabel {
            name: "nowhere".to_string(),
            at: 1,
        };
        assert_eq!(e.to_string(), "undefined label 'nowhere' referenced at 0x0001");
    }

    #[test]
    fn display_expected_token() {
        let e = AsmError::ExpectedToken {
            after: "mov".to_string(),
        };
        assert_eq!(e.to_string(), "expected token after 'mov'");
    }

    #[test]
    fn exit_codes() {
        assert_eq!(
            AsmError::ArgConstraintUnsatisfied {
                opcode: "mov",
                position: 1,
                constraint: "x"
            }
            .exit_code(),
            3
        );
        assert_eq!(
            AsmError::UndefinedLabel {
                name: String::new(),
                at: 0
            }
            .exit_code(),
            4
        );
        assert_eq!(
            AsmError::FileOpenFailed {
                path: String::new()
            }
            .exit_code(),
            5
        );
        assert_eq!(
            AsmError::ExpectedToken {
                after: String::new()
            }
            .exit_code(),
            6
        );
    }
}
