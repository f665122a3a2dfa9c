//! Error types.

use std::fmt;

/// One configuration violation, with the offending field and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(
        field: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Errors that abort a whole wrapping call.
///
/// Per-element problems that can be recovered locally (absent input,
/// malformed UTF-8) are not errors; they surface as
/// [`WrappedText`](crate::wrap::WrappedText) variants instead.
#[derive(Debug, Clone, PartialEq)]
pub enum WrapError {
    /// The configuration failed validation. All violations are listed.
    InvalidConfig(Vec<ConfigError>),
    /// An element contains a hard line-break codepoint.
    EmbeddedLineBreak {
        /// Index of the element within the batch (0 for single strings).
        element: usize,
        /// Byte offset of the codepoint within the element.
        byte_offset: usize,
        codepoint: char,
    },
}

impl fmt::Display for WrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(errors) => {
                write!(f, "invalid wrap configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
            Self::EmbeddedLineBreak {
                element,
                byte_offset,
                codepoint,
            } => write!(
                f,
                "element {element} contains a line break (U+{:04X}) at byte {byte_offset}; \
                 text to wrap must not contain newlines",
                u32::from(*codepoint)
            ),
        }
    }
}

impl std::error::Error for WrapError {}

impl From<Vec<ConfigError>> for WrapError {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::InvalidConfig(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::new("width", "0", "must be >= 1");
        assert_eq!(err.to_string(), "width=0 (must be >= 1)");
    }

    #[test]
    fn invalid_config_lists_every_violation() {
        let err = WrapError::InvalidConfig(vec![
            ConfigError::new("width", "-2", "must be >= 1"),
            ConfigError::new("cost_exponent", "NaN", "must be a number"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid wrap configuration: width=-2 (must be >= 1); \
             cost_exponent=NaN (must be a number)"
        );
    }

    #[test]
    fn line_break_display_names_codepoint() {
        let err = WrapError::EmbeddedLineBreak {
            element: 2,
            byte_offset: 7,
            codepoint: '\u{2028}',
        };
        let msg = err.to_string();
        assert!(msg.contains("element 2"));
        assert!(msg.contains("U+2028"));
        assert!(msg.contains("byte 7"));
    }
}
