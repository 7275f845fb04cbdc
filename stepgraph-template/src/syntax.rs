//! Template syntax and limits.

use crate::error::TemplateError;
use serde::{Deserialize, Serialize};

/// Delimiters recognised by the template machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Opens an argument reference.
    pub argument_start: char,
    /// Closes an argument reference.
    pub argument_end: char,
    /// Makes the following character literal.
    pub escape: char,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            argument_start: '{',
            argument_end: '}',
            escape: '\\',
        }
    }
}

impl Syntax {
    /// Rejects delimiter sets the machine cannot tell apart.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let Syntax {
            argument_start,
            argument_end,
            escape,
        } = *self;

        if argument_start == argument_end || argument_start == escape || argument_end == escape {
            return Err(TemplateError::InvalidSyntax {
                reason: format!(
                    "delimiters must be distinct (start '{}', end '{}', escape '{}')",
                    argument_start, argument_end, escape
                ),
            });
        }

        // Argument references are made of digits.
        if argument_end.is_ascii_digit() {
            return Err(TemplateError::InvalidSyntax {
                reason: format!("argument end '{}' cannot be a digit", argument_end),
            });
        }

        Ok(())
    }
}

/// Bounds applied while rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum rendered length in bytes. `None` means unlimited.
    pub max_output_len: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_syntax_is_valid() {
        assert!(Syntax::default().validate().is_ok());
    }

    #[test]
    fn test_colliding_delimiters() {
        let syntax = Syntax {
            argument_start: '$',
            argument_end: '$',
            escape: '\\',
        };
        assert!(matches!(
            syntax.validate(),
            Err(TemplateError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_digit_end_rejected() {
        let syntax = Syntax {
            argument_end: '1',
            ..Syntax::default()
        };
        assert!(syntax.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let syntax: Syntax = serde_json::from_str(r#"{"argument_start": "<"}"#).unwrap();
        assert_eq!(syntax.argument_start, '<');
        assert_eq!(syntax.argument_end, '}');
        assert_eq!(syntax.escape, '\\');
    }
}
