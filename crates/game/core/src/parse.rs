//! Shorthand strings used by content authors.
//!
//! - Modifiers: `"+10 Intellect"`, `"-50% Courage"`, or a bare `"Intellect"`
//!   placeholder worth zero.
//! - Resources: `"50/100 Mana"` (current/max name).

use crate::effect::ModifierOperation;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("shorthand string is empty")]
    Empty,

    #[error("`{0}` has more than two space-separated parts")]
    TooManyParts(String),

    #[error("`{0}` is not a finite number")]
    InvalidNumber(String),

    #[error("`{0}` is not of the form `current/max name`")]
    InvalidResource(String),
}

impl GameError for ParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "PARSE_EMPTY",
            Self::TooManyParts(_) => "PARSE_TOO_MANY_PARTS",
            Self::InvalidNumber(_) => "PARSE_INVALID_NUMBER",
            Self::InvalidResource(_) => "PARSE_INVALID_RESOURCE",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedModifier {
    pub target: String,
    pub operation: ModifierOperation,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedResource {
    pub name: String,
    pub current: f64,
    pub max: f64,
}

/// A trailing `%` makes the modifier multiplicative and divides the
/// magnitude by 100.
pub fn parse_modifier(text: &str) -> Result<ParsedModifier, ParseError> {
    let parts: Vec<&str> = text.trim().split(' ').collect();
    match parts.as_slice() {
        [""] => Err(ParseError::Empty),
        [target] => Ok(ParsedModifier {
            target: (*target).to_owned(),
            operation: ModifierOperation::Add,
            value: 0.0,
        }),
        [magnitude, target] => {
            let (number, operation) = match magnitude.strip_suffix('%') {
                Some(number) => (number, ModifierOperation::Multiply),
                None => (*magnitude, ModifierOperation::Add),
            };
            let mut value = parse_number(number)?;
            if operation == ModifierOperation::Multiply {
                value /= 100.0;
            }
            Ok(ParsedModifier {
                target: (*target).to_owned(),
                operation,
                value,
            })
        }
        _ => Err(ParseError::TooManyParts(text.to_owned())),
    }
}

pub fn parse_resource(text: &str) -> Result<ParsedResource, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let invalid = || ParseError::InvalidResource(text.to_owned());

    let (amounts, name) = trimmed.split_once(' ').ok_or_else(invalid)?;
    if name.is_empty() || name.contains(' ') {
        return Err(invalid());
    }
    let (current, max) = amounts.split_once('/').ok_or_else(invalid)?;

    Ok(ParsedResource {
        name: name.to_owned(),
        current: parse_number(current)?,
        max: parse_number(max)?,
    })
}

fn parse_number(text: &str) -> Result<f64, ParseError> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_flat_modifier() {
        let parsed = parse_modifier("+10 Intellect").unwrap();
        assert_eq!(parsed.target, "Intellect");
        assert_eq!(parsed.operation, ModifierOperation::Add);
        assert_eq!(parsed.value, 10.0);
    }

    #[test]
    fn percent_modifier_is_fractional_multiply() {
        let parsed = parse_modifier("-50% Courage").unwrap();
        assert_eq!(parsed.operation, ModifierOperation::Multiply);
        assert_eq!(parsed.value, -0.5);
    }

    #[test]
    fn bare_name_is_zero_placeholder() {
        let parsed = parse_modifier("Intellect").unwrap();
        assert_eq!(parsed.value, 0.0);
        assert_eq!(parsed.operation, ModifierOperation::Add);
    }

    #[test]
    fn malformed_modifiers_are_rejected() {
        assert_eq!(parse_modifier(""), Err(ParseError::Empty));
        assert!(matches!(
            parse_modifier("+10 Big Intellect"),
            Err(ParseError::TooManyParts(_))
        ));
        assert!(matches!(
            parse_modifier("ten Intellect"),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_modifier("inf Intellect"),
            Err(ParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn resource_shorthand() {
        let parsed = parse_resource("50/100 Mana").unwrap();
        assert_eq!(
            parsed,
            ParsedResource {
                name: "Mana".into(),
                current: 50.0,
                max: 100.0
            }
        );

        assert!(matches!(
            parse_resource("50 Mana"),
            Err(ParseError::InvalidResource(_))
        ));
        assert!(matches!(
            parse_resource("50/x Mana"),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(parse_resource("50/50").is_err());
    }
}
