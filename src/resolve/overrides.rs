//! Tenant override values.
//!
//! An override is stored as a raw string with three meanings: disable the
//! metric, replace its value (optionally with a severity), or something that
//! is neither. It is parsed once into [`OverrideValue`] and matched on.

/// Values that suppress a metric or state filter.
pub const DISABLE_TOKENS: [&str; 4] = ["disable", "disabled", "off", "false"];

/// A parsed tenant override.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    /// Suppress the metric or filter for this tenant.
    Disabled,
    /// Custom threshold, optionally with its own severity.
    Custom { value: f64, severity: Option<String> },
    /// Not a disable token and not a number; the default applies.
    Unrecognized(String),
}

impl OverrideValue {
    pub fn parse(raw: &str) -> Self {
        if is_disable_token(raw) {
            return OverrideValue::Disabled;
        }

        let (value_part, severity_part) = match raw.split_once(':') {
            Some((value, severity)) => (value, Some(severity)),
            None => (raw, None),
        };

        match value_part.trim().parse::<f64>() {
            Ok(value) => OverrideValue::Custom {
                value,
                severity: severity_part
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            },
            Err(_) => OverrideValue::Unrecognized(raw.to_string()),
        }
    }
}

/// Case- and whitespace-insensitive match against [`DISABLE_TOKENS`].
pub fn is_disable_token(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    DISABLE_TOKENS.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_variants() {
        for raw in ["disable", "DISABLE", " Disable ", "off", "false", "disabled", "DISABLE ", "\tOff\n"] {
            assert_eq!(OverrideValue::parse(raw), OverrideValue::Disabled, "{raw:?}");
        }
    }

    #[test]
    fn test_not_disable() {
        for raw in ["disables", "no", "0", "enable", ""] {
            assert!(!is_disable_token(raw), "{raw:?}");
        }
    }

    #[test]
    fn test_custom_value() {
        assert_eq!(
            OverrideValue::parse("70"),
            OverrideValue::Custom { value: 70.0, severity: None }
        );
        assert_eq!(
            OverrideValue::parse(" 12.5 "),
            OverrideValue::Custom { value: 12.5, severity: None }
        );
    }

    #[test]
    fn test_custom_value_with_severity() {
        assert_eq!(
            OverrideValue::parse("50:critical"),
            OverrideValue::Custom { value: 50.0, severity: Some("critical".into()) }
        );
        assert_eq!(
            OverrideValue::parse(" 50 : page:now "),
            OverrideValue::Custom { value: 50.0, severity: Some("page:now".into()) }
        );
    }

    #[test]
    fn test_empty_severity_suffix_keeps_default() {
        assert_eq!(
            OverrideValue::parse("50:"),
            OverrideValue::Custom { value: 50.0, severity: None }
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(
            OverrideValue::parse("not-a-number"),
            OverrideValue::Unrecognized("not-a-number".into())
        );
        assert_eq!(
            OverrideValue::parse("high:critical"),
            OverrideValue::Unrecognized("high:critical".into())
        );
        assert_eq!(OverrideValue::parse(""), OverrideValue::Unrecognized(String::new()));
    }
}
