//! Token-based conversion of enumerated and flag values.

use crate::schema::EnumDefinition;

/// Outcome of translating one enumerated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTranslation {
    /// Destination value rebuilt from the matched tokens
    pub value: i64,
    /// True if at least one token matched
    pub matched: bool,
    /// Source tokens the destination does not define
    pub dropped: Vec<String>,
}

impl EnumTranslation {
    fn unmatched() -> Self {
        Self {
            value: 0,
            matched: false,
            dropped: Vec::new(),
        }
    }
}

/// Translates `source_value` of `source` into the closest value of
/// `destination` by case-insensitive token name.
///
/// An absent source value never matches.
pub fn translate_enum(
    source_value: Option<i64>,
    source: &EnumDefinition,
    destination: &EnumDefinition,
) -> EnumTranslation {
    match source_value {
        Some(value) => translate_tokens(&source.tokens(value), destination),
        None => EnumTranslation::unmatched(),
    }
}

/// Translates a `", "`-delimited token string into `destination`.
pub fn translate_flag_string(flags: &str, destination: &EnumDefinition) -> EnumTranslation {
    let tokens: Vec<&str> = flags
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
    translate_tokens(&tokens, destination)
}

fn translate_tokens<S: AsRef<str>>(tokens: &[S], destination: &EnumDefinition) -> EnumTranslation {
    if tokens.is_empty() {
        return EnumTranslation::unmatched();
    }

    // Matching and dropping both go through the destination's own lookup.
    let (known, unknown): (Vec<&str>, Vec<&str>) = tokens
        .iter()
        .map(|token| token.as_ref())
        .partition(|token| destination.member(token).is_some());
    let dropped: Vec<String> = unknown.into_iter().map(str::to_string).collect();

    if known.is_empty() {
        return EnumTranslation {
            value: 0,
            matched: false,
            dropped,
        };
    }

    EnumTranslation {
        value: destination.parse_tokens(&known),
        matched: true,
        dropped,
    }
}
