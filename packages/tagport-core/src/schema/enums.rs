//! Enumerated and flag value definitions.

use crate::error::{PortError, Result};

/// One named member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// Enumeration or flag set definition.
///
/// Flag sets treat each member value as a bit mask; plain enumerations hold
/// exactly one member value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: String,
    pub flags: bool,
    pub members: Vec<EnumMember>,
}

impl EnumDefinition {
    /// Creates a plain enumeration whose members take consecutive values.
    pub fn sequential(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            flags: false,
            members: members
                .iter()
                .enumerate()
                .map(|(i, member)| EnumMember {
                    name: member.to_string(),
                    value: i as i64,
                })
                .collect(),
        }
    }

    /// Creates a flag set whose members take consecutive bits.
    pub fn bit_flags(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            flags: true,
            members: members
                .iter()
                .enumerate()
                .map(|(i, member)| EnumMember {
                    name: member.to_string(),
                    value: 1i64 << i,
                })
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| PortError::InvalidLayout {
            type_name: self.name.clone(),
            message,
        };

        if self.name.is_empty() {
            return Err(invalid("enumeration name is empty".to_string()));
        }
        for (i, member) in self.members.iter().enumerate() {
            if member.name.is_empty() {
                return Err(invalid(format!("member {} has an empty name", i)));
            }
            if self.members[..i]
                .iter()
                .any(|earlier| earlier.name.eq_ignore_ascii_case(&member.name))
            {
                return Err(invalid(format!("duplicate member '{}'", member.name)));
            }
        }
        Ok(())
    }

    /// Looks up a member by case-insensitive name.
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members
            .iter()
            .find(|member| member.name.eq_ignore_ascii_case(name))
    }

    /// Renders a value as its component token names.
    ///
    /// Flag sets yield every member whose bits are all set, plus the
    /// leftover bits as a decimal token. A value with no named member
    /// renders as its decimal form.
    pub fn tokens(&self, value: i64) -> Vec<String> {
        if !self.flags {
            return match self.members.iter().find(|member| member.value == value) {
                Some(member) => vec![member.name.clone()],
                None => vec![value.to_string()],
            };
        }

        if value == 0 {
            return match self.members.iter().find(|member| member.value == 0) {
                Some(member) => vec![member.name.clone()],
                None => Vec::new(),
            };
        }

        let mut tokens = Vec::new();
        let mut covered = 0i64;
        for member in &self.members {
            if member.value != 0 && value & member.value == member.value {
                tokens.push(member.name.clone());
                covered |= member.value;
            }
        }
        let leftover = value & !covered;
        if leftover != 0 {
            tokens.push(leftover.to_string());
        }
        tokens
    }

    /// Renders a value as a `", "`-delimited string.
    pub fn format(&self, value: i64) -> String {
        self.tokens(value).join(", ")
    }

    /// Value named by `tokens`. Unknown names are ignored.
    ///
    /// Flag sets combine every named member. A plain enum holds one member,
    /// so the first known token wins and the rest are ignored.
    pub fn parse_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> i64 {
        let mut members = tokens.iter().filter_map(|token| self.member(token.as_ref()));
        if self.flags {
            members.fold(0, |acc, member| acc | member.value)
        } else {
            members.next().map_or(0, |member| member.value)
        }
    }
}
