use std::fmt;

use crate::error::{PortError, Result};

/// Selected option index per categorical dimension, in dimension order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OptionVector(Vec<u16>);

impl OptionVector {
    pub fn new(options: Vec<u16>) -> Self {
        OptionVector(options)
    }

    /// Parses the option suffix of a template path such as
    /// `shaders\shader_templates\_0_1_2`.
    ///
    /// Only the last `\`-separated component is read; the text before its
    /// first `_` is ignored.
    pub fn from_template_name(name: &str) -> Result<Self> {
        let invalid = || PortError::InvalidTemplateName {
            name: name.to_string(),
        };

        let last = name.rsplit('\\').next().unwrap_or(name);
        let mut parts = last.split('_');
        parts.next();

        let options = parts
            .map(|part| part.parse::<u16>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;
        if options.is_empty() {
            return Err(invalid());
        }
        Ok(OptionVector(options))
    }

    /// Renders the template path of these options within `family`.
    pub fn to_template_name(&self, family: &str) -> String {
        format!("shaders\\{}_templates\\{}", family, self)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    pub fn get(&self, dimension: usize) -> Option<u16> {
        self.0.get(dimension).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u16>> for OptionVector {
    fn from(options: Vec<u16>) -> Self {
        OptionVector(options)
    }
}

impl From<&[u16]> for OptionVector {
    fn from(options: &[u16]) -> Self {
        OptionVector(options.to_vec())
    }
}

/// Formats as the template suffix, e.g. `_0_1_2`.
impl fmt::Display for OptionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for option in &self.0 {
            write!(f, "_{}", option)?;
        }
        Ok(())
    }
}
