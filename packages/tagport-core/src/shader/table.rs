//! Data-driven variant ordering.

use serde::{Deserialize, Serialize};

use crate::error::{PortError, Result};

use super::options::OptionVector;
use super::ordering::{VariantOrdering, MAX_RANKED_OPTIONS};

/// Largest dimension count whose scores fit 128 bits at radix 17.
const MAX_DIMENSIONS: usize = 31;

/// One categorical dimension as written in a table definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionDefinition {
    pub name: String,
    /// Option names in index order
    pub options: Vec<String>,
    /// Ranked option names, least preferred first
    pub priority: Vec<String>,
}

/// Serializable form of a [`PriorityTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub family: String,
    /// Dimensions in option vector order
    pub dimensions: Vec<DimensionDefinition>,
    /// Dimension names, least significant first
    pub significance: Vec<String>,
}

#[derive(Debug, Clone)]
struct Dimension {
    name: String,
    options: Vec<String>,
    /// Rank per option index; `None` for unranked options
    ranks: Vec<Option<usize>>,
    significance: usize,
}

/// Variant ordering built from curated per-dimension priority lists.
#[derive(Debug, Clone)]
pub struct PriorityTable {
    family: String,
    dimensions: Vec<Dimension>,
}

impl PriorityTable {
    pub fn builder(family: impl Into<String>) -> PriorityTableBuilder {
        PriorityTableBuilder {
            definition: TableDefinition {
                family: family.into(),
                dimensions: Vec::new(),
                significance: Vec::new(),
            },
        }
    }

    /// Parses a JSON table definition.
    pub fn from_json(contents: &str) -> Result<Self> {
        let definition: TableDefinition = serde_json::from_str(contents).map_err(|e| {
            PortError::SerializationError(format!("Failed to parse priority table: {}", e))
        })?;
        Self::from_definition(definition)
    }

    /// Validates a definition: unique dimension and option names, priority
    /// lists naming declared options at most once and holding no more than
    /// 16 entries, and a significance list covering every dimension once.
    pub fn from_definition(definition: TableDefinition) -> Result<Self> {
        let invalid = |dimension: &str, message: String| PortError::InvalidPriorityTable {
            dimension: dimension.to_string(),
            message,
        };

        if definition.dimensions.len() > MAX_DIMENSIONS {
            return Err(invalid(
                &definition.family,
                format!(
                    "{} dimensions exceed the limit of {}",
                    definition.dimensions.len(),
                    MAX_DIMENSIONS
                ),
            ));
        }
        if definition.significance.len() != definition.dimensions.len() {
            return Err(invalid(
                &definition.family,
                "significance must list every dimension exactly once".to_string(),
            ));
        }

        let mut dimensions = Vec::with_capacity(definition.dimensions.len());
        for (i, dimension) in definition.dimensions.iter().enumerate() {
            if definition.dimensions[..i]
                .iter()
                .any(|earlier| earlier.name == dimension.name)
            {
                return Err(invalid(&dimension.name, "duplicate dimension".to_string()));
            }
            if dimension.priority.len() > MAX_RANKED_OPTIONS {
                return Err(invalid(
                    &dimension.name,
                    format!(
                        "{} ranked options exceed the limit of {}",
                        dimension.priority.len(),
                        MAX_RANKED_OPTIONS
                    ),
                ));
            }

            let mut ranks = vec![None; dimension.options.len()];
            for (rank, option) in dimension.priority.iter().enumerate() {
                let index = dimension
                    .options
                    .iter()
                    .position(|name| name == option)
                    .ok_or_else(|| invalid(&dimension.name, format!("unknown option '{}'", option)))?;
                if ranks[index].is_some() {
                    return Err(invalid(&dimension.name, format!("option '{}' ranked twice", option)));
                }
                ranks[index] = Some(rank);
            }

            let significance = definition
                .significance
                .iter()
                .position(|name| *name == dimension.name)
                .ok_or_else(|| invalid(&dimension.name, "missing from significance".to_string()))?;

            dimensions.push(Dimension {
                name: dimension.name.clone(),
                options: dimension.options.clone(),
                ranks,
                significance,
            });
        }

        Ok(Self {
            family: definition.family,
            dimensions,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.name.as_str())
    }

    /// Index of a dimension by name.
    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.name == name)
    }

    /// Index of an option by name within a dimension.
    pub fn option_index(&self, dimension: usize, name: &str) -> Option<u16> {
        self.dimensions
            .get(dimension)?
            .options
            .iter()
            .position(|option| option == name)
            .and_then(|index| u16::try_from(index).ok())
    }

    pub fn option_name(&self, dimension: usize, option: u16) -> Option<&str> {
        self.dimensions
            .get(dimension)?
            .options
            .get(option as usize)
            .map(String::as_str)
    }
}

impl VariantOrdering for PriorityTable {
    fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    fn dimension_rank(&self, dimension: usize) -> usize {
        self.dimensions
            .get(dimension)
            .map_or(0, |d| d.significance)
    }

    fn option_count(&self, dimension: usize) -> usize {
        self.dimensions.get(dimension).map_or(0, |d| d.options.len())
    }

    fn option_rank(&self, dimension: usize, option: u16) -> Option<usize> {
        self.dimensions
            .get(dimension)?
            .ranks
            .get(option as usize)
            .copied()
            .flatten()
    }

    fn describe(&self, options: &OptionVector) -> String {
        self.dimensions
            .iter()
            .enumerate()
            .map(|(i, dimension)| {
                let option = options
                    .get(i)
                    .map(|option| {
                        self.option_name(i, option)
                            .map_or_else(|| option.to_string(), str::to_string)
                    })
                    .unwrap_or_else(|| "-".to_string());
                format!("{}: {}", dimension.name, option)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Builder for [`PriorityTable`].
#[derive(Debug, Clone)]
pub struct PriorityTableBuilder {
    definition: TableDefinition,
}

impl PriorityTableBuilder {
    /// Appends a dimension. `priority` lists option names least preferred
    /// first; options left out are unranked.
    pub fn dimension(mut self, name: &str, options: &[&str], priority: &[&str]) -> Self {
        self.definition.dimensions.push(DimensionDefinition {
            name: name.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            priority: priority.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Sets dimension significance, least significant first.
    pub fn significance(mut self, names: &[&str]) -> Self {
        self.definition.significance = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> Result<PriorityTable> {
        PriorityTable::from_definition(self.definition)
    }
}
