use std::str::FromStr;

use crate::error::Result;

use super::options::OptionVector;
use super::ordering::{encode, VariantOrdering, VariantScore};

/// What to pick when no candidate scores at or above the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Report no match; the caller keeps its reference unset
    #[default]
    NoMatch,
    /// Take the highest-scoring candidate below the target
    NearestInferior,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "no_match" | "none" => Ok(FallbackPolicy::NoMatch),
            "nearest_inferior" | "inferior" => Ok(FallbackPolicy::NearestInferior),
            other => Err(format!("unknown fallback policy '{}'", other)),
        }
    }
}

/// Picks the smallest score at or above `target` from ascending `scores`,
/// falling back per `policy`.
///
/// # Returns
/// Index into `scores`.
pub fn select_nearest(scores: &[VariantScore], target: VariantScore, policy: FallbackPolicy) -> Option<usize> {
    let index = scores.partition_point(|score| *score < target);
    if index < scores.len() {
        return Some(index);
    }
    match policy {
        FallbackPolicy::NoMatch => None,
        FallbackPolicy::NearestInferior => scores.len().checked_sub(1),
    }
}

/// Known variants of one family, kept sorted by score.
#[derive(Debug, Clone)]
pub struct VariantMatcher<O, T> {
    ordering: O,
    policy: FallbackPolicy,
    scores: Vec<VariantScore>,
    entries: Vec<(OptionVector, T)>,
}

impl<O: VariantOrdering, T> VariantMatcher<O, T> {
    pub fn new(ordering: O, policy: FallbackPolicy) -> Self {
        Self {
            ordering,
            policy,
            scores: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn ordering(&self) -> &O {
        &self.ordering
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a candidate.
    ///
    /// # Returns
    /// The candidate's score, or the encoding error when its options cannot
    /// be compared. Such candidates are not added.
    pub fn insert(&mut self, options: OptionVector, value: T) -> Result<VariantScore> {
        let score = encode(&options, &self.ordering)?;
        // After equal scores, so the first inserted wins ties
        let index = self.scores.partition_point(|existing| *existing <= score);
        self.scores.insert(index, score);
        self.entries.insert(index, (options, value));
        Ok(score)
    }

    /// Candidates in ascending score order.
    pub fn candidates(&self) -> impl Iterator<Item = (VariantScore, &OptionVector, &T)> {
        self.scores
            .iter()
            .zip(&self.entries)
            .map(|(score, (options, value))| (*score, options, value))
    }

    /// Finds the closest candidate for a score.
    pub fn find_score(&self, target: VariantScore) -> Option<(VariantScore, &OptionVector, &T)> {
        let index = select_nearest(&self.scores, target, self.policy)?;
        let (options, value) = &self.entries[index];
        Some((self.scores[index], options, value))
    }

    /// Finds the closest candidate for an option vector: an exact score
    /// when one exists, else the smallest score above it, else the
    /// fallback.
    ///
    /// # Returns
    /// `Err` when the target itself cannot be encoded.
    pub fn find(&self, target: &OptionVector) -> Result<Option<(VariantScore, &OptionVector, &T)>> {
        let score = encode(target, &self.ordering)?;
        let found = self.find_score(score);
        match &found {
            Some((chosen, options, _)) => tracing::debug!(
                "Target {} (score {}) matched {} (score {})",
                target,
                score,
                options,
                chosen
            ),
            None => tracing::debug!("Target {} (score {}) has no match", target, score),
        }
        Ok(found)
    }
}

impl<O: VariantOrdering> VariantMatcher<O, String> {
    /// Builds a matcher from template paths. Names that do not parse or
    /// carry unranked options are left out.
    pub fn from_template_names<I, S>(ordering: O, policy: FallbackPolicy, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = Self::new(ordering, policy);
        for name in names {
            let name = name.as_ref();
            let result = OptionVector::from_template_name(name)
                .and_then(|options| matcher.insert(options, name.to_string()));
            if let Err(e) = result {
                tracing::trace!("Excluding template {}: {}", name, e);
            }
        }
        matcher
    }
}
