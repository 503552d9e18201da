//! Outcome pool and the two-stage (kind, then weight) selector.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Text shown when there is nothing to choose from.
pub const EMPTY_POOL_TEXT: &str = "…";

/// Category of an answer; selection is uniform across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Yes,
    No,
    Inconclusive,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 3] = [Self::Yes, Self::No, Self::Inconclusive];

    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Inconclusive => "inconclusive",
        }
    }

    /// Lenient parse used by the config and CSV loaders.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "positive" => Some(Self::Yes),
            "no" | "n" | "negative" => Some(Self::No),
            "inconclusive" | "maybe" | "neutral" | "unknown" => Some(Self::Inconclusive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub text: String,
    pub weight: u32,
    #[serde(rename = "type")]
    pub kind: OutcomeKind,
}

impl Outcome {
    pub fn new(text: impl Into<String>, weight: u32, kind: OutcomeKind) -> Self {
        Self {
            text: text.into(),
            weight: weight.max(1),
            kind,
        }
    }

    fn effective_weight(&self) -> u64 {
        u64::from(self.weight.max(1))
    }
}

/// Fallback pool used when neither the config nor the CSV provides outcomes.
pub fn default_outcomes() -> Vec<Outcome> {
    vec![
        Outcome::new("Yes", 10, OutcomeKind::Yes),
        Outcome::new("No", 10, OutcomeKind::No),
        Outcome::new("Reply hazy, try again", 5, OutcomeKind::Inconclusive),
    ]
}

/// Pick an outcome: drop the last-shown text (unless that empties the pool),
/// choose a kind uniformly among the kinds left, then choose by weight within it.
pub fn choose_outcome<'a, R: Rng + ?Sized>(
    pool: &'a [Outcome],
    last_text: Option<&str>,
    rng: &mut R,
) -> Option<&'a Outcome> {
    let mut candidates: Vec<&Outcome> = match last_text {
        Some(last) => pool.iter().filter(|o| o.text != last).collect(),
        None => pool.iter().collect(),
    };
    if candidates.is_empty() {
        candidates = pool.iter().collect();
    }
    if candidates.is_empty() {
        return None;
    }

    let kinds: Vec<OutcomeKind> = OutcomeKind::ALL
        .into_iter()
        .filter(|kind| candidates.iter().any(|o| o.kind == *kind))
        .collect();
    let kind = kinds[rng.gen_range(0..kinds.len())];
    let within: Vec<&Outcome> = candidates.into_iter().filter(|o| o.kind == kind).collect();

    let total: u64 = within.iter().map(|o| o.effective_weight()).sum();
    let r = rng.gen_range(0..total);
    let mut upto = 0u64;
    for outcome in &within {
        upto += outcome.effective_weight();
        if r < upto {
            return Some(outcome);
        }
    }
    within.last().copied()
}
