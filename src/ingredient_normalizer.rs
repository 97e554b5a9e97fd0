//! # Ingredient Name Normalizer
//!
//! Canonicalizes authored ingredient names so the shopping-list aggregator
//! can merge the same item across recipes: "Fresh spinach (washed)",
//! "spinach, chopped" and "SPINACH" all normalize to "spinach".
//!
//! One pipeline, applied in a fixed order:
//!
//! 1. lowercase
//! 2. strip parenthetical text
//! 3. cut trailing qualifiers after the first comma or spaced dash
//! 4. drop descriptor and preparation words ("fresh", "large", "diced")
//! 5. collapse whitespace and trim stray punctuation
//!
//! This is deliberately lossy: "red onion" and "onion" stay distinct, but
//! "finely diced onion" merges with "onion". Quantities are never touched
//! here; the aggregator owns amounts.

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

lazy_static! {
    /// Parenthetical asides: "(about 2 cups)", "(optional)"
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)").expect("parenthetical pattern should be valid");
    /// Trailing qualifier after a comma or a spaced dash:
    /// "chicken breast, cubed", "tofu - extra firm"
    static ref TRAILING_QUALIFIER: Regex =
        Regex::new(r"\s*(?:,|\s[-–]\s).*$").expect("qualifier pattern should be valid");
    /// Whitespace runs
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern should be valid");
}

/// Size, state and quality descriptors dropped from names.
const DESCRIPTOR_WORDS: [&str; 22] = [
    "fresh", "organic", "large", "small", "medium", "extra", "raw", "ripe", "washed", "baby",
    "boneless", "skinless", "lean", "unsalted", "unsweetened", "plain", "light", "low-fat",
    "reduced-fat", "fat-free", "low-sodium", "free-range",
];

/// Preparation verbs dropped from names.
const PREPARATION_WORDS: [&str; 18] = [
    "chopped", "diced", "minced", "sliced", "grated", "shredded", "crushed", "peeled", "trimmed",
    "cooked", "beaten", "melted", "softened", "drained", "rinsed", "divided", "halved", "cubed",
];

/// Adverbs that only ever modify a preparation word.
const PREPARATION_ADVERBS: [&str; 5] = ["finely", "thinly", "roughly", "coarsely", "freshly"];

/// Connective noise left behind once descriptors are gone.
const NOISE_WORDS: [&str; 3] = ["of", "the", "a"];

/// Normalize one authored ingredient name to its canonical form.
///
/// Returns the trimmed lowercase input unchanged if normalization would
/// empty the name entirely (e.g. a name that is all descriptors).
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return lowered;
    }

    let without_parens = PARENTHETICAL.replace_all(&lowered, " ");
    let without_qualifier = TRAILING_QUALIFIER.replace(&without_parens, "");

    let kept: Vec<&str> = without_qualifier
        .split_whitespace()
        .filter(|word| {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
            !DESCRIPTOR_WORDS.contains(&bare)
                && !PREPARATION_WORDS.contains(&bare)
                && !PREPARATION_ADVERBS.contains(&bare)
                && !NOISE_WORDS.contains(&bare)
        })
        .collect();

    let joined = kept.join(" ");
    let cleaned = joined
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string();
    let normalized = WHITESPACE.replace_all(&cleaned, " ").to_string();

    if normalized.is_empty() {
        trace!("Normalization emptied '{raw}'; keeping lowercase original");
        return WHITESPACE.replace_all(lowered.trim(), " ").to_string();
    }

    trace!("Normalized ingredient name '{raw}' -> '{normalized}'");
    normalized
}
