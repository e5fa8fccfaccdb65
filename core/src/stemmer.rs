//! Rule-based English stemmer tuned for the cooking and fitness vocabulary of the corpus.
//!
//! Two layers, tried in order:
//!
//! 1. A closed table of irregular surface forms and their roots (`"better" -> "good"`).
//! 2. Generic suffix stripping (`-ies`, `-ied`, `-ing`, `-ed`, `-s`) with a minimum
//!    length guard on each rule so short words are left alone.
//!
//! A generic strip is only kept when its output is already a fixpoint of [`stem`]
//! (or an irregular form, which then resolves to its root). This makes stemming
//! idempotent: `stem(stem(w)) == stem(w)` for every `w`.
//!
//! [`variations`] walks the table in the other direction to expand a query term
//! into every surface form that shares its root.

use lazy_static::lazy_static;
use std::collections::{BTreeSet, HashMap};

/// Irregular surface form -> root. Every root is itself a fixpoint of [`stem`],
/// either because no suffix rule touches it or because it maps to itself here.
pub const IRREGULAR_FORMS: &[(&str, &str)] = &[
    // baking
    ("baking", "bake"),
    ("baked", "bake"),
    ("bakes", "bake"),
    ("baker", "bake"),
    // cooking
    ("cooking", "cook"),
    ("cooked", "cook"),
    ("cooks", "cook"),
    ("preparing", "prepare"),
    ("prepared", "prepare"),
    ("serving", "serve"),
    ("served", "serve"),
    ("servings", "serve"),
    ("making", "make"),
    ("made", "make"),
    ("taking", "take"),
    ("took", "take"),
    ("taken", "take"),
    ("using", "use"),
    ("used", "use"),
    // eating
    ("ate", "eat"),
    ("eaten", "eat"),
    ("eating", "eat"),
    ("eats", "eat"),
    ("bought", "buy"),
    ("went", "go"),
    ("gone", "go"),
    ("going", "go"),
    // food
    ("recipes", "recipe"),
    ("meals", "meal"),
    ("dishes", "dish"),
    ("lunches", "lunch"),
    ("vegetables", "vegetable"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("leaves", "leaf"),
    ("knives", "knife"),
    ("calories", "calorie"),
    ("cookies", "cookie"),
    ("nutrition", "nutrient"),
    ("nutritional", "nutrient"),
    ("nutritious", "nutrient"),
    ("nutrients", "nutrient"),
    // fitness
    ("running", "run"),
    ("ran", "run"),
    ("runs", "run"),
    ("runner", "run"),
    ("swimming", "swim"),
    ("swam", "swim"),
    ("exercises", "exercise"),
    ("exercising", "exercise"),
    ("exercised", "exercise"),
    ("workouts", "workout"),
    ("fitter", "fit"),
    ("fittest", "fit"),
    // comparatives
    ("better", "good"),
    ("best", "good"),
    ("healthier", "healthy"),
    ("healthiest", "healthy"),
    ("easier", "easy"),
    ("easiest", "easy"),
    ("stronger", "strong"),
    ("strongest", "strong"),
    // people
    ("children", "child"),
    ("people", "person"),
    // roots the suffix rules would over-strip ("thing" -> "th"), mapped to themselves
    ("thing", "thing"),
    ("things", "thing"),
    ("need", "need"),
    ("needs", "need"),
    ("needed", "need"),
    ("needing", "need"),
    ("bring", "bring"),
    ("brings", "bring"),
    ("bringing", "bring"),
];

/// Final consonants that get collapsed after stripping `-ing` / `-ed` (`runn` -> `run`).
const DOUBLED_CONSONANTS: &[char] = &['b', 'd', 'f', 'g', 'k', 'l', 'm', 'n', 'p', 'r', 't', 'v'];

lazy_static! {
    static ref IRREGULAR: HashMap<&'static str, &'static str> = IRREGULAR_FORMS.iter().copied().collect();
}

/// Canonical root of `word`. Case-insensitive and total.
pub fn stem(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some(root) = IRREGULAR.get(lower.as_str()) {
        return (*root).to_string();
    }
    let Some(candidate) = strip_suffix(&lower) else {
        return lower;
    };
    if let Some(root) = IRREGULAR.get(candidate.as_str()) {
        return (*root).to_string();
    }
    if stem(&candidate) == candidate {
        candidate
    } else {
        lower
    }
}

/// The lowercased word, its stem, and every irregular pair touching either of them.
pub fn variations(word: &str) -> BTreeSet<String> {
    let lower = word.to_lowercase();
    let root = stem(&lower);
    let mut out = BTreeSet::new();
    for (surface, irregular_root) in IRREGULAR_FORMS {
        let related = [root.as_str(), lower.as_str()]
            .iter()
            .any(|w| w == surface || w == irregular_root);
        if related {
            out.insert((*surface).to_string());
            out.insert((*irregular_root).to_string());
        }
    }
    out.insert(lower);
    out.insert(root);
    out
}

/// First generic rule that applies, or `None` when the word has no strippable suffix.
fn strip_suffix(word: &str) -> Option<String> {
    let len = word.chars().count();
    if len > 4 && (word.ends_with("ies") || word.ends_with("ied")) {
        return Some(format!("{}y", &word[..word.len() - 3]));
    }
    if len > 4 && word.ends_with("ing") {
        return Some(collapse_double(&word[..word.len() - 3]));
    }
    if len > 3 && word.ends_with("ed") {
        return Some(collapse_double(&word[..word.len() - 2]));
    }
    if len > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return Some(word[..word.len() - 1].to_string());
    }
    None
}

fn collapse_double(base: &str) -> String {
    let mut chars = base.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a == b && DOUBLED_CONSONANTS.contains(&a) => {
            base[..base.len() - a.len_utf8()].to_string()
        }
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_rules() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("flies"), "fly");
        assert_eq!(stem("carried"), "carry");
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("hopped"), "hop");
        assert_eq!(stem("glass"), "glass");
    }

    #[test]
    fn irregular_table_wins() {
        assert_eq!(stem("baking"), "bake");
        assert_eq!(stem("baked"), "bake");
        assert_eq!(stem("better"), "good");
        assert_eq!(stem("Nutrition"), "nutrient");
    }

    #[test]
    fn short_words_are_guarded() {
        assert_eq!(stem("ties"), "tie");
        assert_eq!(stem("bus"), "bus");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("bed"), "bed");
    }

    #[test]
    fn stripped_irregular_form_chains_to_root() {
        assert_eq!(stem("runners"), "run");
        assert_eq!(stem("bakers"), "bake");
    }

    #[test]
    fn over_stripping_is_refused() {
        // "feed" would strip again to "fe", so "feeds" keeps its surface form.
        assert_eq!(stem("feeds"), "feeds");
    }

    #[test]
    fn self_mapped_roots_keep_their_family() {
        assert_eq!(stem("things"), "thing");
        assert_eq!(stem("thing"), "thing");
        assert_eq!(stem("needed"), "need");
        let v = variations("thing");
        assert!(v.contains("things"));
    }

    #[test]
    fn every_root_is_a_fixpoint() {
        for (surface, root) in IRREGULAR_FORMS {
            assert_eq!(stem(root), *root, "root of {surface} is not stable");
            if let Some(mapped) = IRREGULAR.get(root) {
                assert_eq!(mapped, root, "{root} is also listed as a surface form of {mapped}");
            }
        }
    }

    #[test]
    fn variations_include_siblings() {
        let v = variations("recipe");
        assert!(v.contains("recipe"));
        assert!(v.contains("recipes"));

        let v = variations("Baking");
        for w in ["baking", "bake", "baked", "bakes", "baker"] {
            assert!(v.contains(w), "missing {w}");
        }
    }

    #[test]
    fn generic_stems_have_no_extra_siblings() {
        let v = variations("flies");
        assert_eq!(v.into_iter().collect::<Vec<_>>(), vec!["flies", "fly"]);
    }
}
