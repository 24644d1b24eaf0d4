//! Fuzzy-match suggestions used when a name fails to resolve (e.g. an
//! unresolved PDA seed path, §4.7, or an unknown `defined` type reference).

use strsim::levenshtein;

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub candidate: String,
    pub distance: usize,
}

/// Returns the closest candidate by edit distance, if any candidate is
/// within a reasonable distance of `needle`.
pub fn suggest(needle: &str, candidates: impl IntoIterator<Item = impl AsRef<str>>) -> Option<Suggestion> {
    candidates
        .into_iter()
        .map(|c| {
            let candidate = c.as_ref().to_string();
            let distance = levenshtein(needle, &candidate);
            Suggestion { candidate, distance }
        })
        .min_by_key(|s| s.distance)
        .filter(|s| s.distance <= (needle.len() / 2).max(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_closest_name() {
        let names = vec!["owner", "vault", "authority"];
        let s = suggest("ownr", names).unwrap();
        assert_eq!(s.candidate, "owner");
    }

    #[test]
    fn no_suggestion_when_too_far() {
        let names = vec!["owner", "vault"];
        assert!(suggest("zzzzzzzzzz", names).is_none());
    }
}
