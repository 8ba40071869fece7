use football_api::TeamId;

/// Which tier of the fallback chain produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Prefix,
    Contains,
}

/// Canonical form used for every cache key and every lookup: lower-case,
/// ASCII letters/digits/spaces only, trimmed.
///
/// "FC Arsenal!" and "fc arsenal" both become "fc arsenal". Non-ASCII letters
/// are dropped rather than transliterated, so "Bayern München" becomes
/// "bayern mnchen" on both the roster side and the input side.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Prefix pass, then substring pass, over `candidates` in iteration order.
/// The first hit of the earlier pass wins.
pub fn first_partial<'a, I>(candidates: I, input: &str) -> Option<(MatchKind, TeamId)>
where
    I: Iterator<Item = (&'a str, TeamId)> + Clone,
{
    if let Some((_, id)) = candidates.clone().find(|(name, _)| name.starts_with(input)) {
        return Some((MatchKind::Prefix, id));
    }
    candidates
        .into_iter()
        .find(|(name, _)| name.contains(input))
        .map(|(_, id)| (MatchKind::Contains, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_and_punctuation() {
        assert_eq!(normalize("FC Arsenal!"), normalize("fc arsenal"));
        assert_eq!(normalize("  Paris Saint-Germain FC "), "paris saintgermain fc");
        assert_eq!(normalize("1. FC Köln"), "1 fc kln");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["Arsenal FC", "  A.S. Roma  ", "Bayern München", "", "!!!", "Ligue 1"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn normalize_keeps_inner_spaces() {
        // Only the ends are trimmed; inner runs survive and must match the
        // roster side, which goes through the same transform.
        assert_eq!(normalize("a  b"), "a  b");
        assert_eq!(normalize("\tInter\n"), "inter");
    }

    #[test]
    fn prefix_pass_runs_before_substring_pass() {
        let entries = [("real madrid cf", 86), ("madrid atletico", 78)];
        let hit = first_partial(entries.iter().map(|(n, id)| (*n, *id)), "madrid");
        assert_eq!(hit, Some((MatchKind::Prefix, 78)));
    }

    #[test]
    fn first_in_iteration_order_wins_within_a_pass() {
        let entries = [("manchester united fc", 66), ("manchester city fc", 65)];
        let hit = first_partial(entries.iter().map(|(n, id)| (*n, *id)), "manchester");
        assert_eq!(hit, Some((MatchKind::Prefix, 66)));

        let hit = first_partial(entries.iter().map(|(n, id)| (*n, *id)), "fc");
        assert_eq!(hit, Some((MatchKind::Contains, 66)));
    }

    #[test]
    fn no_partial_match() {
        let entries = [("arsenal fc", 57)];
        assert_eq!(first_partial(entries.iter().map(|(n, id)| (*n, *id)), "chelsea"), None);
    }
}
