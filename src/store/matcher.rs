//! Event matching
//!
//! A pure predicate deciding whether one event satisfies one filter.
//! Dimensions are combined with AND; the values inside one dimension
//! are combined with OR.

use crate::types::{Event, Filter, ID_HEX_LEN};

/// Check whether `event` satisfies every non-empty dimension of `filter`
pub fn matches(event: &Event, filter: &Filter) -> bool {
    if let Some(since) = filter.since {
        if event.created_at < since {
            return false;
        }
    }
    if let Some(until) = filter.until {
        if event.created_at > until {
            return false;
        }
    }

    if !filter.kinds.is_empty() && !filter.kinds.contains(&event.kind) {
        return false;
    }

    if !matches_identifier(&event.id, &filter.ids) {
        return false;
    }

    if !matches_identifier(&event.pubkey, &filter.authors) {
        return false;
    }

    filter.tags.iter().all(|(name, values)| {
        values.is_empty()
            || event
                .tag_values(name)
                .any(|value| values.iter().any(|v| v == value))
    })
}

/// Exact-or-prefix identifier match
///
/// A candidate shorter than the canonical length matches as a prefix.
/// Empty candidates are ignored, and a dimension holding only empty
/// candidates does not constrain the match.
fn matches_identifier(identifier: &str, candidates: &[String]) -> bool {
    let mut constrained = false;

    for candidate in candidates.iter().filter(|c| !c.is_empty()) {
        constrained = true;
        if candidate == identifier
            || (candidate.len() < ID_HEX_LEN && identifier.starts_with(candidate.as_str()))
        {
            return true;
        }
    }

    !constrained
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_id(fill: char) -> String {
        fill.to_string().repeat(ID_HEX_LEN)
    }

    fn sample_event() -> Event {
        Event::new(
            format!("abcd{}", "0".repeat(ID_HEX_LEN - 4)),
            format!("f00d{}", "1".repeat(ID_HEX_LEN - 4)),
            1000,
            1,
            "hello",
        )
        .with_tag(["e", "abc"])
        .with_tag(["p", "xyz"])
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(matches(&sample_event(), &Filter::default()));
        assert!(matches(&Event::new("", "", i64::MIN, 0, ""), &Filter::default()));
    }

    #[test]
    fn test_time_bounds() {
        let event = sample_event();
        assert!(matches(&event, &Filter::new().since(999).until(1001)));
        assert!(matches(&event, &Filter::new().since(1000).until(1000)));
        assert!(!matches(&event, &Filter::new().since(1001)));
        assert!(!matches(&event, &Filter::new().until(999)));
    }

    #[test]
    fn test_kinds() {
        let event = sample_event();
        assert!(matches(&event, &Filter::new().kinds([0, 1])));
        assert!(!matches(&event, &Filter::new().kinds([7])));
    }

    #[test]
    fn test_id_prefix_match() {
        let event = sample_event();
        assert!(matches(&event, &Filter::new().ids(["ab"])));
        assert!(matches(&event, &Filter::new().ids(["zz", "abcd"])));
        assert!(!matches(&event, &Filter::new().ids(["abce"])));
    }

    #[test]
    fn test_full_length_id_requires_exact_match() {
        let event = sample_event();
        assert!(matches(&event, &Filter::new().ids([event.id.clone()])));

        // Same length, differs in the last character
        let mut other = event.id.clone();
        other.pop();
        other.push('9');
        assert!(!matches(&event, &Filter::new().ids([other])));
    }

    #[test]
    fn test_longer_filter_value_never_matches_as_prefix() {
        let event = Event::new("abc", "pk", 0, 1, "");
        assert!(!matches(&event, &Filter::new().ids(["abcd"])));
    }

    #[test]
    fn test_author_prefix_match() {
        let event = sample_event();
        assert!(matches(&event, &Filter::new().authors(["f00d"])));
        assert!(matches(&event, &Filter::new().authors([event.pubkey.clone()])));
        assert!(!matches(&event, &Filter::new().authors([hex_id('f')])));
        assert!(!matches(&event, &Filter::new().authors(["beef"])));
    }

    #[test]
    fn test_empty_identifier_values_are_ignored() {
        let event = sample_event();
        assert!(matches(&event, &Filter::new().ids([""])));
        assert!(matches(&event, &Filter::new().authors(["", ""])));
        // An empty value does not widen an otherwise failing dimension
        assert!(!matches(&event, &Filter::new().ids(["", "beef"])));
    }

    #[test]
    fn test_tag_match() {
        let event = sample_event();
        assert!(matches(&event, &Filter::new().tag("e", ["abc", "def"])));
        assert!(!matches(&event, &Filter::new().tag("e", ["zzz"])));
        assert!(matches(
            &event,
            &Filter::new().tag("e", ["abc"]).tag("p", ["xyz"])
        ));
        assert!(!matches(
            &event,
            &Filter::new().tag("e", ["abc"]).tag("p", ["nope"])
        ));
    }

    #[test]
    fn test_tag_with_empty_values_does_not_constrain() {
        let event = sample_event();
        let values: [&str; 0] = [];
        assert!(matches(&event, &Filter::new().tag("t", values)));
    }

    #[test]
    fn test_tag_name_must_match() {
        let event = sample_event();
        assert!(!matches(&event, &Filter::new().tag("p", ["abc"])));
    }

    #[test]
    fn test_all_dimensions_combined() {
        let event = sample_event();
        let filter = Filter::new()
            .ids(["abcd"])
            .authors(["f00d"])
            .kinds([1])
            .since(1000)
            .until(2000)
            .tag("e", ["abc"]);
        assert!(matches(&event, &filter));
        assert!(!matches(&event, &filter.clone().kinds([2])));
    }
}
