//! Filter policies

use super::{PolicyResult, Rejection};
use crate::types::Filter;

/// Reject filters with more than two tag constraints once the filter
/// names more than four tags and kinds combined
pub fn no_complex_filters(filter: &Filter) -> PolicyResult {
    let items = filter.tags.len() + filter.kinds.len();

    if items > 4 && filter.tags.len() > 2 {
        return Err(Rejection::new("too many things to filter for"));
    }
    Ok(())
}

/// Reject filters naming no tag value, kind, author, or id
///
/// Time bounds and limits alone do not count: such a filter would match
/// every stored event.
pub fn no_empty_filters(filter: &Filter) -> PolicyResult {
    let items =
        filter.kinds.len() + filter.ids.len() + filter.authors.len() + filter.tag_value_count();

    if items == 0 {
        return Err(Rejection::new("can't handle empty filters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_empty_filters() {
        assert!(no_empty_filters(&Filter::default()).is_err());
        assert!(no_empty_filters(&Filter::new().since(10).limit(5)).is_err());

        let values: [&str; 0] = [];
        assert!(no_empty_filters(&Filter::new().tag("e", values)).is_err());

        assert!(no_empty_filters(&Filter::new().kinds([1])).is_ok());
        assert!(no_empty_filters(&Filter::new().authors(["ab"])).is_ok());
        assert!(no_empty_filters(&Filter::new().tag("e", ["abc"])).is_ok());
    }

    #[test]
    fn test_no_complex_filters() {
        let simple = Filter::new().kinds([1, 2, 3, 4, 5]).tag("e", ["a"]);
        assert!(no_complex_filters(&simple).is_ok());

        let complex = Filter::new()
            .kinds([1, 2])
            .tag("e", ["a"])
            .tag("p", ["b"])
            .tag("t", ["c"]);
        assert_eq!(
            no_complex_filters(&complex).unwrap_err().reason(),
            "too many things to filter for"
        );

        let three_tags = Filter::new().tag("e", ["a"]).tag("p", ["b"]).tag("t", ["c"]);
        assert!(no_complex_filters(&three_tags).is_ok());
    }
}
