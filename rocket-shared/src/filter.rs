use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A multi-field predicate over records of type `R`.
///
/// Implementors hold one list of acceptable values per field. An empty list
/// leaves its field unconstrained; a populated list matches when the record
/// matches any one of its values. Identifier fields are not part of
/// [`FieldFilter::matches`]: they choose the candidate set up front (see
/// [`candidates`]).
pub trait FieldFilter<R> {
    /// True when no field, identifiers included, is populated.
    fn is_unconstrained(&self) -> bool;

    /// AND across every populated non-identifier field.
    fn matches(&self, record: &R) -> bool;
}

/// Case-insensitive exact comparison.
pub fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Field rule for free text: unconstrained when `requested` is empty,
/// otherwise any requested value must fold-equal `value`.
pub fn matches_text(requested: &[String], value: &str) -> bool {
    requested.is_empty() || requested.iter().any(|r| eq_fold(r, value))
}

/// Field rule for enumerated values.
pub fn matches_exact<T: PartialEq>(requested: &[T], value: &T) -> bool {
    requested.is_empty() || requested.contains(value)
}

/// Field rule for tag sets: at least one record tag must fold-equal at least
/// one requested tag.
pub fn matches_tags(requested: &[String], tags: &[String]) -> bool {
    requested.is_empty()
        || requested
            .iter()
            .any(|wanted| tags.iter().any(|tag| eq_fold(wanted, tag)))
}

/// Identifier pre-filter.
///
/// With no ids every record is a candidate. Otherwise the candidates are
/// exactly the records stored under the requested ids, in request order; an
/// unknown id contributes nothing and a repeated id contributes once.
pub fn candidates<'a, K, V, Q>(records: &'a HashMap<K, V>, ids: &[Q]) -> Vec<&'a V>
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq,
{
    if ids.is_empty() {
        return records.values().collect();
    }

    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| records.get(id))
        .collect()
}

/// Applies `filter` to `candidates`, returning owned copies of the matches.
pub fn select<'a, R, F>(candidates: impl IntoIterator<Item = &'a R>, filter: &F) -> Vec<R>
where
    R: Clone + 'a,
    F: FieldFilter<R>,
{
    if filter.is_unconstrained() {
        return candidates.into_iter().cloned().collect();
    }
    candidates
        .into_iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Widget {
        name: String,
        tags: Vec<String>,
    }

    #[derive(Default)]
    struct WidgetFilter {
        ids: Vec<String>,
        names: Vec<String>,
        tags: Vec<String>,
    }

    impl FieldFilter<Widget> for WidgetFilter {
        fn is_unconstrained(&self) -> bool {
            self.ids.is_empty() && self.names.is_empty() && self.tags.is_empty()
        }

        fn matches(&self, record: &Widget) -> bool {
            matches_text(&self.names, &record.name) && matches_tags(&self.tags, &record.tags)
        }
    }

    fn widgets() -> HashMap<String, Widget> {
        let mut map = HashMap::new();
        map.insert(
            "a".to_string(),
            Widget { name: "Nozzle".into(), tags: vec!["Heavy".into(), "steel".into()] },
        );
        map.insert(
            "b".to_string(),
            Widget { name: "Valve".into(), tags: vec!["light".into()] },
        );
        map
    }

    #[test]
    fn test_eq_fold() {
        assert!(eq_fold("Engine", "eNGINE"));
        assert!(!eq_fold("engine", "engines"));
    }

    #[test]
    fn test_text_match_is_exact_not_substring() {
        let requested = vec!["noz".to_string()];
        assert!(!matches_text(&requested, "Nozzle"));
        assert!(matches_text(&[], "anything"));
    }

    #[test]
    fn test_candidates_prefilter() {
        let map = widgets();
        let ids = vec!["b".to_string(), "missing".to_string(), "b".to_string()];
        let found = candidates(&map, &ids);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Valve");

        assert_eq!(candidates::<_, _, String>(&map, &[]).len(), 2);
    }

    #[test]
    fn test_select_and_across_fields() {
        let map = widgets();
        let filter = WidgetFilter {
            names: vec!["nozzle".into(), "valve".into()],
            tags: vec!["HEAVY".into()],
            ..Default::default()
        };
        let result = select(candidates(&map, &filter.ids), &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Nozzle");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let map = widgets();
        let filter = WidgetFilter::default();
        assert_eq!(select(candidates(&map, &filter.ids), &filter).len(), 2);
    }
}
