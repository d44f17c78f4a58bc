//! Ordering of version buckets.

/// Preference used when a document has no `version_definitions.order`
pub const DEFAULT_VERSION_PREFERENCE: [&str; 6] =
    ["MVP", "Release1", "Release2", "v1.0", "v2.0", "Future"];

pub fn default_version_preference() -> Vec<String> {
    DEFAULT_VERSION_PREFERENCE.iter().map(|v| v.to_string()).collect()
}

/// Order distinct version labels: labels listed in `preference` come first,
/// in that order; the rest follow sorted lexicographically.
pub fn order_versions<'a, I>(labels: I, preference: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut known: Vec<(usize, &str)> = Vec::new();
    let mut unknown: Vec<&str> = Vec::new();

    for label in labels {
        if known.iter().any(|(_, l)| *l == label) || unknown.contains(&label) {
            continue;
        }
        match preference.iter().position(|p| p == label) {
            Some(rank) => known.push((rank, label)),
            None => unknown.push(label),
        }
    }

    known.sort();
    unknown.sort();

    known
        .into_iter()
        .map(|(_, label)| label)
        .chain(unknown)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_then_lexicographic() {
        let preference = default_version_preference();
        let ordered = order_versions(
            ["Zeta", "Release1", "Alpha", "MVP", "Release1", "Future"],
            &preference,
        );
        assert_eq!(ordered, vec!["MVP", "Release1", "Future", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_explicit_order_overrides_default() {
        let preference = vec!["Release1".to_string(), "MVP".to_string()];
        let ordered = order_versions(["MVP", "Release1", "v2.0"], &preference);
        assert_eq!(ordered, vec!["Release1", "MVP", "v2.0"]);
    }
}
