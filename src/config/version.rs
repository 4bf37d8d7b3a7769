//! Version prefix sequencing for version-scoped search directories.

/// Split a dotted version into its cumulative prefixes.
///
/// `"1.2.3"` becomes `["1", "1.2", "1.2.3"]`, in increasing specificity.
/// An empty version yields no prefixes.
pub fn split_version(version: &str, separator: &str) -> Vec<String> {
    if version.is_empty() {
        return Vec::new();
    }
    let parts: Vec<&str> = version.split(separator).collect();
    (1..=parts.len())
        .map(|end| parts[..end].join(separator))
        .collect()
}

/// [`split_version`] with the conventional `.` separator.
pub fn split_version_dotted(version: &str) -> Vec<String> {
    split_version(version, ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_prefixes() {
        assert_eq!(split_version_dotted("1.2.3"), vec!["1", "1.2", "1.2.3"]);
    }

    #[test]
    fn one_element_per_component() {
        for (version, count) in [("1", 1), ("1.2", 2), ("10.20.30.40", 4)] {
            let prefixes = split_version_dotted(version);
            assert_eq!(prefixes.len(), count, "{version}");
            assert_eq!(prefixes.last().map(String::as_str), Some(version));
        }
    }

    #[test]
    fn empty_version_yields_nothing() {
        assert!(split_version_dotted("").is_empty());
    }

    #[test]
    fn custom_separator() {
        assert_eq!(split_version("1-2-3", "-"), vec!["1", "1-2", "1-2-3"]);
    }

    #[test]
    fn order_is_increasing_specificity() {
        let prefixes = split_version_dotted("2.0.1.rc1");
        for pair in prefixes.windows(2) {
            assert!(pair[1].starts_with(pair[0].as_str()));
            assert!(pair[1].len() > pair[0].len());
        }
    }
}
