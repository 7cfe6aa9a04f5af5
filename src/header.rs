use std::collections::HashMap;

/// Turns raw header fields into unique mapping keys.
///
/// Names shared by more than one column get an ascending numeric suffix
/// appended to their trimmed text, in column order, so `a,a,b` resolves to
/// `a0,a1,b`. Unique names pass through untouched.
pub(crate) fn dedup(raw: Vec<String>) -> Vec<String> {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for name in &raw {
        *occurrences.entry(name.as_str()).or_insert(0) += 1;
    }
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();
    raw.iter()
        .map(|name| {
            if occurrences[name.as_str()] > 1 {
                let suffix = next_suffix.entry(name.as_str()).or_insert(0);
                let key = format!("{}{}", name.trim(), suffix);
                *suffix += 1;
                key
            } else {
                name.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::dedup;

    fn dedup_strs(raw: &[&str]) -> Vec<String> {
        dedup(raw.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn unique_names_untouched() {
        assert_eq!(dedup_strs(&["id", "name", "description"]), ["id", "name", "description"]);
    }

    #[test]
    fn duplicates_suffixed_in_column_order() {
        assert_eq!(dedup_strs(&["a", "a", "b"]), ["a0", "a1", "b"]);
    }

    #[test]
    fn independent_counters_per_name() {
        assert_eq!(dedup_strs(&["a", "b", "a", "b", "c"]), ["a0", "b0", "a1", "b1", "c"]);
    }

    #[test]
    fn suffix_applies_to_trimmed_text() {
        assert_eq!(dedup_strs(&[" a ", " a "]), ["a0", "a1"]);
    }

    #[test]
    fn empty_header_stays_empty() {
        assert_eq!(dedup_strs(&[]), Vec::<String>::new());
    }
}
