/// One materialized record.
///
/// Files read with a header produce `Mapped` rows keyed by the deduplicated
/// header names, in source column order; headerless files produce
/// `Positional` rows. A blank physical line materializes as `Empty`, which
/// is a present, countable row rather than an error or an end marker.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Row {
    Empty,
    Positional(Vec<String>),
    Mapped(Vec<(String, String)>),
}

impl Row {
    /// Looks a field up by header key. Always `None` on non-mapped rows.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            Row::Mapped(pairs) => pairs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Looks a field up by column position.
    pub fn field(&self, index: usize) -> Option<&str> {
        match self {
            Row::Empty => None,
            Row::Positional(fields) => fields.get(index).map(String::as_str),
            Row::Mapped(pairs) => pairs.get(index).map(|(_, value)| value.as_str()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Row::Empty => 0,
            Row::Positional(fields) => fields.len(),
            Row::Mapped(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies the header mapping to a raw field sequence.
pub(crate) fn materialize(fields: Vec<String>, headers: &[String]) -> Row {
    if fields.is_empty() {
        return Row::Empty;
    }
    if headers.is_empty() {
        return Row::Positional(fields);
    }
    let pairs = fields
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let key = match headers.get(position) {
                Some(name) => name.clone(),
                // Columns past the header fall back to positional keys,
                // mirroring the header-absent case.
                None => position.to_string(),
            };
            (key, value)
        })
        .collect();
    Row::Mapped(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn mapped_by_headers() {
        let headers = strings(&["id", "name"]);
        let row = materialize(strings(&["1", "ann"]), &headers);
        assert_eq!(row.get("id"), Some("1"));
        assert_eq!(row.get("name"), Some("ann"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.field(1), Some("ann"));
    }

    #[test]
    fn extra_columns_keyed_by_position() {
        let headers = strings(&["id"]);
        let row = materialize(strings(&["1", "spill"]), &headers);
        assert_eq!(row.get("1"), Some("spill"));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn positional_without_headers() {
        let row = materialize(strings(&["1", "ann"]), &[]);
        assert_eq!(row, Row::Positional(strings(&["1", "ann"])));
        assert_eq!(row.field(0), Some("1"));
        assert_eq!(row.get("0"), None);
    }

    #[test]
    fn blank_line_is_empty_row() {
        let row = materialize(Vec::new(), &strings(&["id"]));
        assert_eq!(row, Row::Empty);
        assert!(row.is_empty());
    }
}
