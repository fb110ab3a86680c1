//! Contact records as loaded from the input table.

use crate::error::AppError;

/// One contact row: column name to cell text, in header order.
///
/// Empty cells are stored as empty strings, so every column of the sheet is
/// present in every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Looks up a column's value.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Like [`Record::get`], but treats blank cells as missing.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// All contacts of an input file plus its (normalized) header.
#[derive(Debug, Clone, Default)]
pub struct ContactSheet {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl ContactSheet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every column paired with its value in the first record, for the
    /// placeholder listing. Samples are empty when the sheet has no rows.
    pub fn samples(&self) -> Vec<(&str, &str)> {
        let first = self.records.first();
        self.columns
            .iter()
            .map(|column| {
                let sample = first.and_then(|r| r.get(column)).unwrap_or("");
                (column.as_str(), sample)
            })
            .collect()
    }

    /// Fails with [`AppError::MissingColumns`] if any `required` column is absent.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), AppError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.columns.iter().any(|c| c == *name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingColumns {
                missing,
                available: self.columns.clone(),
            })
        }
    }

    /// Drops rows with a blank `column` cell.
    pub fn retain_non_empty(&mut self, column: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.non_empty(column).is_some());
        before - self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> ContactSheet {
        ContactSheet {
            columns: vec!["celular".into(), "club".into()],
            records: vec![
                Record::from_iter([("celular", "0991234567"), ("club", "Andes")]),
                Record::from_iter([("celular", "  "), ("club", "Sierra")]),
            ],
        }
    }

    #[test]
    fn get_distinguishes_missing_from_empty() {
        let record = Record::from_iter([("club", "")]);
        assert_eq!(record.get("club"), Some(""));
        assert_eq!(record.non_empty("club"), None);
        assert_eq!(record.get("other"), None);
    }

    #[test]
    fn samples_come_from_first_record() {
        assert_eq!(
            sheet().samples(),
            vec![("celular", "0991234567"), ("club", "Andes")]
        );
    }

    #[test]
    fn require_columns_reports_missing_and_available() {
        let err = sheet().require_columns(&["celular", "dir"]).unwrap_err();
        match err {
            AppError::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["dir".to_string()]);
                assert_eq!(available, vec!["celular".to_string(), "club".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn retain_non_empty_drops_blank_phones() {
        let mut sheet = sheet();
        assert_eq!(sheet.retain_non_empty("celular"), 1);
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.records[0].get("club"), Some("Andes"));
    }
}
