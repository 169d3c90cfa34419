//! Export-format selection.
//!
//! The `--formats` option takes a comma-separated list; `all` expands to
//! every known format. Validation happens before the build log is even
//! opened, so a typo never leaves half-written artifacts behind.

use crate::error::ConfigError;
use std::collections::BTreeSet;

/// One selectable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportFormat {
    Makefile,
    Codeblocks,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Makefile, ExportFormat::Codeblocks];
}

/// Parses the raw `--formats` values into a set of formats.
///
/// Empty selection and unknown names are both fatal configuration errors.
pub fn parse_formats(values: &[String]) -> Result<BTreeSet<ExportFormat>, ConfigError> {
    let mut formats = BTreeSet::new();
    for value in values {
        let value = value.trim();
        match value {
            "makefile" => {
                formats.insert(ExportFormat::Makefile);
            }
            "codeblocks" => {
                formats.insert(ExportFormat::Codeblocks);
            }
            "all" => {
                formats.extend(ExportFormat::ALL);
            }
            "" => {}
            other => return Err(ConfigError::UnknownFormat(other.to_owned())),
        }
    }
    if formats.is_empty() {
        return Err(ConfigError::NoFormatSelected);
    }
    Ok(formats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_single_formats() {
        let formats = parse_formats(&values(&["makefile"])).unwrap();
        assert!(formats.contains(&ExportFormat::Makefile));
        assert!(!formats.contains(&ExportFormat::Codeblocks));
    }

    #[test]
    fn all_expands_to_every_format() {
        let formats = parse_formats(&values(&["all"])).unwrap();
        assert_eq!(formats.len(), 2);
    }

    #[test]
    fn duplicates_collapse() {
        let formats = parse_formats(&values(&["makefile", "makefile", "all"])).unwrap();
        assert_eq!(formats.len(), 2);
    }

    #[test]
    fn unknown_format_is_fatal() {
        let err = parse_formats(&values(&["ninja"])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFormat(v) if v == "ninja"));
    }

    #[test]
    fn empty_selection_is_fatal() {
        assert!(matches!(
            parse_formats(&[]),
            Err(ConfigError::NoFormatSelected)
        ));
        assert!(matches!(
            parse_formats(&values(&[""])),
            Err(ConfigError::NoFormatSelected)
        ));
    }
}
