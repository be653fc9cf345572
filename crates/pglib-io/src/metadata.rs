//! Case-level scalars stored outside the tables.
//!
//! The table extractor ignores `mpc.` assignments; this scan picks up the few
//! scalar ones worth keeping (`mpc.version`, `mpc.baseMVA`) together with the
//! case name from the `function mpc = NAME` line.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub base_mva: Option<f64>,
}

/// Scan case text for the case name and scalar assignments.
pub fn scan_metadata(text: &str) -> CaseMetadata {
    let mut meta = CaseMetadata::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("function") {
            if meta.name.is_none() {
                meta.name = rest
                    .split_once('=')
                    .map(|(_, name)| name.trim().trim_end_matches(';').to_string())
                    .filter(|name| !name.is_empty());
            }
        } else if trimmed.starts_with("mpc.version") && trimmed.contains('=') {
            meta.version = Some(extract_inline_string(trimmed));
        } else if trimmed.starts_with("mpc.baseMVA") && trimmed.contains('=') {
            if let Some(v) = extract_inline_scalar(trimmed) {
                meta.base_mva = Some(v);
            }
        }
    }

    meta
}

/// String value of a single-line assignment, e.g. `mpc.version = '2';`
fn extract_inline_string(line: &str) -> String {
    line.split('=')
        .nth(1)
        .map(|v| {
            v.trim()
                .trim_matches(|c| c == '\'' || c == '"' || c == ';')
                .to_string()
        })
        .unwrap_or_default()
}

/// Scalar value of a single-line assignment, e.g. `mpc.baseMVA = 100.0;`
fn extract_inline_scalar(line: &str) -> Option<f64> {
    let value = line.split('=').nth(1)?;
    let value = value.split('%').next().unwrap_or(value);
    value.trim().trim_end_matches(';').trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_pglib_preamble() {
        let text = "%%%% header comment\n\
                    function mpc = pglib_opf_case5_pjm\n\
                    mpc.version = '2';\n\
                    mpc.baseMVA = 100.0;\n\
                    %% bus data\n";
        let meta = scan_metadata(text);

        assert_eq!(meta.name.as_deref(), Some("pglib_opf_case5_pjm"));
        assert_eq!(meta.version.as_deref(), Some("2"));
        assert_eq!(meta.base_mva, Some(100.0));
    }

    #[test]
    fn test_scalar_with_trailing_comment() {
        assert_eq!(extract_inline_scalar("mpc.baseMVA = 1000; % MVA"), Some(1000.0));
        assert_eq!(extract_inline_scalar("mpc.baseMVA = ;"), None);
    }

    #[test]
    fn test_missing_metadata_is_none() {
        let meta = scan_metadata("%% bus data\n% bus_i\n1\n];\n");
        assert_eq!(meta, CaseMetadata::default());
    }
}
