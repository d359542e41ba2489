//! Display-label derivation from dataset attribute metadata.

/// Human-readable name for a field: the `long_name` attribute when present,
/// otherwise the variable identifier the user selected.
pub fn display_name(long_name: Option<&str>, variable: &str) -> String {
    match long_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => variable.to_string(),
    }
}

/// Colorbar caption: display name plus a units suffix. Fields without a
/// `units` attribute are labelled explicitly rather than omitted.
pub fn field_label(long_name: Option<&str>, units: Option<&str>, variable: &str) -> String {
    let name = display_name(long_name, variable);
    match units {
        Some(u) if !u.trim().is_empty() => format!("{} ({})", name, u),
        _ => format!("{} (undefined units)", name),
    }
}

/// Figure title for an annual-mean map of the given year.
pub fn figure_title(long_name: Option<&str>, variable: &str, year: i32) -> String {
    format!(
        "Average annual {} on {}",
        display_name(long_name, variable),
        year
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_long_name_and_units() {
        assert_eq!(
            field_label(Some("2 metre temperature"), Some("K"), "VAR_2T"),
            "2 metre temperature (K)"
        );
    }

    #[test]
    fn test_label_missing_units() {
        assert_eq!(
            field_label(Some("2 metre temperature"), None, "VAR_2T"),
            "2 metre temperature (undefined units)"
        );
    }

    #[test]
    fn test_label_missing_both_falls_back_to_variable() {
        assert_eq!(field_label(None, None, "VAR_2T"), "VAR_2T (undefined units)");
    }

    #[test]
    fn test_label_blank_long_name_falls_back() {
        assert_eq!(field_label(Some("  "), Some("K"), "SST"), "SST (K)");
    }

    #[test]
    fn test_figure_title() {
        assert_eq!(
            figure_title(Some("2 metre temperature"), "VAR_2T", 1979),
            "Average annual 2 metre temperature on 1979"
        );
        assert_eq!(
            figure_title(None, "SST", 2001),
            "Average annual SST on 2001"
        );
    }
}
