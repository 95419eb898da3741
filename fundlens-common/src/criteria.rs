//! Filter criteria normalization
//!
//! Query parameters arrive with `"all"` or the empty string meaning "no
//! constraint on this dimension"; both are normalized away here so the
//! store adapter only ever sees real constraints.

/// Sentinel value meaning "no constraint"
const ALL_SENTINEL: &str = "all";

/// Normalized filter criteria for a report query.
///
/// `None` on a dimension means the dimension is unconstrained. Unknown
/// slugs are not an error; they simply match zero records downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub think_tank: Option<String>,
    pub donor: Option<String>,
    pub donation_year: Option<String>,
    pub donor_type: Option<String>,
}

impl Criteria {
    /// Normalize raw parameter values into criteria.
    ///
    /// Trims each value; the empty string and the `"all"` sentinel
    /// (case-insensitive) both mean "unconstrained". Pure, no I/O.
    pub fn normalize(
        think_tank: Option<&str>,
        donor: Option<&str>,
        donation_year: Option<&str>,
        donor_type: Option<&str>,
    ) -> Self {
        Self {
            think_tank: normalize_value(think_tank),
            donor: normalize_value(donor),
            donation_year: normalize_value(donation_year),
            donor_type: normalize_value(donor_type),
        }
    }

    /// True if no dimension is constrained
    pub fn is_unconstrained(&self) -> bool {
        self.think_tank.is_none()
            && self.donor.is_none()
            && self.donation_year.is_none()
            && self.donor_type.is_none()
    }
}

fn normalize_value(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentinel_equals_empty_equals_missing() {
        let from_all = Criteria::normalize(None, None, Some("all"), None);
        let from_empty = Criteria::normalize(None, None, Some(""), None);
        let from_missing = Criteria::normalize(None, None, None, None);

        assert_eq!(from_all, from_empty);
        assert_eq!(from_empty, from_missing);
        assert!(from_all.donation_year.is_none());
    }

    #[test]
    fn test_all_sentinel_is_case_insensitive() {
        let criteria = Criteria::normalize(Some("ALL"), Some("All"), None, None);
        assert!(criteria.think_tank.is_none());
        assert!(criteria.donor.is_none());
    }

    #[test]
    fn test_values_are_trimmed() {
        let criteria = Criteria::normalize(Some("  alpha  "), None, Some(" 2022"), None);
        assert_eq!(criteria.think_tank.as_deref(), Some("alpha"));
        assert_eq!(criteria.donation_year.as_deref(), Some("2022"));
    }

    #[test]
    fn test_whitespace_only_is_unconstrained() {
        let criteria = Criteria::normalize(Some("   "), None, None, None);
        assert!(criteria.think_tank.is_none());
    }

    #[test]
    fn test_real_slugs_pass_through() {
        let criteria = Criteria::normalize(
            Some("alpha"),
            Some("acme"),
            Some("2022"),
            Some("foreign-government"),
        );
        assert_eq!(criteria.think_tank.as_deref(), Some("alpha"));
        assert_eq!(criteria.donor.as_deref(), Some("acme"));
        assert_eq!(criteria.donation_year.as_deref(), Some("2022"));
        assert_eq!(criteria.donor_type.as_deref(), Some("foreign-government"));
        assert!(!criteria.is_unconstrained());
    }

    #[test]
    fn test_default_is_unconstrained() {
        assert!(Criteria::default().is_unconstrained());
    }
}
