//! Estimator Registry
//!
//! Metadata for every estimator, for listing and lookup by name.

use crate::selector::Estimator;

/// Estimator metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorInfo {
    /// Estimator this entry describes
    pub estimator: Estimator,
    /// Canonical name
    pub name: &'static str,
    /// Brief description of what the estimator measures
    pub description: &'static str,
    /// Price fields the estimator reads
    pub required_fields: &'static [&'static str],
    /// Whether output is an annualized volatility
    pub annualized: bool,
}

const fn describe(estimator: Estimator) -> (&'static str, &'static [&'static str]) {
    match estimator {
        Estimator::Raw => (
            "Close-to-close standard deviation of log returns",
            &["close"],
        ),
        Estimator::Parkinson => ("High/low range estimator", &["high", "low"]),
        Estimator::GarmanKlass => (
            "Range estimator corrected by the open-to-close move",
            &["open", "high", "low", "close"],
        ),
        Estimator::RogersSatchell => (
            "Drift-independent range estimator",
            &["open", "high", "low", "close"],
        ),
        Estimator::YangZhang => (
            "Weighted overnight, intraday and Rogers-Satchell variance",
            &["open", "high", "low", "close"],
        ),
        Estimator::HodgesTompkins => (
            "Close-to-close volatility with small-sample bias correction",
            &["close"],
        ),
        Estimator::Skew => ("Rolling skewness of log returns", &["close"]),
        Estimator::Kurtosis => ("Rolling excess kurtosis of log returns", &["close"]),
    }
}

/// Get all available estimator info
pub fn available_estimators() -> Vec<EstimatorInfo> {
    Estimator::ALL
        .into_iter()
        .map(|estimator| {
            let (description, required_fields) = describe(estimator);
            EstimatorInfo {
                estimator,
                name: estimator.name(),
                description,
                required_fields,
                annualized: estimator.is_annualized(),
            }
        })
        .collect()
}

/// Get estimator info by name, accepting the same spellings as parsing
pub fn get_estimator_info(name: &str) -> Option<EstimatorInfo> {
    let estimator: Estimator = name.parse().ok()?;
    available_estimators()
        .into_iter()
        .find(|info| info.estimator == estimator)
}

/// List all estimator names
pub fn list_estimator_names() -> Vec<&'static str> {
    Estimator::ALL.into_iter().map(Estimator::name).collect()
}

/// Estimators that read only the listed fields
pub fn estimators_using_only(fields: &[&str]) -> Vec<EstimatorInfo> {
    available_estimators()
        .into_iter()
        .filter(|info| info.required_fields.iter().all(|f| fields.contains(f)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_estimators_count() {
        assert_eq!(available_estimators().len(), 8);
    }

    #[test]
    fn test_get_estimator_info() {
        let info = get_estimator_info("yang_zhang").unwrap();
        assert_eq!(info.name, "YangZhang");
        assert!(info.annualized);
        assert!(info.required_fields.contains(&"open"));

        assert!(get_estimator_info("nonexistent").is_none());
    }

    #[test]
    fn test_list_names() {
        let names = list_estimator_names();
        assert_eq!(names.first(), Some(&"Raw"));
        assert!(names.contains(&"HodgesTompkins"));
    }

    #[test]
    fn test_close_only_estimators() {
        let names: Vec<_> = estimators_using_only(&["close"])
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Raw", "HodgesTompkins", "Skew", "Kurtosis"]);
    }

    #[test]
    fn test_all_estimators_have_required_fields() {
        for info in available_estimators() {
            assert!(
                !info.required_fields.is_empty(),
                "Estimator {} has no required fields",
                info.name
            );
        }
    }
}
