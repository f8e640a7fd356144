use crate::models::{Classification, QualityLevel, RiskLevel};
use crate::utils::constants::INDEX_BREAKPOINTS;

/// Tier index (0..=4) for an index value: the number of breakpoints at or
/// below it. Negative values fall in the lowest tier.
fn tier(value: f64) -> usize {
    INDEX_BREAKPOINTS.iter().filter(|&&b| value >= b).count()
}

/// Classify an index value into quality and risk tiers.
///
/// Total over all inputs: missing and non-finite values yield
/// [`Classification::no_data`].
pub fn classify(value: Option<f64>) -> Classification {
    match value {
        Some(v) if v.is_finite() => {
            let tier = tier(v);
            Classification {
                quality: Some(QualityLevel::from_tier(tier)),
                risk: Some(RiskLevel::from_tier(tier)),
            }
        }
        _ => Classification::no_data(),
    }
}

pub fn quality_label(value: Option<f64>) -> &'static str {
    classify(value).quality_label()
}

pub fn risk_label(value: Option<f64>) -> &'static str {
    classify(value).risk_label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(quality_label(Some(40.0)), "Buena");
        assert_eq!(risk_label(Some(40.0)), "Bajo");
        assert_eq!(quality_label(Some(120.0)), "Mala");
        assert_eq!(risk_label(Some(120.0)), "Alto");
        assert_eq!(quality_label(Some(250.0)), "Extremadamente mala");
        assert_eq!(risk_label(Some(250.0)), "Extremo");
    }

    #[test]
    fn test_breakpoints_are_exclusive_upper_bounds() {
        assert_eq!(quality_label(Some(50.9)), "Buena");
        assert_eq!(quality_label(Some(51.0)), "Aceptable");
        assert_eq!(quality_label(Some(100.0)), "Aceptable");
        assert_eq!(quality_label(Some(101.0)), "Mala");
        assert_eq!(quality_label(Some(150.99)), "Mala");
        assert_eq!(quality_label(Some(151.0)), "Muy mala");
        assert_eq!(risk_label(Some(200.0)), "Muy alto");
        assert_eq!(risk_label(Some(201.0)), "Extremo");
    }

    #[test]
    fn test_severity_is_monotonic() {
        let mut previous = classify(Some(-10.0));
        let mut v = -10.0;
        while v <= 400.0 {
            let current = classify(Some(v));
            assert!(current.quality >= previous.quality, "quality regressed at {}", v);
            assert!(current.risk >= previous.risk, "risk regressed at {}", v);
            previous = current;
            v += 0.5;
        }
    }

    #[test]
    fn test_missing_and_negative_inputs() {
        assert_eq!(classify(None), Classification::no_data());
        assert_eq!(classify(Some(f64::NAN)), Classification::no_data());
        assert_eq!(quality_label(Some(-3.0)), "Buena");
        assert_eq!(risk_label(Some(-3.0)), "Bajo");
    }
}
