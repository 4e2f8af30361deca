use crate::CoreError;

/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Fail unless `v` is finite.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Fail unless `v` is finite and >= 0.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::Negative { what, value: v });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        assert!(matches!(err, CoreError::NonFinite { what: "test", .. }));
    }

    #[test]
    fn ensure_non_negative_rejects_negative() {
        assert!(ensure_non_negative(0.0, "depth").is_ok());
        assert_eq!(
            ensure_non_negative(-1e-3, "depth"),
            Err(CoreError::Negative {
                what: "depth",
                value: -1e-3
            })
        );
        assert!(ensure_non_negative(Real::INFINITY, "depth").is_err());
    }
}
