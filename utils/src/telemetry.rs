//! the read side of the autopilot: where errors, rates and displacements come from.
use std::rc::Rc;

use thiserror::Error;

use crate::identifiers::{Angle, Axis};

/// a read that broke the telemetry contract. Never recoverable: acting on a value we could not read risks commanding
/// in the wrong direction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    #[error("readout for {field} is unparsable: {text:?}")]
    Unparsable { field: String, text: String },

    #[error("readout for {field} is missing")]
    Missing { field: String },

    #[error("readout for {field} is not finite: {value}")]
    NonFinite { field: String, value: f64 },
}

impl TelemetryError {
    pub fn unparsable(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Unparsable {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }
}

/// guards a reading against values no display could have shown.
pub trait FiniteReading {
    fn finite(self, field: impl FnOnce() -> String) -> Result<f64, TelemetryError>;
}

impl FiniteReading for Result<f64, TelemetryError> {
    fn finite(self, field: impl FnOnce() -> String) -> Result<f64, TelemetryError> {
        let value = self?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(TelemetryError::NonFinite {
                field: field(),
                value,
            })
        }
    }
}

/// read-only, synchronous source of vehicle state. Angles are in degrees, rates in degrees/second, displacements
/// in distance units and speeds in distance/second. All values are signed.
pub trait TelemetrySource {
    /// signed angular deviation. Positive error is corrected by decrease-direction commands.
    fn angle_error(&self, angle: Angle) -> Result<f64, TelemetryError>;

    fn angle_rate(&self, angle: Angle) -> Result<f64, TelemetryError>;

    fn axis_displacement(&self, axis: Axis) -> Result<f64, TelemetryError>;

    /// single scalar angular rate, not resolved per angle.
    fn combined_angular_rate(&self) -> Result<f64, TelemetryError>;

    /// single scalar speed, not resolved per axis.
    fn combined_speed(&self) -> Result<f64, TelemetryError>;
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for &T {
    fn angle_error(&self, angle: Angle) -> Result<f64, TelemetryError> {
        (**self).angle_error(angle)
    }

    fn angle_rate(&self, angle: Angle) -> Result<f64, TelemetryError> {
        (**self).angle_rate(angle)
    }

    fn axis_displacement(&self, axis: Axis) -> Result<f64, TelemetryError> {
        (**self).axis_displacement(axis)
    }

    fn combined_angular_rate(&self) -> Result<f64, TelemetryError> {
        (**self).combined_angular_rate()
    }

    fn combined_speed(&self) -> Result<f64, TelemetryError> {
        (**self).combined_speed()
    }
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Rc<T> {
    fn angle_error(&self, angle: Angle) -> Result<f64, TelemetryError> {
        (**self).angle_error(angle)
    }

    fn angle_rate(&self, angle: Angle) -> Result<f64, TelemetryError> {
        (**self).angle_rate(angle)
    }

    fn axis_displacement(&self, axis: Axis) -> Result<f64, TelemetryError> {
        (**self).axis_displacement(axis)
    }

    fn combined_angular_rate(&self) -> Result<f64, TelemetryError> {
        (**self).combined_angular_rate()
    }

    fn combined_speed(&self) -> Result<f64, TelemetryError> {
        (**self).combined_speed()
    }
}

/// extracts the leading decimal number of a display readout, e.g. "-12.3 m" -> -12.3.
/// The readout must open with an optional minus sign, at least one digit, a point and at least one more digit;
/// anything else is None.
pub fn numeric_prefix_of(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if bytes.first() == Some(&b'-') {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == int_start || bytes.get(end) != Some(&b'.') {
        return None;
    }
    end += 1; // the point
    let frac_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == frac_start {
        return None;
    }

    // everything up to `end` is ascii, so slicing on it cannot split a char.
    text.get(..end)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_readouts() {
        assert_eq!(numeric_prefix_of("12.3 m"), Some(12.3));
        assert_eq!(numeric_prefix_of("-0.4°"), Some(-0.4));
        assert_eq!(numeric_prefix_of("0.050 m/s"), Some(0.05));
        assert_eq!(numeric_prefix_of("-0.0 °/s"), Some(-0.0));
    }

    #[test]
    fn rejects_malformed_readouts() {
        assert_eq!(numeric_prefix_of(""), None);
        assert_eq!(numeric_prefix_of("12 m"), None); // no decimal part
        assert_eq!(numeric_prefix_of("12. m"), None);
        assert_eq!(numeric_prefix_of(".5"), None);
        assert_eq!(numeric_prefix_of("--1.0"), None);
        assert_eq!(numeric_prefix_of(" 1.0"), None);
        assert_eq!(numeric_prefix_of("NaN"), None);
    }

    #[test]
    fn non_finite_readings_are_rejected() {
        assert_eq!(Ok::<f64, TelemetryError>(1.5).finite(|| "x distance".to_string()), Ok(1.5));
        assert_eq!(
            Ok::<f64, TelemetryError>(f64::INFINITY).finite(|| "range rate".to_string()),
            Err(TelemetryError::NonFinite {
                field: "range rate".to_string(),
                value: f64::INFINITY
            })
        );
        assert!(matches!(
            Ok::<f64, TelemetryError>(f64::NAN).finite(|| "roll rate".to_string()),
            Err(TelemetryError::NonFinite { .. })
        ));
        // errors pass through untouched.
        assert_eq!(
            Err::<f64, TelemetryError>(TelemetryError::missing("yaw error")).finite(|| unreachable!()),
            Err(TelemetryError::missing("yaw error"))
        );
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = TelemetryError::unparsable("x distance", "abc");
        assert_eq!(err.to_string(), "readout for x distance is unparsable: \"abc\"");
        assert_eq!(
            TelemetryError::missing("yaw rate").to_string(),
            "readout for yaw rate is missing"
        );
    }
}
