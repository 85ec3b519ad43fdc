// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported for unusable host frame parameters.

use kurbo::Size;

/// Host input that [`Context::new_frame`](crate::Context::new_frame) refuses to run with.
///
/// The context is left untouched when one of these is returned; the host can fix its
/// [`FrameInput`](canopy_input::FrameInput) and call `new_frame` again.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// `delta_time` was negative, NaN or infinite. Zero is accepted.
    #[error("invalid frame delta time {0}: must be finite and non-negative")]
    InvalidDeltaTime(f64),
    /// `display_size` had a negative or non-finite component.
    #[error("invalid display size {0:?}: both components must be finite and non-negative")]
    InvalidDisplaySize(Size),
}

/// Check the host parameters of one frame.
pub(crate) fn validate_frame(delta_time: f64, display_size: Size) -> Result<(), FrameError> {
    if !delta_time.is_finite() || delta_time < 0.0 {
        return Err(FrameError::InvalidDeltaTime(delta_time));
    }
    let bad = |v: f64| !v.is_finite() || v < 0.0;
    if bad(display_size.width) || bad(display_size.height) {
        return Err(FrameError::InvalidDisplaySize(display_size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_is_accepted() {
        assert_eq!(validate_frame(0.0, Size::new(800.0, 600.0)), Ok(()));
    }

    #[test]
    fn rejects_unusable_parameters() {
        assert!(matches!(
            validate_frame(-0.01, Size::new(800.0, 600.0)),
            Err(FrameError::InvalidDeltaTime(_))
        ));
        assert!(matches!(
            validate_frame(f64::NAN, Size::new(800.0, 600.0)),
            Err(FrameError::InvalidDeltaTime(_))
        ));
        assert!(matches!(
            validate_frame(0.016, Size::new(-1.0, -1.0)),
            Err(FrameError::InvalidDisplaySize(_))
        ));
        assert!(matches!(
            validate_frame(0.016, Size::new(f64::INFINITY, 10.0)),
            Err(FrameError::InvalidDisplaySize(_))
        ));
    }

    #[test]
    fn message_names_the_value() {
        let msg = FrameError::InvalidDeltaTime(-1.0).to_string();
        assert!(msg.contains("-1"), "{msg}");
    }
}
