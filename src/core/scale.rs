use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Maps a numeric domain onto a pixel extent starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    /// Widens both ends of the domain by `ratio` of its span.
    pub fn padded(self, ratio: f64) -> ChartResult<Self> {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "scale padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        let pad = self.span() * ratio;
        Self::new(self.domain_start - pad, self.domain_end + pad)
    }

    pub fn domain_to_pixel(self, value: f64, extent_px: f64) -> ChartResult<f64> {
        validate_extent(extent_px)?;
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / self.span();
        Ok(normalized * extent_px)
    }

    pub fn pixel_to_domain(self, pixel: f64, extent_px: f64) -> ChartResult<f64> {
        validate_extent(extent_px)?;
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let normalized = pixel / extent_px;
        Ok(self.domain_start + normalized * self.span())
    }
}

fn validate_extent(extent_px: f64) -> ChartResult<()> {
    if !extent_px.is_finite() || extent_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "pixel extent must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn maps_domain_ends_to_extent_ends() {
        let scale = LinearScale::new(-0.5, 9.5).expect("scale");
        assert_relative_eq!(scale.domain_to_pixel(-0.5, 200.0).expect("px"), 0.0);
        assert_relative_eq!(scale.domain_to_pixel(9.5, 200.0).expect("px"), 200.0);
        assert_relative_eq!(scale.domain_to_pixel(4.5, 200.0).expect("px"), 100.0);
    }

    #[test]
    fn pixel_round_trip_recovers_value() {
        let scale = LinearScale::new(10.0, 30.0).expect("scale");
        let px = scale.domain_to_pixel(17.25, 640.0).expect("px");
        assert_relative_eq!(scale.pixel_to_domain(px, 640.0).expect("value"), 17.25);
    }

    #[test]
    fn rejects_degenerate_domain_and_extent() {
        assert!(LinearScale::new(1.0, 1.0).is_err());
        assert!(LinearScale::new(f64::NAN, 1.0).is_err());
        let scale = LinearScale::new(0.0, 1.0).expect("scale");
        assert!(scale.domain_to_pixel(0.5, 0.0).is_err());
    }

    #[test]
    fn padding_widens_symmetrically() {
        let scale = LinearScale::new(100.0, 200.0)
            .expect("scale")
            .padded(0.1)
            .expect("padded");
        assert_eq!(scale.domain(), (90.0, 210.0));
    }
}
