use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64, unix_millis_to_datetime};
use crate::error::{ChartError, ChartResult};

/// One fixed-duration market bar keyed by its open time (unix millis).
///
/// Two candles with the same `open_time` describe the same time bucket; the
/// later one is a revision of the earlier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub close_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - all prices and the volume are finite, volume is `>= 0`
    /// - `low <= high`, `open` and `close` are within `[low, high]`
    /// - `close_time >= open_time`
    pub fn new(
        open_time: i64,
        close_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> ChartResult<Self> {
        if !open.is_finite()
            || !high.is_finite()
            || !low.is_finite()
            || !close.is_finite()
            || !volume.is_finite()
        {
            return Err(ChartError::InvalidData(
                "candle prices and volume must be finite".to_owned(),
            ));
        }
        if volume < 0.0 {
            return Err(ChartError::InvalidData(
                "candle volume must be >= 0".to_owned(),
            ));
        }
        if low > high {
            return Err(ChartError::InvalidData(
                "candle low must be <= high".to_owned(),
            ));
        }
        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "candle open/close must be within low/high range".to_owned(),
            ));
        }
        if close_time < open_time {
            return Err(ChartError::InvalidData(format!(
                "candle close time {close_time} precedes open time {open_time}"
            )));
        }

        Ok(Self {
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Converts typed time/decimal input into a validated candle.
    pub fn from_decimal_time(
        open_time: DateTime<Utc>,
        close_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_unix_millis(open_time),
            datetime_to_unix_millis(close_time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(volume, "volume")?,
        )
    }

    /// Ordering key and synchronization identity.
    #[must_use]
    pub fn key(&self) -> i64 {
        self.open_time
    }

    #[must_use]
    pub fn same_bucket(&self, other: &Candle) -> bool {
        self.open_time == other.open_time
    }

    #[must_use]
    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        unix_millis_to_datetime(self.open_time)
    }

    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_close_outside_range() {
        let err = Candle::new(0, 59_999, 10.0, 12.0, 9.0, 13.0, 1.0).expect_err("invalid");
        assert!(matches!(err, ChartError::InvalidData(_)));
    }

    #[test]
    fn rejects_reversed_times() {
        assert!(Candle::new(60_000, 0, 10.0, 12.0, 9.0, 11.0, 1.0).is_err());
    }

    #[test]
    fn decimal_constructor_keeps_millisecond_key() {
        let open = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("time");
        let close = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 59).single().expect("time");
        let candle = Candle::from_decimal_time(
            open,
            close,
            Decimal::new(1005, 1),
            Decimal::new(1010, 1),
            Decimal::new(1000, 1),
            Decimal::new(1008, 1),
            Decimal::new(3, 0),
        )
        .expect("candle");

        assert_eq!(candle.key(), open.timestamp_millis());
        assert_eq!(candle.open_datetime(), Some(open));
        assert!(candle.is_bullish());
    }
}
