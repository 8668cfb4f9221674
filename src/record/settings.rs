use super::{schema::settings, ApplyField};
use crate::field::FieldValue;

/// Timer-wide settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Interval between status records, in milliseconds.
    pub status_interval: Option<u16>,
    pub save_settings: Option<u8>,
    /// Minimum lap time in milliseconds. Passings sooner than this after the previous one
    /// are ignored by the timer.
    pub min_lap_time: Option<u32>,
}

impl ApplyField for Settings {
    fn apply(&mut self, signature: u8, value: FieldValue) {
        match (signature, value) {
            (settings::STATUS_INTERVAL, FieldValue::U16(v)) => self.status_interval = Some(v),
            (settings::SAVE_SETTINGS, FieldValue::U8(v)) => self.save_settings = Some(v),
            (settings::MIN_LAP_TIME, FieldValue::U32(v)) => self.min_lap_time = Some(v),
            _ => {}
        }
    }
}
