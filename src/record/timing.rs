use super::{
    schema::{passing, time},
    ApplyField,
};
use crate::field::FieldValue;

/// A transponder passing the gate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passing {
    /// Slot that detected the passing.
    pub slot_index: Option<u8>,
    /// Timer clock at the peak of the passing, in microseconds.
    pub rtc_time: Option<u64>,
    pub decoder_id: Option<u32>,
    /// Running passing counter, useful for spotting dropped records.
    pub passing_number: Option<u32>,
    pub peak_height: Option<u16>,
    pub flags: Option<u16>,
}

impl ApplyField for Passing {
    fn apply(&mut self, signature: u8, value: FieldValue) {
        match (signature, value) {
            (passing::SLOT_INDEX, FieldValue::U8(v)) => self.slot_index = Some(v),
            (passing::RTC_TIME, FieldValue::U64(v)) => self.rtc_time = Some(v),
            (passing::DECODER_ID, FieldValue::U32(v)) => self.decoder_id = Some(v),
            (passing::PASSING_NUMBER, FieldValue::U32(v)) => self.passing_number = Some(v),
            (passing::PEAK_HEIGHT, FieldValue::U16(v)) => self.peak_height = Some(v),
            (passing::FLAGS, FieldValue::U16(v)) => self.flags = Some(v),
            _ => {}
        }
    }
}

/// The timer's real time clock, in microseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    pub rtc_time: Option<u64>,
    pub time_rtc_time: Option<u64>,
}

impl ApplyField for Time {
    fn apply(&mut self, signature: u8, value: FieldValue) {
        match (signature, value) {
            (time::RTC_TIME, FieldValue::U64(v)) => self.rtc_time = Some(v),
            (time::TIME_RTC_TIME, FieldValue::U64(v)) => self.time_rtc_time = Some(v),
            _ => {}
        }
    }
}
