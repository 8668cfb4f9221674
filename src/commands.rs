//! Builders for the requests a host sends to the timer.
//!
//! Each function returns a complete frame, ready to be written to the transport.

use crate::{
    channel,
    encode::EncodeError,
    record::{
        schema::{rf_setup, settings, time},
        RecordEncoder, RecordType,
    },
};

/// Number of receiver slots in a LapRF unit.
pub const SLOT_COUNT: u8 = 8;

fn check_slot(slot_index: u8) -> Result<u8, EncodeError> {
    if (1..=SLOT_COUNT).contains(&slot_index) {
        Ok(slot_index)
    } else {
        Err(EncodeError::InvalidSlot(slot_index))
    }
}

/// Requests the timer's real time clock. The timer answers with a time record.
pub fn get_rtc_time() -> Result<Vec<u8>, EncodeError> {
    let mut encoder = RecordEncoder::new(RecordType::Time);
    encoder.encode_field(time::RTC_TIME, 0u8);
    encoder.finish()
}

/// Requests the minimum lap time setting.
pub fn get_min_lap_time() -> Result<Vec<u8>, EncodeError> {
    let mut encoder = RecordEncoder::new(RecordType::Settings);
    encoder.encode_field(settings::MIN_LAP_TIME, 0u8);
    encoder.finish()
}

/// Sets the minimum lap time, in milliseconds.
pub fn set_min_lap_time(milliseconds: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = RecordEncoder::new(RecordType::Settings);
    encoder.encode_field(settings::MIN_LAP_TIME, milliseconds);
    encoder.finish()
}

/// Sets the interval between status records, in milliseconds.
pub fn set_status_interval(milliseconds: u16) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = RecordEncoder::new(RecordType::Settings);
    encoder.encode_field(settings::STATUS_INTERVAL, milliseconds);
    encoder.finish()
}

/// Requests the RF setup of one slot, or of every slot when `slot_index` is `None`.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidSlot`] if `slot_index` is not within 1 through 8.
pub fn get_rf_setup(slot_index: Option<u8>) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = RecordEncoder::new(RecordType::RfSetup);

    match slot_index {
        Some(slot_index) => {
            encoder.encode_field(rf_setup::SLOT_INDEX, check_slot(slot_index)?);
        }
        None => {
            for slot_index in 1..=SLOT_COUNT {
                encoder.encode_field(rf_setup::SLOT_INDEX, slot_index);
            }
        }
    }

    encoder.finish()
}

/// Configuration for one receiver slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RfSetupCommand<'a> {
    /// Slot number, 1 through 8.
    pub slot_index: u8,
    /// Channel name from the [channel table](crate::channel), e.g. `R1`.
    pub channel_name: &'a str,
    pub gain: u16,
    pub threshold: f32,
    pub enabled: bool,
}

/// Configures one receiver slot.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidChannelName`] if the channel is not in the channel table, or
/// [`EncodeError::InvalidSlot`] if the slot index is out of range. Both are checked before
/// any bytes are produced.
pub fn set_rf_setup(command: &RfSetupCommand<'_>) -> Result<Vec<u8>, EncodeError> {
    let channel = channel::lookup(command.channel_name)?;
    let slot_index = check_slot(command.slot_index)?;

    let mut encoder = RecordEncoder::new(RecordType::RfSetup);
    encoder
        .encode_field(rf_setup::SLOT_INDEX, slot_index)
        .encode_field(rf_setup::ENABLED, u16::from(command.enabled))
        .encode_field(rf_setup::CHANNEL, u16::from(channel.channel))
        .encode_field(rf_setup::BAND, u16::from(channel.band))
        .encode_field(rf_setup::THRESHOLD, command.threshold)
        .encode_field(rf_setup::GAIN, command.gain)
        .encode_field(rf_setup::FREQUENCY, channel.frequency);
    encoder.finish()
}
