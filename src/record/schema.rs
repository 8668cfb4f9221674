//! Field signatures and the wire type of every known field.
//!
//! Signatures are scoped to a record type: `0x22` is the mean RSSI in an RSSI record, the
//! band in an RF setup record and the status interval in a settings record.

use super::RecordType;
use crate::field::WireType;

pub mod rssi {
    pub const SLOT_INDEX: u8 = 0x01;
    pub const SAMPLE_COUNT: u8 = 0x07;
    pub const MIN_RSSI: u8 = 0x20;
    pub const MAX_RSSI: u8 = 0x21;
    pub const MEAN_RSSI: u8 = 0x22;
    pub const UNKNOWN_1: u8 = 0x23;
    pub const CUSTOM_RATE: u8 = 0x24;
    pub const PACKET_RATE: u8 = 0x25;
    pub const UNKNOWN_2: u8 = 0x26;
}

pub mod rf_setup {
    pub const SLOT_INDEX: u8 = 0x01;
    pub const ENABLED: u8 = 0x20;
    pub const CHANNEL: u8 = 0x21;
    pub const BAND: u8 = 0x22;
    pub const THRESHOLD: u8 = 0x23;
    pub const GAIN: u8 = 0x24;
    pub const FREQUENCY: u8 = 0x25;
}

pub mod state_control {
    pub const GATE_STATE: u8 = 0x20;
}

pub mod settings {
    pub const STATUS_INTERVAL: u8 = 0x22;
    pub const SAVE_SETTINGS: u8 = 0x25;
    pub const MIN_LAP_TIME: u8 = 0x26;
}

pub mod passing {
    pub const SLOT_INDEX: u8 = 0x01;
    pub const RTC_TIME: u8 = 0x02;
    pub const DECODER_ID: u8 = 0x20;
    pub const PASSING_NUMBER: u8 = 0x21;
    pub const PEAK_HEIGHT: u8 = 0x22;
    pub const FLAGS: u8 = 0x23;
}

pub mod status {
    pub const SLOT_INDEX: u8 = 0x01;
    pub const FLAGS: u8 = 0x03;
    pub const BATTERY_VOLTAGE: u8 = 0x21;
    pub const LAST_RSSI: u8 = 0x22;
    pub const GATE_STATE: u8 = 0x23;
    pub const DETECTION_COUNT: u8 = 0x24;
}

pub mod time {
    pub const RTC_TIME: u8 = 0x02;
    pub const TIME_RTC_TIME: u8 = 0x20;
}

type Schema = &'static [(u8, WireType)];

static RSSI: Schema = &[
    (rssi::SLOT_INDEX, WireType::U8),
    (rssi::SAMPLE_COUNT, WireType::U32),
    (rssi::MIN_RSSI, WireType::F32),
    (rssi::MAX_RSSI, WireType::F32),
    (rssi::MEAN_RSSI, WireType::F32),
    (rssi::UNKNOWN_1, WireType::U8),
    (rssi::CUSTOM_RATE, WireType::U8),
    (rssi::PACKET_RATE, WireType::U8),
    (rssi::UNKNOWN_2, WireType::U8),
];

static RF_SETUP: Schema = &[
    (rf_setup::SLOT_INDEX, WireType::U8),
    (rf_setup::ENABLED, WireType::U16),
    (rf_setup::CHANNEL, WireType::U16),
    (rf_setup::BAND, WireType::U16),
    (rf_setup::THRESHOLD, WireType::F32),
    (rf_setup::GAIN, WireType::U16),
    (rf_setup::FREQUENCY, WireType::U16),
];

static STATE_CONTROL: Schema = &[(state_control::GATE_STATE, WireType::U8)];

static SETTINGS: Schema = &[
    (settings::STATUS_INTERVAL, WireType::U16),
    (settings::SAVE_SETTINGS, WireType::U8),
    (settings::MIN_LAP_TIME, WireType::U32),
];

static PASSING: Schema = &[
    (passing::SLOT_INDEX, WireType::U8),
    (passing::RTC_TIME, WireType::U64),
    (passing::DECODER_ID, WireType::U32),
    (passing::PASSING_NUMBER, WireType::U32),
    (passing::PEAK_HEIGHT, WireType::U16),
    (passing::FLAGS, WireType::U16),
];

static STATUS: Schema = &[
    (status::SLOT_INDEX, WireType::U8),
    (status::FLAGS, WireType::U16),
    (status::BATTERY_VOLTAGE, WireType::U16),
    (status::LAST_RSSI, WireType::F32),
    (status::GATE_STATE, WireType::U8),
    (status::DETECTION_COUNT, WireType::U32),
];

static TIME: Schema = &[
    (time::RTC_TIME, WireType::U64),
    (time::TIME_RTC_TIME, WireType::U64),
];

/// The known fields of a record type. Descriptor and error records have no schema; their
/// fields are kept raw.
pub(crate) fn fields(record_type: RecordType) -> Schema {
    match record_type {
        RecordType::Rssi => RSSI,
        RecordType::RfSetup => RF_SETUP,
        RecordType::StateControl => STATE_CONTROL,
        RecordType::Settings => SETTINGS,
        RecordType::Passing => PASSING,
        RecordType::Status => STATUS,
        RecordType::Time => TIME,
        RecordType::Descriptor | RecordType::Error => &[],
    }
}

/// Looks up the wire type of a field.
pub fn wire_type(record_type: RecordType, signature: u8) -> Option<WireType> {
    fields(record_type)
        .iter()
        .find(|(known, _)| *known == signature)
        .map(|&(_, wire_type)| wire_type)
}
