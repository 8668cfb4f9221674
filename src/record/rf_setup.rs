use super::{schema::rf_setup, ApplyField};
use crate::{channel, field::FieldValue};

/// Receiver configuration of a single slot, as echoed by the timer.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RfSetup {
    /// Slot number, 1 through 8.
    pub slot_index: Option<u8>,
    pub enabled: Option<bool>,
    /// Channel number within the band.
    pub channel: Option<u16>,
    pub band: Option<u16>,
    /// Detection threshold.
    pub threshold: Option<f32>,
    pub gain: Option<u16>,
    /// Frequency in MHz.
    pub frequency: Option<u16>,
}

impl RfSetup {
    /// Name of the tuned channel, if the band and channel numbers are in the channel table.
    pub fn channel_name(&self) -> Option<&'static str> {
        let band = u8::try_from(self.band?).ok()?;
        let channel = u8::try_from(self.channel?).ok()?;
        channel::find(band, channel).map(|channel| channel.name)
    }
}

impl ApplyField for RfSetup {
    fn apply(&mut self, signature: u8, value: FieldValue) {
        match (signature, value) {
            (rf_setup::SLOT_INDEX, FieldValue::U8(v)) => self.slot_index = Some(v),
            (rf_setup::ENABLED, FieldValue::U16(v)) => self.enabled = Some(v != 0),
            (rf_setup::CHANNEL, FieldValue::U16(v)) => self.channel = Some(v),
            (rf_setup::BAND, FieldValue::U16(v)) => self.band = Some(v),
            (rf_setup::THRESHOLD, FieldValue::F32(v)) => self.threshold = Some(v),
            (rf_setup::GAIN, FieldValue::U16(v)) => self.gain = Some(v),
            (rf_setup::FREQUENCY, FieldValue::U16(v)) => self.frequency = Some(v),
            _ => {}
        }
    }
}
