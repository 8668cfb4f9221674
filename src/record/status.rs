use log::debug;

use super::{
    schema::{rssi, state_control, status},
    ApplyField,
};
use crate::field::FieldValue;

/// Periodic status of the timer.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    pub flags: Option<u16>,
    /// Battery voltage in millivolts.
    pub battery_voltage: Option<u16>,
    pub gate_state: Option<u8>,
    pub detection_count: Option<u32>,
    /// Last RSSI reading of each reported slot, in the order received.
    pub last_rssi: Vec<SlotRssi>,
}

/// RSSI reading of one slot within a [`Status`] record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotRssi {
    pub slot_index: u8,
    pub rssi: Option<f32>,
}

impl Status {
    /// Last RSSI reading of the given slot.
    pub fn rssi(&self, slot_index: u8) -> Option<f32> {
        self.last_rssi
            .iter()
            .rev()
            .find(|slot| slot.slot_index == slot_index)
            .and_then(|slot| slot.rssi)
    }
}

impl ApplyField for Status {
    fn apply(&mut self, signature: u8, value: FieldValue) {
        match (signature, value) {
            // Each slot index opens an entry for the RSSI reading that follows it.
            (status::SLOT_INDEX, FieldValue::U8(v)) => self.last_rssi.push(SlotRssi {
                slot_index: v,
                rssi: None,
            }),
            (status::LAST_RSSI, FieldValue::F32(v)) => match self.last_rssi.last_mut() {
                Some(slot) => slot.rssi = Some(v),
                None => debug!("Ignoring RSSI reading without a slot index"),
            },
            (status::FLAGS, FieldValue::U16(v)) => self.flags = Some(v),
            (status::BATTERY_VOLTAGE, FieldValue::U16(v)) => self.battery_voltage = Some(v),
            (status::GATE_STATE, FieldValue::U8(v)) => self.gate_state = Some(v),
            (status::DETECTION_COUNT, FieldValue::U32(v)) => self.detection_count = Some(v),
            _ => {}
        }
    }
}

/// Signal strength statistics of one slot.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rssi {
    pub slot_index: Option<u8>,
    pub sample_count: Option<u32>,
    pub min_rssi: Option<f32>,
    pub max_rssi: Option<f32>,
    pub mean_rssi: Option<f32>,
    pub unknown_1: Option<u8>,
    pub custom_rate: Option<u8>,
    pub packet_rate: Option<u8>,
    pub unknown_2: Option<u8>,
}

impl ApplyField for Rssi {
    fn apply(&mut self, signature: u8, value: FieldValue) {
        match (signature, value) {
            (rssi::SLOT_INDEX, FieldValue::U8(v)) => self.slot_index = Some(v),
            (rssi::SAMPLE_COUNT, FieldValue::U32(v)) => self.sample_count = Some(v),
            (rssi::MIN_RSSI, FieldValue::F32(v)) => self.min_rssi = Some(v),
            (rssi::MAX_RSSI, FieldValue::F32(v)) => self.max_rssi = Some(v),
            (rssi::MEAN_RSSI, FieldValue::F32(v)) => self.mean_rssi = Some(v),
            (rssi::UNKNOWN_1, FieldValue::U8(v)) => self.unknown_1 = Some(v),
            (rssi::CUSTOM_RATE, FieldValue::U8(v)) => self.custom_rate = Some(v),
            (rssi::PACKET_RATE, FieldValue::U8(v)) => self.packet_rate = Some(v),
            (rssi::UNKNOWN_2, FieldValue::U8(v)) => self.unknown_2 = Some(v),
            _ => {}
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateControl {
    pub gate_state: Option<u8>,
}

impl ApplyField for StateControl {
    fn apply(&mut self, signature: u8, value: FieldValue) {
        if let (state_control::GATE_STATE, FieldValue::U8(v)) = (signature, value) {
            self.gate_state = Some(v);
        }
    }
}
