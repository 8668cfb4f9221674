//! The 5.8GHz FPV channel table.
//!
//! LapRF receivers are tuned with a band number, a channel number and a frequency. Callers
//! normally refer to channels by their conventional name instead (`R1`, `F4`, ...).

use crate::encode::EncodeError;

/// A named RF channel the timer can be tuned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Channel {
    /// Band letter followed by the channel number, e.g. `R1`.
    pub name: &'static str,
    /// Band number as understood by the timer.
    pub band: u8,
    /// Channel number within the band, starting at 1.
    pub channel: u8,
    /// Center frequency in MHz.
    pub frequency: u16,
}

/// Band numbers used by the timer.
pub mod bands {
    /// Fatshark / ImmersionRC
    pub const F: u8 = 1;
    /// Raceband
    pub const R: u8 = 2;
    pub const E: u8 = 3;
    pub const B: u8 = 4;
    pub const A: u8 = 5;
    /// Lowband
    pub const L: u8 = 6;
}

macro_rules! band {
    ($band:ident: $($name:literal $channel:literal $frequency:literal),* $(,)?) => {
        [$(
            Channel {
                name: $name,
                band: bands::$band,
                channel: $channel,
                frequency: $frequency,
            },
        )*]
    };
}

static F_BAND: [Channel; 8] = band!(F:
    "F1" 1 5740, "F2" 2 5760, "F3" 3 5780, "F4" 4 5800,
    "F5" 5 5820, "F6" 6 5840, "F7" 7 5860, "F8" 8 5880,
);
static R_BAND: [Channel; 8] = band!(R:
    "R1" 1 5658, "R2" 2 5695, "R3" 3 5732, "R4" 4 5769,
    "R5" 5 5806, "R6" 6 5843, "R7" 7 5880, "R8" 8 5917,
);
static E_BAND: [Channel; 8] = band!(E:
    "E1" 1 5705, "E2" 2 5685, "E3" 3 5665, "E4" 4 5645,
    "E5" 5 5885, "E6" 6 5905, "E7" 7 5925, "E8" 8 5945,
);
static B_BAND: [Channel; 8] = band!(B:
    "B1" 1 5733, "B2" 2 5752, "B3" 3 5771, "B4" 4 5790,
    "B5" 5 5809, "B6" 6 5828, "B7" 7 5847, "B8" 8 5866,
);
static A_BAND: [Channel; 8] = band!(A:
    "A1" 1 5865, "A2" 2 5845, "A3" 3 5825, "A4" 4 5805,
    "A5" 5 5785, "A6" 6 5765, "A7" 7 5745, "A8" 8 5725,
);
static L_BAND: [Channel; 8] = band!(L:
    "L1" 1 5362, "L2" 2 5399, "L3" 3 5436, "L4" 4 5473,
    "L5" 5 5510, "L6" 6 5547, "L7" 7 5584, "L8" 8 5621,
);

static BANDS: [&[Channel; 8]; 6] = [&F_BAND, &R_BAND, &E_BAND, &B_BAND, &A_BAND, &L_BAND];

/// Iterates over every known channel, band by band.
pub fn all() -> impl Iterator<Item = &'static Channel> {
    BANDS.iter().flat_map(|band| band.iter())
}

/// Looks up a channel by name. Names are matched case-insensitively.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidChannelName`] if no channel has that name.
pub fn lookup(name: &str) -> Result<&'static Channel, EncodeError> {
    all()
        .find(|channel| channel.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| EncodeError::InvalidChannelName(name.to_owned()))
}

/// Finds the channel with the given band and channel numbers.
pub fn find(band: u8, channel: u8) -> Option<&'static Channel> {
    BANDS
        .get(usize::from(band).checked_sub(1)?)?
        .get(usize::from(channel).checked_sub(1)?)
}
