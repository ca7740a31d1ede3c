use super::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest Wi-Fi channel an access point may use.
pub const MIN_CHANNEL: u8 = 1;

/// Highest Wi-Fi channel an access point may use.
pub const MAX_CHANNEL: u8 = 14;

/// A single radio in a candidate placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessPoint {
    pub position: Point,
    pub channel: u8,
}

impl AccessPoint {
    pub const fn new(position: Point, channel: u8) -> Self {
        Self { position, channel }
    }

    /// Places an access point uniformly in the area on a uniformly drawn channel.
    pub fn random<R: Rng>(rng: &mut R, area_size: i32) -> Self {
        let position = Point::random(rng, area_size);
        let channel = random_channel(rng);
        Self { position, channel }
    }
}

pub(crate) fn random_channel<R: Rng>(rng: &mut R) -> u8 {
    rng.random_range(MIN_CHANNEL..=MAX_CHANNEL)
}
