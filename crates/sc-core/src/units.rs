// sc-core/src/units.rs
//
// The engine works in US customary units (ft, ft³, cfs) like the collection
// system models it drives. uom is used where exact conversions are needed.

use uom::si::f64::{
    Area as UomArea, Length as UomLength, Time as UomTime, Volume as UomVolume,
    VolumeRate as UomVolumeRate,
};

pub type Area = UomArea;
pub type Length = UomLength;
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn ft(v: f64) -> Length {
    use uom::si::length::foot;
    Length::new::<foot>(v)
}

#[inline]
pub fn ft2(v: f64) -> Area {
    use uom::si::area::square_foot;
    Area::new::<square_foot>(v)
}

#[inline]
pub fn ft3(v: f64) -> Volume {
    use uom::si::volume::cubic_foot;
    Volume::new::<cubic_foot>(v)
}

#[inline]
pub fn cfs(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_foot_per_second;
    VolumeRate::new::<cubic_foot_per_second>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Volume expressed in millions of US gallons.
#[inline]
pub fn to_million_gallons(v: Volume) -> f64 {
    use uom::si::volume::gallon;
    v.get::<gallon>() / 1.0e6
}

pub mod constants {
    /// ft³ → million gallons, as printed in run summary tables.
    pub const FT3_TO_MGAL: f64 = 7.481 / 1.0e6;

    /// Orifice gravity term sqrt(2 g) in ft^0.5/s.
    pub const SQRT_2G_FT: f64 = 8.024;
}
