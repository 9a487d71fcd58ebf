use anyhow::{bail, Result};

use crate::areas::Coordinates;
use crate::geocode::ReverseGeocoder;

pub fn run(geocoder: &ReverseGeocoder, lat: f64, lng: f64) -> Result<()> {
    if !(Coordinates { lat, lng }).is_valid() {
        bail!("Coordinates out of range: {}, {}", lat, lng);
    }

    let found = geocoder.lookup(lat, lng);
    println!("Address: {}", found.address);
    match found.area {
        Some(area) => println!("Area: {}", area),
        None => println!("Area: (not a known locality)"),
    }
    Ok(())
}
