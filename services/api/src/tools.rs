use clap::Args;
use locum_match::geo::{adjust_radius, calculate_distance, Bounds, GeoPoint, GeocodedPlace};

use crate::infra::parse_point;

#[derive(Args, Debug)]
pub(crate) struct RadiusArgs {
    /// Geocoder place types, comma separated (e.g. locality,political)
    #[arg(long, value_delimiter = ',')]
    pub(crate) types: Vec<String>,
    /// North-east corner of the place bounds as lat,lng
    #[arg(long, value_parser = parse_point, requires = "sw", allow_hyphen_values = true)]
    pub(crate) ne: Option<GeoPoint>,
    /// South-west corner of the place bounds as lat,lng
    #[arg(long, value_parser = parse_point, requires = "ne", allow_hyphen_values = true)]
    pub(crate) sw: Option<GeoPoint>,
    /// Radius requested by the user, in kilometers
    #[arg(long)]
    pub(crate) radius: f64,
}

#[derive(Args, Debug)]
pub(crate) struct DistanceArgs {
    /// Origin as lat,lng
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub(crate) from: GeoPoint,
    /// Destination as lat,lng
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub(crate) to: GeoPoint,
}

pub(crate) fn run_radius(args: RadiusArgs) {
    println!("{}", radius_report(&args));
}

pub(crate) fn run_distance(args: DistanceArgs) {
    println!("{}", distance_report(&args));
}

fn radius_report(args: &RadiusArgs) -> String {
    let mut place = GeocodedPlace::with_types(args.types.iter().map(|tag| tag.trim()));
    if let (Some(northeast), Some(southwest)) = (args.ne, args.sw) {
        place = place.bounded(Bounds::new(northeast, southwest));
    }

    let adjustment = adjust_radius(Some(&place), args.radius);
    let mut lines = vec![
        format!(
            "City-wide search: {}",
            if adjustment.city_wide { "yes" } else { "no" }
        ),
        format!("Requested radius: {} km", adjustment.requested_km),
    ];
    if let Some(city_radius) = adjustment.city_radius_km {
        lines.push(format!("Estimated city radius: {city_radius:.2} km"));
    }
    lines.push(format!(
        "Effective radius: {} km{}",
        adjustment.effective_km,
        if adjustment.enlarged() {
            " (enlarged)"
        } else {
            ""
        }
    ));
    lines.join("\n")
}

fn distance_report(args: &DistanceArgs) -> String {
    let distance = calculate_distance(args.from.lat, args.from.lng, args.to.lat, args.to.lng);
    format!(
        "Distance ({}, {}) -> ({}, {}): {distance:.2} km",
        args.from.lat, args.from.lng, args.to.lat, args.to.lng
    )
}
