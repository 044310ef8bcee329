use crate::entities::game_session::Coordinate;

/// Number of address characters kept when no coordinate is available.
const ADDRESS_KEY_CHARS: usize = 12;

/// Derive the coarse grouping key of a session location.
///
/// With a coordinate, each component is truncated (not rounded) to three
/// decimals and the two are joined with `:`. Without one, the key is the first
/// twelve characters of the approximate address.
#[must_use]
pub fn location_key(coordinate: Option<Coordinate>, address_approx: &str) -> String {
    coordinate.map_or_else(
        || address_approx.chars().take(ADDRESS_KEY_CHARS).collect(),
        |c| {
            format!(
                "{:.3}:{:.3}",
                truncate_3(c.latitude),
                truncate_3(c.longitude)
            )
        },
    )
}

fn truncate_3(value: f64) -> f64 {
    let truncated = (value * 1000.0).trunc() / 1000.0;
    // Avoid rendering "-0.000" for tiny negative values
    if truncated == 0.0 { 0.0 } else { truncated }
}
