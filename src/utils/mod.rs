mod location_key;

pub use location_key::location_key;
