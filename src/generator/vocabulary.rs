//! Fixed value sets the synthetic dataset is drawn from.

pub const AIRLINES: [&str; 5] = [
    "American Airlines",
    "Delta Airlines",
    "Alaska",
    "Aeromexico",
    "Volaris",
];

pub const AIRPORTS: [&str; 5] = ["PDX", "GDL", "SJC", "LAX", "JFK"];

pub const GENDERS: [&str; 4] = ["male", "female", "unspecified", "undisclosed"];

pub const REASON_PLEASURE: &str = "On vacation/Pleasure";
pub const REASON_BUSINESS: &str = "Business/Work";
pub const REASON_BACK_HOME: &str = "Back Home";

pub const REASONS: [&str; 3] = [REASON_PLEASURE, REASON_BUSINESS, REASON_BACK_HOME];

pub const STAY_HOME: &str = "Home";

pub const STAYS: [&str; 4] = ["Hotel", "Short-term homestay", STAY_HOME, "Friend/Family"];

pub const TRANSIT_OWN_CAR: &str = "Own car";

pub const TRANSITS: [&str; 6] = [
    "Airport cab",
    "Car rental",
    "Mobility as a service",
    "Public Transportation",
    "Pickup",
    TRANSIT_OWN_CAR,
];

/// Flight ids are `FL` + 8 chars, passenger ids `PASS` + 6 chars.
pub const FLIGHT_ID_PREFIX: &str = "FL";
pub const FLIGHT_ID_LEN: usize = 8;
pub const PASSENGER_ID_PREFIX: &str = "PASS";
pub const PASSENGER_ID_LEN: usize = 6;

pub const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 90;

pub const MIN_WAIT_MINUTES: i32 = 30;
pub const MAX_WAIT_MINUTES: i32 = 720;

/// Travel dates fall in `[START, END)`.
pub const DATE_RANGE_START: (i32, u32, u32) = (2013, 1, 1);
pub const DATE_RANGE_END: (i32, u32, u32) = (2023, 4, 25);
