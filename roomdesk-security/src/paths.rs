//! Fixed portal paths used by the redirect policies.

pub const ROOT: &str = "/";
pub const LOGIN: &str = "/login";
pub const DASHBOARD: &str = "/dashboard";
pub const MY_RESERVATIONS: &str = "/my-reservations";
pub const ROOM_MANAGEMENT: &str = "/room-management";
pub const USER_MANAGEMENT: &str = "/user-management";
