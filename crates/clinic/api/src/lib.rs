pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod error;
pub mod id;
pub mod medical_history;
pub mod patient;
pub mod role;
pub mod time;
pub mod timetable;
pub mod token;

pub mod consts {
    pub const API_BASE: &str = "api/v1/";
    pub const AUTH_BASE: &str = "auth/";

    pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
    pub const DEFAULT_HEADER_AUTH: &str = "auth-x";

    pub const BEARER_PREFIX: &str = "Bearer ";
}
