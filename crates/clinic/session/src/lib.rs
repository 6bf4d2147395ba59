pub mod auth;
pub mod context;
pub mod enrich;
pub mod error;
pub mod guard;
pub mod nav;
pub mod ops;
pub mod report;
pub mod router;
pub mod screen;

pub use self::error::{ClinicError, Result};
