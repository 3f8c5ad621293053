pub mod calendar;
pub mod clock;
pub mod format;
pub mod resolve;

pub use crate::domain::ports::{Clock, Temporal};
pub use crate::utils::error::Result;
