pub mod error;
pub mod money;

pub use error::{AppError, Result};
pub use money::{apply_percent, non_negative, round_rupiah};
