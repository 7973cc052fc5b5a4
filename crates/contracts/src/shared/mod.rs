pub mod envelope;
pub mod period;

pub use envelope::ApiEnvelope;
pub use period::YearMonth;
