pub mod dto;
pub mod zone;

pub use dto::*;
pub use zone::{Zone, ZoneBadge};
