pub mod breakdown;
pub mod calendar;
pub mod growth;
pub mod money;
pub mod phone;
pub mod settlement;

pub use breakdown::{DayBucket, HourBucket, Sale, SalesTotals, WeekBucket};
pub use calendar::VenueCalendar;
pub use growth::percent_change;
pub use money::{PriceError, from_cents, round_currency, to_cents, validate_price};
pub use phone::normalize_phone_number;
pub use settlement::{PriceSchedule, SettlementError, SettlementPolicy, compute_cost};
