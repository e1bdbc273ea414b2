//! Domain types for RegimeLab

pub mod party;
pub mod price;
pub mod returns;

pub use party::{Party, PartyTerm, PresidencyRecord};
pub use price::{PricePoint, TradingDay};
pub use returns::{PartitionedReturn, YearlyReturn};
