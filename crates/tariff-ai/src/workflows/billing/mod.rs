//! Billing workflow: tariff tables, fixed-fee procedures, intent
//! classification, progressive charge computation, and the per-session
//! dialogue router that ties them together.

pub mod calculator;
pub mod dialog;
pub mod domain;
pub mod intent;
pub mod procedures;
pub mod session;
pub mod tariffs;

#[cfg(test)]
mod tests;

pub use calculator::{compute_total, compute_water};
pub use dialog::{DialogError, DialogRouter};
pub use domain::{ChargeBreakdown, ConsumerCategory, SewagePercent, WaterCharge};
pub use intent::{classify, FaqTopic, MessageIntent};
pub use procedures::{DisplacementGround, ProcedureQuote, ServiceProcedure};
pub use session::{InMemorySessionStore, SessionKey, SessionStore};
pub use tariffs::{CategoryTariff, TariffError};
