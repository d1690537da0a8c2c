//! Account-level Stripe setup progress.
//!
//! The connector owns the progress record; the portal holds a
//! request-scoped copy and only ever sets flags to `true`. Every KYC
//! sub-step consults the gate before rendering its collection form.

pub mod gate;
pub mod progress;

pub use gate::check;
pub use progress::{SetupTask, StripeSetupProgress};
