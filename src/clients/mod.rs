//! Outbound API clients.
//!
//! One uniform transport ([`base::ApiClient`]) carries every backend call:
//! path templates with placeholder substitution, a correlation id header,
//! accepted-status checking, and error classification. Service clients
//! (connector, Stripe, webhooks) layer typed operations on top.

pub mod base;
pub mod connector;
pub mod deferred;
pub mod paths;
pub mod stripe;
pub mod webhooks;

pub use base::{ApiClient, ClientErrorEvent, ErrorMode, PatchOp, PatchRequest, RequestContext};
pub use connector::{ConnectorClient, GatewayAccount, StripeAccount};
pub use deferred::{Deferred, Settlement};
pub use stripe::{StripeBankAccount, StripeClient, StripePerson};
pub use webhooks::{Webhook, WebhooksClient};
