//! Connector path templates.
//!
//! An immutable table keyed by operation; templates carry `{placeholder}`
//! segments substituted with identifiers per call.

/// Connector endpoints the portal calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorPath {
    /// GET one account via the frontend resource.
    FrontendAccount,
    /// GET one account by its external id.
    AccountByExternalId,
    /// PATCH gateway credentials.
    Credentials,
    /// POST a refund for a charge.
    ChargeRefunds,
    /// GET/PATCH the Stripe setup flags.
    StripeSetup,
    /// GET the Stripe account linked to a gateway account.
    StripeAccount,
    /// PATCH a single account field (JSON-Patch envelope).
    Account,
}

impl ConnectorPath {
    pub fn template(self) -> &'static str {
        match self {
            Self::FrontendAccount => "/v1/frontend/accounts/{accountId}",
            Self::AccountByExternalId => "/v1/api/accounts/external-id/{externalId}",
            Self::Credentials => "/v1/frontend/accounts/{accountId}/credentials",
            Self::ChargeRefunds => "/v1/api/accounts/{accountId}/charges/{chargeId}/refunds",
            Self::StripeSetup => "/v1/api/accounts/{accountId}/stripe-setup",
            Self::StripeAccount => "/v1/api/accounts/{accountId}/stripe-account",
            Self::Account => "/v1/api/accounts/{accountId}",
        }
    }
}

/// Substitute `{key}` placeholders in a path template.
///
/// Placeholders with no matching parameter are left untouched, so a missed
/// substitution is visible in logs rather than silently collapsed.
pub fn expand(template: &str, params: &[(&str, &str)]) -> String {
    let mut path = template.to_string();
    for (key, value) in params {
        path = path.replace(&format!("{{{key}}}"), value);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_single_placeholder() {
        assert_eq!(
            expand(ConnectorPath::StripeSetup.template(), &[("accountId", "42")]),
            "/v1/api/accounts/42/stripe-setup"
        );
    }

    #[test]
    fn expands_multiple_placeholders() {
        assert_eq!(
            expand(
                ConnectorPath::ChargeRefunds.template(),
                &[("accountId", "42"), ("chargeId", "ch_123")],
            ),
            "/v1/api/accounts/42/charges/ch_123/refunds"
        );
    }

    #[test]
    fn leaves_unknown_placeholders_visible() {
        assert_eq!(
            expand(ConnectorPath::ChargeRefunds.template(), &[("accountId", "42")]),
            "/v1/api/accounts/42/charges/{chargeId}/refunds"
        );
    }

    #[test]
    fn literal_segments_untouched() {
        assert_eq!(
            expand(ConnectorPath::AccountByExternalId.template(), &[("externalId", "ext-1")]),
            "/v1/api/accounts/external-id/ext-1"
        );
        assert_eq!(
            expand(ConnectorPath::FrontendAccount.template(), &[("accountId", "7")]),
            "/v1/frontend/accounts/7"
        );
    }
}
