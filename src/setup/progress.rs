//! Setup-progress flags and the tasks they track.

use serde::{Deserialize, Serialize};

/// One required onboarding item. The wire name doubles as the JSON-Patch
/// path when the flag is set on the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupTask {
    BankAccount,
    ResponsiblePerson,
    OrganisationDetails,
    VatNumber,
    CompanyNumber,
    GovernmentEntityDocument,
}

impl SetupTask {
    /// Every task, in the order the onboarding flow presents them.
    pub const ALL: [SetupTask; 6] = [
        SetupTask::BankAccount,
        SetupTask::ResponsiblePerson,
        SetupTask::OrganisationDetails,
        SetupTask::VatNumber,
        SetupTask::CompanyNumber,
        SetupTask::GovernmentEntityDocument,
    ];

    /// The flag's wire name, used in the progress body and as the
    /// JSON-Patch path.
    pub fn path(&self) -> &'static str {
        match self {
            Self::BankAccount => "bank_account",
            Self::ResponsiblePerson => "responsible_person",
            Self::OrganisationDetails => "organisation_details",
            Self::VatNumber => "vat_number",
            Self::CompanyNumber => "company_number",
            Self::GovernmentEntityDocument => "government_entity_document",
        }
    }

    /// Human-readable task name for error pages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BankAccount => "Bank account",
            Self::ResponsiblePerson => "Responsible person",
            Self::OrganisationDetails => "Organisation details",
            Self::VatNumber => "VAT number",
            Self::CompanyNumber => "Company number",
            Self::GovernmentEntityDocument => "Government entity document",
        }
    }
}

impl std::fmt::Display for SetupTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Per-account record of completed onboarding requirements.
///
/// Flags are monotonic: the portal only ever sets them `true`, and a
/// completed step is never re-submittable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeSetupProgress {
    #[serde(default)]
    pub bank_account: bool,
    #[serde(default)]
    pub responsible_person: bool,
    #[serde(default)]
    pub organisation_details: bool,
    #[serde(default)]
    pub vat_number: bool,
    #[serde(default)]
    pub company_number: bool,
    #[serde(default)]
    pub government_entity_document: bool,
}

impl StripeSetupProgress {
    /// Whether the given task has been completed.
    pub fn is_complete(&self, task: SetupTask) -> bool {
        match task {
            SetupTask::BankAccount => self.bank_account,
            SetupTask::ResponsiblePerson => self.responsible_person,
            SetupTask::OrganisationDetails => self.organisation_details,
            SetupTask::VatNumber => self.vat_number,
            SetupTask::CompanyNumber => self.company_number,
            SetupTask::GovernmentEntityDocument => self.government_entity_document,
        }
    }

    /// The first task still outstanding, which is the onboarding step the
    /// merchant sees next.
    pub fn next_incomplete(&self) -> Option<SetupTask> {
        SetupTask::ALL.into_iter().find(|task| !self.is_complete(*task))
    }

    /// Whether every requirement has been provided.
    pub fn is_fully_complete(&self) -> bool {
        self.next_incomplete().is_none()
    }
}
