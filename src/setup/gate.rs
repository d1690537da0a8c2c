//! Pre-render gate for KYC collection steps.

use crate::error::SetupError;

use super::progress::{SetupTask, StripeSetupProgress};

/// Check whether a collection form for `task` may be shown.
///
/// Applied uniformly before every KYC sub-step: a request with no setup
/// progress attached is a configuration fault and goes to the central
/// error handler; a completed step renders the "already provided" page
/// and is never re-submittable; otherwise the collection form is shown.
pub fn check(progress: Option<&StripeSetupProgress>, task: SetupTask) -> Result<(), SetupError> {
    let progress = progress.ok_or(SetupError::ProgressNotAvailable)?;
    if progress.is_complete(task) {
        return Err(SetupError::AlreadyProvided {
            task: task.display_name(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_progress_is_a_configuration_fault() {
        let result = check(None, SetupTask::GovernmentEntityDocument);
        let Err(SetupError::ProgressNotAvailable) = result else {
            panic!("expected ProgressNotAvailable, got {result:?}");
        };
        assert_eq!(
            SetupError::ProgressNotAvailable.to_string(),
            "Stripe setup progress is not available on request"
        );
    }

    #[test]
    fn completed_task_cannot_be_resubmitted() {
        let progress = StripeSetupProgress {
            government_entity_document: true,
            ..Default::default()
        };
        let result = check(Some(&progress), SetupTask::GovernmentEntityDocument);
        let Err(SetupError::AlreadyProvided { task }) = result else {
            panic!("expected AlreadyProvided, got {result:?}");
        };
        assert_eq!(task, "Government entity document");
    }

    #[test]
    fn outstanding_task_shows_collection_form() {
        let progress = StripeSetupProgress {
            government_entity_document: false,
            ..Default::default()
        };
        assert!(check(Some(&progress), SetupTask::GovernmentEntityDocument).is_ok());
    }

    #[test]
    fn gate_inspects_only_its_own_flag() {
        // Every other flag set; the one under test still gates open.
        let progress = StripeSetupProgress {
            bank_account: true,
            organisation_details: true,
            vat_number: true,
            company_number: true,
            government_entity_document: true,
            responsible_person: false,
        };
        assert!(check(Some(&progress), SetupTask::ResponsiblePerson).is_ok());
    }
}
