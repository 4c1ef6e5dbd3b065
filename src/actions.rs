//! Report assembly and the end-to-end export pipeline.
//!
//! The pipeline runs strictly sequentially: one login, the membership
//! report, then the saved-query inventory. Any failure aborts the run and
//! leaves already written reports in place.

use crate::configuration::Configuration;
use crate::exit_codes::MbExitCode;
use crate::hierarchy::{self, TraversalError, ROOT_COLLECTION_ID};
use crate::metabase::{ApiError, GroupSource, MetabaseApiClient};
use crate::model::PermissionRecord;
use crate::report::{self, ReportError, PERMISSIONS_REPORT_FILE, QUERIES_REPORT_FILE};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
    #[error("{0}")]
    TraversalError(#[from] TraversalError),
    #[error("report error: {0}")]
    ReportError(#[from] ReportError),
}

impl ActionError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> MbExitCode {
        match self {
            ActionError::ApiError(e) => api_exit_code(e),
            ActionError::TraversalError(TraversalError::ApiError(e)) => api_exit_code(e),
            ActionError::TraversalError(TraversalError::CycleDetected { .. }) => {
                MbExitCode::DataError
            }
            ActionError::ReportError(_) => MbExitCode::OSError,
        }
    }
}

fn api_exit_code(error: &ApiError) -> MbExitCode {
    match error {
        ApiError::AuthenticationFailed { .. } | ApiError::NotLoggedIn => MbExitCode::AuthError,
        ApiError::HttpError(_) => MbExitCode::NetworkError,
        ApiError::JsonError(_) => MbExitCode::DataError,
        ApiError::UnexpectedStatus { .. } => MbExitCode::ApiError,
    }
}

/// Assemble the membership report: one row per (group, member) pair, in
/// listing order, excluding the built-in "All Users" pseudo-group.
pub async fn permission_records<S>(source: &S) -> Result<Vec<PermissionRecord>, ApiError>
where
    S: GroupSource,
{
    let groups = source.list_groups().await?;
    let mut records = Vec::new();

    for group in groups {
        if group.is_all_users() {
            debug!("Skipping the {:?} pseudo-group", group.name);
            continue;
        }

        let members = source.list_group_members(group.id).await?;
        records.extend(
            members
                .into_iter()
                .map(|member| PermissionRecord::new(group.name.clone(), member.email)),
        );
    }

    Ok(records)
}

/// Run the full export: login, then write both reports to the working
/// directory.
pub async fn run(configuration: &Configuration) -> Result<(), ActionError> {
    let mut client = MetabaseApiClient::new(configuration.host())?;
    client
        .login(configuration.username(), configuration.password())
        .await?;

    let permissions = permission_records(&client).await?;
    report::write_report(PERMISSIONS_REPORT_FILE, &permissions)?;
    info!(
        "Wrote {} rows to {}",
        permissions.len(),
        PERMISSIONS_REPORT_FILE
    );

    let queries = hierarchy::collect_leaf_items(&client, ROOT_COLLECTION_ID).await?;
    report::write_report(QUERIES_REPORT_FILE, &queries)?;
    info!("Wrote {} rows to {}", queries.len(), QUERIES_REPORT_FILE);

    Ok(())
}
