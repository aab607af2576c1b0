//! CLI helper functions
//!
//! Composes client operations into the named commands the binary exposes
//! and renders the per-item outcome records as console summaries.

use crate::client::{ActivationOutcome, ActivationStatus, ImportOutcome, N8nClient};
use crate::config::Config;
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

/// Build an API client from the configuration snapshot.
pub fn load_client(config: &Config) -> Result<N8nClient> {
    let credentials = config.credentials();
    log::debug!(
        "Connecting to {} (auth: {})",
        config.base_url.as_str().bright_black(),
        credentials
    );
    N8nClient::try_new(config.base_url.clone(), credentials)
        .context("Failed to create n8n client")
}

/// Abort early when the API rejects our credentials.
///
/// Orchestration commands treat an unauthenticated client as fatal; a
/// partial run against a server that rejects every call helps nobody.
pub async fn ensure_authenticated(client: &N8nClient) -> Result<()> {
    let auth = client.check_auth().await?;
    if !auth.authenticated {
        eyre::bail!(
            "Not authenticated to the n8n API at {}. Set N8N_API_KEY or N8N_SESSION_COOKIE.",
            client.url()
        );
    }
    log::debug!("Authenticated to {}", client.url());
    Ok(())
}

/// Print the per-file import summary.
pub fn print_import_summary(outcomes: &[ImportOutcome]) {
    log::info!("Import summary:");
    for outcome in outcomes {
        match &outcome.error {
            Some(error) => {
                log::error!("✗ {}: {}", outcome.file.cyan(), error);
            }
            None => {
                log::info!(
                    "✓ {} → {} (id: {})",
                    outcome.file.cyan(),
                    outcome.name.as_deref().unwrap_or("unknown"),
                    outcome.id.as_deref().unwrap_or("unknown").bright_black()
                );
            }
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    log::info!("Imported {} of {} workflow(s)", succeeded, outcomes.len());
}

/// Print the activation summary, grouped by outcome.
pub fn print_activation_summary(outcomes: &[ActivationOutcome]) {
    let activated: Vec<_> = outcomes
        .iter()
        .filter(|o| o.status == ActivationStatus::Activated)
        .collect();
    let already_active: Vec<_> = outcomes
        .iter()
        .filter(|o| o.status == ActivationStatus::AlreadyActive)
        .collect();
    let errors: Vec<_> = outcomes
        .iter()
        .filter(|o| o.status == ActivationStatus::Error)
        .collect();

    log::info!("Activation summary:");
    if !activated.is_empty() {
        log::info!("Activated {} workflow(s):", activated.len());
        for outcome in activated {
            log::info!("  - {}", outcome.name.cyan());
        }
    }
    if !already_active.is_empty() {
        log::info!("Already active {} workflow(s):", already_active.len());
        for outcome in already_active {
            log::info!("  - {}", outcome.name.cyan());
        }
    }
    if !errors.is_empty() {
        log::error!("Failed to activate {} workflow(s):", errors.len());
        for outcome in errors {
            log::error!(
                "  - {}: {}",
                outcome.name.cyan(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Import or update every workflow file in the directory.
pub async fn import_all(client: &N8nClient, workflows_dir: impl AsRef<Path>) -> Result<()> {
    ensure_authenticated(client).await?;

    log::info!("Importing workflows to n8n...");
    let outcomes = client.import_all_workflows(workflows_dir).await?;
    print_import_summary(&outcomes);
    Ok(())
}

/// Activate the workflows this project's files define, by name.
pub async fn activate_project(client: &N8nClient, workflows_dir: impl AsRef<Path>) -> Result<()> {
    ensure_authenticated(client).await?;

    log::info!("Activating project workflows in n8n...");
    let outcomes = client.activate_project_workflows(workflows_dir).await?;
    print_activation_summary(&outcomes);
    Ok(())
}

/// Activate every workflow on the remote, project or not.
pub async fn activate_all(client: &N8nClient) -> Result<()> {
    ensure_authenticated(client).await?;

    log::info!("Activating all workflows in n8n...");
    let outcomes = client.activate_all_workflows().await?;
    print_activation_summary(&outcomes);
    Ok(())
}

/// Import everything, then activate everything.
pub async fn setup(client: &N8nClient, workflows_dir: impl AsRef<Path>) -> Result<()> {
    ensure_authenticated(client).await?;

    log::info!("Step 1: Importing workflows...");
    let import_outcomes = client.import_all_workflows(workflows_dir).await?;
    print_import_summary(&import_outcomes);

    log::info!("Step 2: Activating workflows...");
    let activation_outcomes = client.activate_all_workflows().await?;
    print_activation_summary(&activation_outcomes);

    log::info!("Setup complete");
    Ok(())
}

/// Full reset: delete every remote workflow, re-import the local set,
/// activate it, then verify the final remote state.
pub async fn full_reset(client: &N8nClient, workflows_dir: impl AsRef<Path>) -> Result<()> {
    let workflows_dir = workflows_dir.as_ref();
    ensure_authenticated(client).await?;

    log::info!("Step 1: Deleting all existing workflows...");
    let existing = client.list_workflows().await?;
    log::info!("Found {} workflow(s)", existing.len());
    for workflow in &existing {
        let Some(id) = workflow.id() else {
            continue;
        };
        match client.delete_workflow(id).await {
            Ok(()) => log::info!("✓ Deleted: {}", workflow.name().cyan()),
            Err(error) => {
                log::error!("✗ Failed to delete {}: {:#}", workflow.name().cyan(), error);
            }
        }
    }

    log::info!("Step 2: Importing workflows...");
    let import_outcomes = client.import_all_workflows(workflows_dir).await?;
    print_import_summary(&import_outcomes);

    log::info!("Step 3: Activating workflows...");
    let activation_outcomes = client.activate_project_workflows(workflows_dir).await?;
    print_activation_summary(&activation_outcomes);

    log::info!("Step 4: Verifying workflows...");
    let final_workflows = client.list_workflows().await?;
    let active_count = final_workflows
        .iter()
        .filter(|w| w.active() == Some(true))
        .count();
    log::info!("Total workflows: {}", final_workflows.len());
    log::info!("Active workflows: {}", active_count);

    let expected = crate::workflow::list_workflow_files(workflows_dir)?.len();
    if active_count < expected {
        log::warn!(
            "Expected at least {} active workflow(s), found {}",
            expected,
            active_count
        );
    }

    log::info!("Full reset complete");
    Ok(())
}

/// List the remote workflows with their activation state.
pub async fn list(client: &N8nClient) -> Result<()> {
    let workflows = client.list_workflows().await?;
    log::info!("Found {} workflow(s)", workflows.len());
    for workflow in &workflows {
        let state = match workflow.active() {
            Some(true) => "active".green().to_string(),
            _ => "inactive".bright_black().to_string(),
        };
        log::info!(
            "  {} {} (id: {})",
            state,
            workflow.name().cyan(),
            workflow.id().unwrap_or("-").bright_black()
        );
    }
    Ok(())
}

/// Report whether the configured credentials are accepted.
pub async fn auth(client: &N8nClient) -> Result<()> {
    let auth = client.check_auth().await?;
    match auth.authenticated {
        true => log::info!("✓ Authenticated to {}", client.url()),
        false => eyre::bail!(
            "Not authenticated to the n8n API at {}. Set N8N_API_KEY or N8N_SESSION_COOKIE.",
            client.url()
        ),
    }
    Ok(())
}
