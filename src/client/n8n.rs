//! n8n client module
//!
//! Provides `N8nClient` for making requests against the n8n public REST
//! API (`/api/v1/workflows`), including the name-based import-or-update
//! reconciliation and the bulk import/activate operations.

use super::{ActivationOutcome, AuthCheck, Credentials, ImportOutcome};
use crate::workflow::{Workflow, ensure_non_blank, list_workflow_files, read_workflow_file};
use eyre::{Result, eyre};
use owo_colors::OwoColorize;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

const WORKFLOWS_PATH: &str = "/api/v1/workflows";

/// The `{ "data": [...] }` envelope n8n wraps collection responses in.
#[derive(Deserialize)]
struct WorkflowList {
    data: Vec<Workflow>,
}

/// n8n API client.
///
/// Connection configuration is immutable after construction; every
/// operation is a single round trip with no retries and no caching, so
/// each call observes the server's current state fresh.
///
/// # Example
/// ```no_run
/// use n8n_workflow_manager::client::{Credentials, N8nClient};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("http://localhost:5678")?;
/// let credentials = Credentials::new(Some("api-key".into()), None);
/// let client = N8nClient::try_new(url, credentials)?;
///
/// let workflows = client.list_workflows().await?;
/// for workflow in &workflows {
///     println!("{}", workflow);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct N8nClient {
    http: Client,
    url: Url,
}

impl N8nClient {
    /// Create a new client from a base URL and credentials.
    ///
    /// The API key (if any) is attached to every request as the
    /// `X-N8N-API-KEY` header, the session cookie (if any) as the
    /// `Cookie` header. Both may be present at once.
    ///
    /// # Errors
    /// Returns an error if a credential is not a valid header value or
    /// the HTTP client cannot be built.
    pub fn try_new(url: Url, credentials: Credentials) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::CONTENT_TYPE, "application/json".parse()?);
        if let Some(api_key) = &credentials.api_key {
            headers.insert("X-N8N-API-KEY", api_key.parse()?);
        }
        if let Some(cookie) = &credentials.session_cookie {
            headers.insert(reqwest::header::COOKIE, cookie.parse()?);
        }

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { http, url })
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send a request to a path relative to the base URL.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        log::debug!("{} {}", method.as_str().green(), path);

        let mut request = self.http.request(method, self.url.join(path)?);
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))
    }

    /// Bail with status and response body on a non-2xx response.
    async fn expect_success(
        response: reqwest::Response,
        action: &str,
    ) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        eyre::bail!("{} ({}): {}", action, status, body)
    }

    /// Probe authentication by listing workflows.
    ///
    /// n8n has no "whoami" endpoint that exists across versions, so the
    /// listing endpoint doubles as the auth probe. A 401 or 403 yields
    /// `authenticated: false` without erroring; any other failure
    /// propagates.
    pub async fn check_auth(&self) -> Result<AuthCheck> {
        let response = self.request(Method::GET, WORKFLOWS_PATH, None).await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                log::debug!("{} auth probe rejected", response.status().yellow());
                Ok(AuthCheck::denied())
            }
            status if status.is_success() => Ok(AuthCheck::granted()),
            status => {
                let body = response.text().await.unwrap_or_default();
                eyre::bail!("Auth probe failed ({}): {}", status, body)
            }
        }
    }

    /// List all remote workflows.
    ///
    /// Assumes the server returns the full collection in one page.
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        let response = self.request(Method::GET, WORKFLOWS_PATH, None).await?;
        let response = Self::expect_success(response, "Failed to list workflows").await?;
        let list: WorkflowList = response.json().await?;
        Ok(list.data)
    }

    /// Fetch a single workflow by ID.
    pub async fn get_workflow(&self, id: &str) -> Result<Workflow> {
        ensure_non_blank(id, "Workflow ID")?;
        let path = format!("{}/{}", WORKFLOWS_PATH, id);
        let response = self.request(Method::GET, &path, None).await?;
        let response =
            Self::expect_success(response, &format!("Failed to get workflow {}", id)).await?;
        Ok(response.json().await?)
    }

    /// Create a workflow from a local definition file.
    ///
    /// The file is validated and sanitized for import (server-assigned
    /// fields dropped) before the POST.
    pub async fn import_workflow(&self, file_path: impl AsRef<Path>) -> Result<Workflow> {
        let workflow = read_workflow_file(&file_path)?;
        let payload = workflow.sanitized_for_import();

        let response = self
            .request(Method::POST, WORKFLOWS_PATH, Some(&payload))
            .await?;
        let response = Self::expect_success(
            response,
            &format!("Failed to import workflow {}", workflow.name().cyan()),
        )
        .await?;
        Ok(response.json().await?)
    }

    /// Update an existing workflow from a local definition file.
    pub async fn update_workflow(&self, id: &str, file_path: impl AsRef<Path>) -> Result<Workflow> {
        ensure_non_blank(id, "Workflow ID")?;
        let workflow = read_workflow_file(&file_path)?;
        let payload = workflow.sanitized_for_update();

        let path = format!("{}/{}", WORKFLOWS_PATH, id);
        let response = self.request(Method::PUT, &path, Some(&payload)).await?;
        let response = Self::expect_success(
            response,
            &format!("Failed to update workflow {}", workflow.name().cyan()),
        )
        .await?;
        Ok(response.json().await?)
    }

    /// Mark a workflow as live/triggerable.
    pub async fn activate_workflow(&self, id: &str) -> Result<Workflow> {
        ensure_non_blank(id, "Workflow ID")?;
        let path = format!("{}/{}/activate", WORKFLOWS_PATH, id);
        let response = self.request(Method::POST, &path, None).await?;
        let response =
            Self::expect_success(response, &format!("Failed to activate workflow {}", id)).await?;
        Ok(response.json().await?)
    }

    /// Take a workflow offline.
    pub async fn deactivate_workflow(&self, id: &str) -> Result<Workflow> {
        ensure_non_blank(id, "Workflow ID")?;
        let path = format!("{}/{}/deactivate", WORKFLOWS_PATH, id);
        let response = self.request(Method::POST, &path, None).await?;
        let response =
            Self::expect_success(response, &format!("Failed to deactivate workflow {}", id))
                .await?;
        Ok(response.json().await?)
    }

    /// Delete a workflow.
    pub async fn delete_workflow(&self, id: &str) -> Result<()> {
        ensure_non_blank(id, "Workflow ID")?;
        let path = format!("{}/{}", WORKFLOWS_PATH, id);
        let response = self.request(Method::DELETE, &path, None).await?;
        Self::expect_success(response, &format!("Failed to delete workflow {}", id)).await?;
        Ok(())
    }

    /// Import or update a workflow, matching by name (idempotent).
    ///
    /// Lists the remote workflows and looks for the first whose name is
    /// exactly `name`; updates it when found, creates otherwise. The
    /// re-list on every call is O(n) by design; at the tens-of-workflows
    /// scale this client targets that beats carrying a cache that can go
    /// stale.
    pub async fn import_or_update_workflow(
        &self,
        file_path: impl AsRef<Path>,
        name: &str,
    ) -> Result<Workflow> {
        ensure_non_blank(name, "Workflow name")?;

        let workflows = self.list_workflows().await?;
        let existing_id = workflows
            .iter()
            .find(|workflow| workflow.name() == name)
            .and_then(|workflow| workflow.id().map(str::to_string));

        match existing_id {
            Some(id) => {
                log::info!(
                    "Updating existing workflow: {} (id: {})",
                    name.cyan(),
                    id.cyan()
                );
                self.update_workflow(&id, file_path).await
            }
            None => {
                log::info!("Importing new workflow: {}", name.cyan());
                self.import_workflow(file_path).await
            }
        }
    }

    /// Import every workflow file in a directory, in lexicographic order.
    ///
    /// Per-file failures (unreadable files included) are captured in the
    /// outcome record; the loop never aborts early.
    pub async fn import_all_workflows(
        &self,
        directory: impl AsRef<Path>,
    ) -> Result<Vec<ImportOutcome>> {
        let directory = directory.as_ref();
        let files = list_workflow_files(directory)?;
        let mut outcomes = Vec::with_capacity(files.len());

        for file in files {
            let path = directory.join(&file);

            let workflow = match read_workflow_file(&path) {
                Ok(workflow) => workflow,
                Err(error) => {
                    let message = format!("{:#}", error);
                    log::error!("✗ Failed to read {}: {}", file.cyan(), message);
                    outcomes.push(ImportOutcome::failure(file, None, message));
                    continue;
                }
            };

            let name = workflow.name().to_string();
            match self.import_or_update_workflow(&path, &name).await {
                Ok(remote) => {
                    outcomes.push(ImportOutcome::success(file, name, &remote));
                }
                Err(error) => {
                    let message = format!("{:#}", error);
                    log::error!("✗ Failed to import {}: {}", file.cyan(), message);
                    outcomes.push(ImportOutcome::failure(file, Some(name), message));
                }
            }
        }

        Ok(outcomes)
    }

    /// Activate every remote workflow matching the filter.
    ///
    /// Non-matching workflows are untouched and unreported; workflows
    /// without an ID are silently skipped. Already-active workflows are
    /// reported without issuing a request. One workflow's activation
    /// failure does not stop the rest.
    async fn activate_workflows_with_filter<F>(&self, filter: F) -> Result<Vec<ActivationOutcome>>
    where
        F: Fn(&Workflow) -> bool,
    {
        let workflows = self.list_workflows().await?;
        let mut outcomes = Vec::new();

        for workflow in workflows {
            if !filter(&workflow) {
                continue;
            }

            let Some(id) = workflow.id().map(str::to_string) else {
                continue;
            };
            let name = workflow.name().to_string();

            if workflow.active() == Some(true) {
                log::info!("- Already active: {}", name.cyan());
                outcomes.push(ActivationOutcome::already_active(name, id));
                continue;
            }

            match self.activate_workflow(&id).await {
                Ok(_) => {
                    log::info!("✓ Activated: {}", name.cyan());
                    outcomes.push(ActivationOutcome::activated(name, id));
                }
                Err(error) => {
                    let message = format!("{:#}", error);
                    log::error!("✗ Failed to activate {}: {}", name.cyan(), message);
                    outcomes.push(ActivationOutcome::failed(name, id, message));
                }
            }
        }

        Ok(outcomes)
    }

    /// Activate every remote workflow.
    pub async fn activate_all_workflows(&self) -> Result<Vec<ActivationOutcome>> {
        self.activate_workflows_with_filter(|_| true).await
    }

    /// Activate only the workflows defined by files in the given
    /// directory, matched by name. Other remote workflows are untouched.
    pub async fn activate_project_workflows(
        &self,
        directory: impl AsRef<Path>,
    ) -> Result<Vec<ActivationOutcome>> {
        let directory = directory.as_ref();
        let files = list_workflow_files(directory)?;

        let mut project_names = HashSet::new();
        for file in files {
            let workflow = read_workflow_file(directory.join(&file))?;
            project_names.insert(workflow.name().to_string());
        }

        self.activate_workflows_with_filter(|workflow| project_names.contains(workflow.name()))
            .await
    }
}

impl std::fmt::Display for N8nClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
