//! Local workflow file access
//!
//! Workflows live as one JSON file each inside a project directory. File
//! order is load-bearing: bulk operations process workflows in the
//! lexicographic order returned by [`list_workflow_files`].

use super::Workflow;
use eyre::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// List workflow definition files in a directory.
///
/// Returns only filenames ending in `.json`, sorted lexicographically
/// ascending. An empty directory yields an empty list.
pub fn list_workflow_files(directory: impl AsRef<Path>) -> Result<Vec<String>> {
    let directory = directory.as_ref();
    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("Failed to read directory: {}", directory.display()))?;

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json"))
        .collect();
    files.sort();

    Ok(files)
}

/// Read and validate a single workflow file.
///
/// Fails when the file cannot be read, is not JSON, or does not satisfy
/// the minimal workflow shape. Errors name the offending path.
pub fn read_workflow_file(path: impl AsRef<Path>) -> Result<Workflow> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workflow file: {}", path.display()))?;

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid workflow file: {}", path.display()))?;

    Workflow::try_from(value)
        .map_err(|error| error.wrap_err(format!("Invalid workflow file: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn valid_workflow_json(name: &str) -> String {
        json!({
            "name": name,
            "nodes": [],
            "connections": {}
        })
        .to_string()
    }

    #[test]
    fn test_list_returns_only_json_sorted() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "02-beta.json", "{}");
        write_file(temp_dir.path(), "01-alpha.json", "{}");
        write_file(temp_dir.path(), "notes.txt", "not a workflow");
        write_file(temp_dir.path(), "README.md", "docs");

        let files = list_workflow_files(temp_dir.path()).unwrap();
        assert_eq!(files, vec!["01-alpha.json", "02-beta.json"]);
    }

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let files = list_workflow_files(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_missing_directory_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");
        let err = list_workflow_files(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read directory"));
    }

    #[test]
    fn test_read_valid_workflow() {
        let temp_dir = TempDir::new().unwrap();
        write_file(temp_dir.path(), "alpha.json", &valid_workflow_json("Alpha"));

        let workflow = read_workflow_file(temp_dir.path().join("alpha.json")).unwrap();
        assert_eq!(workflow.name(), "Alpha");
        assert_eq!(workflow.id(), None);
    }

    #[test]
    fn test_read_rejects_missing_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        write_file(
            temp_dir.path(),
            "broken.json",
            &json!({ "nodes": [], "connections": {} }).to_string(),
        );

        let err = read_workflow_file(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid workflow file"));
        assert!(message.contains(path.to_str().unwrap()));
    }

    #[test]
    fn test_read_rejects_malformed_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.json");
        write_file(temp_dir.path(), "garbage.json", "{ not json");

        let err = read_workflow_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid workflow file"));
    }

    #[test]
    fn test_read_preserves_structure() {
        let temp_dir = TempDir::new().unwrap();
        let value = json!({
            "name": "Alpha",
            "nodes": [{ "id": "n1", "name": "Webhook", "type": "webhook" }],
            "connections": { "Webhook": { "main": [] } }
        });
        write_file(temp_dir.path(), "alpha.json", &value.to_string());

        let workflow = read_workflow_file(temp_dir.path().join("alpha.json")).unwrap();
        assert_eq!(workflow.into_value(), value);
    }
}
