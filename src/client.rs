//! HTTP client for the todo API.
//!
//! Owns the client-side list contract: filtering (all/active/completed) and
//! sorting (newest/oldest/priority) happen here, not on the server. Also
//! covers the mutation triggers a UI needs, including toggling completion by
//! re-sending the full task, and saving the PDF report under its fixed
//! filename.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::report::REPORT_FILENAME;
use crate::task::Task;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the request; carries the server-provided message
    /// or a per-action fallback.
    #[error("{0}")]
    Api(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which tasks the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Tasks with `completed == false`.
    Active,
    Completed,
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// List ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    Priority,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "priority" => Ok(Self::Priority),
            other => Err(format!("unknown sort: {other}")),
        }
    }
}

/// Keep only the tasks matching `filter`.
pub fn apply_filter(tasks: &[Task], filter: Filter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| match filter {
            Filter::All => true,
            Filter::Active => !t.completed,
            Filter::Completed => t.completed,
        })
        .cloned()
        .collect()
}

/// Sort in place. All orders are stable, so ties keep their prior order.
pub fn apply_sort(tasks: &mut [Task], sort: SortBy) {
    match sort {
        SortBy::Newest => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::Oldest => tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortBy::Priority => tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

/// Client for a running todo API server.
pub struct TodoClient {
    base_url: String,
    http: reqwest::Client,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch all tasks in the server's newest-first order.
    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let resp = self.http.get(self.url("/api/todos")).send().await?;
        parse_data(resp, "Failed to fetch todos. Please try again.").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/todos/{id}")))
            .send()
            .await?;
        parse_data(resp, "Failed to fetch todo. Please try again.").await
    }

    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/todos"))
            .json(&serde_json::json!({
                "title": title,
                "description": description,
            }))
            .send()
            .await?;
        parse_data(resp, "Failed to save todo. Please try again.").await
    }

    /// Send a partial or full field set for an existing task.
    pub async fn update(
        &self,
        id: Uuid,
        fields: serde_json::Value,
    ) -> Result<Task, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/api/todos/{id}")))
            .json(&fields)
            .send()
            .await?;
        parse_data(resp, "Failed to save todo. Please try again.").await
    }

    /// Re-send the full task with `completed` flipped.
    pub async fn toggle_completed(&self, task: &Task) -> Result<Task, ClientError> {
        self.update(
            task.id,
            serde_json::json!({
                "title": task.title,
                "description": task.description,
                "priority": task.priority,
                "completed": !task.completed,
            }),
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<Task, ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/todos/{id}")))
            .send()
            .await?;
        parse_data(resp, "Failed to delete todo. Please try again.").await
    }

    /// Download the PDF report into `dir` under its fixed filename.
    pub async fn download_report(&self, dir: &Path) -> Result<PathBuf, ClientError> {
        let resp = self
            .http
            .get(self.url("/api/todos/download/pdf"))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_message(resp, "Failed to download PDF. Please try again.").await);
        }

        let bytes = resp.bytes().await?;
        let path = dir.join(REPORT_FILENAME);
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }
}

/// Unwrap a `{success, data}` envelope, or surface the server's error
/// message with `fallback` when the error body does not parse.
async fn parse_data<T: DeserializeOwned>(
    resp: reqwest::Response,
    fallback: &str,
) -> Result<T, ClientError> {
    if resp.status().is_success() {
        let envelope: DataEnvelope<T> = resp.json().await?;
        Ok(envelope.data)
    } else {
        Err(error_message(resp, fallback).await)
    }
}

async fn error_message(resp: reqwest::Response, fallback: &str) -> ClientError {
    match resp.json::<ErrorEnvelope>().await {
        Ok(envelope) => ClientError::Api(envelope.message),
        Err(_) => ClientError::Api(fallback.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{Duration, TimeZone, Utc};

    fn task(title: &str, priority: Priority, completed: bool, order: i64) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            priority,
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(order),
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn active_excludes_completed_and_vice_versa() {
        let tasks = vec![
            task("open", Priority::Medium, false, 3),
            task("done", Priority::Medium, true, 2),
            task("also open", Priority::Medium, false, 1),
        ];

        let active = apply_filter(&tasks, Filter::Active);
        assert!(active.iter().all(|t| !t.completed));
        assert_eq!(active.len(), 2);

        let completed = apply_filter(&tasks, Filter::Completed);
        assert!(completed.iter().all(|t| t.completed));
        assert_eq!(completed.len(), 1);

        assert_eq!(apply_filter(&tasks, Filter::All).len(), tasks.len());
    }

    #[test]
    fn priority_sort_is_high_to_low() {
        let mut tasks = vec![
            task("low", Priority::Low, false, 3),
            task("high", Priority::High, false, 2),
            task("medium", Priority::Medium, false, 1),
        ];

        apply_sort(&mut tasks, SortBy::Priority);
        assert_eq!(titles(&tasks), ["high", "medium", "low"]);
    }

    #[test]
    fn priority_ties_keep_prior_order() {
        let mut tasks = vec![
            task("first", Priority::Medium, false, 3),
            task("second", Priority::Medium, false, 2),
            task("third", Priority::High, false, 1),
        ];

        apply_sort(&mut tasks, SortBy::Priority);
        assert_eq!(titles(&tasks), ["third", "first", "second"]);
    }

    #[test]
    fn newest_and_oldest_are_inverses() {
        let mut tasks = vec![
            task("middle", Priority::Low, false, 2),
            task("newest", Priority::Low, false, 3),
            task("oldest", Priority::Low, false, 1),
        ];

        apply_sort(&mut tasks, SortBy::Newest);
        assert_eq!(titles(&tasks), ["newest", "middle", "oldest"]);

        apply_sort(&mut tasks, SortBy::Oldest);
        assert_eq!(titles(&tasks), ["oldest", "middle", "newest"]);
    }

    #[test]
    fn filter_and_sort_parse_from_cli_words() {
        assert_eq!("active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!("priority".parse::<SortBy>().unwrap(), SortBy::Priority);
        assert!("soonest".parse::<SortBy>().is_err());
    }
}
