//! Load the user list and print it.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use people_business::{
    FetchService, LoadState, LoaderConfig, RecordingSurface, ReqwestFetcher, UserRecord,
    UserTableLoader,
};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::output::Output;

#[derive(Tabled)]
struct UserRow<'a> {
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "User name")]
    username: &'a str,
    #[tabled(rename = "Email")]
    email: &'a str,
}

/// Run one load and print its outcome.
///
/// Failed loads are reported through their status message; they are not
/// errors for the process.
#[instrument(skip_all, name = "users", fields(json = json, url = %config.users_url()))]
pub async fn run_users(config: LoaderConfig, json: bool) -> Result<()> {
    let out = Output::new();
    let state = load_state(config, Arc::new(ReqwestFetcher::default())).await;

    match state.records() {
        Some(records) if json => out.print(json_lines(records)?),
        Some(records) => {
            out.print(users_table(records));
            out.total(records.len());
        }
        None => out.state(&state),
    }
    Ok(())
}

/// Runs a load against a recording surface and returns where it settled.
async fn load_state(config: LoaderConfig, fetcher: Arc<dyn FetchService>) -> LoadState {
    let surface = RecordingSurface::new();
    let loader = UserTableLoader::new(config, fetcher, Arc::new(surface.clone()));
    loader.load().await;
    surface.current()
}

fn users_table(records: &[UserRecord]) -> String {
    let rows = records.iter().map(|record| UserRow {
        name: &record.name,
        username: &record.username,
        email: &record.email,
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn json_lines(records: &[UserRecord]) -> Result<String> {
    let lines = records
        .iter()
        .map(|record| serde_json::to_string(record).context("Failed to serialize user"))
        .collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use people_business::test_utils::MockFetcher;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_load_state_settles() {
        let fetcher = MockFetcher::json(200, json!([{"name": "a", "username": "b", "email": "c"}]));
        let state = load_state(LoaderConfig::default(), Arc::new(fetcher)).await;
        assert_eq!(state, LoadState::Loaded(vec![UserRecord::new("a", "b", "c")]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_state_times_out() {
        let config = LoaderConfig::default().with_timeout(Duration::from_millis(50));
        let state = load_state(config, Arc::new(MockFetcher::never())).await;
        assert_eq!(state, LoadState::Timeout);
    }

    #[test]
    fn test_users_table_keeps_raw_values() {
        let table = users_table(&[UserRecord::new("A&B", "ab", "a@b.com")]);
        assert!(table.contains("User name"));
        assert!(table.contains("A&B"));
        assert!(!table.contains("&amp;"));
    }

    #[test]
    fn test_json_lines_one_record_per_line() {
        let lines = json_lines(&[
            UserRecord::new("a", "b", "c"),
            UserRecord::new("d", "e", "f"),
        ])
        .unwrap();
        assert_eq!(
            lines,
            "{\"name\":\"a\",\"username\":\"b\",\"email\":\"c\"}\n\
             {\"name\":\"d\",\"username\":\"e\",\"email\":\"f\"}"
        );
    }
}
