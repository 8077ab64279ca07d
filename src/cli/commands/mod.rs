pub mod auth;
pub mod category;
pub mod expense;
pub mod summary;

use chrono::{DateTime, Utc};

use crate::cli::config::Session;
use crate::client::ApiClient;
use crate::filter::parse_timestamp;

/// Client pointed at the session's server, carrying its token if any.
pub(crate) fn client_for(session: &Session) -> anyhow::Result<ApiClient> {
    let client = ApiClient::new(&session.server_url)?;
    Ok(match &session.token {
        Some(token) => client.with_token(token.clone()),
        None => client,
    })
}

pub(crate) fn authenticated_client(session: &Session) -> anyhow::Result<ApiClient> {
    if !session.is_authenticated() {
        anyhow::bail!("Not logged in. Run `expense auth login <email> --password <password>` first");
    }
    client_for(session)
}

pub(crate) fn parse_date_arg(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| anyhow::anyhow!("Invalid date: {} (expected YYYY-MM-DD or RFC 3339)", raw))
}
