pub mod api;
mod session;
pub mod storage;

pub use session::Session;

use crate::shared::config::{get_token_path, Config};
use storage::TokenStore;

fn token_store(config: &Config) -> TokenStore {
    TokenStore::new(get_token_path(config))
}

/// Helper: Perform login and persist the token
pub async fn do_login(config: &Config, email: String, password: String) -> anyhow::Result<Session> {
    let anonymous = Session::new(config.api.clone(), None)?;
    let response = api::login(&anonymous, email, password).await?;

    let store = token_store(config);
    store.save(&response.token)?;
    tracing::info!("Logged in, token saved to {}", store.path().display());

    Ok(anonymous.with_token(response.token))
}

/// Session from the saved token, unauthenticated if there is none
pub fn restore_session(config: &Config) -> anyhow::Result<Session> {
    let store = token_store(config);
    let token = store.load();
    if token.is_none() {
        tracing::warn!("No saved session token in {}", store.path().display());
    }
    Ok(Session::new(config.api.clone(), token)?)
}

/// Helper: Perform logout
pub fn do_logout(config: &Config) -> anyhow::Result<()> {
    token_store(config).clear()?;
    tracing::info!("Logged out");
    Ok(())
}
