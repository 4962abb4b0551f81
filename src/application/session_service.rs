// Session gate - login, logout and the start-up token check
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::application::errors::ServiceError;
use crate::application::notifications::Notifier;
use crate::application::token_store::TokenStore;
use crate::domain::session::{DemoAccount, Session};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct SessionGate {
    api: Arc<dyn DashboardApi>,
    store: Arc<dyn TokenStore>,
    notifier: Notifier,
    session: RwLock<Option<Session>>,
}

impl SessionGate {
    pub fn new(api: Arc<dyn DashboardApi>, store: Arc<dyn TokenStore>, notifier: Notifier) -> Self {
        Self {
            api,
            store,
            notifier,
            session: RwLock::new(None),
        }
    }

    /// Single best-effort check of the stored token. Any failure clears it.
    pub async fn restore(&self) -> Option<Session> {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("no stored session token");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session token");
                return None;
            }
        };

        match self.api.me(&token).await {
            Ok(user) if user.is_identified() => {
                let session = Session::new(token, user);
                tracing::info!(email = %session.email, role = session.role.as_str(), "session restored");
                *self.session.write().await = Some(session.clone());
                Some(session)
            }
            Ok(_) => {
                tracing::info!("stored token has no user behind it, logging out");
                self.discard().await;
                None
            }
            Err(e) => {
                tracing::info!(error = %e, "stored token rejected, logging out");
                self.discard().await;
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let token = match self.api.login(email, password).await {
            Ok(token) => token,
            Err(e) => {
                self.notifier.error(login_failure_message(&e));
                return Err(e.into());
            }
        };

        self.store.save(&token).map_err(ServiceError::Storage)?;

        let user = match self.api.me(&token).await {
            Ok(user) if user.is_identified() => user,
            Ok(_) => {
                self.discard().await;
                let e = ApiError::Unauthorized("Could not load user profile".to_string());
                self.notifier.error(e.detail());
                return Err(e.into());
            }
            Err(e) => {
                self.discard().await;
                self.notifier.error(login_failure_message(&e));
                return Err(e.into());
            }
        };

        let session = Session::new(token, user);
        *self.session.write().await = Some(session.clone());
        tracing::info!(email = %session.email, role = session.role.as_str(), "logged in");
        self.notifier.success("Login successful!");
        Ok(session)
    }

    pub async fn login_demo(&self, account: DemoAccount) -> Result<Session, ServiceError> {
        self.login(account.email, account.password).await
    }

    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.store.clear().map_err(ServiceError::Storage)?;
        *self.session.write().await = None;
        tracing::info!("logged out");
        self.notifier.info("Logged out");
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn discard(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear stored session token");
        }
        *self.session.write().await = None;
    }
}

fn login_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Network(_) | ApiError::Decode(_) => "Login failed".to_string(),
        other if other.detail().trim().is_empty() => "Login failed".to_string(),
        other => other.detail().to_string(),
    }
}
