// User account endpoints (`/api/v1/...`)
//
// Login hands back the bearer token; the caller decides whether to keep it
// on this client via `set_token`. Passwords travel as request bodies only.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::SamClient;
use crate::error::Error;
use crate::models::{Ack, CredentialLevel, LoginData, UserRecord};

/// Body for `POST /api/v1/register/user`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: Option<String>,
    pub username: String,
    pub password: SecretString,
    pub credential: CredentialLevel,
}

/// Body for `PUT /api/v1/update/user/{id}`. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub credential: Option<CredentialLevel>,
}

impl SamClient {
    /// Register a new user account.
    ///
    /// `POST /api/v1/register/user`
    pub async fn register_user(&self, user: &NewUser) -> Result<Ack, Error> {
        let url = self.api_url("api/v1/register/user")?;
        debug!(username = %user.username, "registering user");
        let mut body = json!({
            "username": user.username,
            "password": user.password.expose_secret(),
            "credential": user.credential,
        });
        if let Some(ref user_id) = user.user_id {
            body["userId"] = json!(user_id);
        }
        let envelope = self.post::<serde_json::Value>(url, &body).await?;
        Ok(envelope.into_ack())
    }

    /// Authenticate and obtain a bearer token.
    ///
    /// `POST /api/v1/login/user`. Rejected credentials surface as
    /// `Error::Authentication` whatever the backend's status code.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<LoginData, Error> {
        let url = self.api_url("api/v1/login/user")?;
        debug!(username, "logging in");
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });
        match self.post::<LoginData>(url, &body).await {
            Ok(envelope) => envelope.into_data(),
            Err(Error::Api { message, .. } | Error::Forbidden { message }) => {
                Err(Error::Authentication { message })
            }
            Err(e) => Err(e),
        }
    }

    /// The user the current token belongs to.
    ///
    /// `GET /api/v1/current/user`
    pub async fn current_user(&self) -> Result<UserRecord, Error> {
        let url = self.api_url("api/v1/current/user")?;
        self.get(url).await?.into_data()
    }

    /// Invalidate the current token server-side and drop it locally.
    ///
    /// `POST /api/v1/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("api/v1/logout")?;
        let result = self.post::<serde_json::Value>(url, &json!({})).await;
        self.clear_token();
        result?;
        Ok(())
    }

    /// List all user accounts.
    ///
    /// `GET /api/v1/getAll/user`
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        let url = self.api_url("api/v1/getAll/user")?;
        self.get(url).await?.into_data()
    }

    /// Update a user account.
    ///
    /// `PUT /api/v1/update/user/{id}`
    pub async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v1/update/user", &id.to_string())?;
        debug!(id, "updating user");
        let mut body = serde_json::Map::new();
        if let Some(ref username) = changes.username {
            body.insert("username".into(), json!(username));
        }
        if let Some(ref password) = changes.password {
            body.insert("password".into(), json!(password.expose_secret()));
        }
        if let Some(credential) = changes.credential {
            body.insert("credential".into(), json!(credential));
        }
        let envelope = self.put::<serde_json::Value>(url, &body).await?;
        Ok(envelope.into_ack())
    }

    /// Delete a user account.
    ///
    /// `DELETE /api/v1/delete/user/{id}`
    pub async fn delete_user(&self, id: i64) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v1/delete/user", &id.to_string())?;
        debug!(id, "deleting user");
        let envelope = self.delete::<serde_json::Value>(url).await?;
        Ok(envelope.into_ack())
    }
}
