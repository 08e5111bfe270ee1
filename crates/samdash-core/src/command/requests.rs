// ── Typed request structs for Command payloads ──
//
// Each carries its own `validate()` so a form can be checked before the
// command is built, and the controller re-checks before sending.

use secrecy::SecretString;

use crate::error::CoreError;
use crate::model::Credential;
use crate::validate::{require_field, validate_password};

// ── Users ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub user_id: Option<String>,
    pub username: String,
    pub password: SecretString,
    pub credential: Credential,
}

impl RegisterUserRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_field("Username", &self.username)?;
        validate_password(&self.password)
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub credential: Option<Credential>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(ref username) = self.username {
            require_field("Username", username)?;
        }
        if let Some(ref password) = self.password {
            validate_password(password)?;
        }
        if self.username.is_none() && self.password.is_none() && self.credential.is_none() {
            return Err(CoreError::validation("Nothing to update"));
        }
        Ok(())
    }
}

// ── Devices ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CreateDeviceRequest {
    pub sam_id: String,
    pub device_id: Option<String>,
    pub device_ip: Option<String>,
    pub device_username: Option<String>,
    pub device_root_folder: Option<String>,
    pub camera_ip: Option<String>,
    pub camera_username: Option<String>,
    pub camera_password: Option<SecretString>,
    pub camera_root_folder: Option<String>,
    pub camera_type: Option<String>,
    pub location: Option<String>,
}

impl CreateDeviceRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_field("SAM ID", &self.sam_id)
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateDeviceRequest {
    pub sam_id: Option<String>,
    pub device_id: Option<String>,
    pub device_ip: Option<String>,
    pub device_username: Option<String>,
    pub device_root_folder: Option<String>,
    pub camera_ip: Option<String>,
    pub camera_username: Option<String>,
    pub camera_password: Option<SecretString>,
    pub camera_root_folder: Option<String>,
    pub camera_type: Option<String>,
    pub location: Option<String>,
}

impl UpdateDeviceRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(ref sam_id) = self.sam_id {
            require_field("SAM ID", sam_id)?;
        }
        Ok(())
    }
}

impl From<CreateDeviceRequest> for samdash_api::DeviceFields {
    fn from(r: CreateDeviceRequest) -> Self {
        Self {
            device_id: r.device_id,
            sam_id: Some(r.sam_id),
            device_ip: r.device_ip,
            device_username: r.device_username,
            device_root_folder: r.device_root_folder,
            camera_ip: r.camera_ip,
            camera_username: r.camera_username,
            camera_password: r.camera_password,
            camera_root_folder: r.camera_root_folder,
            camera_type: r.camera_type,
            location: r.location,
        }
    }
}

impl From<UpdateDeviceRequest> for samdash_api::DeviceFields {
    fn from(r: UpdateDeviceRequest) -> Self {
        Self {
            device_id: r.device_id,
            sam_id: r.sam_id,
            device_ip: r.device_ip,
            device_username: r.device_username,
            device_root_folder: r.device_root_folder,
            camera_ip: r.camera_ip,
            camera_username: r.camera_username,
            camera_password: r.camera_password,
            camera_root_folder: r.camera_root_folder,
            camera_type: r.camera_type,
            location: r.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_needs_long_password() {
        let mut req = RegisterUserRequest {
            user_id: None,
            username: "carol".into(),
            password: "short".to_string().into(),
            credential: Credential::Guest,
        };
        assert!(req.validate().is_err());
        req.password = "longenough".to_string().into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_checks_only_present_fields() {
        let req = UpdateUserRequest {
            credential: Some(Credential::Operator),
            ..UpdateUserRequest::default()
        };
        assert!(req.validate().is_ok());

        let req = UpdateUserRequest {
            password: Some("1234567".to_string().into()),
            ..UpdateUserRequest::default()
        };
        assert!(req.validate().is_err());

        assert!(UpdateUserRequest::default().validate().is_err());
    }
}
