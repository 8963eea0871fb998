use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::empty_as_none;
use crate::common::FieldError;

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone pattern"));
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// 登录会话：令牌、过期时间（unix 秒）与用户资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        now >= self.expires_at
    }
}

/// 登录与注册接口的返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

impl From<LoginResponse> for AuthSession {
    fn from(resp: LoginResponse) -> Self {
        Self {
            token: resp.token,
            expires_at: resp.expires_at,
            user: resp.user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginParams, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push(FieldError::new("username", "username is required"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "password is required"));
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(LoginParams {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// 注册表单，提交前在本地校验
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterParams, Vec<FieldError>> {
        let mut errors = Vec::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.push(FieldError::new("username", "username is required"));
        } else if username.chars().count() < MIN_USERNAME_LEN {
            errors.push(FieldError::new("username", "username must be at least 3 characters"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "email is required"));
        } else if !EMAIL_PATTERN.is_match(email) {
            errors.push(FieldError::new("email", "invalid email address"));
        }

        let phone = self
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(phone) = phone {
            if !PHONE_PATTERN.is_match(phone) {
                errors.push(FieldError::new("phone", "invalid phone number"));
            }
        }

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "password is required"));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new("password", "password must be at least 6 characters"));
        }

        if self.confirm.is_empty() {
            errors.push(FieldError::new("confirm", "please confirm the password"));
        } else if self.confirm != self.password {
            errors.push(FieldError::new("confirm", "passwords do not match"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RegisterParams {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            phone: phone.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            email: "alice@example.com".into(),
            phone: Some("13812345678".into()),
            password: "secret1".into(),
            confirm: "secret1".into(),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn valid_register_form_passes() {
        let params = form().validate().unwrap();
        assert_eq!(params.username, "alice");
        assert_eq!(params.phone.as_deref(), Some("13812345678"));
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut f = form();
        f.confirm = "secret2".into();
        assert_eq!(fields(&f.validate().unwrap_err()), vec!["confirm"]);
    }

    #[test]
    fn malformed_phone_is_rejected() {
        for phone in ["12812345678", "1381234567", "phone"] {
            let mut f = form();
            f.phone = Some(phone.into());
            assert_eq!(fields(&f.validate().unwrap_err()), vec!["phone"], "{phone}");
        }
    }

    #[test]
    fn blank_phone_is_optional() {
        let mut f = form();
        f.phone = Some("  ".into());
        assert_eq!(f.validate().unwrap().phone, None);
    }

    #[test]
    fn short_fields_collect_every_error() {
        let f = RegisterForm {
            username: "al".into(),
            email: "nope".into(),
            phone: None,
            password: "123".into(),
            confirm: "123".into(),
        };
        assert_eq!(fields(&f.validate().unwrap_err()), vec!["username", "email", "password"]);
    }

    #[test]
    fn login_form_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["username", "password"]);
    }

    #[test]
    fn user_decodes_backend_shape() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "username": "bob",
            "email": "bob@example.com",
            "phone": "",
            "avatar": "",
            "role": "admin",
            "status": "active"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.phone, None);
        assert_eq!(user.avatar, None);
    }

    #[test]
    fn session_expiry() {
        let user = User {
            id: 1,
            username: "a".into(),
            email: "a@b.c".into(),
            phone: None,
            role: Role::User,
            avatar: None,
        };
        let past = AuthSession { token: "t".into(), expires_at: 0, user: user.clone() };
        assert!(past.is_expired());
        let future = AuthSession { token: "t".into(), expires_at: i64::MAX, user };
        assert!(!future.is_expired());
    }
}
