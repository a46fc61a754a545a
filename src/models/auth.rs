use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TeammateError;
use crate::models::request::id_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Student,
    Alumni,
    Industry,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Student, UserType::Alumni, UserType::Industry];

    /// Students and alumni register under a university, industry users do not.
    pub fn requires_university(&self) -> bool {
        matches!(self, UserType::Student | UserType::Alumni)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Alumni => "Alumni",
            UserType::Industry => "Industry",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = TeammateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TeammateError::InvalidInput(format!(
                    "Unknown user type '{}'. Use Student, Alumni or Industry",
                    s
                ))
            })
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /login`. Business failures come back as `success: false` with a message.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
    #[serde(default, alias = "uid", deserialize_with = "id_string")]
    pub user_id: Option<String>,
    #[serde(alias = "username")]
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: String,
    pub university: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}
