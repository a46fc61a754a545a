use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::TeammateError;

/// A team-formation request as stored by the backend.
///
/// Drafts built locally have no `_id`; the backend assigns it on creation.
/// Extra fields the backend adds (`__v`, timestamps) are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub user_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub project_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub course_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub semester: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub end_time: String,
}

impl TeamRequest {
    /// An empty draft attributed to the given owner.
    pub fn draft(user_id: &str, user_name: &str) -> Self {
        Self {
            id: None,
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            ..Default::default()
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.user_id == user_id
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn field(&self, field: RequestField) -> &str {
        match field {
            RequestField::ProjectName => &self.project_name,
            RequestField::CourseName => &self.course_name,
            RequestField::Semester => &self.semester,
            RequestField::Description => &self.description,
            RequestField::EndTime => &self.end_time,
        }
    }

    /// Overwrite one editable field, leaving every other field as it was.
    pub fn set_field(&mut self, field: RequestField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RequestField::ProjectName => self.project_name = value,
            RequestField::CourseName => self.course_name = value,
            RequestField::Semester => self.semester = value,
            RequestField::Description => self.description = value,
            RequestField::EndTime => self.end_time = value,
        }
    }

    /// The end date, when `end_time` holds either a plain date or an RFC 3339 timestamp.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let raw = self.end_time.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }
}

/// The user-editable fields of a request, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestField {
    ProjectName,
    CourseName,
    Semester,
    Description,
    EndTime,
}

impl RequestField {
    pub const ALL: [RequestField; 5] = [
        RequestField::ProjectName,
        RequestField::CourseName,
        RequestField::Semester,
        RequestField::Description,
        RequestField::EndTime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RequestField::ProjectName => "projectName",
            RequestField::CourseName => "courseName",
            RequestField::Semester => "semester",
            RequestField::Description => "description",
            RequestField::EndTime => "endTime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestField::ProjectName => "Project Name",
            RequestField::CourseName => "Course Name",
            RequestField::Semester => "Semester",
            RequestField::Description => "Description",
            RequestField::EndTime => "End Time",
        }
    }

    /// Whether the search box looks into this field.
    pub fn is_searchable(&self) -> bool {
        !matches!(self, RequestField::EndTime)
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RequestField {
    type Err = TeammateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestField::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(s) || field.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| TeammateError::InvalidInput(format!("Unknown request field '{}'", s)))
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Mongo-style backends send string ids, in-memory fixtures often use numbers.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("unsupported _id value: {}", other))),
    }
}
