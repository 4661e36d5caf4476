use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, Type};

/// Preferred contact channel, stored as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContactPreference {
    Email,
    Mobile,
    Address,
    SocialMedia,
}

impl ContactPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactPreference::Email => "email",
            ContactPreference::Mobile => "mobile",
            ContactPreference::Address => "address",
            ContactPreference::SocialMedia => "social_media",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "email" => Some(ContactPreference::Email),
            "mobile" => Some(ContactPreference::Mobile),
            "address" => Some(ContactPreference::Address),
            "social_media" | "social media" | "socialmedia" => Some(ContactPreference::SocialMedia),
            _ => None,
        }
    }
}

/// Membership standing, stored as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Inactive,
    Suspended,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
            MemberStatus::Suspended => "suspended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(MemberStatus::Active),
            "inactive" => Some(MemberStatus::Inactive),
            "suspended" => Some(MemberStatus::Suspended),
            _ => None,
        }
    }
}

/// Member model - library patron record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Member {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub signup_date: NaiveDate,
    pub address: String,
    pub mobile: String,
    pub email: String,
    pub social_media: Option<String>,
    pub preference: ContactPreference,
    pub status: MemberStatus,
}

/// Field values for creating a member or overwriting an existing one
#[derive(Debug, Clone)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub signup_date: NaiveDate,
    pub address: String,
    pub mobile: String,
    pub email: String,
    pub social_media: Option<String>,
    pub preference: ContactPreference,
    pub status: MemberStatus,
}

/// A single discriminating lookup criterion
#[derive(Debug, Clone, PartialEq)]
pub enum MemberCriterion {
    Id(i64),
    Email(String),
    Mobile(String),
    Name { first: String, last: String },
}

/// Member lookup input. The dashboard sends whatever fields the operator
/// filled in; `criteria` turns them into an ordered strategy list.
#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl MemberQuery {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn by_mobile(mobile: impl Into<String>) -> Self {
        Self {
            mobile: Some(mobile.into()),
            ..Self::default()
        }
    }

    pub fn by_name(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            ..Self::default()
        }
    }

    /// Search strategies in priority order: ID > email > mobile > name
    /// pair. Blank fields from the form are treated as absent.
    pub fn criteria(&self) -> Vec<MemberCriterion> {
        let mut criteria = Vec::new();
        if let Some(id) = self.id {
            criteria.push(MemberCriterion::Id(id));
        }
        if let Some(email) = non_blank(&self.email) {
            criteria.push(MemberCriterion::Email(email));
        }
        if let Some(mobile) = non_blank(&self.mobile) {
            criteria.push(MemberCriterion::Mobile(mobile));
        }
        if let (Some(first), Some(last)) = (non_blank(&self.first_name), non_blank(&self.last_name))
        {
            criteria.push(MemberCriterion::Name { first, last });
        }
        criteria
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
