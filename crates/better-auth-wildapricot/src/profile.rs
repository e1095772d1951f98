// Wild Apricot contact record (`/contacts/me`) and membership status.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Deserialize a field, treating a value of the wrong JSON type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Membership level attached to a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MembershipLevel {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The contact record returned for the signed-in user.
///
/// Only the fields the adapter reads are typed; a typed field holding an
/// unexpected JSON type reads as missing. Everything else is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WildApricotProfile {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub membership_level: Option<MembershipLevel>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_account_administrator: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WildApricotProfile {
    /// `FirstName LastName`, skipping missing or blank parts.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn membership_status(&self) -> MembershipStatus {
        MembershipStatus::from_status(self.status.as_deref())
    }

    /// Name of the contact's membership level, if any.
    pub fn membership_level_name(&self) -> Option<&str> {
        self.membership_level.as_ref()?.name.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_account_administrator.unwrap_or(false)
    }
}

/// Contact membership status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MembershipStatus {
    Active,
    Lapsed,
    PendingNew,
    PendingRenewal,
    PendingLevelChange,
    Suspended,
    /// No status on the contact record.
    NoMembership,
    Other(String),
}

impl MembershipStatus {
    /// Parse the `Status` field as sent. Missing and empty values mean no
    /// membership.
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            None | Some("") => Self::NoMembership,
            Some("Active") => Self::Active,
            Some("Lapsed") => Self::Lapsed,
            Some("PendingNew") => Self::PendingNew,
            Some("PendingRenewal") => Self::PendingRenewal,
            Some("PendingLevelChange") => Self::PendingLevelChange,
            Some("Suspended") => Self::Suspended,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Lapsed => "Lapsed",
            Self::PendingNew => "PendingNew",
            Self::PendingRenewal => "PendingRenewal",
            Self::PendingLevelChange => "PendingLevelChange",
            Self::Suspended => "Suspended",
            Self::NoMembership => "NoMembership",
            Self::Other(s) => s,
        }
    }

    /// Members in good standing, including ones with a renewal or level
    /// change in progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Active | Self::PendingRenewal | Self::PendingLevelChange
        )
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
