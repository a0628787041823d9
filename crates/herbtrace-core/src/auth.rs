//! Login stub.
//!
//! There is no credential check here: any non-empty email and password
//! produce a profile synthesised from the email itself. Nothing is
//! persisted and the profile is rebuilt on every login.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Support line shown on every synthesised profile.
pub const SUPPORT_PHONE: &str = "+91 9876543210";

/// Portal a user logs into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Farmer,
    Customer,
    Admin,
}

impl UserType {
    pub const ALL: [Self; 3] = [Self::Farmer, Self::Customer, Self::Admin];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(Self::Farmer),
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}

/// Profile built at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub user_type: UserType,
    pub full_name: String,
    pub phone: String,
    pub address: String,
}

/// Accept any non-empty credentials and synthesise a profile from the email.
///
/// Returns `None` when either `email` or `password` is empty.
pub fn authenticate_user(email: &str, password: &str, user_type: UserType) -> Option<UserProfile> {
    if email.is_empty() || password.is_empty() {
        return None;
    }

    let local = email.split('@').next().unwrap_or_default();
    let full_name = display_name(local);
    let sanitized: String = local
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_uppercase();
    let user_id = format!("{}_{sanitized}", user_type.as_str().to_ascii_uppercase());

    let address = match user_type {
        UserType::Farmer => format!("{full_name}'s Farm"),
        UserType::Customer => format!("{full_name}'s Address"),
        UserType::Admin => "Admin Office".to_string(),
    };

    Some(UserProfile {
        user_id,
        email: email.to_string(),
        user_type,
        full_name,
        phone: SUPPORT_PHONE.to_string(),
        address,
    })
}

/// `jane.doe` -> `Jane Doe`, `ravi` -> `Ravi`.
fn display_name(local: &str) -> String {
    local
        .split('.')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dotted_local_part_becomes_full_name() {
        let user = authenticate_user("jane.doe@x.com", "pw", UserType::Farmer).unwrap();
        assert_eq!(user.full_name, "Jane Doe");
        assert_eq!(user.user_type, UserType::Farmer);
        assert_eq!(user.user_id, "FARMER_JANEDOE");
        assert_eq!(user.address, "Jane Doe's Farm");
        assert_eq!(user.phone, SUPPORT_PHONE);
        assert_eq!(user.email, "jane.doe@x.com");
    }

    #[test]
    fn plain_local_part_is_capitalized() {
        let user = authenticate_user("ravi@herbs.in", "secret", UserType::Customer).unwrap();
        assert_eq!(user.full_name, "Ravi");
        assert_eq!(user.user_id, "CUSTOMER_RAVI");
        assert_eq!(user.address, "Ravi's Address");
    }

    #[test]
    fn admin_gets_office_address() {
        let user = authenticate_user("ops_team-1@herbtrace.com", "x", UserType::Admin).unwrap();
        assert_eq!(user.user_id, "ADMIN_OPSTEAM1");
        assert_eq!(user.address, "Admin Office");
    }

    #[test]
    fn empty_credentials_yield_none() {
        assert!(authenticate_user("jane.doe@x.com", "", UserType::Farmer).is_none());
        assert!(authenticate_user("", "pw", UserType::Farmer).is_none());
    }

    #[test]
    fn user_type_round_trips_through_str() {
        for ty in UserType::ALL {
            assert_eq!(ty.as_str().parse::<UserType>().unwrap(), ty);
        }
        assert!("guest".parse::<UserType>().is_err());
    }

    #[test]
    fn profile_serializes_camel_case() {
        let user = authenticate_user("a.b@c.d", "pw", UserType::Admin).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["userType"], "admin");
        assert_eq!(json["fullName"], "A B");
    }
}
