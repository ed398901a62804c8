//! Registrant model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::InstitutionCategory;

/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Maximum number of digits in a phone number.
pub const MAX_PHONE_DIGITS: usize = 15;

/// Registrant gender as collected by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Pria,
    Wanita,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Pria => "Pria",
            Gender::Wanita => "Wanita",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pria" => Ok(Gender::Pria),
            "Wanita" => Ok(Gender::Wanita),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

/// A prospective student registered for one institution category.
#[derive(Debug, Clone, Serialize)]
pub struct Registrant {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub phone: String,
    pub guardian_name: String,
    pub address: String,
    pub institution: InstitutionCategory,
    /// Account that created the record; `None` for the public form.
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable registrant fields, used for both creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrantData {
    pub name: String,
    pub gender: Gender,
    pub phone: String,
    pub guardian_name: String,
    pub address: String,
    pub institution: InstitutionCategory,
}

impl RegistrantData {
    /// Trim surrounding whitespace from every text field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            gender: self.gender,
            phone: self.phone.trim().to_string(),
            guardian_name: self.guardian_name.trim().to_string(),
            address: self.address.trim().to_string(),
            institution: self.institution,
        }
    }
}

/// A phone number is valid when it holds 10 to 15 digits once separators
/// and other non-digit characters are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("081234567890"));
        assert!(is_valid_phone("+62 812-3456-7890"));
        assert!(is_valid_phone("0812345678"));
        assert!(!is_valid_phone("081234567"));
        assert!(!is_valid_phone("0812345678901234"));
        assert!(!is_valid_phone("phone"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Pria".parse::<Gender>().unwrap(), Gender::Pria);
        assert_eq!("Wanita".parse::<Gender>().unwrap(), Gender::Wanita);
        assert!("pria".parse::<Gender>().is_err());
    }

    #[test]
    fn test_normalized_trims_fields() {
        let data = RegistrantData {
            name: "  Budi ".to_string(),
            gender: Gender::Pria,
            phone: " 0812-3456-7890 ".to_string(),
            guardian_name: "\tSiti".to_string(),
            address: "Jl. Merdeka 1\n".to_string(),
            institution: InstitutionCategory::Smp,
        }
        .normalized();

        assert_eq!(data.name, "Budi");
        assert_eq!(data.phone, "0812-3456-7890");
        assert_eq!(data.guardian_name, "Siti");
        assert_eq!(data.address, "Jl. Merdeka 1");
    }
}
