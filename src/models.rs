use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::schema::{conferences, employee_conference, employees};

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = conferences)]
pub struct Conference {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = conferences)]
pub struct NewConference {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request body for `POST /conferences`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConferenceInput {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
}

impl ConferenceInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name, 255)?;
        require_text("location", &self.location, 255)?;
        Ok(())
    }
}

/// Request body for `PUT /conferences/{id}`. Absent fields stay untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct ConferenceUpdate {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl ConferenceUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name, 255)?;
        }
        if let Some(location) = &self.location {
            require_text("location", location, 255)?;
        }
        Ok(())
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = conferences)]
pub struct ConferenceChanges {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = employees)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request body for `POST /employees`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeInput {
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub phone: Option<String>,
}

impl EmployeeInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name, 100)?;
        require_text("email", &self.email, 100)?;
        require_email(&self.email)?;
        require_text("department", &self.department, 100)?;
        require_text("position", &self.position, 100)?;
        if let Some(phone) = &self.phone {
            require_text("phone", phone, 20)?;
        }
        Ok(())
    }
}

/// Request body for `PUT /employees/{id}`. Absent fields stay untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
}

impl EmployeeUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name, 100)?;
        }
        if let Some(email) = &self.email {
            require_text("email", email, 100)?;
            require_email(email)?;
        }
        if let Some(department) = &self.department {
            require_text("department", department, 100)?;
        }
        if let Some(position) = &self.position {
            require_text("position", position, 100)?;
        }
        if let Some(phone) = &self.phone {
            require_text("phone", phone, 20)?;
        }
        Ok(())
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = employees)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// One row of the employee/conference association. The composite primary key
/// keeps a pair unique, so this doubles as the wire shape of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = employee_conference)]
pub struct Booking {
    pub employee_id: i32,
    pub conference_id: i32,
}

/// Query string for `POST /conferences/{id}/book`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookParams {
    pub employee_id: i32,
}

fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max {
        return Err(ApiError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ApiError> {
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    if re.captures(value).is_none() {
        return Err(ApiError::validation("email must be a valid address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conference_input() -> ConferenceInput {
        ConferenceInput {
            name: "Tech Summit".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            location: "HQ".to_string(),
            description: None,
        }
    }

    fn employee_input() -> EmployeeInput {
        EmployeeInput {
            name: "Zhang San".to_string(),
            email: "zs@example.com".to_string(),
            department: "Eng".to_string(),
            position: "Engineer".to_string(),
            phone: None,
        }
    }

    #[test]
    fn conference_input_accepts_valid_fields() {
        assert!(conference_input().validate().is_ok());
    }

    #[test]
    fn conference_input_rejects_blank_name() {
        let mut input = conference_input();
        input.name = String::new();
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn conference_input_rejects_overlong_location() {
        let mut input = conference_input();
        input.location = "x".repeat(256);
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn conference_update_ignores_absent_fields() {
        let update = ConferenceUpdate {
            name: None,
            date: None,
            location: None,
            description: None,
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn conference_update_rejects_blank_supplied_name() {
        let update = ConferenceUpdate {
            name: Some(String::new()),
            date: None,
            location: None,
            description: None,
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn employee_input_accepts_valid_fields() {
        assert!(employee_input().validate().is_ok());
    }

    #[test]
    fn employee_input_rejects_malformed_email() {
        let mut input = employee_input();
        input.email = "not-an-address".to_string();
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn employee_input_rejects_overlong_phone() {
        let mut input = employee_input();
        input.phone = Some("0".repeat(21));
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("phone"));
    }

    #[test]
    fn employee_input_rejects_blank_department() {
        let mut input = employee_input();
        input.department = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn employee_update_checks_only_supplied_fields() {
        let update = EmployeeUpdate {
            name: Some("Li Si".to_string()),
            email: None,
            department: None,
            position: None,
            phone: None,
        };
        assert!(update.validate().is_ok());

        let update = EmployeeUpdate {
            name: None,
            email: Some("broken".to_string()),
            department: None,
            position: None,
            phone: None,
        };
        assert!(update.validate().is_err());
    }
}
