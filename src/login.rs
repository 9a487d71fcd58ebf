//! Demo login gate. Credentials are fixed constants; there is no real authentication.

use thiserror::Error;

use crate::models::{Citizen, Department, Designation, Official, User};

pub const DEMO_CITIZEN_EMAIL: &str = "user@demo.com";
pub const DEMO_CITIZEN_PASSWORD: &str = "password123";
pub const DEMO_CITIZEN_NAME: &str = "Demo User";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid citizen credentials.")]
    InvalidCitizenCredentials,
    #[error("Please fill all official fields.")]
    MissingOfficialFields,
}

pub fn login_citizen(email: &str, password: &str) -> Result<User, LoginError> {
    if email != DEMO_CITIZEN_EMAIL || password != DEMO_CITIZEN_PASSWORD {
        return Err(LoginError::InvalidCitizenCredentials);
    }
    Ok(User::Citizen(Citizen {
        email: email.to_string(),
        name: DEMO_CITIZEN_NAME.to_string(),
    }))
}

/// Any named official may sign in at any level of any department.
pub fn login_official(
    name: &str,
    email: &str,
    designation: Designation,
    department: Department,
) -> Result<User, LoginError> {
    if name.is_empty() || email.is_empty() {
        return Err(LoginError::MissingOfficialFields);
    }
    Ok(User::Official(Official {
        name: name.to_string(),
        email: email.to_string(),
        designation,
        department,
    }))
}
