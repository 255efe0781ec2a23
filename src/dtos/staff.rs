use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Staff;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertStaffRequest {
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub staff_name: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub staff_id: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub role: String,
    #[validate(custom(function = crate::dtos::non_blank, message = "must not be empty"))]
    pub contact_number: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub hire_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "must be a non-negative number"))]
    pub salary: f64,
}

#[derive(Debug, Serialize)]
pub struct StaffResponse {
    pub id: String,
    pub staff_name: String,
    pub staff_id: String,
    pub role: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub hire_date: String,
    pub salary: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Staff> for StaffResponse {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id.to_string(),
            staff_name: staff.staff_name,
            staff_id: staff.staff_id,
            role: staff.role,
            contact_number: staff.contact_number,
            email: staff.email,
            hire_date: staff.hire_date.to_rfc3339(),
            salary: staff.salary,
            created_at: staff.created_at.to_rfc3339(),
            updated_at: staff.updated_at.to_rfc3339(),
        }
    }
}
