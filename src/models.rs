use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::*;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EMPLOYEE: &str = "employee";

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = departments)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = departments)]
pub struct NewDepartment {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = employees)]
#[diesel(belongs_to(Department, foreign_key = department_id))]
pub struct Employee {
    pub id: Uuid,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<Uuid>,
    pub job_position: String,
    pub phone: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub date_of_joining: NaiveDate,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Employee {
    /// Login name derived from the local part of the work email.
    pub fn username(&self) -> &str {
        username_from_email(&self.email)
    }
}

pub fn username_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[derive(Debug, Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub id: Uuid,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<Uuid>,
    pub job_position: String,
    pub phone: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub date_of_joining: NaiveDate,
    pub is_active: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = leave_types)]
pub struct LeaveType {
    pub id: Uuid,
    pub name: String,
    pub count: i32,
    pub is_active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = leave_types)]
pub struct NewLeaveType {
    pub id: Uuid,
    pub name: String,
    pub count: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = leave_requests)]
#[diesel(belongs_to(Employee))]
#[diesel(belongs_to(LeaveType))]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub leave_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub reason: String,
    pub requested_days: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = leave_requests)]
pub struct NewLeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub leave_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub reason: String,
    pub requested_days: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = payroll_generations)]
pub struct PayrollGeneration {
    pub id: Uuid,
    pub month_year: String,
    pub status: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payroll_generations)]
pub struct NewPayrollGeneration {
    pub id: Uuid,
    pub month_year: String,
    pub status: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = payrolls)]
#[diesel(belongs_to(Employee))]
#[diesel(belongs_to(PayrollGeneration))]
pub struct Payroll {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub payroll_generation_id: Uuid,
    pub basic_pay: i64,
    pub gross_pay: i64,
    pub deduction: i64,
    pub net_pay: i64,
    pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payrolls)]
pub struct NewPayroll {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub payroll_generation_id: Uuid,
    pub basic_pay: i64,
    pub gross_pay: i64,
    pub deduction: i64,
    pub net_pay: i64,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(table_name = attendances)]
#[diesel(belongs_to(Employee))]
pub struct Attendance {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub attendance_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub attendance_status: String,
    pub work_type: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = attendances)]
pub struct NewAttendance {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub attendance_date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub attendance_status: String,
    pub work_type: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = recruitments)]
pub struct Recruitment {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    pub vacancy: i32,
    pub is_active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = recruitments)]
pub struct NewRecruitment {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    pub vacancy: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::username_from_email;

    #[test]
    fn username_is_email_local_part() {
        assert_eq!(username_from_email("john.doe@acme.com"), "john.doe");
    }

    #[test]
    fn username_without_domain_is_whole_value() {
        assert_eq!(username_from_email("admin"), "admin");
    }
}
