//! Idempotent "get or create" access to the HR tables.
//!
//! Every helper looks a record up by its natural key and inserts it only
//! when nothing matches. Existing rows are returned untouched, never
//! updated, and the caller learns which branch was taken via [`Outcome`].

use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::password;
use crate::models::*;
use crate::schema::{
    attendances, departments, employees, leave_requests, leave_types, payroll_generations,
    payrolls, recruitments, users,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("failed to hash password: {0}")]
    Password(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Existing,
}

impl Outcome {
    pub fn is_created(self) -> bool {
        matches!(self, Outcome::Created)
    }

    /// Console marker used by the seeding log.
    pub fn marker(self) -> &'static str {
        match self {
            Outcome::Created => "✅",
            Outcome::Existing => "ℹ️",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Seeded<T> {
    pub record: T,
    pub outcome: Outcome,
}

impl<T> Seeded<T> {
    pub fn new(record: T, outcome: Outcome) -> Self {
        Self { record, outcome }
    }
}

/// Runs the lookup, and when it comes back empty, the insert followed by a
/// second lookup, all in one transaction.
///
/// The insert is expected to use `ON CONFLICT DO NOTHING`: if another writer
/// created the row in between, zero rows are affected and the outcome is
/// reported as [`Outcome::Existing`].
pub fn get_or_create<T, L, I>(conn: &mut PgConnection, mut lookup: L, insert: I) -> StoreResult<Seeded<T>>
where
    L: FnMut(&mut PgConnection) -> QueryResult<Option<T>>,
    I: FnOnce(&mut PgConnection) -> QueryResult<usize>,
{
    let seeded = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        if let Some(record) = lookup(conn)? {
            return Ok(Seeded::new(record, Outcome::Existing));
        }

        let inserted = insert(conn)?;
        let record = lookup(conn)?.ok_or(diesel::result::Error::NotFound)?;
        let outcome = if inserted > 0 {
            Outcome::Created
        } else {
            Outcome::Existing
        };
        Ok(Seeded::new(record, outcome))
    })?;
    Ok(seeded)
}

pub fn department(conn: &mut PgConnection, new: &NewDepartment) -> StoreResult<Seeded<Department>> {
    get_or_create(
        conn,
        |conn| {
            departments::table
                .filter(departments::name.eq(&new.name))
                .first::<Department>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(departments::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

pub fn employee(conn: &mut PgConnection, new: &NewEmployee) -> StoreResult<Seeded<Employee>> {
    get_or_create(
        conn,
        |conn| {
            employees::table
                .filter(employees::email.eq(&new.email))
                .first::<Employee>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(employees::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

pub fn leave_type(conn: &mut PgConnection, new: &NewLeaveType) -> StoreResult<Seeded<LeaveType>> {
    get_or_create(
        conn,
        |conn| {
            leave_types::table
                .filter(leave_types::name.eq(&new.name))
                .first::<LeaveType>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(leave_types::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

pub fn leave_request(
    conn: &mut PgConnection,
    new: &NewLeaveRequest,
) -> StoreResult<Seeded<LeaveRequest>> {
    get_or_create(
        conn,
        |conn| {
            leave_requests::table
                .filter(leave_requests::employee_id.eq(new.employee_id))
                .filter(leave_requests::leave_type_id.eq(new.leave_type_id))
                .filter(leave_requests::start_date.eq(new.start_date))
                .filter(leave_requests::end_date.eq(new.end_date))
                .first::<LeaveRequest>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(leave_requests::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

pub fn payroll_generation(
    conn: &mut PgConnection,
    new: &NewPayrollGeneration,
) -> StoreResult<Seeded<PayrollGeneration>> {
    get_or_create(
        conn,
        |conn| {
            payroll_generations::table
                .filter(payroll_generations::month_year.eq(&new.month_year))
                .first::<PayrollGeneration>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(payroll_generations::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

pub fn payroll(conn: &mut PgConnection, new: &NewPayroll) -> StoreResult<Seeded<Payroll>> {
    get_or_create(
        conn,
        |conn| {
            payrolls::table
                .filter(payrolls::employee_id.eq(new.employee_id))
                .filter(payrolls::payroll_generation_id.eq(new.payroll_generation_id))
                .first::<Payroll>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(payrolls::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

pub fn attendance(conn: &mut PgConnection, new: &NewAttendance) -> StoreResult<Seeded<Attendance>> {
    get_or_create(
        conn,
        |conn| {
            attendances::table
                .filter(attendances::employee_id.eq(new.employee_id))
                .filter(attendances::attendance_date.eq(new.attendance_date))
                .first::<Attendance>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(attendances::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

pub fn recruitment(
    conn: &mut PgConnection,
    new: &NewRecruitment,
) -> StoreResult<Seeded<Recruitment>> {
    get_or_create(
        conn,
        |conn| {
            recruitments::table
                .filter(recruitments::title.eq(&new.title))
                .first::<Recruitment>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(recruitments::table)
                .values(new)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

/// Login account to create when `username` is not taken yet.
#[derive(Debug, Clone, Copy)]
pub struct AccountDraft<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: &'a str,
}

/// The password is hashed and stored only when the account is created; an
/// existing account keeps whatever credentials it already has.
pub fn user(
    conn: &mut PgConnection,
    draft: AccountDraft<'_>,
    plain_password: &str,
) -> StoreResult<Seeded<User>> {
    let existing = users::table
        .filter(users::username.eq(draft.username))
        .first::<User>(conn)
        .optional()?;
    if let Some(user) = existing {
        return Ok(Seeded::new(user, Outcome::Existing));
    }

    let password_hash = password::hash_password(plain_password)
        .map_err(|err| StoreError::Password(err.to_string()))?;
    let new_user = NewUser {
        id: Uuid::new_v4(),
        username: draft.username.to_string(),
        email: draft.email.to_string(),
        first_name: draft.first_name.to_string(),
        last_name: draft.last_name.to_string(),
        password_hash,
        role: draft.role.to_string(),
        is_active: true,
    };

    get_or_create(
        conn,
        |conn| {
            users::table
                .filter(users::username.eq(&new_user.username))
                .first::<User>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .on_conflict_do_nothing()
                .execute(conn)
        },
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub departments: i64,
    pub employees: i64,
    pub leave_types: i64,
    pub leave_requests: i64,
    pub payroll_generations: i64,
    pub payrolls: i64,
    pub attendances: i64,
    pub recruitments: i64,
    pub users: i64,
}

pub fn count_records(conn: &mut PgConnection) -> StoreResult<RecordCounts> {
    Ok(RecordCounts {
        departments: departments::table.count().get_result(conn)?,
        employees: employees::table.count().get_result(conn)?,
        leave_types: leave_types::table.count().get_result(conn)?,
        leave_requests: leave_requests::table.count().get_result(conn)?,
        payroll_generations: payroll_generations::table.count().get_result(conn)?,
        payrolls: payrolls::table.count().get_result(conn)?,
        attendances: attendances::table.count().get_result(conn)?,
        recruitments: recruitments::table.count().get_result(conn)?,
        users: users::table.count().get_result(conn)?,
    })
}
