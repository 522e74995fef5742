//! Demo dataset seeder.
//!
//! Populates departments, employees, leave, payroll, attendance,
//! recruitment and login accounts with get-or-create semantics, writing a
//! human-readable progress log as it goes. Running it again never
//! duplicates a record that shares a natural key with an existing one.

pub mod fixtures;
pub mod plan;
pub mod report;

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;
use diesel::pg::PgConnection;
use rand::Rng;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    Department, Employee, LeaveType, NewAttendance, NewDepartment,
    NewEmployee, NewLeaveRequest, NewLeaveType, NewPayroll, NewPayrollGeneration, NewRecruitment,
    ROLE_ADMIN, ROLE_EMPLOYEE,
};
use crate::store::{self, AccountDraft, StoreError};

use fixtures::{
    FixtureDate, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_USERNAME, ATTENDANCE_WINDOW_DAYS, DEPARTMENTS,
    EMPLOYEES, EMPLOYEE_PASSWORD, LEAVE_TYPES, PAYROLL_GENERATION_STATUS, PAYROLL_STATUS,
    RECRUITMENT_DESCRIPTION, RECRUITMENT_POSTS, WORK_TYPE_REGULAR,
};
pub use plan::AttendancePolicy;
pub use report::{Credential, SeedReport, Tally};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{kind} `{key}` was not seeded")]
    MissingReference { kind: &'static str, key: String },
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),
    #[error("failed to write seeding log: {0}")]
    Output(#[from] std::io::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;

#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub attendance_policy: AttendancePolicy,
    pub admin_url: String,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            attendance_policy: AttendancePolicy::default(),
            admin_url: "http://localhost/admin/".to_string(),
        }
    }
}

pub struct Seeder<'c, R, W> {
    conn: &'c mut PgConnection,
    rng: R,
    out: W,
    today: NaiveDate,
    options: SeedOptions,
}

impl<'c, R: Rng, W: Write> Seeder<'c, R, W> {
    pub fn new(
        conn: &'c mut PgConnection,
        rng: R,
        out: W,
        today: NaiveDate,
        options: SeedOptions,
    ) -> Self {
        Self {
            conn,
            rng,
            out,
            today,
            options,
        }
    }

    /// Seeds every entity group in dependency order and prints the summary,
    /// credentials and access URL.
    pub fn run(mut self) -> SeedResult<SeedReport> {
        let mut report = SeedReport::default();
        writeln!(self.out, "🌱 Creating demo data for HollaCRM...")?;

        let departments = self.seed_departments(&mut report)?;
        let employees = self.seed_employees(&departments, &mut report)?;
        let leave_types = self.seed_leave_types(&mut report)?;
        self.seed_leave_requests(&employees, &leave_types, &mut report)?;
        self.seed_payroll(&employees, &mut report)?;
        self.seed_attendance(&employees, &mut report)?;
        self.seed_recruitment(&mut report)?;
        self.seed_users(&employees, &mut report)?;

        report.counts = store::count_records(self.conn)?;
        info!(
            component = "seed",
            leave_requests = report.counts.leave_requests,
            payrolls = report.counts.payrolls,
            attendances = report.counts.attendances,
            users = report.counts.users,
            "demo data seeded"
        );

        report::write_summary(&mut self.out, &report)?;
        report::write_credentials(&mut self.out, &report.credentials)?;
        report::write_access_url(&mut self.out, &self.options.admin_url)?;
        self.out.flush()?;
        Ok(report)
    }

    fn seed_departments(&mut self, report: &mut SeedReport) -> SeedResult<Vec<Department>> {
        writeln!(self.out, "🏢 Creating departments...")?;
        let mut departments = Vec::with_capacity(DEPARTMENTS.len());
        for fixture in &DEPARTMENTS {
            let seeded = store::department(
                self.conn,
                &NewDepartment {
                    id: Uuid::new_v4(),
                    name: fixture.name.to_string(),
                    description: fixture.description.to_string(),
                },
            )?;
            report.departments.record(seeded.outcome);
            writeln!(self.out, "  {} {}", seeded.outcome.marker(), seeded.record.name)?;
            departments.push(seeded.record);
        }
        info!(component = "seed", created = report.departments.created, "departments seeded");
        Ok(departments)
    }

    fn seed_employees(
        &mut self,
        departments: &[Department],
        report: &mut SeedReport,
    ) -> SeedResult<Vec<Employee>> {
        writeln!(self.out, "👥 Creating employees...")?;
        let by_name: HashMap<&str, Uuid> = departments
            .iter()
            .map(|dept| (dept.name.as_str(), dept.id))
            .collect();
        let names_by_id: HashMap<Uuid, &str> = departments
            .iter()
            .map(|dept| (dept.id, dept.name.as_str()))
            .collect();

        let mut employees = Vec::with_capacity(EMPLOYEES.len());
        for fixture in &EMPLOYEES {
            let department_id = *by_name.get(fixture.department).ok_or_else(|| {
                SeedError::MissingReference {
                    kind: "department",
                    key: fixture.department.to_string(),
                }
            })?;
            let new_employee = NewEmployee {
                id: Uuid::new_v4(),
                employee_code: plan::employee_code(&mut self.rng),
                first_name: fixture.first_name.to_string(),
                last_name: fixture.last_name.to_string(),
                email: fixture.email.to_string(),
                department_id: Some(department_id),
                job_position: fixture.job_position.to_string(),
                phone: fixture.phone.to_string(),
                gender: fixture.gender.to_string(),
                dob: fixture_date(fixture.email, fixture.dob)?,
                date_of_joining: fixture_date(fixture.email, fixture.date_of_joining)?,
                is_active: true,
            };

            let seeded = store::employee(self.conn, &new_employee)?;
            report.employees.record(seeded.outcome);
            let employee = seeded.record;
            let department = employee
                .department_id
                .and_then(|id| names_by_id.get(&id).copied())
                .unwrap_or("unassigned");
            writeln!(
                self.out,
                "  {} {} {} - {}",
                seeded.outcome.marker(),
                employee.first_name,
                employee.last_name,
                department
            )?;
            employees.push(employee);
        }
        info!(component = "seed", created = report.employees.created, "employees seeded");
        Ok(employees)
    }

    fn seed_leave_types(&mut self, report: &mut SeedReport) -> SeedResult<Vec<LeaveType>> {
        writeln!(self.out, "🏖️ Creating leave types...")?;
        let mut leave_types = Vec::with_capacity(LEAVE_TYPES.len());
        for fixture in &LEAVE_TYPES {
            let seeded = store::leave_type(
                self.conn,
                &NewLeaveType {
                    id: Uuid::new_v4(),
                    name: fixture.name.to_string(),
                    count: fixture.count,
                    is_active: fixture.is_active,
                },
            )?;
            report.leave_types.record(seeded.outcome);
            writeln!(self.out, "  {} {}", seeded.outcome.marker(), seeded.record.name)?;
            leave_types.push(seeded.record);
        }
        Ok(leave_types)
    }

    fn seed_leave_requests(
        &mut self,
        employees: &[Employee],
        leave_types: &[LeaveType],
        report: &mut SeedReport,
    ) -> SeedResult<()> {
        writeln!(self.out, "📝 Creating leave requests...")?;
        if leave_types.is_empty() {
            return Err(SeedError::MissingReference {
                kind: "leave type",
                key: "any".to_string(),
            });
        }

        for employee in employees {
            let requests = plan::leave_request_count(&mut self.rng);
            for index in 0..requests {
                let draw = plan::draw_leave(&mut self.rng, self.today, leave_types.len());
                let leave_type = &leave_types[draw.leave_type];
                let seeded = store::leave_request(
                    self.conn,
                    &NewLeaveRequest {
                        id: Uuid::new_v4(),
                        employee_id: employee.id,
                        leave_type_id: leave_type.id,
                        start_date: draw.start_date,
                        end_date: draw.end_date,
                        status: draw.status.to_string(),
                        reason: format!("Leave request {} for {}", index + 1, employee.first_name),
                        requested_days: draw.requested_days(),
                    },
                )?;
                report.leave_requests.record(seeded.outcome);
                writeln!(
                    self.out,
                    "  {} {} - {} ({})",
                    seeded.outcome.marker(),
                    employee.first_name,
                    leave_type.name,
                    seeded.record.status
                )?;
            }
        }
        info!(
            component = "seed",
            created = report.leave_requests.created,
            existing = report.leave_requests.existing,
            "leave requests seeded"
        );
        Ok(())
    }

    fn seed_payroll(&mut self, employees: &[Employee], report: &mut SeedReport) -> SeedResult<()> {
        writeln!(self.out, "💰 Creating payroll records...")?;
        let generation = store::payroll_generation(
            self.conn,
            &NewPayrollGeneration {
                id: Uuid::new_v4(),
                month_year: plan::month_label(self.today),
                status: PAYROLL_GENERATION_STATUS.to_string(),
                start_date: plan::month_start(self.today),
            },
        )?;
        report.payroll_generations.record(generation.outcome);
        let generation = generation.record;

        for employee in employees {
            let pay = plan::draw_pay(&mut self.rng);
            let seeded = store::payroll(
                self.conn,
                &NewPayroll {
                    id: Uuid::new_v4(),
                    employee_id: employee.id,
                    payroll_generation_id: generation.id,
                    basic_pay: pay.basic_pay,
                    gross_pay: pay.gross_pay(),
                    deduction: pay.deduction,
                    net_pay: pay.net_pay(),
                    status: PAYROLL_STATUS.to_string(),
                },
            )?;
            report.payrolls.record(seeded.outcome);
            writeln!(
                self.out,
                "  {} {} - {}",
                seeded.outcome.marker(),
                employee.first_name,
                report::format_amount(seeded.record.net_pay)
            )?;
        }
        info!(
            component = "seed",
            month = %generation.month_year,
            created = report.payrolls.created,
            "payroll seeded"
        );
        Ok(())
    }

    fn seed_attendance(
        &mut self,
        employees: &[Employee],
        report: &mut SeedReport,
    ) -> SeedResult<()> {
        writeln!(self.out, "📅 Creating attendance records...")?;
        let workdays = plan::workdays(self.today, ATTENDANCE_WINDOW_DAYS);
        let policy = self.options.attendance_policy;

        for employee in employees {
            for date in &workdays {
                let Some(draw) = plan::draw_attendance(&mut self.rng, *date, policy) else {
                    report.attendance_skipped += 1;
                    continue;
                };
                let seeded = store::attendance(
                    self.conn,
                    &NewAttendance {
                        id: Uuid::new_v4(),
                        employee_id: employee.id,
                        attendance_date: draw.date,
                        check_in: draw.check_in,
                        check_out: draw.check_out,
                        attendance_status: draw.status.as_str().to_string(),
                        work_type: WORK_TYPE_REGULAR.to_string(),
                    },
                )?;
                report.attendances.record(seeded.outcome);
            }
        }

        writeln!(
            self.out,
            "  ✅ Created attendance records for {} employees",
            employees.len()
        )?;
        info!(
            component = "seed",
            ?policy,
            created = report.attendances.created,
            skipped = report.attendance_skipped,
            "attendance seeded"
        );
        Ok(())
    }

    fn seed_recruitment(&mut self, report: &mut SeedReport) -> SeedResult<()> {
        writeln!(self.out, "🎯 Creating recruitment records...")?;
        for index in 0..RECRUITMENT_POSTS {
            let draw = plan::draw_recruitment(&mut self.rng, self.today);
            let seeded = store::recruitment(
                self.conn,
                &NewRecruitment {
                    id: Uuid::new_v4(),
                    title: format!("Software Developer {}", index + 1),
                    description: RECRUITMENT_DESCRIPTION.to_string(),
                    status: draw.status.to_string(),
                    start_date: draw.start_date,
                    deadline: draw.deadline,
                    vacancy: draw.vacancy,
                    is_active: draw.is_active(),
                },
            )?;
            report.recruitments.record(seeded.outcome);
            writeln!(
                self.out,
                "  {} {} - {}",
                seeded.outcome.marker(),
                seeded.record.title,
                seeded.record.status
            )?;
        }
        Ok(())
    }

    fn seed_users(&mut self, employees: &[Employee], report: &mut SeedReport) -> SeedResult<()> {
        writeln!(self.out, "🔐 Creating user accounts for employees...")?;

        let admin = AccountDraft {
            username: ADMIN_USERNAME,
            email: ADMIN_EMAIL,
            first_name: "Admin",
            last_name: "",
            role: ROLE_ADMIN,
        };
        self.seed_account(admin, ADMIN_PASSWORD, report)?;

        for employee in employees {
            let username = employee.username();
            let draft = AccountDraft {
                username,
                email: &employee.email,
                first_name: &employee.first_name,
                last_name: &employee.last_name,
                role: ROLE_EMPLOYEE,
            };
            self.seed_account(draft, EMPLOYEE_PASSWORD, report)?;
            report.credentials.push(Credential {
                first_name: employee.first_name.clone(),
                username: username.to_string(),
                password: EMPLOYEE_PASSWORD.to_string(),
            });
        }
        info!(component = "seed", created = report.users.created, "user accounts seeded");
        Ok(())
    }

    fn seed_account(
        &mut self,
        draft: AccountDraft<'_>,
        password: &str,
        report: &mut SeedReport,
    ) -> SeedResult<()> {
        let seeded = store::user(self.conn, draft, password)?;
        report.users.record(seeded.outcome);
        if seeded.outcome.is_created() {
            writeln!(self.out, "  ✅ Created user: {} / {}", draft.username, password)?;
        } else {
            writeln!(self.out, "  ℹ️ User already exists: {}", draft.username)?;
        }
        Ok(())
    }
}

fn fixture_date(owner: &str, (year, month, day): FixtureDate) -> SeedResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SeedError::InvalidFixture(format!("{owner}: {year}-{month:02}-{day:02} is not a date"))
    })
}
