//! Fixed sample data for the demo tenant.

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@acme.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const EMPLOYEE_PASSWORD: &str = "temp123";

pub const LEAVE_STATUSES: [&str; 4] = ["requested", "approved", "rejected", "cancelled"];
pub const RECRUITMENT_STATUSES: [&str; 3] = ["open", "in_progress", "closed"];
pub const RECRUITMENT_CLOSED: &str = "closed";
pub const RECRUITMENT_POSTS: usize = 5;
pub const RECRUITMENT_DESCRIPTION: &str =
    "Looking for an experienced software developer to join our team.";

pub const PAYROLL_GENERATION_STATUS: &str = "generated";
pub const PAYROLL_STATUS: &str = "paid";

pub const ATTENDANCE_WINDOW_DAYS: i64 = 30;
pub const WORK_TYPE_REGULAR: &str = "regular";

pub struct DepartmentFixture {
    pub name: &'static str,
    pub description: &'static str,
}

pub const DEPARTMENTS: [DepartmentFixture; 5] = [
    DepartmentFixture {
        name: "Engineering",
        description: "Software development and IT",
    },
    DepartmentFixture {
        name: "Human Resources",
        description: "HR operations and management",
    },
    DepartmentFixture {
        name: "Sales",
        description: "Sales and business development",
    },
    DepartmentFixture {
        name: "Marketing",
        description: "Marketing and communications",
    },
    DepartmentFixture {
        name: "Finance",
        description: "Financial operations",
    },
];

/// Calendar date as (year, month, day).
pub type FixtureDate = (i32, u32, u32);

pub struct EmployeeFixture {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: &'static str,
    pub department: &'static str,
    pub job_position: &'static str,
    pub phone: &'static str,
    pub gender: &'static str,
    pub dob: FixtureDate,
    pub date_of_joining: FixtureDate,
}

pub const EMPLOYEES: [EmployeeFixture; 5] = [
    EmployeeFixture {
        first_name: "John",
        last_name: "Doe",
        email: "john.doe@acme.com",
        department: "Engineering",
        job_position: "Senior Developer",
        phone: "+1234567890",
        gender: "male",
        dob: (1990, 5, 15),
        date_of_joining: (2022, 1, 15),
    },
    EmployeeFixture {
        first_name: "Jane",
        last_name: "Smith",
        email: "jane.smith@acme.com",
        department: "Human Resources",
        job_position: "HR Manager",
        phone: "+1234567891",
        gender: "female",
        dob: (1988, 8, 22),
        date_of_joining: (2021, 6, 10),
    },
    EmployeeFixture {
        first_name: "Mike",
        last_name: "Johnson",
        email: "mike.johnson@acme.com",
        department: "Sales",
        job_position: "Sales Executive",
        phone: "+1234567892",
        gender: "male",
        dob: (1992, 3, 8),
        date_of_joining: (2023, 2, 20),
    },
    EmployeeFixture {
        first_name: "Sarah",
        last_name: "Williams",
        email: "sarah.williams@acme.com",
        department: "Marketing",
        job_position: "Marketing Specialist",
        phone: "+1234567893",
        gender: "female",
        dob: (1991, 11, 30),
        date_of_joining: (2022, 9, 5),
    },
    EmployeeFixture {
        first_name: "David",
        last_name: "Brown",
        email: "david.brown@acme.com",
        department: "Finance",
        job_position: "Finance Analyst",
        phone: "+1234567894",
        gender: "male",
        dob: (1989, 7, 12),
        date_of_joining: (2021, 12, 1),
    },
];

pub struct LeaveTypeFixture {
    pub name: &'static str,
    pub count: i32,
    pub is_active: bool,
}

pub const LEAVE_TYPES: [LeaveTypeFixture; 4] = [
    LeaveTypeFixture {
        name: "Annual Leave",
        count: 21,
        is_active: true,
    },
    LeaveTypeFixture {
        name: "Sick Leave",
        count: 10,
        is_active: true,
    },
    LeaveTypeFixture {
        name: "Personal Leave",
        count: 5,
        is_active: true,
    },
    LeaveTypeFixture {
        name: "Maternity Leave",
        count: 90,
        is_active: true,
    },
];
