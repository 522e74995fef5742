use std::io::{self, Write};

use crate::store::{Outcome, RecordCounts};

use super::fixtures::{ADMIN_PASSWORD, ADMIN_USERNAME};

/// Created/existing tally for one entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub existing: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Existing => self.existing += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.existing
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub first_name: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub departments: Tally,
    pub employees: Tally,
    pub leave_types: Tally,
    pub leave_requests: Tally,
    pub payroll_generations: Tally,
    pub payrolls: Tally,
    pub attendances: Tally,
    /// Workdays whose drawn status produced no attendance record.
    pub attendance_skipped: usize,
    pub recruitments: Tally,
    pub users: Tally,
    pub credentials: Vec<Credential>,
    pub counts: RecordCounts,
}

/// Formats whole currency units with thousands separators.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn write_summary<W: Write>(out: &mut W, report: &SeedReport) -> io::Result<()> {
    writeln!(out, "\n🎉 Demo data creation completed!")?;
    writeln!(out, "\n📋 Summary:")?;
    writeln!(out, "   Departments: {}", report.departments.total())?;
    writeln!(out, "   Employees: {}", report.employees.total())?;
    writeln!(out, "   Leave Requests: {}", report.counts.leave_requests)?;
    writeln!(out, "   Payroll Records: {}", report.counts.payrolls)?;
    writeln!(out, "   Attendance Records: {}", report.counts.attendances)?;
    writeln!(out, "   Recruitment Posts: {}", report.counts.recruitments)?;
    writeln!(out, "   User Accounts: {}", report.counts.users)?;
    Ok(())
}

/// Prints the admin login and the first three employee logins.
pub fn write_credentials<W: Write>(out: &mut W, credentials: &[Credential]) -> io::Result<()> {
    writeln!(out, "\n🔑 Login Credentials:")?;
    writeln!(out, "   Admin: {ADMIN_USERNAME} / {ADMIN_PASSWORD}")?;
    for credential in credentials.iter().take(3) {
        writeln!(
            out,
            "   {}: {} / {}",
            credential.first_name, credential.username, credential.password
        )?;
    }
    writeln!(out, "   (And more employees with same pattern...)")?;
    Ok(())
}

pub fn write_access_url<W: Write>(out: &mut W, admin_url: &str) -> io::Result<()> {
    writeln!(out, "\n🚀 You can now access the system at:")?;
    writeln!(out, "   {admin_url}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_grouped_by_thousands() {
        assert_eq!(format_amount(0), "$0");
        assert_eq!(format_amount(999), "$999");
        assert_eq!(format_amount(1_000), "$1,000");
        assert_eq!(format_amount(82_150), "$82,150");
        assert_eq!(format_amount(1_234_567), "$1,234,567");
        assert_eq!(format_amount(-4_500), "-$4,500");
    }

    #[test]
    fn tally_counts_both_branches() {
        let mut tally = Tally::default();
        tally.record(Outcome::Created);
        tally.record(Outcome::Existing);
        tally.record(Outcome::Created);
        assert_eq!(tally.created, 2);
        assert_eq!(tally.existing, 1);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn credentials_show_only_first_three_employees() {
        let credentials: Vec<Credential> = ["John", "Jane", "Mike", "Sarah"]
            .iter()
            .map(|name| Credential {
                first_name: name.to_string(),
                username: name.to_lowercase(),
                password: "temp123".to_string(),
            })
            .collect();

        let mut out = Vec::new();
        write_credentials(&mut out, &credentials).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("   Admin: admin / admin123"));
        assert!(text.contains("   Mike: mike / temp123"));
        assert!(!text.contains("Sarah"));
        assert!(text.ends_with("(And more employees with same pattern...)\n"));
    }

    #[test]
    fn summary_reports_store_counts() {
        let mut report = SeedReport::default();
        report.departments.created = 5;
        report.employees.existing = 5;
        report.counts.leave_requests = 12;
        report.counts.users = 6;

        let mut out = Vec::new();
        write_summary(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("   Departments: 5\n"));
        assert!(text.contains("   Employees: 5\n"));
        assert!(text.contains("   Leave Requests: 12\n"));
        assert!(text.contains("   User Accounts: 6\n"));
    }
}
