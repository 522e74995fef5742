//! Randomized sample values drawn for each seeded record.
//!
//! Nothing here touches the store; every draw takes the generator and the
//! seeding date explicitly so a seeded `StdRng` reproduces a whole run.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;

use super::fixtures::{LEAVE_STATUSES, RECRUITMENT_CLOSED, RECRUITMENT_STATUSES};

pub fn employee_code<R: Rng>(rng: &mut R) -> String {
    format!("EMP{}", rng.gen_range(1000..=9999))
}

/// Inclusive day count of a leave spanning `start..=end`.
pub fn requested_days(start: NaiveDate, end: NaiveDate) -> i32 {
    ((end - start).num_days() + 1) as i32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDraw {
    pub leave_type: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: &'static str,
}

impl LeaveDraw {
    pub fn requested_days(&self) -> i32 {
        requested_days(self.start_date, self.end_date)
    }
}

/// How many leave requests to file for one employee.
pub fn leave_request_count<R: Rng>(rng: &mut R) -> usize {
    rng.gen_range(1..=4)
}

/// Leave starting 1 to 60 days after `today`, lasting 1 to 10 extra days.
pub fn draw_leave<R: Rng>(rng: &mut R, today: NaiveDate, leave_types: usize) -> LeaveDraw {
    let leave_type = rng.gen_range(0..leave_types.max(1));
    let start_date = today + Duration::days(rng.gen_range(1..=60));
    let end_date = start_date + Duration::days(rng.gen_range(1..=10));
    let status = LEAVE_STATUSES.choose(rng).copied().unwrap_or(LEAVE_STATUSES[0]);
    LeaveDraw {
        leave_type,
        start_date,
        end_date,
        status,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayDraw {
    pub basic_pay: i64,
    pub overtime: i64,
    pub deduction: i64,
}

impl PayDraw {
    pub fn gross_pay(&self) -> i64 {
        self.basic_pay + self.overtime
    }

    pub fn net_pay(&self) -> i64 {
        self.gross_pay() - self.deduction
    }
}

pub fn draw_pay<R: Rng>(rng: &mut R) -> PayDraw {
    let basic_pay = rng.gen_range(50_000..=90_000);
    let overtime = rng.gen_range(0..=20) * 100;
    let deduction = rng.gen_range(100..=500);
    PayDraw {
        basic_pay,
        overtime,
        deduction,
    }
}

/// Pay period label, e.g. `2026-10`.
pub fn month_label(today: NaiveDate) -> String {
    format!("{}-{:02}", today.year(), today.month())
}

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.day0()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Late,
    EarlyLeave,
    Absent,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::EarlyLeave,
        AttendanceStatus::Absent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::EarlyLeave => "early_leave",
            AttendanceStatus::Absent => "absent",
        }
    }
}

/// Which drawn attendance statuses end up as stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttendancePolicy {
    /// Only `present` and `absent` days are recorded; `late` and
    /// `early_leave` draws leave the day without a record.
    #[default]
    PresentAndAbsent,
    /// Every drawn status is recorded.
    AllStatuses,
}

impl AttendancePolicy {
    pub fn records(self, status: AttendanceStatus) -> bool {
        match self {
            AttendancePolicy::AllStatuses => true,
            AttendancePolicy::PresentAndAbsent => {
                matches!(status, AttendanceStatus::Present | AttendanceStatus::Absent)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceDraw {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

fn clock(hour: i64, minute: i64) -> NaiveTime {
    NaiveTime::default() + Duration::minutes(hour * 60 + minute)
}

/// Monday to Friday dates among the `window` days ending at `today`,
/// most recent first.
pub fn workdays(today: NaiveDate, window: i64) -> Vec<NaiveDate> {
    (0..window)
        .map(|days_back| today - Duration::days(days_back))
        .filter(|date| date.weekday().num_days_from_monday() < 5)
        .collect()
}

/// Draws the status and clock times for one workday. Returns `None` when the
/// policy does not record the drawn status.
pub fn draw_attendance<R: Rng>(
    rng: &mut R,
    date: NaiveDate,
    policy: AttendancePolicy,
) -> Option<AttendanceDraw> {
    let check_in = clock(9, rng.gen_range(0..=30));
    let check_out = clock(17, rng.gen_range(0..=59));
    let status = AttendanceStatus::ALL
        .choose(rng)
        .copied()
        .unwrap_or(AttendanceStatus::Present);

    if !policy.records(status) {
        return None;
    }

    let (check_in, check_out) = match status {
        AttendanceStatus::Present => (Some(check_in), Some(check_out)),
        AttendanceStatus::Absent => (None, None),
        AttendanceStatus::Late => (Some(clock(9, rng.gen_range(31..=90))), Some(check_out)),
        AttendanceStatus::EarlyLeave => (Some(check_in), Some(clock(15, rng.gen_range(0..=119)))),
    };

    Some(AttendanceDraw {
        date,
        status,
        check_in,
        check_out,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecruitmentDraw {
    pub status: &'static str,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    pub vacancy: i32,
}

impl RecruitmentDraw {
    pub fn is_active(&self) -> bool {
        self.status != RECRUITMENT_CLOSED
    }
}

/// Posting opened 10 to 60 days ago with a 30 day application window.
pub fn draw_recruitment<R: Rng>(rng: &mut R, today: NaiveDate) -> RecruitmentDraw {
    let status = RECRUITMENT_STATUSES
        .choose(rng)
        .copied()
        .unwrap_or(RECRUITMENT_STATUSES[0]);
    let start_date = today - Duration::days(rng.gen_range(10..=60));
    let deadline = start_date + Duration::days(30);
    let vacancy = rng.gen_range(1..=3);
    RecruitmentDraw {
        status,
        start_date,
        deadline,
        vacancy,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Weekday};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn requested_days_counts_both_ends() {
        assert_eq!(requested_days(date(2026, 3, 2), date(2026, 3, 2)), 1);
        assert_eq!(requested_days(date(2026, 3, 2), date(2026, 3, 6)), 5);
        assert_eq!(requested_days(date(2026, 2, 27), date(2026, 3, 2)), 4);
    }

    #[test]
    fn leave_draws_stay_in_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = date(2026, 10, 17);
        for _ in 0..500 {
            let draw = draw_leave(&mut rng, today, 4);
            assert!(draw.leave_type < 4);
            let lead = (draw.start_date - today).num_days();
            assert!((1..=60).contains(&lead));
            let span = (draw.end_date - draw.start_date).num_days();
            assert!((1..=10).contains(&span));
            assert!(draw.requested_days() >= 2);
            assert!(LEAVE_STATUSES.contains(&draw.status));
        }
    }

    #[test]
    fn pay_totals_follow_components() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let pay = draw_pay(&mut rng);
            assert!((50_000..=90_000).contains(&pay.basic_pay));
            assert_eq!(pay.overtime % 100, 0);
            assert!((0..=2_000).contains(&pay.overtime));
            assert!((100..=500).contains(&pay.deduction));
            assert_eq!(pay.gross_pay(), pay.basic_pay + pay.overtime);
            assert_eq!(pay.net_pay(), pay.gross_pay() - pay.deduction);
        }
    }

    #[test]
    fn month_helpers_use_calendar_month() {
        let today = date(2026, 3, 9);
        assert_eq!(month_label(today), "2026-03");
        assert_eq!(month_start(today), date(2026, 3, 1));
        assert_eq!(month_start(date(2026, 3, 1)), date(2026, 3, 1));
    }

    #[test]
    fn workdays_skip_weekends() {
        // 2026-10-17 is a Saturday.
        let days = workdays(date(2026, 10, 17), 30);
        assert!(days
            .iter()
            .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
        assert_eq!(days.first(), Some(&date(2026, 10, 16)));
        assert_eq!(days.len(), 21);
    }

    #[test]
    fn parity_policy_never_records_late_or_early_leave() {
        let mut rng = StdRng::seed_from_u64(3);
        let day = date(2026, 10, 16);
        let mut skipped = 0;
        for _ in 0..400 {
            match draw_attendance(&mut rng, day, AttendancePolicy::PresentAndAbsent) {
                Some(draw) => {
                    assert!(matches!(
                        draw.status,
                        AttendanceStatus::Present | AttendanceStatus::Absent
                    ));
                    if draw.status == AttendanceStatus::Absent {
                        assert!(draw.check_in.is_none() && draw.check_out.is_none());
                    }
                }
                None => skipped += 1,
            }
        }
        assert!(skipped > 0);
    }

    #[test]
    fn present_times_fall_in_office_hours() {
        let mut rng = StdRng::seed_from_u64(5);
        let day = date(2026, 10, 16);
        for _ in 0..400 {
            if let Some(draw) = draw_attendance(&mut rng, day, AttendancePolicy::AllStatuses) {
                match draw.status {
                    AttendanceStatus::Present => {
                        let check_in = draw.check_in.unwrap();
                        assert!(check_in >= clock(9, 0) && check_in <= clock(9, 30));
                        let check_out = draw.check_out.unwrap();
                        assert!(check_out >= clock(17, 0) && check_out <= clock(17, 59));
                    }
                    AttendanceStatus::Late => {
                        assert!(draw.check_in.unwrap() > clock(9, 30));
                    }
                    AttendanceStatus::EarlyLeave => {
                        assert!(draw.check_out.unwrap() < clock(17, 0));
                    }
                    AttendanceStatus::Absent => assert!(draw.check_in.is_none()),
                }
            }
        }
    }

    #[test]
    fn closed_postings_are_inactive() {
        let mut rng = StdRng::seed_from_u64(13);
        let today = date(2026, 10, 17);
        for _ in 0..200 {
            let draw = draw_recruitment(&mut rng, today);
            assert_eq!(draw.is_active(), draw.status != "closed");
            assert_eq!((draw.deadline - draw.start_date).num_days(), 30);
            assert!((1..=3).contains(&draw.vacancy));
        }
    }

    #[test]
    fn employee_codes_have_four_digits() {
        let mut rng = StdRng::seed_from_u64(1);
        let code = employee_code(&mut rng);
        assert!(code.starts_with("EMP"));
        assert_eq!(code.len(), 7);
    }
}
