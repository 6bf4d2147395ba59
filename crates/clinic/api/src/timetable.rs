use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::id::{DoctorId, OfficeId, TimetableId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workday {
    pub id: TimetableId,
    pub doctor_id: DoctorId,
    pub office_id: OfficeId,
    /// Days since Sunday (Sunday = 0).
    pub work_day: i64,
}

impl Workday {
    pub fn covers(&self, date: NaiveDate) -> bool {
        i64::from(date.weekday().num_days_from_sunday()) == self.work_day
    }
}

pub fn is_work_day(workdays: &[Workday], date: NaiveDate) -> bool {
    workdays.iter().any(|workday| workday.covers(date))
}
