//! Date-stamped version strings

use chrono::{Local, NaiveDate};

/// Source of "today" for version stamping
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// `prefix` followed by the date as `YY.MM.DD`
pub fn version_string(prefix: &str, date: NaiveDate) -> String {
    format!("{}.{}", prefix, date.format("%y.%m.%d"))
}

/// Replacement line for the version macro definition
pub fn version_define(macro_name: &str, version: &str) -> String {
    format!("#define {}\t\"{}\"\n", macro_name, version)
}
