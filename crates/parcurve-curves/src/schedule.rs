//! Accrual schedule generation for swap legs.
//!
//! A [`ScheduleSpec`] describes a leg by its effective and maturity dates, one
//! regular increment (weeks or months) and optional stub dates. The generated
//! [`Schedule`] lists accrual-period end dates; they are not business-day
//! adjusted, callers roll them with their own payment convention.
//!
//! ```rust
//! use parcurve_core::Date;
//! use parcurve_curves::schedule::ScheduleSpec;
//!
//! let schedule = ScheduleSpec::new(
//!     Date::from_ymd(2011, 11, 11).unwrap(),
//!     Date::from_ymd(2012, 11, 11).unwrap(),
//! )
//! .with_months(3)
//! .with_penultimate(Date::from_ymd(2012, 8, 11).unwrap())
//! .generate()
//! .unwrap();
//!
//! assert_eq!(schedule.len(), 4);
//! assert_eq!(schedule.dates()[0], Date::from_ymd(2012, 2, 11).unwrap());
//! ```

use serde::{Deserialize, Serialize};

use parcurve_core::Date;

use crate::error::{CurveError, CurveResult};

/// Direction in which regular dates are rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Roll back from the maturity (or penultimate) date; any stub sits at the front.
    #[default]
    Backward,
    /// Roll forward from the effective (or second) date; any stub sits at the back.
    Forward,
}

/// Parameters of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Start of the first accrual period.
    pub effective: Date,
    /// End of the last accrual period.
    pub maturity: Date,
    /// Roll direction.
    #[serde(default)]
    pub direction: Direction,
    /// Explicit end of the first period.
    #[serde(default)]
    pub second: Option<Date>,
    /// Explicit start of the last period.
    #[serde(default)]
    pub penultimate: Option<Date>,
    /// Regular increment in weeks.
    #[serde(default)]
    pub weeks: Option<u32>,
    /// Regular increment in months.
    #[serde(default)]
    pub months: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Weeks(i64),
    Months(i32),
}

impl Step {
    /// The date `k` increments away from `anchor`, keeping the anchor's day of month.
    fn offset(self, anchor: Date, k: i32) -> CurveResult<Date> {
        match self {
            Step::Weeks(n) => Ok(anchor.add_days(7 * n * i64::from(k))),
            Step::Months(n) => Ok(anchor.add_months_anchored(n * k, anchor.day())?),
        }
    }
}

impl ScheduleSpec {
    /// Creates a backward schedule spec with no increment set.
    #[must_use]
    pub fn new(effective: Date, maturity: Date) -> Self {
        Self {
            effective,
            maturity,
            direction: Direction::Backward,
            second: None,
            penultimate: None,
            weeks: None,
            months: None,
        }
    }

    /// Sets a regular increment of `n` months.
    #[must_use]
    pub fn with_months(mut self, n: u32) -> Self {
        self.months = Some(n);
        self
    }

    /// Sets a regular increment of `n` weeks.
    #[must_use]
    pub fn with_weeks(mut self, n: u32) -> Self {
        self.weeks = Some(n);
        self
    }

    /// Sets the roll direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets an explicit end of the first period.
    #[must_use]
    pub fn with_second(mut self, date: Date) -> Self {
        self.second = Some(date);
        self
    }

    /// Sets an explicit start of the last period.
    #[must_use]
    pub fn with_penultimate(mut self, date: Date) -> Self {
        self.penultimate = Some(date);
        self
    }

    fn step(&self) -> CurveResult<Step> {
        let step = match (self.weeks, self.months) {
            (Some(_), Some(_)) => {
                return Err(CurveError::schedule_configuration(
                    "set either weeks or months, not both",
                ))
            }
            (None, None) => {
                return Err(CurveError::schedule_configuration(
                    "an increment in weeks or months is required",
                ))
            }
            (Some(0), None) | (None, Some(0)) => {
                return Err(CurveError::schedule_configuration(
                    "the increment must be positive",
                ))
            }
            (Some(w), None) => Step::Weeks(i64::from(w)),
            (None, Some(m)) => Step::Months(i32::try_from(m).map_err(|_| {
                CurveError::schedule_configuration(format!("increment of {m} months is too large"))
            })?),
        };
        Ok(step)
    }

    fn check_dates(&self) -> CurveResult<()> {
        if self.effective >= self.maturity {
            return Err(CurveError::schedule_configuration(format!(
                "effective date {} must precede maturity {}",
                self.effective, self.maturity
            )));
        }
        if self.second == Some(self.effective) {
            return Err(CurveError::schedule_configuration(
                "second date equals the effective date",
            ));
        }
        if self.penultimate == Some(self.maturity) {
            return Err(CurveError::schedule_configuration(
                "penultimate date equals the maturity date",
            ));
        }
        for (label, stub) in [("second", self.second), ("penultimate", self.penultimate)] {
            if let Some(date) = stub {
                if date <= self.effective || date >= self.maturity {
                    return Err(CurveError::schedule_configuration(format!(
                        "{label} date {date} is outside ({}, {})",
                        self.effective, self.maturity
                    )));
                }
            }
        }
        if let (Some(second), Some(penultimate)) = (self.second, self.penultimate) {
            if second > penultimate {
                return Err(CurveError::schedule_configuration(format!(
                    "second date {second} is after penultimate date {penultimate}"
                )));
            }
        }
        Ok(())
    }

    /// Generates the accrual-period end dates.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::ScheduleConfiguration`] if the increment is not
    /// exactly one positive unit or the dates are inconsistent.
    pub fn generate(&self) -> CurveResult<Schedule> {
        let step = self.step()?;
        self.check_dates()?;

        let mut dates = Vec::new();
        dates.extend(self.second);

        match self.direction {
            Direction::Backward => {
                let anchor = self.penultimate.unwrap_or(self.maturity);
                let floor = self.second.unwrap_or(self.effective);
                let mut rolled = Vec::new();
                for k in 1.. {
                    let date = step.offset(anchor, -k)?;
                    if date <= floor {
                        break;
                    }
                    rolled.push(date);
                }
                dates.extend(rolled.into_iter().rev());
            }
            Direction::Forward => {
                let anchor = self.second.unwrap_or(self.effective);
                let ceiling = self.penultimate.unwrap_or(self.maturity);
                for k in 1.. {
                    let date = step.offset(anchor, k)?;
                    if date >= ceiling {
                        break;
                    }
                    dates.push(date);
                }
            }
        }

        dates.extend(self.penultimate.filter(|p| Some(*p) != self.second));
        dates.push(self.maturity);

        Ok(Schedule {
            effective: self.effective,
            dates,
        })
    }
}

/// Generated accrual-period end dates, strictly increasing and ending at maturity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    effective: Date,
    dates: Vec<Date>,
}

impl Schedule {
    /// A single period from `effective` to `maturity`.
    #[must_use]
    pub fn single(effective: Date, maturity: Date) -> Self {
        Self {
            effective,
            dates: vec![maturity],
        }
    }

    /// Start of the first period.
    #[must_use]
    pub fn effective(&self) -> Date {
        self.effective
    }

    /// End of the last period.
    #[must_use]
    pub fn maturity(&self) -> Date {
        // never empty: generate always pushes the maturity
        self.dates.last().copied().unwrap_or(self.effective)
    }

    /// Period end dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if there are no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// (accrual start, accrual end) pairs, the first starting at the effective date.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        std::iter::once(self.effective)
            .chain(self.dates.iter().copied())
            .zip(self.dates.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_backward_with_penultimate() {
        let schedule = ScheduleSpec::new(d(2011, 11, 11), d(2012, 11, 11))
            .with_months(3)
            .with_penultimate(d(2012, 8, 11))
            .generate()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[d(2012, 2, 11), d(2012, 5, 11), d(2012, 8, 11), d(2012, 11, 11)]
        );
    }

    #[test]
    fn test_backward_front_stub() {
        let schedule = ScheduleSpec::new(d(2025, 1, 15), d(2026, 3, 20))
            .with_months(6)
            .generate()
            .unwrap();

        // short first period 2025-01-15 .. 2025-03-20
        assert_eq!(
            schedule.dates(),
            &[d(2025, 3, 20), d(2025, 9, 20), d(2026, 3, 20)]
        );
    }

    #[test]
    fn test_backward_end_of_month_anchor() {
        let schedule = ScheduleSpec::new(d(2024, 8, 31), d(2025, 8, 31))
            .with_months(3)
            .generate()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[d(2024, 11, 30), d(2025, 2, 28), d(2025, 5, 31), d(2025, 8, 31)]
        );
    }

    #[test]
    fn test_forward_back_stub() {
        let schedule = ScheduleSpec::new(d(2025, 1, 15), d(2025, 12, 1))
            .with_months(3)
            .with_direction(Direction::Forward)
            .generate()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[d(2025, 4, 15), d(2025, 7, 15), d(2025, 10, 15), d(2025, 12, 1)]
        );
    }

    #[test]
    fn test_forward_with_second_and_penultimate() {
        let schedule = ScheduleSpec::new(d(2025, 1, 2), d(2026, 1, 2))
            .with_months(3)
            .with_direction(Direction::Forward)
            .with_second(d(2025, 2, 15))
            .with_penultimate(d(2025, 11, 15))
            .generate()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[
                d(2025, 2, 15),
                d(2025, 5, 15),
                d(2025, 8, 15),
                d(2025, 11, 15),
                d(2026, 1, 2)
            ]
        );
    }

    #[test]
    fn test_weekly() {
        let schedule = ScheduleSpec::new(d(2025, 1, 6), d(2025, 2, 3))
            .with_weeks(2)
            .generate()
            .unwrap();
        assert_eq!(schedule.dates(), &[d(2025, 1, 20), d(2025, 2, 3)]);
    }

    #[test]
    fn test_periods() {
        let schedule = ScheduleSpec::new(d(2025, 1, 15), d(2026, 1, 15))
            .with_months(6)
            .generate()
            .unwrap();
        let periods: Vec<_> = schedule.periods().collect();
        assert_eq!(
            periods,
            vec![
                (d(2025, 1, 15), d(2025, 7, 15)),
                (d(2025, 7, 15), d(2026, 1, 15))
            ]
        );
        assert_eq!(schedule.maturity(), d(2026, 1, 15));
    }

    #[test]
    fn test_increment_validation() {
        let spec = ScheduleSpec::new(d(2025, 1, 15), d(2026, 1, 15));

        let both = spec.clone().with_months(3).with_weeks(1).generate();
        assert!(matches!(both, Err(CurveError::ScheduleConfiguration { .. })));

        let neither = spec.clone().generate();
        assert!(matches!(neither, Err(CurveError::ScheduleConfiguration { .. })));

        let zero = spec.with_months(0).generate();
        assert!(matches!(zero, Err(CurveError::ScheduleConfiguration { .. })));
    }

    #[test]
    fn test_date_validation() {
        let spec = ScheduleSpec::new(d(2025, 1, 15), d(2026, 1, 15)).with_months(3);

        let err = spec.clone().with_penultimate(d(2026, 1, 15)).generate();
        assert!(matches!(err, Err(CurveError::ScheduleConfiguration { .. })));

        let err = spec.clone().with_second(d(2025, 1, 15)).generate();
        assert!(matches!(err, Err(CurveError::ScheduleConfiguration { .. })));

        let err = spec.clone().with_second(d(2027, 1, 15)).generate();
        assert!(matches!(err, Err(CurveError::ScheduleConfiguration { .. })));

        let err = spec
            .clone()
            .with_second(d(2025, 9, 1))
            .with_penultimate(d(2025, 6, 1))
            .generate();
        assert!(matches!(err, Err(CurveError::ScheduleConfiguration { .. })));

        let reversed = ScheduleSpec::new(d(2026, 1, 15), d(2025, 1, 15)).with_months(3);
        assert!(reversed.generate().is_err());
    }

    #[test]
    fn test_single() {
        let schedule = Schedule::single(d(2025, 1, 15), d(2025, 7, 15));
        assert_eq!(schedule.len(), 1);
        assert_eq!(
            schedule.periods().collect::<Vec<_>>(),
            vec![(d(2025, 1, 15), d(2025, 7, 15))]
        );
    }
}
