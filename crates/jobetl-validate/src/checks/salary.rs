//! Salary plausibility.
//!
//! Sources quote pay per hour, week, month or year without saying which.
//! The period is inferred from where the USD amounts fall among the unit
//! ranges, then the annualized figures must land inside the yearly bounds.
//! Stored amounts are annualized in the record's own currency.

use jobetl_model::{CanonicalRecord, DiagnosticLog, Field, PayPeriod, SalaryBounds, Value};
use jobetl_standards::CurrencyReference;

/// What the salary check did to a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SalaryOutcome {
    /// Neither side present.
    Absent,
    /// Amounts kept and annualized from the inferred period.
    Annualized(PayPeriod),
    /// Both sides reset to the sentinel.
    Rejected(&'static str),
}

/// First pay period whose unit range intersects `[usd_min, usd_max]` and
/// whose annualized span overlaps the yearly bounds.
pub fn infer_pay_period(usd_min: f64, usd_max: f64, bounds: &SalaryBounds) -> Option<PayPeriod> {
    PayPeriod::ALL.into_iter().find(|&period| {
        let (lo, hi) = bounds.range(period);
        let intersects = usd_max >= lo && usd_min <= hi;
        let multiplier = period.annual_multiplier();
        intersects
            && usd_max * multiplier >= bounds.yearly_min
            && usd_min * multiplier <= bounds.yearly_max
    })
}

pub fn check_salary(
    record: &mut CanonicalRecord,
    currencies: &CurrencyReference,
    bounds: &SalaryBounds,
    log: &mut DiagnosticLog,
) -> SalaryOutcome {
    let (min, max) = match (record.min_salary, record.max_salary) {
        (Value::NotAvailable, Value::NotAvailable) => return SalaryOutcome::Absent,
        (Value::Known(min), Value::Known(max)) => (min, max),
        _ => return reject(record, log, "only one salary bound present"),
    };
    if min <= 0.0 || max <= 0.0 {
        return reject(record, log, "non-positive salary");
    }
    if min > max {
        return reject(record, log, "min_salary greater than max_salary");
    }

    // Unknown currencies are taken at face value.
    let rate = record
        .currency
        .known()
        .and_then(|code| currencies.rate_to_usd(code))
        .unwrap_or(1.0);
    let (usd_min, usd_max) = (min * rate, max * rate);

    let Some(period) = infer_pay_period(usd_min, usd_max, bounds) else {
        return reject(record, log, "no plausible pay period");
    };
    let multiplier = period.annual_multiplier();
    if usd_min * multiplier < bounds.yearly_min || usd_max * multiplier > bounds.yearly_max {
        return reject(record, log, "annualized salary outside yearly bounds");
    }

    record.min_salary = Value::Known(round_cents(min * multiplier));
    record.max_salary = Value::Known(round_cents(max * multiplier));
    SalaryOutcome::Annualized(period)
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn reject(record: &mut CanonicalRecord, log: &mut DiagnosticLog, detail: &'static str) -> SalaryOutcome {
    for (field, value) in [
        (Field::MinSalary, &mut record.min_salary),
        (Field::MaxSalary, &mut record.max_salary),
    ] {
        log.soft_flag(field, &value.to_string(), &record.lineage, detail);
        value.reset();
        record.flags.soft_flagged.insert(field);
    }
    SalaryOutcome::Rejected(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_follow_unit_ranges() {
        let bounds = SalaryBounds::default();
        assert_eq!(infer_pay_period(25.0, 40.0, &bounds), Some(PayPeriod::Hour));
        assert_eq!(infer_pay_period(900.0, 1_200.0, &bounds), Some(PayPeriod::Week));
        assert_eq!(infer_pay_period(10_000.0, 15_000.0, &bounds), Some(PayPeriod::Month));
        assert_eq!(infer_pay_period(60_000.0, 80_000.0, &bounds), Some(PayPeriod::Year));
        assert_eq!(infer_pay_period(2.0, 5.0, &bounds), None);
        assert_eq!(infer_pay_period(900_000.0, 2_000_000.0, &bounds), None);
    }

    #[test]
    fn overlapping_ranges_take_the_shortest_period() {
        // 5,000 fits both week and month; week comes first.
        let bounds = SalaryBounds::default();
        assert_eq!(infer_pay_period(5_000.0, 6_000.0, &bounds), Some(PayPeriod::Week));
    }
}
