use chrono::{Days, Months, NaiveDate};

use super::types::BurndownPoint;

/// Months the current savings cover at the net monthly burn rate.
///
/// Returns `f64::INFINITY` when side income covers or exceeds expenses: the
/// savings never deplete, even when they are zero.
pub fn months_of_freedom(savings: f64, monthly_expenses: f64, side_income: f64) -> f64 {
    let net_burn = monthly_expenses - side_income;
    if net_burn <= 0.0 {
        return f64::INFINITY;
    }
    savings / net_burn
}

/// Progress toward the target runway, normalized to 0-100 and capped at 100.
///
/// Precondition: `target_months > 0`. An infinite `months` scores 100.
pub fn freedom_score(months: f64, target_months: f64) -> u32 {
    if months >= target_months {
        return 100;
    }
    ((months / target_months) * 100.0).round() as u32
}

/// Date the runway runs out, counted from `from`: whole months as calendar
/// months, the fractional remainder as 30-day months. Not calendar-accurate
/// for the remainder, and that is intentional.
///
/// Precondition: `months` is finite. Dates past the representable range clamp
/// to `NaiveDate::MAX`.
pub fn quit_date(months: f64, from: NaiveDate) -> NaiveDate {
    let whole_months = months.floor() as u32;
    let extra_days = ((months - months.floor()) * 30.0).floor() as u64;
    from.checked_add_months(Months::new(whole_months))
        .and_then(|date| date.checked_add_days(Days::new(extra_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Month-by-month savings balance, one point per integer month from 0 through
/// `ceil(months)`, floored at zero.
///
/// Precondition: `months` is finite; the unbounded-runway case must be
/// guarded by the caller.
pub fn burndown_data(
    savings: f64,
    monthly_expenses: f64,
    side_income: f64,
    months: f64,
) -> Vec<BurndownPoint> {
    let net_burn = monthly_expenses - side_income;
    let last_month = months.ceil() as u32;

    let mut points = Vec::with_capacity(last_month as usize + 1);
    let mut remaining = savings;
    for month in 0..=last_month {
        points.push(BurndownPoint {
            month,
            savings: remaining.max(0.0),
        });
        remaining -= net_burn;
    }
    points
}

/// Inverse of the runway formula: savings needed to cover `target_months` at
/// the net burn rate. Zero when side income alone sustains indefinitely.
pub fn required_savings(monthly_expenses: f64, target_months: f64, side_income: f64) -> f64 {
    let net_burn = monthly_expenses - side_income;
    if net_burn <= 0.0 {
        return 0.0;
    }
    net_burn * target_months
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn months_of_freedom_is_savings_over_net_burn() {
        assert_approx(months_of_freedom(120_000.0, 20_000.0, 0.0), 6.0);
        assert_approx(months_of_freedom(120_000.0, 25_000.0, 5_000.0), 6.0);
        assert_approx(months_of_freedom(50_000.0, 20_000.0, 0.0), 2.5);
    }

    #[test]
    fn months_of_freedom_zero_savings_is_zero() {
        assert_approx(months_of_freedom(0.0, 20_000.0, 0.0), 0.0);
    }

    #[test]
    fn months_of_freedom_unbounded_when_side_income_covers_expenses() {
        assert!(months_of_freedom(0.0, 20_000.0, 20_000.0).is_infinite());
        assert!(months_of_freedom(120_000.0, 20_000.0, 25_000.0).is_infinite());
        assert!(months_of_freedom(0.0, 0.0, 0.0).is_infinite());
    }

    #[test]
    fn infinite_months_compare_sanely() {
        // The unbounded sentinel is IEEE infinity; downstream comparisons
        // against finite targets must hold.
        let months = months_of_freedom(0.0, 10_000.0, 10_000.0);
        assert!(months >= 12.0);
        assert_eq!(freedom_score(months, 12.0), 100);
    }

    #[test]
    fn freedom_score_scales_and_caps() {
        assert_eq!(freedom_score(12.0, 12.0), 100);
        assert_eq!(freedom_score(6.0, 12.0), 50);
        assert_eq!(freedom_score(24.0, 12.0), 100);
        assert_eq!(freedom_score(0.0, 12.0), 0);
        assert_eq!(freedom_score(1.0, 3.0), 33);
    }

    #[test]
    fn quit_date_adds_whole_calendar_months() {
        assert_eq!(quit_date(6.0, date(2026, 1, 15)), date(2026, 7, 15));
        assert_eq!(quit_date(0.0, date(2026, 1, 15)), date(2026, 1, 15));
    }

    #[test]
    fn quit_date_converts_fraction_to_thirty_day_months() {
        // 2.5 months: two calendar months, then floor(0.5 * 30) = 15 days.
        assert_eq!(quit_date(2.5, date(2026, 1, 15)), date(2026, 3, 30));
        // 0.1 months: floor(0.1 * 30) = 3 days.
        assert_eq!(quit_date(0.1, date(2026, 1, 15)), date(2026, 1, 18));
    }

    #[test]
    fn quit_date_clamps_to_month_end() {
        assert_eq!(quit_date(1.0, date(2026, 1, 31)), date(2026, 2, 28));
    }

    #[test]
    fn burndown_walks_savings_down_to_zero() {
        let points = burndown_data(50_000.0, 20_000.0, 0.0, 2.5);
        assert_eq!(points.len(), 4);
        assert_approx(points[0].savings, 50_000.0);
        assert_approx(points[1].savings, 30_000.0);
        assert_approx(points[2].savings, 10_000.0);
        assert_approx(points[3].savings, 0.0);
        for (index, point) in points.iter().enumerate() {
            assert_eq!(point.month, index as u32);
        }
    }

    #[test]
    fn burndown_with_zero_months_is_a_single_point() {
        let points = burndown_data(0.0, 20_000.0, 0.0, 0.0);
        assert_eq!(points.len(), 1);
        assert_approx(points[0].savings, 0.0);
    }

    #[test]
    fn required_savings_is_net_burn_times_target() {
        assert_approx(required_savings(20_000.0, 12.0, 0.0), 240_000.0);
        assert_approx(required_savings(20_000.0, 6.0, 5_000.0), 90_000.0);
    }

    #[test]
    fn required_savings_is_zero_when_side_income_sustains() {
        assert_approx(required_savings(20_000.0, 12.0, 20_000.0), 0.0);
        assert_approx(required_savings(20_000.0, 12.0, 25_000.0), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_months_of_freedom_matches_ratio(
            savings in 0u32..10_000_000,
            net_burn in 1u32..1_000_000,
            side_income in 0u32..1_000_000
        ) {
            let savings = savings as f64;
            let expenses = (net_burn + side_income) as f64;
            let months = months_of_freedom(savings, expenses, side_income as f64);
            prop_assert!((months - savings / net_burn as f64).abs() <= EPS);
        }

        #[test]
        fn prop_required_savings_inverts_months_of_freedom(
            net_burn in 1u32..1_000_000,
            side_income in 0u32..1_000_000,
            target_months in 1u32..240
        ) {
            let expenses = (net_burn + side_income) as f64;
            let target = target_months as f64;
            let required = required_savings(expenses, target, side_income as f64);
            let months = months_of_freedom(required, expenses, side_income as f64);
            prop_assert!((months - target).abs() <= 1e-6);
        }

        #[test]
        fn prop_freedom_score_stays_in_range(
            months in 0u32..10_000,
            target_months in 1u32..240
        ) {
            let score = freedom_score(months as f64, target_months as f64);
            prop_assert!(score <= 100);
        }

        #[test]
        fn prop_burndown_has_ceil_plus_one_points_and_never_rises(
            savings in 0u32..1_000_000,
            net_burn in 100u32..1_000_000
        ) {
            let savings = savings as f64;
            let expenses = net_burn as f64;
            let months = months_of_freedom(savings, expenses, 0.0);
            let points = burndown_data(savings, expenses, 0.0, months);

            prop_assert_eq!(points.len(), months.ceil() as usize + 1);
            prop_assert!((points[0].savings - savings).abs() <= EPS);
            for pair in points.windows(2) {
                prop_assert!(pair[1].savings <= pair[0].savings + EPS);
                prop_assert!(pair[1].savings >= 0.0);
            }
        }
    }
}
