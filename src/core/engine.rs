use super::types::{FreedomInputs, FreedomResult, YearlyProjection};

/// Hard cap on simulated years; reaching it reports the saturation sentinel
/// rather than an error.
const MAX_PROJECTION_YEARS: usize = 100;

/// Extra years simulated past the crossing so the projection chart has a
/// visible tail.
const TRAILING_DISPLAY_YEARS: usize = 5;

/// Runs the year-by-year compounding simulation until net worth meets the
/// rising target corpus, refining the crossing to month granularity.
///
/// Two growth bases coexist on purpose: the target-corpus curve compounds
/// inflation off the initial `annual_expenses` every year, while the running
/// expenses (and income) compound off the previous year's value. Returns
/// `years_to_freedom` = 100.0 exactly when the horizon is exhausted.
pub fn financial_freedom_years(inputs: &FreedomInputs, current_year: i32) -> FreedomResult {
    let mut net_worth = inputs.current_net_worth;
    let mut income = inputs.annual_income;
    let mut expenses = inputs.annual_expenses;

    let mut projections: Vec<YearlyProjection> = Vec::new();
    let mut crossing: Option<usize> = None;
    let mut months_remaining = 0.0;
    let mut corpus_at_crossing = 0.0;
    let mut last_target_corpus = 0.0;

    for i in 0..MAX_PROJECTION_YEARS {
        let future_expenses =
            inputs.annual_expenses * (1.0 + inputs.inflation_rate / 100.0).powi(i as i32);
        let target_corpus = future_expenses / (inputs.withdrawal_rate / 100.0);
        last_target_corpus = target_corpus;

        if i > 0 {
            income *= 1.0 + inputs.income_growth_rate / 100.0;
            expenses *= 1.0 + inputs.inflation_rate / 100.0;
        }
        let savings = income - expenses;

        projections.push(YearlyProjection {
            year: current_year + i as i32,
            net_worth,
            target_corpus,
            income,
            expenses,
            savings,
        });

        net_worth += net_worth * (inputs.investment_return / 100.0) + savings;

        if crossing.is_none() && net_worth >= target_corpus {
            crossing = Some(i);
            corpus_at_crossing = target_corpus;
            if i > 0 {
                let prev_net_worth = projections[i - 1].net_worth;
                let monthly_growth = (net_worth - prev_net_worth) / 12.0;
                let gap = target_corpus - prev_net_worth;
                months_remaining = (gap / monthly_growth).ceil();
                // Degenerate or negative growth makes the division
                // meaningless; discard the partial year instead.
                if months_remaining > 12.0 {
                    months_remaining = 0.0;
                }
            }
        }

        if let Some(found) = crossing {
            if i >= found + TRAILING_DISPLAY_YEARS {
                break;
            }
        }
    }

    match crossing {
        Some(found) => FreedomResult {
            years_to_freedom: found as f64 + months_remaining / 12.0,
            final_corpus_needed: corpus_at_crossing,
            yearly_projections: projections,
            freedom_year: current_year + found as i32,
        },
        None => FreedomResult {
            years_to_freedom: MAX_PROJECTION_YEARS as f64,
            final_corpus_needed: last_target_corpus,
            yearly_projections: projections,
            freedom_year: current_year + MAX_PROJECTION_YEARS as i32,
        },
    }
}
