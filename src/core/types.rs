use serde::Serialize;

/// Validated runway calculator inputs. Amounts are non-negative; validation
/// happens at the API boundary, not here.
#[derive(Debug, Clone, Copy)]
pub struct RunwayInputs {
    pub savings: f64,
    pub monthly_expenses: f64,
    pub side_income: f64,
    pub target_months: f64,
}

/// Validated freedom simulation inputs. All rates are plain percentages
/// (6.0 means 6%), not fractions.
#[derive(Debug, Clone, Copy)]
pub struct FreedomInputs {
    pub current_net_worth: f64,
    pub annual_income: f64,
    pub annual_expenses: f64,
    pub income_growth_rate: f64,
    pub inflation_rate: f64,
    pub investment_return: f64,
    pub withdrawal_rate: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurndownPoint {
    pub month: u32,
    pub savings: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub year: i32,
    /// Net worth at the start of the year, before growth and savings land.
    pub net_worth: f64,
    pub target_corpus: f64,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreedomResult {
    /// Whole simulated years plus the month-refined fraction; exactly 100.0
    /// when the target corpus is not reached within the horizon.
    pub years_to_freedom: f64,
    pub final_corpus_needed: f64,
    pub yearly_projections: Vec<YearlyProjection>,
    pub freedom_year: i32,
}
