mod engine;
mod format;
mod runway;
mod types;

pub use engine::financial_freedom_years;
pub use format::{format_crores, format_currency, format_date, format_years_and_months};
pub use runway::{burndown_data, freedom_score, months_of_freedom, quit_date, required_savings};
pub use types::{BurndownPoint, FreedomInputs, FreedomResult, RunwayInputs, YearlyProjection};
