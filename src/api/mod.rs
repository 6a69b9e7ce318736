use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    BurndownPoint, FreedomInputs, RunwayInputs, YearlyProjection, burndown_data,
    financial_freedom_years, format_crores, format_currency, format_date,
    format_years_and_months, freedom_score, months_of_freedom, quit_date, required_savings,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Expense multiplier for the lean-lifestyle what-if (a 30% reduction).
const LEAN_EXPENSE_SCALE: f64 = 0.7;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RunwayPayload {
    savings: Option<f64>,
    monthly_expenses: Option<f64>,
    side_income: Option<f64>,
    #[serde(alias = "emergencyBuffer")]
    target_months: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FreedomPayload {
    #[serde(alias = "currentNetWorth")]
    net_worth: Option<f64>,
    annual_income: Option<f64>,
    annual_expenses: Option<f64>,
    income_growth_rate: Option<f64>,
    inflation_rate: Option<f64>,
    investment_return: Option<f64>,
    withdrawal_rate: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "freedom",
    about = "Runway and financial-freedom projection calculator"
)]
struct Cli {
    #[arg(long, default_value_t = 0.0, help = "Current total savings")]
    savings: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly living expenses")]
    monthly_expenses: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly side income that offsets expenses"
    )]
    side_income: f64,
    #[arg(long, default_value_t = 12.0, help = "Target runway in months")]
    target_months: f64,
    #[arg(
        long,
        default_value_t = 5_000_000.0,
        help = "Current investable net worth"
    )]
    net_worth: f64,
    #[arg(long, default_value_t = 1_200_000.0)]
    annual_income: f64,
    #[arg(long, default_value_t = 600_000.0)]
    annual_expenses: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Expected annual income growth in percent"
    )]
    income_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Expected annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Expected annual investment return in percent"
    )]
    investment_return: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Safe withdrawal rate in percent, typically 3.5-4"
    )]
    withdrawal_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MinimalistRunway {
    monthly_expenses: f64,
    months_of_freedom: Option<f64>,
    unbounded: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunwayResponse {
    /// None when the runway is unbounded; JSON has no infinity.
    months_of_freedom: Option<f64>,
    unbounded: bool,
    freedom_score: u32,
    quit_date: Option<NaiveDate>,
    quit_date_formatted: Option<String>,
    target_months: f64,
    required_savings: f64,
    required_savings_formatted: String,
    savings_gap: f64,
    has_reached_goal: bool,
    burndown: Vec<BurndownPoint>,
    minimalist: MinimalistRunway,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreedomVariant {
    years_to_freedom: f64,
    freedom_year: i32,
    final_corpus_needed: f64,
    time_to_freedom_formatted: String,
    corpus_needed_formatted: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreedomResponse {
    years_to_freedom: f64,
    freedom_year: i32,
    final_corpus_needed: f64,
    time_to_freedom_formatted: String,
    corpus_needed_formatted: String,
    progress_percent: f64,
    savings_rate_percent: f64,
    share_text: String,
    yearly_projections: Vec<YearlyProjection>,
    lean: FreedomVariant,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_runway_inputs(cli: &Cli) -> Result<RunwayInputs, String> {
    for (name, value) in [
        ("--savings", cli.savings),
        ("--monthly-expenses", cli.monthly_expenses),
        ("--side-income", cli.side_income),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    if !cli.target_months.is_finite() || cli.target_months <= 0.0 {
        return Err("--target-months must be > 0".to_string());
    }

    Ok(RunwayInputs {
        savings: cli.savings,
        monthly_expenses: cli.monthly_expenses,
        side_income: cli.side_income,
        target_months: cli.target_months,
    })
}

fn build_freedom_inputs(cli: &Cli) -> Result<FreedomInputs, String> {
    for (name, value) in [
        ("--net-worth", cli.net_worth),
        ("--annual-income", cli.annual_income),
        ("--annual-expenses", cli.annual_expenses),
        ("--income-growth-rate", cli.income_growth_rate),
        ("--inflation-rate", cli.inflation_rate),
        ("--investment-return", cli.investment_return),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    if !cli.withdrawal_rate.is_finite() || cli.withdrawal_rate <= 0.0 {
        return Err("--withdrawal-rate must be > 0".to_string());
    }

    Ok(FreedomInputs {
        current_net_worth: cli.net_worth,
        annual_income: cli.annual_income,
        annual_expenses: cli.annual_expenses,
        income_growth_rate: cli.income_growth_rate,
        inflation_rate: cli.inflation_rate,
        investment_return: cli.investment_return,
        withdrawal_rate: cli.withdrawal_rate,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/runway",
            get(runway_get_handler).post(runway_post_handler),
        )
        .route(
            "/api/freedom",
            get(freedom_get_handler).post(freedom_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("freedom HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

/// Offline one-shot mode: apply CLI overrides, run both calculators, print
/// the same JSON the API serves.
pub fn run_calculation<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let runway_inputs = build_runway_inputs(&cli)?;
    let freedom_inputs = build_freedom_inputs(&cli)?;

    let today = Local::now().date_naive();
    let output = serde_json::json!({
        "runway": build_runway_response(&runway_inputs, today),
        "freedom": build_freedom_response(&freedom_inputs, today.year()),
    });
    let rendered =
        serde_json::to_string_pretty(&output).map_err(|e| format!("serialization failed: {e}"))?;
    println!("{rendered}");
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn runway_get_handler(Query(payload): Query<RunwayPayload>) -> Response {
    runway_handler_impl(payload).await
}

async fn runway_post_handler(Json(payload): Json<RunwayPayload>) -> Response {
    runway_handler_impl(payload).await
}

async fn runway_handler_impl(payload: RunwayPayload) -> Response {
    let inputs = match runway_inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let today = Local::now().date_naive();
    json_response(StatusCode::OK, build_runway_response(&inputs, today))
}

async fn freedom_get_handler(Query(payload): Query<FreedomPayload>) -> Response {
    freedom_handler_impl(payload).await
}

async fn freedom_post_handler(Json(payload): Json<FreedomPayload>) -> Response {
    freedom_handler_impl(payload).await
}

async fn freedom_handler_impl(payload: FreedomPayload) -> Response {
    let inputs = match freedom_inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let current_year = Local::now().year();
    json_response(StatusCode::OK, build_freedom_response(&inputs, current_year))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn runway_inputs_from_json(json: &str) -> Result<RunwayInputs, String> {
    let payload = serde_json::from_str::<RunwayPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    runway_inputs_from_payload(payload)
}

#[cfg(test)]
fn freedom_inputs_from_json(json: &str) -> Result<FreedomInputs, String> {
    let payload = serde_json::from_str::<FreedomPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    freedom_inputs_from_payload(payload)
}

fn runway_inputs_from_payload(payload: RunwayPayload) -> Result<RunwayInputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.savings {
        cli.savings = v;
    }
    if let Some(v) = payload.monthly_expenses {
        cli.monthly_expenses = v;
    }
    if let Some(v) = payload.side_income {
        cli.side_income = v;
    }
    if let Some(v) = payload.target_months {
        cli.target_months = v;
    }

    build_runway_inputs(&cli)
}

fn freedom_inputs_from_payload(payload: FreedomPayload) -> Result<FreedomInputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.net_worth {
        cli.net_worth = v;
    }
    if let Some(v) = payload.annual_income {
        cli.annual_income = v;
    }
    if let Some(v) = payload.annual_expenses {
        cli.annual_expenses = v;
    }
    if let Some(v) = payload.income_growth_rate {
        cli.income_growth_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.investment_return {
        cli.investment_return = v;
    }
    if let Some(v) = payload.withdrawal_rate {
        cli.withdrawal_rate = v;
    }

    build_freedom_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        savings: 0.0,
        monthly_expenses: 0.0,
        side_income: 0.0,
        target_months: 12.0,
        net_worth: 5_000_000.0,
        annual_income: 1_200_000.0,
        annual_expenses: 600_000.0,
        income_growth_rate: 5.0,
        inflation_rate: 6.0,
        investment_return: 8.0,
        withdrawal_rate: 4.0,
    }
}

fn build_runway_response(inputs: &RunwayInputs, today: NaiveDate) -> RunwayResponse {
    let months = months_of_freedom(inputs.savings, inputs.monthly_expenses, inputs.side_income);
    let unbounded = months.is_infinite();
    let required =
        required_savings(inputs.monthly_expenses, inputs.target_months, inputs.side_income);

    // The engine leaves the unbounded case undefined for dates and the
    // burndown series; this is the guard the contract requires.
    let (quit, burndown) = if unbounded {
        (None, Vec::new())
    } else {
        (
            Some(quit_date(months, today)),
            burndown_data(
                inputs.savings,
                inputs.monthly_expenses,
                inputs.side_income,
                months,
            ),
        )
    };

    let minimalist_expenses = inputs.monthly_expenses * LEAN_EXPENSE_SCALE;
    let minimalist_months =
        months_of_freedom(inputs.savings, minimalist_expenses, inputs.side_income);

    RunwayResponse {
        months_of_freedom: (!unbounded).then_some(months),
        unbounded,
        freedom_score: freedom_score(months, inputs.target_months),
        quit_date: quit,
        quit_date_formatted: quit.map(format_date),
        target_months: inputs.target_months,
        required_savings: required,
        required_savings_formatted: format_currency(required),
        savings_gap: (required - inputs.savings).max(0.0),
        has_reached_goal: inputs.savings >= required,
        burndown,
        minimalist: MinimalistRunway {
            monthly_expenses: minimalist_expenses,
            months_of_freedom: minimalist_months.is_finite().then_some(minimalist_months),
            unbounded: minimalist_months.is_infinite(),
        },
    }
}

fn build_freedom_response(inputs: &FreedomInputs, current_year: i32) -> FreedomResponse {
    let result = financial_freedom_years(inputs, current_year);

    let mut lean_inputs = *inputs;
    lean_inputs.annual_expenses = inputs.annual_expenses * LEAN_EXPENSE_SCALE;
    let lean_result = financial_freedom_years(&lean_inputs, current_year);

    let progress_percent = if result.final_corpus_needed > 0.0 {
        (inputs.current_net_worth / result.final_corpus_needed * 100.0).min(100.0)
    } else {
        100.0
    };
    let savings_rate_percent = if inputs.annual_income > 0.0 {
        ((inputs.annual_income - inputs.annual_expenses) / inputs.annual_income * 100.0).round()
    } else {
        0.0
    };

    let time_to_freedom_formatted = format_years_and_months(result.years_to_freedom);
    let corpus_needed_formatted = format_crores(result.final_corpus_needed);
    let share_text = format!(
        "I'll reach financial freedom in {time_to_freedom_formatted}! \
         Final corpus needed: {corpus_needed_formatted}. #FinancialFreedom"
    );

    FreedomResponse {
        years_to_freedom: result.years_to_freedom,
        freedom_year: result.freedom_year,
        final_corpus_needed: result.final_corpus_needed,
        time_to_freedom_formatted,
        corpus_needed_formatted,
        progress_percent,
        savings_rate_percent,
        share_text,
        yearly_projections: result.yearly_projections,
        lean: FreedomVariant {
            years_to_freedom: lean_result.years_to_freedom,
            freedom_year: lean_result.freedom_year,
            final_corpus_needed: lean_result.final_corpus_needed,
            time_to_freedom_formatted: format_years_and_months(lean_result.years_to_freedom),
            corpus_needed_formatted: format_crores(lean_result.final_corpus_needed),
        },
    }
}
