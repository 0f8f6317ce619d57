use std::collections::BTreeMap;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::core::{
    BudgetInput, BudgetResult, CalcError, ExpenseShare, InvestmentInput, LoanInput, LoanResult,
    SavingsGoalInput, compute_loan, simulate_investment, solve_savings_goal, summarize_budget,
};
use crate::form;
use crate::report::{ReportSections, render_report};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BudgetPayload {
    income: Option<f64>,
    expenses: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SavingsPayload {
    goal_amount: Option<f64>,
    monthly_savings: Option<f64>,
    current_savings: Option<f64>,
    interest_rate: Option<f64>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    principal: Option<f64>,
    tenure_years: Option<u32>,
    tenure_months: Option<u32>,
    interest_rate: Option<f64>,
    include_schedule: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestmentPayload {
    initial_investment: Option<f64>,
    monthly_contribution: Option<f64>,
    years: Option<u32>,
    annual_return: Option<f64>,
    annual_inflation: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReportPayload {
    budget: Option<BudgetPayload>,
    savings: Option<SavingsPayload>,
    loan: Option<LoanPayload>,
    investment: Option<InvestmentPayload>,
}

#[derive(Debug)]
struct LoanRequest {
    input: LoanInput,
    include_schedule: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetResponse {
    #[serde(flatten)]
    result: BudgetResult,
    deficit: bool,
    distribution: Vec<ExpenseShare>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanResponse {
    tenure_months: u32,
    #[serde(flatten)]
    result: LoanResult,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Routes for the static page and every calculator endpoint.
pub fn app_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/health", get(health_handler))
        .route("/api/budget", post(budget_handler))
        .route(
            "/api/savings",
            get(savings_get_handler).post(savings_post_handler),
        )
        .route("/api/loan", get(loan_get_handler).post(loan_post_handler))
        .route(
            "/api/investment",
            get(investment_get_handler).post(investment_post_handler),
        )
        .route("/api/report", post(report_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "finance planner HTTP API listening");
    tracing::info!("local access: http://127.0.0.1:{}/", config.port());

    axum::serve(listener, app_router()).await
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

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn budget_handler(payload: Result<Json<BudgetPayload>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return bad_request("budget", &rejection.body_text()),
    };
    let input = match budget_input_from_payload(payload) {
        Ok(input) => input,
        Err(msg) => return bad_request("budget", &msg),
    };
    let result = summarize_budget(&input);
    let response = BudgetResponse {
        deficit: result.is_deficit(),
        distribution: result.distribution(),
        result,
    };
    json_response(StatusCode::OK, response)
}

async fn savings_get_handler(payload: Result<Query<SavingsPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => savings_handler_impl(payload),
        Err(rejection) => bad_request("savings", &rejection.body_text()),
    }
}

async fn savings_post_handler(payload: Result<Json<SavingsPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => savings_handler_impl(payload),
        Err(rejection) => bad_request("savings", &rejection.body_text()),
    }
}

fn savings_handler_impl(payload: SavingsPayload) -> Response {
    let input = match savings_input_from_payload(payload) {
        Ok(input) => input,
        Err(msg) => return bad_request("savings", &msg),
    };
    match solve_savings_goal(&input) {
        Ok(projection) => json_response(StatusCode::OK, projection),
        Err(err) => calc_error_response("savings", &err),
    }
}

async fn loan_get_handler(payload: Result<Query<LoanPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => loan_handler_impl(payload),
        Err(rejection) => bad_request("loan", &rejection.body_text()),
    }
}

async fn loan_post_handler(payload: Result<Json<LoanPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => loan_handler_impl(payload),
        Err(rejection) => bad_request("loan", &rejection.body_text()),
    }
}

fn loan_handler_impl(payload: LoanPayload) -> Response {
    let request = match loan_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return bad_request("loan", &msg),
    };
    match compute_loan(&request.input, request.include_schedule) {
        Ok(result) => json_response(
            StatusCode::OK,
            LoanResponse {
                tenure_months: request.input.total_tenure_months,
                result,
            },
        ),
        Err(err) => calc_error_response("loan", &err),
    }
}

async fn investment_get_handler(
    payload: Result<Query<InvestmentPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => investment_handler_impl(payload),
        Err(rejection) => bad_request("investment", &rejection.body_text()),
    }
}

async fn investment_post_handler(
    payload: Result<Json<InvestmentPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => investment_handler_impl(payload),
        Err(rejection) => bad_request("investment", &rejection.body_text()),
    }
}

fn investment_handler_impl(payload: InvestmentPayload) -> Response {
    let input = match investment_input_from_payload(payload) {
        Ok(input) => input,
        Err(msg) => return bad_request("investment", &msg),
    };
    match simulate_investment(&input) {
        Ok(projection) => json_response(StatusCode::OK, projection),
        Err(err) => calc_error_response("investment", &err),
    }
}

async fn report_handler(payload: Result<Json<ReportPayload>, JsonRejection>) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return bad_request("report", &rejection.body_text()),
    };
    let sections = match report_sections_from_payload(payload) {
        Ok(sections) => sections,
        Err(msg) => return bad_request("report", &msg),
    };
    let report = render_report(&sections, chrono::Local::now().date_naive());
    with_cache_control((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"financial_report.txt\"",
            ),
        ],
        report,
    ))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn bad_request(endpoint: &str, msg: &str) -> Response {
    tracing::warn!(endpoint, error = msg, "rejected request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn calc_error_response(endpoint: &str, err: &CalcError) -> Response {
    bad_request(endpoint, &err.to_string())
}

fn budget_input_from_payload(payload: BudgetPayload) -> Result<BudgetInput, String> {
    let income = payload.income.unwrap_or(form::DEFAULT_INCOME);
    let input = match payload.expenses {
        Some(expenses) => BudgetInput { income, expenses },
        None => BudgetInput::with_default_categories(income),
    };
    form::validate_budget(&input)?;
    Ok(input)
}

fn savings_input_from_payload(payload: SavingsPayload) -> Result<SavingsGoalInput, String> {
    let mut input = form::default_savings();
    if let Some(v) = payload.goal_amount {
        input.goal_amount = v;
    }
    if let Some(v) = payload.monthly_savings {
        input.monthly_savings = v;
    }
    if let Some(v) = payload.current_savings {
        input.current_savings = v;
    }
    if let Some(v) = payload.interest_rate {
        input.annual_interest_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        input.annual_inflation_rate = v;
    }
    form::validate_savings(&input)?;
    Ok(input)
}

fn loan_request_from_payload(payload: LoanPayload) -> Result<LoanRequest, String> {
    let principal = payload.principal.unwrap_or(form::DEFAULT_LOAN_PRINCIPAL);
    let rate = payload.interest_rate.unwrap_or(form::DEFAULT_LOAN_RATE);
    let years = payload.tenure_years.unwrap_or(form::DEFAULT_LOAN_YEARS);
    let months = payload
        .tenure_months
        .unwrap_or(form::DEFAULT_LOAN_EXTRA_MONTHS);
    form::validate_loan_terms(principal, rate, years, months)?;

    Ok(LoanRequest {
        input: LoanInput::from_years_months(principal, rate, years, months),
        include_schedule: payload.include_schedule.unwrap_or(false),
    })
}

fn investment_input_from_payload(payload: InvestmentPayload) -> Result<InvestmentInput, String> {
    let mut input = form::default_investment();
    if let Some(v) = payload.initial_investment {
        input.initial_investment = v;
    }
    if let Some(v) = payload.monthly_contribution {
        input.monthly_contribution = v;
    }
    if let Some(v) = payload.years {
        input.years = v;
    }
    if let Some(v) = payload.annual_return {
        input.annual_return = v;
    }
    if let Some(v) = payload.annual_inflation {
        input.annual_inflation = v;
    }
    form::validate_investment(&input)?;
    Ok(input)
}

fn report_sections_from_payload(payload: ReportPayload) -> Result<ReportSections, String> {
    let budget = payload.budget.map(budget_input_from_payload).transpose()?;
    let savings = payload
        .savings
        .map(savings_input_from_payload)
        .transpose()?;
    let loan = payload
        .loan
        .map(|loan| loan_request_from_payload(loan).map(|request| request.input))
        .transpose()?;
    let investment = payload
        .investment
        .map(investment_input_from_payload)
        .transpose()?;

    let sections = ReportSections::compute(
        budget.as_ref(),
        savings.as_ref(),
        loan.as_ref(),
        investment.as_ref(),
    )
    .map_err(|e| e.to_string())?;
    if sections.is_empty() {
        return Err("report needs at least one of budget, savings, loan, investment".to_string());
    }
    Ok(sections)
}
