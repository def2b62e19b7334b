use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, NaiveDate, Utc};
use golf_core::{DayBucket, HourBucket, SalesTotals, WeekBucket};
use golf_server_app::workflow::reporting::{
    dashboard::DashboardStats,
    recent_games::GameSummary,
    sales_period::{PeriodKind, PeriodSales, SalesPeriod},
    transactions::{Transaction, TransactionRange},
};
use rust_decimal::Decimal;

use crate::{AdminSession, AppState, ServiceError};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(serde::Deserialize)]
pub struct DateQuery {
    date: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct TransactionsQuery {
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDashboardStats {
    today_games: u64,
    today_revenue: Decimal,
    total_players: u64,
    yesterday_games: u64,
    yesterday_revenue: Decimal,
    games_growth: Decimal,
    revenue_growth: Decimal,
}

impl From<DashboardStats> for JsonDashboardStats {
    fn from(stats: DashboardStats) -> Self {
        JsonDashboardStats {
            today_games: stats.today_games,
            today_revenue: stats.today_revenue,
            total_players: stats.total_players,
            yesterday_games: stats.yesterday_games,
            yesterday_revenue: stats.yesterday_revenue,
            games_growth: stats.games_growth,
            revenue_growth: stats.revenue_growth,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGameSummary {
    id: String,
    lead_player: String,
    player_count: u32,
    total_cost: Decimal,
    is_weekend: bool,
    completed_at: DateTime<Utc>,
}

impl From<GameSummary> for JsonGameSummary {
    fn from(summary: GameSummary) -> Self {
        JsonGameSummary {
            id: summary.id.to_string(),
            lead_player: summary.lead_player,
            player_count: summary.player_count,
            total_cost: summary.total_cost,
            is_weekend: summary.is_weekend,
            completed_at: summary.completed_at,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonPeriodSales {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    #[serde(flatten)]
    totals: SalesTotals,
    average_per_game: Decimal,
}

impl From<PeriodSales> for JsonPeriodSales {
    fn from(sales: PeriodSales) -> Self {
        JsonPeriodSales {
            start: sales.start,
            end: sales.end,
            totals: sales.totals,
            average_per_game: sales.average_per_game,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTransaction {
    #[serde(flatten)]
    game: JsonGameSummary,
    day_type: String,
}

impl From<Transaction> for JsonTransaction {
    fn from(transaction: Transaction) -> Self {
        JsonTransaction {
            game: transaction.game.into(),
            day_type: transaction.day_type.to_string(),
        }
    }
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ServiceError::BadRequest(format!("Invalid {}: expected YYYY-MM-DD", name)))
}

fn parse_optional_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ServiceError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_date(name, v))
        .transpose()
}

fn required_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    match (
        parse_optional_date("start", start)?,
        parse_optional_date("end", end)?,
    ) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(ServiceError::BadRequest(
            "Both start and end dates are required".to_string(),
        )),
    }
}

pub async fn dashboard_stats(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<JsonDashboardStats>, ServiceError> {
    let stats = app_state.app.report_dashboard_use_case.get_stats().await?;
    Ok(Json(stats.into()))
}

pub async fn recent_games(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<JsonGameSummary>>, ServiceError> {
    let games = app_state
        .app
        .report_recent_games_use_case
        .recent_games()
        .await?;
    Ok(Json(games.into_iter().map(Into::into).collect()))
}

pub async fn sales_for_period(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Path(period): Path<String>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<JsonPeriodSales>, ServiceError> {
    let kind = period
        .parse::<PeriodKind>()
        .map_err(|_| ServiceError::BadRequest("Invalid period".to_string()))?;
    let period = match kind {
        PeriodKind::Day => SalesPeriod::Day,
        PeriodKind::Week => SalesPeriod::Week,
        PeriodKind::Month => SalesPeriod::Month,
        PeriodKind::Custom => {
            let (first, last) = required_range(range.start.as_deref(), range.end.as_deref())?;
            SalesPeriod::Custom { first, last }
        }
    };
    let sales = app_state
        .app
        .report_sales_period_use_case
        .sales_for_period(period)
        .await?;
    Ok(Json(sales.into()))
}

pub async fn hourly_sales(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<HourBucket>>, ServiceError> {
    let date = parse_optional_date("date", query.date.as_deref())?;
    let buckets = app_state.app.report_breakdown_use_case.hourly(date).await?;
    Ok(Json(buckets))
}

pub async fn weekly_sales(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<DayBucket>>, ServiceError> {
    let buckets = app_state
        .app
        .report_breakdown_use_case
        .last_seven_days()
        .await?;
    Ok(Json(buckets))
}

pub async fn monthly_sales(
    State(app_state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<WeekBucket>>, ServiceError> {
    let buckets = app_state
        .app
        .report_breakdown_use_case
        .last_four_weeks()
        .await?;
    Ok(Json(buckets))
}

pub async fn custom_sales(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<DayBucket>>, ServiceError> {
    let (first, last) = required_range(range.start.as_deref(), range.end.as_deref())?;
    let buckets = app_state
        .app
        .report_breakdown_use_case
        .custom(first, last)
        .await?;
    Ok(Json(buckets))
}

pub async fn transactions(
    State(app_state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<Vec<JsonTransaction>>, ServiceError> {
    let range = if query.start.is_some() || query.end.is_some() {
        let (first, last) = required_range(query.start.as_deref(), query.end.as_deref())?;
        TransactionRange::Days { first, last }
    } else {
        TransactionRange::Day(parse_optional_date("date", query.date.as_deref())?)
    };
    let transactions = app_state
        .app
        .report_transactions_use_case
        .list_transactions(range)
        .await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}
