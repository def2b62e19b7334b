use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{calendar::VenueCalendar, money::round_currency};

pub const HOURS_PER_DAY: u32 = 24;
pub const WEEKLY_BUCKETS: usize = 4;
pub const WEEKLY_BUCKET_DAYS: i64 = 7;
pub const MAX_DAILY_BUCKETS: i64 = 366;

/// The slice of a game that revenue reporting looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sale {
    pub completed_at: DateTime<Utc>,
    pub total_cost: Decimal,
    pub player_count: u32,
    pub is_demo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub total_games: u64,
    pub total_revenue: Decimal,
    pub total_players: u64,
}

impl Default for SalesTotals {
    fn default() -> Self {
        Self {
            total_games: 0,
            total_revenue: round_currency(Decimal::ZERO),
            total_players: 0,
        }
    }
}

impl SalesTotals {
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        let mut totals = Self::default();
        for sale in sales.into_iter().filter(|s| !s.is_demo) {
            totals.add(sale);
        }
        totals
    }

    fn add(&mut self, sale: &Sale) {
        self.total_games += 1;
        self.total_revenue += sale.total_cost;
        self.total_players += sale.player_count as u64;
    }

    /// Zero when there were no games.
    pub fn average_per_game(&self) -> Decimal {
        if self.total_games == 0 {
            return round_currency(Decimal::ZERO);
        }
        round_currency(self.total_revenue / Decimal::from(self.total_games))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub hour: u32,
    pub game_count: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    pub game_count: u64,
    pub player_count: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub game_count: u64,
    pub player_count: u64,
    pub revenue: Decimal,
}

/// Exactly 24 buckets for the given local day, zero-filled.
pub fn hourly_buckets(sales: &[Sale], date: NaiveDate, calendar: &VenueCalendar) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (0..HOURS_PER_DAY)
        .map(|hour| HourBucket {
            hour,
            game_count: 0,
            revenue: round_currency(Decimal::ZERO),
        })
        .collect();
    for sale in sales.iter().filter(|s| !s.is_demo) {
        if calendar.local_date(sale.completed_at) != date {
            continue;
        }
        let bucket = &mut buckets[calendar.local_hour(sale.completed_at) as usize];
        bucket.game_count += 1;
        bucket.revenue += sale.total_cost;
    }
    buckets
}

/// One bucket per local day in `[first, last]`, ascending. Empty when the
/// range is inverted.
pub fn daily_buckets(
    sales: &[Sale],
    first: NaiveDate,
    last: NaiveDate,
    calendar: &VenueCalendar,
) -> Vec<DayBucket> {
    if last < first {
        return Vec::new();
    }
    let mut buckets: Vec<DayBucket> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| DayBucket {
            date,
            game_count: 0,
            player_count: 0,
            revenue: round_currency(Decimal::ZERO),
        })
        .collect();
    for sale in sales.iter().filter(|s| !s.is_demo) {
        let date = calendar.local_date(sale.completed_at);
        if date < first || date > last {
            continue;
        }
        let index = (date - first).num_days() as usize;
        let bucket = &mut buckets[index];
        bucket.game_count += 1;
        bucket.player_count += sale.player_count as u64;
        bucket.revenue += sale.total_cost;
    }
    buckets
}

pub fn weekly_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - TimeDelta::days(WEEKLY_BUCKET_DAYS * WEEKLY_BUCKETS as i64)
}

/// Four contiguous 7-day windows ending at `now`, oldest first. Each window
/// is half-open except the newest, which also holds `now` itself.
pub fn weekly_buckets(sales: &[Sale], now: DateTime<Utc>) -> Vec<WeekBucket> {
    let origin = weekly_window_start(now);
    let week = TimeDelta::days(WEEKLY_BUCKET_DAYS);
    let mut buckets: Vec<WeekBucket> = (0..WEEKLY_BUCKETS)
        .map(|i| {
            let start = origin + week * i as i32;
            WeekBucket {
                start,
                end: start + week,
                game_count: 0,
                player_count: 0,
                revenue: round_currency(Decimal::ZERO),
            }
        })
        .collect();
    for sale in sales.iter().filter(|s| !s.is_demo) {
        if sale.completed_at < origin || sale.completed_at > now {
            continue;
        }
        let elapsed = (sale.completed_at - origin).num_milliseconds();
        let index = ((elapsed / week.num_milliseconds()) as usize).min(WEEKLY_BUCKETS - 1);
        let bucket = &mut buckets[index];
        bucket.game_count += 1;
        bucket.player_count += sale.player_count as u64;
        bucket.revenue += sale.total_cost;
    }
    buckets
}
