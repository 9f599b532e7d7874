//! 時間表現パーサー
//!
//! 受け付ける文法（大文字小文字は区別しない）:
//!
//! - 整数のみ: 秒として解釈（"90" → 90秒）
//! - 単位付き要素の並び: "5m", "1h30m", "1h 30m 15s", "1.5h"
//! - 時計表記: "MM:SS" / "HH:MM:SS"（"1:30" → 90秒）

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone};

use super::{Duration, ParseError};

/// 小数部として扱う最大桁数（それ以降は切り捨て）
const MAX_FRACTION_DIGITS: usize = 9;

/// 時間の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    /// 単位表記から変換
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::Hours),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(Unit::Minutes),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Unit::Seconds),
            _ => None,
        }
    }

    /// 1単位あたりの秒数
    fn seconds(&self) -> u128 {
        match self {
            Unit::Hours => 3600,
            Unit::Minutes => 60,
            Unit::Seconds => 1,
        }
    }

    fn index(&self) -> usize {
        match self {
            Unit::Hours => 0,
            Unit::Minutes => 1,
            Unit::Seconds => 2,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Unit::Hours => "h",
            Unit::Minutes => "m",
            Unit::Seconds => "s",
        }
    }
}

/// 時間表現をパースする
///
/// # Errors
///
/// 空文字列、どの文法にも一致しない文字列、u64秒に収まらない値の場合は
/// `ParseError` を返す。
pub fn parse_duration(input: &str) -> Result<Duration, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let normalized = trimmed.to_ascii_lowercase();

    // 整数のみは秒として扱う
    if normalized.bytes().all(|b| b.is_ascii_digit()) {
        return normalized
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ParseError::Overflow(trimmed.to_string()));
    }

    if normalized.contains(':') {
        return parse_clock(&normalized, trimmed);
    }

    parse_components(&normalized, trimmed)
}

/// "MM:SS" / "HH:MM:SS" 形式をパース
fn parse_clock(normalized: &str, original: &str) -> Result<Duration, ParseError> {
    let fields: Vec<&str> = normalized.split(':').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(ParseError::InvalidClock(original.to_string()));
    }

    let mut total: u64 = 0;
    for (i, field) in fields.iter().enumerate() {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidClock(original.to_string()));
        }
        let value: u64 = field
            .parse()
            .map_err(|_| ParseError::Overflow(original.to_string()))?;
        // 先頭以外のフィールドは60未満
        if i > 0 && value >= 60 {
            return Err(ParseError::InvalidClock(original.to_string()));
        }
        total = total
            .checked_mul(60)
            .and_then(|t| t.checked_add(value))
            .ok_or_else(|| ParseError::Overflow(original.to_string()))?;
    }

    Ok(Duration::from_secs(total))
}

/// "1h30m" のような単位付き要素の並びをパース
fn parse_components(normalized: &str, original: &str) -> Result<Duration, ParseError> {
    let bytes = normalized.as_bytes();
    let mut pos = 0;
    let mut seen = [false; 3];
    let mut components = 0;
    let mut total_millis: u128 = 0;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        let number_start = pos;
        while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
            pos += 1;
        }
        let number = &normalized[number_start..pos];
        if number.is_empty() {
            return Err(ParseError::Malformed(original.to_string()));
        }

        // "5 min" のように数値と単位の間の空白を許容
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let unit_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        let unit_token = &normalized[unit_start..pos];
        if unit_token.is_empty() {
            return Err(ParseError::Malformed(original.to_string()));
        }

        let unit = Unit::from_token(unit_token).ok_or_else(|| ParseError::UnknownUnit {
            unit: unit_token.to_string(),
            input: original.to_string(),
        })?;

        if seen[unit.index()] {
            return Err(ParseError::DuplicateUnit {
                unit: unit.symbol().to_string(),
                input: original.to_string(),
            });
        }
        seen[unit.index()] = true;

        let millis = component_millis(number, unit, original)?;
        total_millis = total_millis
            .checked_add(millis)
            .ok_or_else(|| ParseError::Overflow(original.to_string()))?;
        components += 1;
    }

    if components == 0 {
        return Err(ParseError::Malformed(original.to_string()));
    }

    let seconds = u64::try_from(total_millis / 1000)
        .map_err(|_| ParseError::Overflow(original.to_string()))?;
    Ok(Duration::from_secs(seconds))
}

/// 数値トークンと単位からミリ秒を計算
fn component_millis(number: &str, unit: Unit, original: &str) -> Result<u128, ParseError> {
    let invalid = || ParseError::InvalidNumber(number.to_string());
    let overflow = || ParseError::Overflow(original.to_string());

    let (integer, fraction) = match number.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (number, None),
    };

    if integer.is_empty() && fraction.map_or(true, str::is_empty) {
        return Err(invalid());
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || fraction.contains('.') {
            return Err(invalid());
        }
    }

    let unit_millis = unit.seconds() * 1000;

    // 数字のみなので、パース失敗は桁あふれを意味する
    let integer_value: u128 = if integer.is_empty() {
        0
    } else {
        integer.parse().map_err(|_| overflow())?
    };
    let mut millis = integer_value.checked_mul(unit_millis).ok_or_else(overflow)?;

    if let Some(fraction) = fraction {
        let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        let fraction_value: u128 = digits.parse().map_err(|_| invalid())?;
        let scale = 10u128.pow(digits.len() as u32);
        millis = millis
            .checked_add(fraction_value * unit_millis / scale)
            .ok_or_else(overflow)?;
    }

    Ok(millis)
}

/// 時刻表記（"HH:MM" / "HH:MM:SS"、24時間制）をパース
pub fn parse_clock_target(input: &str) -> Result<NaiveTime, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| ParseError::InvalidClock(trimmed.to_string()))
}

/// `now` から次に `target` の時刻になるまでの時間
///
/// 同時刻なら0秒、既に過ぎていれば翌日の同時刻までの時間を返す。
/// 端数の秒は切り上げる。時刻は `now` のタイムゾーンで解決するので、
/// 間に夏時間の切り替えがあっても実際の経過時間になる。
pub fn duration_until<Tz: TimeZone>(target: NaiveTime, now: &DateTime<Tz>) -> Duration {
    let local_now = now.naive_local();
    let today = local_now.date().and_time(target);
    let next = if today >= local_now {
        today
    } else {
        today + chrono::Duration::days(1)
    };

    let delta = match resolve_local(&now.timezone(), next) {
        Some(next) => next.signed_duration_since(now.clone()),
        None => next - local_now,
    };

    let millis = delta.num_milliseconds().max(0) as u64;
    Duration::from_secs(millis.div_ceil(1000))
}

/// ローカル時刻を実際の時刻に解決する
///
/// 重複する時刻（夏時間の終了）は早い方、存在しない時刻（夏時間の開始）は
/// 1時間後にずらす。
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&local).earliest().or_else(|| {
        tz.from_local_datetime(&(local + chrono::Duration::hours(1)))
            .earliest()
    })
}

// ============================================================================
// Tests
// ============================================================================
