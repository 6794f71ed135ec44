// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Column encodings.
//!
//! Weekdays are stored as integers (0 = Monday), wall-clock times as
//! `HH:MM` text (so lexical order is chronological), dates as ISO 8601 and
//! instants as RFC 3339 UTC text.

use num_traits::ToPrimitive;
use shiftly_domain::{
    OpenDay, TimeRange, format_time_of_day, parse_date, parse_time_of_day, weekday_from_index,
    weekday_index,
};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, Time, Weekday};

use crate::data_models::OpenDayData;
use crate::error::PersistenceError;

pub fn encode_weekday(weekday: Weekday) -> i32 {
    i32::from(weekday_index(weekday))
}

pub fn decode_weekday(value: i32) -> Result<Weekday, PersistenceError> {
    weekday_from_index(i64::from(value))
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

pub fn encode_time(time: Time) -> String {
    format_time_of_day(time)
}

pub fn decode_time(value: &str) -> Result<Time, PersistenceError> {
    parse_time_of_day(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

pub fn decode_range(start: &str, end: &str) -> Result<TimeRange, PersistenceError> {
    TimeRange::new(decode_time(start)?, decode_time(end)?)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

pub fn encode_date(date: Date) -> String {
    date.to_string()
}

pub fn decode_date(value: &str) -> Result<Date, PersistenceError> {
    parse_date(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

pub fn encode_instant(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    instant
        .to_offset(time::UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub fn decode_instant(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("instant '{value}': {e}")))
}

pub fn encode_required_staff(count: u32) -> Result<i32, PersistenceError> {
    count
        .to_i32()
        .ok_or_else(|| PersistenceError::SerializationError(format!("headcount {count}")))
}

pub fn decode_required_staff(value: i32) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("headcount {value}")))
}

pub fn encode_open_days(days: &[OpenDay]) -> Result<String, PersistenceError> {
    let data: Vec<OpenDayData> = days
        .iter()
        .map(|day| OpenDayData {
            weekday: weekday_index(day.weekday),
            is_open: day.is_open,
            open_time: encode_time(day.open_time),
            close_time: encode_time(day.close_time),
        })
        .collect();
    Ok(serde_json::to_string(&data)?)
}

pub fn decode_open_days(json: &str) -> Result<Vec<OpenDay>, PersistenceError> {
    let data: Vec<OpenDayData> = serde_json::from_str(json)?;
    data.into_iter()
        .map(|day| {
            Ok(OpenDay {
                weekday: decode_weekday(i32::from(day.weekday))?,
                is_open: day.is_open,
                open_time: decode_time(&day.open_time)?,
                close_time: decode_time(&day.close_time)?,
            })
        })
        .collect()
}
