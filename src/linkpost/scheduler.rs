// SPDX-License-Identifier: MIT

//! Delayed posting
//!
//! There is no publishing integration: when a scheduled post comes due it is
//! written to the log.

use crate::adk::error::ValidationError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled {
        at: DateTime<FixedOffset>,
        message: String,
    },
    InPast,
}

impl ScheduleOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Scheduled { message, .. } => message,
            Self::InPast => "Scheduled time is in the past.",
        }
    }
}

/// Where the wall-clock time of a schedule request is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleZone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl ScheduleZone {
    /// `None` when the time is skipped or repeated by a DST change
    fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Fixed(offset) => offset.from_local_datetime(naive).single(),
            Self::Named(tz) => tz
                .from_local_datetime(naive)
                .single()
                .map(|at| at.fixed_offset()),
        }
    }
}

/// `UTC`, `GMT`, `Z`, a `+HH:MM` / `-HH:MM` offset or an IANA name such as
/// `America/New_York`
pub fn parse_timezone(timezone: &str) -> Result<ScheduleZone, ValidationError> {
    let tz = timezone.trim();
    let invalid = || ValidationError::InvalidSchedule(format!("unknown timezone '{}'", tz));

    if ["UTC", "GMT", "Z"].iter().any(|name| tz.eq_ignore_ascii_case(name)) {
        return FixedOffset::east_opt(0)
            .map(ScheduleZone::Fixed)
            .ok_or_else(invalid);
    }

    let sign = match tz.chars().next() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return Tz::from_str(tz).map(ScheduleZone::Named).map_err(|_| invalid()),
    };
    let (hours, minutes) = tz[1..].split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(ScheduleZone::Fixed)
        .ok_or_else(invalid)
}

/// Local wall-clock time in the given zone
pub fn parse_schedule_time(
    time: &str,
    zone: ScheduleZone,
) -> Result<DateTime<FixedOffset>, ValidationError> {
    let naive = NaiveDateTime::parse_from_str(time.trim(), TIME_FORMAT).map_err(|_| {
        ValidationError::InvalidSchedule(format!("'{}' does not match YYYY-MM-DD HH:MM", time))
    })?;
    zone.localize(&naive).ok_or_else(|| {
        ValidationError::InvalidSchedule(format!("'{}' does not exist or is ambiguous", time))
    })
}

/// Owns the timers of every pending post
#[derive(Default)]
pub struct PostScheduler {
    tasks: Mutex<JoinSet<()>>,
}

impl PostScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn schedule(
        &self,
        post: &str,
        time: &str,
        timezone: &str,
    ) -> Result<ScheduleOutcome, ValidationError> {
        self.schedule_from(post, time, timezone, Utc::now()).await
    }

    /// Like [PostScheduler::schedule] with an explicit current time
    pub async fn schedule_from(
        &self,
        post: &str,
        time: &str,
        timezone: &str,
        now: DateTime<Utc>,
    ) -> Result<ScheduleOutcome, ValidationError> {
        if post.trim().is_empty() {
            return Err(ValidationError::MissingField("Post content"));
        }
        let at = parse_schedule_time(time, parse_timezone(timezone)?)?;

        let delay = match (at.with_timezone(&Utc) - now).to_std() {
            Ok(delay) if !delay.is_zero() => delay,
            _ => return Ok(ScheduleOutcome::InPast),
        };

        let post = post.to_string();
        let mut tasks = self.tasks.lock().await;
        // reap posts that already went out
        while let Some(result) = tasks.try_join_next() {
            if let Err(e) = result {
                log::error!("Scheduled post task failed: {}", e);
            }
        }
        tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            log::info!("Posting: {}", post);
        });
        drop(tasks);
        log::info!("Post scheduled for {} ({:?} from now)", at, delay);

        Ok(ScheduleOutcome::Scheduled {
            at,
            message: format!("Post scheduled for {} in {}.", time.trim(), timezone.trim()),
        })
    }

    pub async fn pending(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Wait until every scheduled post has been published
    pub async fn wait_all(&self) {
        let mut tasks = self.tasks.lock().await;
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                log::error!("Scheduled post task failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn fixed(seconds: i32) -> ScheduleZone {
        ScheduleZone::Fixed(FixedOffset::east_opt(seconds).unwrap())
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("UTC").unwrap(), fixed(0));
        assert_eq!(parse_timezone("gmt").unwrap(), fixed(0));
        assert_eq!(parse_timezone("+05:30").unwrap(), fixed(19800));
        assert_eq!(parse_timezone("-08:00").unwrap(), fixed(-28800));
        assert_eq!(
            parse_timezone("America/New_York").unwrap(),
            ScheduleZone::Named(chrono_tz::America::New_York)
        );
        assert_eq!(
            parse_timezone(" Asia/Kolkata ").unwrap(),
            ScheduleZone::Named(chrono_tz::Asia::Kolkata)
        );
        assert!(parse_timezone("Mars/Olympus").is_err());
        assert!(parse_timezone("+5:30").is_err());
        assert!(parse_timezone("+05:75").is_err());
    }

    #[test]
    fn test_parse_schedule_time() {
        let offset = parse_timezone("+02:00").unwrap();
        let at = parse_schedule_time("2025-06-01 14:30", offset).unwrap();
        assert_eq!(
            at.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap()
        );

        assert!(matches!(
            parse_schedule_time("tomorrow", offset),
            Err(ValidationError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_named_zone_follows_daylight_saving() {
        let new_york = parse_timezone("America/New_York").unwrap();

        let winter = parse_schedule_time("2025-01-15 09:00", new_york).unwrap();
        assert_eq!(
            winter.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2025, 1, 15, 14, 0, 0).unwrap()
        );

        let summer = parse_schedule_time("2025-07-01 09:00", new_york).unwrap();
        assert_eq!(summer.offset().local_minus_utc(), -4 * 3600);
        assert_eq!(
            summer.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2025, 7, 1, 13, 0, 0).unwrap()
        );

        // clocks jump from 02:00 to 03:00
        assert!(matches!(
            parse_schedule_time("2025-03-09 02:30", new_york),
            Err(ValidationError::InvalidSchedule(_))
        ));
    }

    #[tokio::test]
    async fn test_named_zone_is_scheduled() {
        let scheduler = PostScheduler::new();
        // 09:00 in New York is 13:00 UTC in June
        let outcome = scheduler
            .schedule_from("Hello", "2025-06-01 09:00", "America/New_York", now())
            .await
            .unwrap();
        match &outcome {
            ScheduleOutcome::Scheduled { at, .. } => assert_eq!(
                at.with_timezone(&Utc),
                Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap()
            ),
            ScheduleOutcome::InPast => panic!("expected a scheduled post"),
        }
        assert_eq!(
            outcome.message(),
            "Post scheduled for 2025-06-01 09:00 in America/New_York."
        );
    }

    #[tokio::test]
    async fn test_published_posts_are_reaped() {
        let scheduler = PostScheduler::new();
        let due = Utc.with_ymd_and_hms(2025, 6, 1, 12, 1, 0).unwrap();
        let almost = due - chrono::Duration::milliseconds(5);

        scheduler
            .schedule_from("First", "2025-06-01 12:01", "UTC", almost)
            .await
            .unwrap();
        assert_eq!(scheduler.pending().await, 1);
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        scheduler
            .schedule_from("Second", "2025-06-01 12:01", "UTC", now())
            .await
            .unwrap();
        assert_eq!(scheduler.pending().await, 1);
    }

    #[tokio::test]
    async fn test_past_time_is_not_scheduled() {
        let scheduler = PostScheduler::new();
        let outcome = scheduler
            .schedule_from("Hello", "2025-06-01 11:59", "UTC", now())
            .await
            .unwrap();
        assert_eq!(outcome, ScheduleOutcome::InPast);
        assert_eq!(outcome.message(), "Scheduled time is in the past.");
        assert_eq!(scheduler.pending().await, 0);
    }

    #[tokio::test]
    async fn test_offset_moves_the_deadline() {
        let scheduler = PostScheduler::new();
        // 13:00 at +02:00 is 11:00 UTC, already gone
        let outcome = scheduler
            .schedule_from("Hello", "2025-06-01 13:00", "+02:00", now())
            .await
            .unwrap();
        assert_eq!(outcome, ScheduleOutcome::InPast);
    }

    #[tokio::test]
    async fn test_future_time_is_scheduled() {
        let scheduler = PostScheduler::new();
        let outcome = scheduler
            .schedule_from("Hello", "2025-06-01 12:01", "UTC", now())
            .await
            .unwrap();
        assert_eq!(outcome.message(), "Post scheduled for 2025-06-01 12:01 in UTC.");
        assert_eq!(scheduler.pending().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let scheduler = PostScheduler::new();
        assert_eq!(
            scheduler.schedule_from("  ", "2025-06-01 12:01", "UTC", now()).await,
            Err(ValidationError::MissingField("Post content"))
        );
        assert!(scheduler
            .schedule_from("Hello", "2025-06-01 12:01", "Nowhere", now())
            .await
            .is_err());
    }
}
