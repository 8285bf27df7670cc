use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    domain::AttendanceState,
    error::{AppError, Result},
};

pub const DEFAULT_TIME: &str = "09:00";
pub const DEFAULT_LOCATION: &str = "TBD";
pub const DEFAULT_POINTS: u32 = 10;
pub const DEFAULT_MIN_LEVEL: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workshop {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(with = "hour_minute")]
    pub time: NaiveTime,
    pub location: String,
    pub points: u32,
    pub min_level: u8,
    pub attendance_taken: bool,
    pub attendance_state: Option<AttendanceState>,
    pub created_at: DateTime<Utc>,
}

/// Admin form input. Everything but title and date falls back to a default.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct CreateWorkshopRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub points: Option<u32>,
    #[validate(range(min = 1, max = 5, message = "min_level must be between 1 and 5"))]
    pub min_level: Option<u8>,
}

impl CreateWorkshopRequest {
    /// Validates the request and applies defaults, producing a workshop with
    /// the given id. Attendance starts untaken and empty.
    pub fn into_workshop(self, id: String, created_at: DateTime<Utc>) -> Result<Workshop> {
        self.validate()?;

        let date = self
            .date
            .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
        let time = parse_time_of_day(self.time.as_deref().unwrap_or(DEFAULT_TIME))?;

        Ok(Workshop {
            id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            date,
            time,
            location: self
                .location
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            points: self.points.unwrap_or(DEFAULT_POINTS),
            min_level: self.min_level.unwrap_or(DEFAULT_MIN_LEVEL),
            attendance_taken: false,
            attendance_state: None,
            created_at,
        })
    }
}

/// Parses a wall-clock time of day such as `14:05` or `14:05:30`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid time of day: {:?}", s)))
}

pub fn format_time_of_day(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time_of_day(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_time_of_day(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn request() -> CreateWorkshopRequest {
        CreateWorkshopRequest {
            title: "Intro to Soldering".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("14:05").unwrap().hour(), 14);
        assert_eq!(parse_time_of_day(" 09:30:15 ").unwrap().minute(), 30);
        assert!(parse_time_of_day("noon").is_err());
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let workshop = request().into_workshop("1".to_string(), Utc::now()).unwrap();
        assert_eq!(format_time_of_day(&workshop.time), "09:00");
        assert_eq!(workshop.location, "TBD");
        assert_eq!(workshop.points, 10);
        assert_eq!(workshop.min_level, 1);
        assert_eq!(workshop.description, "");
        assert!(!workshop.attendance_taken);
        assert!(workshop.attendance_state.is_none());
    }

    #[test]
    fn test_required_fields() {
        let missing_title = CreateWorkshopRequest { title: String::new(), ..request() };
        assert!(matches!(
            missing_title.into_workshop("1".to_string(), Utc::now()),
            Err(AppError::Validation(_))
        ));

        let missing_date = CreateWorkshopRequest { date: None, ..request() };
        assert!(matches!(
            missing_date.into_workshop("1".to_string(), Utc::now()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_bad_level_and_time() {
        let level = CreateWorkshopRequest { min_level: Some(6), ..request() };
        assert!(level.into_workshop("1".to_string(), Utc::now()).is_err());

        let time = CreateWorkshopRequest { time: Some("2pm".to_string()), ..request() };
        assert!(matches!(
            time.into_workshop("1".to_string(), Utc::now()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_time_serializes_as_hour_minute() {
        let workshop = CreateWorkshopRequest { time: Some("14:05".to_string()), ..request() }
            .into_workshop("1".to_string(), Utc::now())
            .unwrap();
        let json = serde_json::to_value(&workshop).unwrap();
        assert_eq!(json["time"], "14:05");
    }
}
