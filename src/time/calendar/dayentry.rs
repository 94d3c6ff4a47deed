use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::time::calendar::registryerror::RegistryError;

/// Which of the three registry mappings an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DayKind {
    /// 法定節假日
    Holiday,
    /// 調休上班日
    Workday,
    /// 補休日
    InLieuDay
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKind::Holiday => write!(f, "holiday"),
            DayKind::Workday => write!(f, "makeup workday"),
            DayKind::InLieuDay => write!(f, "in-lieu day")
        }
    }
}

/// Metadata attached to one date of the irregular calendar.
///
/// `day_type` is an opaque code from the dataset; nothing in this crate
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    pub date: NaiveDate,
    pub kind: DayKind,
    pub name: String,
    pub chinese_name: String,
    #[serde(rename = "type")]
    pub day_type: i32
}

impl DayEntry {
    /// Parses the dataset's `"name,chineseName,type"` triple stored under
    /// the `YYYY-MM-DD` key `date_key`.
    pub fn parse(kind: DayKind, date_key: &str, raw: &str) -> Result<DayEntry, RegistryError> {
        let malformed = || RegistryError::MalformedEntry {
            date: date_key.to_owned(),
            raw: raw.to_owned()
        };
        let date = NaiveDate::parse_from_str(date_key, "%Y-%m-%d").map_err(|_| malformed())?;

        let mut parts = raw.splitn(3, ',');
        let name = parts.next().map(str::trim).unwrap_or_default();
        let chinese_name = parts.next().map(str::trim).ok_or_else(malformed)?;
        let day_type = parts
            .next()
            .and_then(|t| t.trim().parse::<i32>().ok())
            .ok_or_else(malformed)?;

        Ok(DayEntry {
            date,
            kind,
            name: name.to_owned(),
            chinese_name: chinese_name.to_owned(),
            day_type
        })
    }
}
