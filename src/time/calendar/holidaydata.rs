use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{
    Serialize,
    Deserialize
};

use crate::time::calendar::registryerror::RegistryError;

/// Wire and on-disk shape of the irregular calendar dataset: three maps from
/// `YYYY-MM-DD` to `"name,chineseName,type"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayData {
    pub holidays: BTreeMap<String, String>,
    pub workdays: BTreeMap<String, String>,
    #[serde(rename = "inLieuDays")]
    pub in_lieu_days: BTreeMap<String, String>
}

impl HolidayData {
    pub fn from_slice(bytes: &[u8]) -> Result<HolidayData, RegistryError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads the cache file. `Ok(None)` when it does not exist yet.
    pub fn load(path: &Path) -> Result<Option<HolidayData>, RegistryError> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source
        })?;
        Ok(Some(HolidayData::from_slice(&bytes)?))
    }

    /// Writes the cache file pretty-printed, through a sibling temp file and
    /// a rename so readers never see a half-written dataset.
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(self)?;
        let io_error = |source| RegistryError::Io {
            path: path.to_path_buf(),
            source
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(io_error)?;
        fs::rename(&tmp_path, path).map_err(io_error)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.holidays.len() + self.workdays.len() + self.in_lieu_days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn reads_dataset_shape() {
        let raw = r#"{
            "holidays": {"2025-10-01": "National Day,国庆节,3"},
            "workdays": {"2025-09-28": "National Day,国庆节,3"},
            "inLieuDays": {"2025-10-08": "National Day,国庆节,3"}
        }"#;
        let data = HolidayData::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.in_lieu_days["2025-10-08"], "National Day,国庆节,3");
    }

    #[test]
    fn missing_section_is_malformed() {
        let raw = br#"{"holidays": {}, "workdays": {}}"#;
        assert!(matches!(HolidayData::from_slice(raw), Err(RegistryError::Json(_))));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = env::temp_dir().join(format!("timeworkday_holidaydata_{}", std::process::id()));
        let path = dir.join("nested").join("chinese-days.json");
        assert_eq!(HolidayData::load(&path).unwrap(), None);

        let mut data = HolidayData::default();
        data.holidays.insert("2025-01-01".to_owned(), "New Year's Day,元旦,1".to_owned());
        data.save(&path).unwrap();

        assert_eq!(HolidayData::load(&path).unwrap(), Some(data));
        let _ = fs::remove_dir_all(&dir);
    }
}
