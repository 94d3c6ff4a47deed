use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf
};
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
    RwLock,
    RwLockReadGuard
};
use std::time::Duration;

use chrono::{
    DateTime,
    Datelike,
    Days,
    Local,
    NaiveDate,
    TimeZone,
    Utc,
    Weekday
};
use log::{
    debug,
    info,
    warn
};
use tokio::task::JoinHandle;

use crate::time::calendar::dayentry::{
    DayEntry,
    DayKind
};
use crate::time::calendar::holidaydata::HolidayData;
use crate::time::calendar::holidayfetcher::HolidayFetcher;
use crate::time::calendar::registryerror::RegistryError;

pub const DEFAULT_CACHE_FILE: &str = "chinese-days.json";
const SYNC_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Default)]
struct RegistryState {
    holidays: HashMap<NaiveDate, DayEntry>,
    workdays: HashMap<NaiveDate, DayEntry>,
    in_lieu_days: HashMap<NaiveDate, DayEntry>,
    last_sync: Option<DateTime<Utc>>
}

impl RegistryState {
    fn from_data(data: &HolidayData) -> RegistryState {
        RegistryState {
            holidays: parse_section(DayKind::Holiday, &data.holidays),
            workdays: parse_section(DayKind::Workday, &data.workdays),
            in_lieu_days: parse_section(DayKind::InLieuDay, &data.in_lieu_days),
            last_sync: Some(Utc::now())
        }
    }

    fn len(&self) -> usize {
        self.holidays.len() + self.workdays.len() + self.in_lieu_days.len()
    }
}

fn parse_section<'a>(
    kind: DayKind,
    section: impl IntoIterator<Item = (&'a String, &'a String)>
) -> HashMap<NaiveDate, DayEntry> {
    let mut entries = HashMap::new();
    for (date_key, raw) in section {
        match DayEntry::parse(kind, date_key, raw) {
            Ok(entry) => {
                entries.insert(entry.date, entry);
            }
            Err(e) => warn!("skipping {kind} entry: {e}")
        }
    }
    entries
}

/// Shared cache of the irregular regional calendar: statutory holidays,
/// weekend makeup workdays and in-lieu rest days.
///
/// 建構時為空，第一次 `initialize()` 才載入快取檔或下載資料；
/// 之後只有 `refresh()` 會重新下載。
#[derive(Debug)]
pub struct HolidayRegistry {
    state: RwLock<RegistryState>,
    initialized: tokio::sync::Mutex<bool>,
    sync_task: Mutex<Option<JoinHandle<()>>>,
    cache_path: PathBuf,
    fetcher: Option<HolidayFetcher>,
    daily_sync: bool
}

impl HolidayRegistry {
    /// `fetcher == None` keeps the registry offline: it can still load the
    /// cache file but every download reports [`RegistryError::NoSource`].
    pub fn new(cache_path: impl Into<PathBuf>, fetcher: Option<HolidayFetcher>, daily_sync: bool) -> HolidayRegistry {
        HolidayRegistry {
            state: RwLock::new(RegistryState::default()),
            initialized: tokio::sync::Mutex::new(false),
            sync_task: Mutex::new(None),
            cache_path: cache_path.into(),
            fetcher,
            daily_sync
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace_state(&self, state: RegistryState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Replaces the whole content with `data` and stamps the sync time.
    /// Returns how many entries survived parsing.
    pub fn load_data(&self, data: &HolidayData) -> usize {
        let state = RegistryState::from_data(data);
        let loaded = state.len();
        self.replace_state(state);
        loaded
    }

    // ── lifecycle ───────────────────────────────────────────────────────────

    /// Loads the cache file, or downloads the dataset when there is no usable
    /// cache. Runs once: concurrent callers wait on the first load and later
    /// calls return immediately, even if that load came up empty.
    pub async fn initialize(self: &Arc<Self>) {
        let mut initialized = self.initialized.lock().await;
        if *initialized {
            return;
        }
        *initialized = true;

        match HolidayData::load(&self.cache_path) {
            Ok(Some(data)) => {
                let loaded = self.load_data(&data);
                info!("loaded {loaded} calendar entries from {}", self.cache_path.display());
            }
            Ok(None) => {
                debug!("no holiday cache at {}", self.cache_path.display());
                if let Err(e) = self.download_and_store().await {
                    warn!("holiday data unavailable, using standard weekends only: {e}");
                }
            }
            Err(e) => {
                warn!("ignoring unusable holiday cache: {e}");
                if let Err(e) = self.download_and_store().await {
                    warn!("holiday data unavailable, using standard weekends only: {e}");
                }
            }
        }
        drop(initialized);
        self.on_initialized();
    }

    /// Re-downloads the dataset. On failure the previous content is kept and
    /// `false` is returned. A successful refresh before the first
    /// `initialize()` counts as the initial load.
    pub async fn refresh(self: &Arc<Self>) -> bool {
        match self.download_and_store().await {
            Ok(()) => {
                let first_load = {
                    let mut initialized = self.initialized.lock().await;
                    !std::mem::replace(&mut *initialized, true)
                };
                if first_load {
                    self.on_initialized();
                }
                true
            }
            Err(e) => {
                warn!("holiday refresh failed, keeping previous data: {e}");
                false
            }
        }
    }

    // runs once, right after the initialized flag is first set
    fn on_initialized(self: &Arc<Self>) {
        if self.daily_sync {
            self.start_daily_sync();
        }
    }

    async fn download_and_store(&self) -> Result<(), RegistryError> {
        let fetcher = self.fetcher.as_ref().ok_or(RegistryError::NoSource)?;
        info!("downloading holiday data from {}", fetcher.url());
        let data = fetcher.fetch().await?;
        let loaded = self.load_data(&data);
        info!("loaded {loaded} calendar entries from network");

        // 寫檔失敗不影響記憶體內的資料
        match data.save(&self.cache_path) {
            Ok(()) => info!("saved holiday cache to {}", self.cache_path.display()),
            Err(e) => warn!("cannot save holiday cache: {e}")
        }
        Ok(())
    }

    /// Schedules a refresh at the next local midnight and every 24 hours after
    /// that. Does nothing when a schedule is already running.
    pub fn start_daily_sync(self: &Arc<Self>) {
        let mut task = self.sync_task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let first_delay = duration_until_next_midnight(&Local::now());
        info!("daily holiday sync scheduled in {} minutes", first_delay.as_secs() / 60);

        // Weak: the timer must not keep the registry alive.
        let registry = Arc::downgrade(self);
        *task = Some(tokio::spawn(async move {
            tokio::time::sleep(first_delay).await;
            loop {
                let Some(registry) = registry.upgrade() else {
                    break;
                };
                if registry.refresh().await {
                    info!("daily holiday sync done");
                }
                drop(registry);
                tokio::time::sleep(SYNC_INTERVAL).await;
            }
        }));
    }

    /// Cancels the daily sync task, if any.
    pub fn stop(&self) {
        let handle = self
            .sync_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("daily holiday sync stopped");
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.sync_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // ── queries ─────────────────────────────────────────────────────────────

    pub fn is_holiday(&self, d: NaiveDate) -> bool {
        self.read_state().holidays.contains_key(&d)
    }

    /// Whether `d` is a makeup workday.
    pub fn is_workday(&self, d: NaiveDate) -> bool {
        self.read_state().workdays.contains_key(&d)
    }

    pub fn is_in_lieu_day(&self, d: NaiveDate) -> bool {
        self.read_state().in_lieu_days.contains_key(&d)
    }

    pub fn holiday_info(&self, d: NaiveDate) -> Option<DayEntry> {
        self.read_state().holidays.get(&d).cloned()
    }

    pub fn workday_info(&self, d: NaiveDate) -> Option<DayEntry> {
        self.read_state().workdays.get(&d).cloned()
    }

    pub fn in_lieu_day_info(&self, d: NaiveDate) -> Option<DayEntry> {
        self.read_state().in_lieu_days.get(&d).cloned()
    }

    /// Makeup workday, then in-lieu day, then holiday, then Saturday/Sunday.
    pub fn is_standard_workday_under_regional_calendar(&self, d: NaiveDate) -> bool {
        let state = self.read_state();
        if state.workdays.contains_key(&d) {
            return true;
        }
        if state.in_lieu_days.contains_key(&d) || state.holidays.contains_key(&d) {
            return false;
        }
        !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        self.read_state().last_sync
    }

    pub fn len(&self) -> usize {
        self.read_state().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for HolidayRegistry {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Time left until 00:00 of the following day in `now`'s timezone.
pub fn duration_until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let timezone = now.timezone();
    now.date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|midnight| timezone.from_local_datetime(&midnight).earliest())
        .and_then(|midnight| midnight.signed_duration_since(now).to_std().ok())
        .unwrap_or(SYNC_INTERVAL)
}
