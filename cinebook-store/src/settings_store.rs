use crate::flat_file::{read_optional, write_atomic};
use crate::records::SettingsRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use cinebook_core::{
    BaseRates, CoreError, CoreResult, SettingsRepository, Surcharges, SystemSettings,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Settings kept as a pretty-printed JSON document
pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsRepository for FileSettingsRepository {
    async fn load(&self) -> CoreResult<Option<SystemSettings>> {
        let Some(contents) = read_optional(&self.path).await? else {
            return Ok(None);
        };

        let record: SettingsRecord = serde_json::from_str(&contents).map_err(|e| {
            CoreError::StorageError(format!("Invalid settings file {}: {}", self.path.display(), e))
        })?;
        SystemSettings::try_from(record).map(Some)
    }

    async fn save(&self, settings: &SystemSettings) -> CoreResult<()> {
        let json = serde_json::to_vec_pretty(&SettingsRecord::from(settings))
            .map_err(CoreError::storage)?;
        write_atomic(&self.path, &json).await
    }
}

/// Owner of the process-wide pricing settings.
///
/// Every setter writes through to the repository before the new snapshot
/// becomes visible, so `get()` never returns a value that was not persisted.
pub struct SettingsStore {
    repo: Arc<dyn SettingsRepository>,
    current: RwLock<SystemSettings>,
    writer: tokio::sync::Mutex<()>,
}

impl SettingsStore {
    /// Load saved settings, or persist and use the defaults on first start
    pub async fn open(repo: Arc<dyn SettingsRepository>) -> CoreResult<Self> {
        let settings = match repo.load().await? {
            Some(settings) => settings,
            None => {
                let defaults = SystemSettings::default();
                repo.save(&defaults).await?;
                info!("No saved settings found, initialised defaults");
                defaults
            }
        };

        Ok(Self {
            repo,
            current: RwLock::new(settings),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    /// Latest committed snapshot
    pub fn get(&self) -> SystemSettings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn set_base_rates(&self, rates: BaseRates) -> CoreResult<()> {
        rates.validate()?;
        self.update(|settings| settings.base_rates = rates).await?;
        info!(adult = %rates.adult, child = %rates.child, senior = %rates.senior, "Base rates updated");
        Ok(())
    }

    pub async fn set_surcharges(&self, surcharges: Surcharges) -> CoreResult<()> {
        surcharges.validate()?;
        self.update(|settings| settings.surcharges = surcharges).await?;
        info!(
            premium_cinema = %surcharges.premium_cinema,
            blockbuster = %surcharges.blockbuster,
            weekend = %surcharges.weekend,
            "Surcharges updated"
        );
        Ok(())
    }

    /// Add a holiday given as `YYYY-MM-DD`
    pub async fn add_holiday(&self, raw: &str) -> CoreResult<NaiveDate> {
        let date = SystemSettings::parse_holiday(raw)?;
        self.add_holiday_date(date).await?;
        Ok(date)
    }

    pub async fn add_holiday_date(&self, date: NaiveDate) -> CoreResult<()> {
        if self.get().is_holiday(date) {
            return Ok(());
        }
        self.update(|settings| settings.holidays.insert(date)).await?;
        info!(%date, "Public holiday added");
        Ok(())
    }

    /// Returns whether the date was listed
    pub async fn remove_holiday(&self, raw: &str) -> CoreResult<bool> {
        let date = SystemSettings::parse_holiday(raw)?;
        if !self.get().is_holiday(date) {
            return Ok(false);
        }
        self.update(|settings| settings.holidays.remove(&date)).await?;
        info!(%date, "Public holiday removed");
        Ok(true)
    }

    async fn update<R>(&self, apply: impl FnOnce(&mut SystemSettings) -> R) -> CoreResult<R> {
        let _guard = self.writer.lock().await;

        let mut next = self.get();
        let result = apply(&mut next);
        self.repo.save(&next).await?;

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Repository whose saves can be made to fail
    #[derive(Default)]
    struct FlakyRepository {
        fail: AtomicBool,
        saved: std::sync::Mutex<Option<SystemSettings>>,
    }

    #[async_trait]
    impl SettingsRepository for FlakyRepository {
        async fn load(&self) -> CoreResult<Option<SystemSettings>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save(&self, settings: &SystemSettings) -> CoreResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CoreError::StorageError("disk unavailable".into()));
            }
            *self.saved.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_first_open_persists_defaults() {
        let repo = Arc::new(FlakyRepository::default());
        let store = SettingsStore::open(repo.clone()).await.unwrap();

        assert_eq!(store.get(), SystemSettings::default());
        assert_eq!(repo.load().await.unwrap(), Some(SystemSettings::default()));
    }

    #[tokio::test]
    async fn test_setters_read_your_writes() {
        let repo = Arc::new(FlakyRepository::default());
        let store = SettingsStore::open(repo.clone()).await.unwrap();

        let rates = BaseRates {
            adult: dec!(12.50),
            child: dec!(8.00),
            senior: dec!(5.00),
        };
        store.set_base_rates(rates).await.unwrap();
        assert_eq!(store.get().base_rates, rates);
        assert_eq!(repo.load().await.unwrap().unwrap().base_rates, rates);

        let date = store.add_holiday("2024-08-09").await.unwrap();
        assert!(store.get().is_holiday(date));
        assert!(store.remove_holiday("2024-08-09").await.unwrap());
        assert!(!store.remove_holiday("2024-08-09").await.unwrap());
        assert!(store.get().holidays.is_empty());
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_previous_snapshot() {
        let repo = Arc::new(FlakyRepository::default());
        let store = SettingsStore::open(repo.clone()).await.unwrap();
        let before = store.get();

        repo.fail.store(true, Ordering::SeqCst);
        let surcharges = Surcharges {
            premium_cinema: dec!(0.50),
            blockbuster: dec!(0.50),
            weekend: dec!(0.50),
        };
        assert!(store.set_surcharges(surcharges).await.is_err());
        assert!(store.add_holiday("2024-12-25").await.is_err());

        assert_eq!(store.get(), before);
    }

    #[tokio::test]
    async fn test_invalid_holiday_leaves_set_unchanged() {
        let store = SettingsStore::open(Arc::new(FlakyRepository::default()))
            .await
            .unwrap();
        store.add_holiday("2024-01-01").await.unwrap();

        let err = store.add_holiday("01/02/2024").await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate(_)));
        assert!(matches!(
            store.remove_holiday("tomorrow").await,
            Err(CoreError::InvalidDate(_))
        ));
        assert_eq!(store.get().holidays.len(), 1);
    }

    #[tokio::test]
    async fn test_negative_rate_rejected_before_persist() {
        let store = SettingsStore::open(Arc::new(FlakyRepository::default()))
            .await
            .unwrap();
        let mut rates = store.get().base_rates;
        rates.adult = dec!(-0.01);

        assert!(matches!(
            store.set_base_rates(rates).await,
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(store.get().base_rates.adult, dec!(10.00));
    }

    #[tokio::test]
    async fn test_oversized_rate_rejected_before_persist() {
        let repo = Arc::new(FlakyRepository::default());
        let store = SettingsStore::open(repo.clone()).await.unwrap();
        let mut rates = store.get().base_rates;
        rates.adult = rust_decimal::Decimal::MAX;

        assert!(matches!(
            store.set_base_rates(rates).await,
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(store.get().base_rates.adult, dec!(10.00));
        assert_eq!(repo.load().await.unwrap().unwrap().base_rates.adult, dec!(10.00));
    }

    #[tokio::test]
    async fn test_file_repository_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::open(Arc::new(FileSettingsRepository::new(&path)))
            .await
            .unwrap();
        store.add_holiday("2024-12-25").await.unwrap();
        store
            .set_surcharges(Surcharges {
                premium_cinema: dec!(0.25),
                blockbuster: dec!(0.15),
                weekend: dec!(0.05),
            })
            .await
            .unwrap();

        let reopened = SettingsStore::open(Arc::new(FileSettingsRepository::new(&path)))
            .await
            .unwrap();
        assert_eq!(reopened.get(), store.get());
    }

    #[tokio::test]
    async fn test_corrupt_settings_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let repo = FileSettingsRepository::new(&path);
        assert!(matches!(repo.load().await, Err(CoreError::StorageError(_))));
    }
}
