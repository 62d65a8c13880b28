use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use upsell_core::domain::protection::ProtectionPackage;
use upsell_core::domain::vehicle::VehicleRecord;
use upsell_core::offer::catalog::Catalog;

use crate::error::CatalogError;

pub const VEHICLES_FILE: &str = "simplified_vehicles.json";
pub const PROTECTIONS_FILE: &str = "simplified_protections.json";

/// Last good catalog on disk, as two pretty-printed JSON arrays.
#[derive(Clone, Debug)]
pub struct CatalogCache {
    dir: PathBuf,
}

impl CatalogCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vehicles_path(&self) -> PathBuf {
        self.dir.join(VEHICLES_FILE)
    }

    pub fn protections_path(&self) -> PathBuf {
        self.dir.join(PROTECTIONS_FILE)
    }

    pub fn is_present(&self) -> bool {
        self.vehicles_path().is_file() && self.protections_path().is_file()
    }

    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let vehicles: Vec<VehicleRecord> = read_json(&self.vehicles_path())?;
        let protections: Vec<ProtectionPackage> = read_json(&self.protections_path())?;
        Ok(Catalog::new(vehicles, protections))
    }

    pub fn store(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| CatalogError::Io { path: self.dir.clone(), source })?;

        // Both files are staged before either is replaced, so a failed write
        // leaves the previous pair intact.
        let vehicles = stage_json(&self.vehicles_path(), catalog.vehicles())?;
        let protections = match stage_json(&self.protections_path(), catalog.protections()) {
            Ok(staged) => staged,
            Err(error) => {
                discard(&vehicles);
                return Err(error);
            }
        };

        let moves = [(&vehicles, self.vehicles_path()), (&protections, self.protections_path())];
        for (staged, target) in moves {
            fs::rename(staged, &target).map_err(|source| {
                discard(&vehicles);
                discard(&protections);
                CatalogError::Io { path: target.clone(), source }
            })?;
        }

        info!(
            event_name = "catalog.cache_written",
            cache_dir = %self.dir.display(),
            vehicle_count = catalog.vehicles().len(),
            protection_count = catalog.protections().len(),
            "catalog cache written"
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| CatalogError::Parse { path: path.to_path_buf(), source })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Writes `value` next to `path` and returns the staged file.
fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf, CatalogError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|source| CatalogError::Encode { path: path.to_path_buf(), source })?;
    let staged = staging_path(path);
    fs::write(&staged, body).map_err(|source| CatalogError::Io { path: staged.clone(), source })?;
    Ok(staged)
}

fn discard(staged: &Path) {
    if staged.is_file() {
        let _ = fs::remove_file(staged);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;
    use upsell_core::domain::protection::ProtectionPackage;
    use upsell_core::domain::vehicle::{VehicleCategory, VehicleId, VehicleRecord};
    use upsell_core::offer::catalog::Catalog;

    use super::{staging_path, CatalogCache};
    use crate::error::CatalogError;

    fn catalog() -> Catalog {
        let vehicle = |id: &str, category, price| VehicleRecord {
            id: VehicleId(id.to_string()),
            name: id.to_uppercase(),
            category,
            passenger_capacity: 5,
            transmission: "manual".to_string(),
            total_price: Decimal::new(price, 0),
            extra_cost: Decimal::ZERO,
            is_new: false,
            image_ref: None,
        };

        Catalog::new(
            vec![
                vehicle("c", VehicleCategory::Upsell, 90),
                vehicle("a", VehicleCategory::Comparable, 40),
                vehicle("b", VehicleCategory::Comparable, 40),
            ],
            vec![ProtectionPackage {
                name: "Basic".to_string(),
                summary: "Third party liability.".to_string(),
                cost: Decimal::new(450, 2),
            }],
        )
    }

    #[test]
    fn stored_catalog_loads_back_in_the_same_order() {
        let dir = TempDir::new().expect("tempdir");
        let cache = CatalogCache::new(dir.path().join("nested"));

        assert!(!cache.is_present());
        cache.store(&catalog()).expect("store");
        assert!(cache.is_present());

        assert_eq!(cache.load().expect("load"), catalog());
    }

    #[test]
    fn failed_store_keeps_the_previous_pair() {
        let dir = TempDir::new().expect("tempdir");
        let cache = CatalogCache::new(dir.path());
        cache.store(&catalog()).expect("first store");

        // A directory in the staging slot makes the protections write fail.
        fs::create_dir(staging_path(&cache.protections_path())).expect("block staging");
        let replacement = Catalog::new(catalog().vehicles()[..1].to_vec(), Vec::new());

        assert!(matches!(cache.store(&replacement), Err(CatalogError::Io { .. })));
        assert_eq!(cache.load().expect("load"), catalog());
        assert!(!staging_path(&cache.vehicles_path()).exists());
    }

    #[test]
    fn store_leaves_no_staging_files_behind() {
        let dir = TempDir::new().expect("tempdir");
        let cache = CatalogCache::new(dir.path());

        cache.store(&catalog()).expect("store");

        let names = fs::read_dir(dir.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names.len(), 2, "unexpected files: {names:?}");
    }

    #[test]
    fn files_written_by_the_legacy_fetcher_are_readable() {
        let dir = TempDir::new().expect("tempdir");
        let cache = CatalogCache::new(dir.path());
        fs::write(
            cache.vehicles_path(),
            r#"[{
                "id": "vw-golf", "vehicle_name": "VW Golf", "category": "same",
                "extra_cost": 0, "total_price": 52.5, "passengers": 5,
                "transmission": "Manual", "is_new": false, "image": "https://img.example/golf.png"
            }]"#,
        )
        .expect("write vehicles");
        fs::write(
            cache.protections_path(),
            r#"[{ "name": "Basic", "summary": "Liability.", "cost": 4 }]"#,
        )
        .expect("write protections");

        let loaded = cache.load().expect("load");

        assert_eq!(loaded.vehicles()[0].name, "VW Golf");
        assert_eq!(loaded.vehicles()[0].passenger_capacity, 5);
        assert_eq!(loaded.vehicles()[0].image_ref.as_deref(), Some("https://img.example/golf.png"));
        assert_eq!(loaded.protections()[0].cost, Decimal::new(4, 0));
    }

    #[test]
    fn missing_cache_reports_the_path() {
        let dir = TempDir::new().expect("tempdir");
        let cache = CatalogCache::new(dir.path());

        match cache.load() {
            Err(CatalogError::Io { path, .. }) => assert_eq!(path, cache.vehicles_path()),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_cache_reports_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let cache = CatalogCache::new(dir.path());
        fs::write(cache.vehicles_path(), "not json").expect("write");
        fs::write(cache.protections_path(), "[]").expect("write");

        assert!(matches!(cache.load(), Err(CatalogError::Parse { .. })));
    }
}
