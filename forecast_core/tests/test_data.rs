use forecast_core::data::{FileSeriesStore, SeriesName, SeriesStore};
use forecast_core::{ForecastError, StoreConfig};
use ndarray::Array1;
use ndarray_npy::write_npy;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn write_all_npy(dir: &TempDir, values: &[f64]) {
    let config = StoreConfig::default();
    for name in SeriesName::ALL {
        let path = dir.path().join(name.file_name(&config));
        write_npy(&path, &Array1::from(values.to_vec())).unwrap();
    }
}

#[test]
fn test_loads_float_npy_arrays() {
    let dir = TempDir::new().unwrap();
    write_all_npy(&dir, &[1.5, 2.5, -3.0]);

    let store = FileSeriesStore::from_dir(dir.path());
    for name in SeriesName::ALL {
        let series = store.load(name).unwrap();
        assert_eq!(series.values(), &[1.5, 2.5, -3.0]);
    }
}

#[test]
fn test_loads_integer_npy_arrays() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rates.npy");
    write_npy(&path, &Array1::from(vec![82_i64, 83, 85])).unwrap();

    let config = StoreConfig {
        exogenous_raw: "rates.npy".to_string(),
        ..StoreConfig::with_data_dir(dir.path())
    };
    let series = FileSeriesStore::new(config).load(SeriesName::ExogenousRaw).unwrap();
    assert_eq!(series.values(), &[82.0, 83.0, 85.0]);
}

#[test]
fn test_loads_text_series() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("end.csv"), "price\n70.1\n70.4\n71.0\n").unwrap();

    let config = StoreConfig {
        endogenous_raw: "end.csv".to_string(),
        ..StoreConfig::with_data_dir(dir.path())
    };
    let store = FileSeriesStore::new(config);
    assert_eq!(store.path_of(SeriesName::EndogenousRaw), dir.path().join("end.csv"));
    let series = store.load(SeriesName::EndogenousRaw).unwrap();
    assert_eq!(series.values(), &[70.1, 70.4, 71.0]);
}

#[test]
fn test_repeated_loads_are_identical() {
    let dir = TempDir::new().unwrap();
    write_all_npy(&dir, &[4.0, 5.0, 6.0, 7.0]);

    let store = FileSeriesStore::from_dir(dir.path());
    let first = store.load(SeriesName::EndogenousSeasonal).unwrap();
    let second = store.load(SeriesName::EndogenousSeasonal).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_file_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let store = FileSeriesStore::from_dir(dir.path());

    match store.load(SeriesName::ExogenousSeasonal) {
        Err(ForecastError::DataUnavailable { name, reason }) => {
            assert_eq!(name, "exogenous_seasonal_diff");
            assert!(reason.contains("exg_seasonal_diff.npy"));
        }
        other => panic!("expected DataUnavailable, got {:?}", other),
    }
}

#[test]
fn test_unparseable_content_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::default();
    for name in SeriesName::ALL {
        fs::write(dir.path().join(name.file_name(&config)), b"not an array").unwrap();
    }
    fs::write(dir.path().join("end.txt"), "1.0\nabc\n").unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();

    let store = FileSeriesStore::from_dir(dir.path());
    assert!(matches!(
        store.load(SeriesName::EndogenousRaw),
        Err(ForecastError::DataUnavailable { .. })
    ));

    for file in ["end.txt", "empty.txt"] {
        let config = StoreConfig {
            endogenous_raw: file.to_string(),
            ..StoreConfig::with_data_dir(dir.path())
        };
        let result = FileSeriesStore::new(config).load(SeriesName::EndogenousRaw);
        assert!(
            matches!(result, Err(ForecastError::DataUnavailable { .. })),
            "{} should be rejected",
            file
        );
    }
}
