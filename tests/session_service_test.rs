//! Tests for SessionService

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use bpcalc::application::services::SessionService;
use bpcalc::application::{ApplicationError, DocumentFormat};
use bpcalc::domain::{Budget, Catalog, DomainError, Item};
use bpcalc::infrastructure::traits::RealFileSystem;
use bpcalc::util::testing::{init_test_setup, write_pack_file};

fn session() -> SessionService {
    init_test_setup();
    SessionService::new(Arc::new(RealFileSystem), Budget::default())
}

#[test]
fn given_current_layout_file_when_opening_then_budget_and_items_loaded() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_pack_file(
        temp.path(),
        "trip.bpc",
        r#"{"max_weight": 15, "max_volume": 55.5,
            "items": {"Термос": {"вес": 1000, "объем": 1.0}}}"#,
    );
    let mut session = session();

    // Act
    let format = session.open(&path).unwrap();

    // Assert
    assert_eq!(format, DocumentFormat::Current);
    assert_eq!(session.tracker().budget(), Budget::new(15, 55.5).unwrap());
    assert_eq!(session.tracker().get("Термос"), Some(&Item::new(1000, 1.0)));
    assert_eq!(session.current_file(), Some(path.as_path()));
    assert_eq!(session.title(), "Backpack calculator - trip.bpc");
}

#[test]
fn given_legacy_file_when_opening_then_fallback_budget_used() {
    let temp = TempDir::new().unwrap();
    let path = write_pack_file(
        temp.path(),
        "old.bpc",
        r#"{"Компас": {"вес": 100, "объем": 0.1}, "Нож": {"вес": 150, "объем": 0.2}}"#,
    );
    let mut session = SessionService::new(Arc::new(RealFileSystem), Budget::new(8, 30.0).unwrap());

    let format = session.open(&path).unwrap();

    assert_eq!(format, DocumentFormat::Legacy);
    assert_eq!(session.tracker().budget(), Budget::new(8, 30.0).unwrap());
    assert_eq!(session.aggregate().total_weight, 250);
}

#[test]
fn given_malformed_file_when_opening_then_state_unchanged() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let good = write_pack_file(
        temp.path(),
        "good.bpc",
        r#"{"max_weight": 10, "max_volume": 30, "items": {"Баф": {"вес": 50, "объем": 0.2}}}"#,
    );
    let bad = write_pack_file(temp.path(), "bad.bpc", "{ not json");
    let mut session = session();
    session.open(&good).unwrap();
    let before = session.document();

    // Act
    let err = session.open(&bad).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::InvalidDocument { .. }));
    assert_eq!(session.document(), before);
    assert_eq!(session.current_file(), Some(good.as_path()));
}

#[test]
fn given_missing_file_when_opening_then_io_error_and_unbound() {
    let temp = TempDir::new().unwrap();
    let mut session = session();

    let err = session.open(&temp.path().join("nope.bpc")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(session.current_file().is_none());
}

#[test]
fn given_unbound_session_when_saving_then_no_current_file() {
    let mut session = session();

    assert!(matches!(
        session.save(),
        Err(ApplicationError::NoCurrentFile)
    ));
}

#[test]
fn given_pack_when_saving_as_then_extension_appended_and_reloads_identically() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut session = session();
    session.add_item("Спальник", 1800, 8.0).unwrap();
    session.add_item("Палатка", 2500, 15.0).unwrap();
    session.set_budget(14, 50.0).unwrap();

    // Act
    let saved = session.save_as(&temp.path().join("trip")).unwrap();

    // Assert
    assert_eq!(saved, temp.path().join("trip.bpc"));
    assert_eq!(session.current_file(), Some(saved.as_path()));

    let mut reloaded = SessionService::new(Arc::new(RealFileSystem), Budget::default());
    reloaded.open(&saved).unwrap();
    assert_eq!(reloaded.document(), session.document());
}

#[test]
fn given_saved_file_when_reading_then_pretty_printed_with_cyrillic_keys() {
    let temp = TempDir::new().unwrap();
    let mut session = session();
    session.add_item("Термос", 1000, 1.0).unwrap();

    let saved = session.save_as(&temp.path().join("t.bpc")).unwrap();
    let content = fs::read_to_string(saved).unwrap();

    assert!(content.contains("\n    \"max_weight\": 12"));
    assert!(content.contains("\"Термос\""));
    assert!(content.contains("\"вес\": 1000"));
    assert!(content.contains("\"объем\": 1.0"));
}

#[test]
fn given_bound_session_when_saving_then_overwrites_bound_file() {
    let temp = TempDir::new().unwrap();
    let mut session = session();
    let path = session.save_as(&temp.path().join("a.bpc")).unwrap();

    session.add_item("Шапка", 80, 0.3).unwrap();
    let saved = session.save().unwrap();

    assert_eq!(saved, path);
    assert!(fs::read_to_string(&path).unwrap().contains("Шапка"));
}

#[test]
fn given_builtin_catalog_when_adding_preset_twice_then_second_is_skipped() {
    // Arrange
    let catalog = Catalog::builtin().unwrap();
    let mut session = session();

    // Act
    let first = session
        .add_preset(&catalog, "электроника", "Телефон")
        .unwrap();
    let second = session
        .add_preset(&catalog, "Электроника", "Телефон")
        .unwrap();

    // Assert
    assert!(first);
    assert!(!second);
    assert_eq!(session.aggregate().count, 1);
}

#[test]
fn given_unknown_category_when_adding_preset_then_error() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = session();

    let err = session.add_preset(&catalog, "Еда", "Хлеб").unwrap_err();

    assert!(matches!(err, ApplicationError::UnknownCategory(ref c) if c == "Еда"));
}

#[test]
fn given_unknown_preset_when_adding_then_error() {
    let catalog = Catalog::builtin().unwrap();
    let mut session = session();

    let err = session
        .add_preset(&catalog, "Одежда", "Смокинг")
        .unwrap_err();

    assert!(matches!(err, ApplicationError::UnknownPreset { .. }));
}

#[test]
fn given_domain_failure_when_editing_then_wrapped() {
    let mut session = session();
    session.add_item("a", 1, 0.1).unwrap();
    session.add_item("b", 1, 0.1).unwrap();

    let err = session.edit_item("a", "b", 1, 0.1).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateName(ref n)) if n == "b"
    ));
}
