mod common;

use common::{script_context, temp_root};
use home_ledger::{
    config::{Language, Settings, SettingsManager, SETTINGS_NAMESPACE},
    currency::Currency,
    init,
    storage::JsonStorage,
};

#[test]
fn shell_context_smoke() {
    init();

    let (mut context, root) = script_context();
    context.execute("add 42 Salary 1/1/2025 smoke").unwrap();
    context.execute("ledger expense").unwrap();
    context.execute("add 12 Rent 2/1/2025").unwrap();

    assert_eq!(context.data_dir(), root);
    assert!(root.join("IncomePrefs.json").exists());
    assert!(root.join("ExpensePrefs.json").exists());
    assert_eq!(context.money(42.0), "42.00 UAH");
}

#[test]
fn settings_round_trip_through_disk() {
    let root = temp_root();
    let storage = JsonStorage::new(Some(root)).unwrap();
    let manager = SettingsManager::new(storage.open(SETTINGS_NAMESPACE).unwrap());
    assert_eq!(manager.load().unwrap(), Settings::default());

    let wanted = Settings {
        language: Language::En,
        currency: Currency::Usd,
    };
    manager.save(&wanted).unwrap();

    let reopened = SettingsManager::new(storage.open(SETTINGS_NAMESPACE).unwrap());
    assert_eq!(reopened.load().unwrap(), wanted);
}
