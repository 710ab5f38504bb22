use aispiration_core::db::open_db_in_memory;
use aispiration_core::{
    initialize_default_data, CategoryRepository, QuoteRepository, SettingsRepository,
    SqliteCategoryRepository, SqliteQuoteRepository, SqliteSettingsRepository, UserSettings,
};

#[test]
fn first_run_inserts_defaults() {
    let mut conn = open_db_in_memory().unwrap();

    let report = initialize_default_data(&mut conn).unwrap();
    assert_eq!(report.categories_inserted, 5);
    assert_eq!(report.quotes_inserted, 5);
    assert!(report.settings_created);

    let names: Vec<String> = SqliteCategoryRepository::new(&conn)
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["激励", "成功", "生活", "智慧", "行动"]);

    let settings = SqliteSettingsRepository::new(&conn)
        .load_settings()
        .unwrap()
        .unwrap();
    assert_eq!(settings, UserSettings::default());
}

#[test]
fn second_run_is_a_noop() {
    let mut conn = open_db_in_memory().unwrap();

    initialize_default_data(&mut conn).unwrap();
    let report = initialize_default_data(&mut conn).unwrap();

    assert!(report.is_noop());
    assert_eq!(SqliteCategoryRepository::new(&conn).count_categories().unwrap(), 5);
    assert_eq!(SqliteQuoteRepository::new(&conn).count_quotes().unwrap(), 5);
}

#[test]
fn sample_quotes_link_to_matching_categories_only() {
    let mut conn = open_db_in_memory().unwrap();
    initialize_default_data(&mut conn).unwrap();

    let categories = SqliteCategoryRepository::new(&conn);
    let quotes = SqliteQuoteRepository::new(&conn)
        .list_quotes(&Default::default())
        .unwrap();

    for quote in quotes {
        let expected = categories
            .find_category_by_name(&quote.category_name)
            .unwrap()
            .map(|category| category.id);
        assert_eq!(quote.category_id, expected, "quote in {}", quote.category_name);
    }
}

#[test]
fn existing_user_data_is_not_topped_up() {
    let mut conn = open_db_in_memory().unwrap();
    SqliteCategoryRepository::new(&conn)
        .create_category(&aispiration_core::Category::named("自定义"))
        .unwrap();

    let report = initialize_default_data(&mut conn).unwrap();
    assert_eq!(report.categories_inserted, 0);
    assert_eq!(report.quotes_inserted, 5);
    assert_eq!(SqliteCategoryRepository::new(&conn).count_categories().unwrap(), 1);
}
