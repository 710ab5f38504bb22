use aispiration_core::db::open_db_in_memory;
use aispiration_core::{
    Category, CategoryRepository, CategoryService, QuoteRepository, QuoteService, RepoError,
    SqliteCategoryRepository, SqliteQuoteRepository,
};

#[test]
fn add_find_and_update_category() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));

    let created = service.add_category(" 感恩 ", "hands.sparkles", "teal").unwrap();
    assert_eq!(created.name, "感恩");

    let found = service.find_by_name("感恩").unwrap().unwrap();
    assert_eq!(found, created);

    let mut renamed = found;
    renamed.name = "感谢".to_string();
    renamed.color = "mint".to_string();
    service.update_category(&renamed).unwrap();

    let loaded = service.get_category(created.id).unwrap().unwrap();
    assert_eq!(loaded.name, "感谢");
    assert_eq!(loaded.color, "mint");
    assert!(service.find_by_name("感恩").unwrap().is_none());
}

#[test]
fn blank_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::new(&conn));

    let err = service.add_category("  ", "star", "blue").unwrap_err();
    assert!(matches!(err, RepoError::InvalidCategory(_)));
}

#[test]
fn list_follows_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::new(&conn);
    for (offset, name) in ["b", "a", "c"].into_iter().enumerate() {
        let mut category = Category::named(name);
        category.created_at = 100 + offset as i64;
        repo.create_category(&category).unwrap();
    }

    let service = CategoryService::new(repo);
    assert_eq!(service.category_names().unwrap(), vec!["b", "a", "c"]);
}

#[test]
fn deleting_category_keeps_quote_labels() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let quotes = QuoteService::new(SqliteQuoteRepository::new(&conn));

    let category = categories.add_category("旅行", "airplane", "blue").unwrap();
    let quote = quotes.add_quote("世界那么大", None, "旅行", false).unwrap();
    quotes
        .update_quote_category(quote.id, "旅行", Some(category.id))
        .unwrap();

    categories.delete_category(category.id).unwrap();
    assert!(categories.get_category(category.id).unwrap().is_none());

    let orphan = SqliteQuoteRepository::new(&conn)
        .get_quote(quote.id)
        .unwrap()
        .unwrap();
    assert_eq!(orphan.category_name, "旅行");
    assert_eq!(orphan.category_id, Some(category.id));

    let err = categories.delete_category(category.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "category", .. }));
}
