use std::collections::BTreeMap;

use abook::db::schema;
use abook::model::*;
use abook::ops::{contact_ops, transfer_ops};
use abook::queries::contact_queries;
use abook::sheet::SheetConfig;

fn setup() -> (rusqlite::Connection, SheetConfig) {
    (schema::test_connection(), SheetConfig::default())
}

fn sheet_text(bytes: &[u8]) -> &str {
    assert_eq!(&bytes[..3], b"\xef\xbb\xbf", "sheet must start with a BOM");
    std::str::from_utf8(&bytes[3..]).unwrap()
}

fn method_multiset(contact: &Contact) -> BTreeMap<(String, String), usize> {
    let mut set = BTreeMap::new();
    for m in &contact.methods {
        *set.entry((m.kind.as_str().to_string(), m.value.clone())).or_insert(0) += 1;
    }
    set
}

// ==========================================================================
// EXPORT TESTS
// ==========================================================================

#[test]
fn export_names_a_csv_file() {
    let (conn, config) = setup();
    let sheet = transfer_ops::export_contacts(&conn, &config).unwrap();
    assert!(sheet.filename.starts_with("通讯录_"));
    assert!(sheet.filename.ends_with(".csv"));
    assert_eq!(sheet.mime, "text/csv");
}

#[test]
fn export_empty_store_yields_header_only_sheet() {
    let (conn, config) = setup();
    let sheet = transfer_ops::export_contacts(&conn, &config).unwrap();

    let text = sheet_text(&sheet.bytes);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], "地址,备注,姓名,是否收藏,电话,社交媒体,邮箱");
}

#[test]
fn export_header_is_sorted_canonical_columns() {
    let (conn, config) = setup();
    contact_ops::create_contact(&conn, &ContactDraft::new("张三".to_string())).unwrap();

    let sheet = transfer_ops::export_contacts(&conn, &config).unwrap();
    let text = sheet_text(&sheet.bytes);
    assert_eq!(
        text.lines().next().unwrap(),
        "地址,备注,姓名,是否收藏,电话,社交媒体,邮箱"
    );
}

#[test]
fn export_joins_multiple_methods_of_one_kind() {
    let (conn, config) = setup();
    let mut draft = ContactDraft::new("张三".to_string());
    draft
        .methods
        .push(MethodDraft::new(MethodKind::Phone, "13800138000".into()));
    draft
        .methods
        .push(MethodDraft::new(MethodKind::Phone, "13900139000".into()));
    contact_ops::create_contact(&conn, &draft).unwrap();

    let sheet = transfer_ops::export_contacts(&conn, &config).unwrap();
    let text = sheet_text(&sheet.bytes);
    assert!(text.contains("13800138000; 13900139000"));
}

// ==========================================================================
// IMPORT TESTS
// ==========================================================================

#[test]
fn import_rejects_disallowed_extension() {
    let (conn, config) = setup();
    let result = transfer_ops::import_contacts(&conn, &config, b"whatever", "contacts.txt");
    assert!(matches!(
        result,
        Err(abook::error::AbookError::UnsupportedFormat { .. })
    ));
    assert_eq!(contact_queries::all_contacts(&conn).unwrap().len(), 0);
}

#[test]
fn import_extension_check_is_case_sensitive() {
    let (conn, config) = setup();
    let result = transfer_ops::import_contacts(&conn, &config, b"", "contacts.CSV");
    assert!(result.is_err());
}

#[test]
fn import_header_only_file_attempts_nothing() {
    let (conn, config) = setup();
    let report = transfer_ops::import_contacts(
        &conn,
        &config,
        "姓名,电话\n".as_bytes(),
        "contacts.csv",
    )
    .unwrap();
    assert_eq!(report.rows, 0);
    assert_eq!(report.attempted, 0);
    assert_eq!(report.imported, 0);
}

#[test]
fn import_splits_multi_value_phone_cell() {
    let (conn, config) = setup();
    let body = "\u{feff}姓名,电话\n张三,13800138000; 13900139000\n";
    let report =
        transfer_ops::import_contacts(&conn, &config, body.as_bytes(), "contacts.csv").unwrap();
    assert_eq!(report.imported, 1);

    let contacts = contact_queries::all_contacts(&conn).unwrap();
    assert_eq!(contacts.len(), 1);
    let phones: Vec<&str> = contacts[0]
        .methods
        .iter()
        .filter(|m| m.kind == MethodKind::Phone)
        .map(|m| m.value.as_str())
        .collect();
    assert_eq!(phones, vec!["13800138000", "13900139000"]);
}

#[test]
fn import_unrecognized_header_still_yields_contact() {
    let (conn, config) = setup();
    let body = "Unknown\nAlice\n";
    let report =
        transfer_ops::import_contacts(&conn, &config, body.as_bytes(), "contacts.csv").unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(contact_queries::all_contacts(&conn).unwrap()[0].name, "Alice");
}

#[test]
fn import_silently_skips_empty_rows() {
    let (conn, config) = setup();
    let body = "姓名,电话\n,\n张三,123\n,\n";
    let report =
        transfer_ops::import_contacts(&conn, &config, body.as_bytes(), "contacts.csv").unwrap();
    assert_eq!(report.rows, 3);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped(), 2);
    assert!(report.errors.is_empty());
}

#[test]
fn import_parses_favorite_tokens() {
    let (conn, config) = setup();
    let body = "姓名,是否收藏\nA,是\nB,YES\nC,maybe\nD,\n";
    transfer_ops::import_contacts(&conn, &config, body.as_bytes(), "contacts.csv").unwrap();

    let contacts = contact_queries::all_contacts(&conn).unwrap();
    let favorite: BTreeMap<&str, bool> = contacts
        .iter()
        .map(|c| (c.name.as_str(), c.is_favorite))
        .collect();
    assert_eq!(favorite["A"], true);
    assert_eq!(favorite["B"], true);
    assert_eq!(favorite["C"], false);
    assert_eq!(favorite["D"], false);
}

#[test]
fn import_accepts_spreadsheet_extensions_for_csv_bytes() {
    let (conn, config) = setup();
    let body = "姓名\n张三\n";
    let report =
        transfer_ops::import_contacts(&conn, &config, body.as_bytes(), "contacts.xlsx").unwrap();
    assert_eq!(report.imported, 1);
}

#[test]
fn import_collects_per_record_failures_and_continues() {
    let (conn, config) = setup();
    // Simulate a store-level failure for one specific record.
    conn.execute_batch(
        "CREATE TRIGGER reject_wang BEFORE INSERT ON contacts
         WHEN NEW.name = '王五'
         BEGIN SELECT RAISE(ABORT, 'simulated persistence failure'); END;",
    )
    .unwrap();

    let body = "姓名\n甲\n乙\n王五\n丙\n丁\n";
    let report =
        transfer_ops::import_contacts(&conn, &config, body.as_bytes(), "contacts.csv").unwrap();

    assert_eq!(report.rows, 5);
    assert_eq!(report.attempted, 5);
    assert_eq!(report.imported, 4);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].name, "王五");
    // Header is line 1, so the third data row is line 4.
    assert_eq!(report.errors[0].row, 4);
    assert!(report.errors[0].error.contains("simulated persistence failure"));

    let names: Vec<String> = contact_queries::all_contacts(&conn)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names.len(), 4);
    assert!(!names.contains(&"王五".to_string()));
}

#[test]
fn import_error_rows_stay_exact_after_skips() {
    let (conn, config) = setup();
    conn.execute_batch(
        "CREATE TRIGGER reject_wang BEFORE INSERT ON contacts
         WHEN NEW.name = '王五'
         BEGIN SELECT RAISE(ABORT, 'boom'); END;",
    )
    .unwrap();

    // Line 2 has no usable name and is skipped; 王五 sits on line 4.
    let body = "姓名,备注\n,\n李四,\n王五,\n";
    let report =
        transfer_ops::import_contacts(&conn, &config, body.as_bytes(), "contacts.csv").unwrap();

    assert_eq!(report.skipped(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 4);
}

// ==========================================================================
// ROUND-TRIP TESTS
// ==========================================================================

#[test]
fn export_then_import_reconstructs_contacts() {
    let (source, config) = setup();

    let mut zhang = ContactDraft::new("张三".to_string());
    zhang.notes = Some("同事".to_string());
    zhang.is_favorite = true;
    zhang
        .methods
        .push(MethodDraft::new(MethodKind::Phone, "13800138000".into()));
    zhang
        .methods
        .push(MethodDraft::new(MethodKind::Phone, "13900139000".into()));
    zhang
        .methods
        .push(MethodDraft::new(MethodKind::Email, "zhangsan@example.com".into()));
    contact_ops::create_contact(&source, &zhang).unwrap();

    let mut li = ContactDraft::new("李四".to_string());
    li.methods
        .push(MethodDraft::new(MethodKind::Address, "上海市浦东新区".into()));
    contact_ops::create_contact(&source, &li).unwrap();

    let sheet = transfer_ops::export_contacts(&source, &config).unwrap();

    let target = schema::test_connection();
    let report =
        transfer_ops::import_contacts(&target, &config, &sheet.bytes, &sheet.filename).unwrap();
    assert_eq!(report.imported, 2);
    assert!(report.errors.is_empty());

    let originals = contact_queries::all_contacts(&source).unwrap();
    let imported = contact_queries::all_contacts(&target).unwrap();
    assert_eq!(imported.len(), originals.len());

    for original in &originals {
        let copy = imported
            .iter()
            .find(|c| c.name == original.name)
            .unwrap_or_else(|| panic!("{} missing after round trip", original.name));
        assert_eq!(copy.notes, original.notes);
        assert_eq!(copy.is_favorite, original.is_favorite);
        assert_eq!(method_multiset(copy), method_multiset(original));
    }
}

// ==========================================================================
// TEMPLATE TESTS
// ==========================================================================

#[test]
fn template_imports_as_two_contacts() {
    let (conn, config) = setup();
    let sheet = transfer_ops::export_template(&config).unwrap();
    assert_eq!(sheet.filename, "通讯录模板.csv");

    let report =
        transfer_ops::import_contacts(&conn, &config, &sheet.bytes, &sheet.filename).unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.imported, 2);

    let contacts = contact_queries::all_contacts(&conn).unwrap();
    let zhang = contacts.iter().find(|c| c.name == "张三").unwrap();
    assert!(zhang.is_favorite);
    assert_eq!(zhang.notes, Some("同事".to_string()));
    assert_eq!(zhang.method_values(MethodKind::Phone).len(), 2);

    let li = contacts.iter().find(|c| c.name == "李四").unwrap();
    assert!(!li.is_favorite);
    assert_eq!(li.method_values(MethodKind::Social).len(), 0);
    assert_eq!(li.method_values(MethodKind::Phone), vec!["13600136000"]);
}
