use calamine::{Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use stockroom_core::db::open_db_in_memory;
use stockroom_core::transfer::{to_csv_bytes, to_xlsx_bytes, EXPORT_SHEET_NAME};
use stockroom_core::{ImportError, InventoryItem, InventoryService, SqliteItemRepository};

#[test]
fn import_counts_new_items_and_skips_duplicate_names() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let input = "Name,Quantity,Price\nA,5,1.0\nB,3,2.0\nA,1,1.0\n";
    let summary = service.import_csv(input.as_bytes()).unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.added, 2);
    assert_eq!(summary.duplicates, vec!["A".to_string()]);

    let items = service.list_items().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].name.as_str(), items[0].quantity), ("A", 5));
    assert_eq!((items[1].name.as_str(), items[1].quantity), ("B", 3));
}

#[test]
fn import_skips_names_already_in_store() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));
    service.add_item("Bolt", 1, 1.0).unwrap();

    let summary = service
        .import_csv("Name,Quantity,Price\nBolt,9,9.0\nNut,2,0.5\n".as_bytes())
        .unwrap();
    assert_eq!(summary.added, 1);
    assert_eq!(service.find_by_name("Bolt").unwrap().unwrap().quantity, 1);
}

#[test]
fn import_with_missing_columns_inserts_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let err = service
        .import_csv("Name,Qty,Price\nA,5,1.0\n".as_bytes())
        .unwrap_err();
    match err {
        ImportError::MissingColumns(missing) => assert_eq!(missing, vec!["Quantity"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list_items().unwrap().is_empty());
}

#[test]
fn import_with_non_numeric_value_inserts_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let err = service
        .import_csv("Name,Quantity,Price\nA,5,1.0\nB,3,cheap\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, ImportError::InvalidRow { line: 3, .. }));
    assert!(err.to_string().contains("Price"));
    assert!(service.list_items().unwrap().is_empty());
}

#[test]
fn export_writes_header_and_full_listing_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));
    service.add_item("Bolt", 10, 2.5).unwrap();
    service.add_item("Nut", 3, 0.1).unwrap();

    let mut buffer = Vec::new();
    let written = service.export_csv(&mut buffer).unwrap();
    assert_eq!(written, 2);

    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text, "id,name,quantity,price\n1,Bolt,10,2.5\n2,Nut,3,0.1\n");
}

#[test]
fn exported_csv_parses_back_into_same_items() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));
    service.add_item("Gear", 7, 4.0).unwrap();
    service.add_item("Nails, 2in", 0, 0.05).unwrap();

    let items = service.list_items().unwrap();
    let bytes = to_csv_bytes(&items).unwrap();
    let parsed = csv::Reader::from_reader(bytes.as_slice())
        .deserialize::<InventoryItem>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(parsed, items);
}

#[test]
fn items_serialize_to_flat_json_objects() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));
    service.add_item("Gear", 7, 4.0).unwrap();

    let items = service.list_items().unwrap();
    let json = serde_json::to_value(&items[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": 1, "name": "Gear", "quantity": 7, "price": 4.0})
    );
}

fn sample_workbook(rows: &[(&str, f64, f64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in ["Name", "Quantity", "Price"].iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (index, (name, quantity, price)) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, *name).unwrap();
        sheet.write_number(row, 1, *quantity).unwrap();
        sheet.write_number(row, 2, *price).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

#[test]
fn xlsx_import_counts_new_items_and_skips_duplicate_names() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let bytes = sample_workbook(&[("A", 5.0, 1.0), ("B", 3.0, 2.0), ("A", 1.0, 1.0)]);
    let summary = service.import_xlsx(Cursor::new(bytes)).unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.added, 2);
    assert_eq!(summary.duplicates, vec!["A".to_string()]);

    let items = service.list_items().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!((items[0].name.as_str(), items[0].quantity, items[0].price), ("A", 5, 1.0));
    assert_eq!((items[1].name.as_str(), items[1].quantity, items[1].price), ("B", 3, 2.0));
}

#[test]
fn xlsx_import_with_missing_columns_inserts_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Name").unwrap();
    sheet.write_string(0, 1, "Price").unwrap();
    sheet.write_string(1, 0, "A").unwrap();
    sheet.write_number(1, 1, 1.0).unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let err = service.import_xlsx(Cursor::new(bytes)).unwrap_err();
    match err {
        ImportError::MissingColumns(missing) => assert_eq!(missing, vec!["Quantity"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list_items().unwrap().is_empty());
}

#[test]
fn xlsx_import_with_fractional_quantity_inserts_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let bytes = sample_workbook(&[("A", 5.0, 1.0), ("B", 2.5, 1.0)]);
    let err = service.import_xlsx(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, ImportError::InvalidRow { line: 3, .. }));
    assert!(service.list_items().unwrap().is_empty());
}

#[test]
fn non_workbook_bytes_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let err = service
        .import_xlsx(Cursor::new(b"Name,Quantity,Price\n".to_vec()))
        .unwrap_err();
    assert!(matches!(err, ImportError::Spreadsheet(_)));
}

#[test]
fn xlsx_export_reads_back_with_header_and_rows_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));
    service.add_item("Bolt", 10, 2.5).unwrap();
    service.add_item("Nut", 3, 0.1).unwrap();

    let mut buffer = Vec::new();
    assert_eq!(service.export_xlsx(&mut buffer).unwrap(), 2);

    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(buffer)).unwrap();
    assert_eq!(workbook.sheet_names(), vec![EXPORT_SHEET_NAME.to_string()]);
    let range = workbook.worksheet_range(EXPORT_SHEET_NAME).unwrap();
    let rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![
            vec!["id", "name", "quantity", "price"],
            vec!["1", "Bolt", "10", "2.5"],
            vec!["2", "Nut", "3", "0.1"],
        ]
    );
}

#[test]
fn exported_workbook_headers_do_not_satisfy_import_columns() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteItemRepository::new(&conn));
    service.add_item("Gear", 7, 4.0).unwrap();
    let bytes = to_xlsx_bytes(&service.list_items().unwrap()).unwrap();

    match service.import_xlsx(Cursor::new(bytes)).unwrap_err() {
        ImportError::MissingColumns(missing) => {
            assert_eq!(missing, vec!["Name", "Quantity", "Price"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.list_items().unwrap().len(), 1);
}
