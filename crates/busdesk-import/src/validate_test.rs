use super::*;

const HEADER: &str = "plateNumber,busType,capacity,seatLayout,baseStationId,amenities";

fn csv(lines: &[&str]) -> Vec<u8> {
    let mut out = String::from(HEADER);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out.push('\n');
    out.into_bytes()
}

#[test]
fn valid_csv_is_accepted() {
    let bytes = csv(&[
        "LT-123-AB,VIP,70,2-2,st-1,\"wifi, AC\"",
        "CE-456-CD,Classic,30,2-1,st-2,toilet;usb",
    ]);
    let result = validate_file_structure("fleet.csv", &bytes);
    assert!(result.is_valid, "{:?}", result.error);
    assert!(result.error.is_none());
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].capacity, 70);
    assert_eq!(result.rows[0].amenities, vec!["wifi", "AC"]);
    assert_eq!(result.rows[1].amenities, vec!["toilet", "usb"]);
    assert_eq!(result.rows[1].row, 3);
}

#[test]
fn missing_capacity_column_is_named() {
    let bytes = b"plateNumber,busType,seatLayout,baseStationId,amenities\nLT-1,VIP,2-2,st-1,wifi\n";
    let result = validate_file_structure("fleet.csv", bytes);
    assert!(!result.is_valid);
    let message = result.error.unwrap();
    assert!(message.contains("capacity"), "{message}");
    assert!(!message.contains("plateNumber"), "{message}");
    assert!(result.rows.is_empty());
}

#[test]
fn non_numeric_capacity_names_row_two() {
    let bytes = csv(&["LT-1,VIP,abc,2-2,st-1,wifi", "LT-2,VIP,x,2-2,st-1,wifi"]);
    let result = validate_file_structure("fleet.csv", &bytes);
    assert!(!result.is_valid);
    let message = result.error.unwrap();
    assert!(message.starts_with("Row 2:"), "{message}");
    assert!(message.contains("capacity"), "{message}");
}

#[test]
fn first_offending_row_only_is_reported() {
    let bytes = csv(&["LT-1,VIP,70,2-2,st-1,wifi", "LT-2,,70,2-2,st-1,wifi", "LT-3,VIP,0,2-2,st-1,wifi"]);
    let err = parse_bus_file("fleet.csv", &bytes).unwrap_err();
    assert_eq!(err.to_string(), "Row 3: missing value for busType");
}

#[test]
fn headers_match_case_insensitively_in_any_order() {
    let bytes = b"AMENITIES , CAPACITY,platenumber,BusType,seatlayout,BASESTATIONID\nwifi,45,LT-9,VIP,2-2,st-4\n";
    let rows = parse_bus_file("FLEET.CSV", bytes).unwrap();
    assert_eq!(rows[0].plate_number, "LT-9");
    assert_eq!(rows[0].capacity, 45);
    assert_eq!(rows[0].base_station_id, "st-4");
}

#[test]
fn blank_rows_are_skipped_but_numbering_is_kept() {
    let bytes = csv(&["LT-1,VIP,70,2-2,st-1,wifi", ",,,,,", "LT-2,VIP,seventy,2-2,st-1,wifi"]);
    let err = parse_bus_file("fleet.csv", &bytes).unwrap_err();
    assert!(err.to_string().starts_with("Row 4:"), "{err}");
}

#[test]
fn header_only_file_has_no_rows() {
    let err = parse_bus_file("fleet.csv", &csv(&[])).unwrap_err();
    assert!(matches!(err, ImportError::NoRows));
}

#[test]
fn unsupported_extension_is_rejected_before_parsing() {
    let result = validate_file_structure("fleet.txt", &csv(&["LT-1,VIP,70,2-2,st-1,wifi"]));
    assert!(!result.is_valid);
    assert!(result.error.unwrap().contains(".xlsx"));
}

#[test]
fn pending_file_delegates_to_name_and_bytes() {
    let file = PendingFile::new("fleet.csv", csv(&["LT-1,VIP,70,2-2,st-1,wifi"]));
    assert!(validate_pending_file(&file).is_valid);
}

#[test]
fn capacity_accepts_spreadsheet_floats() {
    assert_eq!(parse_capacity("70"), Some(70));
    assert_eq!(parse_capacity("70.0"), Some(70));
    assert_eq!(parse_capacity("70.5"), None);
    assert_eq!(parse_capacity("0"), None);
    assert_eq!(parse_capacity("-3"), None);
    assert_eq!(parse_capacity("abc"), None);
}

#[test]
fn rows_serialize_for_upload_preview() {
    let rows = parse_bus_file("fleet.csv", &csv(&["LT-1,VIP,70,2-2,st-1,wifi"])).unwrap();
    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(json["plateNumber"], "LT-1");
    assert_eq!(json["amenities"], serde_json::json!(["wifi"]));
    assert!(json.get("row").is_none());
}
