use super::*;
use serde_json::json;

// =========================================================================
// Magic and Format Tests
// =========================================================================

#[test]
fn test_writer_creates_valid_apr() {
    let bytes = AprWriter::new().to_bytes().unwrap();
    assert_eq!(&bytes[0..4], b"APR1");
    assert!(AprReader::is_apr(&bytes));
}

#[test]
fn test_empty_container() {
    let bytes = AprWriter::new().to_bytes().unwrap();
    let reader = AprReader::from_bytes(bytes).unwrap();
    assert!(reader.tensors.is_empty());
    // Empty map still serializes as "{}".
    assert!(reader.metadata.is_empty());
}

#[test]
fn test_invalid_magic() {
    let mut bytes = AprWriter::new().to_bytes().unwrap();
    bytes[0] = b'X';
    let err = AprReader::from_bytes(bytes).unwrap_err();
    assert!(err.contains("Invalid magic"));
}

#[test]
fn test_too_short() {
    assert!(AprReader::from_bytes(b"APR".to_vec()).is_err());
    assert!(AprReader::from_bytes(Vec::new()).is_err());
}

// =========================================================================
// Metadata Tests
// =========================================================================

#[test]
fn test_metadata_values() {
    let mut writer = AprWriter::new();
    writer.set_metadata("model_type", json!("random_forest_regressor"));
    writer.set_metadata("n_estimators", json!(100));
    writer.set_metadata("feature_names_in", json!(["age", "bmi"]));

    let reader = AprReader::from_bytes(writer.to_bytes().unwrap()).unwrap();

    assert_eq!(
        reader.get_metadata("model_type"),
        Some(&json!("random_forest_regressor"))
    );
    assert_eq!(reader.get_metadata("n_estimators"), Some(&json!(100)));
    let names = reader.get_metadata("feature_names_in").unwrap();
    assert_eq!(names.as_array().unwrap().len(), 2);
    assert!(reader.get_metadata("missing").is_none());
}

// =========================================================================
// Tensor Tests
// =========================================================================

#[test]
fn test_tensors_read_back() {
    let mut writer = AprWriter::new();
    writer.add_tensor_f32("a", vec![3], &[1.0, -2.5, 3.25]);
    writer.add_tensor_f32("b", vec![2, 1], &[4500.125, 0.0]);

    let reader = AprReader::from_bytes(writer.to_bytes().unwrap()).unwrap();

    assert_eq!(reader.tensor_names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(reader.read_tensor_f32("a").unwrap(), vec![1.0, -2.5, 3.25]);
    assert_eq!(reader.read_tensor_f32("b").unwrap(), vec![4500.125, 0.0]);
    assert_eq!(reader.tensors[1].shape, vec![2, 1]);
}

#[test]
fn test_missing_tensor() {
    let reader = AprReader::from_bytes(AprWriter::new().to_bytes().unwrap()).unwrap();
    let err = reader.read_tensor_f32("nope").unwrap_err();
    assert!(err.contains("Tensor not found"));
}

// =========================================================================
// Integrity Tests
// =========================================================================

#[test]
fn test_checksum_detects_flipped_byte() {
    let mut writer = AprWriter::new();
    writer.add_tensor_f32("w", vec![2], &[1.0, 2.0]);
    let mut bytes = writer.to_bytes().unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;

    let err = AprReader::from_bytes(bytes).unwrap_err();
    assert!(err.contains("Checksum mismatch"));
}

#[test]
fn test_truncated_file_is_error() {
    let mut writer = AprWriter::new();
    writer.set_metadata("k", json!("v"));
    writer.add_tensor_f32("w", vec![4], &[1.0, 2.0, 3.0, 4.0]);
    let bytes = writer.to_bytes().unwrap();

    for cut in [5, 9, 20, bytes.len() - 5] {
        let truncated = bytes[..cut].to_vec();
        assert!(AprReader::from_bytes(truncated).is_err(), "cut at {cut}");
    }
}

#[test]
fn test_oversized_length_field_is_error() {
    // Valid checksum over a body whose metadata length points past the end.
    let mut body = APR_MAGIC.to_vec();
    body.extend_from_slice(&u32::MAX.to_le_bytes());
    let crc = crc32fast::hash(&body);
    body.extend_from_slice(&crc.to_le_bytes());

    let err = AprReader::from_bytes(body).unwrap_err();
    assert!(err.contains("too short"));
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.apr");

    let mut writer = AprWriter::new();
    writer.set_metadata("model_type", json!("random_forest_regressor"));
    writer.add_tensor_f32("tree.0.values", vec![1], &[42.0]);
    writer.write(&path).unwrap();

    let reader = AprReader::open(&path).unwrap();
    assert_eq!(reader.read_tensor_f32("tree.0.values").unwrap(), vec![42.0]);
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = AprReader::open(dir.path().join("absent.apr")).unwrap_err();
    assert!(err.contains("Failed to read file"));
}
