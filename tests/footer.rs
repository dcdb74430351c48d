use std::fs;
use std::io::Write;

use stuffbin::{FooterCodec, StuffError, FOOTER_LEN};
use tempfile::tempdir;

#[test]
fn test_short_or_untagged_files_have_no_identifier() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let codec = FooterCodec::default();

    for len in 0..30usize {
        let path = dir.path().join(format!("len_{len}.bin"));
        // The tag in the last 8 bytes is in the wrong place: only the
        // first 8 bytes of the trailing 24 are the footer tag.
        let mut data = vec![0xABu8; len];
        if len >= 8 {
            data[len - 8..].copy_from_slice(b"stuffbin");
        }
        fs::write(&path, &data)?;

        match codec.decode(&path) {
            Err(StuffError::NoIdentifier) => {}
            other => panic!("len {len}: expected NoIdentifier, got {:?}", other),
        }
    }
    Ok(())
}

#[test]
fn test_decode_written_footer() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("stuffed.bin");
    let codec = FooterCodec::default();

    // [100 bytes binary][10 bytes "archive"][footer]
    let mut file = fs::File::create(&path)?;
    file.write_all(&[0u8; 100])?;
    file.write_all(&[1u8; 10])?;
    file.write_all(&codec.encode(&codec.identifier(100, 10)))?;
    drop(file);

    let id = codec.decode(&path)?;
    assert_eq!(id.name(), "stuffbin");
    assert_eq!(id.bin_size, 100);
    assert_eq!(id.zip_size, 10);
    assert_eq!(id.total_size(), Some(fs::metadata(&path)?.len()));
    assert_eq!(FOOTER_LEN, 24);
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = FooterCodec::default().decode(dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, StuffError::Io { .. }), "{:?}", err);
}

#[test]
fn test_custom_tag_is_only_seen_by_its_codec() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("custom.bin");
    let custom = FooterCodec::with_tag("myassets")?;
    fs::write(&path, custom.encode(&custom.identifier(0, 0)))?;

    assert_eq!(custom.decode(&path)?.name(), "myassets");
    assert!(FooterCodec::default().decode(&path).unwrap_err().is_no_identifier());
    Ok(())
}
