mod common;

use std::fs;

use common::{fake_exe, mock_tree, sorted, spec, MOCK_EXE_SIZE};
use stuffbin::{archive, FileSystem, FooterCodec, StuffError, Stuffer, Unstuffer, FOOTER_LEN};
use tempfile::tempdir;

#[test]
fn test_stuff_mock_binary() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let out = dir.path().join("mock.exe.stuffed");

    let files = [
        spec(&mock.join("bar.txt"), "/mock/bar.txt"),
        spec(&mock.join("foo.txt"), "/mock/foo.txt"),
    ];
    let (exe_size, zip_size) = Stuffer::default().stuff(mock.join("mock.exe"), &out, "/", &files)?;
    assert_eq!(exe_size, MOCK_EXE_SIZE as u64);

    let id = FooterCodec::default().decode(&out)?;
    assert_eq!(&id.tag, b"stuffbin");
    assert_eq!(id.bin_size, 512);
    assert_eq!(id.zip_size, zip_size);
    assert_eq!(fs::metadata(&out)?.len(), 512 + zip_size + FOOTER_LEN);

    let vfs = Unstuffer::default().unstuff(&out)?;
    assert_eq!(vfs.list(), vec!["/mock/bar.txt", "/mock/foo.txt"]);
    Ok(())
}

#[test]
fn test_binary_portion_is_preserved() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let exe = fs::read(mock.join("mock.exe"))?;
    let out = dir.path().join("out.bin");

    Stuffer::default().stuff(mock.join("mock.exe"), &out, "/", [spec(&mock, "/")])?;

    let stuffed = fs::read(&out)?;
    assert_eq!(&stuffed[..exe.len()], &exe[..]);
    Ok(())
}

#[test]
fn test_round_trip_content() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let out = dir.path().join("out.bin");

    Stuffer::default().stuff(mock.join("mock.exe"), &out, "/", [spec(&mock, "/assets")])?;
    let vfs = Unstuffer::default().unstuff(&out)?;

    let expected = [
        ("/assets/bar.txt", fs::read(mock.join("bar.txt"))?),
        ("/assets/foo.txt", fs::read(mock.join("foo.txt"))?),
        ("/assets/foofunc.txt", fs::read(mock.join("foofunc.txt"))?),
        ("/assets/mock.exe", fs::read(mock.join("mock.exe"))?),
        ("/assets/mock.go", fs::read(mock.join("mock.go"))?),
        ("/assets/subdir/baz.txt", fs::read(mock.join("subdir/baz.txt"))?),
    ];
    assert_eq!(vfs.len(), expected.len());
    for (path, content) in &expected {
        assert_eq!(&vfs.read(path)?, content, "content mismatch for {path}");
    }
    let total: u64 = expected.iter().map(|(_, c)| c.len() as u64).sum();
    assert_eq!(vfs.size(), total);
    Ok(())
}

#[test]
fn test_restuff_replaces_previous_stuff() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");
    let stuffer = Stuffer::default();

    stuffer.stuff(mock.join("mock.exe"), &first, "/", [spec(&mock, "/")])?;
    let (orig, zip_size) = stuffer.stuff(&first, &second, "/", [spec(&mock.join("bar.txt"), "/only.txt")])?;

    assert_eq!(orig, MOCK_EXE_SIZE as u64);
    let id = FooterCodec::default().decode(&second)?;
    assert_eq!(id.bin_size, MOCK_EXE_SIZE as u64);
    assert_eq!(fs::metadata(&second)?.len(), orig + zip_size + FOOTER_LEN);

    let vfs = Unstuffer::default().unstuff(&second)?;
    assert_eq!(vfs.list(), vec!["/only.txt"]);
    assert_eq!(vfs.read("/only.txt")?, b"bar");
    Ok(())
}

#[test]
fn test_stuff_over_longer_existing_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let out = dir.path().join("out.bin");
    fs::write(&out, vec![0x5Au8; 64 * 1024])?;

    let (orig, zip_size) = Stuffer::default().stuff(mock.join("mock.exe"), &out, "/", [spec(&mock.join("bar.txt"), "/bar.txt")])?;

    assert_eq!(fs::metadata(&out)?.len(), orig + zip_size + FOOTER_LEN);
    let id = FooterCodec::default().decode(&out)?;
    assert_eq!((id.bin_size, id.zip_size), (orig, zip_size));
    assert_eq!(Unstuffer::default().unstuff(&out)?.read("/bar.txt")?, b"bar");
    Ok(())
}

#[test]
fn test_stuff_custom_root() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let out = dir.path().join("out.bin");

    // Directory aliases are mounted under the root, file aliases are not.
    Stuffer::default().stuff(
        mock.join("mock.exe"),
        &out,
        "/root/",
        [spec(&mock.join("subdir"), "/mock"), spec(&mock.join("bar.txt"), "/bar.txt")],
    )?;

    let vfs = Unstuffer::default().unstuff(&out)?;
    assert_eq!(sorted(vfs.list()), vec!["/bar.txt", "/root/mock/baz.txt"]);
    Ok(())
}

#[test]
fn test_zip_files_with_alias() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());

    let b = archive::zip_files(
        "/",
        [
            spec(&mock.join("foo.txt"), "/test/foo.txt"),
            spec(&mock.join("foo.txt"), "/mock/foo.txt"),
            spec(&mock.join("bar.txt"), "/mock/bar.txt"),
        ],
    )?;
    let vfs = archive::unzip(&b)?;
    assert_eq!(vfs.list(), vec!["/mock/bar.txt", "/mock/foo.txt", "/test/foo.txt"]);
    assert_eq!(vfs.read("/test/foo.txt")?, b"foo\n");
    Ok(())
}

#[test]
fn test_duplicate_virtual_path_is_rejected() {
    let dir = tempdir().unwrap();
    let mock = mock_tree(dir.path());

    let err = archive::zip_files(
        "/",
        [spec(&mock.join("foo.txt"), "/x.txt"), spec(&mock.join("bar.txt"), "/x.txt")],
    )
    .unwrap_err();
    assert!(matches!(err, StuffError::AlreadyExists(ref p) if p == "/x.txt"), "{:?}", err);
}

#[test]
fn test_missing_asset_aborts() {
    let dir = tempdir().unwrap();
    let exe = dir.path().join("app");
    fake_exe(&exe, 64);
    let out = dir.path().join("app.stuffed");

    let err = Stuffer::default()
        .stuff(&exe, &out, "/", [dir.path().join("missing.txt").display().to_string()])
        .unwrap_err();
    assert!(matches!(err, StuffError::Io { .. }), "{:?}", err);
}

#[test]
fn test_invalid_alias_format() {
    let err = archive::zip_files("/", ["a:b:c"]).unwrap_err();
    assert!(matches!(err, StuffError::InvalidSpec(ref s) if s == "a:b:c"));
}

#[test]
fn test_stuff_onto_itself_is_rejected() {
    let dir = tempdir().unwrap();
    let mock = mock_tree(dir.path());
    let exe = mock.join("mock.exe");
    let before = fs::read(&exe).unwrap();

    let err = Stuffer::default().stuff(&exe, &exe, "/", [spec(&mock.join("bar.txt"), "/bar.txt")]).unwrap_err();
    assert!(matches!(err, StuffError::SamePath(_)), "{:?}", err);
    assert_eq!(fs::read(&exe).unwrap(), before);
}

#[test]
fn test_strip_restores_original() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let stuffed = dir.path().join("stuffed.bin");
    let stripped = dir.path().join("stripped.bin");
    let stuffer = Stuffer::default();

    stuffer.stuff(mock.join("mock.exe"), &stuffed, "/", [spec(&mock, "/")])?;
    let id = stuffer.strip(&stuffed, &stripped)?;

    assert_eq!(id.bin_size, MOCK_EXE_SIZE as u64);
    assert_eq!(fs::read(&stripped)?, fs::read(mock.join("mock.exe"))?);
    assert!(Unstuffer::default().unstuff(&stripped).unwrap_err().is_no_identifier());
    Ok(())
}

#[test]
fn test_strip_unstuffed_binary() {
    let dir = tempdir().unwrap();
    let mock = mock_tree(dir.path());
    let err = Stuffer::default()
        .strip(mock.join("mock.exe"), dir.path().join("out.bin"))
        .unwrap_err();
    assert!(err.is_no_identifier());
}

#[cfg(unix)]
#[test]
fn test_output_is_executable() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let mock = mock_tree(dir.path());
    let out = dir.path().join("out.bin");
    Stuffer::default().stuff(mock.join("mock.exe"), &out, "/", [spec(&mock.join("bar.txt"), "/bar.txt")])?;

    assert_eq!(fs::metadata(&out)?.permissions().mode() & 0o777, 0o755);
    Ok(())
}
