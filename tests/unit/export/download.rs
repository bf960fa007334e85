use super::*;

#[test]
fn directory_downloads_write_file() {
    let dir = PathBuf::from("target").join("download_unit");
    let mut sink = DirectoryDownloads::new(&dir);
    let blob = Blob {
        mime: "video/webm",
        bytes: vec![1, 2, 3],
    };
    let path = sink.deliver("pac-card-snake-1.webm", &blob).unwrap();
    assert_eq!(path, dir.join("pac-card-snake-1.webm"));
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
}

#[test]
fn directory_downloads_reject_paths() {
    let mut sink = DirectoryDownloads::new(PathBuf::from("target").join("download_unit"));
    let blob = Blob {
        mime: "video/webm",
        bytes: Vec::new(),
    };
    for bad in ["", "../escape.webm", "a/b.webm"] {
        let err = sink.deliver(bad, &blob).unwrap_err();
        assert!(matches!(err, CardError::Validation(_)), "{bad}");
    }
}

#[test]
fn memory_downloads_keep_order() {
    let mut sink = MemoryDownloads::new();
    let blob = Blob {
        mime: "video/webm",
        bytes: vec![9],
    };
    sink.deliver("a.webm", &blob).unwrap();
    sink.deliver("b.webm", &blob).unwrap();
    let names: Vec<_> = sink.delivered.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["a.webm", "b.webm"]);
}
