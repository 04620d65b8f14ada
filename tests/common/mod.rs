use std::path::{Path, PathBuf};

/// `BITABLE_QR_TEST_FONT` 優先，否則在常見系統字型目錄找第一個可解析的 .ttf
pub fn find_test_font() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("BITABLE_QR_TEST_FONT") {
        return Some(PathBuf::from(path));
    }

    fn walk(dir: &Path, depth: usize) -> Option<PathBuf> {
        if depth > 4 {
            return None;
        }
        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .ok()?
            .flatten()
            .map(|e| e.path())
            .collect();
        entries.sort();
        for path in entries {
            if path.is_dir() {
                if let Some(found) = walk(&path, depth + 1) {
                    return Some(found);
                }
            } else if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf"))
                && std::fs::read(&path)
                    .ok()
                    .and_then(rusttype::Font::try_from_vec)
                    .is_some()
            {
                return Some(path);
            }
        }
        None
    }

    [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .find_map(|root| walk(Path::new(root), 0))
}

/// 解碼灰階圖中 `[x, x + width)` 欄位範圍內唯一的 QR
pub fn decode_qr_region(image: &image::GrayImage, x: u32, width: u32) -> String {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width as usize,
        image.height() as usize,
        |px, py| image.get_pixel(x + px as u32, py as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR symbol");
    let (_meta, content) = grids[0].decode().expect("QR symbol should decode");
    content
}
