use eframe::egui;

use crate::image_cache::ImageSource;

/// Images dropped onto the window this frame, as (name, source) pairs.
/// Non-image files are skipped with a warning.
pub fn dropped_images(ctx: &egui::Context) -> Vec<(String, ImageSource)> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    dropped.iter().filter_map(image_source).collect()
}

/// Display name of a dropped file
pub fn file_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }

    let name = match &file.path {
        Some(path) => path.display().to_string(),
        None => file.name.clone(),
    };
    std::path::Path::new(&name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

/// Where to load a dropped image from: in-memory bytes (web) or the path
/// (native)
pub fn image_source(file: &egui::DroppedFile) -> Option<(String, ImageSource)> {
    let name = file_name(file);
    if !is_image_file(file) {
        log::warn!("Dropped file is not a supported type: {}", name);
        return None;
    }

    let source = if let Some(bytes) = &file.bytes {
        log::info!("Importing image from memory: {} ({} bytes)", name, bytes.len());
        ImageSource::memory(name.clone(), bytes.clone())
    } else if let Some(path) = &file.path {
        log::info!("Importing image from path: {}", path.display());
        ImageSource::path(path.clone())
    } else {
        log::warn!("Dropped file {} has neither bytes nor a path", name);
        return None;
    };
    Some((name, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_image_detection() {
        let by_mime = egui::DroppedFile {
            mime: "image/png".to_owned(),
            ..Default::default()
        };
        let by_extension = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/photo.JPG")),
            ..Default::default()
        };
        let text = egui::DroppedFile {
            name: "notes.txt".to_owned(),
            ..Default::default()
        };

        assert!(is_image_file(&by_mime));
        assert!(is_image_file(&by_extension));
        assert!(!is_image_file(&text));
    }

    #[test]
    fn test_path_source() {
        let file = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/cat.png")),
            ..Default::default()
        };
        let (name, source) = image_source(&file).unwrap();
        assert_eq!(name, "cat.png");
        assert_eq!(source.uri(), "/tmp/cat.png");
    }

    #[test]
    fn test_bytes_preferred_over_path() {
        let file = egui::DroppedFile {
            name: "web.png".to_owned(),
            bytes: Some(vec![1u8, 2, 3].into()),
            ..Default::default()
        };
        let (_, source) = image_source(&file).unwrap();
        assert!(matches!(source, ImageSource::Memory { .. }));
    }
}
