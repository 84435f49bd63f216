//! An owned collection of processed images.

use serde::Serialize;

use crate::profile::ColorProfile;

/// Identifier handed out by [`ImageStore::add`]. Never reused within a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ImageId(u64);

#[derive(Clone, Debug, Serialize)]
pub struct StoredImage {
    pub id: ImageId,
    pub name: String,
    /// Size of the source file in bytes.
    pub size: u64,
    pub profile: ColorProfile,
}

impl StoredImage {
    pub fn size_text(&self) -> String {
        format_file_size(self.size)
    }
}

/// Processed images in insertion order, plus the currently selected one.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ImageStore {
    images: Vec<StoredImage>,
    active: Option<ImageId>,
    #[serde(skip)]
    next_id: u64,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a processed image. The first image added to an empty store
    /// becomes the active one.
    pub fn add(&mut self, name: impl Into<String>, size: u64, profile: ColorProfile) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;

        self.images.push(StoredImage {
            id,
            name: name.into(),
            size,
            profile,
        });
        if self.images.len() == 1 {
            self.active = Some(id);
        }
        id
    }

    pub fn get(&self, id: ImageId) -> Option<&StoredImage> {
        self.images.iter().find(|img| img.id == id)
    }

    /// Remove an image. If it was active, the first remaining image (if any)
    /// becomes active.
    pub fn remove(&mut self, id: ImageId) -> Option<StoredImage> {
        let pos = self.images.iter().position(|img| img.id == id)?;
        let removed = self.images.remove(pos);
        if self.active == Some(id) {
            self.active = self.images.first().map(|img| img.id);
        }
        Some(removed)
    }

    /// Make `id` the active image. Returns `false` for unknown ids, leaving
    /// the selection untouched.
    pub fn select(&mut self, id: ImageId) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<&StoredImage> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.active = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredImage> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileOptions, build_profile};

    fn profile() -> ColorProfile {
        let pixels = [255, 0, 0, 255, 0, 255, 0, 255];
        build_profile(&pixels, &pixels, &ProfileOptions::new()).unwrap()
    }

    #[test]
    fn first_image_is_selected() {
        let mut store = ImageStore::new();
        assert!(store.active().is_none());

        let a = store.add("a.png", 10, profile());
        let b = store.add("b.png", 20, profile());
        assert_eq!(store.active().unwrap().id, a);
        assert_eq!(store.len(), 2);

        assert!(store.select(b));
        assert_eq!(store.active().unwrap().name, "b.png");
    }

    #[test]
    fn removing_the_active_image_falls_back() {
        let mut store = ImageStore::new();
        let a = store.add("a.png", 1, profile());
        let b = store.add("b.png", 1, profile());
        let c = store.add("c.png", 1, profile());

        store.select(b);
        assert_eq!(store.remove(b).unwrap().name, "b.png");
        assert_eq!(store.active().unwrap().id, a);

        store.remove(a);
        assert_eq!(store.active().unwrap().id, c);
        store.remove(c);
        assert!(store.active().is_none());
        assert!(store.remove(c).is_none());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut store = ImageStore::new();
        let a = store.add("a.png", 1, profile());
        store.remove(a);
        let b = store.add("b.png", 1, profile());
        assert_ne!(a, b);
        assert!(!store.select(a));
        assert_eq!(store.active().unwrap().id, b);
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = ImageStore::new();
        store.add("a.png", 1, profile());
        store.clear();
        assert!(store.is_empty());
        assert!(store.active().is_none());
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2.0 MB");
    }
}
