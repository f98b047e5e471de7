//! Media classification
//!
//! Partitions the blob-store listing into images and videos by pathname
//! prefix and extension, producing the wire shape served by
//! `GET /api/blob-media`. Listing order is preserved; nothing is sorted or
//! deduplicated, and objects matching neither rule are dropped silently.

use serde::{Deserialize, Serialize};

use crate::blobstore::ObjectDescriptor;

/// Leading path segment for gallery images
pub const IMAGE_PREFIX: &str = "Images/";

/// Leading path segment for property videos
pub const VIDEO_PREFIX: &str = "Videos/";

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov"];

/// The minimal record describing one stored object surfaced to the display
/// layer: a fetchable URL plus the storage pathname it was classified by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub url: String,
    pub pathname: String,
}

/// The two ordered media lists, in listing order.
///
/// Serializes directly as the `/api/blob-media` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaLibrary {
    pub images: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
}

impl MediaLibrary {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }
}

/// Partition a storage listing into images and videos.
///
/// An object is an image iff its pathname starts with `Images/` and its
/// lowercased pathname contains one of the image extensions; videos likewise
/// under `Videos/`. Extensions match as substrings of the full pathname, not
/// as true suffixes, so existing buckets classify exactly as they always
/// have (`Images/photo.jpg.bak` still counts as an image).
pub fn classify(objects: Vec<ObjectDescriptor>) -> MediaLibrary {
    let mut library = MediaLibrary::default();

    for object in objects {
        if matches_rule(&object.pathname, IMAGE_PREFIX, IMAGE_EXTENSIONS) {
            library.images.push(MediaItem {
                url: object.url,
                pathname: object.pathname,
            });
        } else if matches_rule(&object.pathname, VIDEO_PREFIX, VIDEO_EXTENSIONS) {
            library.videos.push(MediaItem {
                url: object.url,
                pathname: object.pathname,
            });
        }
    }

    library
}

/// The classification rule: literal prefix plus case-insensitive extension
/// substring.
fn matches_rule(pathname: &str, prefix: &str, extensions: &[&str]) -> bool {
    if !pathname.starts_with(prefix) {
        return false;
    }
    let lowered = pathname.to_lowercase();
    extensions.iter().any(|ext| lowered.contains(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(pathname: &str) -> ObjectDescriptor {
        ObjectDescriptor {
            url: format!("https://cdn.example.com/{}", pathname),
            pathname: pathname.to_string(),
        }
    }

    #[test]
    fn image_pathnames_go_to_images_only() {
        for name in [
            "Images/living-room.jpg",
            "Images/kitchen.jpeg",
            "Images/balcony.png",
            "Images/lake-view.webp",
        ] {
            let library = classify(vec![object(name)]);
            assert_eq!(library.images.len(), 1, "{} should be an image", name);
            assert!(library.videos.is_empty(), "{} must not be a video", name);
            assert_eq!(library.images[0].pathname, name);
        }
    }

    #[test]
    fn video_pathnames_go_to_videos_only() {
        for name in [
            "Videos/tour.mp4",
            "Videos/drone.webm",
            "Videos/sunset.mov",
        ] {
            let library = classify(vec![object(name)]);
            assert_eq!(library.videos.len(), 1, "{} should be a video", name);
            assert!(library.images.is_empty(), "{} must not be an image", name);
        }
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let library = classify(vec![object("Images/cover.PNG"), object("Videos/TOUR.MP4")]);
        assert_eq!(library.images.len(), 1);
        assert_eq!(library.videos.len(), 1);
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        let library = classify(vec![object("images/cover.png")]);
        assert!(library.is_empty());
    }

    #[test]
    fn unrelated_objects_are_dropped() {
        let library = classify(vec![object("Docs/readme.pdf")]);
        assert!(library.is_empty());
    }

    #[test]
    fn prefix_without_filename_matches_nothing() {
        let library = classify(vec![object("Videos/")]);
        assert!(library.is_empty());
    }

    #[test]
    fn wrong_prefix_keeps_media_out_of_the_other_list() {
        // A video extension under Images/ matches neither rule.
        let library = classify(vec![object("Images/clip.mp4")]);
        assert!(library.is_empty());
    }

    #[test]
    fn extension_anywhere_in_pathname_counts() {
        // Substring matching kept for bucket compatibility.
        let library = classify(vec![object("Images/photo.jpg.bak")]);
        assert_eq!(library.images.len(), 1);
    }

    #[test]
    fn listing_order_is_preserved() {
        let library = classify(vec![
            object("Images/b.jpg"),
            object("Videos/tour.mp4"),
            object("Images/a.jpg"),
            object("Images/a.jpg"),
        ]);
        let order: Vec<&str> = library
            .images
            .iter()
            .map(|item| item.pathname.as_str())
            .collect();
        // Not sorted and not deduplicated.
        assert_eq!(order, ["Images/b.jpg", "Images/a.jpg", "Images/a.jpg"]);
    }
}
