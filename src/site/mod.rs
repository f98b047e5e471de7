//! Display page rendering
//!
//! Builds the promotional page for one page view. [`PageView`] is the
//! transient view state for a single rendering session: the two ordered media
//! lists plus the presentation decisions derived from them. The layout rules
//! are the engineering contract here; copy and styling are presentation.
//!
//! Layout rules:
//! - the first video (if any) becomes the looping, muted, autoplaying hero
//!   background;
//! - videos from index 1 onward populate a secondary gallery, shown only
//!   when there are at least two videos total;
//! - all images populate a grid gallery, omitted when empty.

use crate::media::{MediaItem, MediaLibrary};

/// Per-request view state for one page render. Never shared across requests.
#[derive(Debug, Clone, Default)]
pub struct PageView {
    images: Vec<MediaItem>,
    videos: Vec<MediaItem>,
}

impl PageView {
    pub fn new(library: MediaLibrary) -> Self {
        Self {
            images: library.images,
            videos: library.videos,
        }
    }

    /// View for the silent-failure path: the page renders with no media
    /// sections at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The hero background video, when any video exists.
    pub fn hero_video(&self) -> Option<&MediaItem> {
        self.videos.first()
    }

    /// Secondary gallery entries: everything after the hero, present only
    /// when there are at least two videos total.
    pub fn gallery_videos(&self) -> &[MediaItem] {
        if self.videos.len() >= 2 {
            &self.videos[1..]
        } else {
            &[]
        }
    }

    pub fn gallery_images(&self) -> &[MediaItem] {
        &self.images
    }
}

/// Render the full page for one view.
pub fn render_page(view: &PageView) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>The Lake Residences — Lakefront Living</title>\n",
    );
    html.push_str(STYLESHEET);
    html.push_str("</head>\n<body>\n");

    render_hero(&mut html, view);
    render_image_gallery(&mut html, view);
    render_video_gallery(&mut html, view);

    html.push_str(
        "<footer>\n<p>524/A/1, Thesath Mawatha, Lake Road, Baththaramulla, \
         Sri Jayawardenepura Kotte, Sri Lanka</p>\n</footer>\n</body>\n</html>\n",
    );

    html
}

fn render_hero(html: &mut String, view: &PageView) {
    html.push_str("<section class=\"hero\">\n");
    if let Some(video) = view.hero_video() {
        html.push_str(
            "<video class=\"hero-video\" autoplay muted loop playsinline>\n<source src=\"",
        );
        html.push_str(&escape_attr(&video.url));
        html.push_str("\" type=\"video/mp4\">\n</video>\n");
    }
    html.push_str(
        "<div class=\"hero-copy\">\n\
         <h1>Welcome to The Lake Residences</h1>\n\
         <p>Luxury living amidst nature on the Thalangama lakefront</p>\n\
         </div>\n</section>\n",
    );
}

fn render_image_gallery(html: &mut String, view: &PageView) {
    let images = view.gallery_images();
    if images.is_empty() {
        return;
    }

    html.push_str("<section class=\"gallery\">\n<h2>Property Gallery</h2>\n<div class=\"grid\">\n");
    for (index, image) in images.iter().enumerate() {
        html.push_str("<img src=\"");
        html.push_str(&escape_attr(&image.url));
        html.push_str("\" alt=\"Lake Residences ");
        html.push_str(&(index + 1).to_string());
        html.push_str("\" loading=\"lazy\">\n");
    }
    html.push_str("</div>\n</section>\n");
}

fn render_video_gallery(html: &mut String, view: &PageView) {
    let videos = view.gallery_videos();
    if videos.is_empty() {
        return;
    }

    html.push_str(
        "<section class=\"video-gallery\">\n<h2>Property Videos</h2>\n<div class=\"grid\">\n",
    );
    for video in videos {
        html.push_str("<video autoplay muted loop playsinline>\n<source src=\"");
        html.push_str(&escape_attr(&video.url));
        html.push_str("\" type=\"video/mp4\">\n</video>\n");
    }
    html.push_str("</div>\n</section>\n");
}

/// Escape a string for use inside a double-quoted HTML attribute.
fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const STYLESHEET: &str = "<style>\n\
    body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; }\n\
    .hero { position: relative; min-height: 60vh; display: flex; align-items: center; \
justify-content: center; background: #0f3d4c; overflow: hidden; }\n\
    .hero-video { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; }\n\
    .hero-copy { position: relative; color: #fff; text-align: center; padding: 2rem; }\n\
    section { max-width: 72rem; margin: 0 auto; padding: 2rem 1rem; }\n\
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1rem; }\n\
    .grid img, .grid video { width: 100%; height: 16rem; object-fit: cover; border-radius: 0.5rem; }\n\
    footer { text-align: center; padding: 2rem; color: #6b7280; }\n\
</style>\n";

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pathname: &str) -> MediaItem {
        MediaItem {
            url: format!("https://cdn.example.com/{}", pathname),
            pathname: pathname.to_string(),
        }
    }

    fn library(images: &[&str], videos: &[&str]) -> MediaLibrary {
        MediaLibrary {
            images: images.iter().map(|p| item(p)).collect(),
            videos: videos.iter().map(|p| item(p)).collect(),
        }
    }

    #[test]
    fn zero_videos_renders_no_hero_video_and_no_video_gallery() {
        let view = PageView::new(library(&["Images/a.jpg"], &[]));
        assert!(view.hero_video().is_none());
        assert!(view.gallery_videos().is_empty());

        let page = render_page(&view);
        assert!(!page.contains("<video"));
        assert!(!page.contains("Property Videos"));
    }

    #[test]
    fn single_video_becomes_hero_without_secondary_gallery() {
        let view = PageView::new(library(&[], &["Videos/tour.mp4"]));
        assert_eq!(view.hero_video().unwrap().pathname, "Videos/tour.mp4");
        assert!(view.gallery_videos().is_empty());

        let page = render_page(&view);
        assert!(page.contains("hero-video"));
        assert!(page.contains("Videos/tour.mp4"));
        assert!(!page.contains("Property Videos"));
    }

    #[test]
    fn remaining_videos_fill_the_secondary_gallery() {
        let view = PageView::new(library(
            &[],
            &["Videos/tour.mp4", "Videos/drone.mp4", "Videos/sunset.mp4"],
        ));
        let gallery: Vec<&str> = view
            .gallery_videos()
            .iter()
            .map(|v| v.pathname.as_str())
            .collect();
        assert_eq!(gallery, ["Videos/drone.mp4", "Videos/sunset.mp4"]);

        let page = render_page(&view);
        assert!(page.contains("Property Videos"));
        assert!(page.contains("Videos/drone.mp4"));
        // The hero video appears once, in the hero section only.
        assert_eq!(page.matches("Videos/tour.mp4").count(), 1);
    }

    #[test]
    fn images_fill_the_grid_gallery() {
        let view = PageView::new(library(&["Images/a.jpg", "Images/b.jpg"], &[]));
        let page = render_page(&view);
        assert!(page.contains("Property Gallery"));
        assert!(page.contains("Images/a.jpg"));
        assert!(page.contains("Images/b.jpg"));
    }

    #[test]
    fn empty_view_renders_copy_only() {
        let page = render_page(&PageView::empty());
        assert!(page.contains("Welcome to The Lake Residences"));
        assert!(!page.contains("<video"));
        assert!(!page.contains("<img"));
    }

    #[test]
    fn urls_are_attribute_escaped() {
        let view = PageView::new(MediaLibrary {
            images: vec![MediaItem {
                url: "https://cdn.example.com/a.jpg?x=\"><script>".to_string(),
                pathname: "Images/a.jpg".to_string(),
            }],
            videos: vec![],
        });
        let page = render_page(&view);
        assert!(!page.contains("\"><script>"));
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
    }
}
