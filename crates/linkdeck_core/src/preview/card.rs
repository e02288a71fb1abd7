//! Card icon selection.
//!
//! The user-provided icon always wins. Without one, the link classifier picks
//! a thumbnail or a file-kind icon token.

use crate::model::section::{App, IconKind};
use crate::preview::classify::{classify, PreviewKind};

const LINK_ICON: &str = "fas fa-link";

/// What a renderer should draw in an app card's icon slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardIcon {
    /// User-pasted `data:image` payload.
    EmbeddedImage(String),
    /// User-provided icon class list.
    ClassToken(String),
    /// User-provided emoji or text.
    Glyph(String),
    /// Remote image or video thumbnail derived from the link.
    Thumbnail { kind: PreviewKind, src: String },
    /// Icon class for a recognized document kind, or the generic link icon.
    FileKind(&'static str),
}

/// Picks the icon for `app`.
pub fn card_icon(app: &App) -> CardIcon {
    match app.icon_kind() {
        IconKind::EmbeddedImage => return CardIcon::EmbeddedImage(app.icon.clone()),
        IconKind::ClassToken => return CardIcon::ClassToken(app.icon.clone()),
        IconKind::Glyph => return CardIcon::Glyph(app.icon.clone()),
        IconKind::None => {}
    }

    let preview = classify(&app.url);
    if let Some(src) = preview.preview_url {
        return CardIcon::Thumbnail {
            kind: preview.kind,
            src,
        };
    }
    CardIcon::FileKind(file_kind_icon(preview.kind))
}

fn file_kind_icon(kind: PreviewKind) -> &'static str {
    match kind {
        PreviewKind::Pdf => "fas fa-file-pdf",
        PreviewKind::GoogleDoc => "fas fa-file-word",
        PreviewKind::GoogleSheet => "fas fa-file-spreadsheet",
        PreviewKind::GoogleSlides => "fas fa-file-powerpoint",
        PreviewKind::GoogleForm => "fas fa-list-check",
        PreviewKind::Image | PreviewKind::Video | PreviewKind::Default => LINK_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::{card_icon, CardIcon};
    use crate::model::section::{App, AppDraft};
    use crate::preview::classify::PreviewKind;

    fn app(url: &str, icon: &str) -> App {
        App::from_draft(1, AppDraft::new("card", url).with_icon(icon))
    }

    #[test]
    fn user_icon_wins_over_link_preview() {
        assert_eq!(
            card_icon(&app("https://youtu.be/abc", "🎬")),
            CardIcon::Glyph("🎬".to_string())
        );
    }

    #[test]
    fn video_link_without_icon_uses_thumbnail() {
        assert_eq!(
            card_icon(&app("https://youtu.be/abc", "")),
            CardIcon::Thumbnail {
                kind: PreviewKind::Video,
                src: "https://img.youtube.com/vi/abc/mqdefault.jpg".to_string(),
            }
        );
    }

    #[test]
    fn documents_and_plain_links_use_icon_tokens() {
        assert_eq!(
            card_icon(&app("https://x.org/a.pdf", "")),
            CardIcon::FileKind("fas fa-file-pdf")
        );
        assert_eq!(
            card_icon(&app("https://x.org", "")),
            CardIcon::FileKind("fas fa-link")
        );
    }
}
