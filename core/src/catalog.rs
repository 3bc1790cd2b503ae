//! Built-in texts and image assets for the prompt.

#[derive(Clone, Copy, Debug)]
pub struct AssetEntry {
    pub src: &'static str,
    pub alt: &'static str,
}

pub const DEFAULT_PROMPT: &str = "Will you go out with me? 🥺";
pub const DEFAULT_ACCEPT_LABEL: &str = "Yes";
pub const DEFAULT_REFUSE_LABEL: &str = "No";
pub const DEFAULT_WAITING_PROMPT: &str = "I'll wait... ⏳";
pub const DEFAULT_CELEBRATION_PROMPT: &str = "Yay! 🥰💕";

pub const REFUSAL_TEXTS: &[&str] = &["Are you sure? 🤨", "Think again! 😤", "Last chance! 😭"];

pub const REFUSAL_ALT: &str = "meme";
pub const ACCEPT_ALT: &str = "yes!";

pub const REFUSAL_ASSETS: &[AssetEntry] = &[
    AssetEntry {
        src: "images/no1a.jpg",
        alt: REFUSAL_ALT,
    },
    AssetEntry {
        src: "images/no2a.jpg",
        alt: REFUSAL_ALT,
    },
    AssetEntry {
        src: "images/no3a.jpg",
        alt: REFUSAL_ALT,
    },
    AssetEntry {
        src: "images/no4.jpg",
        alt: REFUSAL_ALT,
    },
];

pub const ACCEPT_ASSET: AssetEntry = AssetEntry {
    src: "images/yes.png",
    alt: ACCEPT_ALT,
};

/// Affirmative button scale per escalation step (20% growth per step).
pub const SCALE_TABLE: &[f64] = &[1.2, 1.4, 1.6];

pub fn asset_by_src(src: &str) -> Option<&'static AssetEntry> {
    REFUSAL_ASSETS
        .iter()
        .chain(std::iter::once(&ACCEPT_ASSET))
        .find(|entry| entry.src == src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_more_image_than_texts() {
        assert_eq!(REFUSAL_ASSETS.len(), REFUSAL_TEXTS.len() + 1);
    }

    #[test]
    fn lookup_by_src_finds_alt_text() {
        assert_eq!(asset_by_src("images/yes.png").map(|entry| entry.alt), Some("yes!"));
        assert_eq!(asset_by_src("images/no4.jpg").map(|entry| entry.alt), Some("meme"));
        assert!(asset_by_src("images/maybe.gif").is_none());
    }
}
