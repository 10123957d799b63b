// certgen: fixed settings and the enumerated font families

use clap::ValueEnum;

/// Default text color (gold)
pub const GOLDEN: [u8; 3] = [212, 175, 55];

/// Font sizes in pixels
pub const DEFAULT_FONT_SIZE: u32 = 60;
pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 300;

/// Column headers that name the recipient, most preferred first
pub const NAME_COLUMN_CANDIDATES: &[&str] = &["Name", "Full Name", "Participant", "Participant Name"];

/// Text used for previews when the dataset has nothing better
pub const SAMPLE_NAME: &str = "Sample Name";

/// Subdirectory (next to the spreadsheet) that receives the PDFs
pub const OUTPUT_DIR_NAME: &str = "certificates";

/// Directories searched for font files, in order
pub const FONT_SEARCH_DIRS: &[&str] = &[
    ".",
    "fonts",
    "C:/Windows/Fonts",
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
];

/// Font families offered to the user, each backed by a font file name
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FontChoice {
    Gabriola,
    Infroman,
    GeorgiaItalic,
    JavaText,
    BodoniPoster,
    #[default]
    DejavuSans,
}

impl FontChoice {
    pub fn file_name(self) -> &'static str {
        match self {
            FontChoice::Gabriola => "Gabriola.ttf",
            FontChoice::Infroman => "INFROMAN.TTF",
            FontChoice::GeorgiaItalic => "georgiai.ttf",
            FontChoice::JavaText => "javatext.ttf",
            FontChoice::BodoniPoster => "BOD_PSTC.TTF",
            FontChoice::DejavuSans => "DejaVuSans.ttf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FontChoice::Gabriola => "Gabriola",
            FontChoice::Infroman => "Infroman",
            FontChoice::GeorgiaItalic => "Georgia Italic",
            FontChoice::JavaText => "JavaText",
            FontChoice::BodoniPoster => "Bodoni Poster",
            FontChoice::DejavuSans => "DejaVu Sans",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_choice_maps_to_a_font_file() {
        for choice in FontChoice::value_variants() {
            let file = choice.file_name();
            assert!(file.to_lowercase().ends_with(".ttf"), "{} -> {}", choice.label(), file);
        }
    }

    #[test]
    fn test_default_choice_is_bundled_font() {
        assert_eq!(FontChoice::default().file_name(), "DejaVuSans.ttf");
    }
}
