use rust_xlsxwriter::{Format, FormatAlign, FormatBorder};

/// Choices offered in every preference cell
pub const PREFERENCE_OPTIONS: [&str; 3] = ["Preferred", "Available", "Unavailable"];

/// Choices offered in every footer status cell
pub const STATUS_OPTIONS: [&str; 2] = ["Confirmed", "Pending"];

/// Marker written into footer row pairs a slot does not need
pub const UNUSED_MARKER: &str = "—";

/// Fill colours (RGB) used across the generated sheet
#[derive(Debug, Clone)]
pub struct Palette {
    pub title: u32,
    pub header: u32,
    pub day_band: u32,
    pub in_person: u32,
    pub online: u32,
    pub unused: u32,
    pub preferred: u32,
    pub available: u32,
    pub unavailable: u32,
    pub confirmed: u32,
    pub warning: u32,
    pub tracking: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            title: 0x1F3864,
            header: 0xD9E1F2,
            day_band: 0x4472C4,
            in_person: 0xFFF2CC,
            online: 0xDDEBF7,
            unused: 0xBFBFBF,
            preferred: 0xC6EFCE,
            available: 0xFFEB9C,
            unavailable: 0xFFC7CE,
            confirmed: 0xA9D08E,
            warning: 0xF8696B,
            tracking: 0xF2F2F2,
        }
    }
}

impl Palette {
    /// Fill colour for a preference option; unknown options get no fill
    pub fn preference_fill(&self, option: &str) -> Option<u32> {
        match option {
            "Preferred" => Some(self.preferred),
            "Available" => Some(self.available),
            "Unavailable" => Some(self.unavailable),
            _ => None,
        }
    }
}

/// Cell formats built once per sheet from a palette
pub(crate) struct Formats {
    pub title: Format,
    pub day_band: Format,
    pub header: Format,
    pub counts: Format,
    pub entry: Format,
    pub tracking: Format,
    pub row_label: Format,
    pub sub_label: Format,
    pub in_person: Format,
    pub online: Format,
    pub unused: Format,
}

impl Formats {
    pub fn new(palette: &Palette) -> Self {
        let boxed = || Format::new().set_border(FormatBorder::Thin);
        let centered = || {
            boxed()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
        };

        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_font_color(0xFFFFFF)
                .set_background_color(palette.title)
                .set_align(FormatAlign::Center),
            day_band: centered()
                .set_bold()
                .set_font_color(0xFFFFFF)
                .set_background_color(palette.day_band),
            header: centered()
                .set_bold()
                .set_text_wrap()
                .set_background_color(palette.header)
                .set_border_bottom(FormatBorder::Medium),
            counts: centered().set_italic().set_font_size(9),
            entry: centered(),
            tracking: centered().set_background_color(palette.tracking),
            row_label: centered().set_bold().set_background_color(palette.header),
            sub_label: boxed().set_italic().set_font_size(9),
            in_person: centered().set_background_color(palette.in_person),
            online: centered().set_background_color(palette.online),
            unused: centered()
                .set_font_color(0x7F7F7F)
                .set_background_color(palette.unused),
        }
    }

    /// Fill for cells that only take a solid background (conditional formats)
    pub fn fill(color: u32) -> Format {
        Format::new().set_background_color(color)
    }
}
