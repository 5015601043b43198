//! Escape sequences written to the terminal.
//!
//! - Kitty graphics: `ESC _G <key>=<value>,...;<base64> ESC \`
//!   (<https://sw.kovidgoyal.net/kitty/graphics-protocol/>)
//! - OSC 8 hyperlinks: `ESC ]8;;<uri> ESC \ <text> ESC ]8;; ESC \`
//! - SGR colors and bold

use std::path::Path;

/// Terminal columns an inline icon occupies
pub const ICON_COLUMNS: usize = 2;

/// Icon columns plus the separating space
pub const ICON_CELL_WIDTH: usize = ICON_COLUMNS + 1;

/// Query a 1x1 RGB image (id 31) and then request primary device attributes.
///
/// Terminals without graphics support answer only the `ESC [c` part, so the
/// device-attributes reply doubles as the end of the response.
pub const GRAPHICS_PROBE: &[u8] = b"\x1b_Gi=31,s=1,v=1,a=q,t=d,f=24;AAAA\x1b\\\x1b[c";

/// Substring of a graphics-protocol reply to the probe
pub const GRAPHICS_MARKER: &[u8] = b"_Gi=31";

/// Start of the primary device-attributes reply (`ESC [ ? ... c`)
pub const DEVICE_ATTRIBUTES_PREFIX: &[u8] = b"\x1b[?";

/// Transmit and place a base64 PNG as a 2x1 cell image, then step the
/// cursor past it so following text lines up either way.
pub fn inline_image(payload: &str) -> String {
    format!(
        "\x1b_Ga=T,f=100,c={cols},r=1,i=1,q=2;{payload}\x1b\\\x1b[{cols}C ",
        cols = ICON_COLUMNS
    )
}

/// Padding occupying the same width as [`inline_image`]
pub fn blank_icon() -> String {
    " ".repeat(ICON_CELL_WIDTH)
}

/// Wrap `text` in an OSC 8 link to `target` as a `file://` URI.
pub fn hyperlink(target: &Path, text: &str) -> String {
    format!(
        "\x1b]8;;file://{}\x1b\\{}\x1b]8;;\x1b\\",
        encode_path(target),
        text
    )
}

/// Percent-encode a path for use in a URI, keeping `/` separators.
fn encode_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// SGR foreground colors used by the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Dim,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => "31",
            Color::Green => "32",
            Color::Yellow => "33",
            Color::Blue => "34",
            Color::Magenta => "35",
            Color::Cyan => "36",
            Color::Dim => "2",
        }
    }
}

/// Applies SGR styling, or nothing when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    enabled: bool,
}

impl Style {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn bold(&self, text: &str) -> String {
        self.wrap("1", text)
    }

    pub fn paint(&self, color: Color, text: &str) -> String {
        self.wrap(color.code(), text)
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}
