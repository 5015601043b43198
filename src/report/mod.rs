//! Terminal report of installed games.
//!
//! Two tables, native then Proton, each sorted by name and omitted when
//! empty, followed by a one-line total:
//!
//! ```text
//! Native Games (2)
//! Game Name  Install Dir
//! Celeste    Celeste
//! Hades      Hades
//!
//! Proton Games (1)
//! Game Name   Proton          Install Dir  Compatdata
//! Elden Ring  GE-Proton9-20   ELDEN RING   1245620
//!
//! Total: 2 native + 1 proton = 3 games
//! ```
//!
//! Column widths are measured in terminal cells on the visible text, so
//! wide characters, styling, links and icon escapes never shift the layout.
//! Versions wider than their column are cut short with `…`.

use std::io::{self, Write};
use std::path::Path;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{InstalledGame, Inventory};
use crate::icons::IconSet;
use crate::terminal::escape::{blank_icon, hyperlink, inline_image, Color, Style};

pub const NAME_HEADER: &str = "Game Name";
pub const VERSION_HEADER: &str = "Proton";
/// Width reserved for Proton versions
pub const VERSION_WIDTH: usize = 14;

const COLUMN_GAP: &str = "  ";

/// How the report is drawn
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Show full paths instead of directory names
    pub full_paths: bool,
    pub style: Style,
    /// Wrap paths in OSC 8 links
    pub hyperlinks: bool,
    /// Icon column: `None` hides it (non-terminal output), otherwise games
    /// without an entry get blank padding
    pub icons: Option<&'a IconSet>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            full_paths: false,
            style: Style::plain(),
            hyperlinks: false,
            icons: None,
        }
    }
}

impl RenderOptions<'_> {
    fn install_header(&self) -> &'static str {
        if self.full_paths {
            "Install Path"
        } else {
            "Install Dir"
        }
    }

    fn compat_header(&self) -> &'static str {
        if self.full_paths {
            "Compatdata Path"
        } else {
            "Compatdata"
        }
    }

    /// Text shown for a game's install location
    fn install_text(&self, game: &InstalledGame) -> String {
        if self.full_paths {
            game.install_path.display().to_string()
        } else {
            game.install_dir_name.clone()
        }
    }

    /// Text shown for a game's Proton prefix
    fn compat_text(&self, game: &InstalledGame) -> String {
        match game.compat_path() {
            Some(path) if self.full_paths => path.display().to_string(),
            Some(_) => game.app_id.clone(),
            None => String::new(),
        }
    }

    fn icon_cell(&self, game: Option<&InstalledGame>) -> String {
        match (self.icons, game) {
            (None, _) => String::new(),
            (Some(icons), Some(game)) => match icons.get(&game.app_id) {
                Some(encoded) => inline_image(encoded),
                None => blank_icon(),
            },
            (Some(_), None) => blank_icon(),
        }
    }

    /// Styled (and optionally linked) text padded to `width` visible columns
    fn cell(
        &self,
        text: &str,
        width: usize,
        color: Option<Color>,
        link: Option<&Path>,
    ) -> String {
        let visible = text_width(text);
        let mut out = match color {
            Some(color) => self.style.paint(color, text),
            None => text.to_string(),
        };
        if let (true, Some(target)) = (self.hyperlinks, link) {
            out = hyperlink(target, &out);
        }
        out.push_str(&" ".repeat(width.saturating_sub(visible)));
        out
    }
}

/// Terminal cells taken by plain text
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut `text` to at most `max_width` cells, ending in `…` when shortened.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text_width(text) <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Width of the name column: the longest name, at least the header.
pub fn name_column_width(games: &[InstalledGame]) -> usize {
    games
        .iter()
        .map(|g| text_width(&g.name))
        .chain(std::iter::once(text_width(NAME_HEADER)))
        .max()
        .unwrap_or(0)
}

fn column_width(header: &str, cells: impl Iterator<Item = String>) -> usize {
    cells
        .map(|c| text_width(&c))
        .chain(std::iter::once(text_width(header)))
        .max()
        .unwrap_or(0)
}

/// Total-count line closing the report
pub fn summary(inventory: &Inventory) -> String {
    format!(
        "Total: {} native + {} proton = {} games",
        inventory.native.len(),
        inventory.proton.len(),
        inventory.len()
    )
}

/// Write the full report.
pub fn render<W: Write>(
    out: &mut W,
    inventory: &Inventory,
    opts: &RenderOptions<'_>,
) -> io::Result<()> {
    let sorted = inventory.sorted();

    if !sorted.native.is_empty() {
        render_native(out, &sorted.native, opts)?;
        writeln!(out)?;
    }
    if !sorted.proton.is_empty() {
        render_proton(out, &sorted.proton, opts)?;
        writeln!(out)?;
    }

    writeln!(out, "{}", opts.style.bold(&summary(inventory)))
}

fn render_native<W: Write>(
    out: &mut W,
    games: &[InstalledGame],
    opts: &RenderOptions<'_>,
) -> io::Result<()> {
    let title = format!("Native Games ({})", games.len());
    writeln!(out, "{}", opts.style.bold(&opts.style.paint(Color::Green, &title)))?;

    let name_width = name_column_width(games);
    let header = format!(
        "{}{}{}{}",
        opts.icon_cell(None),
        opts.cell(NAME_HEADER, name_width, None, None),
        COLUMN_GAP,
        opts.install_header()
    );
    writeln!(out, "{}", opts.style.bold(&header))?;

    for game in games {
        let install = opts.install_text(game);
        writeln!(
            out,
            "{}{}{}{}",
            opts.icon_cell(Some(game)),
            opts.cell(&game.name, name_width, None, None),
            COLUMN_GAP,
            opts.cell(&install, 0, Some(Color::Cyan), Some(game.install_path.as_path())),
        )?;
    }

    Ok(())
}

fn render_proton<W: Write>(
    out: &mut W,
    games: &[InstalledGame],
    opts: &RenderOptions<'_>,
) -> io::Result<()> {
    let title = format!("Proton Games ({})", games.len());
    writeln!(out, "{}", opts.style.bold(&opts.style.paint(Color::Magenta, &title)))?;

    let name_width = name_column_width(games);
    let install_width = column_width(
        opts.install_header(),
        games.iter().map(|g| opts.install_text(g)),
    );
    let header = [
        opts.icon_cell(None),
        opts.cell(NAME_HEADER, name_width, None, None),
        COLUMN_GAP.to_string(),
        opts.cell(VERSION_HEADER, VERSION_WIDTH, None, None),
        COLUMN_GAP.to_string(),
        opts.cell(opts.install_header(), install_width, None, None),
        COLUMN_GAP.to_string(),
        opts.compat_header().to_string(),
    ]
    .concat();
    writeln!(out, "{}", opts.style.bold(&header))?;

    for game in games {
        let version = truncate_to_width(game.compat_version().unwrap_or_default(), VERSION_WIDTH);
        let install = opts.install_text(game);
        let compat = opts.compat_text(game);
        writeln!(
            out,
            "{}{}{}{}{}{}{}{}",
            opts.icon_cell(Some(game)),
            opts.cell(&game.name, name_width, None, None),
            COLUMN_GAP,
            opts.cell(&version, VERSION_WIDTH, Some(Color::Yellow), None),
            COLUMN_GAP,
            opts.cell(
                &install,
                install_width,
                Some(Color::Cyan),
                Some(game.install_path.as_path()),
            ),
            COLUMN_GAP,
            opts.cell(&compat, 0, Some(Color::Blue), game.compat_path()),
        )?;
    }

    Ok(())
}

/// Write the sorted inventory as pretty JSON.
pub fn render_json<W: Write>(out: &mut W, inventory: &Inventory) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &inventory.sorted())?;
    writeln!(out)
}
