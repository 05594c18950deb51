/*!
format.rs

Human-readable output primitives for the `sui-mcp` CLI.

  - StyleOptions::detect() honours NO_COLOR / NO_EMOJI / COLUMNS
  - color(role, text, &style), emoji(tag, &style)
  - box_header(title, subtitle, &style)
  - table(headers, rows, TableOpts, &style)

Functions return strings and never print. JSON output paths do not use
these helpers so machine output stays clean.
*/

use std::borrow::Cow;

/* ---- Style Options ---- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
    pub padding: usize,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            use_emoji: std::env::var_os("NO_EMOJI").is_none(),
            term_width: width,
            padding: 1,
        }
    }

    #[cfg(test)]
    pub fn plain(term_width: usize) -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
            term_width,
            padding: 1,
        }
    }
}

/* ---- Color / Emoji ---- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Success,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45",
        Role::Secondary => "38;5;250",
        Role::Accent => "38;5;213",
        Role::Success => "38;5;82",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "success" => "✔",
        "error" => "✖",
        "info" => "ℹ",
        "tool" => "🛠",
        "list" => "📜",
        "dry" => "🔎",
        _ => "",
    }
}

/* ---- Box Header ---- */

pub fn box_header(
    title: impl AsRef<str>,
    subtitle: Option<impl AsRef<str>>,
    style: &StyleOptions,
) -> String {
    let title_styled = color(Role::Primary, title.as_ref(), style);
    let inner = match subtitle {
        Some(s) => format!("{title_styled}  {}", color(Role::Secondary, s.as_ref(), style)),
        None => title_styled,
    };

    let padding = style.padding;
    let max_inner = style.term_width.clamp(20, 200) - 2;
    let inner_width = (display_width(&inner) + padding * 2).min(max_inner);
    let text_width = inner_width.saturating_sub(padding * 2).max(1);

    let wrapped = if display_width(&inner) <= text_width {
        vec![inner]
    } else {
        wrap_text(&inner, text_width)
    };

    let mut lines = vec![format!("┌{}┐", "─".repeat(inner_width))];
    for w in wrapped {
        let fill = text_width.saturating_sub(display_width(&w));
        lines.push(format!(
            "│{pad}{w}{fill}{pad}│",
            pad = " ".repeat(padding),
            fill = " ".repeat(fill),
        ));
    }
    lines.push(format!("└{}┘", "─".repeat(inner_width)));
    lines.join("\n")
}

/* ---- Table Rendering ---- */

#[derive(Debug, Clone)]
pub struct TableOpts {
    /// 0 means the style's terminal width.
    pub max_width: usize,
    pub truncate: bool,
    pub header_sep: bool,
    pub min_col_width: usize,
}

impl Default for TableOpts {
    fn default() -> Self {
        Self {
            max_width: 0,
            truncate: true,
            header_sep: true,
            min_col_width: 2,
        }
    }
}

pub fn table(
    headers: &[&str],
    rows: &[Vec<String>],
    opts: TableOpts,
    style: &StyleOptions,
) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let col_count = headers.len();
    let width_limit = if opts.max_width == 0 {
        style.term_width
    } else {
        opts.max_width.min(style.term_width)
    };

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    // greedy shrink, widest columns first
    let total: usize = widths.iter().sum::<usize>() + (col_count - 1) * 2;
    if total > width_limit {
        let mut overflow = total - width_limit;
        let mut ordered: Vec<(usize, usize)> = widths.iter().copied().enumerate().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        for (idx, w) in ordered {
            if overflow == 0 {
                break;
            }
            if w > opts.min_col_width {
                let shrink = (w - opts.min_col_width).min(overflow);
                widths[idx] -= shrink;
                overflow -= shrink;
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| color(Role::Accent, pad_or_truncate(h, widths[i], opts.truncate), style))
        .collect();
    out.push_str(&header_cells.join("  "));
    out.push('\n');

    if opts.header_sep {
        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&color(Role::Dim, sep.join("  "), style));
        out.push('\n');
    }

    let body: Vec<String> = rows
        .iter()
        .map(|row| {
            (0..col_count)
                .map(|c| {
                    let raw = row.get(c).map(String::as_str).unwrap_or("");
                    pad_or_truncate(raw, widths[c], opts.truncate)
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect();
    out.push_str(&body.join("\n"));
    out
}

fn pad_or_truncate(s: &str, width: usize, truncate: bool) -> String {
    let len = display_width(s);
    if len <= width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    if !truncate {
        return s.to_string();
    }
    truncate_ellipsis(&strip_ansi(s), width)
}

/* ---- Text Helpers ---- */

pub fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![s.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        if !current.is_empty() && display_width(&current) + display_width(word) + 1 > max_width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/* ---- ANSI / Width ---- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI ends at the first ASCII letter
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(ch);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}
