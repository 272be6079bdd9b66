use std::io::Write;

use crossterm::{cursor, queue, style, terminal};

/// Keys shown in the menu bar, `[key] action`.
pub const MENU_ITEMS: &[&str] = &[
    "[1-5] location",
    "[l] next location",
    "[p] pause",
    "[←][→] nudge",
    "[q][Esc] quit",
];

/// A run of menu text; `key` runs are the bracketed parts.
#[derive(Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub key: bool,
}

/// Split an item into alternating label and `[key]` segments. An unclosed
/// bracket is treated as plain label text.
pub fn segments(item: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            out.push(Segment { text: rest, key: false });
            break;
        };
        let Some(len) = rest[open..].find(']') else {
            out.push(Segment { text: rest, key: false });
            break;
        };
        if open > 0 {
            out.push(Segment { text: &rest[..open], key: false });
        }
        let close = open + len;
        out.push(Segment { text: &rest[open..=close], key: true });
        rest = &rest[close + 1..];
    }
    out
}

/// Draw the menu bar on row `y`: keys bold, labels dim.
pub fn render_menubar<W: Write>(out: &mut W, y: u16, items: &[&str]) -> anyhow::Result<()> {
    queue!(
        out,
        cursor::MoveTo(0, y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            queue!(out, style::Print("  "))?;
        }
        for seg in segments(item) {
            let attr = if seg.key {
                style::Attribute::Bold
            } else {
                style::Attribute::Dim
            };
            queue!(
                out,
                style::SetAttribute(attr),
                style::Print(seg.text),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, key: bool) -> Segment<'_> {
        Segment { text, key }
    }

    #[test]
    fn splits_keys_from_labels() {
        assert_eq!(
            segments("[q][Esc] quit"),
            vec![seg("[q]", true), seg("[Esc]", true), seg(" quit", false)]
        );
        assert_eq!(segments("go [p]"), vec![seg("go ", false), seg("[p]", true)]);
    }

    #[test]
    fn unclosed_bracket_is_plain_text() {
        assert_eq!(segments("a [b"), vec![seg("a [b", false)]);
    }

    #[test]
    fn renders_every_item() -> anyhow::Result<()> {
        let mut out = Vec::new();
        render_menubar(&mut out, 0, MENU_ITEMS)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("[1-5]"));
        assert!(text.contains(" pause"));
        Ok(())
    }
}
