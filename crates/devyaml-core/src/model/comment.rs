//! Comments attached to a node.
//!
//! A comment is a plain value object: one optional inline text plus ordered
//! lists of lines printed above and below the node. Text may span several
//! lines in any line-ending style; it is split when rendered.

/// Comment text attached to a [`Node`](super::Node).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub inline: Option<String>,
    pub above: Vec<String>,
    pub below: Vec<String>,
}

impl Comment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A comment printed on the lines above the node.
    pub fn above(text: impl Into<String>) -> Self {
        Self {
            above: vec![text.into()],
            ..Self::default()
        }
    }

    /// A comment printed at the end of the node's first line.
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            inline: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn push_above(&mut self, text: impl Into<String>) {
        self.above.push(text.into());
    }

    pub fn push_below(&mut self, text: impl Into<String>) {
        self.below.push(text.into());
    }

    pub fn set_inline(&mut self, text: impl Into<String>) {
        self.inline = Some(text.into());
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_none() && self.above.is_empty() && self.below.is_empty()
    }

    /// Physical lines of the "above" block, split on any line ending.
    pub fn above_lines(&self) -> impl Iterator<Item = &str> {
        self.above.iter().flat_map(|text| split_lines(text))
    }

    /// Physical lines of the "below" block, split on any line ending.
    pub fn below_lines(&self) -> impl Iterator<Item = &str> {
        self.below.iter().flat_map(|text| split_lines(text))
    }

    /// The inline text collapsed onto a single line.
    pub fn inline_text(&self) -> Option<String> {
        self.inline
            .as_deref()
            .map(|text| split_lines(text).collect::<Vec<_>>().join(" "))
            .filter(|text| !text.is_empty())
    }
}

/// Split on `\r\n`, `\r` or `\n`, dropping trailing whitespace per line.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n")
        .flat_map(|chunk| chunk.split(['\r', '\n']))
        .map(str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_line_ending_style() {
        let c = Comment::above("one\r\ntwo\rthree\nfour");
        assert_eq!(
            c.above_lines().collect::<Vec<_>>(),
            vec!["one", "two", "three", "four"]
        );
    }

    #[test]
    fn above_entries_keep_their_order() {
        let mut c = Comment::above("first");
        c.push_above("second");
        assert_eq!(c.above_lines().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn inline_text_is_single_line() {
        let c = Comment::inline("pin D1\nactive low");
        assert_eq!(c.inline_text().as_deref(), Some("pin D1 active low"));
    }

    #[test]
    fn empty_inline_is_dropped() {
        assert_eq!(Comment::inline("   ").inline_text(), None);
    }

    #[test]
    fn default_comment_is_empty() {
        assert!(Comment::new().is_empty());
        assert!(!Comment::inline("x").is_empty());
    }
}
