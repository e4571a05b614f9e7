use crate::{
    font::FontIdent,
    rich_text::{Color, RichText},
};

/// A style request or delta: unset fields inherit from the enclosing group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub color: Option<Color>,
    pub font: Option<FontIdent>,
}

impl Style {
    pub fn colored(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn fonted(font: FontIdent) -> Self {
        Self {
            font: Some(font),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_inherit(&self) -> bool {
        self.color.is_none() && self.font.is_none()
    }
}

/// A tree of style-scoped text runs.
///
/// Style changes become nested child groups carrying only the delta, so a
/// run of appends sharing color and font collapses into one node instead of
/// per-run style wrappers. Groups are created on demand and never merged
/// back; the tree flattens into [`RichText`] at build time.
#[derive(Debug, Default)]
pub struct TextGroup {
    style: Style,
    text: String,
    children: Vec<TextGroup>,
}

impl TextGroup {
    pub fn root() -> Self {
        Self::default()
    }

    /// Ensures the group at `path` renders with `wanted`, descending into a
    /// new child carrying the missing delta when the inherited style does
    /// not already satisfy the request. `path` is updated in place.
    pub fn ensure_group(&mut self, path: &mut Vec<usize>, wanted: &Style) {
        let effective = self.effective_style(path);
        let delta = Style {
            color: wanted.color.filter(|c| effective.color != Some(*c)),
            font: wanted
                .font
                .clone()
                .filter(|f| effective.font.as_ref() != Some(f)),
        };
        if delta.is_inherit() {
            return;
        }

        let group = self.at_path_mut(path);
        group.children.push(TextGroup {
            style: delta,
            ..TextGroup::default()
        });
        path.push(group.children.len() - 1);
    }

    /// Appends literal text to the group at `path`.
    ///
    /// Once a group has children, later text is pushed as a new unstyled
    /// child so it stays ordered after them.
    pub fn append(&mut self, path: &[usize], text: &str) {
        if text.is_empty() {
            return;
        }
        let group = self.at_path_mut(path);
        if group.children.is_empty() {
            group.text.push_str(text);
        } else {
            group.children.push(TextGroup {
                text: text.to_owned(),
                ..TextGroup::default()
            });
        }
    }

    /// The inherited style at `path`: nearest explicit field wins.
    pub fn effective_style(&self, path: &[usize]) -> Style {
        let mut style = self.style.clone();
        let mut group = self;
        for &index in path {
            group = &group.children[index];
            if let Some(color) = group.style.color {
                style.color = Some(color);
            }
            if let Some(font) = &group.style.font {
                style.font = Some(font.clone());
            }
        }
        style
    }

    fn at_path_mut(&mut self, path: &[usize]) -> &mut TextGroup {
        let mut group = self;
        for &index in path {
            group = &mut group.children[index];
        }
        group
    }

    /// Compiles the tree, omitting entirely empty groups. `None` when the
    /// whole tree holds no text.
    pub fn build(&self) -> Option<RichText> {
        let extra: Vec<RichText> = self.children.iter().filter_map(TextGroup::build).collect();
        if self.text.is_empty() && extra.is_empty() {
            return None;
        }
        Some(RichText {
            text: self.text.clone(),
            color: self.style.color,
            font: self.style.font.clone(),
            extra,
        })
    }

    /// Compiles this tree as a child of `parent`, unless empty.
    pub fn build_into(&self, parent: &mut RichText) {
        if let Some(node) = self.build() {
            parent.extra.push(node);
        }
    }
}
