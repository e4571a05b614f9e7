use crate::{screen::ScreenInfo, widget::Widget};
use glyph_canvas_layout::{CanvasFonts, RichText, TextBuilder};
use rustc_hash::FxHashMap;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Arranges widgets on a container screen and compiles them into the
/// screen's rich-text title.
///
/// Compilation is cached by a hash of everything that affects output (the
/// screen geometry, the title and each widget's state), so a screen that
/// has not changed between refreshes costs one hash instead of a render
/// pass.
pub struct ScreenBuilder<'a> {
    fonts: &'a CanvasFonts,
    info: ScreenInfo,
    title: Option<String>,
    widgets: Vec<(i32, i32, Box<dyn Widget>)>,
    compiled_cache: FxHashMap<u64, RichText>,
}

impl<'a> ScreenBuilder<'a> {
    pub fn new(fonts: &'a CanvasFonts, info: ScreenInfo) -> Self {
        Self {
            fonts,
            info,
            title: None,
            widgets: Vec::new(),
            compiled_cache: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn info(&self) -> ScreenInfo {
        self.info
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Places a widget at a screen-space position.
    pub fn add_widget(&mut self, x: i32, y: i32, widget: impl Widget + 'static) {
        self.widgets.push((x, y, Box::new(widget)));
    }

    /// Places a widget at a slot-grid cell.
    pub fn add_widget_at_slot(&mut self, column: i32, row: i32, widget: impl Widget + 'static) {
        self.add_widget(self.info.slot_x(column), self.info.slot_y(row), widget);
    }

    #[inline]
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Compiles the current screen state into one rich-text title value.
    pub fn compile(&mut self) -> RichText {
        let state = self.state_hash();
        if let Some(hit) = self.compiled_cache.get(&state) {
            log::debug!("screen state {:x} compiled from cache", state);
            return hit.clone();
        }

        let compiled = self.render_pass();
        self.compiled_cache.insert(state, compiled.clone());
        compiled
    }

    /// One full top-to-bottom, left-to-right render pass.
    fn render_pass(&self) -> RichText {
        let mut builder = TextBuilder::new(self.fonts);
        builder.set_origin(-self.info.title_x(), -self.info.title_y());
        if let Some(title) = &self.title {
            builder.set_title(title.clone());
        }

        let mut order: Vec<usize> = (0..self.widgets.len()).collect();
        order.sort_by_key(|&i| (self.widgets[i].1, self.widgets[i].0));

        for i in order {
            let (x, y, widget) = &self.widgets[i];
            widget.render(&mut builder, *x, *y);
        }
        builder.build()
    }

    fn state_hash(&self) -> u64 {
        let mut hasher = XxHash64::default();
        std::hash::Hash::hash(&self.info, &mut hasher);
        match &self.title {
            Some(title) => hasher.write(title.as_bytes()),
            None => hasher.write_u8(0),
        }
        for (x, y, widget) in &self.widgets {
            hasher.write_i32(*x);
            hasher.write_i32(*y);
            widget.state_hash(&mut hasher);
        }
        hasher.finish()
    }
}
