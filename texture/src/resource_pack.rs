use crate::texture::Texture;
use glyph_canvas_layout::{
    AbsoluteFontCollection, Font, LineHeightFontCollection, SpacerFont, BASELINE_ASCENT,
};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// Hand-authored provider template for non-negative line indices.
const POSITIVE_TEMPLATE: &str = include_str!("../assets/lh_positive.json");

/// Hand-authored provider template for negative line indices, with the
/// taller bitmap geometry above-baseline ascents need.
const NEGATIVE_TEMPLATE: &str = include_str!("../assets/lh_negative.json");

#[derive(Debug, Error)]
pub enum ResourcePackError {
    #[error("font definition serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("png encoding failed for `{path}`: {source}")]
    Png {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// One file destined for the generated resource pack.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Collects generated fonts and sliced textures and serializes them into
/// resource-pack files: one JSON font definition per line font or texture,
/// one PNG per texture piece.
///
/// Emission is in-memory; writing the files out belongs to the asset layer.
#[derive(Debug, Default)]
pub struct ResourcePackBuilder {
    files: Vec<ResourceFile>,
}

impl ResourcePackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the definition of one generated line font. Fonts of other
    /// kinds are ignored.
    pub fn add_line_font(&mut self, font: &Font) -> Result<(), ResourcePackError> {
        let line = match font.line() {
            Some(line) => line,
            None => return Ok(()),
        };
        let value = line_font_json(font, line)?;
        self.push_json(
            format!(
                "assets/{}/font/{}.json",
                font.ident().namespace(),
                font.ident().path()
            ),
            &value,
        )
    }

    /// Emits every font of an absolute collection, lowest line first.
    pub fn add_absolute_collection(
        &mut self,
        collection: &AbsoluteFontCollection,
    ) -> Result<(), ResourcePackError> {
        for font in sorted_by_line(collection.fonts()) {
            self.add_line_font(&font)?;
        }
        Ok(())
    }

    /// Emits every font of a line-height collection, lowest line first.
    pub fn add_line_collection(
        &mut self,
        collection: &LineHeightFontCollection,
    ) -> Result<(), ResourcePackError> {
        for font in sorted_by_line(collection.fonts()) {
            self.add_line_font(&font)?;
        }
        Ok(())
    }

    /// Emits the movement font as a space-provider definition.
    pub fn add_spacer(&mut self, spacer: &SpacerFont) -> Result<(), ResourcePackError> {
        let mut advances = serde_json::Map::new();
        for (width, c) in spacer.catalog() {
            advances.insert(c.to_string(), Value::from(width));
        }
        let value = json!({
            "providers": [{ "type": "space", "advances": advances }]
        });
        let ident = spacer.ident();
        self.push_json(
            format!("assets/{}/font/{}.json", ident.namespace(), ident.path()),
            &value,
        )
    }

    /// Emits a texture's glyph font definition and one PNG per piece.
    pub fn add_texture(&mut self, texture: &Texture) -> Result<(), ResourcePackError> {
        if texture.rows().is_empty() {
            return Ok(());
        }
        let namespace = texture.font().namespace();
        let base = format!("font/gui/{}", texture.gui_number());

        let mut providers = Vec::new();
        for (row_index, row) in texture.rows().iter().enumerate() {
            for piece in row.pieces() {
                let piece_path = format!("{}/{}_{}.png", base, row_index, piece.index());
                let png_path = format!("assets/{}/textures/{}", namespace, piece_path);
                let mut bytes = Vec::new();
                piece
                    .image()
                    .write_to(
                        &mut std::io::Cursor::new(&mut bytes),
                        image::ImageFormat::Png,
                    )
                    .map_err(|source| ResourcePackError::Png {
                        path: png_path.clone(),
                        source,
                    })?;
                self.files.push(ResourceFile {
                    path: png_path,
                    bytes,
                });

                providers.push(json!({
                    "type": "bitmap",
                    "file": format!("{}:{}", namespace, piece_path),
                    "ascent": piece.ascent(),
                    "height": piece.height(),
                    "chars": [piece.ch().to_string()],
                }));
            }
        }

        let value = json!({ "providers": providers });
        self.push_json(
            format!("assets/{}/font/{}.json", namespace, texture.font().path()),
            &value,
        )
    }

    #[inline]
    pub fn files(&self) -> &[ResourceFile] {
        &self.files
    }

    pub fn into_files(self) -> Vec<ResourceFile> {
        self.files
    }

    fn push_json(&mut self, path: String, value: &Value) -> Result<(), ResourcePackError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.files.push(ResourceFile { path, bytes });
        Ok(())
    }
}

fn sorted_by_line<'a>(fonts: impl Iterator<Item = &'a Arc<Font>>) -> Vec<Arc<Font>> {
    let mut fonts: Vec<Arc<Font>> = fonts.cloned().collect();
    fonts.sort_by_key(|f| f.line());
    fonts
}

/// Deep-copies the appropriate template and applies the font's per-line
/// ascent adjustment to every provider. The adjustment must stay a pure
/// function of the line so regenerated packs are byte-identical.
fn line_font_json(font: &Font, line: i32) -> Result<Value, ResourcePackError> {
    let template = if line < 0 {
        NEGATIVE_TEMPLATE
    } else {
        POSITIVE_TEMPLATE
    };
    let mut value: Value = serde_json::from_str(template)?;
    let delta = font.ascent() - BASELINE_ASCENT;

    if let Some(providers) = value.get_mut("providers").and_then(Value::as_array_mut) {
        for provider in providers {
            let base_ascent = provider.get("ascent").and_then(Value::as_i64).unwrap_or(0) as i32;
            let base_height = provider
                .get("height")
                .and_then(Value::as_i64)
                .unwrap_or(i64::from(base_ascent + 1)) as i32;
            let ascent = base_ascent + delta;
            provider["ascent"] = Value::from(ascent);
            if ascent > base_height {
                provider["height"] = Value::from(ascent);
            }
        }
    }
    Ok(value)
}
