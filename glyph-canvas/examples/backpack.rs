//! Builds a small backpack screen and writes the generated resource pack
//! next to the compiled title JSON.
//!
//! `cargo run --example backpack`

use glyph_canvas::{
    CanvasFonts, Color, LabelWidget, ProgressWidget, RectWidget, ResourcePackBuilder,
    ScreenBuilder, ScreenInfo, Texture, TextureKind, TextureSession,
};
use std::sync::Arc;

fn main() {
    env_logger::init();

    let fonts = CanvasFonts::generate("canvas");
    let mut session = TextureSession::new("canvas");

    let divider = Arc::new(Texture::solid(
        150,
        1,
        TextureKind::Widget { target_y: 28 },
        &mut session,
    ));
    let bar = Arc::new(Texture::solid(
        256,
        3,
        TextureKind::Widget { target_y: 44 },
        &mut session,
    ));

    let mut screen = ScreenBuilder::new(&fonts, ScreenInfo::generic_9x6());
    screen.set_title("Backpack");
    screen.add_widget(10, 20, LabelWidget::new("Upgrades"));
    screen.add_widget(
        160,
        20,
        LabelWidget::colored("3/4", Color::rgb(0x55ff55)),
    );
    screen.add_widget(
        13,
        34,
        RectWidget::new(Arc::clone(&divider), Color::GRAY),
    );
    screen.add_widget(
        13,
        50,
        ProgressWidget::with_progress(Arc::clone(&bar), 0.75),
    );

    let title = screen.compile();
    println!("{}", title.to_json().expect("title serializes"));

    let mut pack = ResourcePackBuilder::new();
    pack.add_absolute_collection(fonts.absolute())
        .expect("line fonts serialize");
    pack.add_spacer(fonts.spacer()).expect("spacer serializes");
    pack.add_texture(&divider).expect("divider serializes");
    pack.add_texture(&bar).expect("bar serializes");

    let out = std::path::Path::new("target/backpack-pack");
    for file in pack.files() {
        let path = out.join(&file.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create pack dirs");
        }
        std::fs::write(&path, &file.bytes).expect("write pack file");
    }
    println!("wrote {} resource files to {}", pack.files().len(), out.display());
}
