pub mod window;

use anyhow::Result;
use i_slint_backend_winit::Backend;
use image::RgbaImage;
use slint::{Image, Rgba8Pixel, SharedPixelBuffer};

use crate::ui::window::get_window_creation_settings;

/// Installs the winit backend.
/// Every window gets created with the attributes adjusted by
/// the current [window::window_creation_settings::WindowCreationSettings].
pub fn init_backend() -> Result<()> {
    let backend = Backend::builder()
        .with_window_attributes_hook(|attr| get_window_creation_settings().apply(attr))
        .build()?;
    slint::platform::set_platform(Box::new(backend))?;
    Ok(())
}

/// Copies [img] into a pixel buffer slint can display.
pub fn to_slint_image(img: &RgbaImage) -> Image {
    let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
        img.as_raw(),
        img.width(),
        img.height(),
    );
    Image::from_rgba8(buffer)
}

#[macro_export]
macro_rules! callback {
    ($prop:ident, |$app_ref:ident $(,)? $( $params:ident ),*| $handler:block) => {{
        $app_ref.$prop({
            let app_weak = $app_ref.as_weak();
            move |$( $params ),*| {
                let $app_ref = app_weak.unwrap();
                $handler
            }
        });
    }};
}
