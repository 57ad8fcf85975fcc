use sdl2::pixels::PixelFormatEnum;

use machine::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use machine::state::FrameBuffer;

/// Window pixels per machine pixel.
const SCALE: usize = 16;

/// RGB for a lit pixel and an unlit one.
const PIXEL_ON: [u8; 3] = [0x33, 0xFF, 0x77];
const PIXEL_OFF: [u8; 3] = [0x11, 0x11, 0x11];

/// # Renderer
/// Presents the 64x32 monochrome frame buffer as an upscaled SDL2
/// texture. `render` is only called when the machine reports that the
/// frame buffer changed.
pub struct Renderer {
    canvas: sdl2::render::WindowCanvas,
}

impl Renderer {
    /// Creates a window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `title` the window title, conventionally carrying the ROM name
    pub fn new(sdl: &sdl2::Sdl, title: &str) -> Self {
        let video_subsystem = sdl.video().unwrap();
        let window = video_subsystem
            .window(
                title,
                (DISPLAY_WIDTH * SCALE) as u32,
                (DISPLAY_HEIGHT * SCALE) as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .unwrap();
        let canvas = window.into_canvas().build().unwrap();

        Renderer { canvas }
    }

    /// Flattens a frame buffer into RGB24 texture bytes: rows
    /// concatenated, each 0/1 pixel expanded to its palette color.
    fn frame_to_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|&pixel| {
                if pixel == 0 {
                    PIXEL_OFF.iter().copied()
                } else {
                    PIXEL_ON.iter().copied()
                }
            })
            .collect()
    }

    /// Uploads the frame as an RGB24 streaming texture and presents it;
    /// the window scaling does the upscale.
    pub fn render(&mut self, frame: &FrameBuffer) {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .unwrap();

        texture
            .with_lock(None, |buffer: &mut [u8], _pitch: usize| {
                buffer.copy_from_slice(&Renderer::frame_to_texture(frame));
            })
            .unwrap();

        self.canvas.copy(&texture, None, None).unwrap();
        self.canvas.present()
    }
}
