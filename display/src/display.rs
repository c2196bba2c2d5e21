use std::error::Error;

use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use vip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vip8_core::FrameBuffer;

/// # Display
/// The 64x32 monochrome frame buffer rendered through an SDL2 canvas.
///
/// `render` is only called when the interpreter reports a changed frame; the
/// whole buffer is uploaded as one RGB24 texture and scaled to the window.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    /// Opens the emulator window.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context to bind the window to
    /// * `scale` the window size multiplier for each pixel
    /// * `fullscreen` whether to take the whole screen instead of a window
    pub fn new(sdl: &sdl2::Sdl, scale: u32, fullscreen: bool) -> Result<Self, Box<dyn Error>> {
        let video = sdl.video()?;
        let mut window = video.window(
            "vip8",
            DISPLAY_WIDTH as u32 * scale,
            DISPLAY_HEIGHT as u32 * scale,
        );
        window.position_centered().opengl();
        if fullscreen {
            window.fullscreen();
        }
        let canvas = window.build()?.into_canvas().build()?;
        Ok(Display { canvas })
    }

    /// Formats a frame for rendering as an SDL2 texture.
    ///
    /// A texture is a 1D array of concatenated rows of RGB pixels, so each
    /// cell is triplicated and stretched from its 0/1 state to 0/255
    /// intensity.
    fn frame_to_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .rows()
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|cell| std::iter::repeat(cell).take(3))
            .map(|cell| cell * 255)
            .collect()
    }

    /// Uploads the frame as a streaming RGB24 texture and presents it.
    ///
    /// # Arguments
    /// * `frame` the interpreter's frame buffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), Box<dyn Error>> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;

        texture.with_lock(None, |buffer: &mut [u8], _pitch: usize| {
            buffer.copy_from_slice(&Display::frame_to_texture(frame));
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_texture() {
        let mut frame = FrameBuffer::new();
        frame.blit(0, 0, &[0b0100_0000]);
        frame.blit(0, 1, &[0b1000_0000]);
        let texture = Display::frame_to_texture(&frame);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(texture, expected);
    }
}
