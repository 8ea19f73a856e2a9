use radiometry::color::Color;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Linear-radiance image buffer the renderer accumulates into. Output happens at the very end:
/// gamma-encoded 8-bit PNG or linear 32-bit EXR.
pub struct Film {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Film {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::black(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, row: u32, col: u32) -> Color {
        self.pixels[(row * self.width + col) as usize]
    }

    /// The whole buffer, row-major; rows are `width` pixels long.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| c.gamma_encode().to_u8())
            .collect()
    }

    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let file = File::create(path.as_ref())
            .map_err(|e| format!("creating {}: {}", path.as_ref().display(), e))?;
        let ref mut w = BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(png::ColorType::RGB);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| format!("writing png header: {}", e))?;
        writer
            .write_image_data(&self.to_rgb8())
            .map_err(|e| format!("writing png data: {}", e))
    }

    pub fn write_exr<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        exr::prelude::write_rgb_file(
            path.as_ref(),
            self.width as usize,
            self.height as usize,
            |x, y| {
                let c = self.pixel(y as u32, x as u32);
                (c.r, c.g, c.b)
            },
        )
        .map_err(|e| format!("writing exr: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_row_major() {
        let mut film = Film::new(3, 2);
        film.pixels_mut()[4] = Color::white();
        assert_eq!(film.pixel(1, 1), Color::white());
        assert_eq!(film.pixel(0, 1), Color::black());
    }

    #[test]
    fn rgb8_gamma_encodes() {
        let mut film = Film::new(1, 1);
        film.pixels_mut()[0] = Color::gray(0.25);
        // sqrt(0.25) = 0.5 -> 127
        assert_eq!(film.to_rgb8(), vec![127, 127, 127]);
    }
}
