//! Pixel adjustments on interleaved 8-bit buffers
//!
//! Only the first three channels of each pixel are touched.

/// Brightness and contrast as a 256 entry lookup table.
///
/// Brightness adds `(b - 100) * 2.55` and clamps; contrast scales around 128
/// by `c / 100` and clamps again.
pub fn tone_curve(brightness: u8, contrast: u8) -> [u8; 256] {
    let offset = (brightness as f64 - 100.0) * 2.55;
    let gain = contrast as f64 / 100.0;

    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        let brightened = (value as f64 + offset).clamp(0.0, 255.0);
        let contrasted = ((brightened - 128.0) * gain + 128.0).clamp(0.0, 255.0);
        *slot = contrasted.round() as u8;
    }
    lut
}

pub fn adjust_tone(data: &mut [u8], channels: usize, brightness: u8, contrast: u8) {
    if brightness == 100 && contrast == 100 {
        return;
    }

    let lut = tone_curve(brightness, contrast);
    for pixel in data.chunks_exact_mut(channels) {
        for value in pixel.iter_mut().take(3) {
            *value = lut[*value as usize];
        }
    }
}

/// Unsharp step against the 4-neighbour mean.
///
/// Runs only when `sharpness > 100`, with strength `(s / 100 - 1) * 0.5`.
/// Border pixels are left as they are. Neighbours are read from the
/// unsharpened buffer.
pub fn sharpen(data: &mut [u8], width: usize, height: usize, channels: usize, sharpness: u8) {
    if sharpness <= 100 || width < 3 || height < 3 {
        return;
    }

    let factor = (sharpness as f64 / 100.0 - 1.0) * 0.5;
    let stride = width * channels;
    // Unsharpened copies of the row above and the current row. The row below
    // has not been written yet, so it is read in place.
    let mut above = data[..stride].to_vec();
    let mut row = vec![0u8; stride];

    for y in 1..height - 1 {
        let start = y * stride;
        row.copy_from_slice(&data[start..start + stride]);

        for x in 1..width - 1 {
            let offset = x * channels;
            for c in 0..3 {
                let center = row[offset + c] as f64;
                let neighbours = (above[offset + c] as f64
                    + data[start + stride + offset + c] as f64
                    + row[offset - channels + c] as f64
                    + row[offset + channels + c] as f64)
                    / 4.0;
                let value = center + (center - neighbours) * factor;
                data[start + offset + c] = value.clamp(0.0, 255.0).round() as u8;
            }
        }

        std::mem::swap(&mut above, &mut row);
    }
}
