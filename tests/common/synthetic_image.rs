use degrade::Image;

/// Smooth, non-constant test image with values inside [0, 1]
pub fn gradient(height: usize, width: usize, channels: usize) -> Image {
    Image::from_shape_fn((height, width, channels), |(y, x, c)| {
        let fy = y as f32 / height.max(1) as f32;
        let fx = x as f32 / width.max(1) as f32;
        (0.2 + 0.6 * fy * fx + 0.1 * c as f32).min(1.0)
    })
}

/// Checkerboard of `cell`-sized squares in {0, 1}, replicated on every channel
pub fn checkerboard(height: usize, width: usize, channels: usize, cell: usize) -> Image {
    Image::from_shape_fn((height, width, channels), |(y, x, _)| {
        ((y / cell + x / cell) % 2) as f32
    })
}
