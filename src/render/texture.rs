use std::path::Path;

use image::GenericImageView;

use crate::constants::*;

/// Loads a texture atlas from a 4x4 grid image and re-packs it into
/// layer-major order (one layer per tile, row by row). Returns the pixel
/// data plus the square tile edge length.
pub fn load_texture_atlas_from_file<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, u32), String> {
    let img = image::open(path).map_err(|e| format!("Failed to load texture: {}", e))?;
    let rgba = img.to_rgba8();
    let (width, height) = img.dimensions();

    if width % ATLAS_SIZE != 0 || height % ATLAS_SIZE != 0 {
        return Err(format!(
            "Texture atlas dimensions {}x{} not divisible by {}",
            width, height, ATLAS_SIZE
        ));
    }

    let tile_w = width / ATLAS_SIZE;
    let tile_h = height / ATLAS_SIZE;

    if tile_w != tile_h {
        return Err(format!(
            "Texture atlas tiles are not square: {}x{}",
            tile_w, tile_h
        ));
    }

    let mut layers = Vec::with_capacity((width * height * 4) as usize);

    for i in 0..ATLAS_TILES {
        let col = i % ATLAS_SIZE;
        let row = i / ATLAS_SIZE;
        let start_x = col * tile_w;
        let start_y = row * tile_h;

        for y in 0..tile_h {
            for x in 0..tile_w {
                let pixel = rgba.get_pixel(start_x + x, start_y + y);
                layers.extend_from_slice(&pixel.0);
            }
        }
    }

    Ok((layers, tile_w))
}

/// Procedural fallback atlas: one RGBA layer per tile index, layer-major.
pub fn generate_texture_atlas() -> Vec<u8> {
    let total_pixels = (TEXTURE_SIZE * TEXTURE_SIZE * ATLAS_TILES) as usize;
    let mut data = vec![0u8; total_pixels * 4];

    let set_pixel = |data: &mut [u8], tex_idx: u32, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8| {
        let layer_size = (TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize;
        let layer_offset = (tex_idx as usize) * layer_size;
        let pixel_offset = ((y * TEXTURE_SIZE + x) * 4) as usize;
        let idx = layer_offset + pixel_offset;

        if idx + 3 < data.len() {
            data[idx] = r;
            data[idx + 1] = g;
            data[idx + 2] = b;
            data[idx + 3] = a;
        }
    };

    let hash = |x: u32, y: u32, seed: u32| -> u8 {
        let n = x
            .wrapping_mul(374761393)
            .wrapping_add(y.wrapping_mul(668265263))
            .wrapping_add(seed);
        let n = (n ^ (n >> 13)).wrapping_mul(1274126177);
        ((n ^ (n >> 16)) & 0xFF) as u8
    };

    for tex_idx in 0..ATLAS_TILES {
        for y in 0..TEXTURE_SIZE {
            for x in 0..TEXTURE_SIZE {
                let (r, g, b, a) = match tex_idx as u8 {
                    TEX_GRASS_TOP => {
                        let noise = hash(x, y, 0) as i32 - 128;
                        let g_val = (110 + noise / 8).clamp(70, 150) as u8;
                        (50, g_val, 30, 255)
                    }
                    TEX_GRASS_SIDE => {
                        // Dirt with a green strip along the top edge
                        if y < 5 {
                            let noise = hash(x, y, 1) as i32 - 128;
                            let g_val = (110 + noise / 8).clamp(70, 150) as u8;
                            (50, g_val, 30, 255)
                        } else {
                            let noise = hash(x, y, 1) as i32 - 128;
                            let v = (120 + noise / 6).clamp(80, 160);
                            (v as u8, (v * 2 / 3) as u8, (v / 3) as u8, 255)
                        }
                    }
                    TEX_DIRT => {
                        let noise = hash(x, y, 2) as i32 - 128;
                        let v = (120 + noise / 6).clamp(80, 160);
                        (v as u8, (v * 2 / 3) as u8, (v / 3) as u8, 255)
                    }
                    TEX_STONE => {
                        let noise = hash(x, y, 3) as i32 - 128;
                        let v = (130 + noise / 6).clamp(90, 170) as u8;
                        (v, v, v, 255)
                    }
                    TEX_SAND => {
                        let noise = hash(x, y, 4) as i32 - 128;
                        let v = (210 + noise / 10).clamp(180, 235);
                        (v as u8, (v - 25) as u8, (v / 2) as u8, 255)
                    }
                    TEX_WATER => {
                        // Faint horizontal wave bands
                        let band = ((y * 5 / TEXTURE_SIZE) % 2) * 12;
                        (40, (100 + band) as u8, (200 + band) as u8, 185)
                    }
                    TEX_SNOW => {
                        let noise = hash(x, y, 6) as i32 - 128;
                        let v = (240 + noise / 16).clamp(225, 255) as u8;
                        (v, v, 255, 255)
                    }
                    TEX_FLOWER => {
                        let cx = TEXTURE_SIZE as i32 / 2;
                        let dx = x as i32 - cx;
                        let dy = y as i32 - TEXTURE_SIZE as i32 / 4;
                        if dx * dx + dy * dy < (TEXTURE_SIZE as i32 / 5).pow(2) {
                            (210, 50, 60, 255) // petals
                        } else if dx.abs() <= 1 && y >= TEXTURE_SIZE / 4 {
                            (40, 130, 40, 255) // stem
                        } else {
                            (0, 0, 0, 0)
                        }
                    }
                    _ => {
                        // Unassigned tiles get the classic missing-texture
                        // checker so stray indices stand out.
                        let checker = ((x / 8) + (y / 8)) % 2 == 0;
                        if checker { (255, 0, 220, 255) } else { (10, 0, 10, 255) }
                    }
                };
                set_pixel(&mut data, tex_idx, x, y, r, g, b, a);
            }
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_atlas_has_one_layer_per_tile() {
        let data = generate_texture_atlas();
        assert_eq!(
            data.len(),
            (TEXTURE_SIZE * TEXTURE_SIZE * ATLAS_TILES * 4) as usize
        );
    }

    #[test]
    fn water_tile_is_translucent_and_solids_are_opaque() {
        let data = generate_texture_atlas();
        let layer_size = (TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize;
        let alpha_at = |tile: u8| data[tile as usize * layer_size + 3];
        assert!(alpha_at(TEX_WATER) < 255);
        assert_eq!(alpha_at(TEX_STONE), 255);
        assert_eq!(alpha_at(TEX_DIRT), 255);
    }

    #[test]
    fn flower_tile_has_transparent_background() {
        let data = generate_texture_atlas();
        let layer_size = (TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize;
        // Top-left corner of the flower tile is background.
        assert_eq!(data[TEX_FLOWER as usize * layer_size + 3], 0);
    }
}
