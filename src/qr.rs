//! 二维码图片处理
//!
//! 服务端返回 base64 编码的 PNG，这里负责解码并转成终端可显示的半块字符

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{GrayImage, ImageFormat};

use crate::error::QrError;

/// 亮度低于该值视为深色模块
const DARK_THRESHOLD: u8 = 128;

pub fn decode_png_bytes(encoded: &str) -> Result<Vec<u8>, QrError> {
    Ok(STANDARD.decode(encoded.trim())?)
}

pub fn decode_png(encoded: &str) -> Result<GrayImage, QrError> {
    let bytes = decode_png_bytes(encoded)?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
    Ok(image.to_luma8())
}

/// 把图片缩放为正方形并用半块字符表示，每行文本对应两行像素
pub fn half_block_lines(image: &GrayImage, max_cols: u16, max_rows: u16) -> Vec<String> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || max_cols == 0 || max_rows == 0 {
        return Vec::new();
    }

    let side = u32::from(max_cols)
        .min(u32::from(max_rows) * 2)
        .min(width.max(height));

    let is_dark = |x: u32, y: u32| {
        let px = sample_index(x, width, side);
        let py = sample_index(y, height, side);
        image.get_pixel(px, py).0[0] < DARK_THRESHOLD
    };

    (0..side)
        .step_by(2)
        .map(|y| {
            (0..side)
                .map(|x| {
                    let top = is_dark(x, y);
                    let bottom = y + 1 < side && is_dark(x, y + 1);
                    match (top, bottom) {
                        (true, true) => '█',
                        (true, false) => '▀',
                        (false, true) => '▄',
                        (false, false) => ' ',
                    }
                })
                .collect()
        })
        .collect()
}

/// 第 `i` 个输出格对应的源像素下标（最近邻）
fn sample_index(i: u32, len: u32, side: u32) -> u32 {
    let scaled = u64::from(i) * u64::from(len) / u64::from(side);
    scaled.min(u64::from(len - 1)) as u32
}
