//! 描画画像
//!
//! 提出された画像の形式（PNG・サイズ・解像度）を検証し、
//! 白紙（単色）のキャンバスかどうかを判定します。

use image::{ImageFormat, RgbImage};

use super::error::DrawingError;

/// 画像の制約
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingConstraints {
    pub max_bytes: usize,
    pub min_resolution: u32,
}

/// 検証済みの描画画像
#[derive(Debug, Clone)]
pub struct Drawing {
    bytes: Vec<u8>,
    blank: bool,
}

impl Drawing {
    /// 画像を検証して Drawing を作成
    pub fn decode(bytes: Vec<u8>, constraints: DrawingConstraints) -> Result<Self, DrawingError> {
        if bytes.len() > constraints.max_bytes {
            return Err(DrawingError::TooLarge {
                size: bytes.len(),
                max: constraints.max_bytes,
            });
        }

        match image::guess_format(&bytes) {
            Ok(ImageFormat::Png) => {}
            _ => return Err(DrawingError::NotPng),
        }

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .map_err(|e| DrawingError::Undecodable(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());
        if width < constraints.min_resolution || height < constraints.min_resolution {
            return Err(DrawingError::ResolutionTooLow {
                width,
                height,
                min: constraints.min_resolution,
            });
        }

        let blank = is_uniform(&decoded.to_rgb8());

        Ok(Self { bytes, blank })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 何も描かれていない（全ピクセルが同じ色の）キャンバスか
    pub fn is_blank(&self) -> bool {
        self.blank
    }
}

fn is_uniform(image: &RgbImage) -> bool {
    let mut pixels = image.pixels();
    match pixels.next() {
        Some(first) => pixels.all(|p| p == first),
        None => true,
    }
}
