//! QR 卡片渲染：左側文字、右側 QR，850×450 白底 PNG。

use crate::domain::model::Summary;
use crate::domain::ports::Storage;
use crate::utils::error::{ExportError, Result};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use qrcode::{EcLevel, QrCode};
use rusttype::{point, Font, Scale};
use std::io::Cursor;
use std::path::Path;

pub const CANVAS_WIDTH: u32 = 850;
pub const CANVAS_HEIGHT: u32 = 450;
/// QR 區塊左上角，區塊大小為 450×450
pub const QR_OFFSET_X: u32 = 400;
pub const QR_REGION: u32 = 450;

const MODULE_SIZE: u32 = 10;
const QUIET_ZONE_MODULES: u32 = 4;
const TEXT_ORIGIN: (f32, f32) = (20.0, 50.0);
const LINE_GAP: f32 = 18.0;

/// 以 L 級糾錯編碼，版本取能容納內容的最小值。
///
/// 模組預設 10px；超出 450px 區塊時縮小模組尺寸。
pub fn render_qr(payload: &str) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)?;
    let modules = code.width() as u32 + 2 * QUIET_ZONE_MODULES;
    let module_size = (QR_REGION / modules).clamp(1, MODULE_SIZE);

    tracing::debug!(
        "QR version {:?}, {} modules, {}px per module",
        code.version(),
        code.width(),
        module_size
    );

    Ok(code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(module_size, module_size)
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .build())
}

pub fn encode_png(canvas: RgbImage) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub struct QrRenderer<S: Storage> {
    storage: S,
    font: Font<'static>,
    font_size: f32,
}

impl<S: Storage> QrRenderer<S> {
    pub fn new(storage: S, font: Font<'static>, font_size: f32) -> Self {
        Self {
            storage,
            font,
            font_size,
        }
    }

    /// 字型檔不存在或無法解析時整個流程失敗
    pub fn from_font_file<P: AsRef<Path>>(storage: S, path: P, font_size: f32) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ExportError::FontError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| ExportError::FontError {
            path: path.display().to_string(),
            reason: "unsupported or corrupt font data".to_string(),
        })?;

        tracing::debug!("Loaded font {} at {}px", path.display(), font_size);
        Ok(Self::new(storage, font, font_size))
    }

    /// 先畫文字再貼上 QR，過長的文字會被 QR 蓋住
    pub fn compose(&self, summary: &Summary) -> Result<RgbImage> {
        let qr = DynamicImage::ImageLuma8(render_qr(&summary.text_block())?).to_rgb8();
        let mut canvas = RgbImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgb([255, 255, 255]));

        let (x, mut y) = TEXT_ORIGIN;
        for line in summary.lines() {
            self.draw_line(&mut canvas, x, y, &line);
            y += self.font_size + LINE_GAP;
        }

        image::imageops::overlay(&mut canvas, &qr, i64::from(QR_OFFSET_X), 0);
        Ok(canvas)
    }

    /// 寫出 `qrcode_<Uid>.png`，回傳檔名
    pub async fn render(&self, summary: &Summary) -> Result<String> {
        let canvas = self.compose(summary)?;
        let png = encode_png(canvas)?;
        let file_name = summary.file_name();

        tracing::debug!("Writing {} ({} bytes)", file_name, png.len());
        self.storage.write_file(&file_name, &png).await?;
        Ok(file_name)
    }

    fn draw_line(&self, canvas: &mut RgbImage, x: f32, y: f32, text: &str) {
        let scale = Scale::uniform(self.font_size);
        let v_metrics = self.font.v_metrics(scale);
        let baseline = point(x, y + v_metrics.ascent);

        for glyph in self.font.layout(text, scale, baseline) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= canvas.width() || py >= canvas.height() {
                    return;
                }
                // 黑字，依覆蓋率與底色混合
                let keep = 1.0 - coverage.clamp(0.0, 1.0);
                let pixel = canvas.get_pixel_mut(px, py);
                for channel in pixel.0.iter_mut() {
                    *channel = (f32::from(*channel) * keep).round() as u8;
                }
            });
        }
    }
}
