use crate::identify::BlockDescriptor;
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect as DrawRect;

const BAND_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const SAMPLE_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

fn draw_rect(x: u32, y: u32, width: u32, height: u32) -> DrawRect {
    DrawRect::at(x as i32, y as i32).of_size(width.max(1), height.max(1))
}

/// Text caption for a block: `width:name RRGGBB -> instruction`, with the
/// sampled average as hex. Unmapped blocks read `unknown`.
pub fn block_label(block: &BlockDescriptor, instruction: Option<&str>) -> String {
    let [r, g, b] = block.average;
    format!(
        "{}:{} {:02X}{:02X}{:02X} -> {}",
        block.width_units,
        block.color.name,
        r,
        g,
        b,
        instruction.unwrap_or("unknown")
    )
}

/// Frame on the left with band and sample outlines, one swatch per block on
/// the right.
///
/// Each swatch row shows the sampled average color followed by the matched
/// palette color, drawn `width_units` cells wide at the band's height.
pub fn render_overlay(frame: &RgbImage, blocks: &[BlockDescriptor]) -> RgbImage {
    let (width, height) = frame.dimensions();
    let mut canvas = RgbImage::new(width * 2, height);
    imageops::replace(&mut canvas, frame, 0, 0);

    let panel_x = width + width / 10;
    let cell = (width / 10).max(4);

    for block in blocks {
        let band = block.rect;
        let sample = block.sample_rect;
        draw_hollow_rect_mut(&mut canvas, draw_rect(band.x, band.y, band.width, band.height), BAND_COLOR);
        draw_hollow_rect_mut(
            &mut canvas,
            draw_rect(sample.x, sample.y, sample.width, sample.height),
            SAMPLE_COLOR,
        );

        let row_y = band.y + band.height / 10;
        let row_h = band.height - band.height / 5;
        draw_filled_rect_mut(
            &mut canvas,
            draw_rect(panel_x, row_y, cell, row_h),
            Rgb(block.average),
        );
        for unit in 0..block.width_units {
            let x = panel_x + cell * (unit + 1) + cell / 4;
            if x >= canvas.width() {
                break;
            }
            draw_filled_rect_mut(
                &mut canvas,
                draw_rect(x, row_y, cell - cell / 8, row_h),
                Rgb(block.color.rgb),
            );
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorEntry;
    use crate::identify::Rect;

    fn red_block() -> BlockDescriptor {
        BlockDescriptor {
            rect: Rect::new(20, 30, 50, 20),
            sample_rect: Rect::new(40, 38, 10, 4),
            average: [200, 20, 10],
            color: ColorEntry::new("red", [255, 0, 0]),
            width_units: 2,
        }
    }

    #[test]
    fn label_names_key_average_and_instruction() {
        let block = red_block();
        assert_eq!(block_label(&block, Some("turn_right")), "2:red C8140A -> turn_right");
        assert_eq!(block_label(&block, None), "2:red C8140A -> unknown");
    }

    #[test]
    fn overlay_marks_bands_and_swatches() {
        let frame = RgbImage::from_pixel(100, 80, Rgb([10, 10, 10]));
        let canvas = render_overlay(&frame, &[red_block()]);
        assert_eq!(canvas.dimensions(), (200, 80));
        assert_eq!(canvas.get_pixel(20, 30), &BAND_COLOR);
        assert_eq!(canvas.get_pixel(40, 38), &SAMPLE_COLOR);
        assert_eq!(canvas.get_pixel(5, 5), &Rgb([10, 10, 10]));
        // average swatch, then the first palette cell
        assert_eq!(canvas.get_pixel(111, 40), &Rgb([200, 20, 10]));
        assert_eq!(canvas.get_pixel(124, 40), &Rgb([255, 0, 0]));
    }
}
