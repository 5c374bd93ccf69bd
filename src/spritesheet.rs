//! Contact sheets - packs finished textures into one preview grid

use image::{imageops, Rgba, RgbaImage};

/// Transparent color used for padding
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pack textures into a grid, one per cell, row-major.
///
/// # Arguments
///
/// * `cells` - Textures to place; `None` leaves a cell empty
/// * `columns` - Cells per row (at least 1)
/// * `padding` - Transparent gap between cells, in pixels
///
/// Every cell is sized to the largest texture; smaller ones sit in the
/// top-left corner of their cell.
///
/// # Examples
///
/// ```
/// use image::RgbaImage;
/// use mockart::spritesheet::render_contact_sheet;
///
/// let strip = RgbaImage::from_pixel(8, 2, image::Rgba([255, 0, 0, 255]));
/// let cells = vec![Some(&strip), Some(&strip), None, Some(&strip)];
///
/// let sheet = render_contact_sheet(&cells, 2, 1);
/// assert_eq!(sheet.width(), 8 * 2 + 1);
/// assert_eq!(sheet.height(), 2 * 2 + 1);
/// ```
pub fn render_contact_sheet(cells: &[Option<&RgbaImage>], columns: u32, padding: u32) -> RgbaImage {
    let present = cells.iter().flatten();
    let cell_width = present.clone().map(|img| img.width()).max().unwrap_or(0);
    let cell_height = present.map(|img| img.height()).max().unwrap_or(0);
    if cells.is_empty() || cell_width == 0 || cell_height == 0 {
        return RgbaImage::from_pixel(1, 1, TRANSPARENT);
    }

    let columns = columns.clamp(1, cells.len() as u32);
    let rows = (cells.len() as u32).div_ceil(columns);
    let width = columns * cell_width + (columns - 1) * padding;
    let height = rows * cell_height + (rows - 1) * padding;
    let mut sheet = RgbaImage::from_pixel(width, height, TRANSPARENT);

    for (i, cell) in cells.iter().enumerate() {
        let Some(image) = cell else { continue };
        let col = i as u32 % columns;
        let row = i as u32 / columns;
        let x = col * (cell_width + padding);
        let y = row * (cell_height + padding);
        imageops::replace(&mut sheet, *image, x as i64, y as i64);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    #[test]
    fn test_empty_cells() {
        let sheet = render_contact_sheet(&[], 4, 2);
        assert_eq!(sheet.dimensions(), (1, 1));
        assert_eq!(*sheet.get_pixel(0, 0), TRANSPARENT);

        let sheet = render_contact_sheet(&[None, None], 2, 0);
        assert_eq!(sheet.dimensions(), (1, 1));
    }

    #[test]
    fn test_grid_with_padding() {
        let red = Rgba([255, 0, 0, 255]);
        let green = Rgba([0, 255, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let (a, b, c) = (solid(4, 2, red), solid(4, 2, green), solid(4, 2, blue));

        let sheet = render_contact_sheet(&[Some(&a), Some(&b), Some(&c)], 2, 1);
        assert_eq!(sheet.dimensions(), (9, 5));

        assert_eq!(*sheet.get_pixel(0, 0), red);
        assert_eq!(*sheet.get_pixel(4, 0), TRANSPARENT); // gap column
        assert_eq!(*sheet.get_pixel(5, 0), green);
        assert_eq!(*sheet.get_pixel(0, 2), TRANSPARENT); // gap row
        assert_eq!(*sheet.get_pixel(0, 3), blue);
        assert_eq!(*sheet.get_pixel(5, 3), TRANSPARENT); // empty trailing cell
    }

    #[test]
    fn test_cells_sized_to_largest() {
        let red = Rgba([255, 0, 0, 255]);
        let green = Rgba([0, 255, 0, 255]);
        let small = solid(2, 2, red);
        let large = solid(6, 3, green);

        let sheet = render_contact_sheet(&[Some(&small), Some(&large)], 2, 0);
        assert_eq!(sheet.dimensions(), (12, 3));
        assert_eq!(*sheet.get_pixel(1, 1), red);
        assert_eq!(*sheet.get_pixel(3, 0), TRANSPARENT);
        assert_eq!(*sheet.get_pixel(6, 0), green);
    }

    #[test]
    fn test_missing_cell_keeps_position() {
        let red = Rgba([255, 0, 0, 255]);
        let a = solid(2, 2, red);
        let sheet = render_contact_sheet(&[None, Some(&a)], 2, 0);
        assert_eq!(*sheet.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*sheet.get_pixel(2, 0), red);
    }

    #[test]
    fn test_columns_clamped() {
        let a = solid(2, 2, Rgba([1, 2, 3, 255]));
        let sheet = render_contact_sheet(&[Some(&a), Some(&a)], 0, 0);
        assert_eq!(sheet.dimensions(), (2, 4));

        let sheet = render_contact_sheet(&[Some(&a), Some(&a)], 10, 0);
        assert_eq!(sheet.dimensions(), (4, 2));
    }
}
