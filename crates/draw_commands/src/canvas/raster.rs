use image::{Rgb, RgbImage};

/// Coordinates are clamped to this magnitude before integer pixel math.
const COORD_LIMIT: f64 = (1u64 << 40) as f64;

/// Nearest pixel index for `v`, clamped so later offsets cannot overflow.
pub(crate) fn coord(v: f64) -> i64 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(-COORD_LIMIT, COORD_LIMIT) as i64
}

pub(crate) fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    img.put_pixel(x as u32, y as u32, color);
}

/// Inclusive pixel range `[lo, hi]` clipped to `[0, limit)`; `None` when empty.
fn clip(lo: f64, hi: f64, limit: u32) -> Option<(i64, i64)> {
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(limit as f64 - 1.0);
    if lo > hi {
        return None;
    }
    Some((lo as i64, hi as i64))
}

fn distance_to_segment(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Thick segment with round caps: every pixel whose centre lies within
/// `width / 2` of the segment.
pub(crate) fn line(img: &mut RgbImage, a: (f64, f64), b: (f64, f64), width: f64, color: Rgb<u8>) {
    let half = width.max(1.0) / 2.0;
    let Some((x0, x1)) = clip(a.0.min(b.0) - half, a.0.max(b.0) + half, img.width()) else {
        return;
    };
    let Some((y0, y1)) = clip(a.1.min(b.1) - half, a.1.max(b.1) + half, img.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if distance_to_segment(x as f64, y as f64, a, b) <= half {
                put(img, x, y, color);
            }
        }
    }
}

/// Circle outline; the stroke grows inward from `radius`.
pub(crate) fn ring(img: &mut RgbImage, center: (f64, f64), radius: f64, width: f64, color: Rgb<u8>) {
    let inner = radius - width.max(1.0);
    let Some((x0, x1)) = clip(center.0 - radius, center.0 + radius, img.width()) else {
        return;
    };
    let Some((y0, y1)) = clip(center.1 - radius, center.1 + radius, img.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = ((x as f64 - center.0).powi(2) + (y as f64 - center.1).powi(2)).sqrt();
            if d <= radius && d > inner {
                put(img, x, y, color);
            }
        }
    }
}

/// Outline of the inclusive box `[x, x+w] x [y, y+h]`; the border grows inward.
pub(crate) fn frame(
    img: &mut RgbImage,
    origin: (f64, f64),
    size: (f64, f64),
    width: f64,
    color: Rgb<u8>,
) {
    let (ax, bx) = (coord(origin.0), coord(origin.0 + size.0));
    let (ay, by) = (coord(origin.1), coord(origin.1 + size.1));
    let (left, right) = (ax.min(bx), ax.max(bx));
    let (top, bottom) = (ay.min(by), ay.max(by));
    let t = coord(width.max(1.0));

    let Some((x0, x1)) = clip(left as f64, right as f64, img.width()) else {
        return;
    };
    let Some((y0, y1)) = clip(top as f64, bottom as f64, img.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let on_border =
                x < left + t || x > right - t || y < top + t || y > bottom - t;
            if on_border {
                put(img, x, y, color);
            }
        }
    }
}

pub(crate) fn fill_block(img: &mut RgbImage, x: i64, y: i64, size: i64, color: Rgb<u8>) {
    if x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    for dy in 0..size {
        for dx in 0..size {
            put(img, x.saturating_add(dx), y.saturating_add(dy), color);
        }
    }
}
