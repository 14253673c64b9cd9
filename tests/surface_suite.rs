use glitchfolio::surface::{clamp_copy, BlendMode, CopyRect, CopyRequest, PixelBuffer, Rgba8};

fn req(src_x: i64, src_y: i64, dst_x: i64, dst_y: i64, width: i64, height: i64) -> CopyRequest {
    CopyRequest {
        src_x,
        src_y,
        dst_x,
        dst_y,
        width,
        height,
    }
}

fn rect(src_x: usize, src_y: usize, dst_x: usize, dst_y: usize, width: usize, height: usize) -> CopyRect {
    CopyRect {
        src_x,
        src_y,
        dst_x,
        dst_y,
        width,
        height,
    }
}

/// Paints each pixel with its own coordinates so copies can be traced.
fn coordinate_buffer(w: usize, h: usize) -> PixelBuffer {
    let mut buf = PixelBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            buf.set_pixel(
                x as f32,
                y as f32,
                Rgba8::new(x as u8, y as u8, 0, 255),
                BlendMode::Normal,
            );
        }
    }
    buf
}

// ── clamp_copy ──────────────────────────────────────────────────────────────

#[test]
fn negative_destination_shifts_source_and_shrinks_width() {
    assert_eq!(
        clamp_copy(req(0, 10, -5, 10, 100, 4), 100, 50),
        Some(rect(5, 10, 0, 10, 95, 4))
    );
}

#[test]
fn right_and_bottom_overflow_shrink_the_span() {
    assert_eq!(
        clamp_copy(req(0, 0, 30, 40, 100, 20), 100, 50),
        Some(rect(0, 0, 30, 40, 70, 10))
    );
    assert_eq!(
        clamp_copy(req(90, 45, 0, 0, 30, 30), 100, 50),
        Some(rect(90, 45, 0, 0, 10, 5))
    );
}

#[test]
fn negative_source_moves_destination() {
    assert_eq!(
        clamp_copy(req(-3, -2, 10, 10, 8, 8), 100, 50),
        Some(rect(0, 0, 13, 12, 5, 6))
    );
}

#[test]
fn empty_copies_are_no_ops() {
    assert_eq!(clamp_copy(req(0, 0, -100, 0, 100, 4), 100, 50), None);
    assert_eq!(clamp_copy(req(0, 0, 100, 0, 10, 4), 100, 50), None);
    assert_eq!(clamp_copy(req(0, 0, 0, 0, 0, 4), 100, 50), None);
    assert_eq!(clamp_copy(req(0, 0, 0, 0, 10, -1), 100, 50), None);
    assert_eq!(clamp_copy(req(0, 0, 0, 0, 10, 10), 0, 0), None);
}

#[test]
fn extreme_requests_do_not_overflow() {
    assert_eq!(clamp_copy(req(i64::MIN, 0, i64::MAX, 0, i64::MAX, 1), 10, 10), None);
    assert_eq!(
        clamp_copy(req(0, 0, 0, 0, i64::MAX, i64::MAX), 10, 10),
        Some(rect(0, 0, 0, 0, 10, 10))
    );
}

// ── PixelBuffer ─────────────────────────────────────────────────────────────

#[test]
fn new_buffer_is_opaque_black() {
    let buf = PixelBuffer::new(3, 2);
    assert_eq!(buf.pixels().len(), 24);
    assert!(buf.pixels().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    assert_eq!(buf.pixel(3, 0), None);
}

#[test]
fn fade_darkens_toward_black() {
    let mut buf = PixelBuffer::new(1, 1);
    buf.fill(Rgba8::grey(255, 255));
    buf.fade(35);
    assert_eq!(buf.pixel(0, 0), Some([220, 220, 220, 255]));
    for _ in 0..200 {
        buf.fade(35);
    }
    // Rounding leaves a faint floor, as a canvas wash does.
    let [r, g, b, a] = buf.pixel(0, 0).unwrap();
    assert!(r <= 3 && r == g && g == b);
    assert_eq!(a, 255);
}

#[test]
fn blend_modes() {
    let mut buf = PixelBuffer::new(3, 1);
    buf.fill(Rgba8::grey(100, 255));
    buf.set_pixel(0.0, 0.0, Rgba8::new(200, 0, 0, 255), BlendMode::Normal);
    buf.set_pixel(1.0, 0.0, Rgba8::new(200, 0, 0, 255), BlendMode::Add);
    buf.set_pixel(2.0, 0.0, Rgba8::new(255, 0, 0, 255), BlendMode::Screen);
    assert_eq!(buf.pixel(0, 0), Some([200, 0, 0, 255]));
    assert_eq!(buf.pixel(1, 0), Some([255, 100, 100, 255]));
    assert_eq!(buf.pixel(2, 0), Some([255, 100, 100, 255]));
}

#[test]
fn half_alpha_normal_blend_mixes() {
    let mut buf = PixelBuffer::new(1, 1);
    buf.set_pixel(0.0, 0.0, Rgba8::grey(200, 0).alpha(127.5), BlendMode::Normal);
    assert_eq!(buf.pixel(0, 0), Some([100, 100, 100, 255]));
}

#[test]
fn fill_rect_clips_to_the_buffer() {
    let mut buf = PixelBuffer::new(4, 4);
    buf.fill_rect(-2.0, 2.0, 4.0, 10.0, Rgba8::grey(255, 255), BlendMode::Normal);
    for y in 0..4 {
        for x in 0..4 {
            let lit = x < 2 && y >= 2;
            let v = if lit { 255 } else { 0 };
            assert_eq!(buf.pixel(x, y), Some([v, v, v, 255]), "({x},{y})");
        }
    }
    // Fully outside, NaN and zero alpha are all no-ops.
    let before = buf.pixels().to_vec();
    buf.fill_rect(10.0, 10.0, 5.0, 5.0, Rgba8::grey(9, 255), BlendMode::Normal);
    buf.fill_rect(f32::NAN, 0.0, 5.0, 5.0, Rgba8::grey(9, 255), BlendMode::Normal);
    buf.fill_rect(0.0, 0.0, 5.0, 5.0, Rgba8::grey(9, 0), BlendMode::Normal);
    buf.set_pixel(-1.0, 0.0, Rgba8::grey(9, 255), BlendMode::Normal);
    assert_eq!(buf.pixels(), &before[..]);
}

#[test]
fn horizontal_line_covers_the_row() {
    let mut buf = PixelBuffer::new(5, 3);
    buf.line(0.0, 1.5, 5.0, 1.5, Rgba8::grey(255, 255), BlendMode::Normal);
    for x in 0..5 {
        assert_eq!(buf.pixel(x, 1), Some([255, 255, 255, 255]));
        assert_eq!(buf.pixel(x, 0), Some([0, 0, 0, 255]));
        assert_eq!(buf.pixel(x, 2), Some([0, 0, 0, 255]));
    }
}

#[test]
fn copy_moves_a_block() {
    let mut buf = coordinate_buffer(8, 8);
    let copied = buf.copy(req(1, 1, 4, 5, 3, 2)).unwrap();
    assert_eq!(copied, rect(1, 1, 4, 5, 3, 2));
    assert_eq!(buf.pixel(4, 5), Some([1, 1, 0, 255]));
    assert_eq!(buf.pixel(6, 6), Some([3, 2, 0, 255]));
    // Outside the destination nothing changed.
    assert_eq!(buf.pixel(7, 7), Some([7, 7, 0, 255]));
}

#[test]
fn overlapping_copies_read_the_original_rows() {
    let mut down = coordinate_buffer(4, 8);
    down.copy(req(0, 0, 0, 2, 4, 5)).unwrap();
    for y in 2..7 {
        assert_eq!(down.pixel(0, y), Some([0, (y - 2) as u8, 0, 255]));
    }

    let mut up = coordinate_buffer(4, 8);
    up.copy(req(0, 2, 0, 0, 4, 5)).unwrap();
    for y in 0..5 {
        assert_eq!(up.pixel(0, y), Some([0, (y + 2) as u8, 0, 255]));
    }
}

#[test]
fn row_shift_left_wraps_nothing_in() {
    let mut buf = coordinate_buffer(10, 3);
    let copied = buf.copy(req(0, 1, -4, 1, 10, 1)).unwrap();
    assert_eq!(copied, rect(4, 1, 0, 1, 6, 1));
    assert_eq!(buf.pixel(0, 1), Some([4, 1, 0, 255]));
    assert_eq!(buf.pixel(5, 1), Some([9, 1, 0, 255]));
    // The tail of the row keeps its old pixels.
    assert_eq!(buf.pixel(9, 1), Some([9, 1, 0, 255]));
}

#[test]
fn resize_clears_to_the_new_size() {
    let mut buf = coordinate_buffer(4, 4);
    buf.resize(6, 2);
    assert_eq!((buf.width(), buf.height()), (6, 2));
    assert!(buf.pixels().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}
