use glam::Vec4;

/// Encode a linear channel value with the sRGB transfer curve
pub fn linear_to_srgb(value: f32) -> f32 {
    let v = value.clamp(0.0, 1.0);
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Pack a linear RGBA color into sRGB-encoded 8-bit channels.
/// Alpha is stored linearly.
pub fn to_srgba8(color: Vec4) -> [u8; 4] {
    let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        quantize(linear_to_srgb(color.x)),
        quantize(linear_to_srgb(color.y)),
        quantize(linear_to_srgb(color.z)),
        quantize(color.w),
    ]
}
