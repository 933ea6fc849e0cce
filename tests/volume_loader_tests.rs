use std::path::PathBuf;

use glam::{UVec3, Vec3};
use volume_viewer::error::VolumeError;
use volume_viewer::volume::{load_raw, DataType, Volume};

/// Write `bytes` to a fresh file in the system temp directory
fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("volume-viewer-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[cfg(test)]
mod volume_loader_tests {
    use super::*;

    #[test]
    fn test_load_float32_cube() {
        let values: Vec<f32> = (0..27).map(|i| i as f32 * 0.5).collect();
        let path = temp_file("cube.raw", &f32_bytes(&values));

        let volume = load_raw(&path, DataType::Float32, None).unwrap();
        assert_eq!(volume.dims(), UVec3::splat(3));
        assert_eq!(volume.range().low, 0.0);
        assert_eq!(volume.range().high, 13.0);
        assert_eq!(volume.get(2, 0, 0), Some(1.0));
        assert_eq!(volume.get(0, 1, 0), Some(1.5));
        assert_eq!(volume.get(0, 0, 1), Some(4.5));
    }

    #[test]
    fn test_load_uses_file_name_dims() {
        let values = vec![1.0f32; 4 * 2 * 3];
        let path = temp_file("slab_4x2x3.raw", &f32_bytes(&values));

        let volume = load_raw(&path, DataType::Float32, None).unwrap();
        assert_eq!(volume.dims(), UVec3::new(4, 2, 3));
    }

    #[test]
    fn test_explicit_dims_win() {
        let values = vec![0.0f32; 8];
        let path = temp_file("pair_1x1x8.raw", &f32_bytes(&values));

        let volume = load_raw(&path, DataType::Float32, Some(UVec3::new(2, 2, 2))).unwrap();
        assert_eq!(volume.dims(), UVec3::splat(2));
    }

    #[test]
    fn test_load_uint8_and_uint16() {
        let path = temp_file("bytes.raw", &[0, 128, 255, 7, 1, 2, 3, 4]);
        let volume = load_raw(&path, DataType::Uint8, Some(UVec3::new(2, 2, 2))).unwrap();
        assert_eq!(volume.range().high, 255.0);

        let words: Vec<u8> = [1u16, 300, 65535, 0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let path = temp_file("words.raw", &words);
        let volume = load_raw(&path, DataType::Uint16, Some(UVec3::new(4, 1, 1))).unwrap();
        assert_eq!(volume.voxels(), &[1.0, 300.0, 65535.0, 0.0]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("volume-viewer-does-not-exist.raw");
        let err = load_raw(&path, DataType::Float32, None).unwrap_err();
        assert!(matches!(err, VolumeError::Io { .. }));
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[test]
    fn test_empty_file() {
        let path = temp_file("empty.raw", &[]);
        let err = load_raw(&path, DataType::Float32, None).unwrap_err();
        assert!(matches!(err, VolumeError::Empty(_)));
    }

    #[test]
    fn test_truncated_element() {
        let path = temp_file("odd.raw", &[0, 0, 0, 0, 1]);
        let err = load_raw(&path, DataType::Float32, None).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::TruncatedElement {
                size: 5,
                element_size: 4
            }
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let path = temp_file("short.raw", &f32_bytes(&[0.0; 7]));
        let err = load_raw(&path, DataType::Float32, Some(UVec3::new(2, 2, 2))).unwrap_err();
        assert!(matches!(
            err,
            VolumeError::DimensionMismatch {
                expected: 8,
                actual: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_overflowing_dims_are_an_error() {
        let path = temp_file("tiny.raw", &f32_bytes(&[0.0; 8]));
        let err = load_raw(&path, DataType::Float32, Some(UVec3::splat(3_000_000))).unwrap_err();
        assert!(matches!(err, VolumeError::TooLarge([3_000_000, 3_000_000, 3_000_000])));

        let path = temp_file("huge_3000000x3000000x3000000.raw", &f32_bytes(&[0.0; 8]));
        let err = load_raw(&path, DataType::Float32, None).unwrap_err();
        assert!(matches!(err, VolumeError::TooLarge(_)));
    }

    #[test]
    fn test_unknown_dimensions() {
        let path = temp_file("seven.raw", &f32_bytes(&[0.0; 7]));
        let err = load_raw(&path, DataType::Float32, None).unwrap_err();
        assert!(matches!(err, VolumeError::UnknownDimensions(7)));
    }

    #[test]
    fn test_bounds_follow_dims_and_spacing() {
        let volume = Volume::from_fn(UVec3::new(4, 2, 8), |_| 0.0)
            .unwrap()
            .with_spacing(Vec3::new(1.0, 2.0, 0.5));
        let bounds = volume.bounds();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = Volume::new(Vec::new(), UVec3::new(0, 2, 2)).unwrap_err();
        assert!(matches!(err, VolumeError::ZeroDimension([0, 2, 2])));
    }
}
