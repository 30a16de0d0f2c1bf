//! Transform helpers for bone matrices
//!
//! Bone records store affine transforms row-major with the translation in
//! the last column. In memory every transform is a [`glam::Mat4`]; at the
//! exporter boundary matrices go back out as 16 row-major floats.

use glam::{Mat4, Vec4};

/// Determinant magnitude below which a transform counts as singular
pub const SINGULAR_DETERMINANT: f32 = 1e-12;

/// 3x4 affine bone matrix (row-major storage, POD type)
///
/// Stores 3 rows of a 4x4 affine matrix. The implicit 4th row is [0, 0, 0, 1].
/// Each row stores [Xx, Xy, Xz, Tx] etc.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct BoneMatrix3x4 {
    /// First row: [m00, m01, m02, tx]
    pub row0: [f32; 4],
    /// Second row: [m10, m11, m12, ty]
    pub row1: [f32; 4],
    /// Third row: [m20, m21, m22, tz]
    pub row2: [f32; 4],
}

impl BoneMatrix3x4 {
    /// Identity bone matrix (no transformation)
    pub const IDENTITY: Self = Self {
        row0: [1.0, 0.0, 0.0, 0.0],
        row1: [0.0, 1.0, 0.0, 0.0],
        row2: [0.0, 0.0, 1.0, 0.0],
    };

    /// Create from flat f32 array (row-major)
    pub fn from_array(arr: [f32; 12]) -> Self {
        Self {
            row0: [arr[0], arr[1], arr[2], arr[3]],
            row1: [arr[4], arr[5], arr[6], arr[7]],
            row2: [arr[8], arr[9], arr[10], arr[11]],
        }
    }

    /// Expand to a full affine matrix
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(self.row0[0], self.row1[0], self.row2[0], 0.0),
            Vec4::new(self.row0[1], self.row1[1], self.row2[1], 0.0),
            Vec4::new(self.row0[2], self.row1[2], self.row2[2], 0.0),
            Vec4::new(self.row0[3], self.row1[3], self.row2[3], 1.0),
        )
    }
}

/// Build a matrix from 16 row-major floats
pub fn mat4_from_rows(values: [f32; 16]) -> Mat4 {
    Mat4::from_cols_array(&values).transpose()
}

/// Flatten a matrix to 16 row-major floats
pub fn mat4_to_rows(m: &Mat4) -> [f32; 16] {
    m.transpose().to_cols_array()
}

fn is_affine(m: &Mat4) -> bool {
    m.row(3) == Vec4::W
}

/// Invert a bone transform, or `None` if it is singular.
///
/// Affine transforms are inverted as `[R⁻¹ | -R⁻¹t]` with the cofactor
/// expansion written out, so the signs of zero components come straight from
/// the arithmetic. Each translation component is a sum of negated products
/// rather than a negated sum: a `+0` sum must stay `+0`. Nothing is rounded
/// or normalized afterwards.
pub fn invert_transform(m: &Mat4) -> Option<Mat4> {
    if !is_affine(m) {
        let det = m.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
            return None;
        }
        return Some(m.inverse());
    }

    let [a, b, c, tx] = m.row(0).to_array();
    let [d, e, f, ty] = m.row(1).to_array();
    let [g, h, i, tz] = m.row(2).to_array();

    let c00 = e * i - f * h;
    let c01 = f * g - d * i;
    let c02 = d * h - e * g;
    let det = a * c00 + b * c01 + c * c02;
    if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
        return None;
    }
    let inv_det = 1.0 / det;

    let r = [
        [c00 * inv_det, (c * h - b * i) * inv_det, (b * f - c * e) * inv_det],
        [c01 * inv_det, (a * i - c * g) * inv_det, (c * d - a * f) * inv_det],
        [c02 * inv_det, (b * g - a * h) * inv_det, (a * e - b * d) * inv_det],
    ];
    let t = r.map(|row| -row[0] * tx + -row[1] * ty + -row[2] * tz);

    Some(mat4_from_rows([
        r[0][0], r[0][1], r[0][2], t[0], //
        r[1][0], r[1][1], r[1][2], t[1], //
        r[2][0], r[2][1], r[2][2], t[2], //
        0.0, 0.0, 0.0, 1.0,
    ]))
}

/// Format one float for a text float array.
///
/// Always six decimals, except that a value whose decimals are all zero is
/// written as a whole number (`1`, `0`). A value with its sign bit set keeps
/// the `-`, so `-0.0` prints as `-0`.
pub fn format_float(value: f32) -> String {
    let mut text = format!("{:.6}", value.abs());
    if let Some(whole) = text.strip_suffix(".000000") {
        text.truncate(whole.len());
    }
    if value.is_sign_negative() && !value.is_nan() {
        text.insert(0, '-');
    }
    text
}

/// Space-separated text rendering of a float list
pub fn format_matrix_values(values: &[f32]) -> String {
    values
        .iter()
        .map(|&v| format_float(v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_bone_matrix_to_mat4() {
        let m = BoneMatrix3x4::from_array([
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0,
        ])
        .to_mat4();
        assert_eq!(m.row(0).to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.row(2).to_array(), [9.0, 10.0, 11.0, 12.0]);
        assert_eq!(m.row(3), Vec4::W);
        assert_eq!(BoneMatrix3x4::IDENTITY.to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_rows_roundtrip() {
        let rows = [
            0.0, -1.0, 0.0, 2.0, 1.0, 0.0, 0.0, 3.0, 0.0, 0.0, 1.0, 4.0, 0.0, 0.0, 0.0, 1.0,
        ];
        assert_eq!(mat4_to_rows(&mat4_from_rows(rows)), rows);
        // Translation lands in the last column
        assert_eq!(mat4_from_rows(rows).w_axis.truncate().to_array(), [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_invert_affine() {
        let m =
            Mat4::from_rotation_z(0.7) * Mat4::from_translation(glam::Vec3::new(1.0, -2.0, 3.0));
        let inv = invert_transform(&m).unwrap();
        assert!((m * inv).abs_diff_eq(Mat4::IDENTITY, EPS));
        assert!(inv.abs_diff_eq(m.inverse(), EPS));
    }

    #[test]
    fn test_invert_keeps_negative_zero() {
        // Root of a stock biped: 90 degree turn about Z, stored with -0 entries
        let m = mat4_from_rows([
            -0.0, -1.0, 0.0, 0.0, //
            1.0, -0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        let inv = mat4_to_rows(&invert_transform(&m).unwrap());
        assert_eq!(
            format_matrix_values(&inv),
            "-0 1 0 0 -1 -0 0 0 0 0 1 -0 0 0 0 1"
        );
    }

    #[test]
    fn test_invert_translation_signs_follow_products() {
        // A -0 translation inverts to +0: each row sums in a +0 product
        let m = mat4_from_rows([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, -0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        let inv = mat4_to_rows(&invert_transform(&m).unwrap());
        assert_eq!(format_matrix_values(&inv), "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1");

        let m = mat4_from_rows([
            1.0, 0.0, 0.0, 2.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        let inv = mat4_to_rows(&invert_transform(&m).unwrap());
        assert_eq!(format_matrix_values(&inv), "1 0 0 -2 0 1 0 -0 0 0 1 -0 0 0 0 1");
    }

    #[test]
    fn test_invert_singular() {
        let flat = Mat4::from_scale(glam::Vec3::new(1.0, 0.0, 1.0));
        assert!(invert_transform(&flat).is_none());

        let mut projective = Mat4::IDENTITY;
        projective.x_axis.w = 1.0;
        projective.w_axis.w = 1.0;
        projective.y_axis = Vec4::ZERO;
        assert!(invert_transform(&projective).is_none());
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(-0.0), "-0");
        assert_eq!(format_float(8.346858), "8.346858");
        assert_eq!(format_float(-0.000001), "-0.000001");
        assert_eq!(format_float(0.5), "0.500000");
        assert_eq!(format_float(0.4522), "0.452200");
        assert_eq!(format_float(-0.99999), "-0.999990");
        assert_eq!(format_float(12.0), "12");
        // Rounds to zero but keeps the sign it had
        assert_eq!(format_float(-0.0000001), "-0");
    }
}
