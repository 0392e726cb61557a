//! Helpers shared by the CPU descriptor kernels

// ============================================================================
// DType Dispatch Macro
// ============================================================================

/// Macro for dtype dispatch to typed kernel code
///
/// Matches on a `DType` and executes the block with `$T` bound to the
/// corresponding Rust element type. Packed `I8x4` has no single-element
/// Rust type and makes the enclosing function return
/// `Err(Status::UnsupportedOp)`.
///
/// Usage: `dispatch_dtype!(dtype, T => { code using T })`
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                type $T = half::f16;
                $body
            }
            $crate::dtype::DType::BF16 => {
                type $T = half::bf16;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::I8x4 => {
                return Err($crate::runtime::Status::UnsupportedOp);
            }
        }
    };
}

pub(crate) use dispatch_dtype;

/// Visit every logical index of `dims` in row-major order
///
/// Calls `f` with the element offsets of that index under `x_strides` and
/// `y_strides`. Pass the same strides twice to walk a single layout.
pub(crate) fn for_each_offset_pair(
    dims: &[usize],
    x_strides: &[usize],
    y_strides: &[usize],
    mut f: impl FnMut(usize, usize),
) {
    let numel: usize = dims.iter().product();
    if numel == 0 {
        return;
    }

    let mut indices = [0usize; crate::tensor::MAX_DIMS];
    let rank = dims.len();

    for _ in 0..numel {
        let mut x_off = 0usize;
        let mut y_off = 0usize;
        for d in 0..rank {
            x_off += indices[d] * x_strides[d];
            y_off += indices[d] * y_strides[d];
        }
        f(x_off, y_off);

        // Increment indices (row-major order)
        for d in (0..rank).rev() {
            indices[d] += 1;
            if indices[d] < dims[d] {
                break;
            }
            indices[d] = 0;
        }
    }
}
