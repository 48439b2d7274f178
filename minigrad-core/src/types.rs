/// Defines the possible data types for Tensor elements.
///
/// Every buffer is tagged with one of these so that kernels can dispatch
/// on the element type at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}
