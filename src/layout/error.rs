/// Caller contract violations detected before any placement work starts.
///
/// The engine never fails on well-formed input; a label that cannot find a
/// free spot is reported through [`super::Placement::degraded`] instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid canvas {width}x{height} (padding {padding}): {reason}")]
    InvalidCanvas {
        width: f32,
        height: f32,
        padding: f32,
        reason: &'static str,
    },
    #[error("item {index} ({label:?}) has weight {weight}; weights must be finite and positive")]
    InvalidWeight {
        index: usize,
        label: String,
        weight: f32,
    },
    #[error("item {index} has an empty label")]
    EmptyLabel { index: usize },
    #[error("invalid font size range [{min}, {max}]")]
    InvalidSizeRange { min: f32, max: f32 },
    #[error("layout option {field} = {value}: {reason}")]
    InvalidConfig {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
    #[error("text footprint for item {index} ({label:?}) is {width}x{height}; must be finite")]
    InvalidFootprint {
        index: usize,
        label: String,
        width: f32,
        height: f32,
    },
}
