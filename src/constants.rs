// ITU-R BT.601 derived RGB <-> YUV matrices (analog YUV, no offsets).
// Rows produce the first, second and third output component.

pub const RGB_TO_YUV: [[f64; 3]; 3] = [
    [0.299, 0.587, 0.114],
    [-0.14713, -0.28886, 0.436],
    [0.615, -0.51499, -0.10001],
];

pub const YUV_TO_RGB: [[f64; 3]; 3] = [
    [1.0, 0.0, 1.13983],
    [1.0, -0.39465, -0.58060],
    [1.0, 2.03211, 0.0],
];

pub const MAX_SAMPLE_VALUE: f64 = 255.0;

// Default number of subband decomposition levels
pub const DEFAULT_DECOMPOSITION_LEVELS: u32 = 1;
