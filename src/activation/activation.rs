use crate::math::Matrix;

/// Logistic sigmoid, `1 / (1 + e^-x)`.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed through its output `y = sigmoid(x)`:
/// `y * (1 - y)`.
pub fn sigmoid_slope(y: f32) -> f32 {
    y * (1.0 - y)
}

/// Applies `sigmoid` element-wise.
pub(crate) fn sigmoid_matrix(m: &Matrix) -> Matrix {
    m.map(sigmoid)
}

/// Back-propagation delta for a sigmoid layer: `error ⊙ y ⊙ (1 - y)`.
pub(crate) fn sigmoid_delta(error: &Matrix, activation: &Matrix) -> Matrix {
    error.hadamard(&activation.map(sigmoid_slope))
}
