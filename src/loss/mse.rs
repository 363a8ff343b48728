use crate::math::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Sum of squared differences over every element of a batch.
    pub fn sum_squared(predicted: &Matrix, expected: &Matrix) -> f32 {
        assert_eq!(predicted.shape(), expected.shape());
        predicted
            .as_slice()
            .iter()
            .zip(expected.as_slice())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }
}
