//! Next-hour prediction from a two-feature ordinary least squares fit.
//!
//! The model regresses `measurement` on `[hour_of_day, auxiliary]` with an
//! intercept. Features and target are centered first so the intercept drops
//! out and only a 2x2 system remains, which is solved in closed form. When
//! that centered system has rank 1 (e.g. two observations, or hour and
//! auxiliary moving in lockstep) the minimum-norm least-squares solution is
//! returned, the same answer a pseudo-inverse based solver gives. When no
//! feature varies at all there is nothing to regress on and the fit fails
//! with [`SeriesError::SingularMatrix`].

use crate::series::error::SeriesError;
use crate::types::point::TimeSeriesPoint;
use log::debug;

/// Below this, `det / (g11 * g22)` (one minus the squared feature correlation)
/// is treated as zero and the centered Gram matrix as rank 1.
const RANK_TOLERANCE: f64 = 1e-12;

/// A fitted linear model `y = intercept + c0 * x0 + c1 * x1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: [f64; 2],
}

impl LinearModel {
    /// Fits the model by ordinary least squares.
    ///
    /// # Errors
    ///
    /// * [`SeriesError::InsufficientData`] with fewer than two rows.
    /// * [`SeriesError::MalformedInput`] if the row counts differ or any value is not finite.
    /// * [`SeriesError::SingularMatrix`] if every row has identical features.
    pub fn fit(features: &[[f64; 2]], targets: &[f64]) -> Result<Self, SeriesError> {
        if features.len() != targets.len() {
            return Err(SeriesError::malformed(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        let n = features.len();
        if n < 2 {
            return Err(SeriesError::InsufficientData {
                required: 2,
                found: n,
            });
        }
        if features.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
            return Err(SeriesError::malformed("non-finite value in regression input"));
        }
        if features.iter().all(|row| *row == features[0]) {
            return Err(SeriesError::SingularMatrix);
        }

        let count = n as f64;
        let x_mean = [
            features.iter().map(|r| r[0]).sum::<f64>() / count,
            features.iter().map(|r| r[1]).sum::<f64>() / count,
        ];
        let y_mean = targets.iter().sum::<f64>() / count;

        let (mut g11, mut g12, mut g22, mut b1, mut b2) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (row, y) in features.iter().zip(targets) {
            let x0 = row[0] - x_mean[0];
            let x1 = row[1] - x_mean[1];
            let yc = y - y_mean;
            g11 += x0 * x0;
            g12 += x0 * x1;
            g22 += x1 * x1;
            b1 += x0 * yc;
            b2 += x1 * yc;
        }

        let det = g11 * g22 - g12 * g12;
        let coefficients = if g11 > 0.0 && g22 > 0.0 && det > RANK_TOLERANCE * g11 * g22 {
            [(g22 * b1 - g12 * b2) / det, (g11 * b2 - g12 * b1) / det]
        } else {
            // Rank 1: G = t * v v^T with t = trace(G), so pinv(G) = G / t^2.
            let trace = g11 + g22;
            let scale = trace * trace;
            debug!("Centered Gram matrix has rank 1, using minimum-norm solution");
            [(g11 * b1 + g12 * b2) / scale, (g12 * b1 + g22 * b2) / scale]
        };

        let intercept = y_mean - coefficients[0] * x_mean[0] - coefficients[1] * x_mean[1];
        Ok(Self {
            intercept,
            coefficients,
        })
    }

    pub fn predict(&self, features: [f64; 2]) -> f64 {
        self.intercept + self.coefficients[0] * features[0] + self.coefficients[1] * features[1]
    }
}

/// Result of [`predict_next`]: the predicted measurement and the inputs it was evaluated at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Hour following the last observation, wrapping 23 to 0.
    pub next_hour: u32,
    /// Mean of all observed auxiliary values.
    pub mean_auxiliary: f64,
    pub value: f64,
    pub model: LinearModel,
}

/// Fits `measurement ~ hour_of_day + auxiliary` over `points` and predicts the
/// next hour at the mean auxiliary value.
///
/// "Next hour" is one past the hour of the *last* point in input order, modulo 24.
///
/// # Errors
///
/// See [`LinearModel::fit`].
///
/// # Example
///
/// ```
/// use trendline::{predict_next, TimeSeriesPoint};
///
/// let points = vec![
///     TimeSeriesPoint::parse("2024-05-01 21:00:00", "Karachi", Some(30.0), Some(55.0))?,
///     TimeSeriesPoint::parse("2024-05-01 22:00:00", "Karachi", Some(29.0), Some(60.0))?,
///     TimeSeriesPoint::parse("2024-05-01 23:00:00", "Karachi", Some(27.5), Some(58.0))?,
/// ];
/// let prediction = predict_next(&points)?;
/// assert_eq!(prediction.next_hour, 0);
/// assert!((prediction.mean_auxiliary - 173.0 / 3.0).abs() < 1e-12);
/// # Ok::<(), trendline::SeriesError>(())
/// ```
pub fn predict_next(points: &[TimeSeriesPoint]) -> Result<Prediction, SeriesError> {
    let features: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [p.hour_of_day() as f64, p.auxiliary])
        .collect();
    let targets: Vec<f64> = points.iter().map(|p| p.measurement).collect();
    let model = LinearModel::fit(&features, &targets)?;

    // fit() guarantees at least two points.
    let last_hour = points.last().map(|p| p.hour_of_day()).unwrap_or_default();
    let next_hour = (last_hour + 1) % 24;
    let mean_auxiliary = points.iter().map(|p| p.auxiliary).sum::<f64>() / points.len() as f64;

    let value = model.predict([next_hour as f64, mean_auxiliary]);
    debug!(
        "Predicted {:.3} for hour {} at auxiliary {:.3} from {} points",
        value,
        next_hour,
        mean_auxiliary,
        points.len()
    );

    Ok(Prediction {
        next_hour,
        mean_auxiliary,
        value,
        model,
    })
}

/// Shorthand for [`predict_next`] returning only the predicted value.
pub fn fit_predict(points: &[TimeSeriesPoint]) -> Result<f64, SeriesError> {
    predict_next(points).map(|p| p.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(day: u32, hour: u32, humidity: f64, temp: f64) -> TimeSeriesPoint {
        let ts = Utc.with_ymd_and_hms(2024, 7, day, hour, 0, 0).unwrap();
        TimeSeriesPoint::new(ts, "Karachi", temp, humidity)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_two_point_wraparound_scenario() {
        let points = vec![reading(1, 22, 60.0, 15.0), reading(1, 23, 62.0, 14.0)];
        let prediction = predict_next(&points).unwrap();

        assert_eq!(prediction.next_hour, 0);
        assert_eq!(prediction.mean_auxiliary, 61.0);
        // Minimum-norm solution: coefficients (-0.2, -0.4), intercept 43.4.
        assert_close(prediction.model.coefficients[0], -0.2);
        assert_close(prediction.model.coefficients[1], -0.4);
        assert_close(prediction.model.intercept, 43.4);
        assert_close(prediction.value, 19.0);
        // The fit still passes through both observations.
        assert_close(prediction.model.predict([22.0, 60.0]), 15.0);
        assert_close(prediction.model.predict([23.0, 62.0]), 14.0);
    }

    #[test]
    fn test_identical_features_are_singular() {
        let points = vec![
            reading(1, 5, 50.0, 18.0),
            reading(2, 5, 50.0, 19.0),
            reading(3, 5, 50.0, 17.0),
        ];
        assert_eq!(predict_next(&points).unwrap_err(), SeriesError::SingularMatrix);
    }

    #[test]
    fn test_insufficient_data() {
        let err = fit_predict(&[reading(1, 5, 50.0, 18.0)]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::InsufficientData {
                required: 2,
                found: 1
            }
        );
        assert!(matches!(
            fit_predict(&[]),
            Err(SeriesError::InsufficientData { found: 0, .. })
        ));
    }

    #[test]
    fn test_full_rank_recovers_exact_plane() {
        // temp = 1 + 2 * hour + 0.5 * humidity
        let points = vec![
            reading(1, 1, 10.0, 8.0),
            reading(1, 2, 14.0, 12.0),
            reading(1, 3, 10.0, 12.0),
        ];
        let prediction = predict_next(&points).unwrap();

        assert_close(prediction.model.intercept, 1.0);
        assert_close(prediction.model.coefficients[0], 2.0);
        assert_close(prediction.model.coefficients[1], 0.5);
        assert_eq!(prediction.next_hour, 4);
        assert_close(prediction.value, 1.0 + 8.0 + 0.5 * (34.0 / 3.0));
    }

    #[test]
    fn test_overdetermined_fit_minimises_residuals() {
        // Noisy data: the OLS residuals must be orthogonal to each centered feature.
        let points = vec![
            reading(1, 0, 70.0, 24.1),
            reading(1, 3, 72.0, 23.4),
            reading(1, 6, 65.0, 25.9),
            reading(1, 9, 55.0, 29.8),
            reading(1, 12, 48.0, 32.6),
            reading(1, 15, 50.0, 31.7),
            reading(1, 18, 61.0, 28.2),
            reading(1, 21, 68.0, 25.5),
        ];
        let model = predict_next(&points).unwrap().model;

        let n = points.len() as f64;
        let mean_h = points.iter().map(|p| p.hour_of_day() as f64).sum::<f64>() / n;
        let mean_a = points.iter().map(|p| p.auxiliary).sum::<f64>() / n;
        let (mut dot_h, mut dot_a, mut sum_r) = (0.0, 0.0, 0.0);
        for p in &points {
            let h = p.hour_of_day() as f64;
            let r = p.measurement - model.predict([h, p.auxiliary]);
            dot_h += r * (h - mean_h);
            dot_a += r * (p.auxiliary - mean_a);
            sum_r += r;
        }
        assert!(dot_h.abs() < 1e-8);
        assert!(dot_a.abs() < 1e-8);
        assert!(sum_r.abs() < 1e-8);
    }

    #[test]
    fn test_constant_auxiliary_still_fits_on_hour() {
        // Only the hour varies; the auxiliary column carries no signal.
        let points = vec![
            reading(1, 10, 40.0, 20.0),
            reading(1, 11, 40.0, 22.0),
            reading(1, 12, 40.0, 24.0),
        ];
        let prediction = predict_next(&points).unwrap();
        assert_close(prediction.model.coefficients[0], 2.0);
        assert_close(prediction.model.coefficients[1], 0.0);
        assert_close(prediction.value, 26.0);
    }

    #[test]
    fn test_non_finite_input_is_malformed() {
        let points = vec![reading(1, 1, 10.0, f64::NAN), reading(1, 2, 12.0, 4.0)];
        assert!(matches!(
            fit_predict(&points),
            Err(SeriesError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_mismatched_lengths_are_malformed() {
        let err = LinearModel::fit(&[[1.0, 2.0], [2.0, 3.0]], &[1.0]).unwrap_err();
        assert!(matches!(err, SeriesError::MalformedInput { .. }));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let points = vec![
            reading(1, 4, 80.0, 12.0),
            reading(1, 7, 75.0, 14.5),
            reading(1, 10, 60.0, 19.0),
        ];
        assert_eq!(predict_next(&points).unwrap(), predict_next(&points).unwrap());
    }
}
