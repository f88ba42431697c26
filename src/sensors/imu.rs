use super::{check_sigma, GaussianNoise, Sensor, SensorConfig, SensorKind, SensorMeasurement};
use crate::error::GncResult;
use heapless::HistoryBuffer;
use nalgebra::Vector3;

const IMU_HISTORY_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct ImuInput {
    /// True specific force [m/s^2].
    pub specific_force: Vector3<f64>,
    /// True body angular rate [rad/s].
    pub angular_rate: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    pub accel: Vector3<f64>,
    pub gyro: Vector3<f64>,
    pub timestamp: f64,
}

/// Three accelerometers and three gyroscopes with white noise and fixed bias.
///
/// Output layout is `[ax, ay, az, wx, wy, wz]`. The most recent samples are
/// retained for bias estimation by downstream filters.
#[derive(Debug)]
pub struct Imu {
    noise_accel: f64,
    noise_gyro: f64,
    bias_accel: Vector3<f64>,
    bias_gyro: Vector3<f64>,
    noise: GaussianNoise,
    history: HistoryBuffer<ImuSample, IMU_HISTORY_DEPTH>,
}

impl Imu {
    pub fn new(config: &SensorConfig, noise: GaussianNoise) -> GncResult<Self> {
        Ok(Self {
            noise_accel: check_sigma("imu accelerometer", config.imu_accel_noise)?,
            noise_gyro: check_sigma("imu gyroscope", config.imu_gyro_noise)?,
            bias_accel: config.imu_accel_bias,
            bias_gyro: config.imu_gyro_bias,
            noise,
            history: HistoryBuffer::new(),
        })
    }

    pub fn history(&self) -> impl Iterator<Item = &ImuSample> {
        self.history.oldest_ordered()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Sensor for Imu {
    type Input = ImuInput;

    fn kind(&self) -> SensorKind {
        SensorKind::Imu
    }

    fn measure(&mut self, input: &ImuInput, timestamp: f64) -> GncResult<SensorMeasurement> {
        let accel =
            input.specific_force + self.bias_accel + self.noise.sample_vector3(self.noise_accel);
        let gyro = input.angular_rate + self.bias_gyro + self.noise.sample_vector3(self.noise_gyro);

        self.history.write(ImuSample {
            accel,
            gyro,
            timestamp,
        });

        let data = accel.iter().chain(gyro.iter()).copied().collect();
        let uncertainty = [self.noise_accel; 3]
            .into_iter()
            .chain([self.noise_gyro; 3])
            .collect();

        Ok(SensorMeasurement::valid(
            SensorKind::Imu,
            data,
            uncertainty,
            timestamp,
        ))
    }
}
