use crate::core::metrics::Metric;
use crate::core::types::{Percentage, Temperature};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for monitoring hardware components
///
/// This trait defines the core functionality for hardware monitoring.
/// Implementors should provide a way to get metrics for their specific hardware component.
///
/// # Examples
///
/// ```rust
/// use host_telemetry::core::metrics::Metric;
/// use host_telemetry::core::types::Temperature;
/// use host_telemetry::traits::{HardwareMonitor, TemperatureMonitor};
/// use host_telemetry::Result;
///
/// struct FixedSensor;
///
/// #[async_trait::async_trait]
/// impl HardwareMonitor for FixedSensor {
///     type MetricType = Temperature;
///
///     async fn get_metric(&self) -> Result<Metric<Self::MetricType>> {
///         Ok(Metric::new(Temperature::new(42.0)))
///     }
///
///     async fn name(&self) -> Result<String> {
///         Ok("Fixed Sensor".to_string())
///     }
///
///     async fn hardware_type(&self) -> Result<String> {
///         Ok("test".to_string())
///     }
///
///     async fn device_id(&self) -> Result<String> {
///         Ok("fixed0".to_string())
///     }
/// }
///
/// #[async_trait::async_trait]
/// impl TemperatureMonitor for FixedSensor {}
/// ```
#[async_trait]
pub trait HardwareMonitor: Send + Sync {
    /// The type of metric this monitor produces
    type MetricType: Clone + Send + Sync + 'static;

    /// Get the current metric value
    async fn get_metric(&self) -> Result<Metric<Self::MetricType>>;

    /// Get the name of the hardware component
    async fn name(&self) -> Result<String>;

    /// Get the type of hardware component
    async fn hardware_type(&self) -> Result<String>;

    /// Get the unique device identifier
    async fn device_id(&self) -> Result<String>;
}

/// Trait for temperature monitoring
///
/// Provides temperature-specific monitoring functionality.
#[async_trait]
pub trait TemperatureMonitor: HardwareMonitor<MetricType = Temperature> {
    /// Get the current temperature in Celsius
    async fn temperature(&self) -> Result<f64> {
        Ok(self.get_metric().await?.value.as_celsius())
    }
}

/// Trait for utilization monitoring
///
/// Provides utilization-specific monitoring functionality.
#[async_trait]
pub trait UtilizationMonitor: HardwareMonitor<MetricType = Percentage> {
    /// Get the current utilization percentage
    async fn utilization(&self) -> Result<f64> {
        Ok(self.get_metric().await?.value.as_f64())
    }
}
