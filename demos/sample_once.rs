use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use host_telemetry::prelude::{CpuUtilizationMonitor, GpuTemperatureMonitor, HardwareMonitor, Telemetry};
use host_telemetry::{get_cpu_temperature, get_cpu_usage, get_gpu_info, init_tracing, sample_gpu_info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing("host_telemetry=debug")?;

    println!("Host Telemetry Example");
    println!("======================");

    // Blocking API
    println!("\nBlocking calls:");
    println!("---------------");
    match get_cpu_usage() {
        Ok(usage) => println!("CPU Usage: {:.1}%", usage),
        Err(e) => println!("CPU Usage: unavailable ({})", e),
    }
    println!("CPU Temperature: {:.1}°C", get_cpu_temperature());

    let gpu = get_gpu_info();
    println!("GPU Usage: {:.1}%", gpu.usage);
    println!("GPU Temperature: {:.1}°C", gpu.temperature);
    println!("GPU Status: {}", sample_gpu_info().status);

    // Async monitors over the shared context
    println!("\nMonitors:");
    println!("---------");
    let telemetry = Telemetry::global();
    let cpu_monitor = CpuUtilizationMonitor::new(Arc::clone(&telemetry), "cpu0".to_string());
    let gpu_monitor = GpuTemperatureMonitor::new(Arc::clone(&telemetry), "gpu0".to_string());

    for _ in 0..3 {
        match cpu_monitor.get_metric().await {
            Ok(metric) => println!("{}: {:.1}%", cpu_monitor.name().await?, metric.value.as_f64()),
            Err(e) => println!("{}: {}", cpu_monitor.name().await?, e),
        }
        let temperature = gpu_monitor.get_metric().await?;
        println!("{}: {:.1}°C", gpu_monitor.name().await?, temperature.value.as_celsius());
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    // One snapshot of everything
    let snapshot = telemetry.snapshot().await?;
    println!("\nSnapshot:");
    println!("---------");
    println!("{}", serde_json::to_string_pretty(&snapshot.value)?);

    Ok(())
}
