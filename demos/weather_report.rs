use trendline::{ForecastClient, TrendlineError, WeatherReport, DEFAULT_HIGH_TEMPERATURE};

#[tokio::main]
async fn main() -> Result<(), TrendlineError> {
    let city = std::env::args().nth(1).unwrap_or_else(|| "Karachi".to_string());
    let client = ForecastClient::from_env()?;

    let report = WeatherReport::fetch(&client, &city, DEFAULT_HIGH_TEMPERATURE).await?;

    if let Some(current) = &report.current {
        println!(
            "{}: {:.1} °C, {} % humidity ({})",
            city,
            current.temperature,
            current.humidity,
            current.description.as_deref().unwrap_or("no description")
        );
    }
    if let Some(alert) = report.alert {
        println!("Alert: {alert}");
    }

    println!("\nHourly mean temperature:");
    for bucket in &report.hourly {
        println!(
            "  {:02}:00  {:6.2} °C  ({} readings)",
            bucket.key, bucket.mean_measurement, bucket.count
        );
    }

    println!("\nMonthly mean temperature:");
    for bucket in &report.monthly {
        println!("  {:<10} {:6.2} °C", bucket.key, bucket.mean_measurement);
    }

    match &report.prediction {
        Ok(prediction) => println!(
            "\nPredicted temperature at {:02}:00: {:.2} °C",
            prediction.next_hour, prediction.value
        ),
        Err(e) => println!("\nInsufficient data for prediction: {e}"),
    }
    Ok(())
}
