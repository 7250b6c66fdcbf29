use trendline::{
    load_tickers, normalized_to_frame, summary_to_frame, PointFilter, StockComparison,
    TrendlineError,
};

// Usage: compare_stocks AAPL.csv NFLX.csv
// The ticker name is taken from each file stem.
#[tokio::main]
async fn main() -> Result<(), TrendlineError> {
    let sources: Vec<(String, String)> = std::env::args()
        .skip(1)
        .map(|path| {
            let ticker = std::path::Path::new(&path)
                .file_stem()
                .map(|s| s.to_string_lossy().to_uppercase())
                .unwrap_or_else(|| path.clone());
            (path, ticker)
        })
        .collect();

    let points = load_tickers(&sources).await?;
    let comparison = StockComparison::build(points, &PointFilter::default());

    println!("{}", normalized_to_frame(&comparison.normalized)?);
    println!("{}", summary_to_frame(&comparison.summary)?);
    for (group, reason) in &comparison.skipped {
        println!("Skipped {group}: {reason}");
    }
    Ok(())
}
