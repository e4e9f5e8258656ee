//! HTML pages served to browsers

use forecast_core::ForecastResult;
use std::fmt::Write;

const STYLE: &str = "
        body { font-family: Arial, sans-serif; margin: 40px; line-height: 1.6; }
        h1, h2 { color: #333; }
        code { background-color: #f4f4f4; padding: 2px 5px; border-radius: 4px; }
        .table { border-collapse: collapse; width: 100%; margin-top: 20px; }
        .table tr:nth-child(even) { background-color: #f2f2f2; }
        th, td { padding: 8px; text-align: left; border: 1px solid #ddd; }
        th { background-color: #4CAF50; color: white; }";

/// Static documentation page for `GET /`
pub fn index_page() -> String {
    format!(
        r#"<html>
    <head>
        <title>Crude Oil Price Forecasting API</title>
        <style>{STYLE}
        </style>
    </head>
    <body>
        <h1>Crude Oil Price Forecasting API</h1>
        <p>This API provides ARIMA and SARIMA forecasting capabilities.</p>
        <h2>Endpoints:</h2>
        <ul>
            <li><code>POST /forecast?method=arima&amp;steps=10</code> - ARIMA forecast</li>
            <li><code>POST /forecast?method=sarima&amp;steps=10</code> - SARIMA forecast</li>
            <li><code>GET /health</code> - liveness probe</li>
        </ul>
        <p>The request body is a JSON array of future USD rates, one per step,
        or an object <code>{{"usd_rates": [...]}}</code>.
        Send <code>Accept: application/json</code> for a JSON response.</p>
        <h2>Parameters:</h2>
        <ul>
            <li><code>method</code>: Either "arima" or "sarima"</li>
            <li><code>steps</code>: Number of steps to forecast (default: 10)</li>
            <li><code>order_p</code>: AR order (default: 4)</li>
            <li><code>order_d</code>: Differencing order (default: 0)</li>
            <li><code>order_q</code>: MA order (default: 4)</li>
            <li><code>seasonal_p</code>: Seasonal AR order (SARIMA only, default: 0)</li>
            <li><code>seasonal_d</code>: Seasonal differencing (SARIMA only, default: 0)</li>
            <li><code>seasonal_q</code>: Seasonal MA order (SARIMA only, default: 0)</li>
            <li><code>seasonal_m</code>: Seasonal period (SARIMA only, default: 12)</li>
        </ul>
    </body>
</html>
"#
    )
}

/// Result page for a completed forecast
pub fn forecast_page(result: &ForecastResult) -> String {
    let method = result.kind.as_str().to_uppercase();

    let mut rows = String::new();
    for row in &result.rows {
        let _ = write!(
            rows,
            "\n                <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.date.format("%Y-%m-%d"),
            row.forecast,
            row.lower_ci,
            row.upper_ci
        );
    }

    let mut parameters = format!("<li>ARIMA Parameters: {}</li>", result.order);
    if let Some(seasonal) = result.seasonal_order {
        let _ = write!(parameters, "\n            <li>Seasonal Parameters: {}</li>", seasonal);
    }

    format!(
        r#"<html>
    <head>
        <title>{method} Forecast Results</title>
        <style>{STYLE}
        </style>
    </head>
    <body>
        <h1>{method} Forecast Results</h1>
        <p>Forecast for the next {steps} days:</p>
        <table class="table">
            <thead>
                <tr><th>date</th><th>forecast</th><th>lower_ci</th><th>upper_ci</th></tr>
            </thead>
            <tbody>{rows}
            </tbody>
        </table>
        <p><em>Model parameters: </em>{model}</p>
        <ul>
            {parameters}
        </ul>
    </body>
</html>
"#,
        steps = result.len(),
        model = result.model,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_core::models::{ModelOrder, SeasonalOrder};
    use forecast_core::{ForecastRow, ModelKind};

    fn result(kind: ModelKind, seasonal_order: Option<SeasonalOrder>) -> ForecastResult {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        ForecastResult {
            kind,
            model: "test".to_string(),
            order: ModelOrder::new(1, 1, 1),
            seasonal_order,
            confidence_level: 0.95,
            rows: vec![ForecastRow { date, forecast: 71.5, lower_ci: 70.0, upper_ci: 73.0 }],
        }
    }

    #[test]
    fn arima_page_omits_seasonal_parameters() {
        let page = forecast_page(&result(ModelKind::Arima, None));
        assert!(page.contains("<title>ARIMA Forecast Results</title>"));
        assert!(page.contains("Forecast for the next 1 days:"));
        assert!(page.contains("<td>2024-01-02</td><td>71.5</td><td>70</td><td>73</td>"));
        assert!(page.contains("ARIMA Parameters: (1, 1, 1)"));
        assert!(!page.contains("Seasonal Parameters"));
    }

    #[test]
    fn sarima_page_echoes_seasonal_parameters() {
        let page = forecast_page(&result(ModelKind::Sarima, Some(SeasonalOrder::new(1, 0, 1, 12))));
        assert!(page.contains("<h1>SARIMA Forecast Results</h1>"));
        assert!(page.contains("Seasonal Parameters: (1, 0, 1, 12)"));
    }

    #[test]
    fn index_lists_parameters() {
        let page = index_page();
        assert!(page.contains("Crude Oil Price Forecasting API"));
        assert!(page.contains("<code>seasonal_m</code>"));
    }
}
