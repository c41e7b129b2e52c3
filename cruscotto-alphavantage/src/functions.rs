//! Knowledge of Alpha Vantage endpoints: response shapes and query layout.

use cruscotto_core::{CruscottoError, PayloadShape, SeriesRequest};

/// Economic, treasury and commodity endpoints answer `{"data": [{date, value}]}`.
const DATA_ARRAY: PayloadShape = PayloadShape::Array {
    path: &["data"],
    date_field: "date",
    value_field: "value",
};

const ECONOMIC: &[&str] = &[
    "REAL_GDP",
    "REAL_GDP_PER_CAPITA",
    "TREASURY_YIELD",
    "FEDERAL_FUNDS_RATE",
    "CPI",
    "INFLATION",
    "RETAIL_SALES",
    "DURABLES",
    "UNEMPLOYMENT",
    "NONFARM_PAYROLL",
    "WTI",
    "BRENT",
    "NATURAL_GAS",
    "COPPER",
    "ALUMINUM",
    "WHEAT",
    "CORN",
    "COTTON",
    "SUGAR",
    "COFFEE",
    "ALL_COMMODITIES",
];

// Endpoints that accept an `interval` parameter.
const WITH_INTERVAL: &[&str] = &[
    "REAL_GDP",
    "TREASURY_YIELD",
    "FEDERAL_FUNDS_RATE",
    "CPI",
    "WTI",
    "BRENT",
    "NATURAL_GAS",
    "COPPER",
    "ALUMINUM",
    "WHEAT",
    "CORN",
    "COTTON",
    "SUGAR",
    "COFFEE",
    "ALL_COMMODITIES",
];

const fn keyed(path: &'static [&'static str]) -> PayloadShape {
    PayloadShape::KeyedObject {
        path,
        close_field: "4. close",
    }
}

pub fn shape_for(function: &str) -> Result<PayloadShape, CruscottoError> {
    match function {
        "FX_DAILY" => Ok(keyed(&["Time Series FX (Daily)"])),
        "FX_WEEKLY" => Ok(keyed(&["Time Series FX (Weekly)"])),
        "FX_MONTHLY" => Ok(keyed(&["Time Series FX (Monthly)"])),
        "TIME_SERIES_DAILY" => Ok(keyed(&["Time Series (Daily)"])),
        "TIME_SERIES_MONTHLY" => Ok(keyed(&["Monthly Time Series"])),
        f if ECONOMIC.contains(&f) => Ok(DATA_ARRAY),
        other => Err(CruscottoError::unsupported(format!(
            "alphavantage function {other}"
        ))),
    }
}

/// Query pairs for `req`, without the API key.
pub fn query_pairs(req: &SeriesRequest) -> Result<Vec<(String, String)>, CruscottoError> {
    let function = req.series.code.as_str();
    let mut out = vec![("function".to_string(), function.to_string())];

    if let Some(item) = &req.series.item {
        if function.starts_with("FX_") {
            let (from, to) = item.split_once('/').ok_or_else(|| {
                CruscottoError::InvalidArg(format!("FX pair must look like USD/KRW, got {item}"))
            })?;
            out.push(("from_symbol".into(), from.trim().to_string()));
            out.push(("to_symbol".into(), to.trim().to_string()));
        } else {
            out.push(("symbol".into(), item.clone()));
        }
    }

    for (k, v) in &req.series.params {
        out.push((k.clone(), v.clone()));
    }
    if WITH_INTERVAL.contains(&function) && !req.series.params.contains_key("interval") {
        out.push(("interval".into(), req.cycle.as_str().to_string()));
    }
    out.push(("outputsize".into(), "full".into()));
    Ok(out)
}

/// Provider text of an in-payload error, if the body carries one.
pub fn payload_error(body: &serde_json::Value) -> Option<String> {
    ["Error Message", "Information", "Note"]
        .iter()
        .find_map(|k| body.get(*k))
        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
}
