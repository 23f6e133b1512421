//! WASM API exports for JavaScript interop
//!
//! `JsSmokechart` owns one chart and hands path strings back to JavaScript,
//! which does the actual drawing. Only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use error_stack::Report;
use js_sys::Array;
use parking_lot::Mutex;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use crate::SmokeError;
use crate::chart::Smokechart;
use crate::core::{ChartConfig, parse_matrix};

fn js_error(report: Report<SmokeError>) -> JsValue {
    JsValue::from_str(&format!("{report:#}"))
}

/// JavaScript-accessible smoke chart
#[wasm_bindgen]
pub struct JsSmokechart {
    chart: Arc<Mutex<Smokechart>>,
}

#[wasm_bindgen]
impl JsSmokechart {
    /// Create a chart from a JSON sample matrix and an optional JSON
    /// `ChartConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(data_json: &str, config_json: Option<String>) -> Result<JsSmokechart, JsValue> {
        let config: ChartConfig = match config_json.as_deref() {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse chart config: {}", e)))?,
            None => ChartConfig::default(),
        };
        let raw = parse_matrix(data_json).map_err(js_error)?;
        let chart = Smokechart::new(&raw, config).map_err(js_error)?;
        Ok(JsSmokechart {
            chart: Arc::new(Mutex::new(chart)),
        })
    }

    /// Replace the sample matrix.
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, data_json: &str) -> Result<(), JsValue> {
        let raw = parse_matrix(data_json).map_err(js_error)?;
        let mut chart = self.chart.lock();
        chart.replace_data(&raw);
        web_sys::console::debug_1(&format!("smokechart: {} buckets", chart.bucket_count()).into());
        Ok(())
    }

    #[wasm_bindgen(js_name = fitDomains)]
    pub fn fit_domains(&mut self) {
        self.chart.lock().fit_domains();
    }

    /// One SVG path string per band layer, outermost first.
    #[wasm_bindgen(js_name = bandPaths)]
    pub fn band_paths(&self) -> Result<Array, JsValue> {
        let paths = self.chart.lock().band_paths().map_err(js_error)?;
        Ok(paths
            .iter()
            .map(|p| JsValue::from_str(&p.to_string()))
            .collect())
    }

    #[wasm_bindgen(js_name = linePath)]
    pub fn line_path(&self, q: f64) -> Result<String, JsValue> {
        let path = self.chart.lock().line_path(q).map_err(js_error)?;
        Ok(path.to_string())
    }

    #[wasm_bindgen(js_name = errorPath)]
    pub fn error_path(&self) -> String {
        self.chart.lock().error_path().to_string()
    }

    /// The full styled scene for quantile `q`, as JSON.
    #[wasm_bindgen(js_name = sceneJson)]
    pub fn scene_json(&self, q: f64) -> Result<String, JsValue> {
        let scene = self.chart.lock().scene(q).map_err(js_error)?;
        serde_json::to_string(&scene)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize scene: {}", e)))
    }

    #[wasm_bindgen(getter)]
    pub fn buckets(&self) -> usize {
        self.chart.lock().bucket_count()
    }
}
