use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::processing::normalize::NormalizationRange;
use crate::error::Result;
use crate::types::{PixelFormat, ResizeMethod, TensorLayout};

/// Tensor-input parameters suitable for config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    /// Target tensor width in pixels
    pub width: u32,
    /// Target tensor height in pixels
    pub height: u32,
    pub method: ResizeMethod,
    /// Per-channel value mapped from 0
    pub lower: Vec<f32>,
    /// Per-channel value mapped from 255
    pub upper: Vec<f32>,
    pub layout: TensorLayout,
    /// Pixel format to decode into; None keeps the decoder's native layout
    pub format: Option<PixelFormat>,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            method: ResizeMethod::Area,
            lower: vec![0.0, 0.0, 0.0],
            upper: vec![1.0, 1.0, 1.0],
            layout: TensorLayout::PixelMajor,
            format: Some(PixelFormat::Bgr24),
        }
    }
}

impl InputParams {
    pub fn range(&self) -> Result<NormalizationRange> {
        NormalizationRange::new(self.lower.clone(), self.upper.clone())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn partial_json_uses_defaults() {
        let params = InputParams::from_json(r#"{"width": 224, "layout": "nchw"}"#).unwrap();
        assert_eq!(params.width, 224);
        assert_eq!(params.height, 128);
        assert_eq!(params.layout, TensorLayout::ChannelMajor);
        assert_eq!(params.method, ResizeMethod::Area);
    }

    #[test]
    fn bad_json_is_config_error() {
        assert!(matches!(
            InputParams::from_json(r#"{"width": "wide"}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn range_checks_arity() {
        let params = InputParams {
            lower: vec![0.0],
            ..InputParams::default()
        };
        assert!(params.range().is_err());
        assert_eq!(InputParams::default().range().unwrap().channel_count(), 3);
    }
}
