//! Render options parsed from the query string and mapped to renderer flags

use std::collections::HashMap;
use std::path::Path;

pub const MAX_JS_DELAY_MS: u32 = 5000;

/// Flags passed on every invocation
const BASE_FLAGS: [&str; 3] = [
    "--enable-local-file-access",
    "--print-media-type",
    "--no-stop-slow-scripts",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Accepts the capitalized and lowercase spellings only
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Portrait" | "portrait" => Some(Orientation::Portrait),
            "Landscape" | "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }

    pub fn as_flag_value(&self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Validated renderer options. Passthrough values are forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub js_delay_ms: u32,
    pub image_dpi: Option<String>,
    pub image_quality: Option<String>,
    pub low_quality: bool,
    pub page_height: Option<String>,
    pub page_width: Option<String>,
    pub page_size: Option<String>,
    pub enable_forms: bool,
    pub smart_shrinking: bool,
    pub margin_top: Option<String>,
    pub margin_bottom: Option<String>,
    pub margin_left: Option<String>,
    pub margin_right: Option<String>,
    pub orientation: Option<Orientation>,
}

impl RenderOptions {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let text = |name: &str| {
            query
                .get(name)
                .filter(|v| !v.is_empty())
                .cloned()
        };
        let flag = |name: &str| query.get(name).map(String::as_str) == Some("true");

        Self {
            js_delay_ms: parse_js_delay(query.get("js_delay").map(String::as_str)),
            image_dpi: text("image_dpi"),
            image_quality: text("image_quality"),
            low_quality: flag("lowquality"),
            page_height: text("page_height"),
            page_width: text("page_width"),
            page_size: text("page_size"),
            enable_forms: flag("enable_forms"),
            smart_shrinking: flag("enable_smart_shrinking"),
            margin_top: text("margin_top"),
            margin_bottom: text("margin_bottom"),
            margin_left: text("margin_left"),
            margin_right: text("margin_right"),
            orientation: query
                .get("orientation")
                .and_then(|v| Orientation::parse(v)),
        }
    }

    /// Renderer flags in a fixed order, without the positional paths
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = BASE_FLAGS.iter().map(|f| f.to_string()).collect();

        push_value(&mut args, "--javascript-delay", Some(self.js_delay_ms.to_string().as_str()));
        push_value(&mut args, "--image-dpi", self.image_dpi.as_deref());
        push_value(&mut args, "--image-quality", self.image_quality.as_deref());
        if self.low_quality {
            args.push("--lowquality".to_string());
        }
        push_value(&mut args, "--page-height", self.page_height.as_deref());
        push_value(&mut args, "--page-width", self.page_width.as_deref());
        push_value(&mut args, "--page-size", self.page_size.as_deref());
        if self.enable_forms {
            args.push("--enable-forms".to_string());
        }
        let shrinking = if self.smart_shrinking {
            "--enable-smart-shrinking"
        } else {
            "--disable-smart-shrinking"
        };
        args.push(shrinking.to_string());
        push_value(&mut args, "--margin-top", self.margin_top.as_deref());
        push_value(&mut args, "--margin-bottom", self.margin_bottom.as_deref());
        push_value(&mut args, "--margin-left", self.margin_left.as_deref());
        push_value(&mut args, "--margin-right", self.margin_right.as_deref());
        push_value(
            &mut args,
            "--orientation",
            self.orientation.map(|o| o.as_flag_value()),
        );

        args
    }

    /// Full argument list: flags followed by the input and output paths
    pub fn command_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = self.to_args();
        args.push(input.to_string_lossy().into_owned());
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

fn push_value(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

/// Missing or non-numeric values give 0; numbers are clamped to [0, 5000]
pub fn parse_js_delay(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.parse::<i64>().ok())
        .map(|delay| delay.clamp(0, i64::from(MAX_JS_DELAY_MS)) as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_js_delay_clamping() {
        assert_eq!(parse_js_delay(Some("-50")), 0);
        assert_eq!(parse_js_delay(Some("999999")), 5000);
        assert_eq!(parse_js_delay(Some("abc")), 0);
        assert_eq!(parse_js_delay(Some("")), 0);
        assert_eq!(parse_js_delay(None), 0);
        assert_eq!(parse_js_delay(Some("1500")), 1500);
        assert_eq!(parse_js_delay(Some("5000")), 5000);
        assert_eq!(parse_js_delay(Some("99999999999999999999999")), 0);
    }

    #[test]
    fn test_orientation_spellings() {
        assert_eq!(Orientation::parse("Landscape"), Some(Orientation::Landscape));
        assert_eq!(Orientation::parse("landscape"), Some(Orientation::Landscape));
        assert_eq!(Orientation::parse("LANDSCAPE"), None);
        assert_eq!(Orientation::parse("Portrait"), Some(Orientation::Portrait));
        assert_eq!(Orientation::parse("portrait"), Some(Orientation::Portrait));
        assert_eq!(Orientation::parse("sideways"), None);
    }

    #[test]
    fn test_default_args() {
        let options = RenderOptions::from_query(&HashMap::new());
        assert_eq!(
            options.to_args(),
            vec![
                "--enable-local-file-access",
                "--print-media-type",
                "--no-stop-slow-scripts",
                "--javascript-delay",
                "0",
                "--disable-smart-shrinking",
            ]
        );
    }

    #[test]
    fn test_full_args_order() {
        let options = RenderOptions::from_query(&query(&[
            ("js_delay", "200"),
            ("image_dpi", "300"),
            ("image_quality", "90"),
            ("lowquality", "true"),
            ("page_height", "297mm"),
            ("page_width", "210mm"),
            ("page_size", "A4"),
            ("enable_forms", "true"),
            ("enable_smart_shrinking", "true"),
            ("margin_top", "10mm"),
            ("margin_bottom", "11mm"),
            ("margin_left", "12mm"),
            ("margin_right", "13mm"),
            ("orientation", "landscape"),
        ]));

        assert_eq!(
            options.to_args(),
            vec![
                "--enable-local-file-access",
                "--print-media-type",
                "--no-stop-slow-scripts",
                "--javascript-delay",
                "200",
                "--image-dpi",
                "300",
                "--image-quality",
                "90",
                "--lowquality",
                "--page-height",
                "297mm",
                "--page-width",
                "210mm",
                "--page-size",
                "A4",
                "--enable-forms",
                "--enable-smart-shrinking",
                "--margin-top",
                "10mm",
                "--margin-bottom",
                "11mm",
                "--margin-left",
                "12mm",
                "--margin-right",
                "13mm",
                "--orientation",
                "Landscape",
            ]
        );
    }

    #[test]
    fn test_boolean_flags_need_literal_true() {
        let options = RenderOptions::from_query(&query(&[
            ("lowquality", "1"),
            ("enable_forms", "TRUE"),
            ("enable_smart_shrinking", "yes"),
        ]));
        assert!(!options.low_quality);
        assert!(!options.enable_forms);
        assert!(!options.smart_shrinking);

        let args = options.to_args();
        assert!(args.contains(&"--disable-smart-shrinking".to_string()));
        assert!(!args.contains(&"--lowquality".to_string()));
        assert!(!args.contains(&"--enable-forms".to_string()));
    }

    #[test]
    fn test_wrong_case_orientation_is_ignored() {
        let options = RenderOptions::from_query(&query(&[("orientation", "LANDSCAPE")]));
        assert_eq!(options.orientation, None);
        assert!(!options.to_args().contains(&"--orientation".to_string()));
    }

    #[test]
    fn test_empty_passthrough_is_skipped() {
        let options = RenderOptions::from_query(&query(&[("page_size", ""), ("margin_top", "")]));
        assert_eq!(options.page_size, None);
        assert_eq!(options.margin_top, None);
    }

    #[test]
    fn test_passthrough_is_verbatim() {
        let options = RenderOptions::from_query(&query(&[("image_dpi", "not-a-number")]));
        assert_eq!(options.image_dpi.as_deref(), Some("not-a-number"));
    }

    #[test]
    fn test_paths_are_last() {
        let options = RenderOptions::default();
        let args = options.command_args(
            &PathBuf::from("/cache/k.html"),
            &PathBuf::from("/cache/k.pdf"),
        );
        let n = args.len();
        assert_eq!(args[n - 2], "/cache/k.html");
        assert_eq!(args[n - 1], "/cache/k.pdf");
    }
}
