#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use miette::{Context as _, IntoDiagnostic as _};

pub mod layout;
pub mod utils;

pub use crate::layout::*;
pub use crate::utils::FloatOrInt;

#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub layout: Layout,
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let config = Self::parse(
            path.file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("config.kdl"),
            &contents,
        )
        .context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }

    /// Parses the bundled default config.
    pub fn bundled() -> Result<Self, knuffel::Error> {
        Self::parse(
            "default-config.kdl",
            include_str!("../../resources/default-config.kdl"),
        )
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_debug_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;

    #[track_caller]
    fn do_parse(text: &str) -> Config {
        Config::parse("test.kdl", text)
            .map_err(miette::Report::new)
            .unwrap()
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let bundled = Config::bundled().map_err(miette::Report::new).unwrap();
        assert_eq!(bundled.layout.gaps, FloatOrInt(16.));
        assert_eq!(bundled.layout.new_column_placement, NewColumnPlacement::NextToPredecessor);
        assert_eq!(
            bundled.layout.default_column_width,
            Some(DefaultColumnWidth(Some(0.5)))
        );
        assert_eq!(bundled.layout.struts, Struts::default());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = do_parse("");
        assert_eq!(config, Config::default());
        assert_eq!(config.layout.gaps, FloatOrInt(16.));
        assert_eq!(config.layout.default_column_width, None);
    }

    #[test]
    fn parse() {
        let parsed = do_parse(
            r##"
            layout {
                gaps 8
                default-column-width { proportion 0.25; }
                new-column-placement "after-active"
                struts {
                    left 64
                    right 32.5
                    top -8
                }
            }
            "##,
        );

        assert_debug_snapshot!(parsed, @r#"
        Config {
            layout: Layout {
                gaps: FloatOrInt(
                    8.0,
                ),
                default_column_width: Some(
                    DefaultColumnWidth(
                        Some(
                            0.25,
                        ),
                    ),
                ),
                new_column_placement: AfterActive,
                struts: Struts {
                    left: FloatOrInt(
                        64.0,
                    ),
                    right: FloatOrInt(
                        32.5,
                    ),
                    top: FloatOrInt(
                        -8.0,
                    ),
                    bottom: FloatOrInt(
                        0.0,
                    ),
                },
            },
        }
        "#);
    }

    #[test]
    fn empty_default_column_width() {
        let config = do_parse("layout { default-column-width {}; }");
        assert_eq!(
            config.layout.default_column_width,
            Some(DefaultColumnWidth(None))
        );
    }

    #[test]
    fn rejects_out_of_range_gaps() {
        assert!(Config::parse("test.kdl", "layout { gaps -1; }").is_err());
        assert!(Config::parse("test.kdl", "layout { gaps 70000; }").is_err());
    }

    #[test]
    fn rejects_bad_proportions() {
        for text in [
            "layout { default-column-width { proportion 0; }; }",
            "layout { default-column-width { proportion 1.5; }; }",
            "layout { default-column-width { fixed 800; }; }",
            "layout { default-column-width { proportion 0.5; proportion 0.25; }; }",
            "layout { default-column-width 0.5 { proportion 0.5; }; }",
            "layout { default-column-width key=1 { proportion 0.5; }; }",
            "layout { default-column-width { proportion 0.5 0.6; }; }",
            "layout { default-column-width { proportion; }; }",
        ] {
            assert!(Config::parse("test.kdl", text).is_err(), "{text}");
        }
    }

    #[test]
    fn rejects_unknown_placement() {
        assert!(Config::parse("test.kdl", r#"layout { new-column-placement "left"; }"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/colonnade/config.kdl")).unwrap_err();
        assert!(err.to_string().starts_with("error reading"));
    }
}
