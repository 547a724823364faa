//! Tests for the tool registry and pricing.

use super::*;

mod price_lookup {
    use super::*;

    #[test]
    fn registered_ids_return_registered_price() {
        for tool in ToolId::ALL {
            assert_eq!(price_of(tool.as_str()), tool.price(), "tool {tool}");
        }
    }

    #[test]
    fn free_tool_is_not_replaced_by_default() {
        assert_eq!(ToolId::QuickTip.price(), 0);
        assert_eq!(price_of("quick-tip"), 0);
    }

    #[test]
    fn unknown_id_returns_default_price() {
        assert_eq!(price_of("does-not-exist"), DEFAULT_PRICE);
        assert_eq!(price_of(""), DEFAULT_PRICE);
        assert_eq!(price_of("🙂"), DEFAULT_PRICE);
    }

    #[test]
    fn default_price_is_not_zero() {
        assert_ne!(DEFAULT_PRICE, 0);
    }

    #[test]
    fn lookup_ignores_case_and_surrounding_whitespace() {
        assert_eq!(price_of("  ODDS-Analyzer "), 10);
    }
}

mod tool_id {
    use super::*;

    #[test]
    fn parses_every_registered_id() {
        for tool in ToolId::ALL {
            assert_eq!(tool.as_str().parse::<ToolId>(), Ok(tool));
        }
    }

    #[test]
    fn unknown_id_error_keeps_input() {
        let err = "mystery".parse::<ToolId>().unwrap_err();
        assert_eq!(err, UnknownTool("mystery".to_string()));
        assert_eq!(err.to_string(), "Unknown tool id 'mystery'");
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = ToolId::ALL.iter().map(|t| t.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ToolId::ALL.len());
    }

    #[test]
    fn families_cover_both_endpoints() {
        assert_eq!(ToolId::OddsAnalyzer.family(), ToolFamily::Analysis);
        assert_eq!(ToolId::SlipScanner.family(), ToolFamily::Vision);
        assert_eq!(ToolFamily::Vision.to_string(), "vision");
    }

    #[test]
    fn descriptor_matches_accessors() {
        let descriptor = ToolId::ImageInsight.descriptor();

        assert_eq!(descriptor.id, "image-insight");
        assert_eq!(descriptor.name, "Image Insight");
        assert_eq!(descriptor.price, 15);
        assert_eq!(descriptor.gradient_tag, ToolId::ImageInsight.gradient_tag());
    }
}

mod descriptor_resolution {
    use super::*;

    #[test]
    fn registered_tool_ignores_caller_metadata() {
        let meta = ToolMeta {
            name: Some("Renamed".to_string()),
            gradient_tag: Some("from-red-500".to_string()),
        };

        let descriptor = descriptor_for("match-preview", &meta);

        assert_eq!(descriptor, ToolId::MatchPreview.descriptor());
    }

    #[test]
    fn unknown_tool_uses_caller_metadata_and_default_price() {
        let meta = ToolMeta {
            name: Some("Beta Tool".to_string()),
            gradient_tag: Some("from-lime-400 to-green-600".to_string()),
        };

        let descriptor = descriptor_for("beta-tool", &meta);

        assert_eq!(descriptor.id, "beta-tool");
        assert_eq!(descriptor.name, "Beta Tool");
        assert_eq!(descriptor.price, DEFAULT_PRICE);
        assert_eq!(descriptor.gradient_tag, "from-lime-400 to-green-600");
    }

    #[test]
    fn unknown_tool_without_metadata_falls_back_to_id() {
        let descriptor = descriptor_for(" beta-tool ", &ToolMeta::default());

        assert_eq!(descriptor.id, "beta-tool");
        assert_eq!(descriptor.name, "beta-tool");
        assert_eq!(descriptor.gradient_tag, DEFAULT_GRADIENT);
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let json = serde_json::to_value(ToolId::QuickTip.descriptor()).unwrap();

        assert_eq!(json["gradientTag"], "from-amber-400 to-orange-500");
        assert_eq!(json["price"], 0);
    }
}
