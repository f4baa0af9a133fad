//! Markup for search replies.
//!
//! Every interpolated value goes through sailfish's `<%= %>` escaping, so reply
//! fields are always treated as text and never as markup.

use sailfish::TemplateOnce;

use crate::{
    error::Result,
    page::RenderTarget,
    payload::{BrandComparison, DrugInfo, GenericLookup},
};

#[derive(TemplateOnce)]
#[template(path = "lookup.stpl")]
struct LookupMarkup<'a> {
    lookup: &'a GenericLookup,
}

#[derive(TemplateOnce)]
#[template(path = "comparison.stpl")]
struct ComparisonMarkup<'a> {
    comparison: &'a BrandComparison,
}

#[derive(TemplateOnce)]
#[template(path = "document.stpl")]
struct SearchDocument<'a> {
    query: &'a str,
    markup: Option<&'a str>,
    text: Option<&'a str>,
}

/// Render the result boxes for a reply
pub fn render_info(info: &DrugInfo) -> Result<String> {
    let markup = match info {
        DrugInfo::Lookup(lookup) => LookupMarkup { lookup }.render_once()?,
        DrugInfo::Comparison(comparison) => ComparisonMarkup { comparison }.render_once()?,
    };
    Ok(markup)
}

/// Render a standalone HTML document around the current render target
pub fn render_document(query: &str, target: &RenderTarget) -> Result<String> {
    let (markup, text) = match target {
        RenderTarget::Empty => (None, None),
        RenderTarget::Markup(markup) => (Some(markup.as_str()), None),
        RenderTarget::Text(text) => (None, Some(text.as_str())),
    };

    Ok(SearchDocument {
        query,
        markup,
        text,
    }
    .render_once()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(brand_drug: &str, generic_info: &str, raw_info: &str) -> DrugInfo {
        DrugInfo::Lookup(GenericLookup {
            brand_drug: brand_drug.to_string(),
            generic_info: generic_info.to_string(),
            raw_info: raw_info.to_string(),
        })
    }

    #[test]
    fn test_lookup_boxes() {
        let markup = render_info(&lookup("Lipitor", "atorvastatin", "statin")).unwrap();

        assert!(markup.contains("Lipitor"));
        assert!(markup.contains("atorvastatin"));
        assert!(markup.contains("statin"));
        assert_eq!(markup.matches("class=\"result-box").count(), 3);
    }

    #[test]
    fn test_comparison_lists_every_retailer() {
        let info = DrugInfo::Comparison(BrandComparison {
            brand_info: "A".to_string(),
            generic_summary: "B".to_string(),
            retailer_info: vec!["C".to_string(), "D".to_string()],
        });
        let markup = render_info(&info).unwrap();

        assert!(markup.contains("<p>A</p>"));
        assert!(markup.contains("<p>B</p>"));
        assert!(markup.contains("<li>C</li>"));
        assert!(markup.contains("<li>D</li>"));
        assert_eq!(markup.matches("<li>").count(), 2);
    }

    #[test]
    fn test_comparison_without_retailers() {
        let info = DrugInfo::Comparison(BrandComparison {
            brand_info: "A".to_string(),
            generic_summary: "B".to_string(),
            retailer_info: Vec::new(),
        });
        let markup = render_info(&info).unwrap();

        assert!(markup.contains("No retailers listed."));
        assert!(!markup.contains("<li>"));
    }

    #[test]
    fn test_fields_are_escaped() {
        let markup = render_info(&lookup("<script>alert(1)</script>", "a & b", "\"quoted\"")).unwrap();

        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;"));
        assert!(markup.contains("a &amp; b"));
    }

    #[test]
    fn test_document_embeds_target() {
        let markup = render_info(&lookup("X", "Y", "Z")).unwrap();
        let document = render_document("X", &RenderTarget::Markup(markup)).unwrap();
        assert!(document.starts_with("<!DOCTYPE html>"));
        assert!(document.contains("<div class=\"result-box brand-box\">"));

        let document =
            render_document("<b>", &RenderTarget::Text("An error occurred.".to_string())).unwrap();
        assert!(document.contains("<p class=\"result-text\">An error occurred.</p>"));
        assert!(document.contains("&lt;b&gt;"));
    }
}
