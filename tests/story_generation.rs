//! End-to-end pass over a realistic section file: extract the embedded
//! schema, validate it, and generate the documentation entry.

use pdp_widgets::schema::{
    extract_schema_from_liquid, generate_story, parse_schema, validate_schema, ParseOptions,
    Schema,
};
use serde_json::json;

const SECTION_LIQUID: &str = r#"
<section class="treadmill-f80-athlete-slider" id="shopify-section-athlete">
  <div data-slider="benefits" data-autoplay="true" data-loop="true">
    <div class="pdp__slider-track"></div>
  </div>
</section>

{% schema %}
{
  "name": "Athlete slider",
  "settings": [
    { "type": "header", "content": "Slideshow" },
    { "type": "checkbox", "id": "autoplay", "label": "Auto-rotate slides", "default": true },
    {
      "type": "range",
      "id": "interval",
      "label": "Change slides every",
      "min": 3,
      "max": 9,
      "step": 1,
      "unit": "s",
      "default": 5,
      "visible_if": "{{ section.settings.autoplay }}"
    },
    {
      "type": "select",
      "id": "layout",
      "label": "Layout",
      "options": [
        { "value": "full", "label": "Full width" },
        { "value": "split", "label": "Split" }
      ],
      "default": "full"
    },
    { "type": "paragraph", "content": "Shown on the product page." }
  ],
  "blocks": [
    {
      "type": "slide",
      "name": "Slide",
      "settings": [
        { "type": "image_picker", "id": "image", "label": "Image" },
        { "type": "text", "id": "caption", "label": "Caption", "default": "Fast" }
      ]
    }
  ]
}
{% endschema %}
"#;

#[test]
fn liquid_section_generates_a_complete_story() {
    let raw = extract_schema_from_liquid(SECTION_LIQUID).expect("schema block present");
    assert!(validate_schema(&raw));

    let schema: Schema = serde_json::from_value(raw).expect("schema shape");
    let story = generate_story("athlete-slider", &schema);

    assert_eq!(story.title, "Athlete slider");
    assert_eq!(
        story.arg_types.keys().collect::<Vec<_>>(),
        vec!["autoplay", "interval", "layout"]
    );
    assert_eq!(story.args.len(), 3);
    assert_eq!(story.args["autoplay"], json!(true));
    assert_eq!(story.args["interval"], json!(5));
    assert_eq!(story.args["layout"], json!("full"));

    let interval = &story.arg_types["interval"];
    assert_eq!(interval.description, "Change slides every (s)");
    assert_eq!(interval.table.category.as_deref(), Some("Slideshow"));
    assert_eq!(
        serde_json::to_value(interval).unwrap(),
        json!({
            "control": { "type": "range", "min": 3, "max": 9, "step": 1 },
            "description": "Change slides every (s)",
            "defaultValue": 5,
            "table": {
                "category": "Slideshow",
                "type": { "summary": "number (3-9, step: 1)" },
                "defaultValue": { "summary": "5" }
            },
            "if": { "arg": "autoplay" }
        })
    );
}

#[test]
fn block_settings_join_under_a_prefixed_key() {
    let raw = extract_schema_from_liquid(SECTION_LIQUID).unwrap();
    let schema: Schema = serde_json::from_value(raw).unwrap();

    let arg_types = parse_schema(
        &schema,
        &ParseOptions {
            include_blocks: true,
        },
    );
    assert_eq!(
        arg_types.keys().collect::<Vec<_>>(),
        vec!["autoplay", "interval", "layout", "slide_image", "slide_caption"]
    );
    assert_eq!(
        arg_types["slide_image"].table.category.as_deref(),
        Some("Block: Slide")
    );
    assert_eq!(
        arg_types["slide_caption"].table.category.as_deref(),
        Some("Block: Slide")
    );
}

#[test]
fn text_without_a_schema_block_yields_nothing() {
    assert!(extract_schema_from_liquid("<section>plain markup</section>").is_none());
}
