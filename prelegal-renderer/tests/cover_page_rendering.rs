use prelegal_core::{DocumentRegistry, FieldSet};
use prelegal_renderer::{placeholder, Renderer};
use rstest::rstest;
use tempfile::TempDir;

fn full_fields(fields: &[String]) -> FieldSet {
    fields
        .iter()
        .map(|f| (f.clone(), format!("Value{f}")))
        .collect()
}

#[rstest]
#[case("mnda")]
#[case("csa")]
#[case("sla")]
#[case("design_partner")]
#[case("psa")]
#[case("dpa")]
#[case("partnership")]
#[case("software_license")]
#[case("pilot")]
#[case("baa")]
#[case("ai_addendum")]
fn every_token_belongs_to_the_document_schema(#[case] doc_type: &str) {
    let registry = DocumentRegistry::builtin().expect("builtin");
    let renderer = Renderer::new().expect("renderer");
    let config = registry.get(doc_type).expect("registered");
    let tokens = renderer.engine().tokens(doc_type).expect("template");
    assert!(!tokens.is_empty(), "[{doc_type}] template has no tokens");
    for token in tokens {
        assert!(config.has_field(token), "[{doc_type}] token {token} is not a schema field");
    }
}

#[rstest]
#[case("mnda")]
#[case("csa")]
#[case("sla")]
#[case("design_partner")]
#[case("psa")]
#[case("dpa")]
#[case("partnership")]
#[case("software_license")]
#[case("pilot")]
#[case("baa")]
#[case("ai_addendum")]
fn full_fields_render_literally_without_placeholders(#[case] doc_type: &str) {
    let registry = DocumentRegistry::builtin().expect("builtin");
    let renderer = Renderer::new().expect("renderer");
    let config = registry.get(doc_type).expect("registered");

    let html = renderer.render(doc_type, &full_fields(&config.fields)).expect("render");
    assert!(!html.contains("<em>["), "[{doc_type}] placeholder left in:\n{html}");
    assert!(!html.contains("{{"), "[{doc_type}] raw token left in:\n{html}");
    for token in renderer.engine().tokens(doc_type).expect("template") {
        assert!(html.contains(&format!("Value{token}")), "[{doc_type}] {token} not substituted");
    }
    assert!(renderer.missing_fields(doc_type, &full_fields(&config.fields)).is_empty());
}

#[rstest]
#[case("mnda")]
#[case("csa")]
#[case("sla")]
#[case("design_partner")]
#[case("psa")]
#[case("dpa")]
#[case("partnership")]
#[case("software_license")]
#[case("pilot")]
#[case("baa")]
#[case("ai_addendum")]
fn empty_fields_render_a_placeholder_per_token(#[case] doc_type: &str) {
    let renderer = Renderer::new().expect("renderer");
    let html = renderer.render(doc_type, &FieldSet::new()).expect("render");
    for token in renderer.engine().tokens(doc_type).expect("template") {
        assert!(html.contains(&placeholder(token)), "[{doc_type}] no placeholder for {token}");
    }
}

#[test]
fn empty_string_values_count_as_missing() {
    let renderer = Renderer::new().expect("renderer");
    let fields: FieldSet = [("providerName", ""), ("customerName", "Beta Inc")]
        .into_iter()
        .collect();
    let html = renderer.render("pilot", &fields).expect("render");
    assert!(html.contains("<em>[providerName]</em>"));
    assert!(html.contains("Beta Inc"));
}

#[test]
fn override_template_wins_and_new_types_are_added() {
    let dir = TempDir::new().expect("tempdir");
    let pilot = "# Custom pilot\r\n\r\nBy {{providerName}}\r\n";
    std::fs::write(dir.path().join("pilot.md"), pilot).expect("write override");
    std::fs::write(dir.path().join("Offer_Letter.md"), "Hello {{candidateName}}")
        .expect("write new template");
    std::fs::write(dir.path().join("notes.txt"), "{{ignored}}").expect("write non-template");

    let renderer = Renderer::with_template_dir(Some(dir.path())).expect("renderer");

    let fields: FieldSet = [("providerName", "Acme")].into_iter().collect();
    let html = renderer.render("pilot", &fields).expect("render pilot");
    assert!(html.contains("<h1>Custom pilot</h1>"), "override not used: {html}");
    assert!(html.contains("By Acme"));
    assert!(!html.contains('\r'), "line endings not normalised");

    let html = renderer.render("offer_letter", &FieldSet::new()).expect("render offer");
    assert!(html.contains("<em>[candidateName]</em>"));

    assert!(!renderer.engine().has_template("notes"));
    assert!(renderer.engine().has_template("csa"), "embedded templates must remain");
}

#[test]
fn missing_override_dir_is_not_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let renderer =
        Renderer::with_template_dir(Some(&dir.path().join("absent"))).expect("renderer");
    assert!(renderer.engine().has_template("mnda"));
}

#[test]
fn brace_text_that_is_not_a_token_stays_literal() {
    let dir = TempDir::new().expect("tempdir");
    let pilot = "## Terms {#terms}\n\n\
                 Price {{party-one fee}} by {{providerName}}, not {{ customerName }}.\n\n\
                 {% if x %}kept{% endif %} {%endraw%} {# note #}\n";
    std::fs::write(dir.path().join("pilot.md"), pilot).expect("write override");

    let renderer = Renderer::with_template_dir(Some(dir.path())).expect("renderer");
    assert_eq!(
        renderer.engine().tokens("pilot").expect("template"),
        ["providerName".to_string()]
    );

    let fields: FieldSet = [("providerName", "Acme"), ("customerName", "Beta")]
        .into_iter()
        .collect();
    let html = renderer.render("pilot", &fields).expect("render");
    assert!(html.contains("Terms {#terms}"), "{html}");
    assert!(html.contains("Price {{party-one fee}} by Acme, not {{ customerName }}."), "{html}");
    assert!(html.contains("{% if x %}kept{% endif %} {%endraw%} {# note #}"), "{html}");
    assert!(renderer.engine().has_template("csa"), "embedded templates must remain");
}
