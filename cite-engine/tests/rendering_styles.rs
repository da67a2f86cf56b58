//! Entry rendering across every built-in style, against known-good output.

use cite_engine::cite::formats::render_entry;
use cite_engine::{build_style, parse_references, render, tokenize_citations, Author, ReferenceEntry};
use rstest::rstest;

fn sample_entry() -> ReferenceEntry {
    let mut entry = ReferenceEntry::bare(0, "");
    entry.authors = vec![
        Author::new("Smith", Some("J.".to_string())),
        Author::new("Jones", Some("B.".to_string())),
    ];
    entry.year = Some(2020);
    entry.title = Some("A study of things".to_string());
    entry.container = Some("Journal X".to_string());
    entry.volume = Some("3".to_string());
    entry.issue = Some("2".to_string());
    entry.pages = Some("10-20".to_string());
    entry
}

#[rstest]
#[case("apa", "Smith, J., & Jones, B. (2020). A study of things. Journal X, 3(2), 10-20.")]
#[case(
    "harvard",
    "Smith, J. and Jones, B., 2020. A study of things. Journal X, 3(2), pp. 10-20."
)]
#[case("vancouver", "Smith J, Jones B. A study of things. Journal X. 2020;3(2):10-20.")]
#[case(
    "ieee",
    "J. Smith and B. Jones, \"A study of things,\" Journal X, vol. 3, no. 2, pp. 10-20, 2020."
)]
#[case(
    "mla",
    "Smith, J., and Jones, B. \"A Study of Things.\" Journal X, vol. 3, no. 2, 2020, pp. 10-20."
)]
#[case(
    "chicago-author-date",
    "Smith, J., and Jones, B. 2020. \"A Study of Things.\" Journal X 3 (2): 10-20."
)]
fn test_entry_rendering_per_style(#[case] style_name: &str, #[case] expected: &str) {
    let style = build_style(style_name).unwrap();
    assert_eq!(render_entry(&sample_entry(), &style.reference), expected);
}

#[rstest]
#[case("apa")]
#[case("harvard")]
#[case("vancouver")]
fn test_doi_renders_last_without_trailing_period(#[case] style_name: &str) {
    let style = build_style(style_name).unwrap();
    let mut entry = sample_entry();
    entry.doi = Some("https://doi.org/10.1000/xyz".to_string());
    let rendered = render_entry(&entry, &style.reference);
    assert!(rendered.ends_with("https://doi.org/10.1000/xyz"));
}

#[test]
fn test_full_text_output_snapshot() {
    let body = "Results (Smith & Jones, 2020; Brown, 2018) are known.";
    let citations = tokenize_citations(body);
    let references = parse_references(&[
        "Smith, J., & Jones, B. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
        "Brown, C. (2018). Another look at results. Journal Y, 7(1), 100-110.".to_string(),
    ]);
    let style = build_style("apa").unwrap();
    let rendered = render(&style, &citations, &references, body);

    insta::assert_snapshot!(
        format!("{}\n---\n{}", rendered.body, rendered.references),
        @r###"
    Results (Smith & Jones, 2020; Brown, 2018) are known.
    ---
    Brown, C. (2018). Another look at results. Journal Y, 7(1), 100-110.
    Smith, J., & Jones, B. (2020). A study of things. Journal X, 3(2), 10-20.
    "###
    );
}
