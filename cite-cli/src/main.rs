//! Command-line interface for the citation engine.
//! Reads a body-text file and a reference-list file, runs the recognition
//! pipeline, and prints the selected output.
//!
//! Usage:
//!   cite `<body>` `<references>` [--style `<name>`] [--format `<format>`]  - Process two text files
//!   cite `<body>` `<references>` --examples `<file>`                     - Learn the style from examples
//!   cite --list-styles                                                - List built-in styles

use clap::{Arg, ArgAction, Command};
use std::fs;

use cite_engine::{
    build_style, learn_style, match_citations, parse_references, render, tokenize_citations,
    validate_report, StyleModel, STYLE_NAMES,
};

fn main() {
    let matches = Command::new("cite")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Recognize, match, and reformat citations in plain text")
        .arg_required_else_help(true)
        .arg(
            Arg::new("body")
                .help("Path to the body text file")
                .required_unless_present("list-styles")
                .index(1),
        )
        .arg(
            Arg::new("references")
                .help("Path to the reference-list file (one entry per line)")
                .required_unless_present("list-styles")
                .index(2),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .short('s')
                .help("Target style name (e.g. 'apa', 'vancouver')")
                .default_value("apa"),
        )
        .arg(
            Arg::new("examples")
                .long("examples")
                .short('e')
                .help("Learn the target style from example entries in this file"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text, report, report-json, report-yaml, ris, bibtex")
                .default_value("text"),
        )
        .arg(
            Arg::new("list-styles")
                .long("list-styles")
                .help("List built-in styles")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-styles") {
        handle_list_styles();
        return;
    }

    let body_path = matches
        .get_one::<String>("body")
        .expect("body is required unless listing styles");
    let refs_path = matches
        .get_one::<String>("references")
        .expect("references is required unless listing styles");
    let style_name = matches.get_one::<String>("style").unwrap();
    let examples_path = matches.get_one::<String>("examples");
    let format = matches.get_one::<String>("format").unwrap();

    let body = read_input(body_path);
    let reference_text = read_input(refs_path);
    let style = resolve_style(style_name, examples_path.map(String::as_str));

    run_pipeline(&body, &reference_text, &style, format);
}

fn handle_list_styles() {
    println!("Built-in styles:\n");
    for name in STYLE_NAMES {
        println!("  {}", name);
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", path, e);
        std::process::exit(1);
    })
}

/// Built-in style by name, or a learned one when an examples file is given.
fn resolve_style(name: &str, examples_path: Option<&str>) -> StyleModel {
    if let Some(path) = examples_path {
        let examples: Vec<String> = read_input(path)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        return learn_style(&examples).unwrap_or_else(|e| {
            eprintln!("Style learning failed: {}", e);
            std::process::exit(1);
        });
    }

    build_style(name).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("\nBuilt-in styles:");
        for name in STYLE_NAMES {
            eprintln!("  {}", name);
        }
        std::process::exit(1);
    })
}

/// Reference entries arrive one per non-empty line; paragraph-level
/// segmentation of richer documents belongs to the container I/O layer.
fn segment_entries(reference_text: &str) -> Vec<String> {
    reference_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn run_pipeline(body: &str, reference_text: &str, style: &StyleModel, format: &str) {
    let citations = tokenize_citations(body);
    let entries = segment_entries(reference_text);
    let references = parse_references(&entries);

    let output = match format {
        "text" => {
            let rendered = render(style, &citations, &references, body);
            format!("{}\n\n{}", rendered.body, rendered.references)
        }
        "report" => {
            let matches = match_citations(&citations, &references);
            let report = validate_report(&matches, &citations, &references);
            summarize_report(&report)
        }
        "report-json" => {
            let matches = match_citations(&citations, &references);
            let report = validate_report(&matches, &citations, &references);
            serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
                eprintln!("Error formatting report: {}", e);
                std::process::exit(1);
            })
        }
        "report-yaml" => {
            let matches = match_citations(&citations, &references);
            let report = validate_report(&matches, &citations, &references);
            serde_yaml::to_string(&report).unwrap_or_else(|e| {
                eprintln!("Error formatting report: {}", e);
                std::process::exit(1);
            })
        }
        "ris" => cite_engine::to_ris(&references),
        "bibtex" => cite_engine::to_bibtex(&references),
        other => {
            eprintln!("Format '{}' not supported", other);
            eprintln!("Available formats: text, report, report-json, report-yaml, ris, bibtex");
            std::process::exit(1);
        }
    };

    println!("{}", output);
}

fn summarize_report(report: &cite_engine::Report) -> String {
    let mut out = format!(
        "Citations: {} ({} matched)\nReferences: {}\n",
        report.total_citations, report.matched_citations, report.total_references
    );
    if !report.unmatched.is_empty() {
        out.push_str("\nUnmatched citations:\n");
        for item in &report.unmatched {
            out.push_str(&format!("  {}  …{}…\n", item.raw_text, item.context));
        }
    }
    if !report.unmatched_numeric.is_empty() {
        out.push_str("\nDangling numeric ids:\n");
        for item in &report.unmatched_numeric {
            let ids: Vec<String> = item.ids.iter().map(u32::to_string).collect();
            out.push_str(&format!("  [{}] at {}\n", ids.join(", "), item.span));
        }
    }
    if !report.unused.is_empty() {
        out.push_str("\nUncited references:\n");
        for item in &report.unused {
            out.push_str(&format!("  [{}] {}\n", item.id, item.raw_text));
        }
    }
    if !report.duplicates.is_empty() {
        out.push_str("\nPossible duplicates:\n");
        for pair in &report.duplicates {
            out.push_str(&format!("  entries {} and {}\n", pair.first, pair.second));
        }
    }
    if !report.suggestions.is_empty() {
        out.push_str("\nSuggestions:\n");
        for s in &report.suggestions {
            out.push_str(&format!(
                "  '{}' vs reference [{}] '{}': {}\n",
                s.citation_author, s.reference_id, s.reference_author, s.note
            ));
        }
    }
    out
}
