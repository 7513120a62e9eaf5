use scopecrawl::handlers::*;
use std::io::Write;
use tempfile::NamedTempFile;
use url::Url;

#[test]
fn test_parse_seed_line_with_scheme() {
    let result = parse_seed_line("https://example.com/dubai/");
    assert_eq!(result, Some("https://example.com/dubai/".to_string()));
}

#[test]
fn test_parse_seed_line_without_scheme() {
    let result = parse_seed_line("example.com/dubai/");
    assert_eq!(result, Some("http://example.com/dubai/".to_string()));
}

#[test]
fn test_parse_seed_line_invalid() {
    let result = parse_seed_line("not a valid url!!!");
    assert_eq!(result, None);
}

#[test]
fn test_load_seeds_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://example.com/dubai/")?;
    writeln!(temp_file, "# comment lines are ignored")?;
    writeln!(temp_file, "example.org")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "  https://example.net/abu-dhabi/  ")?;

    let seeds = load_seeds_from_file(temp_file.path())?;

    assert_eq!(
        seeds,
        vec![
            "https://example.com/dubai/",
            "http://example.org",
            "https://example.net/abu-dhabi/",
        ]
    );
    Ok(())
}

#[test]
fn test_load_seeds_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();
    writeln!(temp_file, "# only a comment").unwrap();

    let result = load_seeds_from_file(temp_file.path());

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("No valid URLs"));
}

#[test]
fn test_load_seeds_from_missing_file() {
    let result = load_seeds_from_file(std::path::Path::new("/nonexistent/seeds.txt"));
    assert!(result.unwrap_err().to_string().contains("Failed to read seeds file"));
}

#[test]
fn test_load_seeds_from_source_urls_and_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://example.org/")?;

    let url = Url::parse("https://example.com")?;
    let seeds = load_seeds_from_source(&[url], Some(temp_file.path()))?;

    assert_eq!(seeds, vec!["https://example.com/", "https://example.org/"]);
    Ok(())
}

#[test]
fn test_load_seeds_from_source_no_input() {
    let result = load_seeds_from_source(&[], None);
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Either --url or --seeds-file")
    );
}
