//! Rendering of lookup results

use anidb_udp_core::FileLookup;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Pretty JSON for a found value, a notice otherwise
pub fn render<T: Serialize>(value: Option<&T>, what: &str) -> Result<String> {
    match value {
        Some(value) => Ok(serde_json::to_string_pretty(value)?),
        None => Ok(format!("{what} not found")),
    }
}

/// Print a lookup result to stdout
pub fn print<T: Serialize>(value: Option<T>, what: &str) -> Result<()> {
    let text = render(value.as_ref(), what)?;
    if value.is_some() {
        println!("{text}");
    } else {
        println!("{}", text.yellow());
    }
    Ok(())
}

/// Print a FILE lookup; several matches print their ids
pub fn print_file(lookup: FileLookup) -> Result<()> {
    match lookup {
        FileLookup::Found(record) => print(Some(record), "File"),
        FileLookup::Multiple(fids) => {
            eprintln!("{}", "Multiple files matched:".bold());
            for fid in fids {
                println!("{fid}");
            }
            Ok(())
        }
        FileLookup::NotFound => print(None::<()>, "File"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anidb_udp_core::Record;

    #[test]
    fn test_render_record_as_json() {
        let record = Record::new().with("aid", 1).with("year", "1999");
        let text = render(Some(&record), "Anime").unwrap();

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["aid"], 1);
        assert_eq!(json["year"], "1999");
    }

    #[test]
    fn test_render_missing() {
        assert_eq!(render(None::<&Record>, "Anime").unwrap(), "Anime not found");
    }
}
