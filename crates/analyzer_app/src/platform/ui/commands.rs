use std::path::{Path, PathBuf};

use analyzer_core::{Msg, PackageFile, TypeFilter, PACKAGE_CONTENT_TYPE};

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    CsvLink,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  upload <file>       submit a .tgz package; quote paths to offer several
  refresh             re-read counts and resources from the service
  type <all|Type>     filter by resource type
  search [term]       filter by text anywhere in the record (empty clears)
  show [Type/id]      show one resource as JSON (empty clears)
  validate            validate canonical URLs of the loaded resources
  close               close the validation results
  export              save the loaded resources as fhir_resources.json
  csv [file]          print the CSV export link, or download it to <file>
  dismiss             clear the status message
  help                show this text
  quit                leave";

/// Parses a prompt line; `Ok(None)` for blank input.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "upload" | "drop" => {
            let files = upload_paths(rest)?
                .into_iter()
                .map(|path| {
                    let content_type = declared_content_type(&path);
                    PackageFile::new(path, content_type)
                })
                .collect();
            Command::Dispatch(Msg::FilesDropped(files))
        }
        "refresh" => Command::Dispatch(Msg::RefreshClicked),
        "type" => Command::Dispatch(Msg::TypeSelected(TypeFilter::parse(rest))),
        "search" => Command::Dispatch(Msg::SearchChanged(rest.to_string())),
        "show" => Command::Dispatch(Msg::ResourceSelected(
            (!rest.is_empty()).then(|| rest.to_string()),
        )),
        "validate" => Command::Dispatch(Msg::ValidateClicked),
        "close" => Command::Dispatch(Msg::ValidationModalClosed),
        "export" => Command::Dispatch(Msg::ExportJsonClicked),
        "csv" if rest.is_empty() => Command::CsvLink,
        "csv" => Command::Dispatch(Msg::CsvDownloadRequested(PathBuf::from(rest))),
        "dismiss" => Command::Dispatch(Msg::StatusDismissed),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}'; type help")),
    };
    Ok(Some(command))
}

/// The rest of the line is one path; double quotes offer several.
fn upload_paths(rest: &str) -> Result<Vec<PathBuf>, String> {
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    if !rest.contains('"') {
        return Ok(vec![PathBuf::from(rest)]);
    }

    let mut paths = Vec::new();
    let mut remaining = rest;
    loop {
        remaining = remaining.trim_start();
        if remaining.is_empty() {
            return Ok(paths);
        }
        let Some(quoted) = remaining.strip_prefix('"') else {
            return Err("quote every path when offering several files".to_string());
        };
        let Some((path, tail)) = quoted.split_once('"') else {
            return Err("unterminated quote in upload path".to_string());
        };
        paths.push(PathBuf::from(path));
        remaining = tail;
    }
}

/// Content type a file picker would declare, judged by extension only.
pub fn declared_content_type(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
    let content_type = if name.ends_with(".tgz") || name.ends_with(".gz") {
        PACKAGE_CONTENT_TYPE
    } else if name.ends_with(".zip") {
        "application/zip"
    } else if name.ends_with(".tar") {
        "application/x-tar"
    } else if name.ends_with(".json") {
        "application/json"
    } else {
        return None;
    };
    Some(content_type.to_string())
}
