pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed input from `--input <file>` or piped stdin, if either was given.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(text) => {
            let value: T = serde_json::from_str(&text)
                .map_err(|e| format!("Invalid input on stdin: {}", e))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}
